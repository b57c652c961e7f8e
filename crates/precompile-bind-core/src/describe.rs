//! Static type description for implementation signatures.
//!
//! Implementation authors describe their parameter and return types through
//! [`Describe`] instead of relying on runtime introspection. Primitive host
//! types are covered here; user structs use [`describe_struct!`].

use crate::descriptor::TypeDescriptor;

/// Produces the [`TypeDescriptor`] of a host type.
pub trait Describe {
    fn describe() -> TypeDescriptor;
}

macro_rules! describe_scalar {
    ($($ty:ty => $name:expr),* $(,)?) => {
        $(
            impl Describe for $ty {
                fn describe() -> TypeDescriptor {
                    TypeDescriptor::scalar($name)
                }
            }
        )*
    };
}

describe_scalar! {
    bool => "bool",
    u8 => "uint8",
    u16 => "uint16",
    u32 => "uint32",
    u64 => "uint64",
    i8 => "int8",
    i16 => "int16",
    i32 => "int32",
    i64 => "int64",
    String => "string",
}

impl<T: Describe> Describe for Vec<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::slice(T::describe())
    }
}

impl<T: Describe, const N: usize> Describe for [T; N] {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::array(N, T::describe())
    }
}

impl<T: Describe> Describe for Box<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::pointer(T::describe())
    }
}

/// Stand-in for the arbitrary-precision integer type. Use as `Box<BigInt>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BigInt;

impl Describe for BigInt {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::scalar("big.Int")
    }
}

/// Stand-in for the 20-byte account address type.
#[derive(Debug, Clone, Copy, Default)]
pub struct Address;

impl Describe for Address {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::address()
    }
}

/// Implements [`Describe`] for a struct from its display name and the
/// ordered types of its fields.
///
/// ```
/// use precompile_bind_core::{describe_struct, BigInt, Describe};
///
/// struct Delegation {
///     _amount: Box<BigInt>,
/// }
///
/// describe_struct!(Delegation, "staking.Delegation", [Box<BigInt>]);
///
/// assert_eq!(Delegation::describe().full_name(), "staking.Delegation");
/// ```
#[macro_export]
macro_rules! describe_struct {
    ($ty:ty, $name:expr, [$($field:ty),* $(,)?]) => {
        impl $crate::describe::Describe for $ty {
            fn describe() -> $crate::descriptor::TypeDescriptor {
                $crate::descriptor::TypeDescriptor::structure(
                    $name,
                    vec![$(<$field as $crate::describe::Describe>::describe()),*],
                )
            }
        }
    };
}
