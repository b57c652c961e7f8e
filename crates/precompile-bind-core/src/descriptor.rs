//! Type and method descriptors compared by the binding validators.
//!
//! Descriptors are plain immutable values: they are built once per
//! validation call, either by hand, through [`crate::describe::Describe`],
//! or by the ABI document adapter, and are never mutated afterwards.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::describe::Describe;

/// Canonical name of the fault type every native method must return last.
pub const FAULT_TYPE_NAME: &str = "error";

/// Shape of a type as seen by the structural validators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Scalar,
    Pointer,
    Slice,
    Array,
    Struct,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeKind::Scalar => write!(f, "scalar"),
            TypeKind::Pointer => write!(f, "pointer"),
            TypeKind::Slice => write!(f, "slice"),
            TypeKind::Array => write!(f, "array"),
            TypeKind::Struct => write!(f, "struct"),
        }
    }
}

/// Kind-tagged description of a parameter, return or field type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeDescriptor {
    /// Leaf type identified only by its canonical name (`uint64`, `bool`)
    Scalar { name: String },
    /// One level of indirection (`*big.Int`)
    Pointer { elem: Box<TypeDescriptor> },
    /// Dynamic sequence (`[]uint64`)
    Slice { elem: Box<TypeDescriptor> },
    /// Fixed-length sequence (`[32]uint8`)
    Array { len: usize, elem: Box<TypeDescriptor> },
    /// Ordered fields compared by position. `name` is display-only.
    Struct {
        name: String,
        fields: Vec<TypeDescriptor>,
    },
}

impl TypeDescriptor {
    pub fn scalar(name: impl Into<String>) -> Self {
        TypeDescriptor::Scalar { name: name.into() }
    }

    pub fn pointer(elem: TypeDescriptor) -> Self {
        TypeDescriptor::Pointer {
            elem: Box::new(elem),
        }
    }

    pub fn slice(elem: TypeDescriptor) -> Self {
        TypeDescriptor::Slice {
            elem: Box::new(elem),
        }
    }

    pub fn array(len: usize, elem: TypeDescriptor) -> Self {
        TypeDescriptor::Array {
            len,
            elem: Box::new(elem),
        }
    }

    pub fn structure(name: impl Into<String>, fields: Vec<TypeDescriptor>) -> Self {
        TypeDescriptor::Struct {
            name: name.into(),
            fields,
        }
    }

    /// The designated fault descriptor (`error`).
    pub fn fault() -> Self {
        Self::scalar(FAULT_TYPE_NAME)
    }

    /// `*big.Int`, the host type of every ABI integer wider than 64 bits.
    pub fn big_int() -> Self {
        Self::pointer(Self::scalar("big.Int"))
    }

    /// `common.Address`, the host type of the ABI `address` type.
    pub fn address() -> Self {
        Self::scalar("common.Address")
    }

    pub fn kind(&self) -> TypeKind {
        match self {
            TypeDescriptor::Scalar { .. } => TypeKind::Scalar,
            TypeDescriptor::Pointer { .. } => TypeKind::Pointer,
            TypeDescriptor::Slice { .. } => TypeKind::Slice,
            TypeDescriptor::Array { .. } => TypeKind::Array,
            TypeDescriptor::Struct { .. } => TypeKind::Struct,
        }
    }

    /// Element type of a pointer, slice or array.
    pub fn elem(&self) -> Option<&TypeDescriptor> {
        match self {
            TypeDescriptor::Pointer { elem }
            | TypeDescriptor::Slice { elem }
            | TypeDescriptor::Array { elem, .. } => Some(elem),
            _ => None,
        }
    }

    /// Field types of a struct, in declaration order.
    pub fn fields(&self) -> Option<&[TypeDescriptor]> {
        match self {
            TypeDescriptor::Struct { fields, .. } => Some(fields),
            _ => None,
        }
    }

    /// Strips at most one layer of pointer.
    pub fn deref_once(&self) -> &TypeDescriptor {
        match self {
            TypeDescriptor::Pointer { elem } => elem,
            other => other,
        }
    }

    pub fn is_fault(&self) -> bool {
        matches!(self, TypeDescriptor::Scalar { name } if name == FAULT_TYPE_NAME)
    }

    /// Canonical full name, e.g. `[]*big.Int` or `*precompile.mockStruct`.
    pub fn full_name(&self) -> String {
        match self {
            TypeDescriptor::Scalar { name } => name.clone(),
            TypeDescriptor::Pointer { elem } => format!("*{}", elem.full_name()),
            TypeDescriptor::Slice { elem } => format!("[]{}", elem.full_name()),
            TypeDescriptor::Array { len, elem } => format!("[{}]{}", len, elem.full_name()),
            TypeDescriptor::Struct { name, .. } => name.clone(),
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_name())
    }
}

/// Externally declared method signature, as read from the ABI document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiMethod {
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<TypeDescriptor>,
    #[serde(default)]
    pub outputs: Vec<TypeDescriptor>,
}

impl AbiMethod {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    pub fn input(mut self, ty: TypeDescriptor) -> Self {
        self.inputs.push(ty);
        self
    }

    pub fn output(mut self, ty: TypeDescriptor) -> Self {
        self.outputs.push(ty);
        self
    }
}

/// Signature of a host-side implementation method.
///
/// `params` excludes the execution context and receiver; `returns` ends with
/// the fault descriptor when the method follows the fault-return convention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeMethod {
    pub name: String,
    #[serde(default)]
    pub params: Vec<TypeDescriptor>,
    #[serde(default)]
    pub returns: Vec<TypeDescriptor>,
}

impl NativeMethod {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            returns: Vec::new(),
        }
    }

    pub fn param(mut self, ty: TypeDescriptor) -> Self {
        self.params.push(ty);
        self
    }

    pub fn param_of<T: Describe>(self) -> Self {
        self.param(T::describe())
    }

    pub fn returning(mut self, ty: TypeDescriptor) -> Self {
        self.returns.push(ty);
        self
    }

    pub fn returning_of<T: Describe>(self) -> Self {
        self.returning(T::describe())
    }

    /// Appends the trailing fault return.
    pub fn returning_fault(self) -> Self {
        self.returning(TypeDescriptor::fault())
    }
}

/// Name-keyed ABI method table. Iteration is lexicographic by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AbiTable {
    methods: BTreeMap<String, AbiMethod>,
}

impl AbiTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a method, returning the entry it replaced, if any.
    pub fn insert(&mut self, method: AbiMethod) -> Option<AbiMethod> {
        self.methods.insert(method.name.clone(), method)
    }

    pub fn get(&self, name: &str) -> Option<&AbiMethod> {
        self.methods.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }

    pub fn methods(&self) -> impl Iterator<Item = &AbiMethod> {
        self.methods.values()
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl FromIterator<AbiMethod> for AbiTable {
    fn from_iter<I: IntoIterator<Item = AbiMethod>>(iter: I) -> Self {
        let mut table = AbiTable::new();
        for method in iter {
            table.insert(method);
        }
        table
    }
}
