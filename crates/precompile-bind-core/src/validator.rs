//! Structural type compatibility between implementation and ABI types.
//!
//! Composite slices and structs are unwrapped before names are compared, so a
//! failure names the innermost pair of types that differ.

use crate::descriptor::{TypeDescriptor, TypeKind};
use crate::error::BindingError;

/// Checks that `impl_type` is structurally compatible with `abi_type`.
///
/// Evaluated in order:
/// 1. slice vs slice, or array vs array of the same length, recurses on the
///    element types when those elements can themselves be unwrapped (both
///    sequences of one shape, or both structs);
/// 2. struct vs struct (each through at most one pointer) compares fields
///    positionally via [`validate_struct`];
/// 3. anything else compares canonical full names at this level, so
///    `[]uint64` vs `[]*big.Int` reports the two slice names.
///
/// Errors from the recursive steps are returned as-is.
pub fn validate_arg(impl_type: &TypeDescriptor, abi_type: &TypeDescriptor) -> Result<(), BindingError> {
    if let Some((impl_elem, abi_elem)) = sequence_elems(impl_type, abi_type) {
        if unwraps_together(impl_elem, abi_elem) {
            return validate_arg(impl_elem, abi_elem);
        }
    } else if both_structs(impl_type, abi_type) {
        return validate_struct(impl_type.deref_once(), abi_type.deref_once());
    }

    let impl_name = impl_type.full_name();
    let abi_name = abi_type.full_name();
    if impl_name != abi_name {
        return Err(BindingError::TypeMismatch {
            impl_type: impl_name,
            abi_type: abi_name,
        });
    }
    Ok(())
}

fn both_structs(a: &TypeDescriptor, b: &TypeDescriptor) -> bool {
    a.deref_once().kind() == TypeKind::Struct && b.deref_once().kind() == TypeKind::Struct
}

/// Element pair of two sequences of the same shape.
fn sequence_elems<'a>(
    a: &'a TypeDescriptor,
    b: &'a TypeDescriptor,
) -> Option<(&'a TypeDescriptor, &'a TypeDescriptor)> {
    match (a, b) {
        (TypeDescriptor::Slice { elem: a }, TypeDescriptor::Slice { elem: b }) => Some((&**a, &**b)),
        (TypeDescriptor::Array { len: m, elem: a }, TypeDescriptor::Array { len: n, elem: b }) if m == n => {
            Some((&**a, &**b))
        }
        _ => None,
    }
}

fn unwraps_together(a: &TypeDescriptor, b: &TypeDescriptor) -> bool {
    sequence_elems(a, b).is_some() || both_structs(a, b)
}

/// Compares two structs field by field, by position only.
///
/// Stops at the first incompatible field pair.
pub fn validate_struct(impl_type: &TypeDescriptor, abi_type: &TypeDescriptor) -> Result<(), BindingError> {
    let (Some(impl_fields), Some(abi_fields)) = (impl_type.fields(), abi_type.fields()) else {
        return Err(BindingError::NotAStruct);
    };

    if impl_fields.len() != abi_fields.len() {
        return Err(BindingError::FieldCountMismatch {
            impl_type: impl_type.full_name(),
            impl_fields: impl_fields.len(),
            abi_type: abi_type.full_name(),
            abi_fields: abi_fields.len(),
        });
    }

    for (impl_field, abi_field) in impl_fields.iter().zip(abi_fields) {
        validate_arg(impl_field, abi_field)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn uint64() -> TypeDescriptor {
        TypeDescriptor::scalar("uint64")
    }

    fn mock_struct() -> TypeDescriptor {
        TypeDescriptor::structure("precompile.mockStruct", vec![TypeDescriptor::big_int()])
    }

    fn mock_struct_bad() -> TypeDescriptor {
        TypeDescriptor::structure("precompile.mockStructBad", vec![uint64()])
    }

    fn mock_struct_bad_num_fields() -> TypeDescriptor {
        TypeDescriptor::structure(
            "precompile.mockStructBadNumFields",
            vec![TypeDescriptor::big_int(), TypeDescriptor::big_int()],
        )
    }

    #[test]
    fn test_identical_scalars_match() {
        assert!(validate_arg(&uint64(), &uint64()).is_ok());
        assert!(validate_arg(&TypeDescriptor::big_int(), &TypeDescriptor::big_int()).is_ok());
    }

    #[test]
    fn test_slice_of_scalars_reports_slice_names() {
        let err = validate_arg(
            &TypeDescriptor::slice(uint64()),
            &TypeDescriptor::slice(TypeDescriptor::big_int()),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "type mismatch: []uint64 != []*big.Int");
        assert!(validate_arg(&TypeDescriptor::slice(uint64()), &TypeDescriptor::slice(uint64())).is_ok());
    }

    #[test]
    fn test_nested_slices_report_innermost_slices() {
        let impl_type = TypeDescriptor::slice(TypeDescriptor::slice(uint64()));
        let abi_type = TypeDescriptor::slice(TypeDescriptor::slice(TypeDescriptor::scalar("bool")));
        let err = validate_arg(&impl_type, &abi_type).unwrap_err();
        assert_eq!(err.to_string(), "type mismatch: []uint64 != []bool");
    }

    #[test]
    fn test_slice_vs_scalar() {
        let err = validate_arg(&TypeDescriptor::slice(uint64()), &uint64()).unwrap_err();
        assert_eq!(err.to_string(), "type mismatch: []uint64 != uint64");
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_nested_struct_field_mismatch() {
        let err = validate_arg(
            &TypeDescriptor::slice(mock_struct()),
            &TypeDescriptor::slice(mock_struct_bad()),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "type mismatch: *big.Int != uint64");
    }

    #[test]
    fn test_scalar_vs_pointer_to_struct() {
        let err = validate_arg(
            &TypeDescriptor::scalar("int"),
            &TypeDescriptor::pointer(mock_struct()),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "type mismatch: int != *precompile.mockStruct");
    }

    #[test]
    fn test_struct_through_single_pointer() {
        assert!(validate_arg(&TypeDescriptor::pointer(mock_struct()), &mock_struct()).is_ok());
        let renamed = TypeDescriptor::structure("IMock.Payload", vec![TypeDescriptor::big_int()]);
        assert!(validate_arg(&mock_struct(), &renamed).is_ok());
    }

    #[test]
    fn test_double_pointer_is_not_unwrapped() {
        let double = TypeDescriptor::pointer(TypeDescriptor::pointer(mock_struct()));
        let err = validate_arg(&double, &mock_struct()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(
            err.to_string(),
            "type mismatch: **precompile.mockStruct != precompile.mockStruct"
        );
    }

    #[test]
    fn test_validate_struct_errors() {
        assert!(validate_struct(&mock_struct(), &mock_struct()).is_ok());
        assert!(validate_struct(&mock_struct(), &mock_struct_bad()).is_err());

        let err = validate_struct(&mock_struct(), &mock_struct_bad_num_fields()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FieldCountMismatch);

        let err = validate_struct(&mock_struct(), &TypeDescriptor::scalar("int")).unwrap_err();
        assert_eq!(err.to_string(), "validateStruct: not a struct");
        let err = validate_struct(&TypeDescriptor::scalar("int"), &mock_struct()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotAStruct);
    }

    #[test]
    fn test_validate_struct_with_no_struct_at_all() {
        let err = validate_struct(&uint64(), &TypeDescriptor::slice(uint64())).unwrap_err();
        assert_eq!(err, BindingError::NotAStruct);
        let err = validate_struct(&TypeDescriptor::pointer(mock_struct()), &mock_struct()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotAStruct);
    }

    #[test]
    fn test_arrays_of_structs_compare_fields() {
        let abi_type = TypeDescriptor::array(
            2,
            TypeDescriptor::structure("IMock.Data", vec![TypeDescriptor::big_int()]),
        );
        assert!(validate_arg(&TypeDescriptor::array(2, mock_struct()), &abi_type).is_ok());

        let err = validate_arg(&TypeDescriptor::array(2, mock_struct_bad()), &abi_type).unwrap_err();
        assert_eq!(err.to_string(), "type mismatch: uint64 != *big.Int");
    }

    #[test]
    fn test_array_shape_must_agree() {
        let bytes32 = TypeDescriptor::array(32, TypeDescriptor::scalar("uint8"));
        assert!(validate_arg(&bytes32, &bytes32.clone()).is_ok());

        let err = validate_arg(&TypeDescriptor::array(20, TypeDescriptor::scalar("uint8")), &bytes32).unwrap_err();
        assert_eq!(err.to_string(), "type mismatch: [20]uint8 != [32]uint8");

        let err = validate_arg(&TypeDescriptor::slice(TypeDescriptor::scalar("uint8")), &bytes32).unwrap_err();
        assert_eq!(err.to_string(), "type mismatch: []uint8 != [32]uint8");

        let err = validate_arg(
            &TypeDescriptor::array(2, mock_struct()),
            &TypeDescriptor::array(3, mock_struct()),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "type mismatch: [2]precompile.mockStruct != [3]precompile.mockStruct");
    }

    #[test]
    fn test_field_count_checked_before_fields() {
        let short = TypeDescriptor::structure("a", vec![uint64()]);
        let long = TypeDescriptor::structure("b", vec![TypeDescriptor::scalar("bool"), uint64()]);
        let err = validate_struct(&short, &long).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FieldCountMismatch);
        assert_eq!(err.to_string(), "field count mismatch: a has 1 fields, b has 2 fields");
    }

    #[test]
    fn test_nested_structs_recurse() {
        let inner_ok = TypeDescriptor::structure("inner", vec![uint64()]);
        let inner_bad = TypeDescriptor::structure("inner", vec![TypeDescriptor::scalar("bool")]);
        let outer = |inner: TypeDescriptor| {
            TypeDescriptor::structure("outer", vec![TypeDescriptor::slice(inner)])
        };
        assert!(validate_arg(&outer(inner_ok.clone()), &outer(inner_ok.clone())).is_ok());
        let err = validate_arg(&outer(inner_ok), &outer(inner_bad)).unwrap_err();
        assert_eq!(err.to_string(), "type mismatch: uint64 != bool");
    }
}
