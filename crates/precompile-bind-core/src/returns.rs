use crate::descriptor::{AbiMethod, NativeMethod};
use crate::error::BindingError;
use crate::validator::validate_arg;

/// Validates the return shape of `native` against the outputs of `abi`.
///
/// The native method must end with the fault return, and the returns before
/// it must line up one-to-one with the ABI outputs. Each pair is compared
/// with [`validate_arg`]; a failure is reported with the top-level names.
///
/// # Panics
///
/// Panics when `abi` declares no outputs. Such an ABI definition is broken,
/// not a signature to validate against, and binding must not continue.
pub fn validate_outputs(native: &NativeMethod, abi: &AbiMethod) -> Result<(), BindingError> {
    if abi.outputs.is_empty() {
        panic!("malformed ABI method {}: no outputs declared", abi.name);
    }

    let Some((last, values)) = native.returns.split_last() else {
        return Err(BindingError::LastReturnNotFault {
            actual: "nothing".to_string(),
        });
    };
    if !last.is_fault() {
        return Err(BindingError::LastReturnNotFault {
            actual: last.full_name(),
        });
    }

    if values.len() != abi.outputs.len() {
        return Err(BindingError::ReturnCountMismatch {
            abi_method: abi.name.clone(),
            expected: abi.outputs.len(),
            impl_method: native.name.clone(),
            actual: values.len(),
        });
    }

    for (actual, expected) in values.iter().zip(&abi.outputs) {
        if validate_arg(actual, expected).is_err() {
            return Err(BindingError::ReturnTypeMismatch {
                abi_method: abi.name.clone(),
                expected: expected.full_name(),
                impl_method: native.name.clone(),
                actual: actual.full_name(),
            });
        }
    }
    Ok(())
}
