use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// Recoverable binding failures returned to the registration caller.
///
/// A malformed ABI method (one declaring no outputs) has no variant here;
/// it aborts binding through a panic in [`crate::returns::validate_outputs`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindingError {
    #[error("type mismatch: {impl_type} != {abi_type}")]
    TypeMismatch { impl_type: String, abi_type: String },

    #[error("validateStruct: not a struct")]
    NotAStruct,

    #[error("field count mismatch: {impl_type} has {impl_fields} fields, {abi_type} has {abi_fields} fields")]
    FieldCountMismatch {
        impl_type: String,
        impl_fields: usize,
        abi_type: String,
        abi_fields: usize,
    },

    #[error("last return type must be error, got {actual}")]
    LastReturnNotFault { actual: String },

    #[error("number of return args mismatch: {abi_method} expects {expected} return vals, {impl_method} returns {actual} vals")]
    ReturnCountMismatch {
        abi_method: String,
        expected: usize,
        impl_method: String,
        actual: usize,
    },

    #[error("return type mismatch: {abi_method} expects {expected}, {impl_method} has {actual}")]
    ReturnTypeMismatch {
        abi_method: String,
        expected: String,
        impl_method: String,
        actual: String,
    },

    #[error("number of args mismatch: {abi_method} expects {expected} args, {impl_method} takes {actual} args")]
    ParamCountMismatch {
        abi_method: String,
        expected: usize,
        impl_method: String,
        actual: usize,
    },

    #[error("arg {index} of {impl_method} does not match {abi_method}: {source}")]
    ParamMismatch {
        impl_method: String,
        abi_method: String,
        index: usize,
        #[source]
        source: Box<BindingError>,
    },

    #[error("{impl_method} matches multiple ABI methods: {}", .candidates.join(", "))]
    AmbiguousMatch {
        impl_method: String,
        candidates: Vec<String>,
    },

    #[error("ABI method {abi_method} is implemented by both {first} and {second}")]
    DuplicateBinding {
        abi_method: String,
        first: String,
        second: String,
    },

    #[error("ABI method {abi_method} has no implementation")]
    UnimplementedAbiMethod { abi_method: String },
}

/// Machine-readable code for each [`BindingError`] variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    TypeMismatch,
    NotAStruct,
    FieldCountMismatch,
    LastReturnNotFault,
    ReturnCountMismatch,
    ReturnTypeMismatch,
    ParamCountMismatch,
    ParamMismatch,
    AmbiguousMatch,
    DuplicateBinding,
    UnimplementedAbiMethod,
}

impl BindingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BindingError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            BindingError::NotAStruct => ErrorKind::NotAStruct,
            BindingError::FieldCountMismatch { .. } => ErrorKind::FieldCountMismatch,
            BindingError::LastReturnNotFault { .. } => ErrorKind::LastReturnNotFault,
            BindingError::ReturnCountMismatch { .. } => ErrorKind::ReturnCountMismatch,
            BindingError::ReturnTypeMismatch { .. } => ErrorKind::ReturnTypeMismatch,
            BindingError::ParamCountMismatch { .. } => ErrorKind::ParamCountMismatch,
            BindingError::ParamMismatch { .. } => ErrorKind::ParamMismatch,
            BindingError::AmbiguousMatch { .. } => ErrorKind::AmbiguousMatch,
            BindingError::DuplicateBinding { .. } => ErrorKind::DuplicateBinding,
            BindingError::UnimplementedAbiMethod { .. } => ErrorKind::UnimplementedAbiMethod,
        }
    }

    /// Kind of the innermost error, looking through parameter context.
    pub fn root_kind(&self) -> ErrorKind {
        match self {
            BindingError::ParamMismatch { source, .. } => source.root_kind(),
            other => other.kind(),
        }
    }
}

/// Reports render an error as its kind and message.
impl Serialize for BindingError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("BindingError", 2)?;
        state.serialize_field("kind", &self.kind())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}
