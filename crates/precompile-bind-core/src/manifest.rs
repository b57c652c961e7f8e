//! Statically declared implementation methods of one precompile.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::descriptor::NativeMethod;

/// The registration list an implementation author ships with a precompile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImplManifest {
    pub precompile: String,
    #[serde(default)]
    pub methods: Vec<NativeMethod>,
}

impl ImplManifest {
    pub fn new(precompile: impl Into<String>) -> Self {
        Self {
            precompile: precompile.into(),
            methods: Vec::new(),
        }
    }

    pub fn method(mut self, method: NativeMethod) -> Self {
        self.methods.push(method);
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse implementation manifest")
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
        Self::from_json(&content)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::TypeDescriptor;

    #[test]
    fn test_parse_manifest() {
        let manifest = ImplManifest::from_json(
            r#"{
                "precompile": "MockImpl",
                "methods": [
                    {
                        "name": "ExampleFunc",
                        "params": [{"kind": "pointer", "elem": {"kind": "scalar", "name": "big.Int"}}],
                        "returns": [{"kind": "scalar", "name": "bool"}, {"kind": "scalar", "name": "error"}]
                    },
                    {"name": "MockMethod", "returns": [{"kind": "scalar", "name": "error"}]}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(manifest.precompile, "MockImpl");
        assert_eq!(manifest.methods.len(), 2);
        assert_eq!(manifest.methods[0].params, vec![TypeDescriptor::big_int()]);
        assert!(manifest.methods[1].params.is_empty());
        assert!(manifest.methods[1].returns[0].is_fault());
    }

    #[test]
    fn test_rejects_unknown_kind() {
        let result = ImplManifest::from_json(
            r#"{"precompile": "X", "methods": [{"name": "A", "params": [{"kind": "map"}]}]}"#,
        );
        assert!(result.is_err());
    }
}
