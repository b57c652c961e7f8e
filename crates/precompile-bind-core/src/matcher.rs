//! Name-based discovery of the ABI method a native method implements.
//!
//! Native methods are conventionally PascalCase (`ExampleFunc`) and ABI
//! methods camelCase (`exampleFunc`); a pair matches when either lowercased
//! name contains the other. Matching says nothing about signature
//! compatibility.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::descriptor::{AbiTable, NativeMethod};
use crate::error::BindingError;

/// What to do when a native name matches more than one ABI method
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPolicy {
    /// Take the first candidate in lexicographic ABI name order.
    #[default]
    #[serde(rename = "first")]
    FirstFound,
    /// Fail with [`BindingError::AmbiguousMatch`] unless exactly one
    /// candidate equals the native name ignoring case.
    #[serde(rename = "strict")]
    Strict,
}

impl MatchPolicy {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "first" => Some(MatchPolicy::FirstFound),
            "strict" => Some(MatchPolicy::Strict),
            _ => None,
        }
    }
}

impl fmt::Display for MatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchPolicy::FirstFound => write!(f, "first"),
            MatchPolicy::Strict => write!(f, "strict"),
        }
    }
}

/// Finds the ABI method `native` implements, first-found.
///
/// `Ok(None)` means the method is not an exposed endpoint, which is a normal
/// outcome.
pub fn find_matching_abi_method(native: &NativeMethod, table: &AbiTable) -> Result<Option<String>, BindingError> {
    find_matching_abi_method_with(native, table, MatchPolicy::FirstFound)
}

pub fn find_matching_abi_method_with(
    native: &NativeMethod,
    table: &AbiTable,
    policy: MatchPolicy,
) -> Result<Option<String>, BindingError> {
    let mut candidates = table.names().filter(|abi_name| names_match(&native.name, abi_name));

    match policy {
        MatchPolicy::FirstFound => Ok(candidates.next().map(str::to_string)),
        MatchPolicy::Strict => {
            let candidates: Vec<&str> = candidates.collect();
            match candidates.as_slice() {
                [] => Ok(None),
                [only] => Ok(Some(only.to_string())),
                many => {
                    let mut exact = many.iter().filter(|c| c.eq_ignore_ascii_case(&native.name));
                    match (exact.next(), exact.next()) {
                        (Some(name), None) => Ok(Some(name.to_string())),
                        _ => Err(BindingError::AmbiguousMatch {
                            impl_method: native.name.clone(),
                            candidates: many.iter().map(|c| c.to_string()).collect(),
                        }),
                    }
                }
            }
        }
    }
}

fn names_match(native_name: &str, abi_name: &str) -> bool {
    let native_name = native_name.to_lowercase();
    let abi_name = abi_name.to_lowercase();
    native_name.contains(&abi_name) || abi_name.contains(&native_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::AbiMethod;
    use crate::error::ErrorKind;

    fn table(names: &[&str]) -> AbiTable {
        names.iter().map(|n| AbiMethod::new(*n)).collect()
    }

    #[test]
    fn test_pascal_to_camel_match() {
        let abi = table(&["exampleFunc", "zeroReturn", "getOutput"]);
        let matched = find_matching_abi_method(&NativeMethod::new("ExampleFunc"), &abi).unwrap();
        assert_eq!(matched.as_deref(), Some("exampleFunc"));
    }

    #[test]
    fn test_no_match_is_not_an_error() {
        let abi = table(&["exampleFunc", "zeroReturn", "getOutput"]);
        let matched = find_matching_abi_method(&NativeMethod::new("MockMethod"), &abi).unwrap();
        assert_eq!(matched, None);
    }

    #[test]
    fn test_substring_either_direction() {
        let abi = table(&["getOutputPartial"]);
        let matched = find_matching_abi_method(&NativeMethod::new("GetOutput"), &abi).unwrap();
        assert_eq!(matched.as_deref(), Some("getOutputPartial"));

        let abi = table(&["exampleFunc"]);
        let matched = find_matching_abi_method(&NativeMethod::new("ExampleFuncBad"), &abi).unwrap();
        assert_eq!(matched.as_deref(), Some("exampleFunc"));
    }

    #[test]
    fn test_first_found_is_lexicographic() {
        let abi = table(&["getOutputPartial", "getOutput"]);
        for _ in 0..3 {
            let matched = find_matching_abi_method(&NativeMethod::new("GetOutput"), &abi).unwrap();
            assert_eq!(matched.as_deref(), Some("getOutput"));
        }
    }

    #[test]
    fn test_strict_prefers_exact_name() {
        let abi = table(&["getOutputPartial", "getOutput"]);
        let matched =
            find_matching_abi_method_with(&NativeMethod::new("GetOutput"), &abi, MatchPolicy::Strict).unwrap();
        assert_eq!(matched.as_deref(), Some("getOutput"));
    }

    #[test]
    fn test_strict_rejects_ambiguity() {
        let abi = table(&["getOutputPartial", "getOutputFull"]);
        let err = find_matching_abi_method_with(&NativeMethod::new("GetOutput"), &abi, MatchPolicy::Strict)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AmbiguousMatch);
        assert_eq!(
            err.to_string(),
            "GetOutput matches multiple ABI methods: getOutputFull, getOutputPartial"
        );
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!(MatchPolicy::from_str("FIRST"), Some(MatchPolicy::FirstFound));
        assert_eq!(MatchPolicy::from_str("strict"), Some(MatchPolicy::Strict));
        assert_eq!(MatchPolicy::from_str("loose"), None);
        assert_eq!(MatchPolicy::default().to_string(), "first");
    }
}
