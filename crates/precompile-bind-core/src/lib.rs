//! Ahead-of-time validation that precompile implementation methods agree
//! with the contract ABI they expose.

pub mod abi_json;
pub mod binder;
pub mod config;
pub mod describe;
pub mod descriptor;
pub mod error;
pub mod manifest;
pub mod matcher;
pub mod report;
pub mod returns;
pub mod validator;

pub use abi_json::{load_abi_file, parse_abi_json, AbiParseError};
pub use binder::{validate_method, Binder};
pub use config::BindingConfig;
pub use describe::{Address, BigInt, Describe};
pub use descriptor::{AbiMethod, AbiTable, NativeMethod, TypeDescriptor, TypeKind};
pub use error::{BindingError, ErrorKind};
pub use manifest::ImplManifest;
pub use matcher::{find_matching_abi_method, find_matching_abi_method_with, MatchPolicy};
pub use report::{BindReport, Binding, MethodOutcome, OutcomeStatus};
pub use returns::validate_outputs;
pub use validator::{validate_arg, validate_struct};
