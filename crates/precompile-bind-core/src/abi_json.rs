//! Conversion of a standard JSON contract ABI into an [`AbiTable`].
//!
//! Solidity types map onto canonical host type names: `uint64` stays
//! `uint64`, wider integers become `*big.Int`, `address` becomes
//! `common.Address`, `T[]` becomes a slice, `T[k]` a fixed-length array
//! and `tuple` a struct.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::descriptor::{AbiMethod, AbiTable, TypeDescriptor};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawAbiEntry {
    #[serde(rename = "type", default = "default_entry_type")]
    pub entry_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<RawAbiParam>,
    #[serde(default)]
    pub outputs: Vec<RawAbiParam>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawAbiParam {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(rename = "internalType", skip_serializing_if = "Option::is_none")]
    pub internal_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<RawAbiParam>,
}

fn default_entry_type() -> String {
    "function".to_string()
}

#[derive(Debug, thiserror::Error)]
pub enum AbiParseError {
    #[error("invalid ABI JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported ABI type '{type_name}' in method {method}")]
    UnsupportedType { method: String, type_name: String },

    #[error("ABI function entry {0} has no name")]
    UnnamedFunction(usize),

    #[error("duplicate ABI method '{0}': overloaded methods are not supported")]
    DuplicateMethod(String),
}

/// Parses a JSON ABI document. Only `function` entries are kept.
pub fn parse_abi_json(json: &str) -> Result<AbiTable, AbiParseError> {
    let entries: Vec<RawAbiEntry> = serde_json::from_str(json)?;
    parse_abi_entries(&entries)
}

pub fn parse_abi_entries(entries: &[RawAbiEntry]) -> Result<AbiTable, AbiParseError> {
    let mut table = AbiTable::new();

    for (index, entry) in entries.iter().enumerate().filter(|(_, e)| e.entry_type == "function") {
        if entry.name.is_empty() {
            return Err(AbiParseError::UnnamedFunction(index));
        }
        let mut method = AbiMethod::new(entry.name.clone());
        for input in &entry.inputs {
            method = method.input(resolve_type(&entry.name, input)?);
        }
        for output in &entry.outputs {
            method = method.output(resolve_type(&entry.name, output)?);
        }
        if table.insert(method).is_some() {
            return Err(AbiParseError::DuplicateMethod(entry.name.clone()));
        }
    }

    Ok(table)
}

/// Reads and parses an ABI file from disk.
pub fn load_abi_file(path: impl AsRef<Path>) -> Result<AbiTable> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read ABI file: {}", path.display()))?;
    parse_abi_json(&content).with_context(|| format!("Failed to parse ABI file: {}", path.display()))
}

fn resolve_type(method: &str, param: &RawAbiParam) -> Result<TypeDescriptor, AbiParseError> {
    let unsupported = || AbiParseError::UnsupportedType {
        method: method.to_string(),
        type_name: param.type_name.clone(),
    };

    // Array suffixes bind outermost-last: `uint64[2][]` is a slice of `uint64[2]`.
    if let Some(open) = param.type_name.strip_suffix(']').and_then(|t| t.rfind('[')) {
        let dim = &param.type_name[open + 1..param.type_name.len() - 1];
        let elem_param = RawAbiParam {
            name: param.name.clone(),
            type_name: param.type_name[..open].to_string(),
            internal_type: param.internal_type.as_deref().map(strip_array_suffix),
            components: param.components.clone(),
        };
        let elem = resolve_type(method, &elem_param)?;
        if dim.is_empty() {
            return Ok(TypeDescriptor::slice(elem));
        }
        let len: usize = dim.parse().map_err(|_| unsupported())?;
        return Ok(TypeDescriptor::array(len, elem));
    }

    let ty = match param.type_name.as_str() {
        "bool" => TypeDescriptor::scalar("bool"),
        "string" => TypeDescriptor::scalar("string"),
        "address" => TypeDescriptor::address(),
        "bytes" => TypeDescriptor::slice(TypeDescriptor::scalar("uint8")),
        "tuple" => {
            let fields = param
                .components
                .iter()
                .map(|c| resolve_type(method, c))
                .collect::<Result<Vec<_>, _>>()?;
            TypeDescriptor::structure(struct_name(param), fields)
        }
        other => {
            if let Some(bits) = other.strip_prefix("uint") {
                integer_type("uint", bits).ok_or_else(unsupported)?
            } else if let Some(bits) = other.strip_prefix("int") {
                integer_type("int", bits).ok_or_else(unsupported)?
            } else if let Some(n) = other.strip_prefix("bytes") {
                match n.parse::<u8>() {
                    Ok(n) if (1..=32).contains(&n) => TypeDescriptor::array(n.into(), TypeDescriptor::scalar("uint8")),
                    _ => return Err(unsupported()),
                }
            } else {
                return Err(unsupported());
            }
        }
    };
    Ok(ty)
}

fn integer_type(prefix: &str, bits: &str) -> Option<TypeDescriptor> {
    let bits: u16 = if bits.is_empty() { 256 } else { bits.parse().ok()? };
    if bits == 0 || bits > 256 || bits % 8 != 0 {
        return None;
    }
    match bits {
        8 | 16 | 32 | 64 => Some(TypeDescriptor::scalar(format!("{}{}", prefix, bits))),
        _ => Some(TypeDescriptor::big_int()),
    }
}

fn struct_name(param: &RawAbiParam) -> String {
    param
        .internal_type
        .as_deref()
        .and_then(|t| t.strip_prefix("struct "))
        .map(str::to_string)
        .unwrap_or_else(|| "tuple".to_string())
}

fn strip_array_suffix(internal_type: &str) -> String {
    match internal_type.strip_suffix(']').and_then(|t| t.rfind('[')) {
        Some(open) => internal_type[..open].to_string(),
        None => internal_type.to_string(),
    }
}
