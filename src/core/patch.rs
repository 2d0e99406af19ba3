//! Minimal JSON-patch interpreter for point of interest updates.
//!
//! Supports the `add`, `replace`, `remove`, `move`, `copy` and `test`
//! operations over the flat updatable shape. Operations are applied in order
//! to a detached [`PointOfInterestUpsert`]; structural failures (unknown op or
//! path, wrong value type, failed `test`) surface as `AppError::Patch` and the
//! caller re-validates the result before anything is persisted.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::PointOfInterestUpsert;

/// One operation of an ordered patch document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PatchOperation {
    Add { path: String, value: Value },
    Replace { path: String, value: Value },
    Remove { path: String },
    Move { from: String, path: String },
    Copy { from: String, path: String },
    Test { path: String, value: Value },
}

/// Parse a raw JSON body into a patch document.
///
/// Kept separate from the extractor so a malformed document maps to a 400
/// with patch detail rather than a generic body rejection.
pub fn parse_document(body: Value) -> Result<Vec<PatchOperation>> {
    serde_json::from_value(body).map_err(|e| AppError::Patch(format!("invalid patch document: {}", e)))
}

/// Apply a patch document to the target, in order. Fails fast on the first
/// invalid operation, leaving the (detached) target in a partially patched
/// state the caller must discard.
pub fn apply(document: &[PatchOperation], target: &mut PointOfInterestUpsert) -> Result<()> {
    for operation in document {
        apply_one(operation, target)?;
    }
    Ok(())
}

fn apply_one(operation: &PatchOperation, target: &mut PointOfInterestUpsert) -> Result<()> {
    match operation {
        PatchOperation::Add { path, value } | PatchOperation::Replace { path, value } => {
            write(target, path, value.clone())
        }
        PatchOperation::Remove { path } => remove(target, path),
        PatchOperation::Move { from, path } => {
            let value = read(target, from)?;
            remove(target, from)?;
            write(target, path, value)
        }
        PatchOperation::Copy { from, path } => {
            let value = read(target, from)?;
            write(target, path, value)
        }
        PatchOperation::Test { path, value } => {
            let current = read(target, path)?;
            if &current != value {
                return Err(AppError::Patch(format!(
                    "test failed at {}: expected {}, found {}",
                    path, value, current
                )));
            }
            Ok(())
        }
    }
}

fn read(target: &PointOfInterestUpsert, path: &str) -> Result<Value> {
    match path {
        "/name" => Ok(Value::String(target.name.clone())),
        "/description" => Ok(target
            .description
            .clone()
            .map_or(Value::Null, Value::String)),
        _ => Err(unknown_path(path)),
    }
}

fn write(target: &mut PointOfInterestUpsert, path: &str, value: Value) -> Result<()> {
    match path {
        "/name" => match value {
            Value::String(s) => {
                target.name = s;
                Ok(())
            }
            other => Err(wrong_type(path, "string", &other)),
        },
        "/description" => match value {
            Value::String(s) => {
                target.description = Some(s);
                Ok(())
            }
            Value::Null => {
                target.description = None;
                Ok(())
            }
            other => Err(wrong_type(path, "string or null", &other)),
        },
        _ => Err(unknown_path(path)),
    }
}

fn remove(target: &mut PointOfInterestUpsert, path: &str) -> Result<()> {
    match path {
        // name is required; removal is structurally invalid
        "/name" => Err(AppError::Patch(
            "cannot remove required field /name".to_string(),
        )),
        "/description" => {
            target.description = None;
            Ok(())
        }
        _ => Err(unknown_path(path)),
    }
}

fn unknown_path(path: &str) -> AppError {
    AppError::Patch(format!("unknown path: {}", path))
}

fn wrong_type(path: &str, expected: &str, found: &Value) -> AppError {
    AppError::Patch(format!(
        "invalid value for {}: expected {}, found {}",
        path, expected, found
    ))
}
