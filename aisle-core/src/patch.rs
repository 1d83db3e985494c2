//! JSON Patch (RFC 6902) over `serde_json::Value`
//!
//! Object keys are matched exactly first and then case-insensitively, so
//! `/Location` and `/location` address the same member. A patch is applied
//! to a copy and only committed when every operation succeeds.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PatchOperation {
    Add { path: String, value: Value },
    Remove { path: String },
    Replace { path: String, value: Value },
    Move { from: String, path: String },
    Copy { from: String, path: String },
    Test { path: String, value: Value },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JsonPatch(pub Vec<PatchOperation>);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatchError {
    #[error("invalid JSON pointer '{0}'")]
    InvalidPointer(String),

    #[error("path '{0}' does not exist")]
    PathNotFound(String),

    #[error("invalid array index in '{0}'")]
    InvalidIndex(String),

    #[error("test failed at '{0}'")]
    TestFailed(String),

    #[error("cannot move '{from}' into its own child '{path}'")]
    MoveIntoChild { from: String, path: String },
}

impl JsonPatch {
    /// Apply every operation or none. Object keys fall back to a
    /// case-insensitive match, so `/Name` reaches a `name` member.
    pub fn apply(&self, document: &mut Value) -> Result<(), PatchError> {
        let mut working = document.clone();
        for operation in &self.0 {
            apply_operation(&mut working, operation)?;
        }
        *document = working;
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn apply_operation(document: &mut Value, operation: &PatchOperation) -> Result<(), PatchError> {
    match operation {
        PatchOperation::Add { path, value } => add(document, path, value.clone()),
        PatchOperation::Remove { path } => remove(document, path).map(drop),
        PatchOperation::Replace { path, value } => {
            let target = pointer_mut(document, &parse_pointer(path)?, path)?;
            *target = value.clone();
            Ok(())
        }
        PatchOperation::Move { from, path } => {
            if path != from && path.starts_with(&format!("{from}/")) {
                return Err(PatchError::MoveIntoChild {
                    from: from.clone(),
                    path: path.clone(),
                });
            }
            let value = remove(document, from)?;
            add(document, path, value)
        }
        PatchOperation::Copy { from, path } => {
            let value = pointer_mut(document, &parse_pointer(from)?, from)?.clone();
            add(document, path, value)
        }
        PatchOperation::Test { path, value } => {
            let current = pointer_mut(document, &parse_pointer(path)?, path)?;
            if current == value {
                Ok(())
            } else {
                Err(PatchError::TestFailed(path.clone()))
            }
        }
    }
}

fn parse_pointer(path: &str) -> Result<Vec<String>, PatchError> {
    if path.is_empty() {
        return Ok(Vec::new());
    }
    let Some(rest) = path.strip_prefix('/') else {
        return Err(PatchError::InvalidPointer(path.to_string()));
    };
    Ok(rest
        .split('/')
        .map(|token| token.replace("~1", "/").replace("~0", "~"))
        .collect())
}

fn object_key(map: &Map<String, Value>, token: &str) -> Option<String> {
    if map.contains_key(token) {
        return Some(token.to_string());
    }
    map.keys().find(|key| key.eq_ignore_ascii_case(token)).cloned()
}

fn array_index(token: &str, len: usize, path: &str) -> Result<usize, PatchError> {
    // RFC 6901 forbids leading zeros.
    if token.is_empty() || (token.len() > 1 && token.starts_with('0')) {
        return Err(PatchError::InvalidIndex(path.to_string()));
    }
    let index: usize = token
        .parse()
        .map_err(|_| PatchError::InvalidIndex(path.to_string()))?;
    if index >= len {
        return Err(PatchError::PathNotFound(path.to_string()));
    }
    Ok(index)
}

fn pointer_mut<'a>(
    document: &'a mut Value,
    tokens: &[String],
    path: &str,
) -> Result<&'a mut Value, PatchError> {
    let mut current = document;
    for token in tokens {
        current = match current {
            Value::Object(map) => {
                let key = object_key(map, token)
                    .ok_or_else(|| PatchError::PathNotFound(path.to_string()))?;
                map.get_mut(&key)
                    .ok_or_else(|| PatchError::PathNotFound(path.to_string()))?
            }
            Value::Array(items) => {
                let index = array_index(token, items.len(), path)?;
                &mut items[index]
            }
            _ => return Err(PatchError::PathNotFound(path.to_string())),
        };
    }
    Ok(current)
}

fn add(document: &mut Value, path: &str, value: Value) -> Result<(), PatchError> {
    let tokens = parse_pointer(path)?;
    let Some((last, parent)) = tokens.split_last() else {
        *document = value;
        return Ok(());
    };

    match pointer_mut(document, parent, path)? {
        Value::Object(map) => {
            let key = object_key(map, last).unwrap_or_else(|| last.clone());
            map.insert(key, value);
            Ok(())
        }
        Value::Array(items) => {
            if last == "-" {
                items.push(value);
                return Ok(());
            }
            // Inserting at `len` appends.
            let index = array_index(last, items.len() + 1, path)?;
            items.insert(index, value);
            Ok(())
        }
        _ => Err(PatchError::PathNotFound(path.to_string())),
    }
}

fn remove(document: &mut Value, path: &str) -> Result<Value, PatchError> {
    let tokens = parse_pointer(path)?;
    let Some((last, parent)) = tokens.split_last() else {
        return Err(PatchError::InvalidPointer(path.to_string()));
    };

    match pointer_mut(document, parent, path)? {
        Value::Object(map) => {
            let key =
                object_key(map, last).ok_or_else(|| PatchError::PathNotFound(path.to_string()))?;
            map.shift_remove(&key)
                .ok_or_else(|| PatchError::PathNotFound(path.to_string()))
        }
        Value::Array(items) => {
            let index = array_index(last, items.len(), path)?;
            Ok(items.remove(index))
        }
        _ => Err(PatchError::PathNotFound(path.to_string())),
    }
}
