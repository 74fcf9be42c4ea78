use serde_json::{Map, Value};

use crate::error::{Z2mError, Z2mResult};

/// Largest array index accepted by [`unflatten`]
pub const MAX_ARRAY_INDEX: usize = 4096;

/// One step in a property path like `color.x` or `scenes[2].name`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSegment<'a> {
    Key(&'a str),
    Index(usize),
}

const fn is_delimiter(b: u8) -> bool {
    matches!(b, b'.' | b'[' | b']')
}

/// Split a flattened key into path segments.
///
/// A key segment is a run of characters other than `.`, `[` and `]`,
/// optionally preceded by a dot. An index segment is a run of digits in
/// brackets. Characters that start neither are skipped, so `a..b` and
/// `a[x]` parse as `a`,`b` and `a`,`x`.
pub fn parse_path(path: &str) -> Z2mResult<Vec<PathSegment<'_>>> {
    let bytes = path.as_bytes();
    let mut res = vec![];
    let mut pos = 0;

    while pos < bytes.len() {
        let start = if bytes[pos] == b'.' { pos + 1 } else { pos };
        let end = bytes[start..]
            .iter()
            .position(|b| is_delimiter(*b))
            .map_or(bytes.len(), |n| start + n);

        if end > start {
            res.push(PathSegment::Key(&path[start..end]));
            pos = end;
            continue;
        }

        if bytes[pos] == b'[' {
            let digits = bytes[pos + 1..]
                .iter()
                .take_while(|b| b.is_ascii_digit())
                .count();
            let close = pos + 1 + digits;
            if digits > 0 && bytes.get(close) == Some(&b']') {
                let index = path[pos + 1..close]
                    .parse()
                    .map_err(|_| Z2mError::IndexTooLarge(path.to_string()))?;
                res.push(PathSegment::Index(index));
                pos = close + 1;
                continue;
            }
        }

        pos += 1;
    }

    Ok(res)
}

fn flatten_into(res: &mut Map<String, Value>, prefix: Option<&str>, obj: &Map<String, Value>) {
    for (key, value) in obj {
        let full = prefix.map_or_else(|| key.clone(), |prefix| format!("{prefix}.{key}"));
        match value {
            Value::Object(inner) if !inner.is_empty() => flatten_into(res, Some(&full), inner),
            _ => {
                res.insert(full, value.clone());
            }
        }
    }
}

/// Flatten nested objects into a single level of dotted keys.
///
/// Only objects are descended into. Arrays and empty objects are kept as
/// values.
#[must_use]
pub fn flatten_object(obj: &Map<String, Value>) -> Map<String, Value> {
    let mut res = Map::new();
    flatten_into(&mut res, None, obj);
    res
}

/// Like [`flatten_object`], but returns non-object values unchanged
#[must_use]
pub fn flatten(value: &Value) -> Value {
    match value {
        Value::Object(obj) => Value::Object(flatten_object(obj)),
        other => other.clone(),
    }
}

fn container_for(seg: PathSegment) -> Value {
    match seg {
        PathSegment::Key(_) => Value::Object(Map::new()),
        PathSegment::Index(_) => Value::Array(vec![]),
    }
}

/// Step into `cur` along `seg`, turning `cur` into a container first if it
/// holds a plain value
fn slot<'a>(cur: &'a mut Value, seg: PathSegment, path: &str) -> Z2mResult<&'a mut Value> {
    match cur {
        Value::Array(arr) => {
            let index = match seg {
                PathSegment::Index(index) => index,
                PathSegment::Key(key) => key
                    .parse()
                    .map_err(|_| Z2mError::PathConflict(path.to_string()))?,
            };
            if index > MAX_ARRAY_INDEX {
                return Err(Z2mError::IndexTooLarge(path.to_string()));
            }
            if arr.len() <= index {
                arr.resize(index + 1, Value::Null);
            }
            Ok(&mut arr[index])
        }
        Value::Object(obj) => {
            let key = match seg {
                PathSegment::Key(key) => key.to_string(),
                PathSegment::Index(index) => index.to_string(),
            };
            Ok(obj.entry(key).or_insert(Value::Null))
        }
        other => {
            *other = container_for(seg);
            slot(other, seg, path)
        }
    }
}

fn insert(root: &mut Value, path: &str, value: Value) -> Z2mResult<()> {
    let mut cur = root;
    for seg in parse_path(path)? {
        cur = slot(cur, seg, path)?;
    }
    *cur = value;
    Ok(())
}

/// Expand dotted and indexed keys (`color.x`, `list[0]`) into nested values.
///
/// Non-object input is returned unchanged. A key that parses to no segments
/// at all replaces the whole result.
pub fn unflatten(data: &Value) -> Z2mResult<Value> {
    let Value::Object(obj) = data else {
        return Ok(data.clone());
    };

    let mut root = Value::Null;
    for (key, value) in obj {
        insert(&mut root, key, value.clone())?;
    }

    if root.is_null() {
        return Ok(Value::Object(Map::new()));
    }

    Ok(root)
}
