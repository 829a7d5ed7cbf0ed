//! Encoding of option objects into query parameters
//!
//! Option types such as [`ListOptions`](crate::params::ListOptions) are never turned into query
//! strings by hand. They derive [`Serialize`] and go through a [`ParameterCodec`], so a new option
//! field only needs a new struct member to reach the wire.
use crate::{Error, Result};
use serde::Serialize;
use serde_json::Value;

/// Serializes an options value into the transport's query parameter representation
///
/// Implementations receive the options object as a JSON value and return the ordered
/// `(key, value)` pairs that end up in the query string.
/// A codec is shared between every resource kind using the same client.
pub trait ParameterCodec: Send + Sync {
    /// Encode a serialized options object into query pairs
    fn encode_parameters(&self, value: Value) -> Result<Vec<(String, String)>>;
}

/// Serialize `params` with serde and hand the result to `codec`
pub fn encode<P: Serialize + ?Sized>(codec: &dyn ParameterCodec, params: &P) -> Result<Vec<(String, String)>> {
    let value = serde_json::to_value(params).map_err(Error::SerdeJson)?;
    codec.encode_parameters(value)
}

/// The default [`ParameterCodec`]
///
/// Accepts a flat object:
/// - `null` members are skipped
/// - strings are passed through, booleans and numbers are formatted
/// - arrays of scalars become one pair per element
/// - nested objects are rejected
///
/// Pairs are emitted in lexicographic key order.
#[derive(Clone, Copy, Debug, Default)]
pub struct QueryParameterCodec;

impl ParameterCodec for QueryParameterCodec {
    fn encode_parameters(&self, value: Value) -> Result<Vec<(String, String)>> {
        let map = match value {
            Value::Object(map) => map,
            Value::Null => return Ok(vec![]),
            other => {
                return Err(Error::Codec(format!(
                    "parameters must serialize to an object, got {}",
                    kind_of(&other)
                )))
            }
        };
        let mut entries: Vec<(String, Value)> = map.into_iter().collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        let mut pairs = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            match value {
                Value::Null => {}
                Value::Array(items) => {
                    for item in items {
                        if let Some(s) = scalar(&key, item)? {
                            pairs.push((key.clone(), s));
                        }
                    }
                }
                other => {
                    if let Some(s) = scalar(&key, other)? {
                        pairs.push((key, s));
                    }
                }
            }
        }
        Ok(pairs)
    }
}

fn scalar(key: &str, value: Value) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(Error::Codec(format!(
            "parameter {key} is not a scalar: {}",
            kind_of(&other)
        ))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
