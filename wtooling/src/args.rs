//! JSON argument parsing helpers for function and trait-based tools.
//!
//! ```rust
//! use wtooling::{optional_string, parse_json_object, required_string};
//!
//! let args = parse_json_object(r#"{"keyword":"成都"}"#).expect("object should parse");
//! let keyword = required_string(&args, "keyword").expect("keyword should be present");
//! assert_eq!(keyword, "成都");
//! assert_eq!(optional_string(&args, "sort"), None);
//! ```

use serde_json::{Map, Value};

use crate::ToolError;

pub fn parse_json_value(args_json: &str) -> Result<Value, ToolError> {
    serde_json::from_str(args_json)
        .map_err(|err| ToolError::invalid_arguments(format!("invalid JSON arguments: {err}")))
}

pub fn parse_json_object(args_json: &str) -> Result<Map<String, Value>, ToolError> {
    match parse_json_value(args_json)? {
        Value::Object(object) => Ok(object),
        _ => Err(ToolError::invalid_arguments("expected JSON object arguments")),
    }
}

pub fn required_string(args: &Map<String, Value>, key: &str) -> Result<String, ToolError> {
    optional_string(args, key)
        .ok_or_else(|| ToolError::invalid_arguments(format!("missing required string: '{key}'")))
}

pub fn optional_string(args: &Map<String, Value>, key: &str) -> Option<String> {
    args.get(key)
        .and_then(Value::as_str)
        .map(ToString::to_string)
}
