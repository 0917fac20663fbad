//! Utility functions for the DeFi chat server

use serde::de::DeserializeOwned;
use serde_json::{from_value, Value};

use crate::tools::ToolError;

/// Helper function to extract a required argument from a JSON object
pub fn get_required_arg<T: DeserializeOwned>(args: &Value, key: &str) -> Result<T, ToolError> {
    from_value(args.get(key).cloned().unwrap_or(Value::Null)).map_err(|_| {
        ToolError::InvalidParams(format!("Missing or invalid required argument: '{}'", key))
    })
}
