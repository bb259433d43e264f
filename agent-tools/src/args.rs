//! Named-argument binding for tool executors.
//!
//! Generated `#[tool]` adapters pull each typed parameter out of an
//! [`ArgumentBag`] and call [`ArgumentBag::finish`] to reject leftovers.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{ToolError, ToolResult};

/// Decoded argument object of a tool call.
pub type ToolArguments = Map<String, Value>;

/// Consumes named arguments and converts them into parameter types.
#[derive(Debug, Default)]
pub struct ArgumentBag {
    remaining: ToolArguments,
}

impl ArgumentBag {
    /// Wraps the decoded arguments.
    #[must_use]
    pub fn new(arguments: ToolArguments) -> Self {
        Self {
            remaining: arguments,
        }
    }

    /// Takes a parameter that has no default.
    ///
    /// # Errors
    ///
    /// [`ToolError::MissingArgument`] when absent, [`ToolError::InvalidArgument`]
    /// when the value does not convert to `T`.
    pub fn required<T: DeserializeOwned>(&mut self, name: &str) -> ToolResult<T> {
        let value = self
            .remaining
            .remove(name)
            .ok_or_else(|| ToolError::MissingArgument {
                name: name.to_owned(),
            })?;
        convert(name, value)
    }

    /// Takes a parameter that may be omitted. `null` counts as omitted.
    ///
    /// # Errors
    ///
    /// [`ToolError::InvalidArgument`] when a present value does not convert.
    pub fn optional<T: DeserializeOwned>(&mut self, name: &str) -> ToolResult<Option<T>> {
        match self.remaining.remove(name) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => convert(name, value).map(Some),
        }
    }

    /// Takes a parameter, falling back to `T::default()` when omitted.
    ///
    /// # Errors
    ///
    /// [`ToolError::InvalidArgument`] when a present value does not convert.
    pub fn or_default<T: DeserializeOwned + Default>(&mut self, name: &str) -> ToolResult<T> {
        self.optional(name).map(Option::unwrap_or_default)
    }

    /// Ensures every supplied argument was consumed.
    ///
    /// # Errors
    ///
    /// [`ToolError::UnexpectedArgument`] naming the first leftover key.
    pub fn finish(self) -> ToolResult<()> {
        let mut leftover: Vec<String> = self.remaining.into_iter().map(|(key, _)| key).collect();
        leftover.sort();
        match leftover.into_iter().next() {
            Some(name) => Err(ToolError::UnexpectedArgument { name }),
            None => Ok(()),
        }
    }
}

fn convert<T: DeserializeOwned>(name: &str, value: Value) -> ToolResult<T> {
    serde_json::from_value(value).map_err(|err| ToolError::InvalidArgument {
        name: name.to_owned(),
        reason: err.to_string(),
    })
}

/// Encodes a tool return value.
///
/// # Errors
///
/// [`ToolError::Execution`] when the value cannot be represented as JSON.
pub fn encode_output<T: Serialize>(output: T) -> ToolResult<Value> {
    serde_json::to_value(output)
        .map_err(|err| ToolError::execution(format!("failed to encode tool output: {err}")))
}
