//! Tool-call requests and their outcomes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A model's request to run one tool.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    name: String,
    /// JSON-encoded argument object, as emitted by the model. Untrusted.
    arguments: String,
}

impl ToolCall {
    /// Creates a call from a tool name and its encoded arguments.
    #[must_use]
    pub fn new(name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: arguments.into(),
        }
    }

    /// Creates a call by encoding an already structured argument value.
    #[must_use]
    pub fn from_value(name: impl Into<String>, arguments: &Value) -> Self {
        Self::new(name, arguments.to_string())
    }

    /// Requested tool name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Encoded argument payload.
    #[must_use]
    pub fn arguments(&self) -> &str {
        &self.arguments
    }
}

/// Result of dispatching a [`ToolCall`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "content", rename_all = "lowercase")]
pub enum CallOutcome {
    /// The tool ran and returned a value.
    Success(Value),
    /// The call was rejected or the tool failed.
    Failure(String),
}

impl CallOutcome {
    /// Whether the call succeeded.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The returned value on success.
    #[must_use]
    pub const fn value(&self) -> Option<&Value> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failure(_) => None,
        }
    }

    /// The diagnostic on failure.
    #[must_use]
    pub fn failure(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Failure(message) => Some(message),
        }
    }

    /// Converts into a standard `Result`.
    ///
    /// # Errors
    ///
    /// Returns the failure message for [`CallOutcome::Failure`].
    pub fn into_result(self) -> Result<Value, String> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Failure(message) => Err(message),
        }
    }

    /// Renders the outcome as the content of a tool message in the
    /// conversation. Strings are used verbatim, other values as compact JSON.
    #[must_use]
    pub fn to_message_content(&self) -> String {
        match self {
            Self::Success(Value::String(text)) => text.clone(),
            Self::Success(value) => value.to_string(),
            Self::Failure(message) => message.clone(),
        }
    }
}
