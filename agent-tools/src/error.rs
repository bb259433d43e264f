//! Error types for tool registration, argument binding and dispatch.

use thiserror::Error;

/// Result alias for tool operations.
pub type ToolResult<T> = Result<T, ToolError>;

/// Errors produced by tool registration and invocation.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Tool metadata failed validation.
    #[error("invalid tool metadata: {reason}")]
    InvalidMetadata {
        /// Human-readable reason for rejection.
        reason: String,
    },

    /// Tool name collided with an existing registration.
    #[error("tool `{name}` is already registered")]
    DuplicateTool {
        /// Name of the offending tool.
        name: String,
    },

    /// A parameter without a default was not supplied.
    #[error("missing required argument `{name}`")]
    MissingArgument {
        /// Parameter name.
        name: String,
    },

    /// The call supplied an argument the tool does not accept.
    #[error("unexpected argument `{name}`")]
    UnexpectedArgument {
        /// Argument name.
        name: String,
    },

    /// An argument could not be converted to the parameter type.
    #[error("invalid value for argument `{name}`: {reason}")]
    InvalidArgument {
        /// Parameter name.
        name: String,
        /// Conversion failure.
        reason: String,
    },

    /// Tool execution failed.
    #[error("tool execution failed: {reason}")]
    Execution {
        /// Human-readable error returned by the tool implementation.
        reason: String,
    },
}

impl ToolError {
    /// Creates an execution error from the supplied reason.
    #[must_use]
    pub fn execution(reason: impl Into<String>) -> Self {
        Self::Execution {
            reason: reason.into(),
        }
    }
}

/// Failure classes surfaced by the dispatcher.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The argument payload did not decode to a JSON object.
    #[error("argument payload is not a valid object")]
    InvalidPayload {
        /// Decoder diagnostic, kept for logging.
        reason: String,
    },

    /// No tool with the requested name is registered.
    #[error("function {name} does not exist")]
    UnknownTool {
        /// Requested name.
        name: String,
    },

    /// Binding or executing the tool failed.
    #[error("error in call to {name}: {source}")]
    Invocation {
        /// Tool name.
        name: String,
        /// Underlying failure.
        #[source]
        source: ToolError,
    },
}
