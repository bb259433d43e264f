//! Resolves tool calls against a frozen registry and normalises the outcome.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::args::ToolArguments;
use crate::call::{CallOutcome, ToolCall};
use crate::descriptor::ToolDescriptor;
use crate::error::{DispatchError, ToolError};
use crate::registry::ToolRegistry;

/// Dispatch behaviour switches.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchOptions {
    /// Report a panicking tool as a failure instead of unwinding into the
    /// caller.
    pub catch_panics: bool,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self { catch_panics: true }
    }
}

/// Executes tool calls requested by a model.
///
/// Every call ends in exactly one [`CallOutcome`]; nothing is retried and no
/// error escapes [`Dispatcher::invoke`].
#[derive(Clone, Debug)]
pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
    options: DispatchOptions,
}

impl Dispatcher {
    /// Creates a dispatcher over the supplied registry.
    #[must_use]
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            options: DispatchOptions::default(),
        }
    }

    /// Replaces the dispatch options.
    #[must_use]
    pub fn with_options(mut self, options: DispatchOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the underlying registry.
    #[must_use]
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Descriptors of every registered tool, in registration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &ToolDescriptor> {
        self.registry.descriptors()
    }

    /// The "available tools" list to send along with each model request.
    #[must_use]
    pub fn advertisement(&self) -> Value {
        Value::Array(self.descriptors().map(ToolDescriptor::to_value).collect())
    }

    /// Runs one tool call.
    pub async fn invoke(&self, call: &ToolCall) -> CallOutcome {
        debug!(tool = %call.name(), "dispatching tool call");
        match self.try_invoke(call).await {
            Ok(value) => CallOutcome::Success(value),
            Err(err) => {
                match &err {
                    DispatchError::InvalidPayload { reason } => {
                        warn!(tool = %call.name(), reason = %reason, "rejected tool call payload");
                    }
                    DispatchError::UnknownTool { .. } => {
                        warn!(tool = %call.name(), "tool call for unknown function");
                    }
                    DispatchError::Invocation { source, .. } => {
                        warn!(tool = %call.name(), error = %source, "tool invocation failed");
                    }
                }
                CallOutcome::Failure(err.to_string())
            }
        }
    }

    /// Runs calls one after another, returning one outcome per call.
    pub async fn invoke_all<'a, I>(&self, calls: I) -> Vec<CallOutcome>
    where
        I: IntoIterator<Item = &'a ToolCall>,
    {
        let mut outcomes = Vec::new();
        for call in calls {
            outcomes.push(self.invoke(call).await);
        }
        outcomes
    }

    async fn try_invoke(&self, call: &ToolCall) -> Result<Value, DispatchError> {
        let arguments = decode_arguments(call.arguments())?;

        let handle = self
            .registry
            .get(call.name())
            .ok_or_else(|| DispatchError::UnknownTool {
                name: call.name().to_owned(),
            })?;

        let result = if self.options.catch_panics {
            AssertUnwindSafe(handle.invoke(arguments))
                .catch_unwind()
                .await
                .unwrap_or_else(|panic| Err(ToolError::execution(panic_message(&*panic))))
        } else {
            handle.invoke(arguments).await
        };

        result.map_err(|source| DispatchError::Invocation {
            name: call.name().to_owned(),
            source,
        })
    }
}

fn decode_arguments(payload: &str) -> Result<ToolArguments, DispatchError> {
    match serde_json::from_str::<Value>(payload) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(DispatchError::InvalidPayload {
            reason: format!("expected a JSON object, got {}", json_kind(&other)),
        }),
        Err(err) => Err(DispatchError::InvalidPayload {
            reason: err.to_string(),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    let detail = panic
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_owned());
    format!("tool panicked: {detail}")
}
