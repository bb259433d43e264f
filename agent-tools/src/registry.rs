//! Tool registry: descriptors paired with their executors.
//!
//! A [`RegistryBuilder`] collects tools during setup and is frozen into an
//! immutable [`ToolRegistry`], which can then be shared across tasks without
//! locking.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::args::ToolArguments;
use crate::descriptor::ToolDescriptor;
use crate::error::{ToolError, ToolResult};

/// Future alias produced by generated tool bindings.
pub type ToolFuture = Pin<Box<dyn Future<Output = ToolResult<Value>> + Send>>;

/// Declarative binding returned by the `#[tool]` macro.
#[derive(Clone)]
pub struct ToolBinding {
    descriptor: ToolDescriptor,
    executor: fn(ToolArguments) -> ToolFuture,
}

impl ToolBinding {
    /// Creates a new tool binding from a descriptor and an executor function.
    #[must_use]
    pub fn new(descriptor: ToolDescriptor, executor: fn(ToolArguments) -> ToolFuture) -> Self {
        Self {
            descriptor,
            executor,
        }
    }

    /// Returns the descriptor associated with this binding.
    #[must_use]
    pub fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    /// Registers the binding with the provided builder.
    ///
    /// # Errors
    ///
    /// See [`RegistryBuilder::register_tool`].
    pub fn register(self, builder: &mut RegistryBuilder) -> ToolResult<()> {
        let ToolBinding {
            descriptor,
            executor,
        } = self;
        builder.register_tool(descriptor, executor)
    }
}

impl std::fmt::Debug for ToolBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolBinding")
            .field("name", &self.descriptor.name())
            .finish_non_exhaustive()
    }
}

/// Link-time registration emitted by `#[tool]` for every annotated function.
#[derive(Debug)]
pub struct ToolRegistration {
    binding: fn() -> ToolBinding,
}

impl ToolRegistration {
    /// Wraps a binding constructor.
    #[must_use]
    pub const fn new(binding: fn() -> ToolBinding) -> Self {
        Self { binding }
    }

    /// Builds the binding.
    #[must_use]
    pub fn binding(&self) -> ToolBinding {
        (self.binding)()
    }
}

inventory::collect!(ToolRegistration);

/// Trait implemented by tool executors.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Invokes the tool with named arguments, returning JSON output.
    async fn invoke(&self, arguments: ToolArguments) -> ToolResult<Value>;
}

#[async_trait]
impl<F, Fut> Tool for F
where
    F: Send + Sync + Fn(ToolArguments) -> Fut,
    Fut: Future<Output = ToolResult<Value>> + Send,
{
    async fn invoke(&self, arguments: ToolArguments) -> ToolResult<Value> {
        (self)(arguments).await
    }
}

/// Handle returned by the registry for direct invocation.
#[derive(Clone)]
pub struct ToolHandle {
    descriptor: Arc<ToolDescriptor>,
    executor: Arc<dyn Tool>,
}

impl ToolHandle {
    /// Returns the associated descriptor.
    #[must_use]
    pub fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    /// Executes the underlying tool implementation.
    ///
    /// # Errors
    ///
    /// Propagates argument binding and execution errors from the tool.
    pub async fn invoke(&self, arguments: ToolArguments) -> ToolResult<Value> {
        self.executor.invoke(arguments).await
    }
}

/// What to do when a tool name is registered twice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// The later registration replaces the earlier one.
    #[default]
    Replace,
    /// The later registration fails with [`ToolError::DuplicateTool`].
    Reject,
}

/// Mutable registry used during setup.
#[derive(Default)]
pub struct RegistryBuilder {
    policy: DuplicatePolicy,
    entries: HashMap<String, ToolHandle>,
    order: Vec<String>,
}

impl RegistryBuilder {
    /// Creates an empty builder using [`DuplicatePolicy::Replace`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the duplicate registration policy.
    #[must_use]
    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Registers a tool implementation under its descriptor's name.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::InvalidMetadata`] if the name is blank, or
    /// [`ToolError::DuplicateTool`] if the name is taken and the policy is
    /// [`DuplicatePolicy::Reject`].
    pub fn register_tool<T>(&mut self, descriptor: ToolDescriptor, tool: T) -> ToolResult<()>
    where
        T: Tool + 'static,
    {
        let name = descriptor.name().to_owned();
        if name.trim().is_empty() {
            return Err(ToolError::InvalidMetadata {
                reason: "tool name cannot be empty".into(),
            });
        }

        let handle = ToolHandle {
            descriptor: Arc::new(descriptor),
            executor: Arc::new(tool),
        };

        if self.entries.contains_key(&name) {
            match self.policy {
                DuplicatePolicy::Reject => return Err(ToolError::DuplicateTool { name }),
                DuplicatePolicy::Replace => {
                    warn!(tool = %name, "tool registered twice; keeping the latest registration");
                }
            }
        } else {
            self.order.push(name.clone());
        }

        debug!(tool = %name, "tool registered");
        self.entries.insert(name, handle);
        Ok(())
    }

    /// Registers a binding produced by the `#[tool]` macro.
    ///
    /// # Errors
    ///
    /// See [`RegistryBuilder::register_tool`].
    pub fn register_binding(&mut self, binding: ToolBinding) -> ToolResult<()> {
        binding.register(self)
    }

    /// Registers every `#[tool]` function linked into the binary, in name
    /// order.
    ///
    /// # Errors
    ///
    /// See [`RegistryBuilder::register_tool`].
    pub fn register_collected(&mut self) -> ToolResult<()> {
        let mut bindings: Vec<ToolBinding> = inventory::iter::<ToolRegistration>
            .into_iter()
            .map(ToolRegistration::binding)
            .collect();
        bindings.sort_by(|a, b| a.descriptor().name().cmp(b.descriptor().name()));
        for binding in bindings {
            self.register_binding(binding)?;
        }
        Ok(())
    }

    /// Freezes the builder.
    #[must_use]
    pub fn build(self) -> ToolRegistry {
        ToolRegistry {
            entries: self.entries,
            order: self.order,
        }
    }
}

/// Immutable registry that stores tool implementations keyed by name.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    entries: HashMap<String, ToolHandle>,
    order: Vec<String>,
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("registered", &self.order)
            .finish()
    }
}

impl ToolRegistry {
    /// Starts building a registry.
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Returns a handle to the tool matching the supplied name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ToolHandle> {
        self.entries.get(name)
    }

    /// Descriptors in registration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &ToolDescriptor> {
        self.order
            .iter()
            .filter_map(|name| self.entries.get(name))
            .map(ToolHandle::descriptor)
    }

    /// Registered names in registration order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.order
    }

    /// Number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether no tools are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
