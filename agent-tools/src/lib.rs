//! Tool descriptors and dispatch for model-driven agents.
//!
//! Functions are turned into tools once at setup: the `#[tool]` attribute
//! (or a hand-written [`DescriptorBuilder`]) derives a [`ToolDescriptor`]
//! from the signature and the doc comment, and a per-function adapter binds
//! named JSON arguments to typed parameters. A frozen [`ToolRegistry`] is
//! then served by a [`Dispatcher`], which turns every [`ToolCall`] into
//! exactly one [`CallOutcome`].
//!
//! Doc comments use two markers:
//!
//! ```text
//! Adds two numbers.
//! :param a: first
//! :param b: second
//! :return: the sum
//! ```

#![warn(missing_docs, clippy::pedantic)]

pub mod args;
pub mod call;
pub mod descriptor;
pub mod dispatch;
pub mod docs;
pub mod error;
pub mod macros;
pub mod registry;

pub use args::{ArgumentBag, ToolArguments, encode_output};
pub use call::{CallOutcome, ToolCall};
pub use descriptor::{DescriptorBuilder, Parameter, ParameterDescriptor, ToolDescriptor, TypeTag};
pub use dispatch::{DispatchOptions, Dispatcher};
pub use error::{DispatchError, ToolError, ToolResult};
pub use macros::tool;
pub use registry::{
    DuplicatePolicy, RegistryBuilder, Tool, ToolBinding, ToolFuture, ToolHandle, ToolRegistration,
    ToolRegistry,
};

#[doc(hidden)]
pub use inventory;
