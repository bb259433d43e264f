//! Agent toolkit SDK facade.
//!
//! Bundles the tool runtime crates behind feature flags. Code generated by
//! `#[tool]` refers to `::agent_tools`, so crates that annotate functions
//! should also depend on `agent-tools` directly.

#![warn(missing_docs, clippy::pedantic)]

/// Descriptors, registry and dispatcher.
pub use agent_tools as tools;

/// Configuration management (enabled by `config` feature).
#[cfg(feature = "config")]
pub use agent_config as config;

/// Tracing setup (enabled by `telemetry` feature).
#[cfg(feature = "telemetry")]
pub use agent_telemetry as telemetry;
