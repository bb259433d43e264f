//! Configuration management for agent tool runtimes.
//!
//! Every section is optional; omitted fields take their defaults.
//!
//! ```json
//! {
//!   "registry": { "duplicate_policy": "reject" },
//!   "dispatch": { "catch_panics": true },
//!   "telemetry": { "filter": "agent_tools=debug", "ansi": false, "output": "stderr" }
//! }
//! ```

#![warn(missing_docs, clippy::pedantic)]

pub mod schema {
    //! Strongly typed configuration schemas.

    use agent_telemetry::TelemetryConfig;
    use agent_tools::{DispatchOptions, DuplicatePolicy, RegistryBuilder};
    use serde::{Deserialize, Serialize};

    /// Registry construction settings.
    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct RegistryConfig {
        /// Behaviour on duplicate tool names.
        pub duplicate_policy: DuplicatePolicy,
    }

    impl RegistryConfig {
        /// Starts a registry builder honouring these settings.
        #[must_use]
        pub fn builder(&self) -> RegistryBuilder {
            RegistryBuilder::new().with_duplicate_policy(self.duplicate_policy)
        }
    }

    /// Top-level configuration document.
    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(default, deny_unknown_fields)]
    pub struct AgentToolsConfig {
        /// Registry settings.
        pub registry: RegistryConfig,
        /// Dispatcher settings.
        pub dispatch: DispatchOptions,
        /// Logging settings.
        pub telemetry: TelemetryConfig,
    }
}

pub mod loader {
    //! Configuration loader implementations.

    use std::fs;
    use std::path::Path;

    use anyhow::{Context, Result};
    use tracing::debug;

    use crate::schema::AgentToolsConfig;

    /// Parses a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed JSON or unknown top-level sections.
    pub fn from_json_str(raw: &str) -> Result<AgentToolsConfig> {
        serde_json::from_str(raw).context("failed to parse tool configuration")
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or parsed.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<AgentToolsConfig> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = from_json_str(&raw)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        debug!(path = %path.display(), "loaded tool configuration");
        Ok(config)
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        use agent_telemetry::LogOutput;
        use agent_tools::{DescriptorBuilder, DuplicatePolicy, ToolArguments, ToolBinding, ToolFuture};
        use serde_json::Value;

        #[test]
        fn empty_document_uses_defaults() {
            let config = from_json_str("{}").unwrap();
            assert_eq!(config, AgentToolsConfig::default());
            assert_eq!(config.registry.duplicate_policy, DuplicatePolicy::Replace);
            assert!(config.dispatch.catch_panics);
            assert_eq!(config.telemetry.filter, "info");
        }

        #[test]
        fn parses_all_sections() {
            let config = from_json_str(
                r#"{
                    "registry": { "duplicate_policy": "reject" },
                    "dispatch": { "catch_panics": false },
                    "telemetry": { "filter": "agent_tools=debug", "ansi": false, "output": "stdout" }
                }"#,
            )
            .unwrap();

            assert_eq!(config.registry.duplicate_policy, DuplicatePolicy::Reject);
            assert!(!config.dispatch.catch_panics);
            assert_eq!(config.telemetry.filter, "agent_tools=debug");
            assert!(!config.telemetry.ansi);
            assert_eq!(config.telemetry.output, LogOutput::Stdout);
        }

        #[test]
        fn rejects_unknown_sections() {
            let err = from_json_str(r#"{ "transport": {} }"#).expect_err("unknown section");
            assert!(err.to_string().contains("failed to parse tool configuration"));
        }

        #[test]
        fn missing_file_reports_path() {
            let err = load_from_path("/definitely/not/here.json").expect_err("missing file");
            assert!(format!("{err:#}").contains("/definitely/not/here.json"));
        }

        #[test]
        fn registry_builder_honours_policy() {
            fn noop(_arguments: ToolArguments) -> ToolFuture {
                Box::pin(async { Ok(Value::Null) })
            }
            let binding = || ToolBinding::new(DescriptorBuilder::new("noop").build(), noop);

            let config = from_json_str(r#"{ "registry": { "duplicate_policy": "reject" } }"#).unwrap();
            let mut builder = config.registry.builder();
            builder.register_binding(binding()).unwrap();
            assert!(builder.register_binding(binding()).is_err());
        }
    }
}

pub use loader::{from_json_str, load_from_path};
pub use schema::{AgentToolsConfig, RegistryConfig};
