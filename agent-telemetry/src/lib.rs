//! Observability utilities for agent tool runtimes.

#![warn(missing_docs, clippy::pedantic)]

pub mod tracing_support {
    //! Structured tracing helpers.

    use anyhow::{Context, Result};
    use serde::{Deserialize, Serialize};
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::fmt::writer::BoxMakeWriter;

    /// Stream that receives formatted events.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum LogOutput {
        /// Standard error. Leaves stdout free for protocol traffic.
        #[default]
        Stderr,
        /// Standard output.
        Stdout,
    }

    impl LogOutput {
        fn make_writer(self) -> BoxMakeWriter {
            match self {
                Self::Stderr => BoxMakeWriter::new(std::io::stderr),
                Self::Stdout => BoxMakeWriter::new(std::io::stdout),
            }
        }
    }

    /// Subscriber settings.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct TelemetryConfig {
        /// `EnvFilter` directives used when `RUST_LOG` is unset.
        pub filter: String,
        /// Emit ANSI colours.
        pub ansi: bool,
        /// Include the event target in each line.
        pub with_target: bool,
        /// Destination stream.
        pub output: LogOutput,
    }

    impl Default for TelemetryConfig {
        fn default() -> Self {
            Self {
                filter: "info".to_owned(),
                ansi: true,
                with_target: false,
                output: LogOutput::Stderr,
            }
        }
    }

    impl TelemetryConfig {
        /// Resolves the filter, preferring `RUST_LOG` over the configured
        /// directives.
        ///
        /// # Errors
        ///
        /// Returns an error when the configured directives do not parse.
        pub fn env_filter(&self) -> Result<EnvFilter> {
            if let Ok(filter) = EnvFilter::try_from_default_env() {
                return Ok(filter);
            }
            EnvFilter::try_new(&self.filter)
                .with_context(|| format!("invalid log filter `{}`", self.filter))
        }
    }

    /// Installs the global fmt subscriber.
    ///
    /// # Errors
    ///
    /// Fails on an invalid filter or when a global subscriber is already set.
    pub fn init(config: &TelemetryConfig) -> Result<()> {
        let filter = config.env_filter()?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(config.ansi)
            .with_target(config.with_target)
            .with_writer(config.output.make_writer())
            .try_init()
            .map_err(|err| anyhow::anyhow!("failed to install tracing subscriber: {err}"))
    }

}

pub use tracing_support::{LogOutput, TelemetryConfig, init};
