//! CLI error types with miette diagnostics.
//!
//! Maps api, core, and config errors into user-facing diagnostics with
//! actionable help text and a process exit code per error class.

use miette::Diagnostic;
use thiserror::Error;

use zonesmith_config::ConfigError;
use zonesmith_core::CoreError;

/// Exit codes of the `zonesmith` process.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach NetBox")]
    #[diagnostic(
        code(zonesmith::connection_failed),
        help(
            "Check that the NetBox instance is running and accessible.\n\
             Configured URL: zonesmith config show"
        )
    )]
    ConnectionFailed {
        #[source]
        source: zonesmith_api::Error,
    },

    // ── Authentication ───────────────────────────────────────────────

    #[error("NetBox rejected the API token")]
    #[diagnostic(
        code(zonesmith::auth_failed),
        help(
            "Verify the token in the [netbox] section or ZONESMITH_NETBOX__TOKEN.\n\
             Tokens are managed under Admin > API Tokens in NetBox."
        )
    )]
    AuthFailed {
        #[source]
        source: zonesmith_api::Error,
    },

    // ── Timeout ──────────────────────────────────────────────────────

    #[error("Request to NetBox timed out")]
    #[diagnostic(
        code(zonesmith::timeout),
        help("Check NetBox responsiveness, or retry later.")
    )]
    Timeout {
        #[source]
        source: zonesmith_api::Error,
    },

    // ── API ──────────────────────────────────────────────────────────

    #[error("NetBox request failed")]
    #[diagnostic(code(zonesmith::api_error))]
    Api {
        #[source]
        source: zonesmith_api::Error,
    },

    // ── Configuration ────────────────────────────────────────────────

    #[error("No NetBox token configured")]
    #[diagnostic(
        code(zonesmith::no_token),
        help(
            "Set token in the [netbox] section or export ZONESMITH_NETBOX__TOKEN.\n\
             Create a starter config with: zonesmith config init"
        )
    )]
    NoToken,

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(zonesmith::validation))]
    Validation { field: String, reason: String },

    #[error("Configuration loading failed")]
    #[diagnostic(
        code(zonesmith::config),
        help("Check the file reported by: zonesmith config path")
    )]
    Config {
        #[source]
        source: Box<figment::Error>,
    },

    // ── Generation ───────────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(code(zonesmith::generation))]
    Generation(CoreError),

    // ── IO ───────────────────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::NoToken | Self::Validation { .. } | Self::Config { .. } => exit_code::USAGE,
            Self::Api { .. } | Self::Generation(_) | Self::Io(_) => exit_code::GENERAL,
        }
    }
}

// ── Error mappings ───────────────────────────────────────────────────

impl From<zonesmith_api::Error> for CliError {
    fn from(err: zonesmith_api::Error) -> Self {
        if err.is_auth() {
            return Self::AuthFailed { source: err };
        }
        if let zonesmith_api::Error::Transport(transport) = &err {
            if transport.is_timeout() {
                return Self::Timeout { source: err };
            }
            if transport.is_connect() {
                return Self::ConnectionFailed { source: err };
            }
        }
        Self::Api { source: err }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Inventory(api) => Self::from(api),
            other => Self::Generation(other),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoToken => Self::NoToken,
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::Figment(source) => Self::Config { source },
            ConfigError::Serialization(source) => Self::Validation {
                field: "config".into(),
                reason: source.to_string(),
            },
            ConfigError::Io(source) => Self::Io(source),
        }
    }
}
