//! Shared CLI options for the placement-tree commands.
//!
//! Connection settings come from flags or the usual OpenStack environment
//! variables; rendering settings are shared by `show` and `list`.

use std::time::Duration;

use clap::{Args, ValueEnum};
use strum_macros::{Display, IntoStaticStr};

use placement_core::{Error, FieldSelection, Result};

/// Oldest placement microversion supporting `in_tree` listings.
pub const MIN_API_VERSION: (u32, u32) = (1, 14);

/// Output format of the rendered graph.
#[derive(ValueEnum, Display, IntoStaticStr, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    /// Graphviz DOT with HTML-like tables.
    #[default]
    Dot,
    /// Indented plain text tree.
    Text,
}

/// How to reach the placement service.
#[derive(Args, Debug, Clone)]
pub struct ConnectionOptions {
    /// Placement API endpoint, e.g. http://controller/placement
    #[arg(long = "os-placement-endpoint", env = "OS_PLACEMENT_ENDPOINT", value_name = "URL")]
    pub endpoint: Option<String>,

    /// Keystone token sent as X-Auth-Token
    #[arg(long = "os-token", env = "OS_TOKEN", value_name = "TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Placement microversion (at least 1.14)
    #[arg(
        long = "os-placement-api-version",
        env = "OS_PLACEMENT_API_VERSION",
        value_name = "VERSION",
        default_value = "1.14"
    )]
    pub api_version: String,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    pub timeout: u64,
}

impl ConnectionOptions {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: Some(endpoint.into()),
            token: None,
            api_version: format!("{}.{}", MIN_API_VERSION.0, MIN_API_VERSION.1),
            timeout: 30,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = secs;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

/// What to render and where.
#[derive(Args, Debug, Clone, Default)]
pub struct RenderArgs {
    /// Comma separated list of fields to show (default: all but generations)
    #[arg(long, value_name = "FIELD,...")]
    pub fields: Option<String>,

    /// Also show the consumers allocating from the providers
    #[arg(long = "show-consumers")]
    pub show_consumers: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Dot)]
    pub format: OutputFormat,

    /// Enrich providers in parallel (default: false for stable request order)
    #[arg(long)]
    pub parallel: bool,

    /// Output file path (writes to file instead of stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<String>,
}

impl RenderArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fields(mut self, fields: impl Into<String>) -> Self {
        self.fields = Some(fields.into());
        self
    }

    pub fn with_show_consumers(mut self, show_consumers: bool) -> Self {
        self.show_consumers = show_consumers;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn field_selection(&self) -> FieldSelection {
        FieldSelection::from_csv(self.fields.as_deref())
    }
}

/// Parse `major.minor` and reject versions older than [`MIN_API_VERSION`].
pub fn parse_api_version(version: &str) -> Result<(u32, u32)> {
    let invalid = || {
        Error::config_invalid(format!("invalid placement API version '{version}'"))
            .with_operation("options::parse_api_version")
    };
    let (major, minor) = version.trim().split_once('.').ok_or_else(invalid)?;
    let major: u32 = major.parse().map_err(|_| invalid())?;
    let minor: u32 = minor.parse().map_err(|_| invalid())?;
    if (major, minor) < MIN_API_VERSION {
        return Err(Error::config_invalid(format!(
            "placement API version {version} is too old, at least {}.{} is required",
            MIN_API_VERSION.0, MIN_API_VERSION.1
        ))
        .with_operation("options::parse_api_version"));
    }
    Ok((major, minor))
}
