use clap::{Parser, builder::BoolishValueParser};
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use tako_core::client::http::DEFAULT_BASE_URL;
use thiserror::Error;

const DEFAULT_ENVIRONMENT: &str = "local";
const DEFAULT_MCP_HTTP_ADDR: &str = "0.0.0.0:8001";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
const DEFAULT_LOG_FORMAT: &str = "text";

#[derive(Parser, Debug)]
#[command(name = "tako-mcpd", version, about = "Tako MCP daemon.")]
struct CliArgs {
    #[arg(long, env = "TAKO_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    #[arg(long, env = "X_TAKO_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// `local` serves over stdio, `remote` over streamable HTTP.
    #[arg(long, env = "ENVIRONMENT", default_value = DEFAULT_ENVIRONMENT)]
    environment: String,

    #[arg(long, env = "TAKO_MCP_HTTP_ADDR", default_value = DEFAULT_MCP_HTTP_ADDR)]
    http_addr: SocketAddr,

    #[arg(
        long,
        env = "TAKO_REQUEST_TIMEOUT_SECS",
        default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS
    )]
    request_timeout_secs: u64,

    #[arg(
        long = "stateless",
        env = "TAKO_MCP_STATELESS",
        default_value_t = false,
        value_parser = BoolishValueParser::new()
    )]
    stateless: bool,

    #[arg(long, env = "TAKO_LOG_FORMAT", default_value = DEFAULT_LOG_FORMAT)]
    log_format: String,
}

/// MCP transport selected by the deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Stdio,
    StreamableHttp,
}

impl FromStr for Transport {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Stdio),
            "remote" => Ok(Self::StreamableHttp),
            _ => Err(ConfigError::InvalidSetting {
                name: "ENVIRONMENT",
                value: value.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::InvalidSetting {
                name: "TAKO_LOG_FORMAT",
                value: value.to_string(),
            }),
        }
    }
}

/// Runtime configuration loaded from CLI arguments and environment variables.
#[derive(Clone)]
pub struct TakoConfig {
    pub api_key: String,
    pub base_url: String,
    pub transport: Transport,
    pub http_addr: SocketAddr,
    pub request_timeout: Option<Duration>,
    pub stateful_mode: bool,
    pub log_format: LogFormat,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting: {0}")]
    MissingSetting(&'static str),
    #[error("invalid {name} value: {value}")]
    InvalidSetting { name: &'static str, value: String },
}

impl TakoConfig {
    pub fn from_args() -> Result<Self, ConfigError> {
        let args = CliArgs::parse();
        Self::try_from(args)
    }
}

impl TryFrom<CliArgs> for TakoConfig {
    type Error = ConfigError;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let api_key = args
            .api_key
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::MissingSetting("TAKO_API_KEY"))?;

        let base_url = args.base_url.trim().to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidSetting {
                name: "X_TAKO_URL",
                value: args.base_url,
            });
        }

        let request_timeout = if args.request_timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(args.request_timeout_secs))
        };

        Ok(Self {
            api_key,
            base_url,
            transport: args.environment.parse()?,
            http_addr: args.http_addr,
            request_timeout,
            stateful_mode: !args.stateless,
            log_format: args.log_format.parse()?,
        })
    }
}
