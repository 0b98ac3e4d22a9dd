use clap::{Parser, builder::BoolishValueParser};
use kis_core::source::DEFAULT_SOURCE_BASE_URL;
use std::error::Error;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_DATA_PATH: &str = "data2.csv";
const DEFAULT_MCP_HTTP_ADDR: &str = "127.0.0.1:4020";
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;
const DEFAULT_FETCH_DELAY_MS: u64 = 100;

#[derive(Parser, Debug)]
#[command(name = "kis-mcpd", version, about = "KIS API search MCP daemon.")]
struct CliArgs {
    #[arg(long, env = "KIS_DATA_PATH", default_value = DEFAULT_DATA_PATH)]
    data_path: PathBuf,

    #[arg(
        long = "stdio",
        env = "KIS_ENABLE_STDIO",
        default_value_t = false,
        value_parser = BoolishValueParser::new()
    )]
    enable_stdio: bool,

    #[arg(
        long,
        env = "KIS_MCP_SERVE",
        default_value_t = true,
        value_parser = BoolishValueParser::new()
    )]
    mcp_serve: bool,

    #[arg(long, env = "KIS_MCP_HTTP_ADDR", default_value = DEFAULT_MCP_HTTP_ADDR)]
    mcp_http_addr: SocketAddr,

    #[arg(long, env = "KIS_SOURCE_BASE_URL", default_value = DEFAULT_SOURCE_BASE_URL)]
    source_base_url: String,

    #[arg(
        long,
        env = "KIS_FETCH_TIMEOUT_SECS",
        default_value_t = DEFAULT_FETCH_TIMEOUT_SECS
    )]
    fetch_timeout_secs: u64,

    #[arg(
        long,
        env = "KIS_FETCH_DELAY_MS",
        default_value_t = DEFAULT_FETCH_DELAY_MS
    )]
    fetch_delay_ms: u64,
}

/// Runtime configuration loaded from CLI arguments and environment variables.
#[derive(Debug, Clone)]
pub struct KisConfig {
    pub data_path: PathBuf,
    pub enable_stdio: bool,
    pub mcp_serve: bool,
    pub mcp_http_addr: SocketAddr,
    pub source_base_url: String,
    pub fetch_timeout: Duration,
    pub fetch_delay: Duration,
}

#[derive(Debug)]
pub enum ConfigError {
    MissingSetting(&'static str),
    InvalidSetting { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSetting(name) => write!(f, "missing required setting: {name}"),
            Self::InvalidSetting { name, value } => {
                write!(f, "invalid {name} value: {value}")
            }
        }
    }
}

impl Error for ConfigError {}

impl KisConfig {
    pub fn from_args() -> Result<Self, ConfigError> {
        let args = CliArgs::parse();
        Self::try_from(args)
    }
}

impl TryFrom<CliArgs> for KisConfig {
    type Error = ConfigError;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.data_path.to_string_lossy().trim().is_empty() {
            return Err(ConfigError::MissingSetting("KIS_DATA_PATH"));
        }

        let source_base_url = args.source_base_url.trim().to_string();
        if source_base_url.is_empty() {
            return Err(ConfigError::MissingSetting("KIS_SOURCE_BASE_URL"));
        }

        if args.fetch_timeout_secs == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "KIS_FETCH_TIMEOUT_SECS",
                value: args.fetch_timeout_secs.to_string(),
            });
        }

        Ok(Self {
            data_path: args.data_path,
            enable_stdio: args.enable_stdio,
            mcp_serve: args.mcp_serve,
            mcp_http_addr: args.mcp_http_addr,
            source_base_url,
            fetch_timeout: Duration::from_secs(args.fetch_timeout_secs),
            fetch_delay: Duration::from_millis(args.fetch_delay_ms),
        })
    }
}
