//! Command-line interface definitions using clap derive macros.
//!
//! Contains the top-level [`Cli`] parser, the [`Commands`] enum for
//! subcommands (run, init, validate, device-id), and their associated
//! argument structs. Every flag has an environment variable equivalent
//! for container deployments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub const DEFAULT_CONFIG: &str = "config/config.yaml";
pub const DEFAULT_DEVICE_ID_FILE: &str = "config/device_id";

#[derive(Parser)]
#[command(
    name = "chain-proxy",
    version,
    about = "Local forwarding proxy that stamps requests with a device identity",
    propagate_version = true,
    after_help = "\x1b[1mQuick start:\x1b[0m\n  \
        chain-proxy init                      Create config/config.yaml\n  \
        chain-proxy run                       Start on port 3000\n  \
        chain-proxy run -c other.yaml         Start with a specific config"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the proxy server
    Run(RunArgs),

    /// Generate a starter config file
    Init(InitArgs),

    /// Validate a config file without starting
    Validate(ValidateArgs),

    /// Print the device identifier, creating it if needed
    DeviceId(DeviceIdArgs),
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        chain-proxy run                                 Use ./config/config.yaml\n  \
        chain-proxy run -c proxy.yaml --pretty          Local dev mode\n  \
        chain-proxy run --device-id 1f0c... -p 3100     Explicit identity and port")]
pub struct RunArgs {
    /// Config file path (.yaml, .json, .toml)
    #[arg(short, long, env = "CONFIG_FILE", default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,

    /// Listen port
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Listen address (overrides server.host from the config file)
    #[arg(long, env = "HOST")]
    pub host: Option<String>,

    #[command(flatten)]
    pub identity: IdentityArgs,

    // -- Logging --
    /// Log level
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    /// Force pretty (human-readable) log output
    #[arg(long)]
    pub pretty: bool,

    /// Force JSON log output (overrides TTY detection)
    #[arg(long, conflicts_with = "pretty")]
    pub json: bool,
}

#[derive(Args)]
pub struct IdentityArgs {
    /// Device identifier to use instead of the identifier file
    #[arg(long, env = "DEVICE_ID", help_heading = "Identity")]
    pub device_id: Option<String>,

    /// File holding the device identifier (created when missing)
    #[arg(
        long,
        env = "DEVICE_ID_FILE",
        default_value = DEFAULT_DEVICE_ID_FILE,
        help_heading = "Identity"
    )]
    pub device_id_file: PathBuf,
}

#[derive(Args)]
pub struct InitArgs {
    /// Output format
    #[arg(short, long, default_value = "yaml")]
    pub format: ConfigFormat,

    /// Output file path (default: config/config.<format>)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Upstream server URL written into the config
    #[arg(long, default_value = "http://localhost:8080")]
    pub server_url: String,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Config file to validate
    #[arg(default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: ValidateFormat,
}

#[derive(Args)]
pub struct DeviceIdArgs {
    #[command(flatten)]
    pub identity: IdentityArgs,
}

#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    #[must_use]
    pub const fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Clone, Debug, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

impl ConfigFormat {
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Json => "json",
            Self::Toml => "toml",
        }
    }
}

#[derive(Clone, Debug, ValueEnum)]
pub enum ValidateFormat {
    Text,
    Json,
}
