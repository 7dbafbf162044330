use clap::Parser;
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Base URL of the external agent service
    #[arg(long, env = "AGENT_URL")]
    pub agent_url: Option<String>,

    /// Base URL of the hosted document store
    #[arg(long, env = "FEED_URL")]
    pub feed_url: Option<String>,

    /// Enable rate limiting on submissions
    #[arg(long, env = "RATE_LIMIT_ENABLED")]
    pub rate_limit_enabled: Option<bool>,

    /// Disable timeout middleware
    #[arg(long, env = "TIMEOUT_DISABLED")]
    pub timeout_disabled: Option<bool>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub agent: AgentConfig,
    pub feed: FeedConfig,
    pub resilience: ResilienceConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AgentConfig {
    /// Base URL of the external agent endpoint (`POST {base}/agent`).
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FeedConfig {
    /// Base URL of the hosted document store; empty disables the mirror.
    pub base_url: String,
    /// Collection holding the run records.
    pub collection: String,
    /// Poll cadence of the mirror.
    pub poll_interval_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ResilienceConfig {
    pub rate_limit_enabled: bool,
    pub timeout_disabled: bool,
    pub requests_per_second: f32,
    pub burst_size: f32,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        let mut builder = Config::builder();

        // 1. Defaults
        builder = builder
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("agent.base_url", "http://localhost:8080")?
            .set_default("feed.base_url", "")?
            .set_default("feed.collection", "agentstate")?
            .set_default("feed.poll_interval_ms", 1500)?
            .set_default("resilience.rate_limit_enabled", true)?
            .set_default("resilience.timeout_disabled", false)?
            .set_default("resilience.requests_per_second", 5.0)?
            .set_default("resilience.burst_size", 10.0)?;

        // 2. Config file: explicit path (CLI flag or CONFIG_FILE), else an
        // optional ./config.yaml in the working directory.
        if let Some(path) = &cli.config {
            builder = builder.add_source(File::new(path, FileFormat::Yaml));
        } else {
            builder = builder.add_source(File::new("config", FileFormat::Yaml).required(false));
        }

        // 3. Environment variables (prefixed with RAGWATCH_)
        // E.g. RAGWATCH_SERVER__PORT=8000
        builder = builder.add_source(
            Environment::with_prefix("RAGWATCH")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        // 4. CLI overrides (clap also resolves the legacy bare env vars:
        // PORT, AGENT_URL, FEED_URL, ...)
        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", i64::from(port))?;
        }
        if let Some(url) = cli.agent_url {
            builder = builder.set_override("agent.base_url", url)?;
        }
        if let Some(url) = cli.feed_url {
            builder = builder.set_override("feed.base_url", url)?;
        }
        if let Some(rl) = cli.rate_limit_enabled {
            builder = builder.set_override("resilience.rate_limit_enabled", rl)?;
        }
        if let Some(td) = cli.timeout_disabled {
            builder = builder.set_override("resilience.timeout_disabled", td)?;
        }

        let cfg = builder.build()?;
        cfg.try_deserialize()
    }
}
