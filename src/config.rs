use serde::Deserialize;

impl Config {

    pub fn init() -> Result<Self, config::ConfigError> {
        // get config toml dir from env, with default
        let config_path =
            std::env::var("LANGCHECK_CONFIG_PATH").unwrap_or_else(|_| String::from("./config.toml"));

        let config = config::Config::builder()
            // Add in config toml, if any: every key has a default
            .add_source(config::File::with_name(&config_path).required(false))
            // Add in settings from the environment (with a prefix of LANGCHECK)
            .add_source(config::Environment::with_prefix("LANGCHECK").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

// ================================================================================================
// Models
// ================================================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[allow(unused)]
pub struct Config {
    #[serde(default)]
    pub logs: LogsConfig,
    #[serde(default)]
    pub moviebox: MovieboxConfig,
}

// ===============================================================================
// Logs
// ===============================================================================

#[derive(Debug, Clone, Deserialize)]
#[allow(unused)]
pub struct LogsConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub enable_reqwest_logging: bool,
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            enable_reqwest_logging: false,
        }
    }
}

fn default_log_level() -> String { String::from("info") }

// ===============================================================================
// MovieBox
// ===============================================================================

#[derive(Debug, Clone, Deserialize)]
#[allow(unused)]
pub struct MovieboxConfig {
    /// API host without scheme (e.g. "h5.aoneroom.com")
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_protocol")]
    pub protocol: String,
    /// Number of search results requested per page.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    /// Sent in the `X-Client-Info` header.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl MovieboxConfig {
    pub fn host_url(&self) -> String {
        format!(
            "{}://{}",
            self.protocol,
            self.host.trim_end_matches('/')
        )
    }
}

impl Default for MovieboxConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            protocol: default_protocol(),
            per_page: default_per_page(),
            timezone: default_timezone(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_host() -> String { String::from("h5.aoneroom.com") }

fn default_protocol() -> String { String::from("https") }

fn default_per_page() -> u32 { 24 }

fn default_timezone() -> String { String::from("Africa/Nairobi") }

fn default_user_agent() -> String {
    String::from("Mozilla/5.0 (X11; Linux x86_64; rv:137.0) Gecko/20100101 Firefox/137.0")
}
