use tracing::warn;

pub struct Config {
    pub host: String,
    pub http_port: u16,
    pub data_dir: String,
    pub cache_max_entries: Option<u64>,
    pub allowed_origins: Vec<String>,
}

impl Config {
    const DEFAULT_HOST: &str = "0.0.0.0";
    const DEFAULT_HTTP_PORT: u16 = 8080;
    const DEFAULT_DATA_DIR: &str = "./data";

    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let http_port = match lookup("OPENMUSIC_HTTP_PORT") {
            Some(raw) => raw.parse::<u16>().unwrap_or_else(|_| {
                warn!(
                    "OPENMUSIC_HTTP_PORT={} is not a valid port, using {}",
                    raw,
                    Self::DEFAULT_HTTP_PORT
                );
                Self::DEFAULT_HTTP_PORT
            }),
            None => Self::DEFAULT_HTTP_PORT,
        };

        let cache_max_entries = lookup("OPENMUSIC_CACHE_MAX_ENTRIES").and_then(|raw| {
            match raw.parse::<u64>() {
                Ok(n) => Some(n),
                Err(_) => {
                    warn!("OPENMUSIC_CACHE_MAX_ENTRIES={} is not a number, cache is unbounded", raw);
                    None
                }
            }
        });

        Self {
            host: lookup("OPENMUSIC_HOST").unwrap_or_else(|| Self::DEFAULT_HOST.to_string()),
            http_port,
            data_dir: lookup("OPENMUSIC_DATA_DIR")
                .unwrap_or_else(|| Self::DEFAULT_DATA_DIR.to_string()),
            cache_max_entries,
            allowed_origins: lookup("OPENMUSIC_ALLOWED_ORIGINS")
                .unwrap_or_else(|| "*".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.http_port)
    }
}
