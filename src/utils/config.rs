use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ServerConfig {
    pub server: ServerSettings,
    pub limits: LimitSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ServerSettings {
    pub name: String,
    pub network: String,
    pub host: String,
    pub port: u16,
    pub motd: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LimitSettings {
    /// Seconds a connection may take to complete NICK/USER.
    pub registration_timeout: u64,
    /// Seconds a single outbound write may block.
    pub write_timeout: u64,
    /// Outbound mailbox capacity per client, in lines.
    pub send_queue: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LoggingSettings {
    pub level: String,
    pub file: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                name: "irc.local".to_string(),
                network: "SircNet".to_string(),
                host: "0.0.0.0".to_string(),
                port: 6667,
                motd: vec!["Be excellent to each other.".to_string(), String::new()],
            },
            limits: LimitSettings {
                registration_timeout: 300,
                write_timeout: 30,
                send_queue: 512,
            },
            logging: LoggingSettings {
                level: "info".to_string(),
                file: None,
            },
        }
    }
}

impl ServerConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(Config::try_from(&Self::default())?)
            .add_source(File::from(path.as_ref()))
            .build()?;

        config.try_deserialize()
    }

    /// Defaults, then the optional file, then `SIRCD__SECTION__KEY` variables.
    pub fn load_with_defaults(path: Option<impl AsRef<Path>>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        builder = builder.add_source(Config::try_from(&Self::default())?);

        if let Some(p) = path {
            builder = builder.add_source(File::from(p.as_ref()).required(false));
        }

        builder = builder.add_source(
            Environment::with_prefix("SIRCD")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl LimitSettings {
    pub fn registration_timeout(&self) -> Duration {
        Duration::from_secs(self.registration_timeout)
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_secs(self.write_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_config(tag: &str, contents: &str) -> std::path::PathBuf {
        let name = format!("sircd-config-{}-{}.toml", tag, std::process::id());
        let path = std::env::temp_dir().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn defaults_round_trip_through_builder() {
        let config = ServerConfig::load_with_defaults(None::<&str>).unwrap();
        assert_eq!(config.server.port, 6667);
        assert_eq!(config.limits.registration_timeout(), Duration::from_secs(300));
        assert_eq!(config.listen_address(), "0.0.0.0:6667");
    }

    #[test]
    fn file_overrides_defaults() {
        let path = temp_config("file", "[server]\nname = \"chat.example\"\nport = 7000\n");
        let mut file = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(file, "\n[logging]\nfile = \"sircd.log\"").unwrap();
        drop(file);

        let config = ServerConfig::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.server.name, "chat.example");
        assert_eq!(config.server.port, 7000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.logging.file.as_deref(), Some("sircd.log"));
    }

    #[test]
    fn missing_required_file_is_an_error() {
        assert!(ServerConfig::load("/nonexistent/sircd.toml").is_err());
    }

    #[test]
    fn environment_overrides_file_and_defaults() {
        let path = temp_config("env", "[server]\nnetwork = \"FileNet\"\n");
        std::env::set_var("SIRCD__SERVER__NETWORK", "EnvNet");
        std::env::set_var("SIRCD__LIMITS__SEND_QUEUE", "64");

        let config = ServerConfig::load_with_defaults(Some(&path));

        std::env::remove_var("SIRCD__SERVER__NETWORK");
        std::env::remove_var("SIRCD__LIMITS__SEND_QUEUE");
        std::fs::remove_file(&path).unwrap();

        let config = config.unwrap();
        assert_eq!(config.server.network, "EnvNet");
        assert_eq!(config.limits.send_queue, 64);
        assert_eq!(config.server.name, "irc.local");
    }
}
