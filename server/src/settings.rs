use config::{Config, ConfigError, File};
use serde::Deserialize;
use std::fmt;

#[derive(Debug, Deserialize, Clone)]
pub struct Server {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ImgSource {
    pub path: String,
    pub bucket: String,
    pub cache_bucket: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Worker {
    /// Parallel bbx detections; 0 means one per CPU.
    #[serde(default)]
    pub concurrency: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Sentry {
    pub dsn: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: Server,
    pub img_sources: Vec<ImgSource>,
    #[serde(default)]
    pub worker: Worker,
    pub sentry: Option<Sentry>,
    pub env: ENV,
}

const TRIMBOX_APP_ENVIRONMENT: &str = "TRIMBOX_APP_ENVIRONMENT";
const CONFIG_FILE_PREFIX: &str = "./config";

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var(TRIMBOX_APP_ENVIRONMENT).unwrap_or_else(|_| "Local".into());
        Self::load(CONFIG_FILE_PREFIX, &env)
    }

    fn load(config_dir: &str, raw_env: &str) -> Result<Self, ConfigError> {
        let env = ENV::from(raw_env).to_string();
        Config::builder()
            .add_source(File::with_name(&format!("{}/Default.toml", config_dir)))
            .add_source(File::with_name(&format!("{}/{}", config_dir, env)).required(false))
            .set_override("env", env.as_str())?
            .build()?
            .try_deserialize()
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub enum ENV {
    Local,
    Production,
}

impl fmt::Display for ENV {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ENV::Local => write!(f, "Local"),
            ENV::Production => write!(f, "Production"),
        }
    }
}

impl From<&str> for ENV {
    fn from(env: &str) -> Self {
        match env {
            "Local" => ENV::Local,
            "Production" => ENV::Production,
            _ => ENV::Local,
        }
    }
}
