use crate::definitions::language::Language;
use log::LevelFilter;
use serde::Deserialize;
use serde_with::{DurationSeconds, serde_as};
use std::{
    env,
    fs::read_to_string,
    net::{IpAddr, Ipv4Addr},
    path::{Path, PathBuf},
    time::Duration,
};

/// Environment variable key to load the config from
const CONFIG_ENV_KEY: &str = "SITE_I18N_CONFIG_JSON";

/// Loads the configuration from the environment or the `config.json` file,
/// [None] when neither is present or they fail to parse.
///
/// Runs before logging is initialized so problems are written to stderr
pub fn load_config() -> Option<Config> {
    // Attempt to load the config from the env
    if let Ok(env) = env::var(CONFIG_ENV_KEY) {
        let config: Config = match serde_json::from_str(&env) {
            Ok(value) => value,
            Err(err) => {
                eprintln!("Failed to load env config (Using default): {err:?}");
                return None;
            }
        };
        return Some(config);
    }

    // Attempt to load the config from disk
    let file = Path::new("config.json");
    if !file.exists() {
        return None;
    }

    let data = match read_to_string(file) {
        Ok(value) => value,
        Err(err) => {
            eprintln!("Failed to load config file (Using defaults): {err:?}");
            return None;
        }
    };

    let config: Config = match serde_json::from_str(&data) {
        Ok(value) => value,
        Err(err) => {
            eprintln!("Failed to load config file (Using default): {err:?}");
            return None;
        }
    };

    Some(config)
}

pub type Port = u16;

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub host: IpAddr,
    pub port: Port,
    /// Directory the static site is served from
    pub site_root: PathBuf,
    pub logging: LevelFilter,
    pub i18n: I18nConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8080,
            site_root: PathBuf::from("public"),
            logging: LevelFilter::Info,
            i18n: Default::default(),
        }
    }
}

/// Configuration for translation resolution and the surfaces
/// the active language is synchronized with
#[serde_as]
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct I18nConfig {
    /// Language used when the requested one is missing or unsupported
    pub default_language: Language,

    /// Backstop language consulted when the active bundle lacks a key
    pub fallback_language: Language,

    /// Directory containing the `<code>.json` bundles
    pub bundle_dir: PathBuf,

    /// Maximum time a bundle load may take before it is treated
    /// as a failed load
    #[serde_as(as = "DurationSeconds<u64>")]
    #[serde(rename = "load_timeout_secs")]
    pub load_timeout: Duration,

    /// URL query parameter carrying the active language
    pub query_param: String,

    /// Key the language preference is persisted under
    pub preference_key: String,

    /// Element attribute holding the binding key path
    pub binding_attribute: String,

    /// Element attribute holding the code of a language selector
    pub selector_attribute: String,

    /// Class toggled on the selector of the active language
    pub active_class: String,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            default_language: Language::En,
            fallback_language: Language::En,
            bundle_dir: PathBuf::from("public/i18n"),
            load_timeout: Duration::from_secs(10),
            query_param: "lang".to_string(),
            preference_key: "preferredLanguage".to_string(),
            binding_attribute: "data-i18n".to_string(),
            selector_attribute: "data-lang".to_string(),
            active_class: "active".to_string(),
        }
    }
}
