use std::env;

use log::*;
use tonplace_tools::{
    auth::DEFAULT_MAX_SIGNATURE_AGE,
    TonPlaceConfig as TonPlaceApiConfig,
    DEFAULT_API_BASE_URL,
};
use tpa_common::{helpers::parse_boolean_flag, Secret};

const DEFAULT_TPA_HOST: &str = "127.0.0.1";
const DEFAULT_TPA_PORT: u16 = 8080;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Ton.Place platform configuration
    pub tonplace_config: TonPlaceConfig,
}

/// Everything the server needs to talk to, and accept launches from, Ton.Place.
#[derive(Clone, Debug)]
pub struct TonPlaceConfig {
    pub app_id: String,
    pub app_secret: Secret<String>,
    pub api_base_url: String,
    /// If false, launch signature and timestamp checks are skipped entirely and every launch is accepted. **DANGER**
    pub signature_checks: bool,
    /// The replay window for launch signatures, in seconds.
    pub max_signature_age: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: DEFAULT_TPA_HOST.to_string(), port: DEFAULT_TPA_PORT, tonplace_config: TonPlaceConfig::default() }
    }
}

impl Default for TonPlaceConfig {
    fn default() -> Self {
        Self {
            app_id: String::default(),
            app_secret: Secret::default(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            signature_checks: true,
            max_signature_age: DEFAULT_MAX_SIGNATURE_AGE,
        }
    }
}

impl ServerConfig {
    pub fn from_env_or_default() -> Self {
        let host = env::var("TPA_HOST").ok().unwrap_or_else(|| DEFAULT_TPA_HOST.into());
        let port = env::var("TPA_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for TPA_PORT. {e} Using the default, {DEFAULT_TPA_PORT}, instead."
                    );
                    DEFAULT_TPA_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_TPA_PORT);
        let tonplace_config = TonPlaceConfig::from_env_or_defaults();
        Self { host, port, tonplace_config }
    }
}

impl TonPlaceConfig {
    pub fn from_env_or_defaults() -> Self {
        let api_config = TonPlaceApiConfig::new_from_env_or_default();
        let signature_checks = parse_boolean_flag(env::var("TPA_SIGNATURE_CHECKS").ok(), true);
        if !signature_checks {
            warn!(
                "🚨️🚨️🚨️ Launch signature checks are DISABLED. Anyone can impersonate any user. Do NOT run a \
                 production instance like this. 🚨️🚨️🚨️"
            );
        }
        let max_signature_age = env::var("TPA_MAX_SIGNATURE_AGE")
            .map_err(|_| {
                info!("🪛️ TPA_MAX_SIGNATURE_AGE is not set. Using the default value of {DEFAULT_MAX_SIGNATURE_AGE} s.")
            })
            .and_then(|s| {
                s.parse::<i64>().map_err(|e| warn!("🪛️ Invalid configuration value for TPA_MAX_SIGNATURE_AGE. {e}"))
            })
            .ok()
            .unwrap_or(DEFAULT_MAX_SIGNATURE_AGE);
        Self {
            app_id: api_config.app_id,
            app_secret: api_config.app_secret,
            api_base_url: api_config.base_url,
            signature_checks,
            max_signature_age,
        }
    }

    pub fn api_config(&self) -> TonPlaceApiConfig {
        TonPlaceApiConfig {
            base_url: self.api_base_url.clone(),
            app_id: self.app_id.clone(),
            app_secret: self.app_secret.clone(),
        }
    }
}

//-------------------------------------------------  VerifyOptions  ----------------------------------------------------
/// The subset of the server configuration that request handlers need. Generally we try to keep this as small as
/// possible, and exclude secrets to avoid passing sensitive information around the system.
#[derive(Clone, Copy, Debug)]
pub struct VerifyOptions {
    pub signature_checks: bool,
    pub max_signature_age: i64,
}

impl VerifyOptions {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            signature_checks: config.tonplace_config.signature_checks,
            max_signature_age: config.tonplace_config.max_signature_age,
        }
    }
}
