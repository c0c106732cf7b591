use log::*;
use tpa_common::Secret;

pub const DEFAULT_API_BASE_URL: &str = "https://api.tonplace.net";

#[derive(Debug, Clone, Default)]
pub struct TonPlaceConfig {
    pub base_url: String,
    pub app_id: String,
    pub app_secret: Secret<String>,
}

impl TonPlaceConfig {
    pub fn new_from_env_or_default() -> Self {
        let base_url = std::env::var("TPA_API_BASE_URL").unwrap_or_else(|_| {
            debug!("TPA_API_BASE_URL not set, using {DEFAULT_API_BASE_URL}");
            DEFAULT_API_BASE_URL.to_string()
        });
        let app_id = std::env::var("TPA_APP_ID").unwrap_or_else(|_| {
            warn!("TPA_APP_ID not set, using a (probably useless) default");
            "0".to_string()
        });
        let app_secret = Secret::new(std::env::var("TPA_APP_SECRET").unwrap_or_else(|_| {
            warn!("TPA_APP_SECRET not set, using a (probably useless) default");
            "00000000000000".to_string()
        }));
        Self { base_url, app_id, app_secret }
    }
}
