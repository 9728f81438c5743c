use serde::Deserialize;
use std::time::Duration;

use tfagate_session::cookie::SessionCookieConfig;

/// Gateway configuration loaded from environment variables.
#[derive(Debug, Deserialize)]
pub struct GatewayConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Redis connection URL for the session store.
    pub redis_url: String,
    /// TCP port to listen on. Env var: `GATEWAY_PORT`.
    #[serde(default = "default_port")]
    pub gateway_port: u16,
    /// Session cookie domain attribute; host-only when unset.
    pub cookie_domain: Option<String>,
    #[serde(default = "default_true")]
    pub cookie_secure: bool,
    /// Session lifetime in Redis and on the cookie.
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: u64,
    /// Notifier endpoint poked after every token issuance.
    #[serde(default = "default_delivery_url")]
    pub delivery_url: String,
    #[serde(default = "default_delivery_timeout")]
    pub delivery_timeout_secs: u64,
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

fn default_port() -> u16 {
    3114
}

fn default_true() -> bool {
    true
}

fn default_session_ttl() -> u64 {
    7 * 24 * 60 * 60
}

fn default_delivery_url() -> String {
    "http://127.0.0.1:8888/update".to_owned()
}

fn default_delivery_timeout() -> u64 {
    5
}

fn default_sweep_interval() -> u64 {
    600
}

impl tfagate_core::config::Config for GatewayConfig {}

impl GatewayConfig {
    pub fn cookie(&self) -> SessionCookieConfig {
        SessionCookieConfig {
            domain: self.cookie_domain.clone(),
            secure: self.cookie_secure,
            max_age_secs: self.session_ttl_secs,
        }
    }

    pub fn delivery_timeout(&self) -> Duration {
        Duration::from_secs(self.delivery_timeout_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}
