use std::env;

use log::*;
use market_common::Secret;
use rand::{distributions::Alphanumeric, thread_rng, Rng};

const DEFAULT_MKT_HOST: &str = "127.0.0.1";
const DEFAULT_MKT_PORT: u16 = 8340;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub auth: AuthConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_MKT_HOST.to_string(),
            port: DEFAULT_MKT_PORT,
            database_url: String::default(),
            auth: AuthConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("MKT_HOST").ok().unwrap_or_else(|| DEFAULT_MKT_HOST.into());
        let port = env::var("MKT_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for MKT_PORT. {e} Using the default, {DEFAULT_MKT_PORT}, instead."
                    );
                    DEFAULT_MKT_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_MKT_PORT);
        let database_url = env::var("MKT_DATABASE_URL").ok().unwrap_or_else(|| {
            error!("🪛️ MKT_DATABASE_URL is not set. Please set it to the URL for the marketplace database.");
            String::default()
        });
        let auth = AuthConfig::try_from_env().unwrap_or_else(|| {
            warn!(
                "🪛️ MKT_JWT_SECRET is not set. A random signing secret will be used for this session. All issued \
                 tokens become invalid when the server restarts."
            );
            AuthConfig::default()
        });
        Self { host, port, database_url, auth }
    }
}

/// The shared secret for signing and verifying access tokens (HMAC-SHA256).
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: Secret<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        let secret = thread_rng().sample_iter(&Alphanumeric).take(64).map(char::from).collect::<String>();
        Self { jwt_secret: secret.into() }
    }
}

impl AuthConfig {
    pub fn try_from_env() -> Option<Self> {
        let secret = env::var("MKT_JWT_SECRET").ok().filter(|s| !s.trim().is_empty())?;
        Some(Self { jwt_secret: secret.into() })
    }
}
