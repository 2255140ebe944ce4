//! Process settings, loaded from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use sitegate_auth::JwtVerifier;
use sitegate_core::{ConfigError, ConfigResult, GateConfig};

pub const ENV_SIGNING_KEY: &str = "CLERK_JWT_KEY";
pub const ENV_BIND_ADDR: &str = "SITEGATE_BIND_ADDR";
pub const ENV_ASSETS_DIR: &str = "SITEGATE_ASSETS_DIR";
pub const ENV_PROTECTED_PREFIX: &str = "SITEGATE_PROTECTED_PREFIX";
pub const ENV_SIGN_IN_PATH: &str = "SITEGATE_SIGN_IN_PATH";
pub const ENV_SESSION_COOKIE: &str = "SITEGATE_SESSION_COOKIE";
pub const ENV_VERIFY_TIMEOUT_MS: &str = "SITEGATE_VERIFY_TIMEOUT_MS";
pub const ENV_CLOCK_SKEW_SECS: &str = "SITEGATE_CLOCK_SKEW_SECS";
pub const ENV_AUTHORIZED_PARTIES: &str = "SITEGATE_AUTHORIZED_PARTIES";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_ASSETS_DIR: &str = "dist";
const DEFAULT_CLOCK_SKEW_SECS: u32 = 5;

#[derive(Clone)]
pub struct Settings {
    pub bind_addr: SocketAddr,
    pub assets_dir: PathBuf,
    pub gate: GateConfig,
    /// Raw signing key (PEM public key or shared secret).
    pub signing_key: String,
    pub clock_skew: Duration,
    pub authorized_parties: Vec<String>,
}

impl Settings {
    /// Settings with defaults for everything but the key and asset root.
    pub fn new(signing_key: impl Into<String>, assets_dir: impl Into<PathBuf>) -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            assets_dir: assets_dir.into(),
            gate: GateConfig::default(),
            signing_key: signing_key.into(),
            clock_skew: Duration::from_secs(u64::from(DEFAULT_CLOCK_SKEW_SECS)),
            authorized_parties: Vec::new(),
        }
    }

    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup (the environment in production).
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let signing_key = get(ENV_SIGNING_KEY).ok_or(ConfigError::missing(ENV_SIGNING_KEY))?;

        let bind_addr = get(ENV_BIND_ADDR)
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::invalid(ENV_BIND_ADDR, e.to_string()))?;

        let assets_dir =
            PathBuf::from(get(ENV_ASSETS_DIR).unwrap_or_else(|| DEFAULT_ASSETS_DIR.to_string()));

        let mut gate = GateConfig::default();
        if let Some(prefix) = get(ENV_PROTECTED_PREFIX) {
            gate = gate
                .with_protected_prefix(prefix)
                .map_err(|e| rekey(ENV_PROTECTED_PREFIX, e))?;
        }
        if let Some(path) = get(ENV_SIGN_IN_PATH) {
            gate = gate
                .with_sign_in_path(path)
                .map_err(|e| rekey(ENV_SIGN_IN_PATH, e))?;
        }
        if let Some(name) = get(ENV_SESSION_COOKIE) {
            gate = gate
                .with_session_cookie(name)
                .map_err(|e| rekey(ENV_SESSION_COOKIE, e))?;
        }
        if let Some(ms) = get(ENV_VERIFY_TIMEOUT_MS) {
            let ms: u64 = ms
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid(ENV_VERIFY_TIMEOUT_MS, "expected milliseconds"))?;
            gate = gate
                .with_verify_timeout(Duration::from_millis(ms))
                .map_err(|e| rekey(ENV_VERIFY_TIMEOUT_MS, e))?;
        }

        let clock_skew = match get(ENV_CLOCK_SKEW_SECS) {
            Some(secs) => secs
                .trim()
                .parse::<u32>()
                .map_err(|_| ConfigError::invalid(ENV_CLOCK_SKEW_SECS, "expected seconds"))?,
            None => DEFAULT_CLOCK_SKEW_SECS,
        };

        let authorized_parties = get(ENV_AUTHORIZED_PARTIES)
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        Ok(Self {
            bind_addr,
            assets_dir,
            gate,
            signing_key,
            clock_skew: Duration::from_secs(u64::from(clock_skew)),
            authorized_parties,
        })
    }

    /// Token verifier configured from these settings.
    pub fn verifier(&self) -> JwtVerifier {
        let skew = i64::try_from(self.clock_skew.as_secs()).unwrap_or(i64::MAX);
        JwtVerifier::new()
            .with_leeway(chrono::Duration::seconds(skew))
            .with_authorized_parties(self.authorized_parties.clone())
    }
}

impl core::fmt::Debug for Settings {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Settings")
            .field("bind_addr", &self.bind_addr)
            .field("assets_dir", &self.assets_dir)
            .field("gate", &self.gate)
            .field("signing_key", &"<redacted>")
            .field("clock_skew", &self.clock_skew)
            .field("authorized_parties", &self.authorized_parties)
            .finish()
    }
}

fn rekey(key: &'static str, err: ConfigError) -> ConfigError {
    match err {
        ConfigError::Invalid { message, .. } => ConfigError::invalid(key, message),
        ConfigError::Missing(_) => ConfigError::missing(key),
    }
}
