//! Gateway Configuration
//! Mission: Environment-driven runtime settings with sane OpenWrt defaults

use anyhow::{ensure, Context, Result};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u32,
    pub bind_address: String,
    /// ZeroTier home directory holding authtoken.secret
    pub zt_home: PathBuf,
    /// host:port of the controller service
    pub zt_address: String,
    /// Directory holding the credential document
    pub data_dir: PathBuf,
    pub session_timeout_secs: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        // A malformed value is a startup error, never a silent fallback;
        // an operator who set ZTNCUI_PORT=70000 must not end up on 8080.
        let port_raw = std::env::var("ZTNCUI_PORT").unwrap_or_else(|_| "8080".to_string());
        let port: u32 = port_raw
            .parse()
            .with_context(|| format!("Invalid ZTNCUI_PORT '{}'", port_raw))?;

        let bind_address =
            std::env::var("ZTNCUI_BIND").unwrap_or_else(|_| "0.0.0.0".to_string());

        let zt_home = std::env::var("ZT_HOME")
            .unwrap_or_else(|_| "/var/lib/zerotier-one".to_string())
            .into();

        let zt_address =
            std::env::var("ZT_ADDRESS").unwrap_or_else(|_| "localhost:9993".to_string());

        let data_dir = std::env::var("ZTNCUI_DATA_DIR")
            .unwrap_or_else(|_| "/etc/ztncui".to_string())
            .into();

        let timeout_raw =
            std::env::var("ZTNCUI_SESSION_TIMEOUT").unwrap_or_else(|_| "3600".to_string());
        let session_timeout_secs: i64 = timeout_raw
            .parse()
            .with_context(|| format!("Invalid ZTNCUI_SESSION_TIMEOUT '{}'", timeout_raw))?;

        let config = Self {
            port,
            bind_address,
            zt_home,
            zt_address,
            data_dir,
            session_timeout_secs,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            (1024..=65535).contains(&self.port),
            "Invalid port {}",
            self.port
        );
        ensure!(
            self.session_timeout_secs > 0,
            "Invalid session timeout {}",
            self.session_timeout_secs
        );
        Ok(())
    }

    pub fn users_file(&self) -> PathBuf {
        self.data_dir.join("passwd.json")
    }

    pub fn log_summary(&self) {
        info!("Gateway configuration:");
        info!("  Bind: {}:{}", self.bind_address, self.port);
        info!("  ZeroTier home: {}", self.zt_home.display());
        info!("  Controller address: {}", self.zt_address);
        info!("  Data dir: {}", self.data_dir.display());
        info!("  Session timeout: {}s", self.session_timeout_secs);
    }
}
