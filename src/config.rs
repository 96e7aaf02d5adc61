//! # Gateway Configuration
//!
//! All runtime configuration comes from the environment; credentials and
//! paths have no defaults. The two port values may be overridden on the
//! command line.
//!
//! Configuration is loaded once at startup into an explicitly constructed
//! [`GatewayConfig`] and handed to the components that need it; there is no
//! ambient global state.

use anyhow::{Context, Result};
use clap::Parser;
use std::env;
use std::fmt;
use std::path::PathBuf;

/// First port tried when no override is configured. The search falls
/// forward through the range when 80 cannot be bound.
pub const DEFAULT_START_PORT: u16 = 80;

/// Upper bound of the port search when no override is configured.
pub const DEFAULT_MAX_PORT: u16 = 9000;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// First port to try when searching for a free listening port
    #[arg(long)]
    pub start_port: Option<u16>,

    /// Highest port to try before giving up
    #[arg(long)]
    pub max_port: Option<u16>,
}

/// Credentials and location of the network share holding the photos.
#[derive(Clone)]
pub struct ShareConfig {
    pub username: String,
    pub password: String,
    /// Local mount point of the share; also the existence-check target.
    pub mount_path: PathBuf,
}

// The password must never reach a log line, including via {:?}.
impl fmt::Debug for ShareConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShareConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("mount_path", &self.mount_path)
            .finish()
    }
}

/// Reverse-proxy target and path-rewrite table. Static after startup.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// Backend base URL, e.g. `http://127.0.0.1:8080`.
    pub target: String,
    /// Prefix rewrite rules applied to forwarded paths, first match wins.
    pub rewrites: Vec<(String, String)>,
}

#[derive(Debug, Clone, Copy)]
pub struct HttpConfig {
    pub start_port: u16,
    pub max_port: u16,
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub share: ShareConfig,
    pub proxy: ProxyConfig,
    pub http: HttpConfig,
}

impl GatewayConfig {
    /// Load the configuration from the environment, applying command-line
    /// overrides for the port range.
    ///
    /// # Errors
    /// Any missing required variable or unparsable port is a startup
    /// failure; the caller logs it and exits non-zero.
    pub fn from_env(args: &Args) -> Result<Self> {
        let share = ShareConfig {
            username: required("USUARIO_CARPETA")?,
            password: required("PASS_CARPETA")?,
            mount_path: PathBuf::from(required("RUTA_CARPETA")?),
        };

        let proxy = ProxyConfig {
            target: required("RUTA_APP")?,
            // The single rule observed in production is a no-op rewrite kept
            // for compatibility with the backend's routing.
            rewrites: vec![(
                "/tate/tarjeta/fotos".to_string(),
                "/tate/tarjeta/fotos".to_string(),
            )],
        };

        let http = HttpConfig {
            start_port: match args.start_port {
                Some(port) => port,
                None => optional_port("PUERTO_INICIO", DEFAULT_START_PORT)?,
            },
            max_port: match args.max_port {
                Some(port) => port,
                None => optional_port("PUERTO_MAXIMO", DEFAULT_MAX_PORT)?,
            },
        };

        Ok(Self { share, proxy, http })
    }
}

fn required(name: &str) -> Result<String> {
    env::var(name).with_context(|| format!("environment variable {} is not set", name))
}

fn optional_port(name: &str, default: u16) -> Result<u16> {
    match env::var(name) {
        Ok(value) => value
            .parse::<u16>()
            .with_context(|| format!("environment variable {} is not a valid port", name)),
        Err(_) => Ok(default),
    }
}
