//! # Foto Gateway
//!
//! A local gateway that sits between browsers and an internal application
//! server. It owns three tightly coupled concerns:
//!
//! 1. Listening-port acquisition with automatic fallback through a range
//!    ([`net`])
//! 2. Network-share connectivity: initial mount, periodic keep-alive
//!    remount, and lazy reconnect-on-demand ([`share`])
//! 3. A photo-by-national-ID storage API on that share ([`photos`])
//!
//! Everything else, WebSocket upgrades included, is forwarded verbatim to
//! the configured backend ([`proxy`]).

pub mod config;
pub mod error;
pub mod net;
pub mod photos;
pub mod proxy;
pub mod router;
pub mod share;

pub use router::AppState;
