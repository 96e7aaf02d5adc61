//! # Network Share Connectivity
//!
//! Lifecycle management for the mounted share that backs the photo store:
//!
//! - [`command`]: platform mount/unmount command construction
//! - [`manager`]: mount, periodic keep-alive remount, and lazy
//!   reconnect-on-demand

pub mod command;
pub mod manager;

pub use manager::{ShareConnectionManager, ShareError, ShareStatus, KEEPALIVE_INTERVAL};
