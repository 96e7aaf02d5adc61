//! # Listening-Port Acquisition
//!
//! - [`port`]: sequential probing for a free TCP port in a range
//! - [`bootstrap`]: the `Searching → Binding → Listening` state machine that
//!   turns a candidate port into a real listener, retrying on bind races

pub mod bootstrap;
pub mod port;

pub use bootstrap::{bind_listener, BootstrapError};
pub use port::{find_available_port, PortError};
