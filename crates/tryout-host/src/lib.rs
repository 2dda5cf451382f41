//! # tryout-host
//!
//! Presentation host for a single "try it out" form.
//! Serves form events over stdio (line-delimited JSON) or HTTP.

pub mod protocol;
mod server;
pub mod transport;

pub use protocol::{EventHandler, FormEvent, FormView, ViewStatus};
pub use server::{HostServer, ServerMode};
pub use transport::{HttpTransport, StdioTransport};
