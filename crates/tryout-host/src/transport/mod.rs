//! Transports carrying form events and views

mod stdio;
mod http;

pub use stdio::StdioTransport;
pub use http::HttpTransport;
