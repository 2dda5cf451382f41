//! Request planning and execution

mod executor;
mod plan;
mod response;
mod strategy;

pub use executor::Dispatcher;
pub use plan::RequestPlan;
pub use response::ResponseSnapshot;
pub use strategy::{strategy_for, MediaKind, RequestStrategy};
