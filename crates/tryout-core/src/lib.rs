//! # tryout-core
//!
//! Core form engine for tryout:
//! - Field extraction from a single OpenAPI operation
//! - Form state with a validation gate in front of every send
//! - Request planning and dispatch with displayable response snapshots

pub mod dispatch;
pub mod error;
pub mod extractor;
pub mod field;
pub mod form;
pub mod settings;

pub use dispatch::{Dispatcher, RequestPlan, RequestStrategy, ResponseSnapshot};
pub use error::{FormError, FormResult};
pub use extractor::FieldExtractor;
pub use field::{FieldDescriptor, FieldLocation, Validator};
pub use form::{mount, FormMount, FormPhase, FormStore, SendTicket};
pub use openapi_parser::{HttpMethod, OperationDescriptor};
pub use settings::{Settings, SettingsManager};
