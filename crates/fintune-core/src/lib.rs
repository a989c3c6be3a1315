//! Fintune Core
//!
//! The boundary surface of the fine-tuning service, consumed by the HTTP/API
//! layer (which lives elsewhere):
//! - `Settings` — environment-driven configuration
//! - `FineTuneService` — prepare, fine-tune, evaluate, infer, status
//! - `StatusStore` — the Idle/Running/Completed/Failed state machine

pub mod config;
pub mod error;
pub mod logging;
pub mod service;
pub mod status;

pub use config::Settings;
pub use error::{ServiceError, ServiceResult};
pub use logging::init_tracing;
pub use service::FineTuneService;
pub use status::{StatusSnapshot, StatusStore, TuneState};
