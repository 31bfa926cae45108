//! Application handlers.
//!
//! Command handlers that orchestrate calls into the CI server ports.

pub mod trigger;

pub use trigger::{
    RootLocks, TriggerError, TriggerSettings, TriggerUpdateCommand, TriggerUpdateHandler,
    TriggerUpdateResult,
};
