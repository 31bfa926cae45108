//! Trigger command handlers.

mod root_locks;
mod trigger_update;

pub use root_locks::RootLocks;
pub use trigger_update::{
    TriggerError, TriggerSettings, TriggerUpdateCommand, TriggerUpdateHandler,
    TriggerUpdateResult,
};
