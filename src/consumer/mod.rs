//! Consumption side: queue watching, event routing, idempotent handlers.

pub mod dispatch;
pub mod registrar;
pub mod updater;

pub use dispatch::{DispatchConfig, Dispatcher};

/// Queue carrying "new emergency" registration events.
pub const REGISTER_QUEUE: &str = "registro_emergencias";

/// Queue carrying "extinguished" events.
pub const EXTINGUISH_QUEUE: &str = "apagar_emergencias";
