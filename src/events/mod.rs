//! # Runtime events published by the call scheduler.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
