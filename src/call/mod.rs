//! # Callback adaptation and the per-invocation attempt loop.

mod completion;
pub(crate) mod controller;
mod op;

pub use completion::Completion;
pub use op::{CallFn, CallRef, CallbackOp};
