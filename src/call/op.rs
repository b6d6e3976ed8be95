//! # Operation seam and function-backed implementation.
//!
//! This module defines the [`CallbackOp`] trait (the callback-style remote
//! operation the scheduler adapts) and a convenient function-backed
//! implementation [`CallFn`]. The common handle type is [`CallRef`], an
//! `Arc<dyn CallbackOp>` suitable for sharing across schedulers.
//!
//! An operation receives its natural arguments plus a [`Completion`] handle
//! and must eventually settle that handle exactly once — or return an error
//! from `dispatch` itself, which the scheduler treats as an immediate
//! terminal failure.

use std::{borrow::Cow, marker::PhantomData, sync::Mutex};

use crate::call::completion::Completion;
use crate::error::RawFailure;

/// # Shared handle to a callback-style operation.
pub type CallRef<A, T> = std::sync::Arc<dyn CallbackOp<Args = A, Output = T>>;

/// # A callback-style remote operation.
///
/// `dispatch` is synchronous: it registers the work and returns. Completion
/// is reported later through the [`Completion`] handle — from a spawned
/// task, an I/O callback, or even synchronously inside `dispatch` itself.
/// Returning `Err` from `dispatch` models an operation that fails before
/// any callback can fire; the scheduler settles immediately and never
/// retries that failure.
///
/// `Args` must be `Clone` because a retried invocation re-dispatches with
/// the original arguments.
///
/// # Example
/// ```
/// use redial::{CallbackOp, Completion, RawFailure};
///
/// struct Echo;
///
/// impl CallbackOp for Echo {
///     type Args = String;
///     type Output = String;
///
///     fn name(&self) -> &str { "echo" }
///
///     fn dispatch(&self, args: String, done: Completion<String>) -> Result<(), RawFailure> {
///         done.resolve(args);
///         Ok(())
///     }
/// }
/// ```
pub trait CallbackOp: Send + Sync + 'static {
    /// Positional arguments of the operation (without the callback).
    type Args: Clone + Send + 'static;
    /// Successful result type.
    type Output: Send + 'static;

    /// Returns a stable, human-readable operation name.
    fn name(&self) -> &str;

    /// Dispatches one underlying attempt.
    ///
    /// Must settle `done` exactly once, or return `Err` without settling.
    /// A superseded attempt's late settlement is discarded by the scheduler;
    /// see the crate docs for the duplicate-side-effect caveat.
    fn dispatch(&self, args: Self::Args, done: Completion<Self::Output>)
        -> Result<(), RawFailure>;
}

/// # Function-backed operation implementation.
///
/// [`CallFn`] wraps a closure `Fnc: FnMut(Args, Completion<Output>) ->
/// Result<(), RawFailure>`. The closure is protected by a [`Mutex`] to allow
/// calling `dispatch(&self, ...)` even though the closure is `FnMut`; the
/// lock is held only while the closure runs, which by contract registers the
/// work and returns quickly.
///
/// # Example
/// ```
/// use redial::{CallFn, RawFailure};
///
/// let op = CallFn::new("double", |n: u32, done| {
///     done.resolve(n * 2);
///     Ok(())
/// });
/// ```
#[derive(Debug)]
pub struct CallFn<Fnc, A, T>
where
    Fnc: FnMut(A, Completion<T>) -> Result<(), RawFailure> + Send + 'static,
    A: Clone + Send + 'static,
    T: Send + 'static,
{
    /// Stable operation name.
    name: Cow<'static, str>,
    /// Underlying function (guarded by a mutex to allow `FnMut` with `&self`).
    func: Mutex<Fnc>,
    _marker: PhantomData<fn(A) -> T>,
}

impl<Fnc, A, T> CallFn<Fnc, A, T>
where
    Fnc: FnMut(A, Completion<T>) -> Result<(), RawFailure> + Send + 'static,
    A: Clone + Send + 'static,
    T: Send + 'static,
{
    /// Creates a new function-backed operation.
    ///
    /// Prefer [`CallFn::arc`] when you immediately need a [`CallRef`].
    pub fn new(name: impl Into<Cow<'static, str>>, func: Fnc) -> Self {
        Self {
            name: name.into(),
            func: Mutex::new(func),
            _marker: PhantomData,
        }
    }

    /// Creates the operation and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, func: Fnc) -> CallRef<A, T> {
        std::sync::Arc::new(Self::new(name, func))
    }
}

impl<Fnc, A, T> CallbackOp for CallFn<Fnc, A, T>
where
    Fnc: FnMut(A, Completion<T>) -> Result<(), RawFailure> + Send + 'static,
    A: Clone + Send + 'static,
    T: Send + 'static,
{
    type Args = A;
    type Output = T;

    fn name(&self) -> &str {
        &self.name
    }

    fn dispatch(&self, args: A, done: Completion<T>) -> Result<(), RawFailure> {
        let mut func = self
            .func
            .lock()
            .map_err(|_| RawFailure::new("operation closure mutex poisoned"))?;
        (func)(args, done)
    }
}

impl<O: CallbackOp + ?Sized> CallbackOp for std::sync::Arc<O> {
    type Args = O::Args;
    type Output = O::Output;

    fn name(&self) -> &str {
        (**self).name()
    }

    fn dispatch(
        &self,
        args: Self::Args,
        done: Completion<Self::Output>,
    ) -> Result<(), RawFailure> {
        (**self).dispatch(args, done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn call_fn_dispatches_through_closure() {
        let op = CallFn::new("double", |n: u32, done: Completion<u32>| {
            done.resolve(n * 2);
            Ok(())
        });
        assert_eq!(op.name(), "double");

        let (done, rx) = Completion::channel();
        op.dispatch(21, done).unwrap();
        assert_eq!(rx.await.unwrap(), Ok(42));
    }

    #[tokio::test]
    async fn call_fn_may_fail_synchronously() {
        let op = CallFn::new("broken", |_: (), _done: Completion<u32>| {
            Err(RawFailure::new("refused to dispatch"))
        });
        let (done, _rx) = Completion::channel();
        let err = op.dispatch((), done).unwrap_err();
        assert_eq!(err.message, "refused to dispatch");
    }

    #[tokio::test]
    async fn arc_handle_is_an_operation_too() {
        let op: CallRef<u32, u32> = CallFn::arc("inc", |n: u32, done: Completion<u32>| {
            done.resolve(n + 1);
            Ok(())
        });
        let (done, rx) = Completion::channel();
        op.dispatch(1, done).unwrap();
        assert_eq!(rx.await.unwrap(), Ok(2));
    }
}
