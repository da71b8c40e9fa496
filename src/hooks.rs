//! # Hook registry: one-shot callbacks around process start and stop.
//!
//! [`Hooks`] holds two append-only, ordered callback sequences. Hooks are not
//! components — they have no `init`/`stop` pairing, only a single invocation
//! point:
//!
//! - **start hooks** run sequentially, in registration order, before any
//!   component `start` is observed; the first failure aborts startup and
//!   becomes the group's terminal error.
//! - **stop hooks** run sequentially during shutdown under the shared
//!   shutdown deadline; a failing stop hook is logged and never blocks the
//!   hooks after it.
//!
//! Registration happens during the single-threaded load phase only; `run`
//! consumes the supervisor, so there is no way to append once the group is
//! running.

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use tokio_util::sync::CancellationToken;

use crate::error::ComponentError;

/// A registered hook: receives a cancellable context, reports success or
/// failure.
///
/// Start hooks receive the root context; stop hooks receive the shutdown
/// deadline context.
pub type HookFn =
    Arc<dyn Fn(CancellationToken) -> BoxFuture<'static, Result<(), ComponentError>> + Send + Sync>;

/// Ordered start/stop hook sequences. Append-only.
#[derive(Default)]
pub struct Hooks {
    starts: Vec<HookFn>,
    stops: Vec<HookFn>,
}

impl Hooks {
    /// Appends a start hook.
    pub fn on_start<F, Fut>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), ComponentError>> + Send + 'static,
    {
        self.starts.push(Arc::new(move |ctx| Box::pin(hook(ctx))));
        self
    }

    /// Appends a stop hook.
    pub fn on_stop<F, Fut>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), ComponentError>> + Send + 'static,
    {
        self.stops.push(Arc::new(move |ctx| Box::pin(hook(ctx))));
        self
    }

    /// Number of registered start hooks.
    pub fn start_count(&self) -> usize {
        self.starts.len()
    }

    /// Number of registered stop hooks.
    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    pub(crate) fn start_hooks(&self) -> Vec<HookFn> {
        self.starts.clone()
    }

    pub(crate) fn stop_hooks(&self) -> Vec<HookFn> {
        self.stops.clone()
    }
}
