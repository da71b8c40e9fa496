//! # Component abstraction and function-backed implementation.
//!
//! This module defines the [`Component`] trait — the lifecycle contract every
//! managed unit satisfies — and a convenient closure-backed implementation
//! [`ComponentFn`]. The common handle type is [`ComponentRef`], an
//! `Arc<dyn Component>` suitable for sharing across the runtime.
//!
//! ## Lifecycle
//! ```text
//! load:  init(&Supervisor)        — once, awaited in registration order,
//!                                   before any start is scheduled
//! run:   start(ctx)               — once, on its own task; blocks for the
//!                                   component's operational lifetime
//! stop:  stop(ctx)                — at most once, when shutdown begins;
//!                                   ctx is cancelled at the shutdown deadline
//! ```
//!
//! Any return from `start` — `Ok` included — means "this component has
//! exited" and triggers group-wide shutdown. There is no optional component
//! whose exit is ignored.

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::core::Supervisor;
use crate::error::ComponentError;
use crate::health::HealthRef;

/// # A managed unit of work with an `init` → `start` → `stop` lifecycle.
///
/// Implementors should regularly check the cancellation token handed to
/// [`start`](Component::start) and exit promptly during shutdown.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use tokio_util::sync::CancellationToken;
/// use convoy::{Component, ComponentError};
///
/// struct Ticker;
///
/// #[async_trait]
/// impl Component for Ticker {
///     fn name(&self) -> &str {
///         "ticker"
///     }
///
///     async fn start(&self, ctx: CancellationToken) -> Result<(), ComponentError> {
///         ctx.cancelled().await;
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Component: Send + Sync + 'static {
    /// Returns a stable, human-readable component identity.
    fn name(&self) -> &str;

    /// One-time setup with access to the supervisor's configurer and logger.
    ///
    /// Called exactly once, awaited in registration order, before any actor
    /// is scheduled. A failure aborts the whole load batch — no partial
    /// startup.
    async fn init(&self, sup: &Supervisor) -> Result<(), ComponentError> {
        let _ = sup;
        Ok(())
    }

    /// Blocks for the component's operational lifetime.
    ///
    /// Returning — with or without an error — is interpreted as "this
    /// component has exited" and triggers shutdown of the whole group. The
    /// token is cancelled when the group shuts down.
    async fn start(&self, ctx: CancellationToken) -> Result<(), ComponentError>;

    /// Invoked at most once, when shutdown begins, concurrently with other
    /// components' stops.
    ///
    /// `ctx` is cancelled when the shutdown deadline elapses. Stop failures
    /// are observational only: log them, do not propagate.
    async fn stop(&self, ctx: CancellationToken) {
        let _ = ctx;
    }

    /// Optional health-check capability.
    ///
    /// Checked exactly once at load time; a `Some` probe is registered into
    /// the supervisor's health aggregation.
    fn health_check(&self) -> Option<HealthRef> {
        None
    }
}

/// Shared handle to a component.
pub type ComponentRef = Arc<dyn Component>;

/// Function-backed component.
///
/// Wraps a closure that *creates* a fresh `start` future per invocation, so
/// no shared mutable state is implied; share state explicitly via `Arc`
/// inside the closure when needed. `init` and `stop` keep their default
/// no-op implementations.
#[derive(Debug)]
pub struct ComponentFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> ComponentFn<F> {
    /// Creates a new function-backed component.
    ///
    /// Prefer [`ComponentFn::arc`] when you immediately need a
    /// [`ComponentRef`].
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the component and returns it as a shared handle.
    ///
    /// ## Example
    /// ```
    /// use tokio_util::sync::CancellationToken;
    /// use convoy::{Component, ComponentError, ComponentFn, ComponentRef};
    ///
    /// let c: ComponentRef = ComponentFn::arc("worker", |ctx: CancellationToken| async move {
    ///     ctx.cancelled().await;
    ///     Ok::<_, ComponentError>(())
    /// });
    /// assert_eq!(c.name(), "worker");
    /// ```
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<F, Fut> Component for ComponentFn<F>
where
    F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), ComponentError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn start(&self, ctx: CancellationToken) -> Result<(), ComponentError> {
        (self.f)(ctx).await
    }
}
