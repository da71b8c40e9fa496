//! # CLI entry command as a component.
//!
//! [`Command`] backs [`Supervisor::main_command`](crate::Supervisor::main_command):
//! a single component named `"main"` whose `start` simply invokes the given
//! function once. It is sugar, not a distinct mechanism — the function's
//! return triggers group-wide shutdown like any other component exit.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use tokio_util::sync::CancellationToken;

use super::component::{Component, ComponentRef};
use crate::error::ComponentError;

type CommandFn =
    Box<dyn Fn(CancellationToken) -> BoxFuture<'static, Result<(), ComponentError>> + Send + Sync>;

/// Component wrapping a one-shot main function.
pub struct Command {
    f: CommandFn,
}

impl Command {
    /// Wraps `f` into a command component.
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<(), ComponentError>> + Send + 'static,
    {
        Self {
            f: Box::new(move |ctx| Box::pin(f(ctx))),
        }
    }

    /// Wraps `f` and returns it as a shared component handle.
    pub fn arc<F, Fut>(f: F) -> ComponentRef
    where
        F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<(), ComponentError>> + Send + 'static,
    {
        Arc::new(Self::new(f))
    }
}

#[async_trait]
impl Component for Command {
    fn name(&self) -> &str {
        "main"
    }

    async fn start(&self, ctx: CancellationToken) -> Result<(), ComponentError> {
        (self.f)(ctx).await
    }
}
