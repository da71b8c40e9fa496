//! # Actor group: first-to-finish-wins concurrent execution engine.
//!
//! An [`Actor`] is a pair of an `execute` future that blocks until its unit
//! of work is done and an `interrupt` function that must cause a blocked
//! `execute` to return promptly. [`Group::run`] drives every actor
//! concurrently and coordinates the shutdown hand-off.
//!
//! ## Semantics
//! ```text
//! run():
//!   spawn every execute on its own task
//!        │
//!        ▼
//!   wait for the FIRST execute to return ──► its result is the group result
//!        │                                   (Ok counts; panic maps to
//!        ▼                                    ActorPanicked)
//!   call EVERY actor's interrupt exactly once,
//!   driving the returned futures concurrently
//!        │
//!        ▼
//!   join ALL remaining executes and ALL interrupts   (join barrier)
//!        │
//!        ▼
//!   return the first result; every other result is discarded
//! ```
//!
//! ## Rules
//! - No interrupt runs before some execute has returned.
//! - No execute is still running once `run` returns.
//! - Each interrupt is invoked exactly once, including the actor that
//!   already returned (implementations treat that as an idempotent no-op).
//! - A slow interrupt cannot delay cancellation signaling to other actors.
//! - An empty group completes immediately with `Ok(())`.

use futures::future::BoxFuture;
use std::future::Future;
use tokio::task::JoinSet;

use crate::error::RuntimeError;

type ExecuteFuture = BoxFuture<'static, Result<(), RuntimeError>>;
type InterruptFn = Box<dyn FnOnce(Option<&RuntimeError>) -> BoxFuture<'static, ()> + Send>;

/// A concurrently-run `(execute, interrupt)` pair.
///
/// `interrupt` receives the group's terminal error (`None` when the first
/// actor exited cleanly), borrowed only while the interrupt builds the
/// future it returns.
pub struct Actor {
    execute: ExecuteFuture,
    interrupt: InterruptFn,
}

impl Actor {
    /// Creates an actor from an execute future and an interrupt function.
    pub fn new<E, I>(execute: E, interrupt: I) -> Self
    where
        E: Future<Output = Result<(), RuntimeError>> + Send + 'static,
        I: FnOnce(Option<&RuntimeError>) -> BoxFuture<'static, ()> + Send + 'static,
    {
        Self {
            execute: Box::pin(execute),
            interrupt: Box::new(interrupt),
        }
    }
}

/// The set of actors run as one unit.
#[derive(Default)]
pub struct Group {
    actors: Vec<Actor>,
}

impl Group {
    /// Creates an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an actor. Has no effect on a group that already ran.
    pub fn add(&mut self, actor: Actor) {
        self.actors.push(actor);
    }

    /// Number of registered actors.
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    /// True if no actor is registered.
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// Runs all actors until the first one finishes, then interrupts the
    /// rest and waits for everyone.
    ///
    /// Returns the first finisher's result — `Ok(())` included. All other
    /// results are discarded, but every execute and every interrupt is
    /// awaited before this returns.
    pub async fn run(self) -> Result<(), RuntimeError> {
        if self.actors.is_empty() {
            return Ok(());
        }

        let mut executes = JoinSet::new();
        let mut interrupts = Vec::with_capacity(self.actors.len());
        for actor in self.actors {
            interrupts.push(actor.interrupt);
            executes.spawn(actor.execute);
        }

        // First finisher decides the group result.
        let first = match executes.join_next().await {
            Some(Ok(result)) => result,
            Some(Err(join_err)) => Err(RuntimeError::ActorPanicked {
                message: join_err.to_string(),
            }),
            None => return Ok(()),
        };

        // Fan out interrupts; the futures they return run concurrently so a
        // slow interrupt cannot delay the others.
        let mut fanout = JoinSet::new();
        let terminal = first.as_ref().err();
        for interrupt in interrupts {
            fanout.spawn(interrupt(terminal));
        }

        // Join barrier: shutdown is not complete while any actor unwinds.
        while let Some(result) = executes.join_next().await {
            let _ = result;
        }
        while let Some(result) = fanout.join_next().await {
            let _ = result;
        }

        first
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ComponentError;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    fn blocking_actor(
        token: CancellationToken,
        interrupted: Arc<AtomicUsize>,
    ) -> Actor {
        let exec_token = token.clone();
        Actor::new(
            async move {
                exec_token.cancelled().await;
                Ok(())
            },
            move |_err| {
                Box::pin(async move {
                    interrupted.fetch_add(1, Ordering::SeqCst);
                    token.cancel();
                })
            },
        )
    }

    #[tokio::test]
    async fn empty_group_returns_ok() {
        assert!(Group::new().run().await.is_ok());
    }

    #[tokio::test]
    async fn first_error_wins_and_everyone_is_interrupted_once() {
        let mut group = Group::new();
        let counters: Vec<Arc<AtomicUsize>> =
            (0..3).map(|_| Arc::new(AtomicUsize::new(0))).collect();

        for counter in &counters {
            group.add(blocking_actor(CancellationToken::new(), counter.clone()));
        }

        let failing = Arc::new(AtomicUsize::new(0));
        {
            let failing = failing.clone();
            group.add(Actor::new(
                async {
                    Err(RuntimeError::Component {
                        component: "boom".into(),
                        source: ComponentError::fail("exploded"),
                    })
                },
                move |err| {
                    // The failed actor still observes its own error.
                    assert!(err.is_some());
                    let failing = failing.clone();
                    Box::pin(async move {
                        failing.fetch_add(1, Ordering::SeqCst);
                    })
                },
            ));
        }

        let result = group.run().await;
        let err = result.unwrap_err();
        assert_eq!(err.as_label(), "runtime_component_failed");

        for counter in &counters {
            assert_eq!(counter.load(Ordering::SeqCst), 1);
        }
        assert_eq!(failing.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn clean_first_exit_still_shuts_the_group_down() {
        let mut group = Group::new();
        let interrupted = Arc::new(AtomicUsize::new(0));
        group.add(blocking_actor(CancellationToken::new(), interrupted.clone()));
        group.add(Actor::new(async { Ok(()) }, |err| {
            assert!(err.is_none());
            Box::pin(async {})
        }));

        assert!(group.run().await.is_ok());
        assert_eq!(interrupted.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn run_waits_for_slow_unwinders() {
        let mut group = Group::new();
        let unwound = Arc::new(AtomicBool::new(false));

        let token = CancellationToken::new();
        {
            let token = token.clone();
            let unwound = unwound.clone();
            group.add(Actor::new(
                {
                    let token = token.clone();
                    async move {
                        token.cancelled().await;
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        unwound.store(true, Ordering::SeqCst);
                        Ok(())
                    }
                },
                {
                    let token = token.clone();
                    move |_err| {
                        Box::pin(async move {
                            token.cancel();
                        })
                    }
                },
            ));
        }
        group.add(Actor::new(async { Ok(()) }, |_err| Box::pin(async {})));

        assert!(group.run().await.is_ok());
        assert!(
            unwound.load(Ordering::SeqCst),
            "run returned before a slow actor finished unwinding"
        );
    }

    #[tokio::test]
    async fn slow_interrupt_does_not_delay_others() {
        let mut group = Group::new();
        let fast_interrupted = Arc::new(AtomicBool::new(false));

        let slow_gate = CancellationToken::new();
        {
            // This actor's interrupt stalls until the fast one has run.
            let slow_gate = slow_gate.clone();
            let token = CancellationToken::new();
            let exec_token = token.clone();
            group.add(Actor::new(
                async move {
                    exec_token.cancelled().await;
                    Ok(())
                },
                move |_err| {
                    Box::pin(async move {
                        slow_gate.cancelled().await;
                        token.cancel();
                    })
                },
            ));
        }
        {
            let fast_interrupted = fast_interrupted.clone();
            let token = CancellationToken::new();
            let exec_token = token.clone();
            group.add(Actor::new(
                async move {
                    exec_token.cancelled().await;
                    Ok(())
                },
                move |_err| {
                    Box::pin(async move {
                        fast_interrupted.store(true, Ordering::SeqCst);
                        // Unblock the slow interrupt only after this one ran.
                        slow_gate.cancel();
                        token.cancel();
                    })
                },
            ));
        }
        group.add(Actor::new(async { Ok(()) }, |_err| Box::pin(async {})));

        assert!(group.run().await.is_ok());
        assert!(fast_interrupted.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn panicking_actor_becomes_the_terminal_error() {
        let mut group = Group::new();
        let interrupted = Arc::new(AtomicUsize::new(0));
        group.add(blocking_actor(CancellationToken::new(), interrupted.clone()));
        group.add(Actor::new(
            async {
                panic!("actor blew up");
            },
            |_err| Box::pin(async {}),
        ));

        let err = group.run().await.unwrap_err();
        assert_eq!(err.as_label(), "runtime_actor_panicked");
        assert_eq!(interrupted.load(Ordering::SeqCst), 1);
    }
}
