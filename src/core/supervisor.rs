//! # Supervisor: loads components, orchestrates the actor group, and drives
//! graceful shutdown.
//!
//! The [`Supervisor`] owns the root cancellation context, the hook registry,
//! the health aggregation, and the external configuration collaborator. It
//! expands producers into component instances, initializes every component
//! strictly in registration order, wraps each one into an actor, and runs the
//! whole set until the first exit.
//!
//! ## High-level architecture
//! ```text
//! Inputs:
//!   hooks().on_start/on_stop(...)      load(components)
//!   load_from_producer(producers)      main_command(f)
//!
//! Load phase (single-threaded, in registration order):
//!   producer ──► instances × component()
//!   component ──► init(&Supervisor)    (failure aborts the batch)
//!             ──► health_check()       (Some ─► health aggregation)
//!             ──► Actor { execute: gate ─► start(child_token)
//!                         interrupt: deadline ─► stop(stop_token) ─► cancel }
//!
//! Run phase:
//!   + start-hook actor  (hooks in order; first failure = terminal error;
//!                        success opens the start gate, then waits for the
//!                        root context)
//!   + signal actor      (root context or SIGINT/SIGTERM; interrupt runs
//!                        stop hooks under the shutdown deadline)
//!   Group::run()        (first finisher wins, fan-out interrupt, join all)
//! ```
//!
//! ## Rules
//! - `init` calls are sequential and complete before any `start` is
//!   scheduled; `start`s have no relative ordering among themselves.
//! - Component `start` is gated on every start hook succeeding.
//! - `stop`s run concurrently and all observe the same shutdown deadline.
//! - The root context is the single shutdown source: cancelled by
//!   [`Supervisor::close`], by a termination signal, or implicitly when any
//!   actor exits.
//! - `run` consumes the supervisor, so registration after startup is a
//!   compile error rather than a runtime hazard.
//!
//! ## Example
//! ```no_run
//! use tokio_util::sync::CancellationToken;
//! use convoy::{ComponentError, ComponentFn, Config, Supervisor};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), convoy::RuntimeError> {
//!     let mut sup = Supervisor::new(Config::default())?;
//!
//!     let worker = ComponentFn::arc("worker", |ctx: CancellationToken| async move {
//!         ctx.cancelled().await;
//!         Ok::<_, ComponentError>(())
//!     });
//!     sup.load(vec![worker]).await?;
//!
//!     // Blocks until a termination signal or the first component exit.
//!     sup.run().await
//! }
//! ```

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use crate::components::{Command, Component, ComponentRef, ProducerRef};
use crate::config::Config;
use crate::configurer::Configurer;
use crate::core::group::{Actor, Group};
use crate::core::shutdown::{self, Deadline};
use crate::error::{ComponentError, RuntimeError};
use crate::health::HealthEntry;
use crate::hooks::Hooks;

/// Coordinates component lifecycle, hook execution, and bounded-time
/// graceful shutdown.
pub struct Supervisor {
    cfg: Config,
    ctx: CancellationToken,
    hooks: Hooks,
    group: Group,
    health: Vec<HealthEntry>,
    configurer: Configurer,
    deadline: Deadline,
    gate: watch::Sender<bool>,
}

impl Supervisor {
    /// Creates a supervisor: normalizes the configuration, initializes the
    /// tracing subscriber, builds the configurer from the configured sources,
    /// and merges the property overrides exactly once.
    pub fn new(cfg: Config) -> Result<Self, RuntimeError> {
        let cfg = cfg.ensure_defaults();
        init_tracing(&cfg.log_level);

        let mut configurer = match &cfg.config_file {
            Some(file) => Configurer::from_file(file, cfg.config_format)?,
            None => Configurer::from_dirs(&cfg.config_dirs, cfg.config_format)?,
        };
        configurer.merge(&cfg.properties)?;

        let deadline = Deadline::new(cfg.shutdown_timeout);
        let (gate, _) = watch::channel(false);

        Ok(Self {
            ctx: CancellationToken::new(),
            hooks: Hooks::default(),
            group: Group::new(),
            health: Vec::new(),
            configurer,
            deadline,
            gate,
            cfg,
        })
    }

    /// The hook registry. Registration is only possible before [`run`](Self::run).
    pub fn hooks(&mut self) -> &mut Hooks {
        &mut self.hooks
    }

    /// The external configuration collaborator.
    pub fn config(&self) -> &Configurer {
        &self.configurer
    }

    /// The runtime options this supervisor was created with.
    pub fn options(&self) -> &Config {
        &self.cfg
    }

    /// A clone of the root cancellation context.
    ///
    /// Cancelling it is equivalent to [`close`](Self::close); embedders and
    /// tests keep a clone around to stop a running supervisor.
    pub fn context(&self) -> CancellationToken {
        self.ctx.clone()
    }

    /// Cancels the root context, asking the whole group to shut down.
    pub fn close(&self) {
        self.ctx.cancel();
    }

    /// A scoped logger span carrying the component identity.
    ///
    /// Components grab their span during `init` and enter it around their
    /// work; ambient logging state is never mutated on their behalf.
    pub fn logger(&self, component: &str) -> tracing::Span {
        tracing::info_span!("component", app = %self.cfg.name, component = %component)
    }

    /// Snapshot of every health probe collected so far.
    ///
    /// The collection is complete once loading is done and read-only after;
    /// pollers capture the snapshot during their own `init`.
    pub fn health_checks(&self) -> Vec<HealthEntry> {
        self.health.clone()
    }

    /// Loads components: initializes each in registration order, then wraps
    /// it into an actor scheduled at [`run`](Self::run).
    ///
    /// The first `init` failure aborts the batch before any actor is
    /// scheduled. Components initialized earlier in the same batch are left
    /// initialized and un-stopped (their `stop` contract only covers
    /// shutdown after startup).
    pub async fn load(&mut self, components: Vec<ComponentRef>) -> Result<(), RuntimeError> {
        for component in components {
            if let Err(source) = component.init(&*self).await {
                return Err(RuntimeError::Init {
                    component: component.name().to_string(),
                    source,
                });
            }
            if let Some(probe) = component.health_check() {
                self.health
                    .push(HealthEntry::new(component.name(), probe));
            }
            let actor = self.component_actor(component);
            self.group.add(actor);
        }
        Ok(())
    }

    /// Expands each producer into `instances` components and loads the
    /// resulting batch — same semantics as [`load`](Self::load).
    pub async fn load_from_producer(
        &mut self,
        producers: Vec<ProducerRef>,
    ) -> Result<(), RuntimeError> {
        for producer in producers {
            let options = producer.options().ensure_defaults();
            let mut batch = Vec::with_capacity(options.instances);
            for _ in 0..options.instances {
                batch.push(producer.component());
            }
            self.load(batch).await?;
        }
        Ok(())
    }

    /// Registers a single component named `"main"` whose `start` invokes
    /// `f` once. Sugar for CLI-driven entry points.
    pub async fn main_command<F, Fut>(&mut self, f: F) -> Result<(), RuntimeError>
    where
        F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), ComponentError>> + Send + 'static,
    {
        self.load(vec![Command::arc(f)]).await
    }

    /// Runs the group until the first actor exits, then drives the
    /// interrupt fan-out and returns the first actor's result.
    ///
    /// Two extra actors are always added: the start-hook runner and the
    /// signal/deadline watcher. Consumes the supervisor; keep a
    /// [`context`](Self::context) clone to stop it from outside.
    pub async fn run(self) -> Result<(), RuntimeError> {
        let Supervisor {
            cfg,
            ctx,
            hooks,
            mut group,
            deadline,
            gate,
            ..
        } = self;

        tracing::info!(name = %cfg.name, "starting");
        group.add(Self::hook_actor(&ctx, &hooks, gate));
        group.add(Self::signal_actor(&ctx, &hooks, &deadline));
        group.run().await
    }

    /// Builds the actor pair for one initialized component.
    fn component_actor(&self, component: ComponentRef) -> Actor {
        let name = component.name().to_string();
        let child = self.ctx.child_token();

        let mut gate = self.gate.subscribe();
        let exec_name = name.clone();
        let exec_component = Arc::clone(&component);
        let exec_child = child.clone();
        let execute = async move {
            tokio::select! {
                opened = gate.wait_for(|open| *open) => {
                    if opened.is_err() {
                        // Startup was aborted before the gate opened.
                        return Ok(());
                    }
                }
                _ = exec_child.cancelled() => return Ok(()),
            }
            tracing::debug!(component = %exec_name, "component starting");
            exec_component
                .start(exec_child)
                .await
                .map_err(|source| RuntimeError::Component {
                    component: exec_name,
                    source,
                })
        };

        let deadline = self.deadline.clone();
        let interrupt = move |_err: Option<&RuntimeError>| -> BoxFuture<'static, ()> {
            Box::pin(async move {
                let stop_ctx = deadline.arm();
                tracing::debug!(component = %name, "component stopping");
                component.stop(stop_ctx).await;
                child.cancel();
            })
        };

        Actor::new(execute, interrupt)
    }

    /// Builds the start-hook actor: hooks in order, first failure is the
    /// terminal error; success opens the start gate; its normal lifetime
    /// equals the process lifetime.
    fn hook_actor(root: &CancellationToken, hooks: &Hooks, gate: watch::Sender<bool>) -> Actor {
        let starts = hooks.start_hooks();
        let ctx = root.clone();
        let execute = async move {
            tracing::debug!(hooks = starts.len(), "running start hooks");
            for (index, hook) in starts.into_iter().enumerate() {
                if let Err(source) = hook(ctx.clone()).await {
                    return Err(RuntimeError::StartHook { index, source });
                }
            }
            let _ = gate.send(true);
            ctx.cancelled().await;
            Ok(())
        };

        let ctx = root.clone();
        let interrupt = move |_err: Option<&RuntimeError>| -> BoxFuture<'static, ()> {
            Box::pin(async move {
                ctx.cancel();
            })
        };

        Actor::new(execute, interrupt)
    }

    /// Builds the signal actor: waits for the root context or an OS
    /// termination signal; its interrupt arms the shutdown deadline and runs
    /// the stop hooks against it, logging (never propagating) failures.
    fn signal_actor(root: &CancellationToken, hooks: &Hooks, deadline: &Deadline) -> Actor {
        let ctx = root.clone();
        let execute = async move {
            tokio::select! {
                _ = ctx.cancelled() => Ok(()),
                listened = shutdown::wait_for_shutdown_signal() => {
                    listened.map_err(RuntimeError::Signal)
                }
            }
        };

        let stops = hooks.stop_hooks();
        let deadline = deadline.clone();
        let interrupt = move |_err: Option<&RuntimeError>| -> BoxFuture<'static, ()> {
            Box::pin(async move {
                tracing::info!("shutting down");
                let stop_ctx = deadline.arm();
                for (index, hook) in stops.into_iter().enumerate() {
                    if let Err(error) = hook(stop_ctx.clone()).await {
                        tracing::error!(index, error = %error, "stop hook failed");
                    }
                }
            })
        };

        Actor::new(execute, interrupt)
    }
}

/// Installs the global fmt subscriber once; `RUST_LOG` wins over the
/// configured level. Later calls are no-ops so embedded/test supervisors
/// never fight over ambient logging state.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{ComponentFn, ProducerFn, ProducerOptions};
    use crate::health::{HealthCheck, HealthRef};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    fn test_config() -> Config {
        Config {
            shutdown_timeout: Duration::from_millis(200),
            ..Config::default()
        }
    }

    /// Blocks in `start` until cancelled; counts `stop` invocations.
    struct Steady {
        name: &'static str,
        started: Arc<AtomicBool>,
        stopped: Arc<AtomicUsize>,
    }

    impl Steady {
        fn new(name: &'static str) -> (Arc<Self>, Arc<AtomicBool>, Arc<AtomicUsize>) {
            let started = Arc::new(AtomicBool::new(false));
            let stopped = Arc::new(AtomicUsize::new(0));
            let c = Arc::new(Self {
                name,
                started: started.clone(),
                stopped: stopped.clone(),
            });
            (c, started, stopped)
        }
    }

    #[async_trait]
    impl Component for Steady {
        fn name(&self) -> &str {
            self.name
        }

        async fn start(&self, ctx: CancellationToken) -> Result<(), ComponentError> {
            self.started.store(true, Ordering::SeqCst);
            ctx.cancelled().await;
            Ok(())
        }

        async fn stop(&self, _ctx: CancellationToken) {
            self.stopped.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Fails `start` immediately.
    struct Faulty;

    #[async_trait]
    impl Component for Faulty {
        fn name(&self) -> &str {
            "faulty"
        }

        async fn start(&self, _ctx: CancellationToken) -> Result<(), ComponentError> {
            Err(ComponentError::fail("wire tripped"))
        }
    }

    /// Records the order its `init` ran in.
    struct OrderedInit {
        name: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
        fail: bool,
    }

    #[async_trait]
    impl Component for OrderedInit {
        fn name(&self) -> &str {
            self.name
        }

        async fn init(&self, _sup: &Supervisor) -> Result<(), ComponentError> {
            self.log.lock().unwrap().push(self.name);
            if self.fail {
                return Err(ComponentError::fail("init refused"));
            }
            Ok(())
        }

        async fn start(&self, ctx: CancellationToken) -> Result<(), ComponentError> {
            ctx.cancelled().await;
            Ok(())
        }
    }

    struct AlwaysHealthy;

    #[async_trait]
    impl HealthCheck for AlwaysHealthy {
        async fn check(&self) -> Result<(), ComponentError> {
            Ok(())
        }
    }

    /// Exposes a health probe.
    struct Probed;

    #[async_trait]
    impl Component for Probed {
        fn name(&self) -> &str {
            "probed"
        }

        async fn start(&self, ctx: CancellationToken) -> Result<(), ComponentError> {
            ctx.cancelled().await;
            Ok(())
        }

        fn health_check(&self) -> Option<HealthRef> {
            Some(Arc::new(AlwaysHealthy))
        }
    }

    #[tokio::test]
    async fn close_shuts_down_a_blocking_component() {
        let mut sup = Supervisor::new(test_config()).unwrap();
        let (steady, _, stopped) = Steady::new("steady");
        sup.load(vec![steady]).await.unwrap();

        let ctx = sup.context();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            ctx.cancel();
        });

        let result = tokio::time::timeout(Duration::from_secs(2), sup.run())
            .await
            .expect("run did not finish within the shutdown window");
        assert!(result.is_ok());
        assert_eq!(stopped.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn first_component_error_is_the_terminal_result() {
        let mut sup = Supervisor::new(test_config()).unwrap();
        let (steady, _, stopped) = Steady::new("steady");
        sup.load(vec![Arc::new(Faulty), steady]).await.unwrap();

        let err = sup.run().await.unwrap_err();
        match err {
            RuntimeError::Component { component, source } => {
                assert_eq!(component, "faulty");
                assert_eq!(source.to_string(), "execution failed: wire tripped");
            }
            other => panic!("unexpected error: {other}"),
        }
        // The surviving component was stopped before run returned.
        assert_eq!(stopped.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failing_start_hook_keeps_components_from_starting() {
        let mut sup = Supervisor::new(test_config()).unwrap();
        let (steady, started, _) = Steady::new("steady");
        sup.load(vec![steady]).await.unwrap();
        sup.hooks()
            .on_start(|_ctx| async { Err(ComponentError::fail("warmup failed")) });

        let err = sup.run().await.unwrap_err();
        match err {
            RuntimeError::StartHook { index, .. } => assert_eq!(index, 0),
            other => panic!("unexpected error: {other}"),
        }
        assert!(
            !started.load(Ordering::SeqCst),
            "component start ran despite a failed start hook"
        );
    }

    #[tokio::test]
    async fn start_hooks_short_circuit_on_first_failure() {
        let mut sup = Supervisor::new(test_config()).unwrap();
        let second_ran = Arc::new(AtomicBool::new(false));
        sup.hooks()
            .on_start(|_ctx| async { Err(ComponentError::fail("first")) });
        {
            let second_ran = second_ran.clone();
            sup.hooks().on_start(move |_ctx| {
                let second_ran = second_ran.clone();
                async move {
                    second_ran.store(true, Ordering::SeqCst);
                    Ok(())
                }
            });
        }

        assert!(sup.run().await.is_err());
        assert!(!second_ran.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn stop_hooks_all_run_even_when_one_fails() {
        let mut sup = Supervisor::new(test_config()).unwrap();
        let (steady, _, _) = Steady::new("steady");
        sup.load(vec![steady]).await.unwrap();

        let second_ran = Arc::new(AtomicBool::new(false));
        sup.hooks()
            .on_stop(|_ctx| async { Err(ComponentError::fail("flush failed")) });
        {
            let second_ran = second_ran.clone();
            sup.hooks().on_stop(move |_ctx| {
                let second_ran = second_ran.clone();
                async move {
                    second_ran.store(true, Ordering::SeqCst);
                    Ok(())
                }
            });
        }

        let ctx = sup.context();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            ctx.cancel();
        });

        assert!(sup.run().await.is_ok());
        assert!(
            second_ran.load(Ordering::SeqCst),
            "a failing stop hook blocked the ones after it"
        );
    }

    #[tokio::test]
    async fn producer_expands_to_exactly_its_instance_count() {
        let mut sup = Supervisor::new(test_config()).unwrap();
        let produced = Arc::new(AtomicUsize::new(0));
        let producer = {
            let produced = produced.clone();
            ProducerFn::new(move || {
                let id = produced.fetch_add(1, Ordering::SeqCst);
                ComponentFn::arc(format!("copy-{id}"), |ctx: CancellationToken| async move {
                    ctx.cancelled().await;
                    Ok::<_, ComponentError>(())
                })
            })
            .with_options(ProducerOptions::default().with_instances(3))
            .arc()
        };

        sup.load_from_producer(vec![producer]).await.unwrap();
        assert_eq!(produced.load(Ordering::SeqCst), 3);
        assert_eq!(sup.group.len(), 3);
    }

    #[tokio::test]
    async fn health_capability_is_registered_exactly_once() {
        let mut sup = Supervisor::new(test_config()).unwrap();
        let (steady, _, _) = Steady::new("plain");
        sup.load(vec![Arc::new(Probed), steady]).await.unwrap();

        let snapshot = sup.health_checks();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].component(), "probed");
        assert!(snapshot[0].probe().check().await.is_ok());
    }

    #[tokio::test]
    async fn init_failure_aborts_the_batch_in_order() {
        let mut sup = Supervisor::new(test_config()).unwrap();
        let log = Arc::new(Mutex::new(Vec::new()));
        let batch: Vec<ComponentRef> = vec![
            Arc::new(OrderedInit {
                name: "first",
                log: log.clone(),
                fail: false,
            }),
            Arc::new(OrderedInit {
                name: "second",
                log: log.clone(),
                fail: true,
            }),
            Arc::new(OrderedInit {
                name: "third",
                log: log.clone(),
                fail: false,
            }),
        ];

        let err = sup.load(batch).await.unwrap_err();
        match err {
            RuntimeError::Init { component, .. } => assert_eq!(component, "second"),
            other => panic!("unexpected error: {other}"),
        }
        // Inits ran in order and stopped at the failure; the first component
        // stays loaded (no rollback), the third was never touched.
        assert_eq!(*log.lock().unwrap(), vec!["first", "second"]);
        assert_eq!(sup.group.len(), 1);
    }

    #[tokio::test]
    async fn main_command_exit_shuts_the_group_down() {
        let mut sup = Supervisor::new(test_config()).unwrap();
        let (steady, _, stopped) = Steady::new("steady");
        sup.load(vec![steady]).await.unwrap();

        let ran = Arc::new(AtomicBool::new(false));
        {
            let ran = ran.clone();
            sup.main_command(move |_ctx| {
                let ran = ran.clone();
                async move {
                    ran.store(true, Ordering::SeqCst);
                    Ok(())
                }
            })
            .await
            .unwrap();
        }

        assert!(sup.run().await.is_ok());
        assert!(ran.load(Ordering::SeqCst));
        assert_eq!(stopped.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn init_sees_merged_properties_through_the_supervisor() {
        let mut cfg = test_config();
        cfg.properties
            .insert("app.mode".to_string(), "embedded".to_string());
        let mut sup = Supervisor::new(cfg).unwrap();

        let seen = Arc::new(Mutex::new(None));
        struct ConfigReader {
            seen: Arc<Mutex<Option<String>>>,
        }

        #[async_trait]
        impl Component for ConfigReader {
            fn name(&self) -> &str {
                "config-reader"
            }

            async fn init(&self, sup: &Supervisor) -> Result<(), ComponentError> {
                *self.seen.lock().unwrap() = sup.config().get_string("app.mode");
                Ok(())
            }

            async fn start(&self, ctx: CancellationToken) -> Result<(), ComponentError> {
                ctx.cancelled().await;
                Ok(())
            }
        }

        sup.load(vec![Arc::new(ConfigReader { seen: seen.clone() })])
            .await
            .unwrap();
        assert_eq!(seen.lock().unwrap().as_deref(), Some("embedded"));
    }
}
