//! # convoy
//!
//! **Convoy** is a process-level component supervisor for Rust.
//!
//! It manages the lifecycle (`init` → `start` → `stop`) of a heterogeneous
//! set of long-running units inside one process, coordinates their concurrent
//! execution, and guarantees an orderly, bounded-time shutdown on signal or
//! on first failure. Failure of any one component is fatal to the whole group
//! by design — there is no automatic restart or retry.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────────┐
//!     │  Component   │   │  Component   │   │ ComponentProducer│
//!     │ (user unit 1)│   │ (user unit 2)│   │  (N worker copies)│
//!     └──────┬───────┘   └──────┬───────┘   └────────┬─────────┘
//!            ▼                  ▼                    ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Supervisor                                                       │
//! │  - Configurer (file/dir sources + merged overrides)               │
//! │  - Hooks (ordered start/stop callbacks)                           │
//! │  - Health aggregation (load-time capability detection)            │
//! │  - Root CancellationToken (the single shutdown source)            │
//! └──────┬──────────────────┬──────────────────┬───────────────┬──────┘
//!        ▼                  ▼                  ▼               ▼
//!     ┌──────────┐      ┌──────────┐      ┌───────────┐  ┌───────────┐
//!     │  Actor   │      │  Actor   │      │ start-hook│  │  signal   │
//!     │ (execute,│      │ (execute,│      │   actor   │  │   actor   │
//!     │interrupt)│      │interrupt)│      └───────────┘  └───────────┘
//!     └────┬─────┘      └────┬─────┘            │              │
//!          └─────────────────┴───────┬──────────┴──────────────┘
//!                                    ▼
//!                       Group::run() — first exit wins,
//!                       fan-out interrupt, join barrier
//! ```
//!
//! ### Lifecycle
//! ```text
//! load:
//!   producer ──► instances × component()
//!   component.init(&Supervisor)     sequential, registration order;
//!                                   first failure aborts the batch
//!   component.health_check()        Some ─► health snapshot
//!
//! run:
//!   start hooks (in order) ──► open start gate ──► component.start(ctx)
//!   ... blocks until: a component exits ─ OR ─ SIGINT/SIGTERM ─ OR ─ close()
//!   first exit ──► interrupt fan-out:
//!     component.stop(deadline_ctx)  concurrent, shared shutdown deadline
//!     stop hooks (in order)         failures logged, never propagated
//!   join all actors ──► run() returns the first actor's result
//! ```
//!
//! ## Features
//! | Area           | Description                                              | Key types / traits                     |
//! |----------------|----------------------------------------------------------|----------------------------------------|
//! | **Components** | Units of work with a supervised lifecycle.               | [`Component`], [`ComponentFn`]         |
//! | **Producers**  | One template expanded into N independent instances.      | [`ComponentProducer`], [`ProducerFn`]  |
//! | **Hooks**      | One-shot callbacks around process start/stop.            | [`Hooks`]                              |
//! | **Health**     | Load-time aggregation of health-check capabilities.      | [`HealthCheck`], [`HealthEntry`]       |
//! | **Group**      | First-to-finish-wins concurrent execution engine.        | [`Group`], [`Actor`]                   |
//! | **Errors**     | Typed errors for the runtime and for components.         | [`RuntimeError`], [`ComponentError`]   |
//! | **Config**     | Runtime options plus the external configurer.            | [`Config`], [`Configurer`]             |
//!
//! ## Example
//! ```no_run
//! use tokio_util::sync::CancellationToken;
//! use convoy::{ComponentError, ComponentFn, Config, Supervisor};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut sup = Supervisor::new(Config::default()).expect("supervisor");
//!
//!     sup.hooks().on_start(|_ctx| async {
//!         println!("warming up");
//!         Ok(())
//!     });
//!
//!     let worker = ComponentFn::arc("worker", |ctx: CancellationToken| async move {
//!         // Block for the component's operational lifetime.
//!         ctx.cancelled().await;
//!         Ok::<_, ComponentError>(())
//!     });
//!     sup.load(vec![worker]).await.expect("load");
//!
//!     // Blocks until SIGINT/SIGTERM or the first component exit.
//!     if sup.run().await.is_err() {
//!         std::process::exit(1);
//!     }
//! }
//! ```

mod components;
mod config;
mod configurer;
mod core;
mod error;
mod health;
mod hooks;

// ---- Public re-exports ----

pub use components::{
    Command, Component, ComponentFn, ComponentProducer, ComponentRef, ProducerFn, ProducerOptions,
    ProducerRef,
};
pub use config::{Config, ConfigFormat};
pub use configurer::Configurer;
pub use core::{Actor, Group, Supervisor};
pub use error::{ComponentError, RuntimeError};
pub use health::{HealthCheck, HealthEntry, HealthRef};
pub use hooks::{HookFn, Hooks};
