//! Error types used by the convoy runtime and components.
//!
//! This module defines two main error enums:
//!
//! - [`RuntimeError`] — errors raised by the orchestration runtime itself.
//! - [`ComponentError`] — errors raised by component and hook bodies.
//!
//! Both types provide an `as_label` helper producing short stable snake_case
//! labels for logging/metrics.

use thiserror::Error;

/// # Errors produced by the convoy runtime.
///
/// These represent failures in the orchestration system itself: a component
/// that could not be initialized, a start hook that aborted startup, or the
/// terminal error of the actor group.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// A component's `init` failed; the load batch was aborted before any
    /// actor was scheduled.
    #[error("component {component:?} failed to initialize: {source}")]
    Init {
        /// Name of the component that failed.
        component: String,
        /// The underlying component error.
        #[source]
        source: ComponentError,
    },

    /// A start hook failed; startup was aborted and the group shut down.
    #[error("start hook #{index} failed: {source}")]
    StartHook {
        /// Zero-based registration index of the failing hook.
        index: usize,
        /// The underlying hook error.
        #[source]
        source: ComponentError,
    },

    /// A component's `start` returned an error; this is the group's terminal
    /// result.
    #[error("component {component:?} exited with error: {source}")]
    Component {
        /// Name of the component that exited.
        component: String,
        /// The underlying component error.
        #[source]
        source: ComponentError,
    },

    /// An actor task panicked while executing.
    #[error("actor panicked: {message}")]
    ActorPanicked {
        /// Rendering of the join error.
        message: String,
    },

    /// OS signal listener registration failed.
    #[error("signal listener failed: {0}")]
    Signal(#[from] std::io::Error),

    /// Configuration could not be loaded, merged, or read.
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::Init { .. } => "runtime_init_failed",
            RuntimeError::StartHook { .. } => "runtime_start_hook_failed",
            RuntimeError::Component { .. } => "runtime_component_failed",
            RuntimeError::ActorPanicked { .. } => "runtime_actor_panicked",
            RuntimeError::Signal(_) => "runtime_signal_listener",
            RuntimeError::Config(_) => "runtime_config",
        }
    }
}

/// # Errors produced by component and hook execution.
///
/// A component's `start` returning any of these still triggers group-wide
/// shutdown; [`ComponentError::Canceled`] marks a cooperative-cancellation
/// exit that implementations may use to distinguish "told to stop" from an
/// actual failure.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ComponentError {
    /// Execution failed.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Execution was cancelled by the shutdown context.
    #[error("context cancelled")]
    Canceled,
}

impl ComponentError {
    /// Creates a [`ComponentError::Fail`] from any displayable error.
    pub fn fail(error: impl Into<String>) -> Self {
        ComponentError::Fail {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ComponentError::Fail { .. } => "component_failed",
            ComponentError::Canceled => "component_canceled",
        }
    }

    /// True if this is a cooperative-cancellation exit.
    pub fn is_canceled(&self) -> bool {
        matches!(self, ComponentError::Canceled)
    }
}
