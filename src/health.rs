//! # Health-check capability and its load-time aggregation.
//!
//! A component may expose a [`HealthCheck`] via
//! [`Component::health_check`](crate::Component::health_check); the
//! supervisor collects every exposed probe into a read-only list of
//! [`HealthEntry`] values while loading. The core performs no polling —
//! reporting is an external collaborator's job (typically another component
//! that captures the snapshot during its `init`).

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ComponentError;

/// Probe answering "is this component currently healthy?".
#[async_trait]
pub trait HealthCheck: Send + Sync + 'static {
    /// Returns `Ok(())` while healthy, an error describing the problem
    /// otherwise.
    async fn check(&self) -> Result<(), ComponentError>;
}

/// Shared handle to a health probe.
pub type HealthRef = Arc<dyn HealthCheck>;

/// A component identity paired with its health probe.
///
/// Collected once at load time; the set is read-only after the group starts.
#[derive(Clone)]
pub struct HealthEntry {
    component: String,
    probe: HealthRef,
}

impl HealthEntry {
    pub(crate) fn new(component: impl Into<String>, probe: HealthRef) -> Self {
        Self {
            component: component.into(),
            probe,
        }
    }

    /// Identity of the component that exposed the probe.
    pub fn component(&self) -> &str {
        &self.component
    }

    /// The probe itself.
    pub fn probe(&self) -> &HealthRef {
        &self.probe
    }
}
