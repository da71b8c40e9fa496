//! # Component producer: one template, N independent instances.
//!
//! A [`ComponentProducer`] is a factory plus an options record. Loading a
//! producer expands it into `instances` independent components and hands the
//! batch to the ordinary load path — same init-then-schedule semantics, same
//! all-or-nothing init failure per batch. The producer itself implies no
//! shared mutable state between the instances it yields.

use std::sync::Arc;

use super::component::ComponentRef;

/// Options applied when expanding a producer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProducerOptions {
    /// Number of independent instances to create. `0` means "unset" and is
    /// normalized to 1 by [`ProducerOptions::ensure_defaults`].
    pub instances: usize,
}

impl ProducerOptions {
    /// Sets the instance count.
    #[must_use]
    pub fn with_instances(mut self, instances: usize) -> Self {
        self.instances = instances;
        self
    }

    /// Normalizes unset fields; guarantees `instances >= 1` afterwards.
    #[must_use]
    pub fn ensure_defaults(mut self) -> Self {
        if self.instances == 0 {
            self.instances = 1;
        }
        self
    }
}

impl Default for ProducerOptions {
    fn default() -> Self {
        Self { instances: 1 }
    }
}

/// Factory yielding `instances` independent component values.
pub trait ComponentProducer: Send + Sync + 'static {
    /// Produces one component. Invoked exactly
    /// `options().ensure_defaults().instances` times per load.
    fn component(&self) -> ComponentRef;

    /// Options governing the expansion.
    fn options(&self) -> ProducerOptions {
        ProducerOptions::default()
    }
}

/// Shared handle to a producer.
pub type ProducerRef = Arc<dyn ComponentProducer>;

/// Closure-backed producer.
///
/// ## Example
/// ```
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use tokio_util::sync::CancellationToken;
/// use convoy::{ComponentError, ComponentFn, ComponentProducer, ProducerFn, ProducerOptions};
///
/// static SEQ: AtomicUsize = AtomicUsize::new(0);
///
/// let producer = ProducerFn::new(|| {
///     let id = SEQ.fetch_add(1, Ordering::Relaxed);
///     ComponentFn::arc(format!("worker-{id}"), |ctx: CancellationToken| async move {
///         ctx.cancelled().await;
///         Ok::<_, ComponentError>(())
///     })
/// })
/// .with_options(ProducerOptions::default().with_instances(4));
///
/// assert_eq!(producer.options().instances, 4);
/// ```
pub struct ProducerFn<F> {
    f: F,
    options: ProducerOptions,
}

impl<F> ProducerFn<F>
where
    F: Fn() -> ComponentRef + Send + Sync + 'static,
{
    /// Creates a producer from a factory closure with default options.
    pub fn new(f: F) -> Self {
        Self {
            f,
            options: ProducerOptions::default(),
        }
    }

    /// Replaces the options record.
    #[must_use]
    pub fn with_options(mut self, options: ProducerOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the producer as a shared handle.
    pub fn arc(self) -> ProducerRef {
        Arc::new(self)
    }
}

impl<F> ComponentProducer for ProducerFn<F>
where
    F: Fn() -> ComponentRef + Send + Sync + 'static,
{
    fn component(&self) -> ComponentRef {
        (self.f)()
    }

    fn options(&self) -> ProducerOptions {
        self.options
    }
}
