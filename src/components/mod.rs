//! Component contract, function-backed components, and producers.

mod command;
mod component;
mod producer;

pub use command::Command;
pub use component::{Component, ComponentFn, ComponentRef};
pub use producer::{ComponentProducer, ProducerFn, ProducerOptions, ProducerRef};
