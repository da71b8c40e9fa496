//! Core runtime: the actor group, the supervisor, and the shutdown path.

pub(crate) mod group;
pub(crate) mod shutdown;
pub(crate) mod supervisor;

pub use group::{Actor, Group};
pub use supervisor::Supervisor;
