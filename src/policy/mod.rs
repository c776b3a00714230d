//! Pluggable decision policies for automated seats.

mod random;
mod registry;
mod trait_def;

pub use random::RandomPolicy;
pub use registry::{by_name, registered_policies, PolicyFactory};
pub use trait_def::{DecisionPolicy, PolicyError};
