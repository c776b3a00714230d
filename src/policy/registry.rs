//! How to register your decision policy
//!
//! 1) Implement `DecisionPolicy` for your type in its module.
//! 2) Add a `PolicyFactory` entry to the static list with a stable `name`
//!    and `version`.
//! 3) Keep ordering stable; avoid side effects in constructors.
//! 4) Determinism: same seed must give the same behavior.

use crate::policy::{DecisionPolicy, RandomPolicy};

/// Factory definition for constructing decision policies.
pub struct PolicyFactory {
    pub name: &'static str,
    pub version: &'static str,
    pub make: fn(seed: Option<u64>) -> Box<dyn DecisionPolicy + Send + Sync>,
}

static POLICY_FACTORIES: &[PolicyFactory] = &[PolicyFactory {
    name: RandomPolicy::NAME,
    version: RandomPolicy::VERSION,
    make: make_random_policy,
}];

/// Returns the statically registered policy factories.
pub fn registered_policies() -> &'static [PolicyFactory] {
    POLICY_FACTORIES
}

/// Finds a registered policy factory by its name.
pub fn by_name(name: &str) -> Option<&'static PolicyFactory> {
    registered_policies()
        .iter()
        .find(|factory| factory.name == name)
}

fn make_random_policy(seed: Option<u64>) -> Box<dyn DecisionPolicy + Send + Sync> {
    Box::new(RandomPolicy::new(seed))
}
