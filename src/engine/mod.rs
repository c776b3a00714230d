//! The orchestration engine.
//!
//! [`Engine`] owns the session registry, the live-connection table, and the
//! timer wheel, and exposes the whole mutating surface: session lifecycle
//! (`manager`), and action arbitration plus automated-turn cascades
//! (`arbiter`). It is cheap to clone; all clones share one state.

mod arbiter;
mod connections;
mod manager;
mod protocol;
mod registry;
mod timers;

pub use connections::{ConnId, ConnectionRegistry};
pub use protocol::ServerMsg;
pub use registry::{SessionHandle, SessionRegistry};
pub use timers::{TimerKey, TimerRegistry};

use std::sync::Arc;

use crate::config::EngineConfig;
use crate::domain::evaluator::{HandEvaluator, RankEvaluator};
use crate::policy::{DecisionPolicy, RandomPolicy};

pub(crate) struct EngineInner {
    pub(crate) config: EngineConfig,
    pub(crate) sessions: SessionRegistry,
    pub(crate) connections: ConnectionRegistry,
    pub(crate) timers: Arc<TimerRegistry>,
    pub(crate) policy: Box<dyn DecisionPolicy>,
    pub(crate) evaluator: Box<dyn HandEvaluator>,
}

#[derive(Clone)]
pub struct Engine {
    inner: Arc<EngineInner>,
}

impl Engine {
    /// Engine with the default collaborators: the random decision policy
    /// and the rank evaluator.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_collaborators(
            config,
            Box::new(RandomPolicy::new(None)),
            Box::new(RankEvaluator),
        )
    }

    pub fn with_collaborators(
        config: EngineConfig,
        policy: Box<dyn DecisionPolicy>,
        evaluator: Box<dyn HandEvaluator>,
    ) -> Self {
        Self {
            inner: Arc::new(EngineInner {
                config,
                sessions: SessionRegistry::new(),
                connections: ConnectionRegistry::new(),
                timers: Arc::new(TimerRegistry::new()),
                policy,
                evaluator,
            }),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }

    /// Number of live sessions; observability only.
    pub fn session_count(&self) -> usize {
        self.inner.sessions.len()
    }
}
