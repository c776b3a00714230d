#![allow(dead_code)]

use cardroom::config::{EngineConfig, SessionConfig};
use cardroom::domain::snapshot::ParticipantView;
use cardroom::domain::{Action, ActionMsg, ParticipantId, SessionId};
use cardroom::domain::RankEvaluator;
use cardroom::engine::{ConnId, Engine, ServerMsg};
use cardroom::policy::RandomPolicy;
use tokio::sync::mpsc;

pub fn init() {
    cardroom::test_bootstrap::logging::init();
}

pub fn engine() -> Engine {
    init();
    Engine::new(EngineConfig::default())
}

/// Engine whose decision policy is deterministic under `seed`.
pub fn engine_seeded(seed: u64) -> Engine {
    init();
    Engine::with_collaborators(
        EngineConfig::default(),
        Box::new(RandomPolicy::new(Some(seed))),
        Box::new(RankEvaluator),
    )
}

/// A deterministic 2-seat config with a high target so tests control
/// when the game ends.
pub fn duel_config(name: &str) -> SessionConfig {
    let mut cfg = SessionConfig::sample(name);
    cfg.target_score = 1000;
    cfg.rng_seed = Some(7);
    cfg
}

pub async fn attach(
    engine: &Engine,
    participant_id: ParticipantId,
) -> (ConnId, mpsc::UnboundedReceiver<ServerMsg>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let conn_id = engine.attach_connection(participant_id, tx).await.unwrap();
    (conn_id, rx)
}

pub async fn join_attached(
    engine: &Engine,
    session_id: SessionId,
    participant_id: ParticipantId,
    name: &str,
) -> (ConnId, mpsc::UnboundedReceiver<ServerMsg>) {
    engine
        .join(session_id, participant_id, name, None)
        .await
        .unwrap();
    attach(engine, participant_id).await
}

pub async fn submit(
    engine: &Engine,
    session_id: SessionId,
    participant_id: ParticipantId,
    action: Action,
) -> Result<(), cardroom::GameError> {
    engine
        .submit_action(&ActionMsg {
            session_id,
            participant_id,
            action,
        })
        .await
}

/// Drain a connection's queue and return the most recent state push.
pub fn latest_view(rx: &mut mpsc::UnboundedReceiver<ServerMsg>) -> Option<ParticipantView> {
    let mut latest = None;
    while let Ok(msg) = rx.try_recv() {
        if let ServerMsg::State { view } = msg {
            latest = Some(*view);
        }
    }
    latest
}

/// Whether a `SessionClosed` is queued on this connection.
pub fn saw_session_closed(rx: &mut mpsc::UnboundedReceiver<ServerMsg>) -> bool {
    let mut seen = false;
    while let Ok(msg) = rx.try_recv() {
        if matches!(msg, ServerMsg::SessionClosed { .. }) {
            seen = true;
        }
    }
    seen
}
