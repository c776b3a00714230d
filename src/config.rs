//! Engine and per-session configuration.
//!
//! `EngineConfig` carries process-wide policy timers; `SessionConfig` carries
//! everything a single room needs: seating, scoring target, the escalation
//! ladder table, and the variant knobs the state machine is parameterized by.

use std::ops::RangeInclusive;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::GameError;

/// Seats supported by the engine (deck-size bound: 6 × 8 < 52).
pub const SEAT_RANGE: RangeInclusive<u8> = 2..=6;

/// Process-wide timing policy.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Window during which a disconnected participant keeps their seat.
    pub grace_period: Duration,
    /// Fixed delay between `HandResolved` and the next deal.
    pub redeal_delay: Duration,
    /// Back-off before a cascade step retries a contended session lock.
    pub cascade_retry_delay: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            grace_period: Duration::from_secs(30),
            redeal_delay: Duration::from_secs(5),
            cascade_retry_delay: Duration::from_millis(25),
        }
    }
}

/// Difficulty tier for automated seats; controls the "thinking" delay before
/// a cascade step fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Casual,
    Standard,
    Sharp,
}

impl Difficulty {
    /// Inclusive millisecond bounds for the thinking delay.
    pub fn thinking_delay_ms(&self) -> RangeInclusive<u64> {
        match self {
            Difficulty::Casual => 800..=2000,
            Difficulty::Standard => 300..=900,
            Difficulty::Sharp => 50..=250,
        }
    }
}

/// Dealer-relative rule for who acts first in a freshly dealt hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FirstActorRule {
    LeftOfDealer,
    Dealer,
}

/// How seats map onto scoring sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamLayout {
    /// Every seat is its own side.
    Solo,
    /// Alternating seats form two sides (seat % 2); requires even capacity.
    Pairs,
}

/// What the arbiter does when the seat on turn is offline past its grace
/// window but the session survives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockedTurnPolicy {
    /// Run the decision policy for the absent seat.
    Substitute,
    /// Hold the session until the seat reconnects.
    Stall,
}

/// Per-session configuration, fixed at creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub name: String,
    pub capacity: u8,
    /// First side to reach this total wins the game.
    pub target_score: u32,
    pub cards_per_hand: u8,
    /// Points for winning a hand with no accepted escalation.
    pub base_points: u32,
    /// `rung_points[r - 1]` is the value of rung `r`; its length is the
    /// maximum rung of the ladder.
    pub rung_points: Vec<u32>,
    pub first_actor: FirstActorRule,
    pub teams: TeamLayout,
    /// Optional pinned spokesperson per team for the escalation ladder.
    /// Defaults to the lowest occupied seat of the responding side.
    pub speaker_for_team: Vec<Option<u8>>,
    pub blocked_policy: BlockedTurnPolicy,
    /// Shared secret for private sessions; `None` means open.
    pub credential: Option<String>,
    pub difficulty: Difficulty,
    /// Automated seats filled at session creation, before any human joins.
    /// May equal `capacity` for fully automated sessions.
    pub automated_seats: u8,
    /// Deal seed; `None` draws one from OS entropy at session creation.
    pub rng_seed: Option<u64>,
}

impl SessionConfig {
    /// A small open 2-seat room; tests and defaults build on this.
    pub fn sample(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            capacity: 2,
            target_score: 12,
            cards_per_hand: 3,
            base_points: 1,
            rung_points: vec![2, 3, 4],
            first_actor: FirstActorRule::LeftOfDealer,
            teams: TeamLayout::Solo,
            speaker_for_team: Vec::new(),
            blocked_policy: BlockedTurnPolicy::Substitute,
            credential: None,
            difficulty: Difficulty::Sharp,
            automated_seats: 0,
            rng_seed: None,
        }
    }

    /// Maximum rung of the escalation ladder.
    pub fn max_rung(&self) -> u8 {
        self.rung_points.len() as u8
    }

    /// Value of a rung; rung 0 ("no call") is worth nothing.
    pub fn points_for_rung(&self, rung: u8) -> u32 {
        if rung == 0 {
            return 0;
        }
        self.rung_points
            .get(rung as usize - 1)
            .copied()
            .unwrap_or(0)
    }

    /// Fail-closed validation run before a session is allocated.
    pub fn validate(&self) -> Result<(), GameError> {
        if !SEAT_RANGE.contains(&self.capacity) {
            return Err(GameError::illegal_action(format!(
                "capacity must be within {}..={}",
                SEAT_RANGE.start(),
                SEAT_RANGE.end()
            )));
        }
        if self.teams == TeamLayout::Pairs && self.capacity % 2 != 0 {
            return Err(GameError::illegal_action(
                "pairs layout requires an even seat capacity",
            ));
        }
        if self.cards_per_hand == 0
            || usize::from(self.cards_per_hand) * usize::from(self.capacity) > 52
        {
            return Err(GameError::illegal_action(
                "cards_per_hand must be at least 1 and fit a 52-card deck",
            ));
        }
        if self.target_score == 0 {
            return Err(GameError::illegal_action("target_score must be positive"));
        }
        if self.automated_seats > self.capacity {
            return Err(GameError::illegal_action(
                "automated_seats cannot exceed capacity",
            ));
        }
        Ok(())
    }

    /// Which side a seat scores for under the configured layout.
    pub fn team_of(&self, seat: u8) -> u8 {
        match self.teams {
            TeamLayout::Solo => seat,
            TeamLayout::Pairs => seat % 2,
        }
    }

    /// Number of scoring sides.
    pub fn team_count(&self) -> u8 {
        match self.teams {
            TeamLayout::Solo => self.capacity,
            TeamLayout::Pairs => 2,
        }
    }
}
