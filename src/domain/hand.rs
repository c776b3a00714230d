//! One deal-to-resolution cycle within a session.

use serde::{Deserialize, Serialize};

use crate::domain::cards::Card;
use crate::domain::escalation::EscalationState;

/// Why a hand resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cause", rename_all = "snake_case")]
pub enum ResolutionCause {
    AllCardsPlayed,
    Forfeit { by: u8 },
}

/// Terminal result of one hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandOutcome {
    pub winner_team: u8,
    pub points: u32,
    #[serde(flatten)]
    pub cause: ResolutionCause,
}

/// Live state of the hand currently being played.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    /// 1-based hand number within the session.
    pub hand_no: u32,
    pub dealer: u8,
    /// Seat expected to act; `None` once the hand has resolved.
    pub turn: Option<u8>,
    /// Chronological plays (seat, card).
    pub plays: Vec<(u8, Card)>,
    /// At most one ladder per hand; immutable once terminal.
    pub escalation: Option<EscalationState>,
    /// Contingent points from an accepted ladder, paid with the hand.
    pub stake: u32,
    pub outcome: Option<HandOutcome>,
}

impl Hand {
    pub fn new(hand_no: u32, dealer: u8, first_actor: u8) -> Self {
        Self {
            hand_no,
            dealer,
            turn: Some(first_actor),
            plays: Vec::new(),
            escalation: None,
            stake: 0,
            outcome: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.outcome.is_some()
    }

    /// Number of cards a seat has committed so far.
    pub fn plays_by(&self, seat: u8) -> usize {
        self.plays.iter().filter(|(s, _)| *s == seat).count()
    }

    /// Cards a seat has committed, in play order.
    pub fn cards_played_by(&self, seat: u8) -> Vec<Card> {
        self.plays
            .iter()
            .filter(|(s, _)| *s == seat)
            .map(|(_, c)| *c)
            .collect()
    }

    /// Highest rung the ladder reached, 0 if no call was made.
    pub fn rung_reached(&self) -> u8 {
        self.escalation.as_ref().map_or(0, |e| e.rung)
    }
}

/// Summary kept in session history once the next hand is dealt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandArchive {
    pub hand_no: u32,
    pub dealer: u8,
    pub outcome: HandOutcome,
    pub rung_reached: u8,
}
