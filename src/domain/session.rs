//! Authoritative per-room state: seats, phase, scores, and the current hand.
//!
//! A `Session` is owned by the registry and only ever mutated while the
//! arbiter holds that session's mutation lock. Seat math helpers live here so
//! every layer shares one source of truth for rotation and "who acts next".

use serde::{Deserialize, Serialize};

use crate::config::SessionConfig;
use crate::domain::action::ActionKind;
use crate::domain::cards::Card;
use crate::domain::hand::{Hand, HandArchive};
use crate::errors::GameError;

pub type SessionId = i64;
pub type ParticipantId = i64;
/// Positional seat index, 0-based in join order.
pub type SeatIx = u8;

/// Overall session progression phases.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Created but below seat capacity.
    Waiting,
    /// Cards being distributed; transient, observable only in transition
    /// lists and in the inter-hand delay window.
    Dealing,
    /// Somebody is expected to play, raise, or forfeit.
    Acting,
    /// A stake-escalation ladder is open; only the obligated responder acts.
    Escalating,
    /// Hand settled; the re-deal timer (or game end) takes it from here.
    HandResolved,
    /// Terminal: a side reached the target score.
    GameEnded,
}

/// Connection status of a seat's participant.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnStatus {
    Online,
    Idle,
    Offline,
}

/// One occupant of the session, human or automated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub participant_id: ParticipantId,
    pub display_name: String,
    pub automated: bool,
    pub team: u8,
    pub connection: ConnStatus,
    /// Concealed cards still in hand.
    pub hand: Vec<Card>,
    /// Materialized legal actions; recomputed on every transition.
    pub legal_actions: Vec<ActionKind>,
}

impl Seat {
    pub fn new(participant_id: ParticipantId, display_name: String, automated: bool, team: u8) -> Self {
        Self {
            participant_id,
            display_name,
            automated,
            team,
            // Automated seats count as permanently online.
            connection: if automated {
                ConnStatus::Online
            } else {
                ConnStatus::Idle
            },
            hand: Vec::new(),
            legal_actions: Vec::new(),
        }
    }
}

/// Entire room container, sufficient for pure domain operations.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    pub config: SessionConfig,
    /// Seats in join order; stable once the game has started.
    pub seats: Vec<Seat>,
    pub phase: Phase,
    pub hand: Option<Hand>,
    pub history: Vec<HandArchive>,
    /// Cumulative score per team index.
    pub scores: Vec<u32>,
    /// Hands dealt so far; also drives dealer rotation.
    pub hands_dealt: u32,
    pub winner_team: Option<u8>,
    /// Base seed for deterministic dealing.
    pub rng_seed: u64,
}

impl Session {
    pub fn new(id: SessionId, config: SessionConfig, rng_seed: u64) -> Self {
        let teams = usize::from(config.team_count());
        Self {
            id,
            config,
            seats: Vec::new(),
            phase: Phase::Waiting,
            hand: None,
            history: Vec::new(),
            scores: vec![0; teams],
            hands_dealt: 0,
            winner_team: None,
            rng_seed,
        }
    }

    pub fn seat_count(&self) -> usize {
        self.seats.len()
    }

    pub fn is_full(&self) -> bool {
        self.seat_count() as u8 >= self.config.capacity
    }

    /// Seats that still take part: automated, or not past their grace window.
    pub fn active_count(&self) -> usize {
        self.seats
            .iter()
            .filter(|s| s.automated || s.connection != ConnStatus::Offline)
            .count()
    }

    /// Remove a seat while the room is still `Waiting` and re-derive teams
    /// from the remaining join order. Seat order is only load-bearing once
    /// a hand has been dealt.
    pub fn reclaim_seat(&mut self, ix: SeatIx) {
        self.seats.remove(usize::from(ix));
        for ix in 0..self.seat_count() {
            let team = self.config.team_of(ix as SeatIx);
            self.seats[ix].team = team;
        }
    }

    pub fn seat_ix_of(&self, participant_id: ParticipantId) -> Option<SeatIx> {
        self.seats
            .iter()
            .position(|s| s.participant_id == participant_id)
            .map(|ix| ix as SeatIx)
    }

    pub fn seat(&self, ix: SeatIx) -> Result<&Seat, GameError> {
        self.seats
            .get(usize::from(ix))
            .ok_or_else(|| GameError::participant_not_found(i64::from(ix)))
    }

    pub fn seat_mut(&mut self, ix: SeatIx) -> Result<&mut Seat, GameError> {
        self.seats
            .get_mut(usize::from(ix))
            .ok_or_else(|| GameError::participant_not_found(i64::from(ix)))
    }

    /// Next seat clockwise, wrapping.
    pub fn next_seat(&self, ix: SeatIx) -> SeatIx {
        ((usize::from(ix) + 1) % self.seat_count()) as SeatIx
    }

    /// Dealer for a 1-based hand number: rotates clockwise from seat 0.
    pub fn dealer_for_hand(&self, hand_no: u32) -> SeatIx {
        ((hand_no as usize - 1) % self.seat_count()) as SeatIx
    }

    pub fn require_hand(&self) -> Result<&Hand, GameError> {
        self.hand.as_ref().ok_or_else(|| {
            GameError::illegal_action("invariant violated: no hand in progress")
        })
    }

    pub fn require_hand_mut(&mut self) -> Result<&mut Hand, GameError> {
        self.hand.as_mut().ok_or_else(|| {
            GameError::illegal_action("invariant violated: no hand in progress")
        })
    }

    pub fn require_turn(&self) -> Result<SeatIx, GameError> {
        self.require_hand()?
            .turn
            .ok_or_else(|| GameError::illegal_action("invariant violated: nobody is on turn"))
    }

    /// Add points to a team and report whether the target was crossed.
    pub fn award_points(&mut self, team: u8, points: u32) -> bool {
        if let Some(slot) = self.scores.get_mut(usize::from(team)) {
            *slot += points;
            return *slot >= self.config.target_score;
        }
        false
    }

    /// Spokesperson for a team in the escalation ladder: the configured seat
    /// if pinned and still seated, otherwise the lowest occupied seat of the
    /// side.
    pub fn speaker_for_team(&self, team: u8) -> Option<SeatIx> {
        if let Some(Some(pinned)) = self.config.speaker_for_team.get(usize::from(team)) {
            if usize::from(*pinned) < self.seat_count()
                && self.seats[usize::from(*pinned)].team == team
            {
                return Some(*pinned);
            }
        }
        self.seats
            .iter()
            .position(|s| s.team == team)
            .map(|ix| ix as SeatIx)
    }

    /// Obligated responder when `caller` opens the ladder: spokesperson of
    /// the first opposing side after the caller in deal order.
    pub fn responder_for(&self, caller: SeatIx) -> Result<SeatIx, GameError> {
        let caller_team = self.seat(caller)?.team;
        let mut ix = self.next_seat(caller);
        for _ in 0..self.seat_count() {
            let team = self.seat(ix)?.team;
            if team != caller_team {
                return self
                    .speaker_for_team(team)
                    .ok_or_else(|| GameError::illegal_action("no opposing seat to respond"));
            }
            ix = self.next_seat(ix);
        }
        Err(GameError::illegal_action("no opposing side to respond"))
    }
}
