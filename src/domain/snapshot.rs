//! Read models pushed to clients.
//!
//! The full [`Session`] never leaves the engine. `SessionSnapshot` is the
//! shared public projection (concealed cards reduced to counts) and
//! [`ParticipantView`] layers one seat's private cards and legal actions on
//! top of it.

use serde::{Deserialize, Serialize};

use crate::domain::action::ActionKind;
use crate::domain::cards::Card;
use crate::domain::escalation::EscalationOutcome;
use crate::domain::hand::{HandArchive, HandOutcome};
use crate::domain::session::{ConnStatus, ParticipantId, Phase, SeatIx, Session, SessionId};

/// Public projection of one seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatPublic {
    pub seat: SeatIx,
    pub participant_id: ParticipantId,
    pub display_name: String,
    pub automated: bool,
    pub team: u8,
    pub connection: ConnStatus,
    /// Concealed cards are visible only as a count.
    pub card_count: u8,
}

/// Public projection of an open or settled ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalationPublic {
    pub rung: u8,
    /// Ladder cap from the session config; raising stops here.
    pub max_rung: u8,
    pub caller: SeatIx,
    pub responder: SeatIx,
    pub outcome: Option<EscalationOutcome>,
}

/// Public projection of the hand in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandPublic {
    pub hand_no: u32,
    pub dealer: SeatIx,
    pub turn: Option<SeatIx>,
    /// Committed plays are public knowledge.
    pub plays: Vec<(SeatIx, Card)>,
    pub escalation: Option<EscalationPublic>,
    pub stake: u32,
    pub outcome: Option<HandOutcome>,
}

/// Everything every participant is allowed to see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: SessionId,
    pub name: String,
    pub phase: Phase,
    pub capacity: u8,
    pub seats: Vec<SeatPublic>,
    /// Cumulative score per team index.
    pub scores: Vec<u32>,
    pub target_score: u32,
    pub hand: Option<HandPublic>,
    pub history: Vec<HandArchive>,
    pub winner_team: Option<u8>,
}

impl SessionSnapshot {
    pub fn of(session: &Session) -> Self {
        Self {
            session_id: session.id,
            name: session.config.name.clone(),
            phase: session.phase,
            capacity: session.config.capacity,
            seats: session
                .seats
                .iter()
                .enumerate()
                .map(|(ix, s)| SeatPublic {
                    seat: ix as SeatIx,
                    participant_id: s.participant_id,
                    display_name: s.display_name.clone(),
                    automated: s.automated,
                    team: s.team,
                    connection: s.connection,
                    card_count: s.hand.len() as u8,
                })
                .collect(),
            scores: session.scores.clone(),
            target_score: session.config.target_score,
            hand: session.hand.as_ref().map(|h| HandPublic {
                hand_no: h.hand_no,
                dealer: h.dealer,
                turn: h.turn,
                plays: h.plays.clone(),
                escalation: h.escalation.as_ref().map(|e| EscalationPublic {
                    rung: e.rung,
                    max_rung: session.config.max_rung(),
                    caller: e.caller,
                    responder: e.responder,
                    outcome: e.outcome,
                }),
                stake: h.stake,
                outcome: h.outcome,
            }),
            history: session.history.clone(),
            winner_team: session.winner_team,
        }
    }
}

/// Per-recipient state push: the shared snapshot plus that seat's secrets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantView {
    #[serde(flatten)]
    pub snapshot: SessionSnapshot,
    pub your_seat: SeatIx,
    pub your_cards: Vec<Card>,
    pub your_legal_actions: Vec<ActionKind>,
}

impl ParticipantView {
    /// Build the view for one seat, reusing a prebuilt shared snapshot.
    pub fn for_seat(session: &Session, snapshot: SessionSnapshot, seat: SeatIx) -> Self {
        let (cards, legal) = session
            .seats
            .get(usize::from(seat))
            .map(|s| (s.hand.clone(), s.legal_actions.clone()))
            .unwrap_or_default();
        Self {
            snapshot,
            your_seat: seat,
            your_cards: cards,
            your_legal_actions: legal,
        }
    }
}
