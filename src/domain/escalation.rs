//! Stake-escalation ladder nested inside the acting phase.
//!
//! One side raises the value of the current hand; the obligated responder on
//! the other side may accept, reject, or counter-raise. The rung index never
//! regresses and never skips; once the ladder is terminal it is immutable for
//! the remainder of the hand.

use serde::{Deserialize, Serialize};

use crate::domain::action::EscalationResponse;
use crate::errors::GameError;

/// Terminal result of a ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum EscalationOutcome {
    /// Points for the reached rung ride on the hand's later outcome.
    Accepted { rung: u8 },
    /// Points for the previous rung (if any) were awarded immediately.
    Rejected { rung: u8 },
}

/// What a single response did to the ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LadderEvent {
    /// Counter-raise: rung advanced, obligation flipped.
    Advanced { rung: u8, responder: u8 },
    Accepted { rung: u8 },
    /// `awarded_rung` is the rung whose value the calling side collects
    /// immediately; 0 means nothing was on the table yet.
    Rejected { rung: u8, awarded_rung: u8 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalationState {
    /// Current rung; 0 is "no call" and never observable here, since a
    /// ladder is only created by a raise to rung 1.
    pub rung: u8,
    /// Seat that called the current rung.
    pub caller: u8,
    /// The single seat obligated to respond next.
    pub responder: u8,
    /// Chronological response log.
    pub responses: Vec<(u8, EscalationResponse)>,
    pub outcome: Option<EscalationOutcome>,
}

impl EscalationState {
    /// Open the ladder at rung 1.
    pub fn open(caller: u8, responder: u8) -> Self {
        Self {
            rung: 1,
            caller,
            responder,
            responses: Vec::new(),
            outcome: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }

    /// Apply one response from `seat`.
    ///
    /// Rejects responders out of obligation with `OutOfTurn`, raises past the
    /// maximum rung with `IllegalAction`, and anything after terminal with
    /// `IllegalAction`.
    pub fn respond(
        &mut self,
        seat: u8,
        response: EscalationResponse,
        max_rung: u8,
    ) -> Result<LadderEvent, GameError> {
        if self.is_terminal() {
            return Err(GameError::illegal_action(
                "escalation ladder is already settled for this hand",
            ));
        }
        if seat != self.responder {
            return Err(GameError::out_of_turn(format!(
                "seat {} must respond to the ladder, not seat {seat}",
                self.responder
            )));
        }

        match response {
            EscalationResponse::Raise => {
                if self.rung >= max_rung {
                    return Err(GameError::illegal_action(format!(
                        "ladder is at its maximum rung {max_rung}; only accept or reject remain"
                    )));
                }
                self.responses.push((seat, response));
                self.rung += 1;
                let previous_caller = self.caller;
                self.caller = seat;
                self.responder = previous_caller;
                Ok(LadderEvent::Advanced {
                    rung: self.rung,
                    responder: self.responder,
                })
            }
            EscalationResponse::Accept => {
                self.responses.push((seat, response));
                self.outcome = Some(EscalationOutcome::Accepted { rung: self.rung });
                Ok(LadderEvent::Accepted { rung: self.rung })
            }
            EscalationResponse::Reject => {
                self.responses.push((seat, response));
                self.outcome = Some(EscalationOutcome::Rejected { rung: self.rung });
                Ok(LadderEvent::Rejected {
                    rung: self.rung,
                    awarded_rung: self.rung - 1,
                })
            }
        }
    }
}
