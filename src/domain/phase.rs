//! The phase state machine shared by the turn-based games.
//!
//! All transitions are total: every state exposes a closed set of legal
//! action kinds, every legal action maps to exactly one next state, and
//! nothing outside that set is accepted. Mutating entry points return the
//! edge-triggered transitions they caused so callers (arbiter, tests) can
//! react without diffing state.

use tracing::debug;

use crate::domain::action::{Action, ActionKind};
use crate::domain::dealing::{deal_hands, derive_hand_seed};
use crate::domain::escalation::{EscalationOutcome, EscalationState, LadderEvent};
use crate::domain::evaluator::HandEvaluator;
use crate::domain::hand::{Hand, HandArchive, HandOutcome, ResolutionCause};
use crate::domain::session::{Phase, SeatIx, Session};
use crate::errors::GameError;

/// Edge-triggered transitions derived from one mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// A new hand was dealt; phase passed through `Dealing` into `Acting`.
    Dealt { hand_no: u32 },
    /// The turn became a specific seat.
    TurnBecame { seat: SeatIx },
    EscalationOpened { rung: u8, responder: SeatIx },
    EscalationAdvanced { rung: u8, responder: SeatIx },
    EscalationSettled { outcome: EscalationOutcome },
    HandResolved { winner_team: u8, points: u32 },
    GameEnded { winner_team: u8 },
}

/// Seat currently obligated to act, if any.
pub fn current_actor(session: &Session) -> Option<SeatIx> {
    match session.phase {
        Phase::Acting => session.hand.as_ref().and_then(|h| h.turn),
        Phase::Escalating => session
            .hand
            .as_ref()
            .and_then(|h| h.escalation.as_ref())
            .map(|e| e.responder),
        Phase::Waiting | Phase::Dealing | Phase::HandResolved | Phase::GameEnded => None,
    }
}

/// The closed legal-action set for one seat in the current state.
pub fn legal_action_kinds(session: &Session, seat: SeatIx) -> Vec<ActionKind> {
    match session.phase {
        Phase::Acting => {
            let Some(hand) = session.hand.as_ref() else {
                return Vec::new();
            };
            if hand.turn != Some(seat) {
                return Vec::new();
            }
            let mut kinds = vec![ActionKind::PlayCard, ActionKind::Forfeit];
            // One ladder per hand, and only where an opposing side exists.
            if hand.escalation.is_none()
                && session.config.max_rung() >= 1
                && session.responder_for(seat).is_ok()
            {
                kinds.push(ActionKind::RaiseStake);
            }
            kinds
        }
        Phase::Escalating => {
            let responder = session
                .hand
                .as_ref()
                .and_then(|h| h.escalation.as_ref())
                .map(|e| e.responder);
            if responder == Some(seat) {
                vec![ActionKind::Respond]
            } else {
                Vec::new()
            }
        }
        Phase::Waiting | Phase::Dealing | Phase::HandResolved | Phase::GameEnded => Vec::new(),
    }
}

/// Refresh every seat's materialized legal-action list.
pub fn recompute_legal_actions(session: &mut Session) {
    let sets: Vec<Vec<ActionKind>> = (0..session.seat_count())
        .map(|ix| legal_action_kinds(session, ix as SeatIx))
        .collect();
    for (seat, kinds) in session.seats.iter_mut().zip(sets) {
        seat.legal_actions = kinds;
    }
}

/// Deal the next hand: from `Waiting` exactly when the room first fills, or
/// from `HandResolved` when the re-deal delay fires.
pub fn deal_next_hand(session: &mut Session) -> Result<Vec<Transition>, GameError> {
    match session.phase {
        Phase::Waiting => {
            if !session.is_full() {
                return Err(GameError::illegal_action(
                    "cannot deal before the room is full",
                ));
            }
        }
        Phase::HandResolved => {}
        other => {
            return Err(GameError::illegal_action(format!(
                "cannot deal in phase {other:?}"
            )));
        }
    }

    // Archive the finished hand before replacing it.
    if let Some(finished) = session.hand.take() {
        if let Some(outcome) = finished.outcome {
            session.history.push(HandArchive {
                hand_no: finished.hand_no,
                dealer: finished.dealer,
                outcome,
                rung_reached: finished.rung_reached(),
            });
        }
    }

    session.phase = Phase::Dealing;
    session.hands_dealt += 1;
    let hand_no = session.hands_dealt;
    let dealer = session.dealer_for_hand(hand_no);
    let first_actor = match session.config.first_actor {
        crate::config::FirstActorRule::LeftOfDealer => session.next_seat(dealer),
        crate::config::FirstActorRule::Dealer => dealer,
    };

    let seed = derive_hand_seed(session.rng_seed, hand_no);
    let hands = deal_hands(session.seat_count(), session.config.cards_per_hand, seed)?;
    for (seat, cards) in session.seats.iter_mut().zip(hands) {
        seat.hand = cards;
    }

    session.hand = Some(Hand::new(hand_no, dealer, first_actor));
    session.phase = Phase::Acting;
    recompute_legal_actions(session);

    debug!(
        session_id = session.id,
        hand_no, dealer, first_actor, "hand dealt"
    );
    Ok(vec![
        Transition::Dealt { hand_no },
        Transition::TurnBecame { seat: first_actor },
    ])
}

/// Validate and apply one action from `seat`.
///
/// On any validation failure the session is untouched and a typed error is
/// returned; on success the phase, turn pointer, and materialized legal
/// actions have all advanced.
pub fn apply_action(
    session: &mut Session,
    seat: SeatIx,
    action: &Action,
    evaluator: &dyn HandEvaluator,
) -> Result<Vec<Transition>, GameError> {
    session.seat(seat)?;
    check_legality(session, seat, action.kind())?;

    let transitions = match action {
        Action::PlayCard { card } => play_card(session, seat, *card, evaluator)?,
        Action::RaiseStake => raise_stake(session, seat)?,
        Action::Respond { response } => {
            let max_rung = session.config.max_rung();
            let hand = session.require_hand_mut()?;
            let ladder = hand.escalation.as_mut().ok_or_else(|| {
                GameError::illegal_action("invariant violated: escalating without a ladder")
            })?;
            let event = ladder.respond(seat, *response, max_rung)?;
            settle_ladder_event(session, event)?
        }
        Action::Forfeit => {
            let winner_team = forfeit_winner(session, seat)?;
            resolve_hand_with(session, winner_team, ResolutionCause::Forfeit { by: seat })?
        }
    };

    recompute_legal_actions(session);
    Ok(transitions)
}

/// Map an out-of-set action to the right taxonomy entry: the obligated
/// actor's illegal kind is `IllegalAction`, everyone else is `OutOfTurn`,
/// and phases with no actor reject everything as `IllegalAction`.
fn check_legality(session: &Session, seat: SeatIx, kind: ActionKind) -> Result<(), GameError> {
    let legal = legal_action_kinds(session, seat);
    if legal.contains(&kind) {
        return Ok(());
    }
    match current_actor(session) {
        Some(actor) if actor != seat => Err(GameError::out_of_turn(format!(
            "seat {actor} is the obligated actor in phase {:?}",
            session.phase
        ))),
        Some(_) => Err(GameError::illegal_action(format!(
            "action {kind:?} is not legal in phase {:?}",
            session.phase
        ))),
        None => Err(GameError::illegal_action(format!(
            "no actions are accepted in phase {:?}",
            session.phase
        ))),
    }
}

fn play_card(
    session: &mut Session,
    seat: SeatIx,
    card: crate::domain::cards::Card,
    evaluator: &dyn HandEvaluator,
) -> Result<Vec<Transition>, GameError> {
    let holder = session.seat_mut(seat)?;
    let Some(pos) = holder.hand.iter().position(|c| *c == card) else {
        return Err(GameError::illegal_action(format!(
            "card {card} is not in hand"
        )));
    };
    holder.hand.remove(pos);

    let total_plays = {
        let hand = session.require_hand_mut()?;
        hand.plays.push((seat, card));
        hand.plays.len()
    };

    let full_hand =
        usize::from(session.config.cards_per_hand) * session.seat_count() == total_plays;
    if full_hand {
        let winner_team = evaluated_winner(session, evaluator)?;
        resolve_hand_with(session, winner_team, ResolutionCause::AllCardsPlayed)
    } else {
        let next = session.next_seat(seat);
        session.require_hand_mut()?.turn = Some(next);
        Ok(vec![Transition::TurnBecame { seat: next }])
    }
}

/// Open the escalation ladder. A hand carries at most one ladder: a settled
/// ladder is immutable for the rest of the hand, so re-opening after Accept
/// or Reject is deliberately illegal rather than a fresh ladder.
fn raise_stake(session: &mut Session, seat: SeatIx) -> Result<Vec<Transition>, GameError> {
    let responder = session.responder_for(seat)?;
    let hand = session.require_hand_mut()?;
    if hand.escalation.is_some() {
        return Err(GameError::illegal_action(
            "the ladder has already been used this hand",
        ));
    }
    hand.escalation = Some(EscalationState::open(seat, responder));
    session.phase = Phase::Escalating;
    debug!(session_id = session.id, caller = seat, responder, "ladder opened");
    Ok(vec![Transition::EscalationOpened { rung: 1, responder }])
}

fn settle_ladder_event(
    session: &mut Session,
    event: LadderEvent,
) -> Result<Vec<Transition>, GameError> {
    match event {
        LadderEvent::Advanced { rung, responder } => {
            Ok(vec![Transition::EscalationAdvanced { rung, responder }])
        }
        LadderEvent::Accepted { rung } => {
            let stake = session.config.points_for_rung(rung);
            let hand = session.require_hand_mut()?;
            hand.stake = stake;
            session.phase = Phase::Acting;
            let turn = session.require_turn()?;
            Ok(vec![
                Transition::EscalationSettled {
                    outcome: EscalationOutcome::Accepted { rung },
                },
                Transition::TurnBecame { seat: turn },
            ])
        }
        LadderEvent::Rejected { rung, awarded_rung } => {
            let caller = {
                let hand = session.require_hand()?;
                hand.escalation
                    .as_ref()
                    .map(|e| e.caller)
                    .ok_or_else(|| GameError::illegal_action("ladder vanished mid-settle"))?
            };
            let caller_team = session.seat(caller)?.team;
            let points = session.config.points_for_rung(awarded_rung);
            let mut transitions = vec![Transition::EscalationSettled {
                outcome: EscalationOutcome::Rejected { rung },
            }];
            let crossed = points > 0 && session.award_points(caller_team, points);
            if crossed {
                session.winner_team = Some(caller_team);
                session.phase = Phase::GameEnded;
                if let Some(hand) = session.hand.as_mut() {
                    hand.turn = None;
                }
                transitions.push(Transition::GameEnded {
                    winner_team: caller_team,
                });
            } else {
                session.phase = Phase::Acting;
                let turn = session.require_turn()?;
                transitions.push(Transition::TurnBecame { seat: turn });
            }
            Ok(transitions)
        }
    }
}

/// Winner at full resolution: evaluator scores each seat's committed cards,
/// team totals are summed, ties go to the side of the earlier seat.
fn evaluated_winner(
    session: &Session,
    evaluator: &dyn HandEvaluator,
) -> Result<u8, GameError> {
    let hand = session.require_hand()?;
    let mut team_totals = vec![0u32; usize::from(session.config.team_count())];
    for (ix, _) in session.seats.iter().enumerate() {
        let cards = hand.cards_played_by(ix as SeatIx);
        let score = evaluator.evaluate(&cards);
        let team = session.seats[ix].team;
        team_totals[usize::from(team)] += score.total;
    }
    let best = team_totals.iter().copied().max().unwrap_or(0);
    for seat in &session.seats {
        if team_totals[usize::from(seat.team)] == best {
            return Ok(seat.team);
        }
    }
    Err(GameError::illegal_action("no seats to score"))
}

/// Forfeit resolves in favor of the remaining side: the team of the next
/// seat after the forfeiter that is not on the forfeiter's side.
fn forfeit_winner(session: &Session, seat: SeatIx) -> Result<u8, GameError> {
    let own_team = session.seat(seat)?.team;
    let mut ix = session.next_seat(seat);
    for _ in 0..session.seat_count() {
        let team = session.seat(ix)?.team;
        if team != own_team {
            return Ok(team);
        }
        ix = session.next_seat(ix);
    }
    Err(GameError::illegal_action("no opposing side remains"))
}

fn resolve_hand_with(
    session: &mut Session,
    winner_team: u8,
    cause: ResolutionCause,
) -> Result<Vec<Transition>, GameError> {
    let points = session.config.base_points + session.require_hand()?.stake;
    {
        let hand = session.require_hand_mut()?;
        hand.outcome = Some(HandOutcome {
            winner_team,
            points,
            cause,
        });
        hand.turn = None;
    }
    session.phase = Phase::HandResolved;

    let mut transitions = vec![Transition::HandResolved {
        winner_team,
        points,
    }];
    if session.award_points(winner_team, points) {
        session.winner_team = Some(winner_team);
        session.phase = Phase::GameEnded;
        transitions.push(Transition::GameEnded { winner_team });
    }
    debug!(
        session_id = session.id,
        winner_team, points, phase = ?session.phase, "hand resolved"
    );
    Ok(transitions)
}
