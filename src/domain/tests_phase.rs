use crate::config::{FirstActorRule, SessionConfig, TeamLayout};
use crate::domain::action::{Action, ActionKind, EscalationResponse};
use crate::domain::evaluator::RankEvaluator;
use crate::domain::phase::{apply_action, current_actor, deal_next_hand, Transition};
use crate::domain::session::{Phase, Seat, SeatIx, Session};
use crate::errors::GameError;

fn full_session(capacity: u8) -> Session {
    let mut cfg = SessionConfig::sample("phase-tests");
    cfg.capacity = capacity;
    // High target so tests control when the game ends.
    cfg.target_score = 1000;
    let mut session = Session::new(1, cfg, 42);
    for i in 0..capacity {
        let team = session.config.team_of(i);
        session
            .seats
            .push(Seat::new(i64::from(i) + 100, format!("p{i}"), false, team));
    }
    session
}

fn play_first_card(session: &mut Session, seat: SeatIx) -> Vec<Transition> {
    let card = session.seats[usize::from(seat)].hand[0];
    apply_action(session, seat, &Action::PlayCard { card }, &RankEvaluator).unwrap()
}

#[test]
fn deal_requires_a_full_room() {
    let mut cfg = SessionConfig::sample("short");
    cfg.capacity = 3;
    let mut session = Session::new(1, cfg, 1);
    session.seats.push(Seat::new(100, "p0".into(), false, 0));
    let err = deal_next_hand(&mut session).unwrap_err();
    assert!(matches!(err, GameError::IllegalAction(_)));
    assert_eq!(session.phase, Phase::Waiting);
}

#[test]
fn first_deal_sets_turn_left_of_dealer() {
    let mut session = full_session(3);
    let transitions = deal_next_hand(&mut session).unwrap();
    assert_eq!(session.phase, Phase::Acting);
    assert_eq!(session.hands_dealt, 1);
    // Hand 1: dealer is seat 0, left of dealer acts first.
    assert_eq!(transitions[0], Transition::Dealt { hand_no: 1 });
    assert_eq!(transitions[1], Transition::TurnBecame { seat: 1 });
    assert_eq!(current_actor(&session), Some(1));
    for seat in &session.seats {
        assert_eq!(seat.hand.len(), 3);
    }
}

#[test]
fn dealer_first_rule_is_honored() {
    let mut session = full_session(3);
    session.config.first_actor = FirstActorRule::Dealer;
    deal_next_hand(&mut session).unwrap();
    assert_eq!(current_actor(&session), Some(0));
}

#[test]
fn legal_actions_follow_the_turn() {
    let mut session = full_session(2);
    deal_next_hand(&mut session).unwrap();
    let actor = current_actor(&session).unwrap();
    let idle = session.next_seat(actor);
    assert_eq!(
        session.seats[usize::from(actor)].legal_actions,
        vec![ActionKind::PlayCard, ActionKind::Forfeit, ActionKind::RaiseStake]
    );
    assert!(session.seats[usize::from(idle)].legal_actions.is_empty());
}

#[test]
fn out_of_turn_play_is_rejected_without_mutation() {
    let mut session = full_session(2);
    deal_next_hand(&mut session).unwrap();
    let idle = session.next_seat(current_actor(&session).unwrap());
    let card = session.seats[usize::from(idle)].hand[0];
    let before = session.clone();
    let err =
        apply_action(&mut session, idle, &Action::PlayCard { card }, &RankEvaluator).unwrap_err();
    assert!(matches!(err, GameError::OutOfTurn(_)));
    assert_eq!(session.hand, before.hand);
    assert_eq!(session.seats, before.seats);
}

#[test]
fn playing_a_card_not_in_hand_is_illegal() {
    let mut session = full_session(2);
    deal_next_hand(&mut session).unwrap();
    let actor = current_actor(&session).unwrap();
    let other = session.next_seat(actor);
    // A card held by the opponent cannot be in the actor's hand.
    let foreign = session.seats[usize::from(other)].hand[0];
    let err = apply_action(
        &mut session,
        actor,
        &Action::PlayCard { card: foreign },
        &RankEvaluator,
    )
    .unwrap_err();
    assert!(matches!(err, GameError::IllegalAction(_)));
}

#[test]
fn turn_rotates_clockwise_after_each_play() {
    let mut session = full_session(3);
    deal_next_hand(&mut session).unwrap();
    let first = current_actor(&session).unwrap();
    let transitions = play_first_card(&mut session, first);
    assert_eq!(
        transitions,
        vec![Transition::TurnBecame {
            seat: session.next_seat(first)
        }]
    );
}

#[test]
fn hand_resolves_when_all_cards_are_played() {
    let mut session = full_session(2);
    deal_next_hand(&mut session).unwrap();
    let mut last = Vec::new();
    for _ in 0..6 {
        let actor = current_actor(&session).unwrap();
        last = play_first_card(&mut session, actor);
    }
    assert_eq!(session.phase, Phase::HandResolved);
    assert!(matches!(last[0], Transition::HandResolved { points: 1, .. }));
    let outcome = session.hand.as_ref().unwrap().outcome.unwrap();
    assert_eq!(session.scores[usize::from(outcome.winner_team)], 1);
    assert_eq!(current_actor(&session), None);
    for seat in &session.seats {
        assert!(seat.legal_actions.is_empty());
    }
}

#[test]
fn no_actions_are_accepted_after_resolution() {
    let mut session = full_session(2);
    deal_next_hand(&mut session).unwrap();
    for _ in 0..6 {
        let actor = current_actor(&session).unwrap();
        play_first_card(&mut session, actor);
    }
    let err = apply_action(&mut session, 0, &Action::Forfeit, &RankEvaluator).unwrap_err();
    assert!(matches!(err, GameError::IllegalAction(_)));
}

#[test]
fn redeal_rotates_dealer_and_archives_the_hand() {
    let mut session = full_session(2);
    deal_next_hand(&mut session).unwrap();
    let actor = current_actor(&session).unwrap();
    apply_action(&mut session, actor, &Action::Forfeit, &RankEvaluator).unwrap();
    assert_eq!(session.phase, Phase::HandResolved);

    deal_next_hand(&mut session).unwrap();
    assert_eq!(session.hands_dealt, 2);
    let hand = session.hand.as_ref().unwrap();
    assert_eq!(hand.dealer, 1);
    assert_eq!(hand.turn, Some(0));
    assert_eq!(session.history.len(), 1);
    assert_eq!(session.history[0].hand_no, 1);
}

#[test]
fn deals_differ_between_hands_with_the_same_session_seed() {
    let mut session = full_session(2);
    deal_next_hand(&mut session).unwrap();
    let first: Vec<_> = session.seats[0].hand.clone();
    let actor = current_actor(&session).unwrap();
    apply_action(&mut session, actor, &Action::Forfeit, &RankEvaluator).unwrap();
    deal_next_hand(&mut session).unwrap();
    assert_ne!(session.seats[0].hand, first);
}

#[test]
fn forfeit_awards_the_opposing_side() {
    let mut session = full_session(3);
    deal_next_hand(&mut session).unwrap();
    let actor = current_actor(&session).unwrap();
    let transitions = apply_action(&mut session, actor, &Action::Forfeit, &RankEvaluator).unwrap();
    let winner = session.next_seat(actor);
    assert_eq!(
        transitions,
        vec![Transition::HandResolved {
            winner_team: winner,
            points: 1
        }]
    );
    assert_eq!(session.scores[usize::from(winner)], 1);
    assert_eq!(session.scores[usize::from(actor)], 0);
}

#[test]
fn forfeit_in_pairs_skips_the_teammate() {
    let mut session = full_session(4);
    session.config.teams = TeamLayout::Pairs;
    for (ix, seat) in session.seats.iter_mut().enumerate() {
        seat.team = (ix % 2) as u8;
    }
    session.scores = vec![0, 0];
    deal_next_hand(&mut session).unwrap();
    // Force the turn to a known seat so the winner is predictable.
    session.hand.as_mut().unwrap().turn = Some(3);
    crate::domain::phase::recompute_legal_actions(&mut session);
    apply_action(&mut session, 3, &Action::Forfeit, &RankEvaluator).unwrap();
    // Seat 3 is team 1; seat 0 (team 0) is the next opposing seat.
    assert_eq!(session.scores, vec![1, 0]);
}

#[test]
fn raising_opens_the_ladder_for_the_opposing_speaker() {
    let mut session = full_session(2);
    deal_next_hand(&mut session).unwrap();
    let actor = current_actor(&session).unwrap();
    let responder = session.next_seat(actor);
    let transitions = apply_action(&mut session, actor, &Action::RaiseStake, &RankEvaluator).unwrap();
    assert_eq!(
        transitions,
        vec![Transition::EscalationOpened { rung: 1, responder }]
    );
    assert_eq!(session.phase, Phase::Escalating);
    assert_eq!(current_actor(&session), Some(responder));
    assert_eq!(
        session.seats[usize::from(responder)].legal_actions,
        vec![ActionKind::Respond]
    );
    assert!(session.seats[usize::from(actor)].legal_actions.is_empty());
}

#[test]
fn accept_locks_the_stake_and_returns_the_turn() {
    let mut session = full_session(2);
    deal_next_hand(&mut session).unwrap();
    let actor = current_actor(&session).unwrap();
    let responder = session.next_seat(actor);
    apply_action(&mut session, actor, &Action::RaiseStake, &RankEvaluator).unwrap();
    apply_action(
        &mut session,
        responder,
        &Action::Respond {
            response: EscalationResponse::Accept,
        },
        &RankEvaluator,
    )
    .unwrap();
    assert_eq!(session.phase, Phase::Acting);
    assert_eq!(current_actor(&session), Some(actor));
    // Rung 1 of the sample ladder is worth 2, contingent on the hand.
    assert_eq!(session.hand.as_ref().unwrap().stake, 2);
    assert_eq!(session.scores, vec![0, 0]);
}

#[test]
fn accepted_stake_is_paid_with_the_hand() {
    let mut session = full_session(2);
    deal_next_hand(&mut session).unwrap();
    let actor = current_actor(&session).unwrap();
    let responder = session.next_seat(actor);
    apply_action(&mut session, actor, &Action::RaiseStake, &RankEvaluator).unwrap();
    apply_action(
        &mut session,
        responder,
        &Action::Respond {
            response: EscalationResponse::Accept,
        },
        &RankEvaluator,
    )
    .unwrap();
    for _ in 0..6 {
        let seat = current_actor(&session).unwrap();
        play_first_card(&mut session, seat);
    }
    let outcome = session.hand.as_ref().unwrap().outcome.unwrap();
    // base 1 + rung-1 stake 2.
    assert_eq!(outcome.points, 3);
    assert_eq!(session.scores[usize::from(outcome.winner_team)], 3);
}

#[test]
fn reject_at_rung_one_awards_nothing_immediately() {
    let mut session = full_session(2);
    deal_next_hand(&mut session).unwrap();
    let actor = current_actor(&session).unwrap();
    let responder = session.next_seat(actor);
    apply_action(&mut session, actor, &Action::RaiseStake, &RankEvaluator).unwrap();
    apply_action(
        &mut session,
        responder,
        &Action::Respond {
            response: EscalationResponse::Reject,
        },
        &RankEvaluator,
    )
    .unwrap();
    assert_eq!(session.phase, Phase::Acting);
    assert_eq!(session.scores, vec![0, 0]);
    assert_eq!(session.hand.as_ref().unwrap().stake, 0);
}

#[test]
fn reject_after_counter_raise_awards_the_previous_rung() {
    let mut session = full_session(2);
    deal_next_hand(&mut session).unwrap();
    let actor = current_actor(&session).unwrap();
    let responder = session.next_seat(actor);
    apply_action(&mut session, actor, &Action::RaiseStake, &RankEvaluator).unwrap();
    apply_action(
        &mut session,
        responder,
        &Action::Respond {
            response: EscalationResponse::Raise,
        },
        &RankEvaluator,
    )
    .unwrap();
    // Obligation flipped back to the original caller, who rejects rung 2.
    apply_action(
        &mut session,
        actor,
        &Action::Respond {
            response: EscalationResponse::Reject,
        },
        &RankEvaluator,
    )
    .unwrap();
    // Rung 1 (worth 2) goes to the counter-raiser's side immediately.
    assert_eq!(session.scores[usize::from(responder)], 2);
    assert_eq!(session.scores[usize::from(actor)], 0);
    assert_eq!(session.phase, Phase::Acting);
    assert_eq!(current_actor(&session), Some(actor));
}

#[test]
fn reject_payoff_can_end_the_game() {
    let mut session = full_session(2);
    session.config.target_score = 2;
    deal_next_hand(&mut session).unwrap();
    let actor = current_actor(&session).unwrap();
    let responder = session.next_seat(actor);
    apply_action(&mut session, actor, &Action::RaiseStake, &RankEvaluator).unwrap();
    apply_action(
        &mut session,
        responder,
        &Action::Respond {
            response: EscalationResponse::Raise,
        },
        &RankEvaluator,
    )
    .unwrap();
    let transitions = apply_action(
        &mut session,
        actor,
        &Action::Respond {
            response: EscalationResponse::Reject,
        },
        &RankEvaluator,
    )
    .unwrap();
    assert_eq!(session.phase, Phase::GameEnded);
    assert_eq!(session.winner_team, Some(responder));
    assert!(transitions.contains(&Transition::GameEnded {
        winner_team: responder
    }));
    assert_eq!(current_actor(&session), None);
}

#[test]
fn only_one_ladder_per_hand() {
    let mut session = full_session(2);
    deal_next_hand(&mut session).unwrap();
    let actor = current_actor(&session).unwrap();
    let responder = session.next_seat(actor);
    apply_action(&mut session, actor, &Action::RaiseStake, &RankEvaluator).unwrap();
    apply_action(
        &mut session,
        responder,
        &Action::Respond {
            response: EscalationResponse::Reject,
        },
        &RankEvaluator,
    )
    .unwrap();
    // Back in Acting, but RaiseStake is no longer offered or accepted.
    assert!(!session.seats[usize::from(actor)]
        .legal_actions
        .contains(&ActionKind::RaiseStake));
    let err = apply_action(&mut session, actor, &Action::RaiseStake, &RankEvaluator).unwrap_err();
    assert!(matches!(err, GameError::IllegalAction(_)));
}

#[test]
fn raise_is_not_offered_without_rungs() {
    let mut session = full_session(2);
    session.config.rung_points = Vec::new();
    deal_next_hand(&mut session).unwrap();
    let actor = current_actor(&session).unwrap();
    assert!(!session.seats[usize::from(actor)]
        .legal_actions
        .contains(&ActionKind::RaiseStake));
}

#[test]
fn plays_are_rejected_while_the_ladder_is_open() {
    let mut session = full_session(2);
    deal_next_hand(&mut session).unwrap();
    let actor = current_actor(&session).unwrap();
    apply_action(&mut session, actor, &Action::RaiseStake, &RankEvaluator).unwrap();
    let card = session.seats[usize::from(actor)].hand[0];
    let err =
        apply_action(&mut session, actor, &Action::PlayCard { card }, &RankEvaluator).unwrap_err();
    // The responder is the obligated actor now.
    assert!(matches!(err, GameError::OutOfTurn(_)));
}

#[test]
fn reaching_the_target_ends_the_game() {
    let mut session = full_session(2);
    session.config.target_score = 1;
    deal_next_hand(&mut session).unwrap();
    let actor = current_actor(&session).unwrap();
    let transitions = apply_action(&mut session, actor, &Action::Forfeit, &RankEvaluator).unwrap();
    let winner = session.next_seat(actor);
    assert_eq!(session.phase, Phase::GameEnded);
    assert_eq!(session.winner_team, Some(winner));
    assert_eq!(
        transitions,
        vec![
            Transition::HandResolved {
                winner_team: winner,
                points: 1
            },
            Transition::GameEnded { winner_team: winner },
        ]
    );
    let err = deal_next_hand(&mut session).unwrap_err();
    assert!(matches!(err, GameError::IllegalAction(_)));
}
