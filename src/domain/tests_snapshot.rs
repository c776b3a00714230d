use crate::config::SessionConfig;
use crate::domain::evaluator::RankEvaluator;
use crate::domain::phase::{apply_action, current_actor, deal_next_hand};
use crate::domain::session::{Seat, Session};
use crate::domain::snapshot::{ParticipantView, SessionSnapshot};
use crate::domain::Action;

fn dealt_session() -> Session {
    let cfg = SessionConfig::sample("snapshot-tests");
    let mut session = Session::new(9, cfg, 5);
    session.seats.push(Seat::new(100, "alice".into(), false, 0));
    session.seats.push(Seat::new(101, "bob".into(), false, 1));
    deal_next_hand(&mut session).unwrap();
    session
}

#[test]
fn snapshot_conceals_cards_behind_counts() {
    let session = dealt_session();
    let snapshot = SessionSnapshot::of(&session);
    assert_eq!(snapshot.seats.len(), 2);
    for seat in &snapshot.seats {
        assert_eq!(seat.card_count, 3);
    }
    let encoded = serde_json::to_string(&snapshot).unwrap();
    // No concealed card may appear anywhere in the public payload.
    for seat in &session.seats {
        for card in &seat.hand {
            assert!(!encoded.contains(&card.to_string()), "leaked {card}");
        }
    }
}

#[test]
fn committed_plays_are_public() {
    let mut session = dealt_session();
    let actor = current_actor(&session).unwrap();
    let card = session.seats[usize::from(actor)].hand[0];
    apply_action(&mut session, actor, &Action::PlayCard { card }, &RankEvaluator).unwrap();

    let snapshot = SessionSnapshot::of(&session);
    let hand = snapshot.hand.unwrap();
    assert_eq!(hand.plays, vec![(actor, card)]);
    assert_eq!(snapshot.seats[usize::from(actor)].card_count, 2);
}

#[test]
fn participant_view_carries_own_secrets_only() {
    let session = dealt_session();
    let actor = current_actor(&session).unwrap();
    let snapshot = SessionSnapshot::of(&session);
    let view = ParticipantView::for_seat(&session, snapshot.clone(), actor);
    assert_eq!(view.your_seat, actor);
    assert_eq!(view.your_cards, session.seats[usize::from(actor)].hand);
    assert_eq!(
        view.your_legal_actions,
        session.seats[usize::from(actor)].legal_actions
    );

    let idle = session.next_seat(actor);
    let idle_view = ParticipantView::for_seat(&session, snapshot, idle);
    assert!(idle_view.your_legal_actions.is_empty());
    assert_ne!(idle_view.your_cards, view.your_cards);
}

#[test]
fn view_serializes_flat() {
    let session = dealt_session();
    let snapshot = SessionSnapshot::of(&session);
    let view = ParticipantView::for_seat(&session, snapshot, 0);
    let value: serde_json::Value = serde_json::to_value(&view).unwrap();
    // The shared snapshot flattens into the same object as the private part.
    assert!(value.get("session_id").is_some());
    assert!(value.get("your_cards").is_some());
}
