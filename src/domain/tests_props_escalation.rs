//! Property tests for the escalation ladder.

use proptest::prelude::*;

use crate::domain::action::EscalationResponse;
use crate::domain::escalation::{EscalationState, LadderEvent};

fn response_strategy() -> impl Strategy<Value = EscalationResponse> {
    prop_oneof![
        Just(EscalationResponse::Accept),
        Just(EscalationResponse::Reject),
        Just(EscalationResponse::Raise),
    ]
}

proptest! {
    /// The rung never regresses and never skips, whatever the obligated
    /// responder does.
    #[test]
    fn rung_is_monotonic_and_dense(
        responses in prop::collection::vec(response_strategy(), 1..16),
        max_rung in 1u8..=8,
    ) {
        let mut ladder = EscalationState::open(0, 1);
        let mut last_rung = ladder.rung;
        for response in responses {
            if ladder.is_terminal() {
                break;
            }
            let seat = ladder.responder;
            if let Ok(event) = ladder.respond(seat, response, max_rung) {
                prop_assert!(ladder.rung >= last_rung);
                prop_assert!(ladder.rung - last_rung <= 1);
                if let LadderEvent::Advanced { rung, .. } = event {
                    prop_assert_eq!(rung, last_rung + 1);
                }
                last_rung = ladder.rung;
            } else {
                // A rejected input must leave the ladder untouched.
                prop_assert_eq!(ladder.rung, last_rung);
            }
            prop_assert!(ladder.rung <= max_rung);
        }
    }

    /// With a finite rung cap the ladder always terminates: at most
    /// `max_rung - 1` raises can succeed, then only accept or reject remain.
    #[test]
    fn ladder_terminates_within_the_cap(max_rung in 1u8..=8) {
        let mut ladder = EscalationState::open(0, 1);
        let mut raises = 0;
        while ladder.respond(ladder.responder, EscalationResponse::Raise, max_rung).is_ok() {
            raises += 1;
            prop_assert!(raises < max_rung);
        }
        prop_assert_eq!(ladder.rung, max_rung);
        // The cap only forbids raising; settling still works.
        let seat = ladder.responder;
        prop_assert!(ladder.respond(seat, EscalationResponse::Accept, max_rung).is_ok());
        prop_assert!(ladder.is_terminal());
    }

    /// Obligation strictly alternates between the two sides while raising.
    #[test]
    fn obligation_alternates(raises in 1u8..=7) {
        let max_rung = 8;
        let mut ladder = EscalationState::open(0, 1);
        for i in 0..raises {
            let expected_responder = if i % 2 == 0 { 1 } else { 0 };
            prop_assert_eq!(ladder.responder, expected_responder);
            ladder.respond(expected_responder, EscalationResponse::Raise, max_rung).unwrap();
        }
        prop_assert_eq!(ladder.rung, raises + 1);
    }
}
