//! Deterministic card dealing.
//!
//! Dealing is seeded so a session's hands are reproducible: the session
//! carries one base seed and each hand derives its own stream from it.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::domain::cards::{full_deck, Card};
use crate::errors::GameError;

/// Derive the per-hand seed from the session seed and the 1-based hand number.
///
/// SplitMix-style finalizer keeps consecutive hand numbers uncorrelated.
pub fn derive_hand_seed(session_seed: u64, hand_no: u32) -> u64 {
    let mut z = session_seed
        .wrapping_add(u64::from(hand_no).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z ^= z >> 30;
    z = z.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z ^= z >> 27;
    z = z.wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Deal one hand of `cards_per_seat` cards to each of `seat_count` seats from
/// a freshly shuffled deck. Hands are sorted for stable display; the rest of
/// the deck is discarded.
pub fn deal_hands(
    seat_count: usize,
    cards_per_seat: u8,
    seed: u64,
) -> Result<Vec<Vec<Card>>, GameError> {
    if !(2..=6).contains(&seat_count) {
        return Err(GameError::illegal_action("seat count must be 2..=6"));
    }
    if cards_per_seat == 0 || seat_count * usize::from(cards_per_seat) > 52 {
        return Err(GameError::illegal_action(
            "cards per seat must be at least 1 and fit the deck",
        ));
    }

    let mut deck = full_deck();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    deck.shuffle(&mut rng);

    let per = usize::from(cards_per_seat);
    let mut hands = Vec::with_capacity(seat_count);
    for seat in 0..seat_count {
        let start = seat * per;
        let mut hand = deck[start..start + per].to_vec();
        hand.sort();
        hands.push(hand);
    }
    Ok(hands)
}
