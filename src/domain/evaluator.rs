//! Hand evaluator seam.
//!
//! Per-variant scoring tables are an external collaborator: the state
//! machine only needs a pure function from a set of cards to scored
//! combinations. `RankEvaluator` is the reference implementation used by
//! default and in tests; real variants plug their own.

use crate::domain::cards::{Card, Rank};

/// One detected combination and its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combination {
    pub label: &'static str,
    pub cards: Vec<Card>,
    pub score: u32,
}

/// Evaluation result for one set of cards.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HandScore {
    pub combinations: Vec<Combination>,
    pub total: u32,
}

/// Pure mapping from cards to scored combinations.
pub trait HandEvaluator: Send + Sync {
    fn evaluate(&self, cards: &[Card]) -> HandScore;
}

/// Reference evaluator: same-rank sets score rank value × multiplicity²,
/// leftover cards score their pip value.
pub struct RankEvaluator;

impl HandEvaluator for RankEvaluator {
    fn evaluate(&self, cards: &[Card]) -> HandScore {
        let mut combinations = Vec::new();
        let mut total = 0;

        for rank in Rank::ALL {
            let set: Vec<Card> = cards.iter().copied().filter(|c| c.rank == rank).collect();
            match set.len() {
                0 => {}
                1 => total += rank.value(),
                n => {
                    let score = rank.value() * (n as u32) * (n as u32);
                    total += score;
                    combinations.push(Combination {
                        label: match n {
                            2 => "pair",
                            3 => "triple",
                            _ => "quad",
                        },
                        cards: set,
                        score,
                    });
                }
            }
        }

        HandScore {
            combinations,
            total,
        }
    }
}
