//! UNO round engine: an authoritative, value-based state machine for a
//! single round of play plus the match-level wrapper around it.
//!
//! The core performs no I/O and owns no randomness: shuffling and dealer
//! selection are injected functions, so every game is deterministic and
//! replayable under test. All round and game transitions compute a new
//! immutable snapshot or fail, never mutating in place. A separate
//! [`runtime::GameRuntime`] offers the same rules over shared mutable
//! arrays with event publication, the shape a live server process keeps.

pub mod card;
pub mod deck;
pub mod error;
pub mod game;
pub mod hand;
pub mod round;
pub mod runtime;
pub mod score;
pub mod shuffle;

pub use crate::card::{Card, Color};
pub use crate::deck::Deck;
pub use crate::error::{GameError, IllegalPlay};
pub use crate::game::{Game, GameBuilder};
pub use crate::hand::PlayerHand;
pub use crate::round::{Direction, Round, can_follow};
pub use crate::runtime::{GameEvent, GameRuntime, RuntimeBuilder};
pub use crate::score::{card_points, hand_points};
pub use crate::shuffle::{
    Randomizer, Shuffler, constant_randomizer, identity_shuffler, standard_randomizer,
    standard_shuffler,
};
