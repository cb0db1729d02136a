//! Match-level wrapper: a sequence of rounds with cumulative scoring.

use std::fmt;

use crate::card::DEFAULT_CARDS_PER_PLAYER;
use crate::error::GameError;
use crate::round::Round;
use crate::shuffle::{Randomizer, Shuffler, standard_randomizer, standard_shuffler};

const DEFAULT_TARGET_SCORE: u32 = 500;
const DEFAULT_SEED: u64 = 0x0DD5_EED5_0DD5_EED5;

/// Builder for a [`Game`], enabling deterministic shuffler and randomizer
/// injection for testing.
pub struct GameBuilder {
    players: Vec<String>,
    target_score: u32,
    cards_per_player: usize,
    seed: u64,
    shuffler: Option<Shuffler>,
    randomizer: Option<Randomizer>,
}

impl GameBuilder {
    pub fn new() -> Self {
        Self {
            players: vec![String::from("A"), String::from("B")],
            target_score: DEFAULT_TARGET_SCORE,
            cards_per_player: DEFAULT_CARDS_PER_PLAYER,
            seed: DEFAULT_SEED,
            shuffler: None,
            randomizer: None,
        }
    }

    pub fn with_players<I, S>(mut self, players: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.players = players.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_target_score(mut self, target_score: u32) -> Self {
        self.target_score = target_score;
        self
    }

    pub fn with_cards_per_player(mut self, cards_per_player: usize) -> Self {
        self.cards_per_player = cards_per_player;
        self
    }

    /// Seed for the default shuffler/randomizer. Ignored when explicit
    /// functions are injected.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_shuffler(mut self, shuffler: Shuffler) -> Self {
        self.shuffler = Some(shuffler);
        self
    }

    pub fn with_randomizer(mut self, randomizer: Randomizer) -> Self {
        self.randomizer = Some(randomizer);
        self
    }

    pub fn build(self) -> Result<Game, GameError> {
        if self.target_score == 0 {
            return Err(GameError::InvalidConfiguration(
                "a game requires a target score of more than 0",
            ));
        }
        if self.cards_per_player == 0 {
            return Err(GameError::InvalidConfiguration(
                "a game requires dealing at least 1 card per player",
            ));
        }
        let player_count = self.players.len();
        Ok(Game {
            scores: vec![0; player_count],
            players: self.players,
            player_count,
            target_score: self.target_score,
            cards_per_player: self.cards_per_player,
            current_round: None,
            winner: None,
            shuffler: self
                .shuffler
                .unwrap_or_else(|| standard_shuffler(self.seed)),
            randomizer: self
                .randomizer
                .unwrap_or_else(|| standard_randomizer(self.seed)),
        })
    }
}

impl Default for GameBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A match: successive rounds, cumulative scores, first player to reach the
/// target score wins.
///
/// A `Game` never mutates a [`Round`] in place; it holds successive
/// immutable snapshots and is itself replaced wholesale on every transition.
#[derive(Clone)]
pub struct Game {
    players: Vec<String>,
    player_count: usize,
    target_score: u32,
    scores: Vec<u32>,
    cards_per_player: usize,
    current_round: Option<Round>,
    winner: Option<usize>,
    shuffler: Shuffler,
    randomizer: Randomizer,
}

impl Game {
    pub fn builder() -> GameBuilder {
        GameBuilder::new()
    }

    // === Queries ===

    pub fn player(&self, index: usize) -> Result<&str, GameError> {
        self.players
            .get(index)
            .map(String::as_str)
            .ok_or(GameError::InvalidPlayer(index))
    }

    pub fn players(&self) -> &[String] {
        &self.players
    }

    pub fn player_count(&self) -> usize {
        self.player_count
    }

    pub fn target_score(&self) -> u32 {
        self.target_score
    }

    pub fn cards_per_player(&self) -> usize {
        self.cards_per_player
    }

    /// Cumulative scores, indices parallel to the player list.
    pub fn scores(&self) -> &[u32] {
        &self.scores
    }

    pub fn current_round(&self) -> Option<&Round> {
        self.current_round.as_ref()
    }

    /// Overall winner index, once some score reached the target.
    pub fn winner(&self) -> Option<usize> {
        self.winner
    }

    pub fn has_ended(&self) -> bool {
        self.winner.is_some()
    }

    // === Transitions ===

    /// Starts a fresh round with a dealer chosen by the injected randomizer.
    pub fn start_new_round(&self) -> Result<Game, GameError> {
        if self.winner.is_some() {
            return Err(GameError::GameOver);
        }
        let dealer = (self.randomizer)(self.player_count);
        let round = Round::new(
            self.players.clone(),
            dealer,
            self.shuffler.clone(),
            self.cards_per_player,
        )?;
        let mut g = self.clone();
        g.current_round = Some(round);
        Ok(g)
    }

    /// Applies a round-level transition to the current round, then resolves
    /// a possible round end (score accumulation, next round or game over).
    pub fn play<F>(&self, step: F) -> Result<Game, GameError>
    where
        F: FnOnce(&Round) -> Result<Round, GameError>,
    {
        let round = self.current_round.as_ref().ok_or(GameError::NoActiveRound)?;
        let next = step(round)?;
        let mut g = self.clone();
        g.current_round = Some(next);
        g.resolve_round_end()
    }

    /// Awards the round winner the opponents' hand points, at most once per
    /// round. Ends the game at the target score, otherwise deals the next
    /// round. A round without a winner, or one already scored, is left
    /// untouched.
    pub fn resolve_round_end(&self) -> Result<Game, GameError> {
        let Some(round) = self.current_round.as_ref() else {
            return Ok(self.clone());
        };
        let Some(winner) = round.winner() else {
            return Ok(self.clone());
        };
        if round.scored() {
            return Ok(self.clone());
        }

        let points = round.score().unwrap_or(0);
        let mut g = self.clone();
        g.scores[winner] += points;

        if g.scores[winner] >= g.target_score {
            g.winner = Some(winner);
            g.current_round = None;
            return Ok(g);
        }
        g.current_round = Some(round.mark_scored());
        g.start_new_round()
    }
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("players", &self.players)
            .field("target_score", &self.target_score)
            .field("scores", &self.scores)
            .field("cards_per_player", &self.cards_per_player)
            .field("current_round", &self.current_round)
            .field("winner", &self.winner)
            .finish_non_exhaustive()
    }
}
