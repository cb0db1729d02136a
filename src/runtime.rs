//! Server-side runtime variant of the engine.
//!
//! Where [`crate::round::Round`] is a pure value, [`GameRuntime`] holds a
//! match as shared mutable arrays, the shape a live multiplayer server
//! process keeps per game. It applies the same card rules (via
//! [`can_follow`]) and publishes every state transition as a discrete
//! [`GameEvent`] through a caller-supplied sink.
//!
//! The runtime provides no locking: callers must guarantee at most one
//! in-flight mutation per game, e.g. one processing queue per game.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::card::{Card, Color, DEFAULT_CARDS_PER_PLAYER, MAX_PLAYERS, MIN_PLAYERS, standard_deck};
use crate::error::{GameError, IllegalPlay};
use crate::round::{Direction, can_follow, seat};
use crate::score::hand_points;

const DEFAULT_TARGET_SCORE: u32 = 500;
const DEFAULT_SEED: u64 = 0x5E1F_5E1F_5E1F_5E1F;

/// One discrete, serializable state transition, for an orchestration layer
/// to forward to clients.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum GameEvent {
    RoundStarted {
        player_in_turn: usize,
        hand_counts: Vec<usize>,
    },
    CardPlayed {
        player: usize,
        card: Card,
        active_color: Color,
    },
    CardDrawn {
        player: usize,
        count: usize,
    },
    TurnChanged {
        player_in_turn: usize,
    },
    RoundEnded {
        winner: usize,
        points: u32,
        scores: Vec<u32>,
    },
    GameEnded {
        winner: usize,
        scores: Vec<u32>,
    },
}

/// Builder enabling deterministic deck injection for tests.
pub struct RuntimeBuilder {
    players: Vec<String>,
    target_score: u32,
    cards_per_player: usize,
    seed: u64,
    deck: Option<Vec<Card>>,
}

impl RuntimeBuilder {
    pub fn new<I, S>(players: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            players: players.into_iter().map(Into::into).collect(),
            target_score: DEFAULT_TARGET_SCORE,
            cards_per_player: DEFAULT_CARDS_PER_PLAYER,
            seed: DEFAULT_SEED,
            deck: None,
        }
    }

    pub fn with_target_score(mut self, target_score: u32) -> Self {
        self.target_score = target_score;
        self
    }

    pub fn with_cards_per_player(mut self, cards_per_player: usize) -> Self {
        self.cards_per_player = cards_per_player;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Injects the deck used for the first round instead of shuffling a
    /// standard one. The end of the vector is the top of the pile: the last
    /// element is dealt first.
    pub fn with_deck(mut self, deck: Vec<Card>) -> Self {
        self.deck = Some(deck);
        self
    }

    pub fn build(self) -> Result<GameRuntime, GameError> {
        let player_count = self.players.len();
        if player_count < MIN_PLAYERS {
            return Err(GameError::InvalidConfiguration(
                "a game requires at least 2 players",
            ));
        }
        if player_count > MAX_PLAYERS {
            return Err(GameError::InvalidConfiguration(
                "a game allows at most 10 players",
            ));
        }
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
        Ok(GameRuntime {
            scores: vec![0; player_count],
            hands: vec![Vec::new(); player_count],
            players: self.players,
            target_score: self.target_score,
            cards_per_player: self.cards_per_player,
            deck: Vec::new(),
            discard: Vec::new(),
            direction: Direction::Clockwise,
            current_color: None,
            player_in_turn: None,
            round_active: false,
            winner: None,
            injected_deck: self.deck,
            rng: StdRng::seed_from_u64(self.seed),
        })
    }
}

/// Mutable-array match state for a server process.
pub struct GameRuntime {
    players: Vec<String>,
    target_score: u32,
    cards_per_player: usize,
    scores: Vec<u32>,
    /// Draw pile; the end of the vector is the top.
    deck: Vec<Card>,
    /// Discard pile; the end of the vector is the top.
    discard: Vec<Card>,
    hands: Vec<Vec<Card>>,
    direction: Direction,
    current_color: Option<Color>,
    player_in_turn: Option<usize>,
    round_active: bool,
    winner: Option<usize>,
    injected_deck: Option<Vec<Card>>,
    rng: StdRng,
}

impl GameRuntime {
    pub fn builder<I, S>(players: I) -> RuntimeBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RuntimeBuilder::new(players)
    }

    // === Queries ===

    pub fn players(&self) -> &[String] {
        &self.players
    }

    pub fn scores(&self) -> &[u32] {
        &self.scores
    }

    pub fn hand(&self, player: usize) -> Result<&[Card], GameError> {
        self.hands
            .get(player)
            .map(Vec::as_slice)
            .ok_or(GameError::InvalidPlayer(player))
    }

    pub fn top_of_discard(&self) -> Option<Card> {
        self.discard.last().copied()
    }

    pub fn active_color(&self) -> Option<Color> {
        self.current_color
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn player_in_turn(&self) -> Option<usize> {
        self.player_in_turn
    }

    pub fn round_active(&self) -> bool {
        self.round_active
    }

    pub fn winner(&self) -> Option<usize> {
        self.winner
    }

    pub fn draw_pile_size(&self) -> usize {
        self.deck.len()
    }

    pub fn discard_pile_size(&self) -> usize {
        self.discard.len()
    }

    // === Transitions ===

    /// Deals a fresh round and flips a non-wild starter. The first turn goes
    /// to `start_index` (the previous round's winner, or the dealer for the
    /// opening round).
    pub fn begin_round(
        &mut self,
        start_index: usize,
        publish: &mut dyn FnMut(GameEvent),
    ) -> Result<(), GameError> {
        if self.winner.is_some() {
            return Err(GameError::GameOver);
        }
        let n = self.players.len();
        if start_index >= n {
            return Err(GameError::InvalidPlayer(start_index));
        }

        self.deck = match self.injected_deck.take() {
            Some(deck) => deck,
            None => {
                let mut deck = standard_deck();
                deck.shuffle(&mut self.rng);
                deck
            }
        };
        self.discard.clear();
        for hand in self.hands.iter_mut() {
            hand.clear();
        }
        self.direction = Direction::Clockwise;

        for _ in 0..self.cards_per_player {
            for player in 0..n {
                let card = self.deck.pop().ok_or(GameError::InvalidConfiguration(
                    "not enough cards to deal the requested hand sizes",
                ))?;
                self.hands[player].push(card);
            }
        }

        // Flip a non-wild starter; wilds go back to the bottom of the pile.
        let mut attempts = 0;
        let starter = loop {
            let card = self.deck.pop().ok_or(GameError::InvalidConfiguration(
                "not enough cards to flip a starter",
            ))?;
            if card.is_wild() {
                attempts += 1;
                if attempts > self.deck.len() + 1 {
                    return Err(GameError::InvalidConfiguration(
                        "draw pile holds no non-wild starter",
                    ));
                }
                self.deck.insert(0, card);
                continue;
            }
            break card;
        };
        self.discard.push(starter);
        self.current_color = starter.color();
        self.player_in_turn = Some(start_index);
        self.round_active = true;

        publish(GameEvent::RoundStarted {
            player_in_turn: start_index,
            hand_counts: self.hands.iter().map(Vec::len).collect(),
        });
        publish(GameEvent::TurnChanged { player_in_turn: start_index });
        Ok(())
    }

    /// Plays `hand_index` from `player`'s hand; `asked_color` iff wild.
    pub fn play(
        &mut self,
        player: usize,
        hand_index: usize,
        asked_color: Option<Color>,
        publish: &mut dyn FnMut(GameEvent),
    ) -> Result<(), GameError> {
        self.assert_turn(player)?;

        let hand = &self.hands[player];
        let card = *hand
            .get(hand_index)
            .ok_or(IllegalPlay::HandIndex(hand_index))?;

        if asked_color.is_some() && !card.is_wild() {
            return Err(IllegalPlay::ColorForbidden.into());
        }
        if asked_color.is_none() && card.is_wild() {
            return Err(IllegalPlay::ColorRequired.into());
        }
        let top = self.top_of_discard().ok_or(GameError::NoActiveRound)?;
        if !can_follow(card, top, self.current_color, hand) {
            return Err(IllegalPlay::CardMismatch.into());
        }

        self.hands[player].remove(hand_index);
        self.discard.push(card);
        self.current_color = card.color().or(asked_color);
        if let Some(active_color) = self.current_color {
            publish(GameEvent::CardPlayed { player, card, active_color });
        }

        let steps = self.apply_card_effects(player, card, publish)?;

        if self.hands[player].is_empty() {
            return self.finish_round(player, publish);
        }

        self.advance(player, steps, publish);
        Ok(())
    }

    /// The player in turn draws one card; the turn advances only when the
    /// drawn card is not immediately playable.
    pub fn draw(
        &mut self,
        player: usize,
        publish: &mut dyn FnMut(GameEvent),
    ) -> Result<(), GameError> {
        self.assert_turn(player)?;

        self.draw_n(player, 1, publish)?;

        let hand = &self.hands[player];
        let drawn = *hand.last().ok_or(GameError::ExhaustedDeck)?;
        let top = self.top_of_discard().ok_or(GameError::NoActiveRound)?;
        if !can_follow(drawn, top, self.current_color, hand) {
            self.advance(player, 1, publish);
        }
        Ok(())
    }

    fn assert_turn(&self, player: usize) -> Result<(), GameError> {
        if self.winner.is_some() {
            return Err(GameError::GameOver);
        }
        if !self.round_active {
            return Err(GameError::NoActiveRound);
        }
        if player >= self.players.len() {
            return Err(GameError::InvalidPlayer(player));
        }
        if self.player_in_turn != Some(player) {
            return Err(IllegalPlay::NotPlayersTurn.into());
        }
        Ok(())
    }

    /// Applies a played card's effect and returns how many seats the turn
    /// advances past the actor.
    fn apply_card_effects(
        &mut self,
        player: usize,
        card: Card,
        publish: &mut dyn FnMut(GameEvent),
    ) -> Result<isize, GameError> {
        let n = self.players.len();
        match card {
            Card::Skip(_) => Ok(2),
            Card::Reverse(_) => {
                self.direction = self.direction.flipped();
                // In two-player games a Reverse acts as a Skip.
                Ok(if n == 2 { 2 } else { 1 })
            }
            Card::Draw(_) => {
                let victim = seat(player, self.direction.step(), n);
                self.draw_n(victim, 2, publish)?;
                Ok(2)
            }
            Card::WildDraw => {
                let victim = seat(player, self.direction.step(), n);
                self.draw_n(victim, 4, publish)?;
                Ok(2)
            }
            Card::Number { .. } | Card::Wild => Ok(1),
        }
    }

    fn advance(&mut self, from: usize, steps: isize, publish: &mut dyn FnMut(GameEvent)) {
        let next = seat(from, steps * self.direction.step(), self.players.len());
        self.player_in_turn = Some(next);
        publish(GameEvent::TurnChanged { player_in_turn: next });
    }

    fn draw_n(
        &mut self,
        player: usize,
        count: usize,
        publish: &mut dyn FnMut(GameEvent),
    ) -> Result<(), GameError> {
        for _ in 0..count {
            if self.deck.is_empty() {
                self.refeed();
            }
            let card = self.deck.pop().ok_or(GameError::ExhaustedDeck)?;
            self.hands[player].push(card);
        }
        publish(GameEvent::CardDrawn { player, count });
        Ok(())
    }

    /// Recycles the discard pile minus its top into a fresh draw pile.
    fn refeed(&mut self) {
        if self.discard.len() <= 1 {
            return;
        }
        let top = self.discard.pop();
        let mut pool: Vec<Card> = self.discard.drain(..).collect();
        pool.shuffle(&mut self.rng);
        self.deck.append(&mut pool);
        if let Some(top) = top {
            self.discard.push(top);
        }
    }

    fn finish_round(
        &mut self,
        winner: usize,
        publish: &mut dyn FnMut(GameEvent),
    ) -> Result<(), GameError> {
        let points: u32 = self
            .hands
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != winner)
            .map(|(_, hand)| hand_points(hand))
            .sum();
        self.scores[winner] += points;
        self.round_active = false;
        self.player_in_turn = None;

        publish(GameEvent::RoundEnded {
            winner,
            points,
            scores: self.scores.clone(),
        });

        if self.scores[winner] >= self.target_score {
            self.winner = Some(winner);
            publish(GameEvent::GameEnded {
                winner,
                scores: self.scores.clone(),
            });
            return Ok(());
        }

        // The round winner leads the next round.
        self.begin_round(winner, publish)
    }
}
