//! The authoritative state machine for a single round of UNO.
//!
//! A [`Round`] is an immutable value: `play`, `draw`, `say_uno` and
//! `catch_uno_failure` compute a new round or fail, leaving the receiver
//! untouched. Randomness enters only through the injected shuffler.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::card::{Card, Color, MAX_PLAYERS, MIN_PLAYERS};
use crate::deck::Deck;
use crate::error::{GameError, IllegalPlay};
use crate::hand::PlayerHand;
use crate::score::hand_points;
use crate::shuffle::Shuffler;

/// Direction of play around the table.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Clockwise,
    Counterclockwise,
}

impl Direction {
    /// Seat delta per turn: +1 clockwise, -1 counterclockwise.
    pub fn step(self) -> isize {
        match self {
            Direction::Clockwise => 1,
            Direction::Counterclockwise => -1,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Direction::Clockwise => Direction::Counterclockwise,
            Direction::Counterclockwise => Direction::Clockwise,
        }
    }
}

/// Seat arithmetic with wrap-around in either direction.
pub(crate) fn seat(from: usize, steps: isize, count: usize) -> usize {
    (from as isize + steps).rem_euclid(count as isize) as usize
}

/// Fixed-size set of player indices who said UNO since the last action.
///
/// At most [`MAX_PLAYERS`] players, so a u16 bitset suffices.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
struct UnoSayers(u16);

impl UnoSayers {
    fn insert(self, index: usize) -> Self {
        UnoSayers(self.0 | (1 << index))
    }

    fn contains(self, index: usize) -> bool {
        self.0 & (1 << index) != 0
    }
}

/// Snapshot of one round of play.
#[derive(Clone)]
pub struct Round {
    players: Vec<String>,
    player_count: usize,
    current_player_index: usize,
    draw_deck: Deck,
    discard_deck: Deck,
    hands: Vec<PlayerHand>,
    dealer: usize,
    shuffler: Shuffler,
    cards_per_player: usize,
    start_resolved: bool,
    direction: Direction,
    current_color: Option<Color>,
    // True only mid-transition; always false on externally observable values.
    resolving: bool,
    last_actor: Option<usize>,
    last_uno_sayer: Option<usize>,
    pending_uno_accused: Option<usize>,
    uno_protected_for_window: bool,
    uno_sayers_since_last_action: UnoSayers,
    player_in_turn: Option<usize>,
    scored: bool,
}

impl Round {
    /// Creates a round: builds and shuffles the 108-card deck, deals
    /// `cards_per_player` to each player round-robin, flips a non-wild
    /// starter and resolves its effect to pick the first player in turn.
    ///
    /// A wild drawn as starter is pushed back on top and the deck is
    /// reshuffled; the card re-enters the pool rather than being set aside.
    pub fn new(
        players: Vec<String>,
        dealer: usize,
        shuffler: Shuffler,
        cards_per_player: usize,
    ) -> Result<Round, GameError> {
        if players.len() < MIN_PLAYERS {
            return Err(GameError::InvalidConfiguration(
                "a round requires at least 2 players",
            ));
        }
        if players.len() > MAX_PLAYERS {
            return Err(GameError::InvalidConfiguration(
                "a round allows at most 10 players",
            ));
        }
        if dealer >= players.len() {
            return Err(GameError::InvalidPlayer(dealer));
        }

        let player_count = players.len();
        let mut draw_deck = Deck::standard().shuffle(&shuffler);
        let mut hands = vec![PlayerHand::new(); player_count];

        for _ in 0..cards_per_player {
            for hand in hands.iter_mut() {
                let (card, rest) = draw_deck.deal();
                let card = card.ok_or(GameError::InvalidConfiguration(
                    "not enough cards to deal the requested hand sizes",
                ))?;
                draw_deck = rest;
                *hand = hand.add(card);
            }
        }

        // Flip a non-wild starter.
        let starter = loop {
            let (card, rest) = draw_deck.deal();
            let card = card.ok_or(GameError::InvalidConfiguration(
                "not enough cards to flip a starter",
            ))?;
            if card.is_wild() {
                draw_deck = rest.put_on_top(card).shuffle(&shuffler);
                continue;
            }
            draw_deck = rest;
            break card;
        };

        let round = Round {
            players,
            player_count,
            current_player_index: dealer,
            discard_deck: Deck::empty().put_on_top(starter),
            draw_deck,
            hands,
            dealer,
            shuffler,
            cards_per_player,
            start_resolved: false,
            direction: Direction::Clockwise,
            current_color: starter.color(),
            resolving: false,
            last_actor: None,
            last_uno_sayer: None,
            pending_uno_accused: None,
            uno_protected_for_window: false,
            uno_sayers_since_last_action: UnoSayers::default(),
            player_in_turn: Some(dealer),
            scored: false,
        };
        round.resolve_start()
    }

    /// Applies the starter card's effect exactly once; the `start_resolved`
    /// flag makes a second call a no-op.
    fn resolve_start(self) -> Result<Round, GameError> {
        if self.start_resolved {
            return Ok(self);
        }
        let pc = self.player_count;
        let dir = self.direction;
        let top = self
            .discard_deck
            .top()
            .ok_or(GameError::InvalidConfiguration("round has no starter card"))?;

        let mut s = self;
        s.start_resolved = true;

        match top {
            Card::Draw(_) => {
                let target = seat(s.dealer, dir.step(), pc);
                s = s.draw_to(target, 2)?;
                let next = seat(target, dir.step(), pc);
                Ok(s.with_turn(next))
            }
            Card::Skip(_) => {
                let next = seat(s.dealer, 2 * dir.step(), pc);
                Ok(s.with_turn(next))
            }
            Card::Reverse(_) => {
                // Note: no two-player double step here, unlike a played
                // Reverse.
                let flipped = dir.flipped();
                s.direction = flipped;
                let next = seat(s.dealer, flipped.step(), pc);
                Ok(s.with_turn(next))
            }
            _ => {
                let next = seat(s.dealer, dir.step(), pc);
                Ok(s.with_turn(next))
            }
        }
    }

    fn with_turn(mut self, index: usize) -> Round {
        self.current_player_index = index;
        self.player_in_turn = Some(index);
        self
    }

    /// Moves `count` cards from the draw deck into `player`'s hand,
    /// reshuffling the discard pile (minus its top anchor) whenever the draw
    /// deck runs dry.
    fn draw_to(mut self, player: usize, count: usize) -> Result<Round, GameError> {
        for _ in 0..count {
            let (mut card, mut rest) = self.draw_deck.deal();
            if card.is_none() {
                let anchor = self.discard_deck.top();
                let under = self.discard_deck.under_top();
                if under.is_empty() {
                    return Err(GameError::ExhaustedDeck);
                }
                let reshuffled = under.shuffle(&self.shuffler);
                let (c, r) = reshuffled.deal();
                if c.is_none() {
                    return Err(GameError::ExhaustedDeck);
                }
                card = c;
                rest = r;
                self.discard_deck = match anchor {
                    Some(top) => Deck::empty().put_on_top(top),
                    None => Deck::empty(),
                };
            }
            // card is present here; treat its absence as exhaustion anyway.
            let card = card.ok_or(GameError::ExhaustedDeck)?;
            self.draw_deck = rest;
            self.hands[player] = self.hands[player].add(card);
        }
        Ok(self)
    }

    /// Drops UNO bookkeeping that belonged to a previous turn holder.
    fn clear_stale_uno_state(&mut self, actor: Option<usize>) {
        if let Some(accused) = self.pending_uno_accused {
            if actor != Some(accused) {
                self.pending_uno_accused = None;
                self.uno_protected_for_window = false;
            }
        }
        if let Some(sayer) = self.last_uno_sayer {
            if actor != Some(sayer) {
                self.last_uno_sayer = None;
            }
        }
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

    pub fn dealer(&self) -> usize {
        self.dealer
    }

    pub fn hand(&self, index: usize) -> Result<&PlayerHand, GameError> {
        self.hands.get(index).ok_or(GameError::InvalidPlayer(index))
    }

    pub fn discard_pile(&self) -> &Deck {
        &self.discard_deck
    }

    pub fn draw_pile(&self) -> &Deck {
        &self.draw_deck
    }

    pub fn top_of_discard(&self) -> Option<Card> {
        self.discard_deck.top()
    }

    /// The color a non-wild follow-up play must match.
    pub fn active_color(&self) -> Option<Color> {
        self.current_color
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The player expected to act, or `None` once the round has a winner.
    pub fn player_in_turn(&self) -> Option<usize> {
        self.player_in_turn
    }

    /// The player currently vulnerable to a failed-UNO accusation.
    pub fn pending_uno_accused(&self) -> Option<usize> {
        self.pending_uno_accused
    }

    /// Index of the first player with an empty hand, if any.
    pub fn winner(&self) -> Option<usize> {
        self.hands.iter().position(PlayerHand::is_empty)
    }

    pub fn has_ended(&self) -> bool {
        self.winner().is_some()
    }

    /// Points the winner collects: the summed value of all opponent hands.
    pub fn score(&self) -> Option<u32> {
        let winner = self.winner()?;
        let total = self
            .hands
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != winner)
            .map(|(_, hand)| hand_points(hand.cards()))
            .sum();
        Some(total)
    }

    /// Whether the card at `card_index` in the current player's hand is
    /// legal against the discard top and active color.
    pub fn can_play(&self, card_index: usize) -> bool {
        if self.winner().is_some() {
            return false;
        }
        let hand = match self.hands.get(self.current_player_index) {
            Some(hand) => hand,
            None => return false,
        };
        let played = match hand.get(card_index) {
            Some(card) => card,
            None => return false,
        };
        let top = match self.discard_deck.top() {
            Some(card) => card,
            None => return false,
        };
        can_follow(played, top, self.current_color, hand.cards())
    }

    /// True if the player in turn holds at least one playable card.
    pub fn can_play_any(&self) -> bool {
        if self.winner().is_some() {
            return false;
        }
        let Some(player) = self.player_in_turn else {
            return false;
        };
        let size = self.hands[player].size();
        (0..size).any(|ix| self.can_play(ix))
    }

    // === Transitions ===

    /// Plays the card at `card_index` from the hand of the player in turn.
    ///
    /// `asked_color` must be supplied iff the card is wild. Returns the next
    /// round snapshot; the receiver is unchanged on failure.
    pub fn play(&self, card_index: usize, asked_color: Option<Color>) -> Result<Round, GameError> {
        let mut s = self.clone();

        if s.winner().is_some() {
            return Err(GameError::RoundOver);
        }
        let player = s.player_in_turn.ok_or(GameError::RoundOver)?;

        let hand_size = s.hands[player].size();
        if hand_size == 0 || card_index >= hand_size {
            return Err(IllegalPlay::HandIndex(card_index).into());
        }

        s.clear_stale_uno_state(Some(player));

        let played = s.hands[player]
            .get(card_index)
            .ok_or(IllegalPlay::HandIndex(card_index))?;

        if asked_color.is_some() && !played.is_wild() {
            return Err(IllegalPlay::ColorForbidden.into());
        }
        if asked_color.is_none() && played.is_wild() {
            return Err(IllegalPlay::ColorRequired.into());
        }
        if !s.can_play(card_index) {
            return Err(IllegalPlay::CardMismatch.into());
        }

        // Going from two cards to one opens the accusation window, unless
        // the player already said UNO since the last action.
        if hand_size == 2 {
            s.pending_uno_accused = Some(player);
            s.uno_protected_for_window = s.uno_sayers_since_last_action.contains(player);
            s.last_uno_sayer = None;
        }

        s.resolving = true;
        s.hands[player] = s.hands[player].remove_at(card_index);
        s.discard_deck = s.discard_deck.put_on_top(played);
        s.current_color = played.color().or(asked_color);

        let pc = s.player_count;
        match played {
            Card::Number { .. } | Card::Wild => {
                let next = seat(player, s.direction.step(), pc);
                s = s.with_turn(next);
            }
            Card::Draw(_) => {
                let target = seat(player, s.direction.step(), pc);
                s = s.draw_to(target, 2)?;
                let next = seat(target, s.direction.step(), pc);
                s = s.with_turn(next);
            }
            Card::Skip(_) => {
                let next = seat(player, 2 * s.direction.step(), pc);
                s = s.with_turn(next);
            }
            Card::Reverse(_) => {
                let flipped = s.direction.flipped();
                s.direction = flipped;
                // In a two-player round a Reverse acts as a Skip.
                let steps = if pc == 2 { 2 } else { 1 };
                let next = seat(player, steps * flipped.step(), pc);
                s = s.with_turn(next);
            }
            Card::WildDraw => {
                let target = seat(player, s.direction.step(), pc);
                s = s.draw_to(target, 4)?;
                let next = seat(target, s.direction.step(), pc);
                s = s.with_turn(next);
            }
        }

        s.last_actor = Some(player);
        s.resolving = false;
        s.uno_sayers_since_last_action = UnoSayers::default();

        if s.hands[player].is_empty() {
            s.player_in_turn = None;
        }
        Ok(s)
    }

    /// The player in turn draws one card.
    ///
    /// When the draw deck is empty the discard pile minus its top is
    /// reshuffled into a fresh draw deck first; after the draw a second
    /// lookahead refill keeps the draw deck non-empty when possible. The
    /// turn advances only if the drawn card is not immediately playable.
    pub fn draw(&self) -> Result<Round, GameError> {
        let mut s = self.clone();

        s.clear_stale_uno_state(s.player_in_turn);

        if s.winner().is_some() {
            return Err(GameError::RoundOver);
        }
        let player = s.player_in_turn.ok_or(GameError::RoundOver)?;

        let (mut card, mut rest) = s.draw_deck.deal();
        if card.is_none() {
            let anchor = s.discard_deck.top();
            let under = s.discard_deck.under_top();
            if under.is_empty() {
                return Err(GameError::ExhaustedDeck);
            }
            let reshuffled = under.shuffle(&s.shuffler);
            let (c, r) = reshuffled.deal();
            if c.is_none() {
                return Err(GameError::ExhaustedDeck);
            }
            card = c;
            rest = r;
            s.discard_deck = match anchor {
                Some(top) => Deck::empty().put_on_top(top),
                None => Deck::empty(),
            };
        }
        let card = card.ok_or(GameError::ExhaustedDeck)?;

        s.resolving = true;
        s.draw_deck = rest;
        s.hands[player] = s.hands[player].add(card);
        s.last_actor = Some(player);

        // Lookahead refill so the next draw need not special-case emptiness.
        if s.draw_deck.is_empty() {
            let anchor = s.discard_deck.top();
            let under = s.discard_deck.under_top();
            if !under.is_empty() {
                s.draw_deck = under.shuffle(&s.shuffler);
                s.discard_deck = match anchor {
                    Some(top) => Deck::empty().put_on_top(top),
                    None => Deck::empty(),
                };
            }
        }

        // An unplayable draw passes the turn; a playable one keeps it, but
        // the card stays in hand as an ordinary future play.
        let just_drawn = s.hands[player].size() - 1;
        if !s.can_play(just_drawn) {
            let next = seat(player, s.direction.step(), s.player_count);
            s = s.with_turn(next);
        }

        s.resolving = false;
        s.uno_sayers_since_last_action = UnoSayers::default();
        Ok(s)
    }

    /// Records that `player` declared UNO since the last action; if they are
    /// the pending accusation target this protects them for the window.
    pub fn say_uno(&self, player: usize) -> Result<Round, GameError> {
        if self.winner().is_some() {
            return Err(GameError::RoundOver);
        }
        if player >= self.player_count {
            return Err(GameError::InvalidPlayer(player));
        }

        let mut s = self.clone();
        s.last_uno_sayer = Some(player);
        s.uno_sayers_since_last_action = s.uno_sayers_since_last_action.insert(player);
        if s.pending_uno_accused == Some(player) {
            s.uno_protected_for_window = true;
        }
        Ok(s)
    }

    /// Pure predicate: would an accusation against `accused` stick?
    ///
    /// True only if they are the pending accusation target, unprotected, and
    /// holding exactly one card. An out-of-range accused index is a
    /// validation error, distinct from a plain `false`.
    pub fn check_uno_failure(&self, _accuser: usize, accused: usize) -> Result<bool, GameError> {
        if accused >= self.player_count {
            return Err(GameError::InvalidPlayer(accused));
        }
        if self.pending_uno_accused != Some(accused) {
            return Ok(false);
        }
        if self.uno_protected_for_window {
            return Ok(false);
        }
        Ok(self.hands[accused].size() == 1)
    }

    /// Applies the failed-UNO penalty: four cards to the accused and the
    /// accusation window closes. A false accusation is a no-op, not an
    /// error.
    pub fn catch_uno_failure(&self, accuser: usize, accused: usize) -> Result<Round, GameError> {
        if !self.check_uno_failure(accuser, accused)? {
            return Ok(self.clone());
        }
        let mut s = self.clone().draw_to(accused, 4)?;
        s.pending_uno_accused = None;
        s.uno_protected_for_window = false;
        Ok(s)
    }

    // === Game-level bookkeeping ===

    pub(crate) fn scored(&self) -> bool {
        self.scored
    }

    pub(crate) fn mark_scored(&self) -> Round {
        let mut s = self.clone();
        s.scored = true;
        s
    }
}

/// Card-matching rule shared by the immutable round and the server runtime.
///
/// `hand` is consulted only for the strict WildDraw policy: a WildDraw is
/// legal only when the hand holds no card of the active color.
pub fn can_follow(card: Card, top: Card, active_color: Option<Color>, hand: &[Card]) -> bool {
    match card.color() {
        Some(color) => match top {
            Card::Number { value: top_value, .. } => {
                if let Card::Number { value, .. } = card {
                    Some(color) == active_color || value == top_value
                } else {
                    Some(color) == active_color
                }
            }
            Card::Skip(_) => Some(color) == active_color || matches!(card, Card::Skip(_)),
            Card::Reverse(_) => Some(color) == active_color || matches!(card, Card::Reverse(_)),
            Card::Draw(_) => Some(color) == active_color || matches!(card, Card::Draw(_)),
            Card::Wild | Card::WildDraw => Some(color) == active_color,
        },
        None => match card {
            Card::Wild => true,
            Card::WildDraw => match active_color {
                Some(active) => !hand.iter().any(|c| c.color() == Some(active)),
                None => true,
            },
            _ => false,
        },
    }
}

impl fmt::Debug for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Round")
            .field("players", &self.players)
            .field("current_player_index", &self.current_player_index)
            .field("draw_deck", &self.draw_deck.size())
            .field("discard_deck", &self.discard_deck.size())
            .field("hands", &self.hands)
            .field("dealer", &self.dealer)
            .field("direction", &self.direction)
            .field("current_color", &self.current_color)
            .field("last_actor", &self.last_actor)
            .field("pending_uno_accused", &self.pending_uno_accused)
            .field("player_in_turn", &self.player_in_turn)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Round {
    /// Structural equality over the game state; the injected shuffler is not
    /// comparable and is ignored.
    fn eq(&self, other: &Self) -> bool {
        self.players == other.players
            && self.current_player_index == other.current_player_index
            && self.draw_deck == other.draw_deck
            && self.discard_deck == other.discard_deck
            && self.hands == other.hands
            && self.dealer == other.dealer
            && self.cards_per_player == other.cards_per_player
            && self.start_resolved == other.start_resolved
            && self.direction == other.direction
            && self.current_color == other.current_color
            && self.resolving == other.resolving
            && self.last_actor == other.last_actor
            && self.last_uno_sayer == other.last_uno_sayer
            && self.pending_uno_accused == other.pending_uno_accused
            && self.uno_protected_for_window == other.uno_protected_for_window
            && self.uno_sayers_since_last_action == other.uno_sayers_since_last_action
            && self.player_in_turn == other.player_in_turn
            && self.scored == other.scored
    }
}
