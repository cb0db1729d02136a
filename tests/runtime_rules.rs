use uno_engine::card::DECK_SIZE;
use uno_engine::{Card, Color, GameError, GameEvent, GameRuntime, IllegalPlay};

fn number(color: Color, value: u8) -> Card {
    Card::Number { color, value }
}

fn players(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("P{i}")).collect()
}

#[test]
fn builder_rejects_bad_configurations() {
    assert!(matches!(
        GameRuntime::builder(players(1)).build(),
        Err(GameError::InvalidConfiguration(_))
    ));
    assert!(matches!(
        GameRuntime::builder(players(11)).build(),
        Err(GameError::InvalidConfiguration(_))
    ));
    assert!(matches!(
        GameRuntime::builder(players(2)).with_target_score(0).build(),
        Err(GameError::InvalidConfiguration(_))
    ));
    assert!(matches!(
        GameRuntime::builder(players(2)).with_cards_per_player(0).build(),
        Err(GameError::InvalidConfiguration(_))
    ));
}

#[test]
fn begin_round_deals_flips_and_announces() -> Result<(), GameError> {
    // Pile bottom to top: the last element is dealt first.
    let deck = vec![
        number(Color::Red, 7),
        number(Color::Green, 5),
        number(Color::Blue, 9),
        number(Color::Red, 5),
    ];
    let mut rt = GameRuntime::builder(players(2))
        .with_cards_per_player(1)
        .with_deck(deck)
        .build()?;

    let mut events = Vec::new();
    rt.begin_round(0, &mut |e| events.push(e))?;

    assert_eq!(rt.hand(0)?, &[number(Color::Red, 5)]);
    assert_eq!(rt.hand(1)?, &[number(Color::Blue, 9)]);
    assert_eq!(rt.top_of_discard(), Some(number(Color::Green, 5)));
    assert_eq!(rt.active_color(), Some(Color::Green));
    assert_eq!(rt.player_in_turn(), Some(0));
    assert!(rt.round_active());
    assert_eq!(rt.draw_pile_size(), 1);
    assert_eq!(
        events,
        vec![
            GameEvent::RoundStarted { player_in_turn: 0, hand_counts: vec![1, 1] },
            GameEvent::TurnChanged { player_in_turn: 0 },
        ]
    );
    Ok(())
}

#[test]
fn winning_play_reaching_the_target_ends_the_game() -> Result<(), GameError> {
    let deck = vec![
        number(Color::Red, 7),
        number(Color::Green, 5),
        number(Color::Blue, 9),
        number(Color::Red, 5),
    ];
    let mut rt = GameRuntime::builder(players(2))
        .with_cards_per_player(1)
        .with_target_score(5)
        .with_deck(deck)
        .build()?;
    rt.begin_round(0, &mut |_| {})?;

    // Red 5 value-matches the Green 5 starter and empties the hand.
    let mut events = Vec::new();
    rt.play(0, 0, None, &mut |e| events.push(e))?;

    assert_eq!(
        events,
        vec![
            GameEvent::CardPlayed {
                player: 0,
                card: number(Color::Red, 5),
                active_color: Color::Red,
            },
            GameEvent::RoundEnded { winner: 0, points: 9, scores: vec![9, 0] },
            GameEvent::GameEnded { winner: 0, scores: vec![9, 0] },
        ]
    );
    assert_eq!(rt.winner(), Some(0));
    assert_eq!(rt.scores(), &[9, 0]);
    assert!(!rt.round_active());
    assert_eq!(rt.player_in_turn(), None);

    assert!(matches!(
        rt.play(1, 0, None, &mut |_| {}),
        Err(GameError::GameOver)
    ));
    assert!(matches!(
        rt.begin_round(0, &mut |_| {}),
        Err(GameError::GameOver)
    ));
    Ok(())
}

#[test]
fn round_win_below_the_target_chains_into_the_next_round() -> Result<(), GameError> {
    let deck = vec![
        number(Color::Red, 7),
        number(Color::Green, 5),
        number(Color::Blue, 9),
        number(Color::Red, 5),
    ];
    let mut rt = GameRuntime::builder(players(2))
        .with_cards_per_player(1)
        .with_deck(deck)
        .build()?;
    rt.begin_round(0, &mut |_| {})?;

    let mut events = Vec::new();
    rt.play(0, 0, None, &mut |e| events.push(e))?;

    assert_eq!(rt.scores(), &[9, 0]);
    assert_eq!(rt.winner(), None);
    assert!(rt.round_active());
    // The winner leads the follow-up round.
    assert_eq!(rt.player_in_turn(), Some(0));

    // The injected pile was consumed; round two deals from a full shuffled
    // standard deck.
    assert_eq!(rt.hand(0)?.len(), 1);
    assert_eq!(rt.hand(1)?.len(), 1);
    assert_eq!(
        rt.draw_pile_size() + rt.discard_pile_size() + rt.hand(0)?.len() + rt.hand(1)?.len(),
        DECK_SIZE
    );

    assert!(matches!(events[0], GameEvent::CardPlayed { .. }));
    assert!(matches!(
        events[1],
        GameEvent::RoundEnded { winner: 0, points: 9, .. }
    ));
    assert!(matches!(events[2], GameEvent::RoundStarted { .. }));
    assert!(matches!(events[3], GameEvent::TurnChanged { player_in_turn: 0 }));
    Ok(())
}

#[test]
fn an_unplayable_draw_passes_the_turn() -> Result<(), GameError> {
    let deck = vec![
        number(Color::Yellow, 2),
        number(Color::Green, 5),
        number(Color::Red, 5),
        number(Color::Blue, 9),
    ];
    let mut rt = GameRuntime::builder(players(2))
        .with_cards_per_player(1)
        .with_deck(deck)
        .build()?;
    rt.begin_round(0, &mut |_| {})?;

    // Blue 9 cannot follow the Green 5 starter, so player 0 must draw; the
    // Yellow 2 cannot follow either and the turn passes.
    let mut events = Vec::new();
    rt.draw(0, &mut |e| events.push(e))?;

    assert_eq!(rt.hand(0)?, &[number(Color::Blue, 9), number(Color::Yellow, 2)]);
    assert_eq!(rt.player_in_turn(), Some(1));
    assert_eq!(
        events,
        vec![
            GameEvent::CardDrawn { player: 0, count: 1 },
            GameEvent::TurnChanged { player_in_turn: 1 },
        ]
    );
    Ok(())
}

#[test]
fn a_playable_draw_keeps_the_turn() -> Result<(), GameError> {
    let deck = vec![
        number(Color::Green, 2),
        number(Color::Green, 5),
        number(Color::Red, 5),
        number(Color::Blue, 9),
    ];
    let mut rt = GameRuntime::builder(players(2))
        .with_cards_per_player(1)
        .with_deck(deck)
        .build()?;
    rt.begin_round(0, &mut |_| {})?;

    let mut events = Vec::new();
    rt.draw(0, &mut |e| events.push(e))?;

    // Green 2 matches the active color: the turn stays with player 0.
    assert_eq!(rt.player_in_turn(), Some(0));
    assert_eq!(events, vec![GameEvent::CardDrawn { player: 0, count: 1 }]);
    Ok(())
}

#[test]
fn turn_and_argument_validation() -> Result<(), GameError> {
    let deck = vec![
        number(Color::Yellow, 2),
        number(Color::Green, 5),
        number(Color::Red, 5),
        number(Color::Blue, 9),
    ];
    let mut rt = GameRuntime::builder(players(2))
        .with_cards_per_player(1)
        .with_deck(deck)
        .build()?;

    // No round yet.
    assert!(matches!(
        rt.play(0, 0, None, &mut |_| {}),
        Err(GameError::NoActiveRound)
    ));

    rt.begin_round(0, &mut |_| {})?;

    assert!(matches!(
        rt.play(1, 0, None, &mut |_| {}),
        Err(GameError::IllegalPlay(IllegalPlay::NotPlayersTurn))
    ));
    assert!(matches!(
        rt.play(7, 0, None, &mut |_| {}),
        Err(GameError::InvalidPlayer(7))
    ));
    assert!(matches!(
        rt.play(0, 5, None, &mut |_| {}),
        Err(GameError::IllegalPlay(IllegalPlay::HandIndex(5)))
    ));
    // Blue 9 is not playable against the Green 5 starter.
    assert!(matches!(
        rt.play(0, 0, None, &mut |_| {}),
        Err(GameError::IllegalPlay(IllegalPlay::CardMismatch))
    ));
    // A color ask on a non-wild card is rejected outright.
    assert!(matches!(
        rt.play(0, 0, Some(Color::Blue), &mut |_| {}),
        Err(GameError::IllegalPlay(IllegalPlay::ColorForbidden))
    ));
    Ok(())
}

#[test]
fn wild_plays_require_and_apply_the_asked_color() -> Result<(), GameError> {
    let deck = vec![
        number(Color::Green, 5),
        number(Color::Red, 5),
        Card::Wild,
    ];
    let mut rt = GameRuntime::builder(players(2))
        .with_cards_per_player(1)
        .with_target_score(5)
        .with_deck(deck)
        .build()?;
    rt.begin_round(0, &mut |_| {})?;

    assert!(matches!(
        rt.play(0, 0, None, &mut |_| {}),
        Err(GameError::IllegalPlay(IllegalPlay::ColorRequired))
    ));

    let mut events = Vec::new();
    rt.play(0, 0, Some(Color::Blue), &mut |e| events.push(e))?;
    assert_eq!(
        events[0],
        GameEvent::CardPlayed { player: 0, card: Card::Wild, active_color: Color::Blue }
    );
    // The wild emptied the hand; Red 5 in the opponent's hand scores 5.
    assert_eq!(rt.winner(), Some(0));
    assert_eq!(rt.scores(), &[5, 0]);
    Ok(())
}

#[test]
fn an_empty_pile_refeeds_from_the_discard() -> Result<(), GameError> {
    // p0 [R5, B3], p1 [B9, G1], starter G5, one card left in the pile.
    let deck = vec![
        number(Color::Red, 7),
        number(Color::Green, 5),
        number(Color::Green, 1),
        number(Color::Blue, 3),
        number(Color::Blue, 9),
        number(Color::Red, 5),
    ];
    let mut rt = GameRuntime::builder(players(2))
        .with_cards_per_player(2)
        .with_deck(deck)
        .build()?;
    rt.begin_round(0, &mut |_| {})?;

    // Red 5 value-matches the starter; red becomes the active color.
    rt.play(0, 0, None, &mut |_| {})?;
    assert_eq!(rt.player_in_turn(), Some(1));
    assert_eq!(rt.discard_pile_size(), 2);

    // Player 1 has no red and no value match: draw the last pile card,
    // Red 7, which is playable, so the turn stays.
    rt.draw(1, &mut |_| {})?;
    assert_eq!(rt.player_in_turn(), Some(1));
    assert_eq!(rt.draw_pile_size(), 0);

    // The next draw refeeds the discard minus its Red 5 top: the buried
    // Green 5 comes back and value-matches, keeping the turn again.
    rt.draw(1, &mut |_| {})?;
    assert_eq!(rt.discard_pile_size(), 1);
    assert_eq!(rt.top_of_discard(), Some(number(Color::Red, 5)));
    assert_eq!(rt.draw_pile_size(), 0);
    assert_eq!(rt.hand(1)?.len(), 4);

    // Nothing left anywhere: drawing now fails and the hand is unchanged.
    assert!(matches!(
        rt.draw(1, &mut |_| {}),
        Err(GameError::ExhaustedDeck)
    ));
    assert_eq!(rt.hand(1)?.len(), 4);
    Ok(())
}

#[test]
fn draw_two_feeds_the_victim_and_skips_them() -> Result<(), GameError> {
    // p0 [D(R), B3], p1 [B9, G1], starter R5, two spare cards.
    let deck = vec![
        number(Color::Yellow, 4),
        number(Color::Yellow, 2),
        number(Color::Red, 5),
        number(Color::Green, 1),
        number(Color::Blue, 3),
        number(Color::Blue, 9),
        Card::Draw(Color::Red),
    ];
    let mut rt = GameRuntime::builder(players(2))
        .with_cards_per_player(2)
        .with_deck(deck)
        .build()?;
    rt.begin_round(0, &mut |_| {})?;

    let mut events = Vec::new();
    rt.play(0, 0, None, &mut |e| events.push(e))?;

    // The victim drew two and lost their turn; in a two-player game the
    // skip wraps back to the actor.
    assert_eq!(rt.hand(1)?.len(), 4);
    assert_eq!(rt.player_in_turn(), Some(0));
    assert!(events.contains(&GameEvent::CardDrawn { player: 1, count: 2 }));
    Ok(())
}
