use std::env;
use std::error::Error;
use std::process;

use uno_engine::{Card, Color, Game};

const DEFAULT_SEED: u64 = 0xDEA1_0DEA_15EE_D5ED;
const DEFAULT_MAX_STEPS: usize = 100_000;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let mut args = env::args().skip(1);
    let mut seed = DEFAULT_SEED;
    let mut player_count = 2usize;
    let mut target_score = 500u32;
    let mut max_steps = DEFAULT_MAX_STEPS;
    let mut verbose = false;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seed" => {
                let value = args
                    .next()
                    .ok_or_else(|| "--seed requires a value".to_string())?;
                seed = value
                    .parse::<u64>()
                    .map_err(|_| format!("invalid seed value: {value}"))?;
            }
            "--players" => {
                let value = args
                    .next()
                    .ok_or_else(|| "--players requires a value".to_string())?;
                player_count = value
                    .parse::<usize>()
                    .map_err(|_| format!("invalid player count: {value}"))?;
            }
            "--target" => {
                let value = args
                    .next()
                    .ok_or_else(|| "--target requires a value".to_string())?;
                target_score = value
                    .parse::<u32>()
                    .map_err(|_| format!("invalid target score: {value}"))?;
            }
            "--max-steps" => {
                let value = args
                    .next()
                    .ok_or_else(|| "--max-steps requires a value".to_string())?;
                max_steps = value
                    .parse::<usize>()
                    .map_err(|_| format!("invalid max-steps value: {value}"))?;
            }
            "--verbose" => verbose = true,
            "--help" => {
                print_usage();
                return Ok(());
            }
            other => return Err(format!("unrecognized argument: {other}").into()),
        }
    }

    let players: Vec<String> = (0..player_count).map(|i| format!("Player {i}")).collect();
    let mut game = Game::builder()
        .with_players(players)
        .with_target_score(target_score)
        .with_seed(seed)
        .build()?
        .start_new_round()?;

    println!("Starting UNO simulation with {player_count} players (seed {seed:#x}).\n");

    let mut steps = 0usize;
    while game.winner().is_none() {
        if steps >= max_steps {
            println!("Max step limit {max_steps} reached. Stopping simulation.");
            break;
        }
        let round = match game.current_round() {
            Some(round) => round,
            None => break,
        };
        let player = match round.player_in_turn() {
            Some(player) => player,
            None => break,
        };
        let hand = round.hand(player)?;
        let playable = (0..hand.size()).find(|&ix| round.can_play(ix));

        game = match playable {
            Some(ix) => {
                let card = hand.get(ix).ok_or("hand index vanished")?;
                let asked = card.is_wild().then(|| favorite_color(hand.cards()));
                if verbose {
                    println!("step {steps}: player {player} plays {card}");
                }
                game.play(|r| r.play(ix, asked))?
            }
            None => {
                if verbose {
                    println!("step {steps}: player {player} draws");
                }
                game.play(|r| r.draw())?
            }
        };
        steps += 1;
    }

    println!("\nScores after {steps} steps:");
    for (ix, score) in game.scores().iter().enumerate() {
        println!("  {}: {score}", game.player(ix)?);
    }
    match game.winner() {
        Some(winner) => println!("Winner: {}", game.player(winner)?),
        None => println!("Simulation stopped before completion."),
    }
    Ok(())
}

/// The color the player holds most of; used when a wild asks for one.
fn favorite_color(hand: &[Card]) -> Color {
    let mut counts = [0usize; 4];
    let palette = [Color::Red, Color::Yellow, Color::Green, Color::Blue];
    for card in hand {
        if let Some(color) = card.color() {
            let slot = palette
                .iter()
                .position(|c| *c == color)
                .unwrap_or_default();
            counts[slot] += 1;
        }
    }
    let best = counts
        .iter()
        .enumerate()
        .max_by_key(|(_, count)| **count)
        .map(|(ix, _)| ix)
        .unwrap_or_default();
    palette[best]
}

fn print_usage() {
    println!("Usage: simulate [OPTIONS]");
    println!("  --seed <u64>         Seed for shuffling and dealer selection");
    println!("  --players <2-10>     Number of players (default: 2)");
    println!("  --target <u32>       Target score ending the game (default: 500)");
    println!("  --max-steps <usize>  Stop after the specified number of transitions");
    println!("  --verbose            Print every play and draw");
    println!("  --help               Show this help message");
}
