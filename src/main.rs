//! Sliding-Jigsaw Puzzle
//!
//! Terminal front end for the jigslide engine. Boards print as one
//! character per cell (the solved index of the occupying piece), drags are
//! typed as "from-cell to-cell" pairs, and progress is saved to disk when a
//! level is cleared.

use std::io::{self, BufRead, Write};

use clap::{Parser, Subcommand};

use jigslide::{cluster, levels, persistence, CommittedMove, Coordinate, Effects, Session};

/// Plays a sliding-jigsaw puzzle in the terminal.
#[derive(Parser)]
#[command(name = "jigslide")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Play a level interactively.
    Play {
        /// Level to play; defaults to the saved current level.
        #[arg(long)]
        level: Option<u32>,
        /// Shuffle seed, for reproducible boards.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print a level's shuffled starting board.
    Show {
        #[arg(long, default_value_t = levels::FIRST_LEVEL)]
        level: u32,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Show saved progress.
    Progress,
    /// Delete saved progress.
    Reset,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Play { level, seed }) => run_play(level, seed),
        Some(Command::Show { level, seed }) => run_show(level, seed),
        Some(Command::Progress) => run_progress(),
        Some(Command::Reset) => run_reset(),
        None => run_play(None, None),
    }
}

/// Console effects: narrate moves and persist cleared levels.
struct ConsoleEffects;

impl Effects for ConsoleEffects {
    fn move_committed(&mut self, mv: &CommittedMove) {
        if mv.displaced.is_empty() {
            println!("Moved {} piece(s).", mv.relocations.len());
        } else {
            println!(
                "Moved {} piece(s), bumped {}.",
                mv.relocations.len() - mv.displaced.len(),
                mv.displaced.len()
            );
        }
    }

    fn level_completed(&mut self, level: u32) {
        println!("Level {level} complete!");
        if let Err(e) = persistence::save_level_completed(level)
            .and_then(|()| persistence::set_current_level(level + 1))
        {
            eprintln!("Failed to save progress: {e}");
        }
    }
}

/// Runs the interactive play loop for one level.
fn run_play(level: Option<u32>, seed: Option<u64>) {
    let level = level.unwrap_or_else(persistence::current_level);
    let seed = seed.unwrap_or_else(rand::random);
    let mut session = Session::new(level, seed);
    let mut effects = ConsoleEffects;

    println!("Level {level} ({seed:#x}). Drag with 'r c R C', 'q' quits.");
    print_board(&session);

    let stdin = io::stdin();
    loop {
        print!("> ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let line = line.trim();
        if line == "q" || line == "quit" {
            break;
        }

        let Some((from, to)) = parse_drag(line) else {
            println!("Could not parse '{line}'. Use: fromRow fromCol toRow toCol");
            continue;
        };

        if let Err(e) = session.begin_drag(from) {
            println!("Cannot pick up {from}: {e}");
            continue;
        }
        match session.end_drag(to, &mut effects) {
            Ok(_) => print_board(&session),
            Err(e) => println!("Move rejected: {e}"),
        }

        if session.is_completed() {
            break;
        }
    }
}

/// Prints the board and how many clusters it currently splits into.
fn print_board(session: &Session) {
    let board = session.board();
    print!("{}", board.format());

    let mut counted = vec![false; board.piece_count()];
    let mut clusters = 0;
    for id in board.piece_ids() {
        if !counted[id.index()] {
            clusters += 1;
            for member in cluster::build_cluster(board, id) {
                counted[member.index()] = true;
            }
        }
    }
    println!("{clusters} cluster(s) remaining.");
}

/// Prints the shuffled starting layout of a level.
fn run_show(level: u32, seed: Option<u64>) {
    let seed = seed.unwrap_or_else(rand::random);
    let session = Session::new(level, seed);
    println!("Level {level} ({seed:#x}):");
    print_board(&session);
}

/// Prints saved progress.
fn run_progress() {
    match persistence::max_level_cleared() {
        Some(level) => println!("Max level cleared: {level}"),
        None => println!("No levels cleared yet."),
    }
    println!("Current level: {}", persistence::current_level());
}

/// Deletes saved progress.
fn run_reset() {
    match persistence::reset() {
        Ok(()) => println!("Progress reset."),
        Err(e) => eprintln!("Failed to reset progress: {e}"),
    }
}

/// Parses "r c R C" into a (from, to) cell pair.
fn parse_drag(line: &str) -> Option<(Coordinate, Coordinate)> {
    let mut numbers = line
        .split_whitespace()
        .map(|token| token.parse::<i32>().ok());

    let from = Coordinate::new(numbers.next()??, numbers.next()??);
    let to = Coordinate::new(numbers.next()??, numbers.next()??);
    if numbers.next().is_some() {
        return None;
    }
    Some((from, to))
}
