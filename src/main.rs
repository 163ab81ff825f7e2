//! yotsee: a bare-bones terminal driver for the rules engine.
//!
//! Reads one command per line from stdin:
//! - empty line or `r`: begin roll / end roll / end turn
//! - `1`-`5`: lock or unlock a die
//! - `w` / `s`: move the score selection up / down
//! - `q`: quit

use std::env;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;

use tracing::Level;
use yotsee::{
    Direction, Game, GameConfig, Input, RandomDieSource, ScoreRow, Sound, SoundSink, TickToken,
};

const USAGE: &str = r#"USAGE:
    yotsee [CONFIG.yaml] [--seed N] [--verbose]

OPTIONS:
    --seed N     Seed the dice (overrides the config file)
    --verbose    Log every state transition to stderr"#;

struct Args {
    config: Option<PathBuf>,
    seed: Option<u64>,
    verbose: bool,
}

enum Command {
    Input(Input),
    Quit,
}

/// Prints sounds instead of playing them.
struct TerminalSink;

impl SoundSink for TerminalSink {
    fn play(&mut self, sound: Sound) {
        println!("[sound: {sound}]");
    }
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut parsed = Args {
        config: None,
        seed: None,
        verbose: false,
    };
    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                println!("{USAGE}");
                process::exit(0);
            }
            "--seed" => {
                let raw = args.get(i + 1).ok_or("--seed needs a value")?;
                parsed.seed = Some(raw.parse().map_err(|_| format!("bad --seed: {raw}"))?);
                i += 1;
            }
            "--verbose" | "-v" => parsed.verbose = true,
            other if other.starts_with('-') => return Err(format!("unknown option: {other}")),
            path => parsed.config = Some(PathBuf::from(path)),
        }
        i += 1;
    }
    Ok(parsed)
}

fn parse_command(line: &str) -> Option<Command> {
    let input = match line.trim() {
        "" | "r" => Input::Confirm,
        "w" => Input::Move(Direction::Up),
        "s" => Input::Move(Direction::Down),
        "q" => return Some(Command::Quit),
        digit => {
            let n: usize = digit.parse().ok()?;
            if !(1..=5).contains(&n) {
                return None;
            }
            Input::ToggleLock(n - 1)
        }
    };
    Some(Command::Input(input))
}

fn print_board<S, K>(game: &Game<S, K>)
where
    S: yotsee::DieSource,
    K: SoundSink,
{
    let player = game.current_player();
    let name = &game.players()[player].name;
    println!();
    println!(
        "{} (player {})    Rolls left: {}    [{}]",
        name,
        player + 1,
        game.rolls_left(),
        game.action_label()
    );
    let dice: Vec<String> = game
        .dice()
        .dice()
        .iter()
        .map(|die| {
            let face = if die.is_wild() {
                "W".to_string()
            } else {
                die.value().to_string()
            };
            if die.is_locked() {
                format!("[{face}]")
            } else {
                format!(" {face} ")
            }
        })
        .collect();
    println!(
        "Dice: {}    Open: {}",
        dice.join(" "),
        game.players()[player].scorecard.uncommitted().count()
    );
    for row in ScoreRow::board() {
        let marker = if row == ScoreRow::Category(game.selection()) && game.is_scoring() {
            ">"
        } else {
            " "
        };
        let value = game
            .compute_score(player, row)
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string());
        let tip = match row {
            ScoreRow::Category(category) => Some(category.tip()),
            ScoreRow::Total(total) => total.tip(),
        };
        println!("{marker} {:<16}{value:>6}  {}", row.label(), tip.unwrap_or(""));
    }
}

fn main() {
    let raw_args: Vec<String> = env::args().skip(1).collect();
    let args = match parse_args(&raw_args) {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{msg}");
            eprintln!("{USAGE}");
            process::exit(2);
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        })
        .with_writer(io::stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => GameConfig::load(path).unwrap_or_else(|e| {
            eprintln!("{}: {e}", path.display());
            process::exit(1);
        }),
        None => GameConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    let source = match config.seed {
        Some(seed) => RandomDieSource::seeded(seed),
        None => RandomDieSource::from_os_rng(),
    };
    let mut game = Game::new(&config, source, TerminalSink).unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(1);
    });

    let (tx, rx) = mpsc::channel::<String>();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    print_board(&game);
    let mut pending: Option<TickToken> = None;
    loop {
        let line = match pending {
            Some(token) => match rx.recv_timeout(game.tick_interval()) {
                Ok(line) => line,
                Err(RecvTimeoutError::Timeout) => {
                    pending = game.tick(token);
                    continue;
                }
                Err(RecvTimeoutError::Disconnected) => break,
            },
            None => match rx.recv() {
                Ok(line) => line,
                Err(_) => break,
            },
        };
        match parse_command(&line) {
            Some(Command::Quit) => break,
            Some(Command::Input(input)) => {
                if let Some(token) = game.handle(input) {
                    pending = Some(token);
                }
            }
            None => {
                println!("unknown command: {}", line.trim());
                continue;
            }
        }
        if !game.is_rolling() {
            pending = None;
        }
        print_board(&game);
        if game.is_finished() {
            break;
        }
    }
}
