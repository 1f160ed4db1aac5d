//! skyraid-headless: run the simulation without a renderer.
//!
//! Usage:
//!   skyraid-headless --ticks 30000 --seed 7
//!   skyraid-headless --tuning tuning.json --restart --json

use std::path::PathBuf;
use std::process;

use log::info;

use skyraid_core::commands::{InputIntent, PlayerCommand};
use skyraid_core::config::Tuning;
use skyraid_core::enums::GamePhase;
use skyraid_core::state::GameStateSnapshot;
use skyraid_sim::{HitboxDetector, SimConfig, SimulationEngine};

/// Vertical dead zone for the scripted pilot, in pixels.
const TRACK_DEAD_ZONE: f64 = 10.0;

struct Options {
    ticks: u64,
    seed: u64,
    tuning: Option<PathBuf>,
    restart: bool,
    json: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return;
    }
    let options = match parse_options(&args) {
        Ok(o) => o,
        Err(msg) => {
            eprintln!("Error: {msg}");
            print_usage();
            process::exit(1);
        }
    };

    let tuning = match &options.tuning {
        Some(path) => match Tuning::load(path) {
            Ok(t) => t,
            Err(e) => {
                eprintln!("Error loading {}: {e}", path.display());
                process::exit(1);
            }
        },
        None => Tuning::default(),
    };

    run(&options, tuning);
}

fn print_usage() {
    eprintln!(
        "skyraid-headless: run the side-scroller simulation with a scripted pilot\n\
         \n\
           --ticks <N>      Ticks to simulate (default: 15000, 5 minutes)\n\
           --seed <S>       RNG seed (default: 42)\n\
           --tuning <path>  Tuning JSON file (partial files fall back to defaults)\n\
           --restart        Restart after game over instead of stopping\n\
           --json           Print the final snapshot as JSON\n\
         \n\
         Set RUST_LOG=debug for spawn and timer detail.\n"
    );
}

fn parse_options(args: &[String]) -> Result<Options, String> {
    let mut options = Options {
        ticks: 15_000,
        seed: 42,
        tuning: None,
        restart: false,
        json: false,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--ticks" => options.ticks = parse_value(args, i, "--ticks")?,
            "--seed" => options.seed = parse_value(args, i, "--seed")?,
            "--tuning" => {
                let path = args.get(i + 1).ok_or("--tuning needs a path")?;
                options.tuning = Some(PathBuf::from(path));
            }
            "--restart" => {
                options.restart = true;
                i += 1;
                continue;
            }
            "--json" => {
                options.json = true;
                i += 1;
                continue;
            }
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 2;
    }
    Ok(options)
}

fn parse_value(args: &[String], i: usize, flag: &str) -> Result<u64, String> {
    args.get(i + 1)
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| format!("{flag} needs a non-negative integer"))
}

/// Hold fire and steer toward the altitude of the closest enemy ahead.
fn pilot(snap: &GameStateSnapshot) -> InputIntent {
    let ship = snap.player.position;
    let target = snap
        .standard_enemies
        .iter()
        .map(|e| e.position)
        .chain(snap.heavy_enemies.iter().map(|h| h.position))
        .filter(|p| p.x > ship.x)
        .min_by(|a, b| ship.distance_to(a).total_cmp(&ship.distance_to(b)));

    let Some(target) = target else {
        return InputIntent {
            fire: true,
            ..Default::default()
        };
    };
    InputIntent {
        up: target.y < ship.y - TRACK_DEAD_ZONE,
        down: target.y > ship.y + TRACK_DEAD_ZONE,
        fire: true,
    }
}

fn run(options: &Options, tuning: Tuning) {
    let mut engine = SimulationEngine::new(SimConfig {
        seed: options.seed,
        tuning,
    });
    engine.set_overlap_detector(Box::new(HitboxDetector::default()));
    info!(
        "Running {} ticks of {} ms (seed {})",
        options.ticks,
        engine.tuning().tick_ms,
        options.seed
    );

    let mut snap = engine.tick();
    let mut games = 1u32;
    let mut best_score = 0u64;
    let mut best_wave = 1u32;
    let mut wave = snap.wave.wave_number;

    for _ in 1..options.ticks {
        engine.set_input(pilot(&snap));
        snap = engine.tick();

        if snap.wave.wave_number != wave {
            wave = snap.wave.wave_number;
            info!(
                "t={:.1}s wave {} reached, score {}",
                snap.time.elapsed_secs(),
                wave,
                snap.score
            );
        }
        best_score = best_score.max(snap.score);
        best_wave = best_wave.max(snap.wave.wave_number);

        if engine.phase() == GamePhase::GameOver {
            info!(
                "Game {} over at wave {} with score {}",
                games, snap.wave.wave_number, snap.score
            );
            if !options.restart {
                break;
            }
            games += 1;
            engine.queue_command(PlayerCommand::Restart);
            wave = 1;
        }
    }

    println!(
        "seed {}: {} game(s), best wave {}, best score {}, final score {}, phase {:?} at {:.1}s",
        options.seed,
        games,
        best_wave,
        best_score,
        engine.score(),
        engine.phase(),
        engine.time().elapsed_secs()
    );

    if options.json {
        match serde_json::to_string_pretty(&snap) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serializing snapshot: {e}");
                process::exit(1);
            }
        }
    }
}
