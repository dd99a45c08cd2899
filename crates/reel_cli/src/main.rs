// crates/reel_cli/src/main.rs
//
// Exit codes, typed error mapping, CLI parsing, the validate-only
// short-circuit, and the full run path (load → engine → spin(s) →
// canonical artifacts).

mod args;

mod exitcodes {
    pub const OK: i32 = 0;
    pub const VALIDATION: i32 = 2;
    pub const IO: i32 = 4;
    pub const ENGINE: i32 = 5;
}

use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use args::{parse_and_validate as parse_cli, Args};

use reel_core::entities::Candidate;
use reel_core::layout::{ReelLayout, SpinTuning};
use reel_core::rng::SpinRng;
use reel_engine::{
    build_spin_record, engine_identifiers, EngineError, ManualClock, SettledSpin, SpinClock,
    SpinEngine, SpinStart, SystemClock,
};
use reel_io::{canonical, loader, IoError};

/// Frame cadence for the plain-text reveal.
const FRAME_MS: u64 = 120;

/// Central error type for CLI → exit-code mapping.
#[derive(Debug)]
enum MainError {
    /// Candidate-file shape/domain failures and argument problems.
    Validation(String),
    /// I/O errors (read/write/path/limits).
    Io(String),
    /// Engine rejections (planner/state machine).
    Engine(String),
}

impl std::fmt::Display for MainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MainError::Validation(m) | MainError::Io(m) | MainError::Engine(m) => f.write_str(m),
        }
    }
}

fn main() -> ExitCode {
    let args = match parse_cli() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("reel: error: {e}");
            return ExitCode::from(exitcodes::VALIDATION as u8);
        }
    };

    let result = if args.validate_only {
        validate_only(&args)
    } else {
        run_once(&args)
    };

    let rc = match result {
        Ok(()) => exitcodes::OK,
        Err(e) => {
            eprintln!("reel: error: {e}");
            map_error(&e)
        }
    };

    ExitCode::from(rc as u8)
}

/// Validate-only path (no engine, no artifacts).
fn validate_only(args: &Args) -> Result<(), MainError> {
    let file = loader::load_candidates(&args.candidates).map_err(map_io_err)?;
    if !args.quiet {
        eprintln!("validate-only: {} candidates OK", file.candidates.len());
    }
    Ok(())
}

/// Map our typed errors to the exit-code table.
fn map_error(e: &MainError) -> i32 {
    use exitcodes::*;
    match e {
        MainError::Validation(_) => VALIDATION,
        MainError::Io(_) => IO,
        MainError::Engine(_) => ENGINE,
    }
}

/// Translate reel_io::IoError into MainError buckets.
fn map_io_err(e: IoError) -> MainError {
    use IoError::*;
    match e {
        // Validation-ish (shape/domain/limits)
        Json { pointer, msg } => MainError::Validation(format!("json {pointer}: {msg}")),
        Candidates(m) => MainError::Validation(format!("candidates: {m}")),
        Limit(m) => MainError::Validation(format!("limit: {m}")),

        // I/O-ish
        Read(m) => MainError::Io(format!("read: {m}")),
        Write(m) => MainError::Io(format!("write: {m}")),
        Path(m) => MainError::Io(format!("path: {m}")),
        Canon(m) => MainError::Io(format!("canon: {m}")),
        Hash(m) => MainError::Io(format!("hash: {m}")),
    }
}

/// Translate reel_engine::EngineError into MainError buckets.
fn map_engine_err(e: EngineError) -> MainError {
    match e {
        EngineError::Record(m) => MainError::Io(format!("record: {m}")),
        other => MainError::Engine(other.to_string()),
    }
}

fn run_once(args: &Args) -> Result<(), MainError> {
    // 1) Load + validate the candidate list.
    let file = loader::load_candidates(&args.candidates).map_err(map_io_err)?;

    // 2) RNG: fixed seed for reproducible draws, OS entropy otherwise.
    let rng = match args.seed {
        Some(seed) => SpinRng::from_seed_u64(seed),
        None => SpinRng::from_os_entropy(),
    };

    let layout = ReelLayout::default();
    let tuning = SpinTuning::default();

    // 3) Run the spins on the requested clock.
    let settled = if args.no_animate {
        run_spins_instant(args, file.candidates.clone(), layout, tuning, rng)?
    } else {
        run_spins_animated(args, file.candidates.clone(), layout, tuning, rng)?
    };

    // 4) Canonical artifacts, one record per spin.
    let meta = engine_identifiers();
    for (k, s) in settled.iter().enumerate() {
        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
        let record = build_spin_record(&timestamp, meta.clone(), &file.candidates, args.seed, s)
            .map_err(map_engine_err)?;
        let name = if k == 0 {
            "spin_record.json".to_string()
        } else {
            format!("spin_record.{}.json", k + 1)
        };
        canonical::write_canonical_file(&record, &args.out.join(name)).map_err(map_io_err)?;

        if !args.quiet {
            println!("winner: {} ({})", s.candidate.title, s.candidate.candidate_id);
        }
    }

    if !args.quiet {
        eprintln!("run: artifacts written to {}", args.out.display());
    }
    Ok(())
}

/// Spin on a manual clock: jump straight to each deadline. Same draws, same
/// records, no waiting.
fn run_spins_instant(
    args: &Args,
    candidates: Vec<Candidate>,
    layout: ReelLayout,
    tuning: SpinTuning,
    rng: SpinRng,
) -> Result<Vec<SettledSpin>, MainError> {
    let clock = ManualClock::new();
    let mut engine = SpinEngine::new(candidates, layout, tuning, rng, clock.clone())
        .map_err(map_engine_err)?;

    let mut out = Vec::with_capacity(args.spins as usize);
    for _ in 0..args.spins {
        let plan = start_spin(&mut engine)?;
        clock.advance(plan.duration_ms as u64);
        match engine.tick() {
            Some(s) => out.push(s),
            None => return Err(MainError::Engine("spin did not settle at its deadline".into())),
        }
    }
    Ok(out)
}

/// Spin on the wall clock, printing sampled reel windows while in flight.
fn run_spins_animated(
    args: &Args,
    candidates: Vec<Candidate>,
    layout: ReelLayout,
    tuning: SpinTuning,
    rng: SpinRng,
) -> Result<Vec<SettledSpin>, MainError> {
    let mut engine = SpinEngine::new(candidates, layout, tuning, rng, SystemClock::new())
        .map_err(map_engine_err)?;

    let mut out = Vec::with_capacity(args.spins as usize);
    for _ in 0..args.spins {
        start_spin(&mut engine)?;
        loop {
            thread::sleep(Duration::from_millis(FRAME_MS));
            if let Some(s) = engine.tick() {
                out.push(s);
                break;
            }
            if !args.quiet {
                println!("{}", center_line(&engine));
            }
        }
    }
    Ok(out)
}

fn start_spin<C: SpinClock>(
    engine: &mut SpinEngine<C>,
) -> Result<reel_engine::SpinPlan, MainError> {
    match engine.spin().map_err(map_engine_err)? {
        SpinStart::Started(plan) => Ok(plan),
        // Unreachable in this driver (each spin is ticked to completion
        // before the next), but surfaced instead of panicking.
        SpinStart::Ignored => Err(MainError::Engine("engine reported an in-flight spin".into())),
    }
}

/// The candidate currently under the centered marker.
fn center_line<C: SpinClock>(engine: &SpinEngine<C>) -> String {
    let layout = engine.layout();
    let slot =
        (engine.current_offset() + layout.center_offset()) / layout.item_extent() as i64;
    let idx = layout.slot_candidate(slot.max(0) as u64, engine.candidates().len());
    format!("  › {}", engine.candidates()[idx].title)
}
