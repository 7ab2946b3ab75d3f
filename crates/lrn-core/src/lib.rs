//! Core type aliases, constants, and runtime utilities for the learner.
//!
//! Every crate in the workspace agrees on the sample shape and on the
//! default tuning knobs defined here.
#![allow(dead_code)]

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Feature, policy, and value entries of a training sample.
pub type Scalar = f32;
/// Name of a stored unit or published artifact. Totally ordered, newest last.
pub type Name = String;
/// Loss values reported while training.
pub type Loss = f64;

// ============================================================================
// SAMPLE SHAPE
// Fixed at build time; every unit row and every model agrees on it.
// ============================================================================
/// Width of the encoded game state.
pub const STATE_NUM: usize = 36;
/// Width of the action policy vector.
pub const ACTION_NUM: usize = 32;
/// Columns per row of a sample table: state, policy, then one value.
pub const SAMPLE_WIDTH: usize = STATE_NUM + ACTION_NUM + 1;

// ============================================================================
// STORE LAYOUT
// ============================================================================
/// Key prefix under which producers upload sample units.
pub const SAMPLE_PREFIX: &str = "sample/";
/// Key suffix of a compressed sample unit.
pub const SAMPLE_SUFFIX: &str = ".bz2";
/// Key prefix under which trained artifacts are published.
pub const MODEL_PREFIX: &str = "weights/";
/// Appended to a cursor to turn an inclusive listing bound into an exclusive one.
/// Sorts after every character that appears in unit keys (alphanumerics, `.`, `-`, `_`, `/`).
pub const SENTINEL: char = '~';

// ============================================================================
// LEARNER DEFAULTS
// ============================================================================
/// Replay buffer capacity in samples.
pub const DEFAULT_MAX_LENGTH: usize = 40000;
/// Training epochs per published model.
pub const DEFAULT_EPOCHS: usize = 300;
/// Seconds to wait when there is no new data and a model already exists.
pub const DEFAULT_IDLE_SECS: u64 = 3;
/// Gradient step size of the reference trainer.
pub const DEFAULT_LEARNING_RATE: Scalar = 1e-3;
/// L2 penalty of the reference trainer.
pub const DEFAULT_WEIGHT_DECAY: Scalar = 1e-4;
/// Added inside the log of the policy cross-entropy.
pub const POLICY_EPSILON: Scalar = 1e-4;

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Initialize dual logging (terminal + file) with timestamped log files.
/// Creates `logs/` directory and writes DEBUG level to file, INFO to terminal.
#[cfg(feature = "server")]
pub fn log() {
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves slow")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}

/// Register Ctrl+C handler for immediate (non-graceful) termination.
/// Skips the snapshot; the next start resumes from whatever was last saved.
#[cfg(feature = "server")]
pub fn kys() {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!();
            log::warn!("violent interrupt received, exiting immediately");
            std::process::exit(0);
        }
    });
}

/// Global interrupt flag for graceful shutdown coordination.
#[cfg(feature = "server")]
static INTERRUPTED: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(false);
/// Optional run deadline from TRAIN_DURATION env var.
#[cfg(feature = "server")]
static DEADLINE: std::sync::OnceLock<std::time::Instant> = std::sync::OnceLock::new();
/// Check if graceful shutdown was requested (via stdin "Q") or deadline reached.
#[cfg(feature = "server")]
pub fn interrupted() -> bool {
    INTERRUPTED.load(std::sync::atomic::Ordering::Relaxed)
        || DEADLINE
            .get()
            .map_or(false, |d| std::time::Instant::now() >= *d)
}
/// No-op interrupt check when server feature disabled.
#[cfg(not(feature = "server"))]
pub fn interrupted() -> bool {
    false
}
/// Register graceful interrupt handler. Type "Q" + Enter to stop after the current episode.
/// Optionally set TRAIN_DURATION env var (e.g., "2h", "30m") for timed runs.
#[cfg(feature = "server")]
pub fn brb() {
    if let Ok(duration) = std::env::var("TRAIN_DURATION") {
        if let Some(deadline) = parse_duration(&duration) {
            let _ = DEADLINE.set(std::time::Instant::now() + deadline);
            log::info!("learner will stop after {}", duration);
        }
    }
    std::thread::spawn(|| {
        loop {
            let ref mut buffer = String::new();
            match std::io::stdin().read_line(buffer) {
                Ok(0) | Err(_) => break,
                Ok(_) if buffer.trim().to_uppercase() == "Q" => {
                    log::warn!("graceful interrupt requested, finishing current episode...");
                    INTERRUPTED.store(true, std::sync::atomic::Ordering::Relaxed);
                    break;
                }
                Ok(_) => continue,
            }
        }
    });
}
/// Parse duration string like "30s", "5m", "2h", "1d" into Duration.
pub fn parse_duration(s: &str) -> Option<std::time::Duration> {
    let s = s.trim();
    let (num, unit) = s.split_at(s.len().saturating_sub(1));
    let value: u64 = num.parse().ok()?;
    match unit {
        "s" => Some(std::time::Duration::from_secs(value)),
        "m" => Some(std::time::Duration::from_secs(value * 60)),
        "h" => Some(std::time::Duration::from_secs(value * 3600)),
        "d" => Some(std::time::Duration::from_secs(value * 86400)),
        _ => None,
    }
}

/// Group digits by thousands for status tables.
pub fn commas(n: usize) -> String {
    n.to_string()
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|c| std::str::from_utf8(c).unwrap_or_default())
        .collect::<Vec<_>>()
        .join(",")
}
