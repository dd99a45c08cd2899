// crates/reel_cli/src/args.rs
//
// Deterministic, offline CLI argument parsing and validation.
// - No networked paths (reject any scheme:// like http/https/file)
// - --candidates is required, local, and must exist
// - Seed override accepts u64 decimal or 0x-hex up to 16 nybbles
// - --validate-only loads + checks the candidate file without spinning

use clap::Parser;
use std::path::{Path, PathBuf};
use std::{env, fs};

/// Parsed CLI arguments (raw).
#[derive(Debug, Parser, Clone)]
#[command(
    name = "reel",
    disable_help_subcommand = true,
    about = "Offline, deterministic spin CLI for the reel engine"
)]
pub struct Args {
    /// Candidate-list JSON path.
    #[arg(long)]
    pub candidates: PathBuf,

    /// Output directory for spin records (default: current directory).
    #[arg(long, default_value = ".")]
    pub out: PathBuf,

    /// RNG seed override for reproducible draws. Accepts decimal u64 or 0x-hex (≤16 hex digits).
    #[arg(long, value_parser = parse_seed)]
    pub seed: Option<u64>,

    /// Number of consecutive spins on the same list.
    #[arg(long, default_value_t = 1)]
    pub spins: u32,

    /// Settle immediately on a manual clock instead of waiting out the animation.
    #[arg(long)]
    pub no_animate: bool,

    /// Validate the candidate file only (load + token/domain checks), do not spin.
    #[arg(long)]
    pub validate_only: bool,

    /// Suppress non-essential output.
    #[arg(long)]
    pub quiet: bool,
}

/// Errors surfaced by argument parsing/validation.
/// Keep messages short/stable (handy for scripts/tests).
#[derive(Debug)]
pub enum CliError {
    NonLocalPath(String),
    NotFound(String),
    BadSeed(String),
    ZeroSpins,
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use CliError::*;
        match self {
            NonLocalPath(p) => write!(f, "path must be local file (no scheme): {p}"),
            NotFound(p) => write!(f, "file not found: {p}"),
            BadSeed(s) => write!(f, "invalid seed: {s}"),
            ZeroSpins => write!(f, "--spins must be at least 1"),
        }
    }
}
impl std::error::Error for CliError {}

/// Entry point used by main.rs
pub fn parse_and_validate() -> Result<Args, CliError> {
    let mut args = Args::parse();

    ensure_local_path(&args.candidates)?;
    ensure_local_path(&args.out)?;
    ensure_local_exists(&args.candidates, "--candidates")?;
    if args.spins == 0 {
        return Err(CliError::ZeroSpins);
    }

    args.candidates = normalize_path(&args.candidates);
    // Normalize output directory even if it doesn't exist yet.
    args.out = normalize_path(&args.out);
    Ok(args)
}

/// Seed parser: decimal u64 or 0x-hex (1..=16 nybbles).
pub fn parse_seed(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty seed".into());
    }
    if let Some(rest) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        if rest.is_empty() || rest.len() > 16 || !rest.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err("hex seed must be 1..16 hex digits".into());
        }
        u64::from_str_radix(rest, 16).map_err(|_| "hex seed out of range".into())
    } else {
        s.parse::<u64>()
            .map_err(|_| "decimal seed must be a valid u64".into())
    }
}

/// Reject any explicit URI scheme (e.g., http://, https://, file://).
#[inline]
fn has_scheme(s: &str) -> bool {
    let lower = s.trim().to_ascii_lowercase();
    lower.contains("://")
        || lower.starts_with("http:")
        || lower.starts_with("https:")
        || lower.starts_with("file:")
}

/// Ensure a provided path string is local (no scheme).
#[inline]
fn ensure_local_path(p: &Path) -> Result<(), CliError> {
    if let Some(s) = p.to_str() {
        if has_scheme(s) {
            return Err(CliError::NonLocalPath(s.to_string()));
        }
    }
    Ok(())
}

/// Ensure a path exists as a regular file.
fn ensure_local_exists(p: &Path, label: &'static str) -> Result<(), CliError> {
    let meta =
        fs::metadata(p).map_err(|_| CliError::NotFound(format!("{label} {}", p.display())))?;
    if !meta.is_file() {
        return Err(CliError::NotFound(format!("{label} {}", p.display())));
    }
    Ok(())
}

/// Best-effort normalization to an absolute path.
/// If canonicalize fails (e.g., path doesn't exist yet), produce an absolute
/// path relative to CWD.
fn normalize_path(p: &Path) -> PathBuf {
    fs::canonicalize(p).unwrap_or_else(|_| {
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            env::current_dir()
                .unwrap_or_else(|_| PathBuf::from("."))
                .join(p)
        }
    })
}

// ------------------------------
// Tests (light, compile-time only)
// ------------------------------
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_parser_decimal_and_hex() {
        assert_eq!(parse_seed("42").unwrap(), 42u64);
        assert_eq!(parse_seed("0x2A").unwrap(), 42u64);
        assert!(parse_seed("0x").is_err());
        assert!(parse_seed("0xFFFFFFFFFFFFFFFFF").is_err()); // 17 nybbles
        assert!(parse_seed("-1").is_err());
    }

    #[test]
    fn local_path_check_rejects_schemes() {
        assert!(ensure_local_path(Path::new("http://x")).is_err());
        assert!(ensure_local_path(Path::new("file://C:/x.json")).is_err());
        assert!(ensure_local_path(Path::new("https://x/y.json")).is_err());
        assert!(ensure_local_path(Path::new("/tmp/file.json")).is_ok());
        assert!(ensure_local_path(Path::new("relative/file.json")).is_ok());
    }

    #[test]
    fn normalize_path_returns_absolute() {
        let p = PathBuf::from("does/not/exist.txt");
        assert!(normalize_path(&p).is_absolute());
    }
}
