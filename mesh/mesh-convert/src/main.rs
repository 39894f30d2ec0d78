//! `meshconv` - mesh conversion with triangle-strip compression.
//!
//! Converts STL and OBJ meshes to the SML format (optionally searching for
//! triangle strips), converts SML back to STL or OBJ, and inspects the
//! segment layout of SML files.
//!
//! # Commands
//!
//! - `meshconv to-sml [-c TEXT]... [-s[=MODE]] [--weld[=TOL]] [--rm] FILES...`
//! - `meshconv to-obj [--rm] FILES...`
//! - `meshconv to-stl [--ascii] [--rm] FILES...`
//! - `meshconv inspect FILE.sml`

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Mesh conversion with triangle-strip compression
#[derive(Parser, Debug)]
#[command(name = "meshconv")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Convert meshes to and from strip-compressed SML", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert STL or OBJ files to SML, written beside each input
    ToSml(commands::ToSmlArgs),
    /// Convert files to Wavefront OBJ
    ToObj(commands::ConvertArgs),
    /// Convert files to STL
    ToStl(commands::ToStlArgs),
    /// Print the segment table and checksum of an SML file
    Inspect(commands::InspectArgs),
}

fn log_level(name: &str) -> Level {
    match name.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level(&cli.log_level))
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::ToSml(args) => commands::to_sml(&args),
        Commands::ToObj(args) => commands::to_obj(&args),
        Commands::ToStl(args) => commands::to_stl(&args),
        Commands::Inspect(args) => commands::inspect(&args),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use commands::StripMode;
    use mesh_strip::StripStrategy;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("meshconv").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn to_sml_defaults() {
        let cli = parse(&["to-sml", "a.stl", "b.obj"]);
        let Commands::ToSml(args) = cli.command else {
            panic!("expected to-sml");
        };
        assert_eq!(args.convert.files.len(), 2);
        assert!(args.strip.is_none());
        assert!(args.weld.is_none());
        assert!(!args.convert.rm);
        assert!(args.comment.is_empty());
    }

    #[test]
    fn bare_strip_flag_selects_link() {
        let cli = parse(&["to-sml", "--strip", "a.stl"]);
        let Commands::ToSml(args) = cli.command else {
            panic!("expected to-sml");
        };
        assert_eq!(args.strip, Some(StripMode::Strategy(StripStrategy::Link)));
        assert_eq!(args.convert.files.len(), 1);
    }

    #[test]
    fn strip_mode_values() {
        let cli = parse(&["to-sml", "--strip=map", "-c", "one", "-c", "two", "a.stl"]);
        let Commands::ToSml(args) = cli.command else {
            panic!("expected to-sml");
        };
        assert_eq!(args.strip, Some(StripMode::Strategy(StripStrategy::Grid)));
        assert_eq!(args.comment, vec!["one".to_string(), "two".to_string()]);

        let cli = parse(&["to-sml", "--strip=none", "a.stl"]);
        let Commands::ToSml(args) = cli.command else {
            panic!("expected to-sml");
        };
        assert_eq!(args.strip, Some(StripMode::None));

        let bad = Cli::try_parse_from(["meshconv", "to-sml", "--strip=zigzag", "a.stl"]);
        assert!(bad.is_err());
    }

    #[test]
    fn weld_tolerance() {
        let cli = parse(&["to-sml", "--weld", "a.stl"]);
        let Commands::ToSml(args) = cli.command else {
            panic!("expected to-sml");
        };
        assert_eq!(args.weld, Some(mesh_types::DEFAULT_WELD_TOLERANCE));

        let cli = parse(&["to-sml", "--weld=0.5", "--rm", "a.stl"]);
        let Commands::ToSml(args) = cli.command else {
            panic!("expected to-sml");
        };
        assert_eq!(args.weld, Some(0.5));
        assert!(args.convert.rm);
    }

    #[test]
    fn files_required() {
        assert!(Cli::try_parse_from(["meshconv", "to-obj"]).is_err());
    }

    #[test]
    fn log_levels() {
        assert_eq!(log_level("DEBUG"), Level::DEBUG);
        assert_eq!(log_level("warn"), Level::WARN);
        assert_eq!(log_level("bogus"), Level::INFO);
        let cli = parse(&["inspect", "a.sml", "--log-level", "trace"]);
        assert_eq!(cli.log_level, "trace");
    }
}
