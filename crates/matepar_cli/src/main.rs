//! matepar CLI: run the annealing placer on a JSON problem description.
//!
//! Provides `matepar place` to place and route a netlist onto a device and
//! `matepar check` to validate a problem file and compare label demand with
//! device supply.

#![warn(missing_docs)]

mod check;
mod place;
mod problem;
mod timing;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use matepar_config::EngineConfig;

/// matepar: a generic annealing place-and-route engine.
#[derive(Parser, Debug)]
#[command(name = "matepar", version, about = "Annealing place and route")]
pub struct Cli {
    /// Suppress all output except errors and results.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Emit a score note for every optimizer iteration.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a `matepar.toml` file, or a directory containing one.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Place and route a problem file.
    Place(PlaceArgs),
    /// Validate a problem file without placing it.
    Check(CheckArgs),
}

/// Arguments for the `matepar place` subcommand.
#[derive(Parser, Debug)]
pub struct PlaceArgs {
    /// Problem file (JSON).
    pub problem: String,

    /// Seed of the random stream; overrides `engine.seed`.
    #[arg(long)]
    pub seed: Option<u32>,

    /// Starting temperature; overrides `engine.max_temperature`.
    #[arg(long)]
    pub max_temperature: Option<u32>,

    /// Output format for the result.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for the `matepar check` subcommand.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Problem file (JSON).
    pub problem: String,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Use the `report.color` setting.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Output format of `matepar place`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to emit per-iteration score notes.
    pub verbose: bool,
    /// Color preference from the command line.
    pub color: ColorChoice,
    /// Optional path to a config file or its directory.
    pub config: Option<String>,
}

/// Configuration merged from `matepar.toml` and the global flags.
pub struct Settings {
    /// Engine settings from the config file.
    pub engine: EngineConfig,
    /// Whether diagnostics are rendered in color.
    pub color: bool,
}

/// Loads `matepar.toml` from `--config` or the current directory.
pub fn load_settings(global: &GlobalArgs) -> Result<Settings, Box<dyn std::error::Error>> {
    let path = match &global.config {
        Some(path) => PathBuf::from(path),
        None => std::env::current_dir()?,
    };
    let config = matepar_config::load_config(&path)?;
    let color = match global.color {
        ColorChoice::Auto => config.report.color,
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };
    Ok(Settings {
        engine: config.engine,
        color,
    })
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color: cli.color,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Place(ref args) => place::run(args, &global),
        Command::Check(ref args) => check::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn parse_place_with_overrides() {
        let cli = Cli::parse_from([
            "matepar", "place", "d.json", "--seed", "42", "--format", "json", "-v",
        ]);
        assert!(cli.verbose);
        match cli.command {
            Command::Place(args) => {
                assert_eq!(args.problem, "d.json");
                assert_eq!(args.seed, Some(42));
                assert_eq!(args.max_temperature, None);
                assert_eq!(args.format, ReportFormat::Json);
            }
            _ => panic!("expected Place command"),
        }
    }

    #[test]
    fn parse_check() {
        let cli = Cli::parse_from(["matepar", "--color", "never", "check", "d.json"]);
        assert_eq!(cli.color, ColorChoice::Never);
        assert!(matches!(cli.command, Command::Check(ref a) if a.problem == "d.json"));
    }

    #[test]
    fn settings_follow_config_file() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("matepar.toml"),
            "[engine]\nseed = 9\n\n[report]\ncolor = true\n",
        )
        .unwrap();
        let mut global = GlobalArgs {
            quiet: false,
            verbose: false,
            color: ColorChoice::Auto,
            config: Some(dir.path().display().to_string()),
        };
        let settings = load_settings(&global).unwrap();
        assert_eq!(settings.engine.seed, 9);
        assert!(settings.color);

        global.color = ColorChoice::Never;
        assert!(!load_settings(&global).unwrap().color);
    }
}
