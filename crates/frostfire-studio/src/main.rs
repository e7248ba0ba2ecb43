use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use frostfire_demos::{DemoKind, DemoSettings};
use frostfire_engine::logging::{init_logging, LoggingConfig};

#[derive(Debug, Parser)]
#[command(name = "frostfire-studio", version, about = "Run one of the frostfire demos")]
struct Cli {
    /// Demo to open.
    #[arg(value_enum)]
    demo: Demo,

    /// JSON settings file; missing fields keep their defaults.
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Seed for forest, snowflakes and the blinking lamp. Overrides the file.
    #[arg(long, value_name = "N")]
    seed: Option<u64>,

    /// Step firework particles on the host instead of the compute kernel.
    #[arg(long)]
    cpu_particles: bool,

    /// More logging (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Warnings and errors only.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Demo {
    Car,
    Firework,
    Snow,
}

impl From<Demo> for DemoKind {
    fn from(demo: Demo) -> Self {
        match demo {
            Demo::Car => DemoKind::Car,
            Demo::Firework => DemoKind::Firework,
            Demo::Snow => DemoKind::Snow,
        }
    }
}

impl Cli {
    /// File settings (or defaults) with the command-line overrides applied.
    fn demo_settings(&self) -> Result<DemoSettings> {
        let mut settings = match &self.settings {
            Some(path) => load_settings(path)?,
            None => DemoSettings::default(),
        };
        if let Some(seed) = self.seed {
            settings = settings.with_seed(seed);
        }
        if self.cpu_particles {
            settings.firework.cpu_particles = true;
        }
        Ok(settings.sanitized())
    }
}

fn load_settings(path: &Path) -> Result<DemoSettings> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse_settings(&text).with_context(|| format!("parsing {}", path.display()))
}

fn parse_settings(text: &str) -> Result<DemoSettings> {
    Ok(serde_json::from_str(text)?)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(LoggingConfig::from_verbosity(cli.verbose, cli.quiet));

    let settings = cli.demo_settings()?;
    if let Some(path) = &cli.settings {
        log::info!("settings loaded from {}", path.display());
    }
    log::debug!("{settings:?}");

    frostfire_demos::run(cli.demo.into(), settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("frostfire-studio").chain(args.iter().copied())).unwrap()
    }

    // ── arguments ─────────────────────────────────────────────────────────

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn demo_is_required() {
        assert!(Cli::try_parse_from(["frostfire-studio"]).is_err());
        assert!(Cli::try_parse_from(["frostfire-studio", "boat"]).is_err());
    }

    #[test]
    fn demo_names_map_to_kinds() {
        assert_eq!(DemoKind::from(parse(&["car"]).demo), DemoKind::Car);
        assert_eq!(DemoKind::from(parse(&["firework"]).demo), DemoKind::Firework);
        assert_eq!(DemoKind::from(parse(&["snow"]).demo), DemoKind::Snow);
    }

    #[test]
    fn verbosity_counts_and_quiet_conflicts() {
        assert_eq!(parse(&["snow", "-vv"]).verbose, 2);
        assert!(parse(&["snow", "-q"]).quiet);
        assert!(Cli::try_parse_from(["frostfire-studio", "snow", "-v", "-q"]).is_err());
    }

    // ── settings ──────────────────────────────────────────────────────────

    #[test]
    fn flags_override_defaults() {
        let cli = parse(&["firework", "--seed", "42", "--cpu-particles"]);
        let settings = cli.demo_settings().unwrap();
        assert_eq!(settings.seed, 42);
        assert_eq!(settings.car.forest.seed, 42);
        assert!(settings.firework.cpu_particles);
    }

    #[test]
    fn no_flags_means_defaults() {
        let settings = parse(&["car"]).demo_settings().unwrap();
        assert_eq!(settings, DemoSettings::default().sanitized());
    }

    #[test]
    fn partial_file_is_sanitized() {
        let settings = parse_settings(r#"{ "snow": { "snow_count": 3000 } }"#).unwrap().sanitized();
        assert_eq!(settings.snow.snow_count, 2048);
        assert_eq!(settings.firework, DemoSettings::default().firework);
    }

    #[test]
    fn bad_json_is_an_error() {
        assert!(parse_settings("{ \"seed\": \"x\" }").is_err());
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = load_settings(Path::new("/nonexistent/frostfire.json")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/frostfire.json"));
    }
}
