use crate::config::{AppConfig, DEFAULT_ZOOM};
use crate::types::{Coords, WorkoutKind};
use crate::utils::parse_coords;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_DB: &str = "waymark.sqlite";
const DEFAULT_SCOPE: &str = "waymark";

#[derive(Parser, Debug)]
#[command(
    name = "waymark",
    about = "Log running and cycling workouts pinned to map locations"
)]
pub struct Cli {
    /// SQLite file holding the saved workouts.
    #[arg(long, env = "WAYMARK_DB", default_value = DEFAULT_DB, global = true)]
    pub db: PathBuf,

    /// Origin the saved workouts belong to; each origin has its own list.
    #[arg(long, env = "WAYMARK_SCOPE", default_value = DEFAULT_SCOPE, global = true)]
    pub scope: String,

    /// Current position as LAT,LNG. Without it the map never opens.
    #[arg(
        long,
        env = "WAYMARK_HOME",
        value_parser = coords_arg,
        allow_hyphen_values = true,
        global = true
    )]
    pub home: Option<Coords>,

    /// Map zoom level.
    #[arg(long, default_value_t = DEFAULT_ZOOM, global = true)]
    pub zoom: u8,

    /// Seconds to wait for a position before giving up on the map.
    #[arg(long, default_value_t = 10, global = true)]
    pub locate_timeout: u64,

    /// Increase log verbosity (-v, -vv). Defaults to INFO.
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Decrease log verbosity (-q, -qq). Defaults to INFO.
    #[arg(short = 'q', long, action = ArgAction::Count, global = true)]
    pub quiet: u8,

    #[command(subcommand)]
    pub cmd: Option<Cmd>,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Print saved workouts, oldest first (default).
    List,

    /// Record a workout at a map location.
    Add {
        /// Where the workout happened as LAT,LNG. Defaults to --home.
        #[arg(long, value_parser = coords_arg, allow_hyphen_values = true)]
        at: Option<Coords>,

        #[arg(long, value_enum, default_value_t = KindArg::Running)]
        kind: KindArg,

        /// Kilometers.
        #[arg(long, allow_hyphen_values = true)]
        distance: String,

        /// Minutes.
        #[arg(long, allow_hyphen_values = true)]
        duration: String,

        /// Steps per minute (running).
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        cadence: String,

        /// Elevation gain in meters (cycling), may be negative.
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        elevation: String,
    },

    /// Center the map on a saved workout.
    Focus { id: String },

    /// Render the workout list as an HTML page.
    Html {
        /// Write to this file instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Delete every saved workout.
    Reset,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum KindArg {
    Running,
    Cycling,
}

impl From<KindArg> for WorkoutKind {
    fn from(k: KindArg) -> Self {
        match k {
            KindArg::Running => Self::Running,
            KindArg::Cycling => Self::Cycling,
        }
    }
}

impl Cli {
    pub fn app_config(&self) -> AppConfig {
        AppConfig {
            map_zoom: self.zoom,
            geolocation_timeout: Duration::from_secs(self.locate_timeout),
            ..AppConfig::default()
        }
    }
}

fn coords_arg(s: &str) -> Result<Coords, String> {
    parse_coords(s).map_err(|e| format!("{e:#}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_accepts_negative_numbers() {
        let cli = Cli::try_parse_from([
            "waymark",
            "--home",
            "38.7,-9.1",
            "add",
            "--kind",
            "cycling",
            "--distance",
            "12",
            "--duration",
            "40",
            "--elevation",
            "-200",
        ])
        .unwrap();

        assert_eq!(cli.home, Some(Coords::new(38.7, -9.1)));
        let Some(Cmd::Add {
            kind, elevation, ..
        }) = cli.cmd
        else {
            panic!("expected add");
        };
        assert_eq!(kind, KindArg::Cycling);
        assert_eq!(elevation, "-200");
    }

    #[test]
    fn defaults_carry_into_config() {
        let cli = Cli::try_parse_from(["waymark", "--zoom", "15"]).unwrap();
        assert!(cli.cmd.is_none());
        let cfg = cli.app_config();
        assert_eq!(cfg.map_zoom, 15);
        assert_eq!(cfg.storage_key, "workouts");
    }

    #[test]
    fn bad_home_is_rejected() {
        assert!(Cli::try_parse_from(["waymark", "--home", "north"]).is_err());
    }
}
