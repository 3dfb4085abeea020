#![deny(warnings, clippy::all, clippy::pedantic, clippy::nursery)]

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::fs;
use std::path::Path;
use waymark::app::{App, Submission};
use waymark::geolocation::FixedLocator;
use waymark::map::RecordingMap;
use waymark::store::{KeyValueStore, MemoryStore, SqliteStore};
use waymark::validate::FormFields;
use waymark::view::HtmlView;
use waymark::{cli, render, utils};

#[macro_use]
extern crate waymark;

type Tracker = App<Box<dyn KeyValueStore>, RecordingMap, HtmlView>;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    utils::init_logging(cli.verbose, cli.quiet);

    let store = open_store(&cli.db, &cli.scope);
    let mut app: Tracker = App::new(store, HtmlView::new(), cli.app_config());
    app.start();

    let cmd = cli.cmd.unwrap_or(cli::Cmd::List);
    if !matches!(cmd, cli::Cmd::Reset) {
        app.open_map(FixedLocator(cli.home), RecordingMap::new());
    }

    let res = run(&mut app, cmd);
    for alert in app.view_mut().take_alerts() {
        eprintln!("! {alert}");
    }
    res
}

fn run(app: &mut Tracker, cmd: cli::Cmd) -> Result<()> {
    match cmd {
        cli::Cmd::List => {
            dlog!("mode=list workouts={}", app.workouts().len());
            for w in app.workouts() {
                println!("{}", render::workout_line(w));
            }
        }
        cli::Cmd::Add {
            at,
            kind,
            distance,
            duration,
            cadence,
            elevation,
        } => {
            let Some(at) = at.or_else(|| app.map().and_then(|m| m.center().map(|(c, _)| c)))
            else {
                bail!("no location: pass --at LAT,LNG or --home LAT,LNG");
            };
            dlog!("mode=add at={at} kind={kind:?}");

            app.on_map_click(at)
                .context("the map must be open to pick a location; pass --home LAT,LNG")?;
            app.select_kind(kind.into());

            let fields = FormFields {
                distance,
                duration,
                cadence,
                elevation,
            };
            match app.submit(&fields)? {
                Submission::Rejected(e) => bail!("workout not recorded: {e}"),
                Submission::Saved(id) => println!("{id}"),
                Submission::Unsaved(id) => {
                    tracing::warn!(%id, "workout kept for this run only");
                    println!("{id}");
                }
            }
        }
        cli::Cmd::Focus { id } => {
            dlog!("mode=focus id={id}");
            if !app.is_map_ready() {
                bail!("the map is not open; pass --home LAT,LNG");
            }
            if !app.on_workout_click(&id) {
                bail!("no workout with id {id}");
            }
            if let Some((center, zoom)) = app.map().and_then(RecordingMap::center) {
                println!("{center}\tzoom={zoom}");
            }
        }
        cli::Cmd::Html { out } => {
            let doc = app.view().document();
            match out {
                Some(path) => {
                    fs::write(&path, doc)
                        .with_context(|| format!("writing HTML: {}", path.display()))?;
                    tracing::info!(path = %path.display(), "html written");
                }
                None => print!("{doc}"),
            }
        }
        cli::Cmd::Reset => {
            if !app.reset() {
                bail!("saved workouts could not be deleted");
            }
            println!("all workouts deleted");
        }
    }
    Ok(())
}

/// Falls back to a session-only store when the database cannot be opened.
fn open_store(db: &Path, scope: &str) -> Box<dyn KeyValueStore> {
    match SqliteStore::open(db, scope) {
        Ok(s) => Box::new(s),
        Err(e) => {
            let err = format!("{e:#}");
            tracing::warn!(%err, "store unavailable; workouts will not be saved");
            Box::new(MemoryStore::new())
        }
    }
}
