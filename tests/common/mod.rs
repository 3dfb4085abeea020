#![allow(dead_code)]

use anyhow::{Result, bail};
use waymark::app::App;
use waymark::config::AppConfig;
use waymark::map::{MapCommand, RecordingMap};
use waymark::store::{KeyValueStore, MemoryStore};
use waymark::types::Coords;
use waymark::view::HtmlView;

pub const LISBON: Coords = Coords::new(38.7223, -9.1393);
pub const BELEM: Coords = Coords::new(38.6916, -9.2160);

pub type TestApp<S> = App<S, RecordingMap, HtmlView>;

pub fn app_with<S: KeyValueStore>(store: S) -> TestApp<S> {
    let mut app = App::new(store, HtmlView::new(), AppConfig::default());
    app.start();
    app
}

pub fn ready_app() -> TestApp<MemoryStore> {
    let mut app = app_with(MemoryStore::new());
    app.load_map(LISBON, RecordingMap::new());
    app
}

pub fn marker_count(app: &TestApp<impl KeyValueStore>) -> usize {
    app.map().map_or(0, |m| m.markers().count())
}

pub fn last_command(app: &TestApp<impl KeyValueStore>) -> Option<MapCommand> {
    app.map().and_then(|m| m.commands().last().cloned())
}

/// Store whose disk is gone: reads find nothing, writes fail.
#[derive(Debug, Default)]
pub struct FullDiskStore;

impl KeyValueStore for FullDiskStore {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
        bail!("quota exceeded")
    }

    fn remove(&mut self, _key: &str) -> Result<()> {
        bail!("quota exceeded")
    }
}

/// Store that cannot even be read.
#[derive(Debug, Default)]
pub struct BrokenStore;

impl KeyValueStore for BrokenStore {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        bail!("store unavailable")
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
        bail!("store unavailable")
    }

    fn remove(&mut self, _key: &str) -> Result<()> {
        bail!("store unavailable")
    }
}

/// Store that reads and writes but refuses to delete anything.
#[derive(Debug, Default)]
pub struct NoDeleteStore(pub MemoryStore);

impl KeyValueStore for NoDeleteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.0.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.0.set(key, value)
    }

    fn remove(&mut self, _key: &str) -> Result<()> {
        bail!("delete not permitted")
    }
}

/// Store mounted read-only: existing data loads, every change fails.
#[derive(Debug, Default)]
pub struct ReadOnlyStore(pub MemoryStore);

impl KeyValueStore for ReadOnlyStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.0.get(key)
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
        bail!("read-only store")
    }

    fn remove(&mut self, _key: &str) -> Result<()> {
        bail!("read-only store")
    }
}
