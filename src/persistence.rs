use crate::store::KeyValueStore;
use crate::types::{Activity, Coords, Metrics, Workout, WorkoutId, WorkoutKind, describe};
use anyhow::{Context, Result, bail};
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const DEFAULT_KEY: &str = "workouts";

/// On-disk shape of one workout.
///
/// Derived metrics are written for readability but recomputed on load, and
/// the click counter always comes back as zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredWorkout {
    #[serde(rename = "type")]
    pub kind: WorkoutKind,
    pub id: WorkoutId,
    pub date: DateTime<Utc>,
    pub coords: Coords,
    pub distance: f64,
    pub duration: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub clicks: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cadence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pace: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation_gain: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
}

impl From<&Workout> for StoredWorkout {
    fn from(w: &Workout) -> Self {
        let mut out = Self {
            kind: w.kind(),
            id: w.id().clone(),
            date: w.date(),
            coords: w.coords(),
            distance: w.distance(),
            duration: w.duration(),
            description: Some(w.description().to_string()),
            clicks: w.clicks(),
            cadence: None,
            pace: None,
            elevation_gain: None,
            speed: None,
        };
        match w.metrics() {
            Metrics::Running { cadence, pace } => {
                out.cadence = Some(cadence);
                out.pace = Some(pace);
            }
            Metrics::Cycling {
                elevation_gain,
                speed,
            } => {
                out.elevation_gain = Some(elevation_gain);
                out.speed = Some(speed);
            }
        }
        out
    }
}

impl TryFrom<StoredWorkout> for Workout {
    type Error = anyhow::Error;

    fn try_from(s: StoredWorkout) -> Result<Self> {
        let finite_positive = |v: f64| v.is_finite() && v > 0.0;
        if !finite_positive(s.distance) || !finite_positive(s.duration) {
            bail!(
                "workout {} has distance={} duration={}",
                s.id,
                s.distance,
                s.duration
            );
        }
        if !s.coords.lat.is_finite() || !s.coords.lng.is_finite() {
            bail!("workout {} has non-finite coords", s.id);
        }

        let activity = match s.kind {
            WorkoutKind::Running => match s.cadence {
                Some(cadence) if finite_positive(cadence) => Activity::Running { cadence },
                other => bail!("running workout {} has cadence={other:?}", s.id),
            },
            WorkoutKind::Cycling => match s.elevation_gain {
                Some(elevation_gain) if elevation_gain.is_finite() => {
                    Activity::Cycling { elevation_gain }
                }
                other => bail!("cycling workout {} has elevation_gain={other:?}", s.id),
            },
        };

        let description = s
            .description
            .unwrap_or_else(|| describe(s.kind, &s.date.with_timezone(&Local)));

        Ok(Self::with_description(
            s.id,
            s.date,
            s.coords,
            s.distance,
            s.duration,
            activity,
            description,
        ))
    }
}

/// Saves and loads the whole workout list under one store key.
pub struct Persistence<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> Persistence<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, DEFAULT_KEY)
    }

    pub fn with_key(store: S, key: &str) -> Self {
        Self {
            store,
            key: key.to_string(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Overwrites the stored list with `workouts`, in order.
    pub fn save(&mut self, workouts: &[Workout]) -> Result<()> {
        let stored: Vec<StoredWorkout> = workouts.iter().map(StoredWorkout::from).collect();
        let json = serde_json::to_string(&stored).context("Serializing workouts")?;
        self.store
            .set(&self.key, &json)
            .with_context(|| format!("Saving {} workouts", workouts.len()))?;
        tracing::debug!(count = workouts.len(), bytes = json.len(), "workouts saved");
        Ok(())
    }

    /// Returns the stored list, or an empty one if nothing was ever saved.
    ///
    /// Entries that break a record invariant, including reuse of an earlier
    /// entry's id, are skipped with a warning; a blob that is not a JSON list
    /// of workouts is an error.
    pub fn load(&self) -> Result<Vec<Workout>> {
        let Some(json) = self.store.get(&self.key)? else {
            tracing::debug!(key = %self.key, "no stored workouts");
            return Ok(Vec::new());
        };

        let entries: Vec<serde_json::Value> =
            serde_json::from_str(&json).context("Parsing stored workouts")?;
        let total = entries.len();

        let mut out = Vec::with_capacity(total);
        let mut seen: HashSet<WorkoutId> = HashSet::with_capacity(total);
        for (idx, entry) in entries.into_iter().enumerate() {
            let parsed = serde_json::from_value::<StoredWorkout>(entry)
                .map_err(anyhow::Error::from)
                .and_then(Workout::try_from);
            match parsed {
                Ok(w) if !seen.insert(w.id().clone()) => {
                    tracing::warn!(idx, id = %w.id(), "skipping stored workout with duplicate id");
                }
                Ok(w) => out.push(w),
                Err(e) => tracing::warn!(idx, err = %e, "skipping stored workout"),
            }
        }

        tracing::info!(loaded = out.len(), skipped = total - out.len(), "workouts loaded");
        Ok(out)
    }

    pub fn clear(&mut self) -> Result<()> {
        self.store
            .remove(&self.key)
            .context("Clearing stored workouts")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::TimeZone;

    fn sample() -> Vec<Workout> {
        let date = Utc.with_ymd_and_hms(2024, 4, 3, 9, 15, 0).unwrap();
        vec![
            Workout::running("4564800001".into(), &date, Coords::new(38.72, -9.14), 5.2, 24.0, 178.0),
            Workout::cycling("4564800002".into(), &date, Coords::new(38.70, -9.16), 27.0, 95.0, -120.0),
        ]
    }

    #[test]
    fn empty_store_loads_nothing() {
        let p = Persistence::new(MemoryStore::new());
        assert!(p.load().unwrap().is_empty());
    }

    #[test]
    fn save_then_load_keeps_order_and_values() {
        let mut p = Persistence::new(MemoryStore::new());
        let original = sample();
        p.save(&original).unwrap();

        let loaded = p.load().unwrap();
        assert_eq!(loaded.len(), original.len());
        for (a, b) in original.iter().zip(&loaded) {
            assert_eq!(a.coords(), b.coords());
            assert_eq!(a.distance(), b.distance());
            assert_eq!(a.duration(), b.duration());
            assert_eq!(a.kind(), b.kind());
            assert_eq!(a.id(), b.id());
            assert_eq!(a.description(), b.description());
            assert_eq!(a.metrics(), b.metrics());
        }
    }

    #[test]
    fn clicks_are_not_restored() {
        let mut workouts = sample();
        workouts[0].click();
        let mut p = Persistence::new(MemoryStore::new());
        p.save(&workouts).unwrap();
        assert_eq!(p.load().unwrap()[0].clicks(), 0);
    }

    #[test]
    fn stored_metrics_are_recomputed() {
        let json = r#"[{"type":"running","id":"1","date":"2024-04-03T09:15:00.000Z",
            "coords":[38.7,-9.1],"distance":5,"duration":30,"cadence":170,"pace":999,
            "description":"running on April 3","clicks":4}]"#;
        let mut store = MemoryStore::new();
        store.set(DEFAULT_KEY, json).unwrap();

        let loaded = Persistence::new(store).load().unwrap();
        assert_eq!(loaded[0].pace(), Some(6.0));
        assert_eq!(loaded[0].description(), "running on April 3");
    }

    #[test]
    fn invalid_entries_are_skipped() {
        let json = r#"[
            {"type":"running","id":"1","date":"2024-04-03T09:15:00Z","coords":[1,2],"distance":-1,"duration":30,"cadence":170},
            {"type":"running","id":"2","date":"2024-04-03T09:15:00Z","coords":[1,2],"distance":5,"duration":30},
            {"type":"swimming","id":"3","date":"2024-04-03T09:15:00Z","coords":[1,2],"distance":1,"duration":30},
            {"type":"cycling","id":"4","date":"2024-04-03T09:15:00Z","coords":[1,2],"distance":20,"duration":60,"elevation_gain":0},
            {"type":"running","id":"4","date":"2024-04-05T09:15:00Z","coords":[3,4],"distance":5,"duration":30,"cadence":170}
        ]"#;
        let mut store = MemoryStore::new();
        store.set(DEFAULT_KEY, json).unwrap();

        let loaded = Persistence::new(store).load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id().as_str(), "4");
        assert_eq!(loaded[0].kind(), WorkoutKind::Cycling);
        assert_eq!(loaded[0].speed(), Some(20.0));
        assert!(loaded[0].description().starts_with("cycling on April"));
    }

    #[test]
    fn corrupt_blob_is_an_error() {
        let mut store = MemoryStore::new();
        store.set(DEFAULT_KEY, "{not json").unwrap();
        assert!(Persistence::new(store).load().is_err());
    }

    #[test]
    fn clear_removes_key() {
        let mut p = Persistence::new(MemoryStore::new());
        p.save(&sample()).unwrap();
        p.clear().unwrap();
        assert!(p.load().unwrap().is_empty());
        assert_eq!(p.store().get(DEFAULT_KEY).unwrap(), None);
    }
}
