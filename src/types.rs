use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coords {
    pub lat: f64,
    pub lng: f64,
}

impl Coords {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<[f64; 2]> for Coords {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<Coords> for [f64; 2] {
    fn from(c: Coords) -> Self {
        [c.lat, c.lng]
    }
}

impl fmt::Display for Coords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutKind {
    #[default]
    Running,
    Cycling,
}

impl WorkoutKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Cycling => "cycling",
        }
    }
}

impl fmt::Display for WorkoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier shown in `data-id` attributes and used for list lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkoutId(String);

impl WorkoutId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for WorkoutId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for WorkoutId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for WorkoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

const ID_DIGITS: u64 = 10_000_000_000;

/// Issues ids from a millisecond clock.
///
/// A candidate is `max(now_ms, last + 1)`, so ids never repeat within a
/// session even when several records are created in the same millisecond.
/// The id string keeps the last 10 decimal digits of the candidate, and
/// candidates matching an id loaded from the store are skipped.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: u64,
    taken: HashSet<WorkoutId>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Never hands out any of the ids in `existing`.
    pub fn seeded<'a>(existing: impl IntoIterator<Item = &'a WorkoutId>) -> Self {
        Self {
            last: 0,
            taken: existing.into_iter().cloned().collect(),
        }
    }

    pub fn next_id(&mut self) -> WorkoutId {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        self.next_at(now)
    }

    pub fn next_at(&mut self, now_ms: u64) -> WorkoutId {
        let mut candidate = now_ms.max(self.last.saturating_add(1));
        loop {
            let id = WorkoutId(format!("{}", candidate % ID_DIGITS));
            if !self.taken.contains(&id) {
                self.last = candidate;
                self.taken.insert(id.clone());
                return id;
            }
            candidate = candidate.saturating_add(1);
        }
    }
}

/// Kind-specific input to the constructor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Activity {
    Running { cadence: f64 },
    Cycling { elevation_gain: f64 },
}

impl Activity {
    pub const fn kind(&self) -> WorkoutKind {
        match self {
            Self::Running { .. } => WorkoutKind::Running,
            Self::Cycling { .. } => WorkoutKind::Cycling,
        }
    }
}

/// Kind-specific payload including the derived metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Metrics {
    /// `pace` in min/km.
    Running { cadence: f64, pace: f64 },
    /// `speed` in km/h; elevation may be negative.
    Cycling { elevation_gain: f64, speed: f64 },
}

impl Metrics {
    fn derive(distance: f64, duration: f64, activity: Activity) -> Self {
        match activity {
            Activity::Running { cadence } => Self::Running {
                cadence,
                pace: duration / distance,
            },
            Activity::Cycling { elevation_gain } => Self::Cycling {
                elevation_gain,
                speed: distance / (duration / 60.0),
            },
        }
    }
}

/// One logged workout.
///
/// Fields are fixed at construction so derived metrics can never go stale;
/// only the click counter moves afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Workout {
    id: WorkoutId,
    date: DateTime<Utc>,
    coords: Coords,
    distance: f64,
    duration: f64,
    description: String,
    clicks: u32,
    metrics: Metrics,
}

impl Workout {
    /// Builds a record without validating it; the controller's gate runs first.
    pub fn new<Tz: TimeZone>(
        id: WorkoutId,
        date: &DateTime<Tz>,
        coords: Coords,
        distance: f64,
        duration: f64,
        activity: Activity,
    ) -> Self {
        let description = describe(activity.kind(), date);
        Self::with_description(
            id,
            date.with_timezone(&Utc),
            coords,
            distance,
            duration,
            activity,
            description,
        )
    }

    pub fn running<Tz: TimeZone>(
        id: WorkoutId,
        date: &DateTime<Tz>,
        coords: Coords,
        distance: f64,
        duration: f64,
        cadence: f64,
    ) -> Self {
        Self::new(id, date, coords, distance, duration, Activity::Running { cadence })
    }

    pub fn cycling<Tz: TimeZone>(
        id: WorkoutId,
        date: &DateTime<Tz>,
        coords: Coords,
        distance: f64,
        duration: f64,
        elevation_gain: f64,
    ) -> Self {
        Self::new(
            id,
            date,
            coords,
            distance,
            duration,
            Activity::Cycling { elevation_gain },
        )
    }

    pub(crate) fn with_description(
        id: WorkoutId,
        date: DateTime<Utc>,
        coords: Coords,
        distance: f64,
        duration: f64,
        activity: Activity,
        description: String,
    ) -> Self {
        Self {
            id,
            date,
            coords,
            distance,
            duration,
            description,
            clicks: 0,
            metrics: Metrics::derive(distance, duration, activity),
        }
    }

    pub const fn id(&self) -> &WorkoutId {
        &self.id
    }

    pub const fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub const fn coords(&self) -> Coords {
        self.coords
    }

    pub const fn distance(&self) -> f64 {
        self.distance
    }

    pub const fn duration(&self) -> f64 {
        self.duration
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub const fn clicks(&self) -> u32 {
        self.clicks
    }

    pub const fn metrics(&self) -> Metrics {
        self.metrics
    }

    pub const fn kind(&self) -> WorkoutKind {
        match self.metrics {
            Metrics::Running { .. } => WorkoutKind::Running,
            Metrics::Cycling { .. } => WorkoutKind::Cycling,
        }
    }

    /// Pace in min/km, running only.
    pub const fn pace(&self) -> Option<f64> {
        match self.metrics {
            Metrics::Running { pace, .. } => Some(pace),
            Metrics::Cycling { .. } => None,
        }
    }

    /// Speed in km/h, cycling only.
    pub const fn speed(&self) -> Option<f64> {
        match self.metrics {
            Metrics::Cycling { speed, .. } => Some(speed),
            Metrics::Running { .. } => None,
        }
    }

    pub fn click(&mut self) {
        self.clicks = self.clicks.saturating_add(1);
    }
}

/// `"{kind} on {MonthName} {Day}"` in the time zone of `date`.
pub fn describe<Tz: TimeZone>(kind: WorkoutKind, date: &DateTime<Tz>) -> String {
    let month = chrono::Month::try_from(u8::try_from(date.month()).unwrap_or(1))
        .map_or("January", |m| m.name());
    format!("{kind} on {month} {}", date.day())
}
