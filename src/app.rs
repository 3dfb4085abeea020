//! The controller: owns the workout list and wires the form, list, map and
//! store together.

use crate::config::AppConfig;
use crate::dlog;
use crate::error::AppError;
use crate::geolocation::{GeolocationError, Locator, locate_within};
use crate::map::{MapView, PanOptions, Popup};
use crate::persistence::Persistence;
use crate::render::workout_html;
use crate::store::KeyValueStore;
use crate::types::{Coords, IdGenerator, Workout, WorkoutId, WorkoutKind};
use crate::validate::{FormFields, ValidationError, validate};
use crate::view::View;
use chrono::Local;

pub const POSITION_FAILED: &str = "could not get your position";
pub const RESET_FAILED: &str = "could not delete saved workouts";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormState {
    Idle,
    /// Form open for the location the user clicked.
    AwaitingSubmission { pending: Coords },
}

/// What happened to a form submission.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// Form stays open with its values; the user was alerted.
    Rejected(ValidationError),
    Saved(WorkoutId),
    /// Recorded for this session, but the store write failed.
    Unsaved(WorkoutId),
}

impl Submission {
    pub const fn id(&self) -> Option<&WorkoutId> {
        match self {
            Self::Saved(id) | Self::Unsaved(id) => Some(id),
            Self::Rejected(_) => None,
        }
    }
}

pub struct App<S, M, V> {
    config: AppConfig,
    persistence: Persistence<S>,
    view: V,
    map: Option<M>,
    workouts: Vec<Workout>,
    ids: IdGenerator,
    state: FormState,
    kind: WorkoutKind,
}

impl<S, M, V> App<S, M, V>
where
    S: KeyValueStore,
    M: MapView,
    V: View,
{
    pub fn new(store: S, view: V, config: AppConfig) -> Self {
        let persistence = Persistence::with_key(store, &config.storage_key);
        Self {
            config,
            persistence,
            view,
            map: None,
            workouts: Vec::new(),
            ids: IdGenerator::new(),
            state: FormState::Idle,
            kind: WorkoutKind::default(),
        }
    }

    /// Loads stored workouts and lists them. Markers wait for the map.
    ///
    /// A store that cannot be read leaves the app empty but usable.
    pub fn start(&mut self) -> usize {
        self.workouts = match self.persistence.load() {
            Ok(ws) => ws,
            Err(e) => {
                let err = format!("{e:#}");
                tracing::warn!(%err, "could not read stored workouts; starting empty");
                Vec::new()
            }
        };
        self.ids = IdGenerator::seeded(self.workouts.iter().map(Workout::id));
        self.view.show_field_for(self.kind);

        for w in &self.workouts {
            self.view.insert_workout(workout_html(w));
        }
        tracing::info!(workouts = self.workouts.len(), "app started");
        self.workouts.len()
    }

    /// Resolves the position with `locator` and opens `map` there.
    ///
    /// Returns whether the map is now ready. On failure the user is alerted
    /// and the app keeps running without a map.
    pub fn open_map<L>(&mut self, locator: L, map: M) -> bool
    where
        L: Locator + Send + 'static,
    {
        match locate_within(locator, self.config.geolocation_timeout) {
            Ok(position) => {
                self.load_map(position, map);
                true
            }
            Err(e) => {
                self.geolocation_failed(&e);
                false
            }
        }
    }

    /// The map-ready transition: center, tiles, then pins for every workout.
    pub fn load_map(&mut self, position: Coords, mut map: M) {
        dlog!(
            "map_position https://www.google.pt/maps/@{},{}",
            position.lat,
            position.lng
        );
        map.set_view(position, self.config.map_zoom, None);
        map.add_tile_layer(&self.config.tile_url, &self.config.tile_attribution);
        for w in &self.workouts {
            map.add_marker(w.coords(), &Popup::for_workout(w));
        }
        tracing::info!(%position, markers = self.workouts.len(), "map ready");
        self.map = Some(map);
    }

    pub fn geolocation_failed(&mut self, err: &GeolocationError) {
        tracing::warn!(%err, "geolocation failed; list-only mode");
        self.view.alert(POSITION_FAILED);
    }

    /// Captures the clicked location and opens the form.
    pub fn on_map_click(&mut self, at: Coords) -> Result<(), AppError> {
        if self.map.is_none() {
            return Err(AppError::MapNotReady);
        }
        dlog!("map_click at={at}");
        self.state = FormState::AwaitingSubmission { pending: at };
        self.view.show_form();
        Ok(())
    }

    /// Switches which optional field the form asks for.
    pub fn select_kind(&mut self, kind: WorkoutKind) {
        if self.kind != kind {
            dlog!("kind_changed from={} to={kind}", self.kind);
        }
        self.kind = kind;
        self.view.show_field_for(kind);
    }

    /// Validates the form and records a workout at the pending location.
    pub fn submit(&mut self, fields: &FormFields) -> Result<Submission, AppError> {
        let FormState::AwaitingSubmission { pending } = self.state else {
            return Err(AppError::NoPendingLocation);
        };

        let entry = match validate(self.kind, fields) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::info!(kind = %self.kind, err = %e, "submission rejected");
                self.view.alert(&e.to_string());
                return Ok(Submission::Rejected(e));
            }
        };

        let workout = Workout::new(
            self.ids.next_id(),
            &Local::now(),
            pending,
            entry.distance,
            entry.duration,
            entry.activity,
        );
        let id = workout.id().clone();

        if let Some(map) = self.map.as_mut() {
            map.add_marker(workout.coords(), &Popup::for_workout(&workout));
        }
        self.view.insert_workout(workout_html(&workout));
        self.view.hide_form();
        self.state = FormState::Idle;

        tracing::info!(%id, description = workout.description(), "workout recorded");
        self.workouts.push(workout);

        if self.persist() {
            Ok(Submission::Saved(id))
        } else {
            Ok(Submission::Unsaved(id))
        }
    }

    /// Pans the map to the workout behind a list entry.
    ///
    /// Returns false, doing nothing, when there is no map yet or no such
    /// workout.
    pub fn on_workout_click(&mut self, id: &str) -> bool {
        let Some(map) = self.map.as_mut() else {
            return false;
        };
        let Some(workout) = self.workouts.iter_mut().find(|w| w.id().as_str() == id) else {
            dlog!("workout_click_miss id={id}");
            return false;
        };

        map.set_view(
            workout.coords(),
            self.config.map_zoom,
            Some(PanOptions::default()),
        );
        workout.click();
        true
    }

    /// Forgets every stored workout and starts over as if freshly launched.
    /// The map has to be loaded again afterwards.
    ///
    /// Returns false, after alerting the user, when the stored list could not
    /// be deleted; it will then come back on the next launch.
    pub fn reset(&mut self) -> bool {
        let cleared = self.clear_store();
        if !cleared {
            self.view.alert(RESET_FAILED);
        }
        tracing::info!(dropped = self.workouts.len(), cleared, "reset");

        self.view.clear_workouts();
        self.view.hide_form();
        self.map = None;
        self.workouts.clear();
        self.state = FormState::Idle;
        self.kind = WorkoutKind::default();
        if cleared {
            self.start();
        } else {
            self.view.show_field_for(self.kind);
            self.ids = IdGenerator::new();
        }
        cleared
    }

    /// Removes the stored key, falling back to overwriting it with an empty
    /// list when the store refuses the delete.
    fn clear_store(&mut self) -> bool {
        let Err(e) = self.persistence.clear() else {
            return true;
        };
        let err = format!("{e:#}");
        tracing::warn!(%err, "could not remove stored workouts; overwriting instead");

        match self.persistence.save(&[]) {
            Ok(()) => true,
            Err(e) => {
                let err = format!("{e:#}");
                tracing::warn!(%err, "could not clear stored workouts");
                false
            }
        }
    }

    fn persist(&mut self) -> bool {
        match self.persistence.save(&self.workouts) {
            Ok(()) => true,
            Err(e) => {
                let err = format!("{e:#}");
                tracing::warn!(%err, "could not save workouts; keeping them for this session only");
                false
            }
        }
    }

    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }

    pub fn workout(&self, id: &str) -> Option<&Workout> {
        self.workouts.iter().find(|w| w.id().as_str() == id)
    }

    pub const fn state(&self) -> FormState {
        self.state
    }

    pub const fn selected_kind(&self) -> WorkoutKind {
        self.kind
    }

    pub const fn is_map_ready(&self) -> bool {
        self.map.is_some()
    }

    pub const fn map(&self) -> Option<&M> {
        self.map.as_ref()
    }

    pub const fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        self.persistence.store()
    }
}
