use crate::types::{Coords, Workout};

/// Animated re-centering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanOptions {
    pub animate: bool,
    pub duration_s: f64,
}

impl Default for PanOptions {
    fn default() -> Self {
        Self {
            animate: true,
            duration_s: 1.0,
        }
    }
}

/// Popup bound to a marker and opened right away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Popup {
    pub content: String,
    pub class_name: String,
    pub max_width: u32,
    pub min_width: u32,
    pub auto_close: bool,
    pub close_on_click: bool,
}

impl Popup {
    pub fn for_workout(w: &Workout) -> Self {
        Self {
            content: w.description().to_string(),
            class_name: format!("{}-popup", w.kind()),
            max_width: 250,
            min_width: 100,
            auto_close: false,
            close_on_click: false,
        }
    }
}

/// The map-rendering collaborator. Tiles, projection and drawing all live
/// behind this trait.
pub trait MapView {
    fn set_view(&mut self, center: Coords, zoom: u8, pan: Option<PanOptions>);
    fn add_tile_layer(&mut self, url_template: &str, attribution: &str);
    fn add_marker(&mut self, at: Coords, popup: &Popup);
}

#[derive(Debug, Clone, PartialEq)]
pub enum MapCommand {
    SetView {
        center: Coords,
        zoom: u8,
        pan: Option<PanOptions>,
    },
    TileLayer {
        url_template: String,
        attribution: String,
    },
    Marker {
        at: Coords,
        popup: Popup,
    },
}

/// Map that remembers what it was asked to draw.
#[derive(Debug, Default)]
pub struct RecordingMap {
    commands: Vec<MapCommand>,
}

impl RecordingMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[MapCommand] {
        &self.commands
    }

    pub fn markers(&self) -> impl Iterator<Item = (Coords, &Popup)> {
        self.commands.iter().filter_map(|c| match c {
            MapCommand::Marker { at, popup } => Some((*at, popup)),
            _ => None,
        })
    }

    /// Where the map is currently centered, if anywhere.
    pub fn center(&self) -> Option<(Coords, u8)> {
        self.commands.iter().rev().find_map(|c| match c {
            MapCommand::SetView { center, zoom, .. } => Some((*center, *zoom)),
            _ => None,
        })
    }
}

impl MapView for RecordingMap {
    fn set_view(&mut self, center: Coords, zoom: u8, pan: Option<PanOptions>) {
        tracing::debug!(%center, zoom, animate = pan.is_some_and(|p| p.animate), "map set_view");
        self.commands.push(MapCommand::SetView { center, zoom, pan });
    }

    fn add_tile_layer(&mut self, url_template: &str, attribution: &str) {
        tracing::debug!(url_template, "map tile layer");
        self.commands.push(MapCommand::TileLayer {
            url_template: url_template.to_string(),
            attribution: attribution.to_string(),
        });
    }

    fn add_marker(&mut self, at: Coords, popup: &Popup) {
        tracing::debug!(%at, class = %popup.class_name, content = %popup.content, "map marker");
        self.commands.push(MapCommand::Marker {
            at,
            popup: popup.clone(),
        });
    }
}
