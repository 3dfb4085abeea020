use crate::render::escape;
use crate::types::WorkoutKind;
use std::collections::VecDeque;

/// The page around the map: the entry form, the workout list and alerts.
pub trait View {
    fn show_form(&mut self);
    /// Hides the form and empties its fields.
    fn hide_form(&mut self);
    /// Shows the cadence row for running, the elevation row for cycling.
    fn show_field_for(&mut self, kind: WorkoutKind);
    /// Adds an entry at the top of the list.
    fn insert_workout(&mut self, html: String);
    fn clear_workouts(&mut self);
    /// Blocking notification the user has to acknowledge.
    fn alert(&mut self, message: &str);
}

/// View that builds a static HTML page.
#[derive(Debug, Default)]
pub struct HtmlView {
    form_visible: bool,
    optional_field: WorkoutKind,
    entries: VecDeque<String>,
    alerts: Vec<String>,
}

impl HtmlView {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn form_visible(&self) -> bool {
        self.form_visible
    }

    pub const fn optional_field(&self) -> WorkoutKind {
        self.optional_field
    }

    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    pub fn take_alerts(&mut self) -> Vec<String> {
        std::mem::take(&mut self.alerts)
    }

    /// Full document with the form (hidden unless open) and the list.
    pub fn document(&self) -> String {
        let form_class = if self.form_visible { "form" } else { "form hidden" };
        let (cadence_row, elevation_row) = match self.optional_field {
            WorkoutKind::Running => ("form__row", "form__row form__row--hidden"),
            WorkoutKind::Cycling => ("form__row form__row--hidden", "form__row"),
        };

        let mut list = String::new();
        for entry in &self.entries {
            list.push_str(entry);
            list.push('\n');
        }

        let alerts: String = self
            .alerts
            .iter()
            .map(|a| format!("<p class=\"alert\">{}</p>\n", escape(a)))
            .collect();

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8" />
<title>waymark</title>
</head>
<body>
<div class="sidebar">
{alerts}<ul class="workouts">
<form class="{form_class}">
  <div class="form__row"><label class="form__label">Type</label>
    <select class="form__input form__input--type">
      <option value="running">Running</option>
      <option value="cycling">Cycling</option>
    </select>
  </div>
  <div class="form__row"><label class="form__label">Distance</label>
    <input class="form__input form__input--distance" placeholder="km" /></div>
  <div class="form__row"><label class="form__label">Duration</label>
    <input class="form__input form__input--duration" placeholder="min" /></div>
  <div class="{cadence_row}"><label class="form__label">Cadence</label>
    <input class="form__input form__input--cadence" placeholder="step/min" /></div>
  <div class="{elevation_row}"><label class="form__label">Elev Gain</label>
    <input class="form__input form__input--elevation" placeholder="meters" /></div>
</form>
{list}</ul>
</div>
<div id="map"></div>
</body>
</html>
"#
        )
    }
}

impl View for HtmlView {
    fn show_form(&mut self) {
        self.form_visible = true;
    }

    fn hide_form(&mut self) {
        self.form_visible = false;
    }

    fn show_field_for(&mut self, kind: WorkoutKind) {
        self.optional_field = kind;
    }

    fn insert_workout(&mut self, html: String) {
        self.entries.push_front(html);
    }

    fn clear_workouts(&mut self) {
        self.entries.clear();
    }

    fn alert(&mut self, message: &str) {
        tracing::warn!(message, "alert");
        self.alerts.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_entry_first() {
        let mut v = HtmlView::new();
        v.insert_workout("<li>a</li>".into());
        v.insert_workout("<li>b</li>".into());
        assert_eq!(v.entries().collect::<Vec<_>>(), ["<li>b</li>", "<li>a</li>"]);

        let doc = v.document();
        assert!(doc.find("<li>b</li>").unwrap() < doc.find("<li>a</li>").unwrap());
    }

    #[test]
    fn document_reflects_form_and_field_toggle() {
        let mut v = HtmlView::new();
        assert!(v.document().contains(r#"<form class="form hidden">"#));

        v.show_form();
        v.show_field_for(WorkoutKind::Cycling);
        let doc = v.document();
        assert!(doc.contains(r#"<form class="form">"#));
        assert!(doc.contains(
            r#"<div class="form__row form__row--hidden"><label class="form__label">Cadence</label>"#
        ));
        assert!(doc.contains(r#"<div class="form__row"><label class="form__label">Elev Gain</label>"#));
    }

    #[test]
    fn alerts_are_escaped_and_drained() {
        let mut v = HtmlView::new();
        v.alert("distance must be a positive number (got \"<x>\")");
        assert!(v.document().contains("&lt;x&gt;"));
        assert_eq!(v.take_alerts().len(), 1);
        assert!(v.alerts().is_empty());
    }
}
