use crate::types::{Metrics, Workout, WorkoutKind};
use std::fmt::Write as _;

const fn icon(kind: WorkoutKind) -> &'static str {
    match kind {
        WorkoutKind::Running => "🏃‍♂️",
        WorkoutKind::Cycling => "🚴‍♀️",
    }
}

/// Display form of distances, durations and metrics: at most one decimal.
pub fn number(v: f64) -> String {
    let rounded = (v * 10.0).round() / 10.0;
    // -0.0 prints as "-0"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    if rounded.fract() == 0.0 {
        format!("{rounded:.0}")
    } else {
        format!("{rounded:.1}")
    }
}

fn detail(html: &mut String, icon: &str, value: &str, unit: &str) {
    let _ = write!(
        html,
        r#"
  <div class="workout__details">
    <span class="workout__icon">{icon}</span>
    <span class="workout__value">{value}</span>
    <span class="workout__unit">{unit}</span>
  </div>"#
    );
}

/// The `<li>` for one workout in the sidebar list.
pub fn workout_html(w: &Workout) -> String {
    let kind = w.kind();
    let mut html = format!(
        r#"<li class="workout workout--{kind}" data-id="{id}">
  <h2 class="workout__title">{title}</h2>"#,
        id = escape(w.id().as_str()),
        title = escape(w.description()),
    );

    detail(&mut html, icon(kind), &number(w.distance()), "km");
    detail(&mut html, "⏱", &number(w.duration()), "min");

    match w.metrics() {
        Metrics::Running { cadence, pace } => {
            detail(&mut html, "⚡️", &number(pace), "min/km");
            detail(&mut html, "🦶🏼", &number(cadence), "spm");
        }
        Metrics::Cycling {
            elevation_gain,
            speed,
        } => {
            detail(&mut html, "⚡️", &number(speed), "km/h");
            detail(&mut html, "⛰", &number(elevation_gain), "m");
        }
    }

    html.push_str("\n</li>");
    html
}

/// One-line summary for terminals.
pub fn workout_line(w: &Workout) -> String {
    let metric = match w.metrics() {
        Metrics::Running { cadence, pace } => {
            format!("{} min/km\t{} spm", number(pace), number(cadence))
        }
        Metrics::Cycling {
            elevation_gain,
            speed,
        } => format!("{} km/h\t{} m", number(speed), number(elevation_gain)),
    };
    format!(
        "{}\t{}\t{} km\t{} min\t{metric}",
        w.id(),
        w.description(),
        number(w.distance()),
        number(w.duration()),
    )
}

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Coords;
    use chrono::{TimeZone, Utc};

    fn day() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn number_keeps_one_decimal() {
        assert_eq!(number(5.0), "5");
        assert_eq!(number(4.615_384), "4.6");
        assert_eq!(number(-200.0), "-200");
        assert_eq!(number(17.06), "17.1");
        assert_eq!(number(-0.04), "0");
        assert_eq!(number(-0.0), "0");
    }

    #[test]
    fn running_item_shows_pace_and_cadence() {
        let w = Workout::running("42".into(), &day(), Coords::new(0.0, 0.0), 5.0, 30.0, 170.0);
        let html = workout_html(&w);
        assert!(html.starts_with(r#"<li class="workout workout--running" data-id="42">"#));
        assert!(html.contains("running on June 10"));
        assert!(html.contains(r#"<span class="workout__value">6</span>"#));
        assert!(html.contains("min/km"));
        assert!(html.contains("spm"));
        assert!(!html.contains("km/h"));
        assert!(html.ends_with("</li>"));
    }

    #[test]
    fn cycling_item_shows_speed_and_elevation() {
        let w = Workout::cycling("43".into(), &day(), Coords::new(0.0, 0.0), 20.0, 60.0, -150.0);
        let html = workout_html(&w);
        assert!(html.contains("workout--cycling"));
        assert!(html.contains(r#"<span class="workout__value">20</span>"#));
        assert!(html.contains("km/h"));
        assert!(html.contains("-150"));
        assert!(!html.contains("spm"));
    }

    #[test]
    fn line_has_id_and_metric() {
        let w = Workout::running("7".into(), &day(), Coords::new(0.0, 0.0), 10.0, 55.0, 180.0);
        assert_eq!(workout_line(&w), "7\trunning on June 10\t10 km\t55 min\t5.5 min/km\t180 spm");
    }

    #[test]
    fn id_attribute_is_escaped() {
        let w = Workout::running(r#"1" onclick="x"#.into(), &day(), Coords::new(0.0, 0.0), 5.0, 30.0, 170.0);
        let html = workout_html(&w);
        assert!(html.contains(r#"data-id="1&quot; onclick=&quot;x">"#));
        assert!(!html.contains(r#"onclick="x""#));
    }

    #[test]
    fn escape_handles_markup() {
        assert_eq!(escape(r#"<b>"x" & 'y'</b>"#), "&lt;b&gt;&quot;x&quot; &amp; &#39;y&#39;&lt;/b&gt;");
    }
}
