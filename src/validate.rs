use crate::types::{Activity, WorkoutKind};

/// Raw text of the form inputs, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub distance: String,
    pub duration: String,
    pub cadence: String,
    pub elevation: String,
}

impl FormFields {
    pub fn running(distance: &str, duration: &str, cadence: &str) -> Self {
        Self {
            distance: distance.to_string(),
            duration: duration.to_string(),
            cadence: cadence.to_string(),
            elevation: String::new(),
        }
    }

    pub fn cycling(distance: &str, duration: &str, elevation: &str) -> Self {
        Self {
            distance: distance.to_string(),
            duration: duration.to_string(),
            cadence: String::new(),
            elevation: elevation.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Distance,
    Duration,
    Cadence,
    Elevation,
}

impl Field {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Distance => "distance",
            Self::Duration => "duration",
            Self::Cadence => "cadence",
            Self::Elevation => "elevation",
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{} must be a positive number (got {value:?})", field.label())]
    NotANumber { field: Field, value: String },

    #[error("{} must be a positive number (got {value})", field.label())]
    NotPositive { field: Field, value: f64 },
}

impl ValidationError {
    pub const fn field(&self) -> Field {
        match self {
            Self::NotANumber { field, .. } | Self::NotPositive { field, .. } => *field,
        }
    }
}

/// Numbers accepted by the gate, ready for `Workout::new`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidEntry {
    pub distance: f64,
    pub duration: f64,
    pub activity: Activity,
}

/// Converts form text the way a numeric input coerces it.
///
/// Whitespace is trimmed and an empty field reads as `0`. Anything that does
/// not parse to a finite number is rejected.
pub fn parse_number(field: Field, raw: &str) -> Result<f64, ValidationError> {
    let s = raw.trim();
    if s.is_empty() {
        return Ok(0.0);
    }
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ValidationError::NotANumber {
            field,
            value: raw.to_string(),
        }),
    }
}

fn positive(field: Field, raw: &str) -> Result<f64, ValidationError> {
    let v = parse_number(field, raw)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(ValidationError::NotPositive { field, value: v })
    }
}

/// Accepts a submission only when every required field is a finite,
/// strictly positive number. Cycling elevation only has to be finite:
/// descents are negative.
pub fn validate(kind: WorkoutKind, fields: &FormFields) -> Result<ValidEntry, ValidationError> {
    let distance = positive(Field::Distance, &fields.distance)?;
    let duration = positive(Field::Duration, &fields.duration)?;

    let activity = match kind {
        WorkoutKind::Running => Activity::Running {
            cadence: positive(Field::Cadence, &fields.cadence)?,
        },
        WorkoutKind::Cycling => Activity::Cycling {
            elevation_gain: parse_number(Field::Elevation, &fields.elevation)?,
        },
    };

    Ok(ValidEntry {
        distance,
        duration,
        activity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn running_rejects_negative_distance() {
        let err = validate(WorkoutKind::Running, &FormFields::running("-5", "30", "10")).unwrap_err();
        assert_eq!(err.field(), Field::Distance);
        assert!(err.to_string().contains("must be a positive number"));
    }

    #[test]
    fn running_accepts_positive_inputs() {
        let entry = validate(WorkoutKind::Running, &FormFields::running("5", "30", "10")).unwrap();
        assert_eq!(entry.distance, 5.0);
        assert_eq!(entry.duration, 30.0);
        assert_eq!(entry.activity, Activity::Running { cadence: 10.0 });
    }

    #[test]
    fn running_requires_positive_cadence() {
        let err = validate(WorkoutKind::Running, &FormFields::running("5", "30", "0")).unwrap_err();
        assert_eq!(err.field(), Field::Cadence);

        let err = validate(WorkoutKind::Running, &FormFields::running("5", "30", "")).unwrap_err();
        assert_eq!(err.field(), Field::Cadence);
    }

    #[test]
    fn cycling_accepts_negative_elevation() {
        let entry = validate(WorkoutKind::Cycling, &FormFields::cycling("5", "30", "-200")).unwrap();
        assert_eq!(
            entry.activity,
            Activity::Cycling {
                elevation_gain: -200.0
            }
        );
    }

    #[test]
    fn cycling_still_requires_numeric_elevation() {
        let err = validate(WorkoutKind::Cycling, &FormFields::cycling("5", "30", "uphill")).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::NotANumber {
                field: Field::Elevation,
                ..
            }
        ));
    }

    #[test]
    fn cycling_ignores_cadence_field() {
        let mut fields = FormFields::cycling("12", "40", "80");
        fields.cadence = "garbage".to_string();
        assert!(validate(WorkoutKind::Cycling, &fields).is_ok());
    }

    #[test]
    fn non_finite_text_is_rejected() {
        for raw in ["inf", "NaN", "-infinity", "1e400", "5km"] {
            assert!(parse_number(Field::Distance, raw).is_err(), "{raw} accepted");
        }
    }

    #[test]
    fn blank_reads_as_zero_and_whitespace_is_trimmed() {
        assert_eq!(parse_number(Field::Duration, "").unwrap(), 0.0);
        assert_eq!(parse_number(Field::Duration, "  42.5 ").unwrap(), 42.5);
    }
}
