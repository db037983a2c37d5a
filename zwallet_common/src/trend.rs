//! Direction of a price between two consecutive readings.
use std::cmp::Ordering;

use serde::Serialize;
use strum_macros::Display;

/// Direction of `current` relative to `previous`.
///
/// Displays as the arrow shown next to each price in the ticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    /// The value went up.
    #[strum(serialize = "\u{2B08}")]
    Up,
    /// The value went down.
    #[strum(serialize = "\u{2B0A}")]
    Down,
    /// The value did not change.
    #[strum(serialize = "\u{2B0C}")]
    Equal,
}

impl Trend {
    /// Classifies `current` against `previous`.
    ///
    /// Incomparable values (NaN on either side) are `Equal`.
    pub fn compare(current: f64, previous: f64) -> Self {
        match current.partial_cmp(&previous) {
            Some(Ordering::Greater) => Trend::Up,
            Some(Ordering::Less) => Trend::Down,
            _ => Trend::Equal,
        }
    }

    /// Like [`Trend::compare`], but yields no trend when there is no previous reading.
    pub fn since(current: f64, previous: Option<f64>) -> Option<Self> {
        previous.map(|previous| Self::compare(current, previous))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compare_classifies_direction() {
        assert_eq!(Trend::compare(5.0, 3.0), Trend::Up);
        assert_eq!(Trend::compare(3.0, 5.0), Trend::Down);
        assert_eq!(Trend::compare(-1.0, -2.0), Trend::Up);
    }

    #[test]
    fn compare_same_value_is_equal() {
        for x in [0.0, -0.0, 1.5, -273.15, 250_000.01, f64::MAX, f64::MIN_POSITIVE] {
            assert_eq!(Trend::compare(x, x), Trend::Equal, "x = {x}");
        }
        assert_eq!(Trend::compare(0.0, -0.0), Trend::Equal);
    }

    #[test]
    fn compare_nan_is_equal() {
        assert_eq!(Trend::compare(f64::NAN, 1.0), Trend::Equal);
        assert_eq!(Trend::compare(1.0, f64::NAN), Trend::Equal);
    }

    #[test]
    fn first_reading_has_no_trend() {
        assert_eq!(Trend::since(105.0, None), None);
        assert_eq!(Trend::since(0.0, None), None);
        assert_eq!(Trend::since(105.0, Some(100.0)), Some(Trend::Up));
    }

    #[test]
    fn displays_as_arrow() {
        assert_eq!(Trend::Up.to_string(), "\u{2B08}");
        assert_eq!(Trend::Down.to_string(), "\u{2B0A}");
        assert_eq!(Trend::Equal.to_string(), "\u{2B0C}");
    }

    #[test]
    fn serializes_as_lowercase_name() {
        assert_eq!(serde_json::to_string(&Trend::Down).unwrap(), r#""down""#);
    }
}
