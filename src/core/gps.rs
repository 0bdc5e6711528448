//! Degree/minute/second rationals to signed decimal degrees.

use crate::domain::tags::TagValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hemisphere {
    North,
    South,
    East,
    West,
}

impl Hemisphere {
    /// Trims and upper-cases; anything but N/S/E/W is rejected.
    pub fn parse(reference: &str) -> Option<Self> {
        match reference.trim().to_uppercase().as_str() {
            "N" => Some(Hemisphere::North),
            "S" => Some(Hemisphere::South),
            "E" => Some(Hemisphere::East),
            "W" => Some(Hemisphere::West),
            _ => None,
        }
    }

    pub fn is_latitude(&self) -> bool {
        matches!(self, Hemisphere::North | Hemisphere::South)
    }

    pub fn is_longitude(&self) -> bool {
        matches!(self, Hemisphere::East | Hemisphere::West)
    }

    fn sign(&self) -> f64 {
        match self {
            Hemisphere::South | Hemisphere::West => -1.0,
            Hemisphere::North | Hemisphere::East => 1.0,
        }
    }
}

type Conversion = fn(&TagValue, usize) -> Option<f64>;

fn from_rational(value: &TagValue, index: usize) -> Option<f64> {
    value.rationals.as_ref()?.get(index)?.to_f64()
}

fn from_printable(value: &TagValue, index: usize) -> Option<f64> {
    value.printable_components().get(index)?.parse::<f64>().ok()
}

const CONVERSIONS: [Conversion; 2] = [from_rational, from_printable];

/// Numeric value of component `index`.
///
/// Attempts in order: the rational itself, the matching entry of the printable
/// form, then `0.0`.
pub fn component_value(value: &TagValue, index: usize) -> f64 {
    CONVERSIONS
        .iter()
        .find_map(|convert| convert(value, index).filter(|v| v.is_finite()))
        .unwrap_or(0.0)
}

/// `degrees + minutes/60 + seconds/3600`, signed by hemisphere.
///
/// An exact `0.0` is treated as "not recorded" and yields `None`, even for a
/// real fix at 0°N 0°E.
pub fn dms_to_decimal(degrees: f64, minutes: f64, seconds: f64, hemisphere: Hemisphere) -> Option<f64> {
    let decimal = degrees + minutes / 60.0 + seconds / 3600.0;
    if decimal == 0.0 {
        return None;
    }
    Some(decimal * hemisphere.sign())
}

pub fn to_decimal_degrees(value: &TagValue, hemisphere: Hemisphere) -> Option<f64> {
    match value.rationals.as_deref() {
        Some(components) if components.len() == 3 => {}
        _ => return None,
    }

    dms_to_decimal(
        component_value(value, 0),
        component_value(value, 1),
        component_value(value, 2),
        hemisphere,
    )
}

/// Altitude in meters; negative when the reference is `"1"` (below sea level).
pub fn altitude(value: &TagValue, reference: Option<&TagValue>) -> Option<f64> {
    let has_component = value
        .rationals
        .as_ref()
        .map(|r| !r.is_empty())
        .unwrap_or(false);
    if !has_component {
        return None;
    }

    let magnitude = component_value(value, 0);
    let below_sea_level = reference
        .map(|r| r.printable.trim() == "1")
        .unwrap_or(false);

    Some(if below_sea_level { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tags::Rational;

    #[test]
    fn test_hemisphere_parse_is_case_insensitive() {
        assert_eq!(Hemisphere::parse(" s "), Some(Hemisphere::South));
        assert_eq!(Hemisphere::parse("w"), Some(Hemisphere::West));
        assert_eq!(Hemisphere::parse("X"), None);
        assert_eq!(Hemisphere::parse(""), None);
    }

    #[test]
    fn test_buenos_aires() {
        let lat = to_decimal_degrees(&TagValue::from_integers(&[34, 36, 54]), Hemisphere::South)
            .unwrap();
        let lon = to_decimal_degrees(&TagValue::from_integers(&[58, 22, 12]), Hemisphere::West)
            .unwrap();
        assert!((lat - -34.615).abs() < 1e-3);
        assert!((lon - -58.370).abs() < 1e-3);
    }

    #[test]
    fn test_requires_exactly_three_components() {
        assert_eq!(
            to_decimal_degrees(&TagValue::from_integers(&[34, 36]), Hemisphere::North),
            None
        );
        assert_eq!(
            to_decimal_degrees(&TagValue::from_integers(&[34, 36, 54, 1]), Hemisphere::North),
            None
        );
        assert_eq!(
            to_decimal_degrees(&TagValue::text("[34, 36, 54]"), Hemisphere::North),
            None
        );
    }

    #[test]
    fn test_zero_is_absent_for_every_hemisphere() {
        for hemisphere in [
            Hemisphere::North,
            Hemisphere::South,
            Hemisphere::East,
            Hemisphere::West,
        ] {
            let zero = TagValue::from_integers(&[0, 0, 0]);
            assert_eq!(to_decimal_degrees(&zero, hemisphere), None);
        }
    }

    #[test]
    fn test_zero_denominator_falls_back_to_printable() {
        let value = TagValue::with_rationals(
            "[10, 30, 0]",
            vec![Rational::new(10, 1), Rational::new(30, 0), Rational::new(0, 1)],
        );
        assert_eq!(component_value(&value, 1), 30.0);
        assert_eq!(to_decimal_degrees(&value, Hemisphere::North), Some(10.5));
    }

    #[test]
    fn test_zero_denominator_without_numeric_printable_is_zero() {
        let value = TagValue::with_rationals(
            "[10, 30/0, 0]",
            vec![Rational::new(10, 1), Rational::new(30, 0), Rational::new(0, 1)],
        );
        assert_eq!(component_value(&value, 1), 0.0);
        assert_eq!(to_decimal_degrees(&value, Hemisphere::East), Some(10.0));
    }

    #[test]
    fn test_altitude_below_sea_level() {
        let value = TagValue::with_rationals("2515/10", vec![Rational::new(2515, 10)]);
        assert_eq!(altitude(&value, None), Some(251.5));
        assert_eq!(altitude(&value, Some(&TagValue::text("0"))), Some(251.5));
        assert_eq!(altitude(&value, Some(&TagValue::text(" 1 "))), Some(-251.5));
    }

    #[test]
    fn test_altitude_without_components() {
        assert_eq!(altitude(&TagValue::text("garbage"), None), None);
        assert_eq!(altitude(&TagValue::with_rationals("[]", vec![]), None), None);
    }
}
