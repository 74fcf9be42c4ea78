#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod colorspace;
pub mod error;
pub mod gamma;
pub mod hsv;
pub mod precision;
pub mod range;
pub mod rgb;
pub mod xy;

pub use hsv::ColorHSV;
pub use rgb::ColorRGB;
pub use xy::ColorXY;

use serde_json::{Map, Value};

use crate::error::{ColorError, ColorResult};

/// Converts color temperature in kelvin to mireds
#[must_use]
pub fn kelvin_to_mireds(kelvin: f64) -> f64 {
    1_000_000.0 / kelvin
}

/// Fetch an optional numeric property from a json object
pub(crate) fn number_field(obj: &Map<String, Value>, name: &'static str) -> ColorResult<Option<f64>> {
    match obj.get(name) {
        None => Ok(None),
        Some(value) => value.as_f64().map(Some).ok_or(ColorError::NotANumber(name)),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{kelvin_to_mireds, number_field};

    #[macro_export]
    macro_rules! compare_float {
        ($expr:expr, $value:expr, $diff:expr) => {
            let a = $expr;
            let b = $value;
            eprintln!("{a} vs {b:.4}");
            assert!((a - b).abs() < $diff);
        };
    }

    #[macro_export]
    macro_rules! compare {
        ($expr:expr, $value:expr) => {
            compare_float!($expr, $value, 1e-4)
        };
    }

    #[macro_export]
    macro_rules! compare_xy {
        ($expr:expr, $value:expr) => {
            let a = $expr;
            let b = $value;
            compare!(a.x, b.x);
            compare!(a.y, b.y);
        };
    }

    #[macro_export]
    macro_rules! compare_rgb {
        ($a:expr, $b:expr) => {{
            let a = $a;
            let b = $b;
            eprintln!("Comparing r");
            compare!(a.red, b.red);
            eprintln!("Comparing g");
            compare!(a.green, b.green);
            eprintln!("Comparing b");
            compare!(a.blue, b.blue);
        }};
    }

    #[macro_export]
    macro_rules! compare_hsv {
        ($a:expr, $b:expr) => {{
            let a = $a;
            let b = $b;
            compare!(a.hue, b.hue);
            compare!(a.saturation, b.saturation);
            compare!(a.value, b.value);
        }};
    }

    #[test]
    fn mireds_from_kelvin() {
        compare!(kelvin_to_mireds(4000.0), 250.0);
        compare!(kelvin_to_mireds(2000.0), 500.0);
        compare!(kelvin_to_mireds(6500.0), 153.8461);
    }

    #[test]
    fn number_fields() {
        let obj = json!({"x": 0.5, "name": "red"});
        let obj = obj.as_object().unwrap();
        assert_eq!(number_field(obj, "x").unwrap(), Some(0.5));
        assert_eq!(number_field(obj, "y").unwrap(), None);
        assert!(number_field(obj, "name").is_err());
    }
}
