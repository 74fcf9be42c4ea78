use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::colorspace::{ColorSpace, WIDE_D65};
use crate::error::{ColorError, ColorResult};
use crate::hsv::ColorHSV;
use crate::kelvin_to_mireds;
use crate::number_field;
use crate::precision::{Precision, precision_round};
use crate::rgb::ColorRGB;

/// Color in CIE xy chromaticity space
#[derive(Copy, Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ColorXY {
    pub x: f64,
    pub y: f64,
}

impl ColorXY {
    pub const COLOR_SPACE: ColorSpace = WIDE_D65;

    const FIELDS: &'static [&'static str] = &["x", "y"];

    /// Relative luminance used when converting to rgb (full brightness)
    const LUMINANCE: f64 = 1.0;

    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Build from a json object with `x` and `y` properties
    pub fn from_object(obj: &Map<String, Value>) -> ColorResult<Self> {
        match (number_field(obj, "x")?, number_field(obj, "y")?) {
            (Some(x), Some(y)) => Ok(Self::new(x, y)),
            _ => Err(ColorError::MissingFields(Self::FIELDS)),
        }
    }

    /// Approximate color temperature in mireds (McCamy's cubic formula)
    #[must_use]
    pub fn to_mireds(&self) -> f64 {
        let n = (self.x - 0.332) / (0.1858 - self.y);
        let kelvin = 437.0f64
            .mul_add(n.powi(3), 3601.0f64.mul_add(n.powi(2), 6861.0f64.mul_add(n, 5517.0)))
            .abs();
        kelvin_to_mireds(kelvin)
    }

    /// Convert to rgb at full brightness.
    ///
    /// Out-of-gamut results are scaled down so the dominant channel is 1.0,
    /// and channels that come out negative or non-finite (for `y == 0`)
    /// become 0.
    #[must_use]
    pub fn to_rgb(&self) -> ColorRGB {
        let [mut red, mut green, mut blue] = Self::COLOR_SPACE
            .xyy_to_rgb(self.x, self.y, Self::LUMINANCE)
            .map(|c| if c.is_finite() { c } else { 0.0 });

        if red > blue && red > green && red > 1.0 {
            green /= red;
            blue /= red;
            red = 1.0;
        } else if green > blue && green > red && green > 1.0 {
            red /= green;
            blue /= green;
            green = 1.0;
        } else if blue > red && blue > green && blue > 1.0 {
            red /= blue;
            green /= blue;
            blue = 1.0;
        }

        let [red, green, blue] = [red, green, blue].map(|c| c.max(0.0));

        ColorRGB::new(red, green, blue)
    }

    #[must_use]
    pub fn to_hsv(&self) -> ColorHSV {
        self.to_rgb().to_hsv()
    }

    #[must_use]
    pub fn rounded(&self, precision: impl Precision + Copy) -> Self {
        Self::new(
            precision_round(self.x, precision),
            precision_round(self.y, precision),
        )
    }

    #[must_use]
    pub fn to_object(&self) -> Map<String, Value> {
        let mut obj = Map::new();
        obj.insert("x".to_string(), json!(self.x));
        obj.insert("y".to_string(), json!(self.y));
        obj
    }
}

impl From<[f64; 2]> for ColorXY {
    fn from(value: [f64; 2]) -> Self {
        Self {
            x: value[0],
            y: value[1],
        }
    }
}

impl From<ColorXY> for [f64; 2] {
    fn from(value: ColorXY) -> Self {
        [value.x, value.y]
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::error::ColorError;
    use crate::rgb::ColorRGB;
    use crate::xy::ColorXY;
    use crate::{compare, compare_float, compare_rgb};

    #[test]
    fn xy_from_f64() {
        let a = ColorXY::from([0.1, 0.2]);
        let b = ColorXY::new(0.1, 0.2);

        compare!(a.x, b.x);
        compare!(a.y, b.y);
    }

    #[test]
    fn f64_from_xy() {
        let a = [0.1, 0.2];
        let b = <[f64; 2]>::from(ColorXY::new(0.1, 0.2));

        compare!(a[0], b[0]);
        compare!(a[1], b[1]);
    }

    #[test]
    fn red_to_rgb() {
        let xy = ColorXY::new(0.700_606_233_130_904_2, 0.299_300_986_842_105_3);
        compare_rgb!(xy.to_rgb(), ColorRGB::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn blue_is_gamut_clamped() {
        let rgb = ColorXY::new(0.135_503, 0.039_879).to_rgb();
        compare!(rgb.blue, 1.0);
        assert!(rgb.red <= 1.0 && rgb.green <= 1.0);
    }

    #[test]
    fn zero_y_clamps_to_black() {
        let rgb = ColorXY::new(0.3, 0.0).to_rgb();
        assert_eq!(rgb, ColorRGB::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn zero_y_is_never_infinite() {
        for x in [0.0, 0.1, 0.7, 1.0] {
            let rgb = ColorXY::new(x, 0.0).to_rgb();
            for c in [rgb.red, rgb.green, rgb.blue] {
                assert!(c.is_finite() && (0.0..=1.0).contains(&c), "{x}: {rgb:?}");
            }
        }
    }

    #[test]
    fn channels_never_negative() {
        for (x, y) in [(0.7, 0.29), (0.1, 0.8), (0.15, 0.05), (0.0, 0.0)] {
            let rgb = ColorXY::new(x, y).to_rgb();
            assert!(rgb.red >= 0.0 && rgb.green >= 0.0 && rgb.blue >= 0.0);
        }
    }

    #[test]
    fn mireds_of_white() {
        compare_float!(ColorXY::new(0.3227, 0.329).to_mireds(), 167.283, 1e-2);
    }

    #[test]
    fn mireds_of_warm_white() {
        compare_float!(ColorXY::new(0.4573, 0.41).to_mireds(), 366.164, 1e-2);
    }

    #[test]
    fn to_hsv_of_red() {
        let hsv = ColorXY::new(0.700_606_233_130_904_2, 0.299_300_986_842_105_3).to_hsv();
        compare_float!(hsv.hue, 0.0, 1e-3);
        compare_float!(hsv.saturation, 1.0, 1e-3);
    }

    #[test]
    fn rounded() {
        assert_eq!(
            ColorXY::new(0.123_456, 0.654_321).rounded(4),
            ColorXY::new(0.1235, 0.6543)
        );
    }

    #[test]
    fn from_object() {
        let obj = json!({"x": 0.25, "y": 0.5});
        assert_eq!(
            ColorXY::from_object(obj.as_object().unwrap()).unwrap(),
            ColorXY::new(0.25, 0.5)
        );
    }

    #[test]
    fn from_object_missing_field() {
        let obj = json!({"x": 0.25});
        let err = ColorXY::from_object(obj.as_object().unwrap()).unwrap_err();
        assert_eq!(err, ColorError::MissingFields(&["x", "y"]));
    }

    #[test]
    fn to_object() {
        assert_eq!(
            serde_json::Value::Object(ColorXY::new(0.25, 0.5).to_object()),
            json!({"x": 0.25, "y": 0.5})
        );
    }
}
