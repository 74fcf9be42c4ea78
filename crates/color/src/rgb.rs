use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::colorspace::{ColorSpace, WIDE_D65};
use crate::error::{ColorError, ColorResult};
use crate::gamma::GammaCorrection;
use crate::hsv::ColorHSV;
use crate::number_field;
use crate::precision::{Precision, precision_round};
use crate::xy::ColorXY;

/// Color in RGB space, every component in `0..=1`
#[derive(Copy, Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ColorRGB {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

impl ColorRGB {
    pub const COLOR_SPACE: ColorSpace = WIDE_D65;

    const FIELDS: &'static [&'static str] = &["red", "green", "blue"];

    #[must_use]
    pub const fn new(red: f64, green: f64, blue: f64) -> Self {
        Self { red, green, blue }
    }

    /// Build from a json object with `red`, `green` and `blue` properties
    pub fn from_object(obj: &Map<String, Value>) -> ColorResult<Self> {
        match (
            number_field(obj, "red")?,
            number_field(obj, "green")?,
            number_field(obj, "blue")?,
        ) {
            (Some(red), Some(green), Some(blue)) => Ok(Self::new(red, green, blue)),
            _ => Err(ColorError::MissingFields(Self::FIELDS)),
        }
    }

    #[must_use]
    pub fn rounded(&self, precision: impl Precision + Copy) -> Self {
        Self::new(
            precision_round(self.red, precision),
            precision_round(self.green, precision),
            precision_round(self.blue, precision),
        )
    }

    #[allow(clippy::float_cmp)]
    #[must_use]
    pub fn to_hsv(&self) -> ColorHSV {
        let Self { red, green, blue } = *self;

        let max = red.max(green).max(blue);
        let min = red.min(green).min(blue);
        let d = max - min;
        let saturation = if max == 0.0 { 0.0 } else { d / max };

        let hue = if max == min {
            0.0
        } else if max == red {
            (green - blue + d * if green < blue { 6.0 } else { 0.0 }) / (6.0 * d)
        } else if max == green {
            (blue - red + d * 2.0) / (6.0 * d)
        } else {
            (red - green + d * 4.0) / (6.0 * d)
        };

        ColorHSV::new(hue, saturation, max)
    }

    /// Convert to CIE chromaticity. Black maps to `(0, 0)`.
    #[must_use]
    pub fn to_xy(&self) -> ColorXY {
        let [x, y] = Self::COLOR_SPACE.rgb_to_xy(self.red, self.green, self.blue);
        ColorXY::new(x, y)
    }

    /// Linearize sRGB encoded components
    #[must_use]
    pub fn gamma_corrected(&self) -> Self {
        let gc = GammaCorrection::SRGB;
        Self::new(gc.inverse(self.red), gc.inverse(self.green), gc.inverse(self.blue))
    }

    /// Encode linear components with the sRGB transfer function
    #[must_use]
    pub fn gamma_uncorrected(&self) -> Self {
        let gc = GammaCorrection::SRGB;
        Self::new(
            gc.transform(self.red),
            gc.transform(self.green),
            gc.transform(self.blue),
        )
    }

    #[must_use]
    pub fn to_object(&self) -> Map<String, Value> {
        let mut obj = Map::new();
        obj.insert("red".to_string(), json!(self.red));
        obj.insert("green".to_string(), json!(self.green));
        obj.insert("blue".to_string(), json!(self.blue));
        obj
    }
}

impl From<[f64; 3]> for ColorRGB {
    fn from([red, green, blue]: [f64; 3]) -> Self {
        Self::new(red, green, blue)
    }
}

impl From<ColorRGB> for [f64; 3] {
    fn from(value: ColorRGB) -> Self {
        [value.red, value.green, value.blue]
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::error::ColorError;
    use crate::hsv::ColorHSV;
    use crate::rgb::ColorRGB;
    use crate::xy::ColorXY;
    use crate::{compare, compare_float, compare_hsv, compare_rgb, compare_xy};

    const RED: ColorRGB = ColorRGB::new(1.0, 0.0, 0.0);
    const GREEN: ColorRGB = ColorRGB::new(0.0, 1.0, 0.0);
    const BLUE: ColorRGB = ColorRGB::new(0.0, 0.0, 1.0);

    #[test]
    fn primaries_to_hsv() {
        compare_hsv!(RED.to_hsv(), ColorHSV::new(0.0, 1.0, 1.0));
        compare_hsv!(GREEN.to_hsv(), ColorHSV::new(1.0 / 3.0, 1.0, 1.0));
        compare_hsv!(BLUE.to_hsv(), ColorHSV::new(2.0 / 3.0, 1.0, 1.0));
    }

    #[test]
    fn black_and_grey_to_hsv() {
        compare_hsv!(ColorRGB::new(0.0, 0.0, 0.0).to_hsv(), ColorHSV::new(0.0, 0.0, 0.0));
        compare_hsv!(ColorRGB::new(0.5, 0.5, 0.5).to_hsv(), ColorHSV::new(0.0, 0.0, 0.5));
    }

    #[test]
    fn magenta_ish_to_hsv() {
        compare_hsv!(
            ColorRGB::new(0.5, 0.2, 0.8).to_hsv(),
            ColorHSV::new(0.75, 0.75, 0.8)
        );
    }

    #[test]
    fn primaries_to_xy() {
        compare_xy!(RED.to_xy(), ColorXY::new(0.700_606, 0.299_301));
        compare_xy!(GREEN.to_xy(), ColorXY::new(0.172_416, 0.746_797));
        compare_xy!(BLUE.to_xy(), ColorXY::new(0.135_503, 0.039_879));
    }

    #[test]
    fn black_to_xy() {
        assert_eq!(ColorRGB::new(0.0, 0.0, 0.0).to_xy(), ColorXY::new(0.0, 0.0));
    }

    #[test]
    fn roundtrip_via_hsv() {
        for rgb in [
            RED,
            GREEN,
            BLUE,
            ColorRGB::new(0.5, 0.2, 0.8),
            ColorRGB::new(0.2, 0.4, 0.6),
            ColorRGB::new(0.9, 0.9, 0.1),
            ColorRGB::new(0.3, 0.3, 0.3),
        ] {
            compare_rgb!(rgb.to_hsv().to_rgb(), rgb);
        }
    }

    #[test]
    fn roundtrip_via_xy() {
        for rgb in [
            RED,
            GREEN,
            BLUE,
            ColorRGB::new(1.0, 1.0, 1.0),
            ColorRGB::new(0.625, 0.25, 1.0),
            ColorRGB::new(1.0, 0.5, 0.0),
        ] {
            let back = rgb.to_xy().to_rgb();
            compare_float!(back.red, rgb.red, 1e-3);
            compare_float!(back.green, rgb.green, 1e-3);
            compare_float!(back.blue, rgb.blue, 1e-3);
        }
    }

    #[test]
    fn gamma_roundtrip() {
        let rgb = ColorRGB::new(0.02, 0.5, 0.9);
        compare_rgb!(rgb.gamma_corrected().gamma_uncorrected(), rgb);
        compare!(rgb.gamma_corrected().green, 0.214_041);
        compare!(rgb.gamma_corrected().red, 0.02 / 12.92);
    }

    #[test]
    fn rounded() {
        let rgb = ColorRGB::new(0.123_456, 0.5, 0.987_654).rounded(2);
        assert_eq!(rgb, ColorRGB::new(0.12, 0.5, 0.99));
    }

    #[test]
    fn object_roundtrip() {
        let rgb = ColorRGB::new(0.1, 0.2, 0.3);
        assert_eq!(ColorRGB::from_object(&rgb.to_object()).unwrap(), rgb);
    }

    #[test]
    fn from_object_missing_field() {
        let obj = json!({"red": 1.0, "green": 0.5});
        let err = ColorRGB::from_object(obj.as_object().unwrap()).unwrap_err();
        assert_eq!(err, ColorError::MissingFields(&["red", "green", "blue"]));
    }

    #[test]
    fn from_object_not_a_number() {
        let obj = json!({"red": 1.0, "green": "lots", "blue": 0.0});
        let err = ColorRGB::from_object(obj.as_object().unwrap()).unwrap_err();
        assert_eq!(err, ColorError::NotANumber("green"));
    }
}
