use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::error::{ColorError, ColorResult};
use crate::number_field;
use crate::precision::{Precision, precision_round};
use crate::rgb::ColorRGB;
use crate::xy::ColorXY;

/// Color in HSV space.
///
/// All components are in `0..=1`, and hue is always normalized into `0..1`.
#[derive(Copy, Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ColorHSV {
    pub hue: f64,
    pub saturation: f64,
    pub value: f64,
}

/// Wrap `hue` into `0..1`. `rem_euclid` rounds tiny negative hues up to
/// exactly 1.0, which is the same angle as 0.
fn normalize_hue(hue: f64) -> f64 {
    let hue = hue.rem_euclid(1.0);
    if hue >= 1.0 { 0.0 } else { hue }
}

impl ColorHSV {
    #[must_use]
    pub fn new(hue: f64, saturation: f64, value: f64) -> Self {
        Self {
            hue: normalize_hue(hue),
            saturation,
            value,
        }
    }

    /// Fully bright color with the given hue and saturation
    #[must_use]
    pub fn from_hs(hue: f64, saturation: f64) -> Self {
        Self::new(hue, saturation, 1.0)
    }

    /// Build from a json object with `hue`, `saturation` and `value`
    /// properties.
    ///
    /// At least one of `hue` and `saturation` must be present. A missing hue
    /// is 0, and missing saturation or value default to 1.
    pub fn from_object(obj: &Map<String, Value>) -> ColorResult<Self> {
        let hue = number_field(obj, "hue")?;
        let saturation = number_field(obj, "saturation")?;
        let value = number_field(obj, "value")?;

        if hue.is_none() && saturation.is_none() {
            return Err(ColorError::InvalidHsv);
        }

        Ok(Self::new(
            hue.unwrap_or_default(),
            saturation.unwrap_or(1.0),
            value.unwrap_or(1.0),
        ))
    }

    #[must_use]
    pub fn rounded(&self, precision: impl Precision + Copy) -> Self {
        Self::new(
            precision_round(self.hue, precision),
            precision_round(self.saturation, precision),
            precision_round(self.value, precision),
        )
    }

    /// Convert to a json object, using either long (`hue`) or short (`h`)
    /// property names. The value component is left out unless
    /// `include_value` is set.
    #[must_use]
    pub fn to_object(&self, short: bool, include_value: bool) -> Map<String, Value> {
        let (h, s, v) = if short {
            ("h", "s", "v")
        } else {
            ("hue", "saturation", "value")
        };

        let mut obj = Map::new();
        obj.insert(h.to_string(), json!(self.hue));
        obj.insert(s.to_string(), json!(self.saturation));
        if include_value {
            obj.insert(v.to_string(), json!(self.value));
        }
        obj
    }

    #[allow(
        clippy::many_single_char_names,
        clippy::cast_possible_truncation
    )]
    #[must_use]
    pub fn to_rgb(&self) -> ColorRGB {
        let Self {
            hue: h,
            saturation: s,
            value: v,
        } = *self;

        let i = (h * 6.0).floor();
        let f = h.mul_add(6.0, -i);
        let p = v * (1.0 - s);
        let q = v * f.mul_add(-s, 1.0);
        let t = v * (1.0 - f).mul_add(-s, 1.0);

        let [r, g, b] = match (i as i64).rem_euclid(6) {
            0 => [v, t, p],
            1 => [q, v, p],
            2 => [p, v, t],
            3 => [p, q, v],
            4 => [t, p, v],
            _ => [v, p, q],
        };

        ColorRGB::new(r, g, b)
    }

    #[must_use]
    pub fn to_xy(&self) -> ColorXY {
        self.to_rgb().to_xy()
    }

    #[must_use]
    pub fn to_mireds(&self) -> f64 {
        self.to_xy().to_mireds()
    }
}
