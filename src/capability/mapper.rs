use serde_json::{Map, Value};

use color::range::map_value_range;
use color::{ColorHSV, ColorXY};

use crate::error::{ApiError, ApiResult};

/// Value conversion used by a capability, in both directions.
///
/// Getters read from a flattened state payload and return `None` when the
/// payload carries no value for the capability. Setters produce a payload
/// fragment for `<device>/set`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mapper {
    /// Value passed through as-is, read only
    Read,
    /// Value passed through as-is in both directions
    ReadWrite,
    /// `"ON"`/`"OFF"` as boolean
    OnOff,
    /// Device range `value_min..=value_max` as `0..=1`
    Range,
    /// Like [`Mapper::Range`], but only while the light is in color
    /// temperature mode
    ColorTemp,
    /// `"temperature"` or `"color"`
    ColorMode,
    Hue,
    Saturation,
    /// Hue, written as an xy color
    ColorX,
    /// Saturation, written as an xy color
    ColorY,
    /// Cover movement as `up`, `idle` or `down`
    Cover,
    /// Percentage as `0..=1`
    Percent,
    /// `"LOCK"`/`"UNLOCK"` as boolean
    Lock,
    /// Number, also accepted as a numeric string
    Meter,
    Alarm {
        invert: bool,
    },
    /// Alarm raised by any status other than `normal_state`
    DeviceStatus,
}

/// Context for reading a capability value from a payload
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GetOptions<'a> {
    pub property: &'a str,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Color mode reported in the same payload, if any
    pub color_mode: Option<&'a str>,
}

/// Context for writing a capability value
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SetOptions<'a> {
    pub property: &'a str,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Current `light_hue` of the device
    pub hue: Option<f64>,
    /// Current `light_saturation` of the device
    pub saturation: Option<f64>,
    /// Transition time in milliseconds
    pub duration: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColorComponent {
    Hue,
    Saturation,
}

fn field<'a>(payload: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    payload.get(key).filter(|value| !value.is_null())
}

fn number(payload: &Map<String, Value>, key: &str) -> ApiResult<Option<f64>> {
    match field(payload, key) {
        None => Ok(None),
        Some(value) => value
            .as_f64()
            .map(Some)
            .ok_or_else(|| ApiError::InvalidValue(key.to_string(), value.clone())),
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(num) => num.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Object key that color components are nested under (`color` for `color.x`)
fn color_key(property: &str) -> &str {
    property.split_once('.').map_or(property, |(head, _)| head)
}

fn single(key: &str, value: impl Into<Value>) -> Map<String, Value> {
    let mut res = Map::new();
    res.insert(key.to_string(), value.into());
    res
}

fn with_transition(mut fragment: Map<String, Value>, opts: &SetOptions) -> Map<String, Value> {
    if let Some(ms) = opts.duration.filter(|ms| *ms > 0) {
        fragment.insert("transition".to_string(), Value::from(f64::from(ms) / 1000.0));
    }
    fragment
}

fn range(property: &str, min: Option<f64>, max: Option<f64>) -> ApiResult<(f64, f64)> {
    match (min, max) {
        (Some(min), Some(max)) => Ok((min, max)),
        _ => Err(ApiError::MissingRange(property.to_string())),
    }
}

fn require(value: Option<f64>, name: &'static str, property: &str) -> ApiResult<f64> {
    value.ok_or_else(|| ApiError::MissingOption(name, property.to_string()))
}

fn color_component(
    payload: &Map<String, Value>,
    property: &str,
    component: ColorComponent,
) -> ApiResult<Option<Value>> {
    let head = color_key(property);

    let value = match field(payload, "color_mode").and_then(Value::as_str) {
        Some("xy") => {
            let x = number(payload, &format!("{head}.x"))?;
            let y = number(payload, &format!("{head}.y"))?;
            let (Some(x), Some(y)) = (x, y) else {
                return Ok(None);
            };
            let hsv = ColorXY::new(x, y).to_hsv();
            match component {
                ColorComponent::Hue => hsv.hue,
                ColorComponent::Saturation => hsv.saturation,
            }
        }
        Some("hs") => {
            let (name, scale) = match component {
                ColorComponent::Hue => ("hue", 360.0),
                ColorComponent::Saturation => ("saturation", 100.0),
            };
            let Some(value) = number(payload, &format!("{head}.{name}"))? else {
                return Ok(None);
            };
            value / scale
        }
        _ => return Ok(None),
    };

    Ok(Some(Value::from(value)))
}

fn hs_fragment(key: &str, hue: f64, saturation: f64) -> Map<String, Value> {
    let mut color = Map::new();
    color.insert("hue".to_string(), Value::from(hue * 360.0));
    color.insert("saturation".to_string(), Value::from(saturation * 100.0));
    single(key, color)
}

fn xy_fragment(key: &str, hue: f64, saturation: f64) -> Map<String, Value> {
    single(key, ColorHSV::from_hs(hue, saturation).to_xy().to_object())
}

impl Mapper {
    #[must_use]
    pub const fn is_settable(self) -> bool {
        !matches!(
            self,
            Self::Read | Self::Meter | Self::Alarm { .. } | Self::DeviceStatus
        )
    }

    pub fn get(self, payload: &Map<String, Value>, opts: &GetOptions) -> ApiResult<Option<Value>> {
        let prop = opts.property;

        let res = match self {
            Self::Read | Self::ReadWrite => field(payload, prop).cloned(),

            Self::OnOff => field(payload, prop).map(|v| Value::Bool(v.as_str() == Some("ON"))),

            Self::Lock => field(payload, prop).map(|v| Value::Bool(v.as_str() == Some("LOCK"))),

            Self::ColorTemp if opts.color_mode.is_some_and(|mode| mode != "color_temp") => None,

            Self::Range | Self::ColorTemp => match number(payload, prop)? {
                Some(value) => {
                    let (min, max) = range(prop, opts.min, opts.max)?;
                    Some(Value::from(map_value_range(min, max, 0.0, 1.0, value)?))
                }
                None => None,
            },

            Self::ColorMode => field(payload, prop).map(|mode| {
                Value::from(if mode.as_str() == Some("color_temp") {
                    "temperature"
                } else {
                    "color"
                })
            }),

            Self::Hue | Self::ColorX => color_component(payload, prop, ColorComponent::Hue)?,

            Self::Saturation | Self::ColorY => {
                color_component(payload, prop, ColorComponent::Saturation)?
            }

            /* "state" stays open until fully closed, so prefer "moving" */
            Self::Cover => field(payload, "moving")
                .or_else(|| field(payload, prop))
                .and_then(Value::as_str)
                .and_then(|state| match state {
                    "UP" => Some("up"),
                    "STOP" => Some("idle"),
                    "DOWN" => Some("down"),
                    _ => None,
                })
                .map(Value::from),

            Self::Percent => match number(payload, prop)? {
                Some(value) => Some(Value::from(map_value_range(0.0, 100.0, 0.0, 1.0, value)?)),
                None => None,
            },

            Self::Meter => match field(payload, prop) {
                None => None,
                Some(value @ Value::Number(_)) => Some(value.clone()),
                Some(value @ Value::String(s)) => {
                    let num: f64 = s
                        .trim()
                        .parse()
                        .map_err(|_| ApiError::InvalidValue(prop.to_string(), value.clone()))?;
                    Some(Value::from(num))
                }
                Some(value) => return Err(ApiError::InvalidValue(prop.to_string(), value.clone())),
            },

            Self::Alarm { invert } => field(payload, prop).map(|v| Value::Bool(truthy(v) != invert)),

            Self::DeviceStatus => {
                field(payload, prop).map(|v| Value::Bool(v.as_str() != Some("normal_state")))
            }
        };

        Ok(res)
    }

    pub fn set(self, value: &Value, opts: &SetOptions) -> ApiResult<Map<String, Value>> {
        let prop = opts.property;
        let invalid = || ApiError::InvalidValue(prop.to_string(), value.clone());

        let res = match self {
            Self::Read | Self::Meter | Self::Alarm { .. } | Self::DeviceStatus => {
                return Err(ApiError::ReadOnlyCapability(prop.to_string()));
            }

            Self::ReadWrite => single(prop, value.clone()),

            Self::OnOff => {
                let on = value.as_bool().ok_or_else(invalid)?;
                single(prop, if on { "ON" } else { "OFF" })
            }

            Self::Range | Self::ColorTemp => {
                let level = value.as_f64().ok_or_else(invalid)?;
                let (min, max) = range(prop, opts.min, opts.max)?;
                single(prop, map_value_range(0.0, 1.0, min, max, level)?)
            }

            Self::ColorMode => match value.as_str().ok_or_else(invalid)? {
                "temperature" => single("color_temp", 250),
                _ => {
                    let hue = require(opts.hue, "hue", prop)?;
                    let saturation = opts.saturation.unwrap_or(1.0);
                    let mut color = hs_fragment("color", hue, saturation);
                    if let Some(Value::Object(obj)) = color.get_mut("color") {
                        obj.extend(ColorHSV::from_hs(hue, saturation).to_xy().to_object());
                    }
                    color
                }
            },

            Self::Hue => {
                let hue = value.as_f64().ok_or_else(invalid)?;
                hs_fragment(color_key(prop), hue, opts.saturation.unwrap_or(1.0))
            }

            Self::Saturation => {
                let saturation = value.as_f64().ok_or_else(invalid)?;
                hs_fragment(color_key(prop), require(opts.hue, "hue", prop)?, saturation)
            }

            Self::ColorX => {
                let hue = value.as_f64().ok_or_else(invalid)?;
                xy_fragment(color_key(prop), hue, opts.saturation.unwrap_or(1.0))
            }

            Self::ColorY => {
                let saturation = value.as_f64().ok_or_else(invalid)?;
                xy_fragment(color_key(prop), require(opts.hue, "hue", prop)?, saturation)
            }

            Self::Cover => {
                let state = match value.as_str() {
                    Some("up") => "OPEN",
                    Some("idle") => "STOP",
                    Some("down") => "CLOSE",
                    _ => return Err(invalid()),
                };
                single(prop, state)
            }

            Self::Percent => {
                let level = value.as_f64().ok_or_else(invalid)?;
                single(prop, map_value_range(0.0, 1.0, 0.0, 100.0, level)?)
            }

            Self::Lock => single(prop, if truthy(value) { "LOCK" } else { "UNLOCK" }),
        };

        Ok(with_transition(res, opts))
    }
}
