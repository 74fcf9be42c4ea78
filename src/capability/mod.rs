pub mod catalog;
pub mod mapper;

use std::collections::HashSet;

use itertools::Itertools;
use serde::Serialize;
use serde_json::{Map, Value};

use z2m::feature::Feature;

use crate::capability::catalog::lookup;
use crate::capability::mapper::{GetOptions, Mapper, SetOptions};
use crate::error::{ApiError, ApiResult};

/// A feature of a device, bound to a capability
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Capability {
    /// Capability name, with an endpoint suffix for multi-endpoint devices
    /// (`onoff.l2`)
    pub capability: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_capability: Option<String>,
    /// Path of the value in a flattened state payload
    pub property: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip)]
    pub mapper: Mapper,
}

/// Current state of the device, used as helper values when setting a
/// capability
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SetContext {
    pub hue: Option<f64>,
    pub saturation: Option<f64>,
    /// Transition time in milliseconds
    pub duration: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalizedText {
    pub en: String,
}

/// Presentation options for a capability
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CapabilityOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub duration: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<LocalizedText>,
}

impl Capability {
    /// Bind a feature to its catalog entry, if it has one
    #[must_use]
    pub fn from_feature(feat: &Feature) -> Option<Self> {
        let entry = lookup(&feat.lookup_property)?;
        let endpoint = feat.name().endpoint;

        let capability = match endpoint {
            Some(endpoint) => format!("{}.{endpoint}", entry.capability),
            None => entry.capability.to_string(),
        };

        Some(Self {
            capability,
            sub_capability: endpoint.map(ToString::to_string),
            property: feat.property.clone(),
            unit: feat.unit.clone(),
            min: feat.value_min,
            max: feat.value_max,
            mapper: entry.mapper,
        })
    }

    #[must_use]
    pub const fn is_settable(&self) -> bool {
        self.mapper.is_settable()
    }

    /// Name of the flow trigger for placeholder capabilities like
    /// `trigger_action`
    #[must_use]
    pub fn trigger_name(&self) -> Option<&str> {
        self.capability.strip_prefix("trigger_")
    }

    /// Read the value of this capability from a flattened payload.
    ///
    /// Returns `None` if the payload has no value for it.
    pub fn get(
        &self,
        payload: &Map<String, Value>,
        color_mode: Option<&str>,
    ) -> ApiResult<Option<Value>> {
        let opts = GetOptions {
            property: &self.property,
            min: self.min,
            max: self.max,
            color_mode,
        };
        self.mapper.get(payload, &opts)
    }

    /// Build the payload fragment that sets this capability to `value`
    pub fn set(&self, value: &Value, ctx: &SetContext) -> ApiResult<Map<String, Value>> {
        if !self.is_settable() {
            return Err(ApiError::ReadOnlyCapability(self.capability.clone()));
        }

        let opts = SetOptions {
            property: &self.property,
            min: self.min,
            max: self.max,
            hue: ctx.hue,
            saturation: ctx.saturation,
            duration: ctx.duration,
        };
        self.mapper.set(value, &opts)
    }

    #[must_use]
    pub fn options(&self, supports_transition: bool) -> CapabilityOptions {
        CapabilityOptions {
            title: self.sub_capability.as_deref().map(to_human),
            duration: supports_transition,
            units: self
                .unit
                .as_ref()
                .filter(|_| self.capability.starts_with("measure_"))
                .map(|unit| LocalizedText { en: unit.clone() }),
        }
    }
}

/// Resolve the capabilities of a list of flattened features.
///
/// Features without a catalog entry are skipped. When several features map
/// to the same capability, the first one wins.
#[must_use]
pub fn find_capabilities(features: &[Feature]) -> Vec<Capability> {
    let mut seen = HashSet::new();
    let mut res = vec![];

    for feat in features {
        let Some(cap) = Capability::from_feature(feat) else {
            log::trace!("No capability for {:?}", feat.lookup_property);
            continue;
        };

        if !seen.insert(cap.capability.clone()) {
            log::debug!(
                "Capability {} already provided, ignoring {:?}",
                cap.capability,
                feat.property
            );
            continue;
        }

        res.push(cap);
    }

    res
}

/// Turn `snake_case` identifiers into titles: `left_top` becomes `Left Top`
#[must_use]
pub fn to_human(text: &str) -> String {
    text.split('_')
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .join(" ")
}
