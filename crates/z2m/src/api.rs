use std::collections::HashMap;
use std::fmt::{self, Debug, Display};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::access::Access;

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct RawMessage {
    pub topic: String,
    pub payload: Value,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(tag = "topic", content = "payload")]
pub enum Message {
    #[serde(rename = "bridge/info")]
    BridgeInfo(Value),

    #[serde(rename = "bridge/state")]
    BridgeState(BridgeState),

    #[serde(rename = "bridge/event")]
    BridgeEvent(Value),

    #[serde(rename = "bridge/devices")]
    BridgeDevices(BridgeDevices),

    #[serde(rename = "bridge/groups")]
    BridgeGroups(Value),

    #[serde(rename = "bridge/logging")]
    BridgeLogging(Value),

    #[serde(rename = "bridge/definitions")]
    BridgeDefinitions(Value),

    #[serde(rename = "bridge/extensions")]
    BridgeExtensions(Value),
}

#[derive(Serialize, Deserialize, Clone, Hash, Debug, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    Online,
    Offline,
}

#[derive(Clone, Hash, PartialEq, Eq)]
pub struct IeeeAddress(u64);

impl IeeeAddress {
    #[must_use]
    pub const fn new(addr: u64) -> Self {
        Self(addr)
    }
}

impl Debug for IeeeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IeeeAddress({:016x})", self.0)
    }
}

/// Formatted the way zigbee2mqtt does, e.g. `0x00178801040b5a1c`
impl Display for IeeeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016x}", self.0)
    }
}

impl Serialize for IeeeAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for IeeeAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;
        let s: String = Deserialize::deserialize(deserializer)?;
        let num = u64::from_str_radix(s.trim_start_matches("0x"), 16).map_err(Error::custom)?;
        Ok(Self(num))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BridgeOnlineState {
    Online,
    Offline,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BridgeState {
    pub state: BridgeOnlineState,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub enum PowerSource {
    #[serde(rename = "Mains (single phase)")]
    MainsSinglePhase = 1,
    #[serde(rename = "Mains (3 phase)")]
    MainsThreePhase = 2,
    #[serde(rename = "Battery")]
    Battery = 3,
    #[serde(rename = "DC Source")]
    DcSource = 4,
    #[serde(rename = "Emergency mains constantly powered")]
    EmergencyMainsConstantly = 5,
    #[serde(rename = "Emergency mains and transfer switch")]
    EmergencyMainsAndTransferSwitch = 6,
    #[serde(rename = "Unknown")]
    #[serde(other)]
    #[default]
    Unknown = 0,
}

pub type BridgeDevices = Vec<Device>;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub enum DeviceType {
    Coordinator,
    Router,
    EndDevice,
    GreenPower,
    #[default]
    #[serde(other)]
    Unknown,
}

#[allow(clippy::pub_underscore_fields)]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub friendly_name: String,
    pub ieee_address: IeeeAddress,
    #[serde(rename = "type", default)]
    pub device_type: DeviceType,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub power_source: PowerSource,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub model_id: Option<String>,
    #[serde(default)]
    pub definition: Option<DeviceDefinition>,
    #[serde(default)]
    pub endpoints: serde_json::Map<String, Value>,

    /* all other fields */
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    #[serde(default, flatten)]
    pub __: HashMap<String, Value>,
}

impl Device {
    #[must_use]
    pub fn exposes(&self) -> &[Expose] {
        self.definition.as_ref().map_or(&[], |def| &def.exposes)
    }

    #[must_use]
    pub fn options(&self) -> &[Expose] {
        self.definition.as_ref().map_or(&[], |def| &def.options)
    }

    /// Free-text description, falling back to the model id
    #[must_use]
    pub fn description(&self) -> &str {
        self.definition
            .as_ref()
            .map(|def| def.description.as_str())
            .filter(|desc| !desc.is_empty())
            .or(self.model_id.as_deref())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn vendor(&self) -> Option<&str> {
        self.definition
            .as_ref()
            .map(|def| def.vendor.as_str())
            .filter(|vendor| !vendor.is_empty())
            .or(self.manufacturer.as_deref())
    }

    #[must_use]
    pub fn model(&self) -> Option<&str> {
        self.definition
            .as_ref()
            .map(|def| def.model.as_str())
            .filter(|model| !model.is_empty())
            .or(self.model_id.as_deref())
    }

    /// Coordinators and disabled devices are not mapped to capabilities
    #[must_use]
    pub fn is_mappable(&self) -> bool {
        self.device_type != DeviceType::Coordinator && !self.disabled
    }

    #[must_use]
    pub fn expose_action(&self) -> Option<&Expose> {
        self.exposes().iter().find(|exp| {
            exp.expose_type == ExposeType::Enum && exp.property.as_deref() == Some("action")
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceDefinition {
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub vendor: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub exposes: Vec<Expose>,
    #[serde(default)]
    pub supports_ota: bool,
    #[serde(default)]
    pub options: Vec<Expose>,
    #[serde(default)]
    pub icon: String,
}

/// The `type` of an exposed feature. Generic types describe a single value,
/// specific types (`light`, `switch`, ...) group related features.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ExposeType {
    Binary,
    Numeric,
    Enum,
    Text,
    List,
    Composite,
    Light,
    Switch,
    Fan,
    Cover,
    Lock,
    Climate,
    #[serde(untagged)]
    Other(String),
}

impl ExposeType {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Binary => "binary",
            Self::Numeric => "numeric",
            Self::Enum => "enum",
            Self::Text => "text",
            Self::List => "list",
            Self::Composite => "composite",
            Self::Light => "light",
            Self::Switch => "switch",
            Self::Fan => "fan",
            Self::Cover => "cover",
            Self::Lock => "lock",
            Self::Climate => "climate",
            Self::Other(name) => name,
        }
    }
}

impl Display for ExposeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExposeCategory {
    Config,
    Diagnostic,
}

/// A node in a device's `exposes` tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expose {
    #[serde(rename = "type")]
    pub expose_type: ExposeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub access: Access,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<ExposeCategory>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_step: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<Expose>,
}

impl Expose {
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Enum values that are plain strings
    #[must_use]
    pub fn string_values(&self) -> Vec<String> {
        self.values
            .iter()
            .filter_map(|v| v.as_str().map(ToString::to_string))
            .collect()
    }
}
