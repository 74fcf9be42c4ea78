use std::collections::BTreeMap;

use camino::Utf8PathBuf;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::classify::DeviceClass;
use crate::error::ApiResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Z2mConfig {
    #[serde(default = "default_base_topic")]
    pub base_topic: String,
    #[serde(default)]
    pub include_disabled: bool,
}

impl Default for Z2mConfig {
    fn default() -> Self {
        Self {
            base_topic: default_base_topic(),
            include_disabled: false,
        }
    }
}

/// What to do when zigbee2mqtt reports a device as offline
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AvailabilityHandling {
    #[default]
    Unavailable,
    Ignore,
    PowerOff,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AvailabilityConfig {
    #[serde(default)]
    pub handling: AvailabilityHandling,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceConfig {
    pub device_class: Option<DeviceClass>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub z2m: Z2mConfig,
    #[serde(default)]
    pub availability: AvailabilityConfig,
    #[serde(default)]
    pub devices: BTreeMap<String, DeviceConfig>,
}

impl AppConfig {
    /// Per-device class override, keyed by friendly name
    #[must_use]
    pub fn device_class(&self, friendly_name: &str) -> Option<DeviceClass> {
        self.devices
            .get(friendly_name)
            .and_then(|dev| dev.device_class)
    }
}

fn default_base_topic() -> String {
    "zigbee2mqtt".to_string()
}

/// Environment overrides, e.g. `ZIGBRIDGE__Z2M__BASE_TOPIC`
fn environment() -> Environment {
    Environment::with_prefix("ZIGBRIDGE").separator("__")
}

pub fn parse(filename: Utf8PathBuf) -> ApiResult<AppConfig> {
    let settings = Config::builder()
        .add_source(File::new(filename.as_str(), FileFormat::Yaml).required(false))
        .add_source(environment())
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Parse configuration from a yaml string, without environment overrides
pub fn from_yaml(text: &str) -> ApiResult<AppConfig> {
    let settings = Config::builder()
        .add_source(File::from_str(text, FileFormat::Yaml))
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use config::Config;
    use maplit::hashmap;

    use crate::classify::DeviceClass;
    use crate::config::{AppConfig, AvailabilityHandling, environment, from_yaml};

    #[test]
    fn defaults() {
        let config = AppConfig::default();
        assert_eq!(config.z2m.base_topic, "zigbee2mqtt");
        assert!(!config.z2m.include_disabled);
        assert_eq!(config.availability.handling, AvailabilityHandling::Unavailable);
        assert!(config.devices.is_empty());
    }

    #[test]
    fn empty_yaml() {
        let config = from_yaml("{}").unwrap();
        assert_eq!(config.z2m.base_topic, "zigbee2mqtt");
    }

    #[test]
    fn full_yaml() {
        let config = from_yaml(
            "
z2m:
  base_topic: zb
  include_disabled: true
availability:
  handling: power-off
devices:
  hallway:
    device_class: light
",
        )
        .unwrap();

        assert_eq!(config.z2m.base_topic, "zb");
        assert!(config.z2m.include_disabled);
        assert_eq!(config.availability.handling, AvailabilityHandling::PowerOff);
        assert_eq!(config.device_class("hallway"), Some(DeviceClass::Light));
        assert_eq!(config.device_class("kitchen"), None);
    }

    #[test]
    fn environment_overrides() {
        let env = hashmap! {
            "ZIGBRIDGE__Z2M__BASE_TOPIC".to_string() => "zb".to_string(),
            "ZIGBRIDGE__AVAILABILITY__HANDLING".to_string() => "ignore".to_string(),
            "ZIGBRIDGE_Z2M__INCLUDE_DISABLED".to_string() => "true".to_string(),
        };
        let config: AppConfig = Config::builder()
            .add_source(environment().source(Some(env)))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.z2m.base_topic, "zb");
        assert_eq!(config.availability.handling, AvailabilityHandling::Ignore);
        assert!(!config.z2m.include_disabled);
    }
}
