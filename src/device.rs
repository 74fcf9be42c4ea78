use serde::Serialize;
use serde_json::{Map, Value};

use z2m::api::{Device, DeviceType, Expose, IeeeAddress, PowerSource};
use z2m::feature::FeatureTree;

use crate::capability::{Capability, find_capabilities};
use crate::classify::{DeviceClass, device_class, device_icon};
use crate::config::AppConfig;

/// Data kept about a device between descriptor updates
#[derive(Debug, Clone, Serialize)]
pub struct DeviceStore {
    pub power_source: PowerSource,
    #[serde(rename = "type")]
    pub device_type: DeviceType,
    pub exposes: FeatureTree,
    pub options: Vec<Expose>,
    pub endpoints: Map<String, Value>,
}

/// User-visible device settings
#[derive(Debug, Clone, Serialize)]
pub struct DeviceSettings {
    pub ieee_address: IeeeAddress,
    pub friendly_name: String,
    pub description: String,
    pub vendor: Option<String>,
    pub model: Option<String>,
    pub device_class: DeviceClass,
}

/// A zigbee2mqtt device, mapped for presentation
#[derive(Debug, Clone, Serialize)]
pub struct DeviceInfo {
    pub name: String,
    pub id: IeeeAddress,
    pub icon: String,
    pub supports_transition: bool,
    pub store: DeviceStore,
    pub settings: DeviceSettings,
}

impl DeviceInfo {
    #[must_use]
    pub fn from_device(dev: &Device, config: &AppConfig) -> Self {
        let description = dev.description().to_string();
        let inferred = device_class(&description);
        let icon = device_icon(inferred, &description);

        let options = dev.options().to_vec();
        let supports_transition = options
            .iter()
            .any(|opt| opt.property.as_deref() == Some("transition"));

        Self {
            name: dev.friendly_name.clone(),
            id: dev.ieee_address.clone(),
            icon: format!("{icon}.svg"),
            supports_transition,
            store: DeviceStore {
                power_source: dev.power_source.clone(),
                device_type: dev.device_type.clone(),
                exposes: FeatureTree::flatten(dev.exposes()),
                options,
                endpoints: dev.endpoints.clone(),
            },
            settings: DeviceSettings {
                ieee_address: dev.ieee_address.clone(),
                friendly_name: dev.friendly_name.clone(),
                description,
                vendor: dev.vendor().map(ToString::to_string),
                model: dev.model().map(ToString::to_string),
                device_class: config
                    .device_class(&dev.friendly_name)
                    .unwrap_or(inferred),
            },
        }
    }

    #[must_use]
    pub fn capabilities(&self) -> Vec<Capability> {
        find_capabilities(self.store.exposes.features())
    }

    /// Devices are addressed by ieee address or friendly name
    #[must_use]
    pub fn matches(&self, id: &str) -> bool {
        self.settings.friendly_name == id || self.id.to_string() == id
    }
}

/// Map the payload of `bridge/devices`, skipping the coordinator and, unless
/// configured otherwise, disabled devices
#[must_use]
pub fn bridge_devices(devices: &[Device], config: &AppConfig) -> Vec<DeviceInfo> {
    let res: Vec<_> = devices
        .iter()
        .filter(|dev| {
            dev.is_mappable() || (config.z2m.include_disabled && dev.device_type != DeviceType::Coordinator)
        })
        .map(|dev| DeviceInfo::from_device(dev, config))
        .collect();

    log::info!("{} devices loaded", res.len());

    res
}

#[must_use]
pub fn find_device<'a>(devices: &'a [DeviceInfo], id: &str) -> Option<&'a DeviceInfo> {
    devices.iter().find(|dev| dev.matches(id))
}

#[cfg(test)]
mod tests {
    use maplit::btreemap;
    use serde_json::{Value, json};

    use z2m::api::Device;

    use crate::classify::DeviceClass;
    use crate::config::{AppConfig, DeviceConfig};
    use crate::device::{DeviceInfo, bridge_devices, find_device};

    fn device(value: Value) -> Device {
        serde_json::from_value(value).unwrap()
    }

    fn bulb() -> Value {
        json!({
            "friendly_name": "hallway",
            "ieee_address": "0x00178801040b5a1c",
            "type": "Router",
            "power_source": "Mains (single phase)",
            "manufacturer": "Signify Netherlands B.V.",
            "model_id": "LCT015",
            "endpoints": {"11": {"bindings": []}},
            "definition": {
                "model": "9290012573A",
                "vendor": "Philips",
                "description": "Hue white and color ambiance E26/E27/E14",
                "options": [
                    {"type": "numeric", "property": "transition", "access": 2},
                ],
                "exposes": [
                    {"type": "light", "features": [
                        {"type": "binary", "property": "state", "access": 7},
                        {"type": "numeric", "property": "brightness", "access": 7, "value_min": 0, "value_max": 254},
                    ]},
                    {"type": "numeric", "property": "linkquality", "access": 1},
                ],
            },
        })
    }

    #[test]
    fn map_bulb() {
        let info = DeviceInfo::from_device(&device(bulb()), &AppConfig::default());

        assert_eq!(info.name, "hallway");
        assert_eq!(info.id.to_string(), "0x00178801040b5a1c");
        assert_eq!(info.icon, "light.svg");
        assert!(info.supports_transition);
        assert_eq!(info.settings.device_class, DeviceClass::Light);
        assert_eq!(info.settings.vendor.as_deref(), Some("Philips"));
        assert_eq!(info.settings.model.as_deref(), Some("9290012573A"));
        assert_eq!(info.store.exposes.features().len(), 3);
        assert_eq!(info.store.endpoints.len(), 1);

        let caps: Vec<_> = info
            .capabilities()
            .into_iter()
            .map(|cap| cap.capability)
            .collect();
        assert_eq!(caps, ["onoff", "dim"]);
    }

    #[test]
    fn fallbacks_without_definition() {
        let info = DeviceInfo::from_device(
            &device(json!({
                "friendly_name": "mystery",
                "ieee_address": "0x0000000000000002",
                "type": "EndDevice",
                "power_source": "Battery",
                "manufacturer": "ACME",
                "model_id": "Door sensor v2",
            })),
            &AppConfig::default(),
        );

        assert_eq!(info.settings.description, "Door sensor v2");
        assert_eq!(info.settings.vendor.as_deref(), Some("ACME"));
        assert_eq!(info.settings.model.as_deref(), Some("Door sensor v2"));
        assert_eq!(info.settings.device_class, DeviceClass::Sensor);
        assert_eq!(info.icon, "sensor_contact.svg");
        assert!(!info.supports_transition);
        assert!(info.capabilities().is_empty());
    }

    #[test]
    fn class_override() {
        let config = AppConfig {
            devices: btreemap! {
                "hallway".to_string() => DeviceConfig {
                    device_class: Some(DeviceClass::Socket),
                },
            },
            ..Default::default()
        };

        let info = DeviceInfo::from_device(&device(bulb()), &config);
        assert_eq!(info.settings.device_class, DeviceClass::Socket);
        assert_eq!(info.icon, "light.svg");
    }

    #[test]
    fn skip_coordinator_and_disabled() {
        let mut disabled = bulb();
        disabled["friendly_name"] = json!("disabled");
        disabled["ieee_address"] = json!("0x0000000000000003");
        disabled["disabled"] = json!(true);

        let devices = [
            device(json!({
                "friendly_name": "Coordinator",
                "ieee_address": "0x00124b0000000000",
                "type": "Coordinator",
            })),
            device(bulb()),
            device(disabled),
        ];

        let infos = bridge_devices(&devices, &AppConfig::default());
        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].name, "hallway");

        let mut config = AppConfig::default();
        config.z2m.include_disabled = true;
        assert_eq!(bridge_devices(&devices, &config).len(), 2);
    }

    #[test]
    fn lookup_by_name_or_address() {
        let infos = bridge_devices(&[device(bulb())], &AppConfig::default());
        assert!(find_device(&infos, "hallway").is_some());
        assert!(find_device(&infos, "0x00178801040b5a1c").is_some());
        assert!(find_device(&infos, "kitchen").is_none());
    }
}
