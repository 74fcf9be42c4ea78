use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// Coarse device class, used to pick a presentation for a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    Light,
    Sensor,
    Socket,
    Windowcoverings,
    Lock,
    Button,
    Other,
}

impl DeviceClass {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Sensor => "sensor",
            Self::Socket => "socket",
            Self::Windowcoverings => "windowcoverings",
            Self::Lock => "lock",
            Self::Button => "button",
            Self::Other => "other",
        }
    }
}

impl Display for DeviceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

struct ClassRule {
    class: DeviceClass,
    keywords: &'static [&'static str],
    subclasses: &'static [(&'static str, &'static [&'static str])],
}

/* first match wins, so order matters */
static CLASSES: &[ClassRule] = &[
    ClassRule {
        class: DeviceClass::Light,
        keywords: &["led", "bulb", "e27", "e14", "gu10", "dimmer"],
        subclasses: &[("module", &["module"])],
    },
    ClassRule {
        class: DeviceClass::Sensor,
        keywords: &["sensor"],
        subclasses: &[
            ("contact", &["contact", "window", "door"]),
            ("temperature", &["humidity", "temperature"]),
            ("vibration", &["vibration", "pressure"]),
            ("motion", &["motion", "pir"]),
        ],
    },
    ClassRule {
        class: DeviceClass::Socket,
        keywords: &["plug", "socket"],
        subclasses: &[],
    },
    ClassRule {
        class: DeviceClass::Windowcoverings,
        keywords: &["curtain", "shade", "blind"],
        subclasses: &[],
    },
    ClassRule {
        class: DeviceClass::Lock,
        keywords: &["lock"],
        subclasses: &[],
    },
    ClassRule {
        class: DeviceClass::Button,
        keywords: &["switch", "button"],
        subclasses: &[],
    },
];

fn matches_any(description: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| description.contains(kw))
}

/// Find the device class from a free-text device description
#[must_use]
pub fn device_class(description: &str) -> DeviceClass {
    let description = description.to_lowercase();
    CLASSES
        .iter()
        .find(|rule| matches_any(&description, rule.keywords))
        .map_or(DeviceClass::Other, |rule| rule.class)
}

/// Icon name for a device: the class name, refined to `class_subclass`
/// when the description matches one of the class's subclasses.
#[must_use]
pub fn device_icon(class: DeviceClass, description: &str) -> String {
    let description = description.to_lowercase();
    CLASSES
        .iter()
        .find(|rule| rule.class == class)
        .and_then(|rule| {
            rule.subclasses
                .iter()
                .find(|(_, keywords)| matches_any(&description, keywords))
        })
        .map_or_else(
            || class.to_string(),
            |(subclass, _)| format!("{class}_{subclass}"),
        )
}

#[cfg(test)]
mod tests {
    use crate::classify::{DeviceClass, device_class, device_icon};

    #[test]
    fn classify_light() {
        assert_eq!(device_class("Hue white and color ambiance E27 bulb"), DeviceClass::Light);
        assert_eq!(device_class("LED driver"), DeviceClass::Light);
    }

    #[test]
    fn classify_sensor() {
        assert_eq!(device_class("Door and window sensor"), DeviceClass::Sensor);
        assert_eq!(device_icon(DeviceClass::Sensor, "Door and window sensor"), "sensor_contact");
        assert_eq!(device_icon(DeviceClass::Sensor, "Motion sensor"), "sensor_motion");
        assert_eq!(device_icon(DeviceClass::Sensor, "Water leak sensor"), "sensor");
    }

    #[test]
    fn subclass_declaration_order() {
        /* both "window" (contact) and "temperature" match; contact comes first */
        assert_eq!(
            device_icon(DeviceClass::Sensor, "Window temperature sensor"),
            "sensor_contact"
        );
    }

    #[test]
    fn class_declaration_order() {
        /* "led" is found in "controlled", and light is checked before button */
        assert_eq!(device_class("Remote controlled switch"), DeviceClass::Light);
        assert_eq!(device_class("Wall switch"), DeviceClass::Button);
    }

    #[test]
    fn classify_other() {
        assert_eq!(device_class(""), DeviceClass::Other);
        assert_eq!(device_class("Thermostat radiator valve"), DeviceClass::Other);
        assert_eq!(device_icon(DeviceClass::Other, "anything"), "other");
    }

    #[test]
    fn case_insensitive() {
        assert_eq!(device_class("SMART PLUG"), DeviceClass::Socket);
        assert_eq!(device_class("Roller Blind motor"), DeviceClass::Windowcoverings);
        assert_eq!(device_class("Door lock"), DeviceClass::Lock);
    }

    #[test]
    fn light_module() {
        assert_eq!(device_class("Dimmer module"), DeviceClass::Light);
        assert_eq!(device_icon(DeviceClass::Light, "Dimmer module"), "light_module");
    }
}
