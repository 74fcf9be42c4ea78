use crate::capability::mapper::Mapper;

/// A single entry in the capability catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Lookup key of the feature, e.g. `light#brightness`
    pub key: &'static str,
    /// Name of the capability the feature is mapped to
    pub capability: &'static str,
    pub mapper: Mapper,
}

const fn entry(key: &'static str, capability: &'static str, mapper: Mapper) -> CatalogEntry {
    CatalogEntry {
        key,
        capability,
        mapper,
    }
}

const fn measure(key: &'static str, capability: &'static str) -> CatalogEntry {
    entry(key, capability, Mapper::Read)
}

const fn meter(key: &'static str, capability: &'static str) -> CatalogEntry {
    entry(key, capability, Mapper::Meter)
}

const fn alarm(key: &'static str, capability: &'static str) -> CatalogEntry {
    entry(key, capability, Mapper::Alarm { invert: false })
}

pub static CATALOG: &[CatalogEntry] = &[
    /* placeholders for flow cards */
    entry("action", "trigger_action", Mapper::Read),
    entry("effect", "action_effect", Mapper::Read),
    /* lights */
    entry("light#state", "onoff", Mapper::OnOff),
    entry("light#brightness", "dim", Mapper::Range),
    entry("light#color_temp", "light_temperature", Mapper::ColorTemp),
    entry("light#color_mode", "light_mode", Mapper::ColorMode),
    entry("light#color.hue", "light_hue", Mapper::Hue),
    entry("light#color.saturation", "light_saturation", Mapper::Saturation),
    entry("light#color.x", "light_hue", Mapper::ColorX),
    entry("light#color.y", "light_saturation", Mapper::ColorY),
    /* switches and fans */
    entry("switch#state", "onoff", Mapper::OnOff),
    entry("fan#state", "onoff", Mapper::OnOff),
    /* covers */
    entry("cover#state", "windowcoverings_state", Mapper::Cover),
    entry("cover#position", "windowcoverings_set", Mapper::Percent),
    entry("cover#tilt", "windowcoverings_tilt_set", Mapper::Percent),
    /* locks */
    entry("lock#state", "locked", Mapper::Lock),
    entry("lock#lock_state", "lock_state", Mapper::ReadWrite),
    /* climate */
    entry("climate#current_heating_setpoint", "target_temperature", Mapper::ReadWrite),
    /* ambience */
    measure("temperature", "measure_temperature"),
    measure("local_temperature", "measure_temperature.local"),
    measure("device_temperature", "measure_temperature.device"),
    measure("humidity", "measure_humidity"),
    measure("soil_moisture", "measure_humidity.soil"),
    measure("pressure", "measure_pressure"),
    /* air */
    measure("co", "measure_co"),
    measure("co2", "measure_co2"),
    measure("smoke_concentration", "measure_pm25"),
    /* electricity */
    meter("energy", "meter_power"),
    measure("battery", "measure_battery"),
    measure("power", "measure_power"),
    measure("voltage", "measure_voltage"),
    measure("current", "measure_current"),
    /* luminance */
    measure("illuminance", "measure_luminance"),
    measure("illuminance_lux", "measure_luminance.lux"),
    /* water */
    measure("flow", "measure_water"),
    measure("water_flow", "measure_water"),
    meter("cyclic_quantitative_irrigation#irrigation_capacity", "meter_water"),
    meter("water_consumed", "meter_water"),
    /* alarms */
    entry("contact", "alarm_contact", Mapper::Alarm { invert: true }),
    alarm("occupancy", "alarm_motion"),
    alarm("presence", "alarm_motion"),
    alarm("vibration", "alarm_motion"),
    alarm("tamper", "alarm_tamper"),
    alarm("carbon_monoxide", "alarm_co"),
    alarm("smoke", "alarm_smoke"),
    alarm("water_leak", "alarm_water"),
    alarm("rain", "alarm_water.rain"),
    alarm("battery_low", "alarm_battery"),
    entry("current_device_status", "alarm_water", Mapper::DeviceStatus),
];

/// Find the catalog entry for a feature lookup key
#[must_use]
pub fn lookup(key: &str) -> Option<&'static CatalogEntry> {
    CATALOG.iter().find(|entry| entry.key == key)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::capability::catalog::{CATALOG, lookup};
    use crate::capability::mapper::Mapper;

    #[test]
    fn keys_are_unique() {
        let keys: HashSet<_> = CATALOG.iter().map(|entry| entry.key).collect();
        assert_eq!(keys.len(), CATALOG.len());
    }

    #[test]
    fn lookup_light() {
        let entry = lookup("light#brightness").unwrap();
        assert_eq!(entry.capability, "dim");
        assert_eq!(entry.mapper, Mapper::Range);
    }

    #[test]
    fn lookup_contact_is_inverted() {
        assert_eq!(
            lookup("contact").unwrap().mapper,
            Mapper::Alarm { invert: true }
        );
    }

    #[test]
    fn lookup_unknown() {
        assert!(lookup("linkquality").is_none());
        assert!(lookup("brightness").is_none());
    }

    #[test]
    fn measures_are_read_only() {
        for entry in CATALOG {
            if entry.capability.starts_with("measure_") || entry.capability.starts_with("alarm_") {
                assert!(!entry.mapper.is_settable(), "{}", entry.key);
            }
        }
    }
}
