use serde::Serialize;
use serde_json::{Map, Value};

use z2m::api::{Availability, Message, RawMessage};
use z2m::path::{flatten_object, unflatten};

use crate::capability::{Capability, SetContext};
use crate::config::{AppConfig, AvailabilityHandling};
use crate::device::DeviceInfo;
use crate::error::{ApiError, ApiResult};

/// Name of the flow trigger fired for `onoff.<endpoint>` updates
pub const ONOFF_ENDPOINT_TRIGGER: &str = "onoff.endpoint";

/// Something the host should do in response to a device message
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DeviceEvent {
    /// New capability value
    Update { capability: String, value: Value },
    /// Flow trigger, for placeholder capabilities like `trigger_action`
    Trigger { trigger: String, value: Value },
    /// Flow trigger for a single endpoint of a multi-endpoint device
    EndpointTrigger {
        trigger: String,
        endpoint: String,
        value: Value,
    },
    SetAvailable,
    SetUnavailable,
}

/// zigbee2mqtt topic names for a given base topic
#[derive(Debug, Clone, Copy)]
pub struct Topics<'a> {
    base: &'a str,
}

impl<'a> Topics<'a> {
    #[must_use]
    pub const fn new(base: &'a str) -> Self {
        Self { base }
    }

    #[must_use]
    pub fn device(&self, name: &str) -> String {
        format!("{}/{name}", self.base)
    }

    #[must_use]
    pub fn set(&self, name: &str) -> String {
        format!("{}/{name}/set", self.base)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> String {
        format!("{}/{name}/get", self.base)
    }

    #[must_use]
    pub fn availability(&self, name: &str) -> String {
        format!("{}/{name}/availability", self.base)
    }

    #[must_use]
    pub fn bridge(&self, name: &str) -> String {
        format!("{}/bridge/{name}", self.base)
    }

    /// Parse a message on one of the `bridge/*` topics.
    ///
    /// Returns `None` for topics outside of the bridge namespace.
    pub fn bridge_message(&self, topic: &str, payload: &Value) -> ApiResult<Option<Message>> {
        let Some(topic) = topic
            .strip_prefix(self.base)
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|rest| rest.starts_with("bridge/"))
        else {
            return Ok(None);
        };

        let raw = RawMessage {
            topic: topic.to_string(),
            payload: payload.clone(),
        };

        Ok(Some(serde_json::from_value(serde_json::to_value(raw)?)?))
    }
}

/// Translates between zigbee2mqtt messages and capability values for a
/// single device
#[derive(Debug, Clone)]
pub struct DeviceHandler {
    device: DeviceInfo,
    capabilities: Vec<Capability>,
    base_topic: String,
    availability: AvailabilityHandling,
}

impl DeviceHandler {
    #[must_use]
    pub fn new(device: DeviceInfo, config: &AppConfig) -> Self {
        let capabilities = device.capabilities();
        Self {
            device,
            capabilities,
            base_topic: config.z2m.base_topic.clone(),
            availability: config.availability.handling,
        }
    }

    #[must_use]
    pub const fn device(&self) -> &DeviceInfo {
        &self.device
    }

    #[must_use]
    pub fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }

    #[must_use]
    pub fn has_capability(&self, name: &str) -> bool {
        self.capabilities.iter().any(|cap| cap.capability == name)
    }

    fn topics(&self) -> Topics<'_> {
        Topics::new(&self.base_topic)
    }

    /// Handle a message on the device topic or its availability topic.
    ///
    /// Messages for other topics produce no events.
    #[must_use]
    pub fn handle_message(&self, topic: &str, payload: &Value) -> Vec<DeviceEvent> {
        let topics = self.topics();

        if topic == topics.device(&self.device.name) {
            let Value::Object(obj) = payload else {
                log::debug!("[{}] Ignoring non-object payload", self.device.name);
                return vec![];
            };
            return self.handle_state(&flatten_object(obj));
        }

        if topic == topics.availability(&self.device.name) {
            /* availability is either {"state": "online"} or plain "online" */
            let state = payload.get("state").unwrap_or(payload);
            return match serde_json::from_value(state.clone()) {
                Ok(state) => self.handle_availability(state),
                Err(err) => {
                    log::warn!("[{}] Invalid availability {payload}: {err}", self.device.name);
                    vec![]
                }
            };
        }

        vec![]
    }

    /// Evaluate a flattened state payload against all capabilities
    #[must_use]
    pub fn handle_state(&self, payload: &Map<String, Value>) -> Vec<DeviceEvent> {
        let color_mode = payload.get("color_mode").and_then(Value::as_str);
        let mut events = vec![];

        for (property, value) in payload {
            if property == "availability" {
                match serde_json::from_value(value.clone()) {
                    Ok(state) => events.extend(self.handle_availability(state)),
                    Err(err) => log::warn!("[{}] Invalid availability: {err}", self.device.name),
                }
                continue;
            }

            for cap in self.capabilities.iter().filter(|cap| &cap.property == property) {
                let value = match cap.get(payload, color_mode) {
                    Ok(value) => value,
                    Err(err) => {
                        log::error!(
                            "[{}] Cannot read {} from {property}: {err}",
                            self.device.name,
                            cap.capability
                        );
                        continue;
                    }
                };

                if let Some(trigger) = cap.trigger_name() {
                    events.push(DeviceEvent::Trigger {
                        trigger: trigger.to_string(),
                        value: value.unwrap_or_default(),
                    });
                    continue;
                }

                let Some(value) = value else {
                    continue;
                };

                if let Some(endpoint) = cap
                    .sub_capability
                    .as_ref()
                    .filter(|_| cap.capability.starts_with("onoff."))
                {
                    events.push(DeviceEvent::EndpointTrigger {
                        trigger: ONOFF_ENDPOINT_TRIGGER.to_string(),
                        endpoint: endpoint.clone(),
                        value: value.clone(),
                    });
                }

                events.push(DeviceEvent::Update {
                    capability: cap.capability.clone(),
                    value,
                });
            }
        }

        events
    }

    #[must_use]
    pub fn handle_availability(&self, state: Availability) -> Vec<DeviceEvent> {
        match (state, self.availability) {
            (Availability::Online, _) => vec![DeviceEvent::SetAvailable],
            (Availability::Offline, AvailabilityHandling::Unavailable) => {
                log::info!("[{}] Device offline: set unavailable", self.device.name);
                vec![DeviceEvent::SetUnavailable]
            }
            (Availability::Offline, AvailabilityHandling::Ignore) => {
                log::info!("[{}] Device offline: ignored", self.device.name);
                vec![]
            }
            (Availability::Offline, AvailabilityHandling::PowerOff) => {
                log::info!("[{}] Device offline: power off", self.device.name);
                if self.has_capability("onoff") {
                    vec![DeviceEvent::Update {
                        capability: "onoff".to_string(),
                        value: Value::Bool(false),
                    }]
                } else {
                    vec![]
                }
            }
        }
    }

    /// Build the `/set` message for setting `capability` to `value`
    pub fn set(&self, capability: &str, value: &Value, ctx: &SetContext) -> ApiResult<RawMessage> {
        let Some(cap) = self
            .capabilities
            .iter()
            .find(|cap| cap.capability == capability)
        else {
            log::warn!("[{}] No capability {capability}", self.device.name);
            return Err(ApiError::UnknownCapability(capability.to_string()));
        };

        let ctx = SetContext {
            duration: ctx.duration.filter(|_| self.device.supports_transition),
            ..*ctx
        };

        let fragment = cap.set(value, &ctx)?;
        let payload = unflatten(&Value::Object(fragment))?;

        log::debug!("[{}] Setting {capability}: {payload}", self.device.name);

        Ok(RawMessage {
            topic: self.topics().set(&self.device.name),
            payload,
        })
    }

    /// Build the `/get` message requesting the current device state.
    ///
    /// Only the first gettable feature is requested, since every requested
    /// property results in a separate state message.
    pub fn get_request(&self) -> ApiResult<Option<RawMessage>> {
        let Some(feat) = self.device.store.exposes.first_gettable() else {
            return Ok(None);
        };

        let mut request = Map::new();
        request.insert(feat.property.clone(), Value::from(""));
        let payload = unflatten(&Value::Object(request))?;

        Ok(Some(RawMessage {
            topic: self.topics().get(&self.device.name),
            payload,
        }))
    }
}
