use serde::{Deserialize, Serialize};

use crate::access::Access;
use crate::api::{Expose, ExposeType};
use crate::property::{PropertyName, split_endpoint};

/// Lookup key prefix of light color features (`light#color.x`, ...)
pub const LIGHT_COLOR_PREFIX: &str = "light#color.";

/// Lookup key of the color mode of a light
pub const LIGHT_COLOR_MODE: &str = "light#color_mode";

/// Index of a composite node in a [`FeatureTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(usize);

/// A composite expose, kept so leaf features can refer to their context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub property: Option<String>,
    #[serde(rename = "type")]
    pub node_type: ExposeType,
    /// Endpoint declared on this node or inherited from its parents
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    pub parent: Option<NodeId>,
}

/// A single leaf value exposed by a device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// Canonical key used to find the matching capability,
    /// e.g. `light#brightness` or `occupancy`
    pub lookup_property: String,
    /// Path of the value in a flattened state payload,
    /// e.g. `brightness_l1` or `color.x`
    pub property: String,
    #[serde(rename = "type")]
    pub feature_type: ExposeType,
    pub access: Access,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_max: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<NodeId>,
}

impl Feature {
    #[must_use]
    pub fn name(&self) -> PropertyName<'_> {
        PropertyName::parse(&self.property, self.endpoint.as_deref())
    }

    /// The color mode of a light is always reported alongside its color, but
    /// zigbee2mqtt does not expose it as a feature.
    fn color_mode() -> Self {
        Self {
            lookup_property: LIGHT_COLOR_MODE.to_string(),
            property: "color_mode".to_string(),
            feature_type: ExposeType::Enum,
            access: Access::GET,
            endpoint: None,
            unit: None,
            value_min: None,
            value_max: None,
            values: vec![],
            parent: None,
        }
    }
}

/// The flattened form of a device's `exposes` tree.
///
/// Composite nodes live in an arena and are referenced by index; only leaf
/// features are listed in [`FeatureTree::features`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureTree {
    nodes: Vec<Node>,
    features: Vec<Feature>,
}

impl FeatureTree {
    #[must_use]
    pub fn flatten(exposes: &[Expose]) -> Self {
        let mut tree = Self::default();
        tree.walk(exposes, None);

        if tree
            .features
            .iter()
            .any(|feat| feat.lookup_property.starts_with(LIGHT_COLOR_PREFIX))
        {
            tree.features.push(Feature::color_mode());
        }

        tree
    }

    #[must_use]
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    #[must_use]
    pub fn parent(&self, feature: &Feature) -> Option<&Node> {
        feature.parent.and_then(|id| self.node(id))
    }

    /// Iterate from `id` outwards to the root of its tree
    pub fn ancestors(&self, id: Option<NodeId>) -> impl Iterator<Item = &Node> {
        std::iter::successors(id.and_then(|id| self.node(id)), move |node| {
            node.parent.and_then(|id| self.node(id))
        })
    }

    /// First feature that can be requested with a `get` message
    #[must_use]
    pub fn first_gettable(&self) -> Option<&Feature> {
        self.features.iter().find(|feat| feat.access.is_gettable())
    }

    fn walk(&mut self, exposes: &[Expose], parent: Option<NodeId>) {
        let inherited = parent
            .and_then(|id| self.node(id))
            .and_then(|node| node.endpoint.clone());

        for exp in exposes {
            let endpoint = exp.endpoint.clone().or_else(|| inherited.clone());

            if !exp.features.is_empty() {
                let id = NodeId(self.nodes.len());
                self.nodes.push(Node {
                    property: exp.property.clone(),
                    node_type: exp.expose_type.clone(),
                    endpoint,
                    parent,
                });
                self.walk(&exp.features, Some(id));
                continue;
            }

            let Some(property) = exp.property.as_deref().filter(|p| !p.is_empty()) else {
                continue;
            };

            self.features.push(Feature {
                lookup_property: self.lookup_property(parent, property, endpoint.as_deref()),
                property: self.property_path(parent, property),
                feature_type: exp.expose_type.clone(),
                access: exp.access,
                endpoint,
                unit: exp.unit.clone(),
                value_min: exp.value_min,
                value_max: exp.value_max,
                values: exp.string_values(),
                parent,
            });
        }
    }

    /// Build the canonical lookup key for `property`.
    ///
    /// Declared endpoint suffixes are removed from every segment. Parents
    /// with a property contribute `parent.`, parents without one contribute
    /// their type as `type#`.
    fn lookup_property(
        &self,
        parent: Option<NodeId>,
        property: &str,
        endpoint: Option<&str>,
    ) -> String {
        let mut key = split_endpoint(property, endpoint).0.to_string();
        for node in self.ancestors(parent) {
            key = match &node.property {
                Some(prop) => format!("{}.{key}", split_endpoint(prop, node.endpoint.as_deref()).0),
                None => format!("{}#{key}", node.node_type),
            };
        }
        key
    }

    /// Path of `property` in a flattened payload
    fn property_path(&self, parent: Option<NodeId>, property: &str) -> String {
        let mut path = property.to_string();
        for node in self.ancestors(parent) {
            if let Some(prop) = &node.property {
                path = format!("{prop}.{path}");
            }
        }
        path
    }
}
