use std::fmt::{self, Display};

/// Property names that zigbee2mqtt suffixes with an endpoint name on
/// multi-endpoint devices (`state_l1`, `brightness_l2`, ...).
///
/// Longer names come first, so `color_temp_l1` is never read as `color`
/// with endpoint `temp_l1`.
pub const ENDPOINT_PREFIXES: &[&str] = &["color_temp", "color_mode", "brightness", "state", "color"];

/// A feature property split into its parts.
///
/// `brightness_l1` has base `brightness` and endpoint `l1`, `color.x` has
/// base `color` and sub-feature `x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyName<'a> {
    pub base: &'a str,
    pub endpoint: Option<&'a str>,
    pub sub: Option<&'a str>,
}

impl<'a> PropertyName<'a> {
    /// Split `property`, treating a suffix as endpoint only when it equals
    /// the `endpoint` declared for the feature.
    #[must_use]
    pub fn parse(property: &'a str, endpoint: Option<&str>) -> Self {
        let (head, sub) = match property.split_once('.') {
            Some((head, sub)) => (head, Some(sub)),
            None => (property, None),
        };
        let (base, endpoint) = split_endpoint(head, endpoint);
        Self {
            base,
            endpoint,
            sub,
        }
    }
}

impl Display for PropertyName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.base)?;
        if let Some(endpoint) = self.endpoint {
            write!(f, "_{endpoint}")?;
        }
        if let Some(sub) = self.sub {
            write!(f, ".{sub}")?;
        }
        Ok(())
    }
}

/// Split a single property segment into base name and endpoint.
///
/// zigbee2mqtt declares the endpoint of a feature next to its property, so
/// only a `_{endpoint}` suffix on one of the [`ENDPOINT_PREFIXES`] names is
/// removed. `color_temp_startup` on a light without endpoints stays as is.
#[must_use]
pub fn split_endpoint<'a>(name: &'a str, endpoint: Option<&str>) -> (&'a str, Option<&'a str>) {
    let Some(endpoint) = endpoint.filter(|ep| !ep.is_empty()) else {
        return (name, None);
    };
    for prefix in ENDPOINT_PREFIXES {
        let Some(rest) = name.strip_prefix(prefix).and_then(|rest| rest.strip_prefix('_')) else {
            continue;
        };
        if rest == endpoint {
            return (&name[..prefix.len()], Some(rest));
        }
    }
    (name, None)
}
