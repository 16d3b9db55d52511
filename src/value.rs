use std::collections::BTreeMap;

use indexmap::IndexMap;

use crate::controls::Group;

/// Device-supplied metadata accompanying a value, such as `lowerLimit` and `upperLimit`.
pub type Attributes = serde_json::Map<String, serde_json::Value>;

/// Attribute keys that are never passed through to callers.
pub const STRIPPED_ATTRIBUTES: [&str; 4] = ["longText", "formatId", "dynLowerLimit", "dynUpperLimit"];

/// Decoded values keyed by [`Control::key`](crate::controls::Control::key) in the order the
/// controls were requested, one entry per addressed unit in ascending index order.
pub type ValueResponse = IndexMap<String, Vec<ReadValue>>;

/// [`ValueResponse`] bucketed by group, with the group prefix removed from the keys.
pub type GroupedResponse = BTreeMap<Group, ValueResponse>;

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum Value {
    Float(f64),
    Integer(i64),
    Text(String),
}

impl Value {
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Float(v) => Some(v),
            Value::Integer(v) => Some(v as f64),
            Value::Text(_) => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Integer(v) => Some(v),
            Value::Float(_) | Value::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(v) => Some(v),
            Value::Float(_) | Value::Integer(_) => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Float(v) => write!(f, "{v}"),
            Value::Integer(v) => write!(f, "{v}"),
            Value::Text(v) => f.write_str(v),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// A single decoded value of a control at one unit.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ReadValue {
    pub value: Value,
    /// Only present when attributes were requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Attributes>,
}

impl ReadValue {
    pub fn attribute(&self, key: &str) -> Option<&serde_json::Value> {
        self.attributes.as_ref()?.get(key)
    }

    /// Numeric attribute, which the device may send either as a number or as text.
    pub fn numeric_attribute(&self, key: &str) -> Option<f64> {
        match self.attribute(key)? {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// Round to two decimals, ties to even on the exact binary value.
pub fn round2(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}

pub fn clean_attributes(mut attributes: Attributes) -> Attributes {
    for key in STRIPPED_ATTRIBUTES {
        attributes.remove(key);
    }
    attributes
}

/// Split a response with prefixed keys into per-group maps.
///
/// Every group is present in the result, even if nothing was read for it.
pub fn group_response(response: ValueResponse) -> GroupedResponse {
    let mut grouped: GroupedResponse = <Group as strum::VariantArray>::VARIANTS
        .iter()
        .map(|&group| (group, ValueResponse::new()))
        .collect();
    for (key, values) in response {
        let found = <Group as strum::VariantArray>::VARIANTS.iter().find_map(|&group| {
            let rest = key.strip_prefix(group.key())?.strip_prefix('_')?;
            Some((group, rest.to_string()))
        });
        let Some((group, name)) = found else {
            tracing::debug!(key, "response key does not belong to any group");
            continue;
        };
        grouped.entry(group).or_default().insert(name, values);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(v: impl Into<Value>) -> Vec<ReadValue> {
        vec![ReadValue { value: v.into(), attributes: None }]
    }

    #[test]
    fn rounding() {
        assert_eq!(round2(10.808357), 10.81);
        assert_eq!(round2(24.200001), 24.2);
        assert_eq!(round2(-0.004), -0.0);
        assert_eq!(round2(21.0), 21.0);
    }

    #[test]
    fn rounding_halfway_values() {
        assert_eq!(round2(2.675), 2.67);
        assert_eq!(round2(10.125), 10.12);
        assert_eq!(round2(1.115), 1.11);
        assert_eq!(round2(0.125), 0.12);
        assert_eq!(round2(-0.125), -0.12);
    }

    #[test]
    fn strips_denied_attributes() {
        let attributes = serde_json::json!({
            "dynLowerLimit": 1,
            "dynUpperLimit": 1,
            "formatId": "fmt2p0",
            "longText": "Qty heat pumps",
            "lowerLimit": "0",
            "upperLimit": "4",
        });
        let serde_json::Value::Object(attributes) = attributes else { unreachable!() };
        let cleaned = clean_attributes(attributes);
        assert_eq!(cleaned.len(), 2);
        assert_eq!(cleaned["lowerLimit"], "0");
        assert_eq!(cleaned["upperLimit"], "4");
    }

    #[test]
    fn numeric_attributes() {
        let serde_json::Value::Object(attributes) =
            serde_json::json!({"lowerLimit": "20", "upperLimit": 52, "unitId": "Temp"})
        else {
            unreachable!()
        };
        let value = ReadValue { value: Value::Float(47.0), attributes: Some(attributes) };
        assert_eq!(value.numeric_attribute("lowerLimit"), Some(20.0));
        assert_eq!(value.numeric_attribute("upperLimit"), Some(52.0));
        assert_eq!(value.numeric_attribute("unitId"), None);
        assert_eq!(value.numeric_attribute("missing"), None);
    }

    #[test]
    fn groups_prefixed_keys() {
        let mut response = ValueResponse::new();
        response.insert("system_heat_pump_numbers".into(), value(2));
        response.insert("outdoor_temperature".into(), value(10.81));
        response.insert("heat_pump_inflow_temperature".into(), value(24.2));
        response.insert("heat_circuit_name".into(), value("HC1"));
        response.insert("unrelated".into(), value(1));

        let grouped = group_response(response);
        assert_eq!(grouped.len(), 5);
        assert_eq!(grouped[&Group::System]["heat_pump_numbers"], value(2));
        assert_eq!(grouped[&Group::Outdoor]["temperature"], value(10.81));
        assert_eq!(grouped[&Group::HeatPump]["inflow_temperature"], value(24.2));
        assert_eq!(grouped[&Group::HeatCircuit]["name"], value("HC1"));
        assert!(grouped[&Group::HotWaterTank].is_empty());
    }

    #[test]
    fn grouping_keeps_request_order() {
        let mut response = ValueResponse::new();
        response.insert("heat_circuit_temperature".into(), value(10.81));
        response.insert("heat_circuit_day_temperature".into(), value(21.0));
        response.insert("heat_circuit_name".into(), value("HC1"));
        let grouped = group_response(response);
        let names: Vec<_> = grouped[&Group::HeatCircuit].keys().map(String::as_str).collect();
        assert_eq!(names, ["temperature", "day_temperature", "name"]);
    }

    #[test]
    fn serializes_untagged() {
        let value = ReadValue { value: Value::Text("heat_up".into()), attributes: None };
        assert_eq!(serde_json::to_string(&value).unwrap(), r#"{"value":"heat_up"}"#);
        assert_eq!(serde_json::to_string(&Value::Float(10.81)).unwrap(), "10.81");
    }
}
