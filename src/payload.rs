//! Construction of the batched request bodies and decoding of the matching responses.
//!
//! The device answers a batch with a flat array in request order and there is nothing else to
//! correlate entries by. [`ReadPlan`] remembers which control and unit every requested entry
//! stands for, so that the response can be walked in lock-step with it.

use crate::controls::{Control, Group, ValueKind};
use crate::position::Target;
use crate::value::{Attributes, ReadValue, Value, ValueResponse, clean_attributes};
use tracing::{trace, warn};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("device returned {returned} values for a request of {requested}")]
    ResponseLength { requested: usize, returned: usize },
    #[error("value {value} of `{name}` is not a valid {kind}")]
    ParseValue { name: String, value: serde_json::Value, kind: ValueKind },
    #[error("value {value} of `{name}` has no symbolic name (attributes: {attributes:?})")]
    Conversion { name: String, value: Value, attributes: Option<Attributes> },
    #[error("positions start at 1, but 0 was requested for {0}")]
    InvalidIndex(Control),
}

/// A single entry of a read request body.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct ReadEntry {
    pub name: String,
    /// `"1"` when the device should include the attributes of the value.
    pub attr: &'static str,
}

/// A single entry of a write request body.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct WriteEntry {
    pub name: String,
    pub value: String,
}

/// A single entry of a read response body.
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct ResponseEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub value: serde_json::Value,
    #[serde(default)]
    pub attributes: Option<Attributes>,
}

/// How decoded values are presented.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReadOptions {
    pub human_readable: bool,
    pub attributes: bool,
    pub prefixed_keys: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self { human_readable: true, attributes: true, prefixed_keys: true }
    }
}

impl ReadOptions {
    /// Replace codes of enumerated controls with their symbolic names.
    pub fn human_readable(self, human_readable: bool) -> Self {
        Self { human_readable, ..self }
    }

    /// Request and keep the attributes of each value.
    pub fn attributes(self, attributes: bool) -> Self {
        Self { attributes, ..self }
    }

    /// Key the result by `group_name` rather than by `name` alone.
    pub fn prefixed_keys(self, prefixed_keys: bool) -> Self {
        Self { prefixed_keys, ..self }
    }
}

/// The device path of `control` at the 0-based `index`.
pub fn dot_path(control: Control, index: Option<u32>) -> String {
    let spec = control.spec();
    match index {
        Some(index) => format!("{}[{index}].{}", spec.group.prefix(), spec.suffix),
        None => format!("{}.{}", spec.group.prefix(), spec.suffix),
    }
}

/// 0-based indices at which `control` is addressed by `target`.
fn indices(control: Control, target: &Target) -> Result<Vec<Option<u32>>, Error> {
    let group = control.group();
    if !group.is_multiple() {
        return Ok(vec![None]);
    }
    match target {
        Target::Counts(position) => match position.count(group) {
            Some(count) if count > 0 => Ok((0..count).map(Some).collect()),
            _ => Ok(vec![None]),
        },
        Target::Units(units) => units
            .iter()
            .map(|unit| match *unit {
                None => Ok(None),
                Some(0) => Err(Error::InvalidIndex(control)),
                Some(position) => Ok(Some(position - 1)),
            })
            .collect(),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct PlannedRead {
    control: Control,
    name: String,
}

/// The ordered list of values a batched read asks for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReadPlan {
    entries: Vec<PlannedRead>,
}

impl ReadPlan {
    /// Plan a read of `controls` in the order given, each at every unit `target` addresses.
    ///
    /// Controls of groups not in `filter` are left out, if a filter is given.
    pub fn new(controls: &[Control], target: &Target, filter: Option<&[Group]>) -> Result<Self, Error> {
        let mut entries = Vec::new();
        for &control in controls {
            if let Some(filter) = filter {
                if !filter.contains(&control.group()) {
                    trace!(message = "control filtered out", %control);
                    continue;
                }
            }
            for index in indices(control, target)? {
                entries.push(PlannedRead { control, name: dot_path(control, index) });
            }
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dot-paths in request order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn payload(&self, attributes: bool) -> Vec<ReadEntry> {
        let attr = if attributes { "1" } else { "0" };
        self.entries.iter().map(|e| ReadEntry { name: e.name.clone(), attr }).collect()
    }

    /// Decode a response to the payload of this plan.
    pub fn decode(&self, response: Vec<ResponseEntry>, options: ReadOptions) -> Result<ValueResponse, Error> {
        if response.len() != self.entries.len() {
            return Err(Error::ResponseLength {
                requested: self.entries.len(),
                returned: response.len(),
            });
        }
        let mut result = ValueResponse::new();
        for (planned, entry) in self.entries.iter().zip(response) {
            if let Some(name) = entry.name.as_deref() {
                if name != planned.name {
                    warn!(
                        message = "response entry name does not match the request",
                        requested = %planned.name,
                        returned = name,
                    );
                }
            }
            let value = decode_value(planned, entry, options)?;
            result.entry(planned.control.key(options.prefixed_keys)).or_default().push(value);
        }
        Ok(result)
    }
}

fn decode_value(planned: &PlannedRead, entry: ResponseEntry, options: ReadOptions) -> Result<ReadValue, Error> {
    let spec = planned.control.spec();
    let parse_error = |value: serde_json::Value| Error::ParseValue {
        name: planned.name.clone(),
        value,
        kind: spec.kind,
    };
    let coerced = match &entry.value {
        serde_json::Value::String(raw) => spec.kind.coerce(raw),
        serde_json::Value::Number(raw) => spec.kind.coerce(&raw.to_string()),
        _ => None,
    };
    let Some(mut value) = coerced else {
        return Err(parse_error(entry.value));
    };
    if let (true, Some(enumeration)) = (options.human_readable, spec.enumeration) {
        let Some(name) = enumeration.render(&value) else {
            return Err(Error::Conversion {
                name: planned.name.clone(),
                value,
                attributes: entry.attributes,
            });
        };
        value = Value::Text(name.to_string());
    }
    let attributes = options.attributes.then(|| clean_attributes(entry.attributes.unwrap_or_default()));
    Ok(ReadValue { value, attributes })
}

/// Build a write request body.
///
/// Each control comes with one optional value per unit, starting at the first. `None` leaves
/// the unit untouched. Controls that can't be written are skipped.
pub fn write_payload<I, V>(request: I) -> Vec<WriteEntry>
where
    I: IntoIterator<Item = (Control, V)>,
    V: IntoIterator<Item = Option<Value>>,
{
    let mut payload = Vec::new();
    for (control, values) in request {
        if !control.spec().is_writable() {
            trace!(message = "skipping read-only control", %control);
            continue;
        }
        let multiple = control.group().is_multiple();
        for (index, value) in (0u32..).zip(values) {
            let Some(value) = value else { continue };
            payload.push(WriteEntry {
                name: dot_path(control, multiple.then_some(index)),
                value: value.to_string(),
            });
        }
    }
    payload
}
