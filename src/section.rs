//! Typed access to the values of each area of the controller.
//!
//! Getters take the 1-based position of the unit to read. Setters write that unit alone.

mod device;
mod heat_circuit;
mod heat_pump;
mod hot_water_tank;
mod system;

pub use device::DeviceSection;
pub use heat_circuit::HeatCircuitSection;
pub use heat_pump::HeatPumpSection;
pub use hot_water_tank::HotWaterTankSection;
pub use system::SystemSection;

use crate::client::{Error, KeEnergy};
use crate::controls::{
    Control, Enumeration, HeatCircuitOperatingMode, HeatPumpStatus, HotWaterTankOperatingMode,
};
use crate::payload::{self, ReadOptions};
use crate::position::Target;
use crate::value::{ReadValue, Value};

/// An operating mode, given either by its code or by its (case-insensitive) name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModeArgument {
    Code(i64),
    Name(String),
}

impl ModeArgument {
    fn resolve(self, enumeration: Enumeration) -> Result<i64, Error> {
        let code = match &self {
            Self::Code(code) => enumeration.name_of(*code).map(|_| *code),
            Self::Name(name) => enumeration.parse(name),
        };
        code.ok_or_else(|| Error::InvalidMode { input: self.to_string(), enumeration })
    }
}

impl std::fmt::Display for ModeArgument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Code(code) => write!(f, "{code}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

impl From<i64> for ModeArgument {
    fn from(code: i64) -> Self {
        Self::Code(code)
    }
}

impl From<&str> for ModeArgument {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for ModeArgument {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

macro_rules! mode_argument_from {
    ($($enum: ident),*) => {
        $(impl From<$enum> for ModeArgument {
            fn from(mode: $enum) -> Self {
                Self::Code(mode as u8 as i64)
            }
        })*
    };
}

mode_argument_from!(HotWaterTankOperatingMode, HeatPumpStatus, HeatCircuitOperatingMode);

/// Read `control` of the unit at `position`.
async fn read_one(
    client: &KeEnergy,
    control: Control,
    position: u32,
    options: ReadOptions,
) -> Result<ReadValue, Error> {
    let options = options.prefixed_keys(false);
    let mut response =
        client.read_values(&[control], &Target::unit(position), None, options).await?;
    let value = response.shift_remove(control.name()).and_then(|values| values.into_iter().next());
    value.ok_or(Error::MissingValue(control))
}

async fn read_float(client: &KeEnergy, control: Control, position: u32) -> Result<f64, Error> {
    let options = ReadOptions::default().attributes(false);
    let value = read_one(client, control, position, options).await?.value;
    value.as_f64().ok_or(Error::UnexpectedValue { control, value })
}

async fn read_integer(client: &KeEnergy, control: Control, position: u32) -> Result<i64, Error> {
    let options = ReadOptions::default().attributes(false).human_readable(false);
    let value = read_one(client, control, position, options).await?.value;
    value.as_i64().ok_or(Error::UnexpectedValue { control, value })
}

async fn read_text(client: &KeEnergy, control: Control, position: u32) -> Result<String, Error> {
    let options = ReadOptions::default().attributes(false);
    match read_one(client, control, position, options).await?.value {
        Value::Text(text) => Ok(text),
        value => Err(Error::UnexpectedValue { control, value }),
    }
}

/// The symbolic name of the mode if `human_readable`, the code otherwise.
async fn read_mode(
    client: &KeEnergy,
    control: Control,
    position: u32,
    human_readable: bool,
) -> Result<Value, Error> {
    let options = ReadOptions::default().attributes(false).human_readable(human_readable);
    Ok(read_one(client, control, position, options).await?.value)
}

/// Write `value` to `control` of the unit at `position`, leaving other units alone.
async fn write_one(
    client: &KeEnergy,
    control: Control,
    position: u32,
    value: Value,
) -> Result<(), Error> {
    if position == 0 {
        return Err(payload::Error::InvalidIndex(control).into());
    }
    let values = (1..position).map(|_| None).chain(std::iter::once(Some(value)));
    client.write([(control, values)]).await
}

async fn write_mode(
    client: &KeEnergy,
    control: Control,
    enumeration: Enumeration,
    position: u32,
    mode: ModeArgument,
) -> Result<(), Error> {
    let code = mode.resolve(enumeration)?;
    write_one(client, control, position, Value::Integer(code)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_modes() {
        let e = Enumeration::HotWaterTankOperatingMode;
        assert_eq!(ModeArgument::from("HEAT_UP").resolve(e).unwrap(), 3);
        assert_eq!(ModeArgument::from("auto").resolve(e).unwrap(), 1);
        assert_eq!(ModeArgument::from(2_i64).resolve(e).unwrap(), 2);
        assert_eq!(ModeArgument::from(HotWaterTankOperatingMode::Off).resolve(e).unwrap(), 0);
        let error = ModeArgument::from("INVALID").resolve(e).unwrap_err();
        assert!(matches!(error, Error::InvalidMode { .. }));
        assert!(error.to_string().contains("heat_up"));
        assert!(ModeArgument::from(12_i64).resolve(e).is_err());
    }
}
