use super::{ModeArgument, read_float, read_mode, read_text, write_mode, write_one};
use crate::client::{Error, KeEnergy};
use crate::controls::{Enumeration, HeatCircuit};
use crate::value::Value;

pub struct HeatCircuitSection<'a> {
    client: &'a KeEnergy,
}

impl<'a> HeatCircuitSection<'a> {
    pub(crate) fn new(client: &'a KeEnergy) -> Self {
        Self { client }
    }

    async fn set(&self, control: HeatCircuit, value: f64, position: u32) -> Result<(), Error> {
        write_one(self.client, control.into(), position, Value::Float(value)).await
    }

    pub async fn get_name(&self, position: u32) -> Result<String, Error> {
        read_text(self.client, HeatCircuit::Name.into(), position).await
    }

    /// Current flow temperature target.
    pub async fn get_temperature(&self, position: u32) -> Result<f64, Error> {
        read_float(self.client, HeatCircuit::Temperature.into(), position).await
    }

    pub async fn get_day_temperature(&self, position: u32) -> Result<f64, Error> {
        read_float(self.client, HeatCircuit::DayTemperature.into(), position).await
    }

    pub async fn set_day_temperature(&self, temperature: f64, position: u32) -> Result<(), Error> {
        self.set(HeatCircuit::DayTemperature, temperature, position).await
    }

    pub async fn get_day_temperature_threshold(&self, position: u32) -> Result<f64, Error> {
        read_float(self.client, HeatCircuit::DayTemperatureThreshold.into(), position).await
    }

    pub async fn get_night_temperature(&self, position: u32) -> Result<f64, Error> {
        read_float(self.client, HeatCircuit::NightTemperature.into(), position).await
    }

    pub async fn set_night_temperature(&self, temperature: f64, position: u32) -> Result<(), Error> {
        self.set(HeatCircuit::NightTemperature, temperature, position).await
    }

    pub async fn get_night_temperature_threshold(&self, position: u32) -> Result<f64, Error> {
        read_float(self.client, HeatCircuit::NightTemperatureThreshold.into(), position).await
    }

    pub async fn get_holiday_temperature(&self, position: u32) -> Result<f64, Error> {
        read_float(self.client, HeatCircuit::HolidayTemperature.into(), position).await
    }

    /// Room temperature correction.
    pub async fn get_offset_temperature(&self, position: u32) -> Result<f64, Error> {
        read_float(self.client, HeatCircuit::OffsetTemperature.into(), position).await
    }

    pub async fn set_offset_temperature(&self, offset: f64, position: u32) -> Result<(), Error> {
        self.set(HeatCircuit::OffsetTemperature, offset, position).await
    }

    pub async fn get_operating_mode(
        &self,
        position: u32,
        human_readable: bool,
    ) -> Result<Value, Error> {
        read_mode(self.client, HeatCircuit::OperatingMode.into(), position, human_readable).await
    }

    pub async fn set_operating_mode(
        &self,
        mode: impl Into<ModeArgument>,
        position: u32,
    ) -> Result<(), Error> {
        let control = HeatCircuit::OperatingMode.into();
        let enumeration = Enumeration::HeatCircuitOperatingMode;
        write_mode(self.client, control, enumeration, position, mode.into()).await
    }
}
