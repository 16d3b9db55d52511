use super::{ModeArgument, read_float, read_mode, read_one, write_mode, write_one};
use crate::client::{Error, KeEnergy};
use crate::controls::{Control, Enumeration, HotWaterTank};
use crate::payload::ReadOptions;
use crate::value::Value;

pub struct HotWaterTankSection<'a> {
    client: &'a KeEnergy,
}

impl<'a> HotWaterTankSection<'a> {
    pub(crate) fn new(client: &'a KeEnergy) -> Self {
        Self { client }
    }

    pub async fn get_temperature(&self, position: u32) -> Result<f64, Error> {
        read_float(self.client, HotWaterTank::Temperature.into(), position).await
    }

    pub async fn get_operating_mode(
        &self,
        position: u32,
        human_readable: bool,
    ) -> Result<Value, Error> {
        read_mode(self.client, HotWaterTank::OperatingMode.into(), position, human_readable).await
    }

    pub async fn set_operating_mode(
        &self,
        mode: impl Into<ModeArgument>,
        position: u32,
    ) -> Result<(), Error> {
        let control = HotWaterTank::OperatingMode.into();
        let enumeration = Enumeration::HotWaterTankOperatingMode;
        write_mode(self.client, control, enumeration, position, mode.into()).await
    }

    /// Attribute of the maximum temperature set point.
    async fn limit(&self, attribute: &'static str, position: u32) -> Result<f64, Error> {
        let control = Control::from(HotWaterTank::MaxTemperature);
        let value = read_one(self.client, control, position, ReadOptions::default()).await?;
        value.numeric_attribute(attribute).ok_or(Error::MissingField(attribute))
    }

    /// Lowest temperature the set points may be configured to.
    pub async fn get_lower_limit_temperature(&self, position: u32) -> Result<f64, Error> {
        self.limit("lowerLimit", position).await
    }

    /// Highest temperature the set points may be configured to.
    pub async fn get_upper_limit_temperature(&self, position: u32) -> Result<f64, Error> {
        self.limit("upperLimit", position).await
    }

    pub async fn get_min_temperature(&self, position: u32) -> Result<f64, Error> {
        read_float(self.client, HotWaterTank::MinTemperature.into(), position).await
    }

    pub async fn set_min_temperature(&self, temperature: f64, position: u32) -> Result<(), Error> {
        let control = HotWaterTank::MinTemperature.into();
        write_one(self.client, control, position, Value::Float(temperature)).await
    }

    pub async fn get_max_temperature(&self, position: u32) -> Result<f64, Error> {
        read_float(self.client, HotWaterTank::MaxTemperature.into(), position).await
    }

    pub async fn set_max_temperature(&self, temperature: f64, position: u32) -> Result<(), Error> {
        let control = HotWaterTank::MaxTemperature.into();
        write_one(self.client, control, position, Value::Float(temperature)).await
    }
}
