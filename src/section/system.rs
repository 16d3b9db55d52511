use super::{read_float, read_integer};
use crate::client::{Error, KeEnergy};
use crate::controls::{Control, Group, Outdoor, System};
use crate::payload::ReadOptions;
use crate::position::{Position, Target};
use crate::value::ValueResponse;

/// Installation-wide options and the outdoor sensor.
pub struct SystemSection<'a> {
    client: &'a KeEnergy,
}

impl<'a> SystemSection<'a> {
    pub(crate) fn new(client: &'a KeEnergy) -> Self {
        Self { client }
    }

    /// Count the installed heat pumps, heating circuits and hot water tanks.
    pub async fn get_positions(&self) -> Result<Position, Error> {
        let controls: [Control; 3] = [
            System::HeatPumpNumbers.into(),
            System::HeatCircuitNumbers.into(),
            System::HotWaterTankNumbers.into(),
        ];
        let options = ReadOptions::default().prefixed_keys(false);
        let mut response = self.read_values(&controls, options).await?;
        let mut count = |control: System| -> Result<u32, Error> {
            let control = Control::from(control);
            let value = response
                .shift_remove(control.name())
                .and_then(|values| values.into_iter().next())
                .ok_or(Error::MissingValue(control))?
                .value;
            match value.as_i64().map(u32::try_from) {
                Some(Ok(count)) => Ok(count),
                _ => Err(Error::UnexpectedValue { control, value }),
            }
        };
        let position = Position {
            heat_pump: count(System::HeatPumpNumbers)?,
            heat_circuit: count(System::HeatCircuitNumbers)?,
            hot_water_tank: count(System::HotWaterTankNumbers)?,
        };
        tracing::debug!(message = "found units", ?position);
        Ok(position)
    }

    pub async fn get_number_of_hot_water_tanks(&self) -> Result<i64, Error> {
        read_integer(self.client, System::HotWaterTankNumbers.into(), 1).await
    }

    pub async fn get_number_of_heat_pumps(&self) -> Result<i64, Error> {
        read_integer(self.client, System::HeatPumpNumbers.into(), 1).await
    }

    pub async fn get_number_of_heating_circuits(&self) -> Result<i64, Error> {
        read_integer(self.client, System::HeatCircuitNumbers.into(), 1).await
    }

    pub async fn get_outdoor_temperature(&self) -> Result<f64, Error> {
        read_float(self.client, Outdoor::Temperature.into(), 1).await
    }

    /// Read the system options among `controls` in one request, keyed by their names alone.
    ///
    /// Controls of other groups are skipped.
    pub async fn read_values(
        &self,
        controls: &[Control],
        options: ReadOptions,
    ) -> Result<ValueResponse, Error> {
        let options = options.prefixed_keys(false);
        let filter = Some(&[Group::System][..]);
        self.client.read_values(controls, &Target::unindexed(), filter, options).await
    }
}
