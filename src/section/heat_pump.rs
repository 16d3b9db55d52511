use super::{ModeArgument, read_float, read_mode, read_text, write_mode};
use crate::client::{Error, KeEnergy};
use crate::controls::{Enumeration, HeatPump};
use crate::value::Value;

pub struct HeatPumpSection<'a> {
    client: &'a KeEnergy,
}

macro_rules! float_getters {
    ($($(#[$meta: meta])* $getter: ident => $control: ident;)*) => {
        $(
            $(#[$meta])*
            pub async fn $getter(&self, position: u32) -> Result<f64, Error> {
                read_float(self.client, HeatPump::$control.into(), position).await
            }
        )*
    };
}

impl<'a> HeatPumpSection<'a> {
    pub(crate) fn new(client: &'a KeEnergy) -> Self {
        Self { client }
    }

    pub async fn get_name(&self, position: u32) -> Result<String, Error> {
        read_text(self.client, HeatPump::Name.into(), position).await
    }

    /// [`HeatPumpStatus`](crate::controls::HeatPumpStatus) name if `human_readable`, or the
    /// code otherwise.
    pub async fn get_status(&self, position: u32, human_readable: bool) -> Result<Value, Error> {
        read_mode(self.client, HeatPump::Status.into(), position, human_readable).await
    }

    pub async fn set_status(
        &self,
        status: impl Into<ModeArgument>,
        position: u32,
    ) -> Result<(), Error> {
        let control = HeatPump::Status.into();
        write_mode(self.client, control, Enumeration::HeatPumpStatus, position, status.into()).await
    }

    float_getters! {
        /// Circulation pump speed.
        get_circulation_pump => CirculationPump;
        get_inflow_temperature => InflowTemperature;
        get_reflux_temperature => RefluxTemperature;
        get_source_input_temperature => SourceInputTemperature;
        get_source_output_temperature => SourceOutputTemperature;
        get_compressor_input_temperature => CompressorInputTemperature;
        get_compressor_output_temperature => CompressorOutputTemperature;
        /// Compressor utilisation.
        get_compressor => Compressor;
        get_high_pressure => HighPressure;
        get_low_pressure => LowPressure;
    }
}
