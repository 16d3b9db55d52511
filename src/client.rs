use std::time::Duration;

use crate::connection::{self, Connection, Endpoint};
use crate::controls::{Control, Enumeration, Group};
use crate::payload::{self, ReadOptions, ReadPlan, ResponseEntry, write_payload};
use crate::position::Target;
use crate::section::{
    DeviceSection, HeatCircuitSection, HeatPumpSection, HotWaterTankSection, SystemSection,
};
use crate::value::{GroupedResponse, Value, ValueResponse, group_response};
use tracing::debug;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Connection(#[from] connection::Error),
    #[error(transparent)]
    Payload(#[from] payload::Error),
    #[error("invalid operating mode `{input}`, expected one of: {}", .enumeration.names().join(", "))]
    InvalidMode { input: String, enumeration: Enumeration },
    #[error("device did not return a value for {0}")]
    MissingValue(Control),
    #[error("{control} has an unexpected value {value}")]
    UnexpectedValue { control: Control, value: Value },
    #[error("device did not report `{0}`")]
    MissingField(&'static str),
    #[error("device reported `{field}` as {value}, which is not a number")]
    InvalidField { field: &'static str, value: serde_json::Value },
}

/// Client of a single KeEnergy controller.
///
/// Every operation results in one request to the controller, with the exception of reads that
/// have to find out how many units are installed first.
#[derive(Clone, Debug)]
pub struct KeEnergy {
    connection: Connection,
}

impl KeEnergy {
    pub fn new(host: &str, tls: bool) -> Self {
        Self::from_connection(Connection::new(host, tls))
    }

    pub fn from_connection(connection: Connection) -> Self {
        Self { connection }
    }

    /// Share `client` between all requests made by this `KeEnergy`.
    pub fn with_client(self, client: reqwest::Client) -> Self {
        Self { connection: self.connection.with_client(client) }
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        Self { connection: self.connection.with_timeout(timeout) }
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    pub fn device(&self) -> DeviceSection<'_> {
        DeviceSection::new(self)
    }

    pub fn system(&self) -> SystemSection<'_> {
        SystemSection::new(self)
    }

    pub fn hot_water_tank(&self) -> HotWaterTankSection<'_> {
        HotWaterTankSection::new(self)
    }

    pub fn heat_pump(&self) -> HeatPumpSection<'_> {
        HeatPumpSection::new(self)
    }

    pub fn heat_circuit(&self) -> HeatCircuitSection<'_> {
        HeatCircuitSection::new(self)
    }

    /// Read `controls` in a single request.
    ///
    /// Without a `target` every installed unit is read, which takes an additional request to
    /// count the units beforehand.
    pub async fn read(
        &self,
        controls: &[Control],
        target: Option<Target>,
        options: ReadOptions,
    ) -> Result<ValueResponse, Error> {
        let target = match target {
            Some(target) => target,
            None => Target::Counts(self.system().get_positions().await?),
        };
        self.read_values(controls, &target, None, options).await
    }

    /// [`Self::read`], with the values bucketed by group.
    pub async fn read_data(
        &self,
        controls: &[Control],
        target: Option<Target>,
        options: ReadOptions,
    ) -> Result<GroupedResponse, Error> {
        let response = self.read(controls, target, options.prefixed_keys(true)).await?;
        Ok(group_response(response))
    }

    /// Write values in a single request.
    ///
    /// Every control comes with one optional value per unit, starting at the first one. Units
    /// with a `None` value are left as they are and read-only controls are ignored.
    pub async fn write<I, V>(&self, request: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = (Control, V)>,
        V: IntoIterator<Item = Option<Value>>,
    {
        let payload = write_payload(request);
        if payload.is_empty() {
            debug!("nothing to write");
            return Ok(());
        }
        debug!(message = "writing values", count = payload.len());
        self.connection.post(Endpoint::WriteValues, Some(&payload)).await?;
        Ok(())
    }

    pub(crate) async fn read_values(
        &self,
        controls: &[Control],
        target: &Target,
        filter: Option<&[Group]>,
        options: ReadOptions,
    ) -> Result<ValueResponse, Error> {
        let plan = ReadPlan::new(controls, target, filter)?;
        if plan.is_empty() {
            debug!("nothing to read");
            return Ok(ValueResponse::new());
        }
        debug!(message = "reading values", count = plan.len(), ?target);
        let payload = plan.payload(options.attributes);
        let response = self
            .connection
            .post_as::<ResponseEntry, _>(Endpoint::ReadValues, Some(&payload))
            .await?;
        Ok(plan.decode(response, options)?)
    }
}
