use crate::client::{Error, KeEnergy};
use crate::connection::{self, Endpoint};

pub type Info = serde_json::Map<String, serde_json::Value>;

/// Identification of the controller hardware and its software.
pub struct DeviceSection<'a> {
    client: &'a KeEnergy,
}

impl<'a> DeviceSection<'a> {
    pub(crate) fn new(client: &'a KeEnergy) -> Self {
        Self { client }
    }

    async fn info(&self, endpoint: Endpoint) -> Result<Info, Error> {
        let response = self.client.connection().post::<()>(endpoint, None).await?;
        let mut info = match response.into_iter().next() {
            Some(serde_json::Value::Object(info)) => info,
            Some(other) => return Err(connection::Error::UnexpectedShape(other).into()),
            None => return Err(Error::MissingField("ret")),
        };
        info.remove("ret");
        Ok(info)
    }

    async fn number(&self, field: &'static str) -> Result<i64, Error> {
        let mut info = self.get_device_info().await?;
        let value = info.remove(field).ok_or(Error::MissingField(field))?;
        let number = match &value {
            serde_json::Value::Number(n) => n.as_i64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        number.ok_or(Error::InvalidField { field, value })
    }

    /// The device information, without the `ret` status.
    pub async fn get_device_info(&self) -> Result<Info, Error> {
        self.info(Endpoint::DeviceInfo).await
    }

    pub async fn get_name(&self) -> Result<String, Error> {
        let mut info = self.get_device_info().await?;
        match info.remove("name") {
            Some(serde_json::Value::String(name)) => Ok(name),
            Some(other) => Ok(other.to_string()),
            None => Err(Error::MissingField("name")),
        }
    }

    pub async fn get_serial_number(&self) -> Result<i64, Error> {
        self.number("serNo").await
    }

    pub async fn get_revision_number(&self) -> Result<i64, Error> {
        self.number("revNo").await
    }

    pub async fn get_variant_number(&self) -> Result<i64, Error> {
        self.number("variantNo").await
    }

    /// The installed software, without the `ret` status.
    pub async fn get_system_info(&self) -> Result<Info, Error> {
        self.info(Endpoint::SystemInfo).await
    }
}
