use std::time::Duration;
use tracing::{debug, trace};

/// Time allowed for a single request to complete, unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("could not construct the HTTP client")]
    CreateReqwest(#[source] reqwest::Error),
    #[error("request to `{1}` failed")]
    Send(#[source] reqwest::Error, String),
    #[error("could not read the response body")]
    ReadBody(#[source] reqwest::Error),
    #[error("device responded with malformed JSON: {raw}")]
    MalformedJson {
        #[source]
        source: serde_json::Error,
        raw: String,
    },
    #[error("device reported an error: {0}")]
    Device(String),
    #[error("response is not an object or an array: {0}")]
    UnexpectedShape(serde_json::Value),
    #[error("response entries do not have the expected form")]
    DecodeEntries(#[source] serde_json::Error),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
    ReadValues,
    WriteValues,
    DeviceInfo,
    SystemInfo,
}

impl Endpoint {
    pub const fn path(self) -> &'static str {
        match self {
            Self::ReadValues => "/var/readWriteVars",
            Self::WriteValues => "/var/readWriteVars?action=set",
            Self::DeviceInfo => "/deviceControl?action=getDeviceInfo",
            Self::SystemInfo => "/swupdate?action=getSystemInstalled",
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(clap::Parser, Clone)]
#[group(id = "connection::Args")]
pub struct Args {
    /// Host name or address of the controller, optionally with a port.
    #[arg(long)]
    host: String,

    /// Talk to the controller over HTTPS rather than plain HTTP.
    #[arg(long)]
    tls: bool,

    /// Consider a request failed if the controller does not respond within this time.
    #[arg(long, default_value = "10s")]
    timeout: humantime::Duration,
}

impl Args {
    pub fn connection(&self) -> Connection {
        Connection::new(&self.host, self.tls).with_timeout(*self.timeout)
    }
}

/// Transport to the JSON interface of a single controller.
///
/// Unless a client is shared in with [`Connection::with_client`], every request is made with a
/// client of its own that is dropped once the request completes.
#[derive(Clone, Debug)]
pub struct Connection {
    base_url: String,
    client: Option<reqwest::Client>,
    timeout: Duration,
}

impl Connection {
    pub fn new(host: &str, tls: bool) -> Self {
        let scheme = if tls { "https" } else { "http" };
        Self { base_url: format!("{scheme}://{host}"), client: None, timeout: DEFAULT_TIMEOUT }
    }

    /// Use `client` for all requests.
    pub fn with_client(self, client: reqwest::Client) -> Self {
        Self { client: Some(client), ..self }
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        Self { timeout, ..self }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn client(&self) -> Result<reqwest::Client, Error> {
        match &self.client {
            Some(client) => Ok(client.clone()),
            None => reqwest::Client::builder().timeout(self.timeout).build().map_err(Error::CreateReqwest),
        }
    }

    /// POST `payload` as JSON to `endpoint`, returning the objects of the response.
    ///
    /// A response consisting of a single object is treated as an array with that object as its
    /// only element. An object carrying a `developerMessage` is reported as [`Error::Device`].
    pub async fn post<P>(&self, endpoint: Endpoint, payload: Option<&P>) -> Result<Vec<serde_json::Value>, Error>
    where
        P: serde::Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, endpoint.path());
        let client = self.client()?;
        let mut request = client.post(&url).timeout(self.timeout);
        if let Some(payload) = payload {
            request = request.json(payload);
        }
        debug!(message = "sending request", %endpoint);
        let response = request.send().await.map_err(|e| Error::Send(e, url))?;
        let status = response.status();
        let raw = response.text().await.map_err(Error::ReadBody)?;
        trace!(message = "received response", %endpoint, %status, length = raw.len());
        let body = match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(body) => body,
            Err(source) => return Err(Error::MalformedJson { source, raw }),
        };
        match body {
            serde_json::Value::Object(object) => {
                if let Some(message) = object.get("developerMessage") {
                    let message = match message {
                        serde_json::Value::String(message) => message.clone(),
                        other => other.to_string(),
                    };
                    return Err(Error::Device(message));
                }
                Ok(vec![serde_json::Value::Object(object)])
            }
            serde_json::Value::Array(entries) => Ok(entries),
            other => Err(Error::UnexpectedShape(other)),
        }
    }

    /// [`Self::post`], with each entry of the response decoded into `T`.
    pub async fn post_as<T, P>(&self, endpoint: Endpoint, payload: Option<&P>) -> Result<Vec<T>, Error>
    where
        T: serde::de::DeserializeOwned,
        P: serde::Serialize + ?Sized,
    {
        let entries = self.post(endpoint, payload).await?;
        let entries = entries.into_iter().map(serde_json::from_value).collect::<Result<Vec<T>, _>>();
        entries.map_err(Error::DecodeEntries)
    }
}
