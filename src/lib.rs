//! Client for the local JSON interface of KeEnergy heat pump controllers.
//!
//! ```no_run
//! # async fn example() -> Result<(), keenergy::client::Error> {
//! use keenergy::controls::{HeatCircuit, HeatPump};
//! use keenergy::{KeEnergy, ReadOptions};
//!
//! let client = KeEnergy::new("192.168.1.100", false);
//! let temperature = client.heat_circuit().get_temperature(1).await?;
//! let values = client
//!     .read(&[HeatCircuit::DayTemperature.into(), HeatPump::InflowTemperature.into()], None, ReadOptions::default())
//!     .await?;
//! # Ok(()) }
//! ```

pub mod client;
pub mod commands;
pub mod connection;
pub mod controls;
pub mod output;
pub mod payload;
pub mod position;
pub mod section;
pub mod value;

pub use client::KeEnergy;
pub use payload::ReadOptions;
pub use position::{Position, Target};
