fn runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread().enable_all().build()
}

pub mod controls {
    use crate::controls::{Control, Group, Mode, ValueKind};
    use crate::output;
    use crate::payload::dot_path;

    /// Search and output the known controls.
    #[derive(clap::Parser)]
    pub struct Args {
        #[clap(flatten)]
        output: output::Args,
        /// Only list controls whose name or device path contains this text.
        filter: Option<String>,
    }

    #[derive(thiserror::Error, Debug)]
    pub enum Error {
        #[error("could not output the controls")]
        Output(#[from] output::Error),
    }

    #[derive(serde::Serialize)]
    pub struct ControlSchema {
        pub group: Group,
        pub name: &'static str,
        pub path: String,
        pub kind: ValueKind,
        pub mode: Mode,
        pub values: &'static [&'static str],
    }

    impl ControlSchema {
        pub fn all_controls() -> impl Iterator<Item = Self> {
            Control::all().map(|control| {
                let spec = control.spec();
                let multiple = spec.group.is_multiple();
                ControlSchema {
                    group: spec.group,
                    name: control.name(),
                    path: dot_path(control, multiple.then_some(0)),
                    kind: spec.kind,
                    mode: spec.mode,
                    values: spec.enumeration.map(|e| e.names()).unwrap_or_default(),
                }
            })
        }

        pub fn is_match(&self, pattern: &str) -> bool {
            let pattern = pattern.to_lowercase();
            let key = format!("{}.{}", self.group, self.name);
            key.contains(&pattern) || self.path.to_lowercase().contains(&pattern)
        }
    }

    pub fn run(args: Args) -> Result<(), Error> {
        let filter = args.filter;
        let mut output = args.output.to_output()?;
        output.header(&["Group", "Name", "Path", "Type", "Mode", "Values"])?;
        for control in ControlSchema::all_controls() {
            if let Some(pattern) = &filter {
                if !control.is_match(pattern) {
                    continue;
                }
            }
            output.row(
                || {
                    vec![
                        control.group.to_string(),
                        control.name.to_string(),
                        control.path.clone(),
                        control.kind.to_string(),
                        control.mode.to_string(),
                        control.values.join(", "),
                    ]
                },
                || &control,
            )?;
        }
        Ok(output.finish()?)
    }
}

pub mod read {
    use crate::client::{self, KeEnergy};
    use crate::controls::Control;
    use crate::payload::ReadOptions;
    use crate::value::{Attributes, Value};
    use crate::{connection, output};

    /// Read the current values of controls.
    #[derive(clap::Parser)]
    pub struct Args {
        #[clap(flatten)]
        connection: connection::Args,
        #[clap(flatten)]
        output: output::Args,
        /// Controls to read, such as `heat_circuit.day_temperature`. All of them if none.
        controls: Vec<Control>,
        /// 1-based positions of the units to read. All installed units if none.
        #[arg(long, short = 'p', value_parser = clap::value_parser!(u32).range(1..))]
        position: Vec<u32>,
        /// Output the numeric codes of enumerated values instead of their names.
        #[arg(long)]
        raw: bool,
        /// Omit the attributes of each value.
        #[arg(long)]
        no_attributes: bool,
    }

    #[derive(thiserror::Error, Debug)]
    pub enum Error {
        #[error("could not start the async runtime")]
        Runtime(#[source] std::io::Error),
        #[error("could not read the values")]
        Read(#[source] client::Error),
        #[error("could not output the values")]
        Output(#[from] output::Error),
    }

    #[derive(serde::Serialize)]
    struct Record<'a> {
        control: &'a str,
        unit: Option<u32>,
        value: &'a Value,
        #[serde(skip_serializing_if = "Option::is_none")]
        attributes: Option<&'a Attributes>,
    }

    pub fn run(args: Args) -> Result<(), Error> {
        let client = KeEnergy::from_connection(args.connection.connection());
        let controls = if args.controls.is_empty() {
            Control::all().collect()
        } else {
            args.controls
        };
        let target = (!args.position.is_empty()).then(|| args.position.clone().into());
        let options = ReadOptions::default()
            .human_readable(!args.raw)
            .attributes(!args.no_attributes)
            .prefixed_keys(true);
        let runtime = super::runtime().map_err(Error::Runtime)?;
        let response = runtime
            .block_on(client.read(&controls, target, options))
            .map_err(Error::Read)?;

        let mut output = args.output.to_output()?;
        output.header(&["Control", "Unit", "Value", "Attributes"])?;
        for (key, values) in &response {
            let multiple = key.parse::<Control>().is_ok_and(|c| c.group().is_multiple());
            for (i, value) in (0u32..).zip(values) {
                let unit = match args.position.get(i as usize) {
                    _ if !multiple => None,
                    Some(&position) => Some(position),
                    None => Some(i + 1),
                };
                output.row(
                    || {
                        vec![
                            key.clone(),
                            unit.map(|u| u.to_string()).unwrap_or_default(),
                            value.value.to_string(),
                            value
                                .attributes
                                .as_ref()
                                .map(|a| serde_json::Value::Object(a.clone()).to_string())
                                .unwrap_or_default(),
                        ]
                    },
                    || Record {
                        control: key,
                        unit,
                        value: &value.value,
                        attributes: value.attributes.as_ref(),
                    },
                )?;
            }
        }
        Ok(output.finish()?)
    }
}

pub mod write {
    use crate::client::{self, KeEnergy};
    use crate::connection;
    use crate::controls::{Control, UnknownControl};
    use crate::value::Value;

    /// Change the value of a control.
    #[derive(clap::Parser)]
    pub struct Args {
        #[clap(flatten)]
        connection: connection::Args,
        /// The assignment to make, such as `heat_circuit.day_temperature=21.5` or
        /// `hot_water_tank.operating_mode=heat_up`.
        assignment: String,
        /// 1-based position of the unit to change.
        #[arg(long, short = 'p', default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
        position: u32,
    }

    #[derive(thiserror::Error, Debug)]
    pub enum Error {
        #[error("`{0}` is not of the form CONTROL=VALUE")]
        Assignment(String),
        #[error("could not parse the control")]
        Control(#[source] UnknownControl),
        #[error("{0} is read-only")]
        ReadOnly(Control),
        #[error("`{value}` is not a valid value for {control}")]
        Value { control: Control, value: String },
        #[error("could not start the async runtime")]
        Runtime(#[source] std::io::Error),
        #[error("could not write the value")]
        Write(#[source] client::Error),
    }

    fn parse(assignment: &str) -> Result<(Control, Value), Error> {
        let Some((control, value)) = assignment.split_once('=') else {
            return Err(Error::Assignment(assignment.to_string()));
        };
        let control = control.trim().parse::<Control>().map_err(Error::Control)?;
        let spec = control.spec();
        if !spec.is_writable() {
            return Err(Error::ReadOnly(control));
        }
        let parsed = match spec.enumeration {
            Some(enumeration) => enumeration.parse(value).map(Value::Integer),
            None => spec.kind.parse(value.trim()),
        };
        let value = parsed.ok_or_else(|| Error::Value { control, value: value.to_string() })?;
        Ok((control, value))
    }

    pub fn run(args: Args) -> Result<(), Error> {
        let (control, value) = parse(&args.assignment)?;
        let client = KeEnergy::from_connection(args.connection.connection());
        let values = (1..args.position).map(|_| None).chain([Some(value)]);
        let runtime = super::runtime().map_err(Error::Runtime)?;
        runtime.block_on(client.write([(control, values)])).map_err(Error::Write)
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::controls::{HeatCircuit, HotWaterTank};

        #[test]
        fn assignments() {
            let (control, value) = parse("heat_circuit.day_temperature=21.456").unwrap();
            assert_eq!(control, HeatCircuit::DayTemperature.into());
            assert_eq!(value, Value::Float(21.456));
            let (control, value) = parse("hot_water_tank.operating_mode=HEAT_UP").unwrap();
            assert_eq!(control, HotWaterTank::OperatingMode.into());
            assert_eq!(value, Value::Integer(3));
            assert!(matches!(parse("heat_circuit.temperature=1"), Err(Error::ReadOnly(_))));
            assert!(matches!(parse("hot_water_tank.operating_mode=9"), Err(Error::Value { .. })));
            assert!(matches!(parse("heat_circuit.day_temperature"), Err(Error::Assignment(_))));
        }
    }
}

pub mod info {
    use crate::client::{self, KeEnergy};
    use crate::{connection, output};

    /// Show the identification of the controller and its installed software.
    #[derive(clap::Parser)]
    pub struct Args {
        #[clap(flatten)]
        connection: connection::Args,
        #[clap(flatten)]
        output: output::Args,
    }

    #[derive(thiserror::Error, Debug)]
    pub enum Error {
        #[error("could not start the async runtime")]
        Runtime(#[source] std::io::Error),
        #[error("could not query the device")]
        Query(#[source] client::Error),
        #[error("could not output the device information")]
        Output(#[from] output::Error),
    }

    #[derive(serde::Serialize)]
    struct Record<'a> {
        source: &'static str,
        key: &'a str,
        value: &'a serde_json::Value,
    }

    pub fn run(args: Args) -> Result<(), Error> {
        let client = KeEnergy::from_connection(args.connection.connection());
        let runtime = super::runtime().map_err(Error::Runtime)?;
        let (device, system) = runtime
            .block_on(async {
                let device = client.device().get_device_info().await?;
                let system = client.device().get_system_info().await?;
                Ok::<_, client::Error>((device, system))
            })
            .map_err(Error::Query)?;
        let mut output = args.output.to_output()?;
        output.header(&["Source", "Key", "Value"])?;
        for (source, info) in [("device", &device), ("system", &system)] {
            for (key, value) in info {
                let cell = match value {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                output.row(
                    || vec![source.to_string(), key.clone(), cell],
                    || Record { source, key, value },
                )?;
            }
        }
        Ok(output.finish()?)
    }
}
