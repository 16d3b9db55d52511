use crate::value::Value;

/// A device subsystem sharing a dot-path prefix.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    strum::IntoStaticStr,
    strum::VariantArray,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Group {
    System,
    Outdoor,
    HotWaterTank,
    HeatPump,
    HeatCircuit,
}

impl Group {
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::System => "APPL.CtrlAppl.sParam.options",
            Self::Outdoor => "APPL.CtrlAppl.sParam.outdoorTemp",
            Self::HotWaterTank => "APPL.CtrlAppl.sParam.hotWaterTank",
            Self::HeatPump => "APPL.CtrlAppl.sParam.heatpump",
            Self::HeatCircuit => "APPL.CtrlAppl.sParam.heatCircuit",
        }
    }

    /// Whether a device may have more than one unit of this kind installed.
    ///
    /// Controls of groups that aren't multiple are always addressed without an index.
    pub const fn is_multiple(self) -> bool {
        matches!(self, Self::HotWaterTank | Self::HeatPump | Self::HeatCircuit)
    }

    pub fn key(self) -> &'static str {
        self.into()
    }
}

impl std::fmt::Display for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Float,
    Integer,
    Text,
}

impl ValueKind {
    /// Convert the textual value transmitted by the device.
    ///
    /// Floats are rounded to two decimal places.
    pub fn coerce(self, raw: &str) -> Option<Value> {
        Some(match self.parse(raw)? {
            Value::Float(v) => Value::Float(crate::value::round2(v)),
            value => value,
        })
    }

    /// Parse `raw` as this kind without rounding.
    pub fn parse(self, raw: &str) -> Option<Value> {
        Some(match self {
            Self::Float => Value::Float(raw.trim().parse().ok()?),
            Self::Integer => Value::Integer(raw.trim().parse().ok()?),
            Self::Text => Value::Text(raw.to_string()),
        })
    }
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Float => "float",
            Self::Integer => "integer",
            Self::Text => "text",
        })
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(transparent)]
pub struct Mode(u8);

impl serde::Serialize for Mode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(if self.0 & Self::R.0 == 0 { "-" } else { "R" })?;
        f.write_str(if self.0 & Self::W.0 == 0 { "-" } else { "W" })?;
        Ok(())
    }
}

impl Mode {
    pub const R: Self = Self(1 << 0);
    pub const W: Self = Self(1 << 1);
    pub const RW: Self = Self(Self::R.0 | Self::W.0);
    const R_: Self = Self::R;

    pub const fn is_writable(self) -> bool {
        self.0 & Self::W.0 != 0
    }
}

/// Static description of a single control point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ControlSpec {
    pub group: Group,
    /// Dot-path relative to the group prefix (and the unit index, if any.)
    pub suffix: &'static str,
    pub kind: ValueKind,
    pub mode: Mode,
    pub enumeration: Option<Enumeration>,
}

impl ControlSpec {
    pub const fn is_writable(&self) -> bool {
        self.mode.is_writable()
    }
}

macro_rules! for_each_control {
    ($m: ident) => {
        $m! {
            System {
                HotWaterTankNumbers: "systemNumberOfHotWaterTanks", Integer, R_;
                HeatPumpNumbers: "systemNumberOfHeatPumps", Integer, R_;
                HeatCircuitNumbers: "systemNumberOfHeatingCircuits", Integer, R_;
            }
            Outdoor {
                Temperature: "values.actValue", Float, R_;
            }
            HotWaterTank {
                Temperature: "topTemp.values.actValue", Float, R_;
                OperatingMode: "param.operatingMode", Integer, RW, enum = HotWaterTankOperatingMode;
                MinTemperature: "param.reducedSetTempMax.value", Float, RW;
                MaxTemperature: "param.normalSetTempMax.value", Float, RW;
            }
            HeatPump {
                Name: "param.name", Text, R_;
                Status: "values.heatpumpState", Integer, RW, enum = HeatPumpStatus;
                CirculationPump: "CircPump.values.setValueScaled", Float, R_;
                InflowTemperature: "TempHeatFlow.values.actValue", Float, R_;
                RefluxTemperature: "TempHeatReflux.values.actValue", Float, R_;
                SourceInputTemperature: "TempSourceIn.values.actValue", Float, R_;
                SourceOutputTemperature: "TempSourceOut.values.actValue", Float, R_;
                CompressorInputTemperature: "TempCompressorIn.values.actValue", Float, R_;
                CompressorOutputTemperature: "TempCompressorOut.values.actValue", Float, R_;
                Compressor: "Compressor.values.setValueScaled", Float, R_;
                HighPressure: "HighPressure.values.actValue", Float, R_;
                LowPressure: "LowPressure.values.actValue", Float, R_;
            }
            HeatCircuit {
                Name: "param.name", Text, R_;
                Temperature: "values.setValue", Float, R_;
                DayTemperature: "param.normalSetTemp", Float, RW;
                DayTemperatureThreshold: "param.thresholdDayTemp.value", Float, R_;
                NightTemperature: "param.reducedSetTemp", Float, RW;
                NightTemperatureThreshold: "param.thresholdNightTemp.value", Float, R_;
                HolidayTemperature: "param.holidaySetTemp", Float, R_;
                OffsetTemperature: "param.offsetRoomTemp", Float, RW;
                OperatingMode: "param.operatingMode", Integer, RW, enum = HeatCircuitOperatingMode;
            }
        }
    };
}

macro_rules! optional {
    () => {
        None
    };
    ($($lit: tt)+) => {
        Some($($lit)*)
    };
}

macro_rules! make_controls {
    ($($group: ident {
        $($variant: ident: $suffix: literal, $kind: ident, $mode: ident $(, enum = $enumeration: ident)?;)+
    })+) => {
        $(
            #[derive(
                Clone,
                Copy,
                Debug,
                PartialEq,
                Eq,
                PartialOrd,
                Ord,
                Hash,
                strum::IntoStaticStr,
                strum::VariantArray,
                strum::EnumString,
            )]
            #[strum(serialize_all = "snake_case", ascii_case_insensitive)]
            pub enum $group {
                $($variant),+
            }

            impl $group {
                pub const fn spec(self) -> ControlSpec {
                    match self {
                        $(Self::$variant => ControlSpec {
                            group: Group::$group,
                            suffix: $suffix,
                            kind: ValueKind::$kind,
                            mode: Mode::$mode,
                            enumeration: optional!($(Enumeration::$enumeration)?),
                        },)+
                    }
                }
            }

            impl From<$group> for Control {
                fn from(control: $group) -> Self {
                    Control::$group(control)
                }
            }
        )+

        /// Any control point known to this crate.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum Control {
            $($group($group)),+
        }

        impl Control {
            pub const fn spec(self) -> ControlSpec {
                match self {
                    $(Self::$group(c) => c.spec()),+
                }
            }

            /// Name of the control within its group, e.g. `day_temperature`.
            pub fn name(self) -> &'static str {
                match self {
                    $(Self::$group(c) => c.into()),+
                }
            }

            pub fn from_parts(group: Group, name: &str) -> Option<Self> {
                match group {
                    $(Group::$group => name.parse::<$group>().ok().map(Self::$group)),+
                }
            }

            pub fn all() -> impl Iterator<Item = Control> {
                std::iter::empty()
                    $(.chain(
                        <$group as strum::VariantArray>::VARIANTS.iter().copied().map(Self::$group)
                    ))+
            }
        }
    };
}

for_each_control!(make_controls);

impl Control {
    pub const fn group(self) -> Group {
        self.spec().group
    }

    /// Key of this control in decoded responses.
    ///
    /// With `prefixed` the group key is prepended, e.g. `heat_circuit_day_temperature`.
    pub fn key(self, prefixed: bool) -> String {
        if prefixed {
            format!("{}_{}", self.group().key(), self.name())
        } else {
            self.name().to_string()
        }
    }
}

impl std::fmt::Display for Control {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.group(), self.name())
    }
}

#[derive(thiserror::Error, Debug)]
#[error("`{0}` does not name a known control")]
pub struct UnknownControl(String);

impl std::str::FromStr for Control {
    type Err = UnknownControl;

    /// Accepts `group.name` as well as the prefixed response key form `group_name`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowercase = s.to_ascii_lowercase();
        for &group in <Group as strum::VariantArray>::VARIANTS {
            let Some(rest) = lowercase.strip_prefix(group.key()) else {
                continue;
            };
            let Some(name) = rest.strip_prefix(['.', '_']) else {
                continue;
            };
            if let Some(control) = Self::from_parts(group, name) {
                return Ok(control);
            }
        }
        Err(UnknownControl(s.to_string()))
    }
}

macro_rules! code_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($variant:ident = $value:literal),* $(,)?
        }
    ) => {
        #[derive(
            Clone,
            Copy,
            Debug,
            PartialEq,
            Eq,
            strum::VariantNames,
            strum::VariantArray,
            strum::FromRepr,
            strum::IntoStaticStr,
            strum::EnumString,
            num_derive::ToPrimitive,
        )]
        #[strum(serialize_all = "snake_case", ascii_case_insensitive)]
        #[repr(u8)]
        $(#[$meta])*
        $vis enum $name {
            $($variant = $value),*
        }

        impl From<$name> for Value {
            fn from(value: $name) -> Value {
                Value::Integer(value as u8 as i64)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(<&'static str>::from(self))
            }
        }
    };
}

code_enum! {
    pub enum HotWaterTankOperatingMode {
        Off = 0,
        Auto = 1,
        On = 2,
        HeatUp = 3,
    }
}

code_enum! {
    pub enum HeatPumpStatus {
        Standby = 0,
        Flow = 1,
        Auto = 2,
    }
}

code_enum! {
    pub enum HeatCircuitOperatingMode {
        Off = 0,
        Auto = 1,
        Day = 2,
        Night = 3,
        Away = 4,
        Party = 5,
    }
}

/// Symbolic names for the integer codes of an enumerated control.
///
/// These only affect how values are rendered, the device is always sent the code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Enumeration {
    HotWaterTankOperatingMode,
    HeatPumpStatus,
    HeatCircuitOperatingMode,
}

fn name_of<T>(code: i64) -> Option<&'static str>
where
    T: strum::VariantArray + num_traits::ToPrimitive + Copy + Into<&'static str>,
{
    let variant = T::VARIANTS.iter().find(|v| v.to_i64() == Some(code))?;
    Some((*variant).into())
}

fn code_of<T>(name: &str) -> Option<i64>
where
    T: std::str::FromStr + num_traits::ToPrimitive,
{
    name.trim().parse::<T>().ok()?.to_i64()
}

impl Enumeration {
    pub fn name_of(self, code: i64) -> Option<&'static str> {
        match self {
            Self::HotWaterTankOperatingMode => name_of::<HotWaterTankOperatingMode>(code),
            Self::HeatPumpStatus => name_of::<HeatPumpStatus>(code),
            Self::HeatCircuitOperatingMode => name_of::<HeatCircuitOperatingMode>(code),
        }
    }

    /// Look up the code of a symbolic name, ignoring ASCII case.
    pub fn code_of(self, name: &str) -> Option<i64> {
        match self {
            Self::HotWaterTankOperatingMode => code_of::<HotWaterTankOperatingMode>(name),
            Self::HeatPumpStatus => code_of::<HeatPumpStatus>(name),
            Self::HeatCircuitOperatingMode => code_of::<HeatCircuitOperatingMode>(name),
        }
    }

    pub fn names(self) -> &'static [&'static str] {
        use strum::VariantNames;
        match self {
            Self::HotWaterTankOperatingMode => HotWaterTankOperatingMode::VARIANTS,
            Self::HeatPumpStatus => HeatPumpStatus::VARIANTS,
            Self::HeatCircuitOperatingMode => HeatCircuitOperatingMode::VARIANTS,
        }
    }

    /// The symbolic name for a decoded value, if it has one.
    pub fn render(self, value: &Value) -> Option<&'static str> {
        match value {
            Value::Integer(code) => self.name_of(*code),
            Value::Text(text) => self.name_of(self.code_of(text)?),
            Value::Float(_) => None,
        }
    }

    /// Parse either a symbolic name or a known numeric code.
    pub fn parse(self, input: &str) -> Option<i64> {
        if let Some(code) = self.code_of(input) {
            return Some(code);
        }
        let code = input.trim().parse::<i64>().ok()?;
        self.name_of(code).map(|_| code)
    }
}

impl std::fmt::Display for Enumeration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(<&'static str>::from(self))
    }
}
