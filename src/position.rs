use crate::controls::Group;

/// Number of installed units of each multiple group.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct Position {
    pub heat_pump: u32,
    pub heat_circuit: u32,
    pub hot_water_tank: u32,
}

impl Position {
    pub const fn new(heat_pump: u32, heat_circuit: u32, hot_water_tank: u32) -> Self {
        Self { heat_pump, heat_circuit, hot_water_tank }
    }

    /// Number of units in `group`, or `None` for groups that are never indexed.
    pub const fn count(&self, group: Group) -> Option<u32> {
        match group {
            Group::HeatPump => Some(self.heat_pump),
            Group::HeatCircuit => Some(self.heat_circuit),
            Group::HotWaterTank => Some(self.hot_water_tank),
            Group::System | Group::Outdoor => None,
        }
    }
}

/// Which units a read addresses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
    /// Every installed unit, according to the counts.
    Counts(Position),
    /// Explicit 1-based unit positions. `None` addresses the control without an index.
    Units(Vec<Option<u32>>),
}

impl Target {
    /// The unit at 1-based `position`.
    pub fn unit(position: u32) -> Self {
        Self::Units(vec![Some(position)])
    }

    /// The control itself, without any index.
    pub fn unindexed() -> Self {
        Self::Units(vec![None])
    }
}

impl From<Position> for Target {
    fn from(position: Position) -> Self {
        Self::Counts(position)
    }
}

impl From<u32> for Target {
    fn from(position: u32) -> Self {
        Self::unit(position)
    }
}

impl From<Option<u32>> for Target {
    fn from(position: Option<u32>) -> Self {
        Self::Units(vec![position])
    }
}

impl From<Vec<Option<u32>>> for Target {
    fn from(positions: Vec<Option<u32>>) -> Self {
        Self::Units(positions)
    }
}

impl From<Vec<u32>> for Target {
    fn from(positions: Vec<u32>) -> Self {
        Self::Units(positions.into_iter().map(Some).collect())
    }
}

impl From<&[u32]> for Target {
    fn from(positions: &[u32]) -> Self {
        Self::Units(positions.iter().copied().map(Some).collect())
    }
}
