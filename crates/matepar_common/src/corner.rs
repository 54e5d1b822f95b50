//! Process/voltage/temperature operating points.
//!
//! A [`PtvCorner`] names the conditions under which a piece of characterization
//! data (for example a [`CombinatorialDelay`](crate::CombinatorialDelay)) was
//! measured. Corners are ordered so they can key a `BTreeMap`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a die falls in the process spectrum.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessSpeed {
    /// Slowest dies of the population.
    Slow,
    /// Nominal process.
    Typical,
    /// Fastest dies of the population.
    Fast,
}

impl fmt::Display for ProcessSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessSpeed::Slow => write!(f, "slow"),
            ProcessSpeed::Typical => write!(f, "typical"),
            ProcessSpeed::Fast => write!(f, "fast"),
        }
    }
}

/// A single point in (process, voltage, temperature) space.
///
/// Ordering is lexicographic over speed, then die temperature, then voltage.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct PtvCorner {
    speed: ProcessSpeed,
    die_temp: i32,
    voltage: i32,
}

impl PtvCorner {
    /// Creates a corner from a process speed, a die temperature in °C and a
    /// cell supply voltage in mV.
    pub fn new(speed: ProcessSpeed, die_temp: i32, voltage: i32) -> Self {
        Self {
            speed,
            die_temp,
            voltage,
        }
    }

    /// Returns the process speed of this corner.
    pub fn speed(&self) -> ProcessSpeed {
        self.speed
    }

    /// Returns the die temperature in °C.
    pub fn die_temp(&self) -> i32 {
        self.die_temp
    }

    /// Returns the cell supply voltage in mV.
    ///
    /// This is the supply of the cell being characterized, which is not
    /// necessarily the core rail (I/O cells run from their bank supply).
    pub fn voltage(&self) -> i32 {
        self.voltage
    }
}

impl fmt::Display for PtvCorner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} °C, {:.3} V, {} process corner",
            self.die_temp,
            f64::from(self.voltage) * 0.001,
            self.speed
        )
    }
}
