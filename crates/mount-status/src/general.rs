//! General status tick: mirrors the park state onto a dedicated output.

use platform::{GpioPort, PinState};

use crate::config::ParkStatusConfig;

/// Park state as reported by the park subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParkState {
    /// Not parked
    #[default]
    Unparked,
    /// Slewing to the park position
    Parking,
    /// At rest in the park position
    Parked,
    /// The last park attempt failed
    Failed,
}

impl ParkState {
    /// Only a completed park counts as parked.
    pub fn is_parked(self) -> bool {
        self == Self::Parked
    }
}

/// Level the parked-status output should show for `park`.
pub fn park_status_level(config: ParkStatusConfig, park: ParkState) -> PinState {
    if park.is_parked() {
        config.parked_level
    } else {
        config.parked_level.inverted()
    }
}

/// Write the parked-status output, if one is fitted.
pub fn mirror_park_state<G: GpioPort>(
    config: Option<ParkStatusConfig>,
    gpio: &mut G,
    park: ParkState,
) -> Result<(), G::Error> {
    match config {
        Some(config) => gpio.write(config.pin, park_status_level(config, park)),
        None => Ok(()),
    }
}
