//! Persisted sound preference.
//!
//! One byte at [`NV_MOUNT_STATUS_BASE`]: zero means sound off, anything
//! else means sound on.

use embedded_storage::Storage;
use platform::{NvError, NvStore};

use crate::config::NV_MOUNT_STATUS_BASE;

/// Whether ordinary (non-startup) sounds are played.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SoundPreference {
    /// Sounds enabled
    pub enabled: bool,
}

impl SoundPreference {
    /// Preference with the given value.
    pub const fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Stored byte representation.
    pub fn to_byte(self) -> u8 {
        u8::from(self.enabled)
    }

    /// Decode a stored byte.
    pub fn from_byte(byte: u8) -> Self {
        Self {
            enabled: byte != 0,
        }
    }

    /// Read the persisted preference.
    pub fn load<S: Storage>(nv: &mut NvStore<S>) -> Result<Self, NvError> {
        nv.read_u8(NV_MOUNT_STATUS_BASE).map(Self::from_byte)
    }

    /// Persist this preference.
    pub fn store<S: Storage>(self, nv: &mut NvStore<S>) -> Result<(), NvError> {
        nv.write_u8(NV_MOUNT_STATUS_BASE, self.to_byte())
    }
}
