//! Keyed non-volatile store
//!
//! Wraps any [`embedded_storage::Storage`] (EEPROM, emulated EEPROM in
//! flash, FRAM) with a 4-byte key header. Subsystems own fixed byte
//! addresses inside the payload area that follows the header.
//!
//! ```text
//! offset 0      ┌──────────────────────┐
//!               │  key (u32, LE)       │   NV_KEY when initialized
//! offset 4      ├──────────────────────┤
//!               │  payload             │   address 0 .. capacity - 4
//!               └──────────────────────┘
//! ```

use embedded_storage::Storage;
use thiserror_no_std::Error;

use crate::config::{NV_KEY, NV_KEY_SIZE};

/// Non-volatile store errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NvError {
    /// The underlying device reported a read or write failure
    #[error("non-volatile storage access failed")]
    Storage,
    /// The payload address lies past the end of the device
    #[error("non-volatile address {0} is out of range")]
    OutOfRange(u16),
}

/// Non-volatile store with a validity key in front of the payload.
pub struct NvStore<S> {
    storage: S,
}

impl<S: Storage> NvStore<S> {
    /// Wrap a storage device.
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// `true` when the key header holds [`NV_KEY`].
    ///
    /// A read failure counts as "no valid key".
    pub fn has_valid_key(&mut self) -> bool {
        let mut key = [0u8; 4];
        match self.storage.read(0, &mut key) {
            Ok(()) => u32::from_le_bytes(key) == NV_KEY,
            Err(_) => false,
        }
    }

    /// Write the key header, marking the payload as initialized.
    pub fn mark_valid(&mut self) -> Result<(), NvError> {
        self.storage
            .write(0, &NV_KEY.to_le_bytes())
            .map_err(|_| NvError::Storage)
    }

    /// Read one payload byte.
    pub fn read_u8(&mut self, address: u16) -> Result<u8, NvError> {
        let offset = self.offset(address)?;
        let mut byte = [0u8; 1];
        self.storage
            .read(offset, &mut byte)
            .map_err(|_| NvError::Storage)?;
        let [value] = byte;
        Ok(value)
    }

    /// Write one payload byte, skipping the write when the value is unchanged.
    pub fn write_u8(&mut self, address: u16, value: u8) -> Result<(), NvError> {
        if self.read_u8(address)? == value {
            return Ok(());
        }
        let offset = self.offset(address)?;
        self.storage
            .write(offset, &[value])
            .map_err(|_| NvError::Storage)
    }

    /// Borrow the underlying device.
    pub fn inner(&self) -> &S {
        &self.storage
    }

    /// Release the underlying device.
    pub fn into_inner(self) -> S {
        self.storage
    }

    fn offset(&self, address: u16) -> Result<u32, NvError> {
        let offset = NV_KEY_SIZE
            .checked_add(u32::from(address))
            .ok_or(NvError::OutOfRange(address))?;
        match usize::try_from(offset) {
            Ok(o) if o < self.storage.capacity() => Ok(offset),
            _ => Err(NvError::OutOfRange(address)),
        }
    }
}
