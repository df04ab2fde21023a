//! Controller-wide constants
//!
//! Values shared by every subsystem that talks to the platform layer.
//! Subsystems reference these rather than hardcoding values.

/// Magic value marking a non-volatile store as initialized.
///
/// Written once by the controller after every subsystem has seeded its
/// defaults; absent on a blank or foreign part.
pub const NV_KEY: u32 = 0x4D53_5401;

/// Size of the key header at the start of the non-volatile store.
pub const NV_KEY_SIZE: u32 = 4;

/// Priority tier used by indicator and housekeeping tasks.
///
/// Motion-control tasks run at more urgent (lower) tiers.
pub const HOUSEKEEPING_PRIORITY: u8 = 4;
