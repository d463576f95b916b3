//! Compile-time-in-spirit configuration (spec §6.5).
//!
//! `DISPLAY_LIST_SIZE` and [`HARDWARE_BUFFER_SIZE`] are true compile-time
//! memory layout decisions (they size the backing arrays and must be known
//! at the type level to avoid allocation), so they're const generics on
//! [`crate::driver::Driver`] and a fixed constant respectively.
//! `DISPLAY_LINES`, `LINE_RESOLUTION`, and `BUS_WIDTH` only drive loop counts
//! and alignment arithmetic, not array sizes, so they're ordinary runtime
//! fields gathered here rather than a combinatorial explosion of const
//! generics.

/// Size of the hardware's one-shot transfer buffer, in bytes. Fixed by the
/// hardware, not configurable.
pub const HARDWARE_BUFFER_SIZE: usize = 2048;

/// Default frame-list capacity in bytes (spec §6.5 `DISPLAY_LIST_SIZE`).
pub const DEFAULT_DISPLAY_LIST_SIZE: usize = 2048;

/// Runtime configuration for a [`crate::driver::Driver`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DriverConfig {
    /// Number of horizontal bands per frame (`DISPLAY_LINES`).
    pub display_lines: u32,
    /// Scanlines per band (`LINE_RESOLUTION`).
    pub line_resolution: u16,
    /// Bus width in bits; alignment is `bus_width / 8` bytes.
    pub bus_width: u8,
    /// Initial value of the perspective-correct-texturing flag.
    pub perspective_correct_default: bool,
}

impl DriverConfig {
    /// Defaults matching spec §6.5.
    pub const DEFAULT: DriverConfig = DriverConfig {
        display_lines: 1,
        line_resolution: 128,
        bus_width: 32,
        perspective_correct_default: true,
    };

    /// Byte alignment every display-list record is placed on (`BUS_WIDTH / 8`).
    pub const fn align(&self) -> usize {
        (self.bus_width as usize) / 8
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
