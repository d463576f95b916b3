//! Driver error type (spec §7), in the shape of `pico-gs`'s `GpuError<E>`.

/// Everything that can go wrong calling into a [`crate::driver::Driver`].
///
/// Silent, spec-mandated drops (texture dedup, opcode elision on band miss,
/// triangle culling by the rasterizer) never surface here — they aren't
/// errors, they're the steady-state behavior of the pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverError<E> {
    /// The back display list had no room for the opcode/payload being
    /// encoded. Outside of [`crate::driver::Driver::commit`] the back list is
    /// left byte-identical so the caller may retry after the next commit;
    /// `commit` itself clears the back list on this error, since a partial
    /// frame would desync the hardware's band cadence.
    BackListFull,
    /// `use_texture` was given dimensions other than a square 32/64/128/256
    /// texture.
    UnsupportedTextureSize,
    /// Logic-op blending is not implemented by this hardware generation;
    /// `set_logic_op` always reports this rather than silently ignoring it.
    LogicOpUnsupported,
    /// The bus transport reported an error.
    Transport(E),
}

impl<E> From<E> for DriverError<E> {
    fn from(err: E) -> Self {
        DriverError::Transport(err)
    }
}

impl<E: core::fmt::Debug> core::fmt::Display for DriverError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DriverError::BackListFull => write!(f, "back display list is full, frame dropped"),
            DriverError::UnsupportedTextureSize => {
                write!(f, "texture dimensions must be a square 32, 64, 128, or 256 texels")
            }
            DriverError::LogicOpUnsupported => write!(f, "logic-op blending is not supported"),
            DriverError::Transport(e) => write!(f, "bus transport error: {:?}", e),
        }
    }
}
