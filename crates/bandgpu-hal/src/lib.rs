#![no_std]
//! Platform abstraction traits for the band-tiled GPU host driver.
//!
//! `bandgpu-core` owns the display-list format, the frame pipeline, and the
//! band walker; it is generic over the two collaborators defined here so the
//! same driver runs against a real bus and a real rasterizer on target, and
//! against in-memory mocks in tests.

/// Non-blocking, DMA-style byte sink for the narrow bus that connects the
/// host to the rasterizer hardware.
///
/// Implementations own CS toggling, chunking below the wire's native
/// transfer size, and any retry policy; the driver only ever asks "is it
/// clear to send" and hands over whole buffers.
pub trait BusTransport {
    /// Transport-specific error (bus fault, timeout, ...).
    type Error: core::fmt::Debug;

    /// Non-blocking poll: true when a new `write_data` may start.
    fn clear_to_send(&mut self) -> bool;

    /// Hand `bytes` to the bus. May be asynchronous internally but MUST have
    /// completed before the next `clear_to_send` returns true.
    fn write_data(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Signal that subsequent `write_data` bytes belong to band `band_index`.
    fn start_color_buffer_transfer(&mut self, band_index: u32) -> Result<(), Self::Error>;
}

/// Reduces three clip-space vertices to a hardware-consumable, band-independent
/// triangle record, and specializes that record to a single horizontal band.
///
/// The rasterizer math itself (clipping, edge/gradient setup, perspective
/// correction) is out of scope for this driver; only the contract is defined
/// here.
pub trait Rasterizer {
    /// Plain-old-data triangle record. Fixed, statically known, bus-aligned
    /// size; the driver never inspects its fields, only its bytes. `Default`
    /// gives the driver a scratch value to pass as the `out` parameter below
    /// without ever reading an uninitialized record.
    type Triangle: Copy + Default;

    /// Project a triangle into a `Triangle` record. Returns `false` if the
    /// triangle has no visible coverage (entirely outside the view volume);
    /// the caller drops it silently in that case.
    #[allow(clippy::too_many_arguments)]
    fn rasterize(
        &self,
        out: &mut Self::Triangle,
        v0: glam::Vec3,
        st0: glam::Vec2,
        v1: glam::Vec3,
        st1: glam::Vec2,
        v2: glam::Vec3,
        st2: glam::Vec2,
    ) -> bool;

    /// Specialize `input` to the horizontal band `[y_start, y_end)`, writing
    /// the result to `out`. Returns `false` if the triangle does not touch
    /// that band.
    fn calc_line_increment(
        &self,
        out: &mut Self::Triangle,
        input: &Self::Triangle,
        y_start: u16,
        y_end: u16,
    ) -> bool;
}
