//! Cursor into a caller-owned texel buffer mid-stream (spec §3, §4.4).
//!
//! The driver never copies or owns texture pixels; it only ever remembers
//! where it left off inside the caller's buffer and how many texels remain.

/// Non-owning cursor over a run of `u16` texels.
///
/// # Safety
/// `pixels` must stay valid for at least `remaining_pixels` elements for as
/// long as the driver holds a `TextureStreamArg` derived from it (i.e. until
/// every chunk of that upload has been drained by the band walker).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextureStreamArg {
    pub pixels: *const u16,
    pub remaining_pixels: i32,
}

impl TextureStreamArg {
    pub const fn new(pixels: *const u16, remaining_pixels: i32) -> Self {
        TextureStreamArg { pixels, remaining_pixels }
    }

    /// True when `self` names the exact same buffer and length as `other` —
    /// the signal the band walker uses to dedup an identical back-to-back
    /// texture upload instead of re-streaming it.
    pub fn same_upload(&self, other: &TextureStreamArg) -> bool {
        self.pixels == other.pixels && self.remaining_pixels == other.remaining_pixels
    }
}

impl Default for TextureStreamArg {
    fn default() -> Self {
        TextureStreamArg { pixels: core::ptr::null(), remaining_pixels: 0 }
    }
}
