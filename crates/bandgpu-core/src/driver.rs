//! Top-level driver: owns the front/back display-list pair, the wire
//! register snapshot, and the bus/rasterizer collaborators (spec §4, §6.4).

use bandgpu_hal::{BusTransport, Rasterizer};

use crate::config::{DriverConfig, HARDWARE_BUFFER_SIZE};
use crate::error::DriverError;
use crate::list::{DisplayList, ListState};
use crate::regs::{ConfReg1, ConfReg2};
use crate::texture::TextureStreamArg;

/// Platform-agnostic driver for a band-tiled triangle rasterizer.
///
/// `DL` is the capacity in bytes of each of the two display lists. Generic
/// over a [`BusTransport`] and a [`Rasterizer`] so the same driver runs
/// against real hardware and against mocks in tests.
pub struct Driver<const DL: usize, B: BusTransport, R: Rasterizer> {
    pub(crate) lists: [DisplayList<DL>; 2],
    pub(crate) front: usize,
    pub(crate) back: usize,
    /// Single hardware-buffer-sized scratch arena the band walker fills and
    /// flushes once per tick (spec §4.1's "upload list"). Bounds every
    /// non-texture-chunk bus write to `HARDWARE_BUFFER_SIZE` bytes
    /// regardless of how large the frame list itself is.
    pub(crate) upload: DisplayList<HARDWARE_BUFFER_SIZE>,
    pub(crate) conf_reg1: ConfReg1,
    pub(crate) conf_reg2: ConfReg2,
    pub(crate) clear_color: u16,
    pub(crate) clear_depth: u16,
    pub(crate) tex_env_color: u16,
    pub(crate) texture_cursor: Option<TextureStreamArg>,
    pub(crate) last_texture: Option<TextureStreamArg>,
    pub(crate) upload_index_position: u32,
    pub(crate) config: DriverConfig,
    pub(crate) bus: B,
    pub(crate) rasterizer: R,
}

const _: () = assert!(HARDWARE_BUFFER_SIZE > 0);

impl<const DL: usize, B: BusTransport, R: Rasterizer> Driver<DL, B, R> {
    pub fn new(bus: B, rasterizer: R, config: DriverConfig) -> Self {
        let align = config.align();
        Driver {
            lists: [DisplayList::new(align), DisplayList::new(align)],
            front: 0,
            back: 1,
            upload: DisplayList::new(align),
            conf_reg1: ConfReg1::DEFAULT,
            conf_reg2: ConfReg2::default_with(config.perspective_correct_default),
            clear_color: 0x0000,
            clear_depth: 0xFFFF,
            tex_env_color: 0x0000,
            texture_cursor: None,
            last_texture: None,
            upload_index_position: 0,
            config,
            bus,
            rasterizer,
        }
    }

    pub fn config(&self) -> DriverConfig {
        self.config
    }

    pub(crate) fn back_list(&mut self) -> &mut DisplayList<DL> {
        &mut self.lists[self.back]
    }

    pub(crate) fn front_list(&mut self) -> &mut DisplayList<DL> {
        &mut self.lists[self.front]
    }

    /// True while the front list still has a frame queued or in flight.
    pub fn frame_in_flight(&self) -> bool {
        self.lists[self.front].state() != ListState::Free
    }

    pub fn back_free_space(&mut self) -> u32 {
        self.back_list().free_space()
    }

    pub(crate) fn fail_frame(&mut self) -> DriverError<B::Error> {
        self.back_list().clear();
        DriverError::BackListFull
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    pub fn rasterizer(&self) -> &R {
        &self.rasterizer
    }
}
