//! Band walker and bus uploader (spec §4.4, §4.5).
//!
//! Re-emits the front display list once per horizontal band, counting
//! `upload_index_position` down from `DISPLAY_LINES - 1` to `0`, pruning
//! triangles that don't intersect the current band. Between bus-ready ticks
//! it fills the fixed `HARDWARE_BUFFER_SIZE` upload arena from the front
//! list and flushes it in one `write_data` call; large texture uploads
//! bypass the upload list and are split across several ticks instead,
//! `HARDWARE_BUFFER_SIZE` bytes at a time.

use bandgpu_hal::{BusTransport, Rasterizer};
use log::{debug, trace, warn};

use crate::config::HARDWARE_BUFFER_SIZE;
use crate::driver::Driver;
use crate::error::DriverError;
use crate::list::ListState;
use crate::opcode::{OpClass, Opcode};
use crate::texture::TextureStreamArg;

impl<const DL: usize, B: BusTransport, R: Rasterizer> Driver<DL, B, R> {
    /// One step of the band walker / uploader. Returns `Ok(true)` if it did
    /// work (a texture chunk sent, or an opcode processed), `Ok(false)` if
    /// there was nothing to do: no frame queued, or the bus wasn't ready.
    pub fn poll(&mut self) -> Result<bool, DriverError<B::Error>> {
        if !self.bus.clear_to_send() {
            return Ok(false);
        }
        self.pump_bus()
    }

    /// Does the work of one tick, assuming the caller already confirmed
    /// `bus.clear_to_send()`. Shared by [`Self::poll`] and `commit`'s drain
    /// loop.
    pub(crate) fn pump_bus(&mut self) -> Result<bool, DriverError<B::Error>> {
        if let Some(mut cursor) = self.texture_cursor.take() {
            if cursor.remaining_pixels > 0 {
                self.send_texture_chunk(&mut cursor)?;
            }
            if cursor.remaining_pixels > 0 {
                self.texture_cursor = Some(cursor);
            }
            return Ok(true);
        }

        match self.lists[self.front].state() {
            ListState::Free => return Ok(false),
            ListState::Queued => {
                // First tick of a freshly-swapped-in frame: bands are
                // replayed top-down in the image but addressed bottom-up on
                // the wire, so `upload_index_position` starts at
                // `DISPLAY_LINES - 1` and counts down to `0` (spec §4.5).
                self.upload_index_position = self.config.display_lines.saturating_sub(1);
                self.lists[self.front].transfer();
                self.bus.start_color_buffer_transfer(self.upload_index_position)?;
            }
            ListState::Transferring => {}
        }

        if self.lists[self.front].at_end() {
            return self.advance_band();
        }

        self.fill_and_flush_upload_list()
    }

    fn advance_band(&mut self) -> Result<bool, DriverError<B::Error>> {
        if self.upload_index_position == 0 {
            debug!("frame fully walked, last band was 0");
            self.lists[self.front].clear();
            self.last_texture = None;
            return Ok(true);
        }
        self.upload_index_position -= 1;
        self.lists[self.front].reset_read();
        debug!("band {} starting", self.upload_index_position);
        self.bus.start_color_buffer_transfer(self.upload_index_position)?;
        Ok(true)
    }

    /// Clear the upload arena, fill it from the front list until the
    /// opcode stream ends, there's no longer room for an opcode plus a
    /// worst-case triangle payload, or a texture command asks to stop
    /// early, then flush whatever was gathered in one `write_data` call
    /// (spec §4.5 steps 4-6).
    fn fill_and_flush_upload_list(&mut self) -> Result<bool, DriverError<B::Error>> {
        self.upload.clear();

        loop {
            if self.lists[self.front].at_end() {
                break;
            }
            let min_needed = self.upload.footprint::<Opcode>() + self.upload.footprint::<R::Triangle>();
            if self.upload.free_space() < min_needed {
                break;
            }
            if !self.copy_next_opcode_into_upload()? {
                break;
            }
        }

        if self.upload.size() > 0 {
            self.bus.write_data(self.upload.bytes())?;
        }

        if self.lists[self.front].at_end() {
            self.advance_band()
        } else {
            Ok(true)
        }
    }

    /// Pop one opcode (and its class-prescribed payload, if any) from the
    /// front list and copy it into the upload arena. Returns `Ok(true)` to
    /// keep filling this tick, `Ok(false)` to stop early (a fresh texture
    /// upload was just started and should get its own chunk next tick).
    fn copy_next_opcode_into_upload(&mut self) -> Result<bool, DriverError<B::Error>> {
        let opcode = match self.lists[self.front].get_next::<Opcode>() {
            Some(op) => op,
            None => return Ok(true),
        };
        trace!("band walker popped opcode {:#06x}", opcode.0);
        if !self.upload.create(opcode) {
            // Pre-checked by the caller; unreachable in practice, but never
            // leave a half-sized record lying around if it somehow happens.
            return Ok(false);
        }

        match opcode.class() {
            OpClass::Nop | OpClass::FramebufferOp => Ok(true),
            OpClass::SetReg => {
                let value = self.lists[self.front].get_next::<u16>().unwrap_or(0);
                if !self.upload.create(value) {
                    self.upload.remove::<Opcode>();
                }
                Ok(true)
            }
            OpClass::TriangleStream => {
                self.copy_triangle_into_upload();
                Ok(true)
            }
            OpClass::TextureStream => self.begin_texture_stream_into_upload(),
            OpClass::Reserved(class) => {
                warn!("band walker saw reserved opcode class {class}, skipping");
                self.upload.remove::<Opcode>();
                Ok(true)
            }
        }
    }

    /// `TRIANGLE_STREAM` case of [`Self::copy_next_opcode_into_upload`]: pop
    /// the triangle, clip it to the current band, and either push the
    /// banded copy or roll back the opcode too if it misses the band
    /// entirely (spec §4.5's "nothing is sent for this triangle on this
    /// band").
    fn copy_triangle_into_upload(&mut self) {
        let triangle = match self.lists[self.front].get_next::<R::Triangle>() {
            Some(t) => t,
            None => {
                self.upload.remove::<Opcode>();
                return;
            }
        };

        let (y_start, y_end) = self.current_band_range();
        let mut banded = R::Triangle::default();
        if self.rasterizer.calc_line_increment(&mut banded, &triangle, y_start, y_end) {
            if !self.upload.create(banded) {
                self.upload.remove::<Opcode>();
            }
        } else {
            trace!("triangle culled from band {}", self.upload_index_position);
            self.upload.remove::<Opcode>();
        }
    }

    /// `TEXTURE_STREAM` case: dedup against the texture the previous
    /// `TEXTURE_STREAM` in this same pass completed (spec §4.4). A dedup
    /// hit drops the opcode we just copied and lets the fill loop continue;
    /// a fresh upload keeps the opcode, arms the chunking cursor, and stops
    /// the fill loop so the uploader can push the first 2048-byte chunk on
    /// the very next tick.
    fn begin_texture_stream_into_upload(&mut self) -> Result<bool, DriverError<B::Error>> {
        let arg = self.lists[self.front].get_next::<TextureStreamArg>().unwrap_or_default();

        if let Some(last) = &self.last_texture {
            if last.same_upload(&arg) {
                trace!("texture upload deduped against previous identical upload");
                self.upload.remove::<Opcode>();
                return Ok(true);
            }
        }

        self.last_texture = Some(arg);
        if arg.remaining_pixels > 0 {
            self.texture_cursor = Some(arg);
        }
        Ok(false)
    }

    fn send_texture_chunk(&mut self, cursor: &mut TextureStreamArg) -> Result<(), DriverError<B::Error>> {
        let max_pixels = (HARDWARE_BUFFER_SIZE / 2) as i32;
        let chunk_pixels = cursor.remaining_pixels.min(max_pixels);
        // SAFETY: caller guaranteed (TextureStreamArg's safety note) that
        // `pixels` is valid for `remaining_pixels` elements; `chunk_pixels`
        // never exceeds what remains.
        let bytes = unsafe {
            core::slice::from_raw_parts(cursor.pixels as *const u8, chunk_pixels as usize * 2)
        };
        self.bus.write_data(bytes)?;
        cursor.pixels = cursor.pixels.wrapping_add(chunk_pixels as usize);
        cursor.remaining_pixels -= chunk_pixels;
        Ok(())
    }

    fn current_band_range(&self) -> (u16, u16) {
        let y_start = self.upload_index_position.saturating_mul(self.config.line_resolution as u32) as u16;
        let y_end = y_start.saturating_add(self.config.line_resolution);
        (y_start, y_end)
    }
}
