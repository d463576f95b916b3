//! Public encoding API: turns draw/state calls into opcodes appended to the
//! back display list (spec §4.2, §6.4).

use bandgpu_hal::{BusTransport, Rasterizer};
use glam::{Vec2, Vec3};
use log::warn;

use crate::color::{convert_color, Color8};
use crate::driver::Driver;
use crate::error::DriverError;
use crate::opcode::{
    framebuffer_op, triangle_stream, Opcode, RegSelect, TexSize, FB_COMMIT, FB_MEMSET,
    FB_TARGET_COLOR, FB_TARGET_DEPTH,
};
use crate::texture::TextureStreamArg;

impl<const DL: usize, B: BusTransport, R: Rasterizer> Driver<DL, B, R> {
    /// Append an opcode+payload pair to the back list. On failure the list is
    /// left byte-identical (any partial write is rolled back) — per spec §7,
    /// only a failed *commit* append clears the whole frame.
    fn append<T: Copy>(&mut self, opcode: Opcode, payload: T) -> Result<(), DriverError<B::Error>> {
        let list = self.back_list();
        if !list.create(opcode) {
            warn!("back display list full, encoder append rejected, frame unaffected");
            return Err(DriverError::BackListFull);
        }
        if !list.create(payload) {
            list.remove::<Opcode>();
            warn!("back display list full, encoder append rejected, frame unaffected");
            return Err(DriverError::BackListFull);
        }
        Ok(())
    }

    /// Append a payload-less opcode. Same no-clear-on-failure contract as
    /// [`Self::append`].
    fn append_opcode(&mut self, opcode: Opcode) -> Result<(), DriverError<B::Error>> {
        if self.back_list().create(opcode) {
            Ok(())
        } else {
            warn!("back display list full, encoder append rejected, frame unaffected");
            Err(DriverError::BackListFull)
        }
    }

    fn set_reg_u16(&mut self, reg: RegSelect, value: u16) -> Result<(), DriverError<B::Error>> {
        self.append(reg.opcode(), value)
    }

    /// Encode one triangle. Silently dropped (not an error) if the
    /// rasterizer reports the triangle has no visible coverage. Every call —
    /// whether the triangle lands or is culled — also drives one step of the
    /// band walker, per spec §4.2: submission and bus progress interleave.
    ///
    /// The triangle's flat color rides in its own `SET_REG` word ahead of
    /// the `TRIANGLE_STREAM` record (the rasterizer's `Triangle` type is
    /// opaque to this crate, so there's no field to stamp a color into
    /// directly). Both appends are treated as one logical unit: the byte
    /// budget for both is checked up front so a triangle that doesn't fit
    /// never leaves a dangling color register behind it (spec §7's
    /// all-or-nothing append guarantee).
    #[allow(clippy::too_many_arguments)]
    pub fn draw_triangle(
        &mut self,
        v0: Vec3,
        st0: Vec2,
        v1: Vec3,
        st1: Vec2,
        v2: Vec3,
        st2: Vec2,
        color: Color8,
    ) -> Result<(), DriverError<B::Error>> {
        let mut tri = R::Triangle::default();
        let result = if self.rasterizer.rasterize(&mut tri, v0, st0, v1, st1, v2, st2) {
            self.append_colored_triangle(color, tri)
        } else {
            Ok(())
        };
        self.poll()?;
        result
    }

    fn append_colored_triangle(&mut self, color: Color8, tri: R::Triangle) -> Result<(), DriverError<B::Error>> {
        let list = self.back_list();
        let needed = list.footprint::<Opcode>() * 2
            + list.footprint::<u16>()
            + list.footprint::<R::Triangle>();
        if list.free_space() < needed {
            warn!("back display list full, encoder append rejected, frame unaffected");
            return Err(DriverError::BackListFull);
        }
        self.set_reg_u16(RegSelect::FlatColor, convert_color(color))?;
        self.append(triangle_stream(core::mem::size_of::<R::Triangle>() as u16), tri)
    }

    /// Stream a caller-owned texture; `pixels` must stay valid until the
    /// upload has fully drained to the bus (see [`TextureStreamArg`]'s
    /// safety note). Dimensions must be a square 32/64/128/256 texel texture.
    pub fn use_texture(
        &mut self,
        pixels: *const u16,
        width: u16,
        height: u16,
    ) -> Result<(), DriverError<B::Error>> {
        let size = TexSize::from_dim(width, height).ok_or_else(|| {
            warn!("rejected texture upload of {width}x{height}, must be square 32/64/128/256");
            DriverError::UnsupportedTextureSize
        })?;
        let arg = TextureStreamArg::new(pixels, size.pixel_count() as i32);
        self.append(size.opcode(), arg)
    }

    pub fn clear(&mut self, color: bool, depth: bool) -> Result<(), DriverError<B::Error>> {
        if !color && !depth {
            return self.append_opcode(Opcode::NOP);
        }
        let mut bits = FB_MEMSET;
        if color {
            bits |= FB_TARGET_COLOR;
        }
        if depth {
            bits |= FB_TARGET_DEPTH;
        }
        self.append_opcode(framebuffer_op(bits))
    }

    pub fn set_clear_color(&mut self, color: Color8) -> Result<(), DriverError<B::Error>> {
        self.clear_color = convert_color(color);
        self.set_reg_u16(RegSelect::ClearColor, self.clear_color)
    }

    pub fn set_clear_depth(&mut self, depth: u16) -> Result<(), DriverError<B::Error>> {
        self.clear_depth = depth;
        self.set_reg_u16(RegSelect::ClearDepth, depth)
    }

    pub fn set_tex_env_color(&mut self, color: Color8) -> Result<(), DriverError<B::Error>> {
        self.tex_env_color = convert_color(color);
        self.set_reg_u16(RegSelect::TexEnvColor, self.tex_env_color)
    }

    pub fn enable_depth_test(&mut self, enabled: bool) -> Result<(), DriverError<B::Error>> {
        self.conf_reg1.depth_test_enabled = enabled;
        self.flush_conf_reg1()
    }

    pub fn set_depth_mask(&mut self, write: bool) -> Result<(), DriverError<B::Error>> {
        self.conf_reg1.depth_mask = write;
        self.flush_conf_reg1()
    }

    pub fn set_color_mask(
        &mut self,
        r: bool,
        g: bool,
        b: bool,
        a: bool,
    ) -> Result<(), DriverError<B::Error>> {
        self.conf_reg1.color_mask_r = r;
        self.conf_reg1.color_mask_g = g;
        self.conf_reg1.color_mask_b = b;
        self.conf_reg1.color_mask_a = a;
        self.flush_conf_reg1()
    }

    /// `func` is a raw 3-bit comparison-function code owned by the host
    /// graphics API layered on top of this driver.
    pub fn set_depth_func(&mut self, func: u8) -> Result<(), DriverError<B::Error>> {
        self.conf_reg1.depth_func = func;
        self.flush_conf_reg1()
    }

    /// `func`/`reference` are raw codes, see [`Self::set_depth_func`].
    pub fn set_alpha_func(&mut self, func: u8, reference: u8) -> Result<(), DriverError<B::Error>> {
        self.conf_reg1.alpha_func = func;
        self.conf_reg1.alpha_ref = reference;
        self.flush_conf_reg1()
    }

    fn flush_conf_reg1(&mut self) -> Result<(), DriverError<B::Error>> {
        let packed = self.conf_reg1.pack();
        self.set_reg_u16(RegSelect::ConfReg1, packed)
    }

    pub fn set_tex_env(&mut self, func: u8) -> Result<(), DriverError<B::Error>> {
        self.conf_reg2.tex_env_func = func;
        self.flush_conf_reg2()
    }

    pub fn set_blend_func(&mut self, src: u8, dst: u8) -> Result<(), DriverError<B::Error>> {
        self.conf_reg2.blend_src = src;
        self.conf_reg2.blend_dst = dst;
        self.flush_conf_reg2()
    }

    pub fn set_texture_wrap_mode_s(&mut self, clamp: bool) -> Result<(), DriverError<B::Error>> {
        self.conf_reg2.tex_wrap_s_clamp = clamp;
        self.flush_conf_reg2()
    }

    pub fn set_texture_wrap_mode_t(&mut self, clamp: bool) -> Result<(), DriverError<B::Error>> {
        self.conf_reg2.tex_wrap_t_clamp = clamp;
        self.flush_conf_reg2()
    }

    fn flush_conf_reg2(&mut self) -> Result<(), DriverError<B::Error>> {
        let packed = self.conf_reg2.pack();
        self.set_reg_u16(RegSelect::ConfReg2, packed)
    }

    /// Logic-op blending is not implemented by this hardware generation.
    /// Always returns `LogicOpUnsupported`, regardless of `op`, and never
    /// touches the display list.
    pub fn set_logic_op(&mut self, _op: u8) -> Result<(), DriverError<B::Error>> {
        Err(DriverError::LogicOpUnsupported)
    }

    /// Append the frame-boundary opcode, busy-drain whatever is still
    /// in flight on the front list, then swap the just-finished back list
    /// into front. This is the one operation in this driver's surface that
    /// may block: everything else is a non-blocking append.
    ///
    /// Unlike every other encoder call, a failed append here (back list full)
    /// drops the entire in-progress frame (spec §7, §4.5): a partial frame
    /// would desync the hardware's band cadence, so the back list is cleared
    /// rather than left for a retry.
    pub fn commit(&mut self) -> Result<(), DriverError<B::Error>> {
        if !self.back_list().create(framebuffer_op(FB_COMMIT | FB_TARGET_COLOR)) {
            warn!("back display list full at commit, dropping in-progress frame");
            return Err(self.fail_frame());
        }

        while self.frame_in_flight() {
            if self.bus.clear_to_send() {
                self.pump_bus()?;
            }
        }

        core::mem::swap(&mut self.front, &mut self.back);
        self.lists[self.front].reset_read();
        self.lists[self.front].enqueue();
        self.lists[self.back].clear();
        self.poll()?;
        Ok(())
    }
}
