#![no_std]
//! Platform-agnostic host driver for a band-tiled, fixed-function triangle
//! rasterizer accelerator.
//!
//! Owns the display-list wire format, the front/back frame pipeline, and
//! the band walker that re-streams a committed frame once per horizontal
//! band. Generic over a [`bandgpu_hal::BusTransport`] (the physical link to
//! the hardware) and a [`bandgpu_hal::Rasterizer`] (the external collaborator
//! that turns clip-space vertices into the opaque, hardware-specific
//! triangle record this crate streams byte-for-byte).

mod color;
mod config;
mod driver;
mod encoder;
mod error;
mod list;
mod opcode;
mod regs;
mod texture;
mod walker;

pub use bandgpu_hal::{BusTransport, Rasterizer};

pub use color::{convert_color, Color8};
pub use config::{DriverConfig, DEFAULT_DISPLAY_LIST_SIZE, HARDWARE_BUFFER_SIZE};
pub use driver::Driver;
pub use error::DriverError;
pub use list::{DisplayList, ListState};
pub use opcode::{
    framebuffer_op, triangle_stream, OpClass, Opcode, RegSelect, TexSize, FB_COMMIT, FB_MEMSET,
    FB_TARGET_COLOR, FB_TARGET_DEPTH,
};
pub use regs::{ConfReg1, ConfReg2};
pub use texture::TextureStreamArg;

/// A [`Driver`] sized to the spec's default `DISPLAY_LIST_SIZE`.
pub type DefaultDriver<B, R> = Driver<{ config::DEFAULT_DISPLAY_LIST_SIZE }, B, R>;
