//! Hand-written mocks shared by the integration test suites, in the style
//! of `MockTransport`/`MockError` from the upstream driver's own test suite:
//! a `Rc<RefCell<Vec<_>>>` captures every call so assertions can inspect
//! exactly what the driver sent.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use bandgpu_core::{DriverConfig, Driver};
use bandgpu_hal::{BusTransport, Rasterizer};
use glam::{Vec2, Vec3};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockBusError;

impl core::fmt::Display for MockBusError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "mock bus error")
    }
}

/// Records every write and band-transfer start; `ready` controls what
/// `clear_to_send` reports so tests can simulate a busy bus.
#[derive(Clone, Default)]
pub struct MockBus {
    pub writes: Rc<RefCell<Vec<Vec<u8>>>>,
    pub band_starts: Rc<RefCell<Vec<u32>>>,
    pub ready: Rc<RefCell<bool>>,
}

impl MockBus {
    pub fn new() -> Self {
        MockBus {
            writes: Rc::new(RefCell::new(Vec::new())),
            band_starts: Rc::new(RefCell::new(Vec::new())),
            ready: Rc::new(RefCell::new(true)),
        }
    }

    pub fn set_ready(&self, ready: bool) {
        *self.ready.borrow_mut() = ready;
    }

    pub fn all_bytes(&self) -> Vec<u8> {
        self.writes.borrow().iter().flatten().copied().collect()
    }

    pub fn write_count(&self) -> usize {
        self.writes.borrow().len()
    }
}

impl BusTransport for MockBus {
    type Error = MockBusError;

    fn clear_to_send(&mut self) -> bool {
        *self.ready.borrow()
    }

    fn write_data(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.writes.borrow_mut().push(bytes.to_vec());
        Ok(())
    }

    fn start_color_buffer_transfer(&mut self, band_index: u32) -> Result<(), Self::Error> {
        self.band_starts.borrow_mut().push(band_index);
        Ok(())
    }
}

/// Fixed-size stand-in for the real hardware's opaque triangle record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(C)]
pub struct StubTriangle {
    pub tag: u32,
    pub y_start: u16,
    pub y_end: u16,
}

/// Rasterizer stub: every triangle "covers" the screen unless `cull_all` is
/// set, and `calc_line_increment` keeps a triangle only if its own
/// `[y_start, y_end)` (set at rasterize time from `v0.y`/`v1.y`) overlaps the
/// band range it's asked about.
#[derive(Clone, Copy, Default)]
pub struct StubRasterizer {
    pub cull_all: bool,
}

impl Rasterizer for StubRasterizer {
    type Triangle = StubTriangle;

    fn rasterize(
        &self,
        out: &mut StubTriangle,
        v0: Vec3,
        _st0: Vec2,
        v1: Vec3,
        _st1: Vec2,
        _v2: Vec3,
        _st2: Vec2,
    ) -> bool {
        if self.cull_all {
            return false;
        }
        out.tag = 0xC0FF_EE00;
        out.y_start = v0.y as u16;
        out.y_end = v1.y as u16;
        true
    }

    fn calc_line_increment(
        &self,
        out: &mut StubTriangle,
        input: &StubTriangle,
        y_start: u16,
        y_end: u16,
    ) -> bool {
        if input.y_end <= y_start || input.y_start >= y_end {
            return false;
        }
        *out = *input;
        true
    }
}

pub type TestDriver = Driver<256, MockBus, StubRasterizer>;

pub fn make_driver() -> (TestDriver, MockBus) {
    let bus = MockBus::new();
    let driver = Driver::new(bus.clone(), StubRasterizer::default(), DriverConfig::DEFAULT);
    (driver, bus)
}

pub fn make_driver_with_config(config: DriverConfig) -> (TestDriver, MockBus) {
    let bus = MockBus::new();
    let driver = Driver::new(bus.clone(), StubRasterizer::default(), config);
    (driver, bus)
}
