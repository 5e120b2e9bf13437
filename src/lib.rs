//! An [`embedded-hal`]-based driver for 24-series I2C EEPROM chips.
//!
//! The driver turns arbitrary byte-range reads and writes into bus
//! transactions that respect the chip's page size, its block addressing
//! scheme and the 32-byte transaction limit of common I2C peripherals. Busy
//! devices (still finishing an internal write cycle) are retried a bounded
//! number of times.
//!
//! Currently the 24xx01 (128 bytes, one block, 8-byte pages) is described by
//! [`Geometry::M24X01`]; other members of the family can be described with
//! [`Geometry::new`].
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal/

#![doc(html_root_url = "https://docs.rs/i2c-eeprom/0.1.0")]
#![warn(missing_debug_implementations, rust_2018_idioms)]
#![cfg_attr(not(test), no_std)]

#[macro_use]
mod log;
mod error;
pub mod geometry;
#[cfg(test)]
mod mock;
pub mod prelude;
pub mod series24;
mod storable;
#[cfg(feature = "log")]
mod utils;
pub mod wire;

pub use crate::error::Error;
pub use crate::geometry::Geometry;
pub use crate::storable::Storable;
pub use crate::wire::{HalWire, TwoWire};

/// A trait for reading operations from a memory chip.
pub trait Read<Addr, E> {
    /// Reads bytes from a memory chip.
    ///
    /// # Parameters
    /// * `addr`: The address to start reading at.
    /// * `buf`: The buffer to read `buf.len()` bytes into.
    fn read(&mut self, addr: Addr, buf: &mut [u8]) -> Result<(), Error<E>>;
}

/// A trait for writing and erasing operations on a memory chip.
pub trait BlockDevice<Addr, E> {
    /// Erases the memory chip fully.
    ///
    /// EEPROMs have no erase command, so this writes zeroes over the whole
    /// array page by page. This takes a while.
    fn erase_all(&mut self) -> Result<(), Error<E>>;

    /// Writes bytes onto the memory chip, splitting them on page boundaries.
    ///
    /// # Parameters
    /// * `addr`: The address to write to.
    /// * `data`: The bytes to write to `addr`.
    fn write_bytes(&mut self, addr: Addr, data: &[u8]) -> Result<(), Error<E>>;
}
