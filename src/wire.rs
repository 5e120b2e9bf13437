//! The two-wire bus the EEPROM hangs off.
//!
//! [`TwoWire`] is modelled on the transaction-oriented interface of the
//! Arduino `Wire` library, which is what 24-series drivers are usually written
//! against. [`HalWire`] provides it on top of any blocking `embedded-hal` I2C
//! peripheral.

use crate::geometry::MAX_TRANSFER;
use core::mem;
use embedded_hal::blocking::i2c;

/// A transaction-oriented I2C master.
pub trait TwoWire {
    /// Error reported when a transaction is not acknowledged.
    type Error;

    /// Brings up the bus. Calling this more than once is harmless.
    fn begin(&mut self);

    /// Starts queueing a write transaction to `address` (7 bits).
    fn begin_transmission(&mut self, address: u8);

    /// Queues one byte. Returns the number of bytes queued, 0 if the
    /// transmit buffer is full.
    fn write(&mut self, byte: u8) -> usize;

    /// Sends the queued transaction. With `stop == false` the bus is kept for
    /// a repeated start.
    ///
    /// A transaction with no queued bytes only probes whether the device
    /// acknowledges its address.
    fn end_transmission(&mut self, stop: bool) -> Result<(), Self::Error>;

    /// Reads up to `count` bytes from `address` into the receive buffer and
    /// returns how many were received.
    fn request_from(&mut self, address: u8, count: usize, stop: bool) -> usize;

    /// Number of received bytes not yet consumed by [`read`](TwoWire::read).
    fn available(&mut self) -> usize;

    /// Takes the next received byte.
    fn read(&mut self) -> Option<u8>;
}

impl<T: TwoWire + ?Sized> TwoWire for &mut T {
    type Error = T::Error;

    fn begin(&mut self) {
        (**self).begin()
    }

    fn begin_transmission(&mut self, address: u8) {
        (**self).begin_transmission(address)
    }

    fn write(&mut self, byte: u8) -> usize {
        (**self).write(byte)
    }

    fn end_transmission(&mut self, stop: bool) -> Result<(), Self::Error> {
        (**self).end_transmission(stop)
    }

    fn request_from(&mut self, address: u8, count: usize, stop: bool) -> usize {
        (**self).request_from(address, count, stop)
    }

    fn available(&mut self) -> usize {
        (**self).available()
    }

    fn read(&mut self) -> Option<u8> {
        (**self).read()
    }
}

/// [`TwoWire`] adapter for blocking `embedded-hal` I2C masters.
///
/// Buffers one transaction in each direction, [`MAX_TRANSFER`] bytes each.
/// Blocking `embedded-hal` writes always finish with a stop condition, so the
/// `stop` flag is ignored. 24-series chips keep their address pointer across
/// a stop, which makes the address-set phase work either way.
#[derive(Debug)]
pub struct HalWire<I2C> {
    i2c: I2C,
    address: u8,
    tx: [u8; MAX_TRANSFER],
    tx_len: usize,
    rx: [u8; MAX_TRANSFER],
    rx_len: usize,
    rx_pos: usize,
}

impl<I2C> HalWire<I2C> {
    /// Wraps an I2C master. It must already be configured (pins, clock).
    pub fn new(i2c: I2C) -> Self {
        Self {
            i2c,
            address: 0,
            tx: [0; MAX_TRANSFER],
            tx_len: 0,
            rx: [0; MAX_TRANSFER],
            rx_len: 0,
            rx_pos: 0,
        }
    }

    /// Returns the I2C master so it can be used elsewhere.
    pub fn free(self) -> I2C {
        self.i2c
    }
}

impl<I2C, E> TwoWire for HalWire<I2C>
where
    I2C: i2c::Write<Error = E> + i2c::Read<Error = E>,
{
    type Error = E;

    fn begin(&mut self) {
        // `embedded-hal` peripherals are initialized on construction
        self.tx_len = 0;
        self.rx_len = 0;
        self.rx_pos = 0;
    }

    fn begin_transmission(&mut self, address: u8) {
        self.address = address;
        self.tx_len = 0;
    }

    fn write(&mut self, byte: u8) -> usize {
        if self.tx_len == MAX_TRANSFER {
            return 0;
        }
        self.tx[self.tx_len] = byte;
        self.tx_len += 1;
        1
    }

    fn end_transmission(&mut self, _stop: bool) -> Result<(), E> {
        let len = mem::replace(&mut self.tx_len, 0);
        i2c::Write::write(&mut self.i2c, self.address, &self.tx[..len])
    }

    fn request_from(&mut self, address: u8, count: usize, _stop: bool) -> usize {
        let count = count.min(MAX_TRANSFER);
        self.rx_pos = 0;
        self.rx_len = match i2c::Read::read(&mut self.i2c, address, &mut self.rx[..count]) {
            Ok(()) => count,
            Err(_) => {
                debug!("read of {} bytes from 0x{:02x} not acknowledged", count, address);
                0
            }
        };
        self.rx_len
    }

    fn available(&mut self) -> usize {
        self.rx_len - self.rx_pos
    }

    fn read(&mut self) -> Option<u8> {
        if self.rx_pos == self.rx_len {
            return None;
        }
        let byte = self.rx[self.rx_pos];
        self.rx_pos += 1;
        Some(byte)
    }
}
