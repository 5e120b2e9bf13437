//! Driver for 24-series I2C EEPROM chips.

use crate::geometry::{Geometry, MAX_TRANSFER};
#[cfg(feature = "log")]
use crate::utils::HexSlice;
use crate::{BlockDevice, Error, Read, Storable, TwoWire};
use embedded_hal::blocking::delay::DelayMs;

/// Attempts at the address-set phase of a read before giving up.
pub const ADDRESS_SET_ATTEMPTS: u32 = 5;

/// Attempts at each page write before giving up.
pub const WRITE_ATTEMPTS: u32 = 5;

/// Delay after each failed address-set or page write attempt.
pub const RETRY_DELAY_MS: u32 = 100;

/// Address probes sent after a page write while waiting for the chip to
/// finish its internal write cycle.
pub const READY_POLL_ATTEMPTS: u32 = 10;

/// Driver for 24-series I2C EEPROM chips.
///
/// The chip answers with a NACK while an internal write cycle is in progress,
/// so failed transactions are retried a fixed number of times. Every
/// operation blocks until it is done.
///
/// # Type Parameters
///
/// * **`W`**: The bus the chip is attached to. Pass `&mut bus` to keep using
///   the bus for other devices; the driver never shuts it down.
/// * **`D`**: Delay provider used between retries.
#[derive(Debug)]
pub struct Eeprom24<W, D> {
    wire: W,
    delay: D,
    geometry: Geometry,
}

impl<W: TwoWire, D: DelayMs<u32>> Eeprom24<W, D> {
    /// Creates a new 24-series EEPROM driver.
    ///
    /// # Parameters
    ///
    /// * **`wire`**: The I2C bus.
    /// * **`delay`**: Used to wait between retries.
    /// * **`geometry`**: Chip layout, e.g. [`Geometry::M24X01`].
    pub fn new(wire: W, delay: D, geometry: Geometry) -> Self {
        Self {
            wire,
            delay,
            geometry,
        }
    }

    /// Initializes the bus. Call once before reading or writing.
    pub fn begin(&mut self) {
        self.wire.begin();
    }

    /// Size of the memory in bytes.
    pub fn length(&self) -> usize {
        self.geometry.memory_size()
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Returns the bus and delay so they can be used elsewhere.
    pub fn free(self) -> (W, D) {
        (self.wire, self.delay)
    }

    /// Reads memory contents into `buf`, starting at `addr`.
    ///
    /// `addr` wraps around at the end of the memory, and so does the read.
    /// On a short read `buf` is left partially filled.
    pub fn read(&mut self, addr: usize, buf: &mut [u8]) -> Result<(), Error<W::Error>> {
        let mut addr = self.geometry.wrap(addr);
        let i2c_addr = self.geometry.i2c_address(addr);
        let offset = self.geometry.block_offset(addr);
        trace!(
            "read: addr={} i2c=0x{:02x} offset={} len={}",
            addr,
            i2c_addr,
            offset,
            buf.len()
        );

        let wire = &mut self.wire;
        retry(&mut self.delay, ADDRESS_SET_ATTEMPTS, || {
            wire.begin_transmission(i2c_addr);
            wire.write(offset);
            wire.end_transmission(false)
        })
        .map_err(|e| {
            error!("read: setting address {} failed", addr);
            Error::AddressSet(e)
        })?;

        for chunk in buf.chunks_mut(MAX_TRANSFER) {
            let requested = chunk.len();
            let i2c_addr = self.geometry.i2c_address(addr);
            self.wire.request_from(i2c_addr, requested, true);

            let available = self.wire.available();
            if available < requested {
                error!(
                    "read: requested {} bytes at {}, got {}",
                    requested, addr, available
                );
                return Err(Error::ShortRead {
                    requested,
                    available,
                });
            }

            for (i, byte) in chunk.iter_mut().enumerate() {
                *byte = self.wire.read().ok_or(Error::ShortRead {
                    requested,
                    available: i,
                })?;
            }
            addr = self.geometry.wrap(addr + requested);
        }

        Ok(())
    }

    /// Writes `data` to memory, starting at `addr`.
    ///
    /// The data is split on page boundaries, and each page write waits for
    /// the chip's write cycle before the next one is sent. `addr` wraps
    /// around at the end of the memory, and so does the write.
    ///
    /// If a page write fails, the pages before it have been written and no
    /// further pages are attempted.
    ///
    /// Returning `Ok` does not guarantee that the write cycle of the last
    /// page has finished: if the chip is still busy after
    /// [`READY_POLL_ATTEMPTS`] probes this only logs a warning. Use
    /// [`wait_ready`](Self::wait_ready) when that matters.
    pub fn write(&mut self, addr: usize, data: &[u8]) -> Result<(), Error<W::Error>> {
        let mut addr = self.geometry.wrap(addr);
        let mut data = data;
        trace!("write: addr={} len={}", addr, data.len());

        while !data.is_empty() {
            let i2c_addr = self.geometry.i2c_address(addr);
            let offset = self.geometry.block_offset(addr);
            // pages never span blocks, so splitting on pages splits on blocks too
            let len = data.len().min(self.geometry.page_remaining(addr));
            let (chunk, rest) = data.split_at(len);
            trace!(
                "write: i2c=0x{:02x} offset={} data={:?}",
                i2c_addr,
                offset,
                HexSlice(chunk)
            );

            let wire = &mut self.wire;
            retry(&mut self.delay, WRITE_ATTEMPTS, || {
                wire.begin_transmission(i2c_addr);
                wire.write(offset);
                for &byte in chunk {
                    wire.write(byte);
                }
                wire.end_transmission(true)
            })
            .map_err(|e| {
                error!("write: {} bytes at {} failed", len, addr);
                Error::Write(e)
            })?;

            if !self.poll_ready(i2c_addr) {
                warn!(
                    "write: device 0x{:02x} still busy after {} polls",
                    i2c_addr, READY_POLL_ATTEMPTS
                );
            }

            addr = self.geometry.wrap(addr + len);
            data = rest;
        }

        Ok(())
    }

    /// Fills the whole memory with zeroes.
    ///
    /// This writes every page in turn and takes a while. Stops at the first
    /// page that fails.
    pub fn erase(&mut self) -> Result<(), Error<W::Error>> {
        let zeroes = [0; MAX_TRANSFER];
        let page_size = self.geometry.page_size();
        for page in (0..self.length()).step_by(page_size) {
            self.write(page, &zeroes[..page_size])?;
        }
        Ok(())
    }

    /// Reads a value stored at `addr`.
    pub fn get<T: Storable>(&mut self, addr: usize) -> Result<T, Error<W::Error>> {
        let mut bytes = T::blank();
        self.read(addr, bytes.as_mut())?;
        Ok(T::from_bytes(&bytes))
    }

    /// Stores `value` at `addr`.
    pub fn put<T: Storable>(&mut self, addr: usize, value: &T) -> Result<(), Error<W::Error>> {
        self.write(addr, value.to_bytes().as_ref())
    }

    /// Waits for the write cycle of the block containing `addr` to finish.
    ///
    /// Unlike [`write`](Self::write), this reports a chip that stays busy as
    /// [`Error::NotReady`].
    pub fn wait_ready(&mut self, addr: usize) -> Result<(), Error<W::Error>> {
        let i2c_addr = self.geometry.i2c_address(addr);
        if self.poll_ready(i2c_addr) {
            Ok(())
        } else {
            Err(Error::NotReady)
        }
    }

    fn poll_ready(&mut self, i2c_addr: u8) -> bool {
        for attempt in 1..=READY_POLL_ATTEMPTS {
            self.wire.begin_transmission(i2c_addr);
            if self.wire.end_transmission(true).is_ok() {
                return true;
            }
            trace!("poll_ready: 0x{:02x} busy, attempt {}", i2c_addr, attempt);
        }
        false
    }
}

/// Runs `op` up to `attempts` times, delaying after every failure.
fn retry<D, E>(
    delay: &mut D,
    attempts: u32,
    mut op: impl FnMut() -> Result<(), E>,
) -> Result<(), E>
where
    D: DelayMs<u32>,
{
    let mut attempt = 1;
    loop {
        match op() {
            Ok(()) => return Ok(()),
            Err(e) => {
                trace!("attempt {}/{} not acknowledged", attempt, attempts);
                delay.delay_ms(RETRY_DELAY_MS);
                if attempt >= attempts {
                    return Err(e);
                }
                attempt += 1;
            }
        }
    }
}

impl<W: TwoWire, D: DelayMs<u32>> Read<usize, W::Error> for Eeprom24<W, D> {
    /// Reads memory contents into `buf`, starting at `addr`.
    ///
    /// See [`Eeprom24::read`].
    fn read(&mut self, addr: usize, buf: &mut [u8]) -> Result<(), Error<W::Error>> {
        Eeprom24::read(self, addr, buf)
    }
}

impl<W: TwoWire, D: DelayMs<u32>> BlockDevice<usize, W::Error> for Eeprom24<W, D> {
    fn erase_all(&mut self) -> Result<(), Error<W::Error>> {
        self.erase()
    }

    fn write_bytes(&mut self, addr: usize, data: &[u8]) -> Result<(), Error<W::Error>> {
        Eeprom24::write(self, addr, data)
    }
}
