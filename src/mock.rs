//! Simulated 24-series chip and test collaborators.

use crate::geometry::{Geometry, MAX_TRANSFER};
use crate::wire::TwoWire;
use embedded_hal::blocking::delay::DelayMs;
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nack;

/// A bus transaction as seen by the chip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transaction {
    /// Write transaction: I2C address, bytes after the address, stop flag.
    Write(u8, Vec<u8>, bool),
    /// Read request: I2C address, requested byte count.
    Request(u8, usize),
}

/// A 24-series EEPROM on a bus, with fault injection.
///
/// Behaves like the real part: a one-byte write sets the address pointer,
/// longer writes program bytes that wrap within the addressed page, reads
/// roll over at the end of the array.
#[derive(Debug)]
pub struct MockEeprom {
    pub geometry: Geometry,
    pub memory: Vec<u8>,
    pub transactions: Vec<Transaction>,
    /// NACK this many address-set transactions.
    pub nack_address_sets: usize,
    /// NACK this many page writes.
    pub nack_writes: usize,
    /// NACK this many ready polls.
    pub nack_polls: usize,
    /// Deliver this many bytes fewer than requested.
    pub short_by: usize,
    pub begun: usize,
    pointer: usize,
    tx: Option<(u8, Vec<u8>)>,
    rx: VecDeque<u8>,
}

impl MockEeprom {
    pub fn new(geometry: Geometry) -> Self {
        MockEeprom {
            geometry,
            memory: vec![0xff; geometry.memory_size()],
            transactions: Vec::new(),
            nack_address_sets: 0,
            nack_writes: 0,
            nack_polls: 0,
            short_by: 0,
            begun: 0,
            pointer: 0,
            tx: None,
            rx: VecDeque::new(),
        }
    }

    /// Page writes issued so far, as (memory address, payload).
    pub fn page_writes(&self) -> Vec<(usize, Vec<u8>)> {
        self.transactions
            .iter()
            .filter_map(|t| match t {
                Transaction::Write(addr, bytes, _) if bytes.len() > 1 => Some((
                    self.block_base(*addr) + bytes[0] as usize,
                    bytes[1..].to_vec(),
                )),
                _ => None,
            })
            .collect()
    }

    /// Byte counts of all read requests issued so far.
    pub fn requests(&self) -> Vec<usize> {
        self.transactions
            .iter()
            .filter_map(|t| match t {
                Transaction::Request(_, count) => Some(*count),
                _ => None,
            })
            .collect()
    }

    fn responds_to(&self, address: u8) -> bool {
        let base = self.geometry.device_address();
        address >= base && ((address - base) as usize) < self.geometry.num_blocks()
    }

    fn block_base(&self, address: u8) -> usize {
        (address - self.geometry.device_address()) as usize * self.geometry.block_size()
    }

    fn take(counter: &mut usize) -> bool {
        if *counter > 0 {
            *counter -= 1;
            true
        } else {
            false
        }
    }
}

impl TwoWire for MockEeprom {
    type Error = Nack;

    fn begin(&mut self) {
        self.begun += 1;
    }

    fn begin_transmission(&mut self, address: u8) {
        self.tx = Some((address, Vec::new()));
    }

    fn write(&mut self, byte: u8) -> usize {
        match &mut self.tx {
            Some((_, bytes)) if bytes.len() < MAX_TRANSFER => {
                bytes.push(byte);
                1
            }
            _ => 0,
        }
    }

    fn end_transmission(&mut self, stop: bool) -> Result<(), Nack> {
        let (address, bytes) = self.tx.take().expect("end_transmission without begin");
        self.transactions
            .push(Transaction::Write(address, bytes.clone(), stop));
        if !self.responds_to(address) {
            return Err(Nack);
        }

        let nacked = match bytes.len() {
            0 => Self::take(&mut self.nack_polls),
            1 => Self::take(&mut self.nack_address_sets),
            _ => Self::take(&mut self.nack_writes),
        };
        if nacked {
            return Err(Nack);
        }

        if let Some((&offset, data)) = bytes.split_first() {
            self.pointer = self.block_base(address) + offset as usize;
            let page = self.geometry.page_size();
            let page_base = self.pointer & !(page - 1);
            for (i, &byte) in data.iter().enumerate() {
                let addr = page_base + ((self.pointer + i) & (page - 1));
                self.memory[addr] = byte;
            }
        }
        Ok(())
    }

    fn request_from(&mut self, address: u8, count: usize, _stop: bool) -> usize {
        self.transactions.push(Transaction::Request(address, count));
        self.rx.clear();
        if !self.responds_to(address) {
            return 0;
        }
        let delivered = count.min(MAX_TRANSFER).saturating_sub(self.short_by);
        for _ in 0..delivered {
            self.rx.push_back(self.memory[self.pointer]);
            self.pointer = (self.pointer + 1) % self.memory.len();
        }
        delivered
    }

    fn available(&mut self) -> usize {
        self.rx.len()
    }

    fn read(&mut self) -> Option<u8> {
        self.rx.pop_front()
    }
}

/// Records requested delays instead of sleeping.
#[derive(Debug, Default)]
pub struct RecordingDelay {
    pub calls: Vec<u32>,
}

impl DelayMs<u32> for RecordingDelay {
    fn delay_ms(&mut self, ms: u32) {
        self.calls.push(ms);
    }
}

#[cfg(feature = "log")]
pub mod logger {
    //! Captures log records emitted on the current thread.

    use ::log::{Level, LevelFilter, Log, Metadata, Record};
    use std::cell::RefCell;
    use std::sync::Once;

    thread_local! {
        static RECORDS: RefCell<Vec<(Level, String)>> = RefCell::new(Vec::new());
    }

    struct Capture;

    impl Log for Capture {
        fn enabled(&self, _: &Metadata<'_>) -> bool {
            true
        }

        fn log(&self, record: &Record<'_>) {
            RECORDS.with(|r| {
                r.borrow_mut()
                    .push((record.level(), record.args().to_string()))
            });
        }

        fn flush(&self) {}
    }

    static CAPTURE: Capture = Capture;
    static INIT: Once = Once::new();

    /// Installs the capturing logger and clears this thread's records.
    pub fn capture() {
        INIT.call_once(|| {
            ::log::set_logger(&CAPTURE).expect("logger already set");
            ::log::set_max_level(LevelFilter::Trace);
        });
        RECORDS.with(|r| r.borrow_mut().clear());
    }

    /// Messages logged on this thread at exactly `level`.
    pub fn messages(level: Level) -> Vec<String> {
        RECORDS.with(|r| {
            r.borrow()
                .iter()
                .filter(|(l, _)| *l == level)
                .map(|(_, m)| m.clone())
                .collect()
        })
    }
}
