//! Chip geometry of 24-series EEPROMs.
//!
//! A 24-series chip answers on a range of 7-bit I2C addresses. The upper bits
//! of a memory address select the *block* and are folded into the low bits of
//! the I2C address; the lower `block_bits` bits are sent as the one-byte word
//! address. Within a block, the array is divided into *pages*, which are the
//! unit of the chip's internal write cycle.

/// Maximum number of bytes moved by a single bus transaction.
///
/// This is the buffer size of the common I2C peripherals (and of the Arduino
/// `Wire` library). A page write also sends the word address, so pages must be
/// smaller than this.
pub const MAX_TRANSFER: usize = 32;

/// Size and addressing parameters of a 24-series EEPROM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    device_address: u8,
    block_bits: u32,
    num_blocks: usize,
    page_size: usize,
}

impl Geometry {
    /// 24AA01 / 24LC01B / 24FC01: 128 bytes in one block, 8-byte pages,
    /// answering at `0x50`.
    pub const M24X01: Geometry = Geometry::new(0x50, 7, 1, 8);

    /// Describes a chip.
    ///
    /// # Parameters
    ///
    /// * **`device_address`**: 7-bit base I2C address, without the R/W bit.
    /// * **`block_bits`**: Number of word address bits, at most 8.
    /// * **`num_blocks`**: Number of blocks, selected through the low bits of
    ///   the I2C address.
    /// * **`page_size`**: Page write buffer size in bytes.
    ///
    /// # Panics
    ///
    /// Panics (at compile time when used in a constant) if the parameters do
    /// not describe a chip this driver can address.
    pub const fn new(
        device_address: u8,
        block_bits: u32,
        num_blocks: usize,
        page_size: usize,
    ) -> Self {
        assert!(device_address < 0x80, "I2C address must fit in 7 bits");
        assert!(block_bits >= 1 && block_bits <= 8, "word address is one byte");
        assert!(num_blocks.is_power_of_two(), "block count must be a power of two");
        assert!(
            ((device_address as usize) & (num_blocks - 1)) == 0,
            "block select bits overlap the base address"
        );
        assert!(
            (device_address as usize | (num_blocks - 1)) < 0x80,
            "block select bits exceed the 7-bit address"
        );
        assert!(page_size.is_power_of_two(), "page size must be a power of two");
        assert!(page_size <= (1 << block_bits), "pages must not span blocks");
        assert!(page_size < MAX_TRANSFER, "page plus word address must fit a transfer");

        Geometry {
            device_address,
            block_bits,
            num_blocks,
            page_size,
        }
    }

    /// The 7-bit I2C address of the first block.
    pub const fn device_address(&self) -> u8 {
        self.device_address
    }

    /// Number of memory address bits sent as the word address.
    pub const fn block_bits(&self) -> u32 {
        self.block_bits
    }

    pub const fn num_blocks(&self) -> usize {
        self.num_blocks
    }

    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    pub const fn block_size(&self) -> usize {
        1 << self.block_bits
    }

    /// Total capacity in bytes.
    pub const fn memory_size(&self) -> usize {
        self.block_size() * self.num_blocks
    }

    /// Maps any address into the array. Addresses past the end mirror the
    /// start of the chip.
    pub const fn wrap(&self, addr: usize) -> usize {
        addr & (self.memory_size() - 1)
    }

    /// The I2C address that selects the block containing `addr`.
    pub const fn i2c_address(&self, addr: usize) -> u8 {
        (self.wrap(addr) >> self.block_bits) as u8 | self.device_address
    }

    /// The word address of `addr` inside its block.
    pub const fn block_offset(&self, addr: usize) -> u8 {
        (addr & (self.block_size() - 1)) as u8
    }

    pub const fn page_offset(&self, addr: usize) -> usize {
        addr & (self.page_size - 1)
    }

    /// Bytes left between `addr` and the end of its page.
    pub const fn page_remaining(&self, addr: usize) -> usize {
        self.page_size - self.page_offset(addr)
    }
}
