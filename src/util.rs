use log::{error, info};

use structopt::StructOpt;

use linux_embedded_hal::{Delay, I2cdev};

use simplelog::{LevelFilter, TermLogger, TerminalMode};

use ihex::{Reader, Record};

use i2c_eeprom::{series24::Eeprom24, Geometry, HalWire};

use std::fmt::Debug;

type Error = Box<dyn std::error::Error>;
type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, PartialEq, StructOpt)]
struct Options {
    #[structopt(subcommand)]
    operation: Operations,

    /// I2C device
    #[structopt(long, default_value = "/dev/i2c-1", env = "I2C_DEV")]
    i2c_dev: String,

    /// Configure log level
    #[structopt(long, default_value = "info", env = "LOG_LEVEL")]
    log_level: LevelFilter,
}

#[derive(Debug, PartialEq, StructOpt)]
pub enum Operations {
    /// Show device geometry and check that it responds
    Info,
    /// Read data from the device
    Read {
        /// EEPROM address for read start in hex
        #[structopt(parse(try_from_str = parse_hex))]
        address: usize,
        /// Length of read in bytes
        #[structopt()]
        length: usize,
    },
    /// Write data starting at the specified address
    Write {
        /// EEPROM address for write start in hex
        #[structopt(parse(try_from_str = parse_hex))]
        address: usize,

        // Data to write in hexadecimal
        #[structopt(long)]
        data: HexData,
    },
    /// Dump EEPROM contents into a hex file
    Dump {
        /// EEPROM address for read start in hex
        #[structopt(parse(try_from_str = parse_hex))]
        address: usize,

        /// Length of read in bytes
        #[structopt()]
        length: usize,

        /// Output ihex file
        #[structopt(long, default_value = "dump.ihex")]
        file: String,
    },
    /// Load EEPROM contents from a hex file
    Load {
        /// Input ihex file
        file: String,
    },
    /// Fill the whole device with zeroes
    Erase,
}

#[derive(Debug, PartialEq)]
pub struct HexData(Vec<u8>);

impl std::str::FromStr for HexData {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        hex::decode(s).map(HexData)
    }
}

fn parse_hex(s: &str) -> std::result::Result<usize, std::num::ParseIntError> {
    usize::from_str_radix(s, 16)
}

trait ResultExt<T, E> {
    fn dbg_err(self, msg: &str) -> Result<T>;
}

impl<T, E: Debug> ResultExt<T, E> for std::result::Result<T, E> {
    fn dbg_err(self, msg: &str) -> Result<T> {
        self.map_err(|e| format!("{}: {:?}", msg, e).into())
    }
}

fn main() -> Result<()> {
    // Load options
    let opts = Options::from_args();

    // Setup logging
    TermLogger::init(
        opts.log_level,
        simplelog::Config::default(),
        TerminalMode::Mixed,
    )
    .dbg_err("logger")?;

    // Open the I2C bus
    let i2c = I2cdev::new(&opts.i2c_dev).dbg_err("opening I2C device")?;

    let mut eeprom = Eeprom24::new(HalWire::new(i2c), Delay, Geometry::M24X01);
    eeprom.begin();

    if let Err(e) = run(&mut eeprom, opts.operation) {
        error!("{}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn run(eeprom: &mut Eeprom24<HalWire<I2cdev>, Delay>, operation: Operations) -> Result<()> {
    match operation {
        Operations::Info => {
            let geometry = eeprom.geometry();
            info!(
                "{} bytes, {} block(s) at 0x{:02x}, {} byte pages",
                eeprom.length(),
                geometry.num_blocks(),
                geometry.device_address(),
                geometry.page_size()
            );

            eeprom.wait_ready(0).dbg_err("device not responding")?;
            info!("Device responding");
        }
        Operations::Read { address, length } => {
            info!("Reading {} bytes from address 0x{:02x}", length, address);

            let mut buff = vec![0u8; length];
            eeprom.read(address, &mut buff).dbg_err("read")?;

            info!("Read: {:02x?}", buff);
        }
        Operations::Write { address, data } => {
            info!("Writing {} bytes to address 0x{:02x}", data.0.len(), address);

            eeprom.write(address, &data.0).dbg_err("write")?;

            info!("Write complete");
        }
        Operations::Erase => {
            info!("Erasing {} bytes", eeprom.length());

            eeprom.erase().dbg_err("erase")?;

            info!("Erase complete");
        }
        Operations::Dump {
            address,
            length,
            file,
        } => {
            info!(
                "Reading {} bytes from address 0x{:02x} to file {}",
                length, address, &file
            );

            let mut buff = vec![0u8; length];
            eeprom.read(address, &mut buff).dbg_err("read")?;

            let mut records = Vec::new();
            for (c, chunk) in buff.chunks(16).enumerate() {
                let offset = eeprom.geometry().wrap(address + c * 16);
                records.push(Record::Data {
                    offset: offset as u16,
                    value: chunk.to_vec(),
                });
            }
            records.push(Record::EndOfFile);

            let data = ihex::create_object_file_representation(&records).dbg_err("ihex")?;

            std::fs::write(&file, data)?;

            info!("Dump complete");
        }
        Operations::Load { file } => {
            info!("Loading file {}", file);

            let data = std::fs::read_to_string(&file)?;

            for record in Reader::new(&data) {
                match record {
                    Ok(Record::Data { offset, value }) => {
                        info!("Writing {} bytes at address 0x{:02x}", value.len(), offset);
                        eeprom.write(offset as usize, &value).dbg_err("write")?;
                    }
                    Ok(Record::EndOfFile) => (),
                    Err(e) => return Err(format!("reader error: {:?}", e).into()),
                    other => return Err(format!("unrecognised record: {:?}", other).into()),
                }
            }

            info!("Load complete");
        }
    }

    Ok(())
}
