use core::fmt;

/// Formats a byte slice as space-separated hex for trace logs, e.g. `de ad 00`.
pub struct HexSlice<'a>(pub &'a [u8]);

impl fmt::Debug for HexSlice<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut bytes = self.0.iter();
        if let Some(first) = bytes.next() {
            write!(f, "{:02x}", first)?;
        }
        for byte in bytes {
            write!(f, " {:02x}", byte)?;
        }
        Ok(())
    }
}
