/// A value with a fixed-size byte representation that can be stored in the
/// EEPROM with [`Eeprom24::put`] and loaded back with [`Eeprom24::get`].
///
/// The representation is whatever the implementation chooses; nothing besides
/// the bytes is stored, so changing a type's layout makes previously stored
/// values unreadable. The provided implementations use little-endian byte
/// order.
///
/// Aggregates implement this by concatenating their fields:
///
/// ```
/// use i2c_eeprom::Storable;
///
/// struct Settings {
///     volume: u16,
///     muted: bool,
/// }
///
/// impl Storable for Settings {
///     type Bytes = [u8; 3];
///
///     fn blank() -> [u8; 3] {
///         [0; 3]
///     }
///
///     fn to_bytes(&self) -> [u8; 3] {
///         let v = self.volume.to_le_bytes();
///         [v[0], v[1], self.muted as u8]
///     }
///
///     fn from_bytes(bytes: &[u8; 3]) -> Self {
///         Settings {
///             volume: u16::from_le_bytes([bytes[0], bytes[1]]),
///             muted: bytes[2] != 0,
///         }
///     }
/// }
/// ```
///
/// [`Eeprom24::put`]: crate::series24::Eeprom24::put
/// [`Eeprom24::get`]: crate::series24::Eeprom24::get
pub trait Storable: Sized {
    /// The byte representation, usually `[u8; N]`.
    type Bytes: AsRef<[u8]> + AsMut<[u8]>;

    /// A zeroed buffer to read a value into.
    fn blank() -> Self::Bytes;

    fn to_bytes(&self) -> Self::Bytes;

    fn from_bytes(bytes: &Self::Bytes) -> Self;
}

macro_rules! impl_storable {
    ($($ty:ty => $n:expr),* $(,)?) => {
        $(
            impl Storable for $ty {
                type Bytes = [u8; $n];

                fn blank() -> [u8; $n] {
                    [0; $n]
                }

                fn to_bytes(&self) -> [u8; $n] {
                    self.to_le_bytes()
                }

                fn from_bytes(bytes: &[u8; $n]) -> Self {
                    <$ty>::from_le_bytes(*bytes)
                }
            }
        )*
    };
}

impl_storable! {
    u8 => 1, u16 => 2, u32 => 4, u64 => 8,
    i8 => 1, i16 => 2, i32 => 4, i64 => 8,
    f32 => 4, f64 => 8,
}

impl Storable for bool {
    type Bytes = [u8; 1];

    fn blank() -> [u8; 1] {
        [0]
    }

    fn to_bytes(&self) -> [u8; 1] {
        [*self as u8]
    }

    fn from_bytes(bytes: &[u8; 1]) -> Self {
        bytes[0] != 0
    }
}

/// Raw byte arrays, e.g. fixed-size string buffers.
impl<const N: usize> Storable for [u8; N] {
    type Bytes = [u8; N];

    fn blank() -> [u8; N] {
        [0; N]
    }

    fn to_bytes(&self) -> [u8; N] {
        *self
    }

    fn from_bytes(bytes: &[u8; N]) -> Self {
        *bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn little_endian_layout() {
        assert_eq!(0x1234_5678u32.to_bytes(), [0x78, 0x56, 0x34, 0x12]);
        assert_eq!((-2i16).to_bytes(), [0xfe, 0xff]);
        assert_eq!(u64::from_bytes(&[1, 0, 0, 0, 0, 0, 0, 0]), 1);
    }

    #[test]
    fn floats_keep_bits() {
        let v = -1.5e-3f64;
        assert_eq!(f64::from_bytes(&v.to_bytes()).to_bits(), v.to_bits());
        assert!(f32::from_bytes(&f32::NAN.to_bytes()).is_nan());
    }

    #[test]
    fn bool_accepts_any_nonzero() {
        assert_eq!(true.to_bytes(), [1]);
        assert!(bool::from_bytes(&[0x80]));
        assert!(!bool::from_bytes(&[0]));
    }

    #[test]
    fn byte_arrays() {
        let name = *b"Alewife\0\0\0\0\0\0\0\0\0";
        assert_eq!(<[u8; 16]>::blank(), [0; 16]);
        assert_eq!(<[u8; 16]>::from_bytes(&name.to_bytes()), name);
    }
}
