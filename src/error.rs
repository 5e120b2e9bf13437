use core::fmt::{self, Debug, Display};

mod private {
    #[derive(Debug)]
    pub enum Private {}
}

/// The error type used by this library.
///
/// `E` is the error type of the underlying [`TwoWire`] bus. Errors that
/// survive a retry loop carry the bus error of the last attempt.
///
/// [`TwoWire`]: crate::TwoWire
pub enum Error<E> {
    /// The device did not acknowledge the address-set phase, even after
    /// retrying.
    ///
    /// This usually means the chip is not connected, or is stuck in a write
    /// cycle for far longer than its datasheet allows.
    AddressSet(E),

    /// The bus made fewer bytes available than were requested.
    ///
    /// The destination buffer may have been partially filled.
    ShortRead {
        /// Bytes requested in the failing transaction.
        requested: usize,
        /// Bytes the bus actually made available.
        available: usize,
    },

    /// A page write was not acknowledged, even after retrying.
    ///
    /// Pages preceding the failed one have been written; nothing after it.
    Write(E),

    /// The device did not finish its internal write cycle within the polling
    /// budget.
    ///
    /// Only returned by [`Eeprom24::wait_ready`]; regular writes log this
    /// condition and carry on.
    ///
    /// [`Eeprom24::wait_ready`]: crate::series24::Eeprom24::wait_ready
    NotReady,

    #[doc(hidden)]
    __NonExhaustive(private::Private),
}

impl<E: Debug> Debug for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::AddressSet(e) => write!(f, "Error::AddressSet({:?})", e),
            Error::ShortRead {
                requested,
                available,
            } => write!(
                f,
                "Error::ShortRead {{ requested: {}, available: {} }}",
                requested, available
            ),
            Error::Write(e) => write!(f, "Error::Write({:?})", e),
            Error::NotReady => f.write_str("Error::NotReady"),
            Error::__NonExhaustive(_) => unreachable!(),
        }
    }
}

impl<E: Display> Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::AddressSet(e) => write!(f, "device did not accept address: {}", e),
            Error::ShortRead {
                requested,
                available,
            } => write!(
                f,
                "short read: requested {} bytes, {} available",
                requested, available
            ),
            Error::Write(e) => write!(f, "page write failed: {}", e),
            Error::NotReady => f.write_str("device still busy with write cycle"),
            Error::__NonExhaustive(_) => unreachable!(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_short_read() {
        let err: Error<&str> = Error::ShortRead {
            requested: 32,
            available: 31,
        };
        assert_eq!(err.to_string(), "short read: requested 32 bytes, 31 available");
        assert_eq!(
            format!("{:?}", err),
            "Error::ShortRead { requested: 32, available: 31 }"
        );
    }

    #[test]
    fn display_carries_bus_error() {
        let err = Error::Write("nack");
        assert_eq!(err.to_string(), "page write failed: nack");
        assert_eq!(format!("{:?}", err), "Error::Write(\"nack\")");
    }
}
