//! Provides `log` macros if the `log` feature is enabled, or no-op macros otherwise.

#[cfg(feature = "log")]
macro_rules! trace {
    ($($arg:tt)*) => {
        ::log::trace!($($arg)*);
    };
}

#[cfg(feature = "log")]
macro_rules! debug {
    ($($arg:tt)*) => {
        ::log::debug!($($arg)*);
    };
}

#[cfg(feature = "log")]
macro_rules! warn {
    ($($arg:tt)*) => {
        ::log::warn!($($arg)*);
    };
}

#[cfg(feature = "log")]
macro_rules! error {
    ($($arg:tt)*) => {
        ::log::error!($($arg)*);
    };
}

#[cfg(not(feature = "log"))]
macro_rules! trace {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "log"))]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "log"))]
macro_rules! warn {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "log"))]
macro_rules! error {
    ($($arg:tt)*) => {};
}
