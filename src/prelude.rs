//! Glob-import this to bring the driver traits into scope.

pub use crate::BlockDevice as _;
pub use crate::Read as _;
pub use crate::Storable as _;
pub use crate::TwoWire as _;
