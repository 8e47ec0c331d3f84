//! The core module holds the device abstraction, settings and the error type.

pub mod device;
pub mod error;
pub mod settings;
pub mod traits;
