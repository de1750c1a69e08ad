//! Driver implementations
//!
//! Concrete implementations of the `modio-hal` services that can be built
//! on top of a plain [`modio_hal::GpioDriver`]:
//!
//! - Software debounce button manager with press classification

#![no_std]
#![deny(unsafe_code)]

// This mod MUST go first, so that the others see its macros.
mod fmt;

pub mod button;

pub use button::Debouncer;
