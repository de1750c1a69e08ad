//! modio Hardware Abstraction Layer
//!
//! This crate defines the hardware-facing traits the IO module is written
//! against. A board support package implements them on top of its GPIO,
//! ADC and button-debounce services.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Host application core (scheduler, LoRa)│
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  modio-core (slot table, IO module)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  modio-hal (this crate - traits)        │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  board GPIO/  │       │ modio-drivers │
//! │  ADC driver   │       │  (debouncer)  │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::GpioDriver`] - Digital/analog pin configuration and access
//! - [`button::ButtonManager`] - Button registration with a debounce service
//! - [`button::ButtonEventSink`] - Receiver of debounced button events

#![no_std]
#![deny(unsafe_code)]

pub mod button;
pub mod gpio;

// Re-export key traits at crate root for convenience
pub use button::{ButtonError, ButtonEvent, ButtonEventSink, ButtonManager, ButtonState, PressType};
pub use gpio::{GpioDriver, GpioError, IdlePolicy, LowPowerMode, PinId, Pull};
