//! GPIO and ADC abstractions
//!
//! Pins are addressed by number rather than by owned pin objects: the IO
//! module works from a configuration table and the board driver owns the
//! actual peripherals.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Physical pin number as used by the board's GPIO driver
pub type PinId = u8;

/// Pull resistor configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Pull {
    /// No pull, line floats (high impedance)
    #[default]
    None,
    /// Internal pull-up enabled
    Up,
    /// Internal pull-down enabled
    Down,
}

/// How a pin should be parked when the device lowers its power state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LowPowerMode {
    /// Keep the pin configured while the core dozes
    #[default]
    Doze,
    /// Keep the pin configured through deep sleep
    DeepSleep,
    /// Release the pin entirely when powering down
    Off,
}

/// Idle behaviour handed to the driver when defining a pin
///
/// The driver applies `idle` whenever the device enters a power state
/// deeper than `mode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IdlePolicy {
    /// Deepest power state in which the pin stays active
    pub mode: LowPowerMode,
    /// Pull applied once the pin is idled
    pub idle: Pull,
}

impl IdlePolicy {
    /// Active while dozing, high impedance when idle
    pub const DOZE_HIGH_Z: Self = Self {
        mode: LowPowerMode::Doze,
        idle: Pull::None,
    };
}

/// Errors reported by a GPIO driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpioError {
    /// Pin number does not exist on this board
    InvalidPin,
    /// Pin was used before being defined
    NotConfigured,
    /// Pin cannot be used in the requested mode (e.g. no ADC channel)
    Unsupported,
    /// Driver or peripheral failure
    Hardware,
}

/// Board GPIO/ADC driver
///
/// Values are exchanged as `u8`: digital levels are 0 or 1, analog reads
/// are scaled by the driver to the 0-255 range.
pub trait GpioDriver {
    /// Configure a pin as a digital input
    fn define_input(
        &mut self,
        name: &str,
        pin: PinId,
        pull: Pull,
        idle: IdlePolicy,
    ) -> Result<(), GpioError>;

    /// Configure a pin as an ADC input
    fn define_adc(&mut self, name: &str, pin: PinId, idle: IdlePolicy) -> Result<(), GpioError>;

    /// Configure a pin as a digital output driven to `initial`
    fn define_output(
        &mut self,
        name: &str,
        pin: PinId,
        initial: u8,
        idle: IdlePolicy,
    ) -> Result<(), GpioError>;

    /// Sample the digital level of a pin
    fn read(&mut self, pin: PinId) -> Result<u8, GpioError>;

    /// Sample the ADC channel behind a pin
    fn read_adc(&mut self, pin: PinId) -> Result<u8, GpioError>;

    /// Drive an output pin (any non-zero value is high)
    fn write(&mut self, pin: PinId, value: u8) -> Result<(), GpioError>;
}

impl<T: GpioDriver + ?Sized> GpioDriver for &mut T {
    fn define_input(
        &mut self,
        name: &str,
        pin: PinId,
        pull: Pull,
        idle: IdlePolicy,
    ) -> Result<(), GpioError> {
        (**self).define_input(name, pin, pull, idle)
    }

    fn define_adc(&mut self, name: &str, pin: PinId, idle: IdlePolicy) -> Result<(), GpioError> {
        (**self).define_adc(name, pin, idle)
    }

    fn define_output(
        &mut self,
        name: &str,
        pin: PinId,
        initial: u8,
        idle: IdlePolicy,
    ) -> Result<(), GpioError> {
        (**self).define_output(name, pin, initial, idle)
    }

    fn read(&mut self, pin: PinId) -> Result<u8, GpioError> {
        (**self).read(pin)
    }

    fn read_adc(&mut self, pin: PinId) -> Result<u8, GpioError> {
        (**self).read_adc(pin)
    }

    fn write(&mut self, pin: PinId, value: u8) -> Result<(), GpioError> {
        (**self).write(pin, value)
    }
}
