//! IO module errors

use modio_hal::{ButtonError, GpioError};

use crate::slot::IoKind;

/// Errors from slot configuration and IO operations
///
/// None of these are fatal to the host: lifecycle callbacks log them and
/// carry on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IoError {
    /// Slot index outside the table
    InvalidSlot(usize),
    /// Slot name does not fit the name buffer
    NameTooLong,
    /// Downlink payload has the wrong size
    BadLength {
        /// Required payload length
        expected: usize,
        /// Received payload length
        actual: usize,
    },
    /// The slot kind has no implementation for this operation
    Unsupported(IoKind),
    /// GPIO driver failure
    Gpio(GpioError),
    /// Button manager refused the registration
    Button(ButtonError),
}

impl From<GpioError> for IoError {
    fn from(e: GpioError) -> Self {
        IoError::Gpio(e)
    }
}

impl From<ButtonError> for IoError {
    fn from(e: ButtonError) -> Self {
        IoError::Button(e)
    }
}
