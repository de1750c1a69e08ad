//! Configuration type definitions

use heapless::String;
use modio_hal::{PinId, Pull};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::slot::{IoKind, MAX_NAME_LEN, SLOT_COUNT};

/// Poll interval suggested to the host when none is configured
pub const DEFAULT_POLL_INTERVAL_MS: u32 = 1_000;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Unknown key or malformed value
    InvalidValue,
    /// Malformed pin string
    InvalidPin,
    /// Slot number outside the table
    SlotOutOfRange,
    /// Name longer than the slot name buffer
    NameTooLong,
    /// Binary configuration could not be decoded
    Deserialize,
    /// Binary configuration does not fit the output buffer
    Serialize,
}

/// Configuration of one slot
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SlotConfig {
    /// Physical pin, `None` leaves the slot unassigned
    pub pin: Option<PinId>,
    /// Diagnostic label
    pub name: String<MAX_NAME_LEN>,
    /// Functional role
    pub kind: IoKind,
    /// Pull applied to inputs
    pub pull: Pull,
    /// Initial output value
    pub initial: u8,
}

/// Complete IO module configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IoConfig {
    /// Poll interval returned to the host on start
    pub poll_interval_ms: u32,
    /// Per-slot configuration, indexed by slot number
    pub slots: [SlotConfig; SLOT_COUNT],
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            slots: Default::default(),
        }
    }
}

impl IoConfig {
    /// Create a configuration with every slot unassigned
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of slots with a pin assigned
    pub fn assigned_count(&self) -> usize {
        self.slots.iter().filter(|s| s.pin.is_some()).count()
    }

    /// Find a slot by name
    pub fn find_slot(&self, name: &str) -> Option<(usize, &SlotConfig)> {
        self.slots
            .iter()
            .enumerate()
            .find(|(_, s)| s.pin.is_some() && s.name.as_str() == name)
    }

    /// Decode a configuration stored as postcard binary data
    #[cfg(feature = "serde")]
    pub fn from_postcard(bytes: &[u8]) -> Result<Self, ConfigError> {
        postcard::from_bytes(bytes).map_err(|_| ConfigError::Deserialize)
    }

    /// Encode this configuration as postcard binary data into `buffer`
    ///
    /// Returns the used part of `buffer`.
    #[cfg(feature = "serde")]
    pub fn to_postcard<'b>(&self, buffer: &'b mut [u8]) -> Result<&'b mut [u8], ConfigError> {
        postcard::to_slice(self, buffer).map_err(|_| ConfigError::Serialize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = IoConfig::new();
        assert_eq!(config.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
        assert_eq!(config.assigned_count(), 0);
        assert!(config.find_slot("anything").is_none());
    }

    #[test]
    fn test_find_slot_skips_unassigned() {
        let mut config = IoConfig::new();
        config.slots[2].name = String::try_from("door").unwrap();
        assert!(config.find_slot("door").is_none());

        config.slots[2].pin = Some(9);
        let (index, slot) = config.find_slot("door").unwrap();
        assert_eq!(index, 2);
        assert_eq!(slot.pin, Some(9));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_postcard_roundtrip() {
        let mut config = IoConfig::new();
        config.slots[0].pin = Some(5);
        config.slots[0].kind = IoKind::DigitalOut;
        config.slots[0].initial = 1;

        let mut buffer = [0u8; 256];
        let bytes = config.to_postcard(&mut buffer).unwrap();
        let decoded = IoConfig::from_postcard(bytes).unwrap();
        assert_eq!(decoded, config);
    }
}
