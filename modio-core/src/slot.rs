//! IO slot table
//!
//! A fixed number of slots, each describing one managed IO line. The
//! configuration part of a slot (pin, name, kind, pull) can only be changed
//! through `&mut SlotTable`, i.e. before the table is shared with the edge
//! callbacks. The two values that keep changing afterwards are atomics so
//! that the edge domain and the host domain can both work through `&SlotTable`.

use heapless::String;
use modio_hal::{PinId, Pull};
use portable_atomic::{AtomicU8, Ordering};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::IoConfig;
use crate::error::IoError;

/// Number of managed IO slots
///
/// Part of the uplink/downlink wire contract: changing it changes the
/// downlink payload length and the meaning of the uplink state block.
pub const SLOT_COUNT: usize = 8;

/// Maximum slot name length
pub const MAX_NAME_LEN: usize = 16;

/// Identifier of a slot in the table
///
/// Only validated when looked up, so an identifier coming back from a
/// foreign context can still be rejected cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SlotId(u8);

impl SlotId {
    /// Wrap a raw slot number
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    /// Checked conversion from a table index
    pub fn from_index(index: usize) -> Option<Self> {
        if index < SLOT_COUNT {
            Some(Self(index as u8))
        } else {
            None
        }
    }

    /// Position of this slot in the table
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Every valid slot identifier, in table order
    pub fn all() -> impl Iterator<Item = SlotId> {
        (0..SLOT_COUNT as u8).map(SlotId)
    }
}

/// Functional role of a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum IoKind {
    /// Polled digital input, reports the sampled level
    #[default]
    DigitalIn,
    /// Digital output set by downlink
    DigitalOut,
    /// Debounced button, reports the press type of the last release
    Button,
    /// Debounced input, reports every state change
    StateInput,
    /// Polled analog input, reports the scaled ADC value
    AnalogIn,
    /// PWM output (no driver support yet)
    PwmOut,
}

impl IoKind {
    /// Kinds whose value is set by downlink
    pub fn is_output(self) -> bool {
        matches!(self, IoKind::DigitalOut | IoKind::PwmOut)
    }

    /// Kinds sampled on every report cycle
    pub fn is_polled(self) -> bool {
        matches!(self, IoKind::DigitalIn | IoKind::AnalogIn)
    }

    /// Kinds driven by the button manager's edge callbacks
    pub fn is_edge_driven(self) -> bool {
        matches!(self, IoKind::Button | IoKind::StateInput)
    }
}

/// One managed IO line
#[derive(Debug)]
pub struct Slot {
    pin: Option<PinId>,
    name: String<MAX_NAME_LEN>,
    kind: IoKind,
    pull: Pull,
    downlink: AtomicU8,
    uplink: AtomicU8,
}

impl Default for Slot {
    fn default() -> Self {
        Self::unassigned()
    }
}

impl Slot {
    /// An inert slot with no pin
    pub const fn unassigned() -> Self {
        Self {
            pin: None,
            name: String::new(),
            kind: IoKind::DigitalIn,
            pull: Pull::None,
            downlink: AtomicU8::new(0),
            uplink: AtomicU8::new(0),
        }
    }

    /// Physical pin, or `None` if the slot is unassigned
    pub fn pin(&self) -> Option<PinId> {
        self.pin
    }

    /// True if a pin is assigned
    pub fn is_assigned(&self) -> bool {
        self.pin.is_some()
    }

    /// Diagnostic label
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Functional role
    pub fn kind(&self) -> IoKind {
        self.kind
    }

    /// Pull applied to inputs
    pub fn pull(&self) -> Pull {
        self.pull
    }

    /// Last value commanded by downlink (or the initial value)
    pub fn downlink_value(&self) -> u8 {
        self.downlink.load(Ordering::Relaxed)
    }

    /// Value waiting to be reported
    pub fn uplink_value(&self) -> u8 {
        self.uplink.load(Ordering::Acquire)
    }

    pub(crate) fn set_downlink(&self, value: u8) {
        self.downlink.store(value, Ordering::Relaxed);
    }

    pub(crate) fn set_uplink(&self, value: u8) {
        self.uplink.store(value, Ordering::Release);
    }

    /// Read and clear the pending uplink value in one atomic step
    pub(crate) fn take_uplink(&self) -> u8 {
        self.uplink.swap(0, Ordering::AcqRel)
    }
}

/// The table of all managed IO slots
#[derive(Debug)]
pub struct SlotTable {
    slots: [Slot; SLOT_COUNT],
}

impl Default for SlotTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SlotTable {
    /// Create a table with every slot unassigned
    pub fn new() -> Self {
        Self {
            slots: core::array::from_fn(|_| Slot::unassigned()),
        }
    }

    /// Build a table from a parsed configuration
    pub fn from_config(config: &IoConfig) -> Self {
        let mut table = Self::new();
        for (slot, cfg) in table.slots.iter_mut().zip(config.slots.iter()) {
            slot.pin = cfg.pin;
            slot.name = cfg.name.clone();
            slot.kind = cfg.kind;
            slot.pull = cfg.pull;
            slot.set_downlink(cfg.initial);
        }
        table
    }

    /// Populate one slot
    ///
    /// `initial` seeds the downlink value, which is what an output is
    /// driven to when it gets configured.
    pub fn define(
        &mut self,
        index: usize,
        pin: Option<PinId>,
        name: &str,
        kind: IoKind,
        pull: Pull,
        initial: u8,
    ) -> Result<(), IoError> {
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(IoError::InvalidSlot(index))?;
        let name = String::try_from(name).map_err(|_| IoError::NameTooLong)?;

        slot.pin = pin;
        slot.name = name;
        slot.kind = kind;
        slot.pull = pull;
        slot.set_downlink(initial);
        Ok(())
    }

    /// Look up a slot
    pub fn get(&self, id: SlotId) -> Option<&Slot> {
        self.slots.get(id.index())
    }

    /// Look up a slot by raw index
    pub fn get_index(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    /// Iterate over every slot with its identifier
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &Slot)> {
        SlotId::all().zip(self.slots.iter())
    }

    /// Iterate over slots that have a pin assigned
    pub fn assigned(&self) -> impl Iterator<Item = (SlotId, &Slot)> {
        self.iter().filter(|(_, slot)| slot.is_assigned())
    }
}
