//! Uplink state report
//!
//! One byte per slot followed by the device-active flag:
//!
//! ```text
//! ┌──────────┬─────┬──────────┬────────┬─────────┐
//! │ slot 0   │ ... │ slot N-1 │ active │ padding │
//! │ 1B       │     │ 1B       │ 1B     │ 0..     │
//! └──────────┴─────┴──────────┴────────┴─────────┘
//! ```
//!
//! The record is always declared as [`IO_STATE_DECLARED_LEN`] bytes, which
//! the payload consumer relies on; unused trailing bytes are zero.

use modio_hal::GpioDriver;
use modio_protocol::{TlvError, UplinkWriter, UL_APP_IO_STATE};

use crate::slot::{SlotId, SlotTable, SLOT_COUNT};

/// Meaningful bytes in a report
pub const REPORT_LEN: usize = SLOT_COUNT + 1;

/// Declared length of the uplink state record
///
/// Fixed by the wire protocol, independent of the slot count.
pub const IO_STATE_DECLARED_LEN: u8 = 12;

const _: () = assert!(REPORT_LEN <= IO_STATE_DECLARED_LEN as usize);

/// Snapshot of slot values harvested for one uplink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IoReport {
    bytes: [u8; REPORT_LEN],
}

impl IoReport {
    /// Raw report bytes
    pub fn as_bytes(&self) -> &[u8; REPORT_LEN] {
        &self.bytes
    }

    /// Reported value of one slot
    pub fn slot_value(&self, id: SlotId) -> Option<u8> {
        self.bytes[..SLOT_COUNT].get(id.index()).copied()
    }

    /// Device-active flag at harvest time
    pub fn device_active(&self) -> bool {
        self.bytes[SLOT_COUNT] != 0
    }

    /// Append this report to an uplink under the IO state tag
    pub fn write_to<W: UplinkWriter>(&self, ul: &mut W) -> Result<(), TlvError> {
        ul.add_tlv(UL_APP_IO_STATE, IO_STATE_DECLARED_LEN, &self.bytes)
    }
}

impl SlotTable {
    /// Collect the values for one uplink
    ///
    /// Polled inputs are sampled first. Each slot's pending value is then
    /// taken and cleared in a single atomic step, so every edge event is
    /// reported at most once and an event arriving during the harvest is
    /// kept for the next one.
    pub fn harvest<G: GpioDriver>(&self, gpio: &mut G, device_active: bool) -> IoReport {
        self.read_all(gpio);

        let mut bytes = [0u8; REPORT_LEN];
        for ((_, slot), byte) in self.iter().zip(bytes.iter_mut()) {
            *byte = slot.take_uplink();
        }
        bytes[SLOT_COUNT] = u8::from(device_active);

        IoReport { bytes }
    }
}
