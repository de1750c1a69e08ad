//! Downlink output-set action
//!
//! The payload carries one byte per slot. Only output slots take their
//! byte; every other position is ignored.

use modio_hal::GpioDriver;

use crate::error::IoError;
use crate::slot::{SlotTable, SLOT_COUNT};

impl SlotTable {
    /// Apply a bulk output-set command
    ///
    /// The payload must be exactly [`SLOT_COUNT`] bytes, otherwise nothing
    /// changes. Each output slot records its byte as the new downlink value
    /// and is driven to it straight away. A slot whose driver write fails
    /// keeps the recorded value; the remaining slots are still applied.
    ///
    /// Returns the number of output slots updated.
    pub fn apply_output_set<G: GpioDriver>(
        &self,
        gpio: &mut G,
        values: &[u8],
    ) -> Result<usize, IoError> {
        if values.len() != SLOT_COUNT {
            warn!("DL ios not set as wrong length {}", values.len());
            return Err(IoError::BadLength {
                expected: SLOT_COUNT,
                actual: values.len(),
            });
        }

        let mut applied = 0;
        for ((id, slot), &value) in self.iter().zip(values) {
            if !slot.kind().is_output() {
                continue;
            }

            slot.set_downlink(value);
            applied += 1;
            match self.write_slot(gpio, id.index(), value) {
                Ok(()) => info!(
                    "DL io {} on gpio {} set to {}",
                    id.index(),
                    slot.pin(),
                    value
                ),
                Err(e) => warn!("DL io {} set to {} but not driven: {}", id.index(), value, e),
            }
        }
        info!("DL ios set");

        Ok(applied)
    }
}
