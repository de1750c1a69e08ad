//! Driver adapter
//!
//! Configures, samples and drives slots through the board's GPIO driver.
//! Each kind's behaviour is one arm of an exhaustive match, so adding a
//! kind forces every operation to decide what it does with it.
//!
//! Operations on an out-of-range index, an unassigned slot or a kind the
//! operation does not apply to are explicit no-ops, not errors.

use heapless::Vec;
use modio_hal::{ButtonManager, GpioDriver, IdlePolicy, PinId};

use crate::edge::EdgeBinding;
use crate::error::IoError;
use crate::slot::{IoKind, Slot, SlotId, SlotTable, SLOT_COUNT};

/// Slots that failed to configure, with the reason
pub type InitFailures = Vec<(SlotId, IoError), SLOT_COUNT>;

impl IoKind {
    /// Hardware setup for a slot of this kind on `pin`
    fn configure<G, B>(
        self,
        id: SlotId,
        slot: &Slot,
        pin: PinId,
        gpio: &mut G,
        buttons: &mut B,
    ) -> Result<(), IoError>
    where
        G: GpioDriver,
        B: ButtonManager<EdgeBinding>,
    {
        match self {
            IoKind::DigitalIn => {
                gpio.define_input(slot.name(), pin, slot.pull(), IdlePolicy::DOZE_HIGH_Z)?
            }
            IoKind::AnalogIn => gpio.define_adc(slot.name(), pin, IdlePolicy::DOZE_HIGH_Z)?,
            IoKind::Button => buttons.define_button(pin, EdgeBinding::button(id))?,
            IoKind::StateInput => buttons.define_button(pin, EdgeBinding::state_change(id))?,
            IoKind::DigitalOut => gpio.define_output(
                slot.name(),
                pin,
                slot.downlink_value(),
                IdlePolicy::DOZE_HIGH_Z,
            )?,
            IoKind::PwmOut => return Err(IoError::Unsupported(IoKind::PwmOut)),
        }
        Ok(())
    }

    /// Sample a polled kind; `None` for kinds whose value is not polled
    fn sample<G: GpioDriver>(self, pin: PinId, gpio: &mut G) -> Result<Option<u8>, IoError> {
        match self {
            IoKind::DigitalIn => Ok(Some(gpio.read(pin)?)),
            IoKind::AnalogIn => Ok(Some(gpio.read_adc(pin)?)),
            // Edge-driven kinds get their value from the callbacks only
            IoKind::Button | IoKind::StateInput => Ok(None),
            IoKind::DigitalOut | IoKind::PwmOut => Ok(None),
        }
    }

    /// Drive an output kind; inputs are left alone
    fn drive<G: GpioDriver>(self, pin: PinId, value: u8, gpio: &mut G) -> Result<(), IoError> {
        match self {
            IoKind::DigitalOut => Ok(gpio.write(pin, value)?),
            IoKind::PwmOut => Err(IoError::Unsupported(IoKind::PwmOut)),
            IoKind::DigitalIn | IoKind::AnalogIn | IoKind::Button | IoKind::StateInput => Ok(()),
        }
    }
}

impl SlotTable {
    /// Configure the hardware for every assigned slot
    ///
    /// A slot that fails is logged and skipped; the others are still
    /// configured. Returns the failures.
    pub fn initialize_all<G, B>(&self, gpio: &mut G, buttons: &mut B) -> InitFailures
    where
        G: GpioDriver,
        B: ButtonManager<EdgeBinding>,
    {
        let mut failures = InitFailures::new();
        for (id, slot) in self.iter() {
            let Some(pin) = slot.pin() else {
                continue;
            };
            match slot.kind().configure(id, slot, pin, gpio, buttons) {
                Ok(()) => debug!("MIO:io {} '{}' on gpio {} ready", id.index(), slot.name(), pin),
                Err(e) => {
                    warn!("MIO:io {} on gpio {} not configured: {}", id.index(), pin, e);
                    // Capacity equals the slot count, so this cannot overflow
                    let _ = failures.push((id, e));
                }
            }
        }
        failures
    }

    /// Release slot hardware before a low-power state
    ///
    /// Nothing to do: the GPIO driver parks idle pins according to the
    /// idle policy given at definition time.
    pub fn deinitialize_all(&self) {}

    /// Sample one slot and return its current uplink value
    ///
    /// Polled inputs are sampled and stored. Every other kind returns the
    /// stored value untouched; for outputs that is never the value last
    /// written. Returns 0 for an index outside the table or an unassigned
    /// slot.
    pub fn read_slot<G: GpioDriver>(&self, gpio: &mut G, index: usize) -> u8 {
        let Some(slot) = self.get_index(index) else {
            return 0;
        };
        let Some(pin) = slot.pin() else {
            return 0;
        };

        match slot.kind().sample(pin, gpio) {
            Ok(Some(value)) => {
                slot.set_uplink(value);
                value
            }
            Ok(None) => slot.uplink_value(),
            Err(e) => {
                warn!("MIO:io {} read failed: {}", index, e);
                slot.uplink_value()
            }
        }
    }

    /// Drive one output slot to `value`
    ///
    /// Does not touch the slot's downlink value. A PWM slot reports
    /// [`IoError::Unsupported`]; everything else that is not a driveable
    /// output is a no-op.
    pub fn write_slot<G: GpioDriver>(
        &self,
        gpio: &mut G,
        index: usize,
        value: u8,
    ) -> Result<(), IoError> {
        let Some(slot) = self.get_index(index) else {
            return Ok(());
        };
        let Some(pin) = slot.pin() else {
            return Ok(());
        };
        slot.kind().drive(pin, value, gpio)
    }

    /// Sample every slot in table order
    pub fn read_all<G: GpioDriver>(&self, gpio: &mut G) {
        for index in 0..SLOT_COUNT {
            self.read_slot(gpio, index);
        }
    }
}
