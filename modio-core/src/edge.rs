//! Button and state-change edge handling
//!
//! The button manager calls back into [`EdgeHandler`] from its own context
//! whenever a registered line changes state. The handler records the event
//! in the slot's uplink value and asks the host for an uplink limited to
//! this module, but only while the device is active.

use modio_hal::{ButtonEvent, ButtonEventSink, ButtonState};

use crate::host::{AppCore, ModuleId, IO_MODULE_ID};
use crate::slot::{IoKind, Slot, SlotId, SlotTable};

/// Which edge callback a registration is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EdgeRole {
    /// Report the press type on release
    Button,
    /// Report every state change
    StateChange,
}

/// Context registered with the button manager for one slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EdgeBinding {
    /// Slot the events belong to
    pub slot: SlotId,
    /// Callback to route the events to
    pub role: EdgeRole,
}

impl EdgeBinding {
    /// Binding for a button slot
    pub const fn button(slot: SlotId) -> Self {
        Self {
            slot,
            role: EdgeRole::Button,
        }
    }

    /// Binding for a state-input slot
    pub const fn state_change(slot: SlotId) -> Self {
        Self {
            slot,
            role: EdgeRole::StateChange,
        }
    }
}

/// What an edge event led to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EdgeOutcome {
    /// Value stored and a forced uplink requested
    Reported,
    /// Button went down; only logged
    PressLogged,
    /// Device not active; event dropped
    Inactive,
    /// Slot id outside the table; event dropped
    InvalidSlot,
    /// Slot unassigned or not of the callback's kind; event dropped
    Unbound,
}

/// Edge callbacks for button and state-input slots
pub struct EdgeHandler<'a, H> {
    table: &'a SlotTable,
    host: &'a H,
    module: ModuleId,
}

impl<'a, H: AppCore> EdgeHandler<'a, H> {
    /// Create a handler reporting under the IO module's id
    pub fn new(table: &'a SlotTable, host: &'a H) -> Self {
        Self {
            table,
            host,
            module: IO_MODULE_ID,
        }
    }

    /// Button transition: only a release while active is reported
    pub fn on_button(&self, slot: SlotId, event: ButtonEvent) -> EdgeOutcome {
        if event.state != ButtonState::Released {
            info!("MIO:button pressed");
            return EdgeOutcome::PressLogged;
        }
        if !self.host.is_device_active() {
            info!("MIO:button release ignore not active");
            return EdgeOutcome::Inactive;
        }
        let target = match self.bound_slot(slot, IoKind::Button) {
            Ok(target) => target,
            Err(outcome) => {
                warn!("MIO:button release but bad id {} ({})", slot.index(), outcome);
                return outcome;
            }
        };

        info!(
            "MIO:button {} released, duration {} ms, press type:{}",
            slot.index(),
            event.duration_ms,
            event.press_type.code()
        );
        target.set_uplink(event.press_type.code());
        self.host.force_uplink(self.module);
        EdgeOutcome::Reported
    }

    /// State-input transition: every change while active is reported
    pub fn on_state_change(&self, slot: SlotId, event: ButtonEvent) -> EdgeOutcome {
        if !self.host.is_device_active() {
            info!("MIO:input state change ignore not active");
            return EdgeOutcome::Inactive;
        }
        let target = match self.bound_slot(slot, IoKind::StateInput) {
            Ok(target) => target,
            Err(outcome) => {
                warn!("MIO:input state change but bad id {} ({})", slot.index(), outcome);
                return outcome;
            }
        };

        info!(
            "MIO:state input {} changed to {}",
            slot.index(),
            event.state.code()
        );
        target.set_uplink(event.state.code());
        self.host.force_uplink(self.module);
        EdgeOutcome::Reported
    }

    /// Only an assigned slot of `kind` takes edge values
    fn bound_slot(&self, slot: SlotId, kind: IoKind) -> Result<&'a Slot, EdgeOutcome> {
        let target = self.table.get(slot).ok_or(EdgeOutcome::InvalidSlot)?;
        if !target.is_assigned() || target.kind() != kind {
            return Err(EdgeOutcome::Unbound);
        }
        Ok(target)
    }
}

impl<H: AppCore> ButtonEventSink<EdgeBinding> for EdgeHandler<'_, H> {
    fn on_button_event(&self, binding: EdgeBinding, event: ButtonEvent) {
        let outcome = match binding.role {
            EdgeRole::Button => self.on_button(binding.slot, event),
            EdgeRole::StateChange => self.on_state_change(binding.slot, event),
        };
        trace!("MIO:edge on slot {} -> {}", binding.slot.index(), outcome);
    }
}
