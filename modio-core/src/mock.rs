//! Test doubles for the host, the GPIO driver and the button manager

use core::cell::Cell;

use heapless::Vec;
use modio_hal::{
    ButtonError, ButtonManager, GpioDriver, GpioError, IdlePolicy, PinId, Pull,
};

use crate::edge::EdgeBinding;
use crate::host::{AppCore, ExecMode, ModuleId};

/// A pin definition seen by the mock driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Defined {
    Input(PinId, Pull),
    Adc(PinId),
    Output(PinId, u8),
}

/// GPIO driver that records every call
///
/// Input levels and ADC values are set by the test. With `echo_writes`
/// a digital read returns the last value written to that pin.
#[derive(Debug, Default)]
pub struct MockGpio {
    pub defined: Vec<Defined, 16>,
    pub writes: Vec<(PinId, u8), 32>,
    pub reads: usize,
    pub levels: [u8; 32],
    pub adc: [u8; 32],
    pub echo_writes: bool,
    pub fail_reads: bool,
}

impl MockGpio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn echoing() -> Self {
        Self {
            echo_writes: true,
            ..Self::default()
        }
    }

    pub fn last_write(&self, pin: PinId) -> Option<u8> {
        self.writes
            .iter()
            .rev()
            .find(|(p, _)| *p == pin)
            .map(|(_, v)| *v)
    }
}

impl GpioDriver for MockGpio {
    fn define_input(
        &mut self,
        _name: &str,
        pin: PinId,
        pull: Pull,
        _idle: IdlePolicy,
    ) -> Result<(), GpioError> {
        self.defined
            .push(Defined::Input(pin, pull))
            .map_err(|_| GpioError::Hardware)
    }

    fn define_adc(&mut self, _name: &str, pin: PinId, _idle: IdlePolicy) -> Result<(), GpioError> {
        self.defined
            .push(Defined::Adc(pin))
            .map_err(|_| GpioError::Hardware)
    }

    fn define_output(
        &mut self,
        _name: &str,
        pin: PinId,
        initial: u8,
        _idle: IdlePolicy,
    ) -> Result<(), GpioError> {
        self.defined
            .push(Defined::Output(pin, initial))
            .map_err(|_| GpioError::Hardware)
    }

    fn read(&mut self, pin: PinId) -> Result<u8, GpioError> {
        self.reads += 1;
        if self.fail_reads {
            return Err(GpioError::Hardware);
        }
        if self.echo_writes {
            if let Some(v) = self.last_write(pin) {
                return Ok(v);
            }
        }
        self.levels
            .get(pin as usize)
            .copied()
            .ok_or(GpioError::InvalidPin)
    }

    fn read_adc(&mut self, pin: PinId) -> Result<u8, GpioError> {
        self.reads += 1;
        if self.fail_reads {
            return Err(GpioError::Hardware);
        }
        self.adc
            .get(pin as usize)
            .copied()
            .ok_or(GpioError::InvalidPin)
    }

    fn write(&mut self, pin: PinId, value: u8) -> Result<(), GpioError> {
        self.writes
            .push((pin, value))
            .map_err(|_| GpioError::Hardware)
    }
}

/// Host that counts forced uplinks and records registrations
#[derive(Debug, Default)]
pub struct MockHost {
    pub active: Cell<bool>,
    pub forced: Cell<u32>,
    pub last_forced: Cell<Option<ModuleId>>,
    pub modules: Vec<(&'static str, ModuleId, ExecMode), 4>,
    pub actions: Vec<(u8, ModuleId), 4>,
}

impl MockHost {
    pub fn active() -> Self {
        let host = Self::default();
        host.active.set(true);
        host
    }

    pub fn inactive() -> Self {
        Self::default()
    }
}

impl AppCore for MockHost {
    fn register_module(&mut self, name: &'static str, id: ModuleId, mode: ExecMode) {
        let _ = self.modules.push((name, id, mode));
    }

    fn register_action(&mut self, tag: u8, id: ModuleId) {
        let _ = self.actions.push((tag, id));
    }

    fn is_device_active(&self) -> bool {
        self.active.get()
    }

    fn force_uplink(&self, id: ModuleId) {
        self.forced.set(self.forced.get() + 1);
        self.last_forced.set(Some(id));
    }
}

/// Button manager that only records registrations
#[derive(Debug, Default)]
pub struct MockButtons {
    pub defined: Vec<(PinId, EdgeBinding), 8>,
}

impl ButtonManager<EdgeBinding> for MockButtons {
    fn define_button(&mut self, pin: PinId, context: EdgeBinding) -> Result<(), ButtonError> {
        if self.defined.iter().any(|(p, _)| *p == pin) {
            return Err(ButtonError::AlreadyDefined);
        }
        self.defined
            .push((pin, context))
            .map_err(|_| ButtonError::TooManyButtons)
    }
}
