//! IO module lifecycle adapter
//!
//! Ties the slot table, the board GPIO driver and the host together and
//! implements the callbacks the host drives the module with.
//!
//! Typical bring-up:
//!
//! ```ignore
//! let table = SlotTable::from_config(&config);
//! IoModule::<Board, Host>::register(&mut host);
//! let mut module = IoModule::new(&table, board_gpio, &host)
//!     .with_poll_interval(config.poll_interval_ms);
//! module.initialize(&mut debouncer);
//! debouncer.configure_pins(module.gpio_mut())?;
//! // then from the button task:
//! debouncer.poll(&mut button_gpio, now_ms, &module.edge_handler());
//! ```

use modio_hal::{ButtonManager, GpioDriver};
use modio_protocol::{UplinkWriter, DL_APP_IO_SET};

use crate::config::DEFAULT_POLL_INTERVAL_MS;
use crate::edge::{EdgeBinding, EdgeHandler};
use crate::error::IoError;
use crate::host::{ActionHandler, AppCore, AppModule, ExecMode, IO_MODULE_ID};
use crate::io::InitFailures;
use crate::report::IoReport;
use crate::slot::SlotTable;

/// The generic IO module
pub struct IoModule<'a, G, H> {
    table: &'a SlotTable,
    gpio: G,
    host: &'a H,
    poll_interval_ms: u32,
}

impl<'a, G: GpioDriver, H: AppCore> IoModule<'a, G, H> {
    /// Name the module registers under
    pub const NAME: &'static str = "IO";

    /// Register the module and its downlink action with the host
    pub fn register(host: &mut H) {
        host.register_module(Self::NAME, IO_MODULE_ID, ExecMode::Parallel);
        host.register_action(DL_APP_IO_SET, IO_MODULE_ID);
    }

    /// Create the module over an already populated slot table
    pub fn new(table: &'a SlotTable, gpio: G, host: &'a H) -> Self {
        Self {
            table,
            gpio,
            host,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }

    /// Override the poll interval suggested on start
    pub fn with_poll_interval(mut self, poll_interval_ms: u32) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Configure every assigned slot's hardware
    ///
    /// Button and state-input slots are registered with `buttons`, bound to
    /// their slot. Route the manager's events to [`Self::edge_handler`].
    pub fn initialize<B: ButtonManager<EdgeBinding>>(&mut self, buttons: &mut B) -> InitFailures {
        let failures = self.table.initialize_all(&mut self.gpio, buttons);
        info!(
            "MIO: io operation initialised ({} slots, {} failed)",
            self.table.assigned().count(),
            failures.len()
        );
        failures
    }

    /// Edge callbacks for the button manager
    pub fn edge_handler(&self) -> EdgeHandler<'a, H> {
        EdgeHandler::new(self.table, self.host)
    }

    /// Collect the state report for one uplink
    pub fn harvest(&mut self) -> IoReport {
        let active = self.host.is_device_active();
        self.table.harvest(&mut self.gpio, active)
    }

    /// Apply a downlink output-set payload
    pub fn apply_output_set(&mut self, values: &[u8]) -> Result<usize, IoError> {
        self.table.apply_output_set(&mut self.gpio, values)
    }

    /// The slot table this module manages
    pub fn table(&self) -> &'a SlotTable {
        self.table
    }

    /// The board driver
    pub fn gpio(&self) -> &G {
        &self.gpio
    }

    /// Mutable access to the board driver
    pub fn gpio_mut(&mut self) -> &mut G {
        &mut self.gpio
    }
}

impl<G: GpioDriver, H: AppCore> AppModule for IoModule<'_, G, H> {
    fn start(&mut self) -> u32 {
        debug!("MIO:start IO check : {} ms", self.poll_interval_ms);
        self.poll_interval_ms
    }

    fn stop(&mut self) {
        debug!("MIO:done");
    }

    fn off(&mut self) {
        self.table.deinitialize_all();
    }

    fn deepsleep(&mut self) {
        self.table.deinitialize_all();
    }

    fn get_uplink_data<W: UplinkWriter>(&mut self, ul: &mut W) -> bool {
        info!("MIO: UL ");
        let report = self.harvest();
        if let Err(e) = report.write_to(ul) {
            warn!("MIO: UL io state not added: {}", e);
        }
        // Always critical
        true
    }

    fn tick(&mut self) {}
}

impl<G: GpioDriver, H: AppCore> ActionHandler for IoModule<'_, G, H> {
    fn on_action(&mut self, tag: u8, payload: &[u8]) {
        if tag != DL_APP_IO_SET {
            trace!("MIO: ignoring DL tag {}", tag);
            return;
        }
        // Rejections are logged by the table
        let _ = self.apply_output_set(payload);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::EdgeOutcome;
    use crate::mock::{MockButtons, MockGpio, MockHost};
    use crate::report::IO_STATE_DECLARED_LEN;
    use crate::slot::{IoKind, SlotId};
    use modio_hal::{ButtonEvent, ButtonEventSink, ButtonState, PressType, Pull};
    use modio_protocol::{DownlinkReader, UplinkMessage, UL_APP_IO_STATE};

    fn scenario_table() -> SlotTable {
        let mut table = SlotTable::new();
        table.define(0, Some(5), "relay", IoKind::DigitalOut, Pull::None, 0).unwrap();
        table.define(1, Some(6), "button", IoKind::Button, Pull::Up, 0).unwrap();
        table
    }

    fn release(press_type: PressType) -> ButtonEvent {
        ButtonEvent {
            state: ButtonState::Released,
            press_type,
            duration_ms: 900,
        }
    }

    #[test]
    fn test_register() {
        let mut host = MockHost::default();
        IoModule::<MockGpio, MockHost>::register(&mut host);

        assert_eq!(host.modules.as_slice(), &[("IO", IO_MODULE_ID, ExecMode::Parallel)]);
        assert_eq!(host.actions.as_slice(), &[(DL_APP_IO_SET, IO_MODULE_ID)]);
    }

    #[test]
    fn test_lifecycle_callbacks() {
        let table = scenario_table();
        let host = MockHost::active();
        let mut module = IoModule::new(&table, MockGpio::new(), &host);

        assert_eq!(module.start(), DEFAULT_POLL_INTERVAL_MS);
        module.tick();
        module.off();
        module.deepsleep();
        module.stop();

        // None of these touch the hardware
        assert!(module.gpio().writes.is_empty());
        assert!(module.gpio().defined.is_empty());
        assert_eq!(module.gpio().reads, 0);

        let mut module = module.with_poll_interval(30_000);
        assert_eq!(module.start(), 30_000);
    }

    #[test]
    fn test_initialize_registers_edges() {
        let table = scenario_table();
        let host = MockHost::active();
        let mut buttons = MockButtons::default();
        let mut module = IoModule::new(&table, MockGpio::new(), &host);

        let failures = module.initialize(&mut buttons);

        assert!(failures.is_empty());
        assert_eq!(buttons.defined.as_slice(), &[(6, EdgeBinding::button(SlotId::new(1)))]);
        assert_eq!(module.gpio().last_write(5), None);
        assert_eq!(module.gpio().defined.len(), 1);
    }

    #[test]
    fn test_end_to_end_scenario() {
        let table = scenario_table();
        let host = MockHost::active();
        let mut buttons = MockButtons::default();
        let mut module = IoModule::new(&table, MockGpio::new(), &host);
        module.initialize(&mut buttons);

        // Downlink drives the relay
        module.on_action(DL_APP_IO_SET, &[1, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(module.gpio().last_write(5), Some(1));

        // Button release on pin 6 goes through the registered binding
        let (_, binding) = buttons.defined[0];
        let handler = module.edge_handler();
        handler.on_button_event(binding, release(PressType::Medium));
        assert_eq!(table.get(SlotId::new(1)).unwrap().uplink_value(), 2);
        assert_eq!(host.forced.get(), 1);

        assert_eq!(module.harvest().as_bytes(), &[0, 2, 0, 0, 0, 0, 0, 0, 1]);
        assert_eq!(module.harvest().as_bytes(), &[0, 0, 0, 0, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn test_get_uplink_data() {
        let table = scenario_table();
        let host = MockHost::active();
        let mut module = IoModule::new(&table, MockGpio::new(), &host);
        module
            .edge_handler()
            .on_button(SlotId::new(1), release(PressType::Long));

        let mut ul: UplinkMessage = UplinkMessage::new();
        assert!(module.get_uplink_data(&mut ul));

        let value = DownlinkReader::find(ul.as_bytes(), UL_APP_IO_STATE).unwrap();
        assert_eq!(value.len(), IO_STATE_DECLARED_LEN as usize);
        assert_eq!(&value[..9], &[0, 3, 0, 0, 0, 0, 0, 0, 1]);
        assert_eq!(table.get(SlotId::new(1)).unwrap().uplink_value(), 0);
    }

    #[test]
    fn test_get_uplink_data_full_buffer_still_critical() {
        let table = scenario_table();
        let host = MockHost::active();
        let mut module = IoModule::new(&table, MockGpio::new(), &host);

        let mut ul: UplinkMessage<4> = UplinkMessage::new();
        assert!(module.get_uplink_data(&mut ul));
        assert!(ul.is_empty());
    }

    #[test]
    fn test_inactive_device_reports_flag_zero() {
        let table = scenario_table();
        let host = MockHost::inactive();
        let mut module = IoModule::new(&table, MockGpio::new(), &host);

        assert_eq!(
            module.edge_handler().on_button(SlotId::new(1), release(PressType::Short)),
            EdgeOutcome::Inactive
        );
        let report = module.harvest();
        assert_eq!(report.as_bytes(), &[0; 9]);
        assert!(!report.device_active());
    }

    #[test]
    fn test_on_action_ignores_other_tags() {
        let table = scenario_table();
        let host = MockHost::active();
        let mut module = IoModule::new(&table, MockGpio::new(), &host);

        module.on_action(DL_APP_IO_SET.wrapping_add(1), &[1, 0, 0, 0, 0, 0, 0, 0]);
        module.on_action(DL_APP_IO_SET, &[1, 0, 0]);

        assert!(module.gpio().writes.is_empty());
        assert_eq!(table.get(SlotId::new(0)).unwrap().downlink_value(), 0);
    }
}
