//! Application core contract
//!
//! The host owns scheduling, the radio and power-state transitions. It
//! calls modules through [`AppModule`] and [`ActionHandler`]; modules call
//! back into it through [`AppCore`].

use modio_protocol::UplinkWriter;

/// Identifier a module registers under with the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModuleId(pub u8);

/// Module id of the IO module
///
/// Shares the position-tracking module's id; the two are never built
/// into the same firmware.
pub const IO_MODULE_ID: ModuleId = ModuleId(7);

/// How the host sequences a module against the others
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ExecMode {
    /// Runs in the host's main sequence; the next module waits for it
    Serial,
    /// Runs alongside the main sequence without blocking it
    Parallel,
}

/// Services the host offers to modules
///
/// `is_device_active` and `force_uplink` may be called from the button
/// manager's context, so they take `&self` and must not block.
pub trait AppCore {
    /// Register a module under `id`
    fn register_module(&mut self, name: &'static str, id: ModuleId, mode: ExecMode);

    /// Route downlink records with `tag` to the module `id`
    fn register_action(&mut self, tag: u8, id: ModuleId);

    /// True while the device is in its active operational state
    fn is_device_active(&self) -> bool;

    /// Ask for an out-of-cycle uplink to which only module `id` contributes
    fn force_uplink(&self, id: ModuleId);
}

/// Lifecycle callbacks a module implements for the host
pub trait AppModule {
    /// Module activation; returns the suggested poll interval in ms
    fn start(&mut self) -> u32;

    /// Module deactivation
    fn stop(&mut self);

    /// Device is entering its low-power off state
    fn off(&mut self);

    /// Device is entering deep sleep
    fn deepsleep(&mut self);

    /// Contribute to the next uplink
    ///
    /// Returns true if the contribution is critical and must not be
    /// dropped by the host's batching.
    fn get_uplink_data<W: UplinkWriter>(&mut self, ul: &mut W) -> bool;

    /// Periodic tick while the module is active
    fn tick(&mut self);
}

/// Receiver of downlink records routed by the host
pub trait ActionHandler {
    /// Handle the value of one downlink record with a registered `tag`
    fn on_action(&mut self, tag: u8, payload: &[u8]);
}
