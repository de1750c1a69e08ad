//! Board-agnostic core of the modio IO module
//!
//! This crate contains everything that does not depend on a specific board:
//!
//! - The fixed-size IO slot table and its per-kind behaviour
//! - Polling, output driving and the downlink output-set action
//! - Button and state-change edge handling with forced uplinks
//! - The uplink state report
//! - The lifecycle contract expected by the application core
//! - Configuration types and the text configuration parser
//!
//! Hardware access goes through the traits in `modio-hal`; uplink records
//! are written through `modio-protocol`.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

// This mod MUST go first, so that the others see its macros.
mod fmt;

pub mod action;
pub mod config;
pub mod edge;
pub mod error;
pub mod host;
pub mod io;
pub mod module;
pub mod report;
pub mod slot;

#[cfg(test)]
mod mock;

pub use edge::{EdgeBinding, EdgeHandler, EdgeOutcome, EdgeRole};
pub use error::IoError;
pub use host::{ActionHandler, AppCore, AppModule, ExecMode, ModuleId, IO_MODULE_ID};
pub use module::IoModule;
pub use report::{IoReport, IO_STATE_DECLARED_LEN, REPORT_LEN};
pub use slot::{IoKind, Slot, SlotId, SlotTable, MAX_NAME_LEN, SLOT_COUNT};
