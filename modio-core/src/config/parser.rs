//! Minimal TOML parser for IO configuration
//!
//! Handles only the subset the IO configuration needs and allocates
//! nothing:
//!
//! - Root `key = value` pairs (`poll_interval_ms`)
//! - `[io.N]` section headers, one per slot
//! - String and integer values, quoted or bare
//! - Comments (# ...)
//!
//! ```toml
//! poll_interval_ms = 1000
//!
//! [io.0]
//! pin = "gpio5"     # "none" leaves the slot unassigned
//! name = "relay"
//! kind = "dout"     # din | dout | button | state | ain | pwm
//! pull = "none"     # none | up | down
//! initial = 0
//! ```

use heapless::String;
use modio_hal::{PinId, Pull};

use super::types::{ConfigError, IoConfig};
use crate::slot::{IoKind, SLOT_COUNT};

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Io(usize),
}

/// Parse a TOML configuration into an [`IoConfig`]
///
/// Slots without a section stay unassigned.
pub fn parse_config(input: &str) -> Result<IoConfig, ConfigError> {
    let mut config = IoConfig::new();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(header) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            section = parse_section_header(header)?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ConfigError::InvalidValue)?;
        match section {
            Section::Root => apply_root_value(&mut config, key, value)?,
            Section::Io(index) => apply_slot_value(&mut config, index, key, value)?,
        }
    }

    Ok(config)
}

/// Parse a section header like "io.3"
fn parse_section_header(header: &str) -> Result<Section, ConfigError> {
    let header = header.trim();
    let index = header
        .strip_prefix("io.")
        .ok_or(ConfigError::InvalidSection)?;
    let index: usize = index.parse().map_err(|_| ConfigError::InvalidSection)?;

    if index >= SLOT_COUNT {
        return Err(ConfigError::SlotOutOfRange);
    }
    Ok(Section::Io(index))
}

/// Parse "key = value", stripping trailing comments
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let value = value.trim();

    let value = match value.find('#') {
        // Only a comment if the # is outside a quoted string
        Some(hash_pos) if value[..hash_pos].matches('"').count() % 2 == 0 => {
            value[..hash_pos].trim()
        }
        _ => value,
    };

    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}

fn apply_root_value(config: &mut IoConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "poll_interval_ms" => config.poll_interval_ms = parse_int(value)?,
        _ => return Err(ConfigError::InvalidValue),
    }
    Ok(())
}

fn apply_slot_value(
    config: &mut IoConfig,
    index: usize,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    let slot = &mut config.slots[index];
    match key {
        "pin" => slot.pin = parse_pin(value)?,
        "name" => {
            slot.name = String::try_from(parse_string(value)).map_err(|_| ConfigError::NameTooLong)?
        }
        "kind" => slot.kind = parse_kind(value)?,
        "pull" => slot.pull = parse_pull(value)?,
        "initial" => slot.initial = parse_int(value)?,
        _ => return Err(ConfigError::InvalidValue),
    }
    Ok(())
}

/// Remove surrounding quotes, if any
fn parse_string(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ConfigError> {
    parse_string(value)
        .parse()
        .map_err(|_| ConfigError::InvalidValue)
}

/// Parse a pin string like "gpio12", "12" or "none"
fn parse_pin(value: &str) -> Result<Option<PinId>, ConfigError> {
    let value = parse_string(value);
    if value == "none" || value == "-1" {
        return Ok(None);
    }

    let number = value.strip_prefix("gpio").unwrap_or(value);
    number
        .parse()
        .map(Some)
        .map_err(|_| ConfigError::InvalidPin)
}

fn parse_kind(value: &str) -> Result<IoKind, ConfigError> {
    match parse_string(value) {
        "din" | "digital_in" => Ok(IoKind::DigitalIn),
        "dout" | "digital_out" => Ok(IoKind::DigitalOut),
        "button" => Ok(IoKind::Button),
        "state" | "state_input" => Ok(IoKind::StateInput),
        "ain" | "analog_in" => Ok(IoKind::AnalogIn),
        "pwm" | "pwm_out" => Ok(IoKind::PwmOut),
        _ => Err(ConfigError::InvalidValue),
    }
}

fn parse_pull(value: &str) -> Result<Pull, ConfigError> {
    match parse_string(value) {
        "none" | "high_z" => Ok(Pull::None),
        "up" => Ok(Pull::Up),
        "down" => Ok(Pull::Down),
        _ => Err(ConfigError::InvalidValue),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
# Field unit wiring
poll_interval_ms = 5000

[io.0]
pin = "gpio5"
name = "relay"
kind = "dout"
initial = 1

[io.1]
pin = "gpio6"
name = "door"       # reed switch
kind = "state"
pull = "up"

[io.4]
pin = 26
name = "battery"
kind = "ain"
"#;

    #[test]
    fn test_parse_sample() {
        let config = parse_config(SAMPLE).unwrap();

        assert_eq!(config.poll_interval_ms, 5000);
        assert_eq!(config.assigned_count(), 3);

        let relay = &config.slots[0];
        assert_eq!(relay.pin, Some(5));
        assert_eq!(relay.name.as_str(), "relay");
        assert_eq!(relay.kind, IoKind::DigitalOut);
        assert_eq!(relay.initial, 1);

        let door = &config.slots[1];
        assert_eq!(door.kind, IoKind::StateInput);
        assert_eq!(door.pull, Pull::Up);
        assert_eq!(door.name.as_str(), "door");

        assert_eq!(config.slots[4].pin, Some(26));
        assert_eq!(config.slots[4].kind, IoKind::AnalogIn);
        assert_eq!(config.slots[2].pin, None);
    }

    #[test]
    fn test_parse_empty() {
        let config = parse_config("").unwrap();
        assert_eq!(config, IoConfig::new());
    }

    #[test]
    fn test_unassigned_pin() {
        let config = parse_config("[io.2]\npin = \"none\"\nkind = \"button\"\n").unwrap();
        assert_eq!(config.slots[2].pin, None);
        assert_eq!(config.slots[2].kind, IoKind::Button);
    }

    #[test]
    fn test_slot_out_of_range() {
        assert_eq!(
            parse_config("[io.8]\npin = 1\n"),
            Err(ConfigError::SlotOutOfRange)
        );
    }

    #[test]
    fn test_bad_section() {
        assert_eq!(
            parse_config("[stepper.spin]\n"),
            Err(ConfigError::InvalidSection)
        );
        assert_eq!(parse_config("[io.x]\n"), Err(ConfigError::InvalidSection));
    }

    #[test]
    fn test_bad_values() {
        assert_eq!(
            parse_config("[io.0]\nkind = \"servo\"\n"),
            Err(ConfigError::InvalidValue)
        );
        assert_eq!(
            parse_config("[io.0]\npin = \"pa5\"\n"),
            Err(ConfigError::InvalidPin)
        );
        assert_eq!(
            parse_config("[io.0]\ncolour = 3\n"),
            Err(ConfigError::InvalidValue)
        );
        assert_eq!(
            parse_config("[io.0]\nname = \"this-label-is-too-long\"\n"),
            Err(ConfigError::NameTooLong)
        );
        assert_eq!(parse_config("garbage\n"), Err(ConfigError::InvalidValue));
    }

    #[test]
    fn test_hash_inside_string() {
        let config = parse_config("[io.0]\nname = \"led#1\"\npin = 3\n").unwrap();
        assert_eq!(config.slots[0].name.as_str(), "led#1");
    }
}
