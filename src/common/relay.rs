/// Relay outputs driving the coils of a double solenoid.
use crate::error::Result;
use serde::{Deserialize, Serialize};
use sysfs_gpio::{Direction, Pin};

#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum RelayValue {
    Off,
    On,
    Forward,
    Reverse,
}

impl RelayValue {
    /// Levels of the (M+, M-) lines of a Spike for this value.
    fn line_values(&self) -> (u8, u8) {
        match &self {
            RelayValue::Off => (0, 0),
            RelayValue::On => (1, 1),
            RelayValue::Forward => (1, 0),
            RelayValue::Reverse => (0, 1),
        }
    }
}

/// One of the two output lines of a Spike.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Line {
    Forward,
    Reverse,
}

/// Line writes needed to move a Spike from `previous` to `value`, in order.
///
/// A falling line is always written before a rising one so M+ and M- never
/// swap while both are high. Nothing is written when the value is unchanged.
pub fn line_writes(previous: Option<RelayValue>, value: RelayValue) -> Vec<(Line, u8)> {
    if previous == Some(value) {
        return Vec::new();
    }
    let (forward, reverse) = value.line_values();
    if forward == 0 {
        vec![(Line::Forward, forward), (Line::Reverse, reverse)]
    } else {
        vec![(Line::Reverse, reverse), (Line::Forward, forward)]
    }
}

pub trait Relay: Send {
    fn set_value(&mut self, value: RelayValue) -> Result<()>;
}

/// A Spike relay whose two output lines are wired to sysfs GPIO pins.
pub struct SpikeRelay {
    forward: Pin,
    reverse: Pin,
    value: Option<RelayValue>,
}

impl SpikeRelay {
    pub fn new(forward_pin: u64, reverse_pin: u64) -> Result<SpikeRelay> {
        let forward = Pin::new(forward_pin);
        let reverse = Pin::new(reverse_pin);
        for pin in [&forward, &reverse] {
            if !pin.is_exported() {
                pin.export()?;
            }
            pin.set_direction(Direction::Out)?;
        }
        log::debug!("Spike relay ready on GPIO {} / {}", forward_pin, reverse_pin);
        Ok(SpikeRelay {
            forward,
            reverse,
            value: None,
        })
    }

    pub fn get_value(&self) -> Option<RelayValue> {
        self.value
    }
}

impl Relay for SpikeRelay {
    fn set_value(&mut self, value: RelayValue) -> Result<()> {
        for (line, level) in line_writes(self.value, value) {
            match line {
                Line::Forward => self.forward.set_value(level)?,
                Line::Reverse => self.reverse.set_value(level)?,
            }
        }
        self.value = Some(value);
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_values() {
        assert_eq!(RelayValue::Off.line_values(), (0, 0));
        assert_eq!(RelayValue::On.line_values(), (1, 1));
        assert_eq!(RelayValue::Forward.line_values(), (1, 0));
        assert_eq!(RelayValue::Reverse.line_values(), (0, 1));
    }

    #[test]
    fn test_on_to_forward_lowers_reverse_first() {
        let writes = line_writes(Some(RelayValue::On), RelayValue::Forward);
        assert_eq!(writes, vec![(Line::Reverse, 0), (Line::Forward, 1)]);
    }

    #[test]
    fn test_on_to_reverse_lowers_forward_first() {
        let writes = line_writes(Some(RelayValue::On), RelayValue::Reverse);
        assert_eq!(writes, vec![(Line::Forward, 0), (Line::Reverse, 1)]);
    }

    #[test]
    fn test_unchanged_value_writes_nothing() {
        assert!(line_writes(Some(RelayValue::On), RelayValue::On).is_empty());
        assert!(line_writes(Some(RelayValue::Forward), RelayValue::Forward).is_empty());
    }

    #[test]
    fn test_first_write_sets_both_lines() {
        let writes = line_writes(None, RelayValue::On);
        assert_eq!(writes, vec![(Line::Reverse, 1), (Line::Forward, 1)]);
        let writes = line_writes(None, RelayValue::Off);
        assert_eq!(writes, vec![(Line::Forward, 0), (Line::Reverse, 0)]);
    }

    #[test]
    fn test_recording_relay() {
        let relay = testing::RecordingRelay::new();
        let mut handle = relay.clone();
        handle.set_value(RelayValue::Forward).unwrap();
        handle.set_value(RelayValue::On).unwrap();
        assert_eq!(relay.history(), vec![RelayValue::Forward, RelayValue::On]);
        assert_eq!(relay.last(), Some(RelayValue::On));
    }

    #[test]
    fn test_relay_value_json() {
        let json = serde_json::to_string(&RelayValue::Forward).unwrap();
        assert_eq!(json, "\"Forward\"");
    }
}
