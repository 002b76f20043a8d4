use crate::error::{Error, Result};
use crate::solenoid::{SolenoidConfig, SolenoidState};
use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

pub const OPEN_FORWARD_PIN: &str = "SOLENOID_OPEN_FORWARD_PIN";
pub const OPEN_REVERSE_PIN: &str = "SOLENOID_OPEN_REVERSE_PIN";
pub const CLOSE_FORWARD_PIN: &str = "SOLENOID_CLOSE_FORWARD_PIN";
pub const CLOSE_REVERSE_PIN: &str = "SOLENOID_CLOSE_REVERSE_PIN";
pub const DEBOUNCE_MS: &str = "SOLENOID_DEBOUNCE_MS";
pub const INITIAL_STATE: &str = "SOLENOID_INITIAL_STATE";
pub const CYCLE_MS: &str = "SOLENOID_CYCLE_MS";
pub const LISTEN_ADDR: &str = "SOLENOID_LISTEN_ADDR";

pub const DEFAULT_CYCLE_MS: u64 = 20;
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:2000";

/// GPIO lines of one Spike relay.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SpikePins {
    pub forward: u64,
    pub reverse: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub open_spike: SpikePins,
    pub close_spike: SpikePins,
    pub solenoid: SolenoidConfig,
    pub cycle: Duration,
    pub listen_addr: SocketAddr,
}

impl Config {
    /// Reads the configuration from the process environment. Call `dotenv` first to pick up a `.env` file.
    pub fn from_env() -> Result<Config> {
        Config::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Config> {
        let required = |key: &str| -> Result<u64> {
            let value = lookup(key).ok_or_else(|| Error::Config(format!("{} is not set", key)))?;
            parse(key, &value)
        };
        let optional = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let open_spike = SpikePins {
            forward: required(OPEN_FORWARD_PIN)?,
            reverse: required(OPEN_REVERSE_PIN)?,
        };
        let close_spike = SpikePins {
            forward: required(CLOSE_FORWARD_PIN)?,
            reverse: required(CLOSE_REVERSE_PIN)?,
        };
        let debounce_ms = parse(
            DEBOUNCE_MS,
            &optional(DEBOUNCE_MS, &SolenoidConfig::DEFAULT_DEBOUNCE_MS.to_string()),
        )?;
        let initial_state = parse_state(&optional(INITIAL_STATE, "closed"))?;
        let cycle_ms: u64 = parse(CYCLE_MS, &optional(CYCLE_MS, &DEFAULT_CYCLE_MS.to_string()))?;
        let listen_addr = parse(LISTEN_ADDR, &optional(LISTEN_ADDR, DEFAULT_LISTEN_ADDR))?;

        let config = Config {
            open_spike,
            close_spike,
            solenoid: SolenoidConfig {
                debounce_ms,
                initial_state,
            },
            cycle: Duration::from_millis(cycle_ms),
            listen_addr,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.solenoid.validate()?;
        if self.cycle.is_zero() {
            return Err(Error::Config("Cycle period must be greater than 0ms".to_string()));
        }
        let pins = [
            self.open_spike.forward,
            self.open_spike.reverse,
            self.close_spike.forward,
            self.close_spike.reverse,
        ];
        for (i, pin) in pins.iter().enumerate() {
            if pins[i + 1..].contains(pin) {
                return Err(Error::Config(format!("GPIO {} is assigned to more than one relay line", pin)));
            }
        }
        Ok(())
    }
}

fn parse<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Config(format!("{} has invalid value '{}'", key, value)))
}

fn parse_state(value: &str) -> Result<SolenoidState> {
    match value.trim().to_ascii_lowercase().as_str() {
        "open" | "true" => Ok(SolenoidState::Open),
        "closed" | "close" | "false" => Ok(SolenoidState::Closed),
        _ => Err(Error::Config(format!("{} has invalid value '{}'", INITIAL_STATE, value))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const PINS: [(&str, &str); 4] = [
        (OPEN_FORWARD_PIN, "48"),
        (OPEN_REVERSE_PIN, "49"),
        (CLOSE_FORWARD_PIN, "60"),
        (CLOSE_REVERSE_PIN, "61"),
    ];

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&PINS)).unwrap();
        assert_eq!(config.open_spike, SpikePins { forward: 48, reverse: 49 });
        assert_eq!(config.close_spike, SpikePins { forward: 60, reverse: 61 });
        assert_eq!(config.solenoid, SolenoidConfig::default());
        assert_eq!(config.cycle, Duration::from_millis(20));
        assert_eq!(config.listen_addr, "127.0.0.1:2000".parse().unwrap());
    }

    #[test]
    fn test_overrides() {
        let mut pairs = PINS.to_vec();
        pairs.extend([
            (DEBOUNCE_MS, "250"),
            (INITIAL_STATE, "Open"),
            (CYCLE_MS, "50"),
            (LISTEN_ADDR, "0.0.0.0:4000"),
        ]);
        let config = Config::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(config.solenoid.debounce_ms, 250);
        assert_eq!(config.solenoid.initial_state, SolenoidState::Open);
        assert_eq!(config.cycle, Duration::from_millis(50));
        assert_eq!(config.listen_addr.port(), 4000);
    }

    #[test]
    fn test_missing_pin() {
        let result = Config::from_lookup(lookup(&PINS[..3]));
        assert!(matches!(result, Err(Error::Config(message)) if message.contains(CLOSE_REVERSE_PIN)));
    }

    #[test]
    fn test_negative_debounce() {
        let mut pairs = PINS.to_vec();
        pairs.push((DEBOUNCE_MS, "-5"));
        assert!(matches!(Config::from_lookup(lookup(&pairs)), Err(Error::Config(_))));
    }

    #[test]
    fn test_shared_pin() {
        let mut pairs = PINS.to_vec();
        pairs[3] = (CLOSE_REVERSE_PIN, "48");
        assert!(matches!(Config::from_lookup(lookup(&pairs)), Err(Error::Config(_))));
    }

    #[test]
    fn test_bad_values() {
        for (key, value) in [(CYCLE_MS, "0"), (INITIAL_STATE, "ajar"), (DEBOUNCE_MS, "soon")] {
            let mut pairs = PINS.to_vec();
            pairs.push((key, value));
            assert!(Config::from_lookup(lookup(&pairs)).is_err(), "{} = {}", key, value);
        }
    }
}
