/// Debounced, power-conserving control of a double solenoid valve driven by two spike relays.
use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::relay::{Relay, RelayValue};
use serde::{Deserialize, Serialize};
use std::ops::Not;
use std::time::Duration;

#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum SolenoidState {
    Open,
    Closed,
}

impl SolenoidState {
    pub fn is_open(&self) -> bool {
        *self == SolenoidState::Open
    }
}

impl From<bool> for SolenoidState {
    fn from(open: bool) -> Self {
        if open {
            SolenoidState::Open
        } else {
            SolenoidState::Closed
        }
    }
}

impl Not for SolenoidState {
    type Output = SolenoidState;
    fn not(self) -> SolenoidState {
        match self {
            SolenoidState::Open => SolenoidState::Closed,
            SolenoidState::Closed => SolenoidState::Open,
        }
    }
}

/// Request to invert the commanded state.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Toggle;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Phase {
    /// A change was accepted; the next update only re-arms the fire timer.
    AwaitingArm,
    /// The coil for the commanded state is energized.
    Firing,
    /// Both relays held on, no net force on the valve.
    IdleHold,
}

/// What one control cycle asks of the relay pair.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Command {
    Arm,
    Fire(SolenoidState),
    Hold,
}

impl Command {
    /// Values for the (open, close) relays, `None` when nothing is written.
    pub fn outputs(&self) -> Option<(RelayValue, RelayValue)> {
        match self {
            Command::Arm => None,
            Command::Fire(SolenoidState::Open) => Some((RelayValue::Forward, RelayValue::On)),
            Command::Fire(SolenoidState::Closed) => Some((RelayValue::On, RelayValue::Forward)),
            Command::Hold => Some((RelayValue::On, RelayValue::On)),
        }
    }

    /// The relay activity that starts when `self` follows `previous`.
    pub fn transition_from(&self, previous: Option<Command>) -> Option<Transition> {
        match (previous, *self) {
            (Some(Command::Fire(before)), Command::Fire(state)) if before == state => None,
            (_, Command::Fire(state)) => Some(Transition::Fire(state)),
            (Some(Command::Fire(_)), Command::Hold) => Some(Transition::Hold),
            _ => None,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Transition {
    Fire(SolenoidState),
    Hold,
}

/// Timing state of a double solenoid, free of any hardware.
///
/// Every method takes the current time so the same logic runs against a real
/// clock or a simulated one.
#[derive(Debug, Clone)]
pub struct Valve {
    state: SolenoidState,
    state_changed: bool,
    last_state_change: Option<u64>,
    debounce_ms: u64,
}

impl Valve {
    /// How long the coil stays energized after a change before both relays go to hold.
    pub const FIRE_WAIT: Duration = Duration::from_millis(500);

    pub fn new(debounce_ms: u64, initial_state: SolenoidState) -> Valve {
        Valve {
            state: initial_state,
            // The first update after construction only arms the timer.
            state_changed: true,
            last_state_change: None,
            debounce_ms,
        }
    }

    fn fire_wait_ms() -> u64 {
        Valve::FIRE_WAIT.as_millis() as u64
    }

    fn elapsed(&self, now: u64) -> Option<u64> {
        self.last_state_change.map(|last| now.saturating_sub(last))
    }

    /// Records the desired state if the debounce interval has passed.
    ///
    /// A rejected request restarts the debounce interval, so requests arriving
    /// faster than the interval are all ignored until they stop. Returns
    /// whether the request was accepted.
    pub fn set(&mut self, desired: SolenoidState, now: u64) -> bool {
        let accepted = match self.elapsed(now) {
            None => true,
            Some(elapsed) => elapsed > self.debounce_ms,
        };
        if accepted {
            if self.state != desired {
                self.state_changed = true;
            }
            self.state = desired;
        } else {
            self.last_state_change = Some(now);
        }
        accepted
    }

    pub fn flip(&mut self, now: u64) -> bool {
        self.set(!self.state, now)
    }

    /// Advances one control cycle.
    pub fn update(&mut self, now: u64) -> Command {
        if self.state_changed {
            self.last_state_change = Some(now);
            self.state_changed = false;
            return Command::Arm;
        }
        match self.elapsed(now) {
            Some(elapsed) if elapsed < Valve::fire_wait_ms() => Command::Fire(self.state),
            _ => Command::Hold,
        }
    }

    pub fn phase(&self, now: u64) -> Phase {
        if self.state_changed {
            return Phase::AwaitingArm;
        }
        match self.elapsed(now) {
            Some(elapsed) if elapsed < Valve::fire_wait_ms() => Phase::Firing,
            _ => Phase::IdleHold,
        }
    }

    pub fn state(&self) -> SolenoidState {
        self.state
    }

    #[cfg(test)]
    pub(crate) fn is_changed(&self) -> bool {
        self.state_changed
    }

    #[cfg(test)]
    pub(crate) fn last_state_change(&self) -> Option<u64> {
        self.last_state_change
    }

    pub fn debounce_ms(&self) -> u64 {
        self.debounce_ms
    }
}

#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SolenoidConfig {
    pub debounce_ms: i64,
    pub initial_state: SolenoidState,
}

impl SolenoidConfig {
    pub const DEFAULT_DEBOUNCE_MS: i64 = 1000;

    pub fn validate(&self) -> Result<u64> {
        u64::try_from(self.debounce_ms).map_err(|_| {
            Error::Config(format!(
                "Debounce interval must not be negative, got {}ms",
                self.debounce_ms
            ))
        })
    }
}

impl Default for SolenoidConfig {
    fn default() -> Self {
        SolenoidConfig {
            debounce_ms: SolenoidConfig::DEFAULT_DEBOUNCE_MS,
            initial_state: SolenoidState::Closed,
        }
    }
}

/// A double solenoid wired to an opening relay and a closing relay.
pub struct DoubleSolenoid {
    open_spike: Box<dyn Relay>,
    close_spike: Box<dyn Relay>,
    clock: Box<dyn Clock>,
    valve: Valve,
    last_command: Option<Command>,
}

impl DoubleSolenoid {
    pub fn new(
        open_spike: Box<dyn Relay>,
        close_spike: Box<dyn Relay>,
        clock: Box<dyn Clock>,
        config: SolenoidConfig,
    ) -> Result<DoubleSolenoid> {
        let debounce_ms = config.validate()?;
        log::info!(
            "Double solenoid starting {:?} with {}ms debounce",
            config.initial_state,
            debounce_ms
        );
        Ok(DoubleSolenoid {
            open_spike,
            close_spike,
            clock,
            valve: Valve::new(debounce_ms, config.initial_state),
            last_command: None,
        })
    }

    /// 1000ms debounce, starting closed.
    pub fn with_defaults(
        open_spike: Box<dyn Relay>,
        close_spike: Box<dyn Relay>,
        clock: Box<dyn Clock>,
    ) -> Result<DoubleSolenoid> {
        DoubleSolenoid::new(open_spike, close_spike, clock, SolenoidConfig::default())
    }

    pub fn set(&mut self, desired: SolenoidState) {
        let now = self.clock.now_ms();
        if self.valve.set(desired, now) {
            log::debug!("Solenoid request {:?} accepted at {}ms", desired, now);
        } else {
            log::debug!("Solenoid request {:?} debounced at {}ms", desired, now);
        }
    }

    pub fn flip(&mut self) {
        self.set(!self.valve.state());
    }

    /// Runs one control cycle and writes the resulting values to the relays.
    pub fn update(&mut self) -> Result<Command> {
        let now = self.clock.now_ms();
        let command = self.valve.update(now);
        log::trace!("Solenoid cycle at {}ms: {:?}", now, command);
        match command.transition_from(self.last_command) {
            Some(Transition::Fire(state)) => log::info!("Firing solenoid {:?}", state),
            Some(Transition::Hold) => log::info!("Solenoid fire window over, holding"),
            None if command == Command::Arm => log::debug!("Fire timer armed at {}ms", now),
            None => (),
        }
        self.last_command = Some(command);
        if let Some((open, close)) = command.outputs() {
            self.open_spike.set_value(open)?;
            self.close_spike.set_value(close)?;
        }
        Ok(command)
    }

    pub fn last_command(&self) -> Option<Command> {
        self.last_command
    }

    pub fn state(&self) -> SolenoidState {
        self.valve.state()
    }

    pub fn phase(&self) -> Phase {
        self.valve.phase(self.clock.now_ms())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.valve.debounce_ms())
    }
}
