use super::constants::{MAX_ERRORS, POLL_INTERVAL, PROBE_INTERVAL};

use std::time::Duration;

/// Reachability of the server as far as the poll loop knows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Checking every [`PROBE_INTERVAL`] whether the server answers
    Probing,
    /// Polling status every [`POLL_INTERVAL`]
    Connected,
    /// Too many failures in a row; the monitor restarts from `Probing`
    Disconnected,
}

/// What the driver has to do after feeding a result into the [`Monitor`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    None,
    /// Probing -> Connected: arm the poll timer and refresh every collection
    Connected,
    /// Connected -> Disconnected: restart probing
    Lost,
}

/// Probe/poll state machine and its error counter
///
/// Holds no timers itself. The driver reads [`period()`](Monitor::period) to
/// arm exactly one timer and acts on the returned [`Transition`]s.
#[derive(Debug, Clone)]
pub struct Monitor {
    state: ConnectionState,
    error_count: u32,
}

impl Monitor {
    pub fn new() -> Self {
        let mut monitor = Self {
            state: ConnectionState::Probing,
            error_count: 0,
        };
        monitor.start();
        monitor
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn error_count(&self) -> u32 {
        self.error_count
    }

    /// (Re)enter probing with a clean error counter
    pub fn start(&mut self) {
        log::debug!("Setup connectivity tester");
        self.error_count = 0;
        self.state = ConnectionState::Probing;
    }

    /// Interval of the one timer that should be armed right now
    pub fn period(&self) -> Duration {
        match self.state {
            ConnectionState::Connected => POLL_INTERVAL,
            ConnectionState::Probing | ConnectionState::Disconnected => PROBE_INTERVAL,
        }
    }

    /// Any 200, 201 or 202 reply
    pub fn on_success(&mut self) -> Transition {
        self.error_count = 0;
        match self.state {
            ConnectionState::Probing => {
                log::debug!("Setup polling");
                self.state = ConnectionState::Connected;
                Transition::Connected
            }
            ConnectionState::Connected | ConnectionState::Disconnected => Transition::None,
        }
    }

    /// Transport error or unexpected status code
    ///
    /// Only counted while connected; a server that is off at startup is not
    /// an error.
    pub fn on_failure(&mut self) -> Transition {
        if self.state != ConnectionState::Connected {
            return Transition::None;
        }

        self.error_count += 1;
        log::debug!("Error count: {}", self.error_count);

        if self.error_count >= MAX_ERRORS {
            self.state = ConnectionState::Disconnected;
            Transition::Lost
        } else {
            Transition::None
        }
    }
}

impl Default for Monitor {
    fn default() -> Self {
        Self::new()
    }
}
