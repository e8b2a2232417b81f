//! ConnectionStatus - tri-state link to the therapy device.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Link state of the paired therapy device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

impl ConnectionStatus {
    /// Returns true if therapy commands can be sent.
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionStatus::Connected)
    }

    /// Returns true while a scan or connect attempt is running.
    pub fn is_busy(&self) -> bool {
        matches!(self, ConnectionStatus::Connecting)
    }
}

impl StateMachine for ConnectionStatus {
    fn valid_transitions(&self) -> Vec<Self> {
        use ConnectionStatus::*;
        match self {
            Disconnected => vec![Connecting],
            Connecting => vec![Connected, Disconnected],
            Connected => vec![Disconnected],
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConnectionStatus::Disconnected => "disconnected",
            ConnectionStatus::Connecting => "connecting",
            ConnectionStatus::Connected => "connected",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_disconnected() {
        assert_eq!(ConnectionStatus::default(), ConnectionStatus::Disconnected);
    }

    #[test]
    fn connect_goes_through_connecting() {
        let status = ConnectionStatus::Disconnected
            .transition_to(ConnectionStatus::Connecting)
            .unwrap();
        assert!(status.is_busy());
        let status = status.transition_to(ConnectionStatus::Connected).unwrap();
        assert!(status.is_connected());
    }

    #[test]
    fn cannot_jump_straight_to_connected() {
        assert!(!ConnectionStatus::Disconnected.can_transition_to(&ConnectionStatus::Connected));
    }

    #[test]
    fn failed_attempt_returns_to_disconnected() {
        assert!(ConnectionStatus::Connecting.can_transition_to(&ConnectionStatus::Disconnected));
    }

    #[test]
    fn no_state_is_terminal() {
        for status in [
            ConnectionStatus::Disconnected,
            ConnectionStatus::Connecting,
            ConnectionStatus::Connected,
        ] {
            assert!(!status.is_terminal());
        }
    }

    #[test]
    fn serializes_as_snake_case() {
        let json = serde_json::to_string(&ConnectionStatus::Connecting).unwrap();
        assert_eq!(json, "\"connecting\"");
        assert_eq!(ConnectionStatus::Connected.to_string(), "connected");
    }
}
