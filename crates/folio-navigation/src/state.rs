//! Gesture state machine
//!
//! ```text
//! Idle
//!   ↓ locking commit (wheel, or any animated commit with a unified lock)
//! Transitioning
//!   ↓ cooldown elapsed
//! Idle
//! ```
//!
//! While `Transitioning` the scroll lock is held and wheel input is ignored.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GestureState {
    /// Ready for the next gesture
    #[default]
    Idle,
    /// A transition's scroll animation is settling
    Transitioning,
}

impl GestureState {
    /// Check if transition to another state is valid
    pub fn can_transition_to(&self, target: GestureState) -> bool {
        match (self, target) {
            (GestureState::Idle, GestureState::Transitioning) => true,
            (GestureState::Transitioning, GestureState::Idle) => true,
            // Re-arming an in-flight lock
            (GestureState::Transitioning, GestureState::Transitioning) => true,
            _ => false,
        }
    }

    /// Returns true while wheel input must be ignored
    pub fn is_locked(&self) -> bool {
        matches!(self, GestureState::Transitioning)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GestureState::Idle => "idle",
            GestureState::Transitioning => "transitioning",
        }
    }
}

impl std::fmt::Display for GestureState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for GestureState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "idle" => Ok(GestureState::Idle),
            "transitioning" => Ok(GestureState::Transitioning),
            _ => Err(format!("Unknown gesture state: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions() {
        assert!(GestureState::Idle.can_transition_to(GestureState::Transitioning));
        assert!(GestureState::Transitioning.can_transition_to(GestureState::Idle));
        assert!(GestureState::Transitioning.can_transition_to(GestureState::Transitioning));
        // Releasing a lock that is not held is a bug in the caller
        assert!(!GestureState::Idle.can_transition_to(GestureState::Idle));
    }

    #[test]
    fn test_parse() {
        assert_eq!("Idle".parse::<GestureState>(), Ok(GestureState::Idle));
        assert_eq!(
            "transitioning".parse::<GestureState>(),
            Ok(GestureState::Transitioning)
        );
        assert!("settling".parse::<GestureState>().is_err());
        assert_eq!(GestureState::Transitioning.to_string(), "transitioning");
    }
}
