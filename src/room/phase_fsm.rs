use std::fmt;

use rust_fsm::state_machine;

/*
 * Lobby
 * Completing: players write one word per category
 * Voting: players judge each other's words
 * ScoreDisplay: scores are shown, then a new round or back to the lobby
 */
state_machine! {
    derive(Debug, Clone, PartialEq)
    pub PhaseFsm(Lobby)

    Lobby => {
        Start => Completing,
        End => Lobby,
    },
    Completing => {
        Advance => Voting,
        Restart => Completing,
        End => Lobby,
    },
    Voting => {
        Advance => ScoreDisplay,
        Restart => Completing,
        End => Lobby,
    },
    ScoreDisplay => {
        Restart => Completing,
        End => Lobby,
    }
}

pub type Phase = PhaseFsmState;

impl Phase {
    pub fn as_wire_str(&self) -> &'static str {
        match self {
            Phase::Lobby => "LOBBY",
            Phase::Completing => "COMPLETING",
            Phase::Voting => "VOTING",
            Phase::ScoreDisplay => "SCORE_DISPLAY",
        }
    }
}

impl fmt::Display for PhaseFsmState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl fmt::Display for PhaseFsmInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
