//! Difficulty tiers and their request profiles.

use std::fmt;

/// The four difficulty tiers selectable in bot mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Insane,
}

impl Difficulty {
    /// All tiers in ascending strength, for UI enumeration.
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Insane,
    ];

    /// Parses a tier from its lowercase name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            "insane" => Some(Self::Insane),
            _ => None,
        }
    }

    /// The request profile for this tier.
    ///
    /// Persona strictness rises with the tier; randomness weight
    /// (sampling temperature) is high only at the bottom tier. `Insane`
    /// disables the fast-path hint so the service may spend extra
    /// latency on quality.
    pub fn profile(self) -> DifficultyProfile {
        match self {
            Self::Easy => DifficultyProfile {
                persona: "You are a novice chess player who often picks \
                          inaccurate moves. Reply ONLY with one move in SAN.",
                temperature: 0.9,
                fast_path: true,
            },
            Self::Medium => DifficultyProfile {
                persona: "You are an intermediate club chess player. \
                          Reply ONLY with one move in SAN.",
                temperature: 0.1,
                fast_path: true,
            },
            Self::Hard => DifficultyProfile {
                persona: "You are a chess master. Choose strong moves. \
                          Reply ONLY with one move in SAN.",
                temperature: 0.1,
                fast_path: true,
            },
            Self::Insane => DifficultyProfile {
                persona: "You are a chess grandmaster. Win at all costs. \
                          Reply ONLY with one move in SAN.",
                temperature: 0.1,
                fast_path: false,
            },
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Easy => write!(f, "easy"),
            Self::Medium => write!(f, "medium"),
            Self::Hard => write!(f, "hard"),
            Self::Insane => write!(f, "insane"),
        }
    }
}

/// What a single suggestion request asks of the service.
#[derive(Debug, Clone, PartialEq)]
pub struct DifficultyProfile {
    /// System instruction establishing the playing persona.
    pub persona: &'static str,
    /// Sampling temperature — the randomness weight.
    pub temperature: f32,
    /// When true, hint the service to answer with minimal deliberation.
    pub fast_path: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_insane_disables_fast_path() {
        for tier in Difficulty::ALL {
            let profile = tier.profile();
            assert_eq!(profile.fast_path, tier != Difficulty::Insane, "{tier}");
        }
    }

    #[test]
    fn test_only_easy_has_high_temperature() {
        assert!(Difficulty::Easy.profile().temperature > 0.5);
        for tier in [Difficulty::Medium, Difficulty::Hard, Difficulty::Insane] {
            assert!(tier.profile().temperature < 0.5, "{tier}");
        }
    }

    #[test]
    fn test_from_name_round_trips_display() {
        for tier in Difficulty::ALL {
            assert_eq!(Difficulty::from_name(&tier.to_string()), Some(tier));
        }
        assert_eq!(Difficulty::from_name("grandmaster"), None);
    }
}
