use serde::{Deserialize, Serialize};

/// Level difficulty rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Easy" => Some(Self::Easy),
            "Medium" => Some(Self::Medium),
            "Hard" => Some(Self::Hard),
            "Expert" => Some(Self::Expert),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
            Self::Expert => "Expert",
        }
    }
}

/// A single coding challenge.
///
/// `level_number` is the stable external key; it orders the catalog and is
/// what prerequisites reference. The row id stays internal.
#[derive(Debug, Clone, Serialize)]
pub struct Level {
    #[serde(skip_serializing)]
    pub id: i64,
    pub level_number: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub difficulty: Difficulty,
    pub xp_reward: i64,
    pub starter_code: String,
    pub expected_output: String,
    pub hints: Vec<String>,
    pub prerequisites: Vec<i64>,
    pub is_active: bool,
}

/// Level definition without a row id: the shape of the built-in seed set and
/// of the admin create-level request body.
#[derive(Debug, Clone, Deserialize)]
pub struct LevelSpec {
    pub level_number: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub difficulty: Difficulty,
    pub xp_reward: i64,
    pub starter_code: String,
    pub expected_output: String,
    #[serde(default)]
    pub hints: Vec<String>,
    #[serde(default)]
    pub prerequisites: Vec<i64>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_round_trip() {
        for s in ["Easy", "Medium", "Hard", "Expert"] {
            assert_eq!(Difficulty::from_str(s).unwrap().as_str(), s);
        }
        assert!(Difficulty::from_str("easy").is_none());
        assert!(Difficulty::from_str("Impossible").is_none());
    }
}
