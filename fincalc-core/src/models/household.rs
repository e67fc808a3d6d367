use serde::{Deserialize, Serialize};

/// Household composition used to derive the number of tax parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HouseholdSituation {
    Single,
    Couple,
    Family,
}

impl HouseholdSituation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Couple => "couple",
            Self::Family => "family",
        }
    }

    /// Parses a situation code. `pacs` and `married` are accepted as couples.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Some(Self::Single),
            "couple" | "pacs" | "married" => Some(Self::Couple),
            "family" => Some(Self::Family),
            _ => None,
        }
    }

    pub fn is_single(&self) -> bool {
        matches!(self, Self::Single)
    }
}
