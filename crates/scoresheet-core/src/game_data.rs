use serde::{Deserialize, Serialize};

/// Placeholder for any header the transcription did not carry.
pub const UNKNOWN: &str = "Unknown";

/// The nine tags reported for every scoresheet, in output order.
pub const HEADER_KEYS: [&str; 9] = [
    "Event", "Site", "Date", "Round", "White", "Black", "Result", "WhiteElo", "BlackElo",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GameHeaders {
    pub event: String,
    pub site: String,
    pub date: String,
    pub round: String,
    pub white: String,
    pub black: String,
    pub result: String, // "1-0", "0-1", "1/2-1/2"
    pub white_elo: String,
    pub black_elo: String,
}

impl Default for GameHeaders {
    fn default() -> Self {
        Self {
            event: UNKNOWN.to_string(),
            site: UNKNOWN.to_string(),
            date: UNKNOWN.to_string(),
            round: UNKNOWN.to_string(),
            white: UNKNOWN.to_string(),
            black: UNKNOWN.to_string(),
            result: UNKNOWN.to_string(),
            white_elo: UNKNOWN.to_string(),
            black_elo: UNKNOWN.to_string(),
        }
    }
}

impl GameHeaders {
    /// Mutable slot for a canonical tag name, `None` for anything else.
    pub fn slot_mut(&mut self, key: &str) -> Option<&mut String> {
        let slot = match key {
            "Event" => &mut self.event,
            "Site" => &mut self.site,
            "Date" => &mut self.date,
            "Round" => &mut self.round,
            "White" => &mut self.white,
            "Black" => &mut self.black,
            "Result" => &mut self.result,
            "WhiteElo" => &mut self.white_elo,
            "BlackElo" => &mut self.black_elo,
            _ => return None,
        };
        Some(slot)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        let value = match key {
            "Event" => &self.event,
            "Site" => &self.site,
            "Date" => &self.date,
            "Round" => &self.round,
            "White" => &self.white,
            "Black" => &self.black,
            "Result" => &self.result,
            "WhiteElo" => &self.white_elo,
            "BlackElo" => &self.black_elo,
            _ => return None,
        };
        Some(value.as_str())
    }

    /// Keys still holding the placeholder.
    pub fn missing(&self) -> Vec<&'static str> {
        HEADER_KEYS
            .iter()
            .copied()
            .filter(|key| self.get(key) == Some(UNKNOWN))
            .collect()
    }
}

/// Outcome of replaying a movetext from the initial position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ValidationVerdict {
    pub is_valid: bool,
    pub message: String,
}

impl ValidationVerdict {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            message: "Moves validated successfully".to_string(),
        }
    }

    pub fn unparsable() -> Self {
        Self {
            is_valid: false,
            message: "Unable to parse the game".to_string(),
        }
    }

    pub fn invalid(reason: impl std::fmt::Display) -> Self {
        Self {
            is_valid: false,
            message: format!("Invalid chess moves: {reason}"),
        }
    }
}
