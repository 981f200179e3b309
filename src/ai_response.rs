// src/ai_response.rs
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display};

use crate::error::ReplyError;

pub const MAX_SUGGESTIONS: usize = 3;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GameStatus {
    Playing,
    Won,
    Lost,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CharacterStatus {
    Alive,
    Deceased,
    Missing,
    Arrested,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AvatarKeyword {
    Man,
    Woman,
    Old,
    Young,
    Scar,
    Singer,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EvidenceKind {
    Document,
    Weapon,
    Item,
    Place,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Character {
    pub id: String,
    pub name: String,
    pub role: String,
    pub status: CharacterStatus,
    pub is_interrogating: bool,
    #[serde(default)]
    pub description: String,
    pub avatar_keyword: AvatarKeyword,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Evidence {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon_type: EvidenceKind,
}

/// One structured reply from the Game Master. Every turn carries the whole
/// visible state, nothing is sent as a delta.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TurnResponse {
    pub narrative: String,
    #[serde(default)]
    pub location_name: Option<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
    pub turns_left: i32,
    pub game_status: GameStatus,
    #[serde(default)]
    pub characters: Vec<Character>,
    #[serde(default)]
    pub evidence: Vec<Evidence>,
}

impl TurnResponse {
    /// Parses the raw reply text. Blank text and text that does not match the
    /// turn shape are both reply failures.
    pub fn from_reply(text: Option<&str>) -> Result<Self, ReplyError> {
        let text = text.map(str::trim).filter(|text| !text.is_empty());
        let Some(text) = text else {
            return Err(ReplyError::Empty);
        };
        let mut response: TurnResponse = serde_json::from_str(strip_code_fence(text))?;
        response.suggestions.truncate(MAX_SUGGESTIONS);
        Ok(response)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    // Turns_left reaching zero ends the game whatever the status says.
    pub fn is_final(&self) -> bool {
        matches!(self.game_status, GameStatus::Won | GameStatus::Lost) || self.turns_left <= 0
    }
}

// Some OpenAI-compatible endpoints wrap structured output in a ```json fence.
fn strip_code_fence(text: &str) -> &str {
    let Some(inner) = text.strip_prefix("```") else {
        return text;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}
