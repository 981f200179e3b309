use async_openai::types::{ResponseFormat, ResponseFormatJsonSchema};
use serde_json::{Value, json};

use crate::game_state::INITIAL_TURNS;

const SCHEMA_NAME: &str = "game_turn";

pub const OPENING_MESSAGE: &str = "Initialize the case. Describe the horrifying scene as teacher 許淑媚 \
     steps into the crime scene (the Culinary Class 3 classroom), and list every student present.";

const INSTRUCTIONS: &str = r#"
You are the Game Master (GM) of a modern campus murder-mystery.
Your goal is to present a tense, realistic and frightening school detective game through prose and structured data.

## Setting
1. Case: the murder in Culinary Class 3 of Hujiang High School.
2. Tone: modern campus, gory, horror, suspense.
3. Player character: 許淑媚, homeroom teacher of Culinary Class 3 (female), trying to protect her students and find the truth.
4. Objective: within {turns} turns, identify the killer of 壽司, the murder weapon and the motive.

## Cast (the `characters` list must use exactly these names)
- 壽司 (victim): female. Found brutally killed in the classroom.
- 王洧邦 (class monitor / potential suspect): male.
- 許晉嘉 (classmate A / witness / potential suspect): male.
- 張瑞麟 (classmate B / witness / potential suspect): male.
- 戴沂臻 (classmate C / witness / potential suspect): female.
- 林主安 (classmate / witness): male.
- 小小 (outsider / witness): male.
- 許淑媚 (the player): teacher.

## GM rules
1. Language: write every player-facing string in {language}.
2. Narration:
   - Keep the tension of the crime scene and the details of the classroom alive (HELP written in blood on the blackboard, blood on the floor, the smell of rust in the air, panicking and sobbing students).
   - Describe the outcome of each player action and move the story forward.
3. State:
   - `characters`: every reply includes every cast member above.
     - The status of the victim 壽司 is always 'deceased'.
     - Names match the list above exactly.
   - `evidence`: add clues to this array as they are discovered (a bloody kitchen knife, recipe notes, phone messages, ...).
   - `turns_left`: decrease by one every player action. When it reaches 0 the game ends.
   - `game_status`: 'won' once the player has named the killer, the weapon and the motive correctly, 'lost' when the player fails irrecoverably, 'playing' otherwise.
4. Opening:
   - Location: the Culinary Class 3 classroom of Hujiang High School.
   - Scene: 許淑媚 has just walked into the classroom and sees the shocking, bloody scene. The blackboard may carry marks or a call for help left by the victim. The students are panicking.

Remember: you are both the computer system and the storyteller. Guide 許淑媚 to the truth.
"#;

/// System prompt for a new case, written in `language`.
pub fn instructions(language: &str) -> String {
    INSTRUCTIONS
        .replace("{turns}", &INITIAL_TURNS.to_string())
        .replace("{language}", language)
        .trim()
        .to_string()
}

/// JSON schema every turn response is held to.
pub fn turn_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "narrative": {
                "type": "string",
                "description": "The story so far for this turn: dialogue and description of the surroundings, in Markdown."
            },
            "location_name": {
                "type": "string",
                "description": "Name of the exact current location, for example 'Culinary Class 3 classroom' or 'Hallway'."
            },
            "suggestions": {
                "type": "array",
                "items": { "type": "string" },
                "description": "3 short, concrete suggestions for the next action."
            },
            "turns_left": {
                "type": "integer",
                "description": "Number of turns remaining."
            },
            "game_status": {
                "type": "string",
                "enum": ["playing", "won", "lost"]
            },
            "characters": {
                "type": "array",
                "description": "Every relevant character and their current state.",
                "items": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "string" },
                        "name": { "type": "string", "description": "Full name only, no brackets or titles." },
                        "role": { "type": "string", "description": "Role in the case, such as 'class monitor' or 'witness'." },
                        "status": { "type": "string", "enum": ["alive", "deceased", "missing", "arrested"] },
                        "is_interrogating": { "type": "boolean", "description": "True while the player is talking to or investigating this person." },
                        "description": { "type": "string", "description": "One short sentence." },
                        "avatar_keyword": {
                            "type": "string",
                            "enum": ["man", "woman", "old", "young", "scar", "singer"],
                            "description": "Keyword used to pick a portrait."
                        }
                    },
                    "required": ["id", "name", "role", "status", "is_interrogating", "avatar_keyword"]
                }
            },
            "evidence": {
                "type": "array",
                "description": "Every clue and piece of evidence the player has found so far.",
                "items": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "string" },
                        "name": { "type": "string" },
                        "description": { "type": "string" },
                        "icon_type": { "type": "string", "enum": ["document", "weapon", "item", "place"] }
                    },
                    "required": ["id", "name", "description", "icon_type"]
                }
            }
        },
        "required": ["narrative", "location_name", "suggestions", "turns_left", "game_status", "characters", "evidence"]
    })
}

pub fn response_format() -> ResponseFormat {
    ResponseFormat::JsonSchema {
        json_schema: ResponseFormatJsonSchema {
            description: Some("One turn of the murder-mystery game.".into()),
            name: SCHEMA_NAME.into(),
            schema: Some(turn_schema()),
            strict: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instructions_fill_turns_and_language() {
        let prompt = instructions("Traditional Chinese (Taiwan)");
        assert!(prompt.contains("within 15 turns"));
        assert!(prompt.contains("in Traditional Chinese (Taiwan)."));
        assert!(!prompt.contains('{'));
    }

    #[test]
    fn schema_requires_every_turn_field() {
        let schema = turn_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .expect("required should be an array")
            .iter()
            .filter_map(Value::as_str)
            .collect();
        for field in ["narrative", "turns_left", "game_status", "characters", "evidence"] {
            assert!(required.contains(&field), "{field} missing");
        }
    }
}
