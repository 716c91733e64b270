//! Error taxonomy for the game. Every variant is isolated to the resource it
//! concerns; none of them ends the session.

use std::fmt;

use wasm_bindgen::JsValue;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// Word list or annotation data could not be fetched or parsed.
    DataLoad(String),
    /// A single mask image failed to load or decode.
    MaskLoad { word: String, reason: String },
    /// A click or selection needed a mask that is not loaded (yet, or ever).
    MaskNotReady(String),
    /// Tried to arm a word that is not currently offered.
    NotAnOption(String),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::DataLoad(s) => write!(f, "Data load error: {s}"),
            GameError::MaskLoad { word, reason } => {
                write!(f, "Failed to load mask for {word}: {reason}")
            }
            GameError::MaskNotReady(word) => write!(f, "Error loading data for {word}"),
            GameError::NotAnOption(word) => write!(f, "{word} is not one of the current options"),
        }
    }
}

impl std::error::Error for GameError {}

impl From<GameError> for JsValue {
    fn from(err: GameError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

impl From<serde_json::Error> for GameError {
    fn from(err: serde_json::Error) -> Self {
        GameError::DataLoad(err.to_string())
    }
}
