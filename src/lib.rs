pub mod ai;
pub mod ai_response;
pub mod app;
pub mod assistant;
pub mod controller;
pub mod error;
pub mod game_state;
pub mod logging;
pub mod message;
pub mod settings;
pub mod tui;
pub mod ui;

// Re-export commonly used items for easier access
pub use ai::{ChatTransport, GameMaster, GameSession};
pub use ai_response::{Character, CharacterStatus, Evidence, EvidenceKind, GameStatus, TurnResponse};
pub use controller::{CallOutcome, GameController, PendingCall};
pub use error::{GameError, ReplyError, SessionError};
pub use game_state::{GamePhase, GameState, Outcome};
pub use message::{Message, MessageType};
