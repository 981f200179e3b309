use thiserror::Error;

// Enum for handling various application-level errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error), // Errors related to settings (de)serialization.

    #[error("IO error: {0}")]
    IO(#[from] std::io::Error), // Input/output errors.

    #[error("Logger error: {0}")]
    Logger(#[from] log::SetLoggerError), // A logger was already installed.

    #[error("Home directory not found")]
    NoHomeDirectory,
}

// Why a single exchange with the Game Master produced no usable turn.
#[derive(Debug, Error)]
pub enum ReplyError {
    #[error("OpenAI API error: {0}")]
    Api(#[from] async_openai::error::OpenAIError),

    #[error("No response from the Game Master")]
    Empty,

    #[error("Malformed turn response: {0}")]
    Malformed(#[from] serde_json::Error),
}

// Errors surfaced by the conversation session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to initialize the game: {0}")]
    Initialization(#[source] ReplyError), // Fatal to the session, play stops until restart.

    #[error("Failed to process action: {0}")]
    Turn(#[source] ReplyError), // Non fatal, the session stays usable.

    #[error("Game session not initialized")]
    NotInitialized, // An action reached the session before `start`.
}

// Requests the game controller refuses without touching any state.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("The Game Master is still answering")]
    Busy,

    #[error("The game is not in progress")]
    NotPlaying,

    #[error("Cannot submit an empty action")]
    EmptyAction,
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
