use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("no sprite registered under key `{0}`")]
    UnknownSprite(String),
}

pub type GameResult<T> = Result<T, GameError>;
