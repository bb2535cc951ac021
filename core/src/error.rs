use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Bomb probability is not a finite number")]
    InvalidProbability,
    #[error("Board shape does not match the configured size")]
    InvalidBoardShape,
}

pub type Result<T> = core::result::Result<T, GameError>;
