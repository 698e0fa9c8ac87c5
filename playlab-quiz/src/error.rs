use thiserror::Error;

#[derive(Debug, Error)]
pub enum QuizError {
    #[error("choice {choice} out of range; question has {options} options")]
    ChoiceOutOfRange { choice: usize, options: usize },
    #[error("quiz already complete")]
    AlreadyComplete,
    #[error("quiz incomplete: {answered} of {total} answered")]
    Incomplete { answered: usize, total: usize },
    #[error("malformed question bank: {0}")]
    Bank(#[from] serde_json::Error),
    #[error("question bank has no questions")]
    EmptyBank,
}
