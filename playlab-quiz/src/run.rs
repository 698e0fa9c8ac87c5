use crate::bank::{Choice, Question, QuizBank};
use crate::error::QuizError;
use crate::scoring::{self, QuizOutcome};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub answered: usize,
    pub total: usize,
}

impl Progress {
    pub fn is_complete(&self) -> bool {
        self.answered >= self.total
    }

    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 100;
        }
        (self.answered * 100 / self.total) as u32
    }
}

/// One pass through a quiz. Answers are taken strictly in question order.
#[derive(Debug, Clone)]
pub struct QuizRun {
    bank: QuizBank,
    answers: Vec<usize>,
}

impl QuizRun {
    pub fn new(bank: QuizBank) -> Self {
        Self {
            bank,
            answers: Vec::new(),
        }
    }

    pub fn bank(&self) -> &QuizBank {
        &self.bank
    }

    pub fn progress(&self) -> Progress {
        Progress {
            answered: self.answers.len(),
            total: self.bank.len(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.progress().is_complete()
    }

    /// The question awaiting an answer, with its options.
    pub fn current(&self) -> Option<(&Question, &[Choice])> {
        let i = self.answers.len();
        self.bank
            .questions
            .get(i)
            .map(|q| (q, self.bank.options_for(i)))
    }

    pub fn answer(&mut self, choice: usize) -> Result<Progress, QuizError> {
        let Some((_, options)) = self.current() else {
            return Err(QuizError::AlreadyComplete);
        };
        if choice >= options.len() {
            return Err(QuizError::ChoiceOutOfRange {
                choice,
                options: options.len(),
            });
        }
        self.answers.push(choice);
        debug!(quiz = self.bank.kind.slug(), question = self.answers.len(), choice, "answered");
        Ok(self.progress())
    }

    pub fn answers(&self) -> &[usize] {
        &self.answers
    }

    pub fn result(&self) -> Result<QuizOutcome, QuizError> {
        let progress = self.progress();
        if !progress.is_complete() {
            return Err(QuizError::Incomplete {
                answered: progress.answered,
                total: progress.total,
            });
        }
        Ok(scoring::score(&self.bank, &self.answers))
    }

    pub fn reset(&mut self) {
        self.answers.clear();
    }
}
