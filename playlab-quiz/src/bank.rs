use crate::error::QuizError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const MBTI_BANK: &str = include_str!("../data/mbti.json");
const DISC_BANK: &str = include_str!("../data/disc.json");
const EQ_BANK: &str = include_str!("../data/eq.json");
const COLOUR_VISION_BANK: &str = include_str!("../data/colour_vision.json");
const STRESS_BANK: &str = include_str!("../data/stress.json");
const LIFE_BALANCE_BANK: &str = include_str!("../data/life_balance.json");
const LEARNING_STYLE_BANK: &str = include_str!("../data/learning_style.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuizKind {
    Mbti,
    Disc,
    Eq,
    ColourVision,
    Stress,
    LifeBalance,
    LearningStyle,
}

impl QuizKind {
    pub const ALL: [QuizKind; 7] = [
        QuizKind::Mbti,
        QuizKind::Disc,
        QuizKind::Eq,
        QuizKind::ColourVision,
        QuizKind::Stress,
        QuizKind::LifeBalance,
        QuizKind::LearningStyle,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            Self::Mbti => "mbti",
            Self::Disc => "disc",
            Self::Eq => "eq",
            Self::ColourVision => "colour-vision",
            Self::Stress => "stress",
            Self::LifeBalance => "life-balance",
            Self::LearningStyle => "learning-style",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "color-vision" => Some(Self::ColourVision),
            _ => Self::ALL.into_iter().find(|k| k.slug() == slug),
        }
    }

    fn source(&self) -> &'static str {
        match self {
            Self::Mbti => MBTI_BANK,
            Self::Disc => DISC_BANK,
            Self::Eq => EQ_BANK,
            Self::ColourVision => COLOUR_VISION_BANK,
            Self::Stress => STRESS_BANK,
            Self::LifeBalance => LIFE_BALANCE_BANK,
            Self::LearningStyle => LEARNING_STYLE_BANK,
        }
    }
}

/// One selectable answer. `key` names what the choice scores toward
/// (a dichotomy pole, a DISC trait, a plate numeral); `value` is the
/// Likert weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub label: String,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub value: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub text: String,
    #[serde(default)]
    pub options: Vec<Choice>,
    #[serde(default)]
    pub category: Option<String>,
    /// Correct answer key, for questions that have one.
    #[serde(default)]
    pub expected: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub colors: Option<PlateColors>,
}

/// Dot colours of a vision plate, as CSS hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlateColors {
    pub background: String,
    pub foreground: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub traits: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizBank {
    #[serde(skip, default = "default_kind")]
    pub kind: QuizKind,
    pub title: String,
    pub questions: Vec<Question>,
    /// Options for questions that do not list their own.
    #[serde(default)]
    pub shared_options: Vec<Choice>,
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
    /// Display order of question categories. Categories missing here follow
    /// in order of first appearance.
    #[serde(default)]
    pub category_order: Vec<String>,
}

fn default_kind() -> QuizKind {
    QuizKind::Mbti
}

impl QuizBank {
    /// Parses the bank embedded in the binary for `kind`.
    pub fn load(kind: QuizKind) -> Result<Self, QuizError> {
        Self::from_json_str(kind, kind.source())
    }

    pub fn from_json_str(kind: QuizKind, s: &str) -> Result<Self, QuizError> {
        let mut bank: QuizBank = serde_json::from_str(s)?;
        if bank.questions.is_empty() {
            return Err(QuizError::EmptyBank);
        }
        bank.kind = kind;
        Ok(bank)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Category names in display order.
    pub fn categories(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.category_order.iter().map(String::as_str).collect();
        for c in self.questions.iter().filter_map(|q| q.category.as_deref()) {
            if !names.contains(&c) {
                names.push(c);
            }
        }
        names
    }

    pub fn options_for(&self, index: usize) -> &[Choice] {
        match self.questions.get(index) {
            Some(q) if !q.options.is_empty() => &q.options,
            Some(_) => &self.shared_options,
            None => &[],
        }
    }
}
