use crate::bank::{QuizBank, QuizKind};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DiscTrait {
    D,
    I,
    S,
    C,
}

impl DiscTrait {
    /// Tie-break order when picking the dominant trait.
    pub const ORDER: [DiscTrait; 4] = [DiscTrait::D, DiscTrait::I, DiscTrait::S, DiscTrait::C];

    pub fn letter(&self) -> &'static str {
        match self {
            Self::D => "D",
            Self::I => "I",
            Self::S => "S",
            Self::C => "C",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::D => "Dominance",
            Self::I => "Influence",
            Self::S => "Steadiness",
            Self::C => "Conscientiousness",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EqBand {
    Excellent,
    Good,
    Average,
    Developing,
}

impl EqBand {
    pub fn from_average(average: f64) -> Self {
        if average >= 80.0 {
            Self::Excellent
        } else if average >= 60.0 {
            Self::Good
        } else if average >= 40.0 {
            Self::Average
        } else {
            Self::Developing
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColourVisionBand {
    Normal,
    Mild,
    Moderate,
    Significant,
}

impl ColourVisionBand {
    pub fn from_percentage(pct: u32) -> Self {
        match pct {
            90.. => Self::Normal,
            70.. => Self::Mild,
            50.. => Self::Moderate,
            _ => Self::Significant,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Normal => "Normal Color Vision",
            Self::Mild => "Mild Color Deficiency",
            Self::Moderate => "Moderate Color Deficiency",
            Self::Significant => "Significant Color Deficiency",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StressLevel {
    VeryLow,
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl StressLevel {
    /// Bands are inclusive at the top: exactly 20% is still very low.
    pub fn from_percentage(pct: f64) -> Self {
        if pct <= 20.0 {
            Self::VeryLow
        } else if pct <= 40.0 {
            Self::Low
        } else if pct <= 60.0 {
            Self::Moderate
        } else if pct <= 80.0 {
            Self::High
        } else {
            Self::VeryHigh
        }
    }

    /// Key of the matching profile in the stress bank.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::VeryLow => "very-low",
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
            Self::VeryHigh => "very-high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BalanceBand {
    Strong,
    Fair,
    NeedsAttention,
}

impl BalanceBand {
    pub fn from_percentage(pct: u32) -> Self {
        match pct {
            80.. => Self::Strong,
            60.. => Self::Fair,
            _ => Self::NeedsAttention,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LearningStyle {
    Visual,
    Auditory,
    Kinesthetic,
}

impl LearningStyle {
    pub const ORDER: [LearningStyle; 3] = [
        LearningStyle::Visual,
        LearningStyle::Auditory,
        LearningStyle::Kinesthetic,
    ];

    pub fn letter(&self) -> &'static str {
        match self {
            Self::Visual => "V",
            Self::Auditory => "A",
            Self::Kinesthetic => "K",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Visual => "Visual",
            Self::Auditory => "Auditory",
            Self::Kinesthetic => "Kinesthetic",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "quiz", rename_all = "kebab-case")]
pub enum QuizOutcome {
    Mbti {
        code: String,
        title: Option<String>,
        description: Option<String>,
    },
    Disc {
        dominant: DiscTrait,
        scores: [(DiscTrait, u32); 4],
    },
    Eq {
        /// Category name with its percentage, in bank order.
        categories: Vec<(String, u32)>,
        average: u32,
        band: EqBand,
    },
    ColourVision {
        correct: usize,
        total: usize,
        percentage: u32,
        band: ColourVisionBand,
    },
    Stress {
        score: u32,
        max: u32,
        percentage: u32,
        level: StressLevel,
        advice: Option<String>,
    },
    LifeBalance {
        categories: Vec<(String, u32)>,
        average: u32,
        band: BalanceBand,
        /// The two weakest areas, lowest first.
        focus: Vec<(String, u32)>,
    },
    LearningStyle {
        dominant: LearningStyle,
        /// Count and share of answers per style.
        scores: [(LearningStyle, u32, u32); 3],
        title: Option<String>,
        tips: Vec<String>,
    },
}

/// Scores a complete answer sheet. `answers[i]` is the chosen option index
/// for question `i`.
pub fn score(bank: &QuizBank, answers: &[usize]) -> QuizOutcome {
    match bank.kind {
        QuizKind::Mbti => score_mbti(bank, answers),
        QuizKind::Disc => score_disc(bank, answers),
        QuizKind::Eq => score_eq(bank, answers),
        QuizKind::ColourVision => score_colour_vision(bank, answers),
        QuizKind::Stress => score_stress(bank, answers),
        QuizKind::LifeBalance => score_life_balance(bank, answers),
        QuizKind::LearningStyle => score_learning_style(bank, answers),
    }
}

fn chosen_keys<'a>(bank: &'a QuizBank, answers: &'a [usize]) -> impl Iterator<Item = &'a str> + 'a {
    answers.iter().enumerate().filter_map(move |(i, &choice)| {
        bank.options_for(i)
            .get(choice)
            .and_then(|c| c.key.as_deref())
    })
}

fn score_mbti(bank: &QuizBank, answers: &[usize]) -> QuizOutcome {
    let keys: Vec<&str> = chosen_keys(bank, answers).collect();
    let count = |pole: &str| keys.iter().filter(|k| **k == pole).count();
    let code: String = [("E", "I"), ("S", "N"), ("T", "F"), ("J", "P")]
        .iter()
        .map(|&(first, second)| if count(first) >= count(second) { first } else { second })
        .collect();
    let profile = bank.profiles.get(&code);
    QuizOutcome::Mbti {
        title: profile.map(|p| p.title.clone()),
        description: profile.map(|p| p.description.clone()),
        code,
    }
}

fn score_disc(bank: &QuizBank, answers: &[usize]) -> QuizOutcome {
    let mut scores = DiscTrait::ORDER.map(|t| (t, 0u32));
    for key in chosen_keys(bank, answers) {
        if let Some(slot) = scores.iter_mut().find(|(t, _)| t.letter() == key) {
            slot.1 += 1;
        }
    }
    let max = scores.iter().map(|(_, n)| *n).max().unwrap_or(0);
    let dominant = scores
        .iter()
        .find(|(_, n)| *n == max)
        .map(|(t, _)| *t)
        .unwrap_or(DiscTrait::D);
    QuizOutcome::Disc { dominant, scores }
}

fn chosen_value(bank: &QuizBank, answers: &[usize], i: usize) -> Option<u32> {
    answers
        .get(i)
        .and_then(|&c| bank.options_for(i).get(c))
        .map(|c| c.value)
}

/// Per-category `round(sum / (count * 5) * 100)` in the bank's category
/// order, plus the rounded mean of those percentages.
fn category_percentages(bank: &QuizBank, answers: &[usize]) -> (Vec<(String, u32)>, f64) {
    let mut totals: Vec<(&str, u32, u32)> = bank.categories().into_iter().map(|c| (c, 0, 0)).collect();
    for (i, q) in bank.questions.iter().enumerate() {
        let (Some(category), Some(value)) = (q.category.as_deref(), chosen_value(bank, answers, i))
        else {
            continue;
        };
        if let Some(entry) = totals.iter_mut().find(|(name, _, _)| *name == category) {
            entry.1 += value;
            entry.2 += 1;
        }
    }
    let categories: Vec<(String, u32)> = totals
        .into_iter()
        .map(|(name, sum, count)| {
            let pct = if count == 0 {
                0
            } else {
                (sum as f64 / (count as f64 * 5.0) * 100.0).round() as u32
            };
            (name.to_string(), pct)
        })
        .collect();
    let mean = if categories.is_empty() {
        0.0
    } else {
        categories.iter().map(|(_, p)| *p as f64).sum::<f64>() / categories.len() as f64
    };
    (categories, mean)
}

fn score_eq(bank: &QuizBank, answers: &[usize]) -> QuizOutcome {
    let (categories, mean) = category_percentages(bank, answers);
    QuizOutcome::Eq {
        categories,
        average: mean.round() as u32,
        band: EqBand::from_average(mean),
    }
}

fn score_stress(bank: &QuizBank, answers: &[usize]) -> QuizOutcome {
    let score: u32 = (0..bank.len())
        .filter_map(|i| chosen_value(bank, answers, i))
        .sum();
    let top = bank.shared_options.iter().map(|c| c.value).max().unwrap_or(0);
    let max = top * bank.len() as u32;
    let pct = if max == 0 {
        0.0
    } else {
        score as f64 / max as f64 * 100.0
    };
    let level = StressLevel::from_percentage(pct);
    QuizOutcome::Stress {
        score,
        max,
        percentage: pct.round() as u32,
        level,
        advice: bank.profiles.get(level.slug()).map(|p| p.description.clone()),
    }
}

fn score_life_balance(bank: &QuizBank, answers: &[usize]) -> QuizOutcome {
    let (categories, mean) = category_percentages(bank, answers);
    let average = mean.round() as u32;
    let mut focus = categories.clone();
    focus.sort_by_key(|(_, pct)| *pct);
    focus.truncate(2);
    QuizOutcome::LifeBalance {
        categories,
        average,
        band: BalanceBand::from_percentage(average),
        focus,
    }
}

fn score_learning_style(bank: &QuizBank, answers: &[usize]) -> QuizOutcome {
    let mut counts = LearningStyle::ORDER.map(|s| (s, 0u32));
    for key in chosen_keys(bank, answers) {
        if let Some(slot) = counts.iter_mut().find(|(s, _)| s.letter() == key) {
            slot.1 += 1;
        }
    }
    let total: u32 = counts.iter().map(|(_, n)| n).sum();
    let max = counts.iter().map(|(_, n)| *n).max().unwrap_or(0);
    let dominant = counts
        .iter()
        .find(|(_, n)| *n == max)
        .map(|(s, _)| *s)
        .unwrap_or(LearningStyle::Visual);
    let scores = counts.map(|(s, n)| {
        let share = if total == 0 {
            0
        } else {
            (n as f64 / total as f64 * 100.0).round() as u32
        };
        (s, n, share)
    });
    let profile = bank.profiles.get(dominant.letter());
    QuizOutcome::LearningStyle {
        dominant,
        scores,
        title: profile.map(|p| p.title.clone()),
        tips: profile.map(|p| p.traits.clone()).unwrap_or_default(),
    }
}

fn score_colour_vision(bank: &QuizBank, answers: &[usize]) -> QuizOutcome {
    let total = bank.questions.len();
    let correct = bank
        .questions
        .iter()
        .enumerate()
        .filter(|(i, q)| {
            let picked = answers
                .get(*i)
                .and_then(|&c| bank.options_for(*i).get(c))
                .and_then(|c| c.key.as_deref());
            picked.is_some() && picked == q.expected.as_deref()
        })
        .count();
    let percentage = if total == 0 {
        0
    } else {
        (correct as f64 / total as f64 * 100.0).round() as u32
    };
    QuizOutcome::ColourVision {
        correct,
        total,
        percentage,
        band: ColourVisionBand::from_percentage(percentage),
    }
}
