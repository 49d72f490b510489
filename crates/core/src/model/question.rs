use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

//
// ─── ANSWER TEXT ───────────────────────────────────────────────────────────────
//

/// Scalar answer text.
///
/// Content files carry options and answers as strings, numbers, or booleans,
/// and the comparison rule for choice answers is equality of string forms.
/// All scalars therefore deserialize into their canonical string rendering,
/// which makes the stringified comparison explicit instead of ambient.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct AnswerText(String);

impl AnswerText {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Trimmed, lower-cased form used by the fill-in-the-blank comparison.
    #[must_use]
    pub fn folded(&self) -> String {
        self.0.trim().to_lowercase()
    }
}

impl fmt::Debug for AnswerText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AnswerText({})", self.0)
    }
}

impl fmt::Display for AnswerText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AnswerText {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for AnswerText {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl<'de> Deserialize<'de> for AnswerText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ScalarVisitor;

        impl<'de> Visitor<'de> for ScalarVisitor {
            type Value = AnswerText;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string, number, or boolean")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(AnswerText::new(v))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
                Ok(AnswerText(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(AnswerText(v.to_string()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(AnswerText(v.to_string()))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                Ok(AnswerText(v.to_string()))
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
                Ok(AnswerText(v.to_string()))
            }
        }

        deserializer.deserialize_any(ScalarVisitor)
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// Left/right pairing declared by a drag-and-match question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchPair {
    pub left: AnswerText,
    pub right: AnswerText,
}

impl MatchPair {
    #[must_use]
    pub fn new(left: impl Into<AnswerText>, right: impl Into<AnswerText>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
        }
    }
}

/// One gradable quiz item, tagged by kind in content files (`"type"`).
///
/// The set of kinds is closed; evaluator dispatch is an exhaustive match, so
/// adding a kind is a compile-time checklist. Content carrying a tag outside
/// the set degrades to [`Question::Unsupported`] at load instead of failing,
/// and the session skips such items without credit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Question {
    /// Pick one option; correct iff its string form equals the answer's.
    MultipleChoice {
        question: String,
        options: Vec<AnswerText>,
        answer: AnswerText,
    },
    TrueFalse {
        question: String,
        answer: bool,
    },
    /// Free text, compared after trimming and case-folding.
    FillInTheBlank {
        question: String,
        answer: AnswerText,
    },
    /// Build a sequence item by item; compared element-wise to `answer_order`.
    #[serde(rename_all = "camelCase")]
    Ordering {
        question: String,
        items: Vec<AnswerText>,
        answer_order: Vec<AnswerText>,
    },
    /// Assign each right-hand target one left-hand value; all pairs must match.
    DragMatch {
        question: String,
        pairs: Vec<MatchPair>,
    },
    /// Kind tag the engine does not recognize.
    #[serde(other)]
    Unsupported,
}

impl Question {
    #[must_use]
    pub fn kind(&self) -> QuestionKind {
        match self {
            Question::MultipleChoice { .. } => QuestionKind::MultipleChoice,
            Question::TrueFalse { .. } => QuestionKind::TrueFalse,
            Question::FillInTheBlank { .. } => QuestionKind::FillInTheBlank,
            Question::Ordering { .. } => QuestionKind::Ordering,
            Question::DragMatch { .. } => QuestionKind::DragMatch,
            Question::Unsupported => QuestionKind::Unsupported,
        }
    }

    /// Prompt text shown to the learner; `None` for unsupported items.
    #[must_use]
    pub fn prompt(&self) -> Option<&str> {
        match self {
            Question::MultipleChoice { question, .. }
            | Question::TrueFalse { question, .. }
            | Question::FillInTheBlank { question, .. }
            | Question::Ordering { question, .. }
            | Question::DragMatch { question, .. } => Some(question),
            Question::Unsupported => None,
        }
    }

    #[must_use]
    pub fn is_supported(&self) -> bool {
        !matches!(self, Question::Unsupported)
    }
}

/// Discriminant used for dispatch and reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuestionKind {
    MultipleChoice,
    TrueFalse,
    FillInTheBlank,
    Ordering,
    DragMatch,
    Unsupported,
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QuestionKind::MultipleChoice => "multiple_choice",
            QuestionKind::TrueFalse => "true_false",
            QuestionKind::FillInTheBlank => "fill_in_the_blank",
            QuestionKind::Ordering => "ordering",
            QuestionKind::DragMatch => "drag_match",
            QuestionKind::Unsupported => "unsupported",
        };
        f.write_str(name)
    }
}

//
// ─── RESPONSE ──────────────────────────────────────────────────────────────────
//

/// One drop-zone assignment: the target slot and the value placed on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchAssignment {
    pub target: AnswerText,
    pub value: AnswerText,
}

impl MatchAssignment {
    #[must_use]
    pub fn new(target: impl Into<AnswerText>, value: impl Into<AnswerText>) -> Self {
        Self {
            target: target.into(),
            value: value.into(),
        }
    }
}

/// Learner input for one question, typed per kind.
///
/// The presentation layer builds the matching variant from its input events;
/// submitting a variant that does not fit the question is refused by the
/// evaluator rather than scored.
#[derive(Debug, Clone, PartialEq)]
pub enum QuestionResponse {
    Choice(AnswerText),
    TrueFalse(bool),
    Text(String),
    Ordering(Vec<AnswerText>),
    Matches(Vec<MatchAssignment>),
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
