use thiserror::Error;

use crate::model::{MatchAssignment, MatchPair, Question, QuestionKind, QuestionResponse};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EvaluateError {
    /// The session skips unsupported items before they reach the evaluator;
    /// getting here means a caller bypassed that guard.
    #[error("question kind {kind} cannot be evaluated")]
    UnsupportedKind { kind: QuestionKind },

    /// The response variant does not fit the question kind.
    #[error("response does not fit a {kind} question")]
    ResponseMismatch { kind: QuestionKind },
}

//
// ─── EVALUATION ────────────────────────────────────────────────────────────────
//

/// Scores a learner response against a question.
///
/// Pure, one rule per kind:
/// - multiple choice: the chosen option's string form equals the answer's,
///   exact and case-sensitive
/// - true/false: boolean equality
/// - fill in the blank: both sides trimmed and lower-cased, then compared
/// - ordering: the built sequence equals the canonical order element-wise
/// - drag match: every target carries exactly one assigned value and every
///   assignment is a declared pair; no partial credit
///
/// # Errors
///
/// Returns `EvaluateError::ResponseMismatch` when the response variant does
/// not match the question kind, and `EvaluateError::UnsupportedKind` for an
/// unsupported question.
pub fn evaluate(question: &Question, response: &QuestionResponse) -> Result<bool, EvaluateError> {
    let mismatch = || EvaluateError::ResponseMismatch {
        kind: question.kind(),
    };

    match question {
        Question::MultipleChoice { answer, .. } => match response {
            QuestionResponse::Choice(chosen) => Ok(chosen == answer),
            _ => Err(mismatch()),
        },
        Question::TrueFalse { answer, .. } => match response {
            QuestionResponse::TrueFalse(chosen) => Ok(chosen == answer),
            _ => Err(mismatch()),
        },
        Question::FillInTheBlank { answer, .. } => match response {
            QuestionResponse::Text(text) => Ok(text.trim().to_lowercase() == answer.folded()),
            _ => Err(mismatch()),
        },
        Question::Ordering { answer_order, .. } => match response {
            QuestionResponse::Ordering(built) => Ok(built == answer_order),
            _ => Err(mismatch()),
        },
        Question::DragMatch { pairs, .. } => match response {
            QuestionResponse::Matches(assignments) => Ok(drag_match_correct(pairs, assignments)),
            _ => Err(mismatch()),
        },
        Question::Unsupported => Err(EvaluateError::UnsupportedKind {
            kind: QuestionKind::Unsupported,
        }),
    }
}

/// All-or-nothing drag-match rule.
///
/// Each declared target must be assigned exactly once, and each assignment
/// must form a declared pair with its target. A missing or duplicated
/// assignment fails the whole question.
fn drag_match_correct(pairs: &[MatchPair], assignments: &[MatchAssignment]) -> bool {
    if assignments.len() != pairs.len() {
        return false;
    }
    for pair in pairs {
        let assigned = assignments
            .iter()
            .filter(|a| a.target == pair.right)
            .count();
        if assigned != 1 {
            return false;
        }
    }
    assignments
        .iter()
        .all(|a| pairs.iter().any(|p| p.left == a.value && p.right == a.target))
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
