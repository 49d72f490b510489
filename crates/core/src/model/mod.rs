mod attempt;
mod ids;
mod progress;
mod question;
mod subject;

pub use attempt::{QuizAttempt, QuizMode};
pub use ids::{LearnerId, LessonId, SubjectId, SubjectKey};
pub use progress::ProgressRecord;
pub use question::{
    AnswerText, MatchAssignment, MatchPair, Question, QuestionKind, QuestionResponse,
};
pub use subject::{Lesson, SubjectDocument, SubjectMeta};
