mod pool;
mod progress;
mod service;
mod timer;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use pool::{PoolBuilder, QuizScope};
pub use progress::SessionProgress;
pub use service::{
    AnswerOutcome, AnswerVerdict, QuestionView, QuizOutcome, QuizSession, SessionStep,
    TimeoutAdvance,
};
pub use timer::{Countdown, QUESTION_TIME_LIMIT_SECS};
pub use workflow::{QuizLoopService, QuizStep, TimerFire};
