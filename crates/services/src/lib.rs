#![forbid(unsafe_code)]

pub mod error;
pub mod ledger;
pub mod sessions;

pub use quiz_core::Clock;
pub use sessions as session;

pub use error::{LedgerError, SessionError};
pub use ledger::{ProgressLedger, SubjectStats};

pub use sessions::{
    AnswerOutcome, AnswerVerdict, Countdown, PoolBuilder, QuestionView, QuizLoopService,
    QuizOutcome, QuizScope, QuizSession, QuizStep, SessionProgress, SessionStep, TimerFire,
};
