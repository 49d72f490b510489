use thiserror::Error;

use crate::evaluate::EvaluateError;
use crate::scoring::StarRatingError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Evaluate(#[from] EvaluateError),
    #[error(transparent)]
    StarRating(#[from] StarRatingError),
}
