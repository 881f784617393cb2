use thiserror::Error;

use crate::catalog::CatalogError;
use crate::model::{AttemptError, QuizError, SessionRequestError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Attempt(#[from] AttemptError),
    #[error(transparent)]
    SessionRequest(#[from] SessionRequestError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
