use axum::extract::{FromRequest, Request, rejection::JsonRejection};

use crate::error::AppError;

// We define our own `Json` extractor that answers malformed bodies with the
// same `{ "msg": ... }` shape as every other client error
pub struct Json<T>(pub T);

impl<S, T> FromRequest<S> for Json<T>
where
    axum::Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(value) => Ok(Self(value.0)),
            Err(rejection) => Err(AppError::bad_request(rejection.body_text())),
        }
    }
}
