//! Extractors that turn malformed input into 422 responses before any handler runs.

use axum::Json;
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use crate::api::error::{ApiError, FieldError};
use crate::models::{NewSession, TaskInput};

pub const TITLE_MIN: usize = 3;
pub const TITLE_MAX: usize = 100;
pub const DESCRIPTION_MAX: usize = 300;

pub trait Validate {
    fn validate(&self) -> Result<(), Vec<FieldError>>;
}

impl Validate for TaskInput {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        let title_len = self.title.chars().count();
        if !(TITLE_MIN..=TITLE_MAX).contains(&title_len) {
            errors.push(FieldError::new(
                "title",
                format!("must be between {TITLE_MIN} and {TITLE_MAX} characters"),
            ));
        }

        if self
            .description
            .as_ref()
            .is_some_and(|description| description.chars().count() > DESCRIPTION_MAX)
        {
            errors.push(FieldError::new(
                "description",
                format!("must be at most {DESCRIPTION_MAX} characters"),
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

impl Validate for NewSession {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        if self.end_time < self.start_time {
            return Err(vec![FieldError::new(
                "end_time",
                "must not be earlier than start_time",
            )]);
        }
        Ok(())
    }
}

/// JSON body that has been deserialized and passed [`Validate`].
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                ApiError::validation(vec![FieldError::new("body", rejection.body_text())])
            })?;

        value.validate().map_err(ApiError::validation)?;
        Ok(Self(value))
    }
}

/// Query string whose deserialization failures are reported as 422.
#[derive(Debug, Clone)]
pub struct ValidQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                ApiError::validation(vec![FieldError::new("query", rejection.body_text())])
            })?;
        Ok(Self(value))
    }
}
