//! The [`Fields`] extractor — a request body as a loose key/value map.
//!
//! `application/x-www-form-urlencoded` bodies are folded so that repeated keys
//! become arrays; anything else must be a JSON object.

use axum::{
  Form, Json,
  extract::{FromRequest, Request},
  http::header,
};
use colonia_core::input;

use crate::error::ApiError;

pub struct Fields(pub input::Fields);

impl<S> FromRequest<S> for Fields
where
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
    let is_form = req
      .headers()
      .get(header::CONTENT_TYPE)
      .and_then(|v| v.to_str().ok())
      .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

    if is_form {
      let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?;
      Ok(Self(input::fold_pairs(pairs)))
    } else {
      let Json(map) = Json::<input::Fields>::from_request(req, state)
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?;
      Ok(Self(map))
    }
  }
}
