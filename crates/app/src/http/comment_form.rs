use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use gazette_core::domain::moderation::{self, TextRejection};

pub const TEXT_REQUIRED: &str = "Comment text is required.";

#[derive(Debug, Deserialize)]
pub struct CommentForm {
    pub text: String,
}

/// Field-level validation errors, keyed by field name like an HTML form
/// would report them.
#[derive(Debug, Serialize)]
pub struct FieldErrors {
    pub errors: BTreeMap<&'static str, Vec<String>>,
}

pub fn clean(form: &CommentForm, forbidden: &[String]) -> Result<String, Response> {
    moderation::clean_comment_text(&form.text, forbidden)
        .map_err(|rejection| rejection_response(&rejection))
}

fn rejection_response(rejection: &TextRejection) -> Response {
    let message = match rejection {
        TextRejection::Empty => TEXT_REQUIRED.to_string(),
        TextRejection::ForbiddenWord(_) => moderation::WARNING.to_string(),
    };
    let mut errors = BTreeMap::new();
    errors.insert("text", vec![message]);
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(FieldErrors { errors }),
    )
        .into_response()
}
