use std::error::Error as StdError;

use axum::{
    Json,
    extract::{FromRequest, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use serde_path_to_error::Segment;
use thiserror::Error;

use crate::generate::GenerationError;

/// JSON body extractor whose rejections become [`ApiError::Validation`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] JsonRejection),
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// One entry of a 422 `detail` list.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl FieldError {
    fn from_rejection(rejection: &JsonRejection) -> Self {
        let msg = rejection.body_text();
        let (loc, kind) = match rejection {
            JsonRejection::JsonDataError(_) => data_error_loc(rejection),
            JsonRejection::JsonSyntaxError(_) => (vec!["body".to_string()], "json_invalid"),
            JsonRejection::MissingJsonContentType(_) => {
                (vec!["header".to_string(), "content-type".to_string()], "content_type")
            }
            _ => (vec!["body".to_string()], "invalid"),
        };
        Self { loc, msg, kind }
    }
}

type PathError = serde_path_to_error::Error<serde_json::Error>;

/// The deserializer error carried somewhere in the rejection's source chain.
fn path_error(rejection: &JsonRejection) -> Option<&PathError> {
    let mut current: Option<&(dyn StdError + 'static)> = rejection.source();
    while let Some(err) = current {
        if let Some(found) = err.downcast_ref::<PathError>() {
            return Some(found);
        }
        current = err.source();
    }
    None
}

/// `["body", <path to the bad value>...]`, ending in the field name when a
/// required field is absent.
fn data_error_loc(rejection: &JsonRejection) -> (Vec<String>, &'static str) {
    let mut loc = vec!["body".to_string()];
    let Some(err) = path_error(rejection) else {
        return (loc, "invalid");
    };
    loc.extend(err.path().iter().filter_map(|segment| match segment {
        Segment::Seq { index } => Some(index.to_string()),
        Segment::Map { key } => Some(key.clone()),
        Segment::Enum { variant } => Some(variant.clone()),
        Segment::Unknown => None,
    }));
    match missing_field(&err.inner().to_string()) {
        Some(field) => {
            loc.push(field.to_string());
            (loc, "missing")
        }
        None => (loc, "invalid"),
    }
}

// serde_json reports absent fields only through the message text.
fn missing_field(msg: &str) -> Option<&str> {
    const MARKER: &str = "missing field `";
    let start = msg.find(MARKER)? + MARKER.len();
    let len = msg[start..].find('`')?;
    Some(&msg[start..start + len])
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(rejection) => {
                let detail = vec![FieldError::from_rejection(&rejection)];
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({ "detail": detail })),
                )
                    .into_response()
            }
            ApiError::Generation(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "detail": err.to_string() })),
            )
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_missing_field_name() {
        let msg = "Failed to deserialize the JSON body into the target type: missing field `post_title` at line 1 column 40";
        assert_eq!(missing_field(msg), Some("post_title"));
        assert_eq!(missing_field("invalid type: integer"), None);
    }

    fn rejection_for<T: serde::de::DeserializeOwned>(body: &str) -> JsonRejection {
        axum::Json::<T>::from_bytes(body.as_bytes()).err().unwrap()
    }

    #[test]
    fn mistyped_field_is_located() {
        let rejection = rejection_for::<crate::schema::PostRequest>(
            r#"{"clone_description": 5, "board_description": "b"}"#,
        );
        let err = FieldError::from_rejection(&rejection);
        assert_eq!(err.loc, vec!["body", "clone_description"]);
        assert_eq!(err.kind, "invalid");
    }

    #[test]
    fn nested_history_item_is_located() {
        let rejection = rejection_for::<crate::schema::PostRequest>(
            r#"{"clone_description": "c", "board_description": "b",
                "post_history": [{"boardName": 1, "postTitle": "t", "postContent": "c"}]}"#,
        );
        let err = FieldError::from_rejection(&rejection);
        assert_eq!(err.loc, vec!["body", "post_history", "0", "boardName"]);
    }

    #[test]
    fn missing_nested_field_is_located() {
        let rejection = rejection_for::<crate::schema::PostRequest>(
            r#"{"clone_description": "c", "board_description": "b",
                "reply_history": [{"postTitle": "t"}]}"#,
        );
        let err = FieldError::from_rejection(&rejection);
        assert_eq!(err.loc, vec!["body", "reply_history", "0", "content"]);
        assert_eq!(err.kind, "missing");
    }
}
