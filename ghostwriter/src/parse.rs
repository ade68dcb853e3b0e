//! Decoding model completions into response bodies.

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::schema::{PostResponse, ReplyResponse};

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("completion is not valid JSON for the response: {0}")]
    Json(#[from] serde_json::Error),
    #[error("completion left `{0}` empty")]
    EmptyField(&'static str),
}

/// Text fields a response must carry to be usable.
pub trait RequiredText {
    fn required_text(&self) -> Vec<(&'static str, &str)>;
}

impl RequiredText for PostResponse {
    fn required_text(&self) -> Vec<(&'static str, &str)> {
        vec![("title", self.title.as_str()), ("content", self.content.as_str())]
    }
}

impl RequiredText for ReplyResponse {
    fn required_text(&self) -> Vec<(&'static str, &str)> {
        vec![("content", self.content.as_str())]
    }
}

/// Decode `raw` into `T`.
///
/// Accepts a bare JSON object, one wrapped in a markdown code fence, or one
/// surrounded by prose. Fails if any required text field is blank.
pub fn parse_completion<T>(raw: &str) -> Result<T, ParseError>
where
    T: DeserializeOwned + RequiredText,
{
    let body = strip_code_fence(raw.trim());
    let value: T = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(err) => match embedded_object(body) {
            Some(inner) if inner.len() < body.len() => {
                serde_json::from_str(inner).map_err(|_| ParseError::Json(err))?
            }
            _ => return Err(err.into()),
        },
    };
    if let Some((name, _)) = value
        .required_text()
        .into_iter()
        .find(|(_, text)| text.trim().is_empty())
    {
        return Err(ParseError::EmptyField(name));
    }
    Ok(value)
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // drop the language tag line
    let rest = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    let rest = rest.trim_end();
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

fn embedded_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_object() {
        let res: PostResponse = parse_completion(r#"{"title":"T","content":"C"}"#).unwrap();
        assert_eq!(
            res,
            PostResponse {
                title: "T".into(),
                content: "C".into()
            }
        );
    }

    #[test]
    fn fenced_object() {
        let raw = "```json\n{\"title\": \"제목\", \"content\": \"첫 줄\\n둘째 줄\"}\n```";
        let res: PostResponse = parse_completion(raw).unwrap();
        assert_eq!(res.title, "제목");
        assert_eq!(res.content, "첫 줄\n둘째 줄");
    }

    #[test]
    fn object_inside_prose() {
        let raw = "Sure! Here it is: {\"content\": \"좋은 글이네요\"} Hope that helps.";
        let res: ReplyResponse = parse_completion(raw).unwrap();
        assert_eq!(res.content, "좋은 글이네요");
    }

    #[test]
    fn not_json() {
        let err = parse_completion::<PostResponse>("not json").unwrap_err();
        assert!(matches!(err, ParseError::Json(_)));
    }

    #[test]
    fn missing_key() {
        let err = parse_completion::<PostResponse>(r#"{"title":"T"}"#).unwrap_err();
        assert!(err.to_string().contains("content"));
    }

    #[test]
    fn blank_field() {
        let err = parse_completion::<PostResponse>(r#"{"title":"  ","content":"C"}"#).unwrap_err();
        assert!(matches!(err, ParseError::EmptyField("title")));
    }
}
