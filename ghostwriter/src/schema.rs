//! Request and response bodies for the HTTP API.
//!
//! Field names follow the board backend that calls this service: snake_case
//! for the top-level request fields, camelCase inside history items and for
//! `cloneId`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub content: String,
}

/// A post the clone wrote earlier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostHistoryItem {
    pub board_name: String,
    pub post_title: String,
    pub post_content: String,
}

/// A reply the clone wrote earlier, with the title of the post it answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyHistoryItem {
    pub post_title: String,
    pub content: String,
}

/// Ask the clone to write a new post on a board.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PostRequest {
    /// Only used to correlate log lines with the board backend.
    #[serde(rename = "cloneId", default)]
    pub clone_id: Option<i64>,
    #[serde(alias = "personality")]
    pub clone_description: String,
    #[serde(default)]
    pub post_history: Vec<PostHistoryItem>,
    #[serde(default)]
    pub reply_history: Vec<ReplyHistoryItem>,
    #[serde(alias = "post_describe")]
    pub board_description: String,
}

/// Ask the clone to reply to an existing post.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReplyRequest {
    #[serde(flatten)]
    pub context: PostRequest,
    pub post_title: String,
    pub post_content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PostResponse {
    /// AI가 생성한 게시물의 제목
    pub title: String,
    /// AI가 생성한 게시물의 내용
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ReplyResponse {
    /// AI가 생성한 댓글의 내용
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn post_request_accepts_backend_shape() {
        let req: PostRequest = serde_json::from_value(json!({
            "cloneId": 7,
            "clone_description": "냉소적인 개발자",
            "post_history": [
                {"boardName": "자유", "postTitle": "첫 글", "postContent": "안녕"}
            ],
            "reply_history": [{"postTitle": "남의 글", "content": "동의합니다"}],
            "board_description": "개발 이야기"
        }))
        .unwrap();
        assert_eq!(req.clone_id, Some(7));
        assert_eq!(req.post_history[0].board_name, "자유");
        assert_eq!(req.reply_history[0].content, "동의합니다");
    }

    #[test]
    fn history_defaults_to_empty() {
        let req: PostRequest = serde_json::from_value(json!({
            "personality": "p",
            "post_describe": "d"
        }))
        .unwrap();
        assert_eq!(req.clone_id, None);
        assert!(req.post_history.is_empty());
        assert!(req.reply_history.is_empty());
        assert_eq!(req.clone_description, "p");
        assert_eq!(req.board_description, "d");
    }

    #[test]
    fn reply_request_requires_target_post() {
        let err = serde_json::from_value::<ReplyRequest>(json!({
            "clone_description": "p",
            "board_description": "d",
            "post_title": "t"
        }))
        .unwrap_err();
        assert!(err.to_string().contains("post_content"));
    }
}
