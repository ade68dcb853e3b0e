//! Prompt construction for each generation variant.
//!
//! Template wording lives in `prompts/*.txt` and is compiled in. A template
//! refers to request fields as `{name}`; [`render`] substitutes them in a
//! single pass so text supplied by callers is never expanded again.

use llm::{CompletionRequest, ResponseFormat};
use schemars::{JsonSchema, schema_for};

use crate::schema::{
    ChatRequest, PostHistoryItem, PostRequest, PostResponse, ReplyHistoryItem, ReplyRequest,
    ReplyResponse,
};

/// Rendered text for an empty history section.
pub const EMPTY_HISTORY: &str = "(없음)";

const FORMAT_INSTRUCTIONS: &str = include_str!("../prompts/format_instructions.txt");

/// Fixed wording for one variant.
#[derive(Clone, Copy, Debug)]
pub struct Template {
    pub system: &'static str,
    pub user: &'static str,
    pub format: ResponseFormat,
}

pub const CHAT: Template = Template {
    system: include_str!("../prompts/chat_system.txt"),
    user: include_str!("../prompts/chat_user.txt"),
    format: ResponseFormat::Text,
};

pub const POST: Template = Template {
    system: include_str!("../prompts/post_system.txt"),
    user: include_str!("../prompts/post_user.txt"),
    format: ResponseFormat::Json,
};

pub const REPLY: Template = Template {
    system: include_str!("../prompts/reply_system.txt"),
    user: include_str!("../prompts/reply_user.txt"),
    format: ResponseFormat::Json,
};

/// A fully rendered prompt, ready to send.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
    pub format: ResponseFormat,
}

impl Template {
    pub fn render(&self, vars: &[(&str, &str)]) -> Prompt {
        Prompt {
            system: render(self.system, vars),
            user: render(self.user, vars),
            format: self.format,
        }
    }
}

impl From<Prompt> for CompletionRequest {
    fn from(prompt: Prompt) -> Self {
        CompletionRequest::new(prompt.system, prompt.user).with_format(prompt.format)
    }
}

pub fn chat_prompt(req: &ChatRequest) -> Prompt {
    CHAT.render(&[("message", req.message.as_str())])
}

pub fn post_prompt(req: &PostRequest) -> Prompt {
    let post_history = render_post_history(&req.post_history);
    let reply_history = render_reply_history(&req.reply_history);
    let format_instructions = format_instructions::<PostResponse>();
    POST.render(&[
        ("clone_description", req.clone_description.as_str()),
        ("board_description", req.board_description.as_str()),
        ("post_history", post_history.as_str()),
        ("reply_history", reply_history.as_str()),
        ("format_instructions", format_instructions.as_str()),
    ])
}

pub fn reply_prompt(req: &ReplyRequest) -> Prompt {
    let ctx = &req.context;
    let post_history = render_post_history(&ctx.post_history);
    let reply_history = render_reply_history(&ctx.reply_history);
    let format_instructions = format_instructions::<ReplyResponse>();
    REPLY.render(&[
        ("clone_description", ctx.clone_description.as_str()),
        ("board_description", ctx.board_description.as_str()),
        ("post_history", post_history.as_str()),
        ("reply_history", reply_history.as_str()),
        ("post_title", req.post_title.as_str()),
        ("post_content", req.post_content.as_str()),
        ("format_instructions", format_instructions.as_str()),
    ])
}

/// Instructions telling the model to answer with a JSON instance of `T`.
pub fn format_instructions<T: JsonSchema>() -> String {
    let mut schema = serde_json::to_value(schema_for!(T)).unwrap_or_default();
    if let Some(map) = schema.as_object_mut() {
        map.remove("$schema");
        map.remove("title");
        map.remove("type");
    }
    render(FORMAT_INSTRUCTIONS, &[("schema", schema.to_string().as_str())])
}

fn render_post_history(items: &[PostHistoryItem]) -> String {
    if items.is_empty() {
        return EMPTY_HISTORY.to_string();
    }
    items
        .iter()
        .map(|p| {
            format!(
                "- [{}] 제목: {}\n  내용: {}",
                p.board_name, p.post_title, p.post_content
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_reply_history(items: &[ReplyHistoryItem]) -> String {
    if items.is_empty() {
        return EMPTY_HISTORY.to_string();
    }
    items
        .iter()
        .map(|r| format!("- 게시글 \"{}\"에 단 댓글: {}", r.post_title, r.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Replace every `{name}` in `template` whose name appears in `vars`.
///
/// Unknown placeholders and stray braces are copied through unchanged.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];
        let name_len = tail
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(tail.len());
        let name = &tail[..name_len];
        if tail[name_len..].starts_with('}') {
            if let Some((_, value)) = vars.iter().find(|(key, _)| *key == name) {
                out.push_str(value);
                rest = &tail[name_len + 1..];
                continue;
            }
        }
        out.push('{');
        rest = tail;
    }
    out.push_str(rest);
    out
}
