use serde_json::Value;

use crate::error::CommandError;

/// A decoded assistant reply: the conversational text plus the raw map
/// command, if one was attached. The command is kept as a `Value` so a
/// malformed command can be rejected later without losing the text.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentReply {
    pub reply: String,
    pub command: Option<Value>,
}

/// Decode an assistant reply from raw model output.
///
/// Accepts the wire shapes the upstream assistant actually emits:
/// - Clean JSON: `{"reply": "...", "map_command": {...}}`
/// - Markdown-wrapped: ```json\n{...}\n```
/// - Prefix text: `Here you go:\n{...}`
/// - Plain prose with no JSON at all (treated as a reply with no command)
///
/// Legacy field aliases are honored: `ai_message` / `text` for the reply
/// body and `map_action` for the command.
pub fn decode_reply(raw: &str) -> Result<AgentReply, CommandError> {
    let Ok(json_str) = extract_json(raw) else {
        // Prose-only replies are legitimate; most turns carry no command.
        return Ok(AgentReply {
            reply: raw.trim().to_string(),
            command: None,
        });
    };

    let value: Value = serde_json::from_str(&json_str)
        .map_err(|e| CommandError::Parse(format!("invalid reply JSON: {e}")))?;

    let reply = ["reply", "ai_message", "text"]
        .iter()
        .find_map(|key| value.get(key).and_then(Value::as_str))
        .map(str::to_string)
        .ok_or_else(|| CommandError::Parse("reply object has no text field".to_string()))?;

    let command = ["map_command", "map_action"]
        .iter()
        .find_map(|key| value.get(key))
        .filter(|v| !v.is_null())
        .cloned();

    Ok(AgentReply { reply, command })
}

/// Extract the first JSON object from a string that may contain
/// surrounding text.
pub fn extract_json(text: &str) -> Result<String, CommandError> {
    let trimmed = text.trim();

    // Try parsing the whole thing as JSON first
    if trimmed.starts_with('{') && serde_json::from_str::<Value>(trimmed).is_ok() {
        return Ok(trimmed.to_string());
    }

    // Try extracting from markdown code block
    if let Some(json_str) = extract_from_markdown_block(trimmed) {
        if serde_json::from_str::<Value>(&json_str).is_ok() {
            return Ok(json_str);
        }
    }

    // Try finding the first { ... } pair using brace matching
    if let Some(json_str) = extract_first_object(trimmed) {
        if serde_json::from_str::<Value>(&json_str).is_ok() {
            return Ok(json_str);
        }
    }

    Err(CommandError::Parse(format!(
        "no valid JSON object found in reply (length={})",
        text.len()
    )))
}

/// Extract JSON from a markdown code block (```json ... ``` or ``` ... ```)
fn extract_from_markdown_block(text: &str) -> Option<String> {
    let start_markers = ["```json\n", "```json\r\n", "```\n", "```\r\n"];

    for marker in &start_markers {
        if let Some(start) = text.find(marker) {
            let json_start = start + marker.len();
            if let Some(end) = text[json_start..].find("```") {
                let extracted = text[json_start..json_start + end].trim();
                return Some(extracted.to_string());
            }
        }
    }

    None
}

/// Find the first balanced { ... } in the text.
fn extract_first_object(text: &str) -> Option<String> {
    let mut depth = 0;
    let mut start = None;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in text.char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match ch {
            '\\' if in_string => {
                escape_next = true;
            }
            '"' => {
                in_string = !in_string;
            }
            '{' if !in_string => {
                if depth == 0 {
                    start = Some(i);
                }
                depth += 1;
            }
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    if let Some(s) = start {
                        return Some(text[s..=i].to_string());
                    }
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decode_clean_json_reply() {
        let raw = r#"{"reply": "Found 3 listings in Baner.", "map_command": {"type": "RESET"}}"#;
        let reply = decode_reply(raw).unwrap();
        assert_eq!(reply.reply, "Found 3 listings in Baner.");
        assert_eq!(reply.command, Some(json!({"type": "RESET"})));
    }

    #[test]
    fn decode_markdown_wrapped_reply() {
        let raw = "Here is the update:\n```json\n{\"reply\": \"Done.\", \"map_command\": {\"type\": \"RESET\"}}\n```";
        let reply = decode_reply(raw).unwrap();
        assert_eq!(reply.reply, "Done.");
        assert!(reply.command.is_some());
    }

    #[test]
    fn decode_reply_with_prefix_text() {
        let raw = "Sure!\n{\"reply\": \"Filtered to 2BHK.\", \"map_command\": {\"type\": \"FILTER\", \"payload\": {\"bedrooms\": 2}}}";
        let reply = decode_reply(raw).unwrap();
        assert_eq!(reply.reply, "Filtered to 2BHK.");
    }

    #[test]
    fn decode_legacy_aliases() {
        let raw = r#"{"ai_message": "On it.", "map_action": {"type": "RESET"}}"#;
        let reply = decode_reply(raw).unwrap();
        assert_eq!(reply.reply, "On it.");
        assert_eq!(reply.command, Some(json!({"type": "RESET"})));

        let raw = r#"{"text": "Hello"}"#;
        let reply = decode_reply(raw).unwrap();
        assert_eq!(reply.reply, "Hello");
        assert!(reply.command.is_none());
    }

    #[test]
    fn decode_prose_only_reply() {
        let raw = "Baner is a great pick for rental yield.";
        let reply = decode_reply(raw).unwrap();
        assert_eq!(reply.reply, raw);
        assert!(reply.command.is_none());
    }

    #[test]
    fn null_command_is_no_command() {
        let raw = r#"{"reply": "Nothing to change.", "map_command": null}"#;
        let reply = decode_reply(raw).unwrap();
        assert!(reply.command.is_none());
    }

    #[test]
    fn json_without_text_field_is_rejected() {
        let raw = r#"{"map_command": {"type": "RESET"}}"#;
        assert!(matches!(decode_reply(raw), Err(CommandError::Parse(_))));
    }

    #[test]
    fn extract_with_braces_inside_strings() {
        let input = r#"{"reply": "price went from {low} to {high}", "map_command": null}"#;
        let result = extract_json(input).unwrap();
        let parsed: Value = serde_json::from_str(&result).unwrap();
        assert!(parsed["reply"].as_str().unwrap().contains("{low}"));
    }

    #[test]
    fn extract_nested_command_object() {
        let input = "Result:\n{\"reply\": \"ok\", \"map_command\": {\"type\": \"FILTER\", \"payload\": {\"locality\": \"Baner\"}}}";
        let result = extract_json(input).unwrap();
        let parsed: Value = serde_json::from_str(&result).unwrap();
        assert_eq!(parsed["map_command"]["payload"]["locality"], "Baner");
    }
}
