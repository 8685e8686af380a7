use super::types::StructuredAnswer;
use serde_json::Value;
use tracing::warn;

/// Turns a `generateContent` response body into a [`StructuredAnswer`].
///
/// Never fails: each missing field gets its default, and a reply whose text
/// is not JSON becomes [`StructuredAnswer::processing_failure`].
pub fn normalize_answer(response: &Value) -> StructuredAnswer {
    let Some(text) = response
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
    else {
        warn!("LLM response has no candidate text: {}", response);
        return StructuredAnswer::processing_failure();
    };

    match serde_json::from_str::<Value>(text) {
        Ok(parsed) if parsed.is_object() => from_fields(&parsed),
        Ok(parsed) => {
            warn!("LLM answer is JSON but not an object: {}", parsed);
            StructuredAnswer::processing_failure()
        }
        Err(e) => {
            warn!("Error parsing LLM answer as JSON: {}", e);
            StructuredAnswer::processing_failure()
        }
    }
}

fn from_fields(parsed: &Value) -> StructuredAnswer {
    StructuredAnswer {
        title: text_or(parsed, "title", StructuredAnswer::DEFAULT_TITLE),
        introduction: text_or(
            parsed,
            "introduction",
            StructuredAnswer::DEFAULT_INTRODUCTION,
        ),
        key_points: string_list(parsed, "keyPoints"),
        activities: string_list(parsed, "activities"),
        resources: string_list(parsed, "resources"),
    }
}

fn text_or(parsed: &Value, key: &str, default: &str) -> String {
    parsed
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or(default)
        .to_string()
}

fn string_list(parsed: &Value, key: &str) -> Vec<String> {
    parsed
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
