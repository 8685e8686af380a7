use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub system_instruction: Content,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
    pub response_mime_type: String,
    pub response_schema: Value,
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            parts: vec![Part { text: text.into() }],
        }
    }
}

/// The five-field answer shown for every assistant reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredAnswer {
    pub title: String,
    pub introduction: String,
    pub key_points: Vec<String>,
    pub activities: Vec<String>,
    pub resources: Vec<String>,
}

impl StructuredAnswer {
    pub const DEFAULT_TITLE: &'static str = "Answer";
    pub const DEFAULT_INTRODUCTION: &'static str = "I'm not sure how to respond to that.";
    pub const FAILURE_TITLE: &'static str = "Error";
    pub const FAILURE_INTRODUCTION: &'static str =
        "Sorry, I had trouble processing that request. Please try again.";

    /// Returned whenever the model's reply cannot be read as JSON.
    pub fn processing_failure() -> Self {
        Self {
            title: Self::FAILURE_TITLE.to_string(),
            introduction: Self::FAILURE_INTRODUCTION.to_string(),
            key_points: Vec::new(),
            activities: Vec::new(),
            resources: Vec::new(),
        }
    }

    /// Renders the answer as markdown, skipping empty sections.
    pub fn to_markdown(&self) -> String {
        let mut sections = Vec::new();
        if !self.introduction.is_empty() {
            sections.push(format!("**Introduction:** {}", self.introduction));
        }
        for (heading, items) in [
            ("Key Points", &self.key_points),
            ("Activities", &self.activities),
            ("Resources", &self.resources),
        ] {
            if !items.is_empty() {
                sections.push(format!("**{}:** {}", heading, items.join(", ")));
            }
        }
        sections.join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_request_uses_camel_case() {
        let request = GenerateContentRequest {
            contents: vec![Content::text("What is MCI?")],
            system_instruction: Content::text("persona"),
            generation_config: GenerationConfig {
                temperature: 0.5,
                top_k: 40,
                top_p: 0.95,
                max_output_tokens: 8192,
                response_mime_type: "application/json".to_string(),
                response_schema: serde_json::json!({ "type": "OBJECT" }),
            },
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["contents"][0]["parts"][0]["text"], "What is MCI?");
        assert_eq!(value["systemInstruction"]["parts"][0]["text"], "persona");
        assert_eq!(value["generationConfig"]["topK"], 40);
        assert_eq!(value["generationConfig"]["maxOutputTokens"], 8192);
        assert_eq!(
            value["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(value["generationConfig"]["responseSchema"]["type"], "OBJECT");
    }

    #[test]
    fn test_markdown_omits_empty_sections() {
        let answer = StructuredAnswer {
            title: "Sleep".to_string(),
            introduction: "Sleep matters.".to_string(),
            key_points: vec!["Amyloid clearance".to_string(), "Memory".to_string()],
            activities: Vec::new(),
            resources: vec!["https://www.alz.org".to_string()],
        };

        assert_eq!(
            answer.to_markdown(),
            "**Introduction:** Sleep matters.\n\n**Key Points:** Amyloid clearance, Memory\n\n**Resources:** https://www.alz.org"
        );
    }

    #[test]
    fn test_failure_placeholder() {
        let answer = StructuredAnswer::processing_failure();
        assert_eq!(answer.title, "Error");
        assert!(answer.key_points.is_empty());
        assert!(answer.activities.is_empty());
        assert!(answer.resources.is_empty());
    }
}
