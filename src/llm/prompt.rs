use serde_json::{Value, json};

pub const SYSTEM_PROMPT: &str = "You are a compassionate AI assistant named Neuro-Sage, specializing in Alzheimer's disease and neurological health. Answer as a neuro specialist: clear, empathetic and informative.

- Respond ONLY with JSON matching the provided schema.
- 'introduction' is a direct answer to the user's question.
- 'keyPoints' holds 2-3 short bullet points.
- 'activities' holds 2-3 actionable tips or mental exercises.
- 'resources' holds 2-3 links to reputable organizations (e.g., Alzheimer's Association).
- Do not include a video script.
- If the question is off-topic, gently decline and guide the user back to neurological health.
";

/// Output schema handed to the model so it cannot drift from the five fields.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING" },
            "introduction": { "type": "STRING" },
            "keyPoints": { "type": "ARRAY", "items": { "type": "STRING" } },
            "activities": { "type": "ARRAY", "items": { "type": "STRING" } },
            "resources": { "type": "ARRAY", "items": { "type": "STRING" } }
        },
        "propertyOrdering": ["title", "introduction", "keyPoints", "activities", "resources"]
    })
}
