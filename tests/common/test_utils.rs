use neurosage::{
    Result,
    config::{
        Config, ImageClassifierConfig, LlmConfig, LogsConfig, ServerConfig,
        TabularClassifierConfig,
    },
    llm::StructuredAnswer,
};
use serde_json::{Value, json};
use tempfile::TempDir;
use tokio::fs;

/// Create a test configuration with sensible defaults
pub fn create_test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            logs: LogsConfig {
                level: "debug".to_string(),
            },
        },
        llm: LlmConfig {
            api_key: "test-api-key".to_string(),
            ..LlmConfig::default()
        },
        image_classifier: ImageClassifierConfig {
            url: Some("http://127.0.0.1:7860/predict".to_string()),
        },
        tabular_classifier: TabularClassifierConfig {
            submit_delay_ms: 0,
            ..TabularClassifierConfig::default()
        },
    }
}

/// LLM config pointed at a mock server
pub fn llm_config_for(base_url: &str) -> LlmConfig {
    LlmConfig {
        base_url: base_url.to_string(),
        api_key: "test-api-key".to_string(),
        ..LlmConfig::default()
    }
}

/// Tabular config pointed at a mock server, without the cosmetic delay
pub fn tabular_config_for(url: &str) -> TabularClassifierConfig {
    TabularClassifierConfig {
        url: url.to_string(),
        submit_delay_ms: 0,
    }
}

/// Create a temporary directory for test files
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// Create a test config YAML file
pub async fn create_test_config_file(dir: &TempDir, content: &str) -> Result<String> {
    let config_path = dir.path().join("config.yaml");
    fs::write(&config_path, content).await?;
    Ok(config_path.to_string_lossy().to_string())
}

/// Sample configuration YAML for testing
pub const SAMPLE_CONFIG_YAML: &str = r#"
server:
  host: "127.0.0.1"
  port: 9090
  logs:
    level: "debug"

llm:
  api_key: "yaml-api-key"
  model: "gemini-2.0-flash"
  temperature: 0.2

image_classifier:
  url: "http://localhost:7860/predict"

tabular_classifier:
  submit_delay_ms: 0
"#;

/// Invalid configuration YAML for testing error cases
pub const INVALID_CONFIG_YAML: &str = r#"
server:
  port: "not-a-number"
"#;

pub fn sample_answer() -> StructuredAnswer {
    StructuredAnswer {
        title: "Staying sharp".to_string(),
        introduction: "Regular exercise supports brain health.".to_string(),
        key_points: vec![
            "Aerobic activity increases blood flow".to_string(),
            "Social contact matters".to_string(),
        ],
        activities: vec!["Daily walks".to_string(), "Crosswords".to_string()],
        resources: vec!["https://www.alz.org".to_string()],
    }
}

/// Wraps answer text the way `generateContent` returns it
pub fn gemini_envelope(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}

pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

pub const BOUNDARY: &str = "neurosage-test-boundary";

/// Hand-built multipart body with a single `file` part
pub fn multipart_body(file_name: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// Address that refuses connections
pub async fn unused_local_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("No local addr");
    drop(listener);
    format!("http://{addr}/predict")
}
