use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredictionCode {
    Ad,
    Mci,
    Cn,
    Unknown(String),
}

impl PredictionCode {
    pub fn parse(code: &str) -> Self {
        match code {
            "AD" => Self::Ad,
            "MCI" => Self::Mci,
            "CN" => Self::Cn,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Ad => "AD",
            Self::Mci => "MCI",
            Self::Cn => "CN",
            Self::Unknown(code) => code,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResultIcon {
    AlertCircle,
    AlertTriangle,
    CheckCircle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Red,
    Yellow,
    Green,
    Gray,
}

/// How a tabular prediction is presented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultDisplay {
    pub code: String,
    pub title: String,
    pub description: String,
    pub icon: ResultIcon,
    pub tone: Tone,
}

impl ResultDisplay {
    pub fn for_code(code: &PredictionCode) -> Self {
        let (title, description, icon, tone) = match code {
            PredictionCode::Ad => (
                "Alzheimer's Disease (AD)".to_string(),
                "This result indicates a high probability of Alzheimer's Disease, characterized by significant memory, thinking, and behavior problems that interfere with daily life.",
                ResultIcon::AlertCircle,
                Tone::Red,
            ),
            PredictionCode::Mci => (
                "Mild Cognitive Impairment (MCI)".to_string(),
                "This result indicates Mild Cognitive Impairment, a stage between normal aging and dementia. Individuals may experience minor, but noticeable, memory or thinking issues.",
                ResultIcon::AlertTriangle,
                Tone::Yellow,
            ),
            PredictionCode::Cn => (
                "Cognitive Normal (CN)".to_string(),
                "This result suggests the individual is Cognitively Normal, with no signs of memory or cognitive impairment beyond typical age-related changes.",
                ResultIcon::CheckCircle,
                Tone::Green,
            ),
            PredictionCode::Unknown(other) => (
                format!("Unknown Result: {other}"),
                "The model returned a result that is not recognized by the system.",
                ResultIcon::AlertCircle,
                Tone::Gray,
            ),
        };

        Self {
            code: code.as_str().to_string(),
            title,
            description: description.to_string(),
            icon,
            tone,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("AD", "Alzheimer's Disease (AD)", ResultIcon::AlertCircle, Tone::Red)]
    #[case("MCI", "Mild Cognitive Impairment (MCI)", ResultIcon::AlertTriangle, Tone::Yellow)]
    #[case("CN", "Cognitive Normal (CN)", ResultIcon::CheckCircle, Tone::Green)]
    fn test_known_codes(
        #[case] code: &str,
        #[case] title: &str,
        #[case] icon: ResultIcon,
        #[case] tone: Tone,
    ) {
        let display = ResultDisplay::for_code(&PredictionCode::parse(code));
        assert_eq!(display.code, code);
        assert_eq!(display.title, title);
        assert_eq!(display.icon, icon);
        assert_eq!(display.tone, tone);
    }

    #[test]
    fn test_mci_description() {
        let display = ResultDisplay::for_code(&PredictionCode::Mci);
        assert!(
            display
                .description
                .starts_with("This result indicates Mild Cognitive Impairment")
        );
    }

    #[rstest]
    #[case("EMCI")]
    #[case("ad")]
    #[case("")]
    fn test_unknown_code_falls_back(#[case] code: &str) {
        let parsed = PredictionCode::parse(code);
        assert_eq!(parsed, PredictionCode::Unknown(code.to_string()));

        let display = ResultDisplay::for_code(&parsed);
        assert_eq!(display.title, format!("Unknown Result: {code}"));
        assert_eq!(
            display.description,
            "The model returned a result that is not recognized by the system."
        );
        assert_eq!(display.tone, Tone::Gray);
    }
}
