//! Model value object representing a model served by the inference runtime

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Models the agents are bound to (Value Object)
///
/// Built-in variants are the small quantized models the demo ships with;
/// anything else pulled into the runtime is carried as [`Model::Custom`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Model {
    DeepseekR1_8b,
    Qwen3_8b,
    Qwen3_4b,
    Phi4Mini,
    Custom(String),
}

/// Static display information about a built-in model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelInfo {
    /// Download size of the quantized weights
    pub size: &'static str,
    /// Context window
    pub context: &'static str,
}

impl Model {
    /// Get the runtime tag for this model
    pub fn as_str(&self) -> &str {
        match self {
            Model::DeepseekR1_8b => "deepseek-r1:8b",
            Model::Qwen3_8b => "qwen3:8b",
            Model::Qwen3_4b => "qwen3:4b",
            Model::Phi4Mini => "phi4-mini",
            Model::Custom(s) => s,
        }
    }

    /// Size and context window, when known
    pub fn info(&self) -> Option<ModelInfo> {
        let (size, context) = match self {
            Model::DeepseekR1_8b => ("5.2GB", "16K"),
            Model::Qwen3_8b => ("5.2GB", "32K"),
            Model::Qwen3_4b => ("2.6GB", "32K"),
            Model::Phi4Mini => ("2.5GB", "128K"),
            Model::Custom(_) => return None,
        };
        Some(ModelInfo { size, context })
    }

    /// Whether an installed runtime tag (e.g. `phi4-mini:latest`) refers to this model
    pub fn matches_installed(&self, installed: &str) -> bool {
        let wanted = self.as_str();
        if installed == wanted {
            return true;
        }
        // A tag without an explicit version resolves to ":latest"
        !wanted.contains(':') && installed.strip_suffix(":latest") == Some(wanted)
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for Model {
    fn from(s: &str) -> Self {
        match s {
            "deepseek-r1:8b" => Model::DeepseekR1_8b,
            "qwen3:8b" => Model::Qwen3_8b,
            "qwen3:4b" => Model::Qwen3_4b,
            "phi4-mini" => Model::Phi4Mini,
            other => Model::Custom(other.to_string()),
        }
    }
}

impl std::str::FromStr for Model {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Model::from(s))
    }
}

impl Serialize for Model {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Model::from(s.as_str()))
    }
}
