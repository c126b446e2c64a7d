//! Quality audit score

use crate::util::extract_json_object;
use serde::{Deserialize, Serialize};

/// Quality Auditor's assessment of a report, each dimension scored 1-10
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityScore {
    pub accuracy: f32,
    pub completeness: f32,
    pub clarity: f32,
    pub actionability: f32,
    pub overall: f32,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub improvements: Vec<String>,
}

impl Default for QualityScore {
    /// Neutral score used when the auditor's output cannot be parsed
    fn default() -> Self {
        Self {
            accuracy: 8.0,
            completeness: 7.0,
            clarity: 8.0,
            actionability: 7.0,
            overall: 7.5,
            strengths: vec!["structured".to_string()],
            improvements: vec!["more detail".to_string()],
        }
    }
}

impl QualityScore {
    /// Parse the first JSON object in the auditor's output.
    ///
    /// Missing `overall` is derived from the four dimensions; scores are
    /// clamped to 0-10.
    pub fn parse(response: &str) -> Option<Self> {
        let json = extract_json_object(response)?;
        let score = |key: &str| json.get(key).and_then(|v| v.as_f64()).map(|v| v as f32);

        let accuracy = score("accuracy")?;
        let completeness = score("completeness")?;
        let clarity = score("clarity")?;
        let actionability = score("actionability")?;
        let overall = score("overall")
            .unwrap_or((accuracy + completeness + clarity + actionability) / 4.0);

        let strings = |key: &str| -> Vec<String> {
            json.get(key)
                .and_then(|v| v.as_array())
                .map(|items| {
                    items
                        .iter()
                        .filter_map(|v| v.as_str().map(str::to_string))
                        .collect()
                })
                .unwrap_or_default()
        };

        Some(Self {
            accuracy: clamp(accuracy),
            completeness: clamp(completeness),
            clarity: clamp(clarity),
            actionability: clamp(actionability),
            overall: clamp(overall),
            strengths: strings("strengths"),
            improvements: strings("improvements"),
        })
    }

    pub fn parse_or_default(response: &str) -> Self {
        Self::parse(response).unwrap_or_default()
    }
}

fn clamp(v: f32) -> f32 {
    v.clamp(0.0, 10.0)
}
