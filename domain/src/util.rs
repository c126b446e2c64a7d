//! Shared text helpers.

/// Take at most `max_chars` characters from the start of `s`.
pub fn excerpt(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}

/// Find the first parseable JSON object embedded in free-form model output.
///
/// Models wrap JSON in prose, code fences or reasoning blocks, so every `{`
/// is tried as a start and the matching brace is found with a small scanner
/// that understands string literals and escapes.
pub fn extract_json_object(text: &str) -> Option<serde_json::Value> {
    for (start, _) in text.match_indices('{') {
        let Some(end) = matching_brace(&text[start..]) else {
            continue;
        };
        let candidate = &text[start..start + end + 1];
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(candidate)
            && value.is_object()
        {
            return Some(value);
        }
    }
    None
}

/// Byte offset of the brace closing the one at offset 0
fn matching_brace(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in s.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Round seconds to one decimal place
pub fn round_tenths(secs: f64) -> f64 {
    (secs * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excerpt_counts_characters() {
        assert_eq!(excerpt("hello world", 5), "hello");
        assert_eq!(excerpt("hi", 10), "hi");
        assert_eq!(excerpt("あのね", 2), "あの");
        assert_eq!(excerpt("", 3), "");
    }

    #[test]
    fn extract_json_from_prose() {
        let text = "Sure! Here is the analysis:\n```json\n{\"domain\": \"science\", \"n\": {\"a\": 1}}\n```";
        let value = extract_json_object(text).unwrap();
        assert_eq!(value["domain"], "science");
        assert_eq!(value["n"]["a"], 1);
    }

    #[test]
    fn extract_json_skips_invalid_candidates() {
        let text = "<think>{not json}</think> {\"ok\": \"brace } in string\"}";
        let value = extract_json_object(text).unwrap();
        assert_eq!(value["ok"], "brace } in string");
    }

    #[test]
    fn extract_json_none_without_object() {
        assert!(extract_json_object("no json here").is_none());
        assert!(extract_json_object("{ unterminated").is_none());
    }

    #[test]
    fn round_to_tenths() {
        assert_eq!(round_tenths(12.345), 12.3);
        assert_eq!(round_tenths(0.06), 0.1);
    }
}
