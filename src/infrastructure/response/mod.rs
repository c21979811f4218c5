use once_cell::sync::Lazy;
use regex::Regex;

static THINK_TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<think>[\s\S]*?</think>|<think\s*/>").unwrap());

static REASONING_TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<reasoning>[\s\S]*?</reasoning>").unwrap());

static MULTIPLE_NEWLINES_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Cleans LLM response by removing common artifacts and unwanted tags
pub fn clean_llm_response(response: &str) -> String {
    let mut cleaned = response.to_string();

    // Remove <think>...</think> and <think/> tags
    cleaned = THINK_TAG_PATTERN.replace_all(&cleaned, "").to_string();

    // Remove <reasoning>...</reasoning> tags (some models use this)
    cleaned = REASONING_TAG_PATTERN.replace_all(&cleaned, "").to_string();

    cleaned = cleaned.trim().to_string();

    cleaned = MULTIPLE_NEWLINES_PATTERN
        .replace_all(&cleaned, "\n\n")
        .to_string();

    cleaned
}

/// Pulls the JSON object out of a cleaned response, tolerating code fences
/// around it. Returns the trimmed payload; parsing happens at the caller.
pub fn extract_json_payload(output: &str) -> String {
    strip_code_fence(output.trim())
}

fn strip_code_fence(value: &str) -> String {
    let trimmed = value.trim();
    if let Some(stripped) = trimmed.strip_prefix("```json") {
        return stripped.trim().trim_end_matches("```").trim().to_string();
    }
    if let Some(stripped) = trimmed.strip_prefix("```") {
        return stripped.trim().trim_end_matches("```").trim().to_string();
    }
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_removes_think_tags() {
        let raw = "<think>pondering the taxonomy</think>{\"categoria\": \"Velocidad\"}";
        assert_eq!(clean_llm_response(raw), "{\"categoria\": \"Velocidad\"}");
    }

    #[test]
    fn test_clean_removes_reasoning_tags() {
        let raw = "<reasoning>because</reasoning>\n\n\n{\"a\": 1}";
        assert_eq!(clean_llm_response(raw), "{\"a\": 1}");
    }

    #[test]
    fn test_extract_strips_json_fence() {
        let raw = "```json\n{\"categoria\": \"Velocidad\"}\n```";
        assert_eq!(extract_json_payload(raw), "{\"categoria\": \"Velocidad\"}");
    }

    #[test]
    fn test_extract_strips_bare_fence() {
        let raw = "```\n{\"a\": 1}\n```";
        assert_eq!(extract_json_payload(raw), "{\"a\": 1}");
    }

    #[test]
    fn test_extract_passes_plain_json_through() {
        let raw = "  {\"a\": 1}  ";
        assert_eq!(extract_json_payload(raw), "{\"a\": 1}");
    }
}
