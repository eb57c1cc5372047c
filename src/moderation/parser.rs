//! Parse a model completion into a [`Verdict`].

use crate::models::Verdict;

/// Strip markdown code-fence decoration from a completion.
pub fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_string()
}

/// Parse a completion as a JSON verdict. The caller decides what a failure
/// means (the moderation job fails closed).
pub fn parse_verdict(raw: &str) -> Result<Verdict, serde_json::Error> {
    serde_json::from_str(&strip_code_fences(raw))
}
