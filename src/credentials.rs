use std::env;

pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

/// API key from the environment, if one is set and non-blank.
///
/// When this returns `None` the app falls back to the interactive key prompt.
pub fn api_key_from_env() -> Option<String> {
    api_key_from(API_KEY_VAR)
}

fn api_key_from(var: &str) -> Option<String> {
    let key = env::var(var).ok()?;
    let key = key.trim();
    if key.is_empty() {
        None
    } else {
        Some(key.to_string())
    }
}
