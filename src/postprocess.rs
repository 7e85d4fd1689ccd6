/// Rebrands a model reply before it is shown in the transcript.
///
/// Replaces every occurrence of the upstream brand token, in both its
/// capitalized and all-lowercase forms, with the product name. Pure and
/// idempotent: after one pass the source token no longer appears.
pub fn postprocess(raw: &str) -> String {
    raw.replace("Gemini", "Cortex").replace("gemini", "Cortex")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_both_case_forms() {
        assert_eq!(
            postprocess("Gemini and gemini say hi"),
            "Cortex and Cortex say hi"
        );
    }

    #[test]
    fn leaves_other_text_alone() {
        assert_eq!(postprocess("hello from the model"), "hello from the model");
        assert_eq!(postprocess(""), "");
    }

    #[test]
    fn is_idempotent() {
        let once = postprocess("I am Gemini, a gemini model.");
        assert_eq!(postprocess(&once), once);
        assert!(!once.contains("Gemini"));
        assert!(!once.contains("gemini"));
    }
}
