use thiserror::Error;

/// Failure modes for a chat session.
///
/// `MissingCredential` is fatal and only occurs before the chat window is
/// usable. The other three are per-request failures: the dispatcher catches
/// them and renders each as an error line in the transcript.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("API key is required to use Cortex AI")]
    MissingCredential,

    #[error("network error: {0}")]
    Transport(String),

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("unexpected response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ChatError::Transport(format!("request timed out: {err}"))
        } else if err.is_connect() {
            ChatError::Transport(format!("connection failed: {err}"))
        } else if err.is_decode() {
            ChatError::Parse(err.to_string())
        } else {
            ChatError::Transport(err.to_string())
        }
    }
}
