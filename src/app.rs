use poll_promise::Promise;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::runtime::Runtime;

use crate::client::GeminiClient;
use crate::credentials;
use crate::error::ChatError;
use crate::postprocess::postprocess;

pub const SAMPLE_PROMPTS: [&str; 4] = [
    "Explain neural networks",
    "Cortex AI capabilities",
    "Future of artificial intelligence",
    "How does machine learning work?",
];

pub const SPINNER_FRAMES: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Assistant,
    Error,
}

#[derive(Debug, Clone)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
}

/// Which screen the window shows. The chat UI is unreachable until a
/// credential has been accepted.
pub enum Phase {
    KeyPrompt,
    Chat { client: GeminiClient },
}

pub struct ChatApp {
    pub phase: Phase,
    pub key_input: String,
    pub input: String,
    pub transcript: Vec<Message>,
    pub pending: Option<Promise<Result<String, ChatError>>>,
    pub focus_input: bool,
    pub spinner_frame: usize,
    pub last_spinner_tick: Instant,
    access_denied: Arc<AtomicBool>,
}

impl ChatApp {
    pub fn new(cc: &eframe::CreationContext<'_>, access_denied: Arc<AtomicBool>) -> Self {
        crate::app_ui::apply_theme(&cc.egui_ctx);

        let phase = match credentials::api_key_from_env() {
            Some(key) => Phase::Chat {
                client: GeminiClient::new(key),
            },
            None => Phase::KeyPrompt,
        };

        Self::with_phase(phase, access_denied)
    }

    fn with_phase(phase: Phase, access_denied: Arc<AtomicBool>) -> Self {
        Self {
            phase,
            key_input: String::new(),
            input: String::new(),
            transcript: Vec::new(),
            pending: None,
            focus_input: true,
            spinner_frame: 0,
            last_spinner_tick: Instant::now(),
            access_denied,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Accepts the key typed into the prompt. An empty key is treated the
    /// same as cancelling: access is denied and the window closes.
    pub fn confirm_key(&mut self, ctx: &eframe::egui::Context) {
        let key = self.key_input.trim().to_string();
        if key.is_empty() {
            self.deny_access(ctx);
            return;
        }
        self.key_input.clear();
        self.phase = Phase::Chat {
            client: GeminiClient::new(key),
        };
        self.focus_input = true;
    }

    pub fn deny_access(&mut self, ctx: &eframe::egui::Context) {
        self.access_denied.store(true, Ordering::Relaxed);
        ctx.send_viewport_cmd(eframe::egui::ViewportCommand::Close);
    }

    /// Closing the window while the key prompt is still up counts as
    /// cancelling the prompt.
    pub fn on_window_close(&mut self) {
        if matches!(self.phase, Phase::KeyPrompt) {
            self.access_denied.store(true, Ordering::Relaxed);
        }
    }

    /// Submit transition. Blank input and submissions while a request is in
    /// flight are both no-ops, so at most one request is ever outstanding.
    /// The user's transcript entry is appended before the request is spawned.
    pub fn send_message(&mut self) {
        if self.pending.is_some() {
            return;
        }
        let prompt = self.input.trim().to_string();
        if prompt.is_empty() {
            return;
        }
        let client = match &self.phase {
            Phase::Chat { client } => client.clone(),
            Phase::KeyPrompt => return,
        };

        self.input.clear();
        self.transcript.push(Message {
            sender: Sender::User,
            text: prompt.clone(),
        });
        self.spinner_frame = 0;
        self.last_spinner_tick = Instant::now();

        self.pending = Some(Promise::spawn_thread("generate", move || {
            let rt = Runtime::new()
                .map_err(|e| ChatError::Transport(format!("failed to start runtime: {e}")))?;
            rt.block_on(client.generate(&prompt))
        }));
    }

    /// Completion transition, driven from the main loop every frame. The
    /// background thread only produces a value; all transcript and state
    /// changes happen here.
    pub fn poll_pending(&mut self) {
        let Some(promise) = self.pending.take() else {
            return;
        };
        match promise.try_take() {
            Ok(result) => {
                match result {
                    Ok(reply) => self.transcript.push(Message {
                        sender: Sender::Assistant,
                        text: postprocess(&reply),
                    }),
                    Err(err) => {
                        tracing::warn!(%err, "generate request failed");
                        self.transcript.push(Message {
                            sender: Sender::Error,
                            text: err.to_string(),
                        });
                    }
                }
                self.focus_input = true;
            }
            Err(promise) => self.pending = Some(promise),
        }
    }

    /// Current busy-indicator glyph, advancing one frame per ~100ms.
    pub fn tick_spinner(&mut self) -> &'static str {
        if self.last_spinner_tick.elapsed().as_millis() >= 100 {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
            self.last_spinner_tick = Instant::now();
        }
        SPINNER_FRAMES[self.spinner_frame]
    }
}
