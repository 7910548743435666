//! The interactive flow itself.

use rand::Rng;
use rand::rngs::ThreadRng;

use crate::{EvadePosition, FINAL_STAGE, FIRST_STAGE};

/// Shown whenever the decline control runs away.
pub const DECLINE_TAUNT: &str =
    "Oops! The 'No' button is playing hide-and-seek. Try 'Yes' instead!";

/// The result of affirming.
#[derive(Debug)]
pub enum Step<R = ThreadRng> {
    /// There is another stage; keep driving the returned flow.
    Continue(InteractiveFlow<R>),
    /// The last stage was affirmed. Show the celebration for `username`.
    Complete { username: String },
}

/// One run through the three-stage prompt.
///
/// Created fresh each time the prompt is shown and dropped when the user
/// leaves it; nothing here is persisted.
#[derive(Debug)]
pub struct InteractiveFlow<R = ThreadRng> {
    username: String,
    stage: u8,
    evade: EvadePosition,
    declines: u32,
    rng: R,
}

impl InteractiveFlow<ThreadRng> {
    /// Starts a flow for `username` using the thread-local RNG.
    ///
    /// The username may be empty when the prompt was opened without one;
    /// it is passed through to [`Step::Complete`] as-is.
    pub fn new(username: impl Into<String>) -> Self {
        Self::with_rng(username, rand::rng())
    }
}

impl<R: Rng> InteractiveFlow<R> {
    /// Starts a flow with an explicit random source.
    pub fn with_rng(username: impl Into<String>, rng: R) -> Self {
        let username = username.into();
        tracing::debug!(%username, "interactive flow started");
        Self {
            username,
            stage: FIRST_STAGE,
            evade: EvadePosition::CENTER,
            declines: 0,
            rng,
        }
    }

    /// The current stage, `1..=3`.
    pub fn stage(&self) -> u8 {
        self.stage
    }

    /// Where the decline control currently sits.
    pub fn evade_position(&self) -> EvadePosition {
        self.evade
    }

    /// The username the celebration will be shown for.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// How many times the user has declined so far, across all stages.
    pub fn decline_count(&self) -> u32 {
        self.declines
    }

    /// The question asked at the current stage.
    pub fn prompt(&self) -> &'static str {
        match self.stage {
            1 => "Will you be my valentine?",
            2 => "Are you sure?",
            _ => "Really, really sure?",
        }
    }

    /// The user said yes.
    ///
    /// Before the final stage this advances one stage and hands the flow
    /// back. On the final stage the flow is consumed and the username is
    /// handed on.
    pub fn on_affirm(mut self) -> Step<R> {
        if self.stage < FINAL_STAGE {
            self.stage += 1;
            tracing::debug!(stage = self.stage, "interactive flow advanced");
            Step::Continue(self)
        } else {
            tracing::info!(
                username = %self.username,
                declines = self.declines,
                "interactive flow complete"
            );
            Step::Complete {
                username: self.username,
            }
        }
    }

    /// The user tried to say no.
    ///
    /// The stage is untouched; the decline control jumps to a fresh
    /// random position, which is returned.
    pub fn on_decline(&mut self) -> EvadePosition {
        self.declines += 1;
        self.evade = EvadePosition::random(&mut self.rng);
        tracing::trace!(
            stage = self.stage,
            position = %self.evade,
            "decline control relocated"
        );
        self.evade
    }
}

// =========================================================================
// Tests
// =========================================================================
