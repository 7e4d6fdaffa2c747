//! Conduct Interview use case
//!
//! Session-oriented wrapper around [`NextTurnUseCase`]: the history lives in
//! a [`ConversationStore`] instead of being supplied by the caller, and the
//! stage is recovered by replaying it.
//!
//! A turn is persisted only after its utterance exists, and side effects
//! fire only after it was persisted. A failed model call or a failed write
//! leaves the stored history untouched.
//!
//! Turns of one session run one at a time, in arrival order: a per-session
//! lock is held from loading the history until the effects have fired.
//! Different sessions never wait on each other.

use super::next_turn::{NextTurnError, NextTurnInput, NextTurnOutput, NextTurnUseCase};
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::conversation_store::{ConversationStore, StoreError};
use crate::ports::progress::{NoProgress, TurnProgressNotifier};
use interview_domain::core::string::truncate;
use interview_domain::{CompletionSignal, LeadProfile, SessionId, Stage, Transcript, Turn};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info};

/// Characters of a visitor reply shown in debug logs
const LOG_PREVIEW_LEN: usize = 80;

/// Errors that can occur while conducting an interview
#[derive(Error, Debug)]
pub enum ConductInterviewError {
    #[error("Session not found: {0}")]
    SessionNotFound(SessionId),

    #[error("Session already started: {0}")]
    SessionExists(SessionId),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Turn(#[from] NextTurnError),
}

/// Where a stored session stands
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionStatus {
    pub session_id: SessionId,
    pub stage: Stage,
    pub done: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion: Option<CompletionSignal>,
    pub profile: LeadProfile,
    pub turn_count: usize,
    pub transcript: Transcript,
}

/// Use case for running an interview against stored history
pub struct ConductInterviewUseCase {
    turns: Arc<NextTurnUseCase>,
    store: Arc<dyn ConversationStore>,
    logger: Arc<dyn ConversationLogger>,
    session_locks: Mutex<HashMap<SessionId, Arc<Mutex<()>>>>,
}

impl ConductInterviewUseCase {
    pub fn new(turns: Arc<NextTurnUseCase>, store: Arc<dyn ConversationStore>) -> Self {
        Self {
            turns,
            store,
            logger: Arc::new(NoConversationLogger),
            session_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Wait for exclusive use of a session.
    ///
    /// Locks nobody holds or waits for are dropped from the table first.
    async fn lock_session(&self, session_id: &SessionId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.session_locks.lock().await;
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry(session_id.clone()).or_default())
        };
        lock.lock_owned().await
    }

    /// Open a session with the greeting
    pub async fn start(&self, session_id: SessionId) -> Result<NextTurnOutput, ConductInterviewError> {
        self.start_with_progress(session_id, &NoProgress).await
    }

    pub async fn start_with_progress(
        &self,
        session_id: SessionId,
        progress: &dyn TurnProgressNotifier,
    ) -> Result<NextTurnOutput, ConductInterviewError> {
        let _guard = self.lock_session(&session_id).await;
        let history = self.store.load_history(&session_id).await?;
        if !history.is_empty() {
            return Err(ConductInterviewError::SessionExists(session_id));
        }

        let input = NextTurnInput::opening(session_id);
        let generated = self.turns.generate(&input, progress).await?;
        self.store
            .append_turn(&input.session_id, &generated.assistant_turn())
            .await?;

        info!(session = %input.session_id, "Interview started");
        self.logger.log(ConversationEvent::new(
            "interview_started",
            serde_json::json!({ "session_id": input.session_id.as_str() }),
        ));

        let effects = self.turns.apply_effects(&input.session_id, &generated).await;
        Ok(NextTurnOutput::from_parts(input.session_id, generated, effects))
    }

    /// Answer a visitor reply in an existing session
    pub async fn reply(
        &self,
        session_id: SessionId,
        content: &str,
    ) -> Result<NextTurnOutput, ConductInterviewError> {
        self.reply_with_progress(session_id, content, &NoProgress).await
    }

    pub async fn reply_with_progress(
        &self,
        session_id: SessionId,
        content: &str,
        progress: &dyn TurnProgressNotifier,
    ) -> Result<NextTurnOutput, ConductInterviewError> {
        let _guard = self.lock_session(&session_id).await;
        let history = self.store.load_history(&session_id).await?;
        if history.is_empty() {
            return Err(ConductInterviewError::SessionNotFound(session_id));
        }

        let stage = self.turns.orchestrator().replay(&history).stage;
        let user_turn = Turn::user(content);
        let input = NextTurnInput::new(session_id, history.with(user_turn.clone()), stage);
        debug!(
            session = %input.session_id,
            stage = %stage,
            reply = %truncate(content, LOG_PREVIEW_LEN),
            "Handling reply"
        );

        let generated = self.turns.generate(&input, progress).await?;
        self.store
            .append_turns(&input.session_id, &[user_turn, generated.assistant_turn()])
            .await?;

        let effects = self.turns.apply_effects(&input.session_id, &generated).await;
        Ok(NextTurnOutput::from_parts(input.session_id, generated, effects))
    }

    /// Replay a stored session
    pub async fn status(&self, session_id: SessionId) -> Result<SessionStatus, ConductInterviewError> {
        let transcript = self.store.load_history(&session_id).await?;
        if transcript.is_empty() {
            return Err(ConductInterviewError::SessionNotFound(session_id));
        }
        let state = self.turns.orchestrator().replay(&transcript);
        Ok(SessionStatus {
            session_id,
            stage: state.stage,
            done: state.is_done(),
            completion: state.completion,
            profile: state.profile,
            turn_count: transcript.turn_count(),
            transcript,
        })
    }
}
