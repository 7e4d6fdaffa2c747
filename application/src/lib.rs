//! Application layer for interview-funnel
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::BehaviorConfig;
pub use ports::{
    account_service::{AccountError, AccountId, AccountService, NoAccountService},
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    conversation_store::{ConversationStore, StoreError},
    llm_gateway::{GatewayError, GenerationRequest, LlmGateway},
    progress::{NoProgress, TurnProgressNotifier},
    report_generator::{NoReportGenerator, ReportError, ReportGenerator, ReportRequest},
};
pub use use_cases::conduct_interview::{
    ConductInterviewError, ConductInterviewUseCase, SessionStatus,
};
pub use use_cases::next_turn::{
    GeneratedTurn, NextTurnError, NextTurnInput, NextTurnOutput, NextTurnUseCase, TurnEffects,
    describe_directive,
};
