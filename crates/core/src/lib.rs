pub mod amount;
pub mod assemble;
pub mod group;
pub mod pattern;
pub mod report;
pub mod selection;
pub mod token;
pub mod tracker;
pub mod validate;

pub use amount::parse_amount;
pub use assemble::{assemble, escape_literal};
pub use group::{group_tokens, Span};
pub use pattern::{PatternAction, PatternDraft};
pub use report::{Extraction, MatchReport, TestFailure, TestOutcome, TestVerdict};
pub use selection::{Phase, SelectionError, Session};
pub use token::{join_tokens, tokenize, Token, TokenKind};
pub use tracker::{TestTicket, TestTracker};
pub use validate::{validate_pattern, TestGate, ValidationError};
