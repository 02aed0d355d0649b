use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::debug;

use crate::assemble::assemble;
use crate::group::{group_tokens, Span};
use crate::pattern::PatternAction;
use crate::token::{tokenize, Token, TokenKind};

/// Which classification a token pick applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Amount,
    Merchant,
    Wildcards,
}

const APPROVE_PHASES: [Phase; 3] = [Phase::Amount, Phase::Merchant, Phase::Wildcards];
const REJECT_PHASES: [Phase; 1] = [Phase::Wildcards];

impl Phase {
    pub fn entry(action: PatternAction) -> Self {
        Self::available(action)[0]
    }

    /// Phases reachable for `action`, in navigation order.
    pub fn available(action: PatternAction) -> &'static [Phase] {
        match action {
            PatternAction::Approve => &APPROVE_PHASES,
            PatternAction::Reject => &REJECT_PHASES,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Amount => write!(f, "amount"),
            Phase::Merchant => write!(f, "merchant"),
            Phase::Wildcards => write!(f, "wildcards"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("Token index {index} out of range ({len} tokens)")]
    OutOfRange { index: usize, len: usize },
    #[error("Token {index} is whitespace or a delimiter and cannot be classified")]
    Separator { index: usize },
    #[error("Phase '{phase}' is not available for {action} patterns")]
    PhaseUnavailable { phase: Phase, action: PatternAction },
}

/// One classification session over a single message.
///
/// Holds the live token list and the current phase. Everything downstream
/// (spans, the assembled pattern) is recomputed from the tokens on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    message: String,
    action: PatternAction,
    phase: Phase,
    tokens: Vec<Token>,
}

impl Session {
    pub fn new(message: impl Into<String>, action: PatternAction) -> Self {
        let message = message.into();
        let tokens = tokenize(&message);
        Self {
            message,
            action,
            phase: Phase::entry(action),
            tokens,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn action(&self) -> PatternAction {
        self.action
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Replace the source message. All classifications are discarded.
    pub fn set_message(&mut self, message: impl Into<String>) {
        let message = message.into();
        if message != self.message {
            self.message = message;
            self.reset();
        }
    }

    /// Switch between approve and reject. All classifications are discarded.
    pub fn set_action(&mut self, action: PatternAction) {
        if action != self.action {
            self.action = action;
            self.reset();
        }
    }

    /// Re-tokenize the message and return to the entry phase.
    pub fn reset(&mut self) {
        self.tokens = tokenize(&self.message);
        self.phase = Phase::entry(self.action);
        debug!(
            action = %self.action,
            phase = %self.phase,
            tokens = self.tokens.len(),
            "classification session reset"
        );
    }

    pub fn set_phase(&mut self, phase: Phase) -> Result<(), SelectionError> {
        if !Phase::available(self.action).contains(&phase) {
            return Err(SelectionError::PhaseUnavailable {
                phase,
                action: self.action,
            });
        }
        self.phase = phase;
        debug!(phase = %phase, "phase changed");
        Ok(())
    }

    /// Move to the next phase. Returns `false` when already at the last one.
    pub fn advance(&mut self) -> bool {
        self.step(1)
    }

    /// Move to the previous phase. Returns `false` when already at the first one.
    pub fn retreat(&mut self) -> bool {
        self.step(-1)
    }

    fn step(&mut self, delta: isize) -> bool {
        let phases = Phase::available(self.action);
        let Some(pos) = phases.iter().position(|p| *p == self.phase) else {
            return false;
        };
        match pos.checked_add_signed(delta).and_then(|p| phases.get(p)) {
            Some(&next) => {
                self.phase = next;
                debug!(phase = %next, "phase changed");
                true
            }
            None => false,
        }
    }

    /// Apply the current phase's toggle rule to token `index`.
    ///
    /// Returns the token's kind after the toggle. Clearing or overwriting an
    /// interior merchant token also reverts the merchant tokens after it, so a
    /// single toggle can change several tokens.
    pub fn toggle(&mut self, index: usize) -> Result<TokenKind, SelectionError> {
        let len = self.tokens.len();
        let token = self
            .tokens
            .get(index)
            .ok_or(SelectionError::OutOfRange { index, len })?;
        if token.kind.is_separator() {
            return Err(SelectionError::Separator { index });
        }

        match self.phase {
            Phase::Amount => toggle_amount(&mut self.tokens, index),
            Phase::Merchant => toggle_merchant(&mut self.tokens, index),
            Phase::Wildcards => toggle_wildcard(&mut self.tokens, index),
        }
        keep_first_merchant_block(&mut self.tokens);

        let kind = self.tokens[index].kind;
        debug!(phase = %self.phase, index, text = %self.tokens[index].text, kind = %kind, "token toggled");
        Ok(kind)
    }

    pub fn amount_index(&self) -> Option<usize> {
        self.tokens.iter().position(|t| t.kind == TokenKind::Amount)
    }

    pub fn merchant_indices(&self) -> Vec<usize> {
        indices_of(&self.tokens, TokenKind::Merchant)
    }

    pub fn spans(&self) -> Vec<Span> {
        group_tokens(&self.tokens)
    }

    /// Assemble the candidate pattern from the current classifications.
    pub fn pattern(&self) -> String {
        assemble(&self.spans())
    }
}

fn indices_of(tokens: &[Token], kind: TokenKind) -> Vec<usize> {
    tokens
        .iter()
        .enumerate()
        .filter(|(_, t)| t.kind == kind)
        .map(|(i, _)| i)
        .collect()
}

fn toggle_amount(tokens: &mut [Token], index: usize) {
    if tokens[index].kind == TokenKind::Amount {
        tokens[index].kind = TokenKind::Static;
        return;
    }
    for t in tokens.iter_mut().filter(|t| t.kind == TokenKind::Amount) {
        t.kind = TokenKind::Static;
    }
    tokens[index].kind = TokenKind::Amount;
}

fn toggle_merchant(tokens: &mut [Token], index: usize) {
    if tokens[index].kind == TokenKind::Merchant {
        tokens[index].kind = TokenKind::Static;
        return;
    }
    let members = indices_of(tokens, TokenKind::Merchant);
    if !members.is_empty() && !joins_block(tokens, &members, index) {
        for m in members {
            tokens[m].kind = TokenKind::Static;
        }
    }
    tokens[index].kind = TokenKind::Merchant;
}

fn toggle_wildcard(tokens: &mut [Token], index: usize) {
    tokens[index].kind = match tokens[index].kind {
        TokenKind::Wildcard => TokenKind::Static,
        _ => TokenKind::Wildcard,
    };
}

/// `index` touches the block if only separators lie between it and the
/// nearest member on either side.
fn joins_block(tokens: &[Token], members: &[usize], index: usize) -> bool {
    let only_separators = |range: &[Token]| range.iter().all(|t| t.kind.is_separator());
    let below = members.iter().copied().filter(|&m| m < index).max();
    let above = members.iter().copied().filter(|&m| m > index).min();

    below.is_some_and(|m| only_separators(&tokens[m + 1..index]))
        || above.is_some_and(|m| only_separators(&tokens[index + 1..m]))
}

/// Clearing an interior merchant token (or overwriting one with another kind)
/// can split the block; only the leading segment survives.
fn keep_first_merchant_block(tokens: &mut [Token]) {
    let mut seen = false;
    let mut closed = false;
    for t in tokens.iter_mut() {
        let kind = t.kind;
        match kind {
            TokenKind::Merchant if closed => t.kind = TokenKind::Static,
            TokenKind::Merchant => seen = true,
            k if k.is_separator() => {}
            _ => closed |= seen,
        }
    }
}
