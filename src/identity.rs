//! Identity classification for the login handshake.
//!
//! A raw user-supplied string is classified as a phone number or an e-mail
//! address. The phone pattern is checked first; this precedence is part of
//! the contract, not an accident — a purely numeric string must never be
//! routed down the e-mail path, regardless of what the loose e-mail pattern
//! would say about it.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::IdentityError;

/// A classified identity, existing only for the duration of one login
/// attempt. The two shapes are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    /// E.164-ish phone number, always carrying a leading `+`.
    Phone(String),
    /// E-mail address, passed through as entered.
    Email(String),
}

impl Identity {
    /// Query parameter key/value for the verification endpoint.
    pub fn as_query_pair(&self) -> (&'static str, &str) {
        match self {
            Identity::Phone(value) => ("phone", value),
            Identity::Email(value) => ("email", value),
        }
    }

    /// The raw value, for display in prompts ("code sent to ...").
    pub fn display_value(&self) -> &str {
        match self {
            Identity::Phone(value) | Identity::Email(value) => value,
        }
    }
}

fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\+?[0-9]{1,15}$").expect("valid phone pattern"))
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)[^@]+@[^@]+").expect("valid email pattern"))
}

/// Classify a raw identity string as a phone number or an e-mail address.
///
/// Phone numbers without a leading `+` are prefixed with `+1` (US default).
/// Anything that matches neither pattern fails with
/// [`IdentityError::InvalidFormat`].
pub fn classify(input: &str) -> Result<Identity, IdentityError> {
    if phone_pattern().is_match(input) {
        let normalized = if input.starts_with('+') {
            input.to_string()
        } else {
            format!("+1{input}")
        };
        return Ok(Identity::Phone(normalized));
    }

    if email_pattern().is_match(input) {
        return Ok(Identity::Email(input.to_string()));
    }

    Err(IdentityError::InvalidFormat)
}
