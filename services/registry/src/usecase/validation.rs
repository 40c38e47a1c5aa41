//! Input validation for registration, login and collection updates.
//!
//! Validators return the [`MessageKey`] of the client error so the calling
//! usecase can render it in the request language.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use personnel_domain::locale::Locale;
use personnel_domain::messages::{MessageKey, Messages};
use personnel_domain::reconcile::Identified;
use personnel_domain::user::Gender;

use crate::error::RegistryError;

pub const MAX_EMAIL_LEN: usize = 254;
pub const MAX_PASSWORD_LEN: usize = 128;

/// Render a validation failure as a client error in the request language.
pub fn client_error(messages: &Messages, locale: Locale, key: MessageKey) -> RegistryError {
    RegistryError::BadRequest(messages.get(locale, key).to_owned())
}

pub fn validate_email(email: &str) -> Result<(), MessageKey> {
    if email.is_empty() || email.len() > MAX_EMAIL_LEN {
        return Err(MessageKey::InvalidEmail);
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err(MessageKey::InvalidEmail);
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), MessageKey> {
    let len = password.chars().count();
    if len == 0 || len > MAX_PASSWORD_LEN {
        return Err(MessageKey::InvalidPassword);
    }
    Ok(())
}

/// Taxpayer identification number: non-empty, ASCII digits only.
pub fn validate_tin(tin: &str) -> Result<(), MessageKey> {
    if tin.is_empty() || !tin.bytes().all(|b| b.is_ascii_digit()) {
        return Err(MessageKey::InvalidTin);
    }
    Ok(())
}

pub fn parse_gender(code: &str) -> Result<Gender, MessageKey> {
    Gender::from_code(code).ok_or(MessageKey::InvalidGender)
}

/// A desired-state collection may not name the same persisted id twice.
pub fn validate_unique_ids<T: Identified>(items: &[T]) -> Result<(), MessageKey> {
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        let id = item.id();
        if id != 0 && !seen.insert(id) {
            return Err(MessageKey::DuplicateItemId);
        }
    }
    Ok(())
}
