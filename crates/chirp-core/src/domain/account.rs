use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{Rule, ValidationErrors, Validator, char_len, limit_text, require_text};

/// Maximum handle length, including the leading `@`.
pub const HANDLE_MAX: usize = 30;
/// Maximum length for given and family names.
pub const NAME_MAX: usize = 50;
/// Maximum e-mail address length.
pub const EMAIL_MAX: usize = 254;
/// Maximum biography length.
pub const BIO_MAX: usize = 520;
/// Minimum length of a plain-text credential at registration.
pub const CREDENTIAL_MIN: usize = 8;

static HANDLE_RE: OnceLock<Regex> = OnceLock::new();
static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn handle_regex() -> &'static Regex {
    HANDLE_RE.get_or_init(|| {
        // Length is enforced separately.
        Regex::new("^@[A-Za-z0-9_]{3,}$")
            .unwrap_or_else(|error| panic!("handle regex failed to compile: {error}"))
    })
}

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // One `@`, non-empty local part, dotted domain with non-empty labels.
        Regex::new(r"^[^@\s]+@[^@\s.]+(\.[^@\s.]+)+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// `@` followed by at least three letters, digits or underscores, at most
/// [`HANDLE_MAX`] characters in total.
pub fn validate_handle(handle: &str) -> Result<(), Rule> {
    if handle.is_empty() {
        return Err(Rule::Required);
    }
    if char_len(handle) > HANDLE_MAX {
        return Err(Rule::TooLong { max: HANDLE_MAX });
    }
    if !handle_regex().is_match(handle) {
        return Err(Rule::InvalidFormat);
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), Rule> {
    require_text(name, NAME_MAX)
}

pub fn validate_email(email: &str) -> Result<(), Rule> {
    if email.is_empty() {
        return Err(Rule::Required);
    }
    if char_len(email) > EMAIL_MAX {
        return Err(Rule::TooLong { max: EMAIL_MAX });
    }
    if !email_regex().is_match(email) {
        return Err(Rule::InvalidFormat);
    }
    Ok(())
}

pub fn validate_bio(bio: &str) -> Result<(), Rule> {
    limit_text(bio, BIO_MAX)
}

pub fn validate_credential(credential: &str) -> Result<(), Rule> {
    if credential.is_empty() {
        return Err(Rule::Required);
    }
    if char_len(credential) < CREDENTIAL_MIN {
        return Err(Rule::TooShort {
            min: CREDENTIAL_MIN,
        });
    }
    Ok(())
}

/// Lower-cases the domain part of an address, leaving the local part as typed.
pub fn normalize_email(email: &str) -> String {
    let email = email.trim();
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{local}@{}", domain.to_lowercase()),
        None => email.to_string(),
    }
}

/// Account entity - a registered identity with credentials and profile data.
///
/// `handle` and `email` are unique across all accounts; that invariant is
/// owned by the repository, everything else by [`Account::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub handle: String,
    pub given_name: String,
    pub family_name: String,
    pub email: String,
    pub bio: String,
    #[serde(skip_serializing)]
    pub credential_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account with generated ID and timestamps.
    pub fn new(profile: Profile, credential_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            handle: profile.handle,
            given_name: profile.given_name,
            family_name: profile.family_name,
            email: normalize_email(&profile.email),
            bio: profile.bio,
            credential_hash,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.given_name, self.family_name)
    }

    /// Check every field rule and report all failures together.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut validator = Validator::new();
        validator
            .check("handle", validate_handle(&self.handle))
            .check("given_name", validate_name(&self.given_name))
            .check("family_name", validate_name(&self.family_name))
            .check("email", validate_email(&self.email))
            .check("bio", validate_bio(&self.bio));
        validator.finish()
    }

    /// Apply a profile edit. Fields left as `None` keep their current value.
    pub fn apply(&mut self, changes: ProfileChanges) {
        if let Some(handle) = changes.handle {
            self.handle = handle;
        }
        if let Some(given_name) = changes.given_name {
            self.given_name = given_name;
        }
        if let Some(family_name) = changes.family_name {
            self.family_name = family_name;
        }
        if let Some(email) = changes.email {
            self.email = normalize_email(&email);
        }
        if let Some(bio) = changes.bio {
            self.bio = bio;
        }
        self.updated_at = Utc::now();
    }
}

/// Profile data supplied on registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub handle: String,
    pub given_name: String,
    pub family_name: String,
    pub email: String,
    pub bio: String,
}

/// Registration input: profile plus the plain-text credential.
#[derive(Debug, Clone)]
pub struct RegisterAccount {
    pub profile: Profile,
    pub credential: String,
}

impl RegisterAccount {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let profile = &self.profile;
        let mut validator = Validator::new();
        validator
            .check("handle", validate_handle(&profile.handle))
            .check("given_name", validate_name(&profile.given_name))
            .check("family_name", validate_name(&profile.family_name))
            .check("email", validate_email(&normalize_email(&profile.email)))
            .check("bio", validate_bio(&profile.bio))
            .check("credential", validate_credential(&self.credential));
        validator.finish()
    }
}

/// A partial profile edit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileChanges {
    pub handle: Option<String>,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
}
