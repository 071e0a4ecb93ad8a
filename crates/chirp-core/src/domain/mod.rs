//! Domain entities - the core business objects and their field rules.

mod account;
mod post;
mod validation;

pub use account::{
    Account, BIO_MAX, CREDENTIAL_MIN, EMAIL_MAX, HANDLE_MAX, NAME_MAX, Profile, ProfileChanges,
    RegisterAccount, normalize_email, validate_bio, validate_credential, validate_email,
    validate_handle, validate_name,
};
pub use post::{BODY_MAX, Post, PostDraft, validate_body};
pub use validation::{FieldViolation, Rule, ValidationErrors, Validator, limit_text, require_text};
