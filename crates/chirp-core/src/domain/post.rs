use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{Rule, ValidationErrors, Validator, require_text};

/// Maximum post body length.
pub const BODY_MAX: usize = 280;

pub fn validate_body(body: &str) -> Result<(), Rule> {
    require_text(body, BODY_MAX)
}

/// Post entity - a short message owned by exactly one account.
///
/// Posts are never edited; `created_at` is fixed when the post is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post.
    pub fn new(author_id: Uuid, body: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            author_id,
            body,
            created_at: Utc::now(),
        }
    }

    /// Field rules only; whether the author still exists is a storage question.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut validator = Validator::new();
        validator.check("body", validate_body(&self.body));
        validator.finish()
    }
}

/// A post before it is bound to a persisted record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub author_id: Option<Uuid>,
    pub body: String,
}

impl PostDraft {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut validator = Validator::new();
        validator
            .check("author", self.author_id.map(|_| ()).ok_or(Rule::Required))
            .check("body", validate_body(&self.body));
        validator.finish()
    }

    /// Build the post. Call only after [`PostDraft::validate`] succeeded.
    pub fn into_post(self) -> Option<Post> {
        self.author_id.map(|author_id| Post::new(author_id, self.body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_boundaries() {
        let author = Uuid::new_v4();
        assert!(Post::new(author, "This is a post".to_string()).validate().is_ok());
        assert!(Post::new(author, "x".repeat(280)).validate().is_ok());

        let errors = Post::new(author, "x".repeat(281)).validate().unwrap_err();
        assert_eq!(errors.rule_for("body"), Some(Rule::TooLong { max: BODY_MAX }));
    }

    #[test]
    fn test_body_must_not_be_blank() {
        assert_eq!(validate_body(""), Err(Rule::Required));
        assert_eq!(validate_body("  \n"), Err(Rule::Required));
    }

    #[test]
    fn test_draft_requires_author() {
        let draft = PostDraft {
            author_id: None,
            body: "x".repeat(281),
        };
        let errors = draft.validate().unwrap_err();
        assert_eq!(errors.rule_for("author"), Some(Rule::Required));
        assert!(errors.has_field("body"));
        assert!(draft.into_post().is_none());
    }

    #[test]
    fn test_draft_into_post_binds_author() {
        let author = Uuid::new_v4();
        let draft = PostDraft {
            author_id: Some(author),
            body: "hello".to_string(),
        };
        assert!(draft.validate().is_ok());

        let post = draft.into_post().unwrap();
        assert_eq!(post.author_id, author);
        assert_eq!(post.body, "hello");
    }
}
