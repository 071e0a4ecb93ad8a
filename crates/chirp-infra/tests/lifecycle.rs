//! Account and post lifecycle through the services, backed by the in-memory store.

use std::sync::Arc;

use chirp_core::domain::{Account, Profile, ProfileChanges, RegisterAccount, Rule};
use chirp_core::{AccountService, DomainError, PostService};
use chirp_infra::{Argon2PasswordService, InMemoryStore};

struct Fixture {
    accounts: AccountService,
    posts: PostService,
}

fn fixture() -> Fixture {
    let store = InMemoryStore::new();
    let account_repo = Arc::new(store.accounts());
    let post_repo = Arc::new(store.posts());
    let passwords = Arc::new(Argon2PasswordService::new());

    Fixture {
        accounts: AccountService::new(account_repo.clone(), passwords),
        posts: PostService::new(post_repo, account_repo),
    }
}

fn registration(handle: &str, given_name: &str, email: &str) -> RegisterAccount {
    RegisterAccount {
        profile: Profile {
            handle: handle.to_string(),
            given_name: given_name.to_string(),
            family_name: "Doe".to_string(),
            email: email.to_string(),
            bio: format!("Hi, my name is {given_name}."),
        },
        credential: "Password123".to_string(),
    }
}

fn john() -> RegisterAccount {
    registration("@johndoe", "John", "johndoe@example.org")
}

fn jane() -> RegisterAccount {
    registration("@janedoe", "Jane", "janedoe@example.org")
}

#[tokio::test]
async fn test_register_stores_hashed_credential() {
    let f = fixture();

    let account = f.accounts.register(john()).await.unwrap();

    assert_eq!(account.handle, "@johndoe");
    assert_ne!(account.credential_hash, "Password123");
    assert_eq!(f.accounts.get(account.id).await.unwrap(), account);
}

#[tokio::test]
async fn test_second_registration_with_same_handle_is_duplicate() {
    let f = fixture();
    f.accounts.register(john()).await.unwrap();

    let result = f
        .accounts
        .register(registration("@johndoe", "Johnny", "johnny@example.org"))
        .await;

    assert!(matches!(
        result,
        Err(DomainError::DuplicateKey { field: "handle" })
    ));
    assert_eq!(f.accounts.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_second_registration_with_same_email_is_duplicate() {
    let f = fixture();
    f.accounts.register(john()).await.unwrap();

    let result = f
        .accounts
        .register(registration("@johnny", "Johnny", "JohnDoe@EXAMPLE.org"))
        .await;

    // Only the domain is case-normalised, so a differently cased local part is distinct.
    assert!(result.is_ok());

    let result = f
        .accounts
        .register(registration("@jonny", "Jonny", "johndoe@EXAMPLE.ORG"))
        .await;
    assert!(matches!(
        result,
        Err(DomainError::DuplicateKey { field: "email" })
    ));
}

#[tokio::test]
async fn test_register_reports_every_invalid_field() {
    let f = fixture();
    let mut request = registration("@jo", "", "johndoe@@example.org");
    request.profile.bio = "x".repeat(521);
    request.credential = "short".to_string();

    let Err(DomainError::Validation(errors)) = f.accounts.register(request).await else {
        panic!("expected a validation failure");
    };

    assert_eq!(errors.rule_for("handle"), Some(Rule::InvalidFormat));
    assert_eq!(errors.rule_for("given_name"), Some(Rule::Required));
    assert_eq!(errors.rule_for("email"), Some(Rule::InvalidFormat));
    assert_eq!(errors.rule_for("bio"), Some(Rule::TooLong { max: 520 }));
    assert_eq!(errors.rule_for("credential"), Some(Rule::TooShort { min: 8 }));
    assert!(f.accounts.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_validate_checks_uniqueness_against_other_accounts() {
    let f = fixture();
    let mut john = f.accounts.register(john()).await.unwrap();
    let jane = f.accounts.register(jane()).await.unwrap();

    assert!(f.accounts.validate(&john).await.is_ok());

    john.given_name = jane.given_name.clone();
    john.bio = jane.bio.clone();
    assert!(f.accounts.validate(&john).await.is_ok());

    john.handle = jane.handle.clone();
    assert!(matches!(
        f.accounts.validate(&john).await,
        Err(DomainError::DuplicateKey { field: "handle" })
    ));
    // No hidden state: the same record gives the same answer.
    assert!(matches!(
        f.accounts.validate(&john).await,
        Err(DomainError::DuplicateKey { field: "handle" })
    ));

    john.handle = "@johndoe".to_string();
    john.email = jane.email.clone();
    assert!(matches!(
        f.accounts.validate(&john).await,
        Err(DomainError::DuplicateKey { field: "email" })
    ));
}

#[tokio::test]
async fn test_update_profile_revalidates_the_record() {
    let f = fixture();
    let john = f.accounts.register(john()).await.unwrap();
    f.accounts.register(jane()).await.unwrap();

    let updated = f
        .accounts
        .update_profile(
            john.id,
            ProfileChanges {
                handle: Some("@johnny".to_string()),
                bio: Some(String::new()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.handle, "@johnny");
    assert_eq!(updated.bio, "");
    assert_eq!(updated.created_at, john.created_at);

    let too_long = f
        .accounts
        .update_profile(
            john.id,
            ProfileChanges {
                family_name: Some("x".repeat(51)),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(too_long, Err(DomainError::Validation(ref e)) if e.has_field("family_name")));

    let taken = f
        .accounts
        .update_profile(
            john.id,
            ProfileChanges {
                email: Some("janedoe@example.org".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(
        taken,
        Err(DomainError::DuplicateKey { field: "email" })
    ));

    let stored = f.accounts.get(john.id).await.unwrap();
    assert_eq!(stored.handle, "@johnny");
    assert_eq!(stored.email, "johndoe@example.org");
}

#[tokio::test]
async fn test_authenticate() {
    let f = fixture();
    let john = f.accounts.register(john()).await.unwrap();

    let account = f
        .accounts
        .authenticate("@johndoe", "Password123")
        .await
        .unwrap();
    assert_eq!(account.id, john.id);

    let wrong_credential = f.accounts.authenticate("@johndoe", "Password124").await;
    let unknown_handle = f.accounts.authenticate("@nobody", "Password123").await;

    assert!(matches!(
        wrong_credential,
        Err(DomainError::InvalidCredentials)
    ));
    assert!(matches!(unknown_handle, Err(DomainError::InvalidCredentials)));
}

#[tokio::test]
async fn test_publish_and_list() {
    let f = fixture();
    let john = f.accounts.register(john()).await.unwrap();
    let jane = f.accounts.register(jane()).await.unwrap();

    let post = f
        .posts
        .publish(Some(john.id), "This is a post".to_string())
        .await
        .unwrap();
    f.posts
        .publish(Some(jane.id), "x".repeat(280))
        .await
        .unwrap();

    assert!(f.posts.validate(&post).await.is_ok());
    assert_eq!(f.posts.get(post.id).await.unwrap(), post);
    assert_eq!(f.posts.list_by_author(john.id).await.unwrap(), vec![post]);
    assert_eq!(f.posts.feed().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_publish_rejects_bad_drafts() {
    let f = fixture();
    let john = f.accounts.register(john()).await.unwrap();

    let too_long = f.posts.publish(Some(john.id), "x".repeat(281)).await;
    assert!(matches!(
        too_long,
        Err(DomainError::Validation(ref e)) if e.has_field("body")
    ));

    let no_author = f.posts.publish(None, "hello".to_string()).await;
    assert!(matches!(
        no_author,
        Err(DomainError::Validation(ref e)) if e.rule_for("author") == Some(Rule::Required)
    ));

    let ghost = uuid::Uuid::new_v4();
    let orphan = f.posts.publish(Some(ghost), "hello".to_string()).await;
    assert!(matches!(
        orphan,
        Err(DomainError::InvalidReference { author_id }) if author_id == ghost
    ));

    assert!(f.posts.feed().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_deleting_author_invalidates_and_removes_posts() {
    let f = fixture();
    let john = f.accounts.register(john()).await.unwrap();
    let post = f
        .posts
        .publish(Some(john.id), "This is a post".to_string())
        .await
        .unwrap();

    f.accounts.delete(john.id).await.unwrap();

    assert!(matches!(
        f.posts.validate(&post).await,
        Err(DomainError::InvalidReference { author_id }) if author_id == john.id
    ));
    assert_eq!(post.body, "This is a post");
    assert!(matches!(
        f.posts.get(post.id).await,
        Err(DomainError::NotFound { entity_type: "post", .. })
    ));
    assert!(matches!(
        f.posts.list_by_author(john.id).await,
        Err(DomainError::NotFound { entity_type: "account", .. })
    ));
    assert!(matches!(
        f.accounts.delete(john.id).await,
        Err(DomainError::NotFound { entity_type: "account", .. })
    ));
}

#[tokio::test]
async fn test_handle_clash_wins_in_register_and_validate() {
    let f = fixture();
    f.accounts
        .register(registration("@john", "John", "a@x.org"))
        .await
        .unwrap();
    f.accounts
        .register(registration("@jane", "Jane", "b@x.org"))
        .await
        .unwrap();

    let request = registration("@jane", "Janet", "a@x.org");
    let candidate = Account::new(request.profile.clone(), "hash".to_string());

    assert!(matches!(
        f.accounts.validate(&candidate).await,
        Err(DomainError::DuplicateKey { field: "handle" })
    ));
    assert!(matches!(
        f.accounts.register(request).await,
        Err(DomainError::DuplicateKey { field: "handle" })
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_concurrent_registrations_with_same_handle() {
    let f = fixture();

    let (first, second) = tokio::join!(
        f.accounts
            .register(registration("@johndoe", "John", "john1@example.org")),
        f.accounts
            .register(registration("@johndoe", "John", "john2@example.org")),
    );

    let results = [first, second];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results.iter().any(|r| matches!(
        r,
        Err(DomainError::DuplicateKey { field: "handle" })
    )));
    assert_eq!(f.accounts.list().await.unwrap().len(), 1);
}
