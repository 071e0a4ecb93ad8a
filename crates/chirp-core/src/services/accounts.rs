//! Account registration, profile edits, deletion and login.

use std::sync::{Arc, OnceLock};

use uuid::Uuid;

use crate::domain::{Account, ProfileChanges, RegisterAccount};
use crate::error::DomainError;
use crate::ports::{AccountRepository, PasswordService};

const DUMMY_CREDENTIAL: &str = "chirp-dummy-credential";

/// Account use cases over an explicitly passed repository handle.
#[derive(Clone)]
pub struct AccountService {
    accounts: Arc<dyn AccountRepository>,
    passwords: Arc<dyn PasswordService>,
    dummy_hash: Arc<OnceLock<String>>,
}

impl AccountService {
    pub fn new(accounts: Arc<dyn AccountRepository>, passwords: Arc<dyn PasswordService>) -> Self {
        Self {
            accounts,
            passwords,
            dummy_hash: Arc::new(OnceLock::new()),
        }
    }

    /// Validate every field, hash the credential, then store the account.
    pub async fn register(&self, request: RegisterAccount) -> Result<Account, DomainError> {
        request.validate()?;

        let credential_hash = self
            .passwords
            .hash(&request.credential)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let account = Account::new(request.profile, credential_hash);
        let saved = self.accounts.create(account).await?;

        tracing::info!(account_id = %saved.id, handle = %saved.handle, "Account registered");
        Ok(saved)
    }

    /// Apply a profile edit and re-validate the whole record before storing it.
    pub async fn update_profile(
        &self,
        id: Uuid,
        changes: ProfileChanges,
    ) -> Result<Account, DomainError> {
        let mut account = self.get(id).await?;
        account.apply(changes);
        account.validate()?;

        let saved = self
            .accounts
            .update(account)
            .await
            .map_err(|e| DomainError::from_repo(e, "account", id))?;

        tracing::info!(account_id = %saved.id, "Account profile updated");
        Ok(saved)
    }

    /// Delete an account together with its posts.
    pub async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        self.accounts
            .delete(id)
            .await
            .map_err(|e| DomainError::from_repo(e, "account", id))?;

        tracing::info!(account_id = %id, "Account deleted");
        Ok(())
    }

    pub async fn get(&self, id: Uuid) -> Result<Account, DomainError> {
        self.accounts
            .get(id)
            .await?
            .ok_or(DomainError::NotFound {
                entity_type: "account",
                id,
            })
    }

    pub async fn list(&self) -> Result<Vec<Account>, DomainError> {
        Ok(self.accounts.list().await?)
    }

    /// Full check of a record against field rules and the uniqueness of its
    /// handle and email among other stored accounts. Has no side effects.
    pub async fn validate(&self, account: &Account) -> Result<(), DomainError> {
        account.validate()?;

        if let Some(other) = self.accounts.find_by_handle(&account.handle).await? {
            if other.id != account.id {
                return Err(DomainError::DuplicateKey { field: "handle" });
            }
        }
        if let Some(other) = self.accounts.find_by_email(&account.email).await? {
            if other.id != account.id {
                return Err(DomainError::DuplicateKey { field: "email" });
            }
        }
        Ok(())
    }

    /// Resolve a handle/credential pair to an account.
    ///
    /// Unknown handles and wrong credentials fail identically.
    pub async fn authenticate(
        &self,
        handle: &str,
        credential: &str,
    ) -> Result<Account, DomainError> {
        let Some(account) = self.accounts.find_by_handle(handle).await? else {
            self.burn_verification(credential);
            tracing::warn!("Login rejected");
            return Err(DomainError::InvalidCredentials);
        };

        let valid = self
            .passwords
            .verify(credential, &account.credential_hash)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        if !valid {
            tracing::warn!(account_id = %account.id, "Login rejected");
            return Err(DomainError::InvalidCredentials);
        }

        tracing::info!(account_id = %account.id, "Login succeeded");
        Ok(account)
    }

    // Spend the same hashing work for unknown handles as for known ones.
    fn burn_verification(&self, credential: &str) {
        let dummy = self.dummy_hash.get_or_init(|| {
            self.passwords
                .hash(DUMMY_CREDENTIAL)
                .unwrap_or_default()
        });
        let _ = self.passwords.verify(credential, dummy);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::domain::{Profile, Rule};
    use crate::services::fakes::{CountingPasswords, FakeAccounts};

    fn service() -> (AccountService, Arc<CountingPasswords>) {
        let passwords = Arc::new(CountingPasswords::default());
        let service = AccountService::new(Arc::new(FakeAccounts::default()), passwords.clone());
        (service, passwords)
    }

    fn request(handle: &str, credential: &str) -> RegisterAccount {
        RegisterAccount {
            profile: Profile {
                handle: handle.to_string(),
                given_name: "John".to_string(),
                family_name: "Doe".to_string(),
                email: "johndoe@example.org".to_string(),
                bio: String::new(),
            },
            credential: credential.to_string(),
        }
    }

    #[tokio::test]
    async fn test_invalid_registration_is_never_hashed() {
        let (service, passwords) = service();

        let result = service.register(request("johndoe", "short")).await;

        match result {
            Err(DomainError::Validation(errors)) => {
                assert_eq!(errors.rule_for("handle"), Some(Rule::InvalidFormat));
                assert_eq!(errors.rule_for("credential"), Some(Rule::TooShort { min: 8 }));
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
        assert_eq!(passwords.hashed.load(Ordering::SeqCst), 0);
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_handle_still_verifies_once() {
        let (service, passwords) = service();

        let result = service.authenticate("@nobody", "Password123").await;

        assert!(matches!(result, Err(DomainError::InvalidCredentials)));
        assert_eq!(passwords.verified.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_authenticate_matches_stored_hash() {
        let (service, _) = service();
        let john = service.register(request("@johndoe", "Password123")).await.unwrap();

        let found = service.authenticate("@johndoe", "Password123").await.unwrap();
        assert_eq!(found.id, john.id);
        assert!(matches!(
            service.authenticate("@johndoe", "Password124").await,
            Err(DomainError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_update_missing_account_is_not_found() {
        let (service, _) = service();
        let id = Uuid::new_v4();

        let result = service.update_profile(id, ProfileChanges::default()).await;

        assert!(matches!(
            result,
            Err(DomainError::NotFound { entity_type: "account", id: missing }) if missing == id
        ));
    }

    #[tokio::test]
    async fn test_validate_skips_own_row() {
        let (service, _) = service();
        let john = service.register(request("@johndoe", "Password123")).await.unwrap();

        assert!(service.validate(&john).await.is_ok());
        assert!(service.validate(&john).await.is_ok());
    }
}
