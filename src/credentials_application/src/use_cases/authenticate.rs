use std::sync::Arc;

use secrecy::Secret;

use credentials_core::{
    Account, AccountStore, AccountStoreError, Clock, Email, Password, PasswordHasher,
    ThrottleState, ThrottleStore, minutes_until,
};

use crate::error::AccountServiceError;
use crate::throttle_guard::ThrottleGuard;

/// Authenticate use case - checks a login and password against the stored
/// hash, counting failures toward suspension
pub struct AuthenticateUseCase<A, T, H>
where
    A: AccountStore,
    T: ThrottleStore,
    H: PasswordHasher,
{
    accounts: A,
    throttle: ThrottleGuard<A, T>,
    hasher: H,
    clock: Arc<dyn Clock>,
}

impl<A, T, H> AuthenticateUseCase<A, T, H>
where
    A: AccountStore,
    T: ThrottleStore,
    H: PasswordHasher,
{
    pub fn new(accounts: A, throttle: ThrottleGuard<A, T>, hasher: H, clock: Arc<dyn Clock>) -> Self {
        Self {
            accounts,
            throttle,
            hasher,
            clock,
        }
    }

    /// Execute the authenticate use case
    ///
    /// Unknown logins and malformed input fail with `InvalidCredentials`
    /// without touching any throttle record. A wrong password counts as a
    /// failure and may suspend the account. Pending accounts are refused
    /// only after the password has been verified.
    #[tracing::instrument(name = "AuthenticateUseCase::execute", skip_all)]
    pub async fn execute(
        &self,
        login: &str,
        password: Secret<String>,
    ) -> Result<Account, AccountServiceError> {
        let email = Email::parse(login).map_err(|_| AccountServiceError::InvalidCredentials)?;
        let password = Password::parse(password).ok();

        let account = match self.accounts.find_by_login(&email).await {
            Ok(account) => account,
            Err(AccountStoreError::NotFound) => return Err(AccountServiceError::InvalidCredentials),
            Err(e) => return Err(e.into()),
        };

        self.throttle.check(account.id()).await?;

        let verified = match &password {
            Some(password) => self.hasher.verify(password, account.password_hash()).await?,
            None => false,
        };

        if !verified {
            return match self.throttle.record_failure(account.id()).await? {
                ThrottleState::Suspended { until } => Err(AccountServiceError::Suspended {
                    minutes_remaining: minutes_until(until, self.clock.now()),
                }),
                _ => Err(AccountServiceError::InvalidCredentials),
            };
        }

        if !account.is_activated() {
            return Err(AccountServiceError::NotActivated);
        }

        self.throttle.clear_attempts(account.id()).await?;
        let now = self.clock.now();
        let account = self
            .accounts
            .update(account.id(), |account| {
                account.record_login(now);
                Ok::<_, AccountServiceError>(account.clone())
            })
            .await?;

        tracing::info!(account_id = %account.id(), "Login succeeded");
        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Fixture, form};
    use chrono::TimeDelta;
    use credentials_adapters::hashing::Argon2PasswordHasher;
    use credentials_adapters::persistence::{DashMapThrottleStore, HashMapAccountStore};
    use credentials_core::{NewAccount, ThrottlePolicy};
    use std::collections::BTreeSet;

    type UseCase = AuthenticateUseCase<HashMapAccountStore, DashMapThrottleStore, Argon2PasswordHasher>;

    fn use_case(fixture: &Fixture) -> UseCase {
        AuthenticateUseCase::new(
            fixture.accounts.clone(),
            ThrottleGuard::new(
                fixture.accounts.clone(),
                fixture.throttles.clone(),
                ThrottlePolicy::default(),
                fixture.clock(),
            ),
            fixture.hasher.clone(),
            fixture.clock(),
        )
    }

    fn secret(raw: &str) -> Secret<String> {
        Secret::new(raw.to_string())
    }

    async fn account_with_password(fixture: &Fixture, password: &str, activated: bool) -> Account {
        let password = Password::parse(secret(password)).unwrap();
        let now = fixture.clock.now();
        fixture
            .accounts
            .create(NewAccount {
                details: form("Jane", "Doe", "jane@example.com").validate().unwrap(),
                password_hash: fixture.hasher.hash(&password).await.unwrap(),
                activated_at: activated.then_some(now),
                activation_code: None,
                groups: BTreeSet::new(),
                created_at: now,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn correct_password_logs_in() {
        let fixture = Fixture::new();
        account_with_password(&fixture, "Correct1", true).await;

        let account = use_case(&fixture)
            .execute("jane@example.com", secret("Correct1"))
            .await
            .unwrap();

        assert_eq!(account.last_login_at(), Some(fixture.clock.now()));
    }

    #[tokio::test]
    async fn fifth_wrong_password_suspends() {
        let fixture = Fixture::new();
        account_with_password(&fixture, "Correct1", true).await;
        let use_case = use_case(&fixture);

        for _ in 0..4 {
            assert!(matches!(
                use_case.execute("jane@example.com", secret("Wrong123")).await,
                Err(AccountServiceError::InvalidCredentials)
            ));
        }
        assert!(matches!(
            use_case.execute("jane@example.com", secret("Wrong123")).await,
            Err(AccountServiceError::Suspended {
                minutes_remaining: 15
            })
        ));
        // even the right password is refused while suspended
        assert!(matches!(
            use_case.execute("jane@example.com", secret("Correct1")).await,
            Err(AccountServiceError::Suspended { .. })
        ));

        fixture.clock.advance(TimeDelta::minutes(15));
        assert!(use_case
            .execute("jane@example.com", secret("Correct1"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn success_resets_the_failure_count() {
        let fixture = Fixture::new();
        let account = account_with_password(&fixture, "Correct1", true).await;
        let use_case = use_case(&fixture);

        for _ in 0..4 {
            let _ = use_case.execute("jane@example.com", secret("Wrong123")).await;
        }
        use_case
            .execute("jane@example.com", secret("Correct1"))
            .await
            .unwrap();

        let record = fixture.throttles.get(account.id()).await.unwrap();
        assert_eq!(record.attempts(), 0);
    }

    #[tokio::test]
    async fn pending_account_is_refused_after_verification() {
        let fixture = Fixture::new();
        account_with_password(&fixture, "Correct1", false).await;

        assert!(matches!(
            use_case(&fixture)
                .execute("jane@example.com", secret("Correct1"))
                .await,
            Err(AccountServiceError::NotActivated)
        ));
    }

    #[tokio::test]
    async fn unknown_or_malformed_logins_are_invalid_credentials() {
        let fixture = Fixture::new();
        let use_case = use_case(&fixture);

        assert!(matches!(
            use_case.execute("nobody@example.com", secret("Whatever1")).await,
            Err(AccountServiceError::InvalidCredentials)
        ));
        assert!(matches!(
            use_case.execute("not an email", secret("Whatever1")).await,
            Err(AccountServiceError::InvalidCredentials)
        ));
    }
}
