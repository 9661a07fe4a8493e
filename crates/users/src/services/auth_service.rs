//! Registration, login and session token checks.

use std::time::Duration;

use offramp_config::AuthConfig;
use offramp_database::{CreateUserRequest, DatabaseError, User, UserRepository};
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::types::{
    AccountSummary, LoginInput, LoginOutcome, RegisterInput, RegisteredAccount, SessionUser,
    UserError, UserResult,
};
use crate::utils::{
    clean_phone, hash_password, validate_registration, verify_password, JwtManager, DEFAULT_CITY,
};

/// Service for managing authentication operations
pub struct AuthService {
    users: UserRepository,
    jwt: Option<JwtManager>,
    secure_cookies: bool,
}

impl AuthService {
    /// Without `auth.secret` every operation fails with [`UserError::NotConfigured`].
    pub fn new(pool: SqlitePool, config: &AuthConfig) -> Self {
        let jwt = config.secret.as_deref().map(|secret| {
            JwtManager::new(secret, Duration::from_secs(config.session_ttl_seconds))
        });

        Self {
            users: UserRepository::new(pool),
            jwt,
            secure_cookies: config.secure_cookies,
        }
    }

    fn jwt(&self) -> UserResult<&JwtManager> {
        self.jwt.as_ref().ok_or(UserError::NotConfigured)
    }

    pub fn is_configured(&self) -> bool {
        self.jwt.is_some()
    }

    pub fn session_ttl_seconds(&self) -> u64 {
        self.jwt
            .as_ref()
            .map(|jwt| jwt.token_duration().as_secs())
            .unwrap_or_default()
    }

    pub fn secure_cookies(&self) -> bool {
        self.secure_cookies
    }

    /// Register new user and issue their first session token.
    pub async fn register(&self, input: RegisterInput) -> UserResult<RegisteredAccount> {
        let jwt = self.jwt()?;

        let errors = validate_registration(&input);
        if !errors.is_empty() {
            return Err(UserError::ValidationFailed(errors.join(", ")));
        }

        if self.users.find_by_email(&input.email).await?.is_some() {
            return Err(UserError::EmailAlreadyExists);
        }

        let password_hash = hash_password(&input.password)?;
        let request = CreateUserRequest {
            email: input.email,
            full_name: input.full_name,
            password_hash,
            phone: clean_phone(&input.phone),
            city: input
                .city
                .filter(|city| !city.is_empty())
                .unwrap_or_else(|| DEFAULT_CITY.to_string()),
            region: input.region.filter(|region| !region.is_empty()),
        };

        // A concurrent registration can still win the unique index.
        let user = self.users.create(&request).await.map_err(|err| match err {
            DatabaseError::Duplicate(_) => UserError::EmailAlreadyExists,
            other => UserError::Database(other),
        })?;

        let token = jwt.generate_token(&user.id)?;
        info!(user_id = %user.id, "account registered");

        Ok(RegisteredAccount {
            user: AccountSummary {
                id: user.id,
                email: user.email,
                full_name: user.full_name,
            },
            token,
        })
    }

    /// Login user with email and password
    pub async fn login(&self, input: LoginInput) -> UserResult<LoginOutcome> {
        let jwt = self.jwt()?;

        let Some(user) = self.users.find_by_email(&input.email).await? else {
            debug!("login attempt for unknown email");
            return Err(UserError::InvalidCredentials);
        };

        if !verify_password(&input.password, &user.password_hash) {
            warn!(user_id = %user.id, "login rejected, wrong password");
            return Err(UserError::InvalidCredentials);
        }

        let token = jwt.generate_token(&user.id)?;
        info!(user_id = %user.id, "user logged in");

        Ok(LoginOutcome {
            user: SessionUser::from(&user),
            token,
        })
    }

    /// Resolve a session token to its user.
    pub async fn authenticate(&self, token: Option<&str>) -> UserResult<User> {
        let jwt = self.jwt()?;

        let token = token
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(UserError::MissingSession)?;

        let claims = jwt.validate_token(token)?;

        self.users
            .find_by_id(&claims.user_id)
            .await?
            .ok_or(UserError::UserNotFound)
    }
}
