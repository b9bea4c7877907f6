//! Accounts, password checks and cookie-backed sessions.
//!
//! Handlers never look at cookies themselves: they take a [`Viewer`], which
//! is either anonymous or carries the signed-in user's [`Profile`].

use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::CookieJar;
use cookie::{Cookie, SameSite};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, SqlErr};
use tracing::{debug, info};

use crate::{
    AppState,
    entities::{sessions, users},
    error::AppError,
    models::Profile,
};

pub const SESSION_COOKIE: &str = "catalogd_session";

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("{0}")]
    Invalid(String),
    #[error("Please enter both username and password.")]
    MissingCredentials,
    #[error("Invalid username or password.")]
    BadCredentials,
    #[error("That username or email is already taken.")]
    Taken,
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error(transparent)]
    Db(#[from] sea_orm::DbErr),
}

/// Who is making the request.
#[derive(Clone, Debug)]
pub enum Viewer {
    Anonymous,
    Authenticated(Profile),
}

impl Viewer {
    pub fn profile(&self) -> Option<&Profile> {
        match self {
            Viewer::Anonymous => None,
            Viewer::Authenticated(profile) => Some(profile),
        }
    }
}

impl FromRequestParts<Arc<AppState>> for Viewer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let Some(cookie) = jar.get(SESSION_COOKIE) else {
            return Ok(Viewer::Anonymous);
        };

        let viewer = match resolve_session(state.store.db(), cookie.value(), now_sec()).await? {
            Some(profile) => Viewer::Authenticated(profile),
            None => Viewer::Anonymous,
        };
        Ok(viewer)
    }
}

pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hash(e.to_string()))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(hash).map_err(|e| AuthError::Hash(e.to_string()))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AuthError::Hash(e.to_string())),
    }
}

pub async fn register(
    db: &DatabaseConnection,
    username: &str,
    email: &str,
    password: &str,
    min_password_length: usize,
) -> Result<Profile, AuthError> {
    let username = username.trim();
    let email = email.trim();

    if username.is_empty() || username.contains(char::is_whitespace) || username.contains('/') {
        return Err(AuthError::Invalid(
            "Usernames cannot be blank or contain spaces or slashes.".into(),
        ));
    }
    if !email.contains('@') {
        return Err(AuthError::Invalid("Enter a valid email address.".into()));
    }
    if password.chars().count() < min_password_length {
        return Err(AuthError::Invalid(format!(
            "Password must be at least {min_password_length} characters long."
        )));
    }

    let user = users::Model {
        id: uuid::Uuid::new_v4().to_string(),
        username: username.to_string(),
        email: email.to_string(),
        password_hash: hash_password(password)?,
        avatar_url: None,
        created_at: now_sec(),
    };

    let model = users::ActiveModel {
        id: Set(user.id.clone()),
        username: Set(user.username.clone()),
        email: Set(user.email.clone()),
        password_hash: Set(user.password_hash.clone()),
        avatar_url: Set(None),
        created_at: Set(user.created_at),
    };

    users::Entity::insert(model).exec_without_returning(db).await.map_err(|e| {
        match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => AuthError::Taken,
            _ => AuthError::Db(e),
        }
    })?;

    info!(username = %user.username, "registered user");
    Ok(user.into())
}

/// Checks credentials and opens a session, returning its token.
pub async fn login(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
    ttl_days: i64,
) -> Result<String, AuthError> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(AuthError::MissingCredentials);
    }

    let Some(user) =
        users::Entity::find().filter(users::Column::Username.eq(username)).one(db).await?
    else {
        debug!(username = %username, "login for unknown user");
        return Err(AuthError::BadCredentials);
    };

    if !verify_password(password, &user.password_hash)? {
        debug!(username = %username, "login with wrong password");
        return Err(AuthError::BadCredentials);
    }

    let now = now_sec();
    let token = uuid::Uuid::new_v4().simple().to_string();
    let session = sessions::ActiveModel {
        token: Set(token.clone()),
        user_id: Set(user.id),
        created_at: Set(now),
        expires_at: Set(now + ttl_days * 86_400),
    };
    sessions::Entity::insert(session).exec_without_returning(db).await?;

    info!(username = %username, "signed in");
    Ok(token)
}

/// Looks up the profile behind a session token. Expired or unknown tokens
/// resolve to `None`.
pub async fn resolve_session(
    db: &DatabaseConnection,
    token: &str,
    now: i64,
) -> Result<Option<Profile>, sea_orm::DbErr> {
    let Some(session) = sessions::Entity::find_by_id(token.to_string()).one(db).await? else {
        return Ok(None);
    };
    if session.expires_at <= now {
        sessions::Entity::delete_by_id(session.token).exec(db).await?;
        return Ok(None);
    }

    let user = users::Entity::find_by_id(session.user_id).one(db).await?;
    Ok(user.map(Profile::from))
}

pub async fn logout(db: &DatabaseConnection, token: &str) -> Result<(), sea_orm::DbErr> {
    sessions::Entity::delete_by_id(token.to_string()).exec(db).await?;
    Ok(())
}

pub fn session_cookie(token: String, ttl_days: i64, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::days(ttl_days))
        .build()
}

pub fn expired_session_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}

pub fn now_sec() -> i64 {
    jiff::Timestamp::now().as_second()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{memory_db, user};

    #[test]
    fn hash_and_verify() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct horse", &hash).unwrap());
        assert!(!verify_password("battery staple", &hash).unwrap());
    }

    #[tokio::test]
    async fn login_opens_resolvable_session() {
        let db = memory_db().await;
        let mikasa = user(&db, "mikasa").await;

        let token = login(&db, " mikasa ", "correct horse", 30).await.unwrap();
        let profile = resolve_session(&db, &token, now_sec()).await.unwrap();
        assert_eq!(profile, Some(mikasa));

        logout(&db, &token).await.unwrap();
        assert_eq!(resolve_session(&db, &token, now_sec()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn login_error_messages() {
        let db = memory_db().await;
        user(&db, "armin").await;

        let blank = login(&db, "  ", "x", 30).await.unwrap_err();
        assert_eq!(blank.to_string(), "Please enter both username and password.");

        let wrong = login(&db, "armin", "nope", 30).await.unwrap_err();
        assert_eq!(wrong.to_string(), "Invalid username or password.");

        let unknown = login(&db, "levi", "correct horse", 30).await.unwrap_err();
        assert_eq!(unknown.to_string(), "Invalid username or password.");
    }

    #[tokio::test]
    async fn expired_sessions_resolve_to_nobody() {
        let db = memory_db().await;
        user(&db, "hange").await;
        let token = login(&db, "hange", "correct horse", 1).await.unwrap();

        let later = now_sec() + 2 * 86_400;
        assert_eq!(resolve_session(&db, &token, later).await.unwrap(), None);
        assert!(sessions::Entity::find_by_id(token).one(&db).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn register_rejects_duplicates_and_short_passwords() {
        let db = memory_db().await;
        user(&db, "reiner").await;

        let dup = register(&db, "reiner", "other@example.com", "long enough", 8).await;
        assert!(matches!(dup, Err(AuthError::Taken)));

        let short = register(&db, "bertholdt", "b@example.com", "short", 8).await;
        assert!(matches!(short, Err(AuthError::Invalid(_))));
    }
}
