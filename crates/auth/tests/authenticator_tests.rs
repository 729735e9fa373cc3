use std::collections::HashSet;

use accountdesk_auth::{AuthError, Authenticator};
use accountdesk_config::{AuthConfig, DatabaseConfig};
use accountdesk_database::{initialize_database, NewUser, UserRepository};
use chrono::{Duration, Utc};
use sqlx::{Row, SqlitePool};
use tempfile::TempDir;

type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

fn auth_config(ttl: u64) -> AuthConfig {
    AuthConfig {
        session_ttl_seconds: ttl,
        ..AuthConfig::default()
    }
}

struct TestContext {
    pool: SqlitePool,
    authenticator: Authenticator,
    _temp_dir: TempDir,
}

impl TestContext {
    async fn new(config: AuthConfig) -> TestResult<Self> {
        let temp_dir = TempDir::new()?;
        let db_path = temp_dir.path().join("auth.sqlite");
        let pool = initialize_database(&DatabaseConfig {
            url: format!("sqlite://{}", db_path.display()),
            max_connections: 5,
        })
        .await?;

        let authenticator = Authenticator::new(pool.clone(), &config);

        Ok(Self {
            pool,
            authenticator,
            _temp_dir: temp_dir,
        })
    }

    async fn new_default() -> TestResult<Self> {
        Self::new(auth_config(3_600)).await
    }

    async fn insert_user(&self, username: &str) -> TestResult<i64> {
        let user = UserRepository::new(self.pool.clone())
            .create(&NewUser {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                password_hash: "unused".to_string(),
            })
            .await?;
        Ok(user.id)
    }

    async fn session_count(&self, user_id: i64) -> TestResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM sessions WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("count")?)
    }

    async fn expire(&self, token: &str) -> TestResult {
        sqlx::query("UPDATE sessions SET expires_at = ? WHERE token = ?")
            .bind("2000-01-01T00:00:00.000000Z")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[tokio::test]
async fn issue_session_persists_token_with_ttl() -> TestResult {
    let ctx = TestContext::new_default().await?;
    let user_id = ctx.insert_user("alice").await?;

    let before = Utc::now();
    let session = ctx.authenticator.issue_session(user_id).await?;

    assert_eq!(session.user_id, user_id);
    assert_eq!(session.token.len(), 43);
    assert!(session.expires_at >= before + Duration::seconds(3_600));
    assert!(session.expires_at <= Utc::now() + Duration::seconds(3_600));
    assert_eq!(ctx.session_count(user_id).await?, 1);

    let resolved = ctx.authenticator.authenticate_token(&session.token).await?;
    assert_eq!(resolved.user_id, user_id);
    assert_eq!(resolved.token, session.token);

    Ok(())
}

#[tokio::test]
async fn every_session_gets_a_distinct_token() -> TestResult {
    let ctx = TestContext::new_default().await?;
    let user_id = ctx.insert_user("bob").await?;

    let mut tokens = HashSet::new();
    for _ in 0..8 {
        let session = ctx.authenticator.issue_session(user_id).await?;
        assert!(tokens.insert(session.token));
    }
    assert_eq!(ctx.session_count(user_id).await?, 8);

    Ok(())
}

#[tokio::test]
async fn unknown_and_empty_tokens_are_rejected() -> TestResult {
    let ctx = TestContext::new_default().await?;

    let err = ctx
        .authenticator
        .authenticate_token("not-a-real-token")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::SessionNotFound));

    let err = ctx.authenticator.authenticate_token("").await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidSession));

    Ok(())
}

#[tokio::test]
async fn expired_sessions_are_rejected_and_removed() -> TestResult {
    let ctx = TestContext::new_default().await?;
    let user_id = ctx.insert_user("carol").await?;
    let session = ctx.authenticator.issue_session(user_id).await?;

    ctx.expire(&session.token).await?;

    let err = ctx
        .authenticator
        .authenticate_token(&session.token)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::SessionExpired));
    assert_eq!(ctx.session_count(user_id).await?, 0);

    Ok(())
}

#[tokio::test]
async fn revoke_session_only_removes_that_token() -> TestResult {
    let ctx = TestContext::new_default().await?;
    let user_id = ctx.insert_user("dave").await?;
    let first = ctx.authenticator.issue_session(user_id).await?;
    let second = ctx.authenticator.issue_session(user_id).await?;

    assert!(ctx.authenticator.revoke_session(&first.token).await?);
    assert!(!ctx.authenticator.revoke_session(&first.token).await?);

    assert!(ctx.authenticator.authenticate_token(&first.token).await.is_err());
    assert!(ctx.authenticator.authenticate_token(&second.token).await.is_ok());

    Ok(())
}

#[tokio::test]
async fn revoke_user_sessions_leaves_other_users_alone() -> TestResult {
    let ctx = TestContext::new_default().await?;
    let erin = ctx.insert_user("erin").await?;
    let frank = ctx.insert_user("frank").await?;

    ctx.authenticator.issue_session(erin).await?;
    ctx.authenticator.issue_session(erin).await?;
    let kept = ctx.authenticator.issue_session(frank).await?;

    assert_eq!(ctx.authenticator.revoke_user_sessions(erin).await?, 2);
    assert_eq!(ctx.session_count(erin).await?, 0);
    assert!(ctx.authenticator.authenticate_token(&kept.token).await.is_ok());

    Ok(())
}

#[tokio::test]
async fn purge_expired_removes_only_stale_sessions() -> TestResult {
    let ctx = TestContext::new_default().await?;
    let user_id = ctx.insert_user("grace").await?;
    let stale = ctx.authenticator.issue_session(user_id).await?;
    let fresh = ctx.authenticator.issue_session(user_id).await?;

    ctx.expire(&stale.token).await?;

    assert_eq!(ctx.authenticator.purge_expired().await?, 1);
    assert_eq!(ctx.session_count(user_id).await?, 1);
    assert!(ctx.authenticator.authenticate_token(&fresh.token).await.is_ok());

    Ok(())
}

#[tokio::test]
async fn zero_ttl_sessions_expire_immediately() -> TestResult {
    let ctx = TestContext::new(auth_config(0)).await?;
    let user_id = ctx.insert_user("heidi").await?;
    let session = ctx.authenticator.issue_session(user_id).await?;

    let err = ctx
        .authenticator
        .authenticate_token(&session.token)
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::SessionExpired));

    Ok(())
}

#[tokio::test]
async fn deleting_a_user_cascades_to_sessions() -> TestResult {
    let ctx = TestContext::new_default().await?;
    let user_id = ctx.insert_user("ivan").await?;
    let session = ctx.authenticator.issue_session(user_id).await?;

    sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(user_id)
        .execute(&ctx.pool)
        .await?;

    assert!(matches!(
        ctx.authenticator.authenticate_token(&session.token).await,
        Err(AuthError::SessionNotFound)
    ));

    Ok(())
}

#[tokio::test]
async fn oversized_ttl_is_capped_and_sessions_stay_valid() -> TestResult {
    let ctx = TestContext::new(auth_config(u64::MAX)).await?;
    let user_id = ctx.insert_user("olivia").await?;

    let session = ctx.authenticator.issue_session(user_id).await?;
    let cap = Duration::seconds(AuthConfig::MAX_SESSION_TTL_SECONDS as i64);
    assert!(session.expires_at <= Utc::now() + cap);
    assert!(session.expires_at > Utc::now() + cap - Duration::minutes(1));

    let resolved = ctx.authenticator.authenticate_token(&session.token).await?;
    assert_eq!(resolved.user_id, user_id);
    Ok(())
}
