use serde::Serialize;
use sqlx::{FromRow, SqliteConnection};
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // Argon2 PHC string
    pub weight: i64,
    pub goal: String,
}

#[derive(Debug)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub weight: i64,
    pub goal: String,
}

impl User {
    pub async fn find_by_email(conn: &mut SqliteConnection, email: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, weight, goal
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(conn)
        .await
    }

    pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, weight, goal
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await
    }

    /// Fails with a unique violation if the email is already registered.
    pub async fn create(conn: &mut SqliteConnection, new: &NewUser) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash, weight, goal)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, name, email, password_hash, weight, goal
            "#,
        )
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(new.weight)
        .bind(&new.goal)
        .fetch_one(conn)
        .await
    }
}

pub async fn create_session(conn: &mut SqliteConnection, user_id: i64) -> sqlx::Result<Uuid> {
    let id = Uuid::new_v4();
    sqlx::query("INSERT INTO sessions (id, user_id, created_at) VALUES (?, ?, ?)")
        .bind(id)
        .bind(user_id)
        .bind(OffsetDateTime::now_utc())
        .execute(conn)
        .await?;
    Ok(id)
}

/// Drops the user's sessions created before `cutoff`; their tokens have already expired.
pub async fn prune_sessions(
    conn: &mut SqliteConnection,
    user_id: i64,
    cutoff: OffsetDateTime,
) -> sqlx::Result<u64> {
    let res = sqlx::query("DELETE FROM sessions WHERE user_id = ? AND created_at < ?")
        .bind(user_id)
        .bind(cutoff)
        .execute(conn)
        .await?;
    Ok(res.rows_affected())
}

/// True when the session row exists, belongs to `user_id`, and the user still exists.
pub async fn session_is_live(
    conn: &mut SqliteConnection,
    session_id: Uuid,
    user_id: i64,
) -> sqlx::Result<bool> {
    let row: Option<(i64,)> = sqlx::query_as(
        r#"
        SELECT s.user_id
          FROM sessions s
          JOIN users u ON u.id = s.user_id
         WHERE s.id = ? AND s.user_id = ?
        "#,
    )
    .bind(session_id)
    .bind(user_id)
    .fetch_optional(conn)
    .await?;
    Ok(row.is_some())
}

pub async fn delete_session(conn: &mut SqliteConnection, session_id: Uuid) -> sqlx::Result<()> {
    sqlx::query("DELETE FROM sessions WHERE id = ?")
        .bind(session_id)
        .execute(conn)
        .await?;
    Ok(())
}

pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}
