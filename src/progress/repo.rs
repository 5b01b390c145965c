use serde::Serialize;
use sqlx::{FromRow, SqliteConnection};
use time::Date;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProgressPhoto {
    pub id: i64,
    pub user_id: i64,
    pub image_path: String, // storage key, relative to the upload dir
    pub file_name: String,  // sanitized original name
    pub date: Date,
}

pub async fn insert(
    conn: &mut SqliteConnection,
    user_id: i64,
    image_path: &str,
    file_name: &str,
    date: Date,
) -> sqlx::Result<ProgressPhoto> {
    sqlx::query_as::<_, ProgressPhoto>(
        r#"
        INSERT INTO progress (user_id, image_path, file_name, date)
        VALUES (?, ?, ?, ?)
        RETURNING id, user_id, image_path, file_name, date
        "#,
    )
    .bind(user_id)
    .bind(image_path)
    .bind(file_name)
    .bind(date)
    .fetch_one(conn)
    .await
}

pub async fn list_by_user(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> sqlx::Result<Vec<ProgressPhoto>> {
    sqlx::query_as::<_, ProgressPhoto>(
        r#"
        SELECT id, user_id, image_path, file_name, date
          FROM progress
         WHERE user_id = ?
         ORDER BY id ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(conn)
    .await
}

/// `None` both when the photo is missing and when it belongs to someone else.
pub async fn find_for_user(
    conn: &mut SqliteConnection,
    photo_id: i64,
    user_id: i64,
) -> sqlx::Result<Option<ProgressPhoto>> {
    sqlx::query_as::<_, ProgressPhoto>(
        r#"
        SELECT id, user_id, image_path, file_name, date
          FROM progress
         WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(photo_id)
    .bind(user_id)
    .fetch_optional(conn)
    .await
}
