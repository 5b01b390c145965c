use serde::Serialize;
use sqlx::{FromRow, SqliteConnection};
use time::Date;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Workout {
    pub id: i64,
    pub user_id: i64,
    pub exercise: String,
    pub sets: i64,
    pub reps: i64,
    pub weight: i64,
    pub date: Date,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWorkout {
    pub exercise: String,
    pub sets: i64,
    pub reps: i64,
    pub weight: i64,
}

pub async fn insert(
    conn: &mut SqliteConnection,
    user_id: i64,
    workout: &NewWorkout,
    date: Date,
) -> sqlx::Result<Workout> {
    sqlx::query_as::<_, Workout>(
        r#"
        INSERT INTO workouts (user_id, exercise, sets, reps, weight, date)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING id, user_id, exercise, sets, reps, weight, date
        "#,
    )
    .bind(user_id)
    .bind(&workout.exercise)
    .bind(workout.sets)
    .bind(workout.reps)
    .bind(workout.weight)
    .bind(date)
    .fetch_one(conn)
    .await
}

pub async fn list_by_user(conn: &mut SqliteConnection, user_id: i64) -> sqlx::Result<Vec<Workout>> {
    sqlx::query_as::<_, Workout>(
        r#"
        SELECT id, user_id, exercise, sets, reps, weight, date
          FROM workouts
         WHERE user_id = ?
         ORDER BY id ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(conn)
    .await
}
