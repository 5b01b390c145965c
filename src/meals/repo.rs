use serde::Serialize;
use sqlx::{FromRow, SqliteConnection};
use time::Date;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Meal {
    pub id: i64,
    pub user_id: i64,
    pub food: String,
    pub calories: i64,
    pub protein: i64,
    pub carbs: i64,
    pub fats: i64,
    pub date: Date,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMeal {
    pub food: String,
    pub calories: i64,
    pub protein: i64,
    pub carbs: i64,
    pub fats: i64,
}

/// Sums over every meal the user has logged; zero when there are none.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, FromRow)]
pub struct MealTotals {
    pub calories: i64,
    pub protein: i64,
    pub carbs: i64,
    pub fats: i64,
    pub meal_count: i64,
}

pub async fn insert(
    conn: &mut SqliteConnection,
    user_id: i64,
    meal: &NewMeal,
    date: Date,
) -> sqlx::Result<Meal> {
    sqlx::query_as::<_, Meal>(
        r#"
        INSERT INTO meals (user_id, food, calories, protein, carbs, fats, date)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING id, user_id, food, calories, protein, carbs, fats, date
        "#,
    )
    .bind(user_id)
    .bind(&meal.food)
    .bind(meal.calories)
    .bind(meal.protein)
    .bind(meal.carbs)
    .bind(meal.fats)
    .bind(date)
    .fetch_one(conn)
    .await
}

/// All of the user's meals in insertion order.
pub async fn list_by_user(conn: &mut SqliteConnection, user_id: i64) -> sqlx::Result<Vec<Meal>> {
    sqlx::query_as::<_, Meal>(
        r#"
        SELECT id, user_id, food, calories, protein, carbs, fats, date
          FROM meals
         WHERE user_id = ?
         ORDER BY id ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(conn)
    .await
}

pub async fn totals_for_user(conn: &mut SqliteConnection, user_id: i64) -> sqlx::Result<MealTotals> {
    sqlx::query_as::<_, MealTotals>(
        r#"
        SELECT COALESCE(SUM(calories), 0) AS calories,
               COALESCE(SUM(protein), 0)  AS protein,
               COALESCE(SUM(carbs), 0)    AS carbs,
               COALESCE(SUM(fats), 0)     AS fats,
               COUNT(*)                   AS meal_count
          FROM meals
         WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_one(conn)
    .await
}
