use axum::{
    extract::{rejection::FormRejection, State},
    response::Html,
    routing::get,
    Form, Router,
};
use time::OffsetDateTime;
use tracing::{info, instrument};

use super::{dto::MealForm, repo};
use crate::{auth::SessionUser, error::AppResult, state::AppState, views};

pub fn meal_routes() -> Router<AppState> {
    Router::new().route("/meals", get(list_meals).post(create_meal))
}

#[instrument(skip(state))]
pub async fn list_meals(
    State(state): State<AppState>,
    session: SessionUser,
) -> AppResult<Html<String>> {
    let mut conn = state.db.acquire().await?;
    let meals = repo::list_by_user(&mut conn, session.user_id).await?;
    Ok(views::meals_page(&meals))
}

/// Inserts the meal, then answers with the refreshed list.
#[instrument(skip(state, form))]
pub async fn create_meal(
    State(state): State<AppState>,
    session: SessionUser,
    form: Result<Form<MealForm>, FormRejection>,
) -> AppResult<Html<String>> {
    let Form(form) = form?;
    let meal = form.validate()?;

    let mut conn = state.db.acquire().await?;
    let today = OffsetDateTime::now_utc().date();
    let row = repo::insert(&mut conn, session.user_id, &meal, today).await?;
    info!(user_id = session.user_id, meal_id = row.id, calories = row.calories, "meal logged");

    let meals = repo::list_by_user(&mut conn, session.user_id).await?;
    Ok(views::meals_page(&meals))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use time::OffsetDateTime;

    use crate::{
        meals::repo,
        test_utils::{body_text, TestApp},
    };

    const RICE: &str = "food=Rice&calories=200&protein=4&carbs=45&fats=1";

    async fn user_id(app: &TestApp, email: &str) -> i64 {
        let (id,): (i64,) = sqlx::query_as("SELECT id FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(&app.state.db)
            .await
            .unwrap();
        id
    }

    #[tokio::test]
    async fn logging_a_meal_returns_the_updated_list() {
        let app = TestApp::new().await;
        let cookie = app.signup_and_login("ann@x.com").await;

        let res = app.post_form("/meals", RICE, Some(&cookie)).await;
        assert_eq!(res.status(), StatusCode::OK);
        let page = body_text(res).await;
        let today = OffsetDateTime::now_utc().date().to_string();
        assert!(page.contains("<td>Rice</td><td>200</td><td>4</td><td>45</td><td>1</td>"));
        assert!(page.contains(&today));

        let ann_id = user_id(&app, "ann@x.com").await;
        let mut conn = app.state.db.acquire().await.unwrap();
        let meals = repo::list_by_user(&mut conn, ann_id).await.unwrap();
        assert_eq!(meals.len(), 1);
        assert_eq!(meals[0].food, "Rice");
        assert_eq!(
            (meals[0].calories, meals[0].protein, meals[0].carbs, meals[0].fats),
            (200, 4, 45, 1)
        );
        assert_eq!(meals[0].date, OffsetDateTime::now_utc().date());
    }

    #[tokio::test]
    async fn meals_are_listed_in_insertion_order() {
        let app = TestApp::new().await;
        let cookie = app.signup_and_login("ann@x.com").await;
        app.post_form("/meals", "food=Oats&calories=150&protein=5&carbs=27&fats=3", Some(&cookie)).await;
        app.post_form("/meals", RICE, Some(&cookie)).await;

        let page = body_text(app.get("/meals", Some(&cookie)).await).await;
        let oats = page.find("Oats").unwrap();
        let rice = page.find("Rice").unwrap();
        assert!(oats < rice);
    }

    #[tokio::test]
    async fn invalid_meal_is_rejected_without_a_row() {
        let app = TestApp::new().await;
        let cookie = app.signup_and_login("ann@x.com").await;

        let res = app
            .post_form("/meals", "food=Rice&calories=lots&protein=4&carbs=45&fats=1", Some(&cookie))
            .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(res).await.contains("calories must be a whole number"));

        let res = app.post_form("/meals", "calories=1&protein=1&carbs=1&fats=1", Some(&cookie)).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let ann_id = user_id(&app, "ann@x.com").await;
        let mut conn = app.state.db.acquire().await.unwrap();
        let meals = repo::list_by_user(&mut conn, ann_id).await.unwrap();
        assert!(meals.is_empty());
    }

    #[tokio::test]
    async fn meals_are_private_to_their_owner() {
        let app = TestApp::new().await;
        let ann = app.signup_and_login("ann@x.com").await;
        let bob = app.signup_and_login("bob@x.com").await;

        app.post_form("/meals", RICE, Some(&ann)).await;

        let page = body_text(app.get("/meals", Some(&bob)).await).await;
        assert!(!page.contains("Rice"));
        let page = body_text(app.get("/meals", Some(&ann)).await).await;
        assert!(page.contains("Rice"));
    }
}
