use axum::{
    extract::{rejection::FormRejection, State},
    response::Html,
    routing::get,
    Form, Router,
};
use time::OffsetDateTime;
use tracing::{info, instrument};

use super::{dto::WorkoutForm, repo};
use crate::{auth::SessionUser, error::AppResult, state::AppState, views};

pub fn workout_routes() -> Router<AppState> {
    Router::new().route("/workouts", get(list_workouts).post(create_workout))
}

#[instrument(skip(state))]
pub async fn list_workouts(
    State(state): State<AppState>,
    session: SessionUser,
) -> AppResult<Html<String>> {
    let mut conn = state.db.acquire().await?;
    let workouts = repo::list_by_user(&mut conn, session.user_id).await?;
    Ok(views::workouts_page(&workouts))
}

#[instrument(skip(state, form))]
pub async fn create_workout(
    State(state): State<AppState>,
    session: SessionUser,
    form: Result<Form<WorkoutForm>, FormRejection>,
) -> AppResult<Html<String>> {
    let Form(form) = form?;
    let workout = form.validate()?;

    let mut conn = state.db.acquire().await?;
    let row = repo::insert(&mut conn, session.user_id, &workout, OffsetDateTime::now_utc().date()).await?;
    info!(user_id = session.user_id, workout_id = row.id, exercise = %row.exercise, "workout logged");

    let workouts = repo::list_by_user(&mut conn, session.user_id).await?;
    Ok(views::workouts_page(&workouts))
}
