use axum::{extract::State, response::Html, routing::get, Router};
use tracing::{instrument, warn};

use crate::{
    auth::{repo::User, SessionUser},
    error::{AppError, AppResult},
    meals::repo::totals_for_user,
    state::AppState,
    views,
};

pub fn dashboard_routes() -> Router<AppState> {
    Router::new().route("/dashboard", get(dashboard))
}

/// All-time macro totals; they always agree with what `/meals` lists.
#[instrument(skip(state))]
pub async fn dashboard(
    State(state): State<AppState>,
    session: SessionUser,
) -> AppResult<Html<String>> {
    let mut conn = state.db.acquire().await?;
    let Some(user) = User::find_by_id(&mut conn, session.user_id).await? else {
        warn!(user_id = session.user_id, "session names a missing user");
        return Err(AppError::Unauthenticated);
    };
    let totals = totals_for_user(&mut conn, session.user_id).await?;
    Ok(views::dashboard_page(&user, &totals))
}
