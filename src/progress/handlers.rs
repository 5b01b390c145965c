use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, Path, State},
    http::header,
    response::{Html, IntoResponse},
    routing::get,
    Router,
};
use tracing::{instrument, warn};

use super::{repo, upload};
use crate::{
    auth::SessionUser,
    error::{AppError, AppResult},
    state::AppState,
    views,
};

pub fn progress_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/progress", get(list_photos).post(upload_photo))
        .route("/progress/:id/image", get(photo_image))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

#[instrument(skip(state))]
pub async fn list_photos(
    State(state): State<AppState>,
    session: SessionUser,
) -> AppResult<Html<String>> {
    let mut conn = state.db.acquire().await?;
    let photos = repo::list_by_user(&mut conn, session.user_id).await?;
    Ok(views::progress_page(&photos))
}

/// POST /progress (multipart), file field `image`.
#[instrument(skip(state, mp))]
pub async fn upload_photo(
    State(state): State<AppState>,
    session: SessionUser,
    mp: Result<Multipart, MultipartRejection>,
) -> AppResult<Html<String>> {
    let mut mp = mp?;
    let mut image = None;
    while let Some(field) = mp
        .next_field()
        .await
        .map_err(|e| AppError::upload(e.body_text()))?
    {
        if field.name() != Some("image") {
            continue;
        }
        let raw_name = field.file_name().unwrap_or_default().to_string();
        let body = field
            .bytes()
            .await
            .map_err(|e| AppError::upload(e.body_text()))?;
        image = Some((raw_name, body));
        break;
    }

    let Some((raw_name, body)) = image else {
        warn!(user_id = session.user_id, "upload without image field");
        return Err(AppError::upload("No image selected"));
    };
    upload::store_photo(&state, session.user_id, &raw_name, body).await?;

    let mut conn = state.db.acquire().await?;
    let photos = repo::list_by_user(&mut conn, session.user_id).await?;
    Ok(views::progress_page(&photos))
}

/// Owner-only access to the stored bytes.
#[instrument(skip(state))]
pub async fn photo_image(
    State(state): State<AppState>,
    session: SessionUser,
    Path(id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.db.acquire().await?;
    let photo = repo::find_for_user(&mut conn, id, session.user_id)
        .await?
        .ok_or(AppError::NotFound)?;
    drop(conn);

    let body = state
        .storage
        .get_object(&photo.image_path)
        .await
        .map_err(AppError::Storage)?;
    Ok((
        [
            (header::CONTENT_TYPE, upload::content_type_for(&photo.file_name)),
            (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
        ],
        body,
    ))
}
