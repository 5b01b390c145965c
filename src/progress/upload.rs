use anyhow::Context;
use bytes::Bytes;
use lazy_static::lazy_static;
use regex::Regex;
use time::OffsetDateTime;
use tracing::{error, info};
use uuid::Uuid;

use super::repo::{self, ProgressPhoto};
use crate::{
    error::{AppError, AppResult},
    state::AppState,
};

const WINDOWS_DEVICE_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Reduces a client-supplied filename to `[A-Za-z0-9_.-]`.
///
/// Path separators and whitespace become `_`, everything else outside the
/// allowed set is dropped, and leading/trailing `.`/`_` are stripped, so the
/// result can never be `..` or contain a directory. Returns `None` when
/// nothing usable is left.
pub fn sanitize_filename(raw: &str) -> Option<String> {
    lazy_static! {
        static ref UNSAFE_RE: Regex = Regex::new(r"[^A-Za-z0-9_.-]").unwrap();
    }
    let spaced = raw.replace(['/', '\\'], " ");
    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");
    let cleaned = UNSAFE_RE.replace_all(&joined, "");
    let trimmed = cleaned.trim_matches(|c| c == '.' || c == '_');
    if trimmed.is_empty() {
        return None;
    }

    let stem = trimmed.split('.').next().unwrap_or_default().to_ascii_uppercase();
    if WINDOWS_DEVICE_NAMES.contains(&stem.as_str()) {
        return Some(format!("_{trimmed}"));
    }
    Some(trimmed.to_string())
}

/// Per-user directory plus a fresh UUID, so equal names never overwrite each other.
pub fn storage_key(user_id: i64, file_name: &str) -> String {
    format!("{}/{}-{}", user_id, Uuid::new_v4().simple(), file_name)
}

pub fn content_type_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        _ => "application/octet-stream",
    }
}

/// Writes the bytes, then records the row. A failed insert removes the file
/// again, so a row never names a missing file and no orphan is left behind.
pub async fn store_photo(
    st: &AppState,
    user_id: i64,
    raw_name: &str,
    body: Bytes,
) -> AppResult<ProgressPhoto> {
    if raw_name.trim().is_empty() {
        return Err(AppError::upload("No file selected"));
    }
    let file_name =
        sanitize_filename(raw_name).ok_or_else(|| AppError::upload("Unsupported file name"))?;
    if body.is_empty() {
        return Err(AppError::upload("Uploaded file is empty"));
    }

    let key = storage_key(user_id, &file_name);
    st.storage
        .put_object(&key, body)
        .await
        .with_context(|| format!("store photo {key}"))
        .map_err(AppError::Storage)?;

    let mut conn = match st.db.acquire().await {
        Ok(c) => c,
        Err(e) => {
            discard(st, &key).await;
            return Err(e.into());
        }
    };
    let today = OffsetDateTime::now_utc().date();
    match repo::insert(&mut conn, user_id, &key, &file_name, today).await {
        Ok(photo) => {
            info!(user_id, photo_id = photo.id, key = %key, "progress photo stored");
            Ok(photo)
        }
        Err(e) => {
            discard(st, &key).await;
            Err(e.into())
        }
    }
}

async fn discard(st: &AppState, key: &str) {
    if let Err(e) = st.storage.delete_object(key).await {
        error!(error = %e, key, "failed to remove photo after insert failure");
    }
}
