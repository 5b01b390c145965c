mod app;
mod auth;
mod config;
mod dashboard;
mod db;
mod error;
mod forms;
mod meals;
mod progress;
mod state;
mod storage;
mod views;
mod workouts;

#[cfg(test)]
mod test_utils;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "fittrack=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let app_state = state::AppState::init().await?;

    // Schema must be in place before the first request
    db::migrate(&app_state.db).await?;
    tracing::info!(
        upload_dir = %app_state.config.upload_dir.display(),
        "migrations applied"
    );

    app::serve(app::build_app(app_state)).await
}
