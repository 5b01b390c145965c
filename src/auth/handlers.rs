use axum::{
    extract::{rejection::FormRejection, FromRef, State},
    response::{Html, IntoResponse, Redirect},
    routing::get,
    Form, Router,
};
use axum_extra::extract::cookie::CookieJar;
use time::OffsetDateTime;
use tracing::{debug, info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginForm, SignupForm},
        password::{hash_password, verify_password},
        repo::{self, NewUser, User},
        session::{SessionKeys, SessionUser},
    },
    error::{AppError, AppResult},
    state::AppState,
    views,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/signup", get(signup_page).post(signup))
        .route("/login", get(login_page).post(login))
        .route("/logout", get(logout))
}

pub async fn home(session: Option<SessionUser>) -> Redirect {
    match session {
        Some(_) => Redirect::to("/dashboard"),
        None => Redirect::to("/login"),
    }
}

pub async fn signup_page() -> Html<String> {
    views::signup_page(None)
}

pub async fn login_page() -> Html<String> {
    views::login_page(None)
}

#[instrument(skip(state, form))]
pub async fn signup(
    State(state): State<AppState>,
    form: Result<Form<SignupForm>, FormRejection>,
) -> AppResult<Redirect> {
    let Form(form) = form?;
    let signup = form.validate()?;

    let mut conn = state.db.acquire().await?;
    if User::find_by_email(&mut conn, &signup.email).await?.is_some() {
        warn!(email = %signup.email, "email already registered");
        return Err(AppError::Conflict("Email already in use".into()));
    }

    let new = NewUser {
        password_hash: hash_password(&signup.password)?,
        name: signup.name,
        email: signup.email,
        weight: signup.weight,
        goal: signup.goal,
    };

    let user = match User::create(&mut conn, &new).await {
        Ok(u) => u,
        Err(e) if repo::is_unique_violation(&e) => {
            warn!(email = %new.email, "email registered concurrently");
            return Err(AppError::Conflict("Email already in use".into()));
        }
        Err(e) => return Err(e.into()),
    };

    info!(user_id = user.id, email = %user.email, "user registered");
    Ok(Redirect::to("/login"))
}

#[instrument(skip(state, jar, form))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    form: Result<Form<LoginForm>, FormRejection>,
) -> AppResult<impl IntoResponse> {
    let Form(form) = form?;
    let login = form.validate()?;

    let mut conn = state.db.acquire().await?;
    let Some(user) = User::find_by_email(&mut conn, &login.email).await? else {
        warn!(email = %login.email, "login unknown email");
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password(&login.password, &user.password_hash)? {
        warn!(email = %login.email, user_id = user.id, "login invalid password");
        return Err(AppError::InvalidCredentials);
    }

    let keys = SessionKeys::from_ref(&state);
    let cutoff = OffsetDateTime::now_utc() - keys.ttl;
    let pruned = repo::prune_sessions(&mut conn, user.id, cutoff).await?;
    if pruned > 0 {
        debug!(user_id = user.id, pruned, "expired sessions removed");
    }

    let session_id = repo::create_session(&mut conn, user.id).await?;
    let token = keys.sign(user.id, session_id)?;

    info!(user_id = user.id, %session_id, "user logged in");
    Ok((jar.add(keys.cookie(token)), Redirect::to("/dashboard")))
}

#[instrument(skip(state, jar))]
pub async fn logout(
    State(state): State<AppState>,
    session: SessionUser,
    jar: CookieJar,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.db.acquire().await?;
    repo::delete_session(&mut conn, session.session_id).await?;

    let keys = SessionKeys::from_ref(&state);
    info!(user_id = session.user_id, session_id = %session.session_id, "user logged out");
    Ok((jar.remove(keys.removal_cookie()), Redirect::to("/login")))
}
