//! Markup for each page. Handlers hand over plain rows; nothing in here
//! touches the database or the session.

use std::fmt::Write;

use axum::{http::StatusCode, response::Html};

use crate::{
    auth::repo::User,
    meals::repo::{Meal, MealTotals},
    progress::repo::ProgressPhoto,
    workouts::repo::Workout,
};

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, signed_in: bool, body: &str) -> Html<String> {
    let nav = if signed_in {
        r#"<nav><a href="/dashboard">Dashboard</a> <a href="/meals">Meals</a> <a href="/workouts">Workouts</a> <a href="/progress">Progress</a> <a href="/logout">Log out</a></nav>"#
    } else {
        r#"<nav><a href="/login">Log in</a> <a href="/signup">Sign up</a></nav>"#
    };
    Html(format!(
        "<!doctype html><html><head><meta charset=\"utf-8\"><title>{} - FitTrack</title></head><body>{nav}<main>{body}</main></body></html>",
        escape(title)
    ))
}

fn error_banner(error: Option<&str>) -> String {
    error
        .map(|e| format!(r#"<p class="error">{}</p>"#, escape(e)))
        .unwrap_or_default()
}

pub fn login_page(error: Option<&str>) -> Html<String> {
    let body = format!(
        r#"<h1>Log in</h1>{}<form method="post" action="/login">
<input name="email" type="email" placeholder="Email" required>
<input name="password" type="password" placeholder="Password" required>
<button type="submit">Log in</button></form>"#,
        error_banner(error)
    );
    layout("Log in", false, &body)
}

pub fn signup_page(error: Option<&str>) -> Html<String> {
    let body = format!(
        r#"<h1>Sign up</h1>{}<form method="post" action="/signup">
<input name="name" placeholder="Name" required>
<input name="email" type="email" placeholder="Email" required>
<input name="password" type="password" placeholder="Password" required>
<input name="weight" type="number" min="0" placeholder="Starting weight" required>
<input name="goal" placeholder="Goal" required>
<button type="submit">Create account</button></form>"#,
        error_banner(error)
    );
    layout("Sign up", false, &body)
}

pub fn dashboard_page(user: &User, totals: &MealTotals) -> Html<String> {
    let body = format!(
        r#"<h1>Hi {}</h1><p>Goal: {}</p>
<dl><dt>Calories</dt><dd id="calories">{}</dd><dt>Protein</dt><dd id="protein">{}</dd>
<dt>Carbs</dt><dd id="carbs">{}</dd><dt>Fats</dt><dd id="fats">{}</dd>
<dt>Meals logged</dt><dd id="meal-count">{}</dd></dl>"#,
        escape(&user.name),
        escape(&user.goal),
        totals.calories,
        totals.protein,
        totals.carbs,
        totals.fats,
        totals.meal_count,
    );
    layout("Dashboard", true, &body)
}

pub fn meals_page(meals: &[Meal]) -> Html<String> {
    let mut rows = String::new();
    for m in meals {
        let _ = write!(
            rows,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&m.food),
            m.calories,
            m.protein,
            m.carbs,
            m.fats,
            m.date
        );
    }
    let body = format!(
        r#"<h1>Meals</h1><form method="post" action="/meals">
<input name="food" placeholder="Food" required>
<input name="calories" type="number" min="0" placeholder="Calories" required>
<input name="protein" type="number" min="0" placeholder="Protein" required>
<input name="carbs" type="number" min="0" placeholder="Carbs" required>
<input name="fats" type="number" min="0" placeholder="Fats" required>
<button type="submit">Log meal</button></form>
<table><tr><th>Food</th><th>Calories</th><th>Protein</th><th>Carbs</th><th>Fats</th><th>Date</th></tr>{rows}</table>"#
    );
    layout("Meals", true, &body)
}

pub fn workouts_page(workouts: &[Workout]) -> Html<String> {
    let mut rows = String::new();
    for w in workouts {
        let _ = write!(
            rows,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&w.exercise),
            w.sets,
            w.reps,
            w.weight,
            w.date
        );
    }
    let body = format!(
        r#"<h1>Workouts</h1><form method="post" action="/workouts">
<input name="exercise" placeholder="Exercise" required>
<input name="sets" type="number" min="0" placeholder="Sets" required>
<input name="reps" type="number" min="0" placeholder="Reps" required>
<input name="weight" type="number" min="0" placeholder="Weight" required>
<button type="submit">Log workout</button></form>
<table><tr><th>Exercise</th><th>Sets</th><th>Reps</th><th>Weight</th><th>Date</th></tr>{rows}</table>"#
    );
    layout("Workouts", true, &body)
}

pub fn progress_page(photos: &[ProgressPhoto]) -> Html<String> {
    let mut items = String::new();
    for p in photos {
        let _ = write!(
            items,
            r#"<figure><img src="/progress/{}/image" alt="{}"><figcaption>{}</figcaption></figure>"#,
            p.id,
            escape(&p.file_name),
            p.date
        );
    }
    let body = format!(
        r#"<h1>Progress</h1><form method="post" action="/progress" enctype="multipart/form-data">
<input name="image" type="file" accept="image/*" required>
<button type="submit">Upload</button></form>
<section class="gallery">{items}</section>"#
    );
    layout("Progress", true, &body)
}

pub fn error_page(status: StatusCode, message: &str) -> Html<String> {
    let title = status.canonical_reason().unwrap_or("Error");
    let body = format!(
        r#"<h1>{}</h1><p class="error">{}</p><p><a href="javascript:history.back()">Go back</a></p>"#,
        escape(title),
        escape(message)
    );
    layout(title, false, &body)
}
