use axum::{
    http::StatusCode,
    response::{Html, Json},
};
use serde_json::{json, Value};

pub const NOT_FOUND_TEXT: &str = "Error 404: Path or Route Not Found";

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Plain-text 404 for anything no route or static file matched.
pub async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, NOT_FOUND_TEXT)
}

pub async fn landing_page() -> Html<&'static str> {
    Html(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8"/>
  <title>Exercise Tracker</title>
  <link rel="stylesheet" href="/style.css">
</head>
<body>
  <div class="container">
    <h1>Exercise tracker</h1>
    <form action="/api/users" method="post">
      <h3>Create a New User</h3>
      <p><code>POST /api/users</code></p>
      <input id="uname" type="text" name="username" placeholder="username">
      <input type="submit" value="Submit">
    </form>
    <form id="exercise-form" method="post">
      <h3>Add exercises</h3>
      <p><code>POST /api/users/:_id/exercises</code></p>
      <input id="uid" type="text" name=":_id" placeholder=":_id">
      <input id="desc" type="text" name="description" placeholder="description*">
      <input id="dur" type="text" name="duration" placeholder="duration* (mins.)">
      <input id="date" type="text" name="date" placeholder="date (yyyy-mm-dd)">
      <input type="submit" value="Submit">
    </form>
    <p>
      <strong>GET user's exercise log: </strong>
      <code>GET /api/users/:_id/logs?[from][&amp;to][&amp;limit]</code>
    </p>
    <p><strong>[ ]</strong> = optional</p>
    <p><strong>from, to</strong> = dates (yyyy-mm-dd); <strong>limit</strong> = number</p>
  </div>
  <script>
    const exerciseForm = document.getElementById("exercise-form");
    exerciseForm.addEventListener("submit", () => {
      const userId = document.getElementById("uid").value;
      exerciseForm.action = `/api/users/${userId}/exercises`;
      exerciseForm.submit();
    });
  </script>
</body>
</html>"#,
    )
}
