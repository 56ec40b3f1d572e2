//! `GET /`: browser upload page

use axum::response::Html;

use crate::pages::upload_page;

pub async fn handle_upload_page() -> Html<String> {
    Html(upload_page())
}
