//! The upload page

use axum::response::Html;

use crate::server::render;

/// GET / - Title, instructions and the upload form
pub async fn index() -> Html<String> {
    Html(render::page(None))
}
