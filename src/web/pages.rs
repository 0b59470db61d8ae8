use axum::{extract::State, response::Html};
use std::borrow::Cow;
use std::io::ErrorKind;
use tracing::{debug, warn};

use super::AppState;

const INDEX_TEMPLATE: &str = "index.html";

// Served when the templates directory has no index.html
const BUILTIN_INDEX: &str = include_str!("../../templates/index.html");

// --- GET / ---
// Upload form. Prefers the on-disk template so it can be edited without a rebuild.
pub async fn index(State(state): State<AppState>) -> Html<Cow<'static, str>> {
    let path = state.templates_dir.join(INDEX_TEMPLATE);

    match tokio::fs::read_to_string(&path).await {
        Ok(page) => Html(Cow::Owned(page)),
        Err(e) => {
            if e.kind() == ErrorKind::NotFound {
                debug!("{} not found, serving built-in page", path.display());
            } else {
                warn!("Failed to read {}: {}. Serving built-in page.", path.display(), e);
            }
            Html(Cow::Borrowed(BUILTIN_INDEX))
        }
    }
}
