use axum::response::Html;

/// Serves the pre-built front-end asset at the root path. No authorization;
/// the page itself asks for the token before calling the API.
pub async fn index() -> Html<&'static str> {
    Html(include_str!("../../static/index.html"))
}
