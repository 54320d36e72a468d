use crate::api::user::validate;
use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use axum_macros::debug_middleware;
use http::header::COOKIE;
use std::{collections::HashSet, sync::Arc};
use veery_database::{common::AUTH_COOKIE, impls::VeeryContext};

/// Checks all headers and cookies (including duplicates) for first valid auth token.
/// We need to extract cookies manually because CookieJar ignores duplicates.
/// If user is authenticated sets the `LocalUserView` extension.
#[debug_middleware]
pub(super) async fn auth_middleware(
    State(context): State<Arc<VeeryContext>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let headers = request.headers();
    let cookies = headers
        .get(COOKIE)
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default()
        .split(';')
        .flat_map(|s| s.split_once('='))
        .filter(|s| s.0.trim() == AUTH_COOKIE)
        .map(|s| s.1);
    let headers = headers
        .get_all(AUTH_COOKIE)
        .into_iter()
        .filter_map(|h| h.to_str().ok());
    let auth: HashSet<_> = headers.chain(cookies).map(|s| s.to_string()).collect();

    for auth in auth {
        if let Ok(local_user) = validate(&auth, &context) {
            request.extensions_mut().insert(local_user);
        }
    }
    next.run(request).await
}
