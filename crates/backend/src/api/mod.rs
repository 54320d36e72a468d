use crate::api::{
    comment::{create_comment, delete_comment, list_replies, list_root_comments},
    post::{create_post, delete_post, get_post, list_posts},
    site::site_stats,
    user::{login_user, logout_user, my_profile, register_user},
};
use axum::{
    extract::rejection::ExtensionRejection,
    response::IntoResponse,
    routing::{delete, get, post},
    Extension, Router,
};
use axum_macros::FromRequestParts;
use http::StatusCode;
use std::{ops::Deref, sync::Arc};
use veery_database::{
    common::user::LocalUserView,
    error::{BackendError, BackendResult},
    impls::VeeryContext,
};

mod comment;
mod post;
mod site;
pub(super) mod user;

pub fn api_routes() -> Router<Arc<VeeryContext>> {
    Router::new()
        .route("/account/register", post(register_user))
        .route("/account/login", post(login_user))
        .route("/account/logout", post(logout_user))
        .route("/account/me", get(my_profile))
        .route("/post", post(create_post))
        .route("/post/list", get(list_posts))
        .route("/post/{id}", get(get_post).delete(delete_post))
        .route("/post/{id}/comment", post(create_comment))
        .route("/post/{id}/comments", get(list_root_comments))
        .route("/comment/{id}/replies", get(list_replies))
        .route("/comment/{id}", delete(delete_comment))
        .route("/site/stats", get(site_stats))
}

pub fn check_is_admin(user: &LocalUserView) -> BackendResult<()> {
    if !user.local_user.admin {
        return Err(BackendError::invalid_argument(
            "Only admin can perform this action",
        ));
    }
    Ok(())
}

#[derive(FromRequestParts)]
#[from_request(rejection(NotLoggedInError))]
pub struct UserExt {
    #[from_request(via(Extension))]
    local_user_view: LocalUserView,
}

impl UserExt {
    pub fn inner(self) -> LocalUserView {
        self.local_user_view
    }
}
impl Deref for UserExt {
    type Target = LocalUserView;

    fn deref(&self) -> &Self::Target {
        &self.local_user_view
    }
}
impl From<ExtensionRejection> for NotLoggedInError {
    fn from(_: ExtensionRejection) -> Self {
        NotLoggedInError
    }
}
pub struct NotLoggedInError;

impl IntoResponse for NotLoggedInError {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::UNAUTHORIZED, "Login required").into_response()
    }
}
