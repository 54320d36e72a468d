use super::{check_is_admin, UserExt};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use axum_macros::debug_handler;
use chrono::Utc;
use std::sync::Arc;
use veery_api_client::post::{CreatePostParams, ListPostsParams};
use veery_database::{
    common::{
        newtypes::PostId,
        post::{Post, PostListItem, PostView},
        validate_not_empty, validate_pagination, validate_title, Paginated, SuccessResponse,
    },
    error::{BackendError, BackendResult},
    impls::{post::DbPostForm, VeeryContext},
};

#[debug_handler]
pub(crate) async fn create_post(
    user: UserExt,
    State(context): State<Arc<VeeryContext>>,
    Json(params): Json<CreatePostParams>,
) -> BackendResult<Json<PostView>> {
    validate_title(&params.title)?;
    validate_not_empty(&params.content)?;
    let form = DbPostForm {
        creator_id: user.person.id,
        title: params.title,
        content: params.content,
        published: Utc::now(),
    };
    Ok(Json(Post::create(form, &context)?))
}

#[debug_handler]
pub(crate) async fn list_posts(
    Query(params): Query<ListPostsParams>,
    State(context): State<Arc<VeeryContext>>,
) -> BackendResult<Json<Paginated<PostListItem>>> {
    validate_pagination(params.page, params.page_size)?;
    let page = Post::list(params.page, params.page_size, &context)?;
    Ok(Json(Paginated {
        items: page.items.into_iter().map(PostListItem::from).collect(),
        total: page.total,
    }))
}

#[debug_handler]
pub(crate) async fn get_post(
    Path(id): Path<PostId>,
    State(context): State<Arc<VeeryContext>>,
) -> BackendResult<Json<PostView>> {
    Ok(Json(Post::read_view(id, &context)?))
}

#[debug_handler]
pub(crate) async fn delete_post(
    Path(id): Path<PostId>,
    user: UserExt,
    State(context): State<Arc<VeeryContext>>,
) -> BackendResult<Json<SuccessResponse>> {
    let post = Post::read_live(id, &context)?;
    if post.creator_id != user.person.id && check_is_admin(&user).is_err() {
        return Err(BackendError::invalid_argument(
            "Not authorized to delete this post",
        ));
    }
    Post::soft_delete(id, &context)?;
    Ok(Json(SuccessResponse::default()))
}
