use super::{check_is_admin, UserExt};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use axum_macros::debug_handler;
use chrono::Utc;
use std::sync::Arc;
use veery_api_client::comment::{CreateCommentParams, ListCommentsParams};
use veery_database::{
    common::{
        comment::{Comment, CommentView},
        newtypes::{CommentId, PostId},
        post::Post,
        user::Person,
        validate_not_empty, validate_pagination, Paginated, SuccessResponse,
    },
    error::{BackendError, BackendResult},
    impls::{comment::DbCommentInsertForm, VeeryContext},
};

#[debug_handler]
pub(crate) async fn create_comment(
    Path(post_id): Path<PostId>,
    user: UserExt,
    State(context): State<Arc<VeeryContext>>,
    Json(params): Json<CreateCommentParams>,
) -> BackendResult<Json<CommentView>> {
    validate_not_empty(&params.content)?;
    // Post existence is the collaborator's check; parent checks and root
    // resolution run inside the creation transaction.
    Post::read_live(post_id, &context)?;
    let form = DbCommentInsertForm {
        creator_id: user.person.id,
        post_id,
        parent_id: params.parent_id,
        root_id: None,
        reply_to_person_id: params.reply_to_person_id,
        content: params.content,
        deleted: false,
        published: Utc::now(),
    };
    let comment = Comment::create(form, &context)?;
    let creator = Person::read(comment.creator_id, &context)?;
    Ok(Json(CommentView {
        comment,
        creator: Some(creator),
        reply_count: 0,
    }))
}

#[debug_handler]
pub(crate) async fn list_root_comments(
    Path(post_id): Path<PostId>,
    Query(params): Query<ListCommentsParams>,
    State(context): State<Arc<VeeryContext>>,
) -> BackendResult<Json<Paginated<CommentView>>> {
    validate_pagination(params.page, params.page_size)?;
    validate_sort(params.sort.as_deref())?;
    Post::read_live(post_id, &context)?;
    Ok(Json(Comment::list_roots(
        post_id,
        params.page,
        params.page_size,
        &context,
    )?))
}

#[debug_handler]
pub(crate) async fn list_replies(
    Path(root_id): Path<CommentId>,
    State(context): State<Arc<VeeryContext>>,
) -> BackendResult<Json<Vec<CommentView>>> {
    Ok(Json(Comment::list_replies(root_id, &context)?))
}

/// Deletion is allowed for the comment's author, the post's author and
/// admins. The repository rejects repeat deletion as not found.
#[debug_handler]
pub(crate) async fn delete_comment(
    Path(id): Path<CommentId>,
    user: UserExt,
    State(context): State<Arc<VeeryContext>>,
) -> BackendResult<Json<SuccessResponse>> {
    let comment = Comment::read(id, &context)?;
    if comment.deleted {
        return Err(BackendError::not_found("Comment not found"));
    }
    let is_author = comment.creator_id == user.person.id;
    let is_post_author = Post::read_live(comment.post_id, &context)
        .map(|post| post.creator_id == user.person.id)
        .unwrap_or(false);
    if !is_author && !is_post_author && check_is_admin(&user).is_err() {
        return Err(BackendError::invalid_argument(
            "Not authorized to delete this comment",
        ));
    }
    Comment::soft_delete(id, &context)?;
    Ok(Json(SuccessResponse::default()))
}

/// Newest first is the only ordering currently; the parameter is an
/// extension point.
fn validate_sort(sort: Option<&str>) -> BackendResult<()> {
    match sort {
        None | Some("new") => Ok(()),
        Some(_) => Err(BackendError::invalid_argument("Unknown sort mode")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_sort() {
        assert!(validate_sort(None).is_ok());
        assert!(validate_sort(Some("new")).is_ok());
        assert!(validate_sort(Some("hot")).is_err());
    }
}
