use super::ApiClient;
use serde::{Deserialize, Serialize};
use veery_database::{
    common::{
        comment::CommentView,
        newtypes::{CommentId, PersonId, PostId},
        Paginated, SuccessResponse,
    },
    error::BackendResult,
};

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct CreateCommentParams {
    pub content: String,
    pub parent_id: Option<CommentId>,
    pub reply_to_person_id: Option<PersonId>,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct ListCommentsParams {
    pub page: i64,
    pub page_size: i64,
    /// Only "new" is currently meaningful; an extension point for future
    /// ordering modes.
    pub sort: Option<String>,
}

impl Default for ListCommentsParams {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 10,
            sort: None,
        }
    }
}

impl ApiClient {
    pub async fn create_comment(
        &self,
        post_id: PostId,
        params: &CreateCommentParams,
    ) -> BackendResult<CommentView> {
        self.post(&format!("/api/v1/post/{}/comment", post_id.0), Some(params))
            .await
    }

    pub async fn list_root_comments(
        &self,
        post_id: PostId,
        params: &ListCommentsParams,
    ) -> BackendResult<Paginated<CommentView>> {
        self.get(&format!("/api/v1/post/{}/comments", post_id.0), Some(params))
            .await
    }

    pub async fn list_replies(&self, root_id: CommentId) -> BackendResult<Vec<CommentView>> {
        self.get(&format!("/api/v1/comment/{}/replies", root_id.0), None::<()>)
            .await
    }

    pub async fn delete_comment(&self, id: CommentId) -> BackendResult<SuccessResponse> {
        self.delete(&format!("/api/v1/comment/{}", id.0)).await
    }
}
