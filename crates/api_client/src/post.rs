use super::ApiClient;
use serde::{Deserialize, Serialize};
use veery_database::{
    common::{
        newtypes::PostId,
        post::{PostListItem, PostView},
        Paginated, SuccessResponse,
    },
    error::BackendResult,
};

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct CreatePostParams {
    pub title: String,
    pub content: String,
}

#[derive(Deserialize, Serialize, Clone, Copy, Debug)]
pub struct ListPostsParams {
    pub page: i64,
    pub page_size: i64,
}

impl ApiClient {
    pub async fn create_post(&self, params: &CreatePostParams) -> BackendResult<PostView> {
        self.post("/api/v1/post", Some(params)).await
    }

    pub async fn list_posts(
        &self,
        params: ListPostsParams,
    ) -> BackendResult<Paginated<PostListItem>> {
        self.get("/api/v1/post/list", Some(params)).await
    }

    pub async fn get_post(&self, id: PostId) -> BackendResult<PostView> {
        self.get(&format!("/api/v1/post/{}", id.0), None::<()>).await
    }

    pub async fn delete_post(&self, id: PostId) -> BackendResult<SuccessResponse> {
        self.delete(&format!("/api/v1/post/{}", id.0)).await
    }
}
