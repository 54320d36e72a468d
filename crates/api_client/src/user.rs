use super::ApiClient;
use serde::{Deserialize, Serialize};
use veery_database::{
    common::{user::LocalUserView, SuccessResponse},
    error::BackendResult,
};

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct RegisterParams {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct LoginParams {
    pub username: String,
    pub password: String,
}

impl ApiClient {
    pub async fn register(&self, params: RegisterParams) -> BackendResult<LocalUserView> {
        self.post("/api/v1/account/register", Some(&params)).await
    }

    pub async fn login(&self, params: LoginParams) -> BackendResult<LocalUserView> {
        self.post("/api/v1/account/login", Some(&params)).await
    }

    pub async fn logout(&self) -> BackendResult<SuccessResponse> {
        self.post("/api/v1/account/logout", None::<()>).await
    }

    pub async fn my_profile(&self) -> BackendResult<LocalUserView> {
        self.get("/api/v1/account/me", None::<()>).await
    }
}
