use super::{ApiClient, RequestOptions};
use crate::error::ApiError;
use crate::models::{MessageResponse, UpdatePasswordRequest, UpdateUserRequest};

pub const USER_UPDATED: &str = "User information updated successfully";
pub const PASSWORD_UPDATED: &str = "Password updated successfully";

/// Profile maintenance for the logged-in user.
pub struct UserApi<'a> {
    client: &'a ApiClient,
}

impl<'a> UserApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// A 2xx alone doesn't mean the update took; the message should equal
    /// [`USER_UPDATED`].
    pub async fn update_user(
        &self,
        request: &UpdateUserRequest,
    ) -> Result<MessageResponse, ApiError> {
        self.client
            .request("/updateUser", RequestOptions::put().json(request)?)
            .await
    }

    pub async fn update_password(
        &self,
        request: &UpdatePasswordRequest,
    ) -> Result<MessageResponse, ApiError> {
        self.client
            .request("/updatePassword", RequestOptions::put().json(request)?)
            .await
    }
}
