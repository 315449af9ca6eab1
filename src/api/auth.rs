use super::{ApiClient, RequestOptions};
use crate::error::ApiError;
use crate::models::{
    Credentials, LoginResponse, RegisterResponse, RegistrationRequest, UserInfoResponse,
    UserProfile,
};

/// Login, signup and "who am I".
pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Exchanges credentials for a bearer token. Storing the token is up to
    /// the caller.
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        self.client
            .request("/auth/login", RequestOptions::post().json(credentials)?)
            .await
    }

    pub async fn register(
        &self,
        request: &RegistrationRequest,
    ) -> Result<RegisterResponse, ApiError> {
        self.client
            .request("/auth/register", RequestOptions::post().json(request)?)
            .await
    }

    /// Fetches the profile of whoever the session token belongs to.
    pub async fn get_current_user(&self) -> Result<UserProfile, ApiError> {
        let info: UserInfoResponse = self.client.request("/me", RequestOptions::get()).await?;
        Ok(info.data)
    }
}
