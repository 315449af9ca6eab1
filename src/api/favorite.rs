use super::{ApiClient, RequestOptions};
use crate::error::ApiError;
use crate::models::{Favorite, ListResponse};

const TOP3_FAVORITES_PATH: &str = "/favourite-top3";

/// The logged-in user's favorites. These endpoints need the bearer token;
/// without one the backend answers 401, surfaced as `ApiError::Request`.
pub struct FavoriteApi<'a> {
    client: &'a ApiClient,
}

impl<'a> FavoriteApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// The current user's three favorite dishes, as stored by the backend.
    /// Safe to call repeatedly; it never changes server state.
    pub async fn get_top3_favorites(&self) -> Result<ListResponse<Favorite>, ApiError> {
        self.client
            .request(TOP3_FAVORITES_PATH, RequestOptions::get())
            .await
    }
}
