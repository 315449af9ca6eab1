use super::{ApiClient, RequestOptions};
use crate::error::ApiError;
use crate::models::{Dish, ListResponse};

// Top-rated dish listing. The path is what the backend currently exposes.
const FAMOUS_DISHES_PATH: &str = "/disharmonious";

/// Read-only dish listings. No token needed.
pub struct DishApi<'a> {
    client: &'a ApiClient,
}

impl<'a> DishApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Top dishes by rating. Ordering comes from the server as-is.
    pub async fn get_famous_dishes(&self) -> Result<ListResponse<Dish>, ApiError> {
        self.client
            .request(FAMOUS_DISHES_PATH, RequestOptions::get())
            .await
    }
}
