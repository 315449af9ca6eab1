//! Wire types for the ベトめしガイド backend.
//!
//! Field names follow what the backend actually sends, which is not always
//! consistent (`imageUrl` next to `dishesname`). Rust-side names are snake_case
//! and the serde attributes carry the mapping.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationRequest {
    pub name: String,
    pub username: String,
    pub password: String,
    pub national: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
}

/// Plain `{ "message": ... }` acknowledgement used by the update endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    #[serde(rename = "national", alias = "nationality")]
    pub nationality: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// `GET /me` wraps the profile in a `data` envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfoResponse {
    pub data: UserProfile,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dish {
    pub id: i64,
    pub name: String,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    pub rate: f64,
}

/// A favorite dish.
///
/// The backend returns two shapes: the top-3 endpoint includes restaurant name
/// and distance, the full list includes rate and description. This struct is
/// the union of both, with the variant-specific fields optional. Serialized
/// names are the backend's (`dishesname`, `restaurantname`); the camelCase
/// spellings are accepted on input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Favorite {
    pub id: i64,
    #[serde(rename = "dishesname", alias = "dishName")]
    pub dish_name: String,
    #[serde(
        rename = "restaurantname",
        alias = "restaurantName",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub restaurant_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// `{ status, data: [...], message? }` envelope shared by the list endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub status: String,
    pub data: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ListResponse<T> {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// Error-shaped JSON body. Either field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorPayload {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of `PUT /updateUser`. Unset fields go out as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub fullname: Option<String>,
    pub national: Option<String>,
    pub avatar: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingBreakdown {
    pub all: u32,
    pub five: u32,
    pub four: u32,
    pub three: u32,
    pub one_two: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantReview {
    pub id: String,
    pub name: String,
    pub image: String,
    pub rating: RatingBreakdown,
    pub average_rating: f64,
}
