//! Client for the ベトめしガイド backend: a token-carrying session, one generic
//! request function, and typed façades per resource.
//!
//! ```no_run
//! use betomeshi::api::ApiClient;
//! use betomeshi::models::Credentials;
//! use betomeshi::session::Session;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let client = ApiClient::new("http://localhost:8080", Session::in_memory());
//! let login = client
//!     .auth()
//!     .login(&Credentials {
//!         username: "u@example.com".into(),
//!         password: "Secret123!".into(),
//!     })
//!     .await?;
//! client.session().set_token(&login.token)?;
//!
//! let top3 = client.favorite().get_top3_favorites().await?;
//! println!("{} favorites", top3.data.len());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod search;
pub mod session;
pub mod validation;

pub use api::{ApiClient, RequestOptions};
pub use error::ApiError;
pub use session::{Session, TokenStore};
