use crate::search::DishSort;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "betomeshi")]
#[command(about = "ベトめしガイド: find Vietnamese dishes worth the trip", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Override the backend API URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in with your email and password
    Login,
    /// Log out and forget the stored token
    Logout,
    /// Create a new account
    Register,
    /// Show your profile
    Me,
    /// List the most famous dishes
    Dishes {
        /// Only show dishes whose name contains this
        #[arg(short, long)]
        search: Option<String>,
        #[arg(long, value_enum, default_value_t = DishSort::Rating)]
        sort: DishSort,
    },
    /// List your top 3 favorite dishes
    Favorites {
        /// Only show favorites whose dish or restaurant contains this
        #[arg(short, long)]
        search: Option<String>,
        #[arg(long, value_enum, default_value_t = DishSort::Rating)]
        sort: DishSort,
    },
    /// Search famous dishes and your favorites at once
    Search {
        /// Search query
        query: String,
    },
    /// Update profile fields; omitted fields are sent as null
    UpdateProfile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        nationality: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// Avatar URL or data URI
        #[arg(long)]
        avatar: Option<String>,
    },
    /// Change your password
    ChangePassword,
}
