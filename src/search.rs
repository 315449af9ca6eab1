//! In-memory search, filter and sort over fetched listings.
//!
//! Lists here are tiny (a handful of dishes or restaurants), so everything is a
//! straight scan plus a stable sort.

use crate::models::{Dish, Favorite, RestaurantReview};
use clap::ValueEnum;
use std::cmp::Ordering;
use std::str::FromStr;

/// Anything the search helpers can match and order.
pub trait Listing {
    fn name(&self) -> &str;
    fn rating(&self) -> f64;

    fn review_count(&self) -> u32 {
        0
    }

    /// Fields a query is matched against. Defaults to just the name.
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name()]
    }
}

impl Listing for Dish {
    fn name(&self) -> &str {
        &self.name
    }

    fn rating(&self) -> f64 {
        self.rate
    }
}

impl Listing for Favorite {
    fn name(&self) -> &str {
        &self.dish_name
    }

    fn rating(&self) -> f64 {
        self.rate.unwrap_or(0.0)
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.dish_name.as_str()];
        if let Some(restaurant) = &self.restaurant_name {
            fields.push(restaurant);
        }
        fields
    }
}

impl Listing for RestaurantReview {
    fn name(&self) -> &str {
        &self.name
    }

    fn rating(&self) -> f64 {
        self.average_rating
    }

    fn review_count(&self) -> u32 {
        self.rating.all
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOption {
    /// Highest rated first
    #[default]
    Rating,
    /// Alphabetical
    Name,
    /// Most reviewed first. Only restaurants carry review counts.
    Reviews,
}

/// Orders that make sense for dishes and favorites, which have no review
/// counts. This is what the `--sort` flag accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DishSort {
    /// Highest rated first
    #[default]
    Rating,
    /// Alphabetical
    Name,
}

impl From<DishSort> for SortOption {
    fn from(sort: DishSort) -> Self {
        match sort {
            DishSort::Rating => SortOption::Rating,
            DishSort::Name => SortOption::Name,
        }
    }
}

impl SortOption {
    fn compare<T: Listing>(self, a: &T, b: &T) -> Ordering {
        match self {
            SortOption::Rating => b.rating().total_cmp(&a.rating()),
            SortOption::Name => a.name().cmp(b.name()),
            SortOption::Reviews => b.review_count().cmp(&a.review_count()),
        }
    }
}

/// Star bucket a restaurant must have at least one review in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RatingFilter {
    #[default]
    All,
    Five,
    Four,
    Three,
    OneTwo,
}

impl RatingFilter {
    fn keeps(self, restaurant: &RestaurantReview) -> bool {
        let r = &restaurant.rating;
        match self {
            RatingFilter::All => true,
            RatingFilter::Five => r.five > 0,
            RatingFilter::Four => r.four > 0,
            RatingFilter::Three => r.three > 0,
            RatingFilter::OneTwo => r.one_two > 0,
        }
    }
}

impl FromStr for RatingFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "all" => Ok(RatingFilter::All),
            "5" => Ok(RatingFilter::Five),
            "4" => Ok(RatingFilter::Four),
            "3" => Ok(RatingFilter::Three),
            "1-2" => Ok(RatingFilter::OneTwo),
            other => Err(format!("Unknown rating filter: {}", other)),
        }
    }
}

/// Case-insensitive substring match. A blank query matches everything.
pub fn matches_query(fields: &[&str], query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }
    fields.iter().any(|f| f.to_lowercase().contains(&query))
}

pub fn filter_and_sort<T: Listing + Clone>(items: &[T], query: &str, sort: SortOption) -> Vec<T> {
    let mut out: Vec<T> = items
        .iter()
        .filter(|item| matches_query(&item.search_fields(), query))
        .cloned()
        .collect();
    out.sort_by(|a, b| sort.compare(a, b));
    out
}

/// The restaurant ranking view: query, star bucket, then sort.
pub fn filter_restaurants(
    items: &[RestaurantReview],
    query: &str,
    filter: RatingFilter,
    sort: SortOption,
) -> Vec<RestaurantReview> {
    let mut out = filter_and_sort(items, query, sort);
    out.retain(|r| filter.keeps(r));
    out
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct HomeSearch {
    pub dishes: Vec<Dish>,
    pub favorites: Vec<Favorite>,
}

impl HomeSearch {
    pub fn is_empty(&self) -> bool {
        self.dishes.is_empty() && self.favorites.is_empty()
    }
}

/// Searches everything on the home screen at once. `None` means "nothing to
/// show": either the query was blank or nothing matched.
pub fn search_home(query: &str, dishes: &[Dish], favorites: &[Favorite]) -> Option<HomeSearch> {
    if query.trim().is_empty() {
        return None;
    }

    let results = HomeSearch {
        dishes: dishes
            .iter()
            .filter(|d| matches_query(&d.search_fields(), query))
            .cloned()
            .collect(),
        favorites: favorites
            .iter()
            .filter(|f| matches_query(&f.search_fields(), query))
            .cloned()
            .collect(),
    };

    (!results.is_empty()).then_some(results)
}
