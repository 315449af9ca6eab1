use crate::api::ApiClient;
use crate::api::user::{PASSWORD_UPDATED, USER_UPDATED};
use crate::config::Settings;
use crate::logger::Logger;
use crate::models::{
    Credentials, Dish, Favorite, RegistrationRequest, UpdatePasswordRequest, UpdateUserRequest,
};
use crate::search::{self, DishSort};
use crate::session::{KeyringTokenStore, Session, TokenStore, username_from_token};
use crate::validation;
use anyhow::{Result, anyhow};
use chrono::Timelike;
use comfy_table::Table;
use inquire::{Password, PasswordDisplayMode, Text};

/// Everything a command needs: the client (with its session) and the saved
/// settings it was built from.
pub struct App {
    pub client: ApiClient,
    pub settings: Settings,
    api_url_flag: Option<String>,
}

impl App {
    /// The token lives in the keyring under the saved username. Without one
    /// there is nothing to look up and requests go out unauthenticated.
    pub fn new(settings: Settings, api_url_flag: Option<&str>) -> Result<Self> {
        let api_url = settings.resolve_api_url(api_url_flag)?;
        let session = match &settings.username {
            Some(username) => Session::new(KeyringTokenStore::new(username)),
            None => Session::in_memory(),
        };
        log::debug!("using API at {}", api_url);

        Ok(Self {
            client: ApiClient::new(api_url, session),
            settings,
            api_url_flag: api_url_flag.map(str::to_owned),
        })
    }
}

/// Time-of-day greeting, same cut-offs as the home screen.
pub fn greeting(hour: u32) -> &'static str {
    match hour {
        0..=11 => "おはようございます",
        12..=17 => "こんにちは",
        _ => "こんばんは",
    }
}

/// Prompts for email/password, validates them locally, and logs in.
/// The token goes to the keyring; the username (and an explicit `--api-url`)
/// to the settings file.
pub async fn login(app: &mut App) -> Result<()> {
    let username = Text::new("Email:").prompt()?.trim().to_string();
    validation::validate_email(&username).map_err(|e| anyhow!(e))?;

    let password = Password::new("Password:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()?;
    validation::validate_password(&password).map_err(|e| anyhow!(e))?;

    let pb = Logger::spinner("Logging in...");
    let response = app
        .client
        .auth()
        .login(&Credentials {
            username: username.clone(),
            password,
        })
        .await;
    pb.finish_and_clear();
    let response = response?;

    // A different account may have been logged in before.
    if app.settings.username.as_deref() != Some(username.as_str()) {
        app.client.session().clear()?;
    }
    KeyringTokenStore::new(&username).set(&response.token)?;

    app.settings.remember_login(&username, app.api_url_flag.as_deref())?;
    app.settings.save()?;

    let display = username_from_token(&response.token).unwrap_or(username);
    Logger::success(format!(
        "{}, {}! {}",
        greeting(chrono::Local::now().hour()),
        Logger::highlight(display),
        Logger::dim(&response.message)
    ));
    Ok(())
}

pub async fn register(app: &App) -> Result<()> {
    let name = Text::new("Name:").prompt()?.trim().to_string();
    let username = Text::new("Email:").prompt()?.trim().to_string();
    validation::validate_email(&username).map_err(|e| anyhow!(e))?;
    let national = Text::new("Nationality:").prompt()?.trim().to_string();

    let password = Password::new("Password:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .with_custom_confirmation_message("Confirm password:")
        .with_custom_confirmation_error_message("The passwords don't match.")
        .prompt()?;
    validation::validate_password(&password).map_err(|e| anyhow!(e))?;

    let pb = Logger::spinner("Creating your account...");
    let response = app
        .client
        .auth()
        .register(&RegistrationRequest {
            name,
            username: username.clone(),
            password,
            national,
        })
        .await;
    pb.finish_and_clear();
    let response = response?;

    Logger::success(format!(
        "Account created for {}. {}",
        Logger::highlight(&username),
        Logger::dim(&response.message)
    ));
    Logger::info("Run `betomeshi login` to sign in.");
    Ok(())
}

pub fn logout(app: &App) -> Result<()> {
    app.client.session().clear()?;
    Settings::remove()?;
    Logger::success("Logged out.");
    Ok(())
}

pub async fn me(app: &App) -> Result<()> {
    let pb = Logger::spinner("Fetching your profile...");
    let profile = app.client.auth().get_current_user().await;
    pb.finish_and_clear();
    let profile = profile?;

    Logger::header(format!(
        "{}, {}",
        greeting(chrono::Local::now().hour()),
        profile.name
    ));
    let mut table = Table::new();
    table.add_row(vec!["Name", profile.name.as_str()]);
    table.add_row(vec!["Nationality", profile.nationality.as_str()]);
    table.add_row(vec!["Email", profile.email.as_str()]);
    table.add_row(vec!["Avatar", profile.avatar.as_deref().unwrap_or("-")]);
    println!("{}", table);
    Ok(())
}

pub async fn dishes(app: &App, query: Option<&str>, sort: DishSort) -> Result<()> {
    let pb = Logger::spinner("Fetching famous dishes...");
    let response = app.client.dish().get_famous_dishes().await;
    pb.finish_and_clear();
    let response = response?;

    let dishes = search::filter_and_sort(&response.data, query.unwrap_or(""), sort.into());
    if dishes.is_empty() {
        Logger::warn(response.message.as_deref().unwrap_or("No dishes found."));
        return Ok(());
    }

    Logger::header("Famous dishes");
    println!("{}", dish_table(&dishes));
    Ok(())
}

pub async fn favorites(app: &App, query: Option<&str>, sort: DishSort) -> Result<()> {
    if !app.client.session().is_authenticated() {
        return Err(anyhow!("Not logged in. Run `betomeshi login` first."));
    }

    let pb = Logger::spinner("Fetching your favorites...");
    let response = app.client.favorite().get_top3_favorites().await;
    pb.finish_and_clear();
    let response = response?;

    let favorites = search::filter_and_sort(&response.data, query.unwrap_or(""), sort.into());
    if favorites.is_empty() {
        Logger::warn(response.message.as_deref().unwrap_or("No favorites yet."));
        return Ok(());
    }

    Logger::header("Your favorites");
    println!("{}", favorite_table(&favorites));
    Ok(())
}

/// Home-screen search across famous dishes and, when logged in, favorites.
pub async fn search_all(app: &App, query: &str) -> Result<()> {
    let pb = Logger::spinner(format!("Searching for {}...", query));
    let dishes = app.client.dish().get_famous_dishes().await;
    let favorites = if app.client.session().is_authenticated() {
        app.client.favorite().get_top3_favorites().await.map(|r| r.data)
    } else {
        Ok(Vec::new())
    };
    pb.finish_and_clear();
    let dishes = dishes?.data;

    // Dish hits still show when favorites fail, e.g. on an expired token.
    let favorites = favorites.unwrap_or_else(|e| {
        Logger::warn(format!("Skipping favorites: {}", e));
        Vec::new()
    });

    let Some(results) = search::search_home(query, &dishes, &favorites) else {
        Logger::warn(format!("Nothing matches {}.", Logger::highlight(query)));
        return Ok(());
    };

    if !results.dishes.is_empty() {
        Logger::header("Famous dishes");
        println!("{}", dish_table(&results.dishes));
    }
    if !results.favorites.is_empty() {
        Logger::header("Your favorites");
        println!("{}", favorite_table(&results.favorites));
    }
    Ok(())
}

pub async fn update_profile(app: &App, request: UpdateUserRequest) -> Result<()> {
    if let Some(email) = &request.email {
        validation::validate_email(email).map_err(|e| anyhow!(e))?;
    }

    let pb = Logger::spinner("Saving your profile...");
    let response = app.client.user().update_user(&request).await;
    pb.finish_and_clear();
    let response = response?;

    if response.message == USER_UPDATED {
        Logger::success("Profile updated.");
    } else {
        Logger::warn(format!("Profile may not have been updated: {}", response.message));
    }
    Ok(())
}

pub async fn change_password(app: &App) -> Result<()> {
    let old_password = Password::new("Current password:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()?;
    let new_password = Password::new("New password:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .with_custom_confirmation_message("Confirm new password:")
        .with_custom_confirmation_error_message("The new passwords don't match.")
        .prompt()?;
    validation::validate_password_change(&old_password, &new_password)
        .map_err(|e| anyhow!(e))?;

    let pb = Logger::spinner("Changing your password...");
    let response = app
        .client
        .user()
        .update_password(&UpdatePasswordRequest {
            old_password,
            new_password,
        })
        .await;
    pb.finish_and_clear();
    let response = response?;

    if response.message == PASSWORD_UPDATED {
        Logger::success("Password changed.");
    } else {
        Logger::warn(format!("Password may not have changed: {}", response.message));
    }
    Ok(())
}

fn dish_table(dishes: &[Dish]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["#", "Dish", "Rating", "Image"]);
    for (rank, dish) in dishes.iter().enumerate() {
        table.add_row(vec![
            (rank + 1).to_string(),
            dish.name.clone(),
            format!("★ {:.1}", dish.rate),
            dish.image_url.clone(),
        ]);
    }
    table
}

fn favorite_table(favorites: &[Favorite]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Dish", "Restaurant", "Distance", "Rating"]);
    for fav in favorites {
        table.add_row(vec![
            fav.dish_name.clone(),
            fav.restaurant_name.clone().unwrap_or_else(|| "-".into()),
            fav.distance
                .map(|d| format!("{} km", d))
                .unwrap_or_else(|| "-".into()),
            fav.rate
                .map(|r| format!("★ {:.1}", r))
                .unwrap_or_else(|| "-".into()),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greeting_follows_time_of_day() {
        assert_eq!(greeting(0), "おはようございます");
        assert_eq!(greeting(11), "おはようございます");
        assert_eq!(greeting(12), "こんにちは");
        assert_eq!(greeting(17), "こんにちは");
        assert_eq!(greeting(18), "こんばんは");
        assert_eq!(greeting(23), "こんばんは");
    }

    #[test]
    fn favorite_table_fills_missing_fields() {
        let table = favorite_table(&[Favorite {
            id: 1,
            dish_name: "Pho".into(),
            restaurant_name: None,
            distance: None,
            image_url: "/p.jpg".into(),
            rate: Some(4.5),
            description: None,
        }]);
        let rendered = table.to_string();
        assert!(rendered.contains("Pho"));
        assert!(rendered.contains("★ 4.5"));
    }
}
