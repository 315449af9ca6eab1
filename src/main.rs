use betomeshi::cli::{Cli, Commands};
use betomeshi::commands::{self, App};
use betomeshi::config::Settings;
use betomeshi::logger::Logger;
use betomeshi::models::UpdateUserRequest;
use clap::Parser;

#[tokio::main]
async fn main() {
    // Request diagnostics are opt-in: RUST_LOG=betomeshi=debug
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("off")).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        Logger::error(format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = Settings::load()?;
    let mut app = App::new(settings, cli.api_url.as_deref())?;

    match cli.command {
        Commands::Login => {
            Logger::banner();
            commands::login(&mut app).await?;
        }
        Commands::Logout => commands::logout(&app)?,
        Commands::Register => {
            Logger::banner();
            commands::register(&app).await?;
        }
        Commands::Me => commands::me(&app).await?,
        Commands::Dishes { search, sort } => {
            commands::dishes(&app, search.as_deref(), sort).await?;
        }
        Commands::Favorites { search, sort } => {
            commands::favorites(&app, search.as_deref(), sort).await?;
        }
        Commands::Search { query } => commands::search_all(&app, &query).await?,
        Commands::UpdateProfile {
            name,
            nationality,
            email,
            avatar,
        } => {
            let request = UpdateUserRequest {
                fullname: name,
                national: nationality,
                avatar,
                email,
            };
            commands::update_profile(&app, request).await?;
        }
        Commands::ChangePassword => commands::change_password(&app).await?,
    }

    Ok(())
}
