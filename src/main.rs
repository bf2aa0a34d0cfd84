use clap::Parser;
use color_eyre::Result;
use studytrack::{
    Config, Database, Profile,
    cli::{Cli, Commands},
};

fn main() -> Result<()> {
    // Set up error reporting with color-eyre
    color_eyre::install()?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Determine profile: --dev flag enables dev mode, otherwise use prod
    let profile = if cli.dev { Profile::Dev } else { Profile::Prod };

    // Load configuration: an explicit --config path wins over the profile
    let config = match cli.config.as_deref() {
        Some(path) => Config::load_from_path(&studytrack::utils::expand_path(path))?,
        None => Config::load_with_profile(profile)?,
    };

    // Initialize database
    let db_path = config.get_database_path();
    let db = Database::new(
        db_path
            .to_str()
            .ok_or_else(|| color_eyre::eyre::eyre!("Database path contains invalid UTF-8"))?,
    )?;

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Register {
            username,
            password,
            first_name,
            last_name,
            course,
            year_level,
        } => {
            studytrack::cli::handle_register(
                username, password, first_name, last_name, course, year_level, &db,
            )?;
        }
        Commands::Login { username, password } => {
            studytrack::cli::handle_login(username, password, &db)?;
        }
        Commands::Profile { username } => {
            studytrack::cli::handle_profile(username, &db)?;
        }
        Commands::AddTask {
            username,
            subject,
            course_code,
            due,
        } => {
            studytrack::cli::handle_add_task(username, subject, course_code, due, &db)?;
        }
        Commands::ListTasks { username } => {
            studytrack::cli::handle_list_tasks(username, &db)?;
        }
        Commands::EditTask {
            username,
            id,
            subject,
            course_code,
            due,
        } => {
            studytrack::cli::handle_edit_task(username, id, subject, course_code, due, &db)?;
        }
        Commands::ToggleTask { username, id } => {
            studytrack::cli::handle_toggle_task(username, id, &db)?;
        }
        Commands::DeleteTask { username, id } => {
            studytrack::cli::handle_delete_task(username, id, &db)?;
        }
        Commands::Notifications { username } => {
            studytrack::cli::handle_notifications(username, &db)?;
        }
    }

    Ok(())
}
