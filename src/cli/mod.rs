//! Command-line surface: one subcommand per dashboard action.

mod render;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use console::style;
use std::path::PathBuf;
use std::sync::Arc;

use churnctl::api::{FeedbackCreate, ModelCreate, PredictionInput};
use churnctl::auth::FileSessionStore;
use churnctl::dashboard::{parse_features, AdminForm, RegistrationForm};
use churnctl::navigation::RecordingNavigator;
use churnctl::{ApiClient, Config, Dashboard, Session};

/// Churn-prediction dashboard client.
#[derive(Debug, Parser)]
#[command(name = "churnctl", version, about)]
pub struct Cli {
    /// Path to config.toml (defaults to the platform config directory).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL; overrides config and CHURN_API_URL.
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and store the session token.
    Login {
        #[arg(short, long)]
        username: Option<String>,
        /// Prompted for when omitted.
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Create an account.
    Register(RegisterArgs),
    /// Forget the stored session token.
    Logout,
    /// Show backend URL, session file and sign-in state.
    Status,
    /// Admin panel.
    #[command(subcommand)]
    Admin(AdminCommand),
    /// User panel.
    #[command(subcommand)]
    User(UserCommand),
}

#[derive(Debug, Args)]
pub struct RegisterArgs {
    #[arg(short, long)]
    pub username: String,
    #[arg(short, long)]
    pub email: String,
    /// Prompted for (with confirmation) when omitted.
    #[arg(short, long)]
    pub password: Option<String>,
    /// Request an admin account.
    #[arg(long)]
    pub admin: bool,
}

#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// Show the signed-in admin's profile.
    Profile,
    /// List users.
    Users,
    /// List feedback.
    Feedback,
    /// List registered models.
    Models,
    /// List prediction logs.
    Logs,
    /// Create another admin account.
    CreateAdmin {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        email: String,
        /// Prompted for (with confirmation) when omitted.
        #[arg(short, long)]
        password: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Show your profile.
    Profile,
    /// Give feedback on a prediction.
    Feedback {
        #[arg(long)]
        prediction_id: i64,
        /// Whether the prediction was correct.
        #[arg(long, action = clap::ArgAction::Set)]
        correct: bool,
        #[arg(long, default_value = "")]
        comment: String,
    },
    /// Register a model.
    Model {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Predict churn from customer features.
    Predict {
        /// Customer feature as key=value (repeatable).
        #[arg(short, long = "feature", value_name = "KEY=VALUE")]
        features: Vec<String>,
        /// JSON file holding a feature object; --feature values override it.
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Predict churn from a recorded call.
    PredictCall {
        /// Audio file of the call.
        recording: PathBuf,
    },
    /// List your predictions.
    Predictions,
    /// Delete a prediction.
    DeletePrediction { id: i64 },
}

/// Resolve configuration from file, environment and flags.
pub fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load(cli.config.as_deref())?;
    config.apply_env();
    if let Some(url) = cli.api_url.as_deref() {
        config.api_url = url.trim().to_string();
    }
    config.validate()?;
    Ok(config)
}

/// Run one command.
pub async fn run(cli: Cli, config: Config) -> Result<()> {
    let session_path = config.session_path()?;
    let navigator = Arc::new(RecordingNavigator::new());
    let session = Session::new(
        Arc::new(FileSessionStore::new(&session_path)),
        navigator.clone(),
    );
    let client = ApiClient::with_timeout(&config.api_url, session, config.timeout())
        .context("Failed to build HTTP client")?;
    let dash = Dashboard::new(client);

    let result = dispatch(&dash, cli.command, &config, &session_path).await;

    if let Some(route) = navigator.last() {
        println!("{} {}", style("→").cyan(), style(route.hint()).dim());
    }
    result
}

async fn dispatch(
    dash: &Dashboard,
    command: Command,
    config: &Config,
    session_path: &std::path::Path,
) -> Result<()> {
    match command {
        Command::Login { username, password } => {
            let username = match username {
                Some(u) => u,
                None => prompt_text("Username")?,
            };
            let password = match password {
                Some(p) => p,
                None => prompt_password("Password")?,
            };
            let outcome = dash.login(&username, &password).await?;
            match outcome.user {
                Some(user) => render::success(&format!(
                    "Signed in as {} ({})",
                    user.username,
                    user.role_label()
                )),
                None => render::success("Signed in"),
            }
        }
        Command::Register(args) => {
            let (password, confirm_password) = match args.password {
                Some(p) => (p.clone(), p),
                None => (
                    prompt_password("Password")?,
                    prompt_password("Confirm password")?,
                ),
            };
            let form = RegistrationForm {
                username: args.username,
                email: args.email,
                password,
                confirm_password,
                is_admin: args.admin,
            };
            dash.register(&form).await?;
            render::success("Account created");
        }
        Command::Logout => {
            dash.logout()?;
            render::success("Signed out");
        }
        Command::Status => {
            render::status(
                &config.api_url,
                session_path,
                dash.session().is_authenticated(),
            );
        }
        Command::Admin(cmd) => run_admin(dash, cmd).await?,
        Command::User(cmd) => run_user(dash, cmd).await?,
    }
    Ok(())
}

async fn run_admin(dash: &Dashboard, cmd: AdminCommand) -> Result<()> {
    match cmd {
        AdminCommand::Profile => render::profile(&dash.admin_profile().await?),
        AdminCommand::Users => render::users(&dash.list_users().await?),
        AdminCommand::Feedback => render::feedback(&dash.list_feedback().await?),
        AdminCommand::Models => render::models(&dash.list_models().await?),
        AdminCommand::Logs => render::logs(&dash.list_logs().await?),
        AdminCommand::CreateAdmin {
            username,
            email,
            password,
        } => {
            let (password, confirm_password) = match password {
                Some(p) => (p.clone(), p),
                None => (
                    prompt_password("Password")?,
                    prompt_password("Confirm password")?,
                ),
            };
            let form = AdminForm {
                username,
                email,
                password,
                confirm_password,
            };
            dash.create_admin(&form).await?;
            render::success("Admin account created");
        }
    }
    Ok(())
}

async fn run_user(dash: &Dashboard, cmd: UserCommand) -> Result<()> {
    match cmd {
        UserCommand::Profile => render::profile(&dash.user_profile().await?),
        UserCommand::Feedback {
            prediction_id,
            correct,
            comment,
        } => {
            let created = dash
                .submit_feedback(&FeedbackCreate {
                    prediction_id,
                    correct,
                    comment,
                })
                .await?;
            render::success(&format!("Feedback #{} submitted", created.id));
        }
        UserCommand::Model { name, description } => {
            let created = dash
                .create_model(&ModelCreate { name, description })
                .await?;
            render::success(&format!("Model '{}' registered (#{})", created.name, created.id));
        }
        UserCommand::Predict { features, file } => {
            let input = build_features(&features, file.as_deref())?;
            render::prediction(&dash.predict(&input).await?);
        }
        UserCommand::PredictCall { recording } => {
            render::prediction(&dash.predict_from_call(&recording).await?);
        }
        UserCommand::Predictions => render::predictions(&dash.list_predictions().await?),
        UserCommand::DeletePrediction { id } => {
            dash.delete_prediction(id).await?;
            render::success(&format!("Prediction #{id} deleted"));
        }
    }
    Ok(())
}

fn build_features(pairs: &[String], file: Option<&std::path::Path>) -> Result<PredictionInput> {
    let mut input = match file {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            match serde_json::from_str::<serde_json::Value>(&raw)
                .with_context(|| format!("Invalid JSON in {}", path.display()))?
            {
                serde_json::Value::Object(map) => map,
                _ => bail!("{} must contain a JSON object", path.display()),
            }
        }
        None => PredictionInput::new(),
    };
    input.extend(parse_features(pairs)?);
    Ok(input)
}

fn prompt_text(label: &str) -> Result<String> {
    Ok(dialoguer::Input::<String>::new()
        .with_prompt(label)
        .interact_text()?)
}

fn prompt_password(label: &str) -> Result<String> {
    Ok(dialoguer::Password::new().with_prompt(label).interact()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_feedback_command() {
        let cli = Cli::try_parse_from([
            "churnctl",
            "user",
            "feedback",
            "--prediction-id",
            "5",
            "--correct",
            "true",
        ])
        .unwrap();
        match cli.command {
            Command::User(UserCommand::Feedback {
                prediction_id,
                correct,
                comment,
            }) => {
                assert_eq!(prediction_id, 5);
                assert!(correct);
                assert!(comment.is_empty());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn api_url_flag_overrides_config() {
        let cli = Cli::try_parse_from([
            "churnctl",
            "--api-url",
            "http://localhost:8000/",
            "status",
        ])
        .unwrap();
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "api_url = \"https://other.example\"\n").unwrap();
        let cli = Cli {
            config: Some(path),
            ..cli
        };
        let config = load_config(&cli).unwrap();
        assert_eq!(config.api_url, "http://localhost:8000/");
    }

    #[test]
    fn features_from_file_are_overridden_by_flags() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("customer.json");
        std::fs::write(&path, r#"{"tenure": 3, "contract": "One year"}"#).unwrap();

        let input = build_features(&["tenure=24".to_string()], Some(&path)).unwrap();
        assert_eq!(input["tenure"], serde_json::json!(24));
        assert_eq!(input["contract"], serde_json::json!("One year"));
    }

    #[test]
    fn features_file_must_hold_an_object() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("bad.json");
        std::fs::write(&path, "[1,2]").unwrap();
        assert!(build_features(&[], Some(&path)).is_err());
    }
}
