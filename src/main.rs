use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use signlink_lib::core::config::Config;
use signlink_lib::platform::capture::ImageSequenceSource;
use signlink_lib::platform::pose::DefaultHandPose;
use signlink_lib::AppState;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Filter {
    All,
    Completed,
    Pending,
    Failed,
}

impl Filter {
    fn as_str(&self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Completed => "completed",
            Filter::Pending => "pending",
            Filter::Failed => "failed",
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Detect sign language gestures and track translation requests")]
struct Args {
    /// Path to config file (JSON format, defaults to ~/.signlink/config/settings.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Keep records in a throwaway in-memory database
    #[arg(long, global = true)]
    memory: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Inspect or reset the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    #[command(flatten)]
    App(AppCommand),
}

/// Commands that open the translation database
#[derive(Subcommand, Debug)]
enum AppCommand {
    /// Translate a piece of text
    Text {
        text: String,
    },
    /// Submit a video file for translation
    Video {
        file: PathBuf,
    },
    /// Run gesture detection over a directory of still frames
    Live {
        /// Directory holding png/jpg/bmp frames, read in file name order
        #[arg(short, long)]
        frames: PathBuf,

        /// Store the detected gesture sequence as a translation
        #[arg(short, long)]
        submit: bool,
    },
    /// Show translation history
    Dashboard {
        /// Sign in with this email before opening the dashboard
        #[arg(short, long)]
        user: Option<String>,

        #[arg(short, long, value_enum, default_value = "all")]
        filter: Filter,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Overwrite the configuration file with defaults
    Reset,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => Config::get_config_path()?,
    };

    match args.command {
        Command::Config { action } => run_config(&action, &config_path),
        Command::App(command) => run_app(command, &config_path, args.memory).await,
    }
}

async fn run_app(
    command: AppCommand,
    config_path: &Path,
    memory: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_from(config_path)
        .map_err(|e| format!("Failed to load config '{}': {}", config_path.display(), e))?;

    let state = if memory {
        AppState::in_memory(config, Arc::new(DefaultHandPose::default())).await?
    } else {
        AppState::init(config).await?
    };

    match command {
        AppCommand::Text { text } => {
            print_json(&signlink_lib::translate_text(text, &state).await?)?;
        }
        AppCommand::Video { file } => {
            let file_name = file
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .ok_or_else(|| format!("Not a file: {}", file.display()))?;
            print_json(&signlink_lib::upload_video(file_name, &state).await?)?;
        }
        AppCommand::Live { frames, submit } => {
            let source = ImageSequenceSource::from_dir(&frames)?;
            let session_state = signlink_lib::start_webcam(Arc::new(source), &state).await?;
            log::info!("Capture session {:?}", session_state);

            // The session ends on its own once the frames run out
            state.capture.wait().await;
            let labels = signlink_lib::get_detected_gestures(&state).await?;
            log::info!("Detected {} gesture(s)", labels.len());

            if submit && !labels.is_empty() {
                print_json(&signlink_lib::submit_detected_gestures(&state).await?)?;
            } else {
                print_json(&labels)?;
            }
        }
        AppCommand::Dashboard { user, filter } => {
            if let Some(email) = user {
                signlink_lib::sign_in(email, &state).await?;
            }
            print_json(&signlink_lib::get_dashboard(filter.as_str().to_string(), &state).await?)?;
        }
    }

    Ok(())
}

fn run_config(action: &ConfigAction, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = match action {
        ConfigAction::Show => Config::load_from(path)?,
        ConfigAction::Reset => {
            let config = Config::default();
            config.save_to(path)?;
            log::info!("Configuration reset at {}", path.display());
            config
        }
    };
    print_json(&config)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
