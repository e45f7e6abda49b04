use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

use viva::web_server::{start_web_server, AppState};
use viva::{constants, CompletionClient, InterviewSession};

// Define the command-line interface structure using clap
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Start the interview web UI for one student.
    Serve {
        #[arg(long, help = "Student ID whose midterm/prior-question data to load.")]
        student: String,
        #[arg(long, default_value_t = 9900, help = "Port for the web server.")]
        port: u16,
        #[arg(long, env = "VIVA_DATA_DIR", help = "Directory containing midterm/ and mygpt/.")]
        data_dir: Option<PathBuf>,
    },
    /// Run the interview as a terminal chat session.
    Chat {
        #[arg(long, help = "Student ID whose midterm/prior-question data to load.")]
        student: String,
        #[arg(long, env = "VIVA_DATA_DIR", help = "Directory containing midterm/ and mygpt/.")]
        data_dir: Option<PathBuf>,
    },
}

fn resolve_data_dir(data_dir: Option<PathBuf>) -> PathBuf {
    data_dir.unwrap_or_else(|| PathBuf::from(constants::VIVA_DATA_DIR.clone()))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (for the completion-endpoint credential)
    dotenvy::dotenv().ok();

    // Reads log level from RUST_LOG (e.g. RUST_LOG=info,viva=debug)
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            student,
            port,
            data_dir,
        } => {
            let data_dir = resolve_data_dir(data_dir);
            let client = CompletionClient::from_env()?;
            let session = InterviewSession::new(&data_dir, &student, client)
                .context("Failed to create interview session")?;

            let state = AppState::new(session)?;
            info!(%student, "Seeding opening turn");
            state.seed_opening_turn().await?;

            start_web_server(port, state).await?;
        }
        Commands::Chat { student, data_dir } => {
            let data_dir = resolve_data_dir(data_dir);
            let client = CompletionClient::from_env()?;
            let mut session = InterviewSession::new(&data_dir, &student, client)
                .context("Failed to create interview session")?;

            let opening = session
                .start_turn(constants::OPENING_TRIGGER)
                .await
                .context("Opening turn failed")?;
            println!("{}: {}", constants::ASSISTANT_SPEAKER, opening);

            let stdin = std::io::stdin();
            loop {
                print!("{}: ", constants::USER_SPEAKER);
                std::io::stdout().flush()?;

                let mut line = String::new();
                if stdin.read_line(&mut line)? == 0 {
                    info!("Input closed, ending interview session");
                    break;
                }
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let reply = session.start_turn(line).await.context("Turn failed")?;
                println!("{}: {}", constants::ASSISTANT_SPEAKER, reply);
            }
        }
    }

    Ok(())
}
