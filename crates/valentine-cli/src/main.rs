use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use rand::Rng;
use tracing_subscriber::EnvFilter;
use valentine::default_credentials_path;
use valentine::flow::{DECLINE_TAUNT, FINAL_STAGE};
use valentine::prelude::*;

// ---------------------------------------------------------------------------
// Arguments
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(name = "valentine")]
#[command(version)]
#[command(about = "Ask someone to be your valentine, from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Backend base URL [default: $VALENTINE_API_URL, else http://127.0.0.1:8000]
    #[arg(long)]
    api_url: Option<String>,

    /// Where the login is remembered between runs
    #[arg(long, env = "VALENTINE_CREDENTIALS", default_value_os_t = default_credentials_path())]
    credentials: PathBuf,

    /// Keep the login in memory only; nothing is written to disk
    #[arg(long)]
    ephemeral: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account
    Signup {
        username: String,
        display_name: String,
        /// Read from stdin when omitted
        #[arg(long, env = "VALENTINE_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Log in and remember the session
    Login {
        username: String,
        /// Read from stdin when omitted
        #[arg(long, env = "VALENTINE_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Forget the session
    Logout,
    /// Show whether a session is held
    Status,
    /// Show the account the session belongs to
    Whoami,
    /// Pop the question (answer `y` to accept)
    Ask {
        /// Who the celebration is for (default: the logged-in user)
        username: Option<String>,
    },
    /// Show the celebration for a user
    Celebrate { username: String },
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let client = connect(&cli)?;

    match cli.command {
        Commands::Signup {
            username,
            display_name,
            password,
        } => {
            let password = password_or_prompt(password)?;
            let account = client.register(&username, &password, &display_name).await?;
            println!(
                "Created account {} ({}). Now run `valentine login {}`.",
                account.username, account.id, account.username
            );
        }
        Commands::Login { username, password } => {
            let password = password_or_prompt(password)?;
            client.authenticate(&username, &password).await?;
            println!("Logged in as {username}.");
        }
        Commands::Logout => {
            client.logout();
            println!("Logged out.");
        }
        Commands::Status => {
            if client.session().is_logged_in() {
                println!("Logged in.");
            } else {
                println!("Logged out.");
            }
        }
        Commands::Whoami => {
            let me = client
                .current_user()
                .await
                .context("could not fetch the current user")?;
            println!("{} ({})", me.greeting_name(), me.username);
        }
        Commands::Ask { username } => ask(&client, username).await?,
        Commands::Celebrate { username } => {
            let route = Route::Celebration { username };
            celebrate(&client, route).await?;
        }
    }

    Ok(())
}

fn connect(cli: &Cli) -> Result<Client> {
    let storage: Box<dyn valentine::session::CredentialStorage> = if cli.ephemeral {
        Box::new(MemoryStorage::new())
    } else {
        Box::new(FileStorage::new(&cli.credentials))
    };
    let session = SessionStore::open(storage)
        .with_context(|| format!("could not read {}", cli.credentials.display()))?;

    let config = match &cli.api_url {
        Some(url) => ClientConfig::with_base_url(url),
        None => ClientConfig::from_env(),
    };
    Ok(Client::new(&config, Arc::new(session))?)
}

fn password_or_prompt(password: Option<String>) -> Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }
    eprint!("Password: ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

async fn ask(client: &Client, username: Option<String>) -> Result<()> {
    let route = guard(Route::Interactive { username }, client.session());
    let Route::Interactive { username } = route else {
        bail!("not logged in; run `valentine login <username>` first");
    };

    let username = match username {
        Some(name) => name,
        None => match client.current_user().await {
            Ok(me) => me.username,
            Err(e) if e.is_session_lost() => bail!("session expired; log in again"),
            Err(e) => {
                tracing::warn!(error = %e, "could not look up current user");
                String::new()
            }
        },
    };

    let stdin = io::stdin();
    let completed = run_prompt(
        InteractiveFlow::new(username),
        &mut stdin.lock(),
        &mut io::stdout(),
    )?;

    match completed {
        Some(username) => celebrate(client, Route::Celebration { username }).await,
        None => Ok(()),
    }
}

async fn celebrate(client: &Client, route: Route) -> Result<()> {
    let Route::Celebration { username } = guard(route, client.session()) else {
        bail!("not logged in; run `valentine login <username>` first");
    };
    let party = client.celebrate(&username).await;
    println!("{}", party.message());
    Ok(())
}

/// Runs the prompt over line-based input until the last stage is
/// accepted (returns the username) or input ends (returns `None`).
fn run_prompt<G: Rng>(
    mut flow: InteractiveFlow<G>,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<Option<String>> {
    loop {
        write!(out, "[{}/{}] {} [y/N] ", flow.stage(), FINAL_STAGE, flow.prompt())?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            return Ok(None);
        }

        if is_yes(&line) {
            flow = match flow.on_affirm() {
                Step::Continue(next) => next,
                Step::Complete { username } => return Ok(Some(username)),
            };
        } else {
            let position = flow.on_decline();
            writeln!(out, "{DECLINE_TAUNT} (No moved to {position})")?;
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
