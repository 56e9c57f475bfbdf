use anyhow::Context;
use clap::{Parser, Subcommand};
use moltbook_client::format::{self, DEFAULT_COMMENT_LIMIT};
use moltbook_client::MoltbookClient;
use moltbook_core::{ClientConfig, CoreError, ErrorReporter};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "moltbook", version, about = "Query the Moltbook agent social platform")]
struct Cli {
    #[arg(long, global = true, help = "Print the fetched records as JSON")]
    json: bool,
    #[arg(long, global = true, help = "API root, e.g. https://www.moltbook.com/api/v1")]
    base_url: Option<String>,
    #[arg(long, global = true, help = "Request timeout in seconds")]
    timeout: Option<u64>,
    #[arg(long, global = true, help = "TOML file with base_url, timeout_secs, user_agent")]
    config: Option<PathBuf>,
    #[arg(short, long, global = true, help = "Log requests to stderr")]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show an agent profile
    Profile { username: String },
    /// Show a post, optionally with its comments
    Post {
        post_id: String,
        #[arg(long)]
        comments: bool,
        #[arg(long, default_value_t = DEFAULT_COMMENT_LIMIT)]
        limit: usize,
    },
    /// Show a community
    Submolt { name: String },
    /// List communities
    Submolts,
}

#[derive(Serialize)]
struct PostOutput<'a> {
    post: &'a moltbook_core::Post,
    #[serde(skip_serializing_if = "Option::is_none")]
    comments: Option<&'a [moltbook_core::Comment]>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    init_tracing(cli.verbose);
    let reporter = error_reporter(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(core) = e.downcast_ref::<CoreError>() {
                reporter.report_error(core);
            }
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Detailed error logging only with `-v`; otherwise the `Error:` line is the
/// whole diagnostic.
fn error_reporter(verbose: bool) -> ErrorReporter {
    ErrorReporter::new()
        .with_error_reporting(verbose)
        .with_warning_reporting(false)
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "moltbook=debug,moltbook_client=debug,moltbook_core=debug"
    } else {
        "moltbook=warn,moltbook_client=warn,moltbook_core=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Flags win over environment variables, which win over the config file.
fn resolve_config(cli: &Cli) -> Result<ClientConfig, CoreError> {
    let mut config = match &cli.config {
        Some(path) => ClientConfig::from_file(path)?,
        None => ClientConfig::default(),
    }
    .apply_env_overrides()?;

    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url.clone());
    }
    if let Some(secs) = cli.timeout {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    config.validate()?;
    Ok(config)
}

fn print_json<T: Serialize + ?Sized>(data: &T) -> Result<(), CoreError> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = resolve_config(&cli).context("invalid client configuration")?;
    tracing::debug!("Using Moltbook API at {}", config.base_url);
    let client = MoltbookClient::new(config)?;

    match &cli.command {
        Commands::Profile { username } => {
            let agent = client.fetch_profile(username).await?;
            if cli.json {
                print_json(&agent)?;
            } else {
                println!("{}", format::format_user_profile(&agent));
            }
        }
        Commands::Post {
            post_id,
            comments,
            limit,
        } => {
            let (post, post_comments) = if *comments {
                let (post, list) = client.fetch_post_with_comments(post_id).await?;
                (post, Some(list))
            } else {
                (client.fetch_post(post_id).await?, None)
            };

            if cli.json {
                print_json(&PostOutput {
                    post: &post,
                    comments: post_comments.as_deref(),
                })?;
            } else {
                println!("{}", format::format_post(&post));
                if let Some(list) = &post_comments {
                    println!("{}", format::format_comments(list, *limit));
                }
            }
        }
        Commands::Submolt { name } => {
            let submolt = client.fetch_community(name).await?;
            println!("{}", format::format_submolt(&submolt));
        }
        Commands::Submolts => {
            let submolts = client.list_communities().await?;
            if cli.json {
                print_json(&submolts)?;
            } else {
                for submolt in &submolts {
                    println!("m/{}", submolt.name().unwrap_or("<unnamed>"));
                }
            }
        }
    }
    Ok(())
}
