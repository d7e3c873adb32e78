use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use std::path::PathBuf;

use crate::auth::Token;
use crate::config::{Config, OutputFormat};
use crate::output;
use crate::providers::{GitHubProjectProvider, GITHUB_GRAPHQL_URL};

#[derive(Parser)]
#[command(name = "boardgraph")]
#[command(author, version, about = "Export a GitHub Projects board as a knowledge graph", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Write the exported graph to this file instead of stdout
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(short, long, global = true, default_value_t = false)]
    pretty: bool,
}

/// Board coordinates shared by every subcommand. Flags win over the
/// configuration file.
#[derive(Args)]
struct BoardArgs {
    /// Organization login owning the board
    #[arg(long)]
    org: Option<String>,

    /// Repository holding the issues backing the cards
    #[arg(long)]
    repo: Option<String>,

    /// Project number within the organization
    #[arg(short = 'P', long)]
    project: Option<i64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the board and export it as graph nodes and edges
    Export {
        #[command(flatten)]
        board: BoardArgs,

        /// Most-recent comments fetched per card
        #[arg(long)]
        comments: Option<usize>,
    },
    /// Move a card to a new Status column
    MoveCard {
        #[command(flatten)]
        board: BoardArgs,

        /// Board item id of the card
        #[arg(long)]
        item: String,

        /// Exact name of the target Status option
        #[arg(long)]
        column: String,
    },
    /// Change a card's Timeslot
    SetTimeslot {
        #[command(flatten)]
        board: BoardArgs,

        /// Board item id of the card
        #[arg(long)]
        item: String,

        /// Exact name of the target Timeslot option
        #[arg(long)]
        timeslot: String,
    },
    /// Change a card's Duration
    SetDuration {
        #[command(flatten)]
        board: BoardArgs,

        /// Board item id of the card
        #[arg(long)]
        item: String,

        /// Exact name of the target Duration option
        #[arg(long)]
        duration: String,
    },
}

impl Cli {
    pub async fn execute(&self) -> Result<()> {
        let config = Config::load(self.config.as_deref())?;

        match &self.command {
            Commands::Export { board, comments } => {
                self.execute_export(&config, board, *comments).await
            }
            Commands::MoveCard {
                board,
                item,
                column,
            } => {
                let provider = build_provider(&config, board, None)?;
                provider.move_card(item, column).await?;
                Ok(())
            }
            Commands::SetTimeslot {
                board,
                item,
                timeslot,
            } => {
                let provider = build_provider(&config, board, None)?;
                provider.set_timeslot(item, timeslot).await?;
                Ok(())
            }
            Commands::SetDuration {
                board,
                item,
                duration,
            } => {
                let provider = build_provider(&config, board, None)?;
                provider.set_duration(item, duration).await?;
                Ok(())
            }
        }
    }

    async fn execute_export(
        &self,
        config: &Config,
        board: &BoardArgs,
        comments: Option<usize>,
    ) -> Result<()> {
        let provider = build_provider(config, board, comments)?;
        let graph = provider.collect_graph().await?;

        info!(
            "Built graph with {} nodes and {} edges",
            graph.node_count(),
            graph.edge_count()
        );

        let pretty = self.pretty || config.output.pretty;

        if let Some(output_path) = &self.output {
            let mut file = std::fs::File::create(output_path)
                .with_context(|| format!("Failed to create {}", output_path.display()))?;
            output::export_json(&graph, pretty, &mut file)?;
            info!("Graph written to: {}", output_path.display());
            output::print_summary(&graph);
        } else if config.output.format == OutputFormat::Json {
            output::export_json(&graph, pretty, &mut std::io::stdout())?;
        } else {
            output::print_summary(&graph);
        }

        Ok(())
    }
}

fn build_provider(
    config: &Config,
    board: &BoardArgs,
    comments: Option<usize>,
) -> Result<GitHubProjectProvider> {
    // Credential check happens before anything touches the network.
    let token = Token::from_env()?;

    let org = board
        .org
        .clone()
        .or_else(|| config.board.org.clone())
        .context("Missing organization: pass --org or set board.org in the config file")?;
    let repo = board
        .repo
        .clone()
        .or_else(|| config.board.repo.clone())
        .context("Missing repository: pass --repo or set board.repo in the config file")?;
    let project = board
        .project
        .or(config.board.project)
        .context("Missing project number: pass --project or set board.project in the config file")?;
    let comment_limit = comments.unwrap_or(config.board.comment_limit);

    Ok(GitHubProjectProvider::new(
        GITHUB_GRAPHQL_URL,
        org,
        repo,
        project,
        comment_limit,
        &token,
    )?)
}
