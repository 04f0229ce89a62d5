use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};

use crate::api::client::HttpClient;
use crate::batch::FailurePolicy;
use crate::config::{self, Config, Setting};
use crate::flows::{self, projects::ProjectSettings, BatchOptions, RunSummary};

/// Batch-create Asana projects, portfolios and tasks from CSV files.
#[derive(Parser, Debug)]
#[command(name = "asana-batch", version)]
pub struct Cli {
    /// TOML config file (default: ~/.asana-batch/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Skip TLS certificate verification (for intercepting corporate proxies)
    #[arg(long, global = true)]
    pub insecure: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create one project per CSV row (columns: name, notes)
    Projects {
        #[command(flatten)]
        batch: BatchArgs,

        /// Create each project inside ASANA_PORTFOLIO_GID
        #[arg(long)]
        assign_portfolio: bool,
    },
    /// Create a single portfolio in the workspace
    Portfolio {
        /// Portfolio name
        #[arg(long)]
        name: String,

        #[arg(short, long, default_value = "./output")]
        output_dir: PathBuf,
    },
    /// Create one task per CSV row (columns: project_gid, name, notes,
    /// assignee_gid, due_on, start_on, followers)
    Tasks {
        #[command(flatten)]
        batch: BatchArgs,
    },
    /// Add the projects from a previous `projects` report to ASANA_PORTFOLIO_GID
    AddToPortfolio {
        #[command(flatten)]
        batch: BatchArgs,
    },
}

#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Input file (.csv, or .json for a previous report)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Directory for the JSON and CSV reports
    #[arg(short, long, default_value = "./output")]
    pub output_dir: PathBuf,

    /// What to do when a row's request fails
    #[arg(long, value_enum)]
    pub on_error: Option<FailurePolicy>,

    /// Validate input and print request bodies without calling the API
    #[arg(long)]
    pub dry_run: bool,
}

impl BatchArgs {
    fn into_options(self, default_input: &str, default_policy: FailurePolicy) -> BatchOptions {
        BatchOptions {
            input: self.input.unwrap_or_else(|| PathBuf::from(default_input)),
            output_dir: self.output_dir,
            policy: self.on_error.unwrap_or(default_policy),
            dry_run: self.dry_run,
        }
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    let file = config::load_file_config(cli.config.as_deref())?;
    let mut config = Config::resolve(file, |key| std::env::var(key).ok())?;
    if cli.insecure {
        config.insecure_tls = true;
    }

    match cli.command {
        Command::Projects {
            batch,
            assign_portfolio,
        } => {
            let (token, settings) = if assign_portfolio {
                let [token, workspace_gid, team_gid, portfolio_gid] = config.require([
                    Setting::Token,
                    Setting::Workspace,
                    Setting::Team,
                    Setting::Portfolio,
                ])?;
                let settings = ProjectSettings {
                    workspace_gid,
                    team_gid,
                    portfolio_gid: Some(portfolio_gid),
                };
                (token, settings)
            } else {
                let [token, workspace_gid, team_gid] =
                    config.require([Setting::Token, Setting::Workspace, Setting::Team])?;
                let settings = ProjectSettings {
                    workspace_gid,
                    team_gid,
                    portfolio_gid: None,
                };
                (token, settings)
            };
            let opts = batch.into_options("./input/projects.csv", FailurePolicy::Abort);
            let client = HttpClient::new(&config, &token)?;
            let summary = flows::projects::run(&client, &settings, &opts)
                .await
                .with_context(|| format!("Project run over {} failed", opts.input.display()))?;
            print_summary(&summary);
        }
        Command::Portfolio { name, output_dir } => {
            let [token, workspace_gid] = config.require([Setting::Token, Setting::Workspace])?;
            let client = HttpClient::new(&config, &token)?;
            let (_, paths) = flows::portfolio::create(&client, &name, &workspace_gid, &output_dir)
                .await
                .context("Failed to create portfolio")?;
            println!("Output JSON: {}", paths.json.display());
        }
        Command::Tasks { batch } => {
            let [token] = config.require([Setting::Token])?;
            let opts = batch.into_options("./input/tasks.csv", FailurePolicy::Continue);
            let client = HttpClient::new(&config, &token)?;
            let summary = flows::tasks::run(&client, &opts)
                .await
                .with_context(|| format!("Task run over {} failed", opts.input.display()))?;
            print_summary(&summary);
        }
        Command::AddToPortfolio { batch } => {
            let [token, portfolio_gid] = config.require([Setting::Token, Setting::Portfolio])?;
            let opts = batch.into_options("./output/projects.created.json", FailurePolicy::Continue);
            let client = HttpClient::new(&config, &token)?;
            let summary = flows::portfolio::add_projects(&client, &portfolio_gid, &opts)
                .await
                .with_context(|| format!("Portfolio run over {} failed", opts.input.display()))?;
            print_summary(&summary);
        }
    }

    Ok(())
}

fn print_summary(summary: &RunSummary) {
    match &summary.reports {
        Some(paths) => {
            let t = &summary.tally;
            println!();
            println!(
                "Done: {} rows, {} ok, {} failed, {} skipped",
                t.total(), t.succeeded, t.failed, t.skipped
            );
            println!("Output JSON: {}", paths.json.display());
            println!("Output CSV : {}", paths.csv.display());
        }
        None => println!("\nDry run: {} rows valid, nothing sent", summary.rows),
    }
}
