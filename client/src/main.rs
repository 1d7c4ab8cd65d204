//! credfeed
//!
//! Command line client for the credit-score agent program and for the
//! Switchboard pull feeds it reads prices from.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use credfeed_client::{
    agent_client::{AgentClient, InitOutcome},
    config::{Cluster, Config, CONFIG_ENV, DEFAULT_CONFIG_PATH},
    crossbar::CrossbarClient,
    keypair::load_keypair,
    poller::Poller,
    pull_feed::FeedCreator,
    simulator::SimulatorClient,
};
use credfeed_jobs::{presets, JobsDocument};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{commitment_config::CommitmentConfig, pubkey::Pubkey, signature::Signer};
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "credfeed", version, about)]
struct Cli {
    /// Config file
    #[arg(long, global = true, env = CONFIG_ENV)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write a default devnet config
    InitConfig {
        #[arg(default_value = DEFAULT_CONFIG_PATH)]
        path: PathBuf,
    },

    #[command(flatten)]
    Network(NetworkCommand),
}

/// Commands that run against a loaded config
#[derive(Debug, Subcommand)]
enum NetworkCommand {
    /// Create the agent and its LLM context
    Initialize,

    /// Ask the agent to score a profile
    Interact {
        text: String,

        /// Wait for the oracle callback and print the score
        #[arg(long)]
        wait: bool,

        /// Give up waiting after this many polls
        #[arg(long, default_value_t = 30)]
        max_polls: usize,
    },

    /// Print the stored credit score
    Score {
        /// Defaults to the payer
        user: Option<Pubkey>,
    },

    /// Run jobs once on the simulation service
    SimulateJobs {
        /// `{"jobs": [...]}` file; defaults to the Umbra/USDC swap job
        #[arg(long)]
        jobs: Option<PathBuf>,

        #[arg(long)]
        cluster: Option<Cluster>,
    },

    /// Store jobs and create a pull feed bound to the configured queue
    CreateFeed {
        #[arg(long)]
        jobs: Option<PathBuf>,

        /// Overrides the configured feed name
        #[arg(long)]
        name: Option<String>,
    },

    /// Periodically simulate feeds and log their values
    WatchFeeds {
        feeds: Vec<Pubkey>,

        /// Stop after this many rounds
        #[arg(long)]
        iterations: Option<usize>,

        /// Seconds between rounds; defaults to the configured interval
        #[arg(long)]
        interval: Option<u64>,
    },

    /// Log a feed's value on chain through the consumer program
    ConsumeFeed { feed: Pubkey },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Command::InitConfig { path } => Config::write_default(&path.to_string_lossy()),
        Command::Network(command) => run(command, load_config(cli.config.as_deref())).await,
    }
}

async fn run(command: NetworkCommand, config: Config) -> Result<()> {
    log::debug!("Using RPC: {}", config.rpc_url);

    match command {
        NetworkCommand::Initialize => initialize(&config).await,
        NetworkCommand::Interact { text, wait, max_polls } => {
            interact(&config, &text, wait, max_polls).await
        }
        NetworkCommand::Score { user } => score(&config, user).await,
        NetworkCommand::SimulateJobs { jobs, cluster } => {
            simulate_jobs(&config, jobs, cluster.unwrap_or(config.cluster)).await
        }
        NetworkCommand::CreateFeed { jobs, name } => create_feed(&config, jobs, name).await,
        NetworkCommand::WatchFeeds {
            feeds,
            iterations,
            interval,
        } => watch_feeds(&config, feeds, iterations, interval).await,
        NetworkCommand::ConsumeFeed { feed } => consume_feed(&config, &feed).await,
    }
}

fn load_config(path: Option<&std::path::Path>) -> Config {
    let loaded = match path {
        Some(path) => Config::load_from(&path.to_string_lossy()),
        None => Config::load(),
    };
    loaded.unwrap_or_else(|e| {
        log::warn!("Failed to load config ({:#}), using default devnet config", e);
        Config::default_devnet()
    })
}

fn rpc_client(config: &Config) -> RpcClient {
    RpcClient::new_with_commitment(config.rpc_url.clone(), CommitmentConfig::confirmed())
}

fn load_jobs(path: Option<PathBuf>) -> Result<JobsDocument> {
    match path {
        Some(path) => JobsDocument::load(&path)
            .with_context(|| format!("Failed to load jobs from {}", path.display())),
        None => Ok(JobsDocument::new(vec![presets::umbra_usdc_job()])),
    }
}

async fn initialize(config: &Config) -> Result<()> {
    let rpc = rpc_client(config);
    let payer = load_keypair(&config.keypair_path)?;
    let client = AgentClient::new(&rpc, &payer, config.agent_program, config.oracle_program);

    match client.initialize().await? {
        InitOutcome::Initialized {
            signature,
            agent,
            context,
        } => {
            log::info!("Agent {} created with context {}", agent, context);
            println!("{}", signature);
        }
        InitOutcome::AlreadyInitialized { agent, context } => {
            let ctx = client.fetch_context(&context).await?;
            log::info!("Agent {} already exists, context {}", agent, context);
            println!("{}", ctx.text);
        }
    }
    Ok(())
}

async fn interact(config: &Config, text: &str, wait: bool, max_polls: usize) -> Result<()> {
    let rpc = rpc_client(config);
    let payer = load_keypair(&config.keypair_path)?;
    let client = AgentClient::new(&rpc, &payer, config.agent_program, config.oracle_program);
    log::info!("Using payer {}", payer.pubkey());

    let interaction = client.interact(text).await?;
    println!("{}", interaction.signature);

    if wait {
        let poller = Poller::new(Duration::from_secs(config.poll_interval_secs.max(1)))
            .with_max_iterations(max_polls);
        let score = client
            .wait_for_score(&payer.pubkey(), &interaction.interaction, &poller)
            .await
            .context("Oracle did not answer in time")?;
        println!("Credit score: {}", score.score);
    }
    Ok(())
}

async fn score(config: &Config, user: Option<Pubkey>) -> Result<()> {
    let rpc = rpc_client(config);
    let payer = load_keypair(&config.keypair_path)?;
    let client = AgentClient::new(&rpc, &payer, config.agent_program, config.oracle_program);
    let user = user.unwrap_or_else(|| payer.pubkey());

    match client.fetch_cred_score(&user).await? {
        Some(score) => println!("Credit score of {}: {}", user, score.score),
        None => println!("No credit score stored for {}", user),
    }
    Ok(())
}

async fn simulate_jobs(config: &Config, jobs: Option<PathBuf>, cluster: Cluster) -> Result<()> {
    let doc = load_jobs(jobs)?;
    log::info!("Running simulation...");
    println!("{}", doc.to_json()?);

    let simulator = SimulatorClient::new(&config.simulate_url);
    match simulator.simulate_jobs(cluster, &doc).await {
        Ok(response) => {
            log::info!("Response is good ({})", response.status);
            println!("{}", serde_json::to_string_pretty(&response.body)?);
            Ok(())
        }
        Err(e) => {
            log::error!("Response is bad: {}", e);
            Err(e.into())
        }
    }
}

async fn create_feed(config: &Config, jobs: Option<PathBuf>, name: Option<String>) -> Result<()> {
    let doc = load_jobs(jobs)?;
    let mut settings = config.feed.clone();
    if let Some(name) = name {
        settings.name = name;
    }

    let rpc = rpc_client(config);
    let payer = load_keypair(&config.keypair_path)?;
    log::info!("Using payer {}", payer.pubkey());
    let crossbar = CrossbarClient::new(&config.crossbar_url);

    let creator = FeedCreator {
        rpc: &rpc,
        crossbar: &crossbar,
        payer: &payer,
        switchboard_program: config.switchboard_program,
        queue: config.queue,
        compute_unit_price: config.compute_unit_price,
        compute_unit_limit_multiple: config.compute_unit_limit_multiple,
    };
    let created = creator.create(&doc, &settings).await?;

    println!("Feed {} initialized: {}", created.feed, created.signature);
    Ok(())
}

async fn watch_feeds(
    config: &Config,
    feeds: Vec<Pubkey>,
    iterations: Option<usize>,
    interval: Option<u64>,
) -> Result<()> {
    let feeds = if feeds.is_empty() {
        config.watch_feeds.clone()
    } else {
        feeds
    };
    anyhow::ensure!(!feeds.is_empty(), "No feeds to watch");

    let crossbar = CrossbarClient::new(&config.crossbar_url);
    let secs = interval.unwrap_or(config.poll_interval_secs).max(1);
    let mut poller = Poller::new(Duration::from_secs(secs));
    poller.max_iterations = iterations;

    log::info!("Watching {} feed(s) every {}s", feeds.len(), secs);
    let cluster = config.cluster;
    let crossbar = &crossbar;
    let feeds = &feeds;
    let stats = poller
        .run(
            move |_| async move {
                let simulations = crossbar.simulate_solana_feeds(cluster, feeds).await?;
                for sim in &simulations {
                    match sim.value() {
                        Some(value) => log::info!("Feed {} value: {}", sim.feed, value),
                        None => log::warn!("Feed {} returned no results", sim.feed),
                    }
                }
                Ok::<_, credfeed_client::ClientError>(())
            },
            shutdown_signal(),
        )
        .await;

    log::info!("Polls: {} ok, {} failed", stats.succeeded, stats.failed);
    Ok(())
}

async fn shutdown_signal() {
    until_signal(tokio::signal::ctrl_c()).await
}

/// Resolves with `signal`; never resolves if the listener failed
async fn until_signal<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        log::error!("Failed to listen for Ctrl-C ({}), stop with --iterations", e);
        std::future::pending::<()>().await;
    }
}

async fn consume_feed(config: &Config, feed: &Pubkey) -> Result<()> {
    let rpc = rpc_client(config);
    let payer = load_keypair(&config.keypair_path)?;
    let client = AgentClient::new(&rpc, &payer, config.agent_program, config.oracle_program);

    let signature = client.consume_feed(&config.feed_program, feed).await?;
    println!("{}", signature);
    Ok(())
}
