use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing::info;

use phishsweep::config::Config;
use phishsweep::feeds::{CommercialFeed, CommunityFeed, FeedFetcher};
use phishsweep::output::terminal;
use phishsweep::vendor::criteria::SearchCriteria;
use phishsweep::vendor::models::MitigationAction;
use phishsweep::vendor::VendorClients;

/// phishsweep: find, quarantine and purge phishing email in Office 365.
///
/// Uses the Cloud App Security sweeping and mitigation APIs, and can pull
/// known-phishing URLs from PhishTank and OpenPhish to hunt for.
#[derive(Parser)]
#[command(name = "phishsweep", version, about)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search mailboxes and list matching emails
    Search(SearchArgs),

    /// Search mailboxes and quarantine matching emails
    Pull {
        #[command(flatten)]
        search: SearchArgs,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Search mailboxes and permanently delete matching emails
    Purge {
        #[command(flatten)]
        search: SearchArgs,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Print URLs from the phishing feeds
    Feeds {
        /// Which feed to pull
        #[arg(long, value_enum, default_value = "all")]
        source: FeedSource,
    },

    /// Sweep feed URLs across a list of mailboxes
    Sweep {
        /// File with one mailbox address per line
        #[arg(long)]
        mailboxes: Option<PathBuf>,

        /// Which feed to pull URLs from
        #[arg(long, value_enum, default_value = "all")]
        source: FeedSource,

        /// Quarantine everything found
        #[arg(long)]
        quarantine: bool,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args)]
struct SearchArgs {
    /// Email sender to search for
    #[arg(short, long)]
    sender: Option<String>,

    /// URL to search for
    #[arg(short, long)]
    url: Option<String>,

    /// Email subject to search for (quote it)
    #[arg(long)]
    subject: Option<String>,

    /// SHA-1 hash of an attachment to search for
    #[arg(long)]
    hash: Option<String>,

    /// Attachment file extension to search for, without the dot
    #[arg(long)]
    file_extension: Option<String>,

    /// Only search this mailbox
    #[arg(long)]
    mailbox: Option<String>,
}

impl SearchArgs {
    fn into_criteria(self) -> SearchCriteria {
        SearchCriteria {
            sender: self.sender,
            subject: self.subject,
            file_extension: self.file_extension,
            file_hash: self.hash,
            url: self.url,
            mailbox: self.mailbox,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FeedSource {
    Community,
    Commercial,
    All,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let default_filter = match cli.verbose {
        0 => "phishsweep=info",
        1 => "phishsweep=debug",
        _ => "phishsweep=trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();

    let config = Config::load()?;

    match cli.command {
        Commands::Search(args) => {
            config.require_vendor()?;
            let clients = VendorClients::from_config(&config)?;

            let criteria = args.into_criteria();
            let records = clients.search.search(&criteria).await?;
            terminal::display_matches(&records);
        }

        Commands::Pull { search, yes } => {
            mitigate(&config, search.into_criteria(), MitigationAction::Quarantine, yes).await?;
        }

        Commands::Purge { search, yes } => {
            mitigate(&config, search.into_criteria(), MitigationAction::Delete, yes).await?;
        }

        Commands::Feeds { source } => {
            for feed in build_feeds(&config, source)? {
                let urls = feed.fetch().await?;
                terminal::display_feed_urls(feed.name(), &urls);
            }
        }

        Commands::Sweep {
            mailboxes,
            source,
            quarantine,
            yes,
        } => {
            config.require_vendor()?;
            let clients = VendorClients::from_config(&config)?;

            let mailboxes = match mailboxes {
                Some(path) => phishsweep::pipeline::sweep::load_mailboxes(&path)?,
                None => Vec::new(),
            };

            println!("Pulling phishing feeds...");
            let feeds = build_feeds(&config, source)?;
            let urls = phishsweep::pipeline::sweep::collect_feed_urls(&feeds).await?;

            if urls.is_empty() {
                println!("Feeds returned no URLs. Nothing to sweep.");
                return Ok(());
            }

            let scope = if mailboxes.is_empty() {
                "all mailboxes".to_string()
            } else {
                format!("{} mailboxes", mailboxes.len())
            };
            println!("Sweeping {} URLs across {}...", urls.len(), scope);

            let summary =
                phishsweep::pipeline::sweep::run(&clients.search, &urls, &mailboxes, true).await;

            terminal::display_matches(&summary.records);
            if summary.failed_searches > 0 {
                println!(
                    "  {} {} of {} searches failed (see log)",
                    "Warning:".yellow(),
                    summary.failed_searches,
                    summary.searches
                );
            }

            if quarantine && !summary.records.is_empty() {
                apply(&clients, &summary.records, MitigationAction::Quarantine, yes).await?;
            }
        }
    }

    Ok(())
}

/// Search, confirm, then apply `action` to whatever was found.
async fn mitigate(
    config: &Config,
    criteria: SearchCriteria,
    action: MitigationAction,
    yes: bool,
) -> Result<()> {
    config.require_vendor()?;
    let clients = VendorClients::from_config(config)?;

    let records = clients.search.search(&criteria).await?;
    terminal::display_matches(&records);

    if records.is_empty() {
        return Ok(());
    }

    apply(&clients, &records, action, yes).await
}

async fn apply(
    clients: &VendorClients,
    records: &[phishsweep::vendor::models::EmailRecord],
    action: MitigationAction,
    yes: bool,
) -> Result<()> {
    if !yes {
        let mut stdin = std::io::stdin().lock();
        if !terminal::confirm_mitigation(action, records.len(), &mut stdin)? {
            return Ok(());
        }
    }
    info!(count = records.len(), action = %action, "Mitigation acknowledged");

    let report = clients.mitigation.mitigate(action, records).await;
    terminal::display_report(&report);

    if !report.is_complete_success() {
        anyhow::bail!(
            "{} of {} emails could not be {}",
            report.failed().count(),
            report.outcomes.len(),
            action.past_tense()
        );
    }
    Ok(())
}

/// Build the feed fetchers selected by `source`.
fn build_feeds(config: &Config, source: FeedSource) -> Result<Vec<Box<dyn FeedFetcher>>> {
    let mut feeds: Vec<Box<dyn FeedFetcher>> = Vec::new();

    if matches!(source, FeedSource::Community | FeedSource::All) {
        config.require_community_feed()?;
        feeds.push(Box::new(CommunityFeed::new(&config.feeds)?));
    }
    if matches!(source, FeedSource::Commercial | FeedSource::All) {
        feeds.push(Box::new(CommercialFeed::new(&config.feeds)?));
    }

    Ok(feeds)
}
