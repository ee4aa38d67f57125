use std::collections::HashSet;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use pubmed_gateway::{articles_to_ris, Client, ClientConfig};

#[derive(Parser)]
#[command(
    name = "pubmed-gateway",
    version,
    about = "Rate-limited access to PubMed, PMC and iCite",
    long_about = "Search PubMed, fetch abstracts and PMC full text, find similar articles \
                  and look up citation counts. Results are printed as JSON."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// API key for NCBI E-utilities (raises the rate limit to 10 requests/second)
    #[arg(long, env = "NCBI_API_KEY", global = true, hide_env_values = true)]
    api_key: Option<String>,

    /// Contact email sent with NCBI requests
    #[arg(long, env = "NCBI_EMAIL", global = true)]
    email: Option<String>,

    /// Tool name sent with NCBI requests
    #[arg(long, env = "NCBI_TOOL_NAME", global = true)]
    tool: Option<String>,

    /// HTTP request timeout in seconds
    #[arg(long, default_value_t = 30, global = true)]
    timeout: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Search PubMed and list article summaries
    Search {
        /// PubMed query (MeSH tags and field qualifiers allowed)
        query: String,
        /// Number of results to return
        #[arg(short, long, default_value_t = 50, value_parser = clap::value_parser!(u16).range(1..=200))]
        limit: u16,
        /// Index of the first result
        #[arg(long, default_value_t = 0)]
        offset: usize,
        /// Sort order: relevance or pub_date
        #[arg(short, long, default_value = "relevance")]
        sort: String,
    },
    /// Count matches and show how PubMed translated the query
    Count {
        query: String,
    },
    /// Fetch abstracts for one or more PMIDs
    Fetch {
        /// PMIDs, space or comma separated
        #[arg(required = true)]
        pmids: Vec<String>,
    },
    /// Fetch PMC full text sections and PDF link
    #[command(name = "full-text")]
    FullText {
        /// PMC ID (e.g., PMC7906746 or 7906746)
        pmcid: String,
    },
    /// Find articles similar to a PMID
    Similar {
        pmid: String,
        /// Maximum number of similar articles (1-100)
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
    /// Look up iCite citation counts for PMIDs
    Citations {
        /// PMIDs, space or comma separated (first 1000 are queried)
        #[arg(required = true)]
        pmids: Vec<String>,
    },
    /// Export PMIDs as compact RIS records
    Export {
        /// PMIDs, space or comma separated
        #[arg(required = true)]
        pmids: Vec<String>,
    },
}

impl Cli {
    fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new().with_timeout(Duration::from_secs(self.timeout));
        if let Some(api_key) = &self.api_key {
            config = config.with_api_key(api_key);
        }
        if let Some(email) = &self.email {
            config = config.with_email(email);
        }
        if let Some(tool) = &self.tool {
            config = config.with_tool(tool);
        }
        config
    }
}

/// Split comma-separated arguments, trim, and drop blanks and repeats
fn clean_ids(raw: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.iter()
        .flat_map(|arg| arg.split(','))
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .filter(|id| seen.insert(id.to_string()))
        .map(str::to_string)
        .collect()
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_from_env("LOG_LEVEL"))
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.client_config();
    info!(
        rate_limit = config.effective_rate_limit(),
        api_key = config.api_key.is_some(),
        "Starting pubmed-gateway"
    );
    let client = Client::with_config(&config).context("Failed to create HTTP clients")?;

    match &cli.command {
        Commands::Search {
            query,
            limit,
            offset,
            sort,
        } => {
            let page = client
                .pubmed
                .search_summaries(query, usize::from(*limit), *offset, sort)
                .await
                .context("Search failed")?;
            print_json(&page)
        }
        Commands::Count { query } => {
            let count = client.pubmed.count(query).await.context("Count failed")?;
            print_json(&count)
        }
        Commands::Fetch { pmids } => {
            let abstracts = client
                .pubmed
                .fetch_abstracts(&clean_ids(pmids))
                .await
                .context("Failed to fetch abstracts")?;
            print_json(&abstracts)
        }
        Commands::FullText { pmcid } => {
            let full_text = client.pmc.get_full_text(pmcid).await;
            print_json(&full_text)
        }
        Commands::Similar { pmid, limit } => {
            let similar = client.pubmed.find_similar(pmid, *limit).await;
            print_json(&similar)
        }
        Commands::Citations { pmids } => {
            let records = client.citations.get_citation_counts(&clean_ids(pmids)).await;
            print_json(&records)
        }
        Commands::Export { pmids } => {
            let abstracts = client
                .pubmed
                .fetch_abstracts(&clean_ids(pmids))
                .await
                .context("Failed to fetch abstracts")?;
            print!("{}", articles_to_ris(&abstracts));
            Ok(())
        }
    }
}
