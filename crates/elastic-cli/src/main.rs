//! Helios Elastic command-line client (`hes`).
//!
//! Runs searches, gets, SQL queries and delete-by-time jobs against one
//! Elasticsearch node and prints the normalized result as JSON.

mod config;

use clap::Parser;
use helios_elastic::types::{DeleteByTime, ExistsQuery, GetParams, MatchQuery, TermQuery};
use helios_elastic::{ElasticProvider, ElasticsearchEngine, SearchResult};
use serde_json::Value;
use tracing::info;

use crate::config::{CliConfig, Command, SearchQuery, term_value};

/// Installs the global tracing subscriber. `RUST_LOG` overrides `level`.
fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "helios_elastic={level},helios_elastic_cli={level},warn"
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

async fn search(
    provider: &ElasticProvider<ElasticsearchEngine>,
    params: helios_elastic::SearchParams,
    query: SearchQuery,
) -> anyhow::Result<SearchResult<Value>> {
    let page = match query {
        SearchQuery::All => provider.search_all(&params).await?,
        SearchQuery::Term { field, value } => {
            provider
                .search_by_term(&TermQuery::new(params, field, term_value(&value)))
                .await?
        }
        SearchQuery::Match { field, text } => {
            provider
                .search_by_query(&MatchQuery::new(params, field, text))
                .await?
        }
        SearchQuery::Exists { field } => {
            provider
                .search_by_exists(&ExistsQuery::new(params, field))
                .await?
        }
    };
    Ok(page)
}

async fn run(config: CliConfig) -> anyhow::Result<Value> {
    let provider = ElasticProvider::connect(&config.to_elastic_config())?;

    let output = match config.command {
        Command::Search { window, query } => {
            let page = search(&provider, window.to_search_params(), query).await?;
            info!(total = page.total, returned = page.len(), "Search complete");
            serde_json::to_value(page)?
        }
        Command::Get { index, id, fields } => {
            let params = GetParams::new(index, id).with_fields(fields);
            provider.get_by_id::<Value>(&params).await?
        }
        Command::Sql { query } => {
            let rows = provider.run_sql_query::<Value>(&query).await?;
            Value::Array(rows)
        }
        Command::DeleteByTime {
            index,
            field,
            seconds,
            format,
        } => {
            let request = DeleteByTime::new(index, field, seconds, format);
            let ack = provider.delete_by_time(&request).await?;
            info!(index = %request.index, "Delete by time accepted");
            ack
        }
    };

    Ok(output)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    info!(
        connection = %config.connection,
        request_timeout_ms = config.request_timeout,
        "Starting Helios Elastic client"
    );

    let output = run(config).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
