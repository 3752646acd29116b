use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use lodlens_common::{load_config, ClientConfig};
use sparql_client::{Axis, HttpTransport, SparqlClient};

#[derive(Parser)]
#[command(name = "lodlens-explore")]
#[command(about = "Describe a linked-data resource and print its normalized neighborhood as JSON")]
#[command(version)]
struct Cli {
    /// IRI (or blank-node label) to describe
    iri: String,

    /// Which query to run
    #[arg(short, long, value_enum, default_value_t = AxisArg::DocumentUri)]
    axis: AxisArg,

    /// TOML client config
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// SPARQL endpoint, overrides the config file
    #[arg(short, long, env = "LODLENS_ENDPOINT")]
    endpoint: Option<String>,

    /// Also fetch resources linking to the IRI (document-uri only)
    #[arg(long)]
    inverse: bool,

    /// Also fetch owl:sameAs / skos:exactMatch aliases (implies --inverse)
    #[arg(long)]
    same_as: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AxisArg {
    Document,
    Bnode,
    DocumentUri,
    Inverse,
    InverseSameAs,
}

impl From<AxisArg> for Axis {
    fn from(arg: AxisArg) -> Self {
        match arg {
            AxisArg::Document => Axis::Document,
            AxisArg::Bnode => Axis::Bnode,
            AxisArg::DocumentUri => Axis::DocumentUri,
            AxisArg::Inverse => Axis::Inverse,
            AxisArg::InverseSameAs => Axis::InverseSameAs,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("lodlens=info".parse()?)
                .add_directive("sparql_client=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = build_client(&cli)?;

    let axis = Axis::from(cli.axis);
    info!(%axis, iri = %cli.iri, "Describing resource");

    let result = match axis {
        Axis::Document => client.document(&cli.iri).await,
        Axis::Bnode => client.bnode(&cli.iri).await,
        Axis::DocumentUri => client.document_uri(&cli.iri).await,
        Axis::Inverse => client.inverse(&cli.iri).await,
        Axis::InverseSameAs => client.inverse_same_as(&cli.iri).await,
    }
    .with_context(|| format!("{axis} query for {} failed", cli.iri))?;

    info!(
        values = result.values.len(),
        related = result.related.len(),
        bnodes = result.bnodes.len(),
        grouped = result.grouped.len(),
        "Query complete"
    );

    let output = if cli.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{output}");
    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<(ClientConfig, PathBuf)> {
    let (mut config, base) = match &cli.config {
        Some(path) => {
            let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
            (load_config(path)?, base)
        }
        None => (ClientConfig::default(), PathBuf::from(".")),
    };

    if let Some(endpoint) = &cli.endpoint {
        config.connection.endpoint = endpoint.clone();
    }
    if cli.inverse || cli.same_as {
        config.do_inverse = true;
    }
    if cli.same_as {
        config.do_inverse_same_as = true;
    }

    Ok((config, base))
}

fn build_client(cli: &Cli) -> Result<SparqlClient> {
    let (config, base) = resolve_config(cli)?;

    let transport = HttpTransport::new(&config.connection)?;
    info!(endpoint = transport.endpoint(), "Using SPARQL endpoint");

    let mut client = SparqlClient::new(Box::new(transport), &config)?;
    if let Some(dictionary) = config.load_dictionary(&base)? {
        client = client.with_dictionary(Arc::new(dictionary));
    }
    Ok(client)
}
