//! NationBuilder API CLI binary.
//!
//! A command-line interface for reading from the NationBuilder API. Write
//! operations are not exposed; safe mode stays active.

use std::process::ExitCode;

use clap::Parser;
use nbee::cli::{Cli, Command};
use nbee::{
    ApiResponse, Credentials, Endpoint, Nation, NationBuilderClient, NbError, PageWalker,
    ResultSet, Table,
};
use tabled::{Table as TabledTable, Tabled};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("nbee=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let nation = match load_nation(&cli) {
        Ok(n) => n,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Hint: Pass --credentials <file> or set NATIONBUILDER_SLUG and NATIONBUILDER_API_KEY");
            return ExitCode::FAILURE;
        }
    };

    match run(nation, cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn load_nation(cli: &Cli) -> nbee::Result<Nation> {
    match &cli.credentials {
        Some(path) => Nation::from_file(path)?.ok_or_else(|| {
            NbError::ConfigMissing(format!(
                "{} must contain 'slug:' and 'api_key:' lines",
                path.display()
            ))
        }),
        None => Nation::from_credentials(&Credentials::from_env()?),
    }
}

async fn run(mut nation: Nation, cli: Cli) -> nbee::Result<()> {
    match cli.command {
        Command::Sites => handle_sites(&mut nation, cli.json).await,
        Command::Endpoints => {
            handle_endpoints();
            Ok(())
        }
        Command::List {
            endpoint,
            all,
            site,
            limit,
            max_pages,
        } => {
            let options = ListOptions {
                all,
                site,
                limit,
                max_pages,
            };
            handle_list(&nation, &endpoint, options, cli.json).await
        }
        Command::Get { path, query } => handle_get(&nation, &path, &query, cli.json).await,
    }
}

async fn handle_sites(nation: &mut Nation, json: bool) -> nbee::Result<()> {
    let response = nation.index_sites().await?;
    eprintln!("{}", response.rate_status());

    response.error_for_status()?;

    let mut sites: Vec<_> = nation.sites().values().cloned().collect();
    sites.sort_by(|a, b| site_field(a, "name").cmp(&site_field(b, "name")));

    if json {
        println!("{}", serde_json::to_string_pretty(&sites)?);
    } else {
        println!("{}", ResultSet::from(sites).to_table());
    }
    Ok(())
}

fn site_field(site: &nbee::Item, field: &str) -> String {
    site.get(field)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

fn handle_endpoints() {
    let rows: Vec<EndpointRow> = Endpoint::ALL.iter().map(EndpointRow::from).collect();
    println!("{}", TabledTable::new(rows));
}

struct ListOptions {
    all: bool,
    site: Option<String>,
    limit: Option<u32>,
    max_pages: Option<u32>,
}

async fn handle_list(
    nation: &Nation,
    endpoint_name: &str,
    options: ListOptions,
    json: bool,
) -> nbee::Result<()> {
    let endpoint = Endpoint::by_name(endpoint_name)
        .ok_or_else(|| NbError::UnknownEndpoint(endpoint_name.to_string()))?;

    let mut client = nation.client().clone();
    if let Some(limit) = options.limit {
        client = client.with_page_limit(limit);
    }

    let path = endpoint.resolve(options.site.as_deref().or(nation.default_site()))?;
    let first = client.get(&path).await?;
    eprintln!("{}", first.rate_status());
    let first = first.error_for_status()?;

    let results = if options.all {
        let mut walker = PageWalker::new(&client);
        if let Some(max_pages) = options.max_pages {
            walker = walker.with_max_pages(max_pages);
        }
        walker.walk(&first).await?
    } else {
        let page = nbee::Page::from_response(&first)?;
        let more = page.has_next();
        let mut results = ResultSet::new();
        results.extend_page(page);
        if more && !json {
            eprintln!("(more pages available, pass --all to fetch them)");
        }
        results
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        let table: Table = results.to_table();
        println!("{table}");
        println!("\n{} items", table.len());
    }
    Ok(())
}

async fn handle_get(
    nation: &Nation,
    path: &str,
    query: &[(String, String)],
    json: bool,
) -> nbee::Result<()> {
    let query: Vec<(&str, &str)> = query
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();

    let client: &NationBuilderClient = nation.client();
    let response = client.get_with_query(path, &query).await?;
    eprintln!("{}", response.rate_status());

    if !json {
        println!("HTTP {}", response.status());
    }
    print_body(&response);
    Ok(())
}

fn print_body(response: &ApiResponse) {
    match response.json::<serde_json::Value>() {
        Ok(value) => println!(
            "{}",
            serde_json::to_string_pretty(&value).unwrap_or_else(|_| response.text())
        ),
        Err(_) => println!("{}", response.text()),
    }
}

// Table row types for non-JSON output

#[derive(Tabled)]
struct EndpointRow {
    name: &'static str,
    path: String,
    verbs: String,
}

impl From<&Endpoint> for EndpointRow {
    fn from(e: &Endpoint) -> Self {
        let verbs = [
            ("GET", e.verbs.get),
            ("POST", e.verbs.post),
            ("PUT", e.verbs.put),
            ("DELETE", e.verbs.delete),
        ]
        .into_iter()
        .filter(|(_, allowed)| *allowed)
        .map(|(verb, _)| verb)
        .collect::<Vec<_>>()
        .join(", ");

        Self {
            name: e.name,
            path: if e.site_scoped {
                format!("sites/{{site}}/pages/{}", e.path)
            } else {
                e.path.to_string()
            },
            verbs,
        }
    }
}
