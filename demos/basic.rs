//! Basic example demonstrating the NationBuilder API client.
//!
//! Run with:
//! ```
//! NATIONBUILDER_SLUG=my-nation NATIONBUILDER_API_KEY=your-key cargo run --example basic
//! ```

use nbee::{Endpoint, Nation, ResultFormat, Results};

#[tokio::main]
async fn main() -> nbee::Result<()> {
    // Initialize tracing so rate-limit status lines are visible
    tracing_subscriber::fmt::init();

    println!("Creating NationBuilder client...");
    let mut nation = Nation::from_env()?;
    println!("Connected to: {}", nation.client().base_url());

    // Load the site directory
    println!("\n--- Sites ---");
    let response = nation.index_sites().await?;
    println!("{}", response.rate_status());
    for (name, site) in nation.sites() {
        println!("  - {} ({})", name, site.get("slug").unwrap_or(&serde_json::Value::Null));
    }

    // First page of people
    println!("\n--- People (first page) ---");
    let first = nation.people().index(&[]).await?;
    let page = nbee::Page::from_response(&first)?;
    println!(
        "{} people on the first page, more available: {}",
        page.len(),
        page.has_next()
    );

    // Every page, as a table
    println!("\n--- People (all pages) ---");
    if let Results::Table(table) = nation.all_results(&first, ResultFormat::Table).await? {
        println!("{} rows, columns: {}", table.len(), table.columns().join(", "));
    }

    // Writes are blocked while safe mode is active
    println!("\n--- Safe Mode ---");
    let outcome = nation.people().tag_person(1, "example").await?;
    println!("tag_person blocked: {}", outcome.is_blocked());

    // Tags, walked straight from the resource
    let tags = nation.resource(Endpoint::TAGS)?;
    let all_tags = tags.all(&[], ResultFormat::Items).await?;
    println!("\n{} tags", all_tags.len());

    Ok(())
}
