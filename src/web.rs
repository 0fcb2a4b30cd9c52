#![cfg(not(tarpaulin_include))]

use carfilter::app;
use carfilter::filter::EmptySelectionBehavior;
use carfilter::loader;
use std::env;

/// Main entry point for the web application
///
/// Loads the catalog spreadsheet once, then serves the filtering UI.
///
/// # Arguments
/// * First argument: path to the catalog file (default `data/catalog.xlsx`)
/// * Second argument: `show-all` or `show-none` for the empty-filter view
///
/// # Returns
/// * `Result<(), Box<dyn std::error::Error>>` - Success or error object
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let resource = args
        .get(1)
        .cloned()
        .unwrap_or_else(|| "data/catalog.xlsx".to_string());
    let behavior = args
        .get(2)
        .and_then(|arg| EmptySelectionBehavior::parse(arg))
        .unwrap_or_default();

    // The one load of the session; failure degrades to an empty catalog
    let rows = loader::load_catalog_or_empty(&resource);
    log::info!("Loaded {} catalog rows from {}", rows.len(), resource);

    app::run(rows, behavior).await
}
