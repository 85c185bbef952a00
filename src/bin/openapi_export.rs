//! Print an OpenAPI group as JSON.
//!
//! Usage: `cargo run --bin openapi_export -- [application|actuator]`

use anyhow::{anyhow, Context, Result};
use twiggle::api::openapi::{find_group, APPLICATION_GROUP};

fn main() -> Result<()> {
    let group = match std::env::args().nth(1) {
        Some(name) => find_group(&name).ok_or_else(|| anyhow!("unknown API group '{}'", name))?,
        None => APPLICATION_GROUP,
    };

    let doc = (group.openapi)();
    let json = serde_json::to_string_pretty(&doc).context("Failed to serialize OpenAPI document")?;

    println!("{}", json);
    eprintln!("Generated OpenAPI document for {}", group.name);

    Ok(())
}
