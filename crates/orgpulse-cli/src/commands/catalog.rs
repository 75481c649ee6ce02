//! `orgpulse exists` and `orgpulse entities`.

use anyhow::Result;
use orgpulse_access::DataAccess;
use serde_json::json;

pub async fn run_exists(access: &DataAccess, table: &str) -> Result<()> {
    let verdict = access.probe(table).await;
    println!(
        "{}",
        serde_json::to_string_pretty(&json!({
            "table": table,
            "exists": verdict.exists(),
            "verdict": verdict,
        }))?
    );
    Ok(())
}

pub async fn run_entities(access: &DataAccess, records: bool) -> Result<()> {
    if records {
        let mut entities = access.list_entities().await;
        entities.sort_by_key(|e| e.internal_name.to_lowercase());
        println!("{}", serde_json::to_string_pretty(&entities)?);
    } else {
        let mut names = access.list_known_entities().await;
        names.sort_by_key(|n| n.to_lowercase());
        println!("{}", serde_json::to_string_pretty(&names)?);
    }
    Ok(())
}
