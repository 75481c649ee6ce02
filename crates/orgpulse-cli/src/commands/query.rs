//! `orgpulse query` and `orgpulse validate`.

use anyhow::Result;
use orgpulse_access::DataAccess;
use serde_json::Value;

/// Interpret a `--param` argument: JSON when it parses, a plain string otherwise.
pub fn parse_param(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

pub async fn run_query(
    access: &DataAccess,
    sql: &str,
    raw_params: &[String],
    custom: bool,
    limit: Option<u64>,
) -> Result<()> {
    let params: Vec<Value> = raw_params.iter().map(|p| parse_param(p)).collect();

    let envelope = if custom {
        access.execute_custom(sql, limit, params).await?
    } else {
        access.execute(sql, params).await?
    };

    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}

pub fn run_validate(access: &DataAccess, sql: &str, limit: Option<u64>) -> Result<()> {
    let checked = match limit {
        Some(limit) => access.validate_with_limit(sql, limit)?,
        None => access.validate(sql)?,
    };
    println!("{}", checked);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_param() {
        assert_eq!(parse_param("10"), json!(10));
        assert_eq!(parse_param("\"10\""), json!("10"));
        assert_eq!(parse_param("%vita%"), json!("%vita%"));
        assert_eq!(parse_param("true"), json!(true));
    }
}
