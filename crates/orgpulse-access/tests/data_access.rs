//! End-to-end tests for the data-access layer over an in-memory row store.
//!
//! Run with: cargo test --package orgpulse-access --test data_access

use orgpulse_access::{AccessError, DataAccess};
use orgpulse_core::{CatalogConfig, FilterOperator, OrgpulseConfig};
use orgpulse_sql::SafetyViolation;
use orgpulse_store::{MemoryRowStore, RowStore, SelectRequest, StoreCall, StoreError};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::sync::Arc;

// =============================================================================
// FIXTURES
// =============================================================================

fn tweets() -> Vec<Value> {
    (0..40)
        .map(|i| json!({"id": i, "text": format!("tweet {}", i), "likes": i * 3 % 17}))
        .collect()
}

fn daos() -> Vec<Value> {
    vec![
        json!({"id": 1, "name": "VitaDAO", "treasury": 1200}),
        json!({"id": 2, "name": "HairDAO", "treasury": 300}),
        json!({"id": 3, "name": "ValleyDAO", "treasury": 800}),
    ]
}

fn config_with_catalog(catalog: CatalogConfig) -> OrgpulseConfig {
    OrgpulseConfig {
        catalog,
        ..Default::default()
    }
}

fn setup(store: MemoryRowStore, config: OrgpulseConfig) -> (Arc<MemoryRowStore>, DataAccess) {
    let store = Arc::new(store);
    let access = DataAccess::new(&config, Some(store.clone() as Arc<dyn RowStore>));
    (store, access)
}

fn default_store() -> MemoryRowStore {
    MemoryRowStore::new()
        .with_table("vitadao_tweets", tweets())
        .with_table("daos", daos())
}

// =============================================================================
// QUERY TRANSLATION
// =============================================================================

#[tokio::test]
async fn test_pattern_lookup_issues_single_row_filter() {
    let (store, access) = setup(default_store(), OrgpulseConfig::default());

    let result = access
        .execute("SELECT * FROM daos WHERE name ILIKE $1", vec![json!("%dao%")])
        .await
        .unwrap();

    assert_eq!(
        store.selects(),
        vec![
            SelectRequest::from("daos")
                .select("*")
                .filter("name", FilterOperator::ILike, "%dao%")
                .limit(1)
        ]
    );
    assert_eq!(result.row_count(), 1);
    assert_eq!(result.rows()[0]["name"], json!("VitaDAO"));
}

#[tokio::test]
async fn test_descending_page_with_offset() {
    let (store, access) = setup(default_store(), OrgpulseConfig::default());

    let result = access
        .execute(
            "SELECT * FROM vitadao_tweets ORDER BY id DESC LIMIT $1 OFFSET $2",
            vec![json!(10), json!(20)],
        )
        .await
        .unwrap();

    let request = &store.selects()[0];
    assert_eq!(request.row_range(), Some((20, 29)));
    assert_eq!(request.row_limit(), Some(10));
    assert!(!request.order_by().unwrap().direction.is_ascending());

    let ids: Vec<i64> = result.rows().iter().filter_map(|r| r["id"].as_i64()).collect();
    assert_eq!(ids, (10..=19).rev().collect::<Vec<_>>());
    assert_eq!(result.row_count(), 10);
}

#[tokio::test]
async fn test_plain_select_returns_rows_in_backend_order() {
    let (_, access) = setup(default_store(), OrgpulseConfig::default());

    let result = access.execute("select * from daos", vec![]).await.unwrap();
    let names: Vec<&str> = result.rows().iter().filter_map(|r| r["name"].as_str()).collect();
    assert_eq!(names, vec!["VitaDAO", "HairDAO", "ValleyDAO"]);
    assert_eq!(result.command(), "SELECT");
}

#[tokio::test]
async fn test_repeated_execution_is_structurally_identical() {
    let (_, access) = setup(default_store(), OrgpulseConfig::default());
    let text = "SELECT * FROM vitadao_tweets ORDER BY likes LIMIT $1";

    let first = access.execute(text, vec![json!(7)]).await.unwrap();
    let second = access.execute(text, vec![json!(7)]).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_out_of_range_parameter_is_unsupported() {
    let (store, access) = setup(default_store(), OrgpulseConfig::default());

    let err = access
        .execute("SELECT * FROM daos LIMIT $2", vec![json!(5)])
        .await
        .unwrap_err();
    assert!(matches!(err, AccessError::UnsupportedQuery(_)), "{:?}", err);
    assert!(store.calls().is_empty());
}

#[tokio::test]
async fn test_overflowing_offset_is_unsupported() {
    let (store, access) = setup(default_store(), OrgpulseConfig::default());

    let err = access
        .execute(
            "SELECT * FROM daos LIMIT $1 OFFSET $2",
            vec![json!(2), json!(u64::MAX)],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AccessError::UnsupportedQuery(_)), "{:?}", err);
    assert!(store.calls().is_empty());
}

#[tokio::test]
async fn test_compound_where_uses_first_pattern_predicate() {
    let (store, access) = setup(default_store(), OrgpulseConfig::default());

    let result = access
        .execute(
            "SELECT * FROM daos WHERE name ILIKE $1 AND chain ILIKE $2",
            vec![json!("%hair%"), json!("eth")],
        )
        .await
        .unwrap();

    assert_eq!(
        store.selects(),
        vec![
            SelectRequest::from("daos")
                .select("*")
                .filter("name", FilterOperator::ILike, "%hair%")
                .limit(1)
        ]
    );
    assert_eq!(result.rows()[0]["name"], json!("HairDAO"));
}

#[tokio::test]
async fn test_equality_where_falls_through_to_pagination() {
    let (store, access) = setup(default_store(), OrgpulseConfig::default());

    let result = access
        .execute(
            "SELECT * FROM vitadao_tweets WHERE id = $1 LIMIT $2",
            vec![json!(3), json!(4)],
        )
        .await
        .unwrap();

    assert!(store.selects()[0].filters().is_empty());
    assert_eq!(result.row_count(), 4);
}

#[tokio::test]
async fn test_non_select_is_unsupported() {
    let (_, access) = setup(default_store(), OrgpulseConfig::default());

    let err = access
        .execute("UPDATE daos SET name = 'x'", vec![])
        .await
        .unwrap_err();
    assert!(matches!(err, AccessError::UnsupportedQuery(_)));
}

#[tokio::test]
async fn test_missing_table_is_backend_error_with_verbatim_message() {
    let (_, access) = setup(default_store(), OrgpulseConfig::default());

    let err = access
        .execute("SELECT * FROM nowhere", vec![])
        .await
        .unwrap_err();
    match err {
        AccessError::BackendError { message, code, .. } => {
            assert_eq!(message, "relation \"public.nowhere\" does not exist");
            assert_eq!(code.as_deref(), Some("42P01"));
        }
        other => panic!("expected backend error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_disconnected_layer_fails_with_not_connected() {
    let access = DataAccess::new(&OrgpulseConfig::default(), None);
    assert!(!access.is_connected());

    let err = access
        .execute("SELECT * FROM daos", vec![])
        .await
        .unwrap_err();
    assert!(matches!(err, AccessError::NotConnected));
}

// =============================================================================
// REMOTE PROCEDURE FALLBACK
// =============================================================================

#[tokio::test]
async fn test_query_without_table_uses_remote_procedure() {
    let store = default_store().with_procedure("execute_sql", |args| {
        Ok(json!([{"query": args["query"], "params": args["parameters"]}]))
    });
    let (store, access) = setup(store, OrgpulseConfig::default());

    let result = access
        .execute("SELECT now() AS ts, $1::int AS n", vec![json!(4)])
        .await
        .unwrap();

    assert_eq!(
        store.calls(),
        vec![StoreCall::Rpc {
            procedure: "execute_sql".to_string(),
            args: json!({
                "query": "SELECT now() AS ts, $1::int AS n",
                "parameters": [4],
            }),
        }]
    );
    assert_eq!(result.row_count(), 1);
    assert_eq!(result.rows()[0]["params"], json!([4]));
}

#[tokio::test]
async fn test_remote_procedure_failure_is_backend_error() {
    let store = default_store().with_procedure("execute_sql", |_| {
        Err(StoreError::backend("P0001", "sql execution disabled"))
    });
    let (_, access) = setup(store, OrgpulseConfig::default());

    let err = access.execute("SELECT 1", vec![]).await.unwrap_err();
    match err {
        AccessError::BackendError { message, .. } => {
            assert_eq!(message, "sql execution disabled")
        }
        other => panic!("expected backend error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_remote_procedure_is_backend_error() {
    let (_, access) = setup(default_store(), OrgpulseConfig::default());

    let err = access.execute("SELECT 1", vec![]).await.unwrap_err();
    assert!(matches!(err, AccessError::BackendError { .. }));
}

// =============================================================================
// SAFETY GUARD
// =============================================================================

#[tokio::test]
async fn test_custom_query_is_validated_then_executed() {
    let (store, access) = setup(default_store(), OrgpulseConfig::default());

    let result = access
        .execute_custom("SELECT * FROM vitadao_tweets", Some(5), vec![])
        .await
        .unwrap();
    assert_eq!(result.row_count(), 5);
    assert_eq!(store.selects()[0].row_limit(), Some(5));
}

#[tokio::test]
async fn test_custom_query_with_blocked_keyword_never_reaches_backend() {
    let (store, access) = setup(default_store(), OrgpulseConfig::default());

    let err = access
        .execute_custom("select * from daos; DROP TABLE daos", None, vec![])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AccessError::SafetyViolation(SafetyViolation::BlockedKeyword { .. })
    ));
    assert!(store.calls().is_empty());
}

#[test]
fn test_validate_through_facade() {
    let access = DataAccess::new(&OrgpulseConfig::default(), None);
    assert_eq!(
        access.validate("select * from t").unwrap(),
        "select * from t LIMIT 100"
    );
    assert_eq!(
        access.validate("select * from t limit 5").unwrap(),
        "select * from t limit 5"
    );
    assert!(matches!(
        access.validate("show tables"),
        Err(AccessError::SafetyViolation(SafetyViolation::NotSelect))
    ));
}

// =============================================================================
// SCHEMA PROBE
// =============================================================================

#[tokio::test]
async fn test_exists() {
    let store = default_store().with_table("empty_but_present", vec![]);
    let (_, access) = setup(store, OrgpulseConfig::default());

    assert!(!access.exists("nonexistent_table").await);
    assert!(access.exists("empty_but_present").await);
    assert!(access.exists("daos").await);
}

// =============================================================================
// ENTITY CATALOG
// =============================================================================

#[tokio::test]
async fn test_only_existing_candidates_are_listed() {
    let catalog = CatalogConfig {
        candidate_tables: vec!["t_a".to_string(), "t_b".to_string(), "t_c".to_string()],
        table_prefix: "t_".to_string(),
        table_suffix: String::new(),
        registry_table: None,
        ..Default::default()
    };
    let store = MemoryRowStore::new()
        .with_table("t_a", vec![json!({"id": 1})])
        .with_denied_table("t_c");
    let (_, access) = setup(store, config_with_catalog(catalog));

    assert_eq!(access.list_known_entities().await, vec!["a".to_string()]);
}

#[tokio::test]
async fn test_registry_and_candidates_are_deduplicated_case_insensitively() {
    let catalog = CatalogConfig {
        candidate_tables: vec!["vitadao_tweets".to_string(), "hairdao_tweets".to_string()],
        registry_table: Some("daos".to_string()),
        registry_name_column: "name".to_string(),
        ..Default::default()
    };
    let store = MemoryRowStore::new()
        .with_table("vitadao_tweets", vec![])
        .with_table("hairdao_tweets", vec![])
        .with_table(
            "daos",
            vec![
                json!({"name": "VitaDAO"}),
                json!({"name": "vitadao"}),
                json!({"name": "cryoDao"}),
            ],
        );
    let (_, access) = setup(store, config_with_catalog(catalog));

    let records = access.list_entities().await;
    let names: Vec<&str> = records.iter().map(|r| r.internal_name.as_str()).collect();
    assert_eq!(names, vec!["vitadao", "hairdao", "cryoDao"]);

    let mut lowered: Vec<String> = names.iter().map(|n| n.to_lowercase()).collect();
    lowered.sort();
    lowered.dedup();
    assert_eq!(lowered.len(), names.len());

    assert!(records[0].is_registered);
    assert!(!records[1].is_registered);
    assert_eq!(records[2].display_name, "Cryo DAO");
    assert_eq!(records[2].table_name, "cryoDao_tweets");
}

#[tokio::test]
async fn test_catalog_re_probes_on_every_call() {
    let catalog = CatalogConfig {
        candidate_tables: vec!["a_tweets".to_string()],
        registry_table: None,
        ..Default::default()
    };
    let (store, access) = setup(
        MemoryRowStore::new().with_table("a_tweets", vec![]),
        config_with_catalog(catalog),
    );

    access.list_known_entities().await;
    access.list_known_entities().await;
    assert_eq!(store.selects().len(), 2);
}
