//! InventoryStore trait test suite
//!
//! Every test scopes its rows by a unique platform name so the suite can
//! run against one shared storage instance.

use infra_inventory_storage::{
    ClusterContext, HostService, InventoryFilter, InventoryQuery, InventoryRecord, Storage,
};

/// Run all InventoryStore tests
pub async fn run_all<S: Storage>(storage: &S) {
    test_insert_batch_returns_count(storage).await;
    test_insert_empty_batch(storage).await;
    test_inserted_rows_carry_context(storage).await;
    test_ids_are_monotonic(storage).await;
    test_list_all_newest_first(storage).await;
    test_filter_exact_match(storage).await;
    test_filter_is_conjunctive(storage).await;
    test_empty_filter_returns_everything(storage).await;
    test_text_search_matches_three_columns(storage).await;
    test_text_search_ignores_other_columns(storage).await;
    test_text_search_is_case_insensitive(storage).await;
    test_text_search_treats_wildcards_literally(storage).await;
    test_get_by_ids(storage).await;
    test_get_by_ids_empty(storage).await;
    test_delete_reports_affected_rows(storage).await;
    test_delete_empty(storage).await;
    test_filter_options_distinct_and_sorted(storage).await;
    test_unicode_values(storage).await;
    test_special_characters_round_trip(storage).await;
}

fn context(platform: &str, app_name: &str, environment: &str, data_center: &str) -> ClusterContext {
    ClusterContext {
        platform: platform.to_string(),
        app_name: app_name.to_string(),
        cluster_name: format!("{}-{}-{}", app_name, environment, data_center),
        environment: environment.to_string(),
        data_center: data_center.to_string(),
    }
}

fn host(hostname: &str, ip_address: &str, service: &str, port: &str) -> HostService {
    HostService {
        hostname: hostname.to_string(),
        ip_address: ip_address.to_string(),
        service: service.to_string(),
        port: port.to_string(),
    }
}

/// Rows belonging to one platform, newest first
async fn rows_for_platform<S: Storage>(storage: &S, platform: &str) -> Vec<InventoryRecord> {
    let query = InventoryQuery::Filter(InventoryFilter {
        platform: Some(platform.to_string()),
        ..Default::default()
    });
    storage.search(&query).await.expect("search should succeed")
}

/// Test batch insert returns the number of rows written
pub async fn test_insert_batch_returns_count<S: Storage>(storage: &S) {
    let ctx = context("insert-count", "billing", "prod", "us-east");
    let hosts = vec![
        host("host1", "10.0.0.1", "web", "8080"),
        host("host2", "10.0.0.2", "db", "5432"),
    ];

    let inserted = storage
        .insert_batch(&ctx, &hosts)
        .await
        .expect("insert_batch should succeed");

    assert_eq!(inserted, 2);
    assert_eq!(rows_for_platform(storage, "insert-count").await.len(), 2);
}

/// Test an empty batch is a no-op
pub async fn test_insert_empty_batch<S: Storage>(storage: &S) {
    let ctx = context("insert-empty", "billing", "prod", "us-east");

    let inserted = storage
        .insert_batch(&ctx, &[])
        .await
        .expect("empty insert_batch should succeed");

    assert_eq!(inserted, 0);
    assert!(rows_for_platform(storage, "insert-empty").await.is_empty());
}

/// Test every row carries the shared context and its own host fields
pub async fn test_inserted_rows_carry_context<S: Storage>(storage: &S) {
    let ctx = context("carry-context", "payments", "staging", "eu-west");
    let hosts = vec![host("pay01", "10.9.0.1", "api", "443")];

    storage
        .insert_batch(&ctx, &hosts)
        .await
        .expect("insert_batch should succeed");

    let rows = rows_for_platform(storage, "carry-context").await;
    assert_eq!(rows.len(), 1);

    let row = &rows[0];
    assert!(row.id > 0, "id should be assigned by storage");
    assert_eq!(row.platform, "carry-context");
    assert_eq!(row.app_name, "payments");
    assert_eq!(row.cluster_name, "payments-staging-eu-west");
    assert_eq!(row.environment, "staging");
    assert_eq!(row.data_center, "eu-west");
    assert_eq!(row.hostname, "pay01");
    assert_eq!(row.ip_address, "10.9.0.1");
    assert_eq!(row.service, "api");
    assert_eq!(row.port, "443");
    assert_eq!(row.created_date_string().len(), "YYYY-MM-DD HH:MM:SS".len());
}

/// Test ids increase with insertion order
pub async fn test_ids_are_monotonic<S: Storage>(storage: &S) {
    let ctx = context("monotonic", "billing", "prod", "us-east");

    storage
        .insert_batch(&ctx, &[host("first", "10.1.0.1", "web", "80")])
        .await
        .expect("first insert should succeed");
    storage
        .insert_batch(&ctx, &[host("second", "10.1.0.2", "web", "80")])
        .await
        .expect("second insert should succeed");

    let rows = rows_for_platform(storage, "monotonic").await;
    let first = rows.iter().find(|r| r.hostname == "first").unwrap();
    let second = rows.iter().find(|r| r.hostname == "second").unwrap();
    assert!(second.id > first.id, "later insert should get a larger id");
}

/// Test list_all is ordered by created_date descending, newest id first on ties
pub async fn test_list_all_newest_first<S: Storage>(storage: &S) {
    let ctx = context("ordering", "billing", "prod", "us-east");
    storage
        .insert_batch(
            &ctx,
            &[
                host("order-a", "10.2.0.1", "web", "80"),
                host("order-b", "10.2.0.2", "web", "80"),
                host("order-c", "10.2.0.3", "web", "80"),
            ],
        )
        .await
        .expect("insert_batch should succeed");

    let all = storage.list_all().await.expect("list_all should succeed");

    for pair in all.windows(2) {
        assert!(
            (pair[0].created_date, pair[0].id) > (pair[1].created_date, pair[1].id),
            "rows should be newest first: {:?} before {:?}",
            pair[0],
            pair[1]
        );
    }

    let ours: Vec<&str> = all
        .iter()
        .filter(|r| r.platform == "ordering")
        .map(|r| r.hostname.as_str())
        .collect();
    assert_eq!(ours, vec!["order-c", "order-b", "order-a"]);
}

/// Test filter mode matches exact values only
pub async fn test_filter_exact_match<S: Storage>(storage: &S) {
    storage
        .insert_batch(
            &context("exact", "search", "prod", "dal"),
            &[host("exact-1", "10.3.0.1", "web", "80")],
        )
        .await
        .expect("insert_batch should succeed");
    storage
        .insert_batch(
            &context("exact-suffix", "search", "prod", "dal"),
            &[host("exact-2", "10.3.0.2", "web", "80")],
        )
        .await
        .expect("insert_batch should succeed");

    let rows = rows_for_platform(storage, "exact").await;
    assert_eq!(rows.len(), 1, "prefix of another platform must not match");
    assert_eq!(rows[0].hostname, "exact-1");
}

/// Test filter constraints are combined with AND
pub async fn test_filter_is_conjunctive<S: Storage>(storage: &S) {
    storage
        .insert_batch(
            &context("conjunctive", "kafka", "prod", "phx"),
            &[host("kafka-prod-phx", "10.4.0.1", "kafka", "9092")],
        )
        .await
        .expect("insert_batch should succeed");
    storage
        .insert_batch(
            &context("conjunctive", "kafka", "dev", "phx"),
            &[host("kafka-dev-phx", "10.4.0.2", "kafka", "9092")],
        )
        .await
        .expect("insert_batch should succeed");
    storage
        .insert_batch(
            &context("conjunctive", "kafka", "prod", "dal"),
            &[host("kafka-prod-dal", "10.4.0.3", "kafka", "9092")],
        )
        .await
        .expect("insert_batch should succeed");

    let query = InventoryQuery::Filter(InventoryFilter {
        platform: Some("conjunctive".into()),
        app_name: Some("kafka".into()),
        environment: Some("prod".into()),
        data_center: Some("phx".into()),
    });

    let rows = storage.search(&query).await.expect("search should succeed");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].hostname, "kafka-prod-phx");

    let query = InventoryQuery::Filter(InventoryFilter {
        platform: Some("conjunctive".into()),
        environment: Some("prod".into()),
        ..Default::default()
    });
    let rows = storage.search(&query).await.expect("search should succeed");
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.environment == "prod"));
}

/// Test an unconstrained filter returns the same rows as list_all
pub async fn test_empty_filter_returns_everything<S: Storage>(storage: &S) {
    storage
        .insert_batch(
            &context("empty-filter", "billing", "prod", "us-east"),
            &[host("empty-filter-1", "10.5.0.1", "web", "80")],
        )
        .await
        .expect("insert_batch should succeed");

    let filtered = storage
        .search(&InventoryQuery::Filter(InventoryFilter::default()))
        .await
        .expect("search should succeed");
    let all = storage.list_all().await.expect("list_all should succeed");

    assert!(!filtered.is_empty());
    assert_eq!(filtered, all, "empty filter should return every row in order");
}

/// Test text mode matches hostname, ip_address or cluster_name
pub async fn test_text_search_matches_three_columns<S: Storage>(storage: &S) {
    let mut ctx = context("text-three", "billing", "prod", "us-east");
    ctx.cluster_name = "zz-needle-cluster".to_string();
    storage
        .insert_batch(&ctx, &[host("plain-host", "172.31.0.1", "web", "80")])
        .await
        .expect("insert_batch should succeed");

    let ctx = context("text-three", "billing", "prod", "us-east");
    storage
        .insert_batch(
            &ctx,
            &[
                host("zz-needle-host", "172.31.0.2", "web", "80"),
                host("other-host", "172.31.99.3", "web", "80"),
            ],
        )
        .await
        .expect("insert_batch should succeed");

    let by_name = storage
        .search(&InventoryQuery::Text("zz-needle".into()))
        .await
        .expect("search should succeed");
    let names: Vec<&str> = by_name.iter().map(|r| r.hostname.as_str()).collect();
    assert_eq!(names, vec!["zz-needle-host", "plain-host"]);

    let by_ip = storage
        .search(&InventoryQuery::Text("172.31.99".into()))
        .await
        .expect("search should succeed");
    assert_eq!(by_ip.len(), 1);
    assert_eq!(by_ip[0].hostname, "other-host");
}

/// Test text mode does not look at service, port or context columns
pub async fn test_text_search_ignores_other_columns<S: Storage>(storage: &S) {
    storage
        .insert_batch(
            &context("text-ignores", "qq-unique-app", "prod", "us-east"),
            &[host("ignore-host", "10.6.0.1", "qq-unique-service", "65001")],
        )
        .await
        .expect("insert_batch should succeed");

    for term in ["qq-unique-service", "65001", "text-ignores"] {
        let rows = storage
            .search(&InventoryQuery::Text(term.into()))
            .await
            .expect("search should succeed");
        assert!(
            rows.iter().all(|r| r.hostname != "ignore-host"),
            "term {:?} should not match service/port/platform",
            term
        );
    }
}

/// Test SQLite's default LIKE ignores ASCII case
pub async fn test_text_search_is_case_insensitive<S: Storage>(storage: &S) {
    storage
        .insert_batch(
            &context("text-case", "billing", "prod", "us-east"),
            &[host("MixedCaseHost", "10.7.0.1", "web", "80")],
        )
        .await
        .expect("insert_batch should succeed");

    let rows = storage
        .search(&InventoryQuery::Text("mixedcase".into()))
        .await
        .expect("search should succeed");
    assert!(rows.iter().any(|r| r.hostname == "MixedCaseHost"));
}

/// Test `%` and `_` in the term are literal characters
pub async fn test_text_search_treats_wildcards_literally<S: Storage>(storage: &S) {
    storage
        .insert_batch(
            &context("text-wildcard", "billing", "prod", "us-east"),
            &[
                host("wild_card", "10.8.0.1", "web", "80"),
                host("wildXcard", "10.8.0.2", "web", "80"),
            ],
        )
        .await
        .expect("insert_batch should succeed");

    let rows = storage
        .search(&InventoryQuery::Text("wild_card".into()))
        .await
        .expect("search should succeed");
    let names: Vec<&str> = rows.iter().map(|r| r.hostname.as_str()).collect();
    assert_eq!(names, vec!["wild_card"]);

    let rows = storage
        .search(&InventoryQuery::Text("%".into()))
        .await
        .expect("search should succeed");
    assert!(rows.iter().all(|r| r.hostname.contains('%')
        || r.ip_address.contains('%')
        || r.cluster_name.contains('%')));
}

/// Test fetching by id returns exactly the known rows
pub async fn test_get_by_ids<S: Storage>(storage: &S) {
    storage
        .insert_batch(
            &context("by-ids", "billing", "prod", "us-east"),
            &[
                host("ids-1", "10.10.0.1", "web", "80"),
                host("ids-2", "10.10.0.2", "web", "80"),
                host("ids-3", "10.10.0.3", "web", "80"),
            ],
        )
        .await
        .expect("insert_batch should succeed");

    let rows = rows_for_platform(storage, "by-ids").await;
    let wanted: Vec<i64> = rows
        .iter()
        .filter(|r| r.hostname != "ids-2")
        .map(|r| r.id)
        .chain(std::iter::once(i64::MAX))
        .collect();

    let fetched = storage
        .get_by_ids(&wanted)
        .await
        .expect("get_by_ids should succeed");
    let names: Vec<&str> = fetched.iter().map(|r| r.hostname.as_str()).collect();
    assert_eq!(names, vec!["ids-3", "ids-1"]);
}

/// Test an empty id set fetches nothing
pub async fn test_get_by_ids_empty<S: Storage>(storage: &S) {
    let fetched = storage
        .get_by_ids(&[])
        .await
        .expect("get_by_ids should succeed");
    assert!(fetched.is_empty());
}

/// Test delete removes only existing rows and reports that count
pub async fn test_delete_reports_affected_rows<S: Storage>(storage: &S) {
    storage
        .insert_batch(
            &context("delete", "billing", "prod", "us-east"),
            &[
                host("del-1", "10.11.0.1", "web", "80"),
                host("del-2", "10.11.0.2", "web", "80"),
                host("keep", "10.11.0.3", "web", "80"),
            ],
        )
        .await
        .expect("insert_batch should succeed");

    let rows = rows_for_platform(storage, "delete").await;
    let mut ids: Vec<i64> = rows
        .iter()
        .filter(|r| r.hostname.starts_with("del-"))
        .map(|r| r.id)
        .collect();
    ids.push(i64::MAX);

    let deleted = storage
        .delete_by_ids(&ids)
        .await
        .expect("delete_by_ids should succeed");
    assert_eq!(deleted, 2, "missing ids should be ignored");

    let remaining = rows_for_platform(storage, "delete").await;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].hostname, "keep");
}

/// Test deleting an empty id set removes nothing
pub async fn test_delete_empty<S: Storage>(storage: &S) {
    let before = storage.list_all().await.expect("list_all should succeed");
    let deleted = storage
        .delete_by_ids(&[])
        .await
        .expect("delete_by_ids should succeed");
    let after = storage.list_all().await.expect("list_all should succeed");

    assert_eq!(deleted, 0);
    assert_eq!(before.len(), after.len());
}

/// Test filter options are distinct and sorted
pub async fn test_filter_options_distinct_and_sorted<S: Storage>(storage: &S) {
    storage
        .insert_batch(
            &context("options-b", "zeta", "prod", "phx"),
            &[
                host("opt-1", "10.12.0.1", "web", "80"),
                host("opt-2", "10.12.0.2", "web", "80"),
            ],
        )
        .await
        .expect("insert_batch should succeed");
    storage
        .insert_batch(
            &context("options-a", "alpha", "dev", "dal"),
            &[host("opt-3", "10.12.0.3", "web", "80")],
        )
        .await
        .expect("insert_batch should succeed");

    let options = storage
        .filter_options()
        .await
        .expect("filter_options should succeed");

    for values in [
        &options.platforms,
        &options.app_names,
        &options.environments,
        &options.data_centers,
    ] {
        let mut sorted = values.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(values, &sorted, "values should be distinct and sorted");
    }

    assert!(options.platforms.contains(&"options-a".to_string()));
    assert!(options.platforms.contains(&"options-b".to_string()));
    assert!(options.app_names.contains(&"alpha".to_string()));
    assert!(options.app_names.contains(&"zeta".to_string()));
    assert!(options.environments.contains(&"dev".to_string()));
    assert!(options.data_centers.contains(&"phx".to_string()));
}

/// Test non-ASCII values survive storage unchanged
pub async fn test_unicode_values<S: Storage>(storage: &S) {
    let ctx = context("unicode-平台", "应用", "prod", "東京");
    storage
        .insert_batch(&ctx, &[host("サーバー01", "10.13.0.1", "サービス", "8080")])
        .await
        .expect("insert_batch should succeed");

    let rows = rows_for_platform(storage, "unicode-平台").await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].hostname, "サーバー01");
    assert_eq!(rows[0].data_center, "東京");
}

/// Test quotes and SQL metacharacters are stored as plain data
pub async fn test_special_characters_round_trip<S: Storage>(storage: &S) {
    let platform = "special'; DROP TABLE inventory; --";
    let ctx = context(platform, "o'brien", "prod", "us-east");
    storage
        .insert_batch(&ctx, &[host("quote\"host", "10.14.0.1", "web,api", "80")])
        .await
        .expect("insert_batch should succeed");

    let rows = rows_for_platform(storage, platform).await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].app_name, "o'brien");
    assert_eq!(rows[0].hostname, "quote\"host");
    assert_eq!(rows[0].service, "web,api");

    storage
        .list_all()
        .await
        .expect("table should still exist after special-character insert");
}
