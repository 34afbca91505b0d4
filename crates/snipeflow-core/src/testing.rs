//! テスト用フィクスチャ
//!
//! 小さな Snipe-IT インスタンスを MockTransport 上に再現する。
//! 評価日は 2019-01-01 に固定。

use crate::fleet::{FleetCache, TrackedCategory};
use chrono::NaiveDate;
use serde_json::{Value, json};
use snipeflow_client::mock::MockTransport;
use snipeflow_client::{PagingClient, Params, Response};
use std::sync::Arc;

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2019, 1, 1).unwrap()
}

pub fn hardware_params(status: Option<&str>) -> Params {
    let mut params = Params::new();
    params.insert("category_id".to_string(), "1".to_string());
    if let Some(status) = status {
        params.insert("status".to_string(), status.to_string());
    }
    params
}

fn dated(date: &str) -> Value {
    let formatted = format!("{}/{}/{}", &date[5..7], &date[8..10], &date[0..4]);
    json!({ "date": date, "formatted": formatted })
}

fn status(name: &str, status_type: &str) -> Value {
    json!({ "id": 1, "name": name, "status_type": status_type, "status_meta": status_type })
}

#[allow(clippy::too_many_arguments)]
fn laptop(
    id: u64,
    asset_tag: &str,
    name: &str,
    assignee: Option<&str>,
    warranty: Option<&str>,
    status_label: Value,
    manufacturer: &str,
    model: &str,
    purchase_cost: Value,
) -> Value {
    json!({
        "id": id,
        "name": name,
        "asset_tag": asset_tag,
        "serial": format!("SN{:04}", id),
        "model": { "id": id + 100, "name": model },
        "model_number": "A1989",
        "status_label": status_label,
        "category": { "id": 1, "name": "Laptop" },
        "manufacturer": { "id": 1, "name": manufacturer },
        "purchase_date": warranty.map(|_| dated("2018-01-01")),
        "purchase_cost": purchase_cost,
        "warranty_expires": warranty.map(dated),
        "assigned_to": assignee.map(|u| json!({ "id": 10, "username": u, "name": u })),
        "notes": "",
        "created_at": dated("2018-01-01"),
        "updated_at": dated("2018-06-01"),
        "available_actions": { "checkout": true, "checkin": true },
    })
}

pub fn active_laptops() -> Vec<Value> {
    vec![
        laptop(1, "oldspare03", "old-1", None, None, status("Pending", "pending"), "Apple", "MacBook Air", json!("999.99")),
        laptop(2, "2018-06-01", "wren", None, Some("2018-11-01"), status("Ready to Deploy", "deployable"), "Lenovo", "X1 Carbon", json!(null)),
        laptop(3, "2015-01-01", "heron", Some("alice"), Some("2020-01-01"), status("Deployed", "deployed"), "Apple", "MacBook Pro", json!(1000)),
        laptop(4, "2017-09-10", "finch", None, None, status("Ready to Deploy", "deployable"), "Dell", "XPS 13", json!("1,450.00")),
        laptop(5, "2019-03-15", "kestrel", Some("alice"), Some("2022-03-15"), status("Deployed", "deployed"), "Lenovo", "X1 Carbon", json!("1,200.00")),
        laptop(6, "42", "plover", Some("bob"), Some("2018-12-31"), status("Out for Repair", "undeployable"), "Apple", "MacBook Pro", json!(800)),
    ]
}

pub fn fixture_mock() -> Arc<MockTransport> {
    let mock = Arc::new(MockTransport::new());
    let active = active_laptops();

    mock.paged(
        "hardware",
        &hardware_params(None),
        active.chunks(2).map(<[Value]>::to_vec).collect(),
    );
    mock.paged(
        "hardware",
        &hardware_params(Some("Requestable")),
        vec![vec![active[1].clone(), active[3].clone()]],
    );
    mock.paged(
        "hardware",
        &hardware_params(Some("Archived")),
        vec![vec![laptop(9, "2012-02-01", "retired", None, Some("2015-02-01"), status("Archived", "archived"), "Apple", "MacBook", json!(1500))]],
    );

    mock.paged(
        "users",
        &Params::new(),
        vec![vec![
            json!({ "id": 10, "username": "alice", "name": "Alice" }),
            json!({ "id": 11, "username": "bob", "name": "Bob" }),
            json!({ "id": 12, "username": "carol", "name": "Carol" }),
        ]],
    );

    mock.paged(
        "models",
        &Params::new(),
        vec![vec![
            json!({ "id": 100, "name": "MacBook Pro", "category": { "name": "Laptop" }, "manufacturer": { "name": "Apple" }, "assets_count": 2 }),
            json!({ "id": 101, "name": "ThinkVision", "category": { "name": "Monitor" }, "manufacturer": { "name": "Lenovo" }, "assets_count": 9 }),
            json!({ "id": 102, "name": "X1 Carbon", "category": { "name": "Laptop" }, "manufacturer": { "name": "Lenovo" }, "assets_count": 2 }),
            json!({ "id": 103, "name": "XPS 13", "category": { "name": "Laptop" }, "manufacturer": { "name": "Dell" }, "assets_count": 1 }),
        ]],
    );

    mock.paged(
        "manufacturers",
        &Params::new(),
        vec![vec![
            json!({ "id": 3, "name": "Dell", "assets_count": 1 }),
            json!({ "id": 1, "name": "Apple", "assets_count": 3 }),
            json!({ "id": 2, "name": "Lenovo", "assets_count": 11 }),
        ]],
    );

    mock.paged(
        "statuslabels",
        &Params::new(),
        vec![vec![
            json!({ "id": 2, "type": "pending", "name": "Pending" }),
            json!({ "id": 1, "type": "deployable", "name": "Ready to Deploy" }),
            json!({ "id": 3, "type": "archived", "name": "Archived" }),
        ]],
    );

    for record in &active {
        let tag = record["asset_tag"].as_str().unwrap();
        mock.respond(
            &format!("hardware/bytag/{}", tag),
            &Params::new(),
            Response::ok(record.clone()),
        );
    }
    mock.respond(
        "hardware/bytag/nope",
        &Params::new(),
        Response::ok(json!({ "status": "error", "messages": "Asset does not exist.", "payload": null })),
    );

    mock
}

pub fn fixture_cache() -> (FleetCache, Arc<MockTransport>) {
    let mock = fixture_mock();
    let cache = FleetCache::new(
        PagingClient::new(mock.clone()),
        TrackedCategory::default(),
        today(),
    );
    (cache, mock)
}
