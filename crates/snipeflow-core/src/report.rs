//! レポート生成
//!
//! フリートキャッシュのコレクションを絞り込み・並べ替え・射影して
//! [`Table`] を組み立てる。表示は呼び出し側（CLI）の責務。

use crate::asset::{self, AssetTagClass};
use crate::error::Result;
use crate::field;
use crate::fleet::{FleetCache, FleetType, laptop_count};
use serde_json::Value;
use snipeflow_client::Record;

const PLACEHOLDER: &str = "---";

/// 属性ダンプで表示しないフィールド
const IGNORED_FIELDS: [&str; 21] = [
    "available_actions",
    "category",
    "checkin_counter",
    "checkout_counter",
    "company",
    "created_at",
    "custom_fields",
    "deleted_at",
    "eol",
    "expected_checkin",
    "image",
    "last_audit_date",
    "location",
    "last_checkout",
    "model_number",
    "next_audit_date",
    "requests_counter",
    "rtd_location",
    "supplier",
    "updated_at",
    "warranty_months",
];

/// `name` を表示するフィールド
const NAMED_FIELDS: [&str; 3] = ["model", "status_label", "manufacturer"];

/// `formatted` を表示するフィールド
const DATED_FIELDS: [&str; 3] = ["updated_at", "warranty_expires", "purchase_date"];

/// 表形式の結果。`Value::Null` は値なし
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub title: Option<String>,
    pub headings: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(headings: &[&str]) -> Self {
        Self {
            title: None,
            headings: headings.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// 1台分の属性ダンプ
#[derive(Debug, Clone, PartialEq)]
pub struct LaptopInfo {
    pub table: Table,
    /// 詳細ページへのリンク用
    pub id: Option<Value>,
}

/// 汎用射影
///
/// `sort_by` があれば解決値の昇順で安定ソート（値なしは先頭）し、
/// 各レコードを `fields` の解決値の行に変換する。
pub fn project(
    collection: &[Record],
    fields: &[&str],
    sort_by: Option<&str>,
    headings: &[&str],
    title: Option<&str>,
) -> Table {
    let mut records: Vec<&Record> = collection.iter().collect();
    if let Some(path) = sort_by {
        let mut keyed: Vec<(Option<Value>, &Record)> = records
            .into_iter()
            .map(|r| (field::resolve(r, path), r))
            .collect();
        keyed.sort_by(|a, b| field::compare(&a.0, &b.0));
        records = keyed.into_iter().map(|(_, r)| r).collect();
    }

    let mut table = Table::new(headings);
    table.title = title.map(str::to_string);
    table.rows = records
        .into_iter()
        .map(|r| {
            fields
                .iter()
                .map(|f| field::resolve(r, f).unwrap_or(Value::Null))
                .collect()
        })
        .collect();
    table
}

fn asset_tag(record: &Record) -> String {
    field::resolve(record, "asset_tag")
        .map(|v| field::display(&v))
        .unwrap_or_default()
}

fn text_of(record: &Record, path: &str) -> Option<String> {
    field::resolve(record, path).map(|v| field::display(&v))
}

fn filtered(collection: &[Record], keep: impl Fn(&Record) -> bool) -> Vec<Record> {
    collection.iter().filter(|r| keep(r)).cloned().collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 属性ダンプ用の値（ネストしたオブジェクトは JSON 文字列）
fn attribute_value(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::String(
            items
                .iter()
                .map(field::display)
                .collect::<Vec<_>>()
                .join(", "),
        ),
        Value::Object(_) => Value::String(value.to_string()),
        scalar => scalar.clone(),
    }
}

/// レポートエンジン
pub struct ReportEngine {
    fleet: FleetCache,
    depreciation_years: f64,
}

impl ReportEngine {
    pub fn new(fleet: FleetCache, depreciation_years: f64) -> Self {
        Self {
            fleet,
            depreciation_years,
        }
    }

    // ============ Laptops ============

    /// フリート一覧（アセットタグ順）
    pub async fn laptops(&mut self, fleet_type: FleetType) -> Result<Table> {
        let laptops = self.fleet.by_fleet_type(fleet_type).await?;
        Ok(project(
            &laptops,
            &["asset_tag", "serial", "name"],
            Some("asset_tag"),
            &["Asset Tag", "Serial", "Asset Name"],
            None,
        ))
    }

    /// 保証期間内の端末（保証終了日順）
    pub async fn laptops_in_warranty(&mut self, fleet_type: FleetType) -> Result<Table> {
        let laptops = self.fleet.by_fleet_type(fleet_type).await?;
        let covered = filtered(&laptops, |r| r.get("in_warranty") == Some(&Value::Bool(true)));
        Ok(project(
            &covered,
            &["warranty_expires.date", "asset_tag", "serial", "name"],
            Some("warranty_expires.date"),
            &["Warranty Expires", "Asset Tag", "Serial", "Asset Name"],
            None,
        ))
    }

    /// 経過年数順の一覧
    ///
    /// `older_than_years` が 0 のときは単語タグ・連番タグの端末を
    /// プレースホルダ付きで先頭に並べる。0 以外なら日付タグのうち
    /// その年数以上のものだけを残す。年数は閏年を無視した概算。
    pub async fn laptops_by_age(
        &mut self,
        fleet_type: FleetType,
        older_than_years: f64,
    ) -> Result<Table> {
        let today = self.fleet.today();
        let laptops = self.fleet.by_fleet_type(fleet_type).await?;
        let mut table = Table::new(&[
            "Purchase Date",
            "Approx Age",
            "Asset Tag",
            "Serial",
            "Asset Name",
        ]);

        if older_than_years == 0.0 {
            for class in [AssetTagClass::WordBased, AssetTagClass::Incremental] {
                let subset = filtered(&laptops, |r| asset::classify(&asset_tag(r)) == class);
                let projected = project(
                    &subset,
                    &["asset_tag", "serial", "name"],
                    Some("asset_tag"),
                    &[],
                    None,
                );
                table.rows.extend(projected.rows.into_iter().map(|row| {
                    let mut full = vec![Value::from(PLACEHOLDER), Value::from(PLACEHOLDER)];
                    full.extend(row);
                    full
                }));
            }
        }

        let mut dated = filtered(&laptops, |r| {
            asset::classify(&asset_tag(r)) == AssetTagClass::DateBased
        });
        if older_than_years != 0.0 {
            dated.retain(|r| {
                asset::asset_age(&asset_tag(r), today).is_some_and(|age| age >= older_than_years)
            });
        }

        let projected = project(
            &dated,
            &["asset_tag", "serial", "name"],
            Some("asset_tag"),
            &[],
            None,
        );
        for row in projected.rows {
            let tag = row.first().map(field::display).unwrap_or_default();
            let purchased = asset::tag_date(&tag)
                .map(|d| Value::from(d.format("%Y-%m-%d").to_string()))
                .unwrap_or(Value::Null);
            let age = asset::asset_age(&tag, today)
                .map(Value::from)
                .unwrap_or(Value::Null);
            let mut full = vec![purchased, age];
            full.extend(row);
            table.rows.push(full);
        }

        Ok(table)
    }

    /// ステータス別の一覧
    ///
    /// `by_type` なら `status_label.status_type`、それ以外は
    /// `status_label.name` を使う。`status` 指定時は完全一致で絞り込む。
    pub async fn laptops_by_status(
        &mut self,
        fleet_type: FleetType,
        status: Option<&str>,
        by_type: bool,
    ) -> Result<Table> {
        let status_field = if by_type {
            "status_label.status_type"
        } else {
            "status_label.name"
        };
        let laptops = self.fleet.by_fleet_type(fleet_type).await?;
        let subset = match status {
            Some(status) => filtered(&laptops, |r| {
                text_of(r, status_field).as_deref() == Some(status)
            }),
            None => laptops.to_vec(),
        };
        Ok(project(
            &subset,
            &[status_field, "asset_tag", "serial", "name"],
            Some(status_field),
            &["Status", "Asset Tag", "Serial", "Asset Name"],
            None,
        ))
    }

    /// メーカー別の一覧（空のメーカーは出力しない）
    pub async fn laptops_by_manufacturer(&mut self, fleet_type: FleetType) -> Result<Vec<Table>> {
        let known = self.fleet.laptop_manufacturers().await?;
        let laptops = self.fleet.by_fleet_type(fleet_type).await?;

        let mut names: Vec<String> = known.to_vec();
        for laptop in laptops.iter() {
            if let Some(name) = text_of(laptop, "manufacturer.name")
                && !names.contains(&name)
            {
                names.push(name);
            }
        }

        let tables = names
            .iter()
            .filter_map(|name| {
                let subset = filtered(&laptops, |r| {
                    text_of(r, "manufacturer.name").as_deref() == Some(name.as_str())
                });
                if subset.is_empty() {
                    return None;
                }
                Some(project(
                    &subset,
                    &["asset_tag", "serial", "name", "model.name"],
                    Some("asset_tag"),
                    &["Asset Tag", "Serial", "Asset Name", "Model"],
                    Some(name.as_str()),
                ))
            })
            .collect();
        Ok(tables)
    }

    /// 推定売却価格
    pub async fn laptop_sale_price(&mut self, asset_tag: &str) -> Result<Table> {
        let laptop = self.fleet.get_laptop(asset_tag).await?;
        let age = asset::asset_age(asset_tag, self.fleet.today());
        let cost = laptop.get("purchase_cost").and_then(asset::purchase_cost);
        let price = asset::estimated_price(cost, age, self.depreciation_years).map(round2);

        let mut table = Table::new(&[
            "Est Price",
            "Approx Age",
            "Purchase Cost",
            "Asset Tag",
            "Serial",
            "Asset Name",
        ]);
        let mut row = vec![
            price.map(Value::from).unwrap_or(Value::Null),
            age.map(Value::from).unwrap_or(Value::Null),
        ];
        row.extend(
            ["purchase_cost", "asset_tag", "serial", "name"]
                .iter()
                .map(|f| field::resolve(&laptop, f).unwrap_or(Value::Null)),
        );
        table.rows.push(row);
        Ok(table)
    }

    /// 1台の属性ダンプ
    pub async fn laptop_info(&mut self, asset_tag: &str) -> Result<LaptopInfo> {
        let laptop = self.fleet.get_laptop(asset_tag).await?;
        let mut table = Table::new(&["Attribute", "Value"]);

        for (key, value) in laptop.iter() {
            let key = key.as_str();
            if IGNORED_FIELDS.contains(&key) {
                continue;
            }
            let rendered = if NAMED_FIELDS.contains(&key) {
                field::resolve(&laptop, &format!("{}.name", key)).unwrap_or(Value::Null)
            } else if DATED_FIELDS.contains(&key) {
                field::resolve(&laptop, &format!("{}.formatted", key)).unwrap_or(Value::Null)
            } else if key == "assigned_to" {
                match field::resolve(&laptop, "assigned_to.username") {
                    Some(username) => username,
                    None => continue,
                }
            } else {
                attribute_value(value)
            };
            table.rows.push(vec![Value::from(key), rendered]);
        }

        Ok(LaptopInfo {
            table,
            id: laptop.get("id").cloned(),
        })
    }

    // ============ Statuses / Models / Manufacturers ============

    pub async fn statuses(&mut self) -> Result<Table> {
        let statuses = self.fleet.statuses().await?;
        Ok(project(
            &statuses,
            &["id", "type", "name"],
            Some("type"),
            &["ID", "Type", "Name"],
            None,
        ))
    }

    pub async fn models(&mut self) -> Result<Table> {
        let models = self.fleet.laptop_models().await?;
        Ok(project(
            &models,
            &["id", "name", "manufacturer.name", "assets_count"],
            Some("manufacturer.name"),
            &["ID", "Name", "Manufacturer", "Assets"],
            None,
        ))
    }

    pub async fn manufacturers(&mut self) -> Result<Table> {
        let manufacturers = self.fleet.manufacturers().await?;
        Ok(project(
            &manufacturers,
            &["id", "name", "assets_count"],
            Some("id"),
            &["ID", "Name", "Assets"],
            None,
        ))
    }

    // ============ Users ============

    pub async fn users(&mut self) -> Result<Table> {
        let users = self.fleet.users().await?;
        Ok(project_users(&users))
    }

    /// 端末が割り当てられていないユーザー
    pub async fn users_without_laptops(&mut self) -> Result<Table> {
        let users = self.fleet.users_without_laptops().await?;
        Ok(project_users(&users))
    }

    /// 端末が2台以上割り当てられているユーザー
    pub async fn users_with_multiple_laptops(&mut self) -> Result<Table> {
        let users = self.fleet.users_with_laptops().await?;
        let multiple = filtered(&users, |u| laptop_count(u) >= 2);
        Ok(project_users(&multiple))
    }
}

fn project_users(users: &[Record]) -> Table {
    project(
        users,
        &["id", "username", "laptops"],
        Some("username"),
        &["ID", "Username", "Laptops"],
        None,
    )
}
