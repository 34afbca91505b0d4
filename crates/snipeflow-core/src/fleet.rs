//! フリート（ハードウェア区分）とセッション単位のキャッシュ
//!
//! 各コレクションはプロセス中に一度だけ取得・計算され、以降は同じ
//! `Arc` を返す。バックエンド側の変更は次回起動まで反映されない。

use crate::asset;
use crate::error::{FleetError, Result};
use crate::field;
use chrono::NaiveDate;
use serde_json::Value;
use snipeflow_client::{Document, PagingClient, Params, Record, encode_segment};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 共有されるレコード列
pub type Collection = Arc<Vec<Record>>;

const STATUS_REQUESTABLE: &str = "Requestable";
const STATUS_ARCHIVED: &str = "Archived";

/// フリート種別
///
/// 未知の名前は `Active` として扱う（エラーにしない）。入力ミスが全台の
/// 一覧に化けるため、将来的にはエラーにすべきか要検討。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FleetType {
    /// アーカイブ以外の全台
    #[default]
    Active,
    /// 貸出可能な予備機
    Spares,
    /// 予備機以外（職員に割り当てられている／割り当て予定）
    Staff,
    /// アーカイブ済み
    Archived,
}

impl FleetType {
    /// 名前から解決する。未知の名前は警告を出して `Active` にフォールバック
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "all" | "active" => FleetType::Active,
            "spares" | "spare" => FleetType::Spares,
            "staff" => FleetType::Staff,
            "archived" => FleetType::Archived,
            other => {
                warn!(fleet_type = other, "Unknown fleet type, falling back to active");
                FleetType::Active
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FleetType::Active => "active",
            FleetType::Spares => "spares",
            FleetType::Staff => "staff",
            FleetType::Archived => "archived",
        }
    }
}

impl std::fmt::Display for FleetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 集計対象のカテゴリ
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedCategory {
    /// ハードウェア検索に使う `category_id`
    pub id: u64,
    /// モデルの絞り込みに使う `category.name`
    pub name: String,
}

impl Default for TrackedCategory {
    fn default() -> Self {
        Self {
            id: 1,
            name: "Laptop".to_string(),
        }
    }
}

/// セッション単位のコレクションキャッシュ
pub struct FleetCache {
    client: PagingClient,
    category: TrackedCategory,
    today: NaiveDate,

    active: Option<Collection>,
    spare: Option<Collection>,
    archived: Option<Collection>,
    staff: Option<Collection>,
    users: Option<Collection>,
    users_with_laptops: Option<Collection>,
    users_without_laptops: Option<Collection>,
    models: Option<Collection>,
    laptop_models: Option<Collection>,
    laptop_manufacturers: Option<Arc<Vec<String>>>,
    manufacturers: Option<Collection>,
    statuses: Option<Collection>,
}

impl FleetCache {
    /// `today` は保証期間の判定に使う
    pub fn new(client: PagingClient, category: TrackedCategory, today: NaiveDate) -> Self {
        Self {
            client,
            category,
            today,
            active: None,
            spare: None,
            archived: None,
            staff: None,
            users: None,
            users_with_laptops: None,
            users_without_laptops: None,
            models: None,
            laptop_models: None,
            laptop_manufacturers: None,
            manufacturers: None,
            statuses: None,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    // ============ Laptops ============

    /// アーカイブ以外の全台
    pub async fn active(&mut self) -> Result<Collection> {
        if let Some(cached) = &self.active {
            return Ok(cached.clone());
        }
        let collection = self.hardware("active_laptops", None).await?;
        self.active = Some(collection.clone());
        Ok(collection)
    }

    /// 貸出可能な予備機
    pub async fn spare(&mut self) -> Result<Collection> {
        if let Some(cached) = &self.spare {
            return Ok(cached.clone());
        }
        let collection = self
            .hardware("spare_laptops", Some(STATUS_REQUESTABLE))
            .await?;
        self.spare = Some(collection.clone());
        Ok(collection)
    }

    /// アーカイブ済み
    pub async fn archived(&mut self) -> Result<Collection> {
        if let Some(cached) = &self.archived {
            return Ok(cached.clone());
        }
        let collection = self
            .hardware("archived_laptops", Some(STATUS_ARCHIVED))
            .await?;
        self.archived = Some(collection.clone());
        Ok(collection)
    }

    /// 予備機以外（active − spare、`id` で比較）
    pub async fn staff(&mut self) -> Result<Collection> {
        if let Some(cached) = &self.staff {
            return Ok(cached.clone());
        }
        let active = self.active().await?;
        let spare = self.spare().await?;
        let collection = Arc::new(difference_by_id(&active, &spare));
        debug!(
            active = active.len(),
            spare = spare.len(),
            staff = collection.len(),
            "Computed staff laptops"
        );
        self.staff = Some(collection.clone());
        Ok(collection)
    }

    pub async fn by_fleet_type(&mut self, fleet_type: FleetType) -> Result<Collection> {
        match fleet_type {
            FleetType::Active => self.active().await,
            FleetType::Spares => self.spare().await,
            FleetType::Staff => self.staff().await,
            FleetType::Archived => self.archived().await,
        }
    }

    /// アセットタグで1台取得する（キャッシュしない）
    pub async fn get_laptop(&self, asset_tag: &str) -> Result<Record> {
        let path = format!("hardware/bytag/{}", encode_segment(asset_tag)?);
        match self.client.fetch("get_laptop", &path, &Params::new()).await? {
            Document::Single(record) => {
                if record.get("status").and_then(Value::as_str) == Some("error") {
                    return Err(FleetError::AssetNotFound(asset_tag.to_string()));
                }
                Ok(record)
            }
            Document::Page(_) => Err(FleetError::UnexpectedDocument {
                operation: "get_laptop".to_string(),
            }),
        }
    }

    // ============ Users ============

    /// 全ユーザー（`laptops` に割り当て済みのアセットタグを付与）
    pub async fn users(&mut self) -> Result<Collection> {
        if let Some(cached) = &self.users {
            return Ok(cached.clone());
        }
        let mut users = self.rows("users", "users", &Params::new()).await?;
        let active = self.active().await?;
        for user in users.iter_mut() {
            let laptops = assigned_laptops(user, &active);
            let value = if laptops.is_empty() {
                Value::Null
            } else {
                Value::Array(laptops)
            };
            user.insert("laptops".to_string(), value);
        }
        let collection = Arc::new(users);
        self.users = Some(collection.clone());
        Ok(collection)
    }

    pub async fn users_with_laptops(&mut self) -> Result<Collection> {
        if let Some(cached) = &self.users_with_laptops {
            return Ok(cached.clone());
        }
        let users = self.users().await?;
        let collection = Arc::new(
            users
                .iter()
                .filter(|u| laptop_count(u) > 0)
                .cloned()
                .collect::<Vec<_>>(),
        );
        self.users_with_laptops = Some(collection.clone());
        Ok(collection)
    }

    pub async fn users_without_laptops(&mut self) -> Result<Collection> {
        if let Some(cached) = &self.users_without_laptops {
            return Ok(cached.clone());
        }
        let users = self.users().await?;
        let collection = Arc::new(
            users
                .iter()
                .filter(|u| laptop_count(u) == 0)
                .cloned()
                .collect::<Vec<_>>(),
        );
        self.users_without_laptops = Some(collection.clone());
        Ok(collection)
    }

    // ============ Other ============

    pub async fn models(&mut self) -> Result<Collection> {
        if let Some(cached) = &self.models {
            return Ok(cached.clone());
        }
        let collection = Arc::new(self.rows("models", "models", &Params::new()).await?);
        self.models = Some(collection.clone());
        Ok(collection)
    }

    /// 集計対象カテゴリのモデル
    pub async fn laptop_models(&mut self) -> Result<Collection> {
        if let Some(cached) = &self.laptop_models {
            return Ok(cached.clone());
        }
        let models = self.models().await?;
        let category = self.category.name.clone();
        let collection = Arc::new(
            models
                .iter()
                .filter(|m| {
                    field::resolve(m, "category.name").as_ref().and_then(Value::as_str)
                        == Some(category.as_str())
                })
                .cloned()
                .collect::<Vec<_>>(),
        );
        self.laptop_models = Some(collection.clone());
        Ok(collection)
    }

    /// モデルに現れるメーカー名（重複なし、出現順）
    pub async fn laptop_manufacturers(&mut self) -> Result<Arc<Vec<String>>> {
        if let Some(cached) = &self.laptop_manufacturers {
            return Ok(cached.clone());
        }
        let models = self.models().await?;
        let mut seen = HashSet::new();
        let names: Vec<String> = models
            .iter()
            .filter_map(|m| field::resolve(m, "manufacturer.name"))
            .map(|v| field::display(&v))
            .filter(|name| seen.insert(name.clone()))
            .collect();
        let names = Arc::new(names);
        self.laptop_manufacturers = Some(names.clone());
        Ok(names)
    }

    pub async fn manufacturers(&mut self) -> Result<Collection> {
        if let Some(cached) = &self.manufacturers {
            return Ok(cached.clone());
        }
        let collection = Arc::new(
            self.rows("manufacturers", "manufacturers", &Params::new())
                .await?,
        );
        self.manufacturers = Some(collection.clone());
        Ok(collection)
    }

    pub async fn statuses(&mut self) -> Result<Collection> {
        if let Some(cached) = &self.statuses {
            return Ok(cached.clone());
        }
        let collection = Arc::new(self.rows("statuses", "statuslabels", &Params::new()).await?);
        self.statuses = Some(collection.clone());
        Ok(collection)
    }

    // ============ Fetch helpers ============

    async fn rows(&self, operation: &str, path: &str, params: &Params) -> Result<Vec<Record>> {
        let rows = self
            .client
            .fetch(operation, path, params)
            .await?
            .into_rows()
            .ok_or_else(|| FleetError::UnexpectedDocument {
                operation: operation.to_string(),
            })?;
        info!(operation, count = rows.len(), "Loaded collection");
        Ok(rows)
    }

    /// 対象カテゴリのハードウェアを取得し `in_warranty` を付与する
    async fn hardware(&self, operation: &str, status: Option<&str>) -> Result<Collection> {
        let mut params = Params::new();
        params.insert("category_id".to_string(), self.category.id.to_string());
        if let Some(status) = status {
            params.insert("status".to_string(), status.to_string());
        }

        let mut rows = self.rows(operation, "hardware", &params).await?;
        for record in rows.iter_mut() {
            let covered = asset::in_warranty(record, self.today);
            record.insert("in_warranty".to_string(), Value::Bool(covered));
        }
        Ok(Arc::new(rows))
    }
}

/// `all` のうち `exclude` に同じ `id` が無いもの（順序維持、重複なし）
pub fn difference_by_id(all: &[Record], exclude: &[Record]) -> Vec<Record> {
    let excluded: HashSet<String> = exclude
        .iter()
        .filter_map(|r| r.get("id"))
        .map(Value::to_string)
        .collect();
    let mut seen = HashSet::new();
    all.iter()
        .filter(|r| match r.get("id") {
            Some(id) => {
                let key = id.to_string();
                !excluded.contains(&key) && seen.insert(key)
            }
            None => true,
        })
        .cloned()
        .collect()
}

/// ユーザーに割り当てられたアセットタグ
fn assigned_laptops(user: &Record, laptops: &[Record]) -> Vec<Value> {
    let Some(username) = user.get("username").and_then(Value::as_str) else {
        return Vec::new();
    };
    laptops
        .iter()
        .filter(|laptop| {
            field::resolve(laptop, "assigned_to.username")
                .as_ref()
                .and_then(Value::as_str)
                == Some(username)
        })
        .map(|laptop| laptop.get("asset_tag").cloned().unwrap_or(Value::Null))
        .collect()
}

/// ユーザーレコードの `laptops` の件数（値なしは 0）
pub fn laptop_count(user: &Record) -> usize {
    user.get("laptops")
        .and_then(Value::as_array)
        .map_or(0, Vec::len)
}
