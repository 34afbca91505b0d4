//! snipeflow core — Snipe-IT のラップトップ在庫レポート
//!
//! # 概要
//!
//! - **Fleet層**: ノートPCを active / spares / staff / archived に分類し、
//!   取得結果をセッション中メモ化する（[`FleetCache`]）
//! - **Asset層**: アセットタグの分類、経過年数、推定売却価格、保証判定
//! - **Report層**: コレクションを絞り込み・並べ替え・射影して [`Table`] にする

pub mod asset;
pub mod error;
pub mod field;
pub mod fleet;
pub mod report;

#[cfg(test)]
mod testing;

pub use asset::AssetTagClass;
pub use error::{FleetError, Result};
pub use fleet::{Collection, FleetCache, FleetType, TrackedCategory};
pub use report::{LaptopInfo, ReportEngine, Table, project};
