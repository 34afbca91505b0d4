//! snipe laptop コマンドハンドラ

use crate::printer;
use colored::Colorize;
use snipeflow_core::{FleetType, ReportEngine};

fn announce(what: &str, fleet_type: FleetType) {
    println!("{} ({})", what.blue(), fleet_type.as_str().cyan());
}

/// snipe laptop list
pub async fn handle_list(engine: &mut ReportEngine, fleet: &str) -> anyhow::Result<()> {
    let fleet_type = FleetType::from_name(fleet);
    announce("ノートPC一覧", fleet_type);
    let table = engine.laptops(fleet_type).await?;
    printer::print_table(&table);
    Ok(())
}

/// snipe laptop warranty
pub async fn handle_warranty(engine: &mut ReportEngine, fleet: &str) -> anyhow::Result<()> {
    let fleet_type = FleetType::from_name(fleet);
    announce("保証期間内のノートPC", fleet_type);
    let table = engine.laptops_in_warranty(fleet_type).await?;
    printer::print_table(&table);
    Ok(())
}

/// snipe laptop age
pub async fn handle_age(
    engine: &mut ReportEngine,
    fleet: &str,
    older_than: f64,
) -> anyhow::Result<()> {
    if older_than < 0.0 {
        anyhow::bail!("--older-than は 0 以上で指定してください: {}", older_than);
    }
    let fleet_type = FleetType::from_name(fleet);
    if older_than > 0.0 {
        announce(&format!("{} 年以上経過したノートPC", older_than), fleet_type);
    } else {
        announce("経過年数順のノートPC", fleet_type);
    }
    let table = engine.laptops_by_age(fleet_type, older_than).await?;
    printer::print_table(&table);
    Ok(())
}

/// snipe laptop status
pub async fn handle_status(
    engine: &mut ReportEngine,
    fleet: &str,
    status: Option<&str>,
    by_type: bool,
) -> anyhow::Result<()> {
    let fleet_type = FleetType::from_name(fleet);
    match status {
        Some(status) => announce(&format!("ステータス '{}' のノートPC", status), fleet_type),
        None => announce("ステータス別のノートPC", fleet_type),
    }
    let table = engine
        .laptops_by_status(fleet_type, status, by_type)
        .await?;
    printer::print_table(&table);
    Ok(())
}

/// snipe laptop manufacturer
pub async fn handle_manufacturer(engine: &mut ReportEngine, fleet: &str) -> anyhow::Result<()> {
    let fleet_type = FleetType::from_name(fleet);
    announce("メーカー別のノートPC", fleet_type);
    let tables = engine.laptops_by_manufacturer(fleet_type).await?;
    println!();
    printer::print_tables(&tables);
    Ok(())
}

/// snipe laptop price
pub async fn handle_price(engine: &mut ReportEngine, asset_tag: &str) -> anyhow::Result<()> {
    println!("{} {}", "推定売却価格:".blue(), asset_tag.cyan());
    let table = engine.laptop_sale_price(asset_tag).await?;
    printer::print_table(&table);
    Ok(())
}

/// snipe laptop info — 属性ダンプと詳細ページへのリンク
pub async fn handle_info(
    engine: &mut ReportEngine,
    base_url: &str,
    asset_tag: &str,
) -> anyhow::Result<()> {
    println!("{} {}", "ノートPC詳細:".blue(), asset_tag.cyan());
    let info = engine.laptop_info(asset_tag).await?;
    printer::print_table(&info.table);
    if let Some(id) = &info.id {
        printer::print_link(base_url, id);
    }
    Ok(())
}
