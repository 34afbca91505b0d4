//! ステータス・モデル・メーカーの一覧

use crate::printer;
use colored::Colorize;
use snipeflow_core::ReportEngine;

pub async fn handle_statuses(engine: &mut ReportEngine) -> anyhow::Result<()> {
    println!("{}", "ステータスラベル".blue());
    let table = engine.statuses().await?;
    printer::print_table(&table);
    Ok(())
}

pub async fn handle_models(engine: &mut ReportEngine) -> anyhow::Result<()> {
    println!("{}", "ノートPCのモデル".blue());
    let table = engine.models().await?;
    printer::print_table(&table);
    Ok(())
}

pub async fn handle_manufacturers(engine: &mut ReportEngine) -> anyhow::Result<()> {
    println!("{}", "メーカー".blue());
    let table = engine.manufacturers().await?;
    printer::print_table(&table);
    Ok(())
}
