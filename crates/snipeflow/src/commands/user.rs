//! snipe user コマンドハンドラ

use crate::printer;
use colored::Colorize;
use snipeflow_core::ReportEngine;

pub async fn handle_list(engine: &mut ReportEngine) -> anyhow::Result<()> {
    println!("{}", "ユーザー一覧".blue());
    let table = engine.users().await?;
    printer::print_table(&table);
    Ok(())
}

pub async fn handle_without_laptops(engine: &mut ReportEngine) -> anyhow::Result<()> {
    println!("{}", "ノートPCが割り当てられていないユーザー".blue());
    let table = engine.users_without_laptops().await?;
    printer::print_table(&table);
    Ok(())
}

pub async fn handle_multiple_laptops(engine: &mut ReportEngine) -> anyhow::Result<()> {
    println!("{}", "ノートPCが複数割り当てられているユーザー".blue());
    let table = engine.users_with_multiple_laptops().await?;
    printer::print_table(&table);
    Ok(())
}
