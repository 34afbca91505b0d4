mod commands;
mod printer;

use clap::{Parser, Subcommand};
use snipeflow_client::{HttpTransport, MergePolicy, PagingClient};
use snipeflow_core::{FleetCache, ReportEngine, TrackedCategory};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "snipe")]
#[command(about = "Snipe-IT のノートPC在庫をターミナルから眺める", long_about = None)]
struct Cli {
    /// ページ取得が途中で失敗したらエラーにする（デフォルトは取得済み分で続行）
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// ノートPCのレポート
    #[command(subcommand)]
    Laptop(LaptopCommands),
    /// ユーザーのレポート
    #[command(subcommand)]
    User(UserCommands),
    /// ステータスラベルの一覧を表示
    Statuses,
    /// ノートPCのモデル一覧を表示
    Models,
    /// メーカーの一覧を表示
    Manufacturers,
    /// バージョン情報を表示
    Version,
}

/// ノートPCのサブコマンド
#[derive(Subcommand)]
enum LaptopCommands {
    /// アセットタグ順の一覧
    List {
        /// フリート種別 (all, active, spares, staff, archived)
        #[arg(short, long, default_value = "all")]
        fleet: String,
    },
    /// 保証期間内の端末
    Warranty {
        /// フリート種別 (all, active, spares, staff, archived)
        #[arg(short, long, default_value = "all")]
        fleet: String,
    },
    /// 経過年数順の一覧
    Age {
        /// フリート種別 (all, active, spares, staff, archived)
        #[arg(short, long, default_value = "all")]
        fleet: String,
        /// この年数以上の端末だけを表示（0 なら全件）
        #[arg(short, long, default_value_t = 0.0)]
        older_than: f64,
    },
    /// ステータス別の一覧
    Status {
        /// 絞り込むステータス（省略時は全件）
        status: Option<String>,
        /// フリート種別 (all, active, spares, staff, archived)
        #[arg(short, long, default_value = "all")]
        fleet: String,
        /// ステータス名ではなくステータス種別で分類
        #[arg(long)]
        by_type: bool,
    },
    /// メーカー別の一覧
    Manufacturer {
        /// フリート種別 (all, active, spares, staff, archived)
        #[arg(short, long, default_value = "all")]
        fleet: String,
    },
    /// 推定売却価格
    Price {
        /// アセットタグ
        asset_tag: String,
    },
    /// 1台の詳細
    Info {
        /// アセットタグ
        asset_tag: String,
    },
}

/// ユーザーのサブコマンド
#[derive(Subcommand)]
enum UserCommands {
    /// 全ユーザーと割り当て端末
    List,
    /// 端末が割り当てられていないユーザー
    NoLaptops,
    /// 端末が2台以上割り当てられているユーザー
    MultipleLaptops,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 表は stdout、ログは stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Versionコマンドは設定ファイル不要
    if matches!(cli.command, Commands::Version) {
        println!("snipeflow {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let settings = snipeflow_config::load_settings()?;
    let api_token = snipeflow_config::load_api_key(&settings.api_key_path)?;

    tracing::debug!(api_url = %settings.api_url(), strict = cli.strict, "Connecting to Snipe-IT");
    let transport = HttpTransport::new(settings.api_url(), api_token)?;
    let policy = if cli.strict {
        MergePolicy::Strict
    } else {
        MergePolicy::KeepPrefix
    };
    let client = PagingClient::new(Arc::new(transport)).with_merge_policy(policy);

    let category = TrackedCategory {
        id: settings.category_id,
        name: settings.category_name.clone(),
    };
    let today = chrono::Local::now().date_naive();
    let fleet = FleetCache::new(client, category, today);
    let mut engine = ReportEngine::new(fleet, settings.depreciation_years);

    match cli.command {
        Commands::Laptop(cmd) => match cmd {
            LaptopCommands::List { fleet } => {
                commands::laptop::handle_list(&mut engine, &fleet).await?;
            }
            LaptopCommands::Warranty { fleet } => {
                commands::laptop::handle_warranty(&mut engine, &fleet).await?;
            }
            LaptopCommands::Age { fleet, older_than } => {
                commands::laptop::handle_age(&mut engine, &fleet, older_than).await?;
            }
            LaptopCommands::Status {
                status,
                fleet,
                by_type,
            } => {
                commands::laptop::handle_status(&mut engine, &fleet, status.as_deref(), by_type)
                    .await?;
            }
            LaptopCommands::Manufacturer { fleet } => {
                commands::laptop::handle_manufacturer(&mut engine, &fleet).await?;
            }
            LaptopCommands::Price { asset_tag } => {
                commands::laptop::handle_price(&mut engine, &asset_tag).await?;
            }
            LaptopCommands::Info { asset_tag } => {
                commands::laptop::handle_info(&mut engine, &settings.base_url, &asset_tag).await?;
            }
        },
        Commands::User(cmd) => match cmd {
            UserCommands::List => commands::user::handle_list(&mut engine).await?,
            UserCommands::NoLaptops => commands::user::handle_without_laptops(&mut engine).await?,
            UserCommands::MultipleLaptops => {
                commands::user::handle_multiple_laptops(&mut engine).await?
            }
        },
        Commands::Statuses => commands::catalog::handle_statuses(&mut engine).await?,
        Commands::Models => commands::catalog::handle_models(&mut engine).await?,
        Commands::Manufacturers => commands::catalog::handle_manufacturers(&mut engine).await?,
        Commands::Version => {
            unreachable!("Version is handled before config loading");
        }
    }

    Ok(())
}
