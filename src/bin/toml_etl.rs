use clap::Parser;
use photo_kpi_etl::core::ConfigProvider;
use photo_kpi_etl::domain::model::SourceKind;
use photo_kpi_etl::utils::error::ErrorSeverity;
use photo_kpi_etl::utils::{logger, validation::Validate};
use photo_kpi_etl::{EtlEngine, KpiPipeline, LocalStorage, TomlConfig};
use std::collections::BTreeMap;

#[derive(Parser)]
#[command(name = "toml-etl")]
#[command(about = "Photo metadata / detection KPI ETL with TOML configuration")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "kpi-config.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override the mock bucket setting from config
    #[arg(long)]
    mock_bucket: Option<bool>,

    /// Dry run - list the files that would be processed without executing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 載入 TOML 配置
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 初始化日誌
    if config.json_logs() {
        logger::init_json_logger(config.log_level());
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting TOML-based photo KPI ETL");
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 應用命令列覆蓋設定
    if let Some(mock_bucket) = args.mock_bucket {
        config.source.mock_bucket = Some(mock_bucket);
        tracing::info!("🔧 Mock bucket overridden to: {}", mock_bucket);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No actual processing will occur");
        perform_dry_run(&config)?;
        return Ok(());
    }

    let storage = LocalStorage::new(".".to_string());
    let pipeline = KpiPipeline::new(storage, config);
    let engine = EtlEngine::new(pipeline);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ ETL process completed successfully!");
            println!("✅ ETL process completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ ETL process failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!(
        "  Pipeline: {} v{}",
        config.pipeline.name, config.pipeline.version
    );
    if let Some(description) = &config.pipeline.description {
        println!("  Description: {}", description);
    }
    println!("  Input: {}", config.input_path());
    println!("  Output: {}/{}", config.output_path(), config.bundle_name());
    println!("  Provenance: {}", config.provenance());
    println!("  Formats: {}", config.load.output_formats.join(", "));
    println!("  Concurrency: {}", TomlConfig::concurrency(config));
    println!("  Mock Bucket: {}", config.mock_bucket());

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &TomlConfig) -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Dry Run Analysis:");
    println!();

    let mut groups: BTreeMap<&'static str, Vec<String>> = BTreeMap::new();
    for entry in std::fs::read_dir(config.input_path())? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        let label = match SourceKind::classify(&name) {
            Some(SourceKind::Image) => "🖼️ Images",
            Some(SourceKind::Sidecar) => "🏷️ Tag sidecars",
            Some(SourceKind::Detection(_)) => "🎯 Detection files",
            None => "⏭️ Ignored",
        };
        groups.entry(label).or_default().push(name);
    }

    for (label, mut names) in groups {
        names.sort();
        println!("{} ({}):", label, names.len());
        for name in names {
            println!("  {}", name);
        }
    }

    println!();
    println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");

    Ok(())
}
