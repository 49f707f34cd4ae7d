use clap::Parser;
use redundant_deps::utils::error::ErrorSeverity;
use redundant_deps::utils::{logger, validation::Validate};
use redundant_deps::{AuditEngine, AuditPipeline, CliConfig, LocalSourceTree, LocalStorage};

const EXIT_REDUNDANT_FOUND: i32 = 4;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting redundant-deps");
    tracing::debug!("CLI config: {:?}", cli);

    let config = match cli.to_analysis_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Failed to load configuration: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let storage = LocalStorage::new(config.output_path.clone());
    let pipeline = AuditPipeline::new(storage, LocalSourceTree::new(), config);
    let engine = AuditEngine::new(pipeline);

    match engine.run().await {
        Ok(outcome) => {
            print!("{}", outcome.report.render_text());
            for path in &outcome.outputs {
                tracing::info!("📁 Report saved to: {}", path);
            }

            if cli.fail_on_redundant && outcome.report.has_redundancy() {
                std::process::exit(EXIT_REDUNDANT_FOUND);
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Audit failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());

            // 根據錯誤嚴重程度決定退出碼
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
