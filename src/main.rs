use clap::Parser;
use stickbug::utils::error::{ErrorSeverity, StickbugError};
use stickbug::utils::{logger, validation::Validate};
use stickbug::{CliConfig, Command, EtlEngine, ExtractPipeline, LocalStorage, MorphPipeline};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting stickbug CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 載入設定檔並套用命令列覆蓋，再驗證
    let config = match cli
        .validate()
        .and_then(|_| cli.resolve())
        .and_then(|config| config.validate().map(|_| config))
    {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    let storage = LocalStorage::default();
    let result = match &cli.command {
        Command::Extract {
            svg, output_file, ..
        } => {
            let pipeline =
                ExtractPipeline::new(storage, config, svg.clone()).with_output_file(output_file);
            EtlEngine::new(pipeline).run().await
        }
        Command::Morph {
            source, reference, ..
        } => {
            let pipeline = MorphPipeline::new(storage, config, source.clone(), reference.clone());
            EtlEngine::new(pipeline).run().await
        }
    };

    match result {
        Ok(output_path) => {
            tracing::info!("✅ Completed successfully!");
            tracing::info!("📁 Output saved to: {}", output_path);
            println!("✅ Completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            let exit_code = report_failure(&e);
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn report_failure(e: &StickbugError) -> i32 {
    tracing::error!(
        "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}
