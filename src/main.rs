use clap::Parser;
use rclint::core::rules::format_catalogue;
use rclint::utils::{logger, validation::Validate};
use rclint::{CliConfig, ConventionsPipeline, LintEngine, LintError, LintOptions, LocalSources};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    if config.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    if config.list_rules {
        print!("{}", format_catalogue());
        return Ok(());
    }

    tracing::debug!("CLI config: {:?}", config);

    match run(&config).await {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => match e.downcast_ref::<LintError>() {
            Some(lint_error) => {
                tracing::error!(
                    "❌ Lint run failed: {} (Category: {:?}, Severity: {:?})",
                    lint_error,
                    lint_error.category(),
                    lint_error.severity()
                );
                eprintln!("❌ {}", lint_error.user_friendly_message());
                eprintln!("💡 {}", lint_error.recovery_suggestion());
                std::process::exit(lint_error.exit_code());
            }
            None => Err(e),
        },
    }
}

async fn run(config: &CliConfig) -> anyhow::Result<i32> {
    config.validate()?;
    let options = LintOptions::from_cli(config)?;
    let (format, color) = (options.format, options.color);

    if config.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    let pipeline = ConventionsPipeline::new(LocalSources::new(), options)?;
    let engine = LintEngine::new_with_monitoring(pipeline, config.monitor);
    let report = engine.run().await?;

    print!("{}", report.render(format, color)?);
    if format == rclint::OutputFormat::Json {
        println!();
    }

    Ok(report.exit_code())
}
