use clap::Parser;
use port_grab::core::engine::run_span;
use port_grab::utils::error::ErrorSeverity;
use port_grab::utils::{logger, validation::Validate};
use port_grab::{CliConfig, FsLocator, GrabEngine, OutputFormat, Settings, YamlLoader};

fn exit_code(severity: ErrorSeverity) -> i32 {
    match severity {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let settings = match Settings::load(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(exit_code(e.severity()));
        }
    };

    if settings.json_logs {
        logger::init_json_logger(settings.verbose);
    } else {
        logger::init_cli_logger(settings.verbose);
    }
    tracing::debug!("Settings: {:?}", settings);

    if let Err(e) = settings.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(exit_code(e.severity()));
    }

    let directory = settings.directory_path();
    let engine = GrabEngine::new(
        FsLocator::from_config(&settings),
        YamlLoader::new(),
        run_span(directory, &settings.pattern),
    );

    let rendered = engine
        .run_configured(&settings)
        .await
        .and_then(|report| match settings.format {
            OutputFormat::Text => Ok(report.render_text()),
            OutputFormat::Json => report.render_json(),
        });

    match rendered {
        Ok(output) => println!("{}", output),
        Err(e) => {
            tracing::error!(
                "Port resolution failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let code = exit_code(e.severity());
            if code > 0 {
                std::process::exit(code);
            }
        }
    }

    Ok(())
}
