use clap::Parser;
use shipping_itinerary::utils::{logger, validation::Validate};
use shipping_itinerary::{
    replay, CliConfig, ErrorCategory, InMemoryCargoRepository, ScenarioConfig, ScenarioReport,
};

fn run(config: &CliConfig) -> shipping_itinerary::Result<ScenarioReport> {
    config.validate()?;

    tracing::info!("📁 Loading scenario from: {}", config.scenario);
    let scenario = ScenarioConfig::from_file(&config.scenario)?;
    scenario.validate()?;

    let world = scenario.into_world()?;
    tracing::debug!(
        "Resolved {} location(s), {} voyage(s), {} cargo(s)",
        world.locations.len(),
        world.voyages.len(),
        world.cargos.len()
    );

    replay(world, InMemoryCargoRepository::new())
}

fn print_summary(report: &ScenarioReport) {
    println!("Scenario: {}", report.name);
    for event in &report.events {
        println!(
            "  {} {:<8} {:<6} {}",
            if event.expected { "✅" } else { "⚠️" },
            event.tracking_id,
            event.event_type,
            event.location
        );
    }
    for cargo in &report.cargos {
        println!(
            "  📦 {} {:?} legs={} last_seen={} arrives={}{}",
            cargo.tracking_id,
            cargo.routing_status,
            cargo.legs,
            cargo.last_known_location,
            cargo.final_arrival_location,
            if cargo.misdirected { " (misdirected)" } else { "" }
        );
    }
    println!(
        "{} misdirected cargo(s), {} truncated itinerary(ies)",
        report.misdirected_count(),
        report.truncated_count()
    );
}

fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    if config.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting itinerary-check");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    let outcome = run(&config).and_then(|report| {
        if config.json {
            println!("{}", report.to_json()?);
        } else {
            print_summary(&report);
        }
        Ok(())
    });

    if let Err(e) = outcome {
        tracing::error!("❌ Scenario failed: {} (Category: {:?})", e, e.category());
        eprintln!("❌ {}", e);
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.category() {
            ErrorCategory::Validation => 1,
            ErrorCategory::Routing => 2,
            ErrorCategory::Configuration => 3,
            ErrorCategory::System => 4,
        };
        std::process::exit(exit_code);
    }
    Ok(())
}
