// Interactive AQI Prediction & Health Advisory
//
// Purpose: Terminal front end over the same prediction service as the web app
// Usage:
//   cargo run --bin aqi_cli                       # interactive shell
//   cargo run --bin aqi_cli -- 40 80 1.2 30 10 25 # one-shot (PM2.5 PM10 CO NO2 SO2 O3)

use std::io::{self, BufRead, Write};

use anyhow::Result;
use aqi_advisor::sanity::SANITY_BANNER;
use aqi_advisor::service::VALIDATION_FAILED_MESSAGE;
use aqi_advisor::{
    permitted_ranges, sanity_warnings, AdvisoryContext, Pollutant, PollutantReading, Prediction,
    PredictionError, PredictionService, RawInputs, Settings,
};
use serde_json::Value;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Logs go to stderr so they don't interleave with prompts
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aqi_advisor=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let settings = Settings::from_env();
    let service = PredictionService::new(AdvisoryContext::load(&settings));

    let args: Vec<String> = std::env::args().skip(1).collect();
    if !args.is_empty() {
        return run_once(&service, &args, settings.top_cities);
    }

    println!("Air Quality Prediction & Health Advisory System");
    println!("{}", "=".repeat(60));
    println!("Predicts the Air Quality Index (AQI) from pollutant levels and");
    println!("translates the result into simple health guidance.\n");

    if !service.context().model_available() {
        println!("Warning: model not found. Train and export the model first.");
        println!("Predictions will be unavailable.\n");
    }

    println!("Type 'predict' to enter readings, 'help' for commands, 'exit' to quit\n");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else { break };
        let input = line?;
        let input = input.trim();

        match input {
            "" => continue,
            "exit" | "quit" => break,
            "help" => print_help(),
            "ranges" => print_ranges(),
            "predict" => match prompt_reading(&mut lines)? {
                Some(reading) => predict_and_print(&service, &reading, settings.top_cities),
                None => break,
            },
            other => eprintln!("Unknown command: {} (try 'help')", other),
        }
    }

    println!("Goodbye!");
    Ok(())
}

/// One-shot mode: six values on the command line in feature order
fn run_once(service: &PredictionService, args: &[String], top_n: usize) -> Result<()> {
    if args.len() != Pollutant::ALL.len() {
        anyhow::bail!(
            "expected {} values (PM2.5 PM10 CO NO2 SO2 O3), got {}",
            Pollutant::ALL.len(),
            args.len()
        );
    }

    let raw: RawInputs = Pollutant::ALL
        .iter()
        .zip(args)
        .map(|(p, v)| (p.key().to_string(), Value::String(v.clone())))
        .collect();

    let result = service.predict(&raw);
    print_result(service, &result, top_n);
    if result.is_err() {
        std::process::exit(1);
    }
    Ok(())
}

fn print_help() {
    println!("Commands:");
    println!("  predict   Enter the six pollutant values and predict AQI");
    println!("  ranges    Show permitted input ranges");
    println!("  help      Show this message");
    println!("  exit      Quit");
}

fn print_ranges() {
    for range in permitted_ranges() {
        println!("  {:<6} {} to {}", range.label, range.min, range.max);
    }
}

/// Ask for each pollutant until a non-negative number is entered.
/// Returns `None` on end of input.
fn prompt_reading<B: BufRead>(lines: &mut io::Lines<B>) -> Result<Option<PollutantReading>> {
    println!("\nEnter Pollutant Values");
    let mut values = [0.0; 6];

    for pollutant in Pollutant::ALL {
        loop {
            print!("  {}: ", pollutant.label());
            io::stdout().flush()?;

            let Some(line) = lines.next() else { return Ok(None) };
            match line?.trim().parse::<f64>() {
                Ok(v) if v.is_finite() && v >= 0.0 => {
                    values[pollutant.index()] = v;
                    break;
                }
                _ => println!("  Please enter a number of at least 0."),
            }
        }
    }

    Ok(Some(PollutantReading::from_ordered(values)))
}

fn predict_and_print(service: &PredictionService, reading: &PollutantReading, top_n: usize) {
    let warnings = sanity_warnings(reading);
    if !warnings.is_empty() {
        println!("\n{}", SANITY_BANNER);
        for warning in &warnings {
            println!("  • {}", warning);
        }
    }

    let raw: RawInputs = Pollutant::ALL
        .iter()
        .map(|p| (p.key().to_string(), Value::from(reading.get(*p))))
        .collect();

    print_result(service, &service.predict(&raw), top_n);
}

fn print_result(
    service: &PredictionService,
    result: &Result<Prediction, PredictionError>,
    top_n: usize,
) {
    println!();
    match result {
        Ok(prediction) => {
            println!("Prediction Result");
            println!("{}", "-".repeat(60));
            println!("  Predicted AQI: {}", prediction.pollution_score);
            println!("  Category:      {}", prediction.category);
            println!("\nHealth Advisory");
            println!("  {}", prediction.advice);
            if let Some(alert) = prediction.hazard_alert {
                println!("\n  !! {}", alert);
            }

            let cities = service.context().ranking().top_polluted(top_n);
            if !cities.is_empty() {
                println!("\nMost Polluted Cities (average AQI)");
                for (i, city) in cities.iter().enumerate() {
                    println!("  {}. {:<20} {:.2}", i + 1, city.city, city.avg_aqi);
                }
            }
        }
        Err(PredictionError::Validation(errors)) => {
            println!("{}", VALIDATION_FAILED_MESSAGE);
            for (field, message) in errors {
                let label = Pollutant::from_key(field).map(|p| p.label()).unwrap_or(field.as_str());
                println!("  {}: {}", label, message);
            }
        }
        Err(e) => println!("{}", e.public_message()),
    }
    println!();
}
