use food_search::{FoodSearchAggregator, SearchConfig};
use log::{debug, error};
use std::env;
use std::process::ExitCode;

const USAGE: &str = "Usage: food-search [--limit N] <query>...";

struct Args {
    query: String,
    limit: Option<usize>,
}

fn parse_args(raw: impl IntoIterator<Item = String>) -> Result<Args, String> {
    let mut words = Vec::new();
    let mut limit = None;
    let mut raw = raw.into_iter();

    while let Some(arg) = raw.next() {
        match arg.as_str() {
            "-h" | "--help" => return Err(USAGE.to_string()),
            "-n" | "--limit" => {
                let value = raw.next().ok_or("--limit needs a value")?;
                limit = Some(
                    value
                        .parse()
                        .map_err(|_| format!("Invalid limit: {}", value))?,
                );
            }
            _ => words.push(arg),
        }
    }

    if words.is_empty() {
        return Err(USAGE.to_string());
    }

    Ok(Args {
        query: words.join(" "),
        limit,
    })
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let args = match parse_args(env::args().skip(1)) {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{}", msg);
            return ExitCode::from(2);
        }
    };

    let config = match SearchConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let aggregator = match FoodSearchAggregator::from_config(&config) {
        Ok(aggregator) => aggregator,
        Err(e) => {
            error!("Failed to set up providers: {}", e);
            return ExitCode::FAILURE;
        }
    };
    debug!("{:?}", aggregator);

    let mut suggestions = aggregator.search(&args.query).await;
    if let Some(limit) = args.limit {
        suggestions.truncate(limit);
    }

    match serde_json::to_string_pretty(&suggestions) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to serialize results: {}", e);
            ExitCode::FAILURE
        }
    }
}
