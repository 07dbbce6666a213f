use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "trip-cli")]
#[command(about = "Client CLI for the trip aggregator", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct RouteArgs {
    #[arg(long)]
    from: String,

    #[arg(long)]
    to: String,

    #[arg(long, default_value = "")]
    date: String,
}

#[derive(Clone, Copy, ValueEnum)]
enum Api {
    V1,
    V2,
    #[value(name = "v2-cb")]
    V2Cb,
}

#[derive(Subcommand)]
enum Commands {
    /// Search flights and hotels (v2 adds weather)
    Search {
        #[arg(long, value_enum, default_value = "v1")]
        api: Api,

        #[command(flatten)]
        route: RouteArgs,
    },
    /// Cheapest flight plus matching hotels
    Cheapest(RouteArgs),
    /// Search with events for coastal destinations
    Contextual(RouteArgs),
    /// Show the weather circuit breaker
    BreakerStatus,
    /// Show API version hit counters
    Stats,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let (path, route) = match &cli.command {
        Commands::Search { api, route } => {
            let path = match api {
                Api::V1 => "/v1/trips/search",
                Api::V2 => "/v2/trips/search",
                Api::V2Cb => "/v2-cb/trips/search",
            };
            (path, Some(route))
        }
        Commands::Cheapest(route) => ("/v1/trips/cheapest-route", Some(route)),
        Commands::Contextual(route) => ("/v1/trips/contextual", Some(route)),
        Commands::BreakerStatus => ("/circuit-breaker/status", None),
        Commands::Stats => ("/versioning/stats", None),
    };

    let mut request = client.get(format!("{}{}", base, path));
    if let Some(route) = route {
        request = request.query(&[
            ("from", route.from.as_str()),
            ("to", route.to.as_str()),
            ("date", route.date.as_str()),
        ]);
    }

    print_response(request.send().await?).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: aggregator returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
