use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use carpool_planner::config::PlannerConfig;
use carpool_planner::haversine::HaversineProvider;
use carpool_planner::kakao::{KakaoClient, KakaoConfig};
use carpool_planner::traits::RouteSummaryProvider;
use carpool_planner::{RoutePlanner, RouteRequest};

#[derive(Parser)]
#[clap(author, version, about = "Validate and price a shared ride", long_about = None)]
struct Cli {
    /// Request JSON (`{"start": {...}, "points": {...}}`); reads stdin when omitted
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Planner configuration JSON (reference_fare, reference_rate, min_availability)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Estimate distances and fares locally instead of calling the directions API
    #[arg(long)]
    offline: bool,

    #[arg(short, long)]
    debug: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("opening config {}", path.display()))?;
            serde_json::from_reader(BufReader::new(file))?
        }
        None => PlannerConfig::default(),
    };

    let request: RouteRequest = match &cli.input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("opening request {}", path.display()))?;
            serde_json::from_reader(BufReader::new(file))?
        }
        None => {
            let mut body = String::new();
            io::stdin().read_to_string(&mut body)?;
            serde_json::from_str(&body)?
        }
    };

    if cli.offline {
        info!("using haversine estimates");
        run(HaversineProvider::default(), config, &request)
    } else {
        let kakao = KakaoConfig::from_env().context("KAKAO_API_KEY must be set")?;
        run(KakaoClient::new(kakao)?, config, &request)
    }
}

fn run<P: RouteSummaryProvider>(
    provider: P,
    config: PlannerConfig,
    request: &RouteRequest,
) -> anyhow::Result<ExitCode> {
    let planner = RoutePlanner::new(provider, config);
    match planner.validate_route(request) {
        Ok(quote) => {
            println!("{}", serde_json::to_string_pretty(&quote)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            error!(status = err.status_code(), "{}", err);
            let body = serde_json::json!({
                "status": err.status_code(),
                "detail": err.to_string(),
            });
            println!("{}", body);
            Ok(ExitCode::from(if err.is_client_error() { 2 } else { 1 }))
        }
    }
}
