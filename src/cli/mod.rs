use crate::{
    oracles::{
        CallerQuota, GooglePlacesOracle, InMemoryQuotaStore, NoopPlaceOracle, PlaceOracle,
    },
    schemas::{request_schema, RequestValidator},
    PlannerConfig, SimulationRequest, TripPlanner,
};
use anyhow::{bail, Context};
use clap::{Arg, ArgAction, ArgMatches, Command};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn build_command() -> Command {
    Command::new("trip-budget")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Plan a trip itinerary from a total budget and comfort tiers")
        .subcommand_required(true)
        .subcommand(
            Command::new("simulate")
                .about("Run a budget simulation")
                .arg(
                    Arg::new("destination")
                        .help("Where to travel")
                        .required_unless_present("request")
                        .index(1),
                )
                .arg(
                    Arg::new("budget")
                        .short('b')
                        .long("budget")
                        .value_name("AMOUNT")
                        .help("Total trip budget")
                        .required_unless_present("request"),
                )
                .arg(
                    Arg::new("lodging")
                        .short('l')
                        .long("lodging")
                        .value_name("TIER")
                        .help("economy | standard | luxury")
                        .default_value("standard"),
                )
                .arg(
                    Arg::new("food")
                        .short('f')
                        .long("food")
                        .value_name("TIER")
                        .help("basic | varied | gourmet")
                        .default_value("varied"),
                )
                .arg(
                    Arg::new("activity")
                        .short('a')
                        .long("activity")
                        .value_name("TIER")
                        .help("discovery | cultural | adventure")
                        .default_value("cultural"),
                )
                .arg(
                    Arg::new("days")
                        .short('d')
                        .long("days")
                        .value_name("COUNT")
                        .help("Force the trip length (still capped by the caller's plan)"),
                )
                .arg(
                    Arg::new("caller")
                        .short('c')
                        .long("caller")
                        .value_name("ID")
                        .help("Caller identity used for quota accounting")
                        .default_value("local"),
                )
                .arg(
                    Arg::new("premium")
                        .long("premium")
                        .help("Treat the caller as premium")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("free-uses")
                        .long("free-uses")
                        .value_name("COUNT")
                        .help("Free simulations granted to a non-premium caller")
                        .default_value("3"),
                )
                .arg(
                    Arg::new("no-places")
                        .long("no-places")
                        .help("Skip place lookups")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .value_name("SEED")
                        .help("Seed for reproducible place picks"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print the full result as JSON")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("request")
                        .short('r')
                        .long("request")
                        .value_name("FILE")
                        .help("Read a JSON request from FILE instead of the flags")
                        .conflicts_with_all(["destination", "budget"]),
                ),
        )
        .subcommand(
            Command::new("places")
                .about("Query the place provider directly")
                .subcommand_required(true)
                .subcommand(
                    Command::new("search")
                        .about("Text search")
                        .arg(Arg::new("query").required(true).index(1))
                        .arg(
                            Arg::new("destination")
                                .long("destination")
                                .value_name("CITY")
                                .required(true),
                        )
                        .arg(
                            Arg::new("type")
                                .short('t')
                                .long("type")
                                .value_name("TYPE")
                                .default_value("tourist_attraction"),
                        ),
                )
                .subcommand(
                    Command::new("details")
                        .about("Details of a single place")
                        .arg(Arg::new("place-id").required(true).index(1)),
                ),
        )
        .subcommand(Command::new("schema").about("Print the request JSON Schema"))
}

/// CLI entry point for the trip-budget tool
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let matches = build_command().get_matches();

    match matches.subcommand() {
        Some(("simulate", sub)) => simulate(sub).await,
        Some(("places", sub)) => places(sub).await,
        Some(("schema", _)) => {
            println!("{}", serde_json::to_string_pretty(request_schema())?);
            Ok(())
        }
        _ => unreachable!("subcommand_required"),
    }
}

fn read_request(matches: &ArgMatches) -> anyhow::Result<SimulationRequest> {
    let validator = RequestValidator::Strict;

    if let Some(path) = matches.get_one::<String>("request") {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read request file {path}"))?;
        return Ok(validator.parse_str(&raw)?);
    }

    let budget: f64 = matches
        .get_one::<String>("budget")
        .context("--budget is required")?
        .parse()
        .context("--budget must be a number")?;

    let mut payload = json!({
        "callerId": matches.get_one::<String>("caller").context("--caller is required")?,
        "destination": matches.get_one::<String>("destination").context("destination is required")?,
        "totalBudget": budget,
        "lodgingTier": matches.get_one::<String>("lodging").context("--lodging is required")?,
        "foodTier": matches.get_one::<String>("food").context("--food is required")?,
        "activityTier": matches.get_one::<String>("activity").context("--activity is required")?,
    });

    if let Some(days) = matches.get_one::<String>("days") {
        let days: u32 = days.parse().context("--days must be a whole number")?;
        payload["dayOverride"] = json!(days);
    }

    Ok(validator.parse(payload)?)
}

fn place_oracle() -> Arc<dyn PlaceOracle> {
    match GooglePlacesOracle::from_env() {
        Ok(oracle) => Arc::new(oracle),
        Err(err) => {
            warn!("{err}; place suggestions disabled");
            Arc::new(NoopPlaceOracle)
        }
    }
}

async fn simulate(matches: &ArgMatches) -> anyhow::Result<()> {
    let request = read_request(matches)?;

    let free_uses: i64 = matches
        .get_one::<String>("free-uses")
        .context("--free-uses is required")?
        .parse()
        .context("--free-uses must be a whole number")?;
    let quota = if matches.get_flag("premium") {
        CallerQuota::premium()
    } else {
        CallerQuota::free(free_uses)
    };
    let store = InMemoryQuotaStore::new(free_uses).with_account(request.caller_id.clone(), quota);

    let mut config = PlannerConfig::from_env()?;
    if matches.get_flag("no-places") {
        config = config.with_enrichment(false);
    }

    let mut planner = TripPlanner::new(Arc::new(store), place_oracle()).with_config(config);
    if let Some(seed) = matches.get_one::<String>("seed") {
        planner = planner.with_seed(seed.parse().context("--seed must be a whole number")?);
    }

    let tiers = request.tiers();
    info!(
        "Simulating {} with budget {:.2} ({} / {} / {})",
        request.destination, request.total_budget, tiers.lodging, tiers.food, tiers.activity
    );

    match planner.simulate(&request).await {
        Ok(result) => {
            if matches.get_flag("json") {
                println!("{}", result.to_json_pretty()?);
            } else {
                println!("{}\n", result.narrative);
                println!("{}", result.itinerary_table());
            }
            Ok(())
        }
        Err(err) => {
            error!("Simulation failed: {}", err);
            bail!("{} [{}]", err.client_message(), err.error_code())
        }
    }
}

async fn places(matches: &ArgMatches) -> anyhow::Result<()> {
    let oracle = GooglePlacesOracle::from_env()?;

    match matches.subcommand() {
        Some(("search", sub)) => {
            let query = sub.get_one::<String>("query").context("query is required")?;
            let destination = sub
                .get_one::<String>("destination")
                .context("--destination is required")?;
            let type_hint = sub.get_one::<String>("type").context("--type is required")?;

            let found = oracle.search(query, type_hint, destination).await?;
            if found.is_empty() {
                println!("No places found");
            }
            for place in found {
                println!("{} ({:.1}/5) {}", place.name, place.rating, place.description);
                if let Some(photo_ref) = &place.photo_ref {
                    println!("    {}", oracle.photo_url(photo_ref));
                }
            }
        }
        Some(("details", sub)) => {
            let place_id = sub
                .get_one::<String>("place-id")
                .context("place id is required")?;
            let place = oracle.place_details(place_id).await?;
            println!("{}", serde_json::to_string_pretty(&place)?);
        }
        _ => unreachable!("subcommand_required"),
    }

    Ok(())
}
