use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use courier_planner::{
    Planner,
    session::{OpeningHours, ServiceType, TransportSpec},
};
use courier_ptv::vehicle_profile::VehicleProfile;
use geojson::GeoJson;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::info;

use crate::{parsers::parse_time_of_day, terminal::transports_table};

#[derive(Args)]
pub struct OptimizeArgs {
    /// JSON file listing the transports, see `courier schema`
    #[arg(short, long)]
    input: PathBuf,

    /// Number of vehicles, anything that is not a positive number means none
    #[arg(long, default_value = "1", allow_hyphen_values = true)]
    vehicles: String,

    /// Overrides the profile of the input file, EUR_CAR when neither is set
    #[arg(long)]
    profile: Option<VehicleProfile>,

    /// Write markers and route lines of the result as GeoJSON
    #[arg(long)]
    geojson: Option<PathBuf>,
}

/// Input of the batch `optimize` command.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchInput {
    /// Profile of every vehicle, unless given on the command line
    #[serde(default)]
    pub profile: Option<VehicleProfile>,
    pub transports: Vec<BatchTransport>,
}

/// Addresses are free text, the first geocoding suggestion is used.
/// Times are `HH:MM` on the planning day, defaulting to 08:00 - 17:00.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchTransport {
    pub pickup: String,
    pub delivery: String,
    #[serde(default)]
    pub pickup_from: Option<String>,
    #[serde(default)]
    pub pickup_to: Option<String>,
    #[serde(default)]
    pub delivery_from: Option<String>,
    #[serde(default)]
    pub delivery_to: Option<String>,
    /// Minutes, defaults to 5
    #[serde(default)]
    pub pickup_service_minutes: Option<u32>,
    /// Minutes, defaults to 5
    #[serde(default)]
    pub delivery_service_minutes: Option<u32>,
}

impl BatchTransport {
    pub fn spec(&self) -> anyhow::Result<TransportSpec> {
        let defaults = TransportSpec::default();

        Ok(TransportSpec {
            pickup_hours: hours(
                self.pickup_from.as_deref(),
                self.pickup_to.as_deref(),
                defaults.pickup_hours,
            )?,
            delivery_hours: hours(
                self.delivery_from.as_deref(),
                self.delivery_to.as_deref(),
                defaults.delivery_hours,
            )?,
            pickup_service_minutes: self
                .pickup_service_minutes
                .unwrap_or(defaults.pickup_service_minutes),
            delivery_service_minutes: self
                .delivery_service_minutes
                .unwrap_or(defaults.delivery_service_minutes),
        })
    }
}

fn hours(
    from: Option<&str>,
    to: Option<&str>,
    defaults: OpeningHours,
) -> anyhow::Result<OpeningHours> {
    let parse = |input: Option<&str>, default| match input {
        Some(input) => parse_time_of_day(input).map_err(anyhow::Error::msg),
        None => Ok(default),
    };

    Ok(OpeningHours {
        from: parse(from, defaults.from)?,
        to: parse(to, defaults.to)?,
    })
}

pub fn read_input(path: &Path) -> anyhow::Result<BatchInput> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read {}", path.display()))?;

    serde_json::from_str(&content).with_context(|| format!("Invalid input {}", path.display()))
}

/// Geocodes one address and selects the first suggestion.
async fn select_first(
    planner: &Planner,
    service_type: ServiceType,
    query: &str,
) -> anyhow::Result<()> {
    let location = planner
        .on_location_query_changed(service_type, query)
        .await?
        .into_iter()
        .next()
        .with_context(|| format!("No {service_type} address found for \"{query}\""))?;
    info!("{} {}: {}", service_type, query, location.label());

    planner.on_location_selected(service_type, location);
    Ok(())
}

pub async fn run(args: OptimizeArgs, planner: &Planner) -> anyhow::Result<()> {
    let input = read_input(&args.input)?;
    if input.transports.is_empty() {
        anyhow::bail!("{} contains no transports", args.input.display());
    }

    for transport in &input.transports {
        let spec = transport.spec()?;
        select_first(planner, ServiceType::Pickup, &transport.pickup).await?;
        select_first(planner, ServiceType::Delivery, &transport.delivery).await?;
        planner.on_add_transport(&spec)?;
    }

    println!("{}", planner.with_session(transports_table));

    let profile = args.profile.or(input.profile).unwrap_or_default();
    planner
        .on_start_optimization(&args.vehicles, profile)
        .await?;

    if let Some(path) = args.geojson {
        let layers = GeoJson::from(planner.map_layers()?);
        std::fs::write(&path, layers.to_string())
            .with_context(|| format!("Cannot write {}", path.display()))?;
        info!("Wrote map layers to {}", path.display());
    }

    Ok(())
}
