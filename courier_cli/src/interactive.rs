use std::{collections::HashMap, path::PathBuf, sync::Arc};

use clap::{Args, Parser, Subcommand, ValueEnum};
use courier_planner::{
    LifecycleError, Planner, PlannerError,
    session::{ServiceType, TransportSpec},
};
use courier_ptv::{geocoding::GeocodedLocation, vehicle_profile::VehicleProfile};
use geojson::GeoJson;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use crate::{
    parsers::parse_time_of_day,
    terminal::{kpi_table, suggestions_table, transports_table},
};

#[derive(Parser)]
#[command(no_binary_name = true, disable_version_flag = true)]
struct Line {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search addresses for the pickup or the delivery
    Search {
        service_type: ServiceType,
        query: Vec<String>,
    },
    /// Select one of the last search results (1-based)
    Select {
        service_type: ServiceType,
        number: usize,
    },
    /// Register a transport between the selected addresses
    Add(AddArgs),
    /// List the registered transports
    Transports,
    /// Optimize the registered transports in the background
    Optimize {
        #[arg(long, default_value = "1", allow_hyphen_values = true)]
        vehicles: String,

        #[arg(long, default_value_t = VehicleProfile::EurCar)]
        profile: VehicleProfile,
    },
    /// Show the route of the next or previous used vehicle
    Vehicle { direction: Direction },
    Kpis,
    /// Write markers and route lines as GeoJSON
    Export { file: PathBuf },
    /// Remove all transports and the optimization result
    Clear,
    #[command(visible_alias = "exit")]
    Quit,
}

#[derive(Args)]
struct AddArgs {
    #[arg(long, value_parser = parse_time_of_day)]
    pickup_from: Option<jiff::civil::Time>,
    #[arg(long, value_parser = parse_time_of_day)]
    pickup_to: Option<jiff::civil::Time>,
    #[arg(long, value_parser = parse_time_of_day)]
    delivery_from: Option<jiff::civil::Time>,
    #[arg(long, value_parser = parse_time_of_day)]
    delivery_to: Option<jiff::civil::Time>,

    /// Service time at the pickup in minutes
    #[arg(long)]
    pickup_service: Option<u32>,
    /// Service time at the delivery in minutes
    #[arg(long)]
    delivery_service: Option<u32>,
}

impl AddArgs {
    fn spec(&self) -> TransportSpec {
        let mut spec = TransportSpec::default();
        if let Some(from) = self.pickup_from {
            spec.pickup_hours.from = from;
        }
        if let Some(to) = self.pickup_to {
            spec.pickup_hours.to = to;
        }
        if let Some(from) = self.delivery_from {
            spec.delivery_hours.from = from;
        }
        if let Some(to) = self.delivery_to {
            spec.delivery_hours.to = to;
        }
        if let Some(minutes) = self.pickup_service {
            spec.pickup_service_minutes = minutes;
        }
        if let Some(minutes) = self.delivery_service {
            spec.delivery_service_minutes = minutes;
        }
        spec
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Direction {
    Next,
    Prev,
}

impl Direction {
    fn step(self) -> i64 {
        match self {
            Direction::Next => 1,
            Direction::Prev => -1,
        }
    }
}

enum Flow {
    Continue,
    Quit,
}

struct Repl {
    planner: Arc<Planner>,
    suggestions: HashMap<ServiceType, Vec<GeocodedLocation>>,
}

impl Repl {
    async fn execute(&mut self, command: Command) -> anyhow::Result<Flow> {
        match command {
            Command::Search {
                service_type,
                query,
            } => {
                let suggestions = self
                    .planner
                    .on_location_query_changed(service_type, &query.join(" "))
                    .await?;
                if suggestions.is_empty() {
                    println!("No {service_type} address found");
                } else {
                    println!("{}", suggestions_table(&suggestions));
                }
                self.suggestions.insert(service_type, suggestions);
            }
            Command::Select {
                service_type,
                number,
            } => {
                let location = number
                    .checked_sub(1)
                    .and_then(|index| self.suggestions.get(&service_type)?.get(index))
                    .ok_or_else(|| {
                        anyhow::anyhow!("No {service_type} suggestion number {number}")
                    })?;
                println!("Selected {service_type}: {}", location.label());
                self.planner
                    .on_location_selected(service_type, location.clone());
            }
            Command::Add(args) => {
                let transport = self.planner.on_add_transport(&args.spec())?;
                self.suggestions.clear();
                println!("Added {}", transport.id);
            }
            Command::Transports => {
                println!("{}", self.planner.with_session(transports_table));
            }
            Command::Optimize { vehicles, profile } => {
                let planner = Arc::clone(&self.planner);
                tokio::spawn(async move {
                    // Other failures were already reported by the presenter.
                    if let Err(PlannerError::Lifecycle(LifecycleError::Busy)) =
                        planner.on_start_optimization(&vehicles, profile).await
                    {
                        eprintln!("{}", LifecycleError::Busy);
                    }
                });
            }
            Command::Vehicle { direction } => {
                self.planner.on_switch_vehicle(direction.step())?;
            }
            Command::Kpis => match self.planner.current_view()? {
                Some(view) => println!("{}", kpi_table(&view.kpis)),
                None => println!("Nothing optimized yet"),
            },
            Command::Export { file } => {
                let layers = GeoJson::from(self.planner.map_layers()?);
                std::fs::write(&file, layers.to_string())?;
                info!("Wrote map layers to {}", file.display());
            }
            Command::Clear => {
                self.planner.on_clear_transports()?;
                self.suggestions.clear();
                println!("Cleared all transports");
            }
            Command::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }
}

pub async fn run(planner: Arc<Planner>) -> anyhow::Result<()> {
    println!(
        "Planning day {}, type `help` for the commands",
        planner.with_session(|session| session.planning_date())
    );

    let mut repl = Repl {
        planner: Arc::clone(&planner),
        suggestions: HashMap::new(),
    };
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match Line::try_parse_from(line.split_whitespace()) {
            Ok(parsed) => parsed.command,
            Err(error) => {
                let _ = error.print();
                continue;
            }
        };

        match repl.execute(command).await {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(error) => eprintln!("{error}"),
        }
    }

    debug!("Leaving interactive mode");
    planner.shutdown();
    Ok(())
}
