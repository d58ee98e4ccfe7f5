use std::time::Duration;

use anyhow::Context;
use clap::Args;
use courier_planner::LifecycleParams;
use courier_ptv::PtvClientParams;

use crate::parsers;

const POLL_INTERVAL_ENV_VAR: &str = "COURIER_POLL_INTERVAL";
const MAX_POLLS_ENV_VAR: &str = "COURIER_MAX_POLLS";

/// Flags override the environment (`PTV_API_KEY`, `PTV_BASE_URL`,
/// `COURIER_POLL_INTERVAL`, `COURIER_MAX_POLLS`), which `.env.local` and
/// `.env` may populate.
#[derive(Args, Default)]
pub struct ConfigArgs {
    /// API key of the route optimization service
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Base URL of the service, e.g. a local mock
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Delay between two progress polls (e.g. "500ms", "PT2S")
    #[arg(long, global = true, value_parser = parsers::parse_interval)]
    poll_interval: Option<Duration>,

    /// Give up after this many progress polls
    #[arg(long, global = true)]
    max_polls: Option<u32>,
}

pub struct Config {
    pub client: PtvClientParams,
    pub lifecycle: LifecycleParams,
}

impl Config {
    pub fn load(args: ConfigArgs) -> anyhow::Result<Self> {
        let mut client = match args.api_key {
            Some(api_key) => {
                let mut params = PtvClientParams::new(api_key);
                if let Ok(base_url) = std::env::var("PTV_BASE_URL") {
                    params.base_url = base_url;
                }
                params
            }
            None => PtvClientParams::from_env()
                .context("an API key is required, pass --api-key or set PTV_API_KEY")?,
        };
        if let Some(base_url) = args.base_url {
            client.base_url = base_url;
        }

        let mut lifecycle = LifecycleParams::default();
        if let Ok(interval) = std::env::var(POLL_INTERVAL_ENV_VAR) {
            lifecycle.poll_interval = parsers::parse_interval(&interval)
                .map_err(|error| anyhow::anyhow!("{}: {}", POLL_INTERVAL_ENV_VAR, error))?;
        }
        if let Ok(max_polls) = std::env::var(MAX_POLLS_ENV_VAR) {
            lifecycle.max_polls = Some(
                max_polls
                    .parse()
                    .with_context(|| format!("{} must be a number", MAX_POLLS_ENV_VAR))?,
            );
        }

        if let Some(interval) = args.poll_interval {
            lifecycle.poll_interval = interval;
        }
        if args.max_polls.is_some() {
            lifecycle.max_polls = args.max_polls;
        }

        Ok(Self { client, lifecycle })
    }
}
