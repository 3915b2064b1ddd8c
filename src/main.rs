use std::env::{self, args};
use std::str::FromStr;

use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mutex_n_condvars::dining_philosophers::{self, DinnerConfig};
use mutex_n_condvars::producer_consumer;

fn main() -> Result<(), String> {
    init_tracing();

    // the dinner is the default exercise
    let exercise = match args().nth(1) {
        None => Exercise::DiningPhilosophers,
        Some(selector) => Exercise::from_str(&selector).map_err(|_| {
            format!(
                "unknown exercise {selector}, use one of {}",
                Exercise::iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<String>>()
                    .join(",")
            )
        })?,
    };

    match exercise {
        Exercise::DiningPhilosophers => dining_philosophers::run(DinnerConfig::default())
            .map(|report| info!(total_meals = report.total_meals(), "dinner is over"))
            .map_err(|e| e.to_string()),
        Exercise::ProducerConsumer => producer_consumer::run(producer_consumer::MAX_ITEMS)
            .map(|consumed| info!(consumed = consumed.len(), "all items consumed"))
            .map_err(|e| e.to_string()),
    }
}

#[derive(EnumIter, EnumString, Display)]
#[strum(serialize_all = "snake_case")]
enum Exercise {
    DiningPhilosophers,
    ProducerConsumer,
}

/// RUST_LOG wins if set, `info` otherwise. LOG_FORMAT=json switches to JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if env::var("LOG_FORMAT").as_deref() == Ok("json") {
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init();
    } else {
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false))
            .try_init();
    }
}
