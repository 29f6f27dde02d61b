//! # wayfare: Command-Line Host
//!
//! Drives the booking engine from the terminal.
//!
//! ```text
//! wayfare catalog
//! wayfare quote    --pickup-date 2025-03-01 --return-date 2025-03-04 --airport \
//!                  --protection standard --extra gps --extra child_seat=2
//! wayfare checkout --pickup-date 2025-03-01 --return-date 2025-03-04 \
//!                  --outcome decline
//! ```

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{error, info, warn};
use wayfare_booking::{
    init_tracing, BookingStore, EngineConfig, SharedBookingStore, SimulatedGateway,
    SimulatedOutcome,
};
use wayfare_core::catalog::{AVAILABLE_EXTRAS, PROTECTION_PACKAGES};
use wayfare_core::validation::{validate_driver_info, validate_payment_data};
use wayfare_core::{
    Car, CarExtra, DriverInfo, ExtraKind, Location, LocationKind, PaymentData, ProtectionPackage,
};

type CliResult<T> = Result<T, Box<dyn Error>>;

#[derive(Parser)]
#[command(name = "wayfare", about = "Car-rental booking and pricing engine")]
struct Args {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print protection packages and extras as JSON
    Catalog,

    /// Price a booking and print its snapshot
    Quote(BookingArgs),

    /// Run the full checkout against the simulated gateway
    Checkout {
        #[command(flatten)]
        booking: BookingArgs,

        /// What the simulated gateway answers
        #[arg(long, default_value_t, value_enum)]
        outcome: Outcome,

        /// Press "cancel" this many milliseconds after confirming
        #[arg(long)]
        cancel_after_ms: Option<u64>,
    },
}

#[derive(clap::Args)]
struct BookingArgs {
    /// Pickup date (YYYY-MM-DD)
    #[arg(long)]
    pickup_date: NaiveDate,

    /// Return date (YYYY-MM-DD)
    #[arg(long)]
    return_date: NaiveDate,

    /// Pickup location code
    #[arg(long, default_value = "LAX")]
    pickup: String,

    /// Pickup location is an airport
    #[arg(long)]
    airport: bool,

    /// Car name
    #[arg(long, default_value = "Toyota Corolla")]
    car: String,

    /// Daily price in cents
    #[arg(long, default_value_t = 5_000)]
    price_cents: i64,

    /// Protection tier: basic, standard or premium
    #[arg(long, default_value = "basic")]
    protection: String,

    /// Extra as `id` or `id=quantity`; repeatable
    #[arg(long = "extra")]
    extras: Vec<String>,

    #[arg(long)]
    driver_age: Option<u32>,
}

#[derive(Clone, Copy, Default, ValueEnum)]
enum Outcome {
    #[default]
    Approve,
    Decline,
    Network,
    Hang,
}

impl From<Outcome> for SimulatedOutcome {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Approve => SimulatedOutcome::Approve,
            Outcome::Decline => SimulatedOutcome::Decline("card declined by issuer".to_string()),
            Outcome::Network => SimulatedOutcome::NetworkError("gateway unreachable".to_string()),
            Outcome::Hang => SimulatedOutcome::Hang,
        }
    }
}

#[derive(Serialize)]
struct CatalogOutput<'a> {
    protection: &'a [ProtectionPackage],
    extras: &'a [CarExtra],
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> CliResult<()> {
    let config = EngineConfig::load_or_default(args.config);

    match args.command {
        Command::Catalog => {
            let output = CatalogOutput {
                protection: &PROTECTION_PACKAGES,
                extras: &AVAILABLE_EXTRAS,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Command::Quote(booking) => {
            let store = build_store(&config, &booking)?;
            println!("{}", serde_json::to_string_pretty(&store.snapshot())?);
            print_breakdown(&config, &store);
        }
        Command::Checkout {
            booking,
            outcome,
            cancel_after_ms,
        } => checkout(&config, &booking, outcome, cancel_after_ms).await?,
    }

    Ok(())
}

fn build_store(config: &EngineConfig, args: &BookingArgs) -> CliResult<BookingStore> {
    let mut store = BookingStore::from_config(config)?;

    let kind = if args.airport {
        LocationKind::Airport
    } else {
        LocationKind::City
    };
    store.set_pickup_location(Location::new(
        format!("loc-{}", args.pickup.to_lowercase()),
        args.pickup.clone(),
        args.pickup.clone(),
        kind,
    ));
    store.set_pickup_date(args.pickup_date);
    store.set_return_date(args.return_date);

    if let Some(age) = args.driver_age {
        if !store.set_driver_age(age) {
            warn!(age, "Driver age out of range, keeping default");
        }
    }

    store.select_car(Car::new("car-cli", args.car.clone(), args.price_cents))?;
    store.select_protection_id(&args.protection)?;

    for entry in &args.extras {
        let (id, qty) = match entry.split_once('=') {
            Some((id, qty)) => (id, Some(qty.parse::<u32>()?)),
            None => (entry.as_str(), None),
        };
        let kind: ExtraKind = id.parse()?;
        if !store.selection().is_extra_selected(kind) {
            store.toggle_extra(kind);
        }
        if let Some(qty) = qty {
            store.set_extra_quantity(kind, qty);
        }
    }

    Ok(store)
}

fn print_breakdown(config: &EngineConfig, store: &BookingStore) {
    let Some(pricing) = store.pricing() else {
        return;
    };

    println!();
    for line in pricing.lines() {
        println!("{:<32}{:>12}", line.label, config.format_currency(line.amount));
    }
    println!("{:<32}{:>12}", "Total", config.format_currency(pricing.total));

    if let Some(notice) = store.young_driver_notice() {
        println!(
            "\nDrivers under 25 may pay {}/day at the counter (about {} for this trip).",
            config.format_currency(notice.fee_per_day),
            config.format_currency(notice.estimated_fee)
        );
    }
}

async fn checkout(
    config: &EngineConfig,
    booking: &BookingArgs,
    outcome: Outcome,
    cancel_after_ms: Option<u64>,
) -> CliResult<()> {
    let mut store = build_store(config, booking)?;

    let driver = DriverInfo {
        first_name: "Alex".to_string(),
        last_name: "Rivera".to_string(),
        email: "alex.rivera@example.com".to_string(),
        phone: "+1 555 0142".to_string(),
        license_number: "R5550142".to_string(),
        license_country: "US".to_string(),
        ..DriverInfo::default()
    };
    let payment = PaymentData {
        card_number: "4242 4242 4242 4242".to_string(),
        expiry: "09/29".to_string(),
        cvv: "314".to_string(),
        cardholder_name: "Alex Rivera".to_string(),
        billing_address: "100 Market St".to_string(),
        city: "San Francisco".to_string(),
        state: "CA".to_string(),
        zip_code: "94105".to_string(),
        country: "US".to_string(),
    };
    validate_driver_info(&driver)?;
    validate_payment_data(&payment)?;
    store.set_primary_driver(driver);
    store.set_payment_data(payment);

    print_breakdown(config, &store);

    let shared = SharedBookingStore::new(store, config.confirm_timeout());
    let gateway = SimulatedGateway::new(config.simulated_delay(), outcome.into());

    if let Some(ms) = cancel_after_ms {
        let shared = shared.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(ms)).await;
            if shared.cancel_confirmation().await {
                info!("Cancel pressed");
            }
        });
    }

    info!("Submitting booking");
    match shared.confirm(&gateway).await {
        Ok(confirmation) => println!(
            "\nConfirmed: {} ({})",
            confirmation.reference,
            config.format_currency(confirmation.total)
        ),
        Err(e) => println!("\nNot confirmed: {}", e),
    }

    println!("{}", serde_json::to_string_pretty(&shared.snapshot().await)?);
    Ok(())
}
