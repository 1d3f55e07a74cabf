use std::env;
use std::fs;
use std::path::Path;

use gem_too::astrometry::BuiltinAstrometry;
use gem_too::facility::{GemFacility, ObservationFacility};
use gem_too::form::ObservationForm;
use gem_too::gem_errors::GemError;
use gem_too::settings::GemSettings;
use gem_too::targets::import::import_targets;
use gem_too::targets::TargetList;

/// Build, validate and optionally send one ToO trigger from the files in `demos/data`.
///
/// Usage:
///   cargo run --example submit_too [DATA_DIR]
///
/// The request is only sent when `GEM_SUBMIT=1`; otherwise the payload is printed with the
/// credential hidden. Log verbosity follows `RUST_LOG` (default `info`).
#[tokio::main]
async fn main() -> Result<(), GemError> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let data_dir = env::args()
        .nth(1)
        .unwrap_or_else(|| concat!(env!("CARGO_MANIFEST_DIR"), "/demos/data").to_string());
    let data_dir = Path::new(&data_dir);

    let settings = GemSettings::load(data_dir.join("settings.toml"))?;

    let mut targets = TargetList::new("demo");
    for target in import_targets(fs::File::open(data_dir.join("targets.csv"))?, 1)? {
        targets.push(target);
    }

    let form_source = fs::read_to_string(data_dir.join("form.toml"))?;
    let form: ObservationForm = toml::from_str(&form_source)?;

    let Some(target) = targets.get(form.target_id) else {
        eprintln!("no target with id {} in targets.csv", form.target_id);
        return Ok(());
    };

    let facility = GemFacility::new(settings, Box::new(BuiltinAstrometry))?;
    println!("observations offered:");
    for (obsid, label) in facility.observation_choices() {
        println!("  {obsid:<22} {label}");
    }

    let errors = facility.is_valid(&form, target);
    if !errors.is_empty() {
        eprintln!("form is not valid:\n{}", errors.summary());
        return Ok(());
    }

    let payload = facility.observation_payload(&form, target)?;
    println!("payload for {target}: {payload:#?}");

    if env::var("GEM_SUBMIT").as_deref() == Ok("1") {
        let ids = facility.submit_observation(&payload).await?;
        println!("{} triggered observation {}", facility.name(), ids.join(", "));
    } else {
        println!("set GEM_SUBMIT=1 to send the trigger");
    }

    Ok(())
}
