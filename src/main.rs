use clap::{Parser, Subcommand};
use log::{error, info, warn};
use zigbee_attribute_adapter::codec::{AttributeEvent, RawValue, SetRequest};
use zigbee_attribute_adapter::commissioning::RecordingTransport;
use zigbee_attribute_adapter::config::{self, Config};
use zigbee_attribute_adapter::device::FamilyRegistry;
use zigbee_attribute_adapter::error::Result;
use zigbee_attribute_adapter::zcl::{AttributeId, ClusterRef};

#[derive(Parser)]
#[command(name = "zcl-adapter", version, about = "Inspect and exercise Zigbee device families")]
struct Cli {
    /// Device model to operate on [default: ADAPTER_DEFAULT_MODEL]
    #[arg(long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List registered device models
    Models,
    /// Decode attribute values reported on one cluster
    Decode {
        /// Cluster name (msTemperatureMeasurement) or id (0x0402)
        #[arg(long, value_parser = parse_cluster)]
        cluster: ClusterRef,
        /// Treat the values as a read response instead of a report
        #[arg(long)]
        read_response: bool,
        /// Attribute values as id=raw, e.g. 0x0221=25
        #[arg(value_parser = parse_attribute, required = true)]
        attributes: Vec<(AttributeId, RawValue)>,
    },
    /// Translate a set request into an attribute write
    Encode { field: String, value: String },
    /// Print the capability schema
    Exposes,
    /// Dry-run the commissioning plan and print the call sequence
    Commission,
}

fn parse_cluster(input: &str) -> std::result::Result<ClusterRef, String> {
    match ClusterRef::parse(input) {
        ClusterRef::Name(name) if name.is_empty() => Err("empty cluster name".to_string()),
        cluster => Ok(cluster),
    }
}

fn parse_attribute(input: &str) -> std::result::Result<(AttributeId, RawValue), String> {
    let (id, raw) = input
        .split_once('=')
        .ok_or_else(|| format!("expected id=raw, got {}", input))?;
    let id = id.trim();
    let id = match id.strip_prefix("0x").or_else(|| id.strip_prefix("0X")) {
        Some(hex) => AttributeId::from_str_radix(hex, 16),
        None => id.parse(),
    }
    .map_err(|e| format!("bad attribute id {}: {}", id, e))?;
    let raw = raw
        .trim()
        .parse()
        .map_err(|e| format!("bad raw value {}: {}", raw, e))?;
    Ok((id, raw))
}

fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

async fn run(cli: Cli, config: Config) -> Result<bool> {
    let registry = FamilyRegistry::builtin()?;
    let model = cli.model.unwrap_or(config.adapter.default_model);

    match cli.command {
        Command::Models => {
            for family in registry.iter() {
                let identity = family.identity();
                println!(
                    "{}\t{}\t{}",
                    identity.model, identity.vendor, identity.description
                );
            }
            Ok(true)
        }
        Command::Decode {
            cluster,
            read_response,
            attributes,
        } => {
            let family = registry.require(&model)?;
            let mut event = if read_response {
                AttributeEvent::read_response(cluster)
            } else {
                AttributeEvent::report(cluster)
            };
            event.attributes.extend(attributes);

            let outcome = family.decode(&event);
            for err in &outcome.errors {
                warn!("{}", err);
            }
            println!("{}", serde_json::to_string_pretty(&outcome.state)?);
            Ok(outcome.is_clean())
        }
        Command::Encode { field, value } => {
            let family = registry.require(&model)?;
            match family.encode(&SetRequest::new(field, value.as_str())) {
                Ok(write) => {
                    let output = serde_json::json!({
                        "write": write,
                        "payload": write.payload(),
                        "state": write.optimistic_state(),
                    });
                    println!("{}", serde_json::to_string_pretty(&output)?);
                    Ok(true)
                }
                Err(e) => {
                    error!("{}", e);
                    Ok(false)
                }
            }
        }
        Command::Exposes => {
            let family = registry.require(&model)?;
            println!("{}", serde_json::to_string_pretty(family.schema())?);
            Ok(true)
        }
        Command::Commission => {
            let family = registry.require(&model)?;
            let transport = RecordingTransport::new(
                config.commissioning.endpoint,
                config.commissioning.coordinator_endpoint,
            );
            let report = family.commission(&transport).await;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(report.is_clean())
        }
    }
}

fn main() {
    // Load .env before any thread exists, then read the environment
    config::load_dotenv();
    init_logger();

    let cli = Cli::parse();
    let config = Config::from_env();
    info!("Default model: {}", config.adapter.default_model);

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to start async runtime: {}", e);
            std::process::exit(2);
        }
    };

    match runtime.block_on(run(cli, config)) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            error!("{}", e);
            std::process::exit(2);
        }
    }
}
