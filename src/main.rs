use std::io::Write;

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand, ValueEnum};
use clap_stdin::FileOrStdin;
use serde::Serialize;
use serde_json::Value;

use z2m::api::Device;

use zigbridge::capability::{CapabilityOptions, SetContext};
use zigbridge::classify::DeviceClass;
use zigbridge::config::{self, AppConfig};
use zigbridge::device::{DeviceInfo, bridge_devices, find_device};
use zigbridge::dispatch::DeviceHandler;
use zigbridge::error::{ApiError, ApiResult};

/*
 * Formatter function to output in syslog format. This makes sense when running
 * as a service (where output might go to a log file, or the system journal)
 */
#[allow(clippy::match_same_arms)]
fn syslog_format(
    buf: &mut pretty_env_logger::env_logger::fmt::Formatter,
    record: &log::Record,
) -> std::io::Result<()> {
    writeln!(
        buf,
        "<{}>{}: {}",
        match record.level() {
            log::Level::Error => 3,
            log::Level::Warn => 4,
            log::Level::Info => 6,
            log::Level::Debug => 7,
            log::Level::Trace => 7,
        },
        record.target(),
        record.args()
    )
}

fn init_logging() -> ApiResult<()> {
    /* Try to provide reasonable default filters, when RUST_LOG is not specified */
    const DEFAULT_LOG_FILTERS: &[&str] = &["info", "zigbridge=debug"];

    let log_filters = std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTERS.join(","));

    /* Detect if we need syslog or human-readable formatting */
    if std::env::var("SYSTEMD_EXEC_PID").is_ok_and(|pid| pid == std::process::id().to_string()) {
        Ok(pretty_env_logger::env_logger::builder()
            .format(syslog_format)
            .parse_filters(&log_filters)
            .try_init()?)
    } else {
        Ok(pretty_env_logger::formatted_timed_builder()
            .parse_filters(&log_filters)
            .try_init()?)
    }
}

#[derive(Parser, Debug)]
#[command(about, long_about = None)]
struct Args {
    /// configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: Utf8PathBuf,

    /// output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutputFormat {
    Json,
    Yaml,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List mapped devices from a bridge/devices payload
    Devices {
        /// bridge/devices json
        file: FileOrStdin,
    },

    /// Show the capability updates produced by a device state payload
    Decode {
        /// bridge/devices json
        file: FileOrStdin,

        /// friendly name or ieee address
        #[arg(short, long)]
        device: String,

        /// device state json
        payload: String,
    },

    /// Show the message that sets a capability
    Encode {
        /// bridge/devices json
        file: FileOrStdin,

        /// friendly name or ieee address
        #[arg(short, long)]
        device: String,

        #[arg(short, long)]
        capability: String,

        /// new value, as json
        #[arg(short, long)]
        value: String,

        /// current hue (0..1)
        #[arg(long)]
        hue: Option<f64>,

        /// current saturation (0..1)
        #[arg(long)]
        saturation: Option<f64>,

        /// transition time in milliseconds
        #[arg(long)]
        duration_ms: Option<u32>,
    },

    /// Show the message that requests the current device state
    Get {
        /// bridge/devices json
        file: FileOrStdin,

        /// friendly name or ieee address
        #[arg(short, long)]
        device: String,
    },
}

#[derive(Serialize)]
struct CapabilitySummary {
    capability: String,
    property: String,
    settable: bool,
    options: CapabilityOptions,
}

#[derive(Serialize)]
struct DeviceSummary {
    name: String,
    id: String,
    class: DeviceClass,
    icon: String,
    capabilities: Vec<CapabilitySummary>,
}

impl From<&DeviceInfo> for DeviceSummary {
    fn from(dev: &DeviceInfo) -> Self {
        let capabilities = dev
            .capabilities()
            .iter()
            .map(|cap| CapabilitySummary {
                capability: cap.capability.clone(),
                property: cap.property.clone(),
                settable: cap.is_settable(),
                options: cap.options(dev.supports_transition),
            })
            .collect();

        Self {
            name: dev.name.clone(),
            id: dev.id.to_string(),
            class: dev.settings.device_class,
            icon: dev.icon.clone(),
            capabilities,
        }
    }
}

fn load_devices(file: FileOrStdin, config: &AppConfig) -> ApiResult<Vec<DeviceInfo>> {
    let devices: Vec<Device> = serde_json::from_str(&file.contents()?)?;
    Ok(bridge_devices(&devices, config))
}

fn load_handler(file: FileOrStdin, device: &str, config: &AppConfig) -> ApiResult<DeviceHandler> {
    let devices = load_devices(file, config)?;
    let info = find_device(&devices, device)
        .ok_or_else(|| ApiError::DeviceNotFound(device.to_string()))?;
    Ok(DeviceHandler::new(info.clone(), config))
}

fn print(value: &impl Serialize, format: OutputFormat) -> ApiResult<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Yaml => print!("{}", serde_yml::to_string(value)?),
    }
    Ok(())
}

fn run() -> ApiResult<()> {
    init_logging()?;

    let args = Args::parse();

    let config = config::parse(args.config)?;
    log::debug!("Configuration loaded successfully");

    match args.command {
        Command::Devices { file } => {
            let devices = load_devices(file, &config)?;
            let summary: Vec<DeviceSummary> = devices.iter().map(DeviceSummary::from).collect();
            print(&summary, args.format)
        }

        Command::Decode {
            file,
            device,
            payload,
        } => {
            let handler = load_handler(file, &device, &config)?;
            let topic = format!("{}/{}", config.z2m.base_topic, handler.device().name);
            let payload: Value = serde_json::from_str(&payload)?;
            print(&handler.handle_message(&topic, &payload), args.format)
        }

        Command::Encode {
            file,
            device,
            capability,
            value,
            hue,
            saturation,
            duration_ms,
        } => {
            let handler = load_handler(file, &device, &config)?;
            let value: Value = serde_json::from_str(&value)?;
            let ctx = SetContext {
                hue,
                saturation,
                duration: duration_ms,
            };
            print(&handler.set(&capability, &value, &ctx)?, args.format)
        }

        Command::Get { file, device } => {
            let handler = load_handler(file, &device, &config)?;
            match handler.get_request()? {
                Some(msg) => print(&msg, args.format),
                None => {
                    log::warn!("Device {device} has no gettable features");
                    Ok(())
                }
            }
        }
    }
}

fn main() {
    if let Err(err) = run() {
        log::error!("Zigbridge error: {err}");
        log::error!("Fatal error encountered, cannot continue.");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use crate::{Args, Command};

    const ENCODE: [&str; 9] = [
        "zigbridge",
        "encode",
        "devices.json",
        "-d",
        "desk",
        "-c",
        "light_hue",
        "-v",
        "0.5",
    ];

    #[test]
    fn encode_helper_context() {
        let extra = ["--saturation", "0.25", "--duration-ms", "500"];
        let args = Args::try_parse_from(ENCODE.into_iter().chain(extra)).unwrap();

        let Command::Encode {
            hue,
            saturation,
            duration_ms,
            ..
        } = args.command
        else {
            panic!("expected encode command");
        };
        assert_eq!(hue, None);
        assert_eq!(saturation, Some(0.25));
        assert_eq!(duration_ms, Some(500));
    }

    #[test]
    fn encode_has_no_brightness_context() {
        assert!(Args::try_parse_from(ENCODE.into_iter().chain(["--dim", "0.5"])).is_err());
    }
}
