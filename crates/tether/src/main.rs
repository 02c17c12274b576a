use std::{io, process::ExitCode, time::Duration};

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use serde_json::Value;
use tether_core::{
    DeviceCommand, JsonRpcRequest, Params, ReplyError, RequestBuilder, classify_reply,
    default_port,
};
use tether_serial::{
    SessionConfig, Timeouts, TransportError,
    port::{self, DEFAULT_BAUD_RATE},
};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "tether", about = "JSON-RPC over serial")]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List serial ports that can be opened.
    List {
        #[arg(long, default_value_t = DEFAULT_BAUD_RATE)]
        baudrate: u32,
    },
    /// Run a predefined device command.
    Run {
        #[arg(value_enum)]
        method: MethodArg,
        #[command(flatten)]
        link: LinkArgs,
    },
    /// Call an arbitrary JSON-RPC method.
    Call {
        method: String,
        /// Request parameter; the value is parsed as JSON, else sent as a string.
        #[arg(long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,
        #[command(flatten)]
        link: LinkArgs,
    },
}

#[derive(Debug, Args)]
struct LinkArgs {
    /// Serial port path; falls back to $TETHER_PORT.
    #[arg(long)]
    port: Option<String>,
    #[arg(long, default_value_t = DEFAULT_BAUD_RATE)]
    baudrate: u32,
    /// Seconds to wait for the boot banner after opening the port.
    #[arg(long, default_value = "3", value_parser = parse_seconds)]
    init_timeout: Duration,
    /// Seconds to wait for the response once the request is sent.
    #[arg(long, default_value = "2", value_parser = parse_seconds)]
    request_timeout: Duration,
    /// Low-level serial read timeout in seconds.
    #[arg(long, default_value = "2", value_parser = parse_seconds)]
    read_timeout: Duration,
    /// Require a well-formed JSON-RPC success reply.
    #[arg(long)]
    check: bool,
}

impl LinkArgs {
    fn session_config(&self) -> SessionConfig {
        SessionConfig {
            baud_rate: self.baudrate,
            read_timeout: self.read_timeout,
            timeouts: Timeouts {
                init: self.init_timeout,
                request: self.request_timeout,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MethodArg {
    #[value(alias = "led_on")]
    LedOn,
    #[value(alias = "led_off")]
    LedOff,
}

impl From<MethodArg> for DeviceCommand {
    fn from(method: MethodArg) -> Self {
        match method {
            MethodArg::LedOn => DeviceCommand::LedOn,
            MethodArg::LedOff => DeviceCommand::LedOff,
        }
    }
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Reply(#[from] ReplyError),
    #[error("failed to render json: {0}")]
    Render(#[from] serde_json::Error),
    #[error("specify serial port with --port or TETHER_PORT")]
    MissingPort,
    #[error("invalid param '{value}': expected KEY=VALUE")]
    InvalidParam { value: String },
    #[error("interrupted")]
    Interrupted,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::Transport(TransportError::Timeout { waited })) => {
            println!("no response [{:.2} sec]", waited.as_secs_f64());
            ExitCode::from(1)
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(1)
        }
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let builder = RequestBuilder::new();

    match cli.command {
        None => list_ports(DEFAULT_BAUD_RATE),
        Some(Command::List { baudrate }) => list_ports(baudrate),
        Some(Command::Run { method, link }) => {
            let request = builder.build_command(method.into());
            call_device(&request, &link).await
        }
        Some(Command::Call {
            method,
            params,
            link,
        }) => {
            let request = builder.build(method, Some(parse_param_pairs(params)?));
            call_device(&request, &link).await
        }
    }
}

fn list_ports(baud_rate: u32) -> Result<(), CliError> {
    let probes = port::probe_ports(baud_rate)?;

    for probe in &probes {
        if let Some(error) = &probe.error {
            eprintln!("failed to open serial port {}: {error}", probe.name);
        }
    }

    println!("available serial ports:");
    for probe in probes.iter().filter(|probe| probe.is_available()) {
        println!("> {}", probe.name);
    }
    Ok(())
}

async fn call_device(request: &JsonRpcRequest, link: &LinkArgs) -> Result<(), CliError> {
    let path = link
        .port
        .clone()
        .or_else(default_port)
        .ok_or(CliError::MissingPort)?;
    let mut session = port::connect(&path, &link.session_config())?;
    tracing::info!(port = %path, method = request.method(), id = request.id().0, "calling device");

    let outcome = tokio::select! {
        outcome = session.call(request) => outcome,
        _ = tokio::signal::ctrl_c() => return Err(CliError::Interrupted),
    };

    if let Some(banner) = session.banner() {
        println!("init [{:.2} sec]:", banner.waited.as_secs_f64());
        println!("{}", serde_json::to_string_pretty(&banner.message)?);
    }
    if let Some(written) = session.bytes_written() {
        println!("request [{written}]:");
        println!("{}", serde_json::to_string_pretty(request)?);
    }

    let report = outcome?;
    println!("response [{:.2} sec]:", report.waited.as_secs_f64());
    println!("{}", serde_json::to_string_pretty(&report.response)?);

    if link.check {
        let result = classify_reply(&report.response)?;
        println!("{}: {result}", request.method());
    }
    Ok(())
}

fn parse_param_pairs(pairs: Vec<String>) -> Result<Params, CliError> {
    let mut params = Params::new();

    for pair in pairs {
        let Some((key, raw)) = pair.split_once('=') else {
            return Err(CliError::InvalidParam { value: pair });
        };

        if key.is_empty() {
            return Err(CliError::InvalidParam {
                value: format!("={raw}"),
            });
        }

        let value =
            serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        params.insert(key.to_string(), value);
    }

    Ok(params)
}

fn parse_seconds(raw: &str) -> Result<Duration, String> {
    let seconds: f64 = raw
        .parse()
        .map_err(|_| format!("'{raw}' is not a number of seconds"))?;
    if !seconds.is_finite() || seconds <= 0.0 {
        return Err(format!("'{raw}' must be a positive number of seconds"));
    }
    Duration::try_from_secs_f64(seconds).map_err(|err| err.to_string())
}
