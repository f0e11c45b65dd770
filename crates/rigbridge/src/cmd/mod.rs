use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod connect;
pub mod serve;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Base-unit side: bridge the local radio to one remote panel client.
    Serve(ServeArgs),
    /// Panel side: bridge the local control panel to a remote base unit.
    Connect(ConnectArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Serve(args) => serve::run(args, format),
        Command::Connect(args) => connect::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Serial device connected to the radio.
    #[arg(long, value_name = "PATH")]
    pub device: PathBuf,
    /// Serial baud rate.
    #[arg(long, default_value = "19200")]
    pub baud: u32,
    /// TCP port to listen on.
    #[arg(long, short = 'p')]
    pub port: u16,
    /// GPIO pin driven high while a client is attached (radio power rail).
    #[arg(long, value_name = "PIN")]
    pub power_gpio: Option<u32>,
}

#[derive(Args, Debug)]
pub struct ConnectArgs {
    /// Serial device connected to the control panel.
    #[arg(long, value_name = "PATH")]
    pub device: PathBuf,
    /// Serial baud rate.
    #[arg(long, default_value = "19200")]
    pub baud: u32,
    /// Base unit address (host:port).
    #[arg(long, value_name = "ADDR")]
    pub remote: String,
    /// Send a keepalive frame every N seconds.
    #[arg(long, value_name = "SECS")]
    pub keepalive: Option<u64>,
    /// GPIO pin to poll for the physical power key.
    #[arg(long, value_name = "PIN")]
    pub power_key_gpio: Option<u32>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Print extended build information.
    #[arg(long)]
    pub extended: bool,
}
