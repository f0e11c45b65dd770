use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rigbridge_endpoint::{open_serial, BridgeListener, GpioOut, SerialConfig};
use tracing::info;

use crate::bridge::run_bridge;
use crate::cmd::ServeArgs;
use crate::exit::{endpoint_error, io_error, CliError, CliResult, SUCCESS};
use crate::output::{print_report, OutputFormat};

pub fn run(args: ServeArgs, format: OutputFormat) -> CliResult<i32> {
    let config = SerialConfig {
        baud: args.baud,
        ..SerialConfig::default()
    };

    let serial = open_serial(&args.device, &config)
        .map_err(|err| endpoint_error("serial open failed", err))?;
    let listener =
        BridgeListener::bind(args.port).map_err(|err| endpoint_error("bind failed", err))?;

    let power = args
        .power_gpio
        .map(GpioOut::init)
        .transpose()
        .map_err(|err| endpoint_error("power gpio setup failed", err))?;

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let Some(socket) = listener
        .accept_interruptible(&running)
        .map_err(|err| endpoint_error("accept failed", err))?
    else {
        info!("shutdown requested before a client connected");
        return Ok(SUCCESS);
    };

    if let Some(pin) = &power {
        pin.set(true)
            .map_err(|err| endpoint_error("power gpio set failed", err))?;
    }

    let serial_tx = serial
        .try_clone()
        .map_err(|err| io_error("serial clone failed", err.into()))?;
    let socket_tx = socket
        .try_clone()
        .map_err(|err| io_error("socket clone failed", err))?;

    let report = run_bridge(serial, serial_tx, socket, socket_tx, running)
        .map_err(|err| io_error("bridge start failed", err))?;

    if let Some(pin) = &power {
        let _ = pin.set(false);
    }

    print_report(
        &[
            ("radio->remote", report.local_to_remote),
            ("remote->radio", report.remote_to_local),
        ],
        format,
    );

    Ok(SUCCESS)
}

pub(crate) fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}
