use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use rigbridge_endpoint::{open_serial, tcp, PowerKey, SerialConfig};

use crate::bridge::{keepalive_loop, power_key_loop, run_bridge};
use crate::cmd::serve::install_ctrlc_handler;
use crate::cmd::ConnectArgs;
use crate::exit::{endpoint_error, io_error, CliResult, SUCCESS};
use crate::output::{print_report, OutputFormat};

pub fn run(args: ConnectArgs, format: OutputFormat) -> CliResult<i32> {
    let config = SerialConfig {
        baud: args.baud,
        ..SerialConfig::default()
    };

    let serial = open_serial(&args.device, &config)
        .map_err(|err| endpoint_error("serial open failed", err))?;
    let socket = tcp::connect(args.remote.as_str())
        .map_err(|err| endpoint_error("connect failed", err))?;

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let mut side_tasks = Vec::new();

    if let Some(secs) = args.keepalive {
        let out = socket
            .try_clone()
            .map_err(|err| io_error("socket clone failed", err))?;
        let running = Arc::clone(&running);
        let task = std::thread::Builder::new()
            .name("keepalive".into())
            .spawn(move || keepalive_loop(out, Duration::from_secs(secs), running))
            .map_err(|err| io_error("keepalive thread spawn failed", err))?;
        side_tasks.push(task);
    }

    if let Some(pin) = args.power_key_gpio {
        let key = PowerKey::init(pin)
            .map_err(|err| endpoint_error("power key setup failed", err))?;
        let out = socket
            .try_clone()
            .map_err(|err| io_error("socket clone failed", err))?;
        let running = Arc::clone(&running);
        let task = std::thread::Builder::new()
            .name("power-key".into())
            .spawn(move || power_key_loop(key, out, running))
            .map_err(|err| io_error("power key thread spawn failed", err))?;
        side_tasks.push(task);
    }

    let serial_tx = serial
        .try_clone()
        .map_err(|err| io_error("serial clone failed", err.into()))?;
    let socket_tx = socket
        .try_clone()
        .map_err(|err| io_error("socket clone failed", err))?;

    let report = run_bridge(serial, serial_tx, socket, socket_tx, running)
        .map_err(|err| io_error("bridge start failed", err))?;

    for task in side_tasks {
        let _ = task.join();
    }

    print_report(
        &[
            ("panel->remote", report.local_to_remote),
            ("remote->panel", report.remote_to_local),
        ],
        format,
    );

    Ok(SUCCESS)
}
