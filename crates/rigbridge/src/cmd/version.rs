use rigbridge_endpoint::SerialConfig;
use rigbridge_proto::{FRAME_END, FRAME_START, KEEPALIVE_FRAME, MAX_FRAME_SIZE};

use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    println!("rigbridge {}", env!("CARGO_PKG_VERSION"));

    if args.extended {
        let serial = SerialConfig::default();
        println!("target: {}/{}", std::env::consts::OS, std::env::consts::ARCH);
        println!("default baud: {} (8N1)", serial.baud);
        println!("frame markers: start=0x{FRAME_START:02X} end=0x{FRAME_END:02X}");
        println!("max frame size: {MAX_FRAME_SIZE} bytes");
        println!("keepalive frame: {}", hex_bytes(&KEEPALIVE_FRAME));
    }

    Ok(SUCCESS)
}

fn hex_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}
