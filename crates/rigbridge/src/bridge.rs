use std::io::{Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rigbridge_endpoint::PowerKey;
use rigbridge_proto::{send_keepalive, send_power_message, LinkStats, PacketClass, RelayEngine};
use tracing::{info, warn};

/// Final counters for both directions of a finished link.
#[derive(Debug, Clone, Copy)]
pub struct BridgeReport {
    pub local_to_remote: LinkStats,
    pub remote_to_local: LinkStats,
}

/// Run the bridge until one direction ends or the running flag clears.
///
/// One relay engine per direction, each on its own named thread with
/// exclusive ownership of its buffer; the only cross-direction coupling
/// is the shared shutdown flag. `local_rx`/`local_tx` are two handles
/// onto the serial line, `remote_rx`/`remote_tx` onto the socket;
/// handshake responses go back out through the rx handle's write half.
/// Errors only if a relay thread cannot be spawned.
pub fn run_bridge<P, R>(
    local_rx: P,
    local_tx: P,
    remote_rx: R,
    remote_tx: R,
    running: Arc<AtomicBool>,
) -> std::io::Result<BridgeReport>
where
    P: Read + Write + Send,
    R: Read + Write + Send,
{
    std::thread::scope(|scope| {
        let to_remote = {
            let running = Arc::clone(&running);
            std::thread::Builder::new()
                .name("local->remote".into())
                .spawn_scoped(scope, move || drive("local->remote", local_rx, remote_tx, running))?
        };
        let to_local = {
            let running_for_thread = Arc::clone(&running);
            let spawned = std::thread::Builder::new()
                .name("remote->local".into())
                .spawn_scoped(scope, move || {
                    drive("remote->local", remote_rx, local_tx, running_for_thread)
                });
            match spawned {
                Ok(handle) => handle,
                Err(err) => {
                    // Release the already-running direction before bailing.
                    running.store(false, Ordering::SeqCst);
                    return Err(err);
                }
            }
        };

        Ok(BridgeReport {
            local_to_remote: join(to_remote),
            remote_to_local: join(to_local),
        })
    })
}

fn join<'scope>(handle: std::thread::ScopedJoinHandle<'scope, LinkStats>) -> LinkStats {
    match handle.join() {
        Ok(stats) => stats,
        Err(panic) => std::panic::resume_unwind(panic),
    }
}

/// Drive one direction: cycle the engine until the stream ends, a read
/// fails, or the shared flag clears; then clear the flag so the peer
/// direction winds down too.
fn drive<I, O>(direction: &'static str, mut input: I, mut output: O, running: Arc<AtomicBool>) -> LinkStats
where
    I: Read + Write,
    O: Write,
{
    let mut engine = RelayEngine::new(direction);

    while running.load(Ordering::SeqCst) {
        match engine.cycle(&mut input, &mut output) {
            PacketClass::EndOfFile => {
                info!(direction, "stream closed by peer");
                break;
            }
            PacketClass::ReadError => {
                warn!(direction, "read failed, tearing down link");
                break;
            }
            _ => {}
        }
    }

    running.store(false, Ordering::SeqCst);

    let stats = engine.stats();
    info!(
        direction,
        valid = stats.valid_frames,
        invalid = stats.invalid_frames,
        write_errors = stats.write_errors,
        "direction finished"
    );
    stats
}

/// Periodically send keepalive frames toward the base unit (panel side).
pub fn keepalive_loop<W: Write>(mut out: W, interval: Duration, running: Arc<AtomicBool>) {
    while running.load(Ordering::SeqCst) {
        if let Err(err) = send_keepalive(&mut out) {
            warn!(error = %err, "keepalive send failed");
            break;
        }
        sleep_responsive(interval, &running);
    }
}

/// Poll the physical power key and send a power toggle frame on each
/// press edge (panel side).
pub fn power_key_loop<W: Write>(mut key: PowerKey, mut out: W, running: Arc<AtomicBool>) {
    let mut power_on = false;
    let mut was_pressed = false;

    while running.load(Ordering::SeqCst) {
        match key.is_pressed() {
            Ok(pressed) => {
                if pressed && !was_pressed {
                    power_on = !power_on;
                    info!(power_on, "power key pressed");
                    if let Err(err) = send_power_message(&mut out, power_on) {
                        warn!(error = %err, "power message send failed");
                    }
                }
                was_pressed = pressed;
            }
            Err(err) => {
                warn!(error = %err, "power key poll failed");
                break;
            }
        }
        std::thread::sleep(Duration::from_millis(100));
    }
}

/// Sleep in short slices so a cleared running flag is noticed promptly.
fn sleep_responsive(total: Duration, running: &AtomicBool) {
    let mut remaining = total;
    while running.load(Ordering::SeqCst) && !remaining.is_zero() {
        let step = remaining.min(Duration::from_millis(200));
        std::thread::sleep(step);
        remaining = remaining.saturating_sub(step);
    }
}
