use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{EndpointError, Result};

const SYSFS_GPIO_DIR: &str = "/sys/class/gpio";

/// The physical power key input: an active-low pin configured for
/// falling-edge detection, polled for the pressed state.
#[derive(Debug)]
pub struct PowerKey {
    value: File,
    pin: u32,
}

impl PowerKey {
    /// Export and configure the pin (`in`, `active_low`, falling edge)
    /// and open its value file.
    pub fn init(pin: u32) -> Result<Self> {
        Self::init_at(Path::new(SYSFS_GPIO_DIR), pin)
    }

    fn init_at(root: &Path, pin: u32) -> Result<Self> {
        export_pin(root, pin)?;

        write_attr(root, pin, "direction", "in")?;
        write_attr(root, pin, "active_low", "1")?;
        write_attr(root, pin, "edge", "falling")?;

        let value = File::open(pin_dir(root, pin).join("value"))
            .map_err(|source| EndpointError::Gpio { pin, source })?;

        info!(pin, "power key input configured");
        Ok(Self { value, pin })
    }

    /// Poll the current key state. With `active_low` set, the sysfs value
    /// reads `1` while the key is held down.
    pub fn is_pressed(&mut self) -> Result<bool> {
        self.value
            .seek(SeekFrom::Start(0))
            .map_err(|source| EndpointError::Gpio {
                pin: self.pin,
                source,
            })?;

        let mut byte = [0u8; 1];
        self.value
            .read_exact(&mut byte)
            .map_err(|source| EndpointError::Gpio {
                pin: self.pin,
                source,
            })?;

        Ok(byte[0] == b'1')
    }
}

/// A sysfs GPIO output pin, e.g. the radio power rail control.
pub struct GpioOut {
    pin: u32,
    root: PathBuf,
}

impl GpioOut {
    /// Export the pin, set its direction to `out`, and drive it low.
    pub fn init(pin: u32) -> Result<Self> {
        Self::init_at(Path::new(SYSFS_GPIO_DIR), pin)
    }

    fn init_at(root: &Path, pin: u32) -> Result<Self> {
        export_pin(root, pin)?;
        write_attr(root, pin, "direction", "out")?;

        let out = Self {
            pin,
            root: root.to_path_buf(),
        };
        out.set(false)?;

        info!(pin, "gpio output configured");
        Ok(out)
    }

    /// Drive the pin high or low.
    pub fn set(&self, high: bool) -> Result<()> {
        write_attr(&self.root, self.pin, "value", if high { "1" } else { "0" })?;
        debug!(pin = self.pin, high, "gpio output set");
        Ok(())
    }
}

fn pin_dir(root: &Path, pin: u32) -> PathBuf {
    root.join(format!("gpio{pin}"))
}

/// Export the pin unless it is already exported.
fn export_pin(root: &Path, pin: u32) -> Result<()> {
    if pin_dir(root, pin).exists() {
        return Ok(());
    }

    let mut export = OpenOptions::new()
        .write(true)
        .open(root.join("export"))
        .map_err(|source| EndpointError::Gpio { pin, source })?;
    export
        .write_all(pin.to_string().as_bytes())
        .map_err(|source| EndpointError::Gpio { pin, source })?;
    Ok(())
}

fn write_attr(root: &Path, pin: u32, attr: &str, value: &str) -> Result<()> {
    let path = pin_dir(root, pin).join(attr);
    let mut file = OpenOptions::new()
        .write(true)
        .open(&path)
        .map_err(|source| EndpointError::Gpio { pin, source })?;
    file.write_all(value.as_bytes())
        .map_err(|source| EndpointError::Gpio { pin, source })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_sysfs(tag: &str, pin: u32) -> PathBuf {
        let root = std::env::temp_dir().join(format!(
            "rigbridge-gpio-{tag}-{}-{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .expect("time should be after epoch")
                .as_nanos()
        ));
        let dir = root.join(format!("gpio{pin}"));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(root.join("export"), "").unwrap();
        for attr in ["direction", "active_low", "edge", "value"] {
            std::fs::write(dir.join(attr), "0").unwrap();
        }
        root
    }

    #[test]
    fn power_key_configures_attributes() {
        let root = fake_sysfs("pwk", 7);
        let _key = PowerKey::init_at(&root, 7).unwrap();

        let dir = root.join("gpio7");
        assert_eq!(std::fs::read_to_string(dir.join("direction")).unwrap(), "in");
        assert_eq!(std::fs::read_to_string(dir.join("active_low")).unwrap(), "1");
        assert_eq!(std::fs::read_to_string(dir.join("edge")).unwrap(), "falling");

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn power_key_reads_pressed_state() {
        let root = fake_sysfs("pwk-read", 7);
        std::fs::write(root.join("gpio7").join("value"), "1").unwrap();

        let mut key = PowerKey::init_at(&root, 7).unwrap();
        assert!(key.is_pressed().unwrap());

        std::fs::write(root.join("gpio7").join("value"), "0").unwrap();
        assert!(!key.is_pressed().unwrap());

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn output_pin_initializes_low_and_toggles() {
        let root = fake_sysfs("out", 20);
        let out = GpioOut::init_at(&root, 20).unwrap();

        let value = root.join("gpio20").join("value");
        assert_eq!(std::fs::read_to_string(&value).unwrap(), "0");
        assert_eq!(
            std::fs::read_to_string(root.join("gpio20").join("direction")).unwrap(),
            "out"
        );

        out.set(true).unwrap();
        assert_eq!(std::fs::read_to_string(&value).unwrap(), "1");

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn missing_sysfs_reports_pin() {
        let root = std::env::temp_dir().join("rigbridge-gpio-missing");
        let err = PowerKey::init_at(&root, 7).unwrap_err();
        assert!(matches!(err, EndpointError::Gpio { pin: 7, .. }));
    }
}
