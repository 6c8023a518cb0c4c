// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Discovery of USB serial devices attached to the host.
//!
//! ```no_run
//! use sketchlink::host::{UsbId, discovery};
//! use sketchlink::transport::ChannelConfig;
//!
//! # fn main() -> sketchlink::Result<()> {
//! let channel = ChannelConfig::led();
//! let uno = discovery::find_device(UsbId::new(0x2341, 0x0043), &channel)?;
//! let (reader, writer) = sketchlink::transport::open(uno.port(), &channel)?;
//! # Ok(())
//! # }
//! ```

use serialport::{SerialPortInfo, SerialPortType};

use super::{SerialDevice, UsbId};
use crate::error::{DeviceError, Error, TransportError};
use crate::transport::ChannelConfig;

/// Lists the USB serial devices known to the host.
///
/// Ports that are not USB devices are skipped.
///
/// # Errors
///
/// Returns `TransportError::Serial` if the ports cannot be enumerated.
pub fn list_devices() -> Result<Vec<SerialDevice>, TransportError> {
    let devices: Vec<SerialDevice> = serialport::available_ports()?
        .into_iter()
        .filter_map(device_from_port)
        .collect();
    tracing::debug!(count = devices.len(), "Enumerated USB serial devices");
    Ok(devices)
}

/// Returns the first attached device carrying `id` whose port opens.
///
/// Registrations left behind by unplugged boards are skipped.
///
/// # Errors
///
/// Returns `DeviceError::NotFound` if no matching device can be opened, or
/// the enumeration error from [`list_devices`].
pub fn find_device(id: UsbId, config: &ChannelConfig) -> Result<SerialDevice, Error> {
    let devices = list_devices()?;
    select_openable(&devices, id, |device| port_opens(device, config))
        .cloned()
        .ok_or_else(|| DeviceError::NotFound(id.to_string()).into())
}

/// Returns the first device in `devices` carrying `id`.
#[must_use]
pub fn select_device(devices: &[SerialDevice], id: UsbId) -> Option<&SerialDevice> {
    devices.iter().find(|device| device.matches(id))
}

/// Returns the devices whose port can actually be opened right now.
///
/// A device can stay registered after it is unplugged; opening the port and
/// closing it again is the only reliable presence check.
#[must_use]
pub fn connected_devices(devices: &[SerialDevice], config: &ChannelConfig) -> Vec<SerialDevice> {
    devices
        .iter()
        .filter(|device| port_opens(device, config))
        .cloned()
        .collect()
}

fn select_openable<F>(devices: &[SerialDevice], id: UsbId, mut opens: F) -> Option<&SerialDevice>
where
    F: FnMut(&SerialDevice) -> bool,
{
    devices
        .iter()
        .filter(|device| device.matches(id))
        .find(|device| opens(device))
}

fn port_opens(device: &SerialDevice, config: &ChannelConfig) -> bool {
    match serialport::new(device.port(), config.baud_rate())
        .timeout(config.read_timeout())
        .open()
    {
        Ok(_port) => true,
        Err(e) => {
            tracing::warn!(device = %device, error = %e, "Device not currently connected");
            false
        }
    }
}

pub(crate) fn device_from_port(info: SerialPortInfo) -> Option<SerialDevice> {
    let SerialPortType::UsbPort(usb) = info.port_type else {
        return None;
    };

    let id = UsbId::new(usb.vid, usb.pid);
    let friendly_name = usb
        .product
        .unwrap_or_else(|| format!("USB Serial Device ({})", info.port_name));

    SerialDevice::new(info.port_name, friendly_name, vec![id.hardware_id()]).ok()
}

#[cfg(test)]
mod tests {
    use serialport::UsbPortInfo;

    use super::*;

    fn usb_port(name: &str, vid: u16, pid: u16, product: Option<&str>) -> SerialPortInfo {
        SerialPortInfo {
            port_name: name.to_string(),
            port_type: SerialPortType::UsbPort(UsbPortInfo {
                vid,
                pid,
                serial_number: None,
                manufacturer: None,
                product: product.map(str::to_string),
            }),
        }
    }

    #[test]
    fn usb_ports_become_devices() {
        let device =
            device_from_port(usb_port("/dev/ttyACM0", 0x2341, 0x0043, Some("Arduino Uno")))
                .unwrap();
        assert_eq!(device.port(), "/dev/ttyACM0");
        assert_eq!(device.friendly_name(), "Arduino Uno");
        assert_eq!(device.usb_id(), Some(UsbId::new(0x2341, 0x0043)));
    }

    #[test]
    fn unnamed_usb_port_gets_generic_name() {
        let device = device_from_port(usb_port("COM4", 0x1A86, 0x7523, None)).unwrap();
        assert_eq!(device.friendly_name(), "USB Serial Device (COM4)");
    }

    #[test]
    fn non_usb_ports_are_skipped() {
        let info = SerialPortInfo {
            port_name: "/dev/ttyS0".to_string(),
            port_type: SerialPortType::Unknown,
        };
        assert!(device_from_port(info).is_none());
    }

    #[test]
    fn select_picks_first_match() {
        let devices: Vec<SerialDevice> = [
            usb_port("COM3", 0x1A86, 0x7523, None),
            usb_port("COM5", 0x2341, 0x0043, Some("first")),
            usb_port("COM6", 0x2341, 0x0043, Some("second")),
        ]
        .into_iter()
        .filter_map(device_from_port)
        .collect();

        let found = select_device(&devices, UsbId::new(0x2341, 0x0043)).unwrap();
        assert_eq!(found.port(), "COM5");
        assert!(select_device(&devices, UsbId::new(0x0403, 0x6001)).is_none());
    }

    #[test]
    fn stale_registration_is_skipped() {
        let devices: Vec<SerialDevice> = [
            usb_port("COM5", 0x2341, 0x0043, Some("unplugged")),
            usb_port("COM3", 0x1A86, 0x7523, None),
            usb_port("COM6", 0x2341, 0x0043, Some("attached")),
        ]
        .into_iter()
        .filter_map(device_from_port)
        .collect();

        let mut probed = Vec::new();
        let found = select_openable(&devices, UsbId::new(0x2341, 0x0043), |device| {
            probed.push(device.port().to_string());
            device.port() != "COM5"
        })
        .unwrap();

        assert_eq!(found.friendly_name(), "attached");
        assert_eq!(probed, ["COM5", "COM6"]);
    }

    #[test]
    fn nothing_openable_is_none() {
        let devices: Vec<SerialDevice> = [usb_port("COM5", 0x2341, 0x0043, None)]
            .into_iter()
            .filter_map(device_from_port)
            .collect();
        assert!(select_openable(&devices, UsbId::new(0x2341, 0x0043), |_| false).is_none());
    }
}
