// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Serial device descriptions.

use std::fmt;
use std::str::FromStr;

use crate::error::DeviceError;

/// USB vendor and product id pair.
///
/// Parses both the `VID_2341&PID_0043` form found in hardware ids and the
/// short `2341:0043` form.
///
/// # Examples
///
/// ```
/// use sketchlink::host::UsbId;
///
/// let id = UsbId::from_hardware_id(r"USB\VID_2341&PID_0043\85739323").unwrap();
/// assert_eq!(id, UsbId::new(0x2341, 0x0043));
/// assert_eq!(id.to_string(), "2341:0043");
/// assert_eq!("2341:0043".parse::<UsbId>().unwrap(), id);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UsbId {
    /// Vendor id.
    pub vid: u16,
    /// Product id.
    pub pid: u16,
}

impl UsbId {
    /// Creates a new id pair.
    #[must_use]
    pub const fn new(vid: u16, pid: u16) -> Self {
        Self { vid, pid }
    }

    /// Extracts the ids from a hardware id such as `USB\VID_2341&PID_0043`.
    ///
    /// Matching is case-insensitive.
    ///
    /// # Errors
    ///
    /// Returns `DeviceError::InvalidHardwareId` if either id is absent or is
    /// not four hex digits.
    pub fn from_hardware_id(hardware_id: &str) -> Result<Self, DeviceError> {
        let upper = hardware_id.to_ascii_uppercase();
        let field = |tag: &str| {
            let start = upper.find(tag)? + tag.len();
            let digits = upper.get(start..start + 4)?;
            u16::from_str_radix(digits, 16).ok()
        };

        match (field("VID_"), field("PID_")) {
            (Some(vid), Some(pid)) => Ok(Self { vid, pid }),
            _ => Err(DeviceError::InvalidHardwareId(hardware_id.to_string())),
        }
    }

    /// Returns the id in hardware id form, `USB\VID_XXXX&PID_XXXX`.
    #[must_use]
    pub fn hardware_id(&self) -> String {
        format!("USB\\VID_{:04X}&PID_{:04X}", self.vid, self.pid)
    }
}

impl fmt::Display for UsbId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04x}:{:04x}", self.vid, self.pid)
    }
}

impl FromStr for UsbId {
    type Err = DeviceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse = |part: &str| {
            if part.len() == 4 {
                u16::from_str_radix(part, 16).ok()
            } else {
                None
            }
        };

        if let Some((vid, pid)) = s.split_once(':')
            && let (Some(vid), Some(pid)) = (parse(vid), parse(pid))
        {
            return Ok(Self { vid, pid });
        }
        Self::from_hardware_id(s)
    }
}

/// A serial device attached to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialDevice {
    port: String,
    friendly_name: String,
    hardware_ids: Vec<String>,
}

impl SerialDevice {
    /// Creates a device description.
    ///
    /// # Errors
    ///
    /// Returns `DeviceError::InvalidPort` if `port` is empty.
    pub fn new(
        port: impl Into<String>,
        friendly_name: impl Into<String>,
        hardware_ids: Vec<String>,
    ) -> Result<Self, DeviceError> {
        let port = port.into();
        if port.trim().is_empty() {
            return Err(DeviceError::InvalidPort(port));
        }
        Ok(Self {
            port,
            friendly_name: friendly_name.into(),
            hardware_ids,
        })
    }

    /// Returns the port name (`COM3`, `/dev/ttyACM0`).
    #[must_use]
    pub fn port(&self) -> &str {
        &self.port
    }

    /// Returns the human readable name.
    #[must_use]
    pub fn friendly_name(&self) -> &str {
        &self.friendly_name
    }

    /// Returns the raw hardware ids.
    #[must_use]
    pub fn hardware_ids(&self) -> &[String] {
        &self.hardware_ids
    }

    /// Returns the first USB id found in the hardware ids.
    #[must_use]
    pub fn usb_id(&self) -> Option<UsbId> {
        self.hardware_ids
            .iter()
            .find_map(|id| UsbId::from_hardware_id(id).ok())
    }

    /// Returns `true` if any hardware id carries `id`.
    #[must_use]
    pub fn matches(&self, id: UsbId) -> bool {
        self.hardware_ids
            .iter()
            .filter_map(|hw| UsbId::from_hardware_id(hw).ok())
            .any(|found| found == id)
    }
}

impl fmt::Display for SerialDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.friendly_name, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uno() -> SerialDevice {
        SerialDevice::new(
            "COM3",
            "USB Serial Device (COM3)",
            vec![
                r"USB\VID_2341&PID_0043&REV_0001".to_string(),
                r"USB\VID_2341&PID_0043".to_string(),
            ],
        )
        .unwrap()
    }

    #[test]
    fn hardware_id_is_case_insensitive() {
        let id = UsbId::from_hardware_id(r"usb\vid_1a86&pid_7523").unwrap();
        assert_eq!(id, UsbId::new(0x1A86, 0x7523));
    }

    #[test]
    fn hardware_id_round_trip_form() {
        assert_eq!(
            UsbId::new(0x2341, 0x43).hardware_id(),
            r"USB\VID_2341&PID_0043"
        );
    }

    #[test]
    fn hardware_id_requires_both_parts() {
        for bad in [r"USB\VID_2341", r"PID_0043", r"USB\VID_23&PID_0043", "ACPI\\PNP0501"] {
            assert!(
                matches!(
                    UsbId::from_hardware_id(bad),
                    Err(DeviceError::InvalidHardwareId(_))
                ),
                "{bad}"
            );
        }
    }

    #[test]
    fn short_form_parses() {
        assert_eq!(
            "1a86:7523".parse::<UsbId>().unwrap(),
            UsbId::new(0x1A86, 0x7523)
        );
        assert!("1a86-7523".parse::<UsbId>().is_err());
    }

    #[test]
    fn device_matching() {
        let device = uno();
        assert_eq!(device.usb_id(), Some(UsbId::new(0x2341, 0x0043)));
        assert!(device.matches(UsbId::new(0x2341, 0x0043)));
        assert!(!device.matches(UsbId::new(0x2341, 0x0001)));
        assert_eq!(device.to_string(), "USB Serial Device (COM3) at COM3");
    }

    #[test]
    fn empty_port_is_rejected() {
        assert!(matches!(
            SerialDevice::new(" ", "ghost", Vec::new()),
            Err(DeviceError::InvalidPort(_))
        ));
    }

    #[test]
    fn device_without_usb_id() {
        let device = SerialDevice::new("/dev/ttyS0", "ttyS0", Vec::new()).unwrap();
        assert_eq!(device.usb_id(), None);
    }
}
