//! Static USB descriptors for GreatFET devices
//!
//! Each of the board's two USB controllers exposes a vendor specific device.
//! The descriptors are built at compile time and live in flash; a USB stack
//! looks them up with [`device`] and [`configuration`], and renders string
//! descriptors on request with [`Device::string`].
//!
//! ```
//! use greatfet_usb_descriptors::{configuration, Speed};
//!
//! let hs = configuration(0, Speed::High).unwrap();
//! assert_eq!(hs.number, 1);
//! assert!(configuration(1, Speed::High).is_none());
//! ```
//!
//! ### License
//!
//! Licensed under either of
//!
//! - [Apache License, Version 2.0](http://www.apache.org/licenses/LICENSE-2.0) ([LICENSE-APACHE](./LICENSE-APACHE))
//! - [MIT License](http://opensource.org/licenses/MIT) ([LICENSE-MIT](./LICENSE-MIT))
//!
//! at your option.

#![no_std]

pub mod descriptor;
mod table;

pub use table::DEVICES;

use usb_device::descriptor::lang_id;

/// USB bus speed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speed {
    Full,
    High,
}

/// A configuration descriptor, and the speed it applies to
#[derive(Debug)]
pub struct Configuration {
    /// `bConfigurationValue`; never zero
    pub number: u8,
    pub speed: Speed,
    /// The configuration descriptor, followed by its interface and endpoint
    /// descriptors
    pub descriptor: &'static [u8],
}

/// The descriptors for one USB controller
#[derive(Debug)]
pub struct Device {
    /// USB controller index
    pub controller: u8,
    pub descriptor: &'static [u8],
    pub qualifier: &'static [u8],
    /// String descriptors, starting from index 1
    pub strings: &'static [&'static str],
    pub configurations: &'static [Configuration],
}

impl Device {
    /// Returns the configuration for `speed`
    ///
    /// Returns `None` if the device doesn't run at `speed`.
    pub fn configuration(&self, speed: Speed) -> Option<&'static Configuration> {
        self.configurations.iter().find(|config| config.speed == speed)
    }

    /// Returns the configuration that the host selects with `number`
    ///
    /// Configuration 0 is the unconfigured state, and it has no descriptor.
    pub fn configuration_by_number(
        &self,
        number: u8,
        speed: Speed,
    ) -> Option<&'static Configuration> {
        self.configurations
            .iter()
            .find(|config| config.number == number && config.speed == speed)
    }

    /// Write string descriptor `index` into `buffer`
    ///
    /// Index 0 describes the supported languages. Returns the descriptor's
    /// length, or `None` if there's no such string, or if it doesn't fit in
    /// `buffer`.
    pub fn string(&self, index: u8, buffer: &mut [u8]) -> Option<usize> {
        match index {
            0 => descriptor::languages(&[lang_id::ENGLISH_US], buffer),
            index => {
                let value = self.strings.get(usize::from(index) - 1)?;
                descriptor::string(value, buffer)
            }
        }
    }
}

/// Returns the descriptors for USB controller `controller`
pub fn device(controller: u8) -> Option<&'static Device> {
    DEVICES.iter().find(|device| device.controller == controller)
}

/// Returns the configuration descriptor for `controller` running at `speed`
pub fn configuration(controller: u8, speed: Speed) -> Option<&'static Configuration> {
    device(controller)?.configuration(speed)
}

#[cfg(test)]
mod test {
    use super::{configuration, device, Speed};
    use usb_device::descriptor::descriptor_type;

    fn total_length(descriptor: &[u8]) -> usize {
        u16::from_le_bytes([descriptor[2], descriptor[3]]).into()
    }

    #[test]
    fn usb0_runs_at_both_speeds() {
        let hs = configuration(0, Speed::High).unwrap();
        let fs = configuration(0, Speed::Full).unwrap();
        for config in [hs, fs] {
            assert_eq!(config.number, 1);
            assert_eq!(config.descriptor[1], descriptor_type::CONFIGURATION);
            assert_eq!(total_length(config.descriptor), config.descriptor.len());
        }
        // Bulk endpoint wMaxPacketSize
        assert_eq!(&hs.descriptor[22..24], &512u16.to_le_bytes());
        assert_eq!(&fs.descriptor[22..24], &64u16.to_le_bytes());
    }

    #[test]
    fn usb1_is_full_speed_only() {
        assert!(configuration(1, Speed::High).is_none());
        let fs = configuration(1, Speed::Full).unwrap();
        assert_eq!(total_length(fs.descriptor), fs.descriptor.len());
    }

    #[test]
    fn unknown_controller() {
        assert!(device(2).is_none());
        assert!(configuration(2, Speed::Full).is_none());
    }

    #[test]
    fn device_descriptors() {
        for controller in [0, 1] {
            let device = device(controller).unwrap();
            assert_eq!(device.descriptor.len(), 18);
            assert_eq!(device.descriptor[0], 18);
            assert_eq!(device.descriptor[1], descriptor_type::DEVICE);
            assert_eq!(&device.descriptor[8..10], &0x1d50u16.to_le_bytes());
            assert_eq!(device.qualifier.len(), 10);
            assert_eq!(device.qualifier[1], 6);
            // bNumConfigurations
            assert_eq!(device.descriptor[17], 1);
        }
    }

    #[test]
    fn configuration_selection() {
        let device = device(0).unwrap();
        assert!(device.configuration_by_number(1, Speed::High).is_some());
        assert!(device.configuration_by_number(0, Speed::High).is_none());
        assert!(device.configuration_by_number(2, Speed::Full).is_none());
    }

    #[test]
    fn strings() {
        let device = device(0).unwrap();
        let mut buffer = [0u8; 64];

        assert_eq!(device.string(0, &mut buffer), Some(4));
        assert_eq!(&buffer[..4], &[4, 3, 0x09, 0x04]);

        let len = device.string(1, &mut buffer).unwrap();
        assert_eq!(len, 2 + 2 * "Great Scott Gadgets".len());
        assert_eq!(buffer[0] as usize, len);
        assert_eq!(buffer[1], descriptor_type::STRING);
        assert_eq!(&buffer[2..6], &[b'G', 0, b'r', 0]);

        // Product string is referenced by the device descriptor.
        let product = device.descriptor[15];
        assert!(device.string(product, &mut buffer).is_some());

        assert!(device.string(9, &mut buffer).is_none());
        assert!(device.string(1, &mut buffer[..8]).is_none());
    }
}
