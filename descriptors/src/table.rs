//! The GreatFET descriptor table

use crate::{
    descriptor::{self, StringIndexes, VENDOR_CONFIGURATION_LEN},
    Configuration, Device, Speed,
};
use usb_device::device::UsbVidPid;

const VID_PID: UsbVidPid = UsbVidPid(0x1d50, 0x60e6);
const RELEASE: u16 = 0x0100;
const MAX_PACKET_SIZE_0: u8 = 64;
const MAX_POWER_MA: u16 = 500;

const STRINGS: StringIndexes = StringIndexes {
    manufacturer: 1,
    product: 2,
    serial_number: 0,
};

static USB0_DEVICE: [u8; descriptor::DEVICE_LEN] =
    descriptor::device(VID_PID, RELEASE, MAX_PACKET_SIZE_0, STRINGS, 1);
static USB0_QUALIFIER: [u8; descriptor::QUALIFIER_LEN] =
    descriptor::qualifier(MAX_PACKET_SIZE_0, 1);
static USB0_HIGH_SPEED: [u8; VENDOR_CONFIGURATION_LEN] =
    descriptor::vendor_configuration(1, 512, MAX_POWER_MA);
static USB0_FULL_SPEED: [u8; VENDOR_CONFIGURATION_LEN] =
    descriptor::vendor_configuration(1, 64, MAX_POWER_MA);

static USB1_DEVICE: [u8; descriptor::DEVICE_LEN] =
    descriptor::device(VID_PID, RELEASE, MAX_PACKET_SIZE_0, STRINGS, 1);
static USB1_QUALIFIER: [u8; descriptor::QUALIFIER_LEN] =
    descriptor::qualifier(MAX_PACKET_SIZE_0, 1);
static USB1_FULL_SPEED: [u8; VENDOR_CONFIGURATION_LEN] =
    descriptor::vendor_configuration(1, 64, MAX_POWER_MA);

/// Descriptors for USB0 and USB1
///
/// USB1 has no high speed PHY, so it only has a full speed configuration.
pub static DEVICES: [Device; 2] = [
    Device {
        controller: 0,
        descriptor: &USB0_DEVICE,
        qualifier: &USB0_QUALIFIER,
        strings: &["Great Scott Gadgets", "GreatFET"],
        configurations: &[
            Configuration {
                number: 1,
                speed: Speed::High,
                descriptor: &USB0_HIGH_SPEED,
            },
            Configuration {
                number: 1,
                speed: Speed::Full,
                descriptor: &USB0_FULL_SPEED,
            },
        ],
    },
    Device {
        controller: 1,
        descriptor: &USB1_DEVICE,
        qualifier: &USB1_QUALIFIER,
        strings: &["Great Scott Gadgets", "GreatFET"],
        configurations: &[Configuration {
            number: 1,
            speed: Speed::Full,
            descriptor: &USB1_FULL_SPEED,
        }],
    },
];
