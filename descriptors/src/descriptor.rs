//! USB descriptor builders
//!
//! `const` functions that lay out standard descriptors, so that the descriptor
//! table can live in flash.

use usb_device::{
    descriptor::descriptor_type, device::UsbVidPid, endpoint::EndpointType, UsbDirection,
};

/// Device qualifier descriptor type
pub const DEVICE_QUALIFIER: u8 = 6;
/// USB 2.0, binary coded decimal
pub const USB_2_0: u16 = 0x0200;
/// Vendor specific device / interface class
pub const VENDOR_SPECIFIC: u8 = 0xFF;

pub const DEVICE_LEN: usize = 18;
pub const QUALIFIER_LEN: usize = 10;
pub const CONFIGURATION_LEN: usize = 9;
pub const INTERFACE_LEN: usize = 9;
pub const ENDPOINT_LEN: usize = 7;
/// A configuration with one interface and two endpoints
pub const VENDOR_CONFIGURATION_LEN: usize =
    CONFIGURATION_LEN + INTERFACE_LEN + 2 * ENDPOINT_LEN;

/// Bus powered, no remote wakeup
const ATTRIBUTES_BUS_POWERED: u8 = 0x80;
/// Largest string descriptor; `bLength` is one byte
const MAX_STRING_LEN: usize = 254;

/// Indexes of the manufacturer, product, and serial number strings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringIndexes {
    pub manufacturer: u8,
    pub product: u8,
    pub serial_number: u8,
}

/// A device descriptor for a vendor specific device
pub const fn device(
    vid_pid: UsbVidPid,
    release: u16,
    max_packet_size_0: u8,
    strings: StringIndexes,
    configurations: u8,
) -> [u8; DEVICE_LEN] {
    let usb = USB_2_0.to_le_bytes();
    let vid = vid_pid.0.to_le_bytes();
    let pid = vid_pid.1.to_le_bytes();
    let release = release.to_le_bytes();
    [
        DEVICE_LEN as u8,
        descriptor_type::DEVICE,
        usb[0],
        usb[1],
        VENDOR_SPECIFIC, // bDeviceClass
        VENDOR_SPECIFIC, // bDeviceSubClass
        VENDOR_SPECIFIC, // bDeviceProtocol
        max_packet_size_0,
        vid[0],
        vid[1],
        pid[0],
        pid[1],
        release[0],
        release[1],
        strings.manufacturer,
        strings.product,
        strings.serial_number,
        configurations,
    ]
}

/// A device qualifier, describing the device at the speed that it isn't running
pub const fn qualifier(max_packet_size_0: u8, configurations: u8) -> [u8; QUALIFIER_LEN] {
    let usb = USB_2_0.to_le_bytes();
    [
        QUALIFIER_LEN as u8,
        DEVICE_QUALIFIER,
        usb[0],
        usb[1],
        VENDOR_SPECIFIC,
        VENDOR_SPECIFIC,
        VENDOR_SPECIFIC,
        max_packet_size_0,
        configurations,
        0, // bReserved
    ]
}

/// A configuration with a single vendor specific interface
///
/// The interface has a bulk IN endpoint 1, and a bulk OUT endpoint 2, both
/// with `max_packet_size`.
pub const fn vendor_configuration(
    number: u8,
    max_packet_size: u16,
    max_power_ma: u16,
) -> [u8; VENDOR_CONFIGURATION_LEN] {
    let total = (VENDOR_CONFIGURATION_LEN as u16).to_le_bytes();
    let packet = max_packet_size.to_le_bytes();
    let bulk = EndpointType::Bulk as u8;
    [
        // Configuration
        CONFIGURATION_LEN as u8,
        descriptor_type::CONFIGURATION,
        total[0],
        total[1],
        1, // bNumInterfaces
        number,
        0, // iConfiguration
        ATTRIBUTES_BUS_POWERED,
        (max_power_ma / 2) as u8,
        // Interface
        INTERFACE_LEN as u8,
        descriptor_type::INTERFACE,
        0, // bInterfaceNumber
        0, // bAlternateSetting
        2, // bNumEndpoints
        VENDOR_SPECIFIC,
        VENDOR_SPECIFIC,
        VENDOR_SPECIFIC,
        0, // iInterface
        // Endpoint 1 IN
        ENDPOINT_LEN as u8,
        descriptor_type::ENDPOINT,
        UsbDirection::In as u8 | 1,
        bulk,
        packet[0],
        packet[1],
        0, // bInterval
        // Endpoint 2 OUT
        ENDPOINT_LEN as u8,
        descriptor_type::ENDPOINT,
        UsbDirection::Out as u8 | 2,
        bulk,
        packet[0],
        packet[1],
        0,
    ]
}

/// Write a string descriptor for `value` into `buffer`
///
/// Returns the descriptor length, or `None` if the descriptor doesn't fit in
/// `buffer`, or in a descriptor.
pub fn string(value: &str, buffer: &mut [u8]) -> Option<usize> {
    write_utf16(value.encode_utf16(), buffer)
}

/// Write the string descriptor zero, listing the supported languages
pub fn languages(ids: &[u16], buffer: &mut [u8]) -> Option<usize> {
    write_utf16(ids.iter().copied(), buffer)
}

fn write_utf16(units: impl Iterator<Item = u16>, buffer: &mut [u8]) -> Option<usize> {
    let mut len = 2;
    for unit in units {
        if len + 2 > MAX_STRING_LEN {
            return None;
        }
        buffer.get_mut(len..len + 2)?.copy_from_slice(&unit.to_le_bytes());
        len += 2;
    }
    let header = buffer.get_mut(..2)?;
    header[0] = len as u8;
    header[1] = descriptor_type::STRING;
    Some(len)
}
