//! Linked list items (LLIs)
//!
//! A [`TransferDescriptor`] is the in-memory copy of a channel's source,
//! destination, link, and control registers. When a channel finishes the
//! transfer described by its control word, it loads the descriptor that its
//! link register points at, and keeps going. Linking descriptors into a
//! chain, or into a loop, lets the channel run without CPU help.

#![allow(non_snake_case)] // Compatibility with RAL

use crate::{element::Element, ral, vcell::VCell};

/// A GPDMA transfer descriptor
///
/// The layout matches what the controller expects, and descriptors must not
/// move once a channel may load them. Descriptors are word aligned, which
/// the link encoding requires.
///
/// Addresses are 32 bits wide. On a host, pointers are truncated to their
/// low 32 bits; that's enough for comparing links, but nothing more.
#[repr(C)]
pub struct TransferDescriptor {
    CSRCADDR: VCell<u32>,
    CDESTADDR: VCell<u32>,
    CLLI: VCell<u32>,
    CCONTROL: VCell<u32>,
}

const _: () = assert!(core::mem::size_of::<TransferDescriptor>() == 16);
const _: () = assert!(core::mem::align_of::<TransferDescriptor>() >= 4);

// Safety: all mutation requires `&mut TransferDescriptor`. Shared references
// only perform volatile reads of whole words.
unsafe impl Sync for TransferDescriptor {}

impl Default for TransferDescriptor {
    fn default() -> Self {
        Self::new()
    }
}

impl TransferDescriptor {
    /// Creates a zeroed descriptor
    ///
    /// A zeroed descriptor transfers nothing and terminates the chain.
    pub const fn new() -> Self {
        TransferDescriptor {
            CSRCADDR: VCell::new(0),
            CDESTADDR: VCell::new(0),
            CLLI: VCell::new(0),
            CCONTROL: VCell::new(0),
        }
    }

    /// The address of this descriptor, as seen by the controller
    pub fn address(&self) -> u32 {
        self as *const Self as usize as u32
    }

    pub fn source_address(&self) -> u32 {
        self.CSRCADDR.read()
    }

    pub fn set_source_address<E: Element>(&mut self, saddr: *const E) {
        self.CSRCADDR.write(saddr as usize as u32);
    }

    pub fn destination_address(&self) -> u32 {
        self.CDESTADDR.read()
    }

    pub fn set_destination_address<E: Element>(&mut self, daddr: *const E) {
        self.CDESTADDR.write(daddr as usize as u32);
    }

    /// Returns the raw link word
    ///
    /// This is the value that a channel's link register holds while this
    /// descriptor's transfer is in flight.
    pub fn link(&self) -> u32 {
        self.CLLI.read()
    }

    /// Returns the address of the next descriptor, or `None` if the chain
    /// ends here
    pub fn next_address(&self) -> Option<u32> {
        let lli = ral::read_reg!(crate::ral::gpdma, self, CLLI, LLI);
        if lli == 0 {
            None
        } else {
            Some(lli << 2)
        }
    }

    /// Point this descriptor at the next descriptor in a chain
    ///
    /// `None` terminates the chain. The link's master selection is unchanged.
    pub fn set_next(&mut self, next: Option<&TransferDescriptor>) {
        let address = next.map_or(0, TransferDescriptor::address);
        self.set_next_address(address);
    }

    fn set_next_address(&mut self, address: u32) {
        ral::modify_reg!(crate::ral::gpdma, self, CLLI, LLI: address >> 2);
    }

    /// The AHB master used to load the next descriptor
    pub fn link_master(&self) -> AhbMaster {
        AhbMaster::from_bit(ral::read_reg!(crate::ral::gpdma, self, CLLI, LM))
    }

    pub fn set_link_master(&mut self, master: AhbMaster) {
        ral::modify_reg!(crate::ral::gpdma, self, CLLI, LM: master as u32);
    }

    /// Returns the raw control word
    pub fn control(&self) -> u32 {
        self.CCONTROL.read()
    }

    /// Replace the control word
    pub fn set_control(&mut self, control: &Control) {
        ral::write_reg!(
            crate::ral::gpdma,
            self,
            CCONTROL,
            TRANSFERSIZE: control.transfer_size as u32,
            SBSIZE: control.source_burst as u32,
            DBSIZE: control.destination_burst as u32,
            SWIDTH: control.source_width,
            DWIDTH: control.destination_width,
            S: control.source_master as u32,
            D: control.destination_master as u32,
            SI: control.source_increment as u32,
            DI: control.destination_increment as u32,
            I: control.interrupt as u32
        );
    }

    /// Number of elements this descriptor transfers
    pub fn transfer_size(&self) -> u32 {
        ral::read_reg!(crate::ral::gpdma, self, CCONTROL, TRANSFERSIZE)
    }

    /// Enable or disable the terminal count interrupt for this descriptor
    pub fn set_interrupt(&mut self, interrupt: bool) {
        ral::modify_reg!(crate::ral::gpdma, self, CCONTROL, I: interrupt as u32);
    }
}

/// Link `descriptors` into a loop
///
/// Descriptor `i` links to descriptor `(i + 1) % len`. A single descriptor
/// links to itself. There's no terminal descriptor, so a channel that starts
/// anywhere in the loop runs until it's disabled.
pub fn link_loop(descriptors: &mut [TransferDescriptor]) {
    let len = descriptors.len();
    for idx in 0..len {
        let next = descriptors[(idx + 1) % len].address();
        descriptors[idx].set_next_address(next);
    }
}

/// Link `descriptors` into a chain that runs once
///
/// Descriptor `i` links to descriptor `i + 1`. The last descriptor ends the
/// chain, and the channel disables itself after completing it.
pub fn link_oneshot(descriptors: &mut [TransferDescriptor]) {
    let len = descriptors.len();
    for idx in 0..len {
        let next = if idx + 1 < len {
            descriptors[idx + 1].address()
        } else {
            0
        };
        descriptors[idx].set_next_address(next);
    }
}

/// AHB master selection
///
/// On the LPC43xx, both masters reach the on-chip SRAM banks, but only
/// master 1 reaches the peripheral bus (and GPIO).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum AhbMaster {
    Zero = 0,
    One = 1,
}

impl AhbMaster {
    const fn from_bit(bit: u32) -> Self {
        if bit == 0 {
            AhbMaster::Zero
        } else {
            AhbMaster::One
        }
    }
}

/// Number of elements moved per burst
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum BurstSize {
    One = 0,
    Four = 1,
    Eight = 2,
    Sixteen = 3,
    ThirtyTwo = 4,
    SixtyFour = 5,
    OneTwentyEight = 6,
    TwoFiftySix = 7,
}

/// A descriptor control word
///
/// Use [`new`](Control::new) to pick the element widths, then adjust the rest
/// with the builder methods. The defaults are single element bursts on AHB
/// master 0, with no address increments and no interrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Control {
    transfer_size: u16,
    source_burst: BurstSize,
    destination_burst: BurstSize,
    source_width: u32,
    destination_width: u32,
    source_master: AhbMaster,
    destination_master: AhbMaster,
    source_increment: bool,
    destination_increment: bool,
    interrupt: bool,
}

impl Control {
    /// The largest transfer size that a control word holds
    pub const MAX_TRANSFER_SIZE: u16 = 0xFFF;

    /// A control word that moves `transfer_size` elements of type `S` to
    /// elements of type `D`
    ///
    /// # Panics
    ///
    /// Panics if `transfer_size` exceeds [`MAX_TRANSFER_SIZE`](Self::MAX_TRANSFER_SIZE).
    pub fn new<S: Element, D: Element>(transfer_size: u16) -> Self {
        assert!(
            transfer_size <= Self::MAX_TRANSFER_SIZE,
            "GPDMA transfer size {} exceeds 4095",
            transfer_size
        );
        Control {
            transfer_size,
            source_burst: BurstSize::One,
            destination_burst: BurstSize::One,
            source_width: S::DATA_TRANSFER_ID,
            destination_width: D::DATA_TRANSFER_ID,
            source_master: AhbMaster::Zero,
            destination_master: AhbMaster::Zero,
            source_increment: false,
            destination_increment: false,
            interrupt: false,
        }
    }

    pub fn bursts(mut self, source: BurstSize, destination: BurstSize) -> Self {
        self.source_burst = source;
        self.destination_burst = destination;
        self
    }

    pub fn masters(mut self, source: AhbMaster, destination: AhbMaster) -> Self {
        self.source_master = source;
        self.destination_master = destination;
        self
    }

    pub fn increments(mut self, source: bool, destination: bool) -> Self {
        self.source_increment = source;
        self.destination_increment = destination;
        self
    }

    /// Generate a terminal count interrupt when this descriptor completes
    pub fn interrupt(mut self, interrupt: bool) -> Self {
        self.interrupt = interrupt;
        self
    }
}
