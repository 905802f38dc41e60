//! DMA channel

use crate::{
    element::Element,
    lli::TransferDescriptor,
    ral::{self, gpdma, Static},
    Error,
};

/// A GPDMA channel
///
/// You should rely on your HAL to allocate `Channel`s. If your HAL does not allocate
/// channels, or if you're designing the HAL, use [`Gpdma::channel`](crate::Gpdma::channel)
/// to create a new DMA channel.
///
/// A channel runs the transfer that's loaded into its registers. When that
/// transfer completes, the channel follows its link register to the next
/// [`TransferDescriptor`], or disables itself if the link is zero.
pub struct Channel {
    /// Our channel number, expected to be between 0 to (CHANNEL_COUNT - 1)
    index: usize,
    /// Reference to the GPDMA registers
    registers: Static<gpdma::RegisterBlock>,
}

impl Channel {
    /// # Safety
    ///
    /// `index` must be a valid channel, and the caller must not alias channels.
    pub(crate) unsafe fn new(index: usize, registers: Static<gpdma::RegisterBlock>) -> Self {
        Channel { index, registers }
    }

    /// Returns the DMA channel number
    ///
    /// Channels are unique and numbered within the half-open range `[0, CHANNEL_COUNT)`.
    pub fn channel(&self) -> usize {
        self.index
    }

    /// Returns a handle to this channel's registers
    fn regs(&self) -> &gpdma::channel::RegisterBlock {
        &self.registers.CHANNEL[self.index]
    }

    /// This channel's bit in the controller's status and clear registers
    fn mask(&self) -> u32 {
        1 << self.index
    }

    /// Disable the channel and zero its registers
    ///
    /// `reset` should be called during channel initialization to put the
    /// channel into a known, good state.
    pub fn reset(&mut self) {
        self.disable();
        let regs = self.regs();
        ral::write_reg!(crate::ral::gpdma, regs, CSRCADDR, 0);
        ral::write_reg!(crate::ral::gpdma, regs, CDESTADDR, 0);
        ral::write_reg!(crate::ral::gpdma, regs, CLLI, 0);
        ral::write_reg!(crate::ral::gpdma, regs, CCONTROL, 0);
        ral::write_reg!(crate::ral::gpdma, regs, CCONFIG, 0);
        self.clear_complete();
        self.clear_error();
    }

    /// Set the source address for the current transfer
    pub fn set_source_address<E: Element>(&mut self, saddr: *const E) {
        let regs = self.regs();
        ral::write_reg!(crate::ral::gpdma, regs, CSRCADDR, saddr as usize as u32);
    }

    /// Set the destination address for the current transfer
    pub fn set_destination_address<E: Element>(&mut self, daddr: *const E) {
        let regs = self.regs();
        ral::write_reg!(crate::ral::gpdma, regs, CDESTADDR, daddr as usize as u32);
    }

    /// Set the raw link word that the channel follows after the current transfer
    pub fn set_link(&mut self, link: u32) {
        let regs = self.regs();
        ral::write_reg!(crate::ral::gpdma, regs, CLLI, link);
    }

    /// Returns the live link word
    ///
    /// While the channel runs a descriptor's transfer, this equals that
    /// descriptor's [`link`](TransferDescriptor::link). The hardware may
    /// advance it at any time.
    pub fn next_link(&self) -> u32 {
        self.regs().CLLI.read()
    }

    /// Returns the live control word
    pub fn control(&self) -> u32 {
        self.regs().CCONTROL.read()
    }

    /// Load the channel's transfer registers from `descriptor`
    ///
    /// The channel performs `descriptor`'s transfer next, then follows its link.
    pub fn load(&mut self, descriptor: &TransferDescriptor) {
        let regs = self.regs();
        ral::write_reg!(crate::ral::gpdma, regs, CSRCADDR, descriptor.source_address());
        ral::write_reg!(crate::ral::gpdma, regs, CDESTADDR, descriptor.destination_address());
        ral::write_reg!(crate::ral::gpdma, regs, CLLI, descriptor.link());
        ral::write_reg!(crate::ral::gpdma, regs, CCONTROL, descriptor.control());
    }

    /// Set the channel configuration
    ///
    /// The enable state is unchanged. Only reconfigure a disabled channel.
    pub fn set_configuration(&mut self, configuration: Configuration) {
        let regs = self.regs();
        ral::modify_reg!(
            crate::ral::gpdma,
            regs,
            CCONFIG,
            SRCPERIPHERAL: configuration.source_peripheral as u32,
            DESTPERIPHERAL: configuration.destination_peripheral as u32,
            FLOWCNTRL: configuration.flow_control as u32,
            IE: configuration.error_interrupt as u32,
            ITC: configuration.completion_interrupt as u32,
            L: configuration.lock as u32,
            H: 0
        );
    }

    /// Enable the DMA channel, which starts the loaded transfer
    ///
    /// # Safety
    ///
    /// This could initiate a DMA transaction that uses an invalid source or destination.
    /// Caller must ensure that the source and destination set in the channel, and every
    /// descriptor reachable through its link, are valid for the lifetime of the transfer.
    pub unsafe fn enable(&self) {
        // Immutable write OK. Only enable / disable / halt modify CCONFIG
        // through a shared reference, and they're not reentrant.
        let regs = self.regs();
        ral::modify_reg!(crate::ral::gpdma, regs, CCONFIG, E: 1);
    }

    /// Disable the DMA channel, preventing any DMA transfers
    ///
    /// Data in the channel's FIFO is lost. Disabling a disabled channel has
    /// no effect.
    pub fn disable(&self) {
        let regs = self.regs();
        ral::modify_reg!(crate::ral::gpdma, regs, CCONFIG, E: 0);
    }

    /// Indicates if this DMA channel is enabled
    ///
    /// The hardware clears the enable bit after a chain's last transfer, or
    /// after an error.
    pub fn is_enabled(&self) -> bool {
        let regs = self.regs();
        ral::read_reg!(crate::ral::gpdma, regs, CCONFIG, E == 1)
    }

    /// Indicates if this DMA channel still holds data in its FIFO
    pub fn is_active(&self) -> bool {
        let regs = self.regs();
        ral::read_reg!(crate::ral::gpdma, regs, CCONFIG, A == 1)
    }

    /// Ignore (`true`) or accept (`false`) further DMA requests
    ///
    /// Halt the channel, then wait for [`is_active`](Channel::is_active) to
    /// clear before disabling it to avoid losing data.
    pub fn set_halt(&self, halt: bool) {
        let regs = self.regs();
        ral::modify_reg!(crate::ral::gpdma, regs, CCONFIG, H: halt as u32);
    }

    /// Indicates if the channel latched a terminal count interrupt
    pub fn is_complete(&self) -> bool {
        self.registers.INTTCSTAT.read() & self.mask() != 0
    }

    /// Clears the terminal count interrupt
    pub fn clear_complete(&self) {
        // Immutable write OK. Write-one-to-clear register, only touching our bit.
        self.registers.INTTCCLEAR.write(self.mask());
    }

    /// Indicates if the DMA channel latched an error interrupt
    pub fn is_error(&self) -> bool {
        self.registers.INTERRSTAT.read() & self.mask() != 0
    }

    /// Clears the error interrupt
    pub fn clear_error(&self) {
        // Immutable write OK. Write-one-to-clear register, only touching our bit.
        self.registers.INTERRCLR.write(self.mask());
    }

    /// Returns an error for this channel, including the **global** error status
    pub fn error_status(&self) -> Error {
        Error::new(self.index, self.registers.INTERRSTAT.read())
    }
}

// It's OK to send a channel across an execution context.
// They can't be cloned or copied, so there's no chance of
// them being (mutably) shared.
unsafe impl Send for Channel {}

/// Flow control and transfer type
///
/// The first four variants leave flow control to the DMA controller. The
/// rest let a peripheral end the transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum FlowControl {
    MemoryToMemory = 0,
    MemoryToPeripheral = 1,
    PeripheralToMemory = 2,
    PeripheralToPeripheral = 3,
    PeripheralToPeripheralDestinationControl = 4,
    MemoryToPeripheralPeripheralControl = 5,
    PeripheralToMemoryPeripheralControl = 6,
    PeripheralToPeripheralSourceControl = 7,
}

/// GPDMA channel configuration
///
/// Describes the channel's request lines, flow control, and interrupt masks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Configuration {
    /// Peripheral request line that paces reads; ignored when the source is memory
    pub source_peripheral: u8,
    /// Peripheral request line that paces writes; ignored when the destination is memory
    pub destination_peripheral: u8,
    pub flow_control: FlowControl,
    /// Unmask the error interrupt
    pub error_interrupt: bool,
    /// Unmask the terminal count interrupt
    pub completion_interrupt: bool,
    /// Locked AHB transfers
    pub lock: bool,
}

impl Configuration {
    /// A memory-to-memory configuration with all interrupts masked
    pub const fn memory_to_memory() -> Self {
        Configuration {
            source_peripheral: 0,
            destination_peripheral: 0,
            flow_control: FlowControl::MemoryToMemory,
            error_interrupt: false,
            completion_interrupt: false,
            lock: false,
        }
    }

    /// Unmask, or mask, the error and terminal count interrupts
    pub const fn interrupts(mut self, error: bool, completion: bool) -> Self {
        self.error_interrupt = error;
        self.completion_interrupt = completion;
        self
    }
}
