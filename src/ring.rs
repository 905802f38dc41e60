//! Transfer rings
//!
//! A transfer ring streams a memory buffer to a fixed peripheral address, like
//! a GPIO port register, and never stops on its own. The buffer is split into
//! equal chunks, one [`TransferDescriptor`] per chunk, and the descriptors are
//! linked into a loop. Every descriptor moves a single byte, and raises a
//! terminal count interrupt when it's done, so that the CPU can follow the
//! stream with byte precision. The pace is set by whatever drives the
//! channel's requests, usually a timer match routed through the DMAMUX.
//!
//! The ring doesn't own any memory. You provide the descriptors and the
//! buffer, and keep both in place until the channel is stopped.
//!
//! ```no_run
//! use lpc43xx_gpdma::{lli::TransferDescriptor, ring, Gpdma, Trigger};
//! # static DMA: Gpdma<8> = unsafe { Gpdma::new(core::ptr::null(), core::ptr::null()) };
//! # const GPIO_PORT: *const u8 = core::ptr::null();
//!
//! static mut DESCRIPTORS: [TransferDescriptor; 4] = [
//!     TransferDescriptor::new(),
//!     TransferDescriptor::new(),
//!     TransferDescriptor::new(),
//!     TransferDescriptor::new(),
//! ];
//! static mut SAMPLES: [u8; 2048] = [0; 2048];
//!
//! ring::init(&DMA, Trigger::TIMER2_MATCH0);
//! // Safety: we only allocate one DMA channel 5 object.
//! let mut channel = unsafe { DMA.channel(5) };
//!
//! // Safety: the descriptors and the samples aren't used anywhere else, and
//! // they're static.
//! unsafe {
//!     let descriptors = &mut *core::ptr::addr_of_mut!(DESCRIPTORS);
//!     let samples = core::ptr::addr_of!(SAMPLES).cast::<u8>();
//!     ring::configure(descriptors, samples, GPIO_PORT, 512);
//!     ring::start(&mut channel, &descriptors[0]);
//! }
//!
//! let consumed = ring::current_transfer_index(&channel, unsafe { &*core::ptr::addr_of!(DESCRIPTORS) });
//! ```

use crate::{
    lli::{self, AhbMaster, BurstSize, Control, TransferDescriptor},
    Channel, Configuration, Gpdma, Trigger,
};

/// The ring's chunks are sized in whole words
pub const WORD_SIZE: usize = 4;

/// Returns the size of a chunk, in bytes
///
/// That's `transfer_bytes`, rounded up to a whole number of words.
pub const fn chunk_bytes(transfer_bytes: usize) -> usize {
    transfer_bytes.div_ceil(WORD_SIZE) * WORD_SIZE
}

/// Route `trigger` to the GPDMA, and enable the controller
///
/// Call `init` once, before starting any ring.
pub fn init<const CHANNELS: usize>(dma: &Gpdma<CHANNELS>, trigger: Trigger) {
    dma.set_trigger(trigger);
    dma.enable();
    log::debug!(
        "GPDMA enabled; request line {} uses source {}",
        trigger.peripheral(),
        trigger.option()
    );
}

/// Fill `descriptors` with a ring that streams `source` to `destination`
///
/// Descriptor `i` transfers from `source + i * chunk_bytes(transfer_bytes)`, and
/// links to descriptor `(i + 1) % descriptors.len()`. Every descriptor writes to
/// `destination`, which doesn't increment. Transfers are single bytes, in
/// single element bursts, through AHB master 1, with the terminal count
/// interrupt enabled.
///
/// `configure` doesn't validate its inputs. `descriptors` must not be empty,
/// and `source` must point to at least `descriptors.len() * chunk_bytes(transfer_bytes)`
/// bytes.
pub fn configure(
    descriptors: &mut [TransferDescriptor],
    source: *const u8,
    destination: *const u8,
    transfer_bytes: usize,
) {
    debug_assert!(!descriptors.is_empty(), "a ring needs a descriptor");
    let chunk_bytes = chunk_bytes(transfer_bytes);
    let control = Control::new::<u8, u8>(1)
        .bursts(BurstSize::One, BurstSize::One)
        .masters(AhbMaster::One, AhbMaster::One)
        .increments(true, false)
        .interrupt(true);

    lli::link_loop(descriptors);
    for (idx, descriptor) in descriptors.iter_mut().enumerate() {
        descriptor.set_source_address(source.wrapping_add(idx * chunk_bytes));
        descriptor.set_destination_address(destination);
        descriptor.set_link_master(AhbMaster::One);
        descriptor.set_control(&control);
    }

    log::trace!(
        "Configured {} descriptor ring, {} bytes per chunk",
        descriptors.len(),
        chunk_bytes
    );
}

/// Start `channel` on the ring that contains `first`
///
/// Disables the channel, clears its pending interrupts, loads `first`, and
/// enables the channel with memory-to-memory flow control and both the error
/// and terminal count interrupts unmasked. The channel runs until you
/// [`stop`] it.
///
/// # Safety
///
/// `first` must be part of a ring from [`configure`]. The ring's descriptors
/// and its source buffer must stay valid, and in place, until the channel is
/// stopped.
pub unsafe fn start(channel: &mut Channel, first: &TransferDescriptor) {
    channel.disable();
    channel.clear_complete();
    channel.clear_error();

    channel.load(first);
    channel.set_configuration(Configuration::memory_to_memory().interrupts(true, true));

    core::sync::atomic::fence(core::sync::atomic::Ordering::SeqCst);
    channel.enable();
    log::debug!(
        "GPDMA channel {} started at descriptor {:#010X}",
        channel.channel(),
        first.address()
    );
}

/// Stop the ring running on `channel`
///
/// The channel is disabled immediately. A transfer in flight may, or may not,
/// complete. Stopping a stopped channel has no effect.
pub fn stop(channel: &Channel) {
    channel.disable();
    log::debug!("GPDMA channel {} stopped", channel.channel());
}

/// Clear the channel's error interrupt
///
/// The channel won't signal another error until the interrupt is cleared.
pub fn acknowledge_error(channel: &Channel) {
    channel.clear_error();
}

/// Clear the channel's terminal count interrupt
///
/// The channel won't signal another completion until the interrupt is cleared.
pub fn acknowledge_completion(channel: &Channel) {
    channel.clear_complete();
}

/// Indicates if the channel latched an error interrupt
///
/// The flag stays set until [`acknowledge_error`].
pub fn is_error(channel: &Channel) -> bool {
    channel.is_error()
}

/// Returns the index of the descriptor that `channel` is working on
///
/// The index comes from a linear search of `descriptors` for the channel's live
/// link word, so call this once per completion, not in a tight loop. The channel
/// keeps running, so treat the index as a snapshot.
///
/// Returns 0 if no descriptor matches, like before the ring starts.
pub fn current_transfer_index(channel: &Channel, descriptors: &[TransferDescriptor]) -> usize {
    let next_link = channel.next_link();
    descriptors
        .iter()
        .position(|descriptor| descriptor.link() == next_link)
        .unwrap_or(0)
}

#[cfg(test)]
mod test {
    use super::{chunk_bytes, configure, current_transfer_index, WORD_SIZE};
    use crate::{
        lli::{AhbMaster, TransferDescriptor},
        ral::testing::{peek, Hardware},
        Trigger,
    };

    fn ring<const N: usize>() -> [TransferDescriptor; N] {
        core::array::from_fn(|_| TransferDescriptor::new())
    }

    /// Follow the links from descriptor 0, returning visited indexes in order
    fn walk(descriptors: &[TransferDescriptor]) -> [Option<usize>; 16] {
        let mut visited = [None; 16];
        let mut idx = 0;
        for slot in visited.iter_mut().take(descriptors.len() + 1) {
            *slot = Some(idx);
            let next = descriptors[idx].next_address().expect("ring has no end");
            idx = descriptors
                .iter()
                .position(|descriptor| descriptor.address() == next)
                .expect("link leaves the ring");
        }
        visited
    }

    #[test]
    fn chunk_rounding() {
        assert_eq!(chunk_bytes(0), 0);
        assert_eq!(chunk_bytes(1), WORD_SIZE);
        assert_eq!(chunk_bytes(4), 4);
        assert_eq!(chunk_bytes(5), 8);
        assert_eq!(chunk_bytes(512), 512);
        assert_eq!(chunk_bytes(513), 516);
    }

    fn single_cycle<const N: usize>() {
        let mut descriptors = ring::<N>();
        let buffer = [0u8; 64];
        configure(&mut descriptors, buffer.as_ptr(), &buffer[0] as *const u8, 3);

        let visited = walk(&descriptors);
        for (position, idx) in visited.iter().take(N).enumerate() {
            assert_eq!(*idx, Some(position));
        }
        assert_eq!(visited[N], Some(0));
    }

    #[test]
    fn links_form_a_single_cycle() {
        single_cycle::<1>();
        single_cycle::<2>();
        single_cycle::<3>();
        single_cycle::<4>();
        single_cycle::<7>();
        single_cycle::<15>();
    }

    #[test]
    fn four_chunks_of_512() {
        let mut descriptors = ring::<4>();
        let buffer = [0u8; 2048];
        let gpio = 0u8;
        let source = buffer.as_ptr() as usize as u32;
        let destination = &gpio as *const u8 as usize as u32;
        configure(&mut descriptors, buffer.as_ptr(), &gpio, 512);

        for (idx, descriptor) in descriptors.iter().enumerate() {
            assert_eq!(
                descriptor.source_address(),
                source.wrapping_add(512 * idx as u32)
            );
            assert_eq!(descriptor.destination_address(), destination);
            assert_eq!(descriptor.link_master(), AhbMaster::One);
        }
        assert_eq!(descriptors[2].source_address(), source.wrapping_add(1024));
        assert_eq!(descriptors[3].next_address(), Some(descriptors[0].address()));
    }

    #[test]
    fn chunks_round_up_to_words() {
        let mut descriptors = ring::<3>();
        let buffer = [0u8; 32];
        let source = buffer.as_ptr() as usize as u32;
        configure(&mut descriptors, buffer.as_ptr(), buffer.as_ptr(), 7);
        assert_eq!(descriptors[1].source_address(), source.wrapping_add(8));
        assert_eq!(descriptors[2].source_address(), source.wrapping_add(16));
    }

    #[test]
    fn single_descriptor_links_to_itself() {
        let mut descriptors = ring::<1>();
        let buffer = [0u8; 4];
        configure(&mut descriptors, buffer.as_ptr(), buffer.as_ptr(), 4);
        assert_eq!(descriptors[0].next_address(), Some(descriptors[0].address()));
    }

    #[test]
    fn byte_transfers_with_interrupt() {
        let mut descriptors = ring::<2>();
        let buffer = [0u8; 8];
        configure(&mut descriptors, buffer.as_ptr(), buffer.as_ptr(), 4);

        let expected = 1 // TRANSFERSIZE
            | (1 << 24) // S
            | (1 << 25) // D
            | (1 << 26) // SI
            | (1 << 31); // I
        for descriptor in descriptors.iter() {
            assert_eq!(descriptor.control(), expected);
            assert_eq!(descriptor.transfer_size(), 1);
        }
    }

    #[test]
    fn start_loads_first_descriptor() {
        let hw = Hardware::new();
        let dma = hw.driver();
        let mut channel = unsafe { dma.channel(5) };

        let mut descriptors = ring::<4>();
        let buffer = [0u8; 64];
        let gpio = 0u8;
        configure(&mut descriptors, buffer.as_ptr(), &gpio, 16);

        hw.gpdma.CHANNEL[5].CCONFIG.write(0b11 << 14 | 1);
        unsafe { super::start(&mut channel, &descriptors[0]) };

        let regs = &hw.gpdma.CHANNEL[5];
        assert_eq!(regs.CSRCADDR.read(), descriptors[0].source_address());
        assert_eq!(regs.CDESTADDR.read(), descriptors[0].destination_address());
        assert_eq!(regs.CLLI.read(), descriptors[0].link());
        assert_eq!(regs.CCONTROL.read(), descriptors[0].control());
        // Enabled, memory-to-memory, error and terminal count interrupts.
        assert_eq!(regs.CCONFIG.read(), 1 | (1 << 14) | (1 << 15));
        assert_eq!(peek(&hw.gpdma.INTTCCLEAR), 1 << 5);
        assert_eq!(peek(&hw.gpdma.INTERRCLR), 1 << 5);

        assert!(channel.is_enabled());
        assert_eq!(current_transfer_index(&channel, &descriptors), 0);
    }

    #[test]
    fn stop_is_idempotent() {
        let hw = Hardware::new();
        let dma = hw.driver();
        let mut channel = unsafe { dma.channel(5) };
        let mut descriptors = ring::<2>();
        let buffer = [0u8; 8];
        configure(&mut descriptors, buffer.as_ptr(), buffer.as_ptr(), 4);

        unsafe { super::start(&mut channel, &descriptors[0]) };
        super::stop(&channel);
        assert!(!channel.is_enabled());
        let config = hw.gpdma.CHANNEL[5].CCONFIG.read();
        super::stop(&channel);
        assert!(!channel.is_enabled());
        assert_eq!(hw.gpdma.CHANNEL[5].CCONFIG.read(), config);
    }

    #[test]
    fn current_index_follows_live_link() {
        let hw = Hardware::new();
        let dma = hw.driver();
        let mut channel = unsafe { dma.channel(5) };
        let mut descriptors = ring::<4>();
        let buffer = [0u8; 64];
        configure(&mut descriptors, buffer.as_ptr(), buffer.as_ptr(), 16);

        // Not started.
        assert_eq!(current_transfer_index(&channel, &descriptors), 0);

        unsafe { super::start(&mut channel, &descriptors[0]) };
        // Hardware moved on to descriptor 2.
        hw.gpdma.CHANNEL[5].CLLI.write(descriptors[2].link());
        assert_eq!(current_transfer_index(&channel, &descriptors), 2);

        hw.gpdma.CHANNEL[5].CLLI.write(descriptors[3].link());
        assert_eq!(current_transfer_index(&channel, &descriptors), 3);

        // Stale link.
        hw.gpdma.CHANNEL[5].CLLI.write(0xFFFF_FFF0);
        assert_eq!(current_transfer_index(&channel, &descriptors), 0);
    }

    #[test]
    fn error_flags() {
        let hw = Hardware::new();
        let dma = hw.driver();
        let channel = unsafe { dma.channel(5) };

        assert!(!super::is_error(&channel));
        hw.latch_error(5);
        assert!(super::is_error(&channel));
        // Reading doesn't clear.
        assert!(super::is_error(&channel));
        assert_eq!(peek(&hw.gpdma.INTERRCLR), 0);

        super::acknowledge_error(&channel);
        assert_eq!(peek(&hw.gpdma.INTERRCLR), 1 << 5);
        super::acknowledge_completion(&channel);
        assert_eq!(peek(&hw.gpdma.INTTCCLEAR), 1 << 5);
    }

    #[test]
    fn init_routes_trigger_and_enables() {
        let hw = Hardware::new();
        let dma = hw.driver();
        hw.creg.DMAMUX.write(0b11 << 10 | 0b01);
        super::init(&dma, Trigger::TIMER2_MATCH0);
        assert_eq!(hw.creg.DMAMUX.read(), 0b01);
        assert!(dma.is_enabled());
    }
}
