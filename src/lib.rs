//! General Purpose DMA (GPDMA) driver for LPC43xx processors
//!
//! `lpc43xx-gpdma` provides
//!
//! - an unsafe API for defining and scheduling transfers with GPDMA [`Channel`]s
//!   and linked [`TransferDescriptor`](lli::TransferDescriptor)s
//! - transfer [`ring`]s that stream a memory buffer to a fixed peripheral
//!   address forever, one byte per request, until they're stopped
//! - an interrupt handler and a [`Completion`] future that report each
//!   completed transfer, or a transfer error, to thread context
//!
//! This DMA driver may be re-exported from a HAL. If it is, you should consider
//! using the safer APIs provided by your HAL.
//!
//! # Getting started
//!
//! Allocate a [`Gpdma`] with the address of the GPDMA controller and the address
//! of the CREG DMAMUX register, then use it to create channels.
//!
//! ```no_run
//! use lpc43xx_gpdma::{ring, Gpdma, Trigger};
//!
//! const GPDMA: *const () = 0x4000_2000 as _;
//! const CREG_DMAMUX: *const () = 0x4004_311C as _;
//!
//! // Safety: addresses are valid for the LPC43xx.
//! static DMA: Gpdma<8> = unsafe { Gpdma::new(GPDMA, CREG_DMAMUX) };
//!
//! ring::init(&DMA, Trigger::TIMER2_MATCH0);
//! // Safety: we only allocate one DMA channel 5 object.
//! let channel = unsafe { DMA.channel(5) };
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
//!
//! Unless you explicitly state otherwise, any contribution intentionally submitted
//! for inclusion in the work by you, as defined in the Apache-2.0 license, shall be
//! dual licensed as above, without any additional terms or conditions.

#![no_std]

mod channel;
mod element;
mod error;
mod interrupt;
pub mod lli;
mod ral;
pub mod ring;
mod vcell;

pub use channel::{Channel, Configuration, FlowControl};
pub use element::Element;
pub use error::Error;
pub use interrupt::{unmask_interrupt, Completion, GpdmaInterrupt};
pub use ral::gpdma::CHANNEL_COUNT;

/// A DMA result
pub type Result<T> = core::result::Result<T, Error>;

/// A GPDMA driver
///
/// `Gpdma` manages the GPDMA controller and its request multiplexer. It's
/// configured with pointers to both peripherals, and it's meant to live in a
/// `static`.
///
/// `Gpdma` allocates [`Channel`]s. `Channel` provides the interface for
/// scheduling transfers. `CHANNELS` is the number of channels that you plan
/// to use, starting from channel 0; it can't exceed [`CHANNEL_COUNT`].
pub struct Gpdma<const CHANNELS: usize> {
    controller: ral::Static<ral::gpdma::RegisterBlock>,
    multiplexer: ral::Static<ral::creg::RegisterBlock>,
    events: [interrupt::SharedEvents; CHANNELS],
}

// Safety: OK to allocate a DMA driver in a static context. Shared state is
// behind critical sections.
unsafe impl<const CHANNELS: usize> Sync for Gpdma<CHANNELS> {}

impl<const CHANNELS: usize> Gpdma<CHANNELS> {
    /// Create the DMA driver
    ///
    /// Note that this can evaluate at compile time.
    ///
    /// # Safety
    ///
    /// Caller must make sure that `controller` points to the start of the GPDMA
    /// register block, and that `multiplexer` points to the CREG DMAMUX register.
    ///
    /// # Panics
    ///
    /// Panics if `CHANNELS` exceeds [`CHANNEL_COUNT`].
    pub const unsafe fn new(controller: *const (), multiplexer: *const ()) -> Self {
        assert!(
            CHANNELS <= CHANNEL_COUNT,
            "GPDMA driver exceeds CHANNEL_COUNT"
        );
        Gpdma {
            controller: ral::Static(controller.cast()),
            multiplexer: ral::Static(multiplexer.cast()),
            events: [interrupt::NO_EVENTS; CHANNELS],
        }
    }

    /// Creates the DMA channel described by `index`
    ///
    /// # Safety
    ///
    /// This will create a handle that may alias global, mutable state. You must
    /// only create one channel for each index.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not less than `CHANNELS`.
    pub unsafe fn channel(&self, index: usize) -> Channel {
        if index < CHANNELS {
            Channel::new(index, self.controller)
        } else {
            panic!("DMA channel index {} exceeds CHANNELS", index);
        }
    }

    /// Enable the GPDMA controller
    ///
    /// Both AHB masters stay little endian.
    pub fn enable(&self) {
        ral::write_reg!(crate::ral::gpdma, self.controller, CONFIG, E: 1, M0: 0, M1: 0);
    }

    /// Disable the GPDMA controller
    ///
    /// Disable all channels before disabling the controller.
    pub fn disable(&self) {
        ral::modify_reg!(crate::ral::gpdma, self.controller, CONFIG, E: 0);
    }

    /// Indicates if the GPDMA controller is enabled
    pub fn is_enabled(&self) -> bool {
        ral::read_reg!(crate::ral::gpdma, self.controller, CONFIG, E == 1)
    }

    /// Route a hardware request source to its peripheral request line
    ///
    /// The selection for every other request line is unchanged.
    pub fn set_trigger(&self, trigger: Trigger) {
        let mux = &self.multiplexer.DMAMUX;
        let peripheral = trigger.peripheral;
        let value = (mux.read() & !ral::creg::mask(peripheral))
            | ((trigger.option as u32) << ral::creg::offset(peripheral));
        mux.write(value);
    }

    /// Returns the hardware request source selected for `peripheral`
    ///
    /// # Panics
    ///
    /// Panics if `peripheral` isn't a request line.
    pub fn trigger(&self, peripheral: u8) -> Trigger {
        assert!(
            peripheral < ral::creg::PERIPHERAL_COUNT,
            "DMAMUX peripheral exceeds request lines"
        );
        let mux = self.multiplexer.DMAMUX.read();
        let option = (mux & ral::creg::mask(peripheral)) >> ral::creg::offset(peripheral);
        Trigger::new(peripheral, option as u8)
    }
}

/// A DMA request source, routed through the DMAMUX
///
/// Each of the 16 GPDMA peripheral request lines can be driven by one of four
/// hardware sources. `Trigger` names a line, and the source option for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trigger {
    peripheral: u8,
    option: u8,
}

impl Trigger {
    /// TIMER2 match 0, routed to request line 5
    pub const TIMER2_MATCH0: Trigger = Trigger::new(5, 0);

    /// Describe request line `peripheral`, driven by source `option`
    ///
    /// # Panics
    ///
    /// Panics if `peripheral` is 16 or more, or if `option` is 4 or more.
    pub const fn new(peripheral: u8, option: u8) -> Self {
        assert!(
            peripheral < ral::creg::PERIPHERAL_COUNT,
            "DMAMUX peripheral exceeds request lines"
        );
        assert!(
            option < ral::creg::OPTION_COUNT,
            "DMAMUX option exceeds sources"
        );
        Trigger { peripheral, option }
    }

    /// The peripheral request line
    pub const fn peripheral(self) -> u8 {
        self.peripheral
    }

    /// The source option for the request line
    pub const fn option(self) -> u8 {
        self.option
    }
}

use core::{future::Future, pin::Pin, task::Poll};

/// Poll a future with a dummy waker.
///
/// Use `poll_no_wake` when you want to drive a future to completion, but you
/// don't care about the future waking an executor. It may be used to check for
/// a DMA completion that will later be awaited with [`block`].
///
/// Do not use `poll_no_wake` if you want an executor to be woken when the DMA
/// transfer completes.
pub fn poll_no_wake<F>(future: Pin<&mut F>) -> Poll<F::Output>
where
    F: Future,
{
    use core::task::{Context, RawWaker, RawWakerVTable, Waker};
    const VTABLE: RawWakerVTable = RawWakerVTable::new(|_| RAW_WAKER, |_| {}, |_| {}, |_| {});

    const RAW_WAKER: RawWaker = RawWaker::new(core::ptr::null(), &VTABLE);
    // Safety: raw waker meets documented requirements.
    let waker = unsafe { Waker::from_raw(RAW_WAKER) };
    let mut context = Context::from_waker(&waker);
    future.poll(&mut context)
}

/// Block until the future returns a result.
///
/// `block` invokes [`poll_no_wake`] in a loop until the future
/// returns a result.
pub fn block<F>(mut future: Pin<&mut F>) -> F::Output
where
    F: Future,
{
    loop {
        match poll_no_wake(future.as_mut()) {
            Poll::Ready(result) => return result,
            Poll::Pending => {}
        }
    }
}

#[cfg(test)]
mod test {
    use super::{block, Trigger};
    use crate::ral::testing::Hardware;

    #[test]
    fn controller_enable() {
        let hw = Hardware::new();
        let dma = hw.driver();
        assert!(!dma.is_enabled());
        hw.gpdma.CONFIG.write(0b110);
        dma.enable();
        assert!(dma.is_enabled());
        assert_eq!(hw.gpdma.CONFIG.read(), 1);
        dma.disable();
        assert!(!dma.is_enabled());
    }

    #[test]
    fn trigger_selection_leaves_other_lines() {
        let hw = Hardware::new();
        let dma = hw.driver();
        hw.creg.DMAMUX.write(u32::MAX);

        dma.set_trigger(Trigger::TIMER2_MATCH0);
        assert_eq!(hw.creg.DMAMUX.read(), !(0b11 << 10));
        assert_eq!(dma.trigger(5), Trigger::TIMER2_MATCH0);
        assert_eq!(dma.trigger(4), Trigger::new(4, 3));

        dma.set_trigger(Trigger::new(15, 2));
        assert_eq!(hw.creg.DMAMUX.read() >> 30, 2);
    }

    #[test]
    #[should_panic]
    fn trigger_option_out_of_range() {
        Trigger::new(0, 4);
    }

    #[test]
    #[should_panic(expected = "DMAMUX peripheral exceeds request lines")]
    fn trigger_lookup_out_of_range() {
        let hw = Hardware::new();
        let dma = hw.driver();
        let _ = dma.trigger(16);
    }

    #[test]
    fn block_on_completion() {
        let hw = Hardware::new();
        let dma = hw.driver();
        let channel = unsafe { dma.channel(4) };

        hw.latch_complete(4);
        dma.on_interrupt();
        let completion = core::pin::pin!(dma.completion(&channel));
        assert_eq!(block(completion), Ok(()));
    }

    #[test]
    #[should_panic]
    fn channel_out_of_range() {
        let hw = Hardware::new();
        let dma = hw.driver();
        let _ = unsafe { dma.channel(8) };
    }
}
