//! DMA interrupt support

use crate::{Channel, Error, Gpdma};
use core::{
    cell::RefCell,
    future::Future,
    marker::PhantomPinned,
    pin::Pin,
    task::{Context, Poll, Waker},
};

use critical_section::Mutex;

/// Events recorded by the interrupt handler, waiting for a [`Completion`]
pub(crate) struct Events {
    waker: Option<Waker>,
    complete: bool,
    /// INTERRSTAT when the error was acknowledged
    error: Option<u32>,
}

pub(crate) type SharedEvents = Mutex<RefCell<Events>>;
pub(crate) const NO_EVENTS: SharedEvents = Mutex::new(RefCell::new(Events {
    waker: None,
    complete: false,
    error: None,
}));

impl<const CHANNELS: usize> Gpdma<CHANNELS> {
    /// Handle the GPDMA interrupt
    ///
    /// All GPDMA channels share one interrupt. For each channel below `CHANNELS`
    /// that latched a terminal count or an error, `on_interrupt` acknowledges the
    /// interrupt, records the event, and wakes the channel's [`Completion`].
    ///
    /// Call `on_interrupt` from the GPDMA interrupt handler:
    ///
    /// ```no_run
    /// # use lpc43xx_gpdma::Gpdma;
    /// # static DMA: Gpdma<8> = unsafe { Gpdma::new(core::ptr::null(), core::ptr::null()) };
    /// // #[cortex_m_rt::interrupt]
    /// fn GPDMA() {
    ///     DMA.on_interrupt();
    /// }
    /// ```
    ///
    /// The channels only signal again once their flags are acknowledged, so
    /// don't mix `on_interrupt` with your own acknowledgements.
    pub fn on_interrupt(&self) {
        let complete = self.controller.INTTCSTAT.read();
        let errors = self.controller.INTERRSTAT.read();

        for (index, events) in self.events.iter().enumerate() {
            let mask = 1 << index;
            if (complete | errors) & mask == 0 {
                continue;
            }
            if complete & mask != 0 {
                self.controller.INTTCCLEAR.write(mask);
            }
            if errors & mask != 0 {
                self.controller.INTERRCLR.write(mask);
                log::warn!("GPDMA channel {} transfer error", index);
            }

            critical_section::with(|cs| {
                let mut events = events.borrow_ref_mut(cs);
                events.complete |= complete & mask != 0;
                if errors & mask != 0 {
                    events.error = Some(errors);
                }
                if let Some(waker) = events.waker.take() {
                    waker.wake();
                }
            });
        }
    }

    /// Wait for the next event recorded by [`on_interrupt`](Gpdma::on_interrupt)
    ///
    /// See [`Completion`] for details.
    ///
    /// # Panics
    ///
    /// Panics if `channel` wasn't allocated by this driver.
    pub fn completion<'a>(&'a self, channel: &'a Channel) -> Completion<'a, CHANNELS> {
        assert!(
            channel.channel() < CHANNELS,
            "DMA channel isn't managed by this driver"
        );
        Completion {
            dma: self,
            channel,
            _pinned: PhantomPinned,
        }
    }
}

/// A future that resolves on the next completed transfer, or transfer error
///
/// The future is woken by a call to [`Gpdma::on_interrupt`]. It does not
/// start or stop the channel. Since a ring never completes, you'll typically
/// await `Completion` in a loop, and check the ring's progress each time it
/// resolves:
///
/// - `Ok(())` indicates that the channel completed at least one transfer since
///   the previous `Completion` resolved.
/// - `Err(error)` indicates that the channel reported a transfer error. Errors
///   take priority over completions.
pub struct Completion<'a, const CHANNELS: usize> {
    dma: &'a Gpdma<CHANNELS>,
    channel: &'a Channel,
    _pinned: PhantomPinned,
}

impl<const CHANNELS: usize> Future for Completion<'_, CHANNELS> {
    type Output = Result<(), Error>;
    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let index = self.channel.channel();
        critical_section::with(|cs| {
            let mut events = self.dma.events[index].borrow_ref_mut(cs);
            if let Some(status) = events.error.take() {
                events.complete = false;
                Poll::Ready(Err(Error::new(index, status)))
            } else if events.complete {
                events.complete = false;
                Poll::Ready(Ok(()))
            } else {
                events.waker = Some(cx.waker().clone());
                Poll::Pending
            }
        })
    }
}

impl<const CHANNELS: usize> Drop for Completion<'_, CHANNELS> {
    fn drop(&mut self) {
        let index = self.channel.channel();
        critical_section::with(|cs| {
            self.dma.events[index].borrow_ref_mut(cs).waker = None;
        });
    }
}

/// The GPDMA interrupt number, on the Cortex-M4 core
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpdmaInterrupt;

// Safety: the LPC43xx M4 core routes the GPDMA to IRQ 2.
unsafe impl cortex_m::interrupt::InterruptNumber for GpdmaInterrupt {
    fn number(self) -> u16 {
        2
    }
}

/// Unmask the GPDMA interrupt in the NVIC
///
/// # Safety
///
/// This can break mask-based critical sections. Register an interrupt handler
/// that calls [`Gpdma::on_interrupt`] before unmasking.
pub unsafe fn unmask_interrupt() {
    cortex_m::peripheral::NVIC::unmask(GpdmaInterrupt);
}
