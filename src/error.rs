//! DMA error status

use core::fmt::{self, Debug, Display};

/// A GPDMA transfer error
///
/// The GPDMA controller only reports *that* a channel failed, usually an AHB
/// bus error on a source, destination, or descriptor fetch. `Error` keeps the
/// failing channel and a copy of the error interrupt status register taken when
/// the error was acknowledged, so you can see which other channels were failing
/// at the same time.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Error {
    /// The channel that reported the error
    channel: u8,
    /// The raw INTERRSTAT value
    status: u32,
}

impl Error {
    pub(crate) const fn new(channel: usize, status: u32) -> Self {
        Error {
            channel: channel as u8,
            status,
        }
    }
    /// Returns the channel that reported the error
    pub const fn channel(self) -> usize {
        self.channel as usize
    }
    /// Returns the raw error interrupt status value
    pub const fn raw(self) -> u32 {
        self.status
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GPDMA_ERR(CH{} INTERRSTAT={:#04X})",
            self.channel, self.status
        )
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GPDMA transfer error on channel {}; failing channels:", self.channel)?;
        let failing = (0..crate::CHANNEL_COUNT).filter(|channel| self.status & (1 << channel) != 0);
        for channel in failing {
            write!(f, " {}", channel)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    extern crate std;
    use super::Error;
    use std::format;

    #[test]
    fn display_lists_failing_channels() {
        let error = Error::new(5, (1 << 5) | (1 << 2));
        assert_eq!(error.channel(), 5);
        assert_eq!(error.raw(), 0x24);
        assert_eq!(
            format!("{}", error),
            "GPDMA transfer error on channel 5; failing channels: 2 5"
        );
        assert_eq!(format!("{:?}", error), "GPDMA_ERR(CH5 INTERRSTAT=0x24)");
    }

    #[test]
    fn display_ignores_reserved_status_bits() {
        let error = Error::new(7, (1 << 7) | (1 << 8) | (1 << 31));
        assert_eq!(
            format!("{}", error),
            "GPDMA transfer error on channel 7; failing channels: 7"
        );
    }
}
