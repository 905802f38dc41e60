//! GPDMA register blocks and fields

use super::{RORegister, RWRegister, WORegister};

/// Number of channels implemented by the GPDMA controller
pub const CHANNEL_COUNT: usize = 8;

/// GPDMA controller registers
#[repr(C)]
pub struct RegisterBlock {
    /// Interrupt status, after masking
    pub INTSTAT: RORegister<u32>,
    /// Terminal count interrupt status
    pub INTTCSTAT: RORegister<u32>,
    /// Terminal count interrupt clear
    pub INTTCCLEAR: WORegister<u32>,
    /// Error interrupt status
    pub INTERRSTAT: RORegister<u32>,
    /// Error interrupt clear
    pub INTERRCLR: WORegister<u32>,
    /// Raw terminal count interrupt status
    pub RAWINTTCSTAT: RORegister<u32>,
    /// Raw error interrupt status
    pub RAWINTERRSTAT: RORegister<u32>,
    /// Enabled channels
    pub ENBLDCHNS: RORegister<u32>,
    /// Software burst request
    pub SOFTBREQ: RWRegister<u32>,
    /// Software single request
    pub SOFTSREQ: RWRegister<u32>,
    /// Software last burst request
    pub SOFTLBREQ: RWRegister<u32>,
    /// Software last single request
    pub SOFTLSREQ: RWRegister<u32>,
    /// Controller configuration
    pub CONFIG: RWRegister<u32>,
    /// Request synchronization
    pub SYNC: RWRegister<u32>,
    _reserved0: [u32; 50],
    /// Channel registers
    pub CHANNEL: [channel::RegisterBlock; CHANNEL_COUNT],
}

const _: () = assert!(core::mem::offset_of!(RegisterBlock, CONFIG) == 0x30);
const _: () = assert!(core::mem::offset_of!(RegisterBlock, CHANNEL) == 0x100);

pub mod channel {
    use super::RWRegister;

    /// Registers for a single GPDMA channel
    #[repr(C)]
    pub struct RegisterBlock {
        /// Source address
        pub CSRCADDR: RWRegister<u32>,
        /// Destination address
        pub CDESTADDR: RWRegister<u32>,
        /// Next linked list item
        pub CLLI: RWRegister<u32>,
        /// Control word
        pub CCONTROL: RWRegister<u32>,
        /// Channel configuration
        pub CCONFIG: RWRegister<u32>,
        _reserved: [u32; 3],
    }

    const _: () = assert!(core::mem::size_of::<RegisterBlock>() == 0x20);
}

/// Controller configuration
pub mod CONFIG {
    fields! {
        E: 0, 1;
        M0: 1, 1;
        M1: 2, 1;
    }
}

/// Linked list item word, shared by the channel register and descriptors
pub mod CLLI {
    fields! {
        LM: 0, 1;
        LLI: 2, 30;
    }
}

/// Control word, shared by the channel register and descriptors
pub mod CCONTROL {
    fields! {
        TRANSFERSIZE: 0, 12;
        SBSIZE: 12, 3;
        DBSIZE: 15, 3;
        SWIDTH: 18, 3;
        DWIDTH: 21, 3;
        S: 24, 1;
        D: 25, 1;
        SI: 26, 1;
        DI: 27, 1;
        PROT1: 28, 1;
        PROT2: 29, 1;
        PROT3: 30, 1;
        I: 31, 1;
    }
}

/// Channel configuration
pub mod CCONFIG {
    fields! {
        E: 0, 1;
        SRCPERIPHERAL: 1, 5;
        DESTPERIPHERAL: 6, 5;
        FLOWCNTRL: 11, 3;
        IE: 14, 1;
        ITC: 15, 1;
        L: 16, 1;
        A: 17, 1;
        H: 18, 1;
    }
}
