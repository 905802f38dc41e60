//! DMA element sizes

mod private {
    pub trait Sealed {}
    impl Sealed for u8 {}
    impl Sealed for u16 {}
    impl Sealed for u32 {}
}

/// An element that the GPDMA controller can move in a single access
///
/// `Element` is sealed. It's implemented for `u8`, `u16`, and `u32`.
pub trait Element: private::Sealed + Copy + 'static {
    /// The SWIDTH / DWIDTH encoding for this element
    const DATA_TRANSFER_ID: u32;
}

impl Element for u8 {
    const DATA_TRANSFER_ID: u32 = 0;
}

impl Element for u16 {
    const DATA_TRANSFER_ID: u32 = 1;
}

impl Element for u32 {
    const DATA_TRANSFER_ID: u32 = 2;
}
