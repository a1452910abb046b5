//! Build-time selection of the CRC optimisation level. Set using cargo features; exactly
//! one of `opt-speed` (default), `opt-size` or `opt-hardware` may be enabled.

use num_enum::TryFromPrimitive;

use crate::crc::{Crc8, Strategy};

#[cfg(feature = "opt-hardware")]
compile_error!(
    "CRC optimisation level is set to hardware, but no hardware implementation is available. \
    Enable `opt-speed` or `opt-size` instead."
);

#[cfg(all(
    not(feature = "opt-hardware"),
    not(any(feature = "opt-speed", feature = "opt-size"))
))]
compile_error!("No CRC optimisation level selected. Enable `opt-speed` or `opt-size`.");

#[cfg(all(feature = "opt-speed", feature = "opt-size"))]
compile_error!(
    "`opt-speed` and `opt-size` are both enabled. Select one; `opt-speed` is on by default, so \
    use `default-features = false` with `opt-size`."
);

/// The strategy used by [`DefaultCrc`].
#[cfg(feature = "opt-speed")]
pub type Selected = crate::crc::Table;

#[cfg(all(feature = "opt-size", not(feature = "opt-speed")))]
pub type Selected = crate::crc::Bitwise;

// Keeps the `compile_error!` above as the only error reported.
#[cfg(not(any(feature = "opt-speed", feature = "opt-size")))]
pub type Selected = crate::crc::Bitwise;

/// The engine with the strategy selected by this build's features.
pub type DefaultCrc = Crc8<Selected>;

/// Memory/speed trade-off used to compute the CRC.
#[derive(Clone, Copy, Debug, PartialEq, Eq, TryFromPrimitive)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Optimisation {
    /// 256-byte lookup table; one lookup per byte.
    Speed = 0,
    /// 8 polynomial rounds per byte; no table.
    Size = 1,
    /// A CRC peripheral. Not implemented.
    Hardware = 2,
}

impl Default for Optimisation {
    fn default() -> Self {
        Self::Speed
    }
}

impl Optimisation {
    pub const fn is_available(&self) -> bool {
        matches!(self, Self::Speed | Self::Size)
    }
}

/// The optimisation level this crate was built with.
pub const OPTIMISATION: Optimisation = <Selected as Strategy>::OPTIMISATION;
