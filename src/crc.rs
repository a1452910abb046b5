//! CRC-8 engine, using the DVB-S2 polynomial. Used by CRSF receivers to validate
//! each frame: the CRC covers the type byte and payload.
//!
//! Two strategies compute identical results: [`Table`] trades 256 bytes of memory for a single
//! lookup per byte, and [`Bitwise`] recomputes the 8 polynomial rounds for every byte.

#[cfg(feature = "defmt")]
use defmt::{debug, trace};

use crate::{config::Optimisation, CrcError, CRC_POLY};

mod sealed {
    pub trait Sealed {}
}

/// Run the 8 polynomial rounds on a value that's already been XORed with the input byte.
const fn shift_rounds(mut crc: u8) -> u8 {
    let mut i = 0;
    while i < 8 {
        if crc & 0x80 != 0 {
            crc = (crc << 1) ^ CRC_POLY;
        } else {
            crc <<= 1;
        }
        i += 1;
    }
    crc
}

/// Precompute the result of the 8 rounds for each possible byte.
const fn build_table() -> [u8; 256] {
    let mut result = [0; 256];

    let mut i = 0;
    while i < 256 {
        result[i] = shift_rounds(i as u8);
        i += 1;
    }

    result
}

/// A way of computing the per-byte CRC update. Implemented by [`Table`] and [`Bitwise`] only.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not an available CRC strategy",
    note = "hardware CRC acceleration is not implemented; use `Table` (`opt-speed`) or `Bitwise` (`opt-size`)"
)]
pub trait Strategy: sealed::Sealed + Clone {
    const OPTIMISATION: Optimisation;

    fn new() -> Self;

    /// Fold one byte into the running CRC.
    fn update(&self, crc: u8, byte: u8) -> u8;
}

/// Table-driven strategy. Owns its lookup table by value, so clones never share it.
#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    table: [u8; 256],
}

impl Table {
    /// Index is `crc ^ byte`.
    pub fn as_bytes(&self) -> &[u8; 256] {
        &self.table
    }
}

impl sealed::Sealed for Table {}

impl Strategy for Table {
    const OPTIMISATION: Optimisation = Optimisation::Speed;

    fn new() -> Self {
        let table = build_table();

        #[cfg(feature = "defmt")]
        trace!("CRC-8 lookup table built. Poly: {=u8:#x}", CRC_POLY);

        Self { table }
    }

    #[inline]
    fn update(&self, crc: u8, byte: u8) -> u8 {
        self.table[(crc ^ byte) as usize]
    }
}

/// Bit-by-bit strategy. No setup, and no memory beyond the running CRC.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bitwise;

impl sealed::Sealed for Bitwise {}

impl Strategy for Bitwise {
    const OPTIMISATION: Optimisation = Optimisation::Size;

    fn new() -> Self {
        Self
    }

    #[inline]
    fn update(&self, crc: u8, byte: u8) -> u8 {
        shift_rounds(crc ^ byte)
    }
}

/// Hardware-accelerated CRC. There's no implementation; an engine using it won't build.
///
/// ```compile_fail
/// use crsf_crc::{Crc8, Hardware};
///
/// let crc = Crc8::<Hardware>::new();
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Hardware;

impl Hardware {
    pub const OPTIMISATION: Optimisation = Optimisation::Hardware;
}

/// The CRC engine. Create it once, eg at receiver startup, and reuse it for every frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Crc8<S: Strategy = crate::config::Selected> {
    strategy: S,
}

impl<S: Strategy> Default for Crc8<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Strategy> Crc8<S> {
    pub fn new() -> Self {
        Self { strategy: S::new() }
    }

    pub fn optimisation(&self) -> Optimisation {
        S::OPTIMISATION
    }

    /// Fold `byte` into `crc`: XOR, then 8 rounds of the polynomial.
    #[inline]
    pub fn transform(&self, crc: u8, byte: u8) -> u8 {
        self.strategy.update(crc, byte)
    }

    /// Calculate the CRC of the first `length` bytes of `data`. The running CRC starts
    /// as `start` folded into 0, which allows chaining from a previous result.
    ///
    /// # Panics
    /// If `length` is greater than `data.len()`. See `calculate_checked`.
    pub fn calculate(&self, start: u8, data: &[u8], length: usize) -> u8 {
        data[..length]
            .iter()
            .fold(self.transform(0, start), |crc, &byte| self.transform(crc, byte))
    }

    /// Calculate the CRC of `data[offset..length]`. The CRC is seeded from `data[offset]`;
    /// `start` is unused.
    ///
    /// # Panics
    /// If `offset >= length`, or `length` is greater than `data.len()`.
    /// See `calculate_from_checked`.
    pub fn calculate_from(&self, offset: usize, _start: u8, data: &[u8], length: usize) -> u8 {
        // todo: Find out if receivers expect `start` to seed this, like `calculate`.
        let crc = self.transform(0, data[offset]);

        data[offset + 1..length]
            .iter()
            .fold(crc, |crc, &byte| self.transform(crc, byte))
    }

    pub fn calculate_checked(&self, start: u8, data: &[u8], length: usize) -> Result<u8, CrcError> {
        check_length(data, length)?;

        Ok(self.calculate(start, data, length))
    }

    pub fn calculate_from_checked(
        &self,
        offset: usize,
        start: u8,
        data: &[u8],
        length: usize,
    ) -> Result<u8, CrcError> {
        check_length(data, length)?;

        if offset >= length {
            #[cfg(feature = "defmt")]
            debug!("CRC offset {} out of range for length {}", offset, length);

            return Err(CrcError::Offset { offset, length });
        }

        Ok(self.calculate_from(offset, start, data, length))
    }

    /// Calculate the CRC over all of `data`, and compare it to `expected`, eg the CRC
    /// byte received at the end of a frame.
    pub fn verify(&self, start: u8, data: &[u8], expected: u8) -> Result<(), CrcError> {
        let actual = self.calculate(start, data, data.len());

        if actual != expected {
            #[cfg(feature = "defmt")]
            debug!("CRC mismatch. Expected: {:x}, actual: {:x}", expected, actual);

            return Err(CrcError::Mismatch { expected, actual });
        }

        Ok(())
    }
}

#[cfg(test)]
impl Crc8<Table> {
    /// Direct table access, for checking that clones don't share it.
    pub(crate) fn table_mut(&mut self) -> &mut [u8; 256] {
        &mut self.strategy.table
    }
}

fn check_length(data: &[u8], length: usize) -> Result<(), CrcError> {
    if length > data.len() {
        #[cfg(feature = "defmt")]
        debug!("CRC length {} exceeds buffer len {}", length, data.len());

        return Err(CrcError::BufferSize {
            length,
            available: data.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::*;

    #[test]
    fn table_matches_shift_rounds() {
        let table = Table::new();

        for i in 0..=255u8 {
            assert_eq!(table.as_bytes()[i as usize], shift_rounds(i));
        }
        assert_eq!(table.as_bytes()[1], CRC_POLY);
    }

    #[test]
    fn strategies_agree_on_single_bytes() {
        let fast = Crc8::<Table>::new();
        let small = Crc8::<Bitwise>::new();

        for crc in 0..=255u8 {
            for byte in 0..=255u8 {
                assert_eq!(fast.transform(crc, byte), small.transform(crc, byte));
            }
        }
    }

    #[test]
    fn strategies_agree_on_fuzzed_buffers() {
        let fast = Crc8::<Table>::new();
        let small = Crc8::<Bitwise>::new();
        let mut rng = StdRng::seed_from_u64(0x1234_5678);
        let mut buf = [0u8; 255];

        for start in 0..=255u8 {
            for len in (0..=64).chain([255]) {
                rng.fill(&mut buf[..len]);
                assert_eq!(
                    fast.calculate(start, &buf, len),
                    small.calculate(start, &buf, len),
                    "start: {start}, len: {len}"
                );
            }
        }
    }

    #[test]
    fn clone_has_its_own_table() {
        let mut a = Crc8::<Table>::new();
        let b = a.clone();
        let data = [0x16, 0x01, 0xff, 0x80];
        let before = b.calculate(0, &data, data.len());

        a.table_mut().fill(0);

        assert_eq!(b.calculate(0, &data, data.len()), before);
        assert_ne!(a.calculate(0, &data, data.len()), before);
    }

    #[test]
    fn assignment_has_its_own_table() {
        let mut a = Crc8::<Table>::new();
        let mut b = Crc8::<Table>::new();
        b.table_mut().fill(0xaa);
        b.clone_from(&a);
        assert_eq!(a, b);

        a.table_mut()[0xff] = 0;

        assert_eq!(b.calculate(0, &[0xff], 1), 0xf9);
        assert_eq!(a.calculate(0, &[0xff], 1), 0);
    }

    #[test]
    fn offset_ignores_start() {
        let crc = Crc8::<Bitwise>::new();
        let data = [0xc8, 0x04, 0x14, 0x31, 0x32, 0x33];

        assert_eq!(
            crc.calculate_from(2, 0x00, &data, data.len()),
            crc.calculate_from(2, 0xa5, &data, data.len())
        );
    }

    #[test]
    #[should_panic]
    fn offset_at_end_panics() {
        let crc = Crc8::<Table>::new();
        let data = [1, 2, 3, 4];

        crc.calculate_from(3, 0, &data, 3);
    }
}
