use rand::Rng;
use std::fmt::Debug;

/// Storage for a single grid row, one cell per bit
///
/// Bit `b` (counted from the least significant bit) holds the state of column `b`.
/// The stepping code only goes through this trait, so any word width works as
/// long as the grid has no more columns than [`RowWord::WIDTH`].
pub trait RowWord: Copy + Eq + Default + Debug + Send + Sync {
    /// Number of columns a single word can hold
    const WIDTH: usize;

    /// A word with the lowest `cols` bits set
    fn mask(cols: usize) -> Self;

    fn get(self, col: usize) -> bool;
    fn with(self, col: usize, alive: bool) -> Self;
    fn and(self, other: Self) -> Self;
    fn count_ones(self) -> u32;

    /// The states of columns `col - 1`, `col` and `col + 1` packed into bits 0..=2
    ///
    /// Columns outside the word read as dead, so `window(0)` never sees a
    /// column -1 and `window(WIDTH - 1)` never sees a column `WIDTH`.
    fn window(self, col: usize) -> usize;

    /// A word of uniformly distributed bits
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self;
}

macro_rules! impl_row_word {
    ($($ty:ty),*) => {$(
        impl RowWord for $ty {
            const WIDTH: usize = <$ty>::BITS as usize;

            #[inline]
            fn mask(cols: usize) -> Self {
                debug_assert!(cols <= Self::WIDTH);
                match cols {
                    0 => 0,
                    n => <$ty>::MAX >> (Self::WIDTH - n),
                }
            }

            #[inline]
            fn get(self, col: usize) -> bool {
                (self >> col) & 1 != 0
            }

            #[inline]
            fn with(self, col: usize, alive: bool) -> Self {
                let bit: $ty = 1 << col;
                if alive { self | bit } else { self & !bit }
            }

            #[inline]
            fn and(self, other: Self) -> Self {
                self & other
            }

            #[inline]
            fn count_ones(self) -> u32 {
                <$ty>::count_ones(self)
            }

            #[inline]
            fn window(self, col: usize) -> usize {
                // column 0 has no left neighbour: shift the word up instead of
                // shifting by -1, leaving bit 0 of the window empty
                let bits = match col {
                    0 => self << 1,
                    _ => self >> (col - 1),
                };
                (bits & 0b111) as usize
            }

            #[inline]
            fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
                rng.random()
            }
        }
    )*};
}

impl_row_word!(u8, u16, u32, u64, u128);
