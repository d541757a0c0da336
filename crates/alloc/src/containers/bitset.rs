use core::{
    fmt,
    ops::{
        BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not, Shl, ShlAssign, Shr,
        ShrAssign,
    },
};

use bitvec::{boxed::BitBox, order::Lsb0, vec::BitVec};
use num_traits::{PrimInt, Unsigned};

use crate::error::AccessError;

/// Number of bits in each storage word.
pub const BITS_PER_WORD: usize = u64::BITS as usize;

/// A fixed-size collection of `N` bits.
///
/// Bit 0 is the least significant. Storage is `ceil(N / 64)` words, allocated once.
pub struct Bitset<const N: usize> {
    bits: BitBox<u64, Lsb0>,
}

impl<const N: usize> Bitset<N> {
    /// Number of storage words backing the set.
    pub const WORD_COUNT: usize = (N + BITS_PER_WORD - 1) / BITS_PER_WORD;

    /// Constructs a `Bitset` with every bit cleared.
    pub fn new() -> Self {
        let bits = BitVec::<u64, Lsb0>::repeat(false, N).into_boxed_bitslice();
        debug_assert_eq!(bits.as_raw_slice().len(), Self::WORD_COUNT);
        Self { bits }
    }

    /// Constructs a `Bitset` from the low bits of `value`. Bits past `N` are ignored.
    pub fn from_int<U>(value: U) -> Self
    where
        U: PrimInt + Unsigned,
    {
        let mut set = Self::new();
        for i in 0..width_of::<U>().min(N) {
            if (value >> i) & U::one() == U::one() {
                set.bits.set(i, true);
            }
        }
        set
    }

    /// Returns the value of the first `N` bits, or `None` if a set bit does not fit in `U`.
    pub fn to_int<U>(&self) -> Option<U>
    where
        U: PrimInt + Unsigned,
    {
        let width = width_of::<U>();
        let mut value = U::zero();
        for i in self.iter_ones() {
            if i >= width {
                return None;
            }
            value = value | (U::one() << i);
        }
        Some(value)
    }

    #[inline]
    pub const fn len(&self) -> usize {
        N
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    fn check(&self, index: usize) -> Result<(), AccessError> {
        if index < N {
            Ok(())
        } else {
            Err(AccessError::OutOfRange { index, len: N })
        }
    }

    /// Returns the bit at `index`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `index >= N`.
    pub fn test(&self, index: usize) -> Result<bool, AccessError> {
        self.check(index)?;
        Ok(self.bits[index])
    }

    /// Sets the bit at `index` to `value`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `index >= N`.
    pub fn set(&mut self, index: usize, value: bool) -> Result<(), AccessError> {
        self.check(index)?;
        self.bits.set(index, value);
        Ok(())
    }

    /// Clears the bit at `index`.
    pub fn reset(&mut self, index: usize) -> Result<(), AccessError> {
        self.set(index, false)
    }

    /// Inverts the bit at `index`.
    pub fn flip(&mut self, index: usize) -> Result<(), AccessError> {
        let value = self.test(index)?;
        self.bits.set(index, !value);
        Ok(())
    }

    pub fn set_all(&mut self) {
        self.bits.fill(true);
    }

    pub fn reset_all(&mut self) {
        self.bits.fill(false);
    }

    pub fn flip_all(&mut self) {
        for mut bit in self.bits.iter_mut() {
            *bit = !*bit;
        }
    }

    /// Returns the number of set bits.
    pub fn count(&self) -> usize {
        self.bits.count_ones()
    }

    /// Returns `true` if every bit is set. Vacuously `true` when `N == 0`.
    pub fn all(&self) -> bool {
        self.bits.all()
    }

    pub fn any(&self) -> bool {
        self.bits.any()
    }

    pub fn none(&self) -> bool {
        self.bits.not_any()
    }

    /// Returns the indices of the set bits in ascending order.
    pub fn iter_ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter_ones()
    }

    fn zip_with(&mut self, rhs: &Self, f: impl Fn(bool, bool) -> bool) {
        for (mut bit, other) in self.bits.iter_mut().zip(rhs.bits.iter().by_vals()) {
            *bit = f(*bit, other);
        }
    }

    /// Moves every bit `by` places towards the most significant end.
    fn shift_up(&mut self, by: usize) {
        if by >= N {
            self.reset_all();
            return;
        }
        for i in (by..N).rev() {
            let value = self.bits[i - by];
            self.bits.set(i, value);
        }
        self.bits[..by].fill(false);
    }

    /// Moves every bit `by` places towards the least significant end.
    fn shift_down(&mut self, by: usize) {
        if by >= N {
            self.reset_all();
            return;
        }
        for i in 0..N - by {
            let value = self.bits[i + by];
            self.bits.set(i, value);
        }
        self.bits[N - by..].fill(false);
    }
}

/// Returns the number of bits in `U`.
fn width_of<U: PrimInt + Unsigned>() -> usize {
    U::zero().count_zeros() as usize
}

impl<const N: usize> Default for Bitset<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Clone for Bitset<N> {
    fn clone(&self) -> Self {
        Self {
            bits: self.bits.clone(),
        }
    }
}

impl<const N: usize> PartialEq for Bitset<N> {
    fn eq(&self, other: &Self) -> bool {
        self.bits.as_bitslice() == other.bits.as_bitslice()
    }
}

impl<const N: usize> Eq for Bitset<N> {}

macro_rules! impl_bit_op {
    ($op:ident, $method:ident, $op_assign:ident, $method_assign:ident, $f:expr) => {
        impl<const N: usize> $op_assign<&Bitset<N>> for Bitset<N> {
            fn $method_assign(&mut self, rhs: &Bitset<N>) {
                self.zip_with(rhs, $f);
            }
        }

        impl<const N: usize> $op_assign for Bitset<N> {
            fn $method_assign(&mut self, rhs: Bitset<N>) {
                self.zip_with(&rhs, $f);
            }
        }

        impl<const N: usize> $op for Bitset<N> {
            type Output = Bitset<N>;

            fn $method(mut self, rhs: Bitset<N>) -> Bitset<N> {
                self.zip_with(&rhs, $f);
                self
            }
        }

        impl<const N: usize> $op<&Bitset<N>> for &Bitset<N> {
            type Output = Bitset<N>;

            fn $method(self, rhs: &Bitset<N>) -> Bitset<N> {
                let mut out = self.clone();
                out.zip_with(rhs, $f);
                out
            }
        }
    };
}

impl_bit_op!(BitAnd, bitand, BitAndAssign, bitand_assign, |a, b| a & b);
impl_bit_op!(BitOr, bitor, BitOrAssign, bitor_assign, |a, b| a | b);
impl_bit_op!(BitXor, bitxor, BitXorAssign, bitxor_assign, |a, b| a ^ b);

impl<const N: usize> Not for Bitset<N> {
    type Output = Bitset<N>;

    fn not(mut self) -> Bitset<N> {
        self.flip_all();
        self
    }
}

impl<const N: usize> ShlAssign<usize> for Bitset<N> {
    fn shl_assign(&mut self, by: usize) {
        self.shift_up(by);
    }
}

impl<const N: usize> ShrAssign<usize> for Bitset<N> {
    fn shr_assign(&mut self, by: usize) {
        self.shift_down(by);
    }
}

impl<const N: usize> Shl<usize> for Bitset<N> {
    type Output = Bitset<N>;

    fn shl(mut self, by: usize) -> Bitset<N> {
        self.shift_up(by);
        self
    }
}

impl<const N: usize> Shr<usize> for Bitset<N> {
    type Output = Bitset<N>;

    fn shr(mut self, by: usize) -> Bitset<N> {
        self.shift_down(by);
        self
    }
}

impl<const N: usize> fmt::Display for Bitset<N> {
    /// Most significant bit first.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in (0..N).rev() {
            f.write_str(if self.bits[i] { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl<const N: usize> fmt::Debug for Bitset<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Bitset").field(&format_args!("{self}")).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_count_rounds_up() {
        assert_eq!(Bitset::<0>::WORD_COUNT, 0);
        assert_eq!(Bitset::<1>::WORD_COUNT, 1);
        assert_eq!(Bitset::<64>::WORD_COUNT, 1);
        assert_eq!(Bitset::<65>::WORD_COUNT, 2);
    }

    #[test]
    fn set_test_and_flip() {
        let mut bits = Bitset::<70>::new();
        assert!(bits.none());
        bits.set(3, true).unwrap();
        bits.set(69, true).unwrap();
        assert_eq!(bits.test(3), Ok(true));
        assert_eq!(bits.test(4), Ok(false));
        bits.flip(4).unwrap();
        bits.reset(3).unwrap();
        assert_eq!(bits.iter_ones().collect::<Vec<_>>(), [4, 69]);
        assert_eq!(bits.count(), 2);
    }

    #[test]
    fn out_of_range_leaves_bits_alone() {
        let mut bits = Bitset::<8>::from_int(0b1010u8);
        assert_eq!(bits.test(8), Err(AccessError::OutOfRange { index: 8, len: 8 }));
        assert_eq!(bits.set(8, true), Err(AccessError::OutOfRange { index: 8, len: 8 }));
        assert!(bits.flip(100).is_err());
        assert_eq!(bits.to_int::<u8>(), Some(0b1010));
    }

    #[test]
    fn whole_set_queries() {
        let mut bits = Bitset::<10>::new();
        bits.set_all();
        assert!(bits.all() && bits.any());
        assert_eq!(bits.count(), 10);
        bits.flip_all();
        assert!(bits.none());
        assert!(Bitset::<0>::new().all());
    }

    #[test]
    fn int_conversion() {
        let mut bits = Bitset::<70>::from_int(u8::MAX);
        assert_eq!(bits.to_int::<u8>(), Some(255));
        bits.set(10, true).unwrap();
        assert_eq!(bits.to_int::<u8>(), None);
        assert_eq!(bits.to_int::<u16>(), Some(255 | 1 << 10));

        let truncated = Bitset::<4>::from_int(0xFFu32);
        assert_eq!(truncated.to_int::<u64>(), Some(0xF));
    }

    #[test]
    fn logic_operators() {
        let a = Bitset::<6>::from_int(0b110011u8);
        let b = Bitset::<6>::from_int(0b101010u8);
        assert_eq!((&a & &b).to_int::<u8>(), Some(0b100010));
        assert_eq!((&a | &b).to_int::<u8>(), Some(0b111011));
        assert_eq!((&a ^ &b).to_int::<u8>(), Some(0b011001));
        assert_eq!((!a.clone()).to_int::<u8>(), Some(0b001100));

        let mut c = a;
        c &= b;
        assert_eq!(c.to_int::<u8>(), Some(0b100010));
    }

    #[test]
    fn shifts_drop_overflowing_bits() {
        let bits = Bitset::<8>::from_int(0b1001_0110u8);
        assert_eq!((bits.clone() << 2).to_int::<u8>(), Some(0b0101_1000));
        assert_eq!((bits.clone() >> 3).to_int::<u8>(), Some(0b0001_0010));
        assert!((bits.clone() << 8).none());

        let mut shifted = bits;
        shifted >>= 20;
        assert!(shifted.none());
    }

    #[test]
    fn display_is_most_significant_first() {
        let bits = Bitset::<5>::from_int(0b00110u8);
        assert_eq!(bits.to_string(), "00110");
        assert_eq!(format!("{bits:?}"), "Bitset(00110)");
    }
}
