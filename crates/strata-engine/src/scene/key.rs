use super::ZIndex;

/// Paint-order key packed into one integer: z-index in the high half, list position in the
/// low half.
///
/// Comparing keys compares z first, then list position. Keys of distinct list positions never
/// tie, so an unstable sort over them yields a stable paint order.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct SortKey(u64);

impl SortKey {
    #[inline]
    pub const fn new(z: ZIndex, index: u32) -> Self {
        // Flipping the sign bit maps i32 order onto u32 order.
        let z = (z.0 as u32) ^ 0x8000_0000;
        Self(((z as u64) << 32) | index as u64)
    }

    /// Position in the frame's object list.
    #[inline]
    pub const fn index(self) -> u32 {
        self.0 as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_z_paints_first() {
        assert!(SortKey::new(ZIndex(-5), 100) < SortKey::new(ZIndex(0), 0));
        assert!(SortKey::new(ZIndex(i32::MIN), u32::MAX) < SortKey::new(ZIndex(i32::MAX), 0));
    }

    #[test]
    fn equal_z_falls_back_to_list_position() {
        assert!(SortKey::new(ZIndex(3), 1) < SortKey::new(ZIndex(3), 2));
    }

    #[test]
    fn index_survives_packing() {
        assert_eq!(SortKey::new(ZIndex(-7), 42).index(), 42);
        assert_eq!(SortKey::new(ZIndex(i32::MAX), u32::MAX).index(), u32::MAX);
    }
}
