use crate::{BitMask, IndexError};

/// A `BitMask` anchored at a block number.
///
/// `start_block` is always a multiple of `8 * step`; bit `i` of the mask
/// represents the chunk `[start_block + i*step, start_block + (i+1)*step)`.
/// `end_block`, when set, is an exclusive upper bound past which `get`
/// returns `false` regardless of the mask contents (Open Question #1: this
/// crate fixes the exclusive-upper-bound interpretation, since that is what
/// the fetcher's shrink step needs).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexData {
    step: u64,
    start_block: u64,
    end_block: Option<u64>,
    mask: BitMask,
}

impl IndexData {
    /// A fresh, empty index for the given grid step.
    pub const fn new(step: u64) -> Self {
        Self { step, start_block: 0, end_block: None, mask: BitMask::new() }
    }

    /// Build from already-known parts, e.g. when loading from storage.
    pub const fn from_parts(step: u64, start_block: u64, end_block: Option<u64>, mask: BitMask) -> Self {
        Self { step, start_block, end_block, mask }
    }

    /// Grid step, `G`.
    pub const fn step(&self) -> u64 {
        self.step
    }

    /// The block corresponding to bit 0 of the mask.
    pub const fn start_block(&self) -> u64 {
        self.start_block
    }

    /// The exclusive upper bound past which bits are implicitly false, if
    /// one has been set.
    pub const fn end_block(&self) -> Option<u64> {
        self.end_block
    }

    /// Raw mask bytes.
    pub fn mask(&self) -> &BitMask {
        &self.mask
    }

    /// Set (or clear) the exclusive upper bound.
    pub fn set_end_block(&mut self, end_block: Option<u64>) {
        self.end_block = end_block;
    }

    /// `block - (block mod step)`.
    pub const fn snap_to_grid(&self, block: u64) -> u64 {
        block - (block % self.step)
    }

    /// Whether the chunk containing `block` has been recorded as fetched.
    pub fn get(&self, block: u64) -> bool {
        if block < self.start_block {
            return false;
        }
        if let Some(end) = self.end_block {
            if block >= end {
                return false;
            }
        }
        let bit = (block - self.start_block) / self.step;
        self.mask.get(bit)
    }

    /// Set `[block_start, block_end)` to `value`. Both bounds must be
    /// multiples of `step`, else [`IndexError::Alignment`]. If
    /// `block_start` falls before the byte currently anchoring bit 0, the
    /// anchor moves down to the `8*step`-aligned block line containing it
    /// and the mask is left-padded with zero bytes — this applies even to
    /// the very first call on a freshly constructed index, so the anchor
    /// ends up at the grid line, not at `block_start` itself.
    pub fn set_range(&mut self, block_start: u64, block_end: u64, value: bool) -> Result<(), IndexError> {
        if block_start % self.step != 0 || block_end % self.step != 0 {
            return Err(IndexError::Alignment { start_block: block_start, end_block: block_end, step: self.step });
        }

        let byte_span = 8 * self.step;
        let candidate_start = (block_start / byte_span) * byte_span;

        if candidate_start < self.start_block {
            if self.mask.byte_len() == 0 {
                self.start_block = candidate_start;
            } else {
                let gap_blocks = self.start_block - candidate_start;
                let n_bytes = (gap_blocks / byte_span) as usize;
                self.mask.prepend_empty_bytes(n_bytes);
                self.start_block = candidate_start;
            }
        }

        let bit_start = (block_start - self.start_block) / self.step;
        let bit_end = (block_end - self.start_block) / self.step;
        self.mask.set_range(bit_start as i64, bit_end as i64, value)
    }

    /// Serialize as 4 bytes big-endian `start_block`, 4 bytes big-endian
    /// `end_block` (`0` = unbounded), then mask bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(8 + self.mask.byte_len());
        out.extend_from_slice(&(self.start_block as u32).to_be_bytes());
        out.extend_from_slice(&(self.end_block.unwrap_or(0) as u32).to_be_bytes());
        out.extend_from_slice(self.mask.as_bytes());
        out
    }

    /// Inverse of [`IndexData::to_bytes`].
    pub fn from_bytes(step: u64, bytes: &[u8]) -> Result<Self, IndexError> {
        if bytes.len() < 8 {
            return Err(IndexError::Range { start: 0, end: bytes.len() as i64 });
        }
        let start_block = u32::from_be_bytes(bytes[0..4].try_into().unwrap()) as u64;
        let end_raw = u32::from_be_bytes(bytes[4..8].try_into().unwrap()) as u64;
        let end_block = if end_raw == 0 { None } else { Some(end_raw) };
        let mask = BitMask::from_bytes(bytes[8..].to_vec());
        Ok(Self { step, start_block, end_block, mask })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_f_anchors_on_first_set_range() {
        let mut idx = IndexData::new(1000);
        idx.set_range(11000, 14000, true).unwrap();
        assert_eq!(idx.start_block(), 8000);
        assert_eq!(idx.end_block(), None);
        assert_eq!(idx.mask().as_bytes(), &[0x38]);
    }

    #[test]
    fn rejects_unaligned_range() {
        let mut idx = IndexData::new(1000);
        let before = idx.clone();
        assert!(idx.set_range(1500, 2000, true).is_err());
        assert_eq!(idx, before);
    }

    #[test]
    fn get_is_false_before_anchor_and_past_end_block() {
        let mut idx = IndexData::new(1000);
        idx.set_range(11000, 14000, true).unwrap();
        assert!(!idx.get(0));
        assert!(idx.get(11000));
        assert!(idx.get(13999));
        assert!(!idx.get(14000));

        idx.set_end_block(Some(12000));
        assert!(idx.get(11000));
        assert!(!idx.get(12000));
    }

    #[test]
    fn anchor_shifts_down_on_later_lower_write() {
        let mut idx = IndexData::new(1000);
        idx.set_range(11000, 14000, true).unwrap();
        idx.set_range(0, 2000, true).unwrap();
        assert_eq!(idx.start_block(), 0);
        assert!(idx.get(0));
        assert!(idx.get(11000));
    }

    #[test]
    fn round_trip_serialization() {
        let mut idx = IndexData::new(1000);
        idx.set_range(11000, 14000, true).unwrap();
        idx.set_end_block(Some(20000));
        let bytes = idx.to_bytes();
        let restored = IndexData::from_bytes(1000, &bytes).unwrap();
        for b in (8000..20000).step_by(1000) {
            assert_eq!(idx.get(b), restored.get(b), "block {b}");
        }
    }

    #[test]
    fn grid_snap_monotone() {
        let idx = IndexData::new(1000);
        assert!(idx.snap_to_grid(1200) <= idx.snap_to_grid(1800));
        assert!(idx.snap_to_grid(999) <= idx.snap_to_grid(1000));
    }
}
