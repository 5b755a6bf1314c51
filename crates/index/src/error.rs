use thiserror::Error;

/// Errors raised by `BitMask`/`IndexData` mutation. Both are programming
/// errors per the design notes: surfaced, never retried.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum IndexError {
    /// `set_range` was called with bounds not aligned to the grid step.
    #[error("unaligned range [{start_block}, {end_block}) for grid step {step}")]
    Alignment {
        /// The requested start block.
        start_block: u64,
        /// The requested end block.
        end_block: u64,
        /// The grid step both bounds must be a multiple of.
        step: u64,
    },
    /// `set_range` was called with `end < start` or `end < 0`.
    #[error("invalid range [{start}, {end})")]
    Range {
        /// The requested start bit.
        start: i64,
        /// The requested end bit.
        end: i64,
    },
}
