//! Splitting a file into fixed-size parts.

/// Number of parts needed for `file_size` bytes: `ceil(file_size / part_size)`,
/// never less than one. A zero-byte file still uploads one (empty) part.
///
/// `None` for a zero `part_size` or when the count does not fit a part number.
pub fn total_parts(file_size: u64, part_size: u64) -> Option<u32> {
    if part_size == 0 {
        return None;
    }
    u32::try_from(file_size.div_ceil(part_size).max(1)).ok()
}

/// Byte range of one part within the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartSpan {
    /// 1-based part number.
    pub part_number: u32,
    /// Offset of the first byte.
    pub offset: u64,
    /// Length in bytes.
    pub len: u64,
}

/// Part layout for one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartPlan {
    file_size: u64,
    part_size: u64,
    total_parts: u32,
}

impl PartPlan {
    /// Lay out `file_size` bytes in `part_size` parts; `None` when
    /// [`total_parts`] has no answer.
    pub fn new(file_size: u64, part_size: u64) -> Option<Self> {
        Some(Self {
            file_size,
            part_size,
            total_parts: total_parts(file_size, part_size)?,
        })
    }

    pub const fn file_size(&self) -> u64 {
        self.file_size
    }

    pub const fn part_size(&self) -> u64 {
        self.part_size
    }

    pub const fn total_parts(&self) -> u32 {
        self.total_parts
    }

    /// Span of `part_number`, or `None` outside `1..=total_parts`.
    pub fn span(&self, part_number: u32) -> Option<PartSpan> {
        if part_number == 0 || part_number > self.total_parts {
            return None;
        }
        let offset = u64::from(part_number - 1) * self.part_size;
        let len = self.part_size.min(self.file_size.saturating_sub(offset));
        Some(PartSpan {
            part_number,
            offset,
            len,
        })
    }

    /// Every span in part order.
    pub fn spans(&self) -> impl Iterator<Item = PartSpan> + '_ {
        (1..=self.total_parts).filter_map(|n| self.span(n))
    }
}
