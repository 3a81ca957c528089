//! Byte pattern search over a memory snapshot

use crate::error::{Result, XeError};

/// Mask character for a byte that must match
pub const MASK_MATCH: char = 'x';

/// Mask character for a byte that may be anything
pub const MASK_WILDCARD: char = '?';

/// Find `pattern` in `haystack`, returning target addresses (`base + offset`).
///
/// `mask` has one character per pattern byte: `x` compares, `?` skips.
pub fn find_pattern(
    haystack: &[u8],
    base: u32,
    pattern: &[u8],
    mask: &str,
    first_only: bool,
) -> Result<Vec<u32>> {
    let region: Vec<Option<u8>> = haystack.iter().copied().map(Some).collect();
    find_pattern_sparse(&region, base, pattern, mask, first_only)
}

/// [`find_pattern`] over a region with unreadable bytes (`None`).
///
/// A window containing an unreadable byte never matches, wildcards included.
pub fn find_pattern_sparse(
    haystack: &[Option<u8>],
    base: u32,
    pattern: &[u8],
    mask: &str,
    first_only: bool,
) -> Result<Vec<u32>> {
    let mask: Vec<bool> = mask.chars().map(|c| c != MASK_WILDCARD).collect();
    if mask.len() != pattern.len() {
        return Err(XeError::InvalidArgument(format!(
            "Mask length {} does not match pattern length {}",
            mask.len(),
            pattern.len()
        )));
    }

    let mut matches = Vec::new();
    if pattern.is_empty() || pattern.len() > haystack.len() {
        return Ok(matches);
    }

    for (offset, window) in haystack.windows(pattern.len()).enumerate() {
        let hit = window
            .iter()
            .zip(pattern)
            .zip(&mask)
            .all(|((byte, expected), &compare)| match byte {
                Some(byte) => !compare || byte == expected,
                None => false,
            });

        if hit {
            matches.push(base.wrapping_add(offset as u32));
            if first_only {
                break;
            }
        }
    }

    Ok(matches)
}

/// A mask that compares every byte of a pattern
pub fn exact_mask(len: usize) -> String {
    std::iter::repeat(MASK_MATCH).take(len).collect()
}
