//! Leveling curve and level resolution.
//!
//! Levels are derived from total XP via a power curve; the stored level is a
//! cache for display, never the source of truth. A single reward can cross
//! several thresholds at once, so resolution loops until the remaining XP
//! fits inside the current level.
//!
//! Formula: `required_xp(level) = floor(1000 * level^1.5)`

/// XP required to advance from `level` to `level + 1`.
///
/// Uses floor, not round: stored thresholds were produced with truncation
/// and resolution must reproduce them exactly.
///
/// # Panics
///
/// Asserts `level >= 1`; level 0 does not exist in this economy.
pub fn required_xp(level: u32) -> u64 {
    assert!(level >= 1, "levels start at 1, got {level}");
    (1000.0 * (level as f64).powf(1.5)) as u64
}

/// Total XP consumed by all levels below `level`.
///
/// `cumulative_xp(1) == 0`; a fresh account has spent nothing.
pub fn cumulative_xp(level: u32) -> u64 {
    assert!(level >= 1, "levels start at 1, got {level}");
    (1..level).map(required_xp).sum()
}

/// Result of resolving a total XP amount against the leveling curve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelProgress {
    /// Level after resolution.
    pub level: u32,
    /// XP accumulated within the current level.
    pub current_level_xp: u64,
    /// XP needed to reach the next level.
    pub next_level_required_xp: u64,
    /// Whether resolution crossed at least one threshold.
    pub leveled_up: bool,
}

/// Resolve `total_xp` into level progress, starting from `current_level`.
///
/// `current_level` is the cached level from storage; it may lag behind the
/// true level (e.g. after a large grant) but must never exceed it. Cascades
/// across multiple thresholds are handled in one pass.
///
/// # Panics
///
/// Asserts that `total_xp` covers at least the XP consumed by
/// `current_level`; a shortfall means the stored state is corrupt, which
/// must fail loudly rather than be clamped.
pub fn resolve_level(total_xp: u64, current_level: u32) -> LevelProgress {
    let consumed = cumulative_xp(current_level);
    assert!(
        total_xp >= consumed,
        "total_xp {total_xp} below cumulative requirement {consumed} for level {current_level}"
    );

    let mut level = current_level;
    let mut current_level_xp = total_xp - consumed;
    let mut leveled_up = false;

    while current_level_xp >= required_xp(level) {
        current_level_xp -= required_xp(level);
        level += 1;
        leveled_up = true;
    }

    LevelProgress {
        level,
        current_level_xp,
        next_level_required_xp: required_xp(level),
        leveled_up,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_xp_matches_stored_thresholds() {
        // floor(1000 * level^1.5), exact values the store carries
        assert_eq!(required_xp(1), 1000);
        assert_eq!(required_xp(2), 2828);
        assert_eq!(required_xp(3), 5196);
        assert_eq!(required_xp(4), 8000);
        assert_eq!(required_xp(10), 31622);
    }

    #[test]
    fn cumulative_xp_sums_lower_levels() {
        assert_eq!(cumulative_xp(1), 0);
        assert_eq!(cumulative_xp(2), 1000);
        assert_eq!(cumulative_xp(3), 3828);
        assert_eq!(cumulative_xp(4), 9024);
    }

    #[test]
    fn fresh_account_resolves_to_level_one() {
        let progress = resolve_level(0, 1);
        assert_eq!(progress.level, 1);
        assert_eq!(progress.current_level_xp, 0);
        assert_eq!(progress.next_level_required_xp, 1000);
        assert!(!progress.leveled_up);
    }

    #[test]
    fn single_threshold_crossing() {
        // 1200 total: 1000 consumed by level 1, 200 into level 2
        let progress = resolve_level(1200, 1);
        assert_eq!(progress.level, 2);
        assert_eq!(progress.current_level_xp, 200);
        assert_eq!(progress.next_level_required_xp, 2828);
        assert!(progress.leveled_up);
    }

    #[test]
    fn cascade_through_two_thresholds() {
        // 4000 total crosses both level 1 (1000) and level 2 (2828) in one pass
        let progress = resolve_level(4000, 1);
        assert_eq!(progress.level, 3);
        assert_eq!(progress.current_level_xp, 4000 - 1000 - 2828);
        assert!(progress.leveled_up);
    }

    #[test]
    fn resolution_from_cached_level_matches_resolution_from_scratch() {
        // Resolving from a stale cached level must land on the same answer
        let from_scratch = resolve_level(12_345, 1);
        let from_cache = resolve_level(12_345, from_scratch.level);
        assert_eq!(from_cache.level, from_scratch.level);
        assert_eq!(from_cache.current_level_xp, from_scratch.current_level_xp);
        assert!(!from_cache.leveled_up);
    }

    #[test]
    fn remaining_xp_always_below_requirement() {
        // Loop post-condition over a sweep of totals
        for total_xp in (0..100_000).step_by(337) {
            let progress = resolve_level(total_xp, 1);
            assert!(
                progress.current_level_xp < required_xp(progress.level),
                "total_xp {total_xp} left {} xp at level {}",
                progress.current_level_xp,
                progress.level
            );
        }
    }

    #[test]
    #[should_panic]
    fn corrupt_state_fails_loudly() {
        // Stored level claims more XP consumed than the total ever granted
        resolve_level(500, 3);
    }
}
