//! Diary entry rewards.
//!
//! A newly created diary entry grants XP proportional to its length and
//! lottery tickets at a slower rate, both capped per entry. The function is
//! invoked exactly once per created entry, never for edits, which the
//! orchestrator enforces; recomputing on edit would let a user farm rewards.

/// XP granted per character of diary text.
pub const XP_PER_CHAR: u32 = 2;

/// XP cap per diary entry.
pub const MAX_XP_PER_ENTRY: u32 = 600;

/// Characters required per ticket.
pub const CHARS_PER_TICKET: u32 = 100;

/// Ticket cap per diary entry.
pub const MAX_TICKETS_PER_ENTRY: u32 = 5;

/// XP and ticket grant for one diary entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reward {
    pub xp: u32,
    pub tickets: u32,
}

impl Reward {
    /// True if this reward grants nothing.
    pub fn is_empty(&self) -> bool {
        self.xp == 0 && self.tickets == 0
    }
}

/// Compute the reward for a diary entry of `total_chars` characters.
///
/// `total_chars` is the summed length of the entry's free-text lines, already
/// trimmed and validated by the caller.
pub fn compute_reward(total_chars: u32) -> Reward {
    Reward {
        xp: total_chars.saturating_mul(XP_PER_CHAR).min(MAX_XP_PER_ENTRY),
        tickets: (total_chars / CHARS_PER_TICKET).min(MAX_TICKETS_PER_ENTRY),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_entry_grants_nothing() {
        let reward = compute_reward(0);
        assert_eq!(reward, Reward { xp: 0, tickets: 0 });
        assert!(reward.is_empty());
    }

    #[test]
    fn short_entry_grants_xp_but_no_tickets() {
        assert_eq!(compute_reward(99), Reward { xp: 198, tickets: 0 });
    }

    #[test]
    fn xp_cap_and_ticket_rate() {
        // 300 chars hits the XP cap exactly while tickets are still linear
        assert_eq!(compute_reward(300), Reward { xp: 600, tickets: 3 });
    }

    #[test]
    fn both_caps_apply_to_long_entries() {
        assert_eq!(compute_reward(1000), Reward { xp: 600, tickets: 5 });
        assert_eq!(compute_reward(u32::MAX), Reward { xp: 600, tickets: 5 });
    }
}
