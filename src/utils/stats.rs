//! Status counters over flattened participants.

use serde::{Deserialize, Serialize};

use crate::models::Participant;

/// Registration counters for a set of participants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantStatistics {
    pub total_registrations: usize,
    pub accepted: usize,
    pub hidden: usize,
    /// `hidden / accepted * 100` with two decimals and a `%` suffix
    pub hidden_percentage: String,
    pub pending: usize,
    pub rejected: usize,
}

/// Count participants per status.
///
/// A participant is hidden when its order carries the hidden flag or has the
/// `Hidden` status. With no accepted participants the percentage is `0.00%`.
pub fn participant_statistics(participants: &[Participant]) -> ParticipantStatistics {
    let with_status = |status: &str| participants.iter().filter(|p| p.has_status(status)).count();

    let accepted = with_status("Accepted");
    let pending = with_status("Pending");
    let rejected = with_status("Rejected");
    let hidden = participants.iter().filter(|p| p.is_hidden()).count();

    ParticipantStatistics {
        total_registrations: participants.len(),
        accepted,
        hidden,
        hidden_percentage: hidden_percentage(hidden, accepted),
        pending,
        rejected,
    }
}

/// Hidden registrations relative to accepted ones, e.g. `"50.00%"`.
///
/// Rounds the exact value of the ratio to two decimals with ties going up,
/// so `1/32` reads `3.13%` rather than the half-to-even `3.12%`.
pub fn hidden_percentage(hidden: usize, accepted: usize) -> String {
    if accepted == 0 {
        return "0.00%".to_string();
    }

    let percent = hidden as f64 / accepted as f64 * 100.0;
    let exact = format!("{:.40}", percent);
    let (whole, fraction) = exact.split_once('.').unwrap_or((exact.as_str(), ""));
    let fraction = fraction.as_bytes();
    let digit = |i: usize| fraction.get(i).map_or(0, |d| u64::from(d.saturating_sub(b'0')));

    let mut cents = whole.parse::<u64>().unwrap_or(0) * 100 + digit(0) * 10 + digit(1);
    if digit(2) >= 5 {
        cents += 1;
    }
    format!("{}.{:02}%", cents / 100, cents % 100)
}
