//! Revenue allocation over an active split.
//!
//! All arithmetic happens in integer cents. Fractional shares are settled by
//! largest remainder so that every allocated cent is accounted for: the sum of
//! allocations plus the unallocated remainder always equals the input amount.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::splits::{Split, SplitStatus, PERCENTAGE_TOLERANCE};
use crate::types::EntityId;

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

/// One participant's share of an allocated amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub participant_id: EntityId,
    pub amount_cents: i64,
    pub percentage: f64,
}

/// The outcome of distributing a revenue amount over a split.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevenueAllocation {
    pub split_id: EntityId,
    pub total_cents: i64,
    pub allocations: Vec<Allocation>,
    /// Cents held back by per-participant caps, pending manual handling.
    pub unallocated_cents: i64,
    /// Cents by which per-participant minimums could not be met from the
    /// amount and the held-back pool.
    pub shortfall_cents: i64,
}

// ---------------------------------------------------------------------------
// Allocation
// ---------------------------------------------------------------------------

/// Distribute `amount_cents` over the entries of an active split.
///
/// Shares are proportional to percentage; leftover cents from rounding go to
/// the largest fractional remainders, with higher priority breaking ties.
/// Per-entry maximum caps hold cents back into `unallocated_cents`; that pool
/// then tops up entries still below their minimum (higher priority served
/// first), and any minimum that still cannot be met is reported as
/// `shortfall_cents` rather than failing the allocation.
pub fn allocate_revenue(split: &Split, amount_cents: i64) -> Result<RevenueAllocation, CoreError> {
    if split.status != SplitStatus::Active {
        return Err(CoreError::Validation(format!(
            "Cannot allocate revenue against a split in status '{}'",
            split.status.as_str()
        )));
    }
    if amount_cents < 0 {
        return Err(CoreError::Validation(format!(
            "Cannot allocate a negative amount ({amount_cents} cents)"
        )));
    }
    if split.entries.is_empty() {
        return Err(CoreError::Validation(
            "Cannot allocate revenue against a split with no participants".to_string(),
        ));
    }
    let total_pct: f64 = split.entries.iter().map(|e| e.percentage).sum();
    if (total_pct - 100.0).abs() > PERCENTAGE_TOLERANCE {
        return Err(CoreError::Validation(format!(
            "Split percentages sum to {total_pct}, refusing to allocate"
        )));
    }

    // Floor every share, then hand the leftover cents out by largest
    // fractional remainder. Ties go to the higher-priority entry.
    let mut shares: Vec<(usize, i64, f64)> = split
        .entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let raw = amount_cents as f64 * entry.percentage / 100.0;
            let base = raw.floor() as i64;
            (index, base, raw - base as f64)
        })
        .collect();

    let allocated: i64 = shares.iter().map(|(_, base, _)| base).sum();
    let mut leftover = amount_cents - allocated;

    let mut order: Vec<usize> = (0..shares.len()).collect();
    order.sort_by(|&a, &b| {
        shares[b]
            .2
            .total_cmp(&shares[a].2)
            .then_with(|| {
                let pa = split.entries[a].priority.unwrap_or(0);
                let pb = split.entries[b].priority.unwrap_or(0);
                pb.cmp(&pa)
            })
            .then(a.cmp(&b))
    });
    let mut cursor = 0;
    while leftover > 0 {
        shares[order[cursor % order.len()]].1 += 1;
        leftover -= 1;
        cursor += 1;
    }

    // Apply per-entry caps after rounding so the cap binds on the final cent
    // amount, not the fractional share.
    let mut unallocated = 0;
    let mut allocations = Vec::with_capacity(shares.len());
    for (index, mut cents, _) in shares {
        let entry = &split.entries[index];
        if let Some(max) = entry.max_amount_cents {
            if cents > max {
                unallocated += cents - max;
                cents = max;
            }
        }
        allocations.push(Allocation {
            participant_id: entry.participant_id,
            amount_cents: cents,
            percentage: entry.percentage,
        });
    }

    // Minimum floors are satisfied from the held-back pool, higher priority
    // first. A floor never lifts an entry past its own cap (min <= max is
    // validated at split creation).
    let mut shortfall = 0;
    let mut floor_order: Vec<usize> = (0..allocations.len()).collect();
    floor_order.sort_by(|&a, &b| {
        let pa = split.entries[a].priority.unwrap_or(0);
        let pb = split.entries[b].priority.unwrap_or(0);
        pb.cmp(&pa).then(a.cmp(&b))
    });
    for index in floor_order {
        if let Some(min) = split.entries[index].min_amount_cents {
            let deficit = min - allocations[index].amount_cents;
            if deficit > 0 {
                let topped_up = deficit.min(unallocated);
                allocations[index].amount_cents += topped_up;
                unallocated -= topped_up;
                shortfall += deficit - topped_up;
            }
        }
    }

    tracing::debug!(
        split_id = %split.id,
        amount_cents,
        unallocated,
        shortfall,
        "allocated revenue over split"
    );

    Ok(RevenueAllocation {
        split_id: split.id,
        total_cents: amount_cents,
        allocations,
        unallocated_cents: unallocated,
        shortfall_cents: shortfall,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::splits::{ParticipantRole, SplitEntry, SplitType};
    use uuid::Uuid;

    fn entry(percentage: f64, role: ParticipantRole) -> SplitEntry {
        SplitEntry {
            participant_id: Uuid::new_v4(),
            percentage,
            role,
            priority: None,
            min_amount_cents: None,
            max_amount_cents: None,
        }
    }

    fn active_split(entries: Vec<SplitEntry>) -> Split {
        Split {
            id: Uuid::new_v4(),
            release_id: Some(Uuid::new_v4()),
            track_id: None,
            split_type: SplitType::MasterRecording,
            entries,
            territories: vec!["WW".to_string()],
            status: SplitStatus::Active,
            effective_date: None,
            expiry_date: None,
            exclusive: false,
        }
    }

    #[test]
    fn even_amounts_divide_exactly() {
        let split = active_split(vec![
            entry(60.0, ParticipantRole::Artist),
            entry(40.0, ParticipantRole::Label),
        ]);
        let result = allocate_revenue(&split, 10_000).unwrap();
        assert_eq!(result.allocations[0].amount_cents, 6_000);
        assert_eq!(result.allocations[1].amount_cents, 4_000);
        assert_eq!(result.unallocated_cents, 0);
    }

    #[test]
    fn allocation_conserves_the_total() {
        // Three-way thirds never divide evenly; the remainder cents must
        // still land somewhere.
        let split = active_split(vec![
            entry(33.34, ParticipantRole::Artist),
            entry(33.33, ParticipantRole::Songwriter),
            entry(33.33, ParticipantRole::Producer),
        ]);
        for amount in [0, 1, 2, 99, 100, 101, 9_999, 123_457] {
            let result = allocate_revenue(&split, amount).unwrap();
            let allocated: i64 = result.allocations.iter().map(|a| a.amount_cents).sum();
            assert_eq!(
                allocated + result.unallocated_cents,
                amount,
                "amount {amount} not conserved"
            );
        }
    }

    #[test]
    fn remainder_cent_goes_to_largest_fractional_share() {
        let split = active_split(vec![
            entry(50.0, ParticipantRole::Artist),
            entry(49.5, ParticipantRole::Producer),
            entry(0.5, ParticipantRole::Label),
        ]);
        // 101 cents: raw shares 50.5 / 49.995 / 0.505. Floors 50/49/0 leave
        // two cents; fractions 0.995 and 0.505 win them.
        let result = allocate_revenue(&split, 101).unwrap();
        assert_eq!(result.allocations[0].amount_cents, 50);
        assert_eq!(result.allocations[1].amount_cents, 50);
        assert_eq!(result.allocations[2].amount_cents, 1);
    }

    #[test]
    fn priority_breaks_remainder_ties() {
        let mut first = entry(50.0, ParticipantRole::Artist);
        first.priority = Some(1);
        let mut second = entry(50.0, ParticipantRole::Label);
        second.priority = Some(10);
        let split = active_split(vec![first, second]);

        // One cent, equal fractional remainders; the higher priority wins it.
        let result = allocate_revenue(&split, 1).unwrap();
        assert_eq!(result.allocations[0].amount_cents, 0);
        assert_eq!(result.allocations[1].amount_cents, 1);
    }

    #[test]
    fn max_cap_holds_back_the_excess() {
        let mut capped = entry(60.0, ParticipantRole::Artist);
        capped.max_amount_cents = Some(1_000);
        let split = active_split(vec![capped, entry(40.0, ParticipantRole::Label)]);

        let result = allocate_revenue(&split, 10_000).unwrap();
        assert_eq!(result.allocations[0].amount_cents, 1_000);
        assert_eq!(result.allocations[1].amount_cents, 4_000);
        assert_eq!(result.unallocated_cents, 5_000);
        let allocated: i64 = result.allocations.iter().map(|a| a.amount_cents).sum();
        assert_eq!(allocated + result.unallocated_cents, 10_000);
    }

    #[test]
    fn min_floor_is_topped_up_from_capped_excess() {
        let mut capped = entry(60.0, ParticipantRole::Artist);
        capped.max_amount_cents = Some(1_000);
        let mut floored = entry(10.0, ParticipantRole::Songwriter);
        floored.min_amount_cents = Some(2_000);
        let split = active_split(vec![capped, entry(30.0, ParticipantRole::Label), floored]);

        let result = allocate_revenue(&split, 10_000).unwrap();
        assert_eq!(result.allocations[0].amount_cents, 1_000);
        assert_eq!(result.allocations[1].amount_cents, 3_000);
        assert_eq!(result.allocations[2].amount_cents, 2_000);
        assert_eq!(result.unallocated_cents, 4_000);
        assert_eq!(result.shortfall_cents, 0);
        let allocated: i64 = result.allocations.iter().map(|a| a.amount_cents).sum();
        assert_eq!(allocated + result.unallocated_cents, 10_000);
    }

    #[test]
    fn unmet_minimum_is_reported_as_shortfall() {
        // No cap frees any cents, so the 10% participant stays at their
        // proportional share and the unmet floor is surfaced.
        let mut floored = entry(10.0, ParticipantRole::Songwriter);
        floored.min_amount_cents = Some(5_000);
        let split = active_split(vec![entry(90.0, ParticipantRole::Artist), floored]);

        let result = allocate_revenue(&split, 10_000).unwrap();
        assert_eq!(result.allocations[1].amount_cents, 1_000);
        assert_eq!(result.unallocated_cents, 0);
        assert_eq!(result.shortfall_cents, 4_000);
        let allocated: i64 = result.allocations.iter().map(|a| a.amount_cents).sum();
        assert_eq!(allocated, 10_000);
    }

    #[test]
    fn scarce_pool_serves_higher_priority_minimum_first() {
        let mut capped = entry(80.0, ParticipantRole::Artist);
        capped.max_amount_cents = Some(7_000);
        let mut low = entry(10.0, ParticipantRole::Songwriter);
        low.min_amount_cents = Some(2_000);
        low.priority = Some(1);
        let mut high = entry(10.0, ParticipantRole::Producer);
        high.min_amount_cents = Some(2_000);
        high.priority = Some(10);
        let split = active_split(vec![capped, low, high]);

        // 1,000 cents freed by the cap; each floor needs 1,000 more.
        let result = allocate_revenue(&split, 10_000).unwrap();
        assert_eq!(result.allocations[2].amount_cents, 2_000);
        assert_eq!(result.allocations[1].amount_cents, 1_000);
        assert_eq!(result.unallocated_cents, 0);
        assert_eq!(result.shortfall_cents, 1_000);
    }

    #[test]
    fn inactive_split_is_rejected() {
        let mut split = active_split(vec![entry(100.0, ParticipantRole::Artist)]);
        split.status = SplitStatus::Draft;
        assert!(allocate_revenue(&split, 1_000).is_err());
    }

    #[test]
    fn negative_amount_is_rejected() {
        let split = active_split(vec![entry(100.0, ParticipantRole::Artist)]);
        assert!(allocate_revenue(&split, -1).is_err());
    }

    #[test]
    fn unbalanced_split_is_rejected() {
        let split = active_split(vec![entry(90.0, ParticipantRole::Artist)]);
        assert!(allocate_revenue(&split, 1_000).is_err());
    }

    #[test]
    fn zero_amount_allocates_zeros() {
        let split = active_split(vec![
            entry(60.0, ParticipantRole::Artist),
            entry(40.0, ParticipantRole::Label),
        ]);
        let result = allocate_revenue(&split, 0).unwrap();
        assert!(result.allocations.iter().all(|a| a.amount_cents == 0));
        assert_eq!(result.unallocated_cents, 0);
    }
}
