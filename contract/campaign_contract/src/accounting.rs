use crate::storage_types::{CampaignError, CampaignLedger, CampaignState, PERCENT, SECONDS_PER_DAY};

/// Absolute deadline for a campaign started at `now` lasting `days`.
pub fn expiry_from(now: u64, days: u32) -> Result<u64, CampaignError> {
    (days as u64)
        .checked_mul(SECONDS_PER_DAY)
        .and_then(|length| now.checked_add(length))
        .ok_or(CampaignError::ArithmeticOverflow)
}

/// `part * 100 / whole`, floored. Zero when `whole` is not positive.
pub fn percent_of(part: i128, whole: i128) -> Result<i128, CampaignError> {
    if whole <= 0 {
        return Ok(0);
    }
    part.checked_mul(PERCENT)
        .map(|scaled| scaled / whole)
        .ok_or(CampaignError::ArithmeticOverflow)
}

/// Equal share of the bonus pool for each early pledger.
///
/// Floor division: the remainder `refund_bonus % early_pledgers` is never paid
/// to a pledger and stays reclaimable by the owner.
pub fn bonus_share(refund_bonus: i128, early_pledgers: u32) -> i128 {
    if early_pledgers == 0 {
        return 0;
    }
    refund_bonus / early_pledgers as i128
}

/// Principal plus, for early pledgers, their bonus share.
pub fn refund_payout(
    pledged: i128,
    is_early: bool,
    refund_bonus: i128,
    early_pledgers: u32,
) -> Result<(i128, i128), CampaignError> {
    let bonus = if is_early {
        bonus_share(refund_bonus, early_pledgers)
    } else {
        0
    };
    let payout = pledged
        .checked_add(bonus)
        .ok_or(CampaignError::ArithmeticOverflow)?;
    Ok((payout, bonus))
}

pub fn goal_met(ledger: &CampaignLedger, target_amount: i128) -> bool {
    ledger.total_pledged >= target_amount
}

pub fn refunds_completed(ledger: &CampaignLedger, pledger_count: u32) -> bool {
    ledger.state == CampaignState::RefundsEnabled && ledger.refunds_paid == pledger_count
}

/// Bonus value no longer owed to any pledger.
///
/// Fails while the campaign is running or refunds may still claim a share.
pub fn reclaimable_bonus(
    ledger: &CampaignLedger,
    refund_bonus: i128,
    pledger_count: u32,
) -> Result<i128, CampaignError> {
    match ledger.state {
        CampaignState::Active => return Err(CampaignError::CampaignNotActive),
        CampaignState::RefundsEnabled if !refunds_completed(ledger, pledger_count) => {
            return Err(CampaignError::RefundsNotCompleted)
        }
        _ => {}
    }
    refund_bonus
        .checked_sub(ledger.bonus_paid)
        .and_then(|left| left.checked_sub(ledger.bonus_reclaimed))
        .ok_or(CampaignError::ArithmeticOverflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_adds_whole_days() {
        assert_eq!(expiry_from(1_000, 20), Ok(1_000 + 20 * 86_400));
        assert_eq!(expiry_from(1_000, 0), Ok(1_000));
        assert_eq!(
            expiry_from(u64::MAX - 10, 1),
            Err(CampaignError::ArithmeticOverflow)
        );
    }

    #[test]
    fn percent_is_floored() {
        assert_eq!(percent_of(5_400, 10_000), Ok(54));
        assert_eq!(percent_of(1, 3), Ok(33));
        assert_eq!(percent_of(20_000, 10_000), Ok(200));
        assert_eq!(percent_of(10, 0), Ok(0));
    }

    #[test]
    fn bonus_split_leaves_dust() {
        assert_eq!(bonus_share(2_000, 1), 2_000);
        assert_eq!(bonus_share(2_000, 3), 666);
        assert_eq!(bonus_share(2_000, 0), 0);
    }

    #[test]
    fn only_early_pledgers_get_bonus() {
        assert_eq!(refund_payout(1_000, true, 2_000, 2), Ok((2_000, 1_000)));
        assert_eq!(refund_payout(1_000, false, 2_000, 2), Ok((1_000, 0)));
    }

    #[test]
    fn bonus_residue_waits_for_all_refunds() {
        let mut ledger = CampaignLedger::new();
        assert_eq!(
            reclaimable_bonus(&ledger, 2_000, 0),
            Err(CampaignError::CampaignNotActive)
        );

        ledger.state = CampaignState::RefundsEnabled;
        ledger.bonus_paid = 1_998;
        ledger.refunds_paid = 2;
        assert_eq!(
            reclaimable_bonus(&ledger, 2_000, 3),
            Err(CampaignError::RefundsNotCompleted)
        );

        ledger.refunds_paid = 3;
        assert!(refunds_completed(&ledger, 3));
        assert_eq!(reclaimable_bonus(&ledger, 2_000, 3), Ok(2));

        ledger.bonus_reclaimed = 2;
        assert_eq!(reclaimable_bonus(&ledger, 2_000, 3), Ok(0));
    }

    #[test]
    fn fresh_ledger_is_active_and_empty() {
        let ledger = CampaignLedger::default();
        assert_eq!(ledger, CampaignLedger::new());
        assert_eq!(ledger.state, CampaignState::Active);
        assert_eq!(ledger.total_pledged, 0);
        assert!(!goal_met(&ledger, 1));
    }

    #[test]
    fn closed_campaign_returns_whole_bonus() {
        let mut ledger = CampaignLedger::new();
        ledger.state = CampaignState::Closed;
        ledger.total_pledged = 10_000;
        assert!(goal_met(&ledger, 10_000));
        assert!(!refunds_completed(&ledger, 1));
        assert_eq!(reclaimable_bonus(&ledger, 2_000, 1), Ok(2_000));
    }
}
