use rust_decimal::Decimal;

use crate::decimal::{Money, Rate};
use crate::installment::Installment;
use chrono::NaiveDate;

/// late-fee terms carried by a loan
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LateFeePolicy {
    pub enabled: bool,
    /// percentage of the outstanding balance per day late (e.g., 1 for 1%/day)
    pub daily_rate: Rate,
}

impl LateFeePolicy {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            daily_rate: Rate::ZERO,
        }
    }

    pub fn daily(rate: Rate) -> Self {
        Self {
            enabled: true,
            daily_rate: rate,
        }
    }
}

/// computed late fee for one installment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LateFeeAssessment {
    pub fee_amount: Money,
    pub days_late: u32,
    pub outstanding_base: Money,
}

/// derives late fees for overdue installments
///
/// The fee is a reporting figure only: it is never folded into paid_amount
/// or the schedule, so the sum-equals-total invariant stays intact.
pub struct LateFeeEngine {
    policy: LateFeePolicy,
}

impl LateFeeEngine {
    pub fn new(policy: LateFeePolicy) -> Self {
        Self { policy }
    }

    /// fee = outstanding * daily_rate% * days_late
    pub fn assess(&self, installment: &Installment, today: NaiveDate) -> LateFeeAssessment {
        let days_late = installment.days_late(today);
        let outstanding = installment.remaining();

        if !self.policy.enabled || days_late == 0 || outstanding.is_zero() {
            return LateFeeAssessment {
                fee_amount: Money::ZERO,
                days_late,
                outstanding_base: outstanding,
            };
        }

        let fee = self.policy.daily_rate.of(outstanding) * Decimal::from(days_late);

        LateFeeAssessment {
            fee_amount: fee,
            days_late,
            outstanding_base: outstanding,
        }
    }
}
