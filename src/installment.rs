use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::schedule::ScheduledInstallment;
use crate::types::{InstallmentId, InstallmentStatus, LoanId, PaymentId};

/// one scheduled repayment unit of a loan
///
/// `paid_amount` is the sum of the payments recorded against it; status is
/// derived from (paid_amount, amount, due_date, today) on every read and is
/// deliberately not a stored field, so it can never go stale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installment {
    pub id: InstallmentId,
    pub loan_id: LoanId,
    pub number: u32,
    pub due_date: NaiveDate,
    pub amount: Money,
    pub capital_amount: Money,
    pub interest_amount: Money,
    pub paid_amount: Money,
    pub interest_paid: Money,
    pub payment_ids: Vec<PaymentId>,
}

impl Installment {
    /// materialize a schedule entry into a ledger installment
    pub fn from_scheduled(loan_id: LoanId, scheduled: &ScheduledInstallment) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            loan_id,
            number: scheduled.number,
            due_date: scheduled.due_date,
            amount: scheduled.amount,
            capital_amount: scheduled.capital_amount,
            interest_amount: scheduled.interest_amount,
            paid_amount: Money::ZERO,
            interest_paid: Money::ZERO,
            payment_ids: Vec::new(),
        }
    }

    /// derived lifecycle status
    pub fn status(&self, today: NaiveDate) -> InstallmentStatus {
        if self.paid_amount >= self.amount {
            InstallmentStatus::Paid
        } else if self.due_date < today {
            // any unpaid balance past due is Late, partial or not
            InstallmentStatus::Late
        } else if self.paid_amount.is_positive() {
            InstallmentStatus::Partial
        } else {
            InstallmentStatus::Pending
        }
    }

    pub fn is_settled(&self) -> bool {
        self.paid_amount >= self.amount
    }

    /// unpaid balance
    pub fn remaining(&self) -> Money {
        (self.amount - self.paid_amount).max(Money::ZERO)
    }

    /// interest portion not yet collected through INTEREST payments
    pub fn remaining_interest(&self) -> Money {
        (self.interest_amount - self.interest_paid).max(Money::ZERO)
    }

    /// whole days past due, clamped to zero
    pub fn days_late(&self, today: NaiveDate) -> u32 {
        (today - self.due_date).num_days().max(0) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn installment(amount: i64, paid: &str, due: NaiveDate) -> Installment {
        Installment {
            id: Uuid::new_v4(),
            loan_id: Uuid::new_v4(),
            number: 1,
            due_date: due,
            amount: Money::from_major(amount),
            capital_amount: Money::from_major(amount),
            interest_amount: Money::ZERO,
            paid_amount: Money::from_str_exact(paid).unwrap(),
            interest_paid: Money::ZERO,
            payment_ids: Vec::new(),
        }
    }

    #[test]
    fn test_status_pending_until_due() {
        let inst = installment(100, "0", date(2024, 6, 10));
        assert_eq!(inst.status(date(2024, 6, 9)), InstallmentStatus::Pending);
        // due today is still pending, not late
        assert_eq!(inst.status(date(2024, 6, 10)), InstallmentStatus::Pending);
    }

    #[test]
    fn test_status_partial_before_due() {
        let inst = installment(100, "40", date(2024, 6, 10));
        assert_eq!(inst.status(date(2024, 6, 10)), InstallmentStatus::Partial);
    }

    #[test]
    fn test_late_overrides_partial() {
        // spec §8 property 6: 100.00 due yesterday, 40.00 paid, still Late
        let inst = installment(100, "40", date(2024, 6, 9));
        let today = date(2024, 6, 10);
        assert_eq!(inst.status(today), InstallmentStatus::Late);
        assert_eq!(inst.days_late(today), 1);
    }

    #[test]
    fn test_status_late_when_unpaid_past_due() {
        let inst = installment(100, "0", date(2024, 6, 1));
        assert_eq!(inst.status(date(2024, 6, 10)), InstallmentStatus::Late);
        assert_eq!(inst.days_late(date(2024, 6, 10)), 9);
    }

    #[test]
    fn test_status_paid_regardless_of_date() {
        let inst = installment(100, "100", date(2024, 6, 1));
        assert_eq!(inst.status(date(2024, 6, 10)), InstallmentStatus::Paid);
        assert!(inst.is_settled());
        assert_eq!(inst.remaining(), Money::ZERO);
    }

    #[test]
    fn test_status_is_deterministic() {
        let inst = installment(100, "40", date(2024, 6, 9));
        let today = date(2024, 6, 10);
        assert_eq!(inst.status(today), inst.status(today));
    }

    #[test]
    fn test_days_late_clamped_to_zero() {
        let inst = installment(100, "0", date(2024, 6, 10));
        assert_eq!(inst.days_late(date(2024, 6, 1)), 0);
    }
}
