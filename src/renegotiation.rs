use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::installment::Installment;
use crate::latefee::LateFeePolicy;
use crate::types::PaymentFrequency;

/// terms for the consolidated loan produced by a renegotiation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenegotiationTerms {
    pub interest_rate: Rate,
    pub frequency: PaymentFrequency,
    pub installment_count: u32,
    pub start_date: NaiveDate,
    pub late_fee: LateFeePolicy,
}

/// aggregate outstanding balance over a loan's installments
///
/// The renegotiated principal is exactly this figure, never the original
/// capital: sum of amount - paid_amount over every unsettled installment.
pub fn outstanding_balance<'a, I>(installments: I) -> Money
where
    I: IntoIterator<Item = &'a Installment>,
{
    installments
        .into_iter()
        .filter(|i| !i.is_settled())
        .map(|i| i.remaining())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn installment(amount: i64, paid: i64) -> Installment {
        Installment {
            id: Uuid::new_v4(),
            loan_id: Uuid::new_v4(),
            number: 1,
            due_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            amount: Money::from_major(amount),
            capital_amount: Money::from_major(amount),
            interest_amount: Money::ZERO,
            paid_amount: Money::from_major(paid),
            interest_paid: Money::ZERO,
            payment_ids: Vec::new(),
        }
    }

    #[test]
    fn test_outstanding_balance_skips_settled() {
        let installments = vec![
            installment(110, 110), // settled
            installment(110, 40),
            installment(110, 0),
        ];
        assert_eq!(outstanding_balance(&installments), Money::from_major(180));
    }

    #[test]
    fn test_outstanding_balance_empty() {
        let none: Vec<Installment> = Vec::new();
        assert_eq!(outstanding_balance(&none), Money::ZERO);
    }
}
