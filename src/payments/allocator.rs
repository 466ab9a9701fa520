use uuid::Uuid;

use crate::decimal::Money;
use crate::errors::{LoanError, Result};
use crate::installment::Installment;
use crate::types::PaymentKind;

use super::{PaymentRecord, PaymentRequest};

/// result of a successful allocation, applied to the installment by the book
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationOutcome {
    pub record: PaymentRecord,
    /// portion that counts against the installment's interest share
    pub interest_applied: Money,
    /// true when this payment settles the installment
    pub settles: bool,
}

/// decides how a payment submission applies against an installment
///
/// Validation happens entirely before any mutation; the allocator reads the
/// installment and produces an outcome, it never writes. The caller commits
/// the record and the paid_amount update together or not at all.
pub struct PaymentAllocator;

impl PaymentAllocator {
    /// allocate `request` against `installment`
    pub fn allocate(installment: &Installment, request: &PaymentRequest) -> Result<AllocationOutcome> {
        if installment.is_settled() {
            return Err(LoanError::AlreadySettled {
                paid_amount: installment.paid_amount,
                amount: installment.amount,
            });
        }

        let remaining = installment.remaining();

        let (amount, interest_applied) = match request.kind {
            // settlement amount is computed here, never trusted from the caller
            PaymentKind::Full => (remaining, installment.remaining_interest()),
            PaymentKind::Partial => {
                if !request.amount.is_positive() {
                    return Err(LoanError::InvalidPaymentAmount {
                        amount: request.amount,
                    });
                }
                if request.amount > remaining {
                    return Err(LoanError::OverpaymentRejected {
                        remaining,
                        requested: request.amount,
                    });
                }
                (request.amount, Money::ZERO)
            }
            PaymentKind::Interest => {
                if !request.amount.is_positive() {
                    return Err(LoanError::InvalidPaymentAmount {
                        amount: request.amount,
                    });
                }
                let remaining_interest = installment.remaining_interest();
                if request.amount > remaining_interest {
                    return Err(LoanError::InterestCapExceeded {
                        remaining_interest,
                        requested: request.amount,
                    });
                }
                if request.amount > remaining {
                    return Err(LoanError::OverpaymentRejected {
                        remaining,
                        requested: request.amount,
                    });
                }
                (request.amount, request.amount)
            }
        };

        let settles = installment.paid_amount + amount >= installment.amount;

        Ok(AllocationOutcome {
            record: PaymentRecord {
                id: Uuid::new_v4(),
                installment_id: installment.id,
                reference: request.reference,
                amount,
                kind: request.kind,
                method: request.method,
                date: request.date,
            },
            interest_applied,
            settles,
        })
    }
}
