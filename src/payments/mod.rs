pub mod allocator;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::types::{InstallmentId, PaymentId, PaymentKind, PaymentMethod};

pub use allocator::{AllocationOutcome, PaymentAllocator};

/// a collection event submitted by the caller
///
/// `reference` is the caller-supplied idempotency key; retrying a submission
/// with the same reference is detected and rejected rather than double-applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub reference: Uuid,
    pub amount: Money,
    pub kind: PaymentKind,
    pub method: PaymentMethod,
    pub date: NaiveDate,
}

impl PaymentRequest {
    pub fn new(amount: Money, kind: PaymentKind, method: PaymentMethod, date: NaiveDate) -> Self {
        Self {
            reference: Uuid::new_v4(),
            amount,
            kind,
            method,
            date,
        }
    }
}

/// immutable, append-only record of an applied payment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: PaymentId,
    pub installment_id: InstallmentId,
    pub reference: Uuid,
    pub amount: Money,
    pub kind: PaymentKind,
    pub method: PaymentMethod,
    pub date: NaiveDate,
}
