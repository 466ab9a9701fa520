use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// unique identifier for a client
pub type ClientId = Uuid;

/// unique identifier for a loan
pub type LoanId = Uuid;

/// unique identifier for an installment
pub type InstallmentId = Uuid;

/// unique identifier for a payment record
pub type PaymentId = Uuid;

/// how often installments fall due
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentFrequency {
    /// one installment per chargeable day (Mon-Sat, Sundays skipped)
    Daily,
    /// one installment every 7 days
    Weekly,
    /// one installment per calendar month, day-of-month clamped
    Monthly,
}

/// loan lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanStatus {
    /// accepting payments
    Active,
    /// every installment settled
    Paid,
    /// consolidated into a new loan, frozen
    Renegotiated,
}

/// installment lifecycle status, always derived from
/// (paid_amount, amount, due_date, today) and never stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstallmentStatus {
    /// nothing paid, not yet due
    Pending,
    /// partially paid, not yet due
    Partial,
    /// unpaid balance past due date (overrides Partial)
    Late,
    /// paid in full
    Paid,
}

/// how a collection event is meant to apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentKind {
    /// settle the remaining balance, amount computed by the allocator
    Full,
    /// arbitrary amount against the remaining balance
    Partial,
    /// amount against the interest portion only, capped at unpaid interest
    Interest,
}

/// collection channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    Pix,
    Cash,
}

/// client registry status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClientStatus {
    Active,
    Blocked,
    Pending,
}

/// delinquency risk band, driven by days late of the oldest unpaid installment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    /// less than 7 days late (includes not yet due)
    Normal,
    /// 7 to 29 days late
    Warning,
    /// 30 days late or more
    Critical,
}
