use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::decimal::{Money, Rate};
use crate::types::LoanStatus;

#[derive(Error, Debug)]
pub enum LoanError {
    #[error("invalid schedule input: {message}")]
    InvalidScheduleInput {
        message: String,
    },

    #[error("invalid payment amount: {amount}")]
    InvalidPaymentAmount {
        amount: Money,
    },

    #[error("installment already settled: paid {paid_amount} of {amount}")]
    AlreadySettled {
        paid_amount: Money,
        amount: Money,
    },

    #[error("overpayment rejected: remaining balance {remaining}, requested {requested}")]
    OverpaymentRejected {
        remaining: Money,
        requested: Money,
    },

    #[error("interest cap exceeded: unpaid interest {remaining_interest}, requested {requested}")]
    InterestCapExceeded {
        remaining_interest: Money,
        requested: Money,
    },

    #[error("loan closed to payments: status is {status:?}")]
    LoanClosed {
        status: LoanStatus,
    },

    #[error("duplicate payment reference: {reference}")]
    DuplicatePayment {
        reference: Uuid,
    },

    #[error("renegotiation error: {message}")]
    RenegotiationError {
        message: String,
    },

    #[error("invalid interest rate: {rate}")]
    InvalidInterestRate {
        rate: Rate,
    },

    #[error("invalid date: {date}")]
    InvalidDate {
        date: NaiveDate,
    },

    #[error("client not found: {id}")]
    ClientNotFound {
        id: Uuid,
    },

    #[error("loan not found: {id}")]
    LoanNotFound {
        id: Uuid,
    },

    #[error("installment not found: {id}")]
    InstallmentNotFound {
        id: Uuid,
    },
}

pub type Result<T> = std::result::Result<T, LoanError>;
