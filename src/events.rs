use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::types::{ClientId, InstallmentId, LoanId, PaymentMethod};

/// all events emitted by loan-book operations; the audit trail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    // lifecycle events
    LoanOriginated {
        loan_id: LoanId,
        client_id: ClientId,
        principal: Money,
        interest_rate: Rate,
        total_amount: Money,
        installment_count: u32,
        start_date: NaiveDate,
    },
    LoanSettled {
        loan_id: LoanId,
        settlement_date: NaiveDate,
    },
    LoanRenegotiated {
        old_loan_id: LoanId,
        new_loan_id: LoanId,
        outstanding_rolled: Money,
        date: NaiveDate,
    },

    // payment events
    PaymentReceived {
        loan_id: LoanId,
        installment_id: InstallmentId,
        amount: Money,
        interest_portion: Money,
        method: PaymentMethod,
        date: NaiveDate,
    },
    InstallmentSettled {
        loan_id: LoanId,
        installment_id: InstallmentId,
        number: u32,
        date: NaiveDate,
    },

    // delinquency events
    LateFeeAssessed {
        loan_id: LoanId,
        installment_id: InstallmentId,
        fee_amount: Money,
        days_late: u32,
        date: NaiveDate,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
