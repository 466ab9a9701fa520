use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::classifier::{classify, RiskSummary};
use crate::decimal::{Money, Rate};
use crate::errors::{LoanError, Result};
use crate::events::{Event, EventStore};
use crate::installment::Installment;
use crate::latefee::{LateFeeAssessment, LateFeeEngine, LateFeePolicy};
use crate::payments::{AllocationOutcome, PaymentAllocator, PaymentRecord, PaymentRequest};
use crate::renegotiation::{outstanding_balance, RenegotiationTerms};
use crate::schedule::generate_schedule;
use crate::types::{
    ClientId, ClientStatus, InstallmentId, LoanId, LoanStatus, PaymentFrequency,
};

/// client registry record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub phone: String,
    pub notes: String,
    pub score: i32,
    pub status: ClientStatus,
    pub registered_at: NaiveDate,
}

/// terms supplied by the caller when a loan is created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Money,
    pub interest_rate: Rate,
    pub frequency: PaymentFrequency,
    pub installment_count: u32,
    pub start_date: NaiveDate,
    pub late_fee: LateFeePolicy,
}

/// a loan contract; total_amount is fixed at creation and never recomputed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    pub id: LoanId,
    pub client_id: ClientId,
    pub principal: Money,
    pub interest_rate: Rate,
    pub frequency: PaymentFrequency,
    pub installment_count: u32,
    pub start_date: NaiveDate,
    pub total_amount: Money,
    pub late_fee: LateFeePolicy,
    pub status: LoanStatus,
}

impl Loan {
    pub fn can_accept_payment(&self) -> bool {
        self.status == LoanStatus::Active
    }
}

/// client-level money aggregates, derived on demand
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSummary {
    pub client_id: ClientId,
    pub total_loaned: Money,
    pub total_debt: Money,
    pub active_loans: u32,
}

/// one row of the daily collection route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionItem {
    pub installment_id: InstallmentId,
    pub loan_id: LoanId,
    pub client_id: ClientId,
    pub number: u32,
    pub due_date: NaiveDate,
    pub pending_value: Money,
    pub paid_amount: Money,
}

/// the loan book: clients, loans, installments, payment records and the
/// audit trail, with every operation committing all-or-nothing
///
/// Single writer per installment; duplicate payment submissions are caught
/// by the caller-supplied reference before anything mutates.
pub struct LoanBook {
    clients: HashMap<ClientId, Client>,
    loans: HashMap<LoanId, Loan>,
    installments: HashMap<InstallmentId, Installment>,
    payments: Vec<PaymentRecord>,
    seen_references: HashSet<Uuid>,
    pub events: EventStore,
}

impl Default for LoanBook {
    fn default() -> Self {
        Self::new()
    }
}

impl LoanBook {
    pub fn new() -> Self {
        Self {
            clients: HashMap::new(),
            loans: HashMap::new(),
            installments: HashMap::new(),
            payments: Vec::new(),
            seen_references: HashSet::new(),
            events: EventStore::new(),
        }
    }

    /// register a client, active immediately
    pub fn register_client(
        &mut self,
        name: impl Into<String>,
        phone: impl Into<String>,
        time_provider: &SafeTimeProvider,
    ) -> ClientId {
        let id = Uuid::new_v4();
        self.clients.insert(
            id,
            Client {
                id,
                name: name.into(),
                phone: phone.into(),
                notes: String::new(),
                score: 0,
                status: ClientStatus::Active,
                registered_at: time_provider.now().date_naive(),
            },
        );
        id
    }

    pub fn client(&self, id: ClientId) -> Result<&Client> {
        self.clients.get(&id).ok_or(LoanError::ClientNotFound { id })
    }

    pub fn loan(&self, id: LoanId) -> Result<&Loan> {
        self.loans.get(&id).ok_or(LoanError::LoanNotFound { id })
    }

    pub fn installment(&self, id: InstallmentId) -> Result<&Installment> {
        self.installments
            .get(&id)
            .ok_or(LoanError::InstallmentNotFound { id })
    }

    /// a loan's installments ordered by sequence number
    pub fn loan_installments(&self, loan_id: LoanId) -> Vec<&Installment> {
        let mut installments: Vec<&Installment> = self
            .installments
            .values()
            .filter(|i| i.loan_id == loan_id)
            .collect();
        installments.sort_by_key(|i| i.number);
        installments
    }

    pub fn payments(&self) -> &[PaymentRecord] {
        &self.payments
    }

    /// create a loan and its full installment schedule atomically
    pub fn originate_loan(&mut self, client_id: ClientId, terms: LoanTerms) -> Result<LoanId> {
        self.client(client_id)?;

        // schedule generation validates principal/rate/count before
        // anything is written
        let schedule = generate_schedule(
            terms.principal,
            terms.interest_rate,
            terms.frequency,
            terms.installment_count,
            terms.start_date,
        )?;

        let loan_id = Uuid::new_v4();
        let loan = Loan {
            id: loan_id,
            client_id,
            principal: terms.principal,
            interest_rate: terms.interest_rate,
            frequency: terms.frequency,
            installment_count: terms.installment_count,
            start_date: terms.start_date,
            total_amount: schedule.total_amount,
            late_fee: terms.late_fee,
            status: LoanStatus::Active,
        };

        for scheduled in &schedule.installments {
            let installment = Installment::from_scheduled(loan_id, scheduled);
            self.installments.insert(installment.id, installment);
        }
        self.loans.insert(loan_id, loan);

        self.events.emit(Event::LoanOriginated {
            loan_id,
            client_id,
            principal: terms.principal,
            interest_rate: terms.interest_rate,
            total_amount: schedule.total_amount,
            installment_count: terms.installment_count,
            start_date: terms.start_date,
        });

        Ok(loan_id)
    }

    /// apply a collection event against an installment
    ///
    /// All validation runs before any write: duplicate reference, loan
    /// closed, allocator preconditions. On success the payment record and
    /// the paid_amount update land together.
    pub fn apply_payment(
        &mut self,
        installment_id: InstallmentId,
        request: PaymentRequest,
    ) -> Result<PaymentRecord> {
        if self.seen_references.contains(&request.reference) {
            return Err(LoanError::DuplicatePayment {
                reference: request.reference,
            });
        }

        let installment = self
            .installments
            .get(&installment_id)
            .ok_or(LoanError::InstallmentNotFound { id: installment_id })?;
        let loan_id = installment.loan_id;

        let loan = self.loan(loan_id)?;
        if !loan.can_accept_payment() {
            return Err(LoanError::LoanClosed {
                status: loan.status,
            });
        }

        let AllocationOutcome {
            record,
            interest_applied,
            settles,
        } = PaymentAllocator::allocate(installment, &request)?;

        // commit
        let installment = self
            .installments
            .get_mut(&installment_id)
            .ok_or(LoanError::InstallmentNotFound { id: installment_id })?;
        installment.paid_amount += record.amount;
        installment.interest_paid += interest_applied;
        installment.payment_ids.push(record.id);
        self.seen_references.insert(request.reference);
        self.payments.push(record.clone());

        self.events.emit(Event::PaymentReceived {
            loan_id,
            installment_id,
            amount: record.amount,
            interest_portion: interest_applied,
            method: record.method,
            date: record.date,
        });

        if settles {
            let number = self.installments[&installment_id].number;
            self.events.emit(Event::InstallmentSettled {
                loan_id,
                installment_id,
                number,
                date: record.date,
            });
            self.settle_loan_if_complete(loan_id, record.date);
        }

        Ok(record)
    }

    /// flip the loan to Paid once every installment has settled
    fn settle_loan_if_complete(&mut self, loan_id: LoanId, date: NaiveDate) {
        let all_settled = self
            .installments
            .values()
            .filter(|i| i.loan_id == loan_id)
            .all(|i| i.is_settled());
        if !all_settled {
            return;
        }

        if let Some(loan) = self.loans.get_mut(&loan_id) {
            if loan.status == LoanStatus::Active {
                loan.status = LoanStatus::Paid;
                self.events.emit(Event::LoanSettled {
                    loan_id,
                    settlement_date: date,
                });
            }
        }
    }

    /// classify a client from the installments of their active loans
    pub fn classify_client(
        &self,
        client_id: ClientId,
        time_provider: &SafeTimeProvider,
    ) -> Result<RiskSummary> {
        self.client(client_id)?;
        let today = time_provider.now().date_naive();

        let installments: Vec<&Installment> = self
            .active_loan_installments(client_id)
            .collect();

        Ok(classify(&installments, today))
    }

    /// total loaned and current debt for a client
    pub fn client_summary(&self, client_id: ClientId) -> Result<ClientSummary> {
        self.client(client_id)?;

        let mut total_loaned = Money::ZERO;
        let mut active_loans = 0;
        for loan in self.loans.values().filter(|l| l.client_id == client_id) {
            total_loaned += loan.principal;
            if loan.status == LoanStatus::Active {
                active_loans += 1;
            }
        }

        let total_debt =
            outstanding_balance(self.active_loan_installments(client_id));

        Ok(ClientSummary {
            client_id,
            total_loaned,
            total_debt,
            active_loans,
        })
    }

    /// installments of active loans due on `date` with a pending balance
    pub fn daily_collections(&self, date: NaiveDate) -> Vec<CollectionItem> {
        let mut items: Vec<CollectionItem> = self
            .installments
            .values()
            .filter(|i| i.due_date == date && !i.is_settled())
            .filter_map(|i| {
                let loan = self.loans.get(&i.loan_id)?;
                if loan.status != LoanStatus::Active {
                    return None;
                }
                Some(CollectionItem {
                    installment_id: i.id,
                    loan_id: i.loan_id,
                    client_id: loan.client_id,
                    number: i.number,
                    due_date: i.due_date,
                    pending_value: i.remaining(),
                    paid_amount: i.paid_amount,
                })
            })
            .collect();
        items.sort_by_key(|item| (item.loan_id, item.number));
        items
    }

    /// assess late fees across every overdue installment of active loans,
    /// emitting an event per non-zero fee; derived figures only
    pub fn assess_late_fees(
        &mut self,
        time_provider: &SafeTimeProvider,
    ) -> Vec<(InstallmentId, LateFeeAssessment)> {
        let today = time_provider.now().date_naive();
        let mut assessments = Vec::new();

        for installment in self.installments.values() {
            let loan = match self.loans.get(&installment.loan_id) {
                Some(l) if l.status == LoanStatus::Active => l,
                _ => continue,
            };
            let engine = LateFeeEngine::new(loan.late_fee);
            let assessment = engine.assess(installment, today);
            if assessment.fee_amount.is_positive() {
                assessments.push((installment.id, assessment));
            }
        }

        for (installment_id, assessment) in &assessments {
            let loan_id = self.installments[installment_id].loan_id;
            self.events.emit(Event::LateFeeAssessed {
                loan_id,
                installment_id: *installment_id,
                fee_amount: assessment.fee_amount,
                days_late: assessment.days_late,
                date: today,
            });
        }

        assessments
    }

    /// consolidate the outstanding balance of the selected active loans into
    /// a new loan, freezing the sources
    ///
    /// Every check runs before any mutation, so a failed renegotiation
    /// leaves the book untouched.
    pub fn renegotiate(
        &mut self,
        client_id: ClientId,
        loan_ids: &[LoanId],
        terms: RenegotiationTerms,
    ) -> Result<LoanId> {
        self.client(client_id)?;

        if loan_ids.is_empty() {
            return Err(LoanError::RenegotiationError {
                message: "at least one loan must be selected".to_string(),
            });
        }

        for &loan_id in loan_ids {
            let loan = self.loan(loan_id)?;
            if loan.client_id != client_id {
                return Err(LoanError::RenegotiationError {
                    message: format!("loan {} belongs to a different client", loan_id),
                });
            }
            if loan.status != LoanStatus::Active {
                return Err(LoanError::RenegotiationError {
                    message: format!("loan {} is not active ({:?})", loan_id, loan.status),
                });
            }
        }

        let new_principal: Money = loan_ids
            .iter()
            .map(|&loan_id| {
                outstanding_balance(
                    self.installments.values().filter(move |i| i.loan_id == loan_id),
                )
            })
            .sum();

        if !new_principal.is_positive() {
            return Err(LoanError::RenegotiationError {
                message: "selected loans have no outstanding balance".to_string(),
            });
        }

        // validates the new terms before anything is written
        let schedule = generate_schedule(
            new_principal,
            terms.interest_rate,
            terms.frequency,
            terms.installment_count,
            terms.start_date,
        )?;

        // commit: freeze sources, create the new loan and its schedule
        let new_loan_id = Uuid::new_v4();
        for &loan_id in loan_ids {
            let outstanding = outstanding_balance(
                self.installments.values().filter(|i| i.loan_id == loan_id),
            );
            if let Some(loan) = self.loans.get_mut(&loan_id) {
                loan.status = LoanStatus::Renegotiated;
            }
            self.events.emit(Event::LoanRenegotiated {
                old_loan_id: loan_id,
                new_loan_id,
                outstanding_rolled: outstanding,
                date: terms.start_date,
            });
        }

        let loan = Loan {
            id: new_loan_id,
            client_id,
            principal: new_principal,
            interest_rate: terms.interest_rate,
            frequency: terms.frequency,
            installment_count: terms.installment_count,
            start_date: terms.start_date,
            total_amount: schedule.total_amount,
            late_fee: terms.late_fee,
            status: LoanStatus::Active,
        };

        for scheduled in &schedule.installments {
            let installment = Installment::from_scheduled(new_loan_id, scheduled);
            self.installments.insert(installment.id, installment);
        }
        self.loans.insert(new_loan_id, loan);

        self.events.emit(Event::LoanOriginated {
            loan_id: new_loan_id,
            client_id,
            principal: new_principal,
            interest_rate: terms.interest_rate,
            total_amount: schedule.total_amount,
            installment_count: terms.installment_count,
            start_date: terms.start_date,
        });

        Ok(new_loan_id)
    }

    /// drain the audit trail
    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }

    fn active_loan_installments(
        &self,
        client_id: ClientId,
    ) -> impl Iterator<Item = &Installment> {
        self.installments.values().filter(move |i| {
            self.loans
                .get(&i.loan_id)
                .map(|l| l.client_id == client_id && l.status == LoanStatus::Active)
                .unwrap_or(false)
        })
    }
}
