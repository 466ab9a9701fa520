pub mod book;
pub mod classifier;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod installment;
pub mod latefee;
pub mod payments;
pub mod renegotiation;
pub mod schedule;
pub mod types;

// re-export key types
pub use book::{Client, ClientSummary, CollectionItem, Loan, LoanBook, LoanTerms};
pub use classifier::{classify, risk_level_for, RiskSummary};
pub use decimal::{Money, Rate};
pub use errors::{LoanError, Result};
pub use events::{Event, EventStore};
pub use installment::Installment;
pub use latefee::{LateFeeAssessment, LateFeeEngine, LateFeePolicy};
pub use payments::{AllocationOutcome, PaymentAllocator, PaymentRecord, PaymentRequest};
pub use renegotiation::{outstanding_balance, RenegotiationTerms};
pub use schedule::{generate_schedule, Schedule, ScheduledInstallment};
pub use types::{
    ClientId, ClientStatus, InstallmentId, InstallmentStatus, LoanId, LoanStatus,
    PaymentFrequency, PaymentId, PaymentKind, PaymentMethod, RiskLevel,
};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
