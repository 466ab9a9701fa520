use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::installment::Installment;
use crate::types::{InstallmentStatus, RiskLevel};

/// client-level delinquency summary, derived from ledger state on demand
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskSummary {
    pub total_pending: Money,
    pub late_count: u32,
    pub oldest_due_date: Option<NaiveDate>,
    pub days_late: u32,
    pub risk_level: RiskLevel,
}

/// classify a client's installments as of `today`
///
/// Pure function of ledger state: no mutation, idempotent. The risk level is
/// driven by the days late of the oldest unpaid installment.
pub fn classify(installments: &[&Installment], today: NaiveDate) -> RiskSummary {
    let mut total_pending = Money::ZERO;
    let mut late_count = 0;
    let mut oldest_due_date: Option<NaiveDate> = None;

    for inst in installments {
        let status = inst.status(today);
        if status == InstallmentStatus::Paid {
            continue;
        }

        total_pending += inst.remaining();
        if status == InstallmentStatus::Late {
            late_count += 1;
        }
        oldest_due_date = Some(match oldest_due_date {
            Some(d) => d.min(inst.due_date),
            None => inst.due_date,
        });
    }

    let days_late = oldest_due_date
        .map(|d| (today - d).num_days().max(0) as u32)
        .unwrap_or(0);

    RiskSummary {
        total_pending,
        late_count,
        oldest_due_date,
        days_late,
        risk_level: risk_level_for(days_late),
    }
}

/// 30+ days critical, 7..30 warning, otherwise normal
pub fn risk_level_for(days_late: u32) -> RiskLevel {
    if days_late >= 30 {
        RiskLevel::Critical
    } else if days_late >= 7 {
        RiskLevel::Warning
    } else {
        RiskLevel::Normal
    }
}
