use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{LoanError, Result};
use crate::types::PaymentFrequency;

/// one entry of a generated installment schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledInstallment {
    pub number: u32,
    pub due_date: NaiveDate,
    pub amount: Money,
    pub capital_amount: Money,
    pub interest_amount: Money,
}

/// complete schedule for a loan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub principal: Money,
    pub interest_rate: Rate,
    pub frequency: PaymentFrequency,
    pub total_amount: Money,
    pub installments: Vec<ScheduledInstallment>,
}

/// generate the installment schedule for a loan
///
/// total = principal * (1 + rate/100), fixed at creation. The base
/// installment amount is total / count truncated to the cent; the last
/// installment absorbs the rounding remainder so the schedule sums to
/// the total exactly.
pub fn generate_schedule(
    principal: Money,
    interest_rate: Rate,
    frequency: PaymentFrequency,
    count: u32,
    start_date: NaiveDate,
) -> Result<Schedule> {
    if !principal.is_positive() {
        return Err(LoanError::InvalidScheduleInput {
            message: format!("principal must be positive, got {}", principal),
        });
    }
    if interest_rate.is_negative() {
        return Err(LoanError::InvalidScheduleInput {
            message: format!("interest rate must not be negative, got {}", interest_rate),
        });
    }
    if count < 1 {
        return Err(LoanError::InvalidScheduleInput {
            message: "installment count must be at least 1".to_string(),
        });
    }

    let total_amount = principal + interest_rate.of(principal);
    let base = Money::from_decimal_floor(total_amount.as_decimal() / Decimal::from(count));
    let last = total_amount - base * Decimal::from(count - 1);

    // capital share of each installment is proportional to principal/total
    let capital_ratio = principal.as_decimal() / total_amount.as_decimal();

    let mut installments = Vec::with_capacity(count as usize);
    for number in 1..=count {
        let amount = if number == count { last } else { base };
        let capital_amount = Money::from_decimal_floor(amount.as_decimal() * capital_ratio);
        let interest_amount = amount - capital_amount;

        installments.push(ScheduledInstallment {
            number,
            due_date: due_date_for(frequency, start_date, number),
            amount,
            capital_amount,
            interest_amount,
        });
    }

    Ok(Schedule {
        principal,
        interest_rate,
        frequency,
        total_amount,
        installments,
    })
}

/// due date of installment `number` (1-based) under the frequency rules
pub fn due_date_for(frequency: PaymentFrequency, start_date: NaiveDate, number: u32) -> NaiveDate {
    match frequency {
        PaymentFrequency::Monthly => add_months_clamped(start_date, number - 1),
        PaymentFrequency::Weekly => start_date + Duration::days(7 * (number as i64 - 1)),
        PaymentFrequency::Daily => nth_chargeable_day(start_date, number),
    }
}

/// add calendar months, clamping the day-of-month to the target month's length
/// (Jan 31 + 1 month -> Feb 28/29)
fn add_months_clamped(date: NaiveDate, months: u32) -> NaiveDate {
    let zero_based = date.month0() + months;
    let year = date.year() + (zero_based / 12) as i32;
    let month = zero_based % 12 + 1;
    let day = date.day().min(days_in_month(year, month));
    // year/month/day are in range by construction
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(date)
}

/// the n-th chargeable day (Mon-Sat) counting `start` itself as day 1;
/// a Sunday start rolls forward to Monday
fn nth_chargeable_day(start: NaiveDate, n: u32) -> NaiveDate {
    let mut date = start;
    let mut remaining = n;
    loop {
        if date.weekday() != Weekday::Sun {
            remaining -= 1;
            if remaining == 0 {
                return date;
            }
        }
        date += Duration::days(1);
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 30,
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_even_split_daily() {
        // 1000 @ 10% over 10 daily installments from a Monday
        let schedule = generate_schedule(
            Money::from_major(1_000),
            Rate::from_percentage_int(10),
            PaymentFrequency::Daily,
            10,
            date(2024, 1, 1),
        )
        .unwrap();

        assert_eq!(schedule.total_amount, Money::from_major(1_100));
        assert_eq!(schedule.installments.len(), 10);
        for inst in &schedule.installments {
            assert_eq!(inst.amount, Money::from_major(110));
        }
    }

    #[test]
    fn test_rounding_remainder_on_last_installment() {
        // 1100 total over 3: base floors to 366.66, last absorbs the drift
        let schedule = generate_schedule(
            Money::from_major(1_000),
            Rate::from_percentage_int(10),
            PaymentFrequency::Monthly,
            3,
            date(2024, 1, 15),
        )
        .unwrap();

        assert_eq!(schedule.installments[0].amount, Money::from_str_exact("366.66").unwrap());
        assert_eq!(schedule.installments[1].amount, Money::from_str_exact("366.66").unwrap());
        assert_eq!(schedule.installments[2].amount, Money::from_str_exact("366.68").unwrap());

        let sum: Money = schedule.installments.iter().map(|i| i.amount).sum();
        assert_eq!(sum, schedule.total_amount);
    }

    #[test]
    fn test_schedule_sums_to_total_for_awkward_counts() {
        for count in [1u32, 7, 13, 24, 97] {
            let schedule = generate_schedule(
                Money::from_str_exact("777.77").unwrap(),
                Rate::from_percentage(dec!(17.5)),
                PaymentFrequency::Daily,
                count,
                date(2024, 3, 4),
            )
            .unwrap();

            let sum: Money = schedule.installments.iter().map(|i| i.amount).sum();
            assert_eq!(sum, schedule.total_amount, "count={}", count);
        }
    }

    #[test]
    fn test_capital_and_interest_split() {
        let schedule = generate_schedule(
            Money::from_major(1_000),
            Rate::from_percentage_int(10),
            PaymentFrequency::Daily,
            10,
            date(2024, 1, 1),
        )
        .unwrap();

        for inst in &schedule.installments {
            assert_eq!(inst.capital_amount + inst.interest_amount, inst.amount);
            assert_eq!(inst.capital_amount, Money::from_major(100));
            assert_eq!(inst.interest_amount, Money::from_major(10));
        }
    }

    #[test]
    fn test_daily_schedule_skips_sundays() {
        // 2024-01-01 is a Monday; day 7 must jump over Sunday the 7th
        let schedule = generate_schedule(
            Money::from_major(600),
            Rate::ZERO,
            PaymentFrequency::Daily,
            8,
            date(2024, 1, 1),
        )
        .unwrap();

        let dues: Vec<NaiveDate> = schedule.installments.iter().map(|i| i.due_date).collect();
        assert_eq!(dues[0], date(2024, 1, 1));
        assert_eq!(dues[5], date(2024, 1, 6)); // Saturday
        assert_eq!(dues[6], date(2024, 1, 8)); // Monday, Sunday skipped
        assert_eq!(dues[7], date(2024, 1, 9));
    }

    #[test]
    fn test_daily_schedule_sunday_start_rolls_to_monday() {
        let schedule = generate_schedule(
            Money::from_major(100),
            Rate::ZERO,
            PaymentFrequency::Daily,
            1,
            date(2024, 1, 7), // Sunday
        )
        .unwrap();

        assert_eq!(schedule.installments[0].due_date, date(2024, 1, 8));
    }

    #[test]
    fn test_weekly_due_dates() {
        let schedule = generate_schedule(
            Money::from_major(400),
            Rate::ZERO,
            PaymentFrequency::Weekly,
            4,
            date(2024, 1, 3),
        )
        .unwrap();

        let dues: Vec<NaiveDate> = schedule.installments.iter().map(|i| i.due_date).collect();
        assert_eq!(dues, vec![
            date(2024, 1, 3),
            date(2024, 1, 10),
            date(2024, 1, 17),
            date(2024, 1, 24),
        ]);
    }

    #[test]
    fn test_monthly_due_dates_clamp_to_month_end() {
        let schedule = generate_schedule(
            Money::from_major(300),
            Rate::ZERO,
            PaymentFrequency::Monthly,
            3,
            date(2024, 1, 31),
        )
        .unwrap();

        let dues: Vec<NaiveDate> = schedule.installments.iter().map(|i| i.due_date).collect();
        assert_eq!(dues, vec![
            date(2024, 1, 31),
            date(2024, 2, 29), // 2024 is a leap year
            date(2024, 3, 31),
        ]);
    }

    #[test]
    fn test_monthly_crosses_year_boundary() {
        assert_eq!(add_months_clamped(date(2024, 11, 30), 3), date(2025, 2, 28));
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let start = date(2024, 1, 1);

        assert!(matches!(
            generate_schedule(Money::ZERO, Rate::ZERO, PaymentFrequency::Daily, 1, start),
            Err(LoanError::InvalidScheduleInput { .. })
        ));
        assert!(matches!(
            generate_schedule(
                Money::from_major(-5),
                Rate::ZERO,
                PaymentFrequency::Daily,
                1,
                start
            ),
            Err(LoanError::InvalidScheduleInput { .. })
        ));
        assert!(matches!(
            generate_schedule(
                Money::from_major(100),
                Rate::from_percentage(dec!(-1)),
                PaymentFrequency::Daily,
                1,
                start
            ),
            Err(LoanError::InvalidScheduleInput { .. })
        ));
        assert!(matches!(
            generate_schedule(
                Money::from_major(100),
                Rate::ZERO,
                PaymentFrequency::Daily,
                0,
                start
            ),
            Err(LoanError::InvalidScheduleInput { .. })
        ));
    }
}
