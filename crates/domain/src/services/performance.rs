//! Performance aggregation.
//!
//! Pure functions that turn monthly targets and daily reports into
//! per-parameter achievement, time buckets and team roll-ups. Callers load
//! the snapshots; nothing here touches storage or the clock.
//!
//! Algorithm outline for one employee:
//! 1. Resolve the date range from the period (or explicit bounds).
//! 2. Split the range into buckets: days for weekly reports, ISO weeks for
//!    monthly, months for quarterly and annual. Buckets are clipped to the
//!    range so they are contiguous and exhaustive.
//! 3. Per bucket and tracked parameter, sum reported actuals and the monthly
//!    target pro-rated down to the days in the bucket.
//! 4. Whole-period totals are bucket sums; achievement is recomputed from the
//!    totals rather than averaged across buckets.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use thiserror::Error;
use uuid::Uuid;

use shared::validation::{month_key, parse_target_month};

use crate::models::{
    performance::{BucketParameter, ParameterAverage, ParameterHighlight},
    DailyReport, DateRange, EmployeeReportPerformance, ParameterPerformance, ReportPeriod,
    Target, TeamReportPerformance, TimeBucketData,
};
use crate::services::calendar::WorkingCalendar;

/// Longest range a single report may cover.
pub const MAX_RANGE_DAYS: i64 = 1096;

/// Parameter type reported when a target parameter carries no unit.
const DEFAULT_PARAM_TYPE: &str = "count";

/// Errors raised while resolving a report window.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AggregationError {
    #[error("End date {end} is before start date {start}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("Date range spans {days} days, the maximum is {max}")]
    RangeTooLong { days: i64, max: i64 },
}

/// How a monthly target is spread over the days of its month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProrationMode {
    /// Each working day carries an equal share; non-working days carry none.
    #[default]
    WorkingDays,
    /// Every calendar day carries an equal share.
    CalendarDays,
}

/// How parameter achievements combine into the overall figure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallWeighting {
    /// Every parameter counts the same.
    #[default]
    Unweighted,
    /// Parameters weigh by their total target.
    TargetWeighted,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregationOptions {
    pub proration: ProrationMode,
    pub weighting: OverallWeighting,
}

/// A labelled sub-range of a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketSpan {
    pub label: String,
    pub range: DateRange,
}

// ---------------------------------------------------------------------------
// Calendar arithmetic
// ---------------------------------------------------------------------------

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        2 if NaiveDate::from_ymd_opt(year, 2, 29).is_some() => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// The calendar month containing `date`.
pub fn month_range(date: NaiveDate) -> DateRange {
    let start = date.with_day(1).unwrap_or(date);
    let end = date
        .with_day(days_in_month(date.year(), date.month()))
        .unwrap_or(date);
    DateRange { start, end }
}

/// Whole calendar months touched by `range`.
///
/// Working days are counted per target month, so the calendar handed to
/// [`aggregate_employee`] must know every holiday in this span.
pub fn covering_months(range: &DateRange) -> DateRange {
    DateRange {
        start: month_range(range.start).start,
        end: month_range(range.end).end,
    }
}

/// The ISO week (Monday to Sunday) containing `date`, clamped to the
/// representable dates.
pub fn iso_week_range(date: NaiveDate) -> DateRange {
    let offset = Duration::days(date.weekday().num_days_from_monday() as i64);
    let start = date.checked_sub_signed(offset).unwrap_or(NaiveDate::MIN);
    let end = start
        .checked_add_signed(Duration::days(6))
        .unwrap_or(NaiveDate::MAX);
    DateRange { start, end }
}

fn quarter_range(date: NaiveDate) -> DateRange {
    let first_month = (date.month() - 1) / 3 * 3 + 1;
    let start = NaiveDate::from_ymd_opt(date.year(), first_month, 1).unwrap_or(date);
    let end = month_range(
        NaiveDate::from_ymd_opt(date.year(), first_month + 2, 1).unwrap_or(date),
    )
    .end;
    DateRange { start, end }
}

fn year_range(date: NaiveDate) -> DateRange {
    DateRange {
        start: NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date),
        end: NaiveDate::from_ymd_opt(date.year(), 12, 31).unwrap_or(date),
    }
}

/// The default window of `period` that contains `anchor`.
pub fn period_window(period: ReportPeriod, anchor: NaiveDate) -> DateRange {
    match period {
        ReportPeriod::Weekly => iso_week_range(anchor),
        ReportPeriod::Monthly => month_range(anchor),
        ReportPeriod::Quarterly => quarter_range(anchor),
        ReportPeriod::Annual => year_range(anchor),
    }
}

/// Resolves the effective report range.
///
/// Without bounds the current period window around `today` is used. A single
/// bound is completed with the period window that contains it.
pub fn resolve_range(
    period: ReportPeriod,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<DateRange, AggregationError> {
    let range = match (start_date, end_date) {
        (Some(start), Some(end)) => {
            DateRange::new(start, end).ok_or(AggregationError::InvalidRange { start, end })?
        }
        (Some(start), None) => DateRange {
            start,
            end: period_window(period, start).end,
        },
        (None, Some(end)) => DateRange {
            start: period_window(period, end).start,
            end,
        },
        (None, None) => period_window(period, today),
    };

    let days = range.len_days();
    if days > MAX_RANGE_DAYS {
        return Err(AggregationError::RangeTooLong {
            days,
            max: MAX_RANGE_DAYS,
        });
    }
    Ok(range)
}

fn bucket_label(period: ReportPeriod, start: NaiveDate) -> String {
    match period {
        ReportPeriod::Weekly => start.format("%Y-%m-%d").to_string(),
        ReportPeriod::Monthly => {
            let week = start.iso_week();
            format!("{}-W{:02}", week.year(), week.week())
        }
        ReportPeriod::Quarterly | ReportPeriod::Annual => month_key(start),
    }
}

/// Splits `range` into the buckets used for `period`.
pub fn build_buckets(period: ReportPeriod, range: &DateRange) -> Vec<BucketSpan> {
    let mut buckets = Vec::new();
    let mut cursor = range.start;

    while cursor <= range.end {
        let unit_end = match period {
            ReportPeriod::Weekly => cursor,
            ReportPeriod::Monthly => iso_week_range(cursor).end,
            ReportPeriod::Quarterly | ReportPeriod::Annual => month_range(cursor).end,
        };
        let end = unit_end.min(range.end);
        buckets.push(BucketSpan {
            label: bucket_label(period, cursor),
            range: DateRange { start: cursor, end },
        });
        match end.succ_opt() {
            Some(next) => cursor = next,
            None => break,
        }
    }

    buckets
}

// ---------------------------------------------------------------------------
// Targets
// ---------------------------------------------------------------------------

/// Turns `calls_made` into `Calls Made`.
pub fn humanize_key(key: &str) -> String {
    key.split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone)]
struct TrackedParameter {
    key: String,
    unit: Option<String>,
    /// Monthly figure from the latest target month seen.
    monthly_target: f64,
}

/// Spreads monthly targets over individual days.
struct DailyTargets<'a> {
    by_month: HashMap<String, &'a Target>,
    calendar: &'a WorkingCalendar,
    proration: ProrationMode,
    working_days_per_month: HashMap<String, u32>,
}

impl<'a> DailyTargets<'a> {
    fn new(targets: &[&'a Target], calendar: &'a WorkingCalendar, proration: ProrationMode) -> Self {
        let mut by_month = HashMap::new();
        let mut working_days_per_month = HashMap::new();
        for target in targets {
            by_month.insert(target.target_month.clone(), *target);
            if let Some(first) = parse_target_month(&target.target_month) {
                working_days_per_month.insert(
                    target.target_month.clone(),
                    calendar.working_days_in(&month_range(first)),
                );
            }
        }
        Self {
            by_month,
            calendar,
            proration,
            working_days_per_month,
        }
    }

    /// Share of the monthly target for `key` that falls on `date`.
    fn on(&self, date: NaiveDate, key: &str) -> f64 {
        let month = month_key(date);
        let Some(monthly) = self
            .by_month
            .get(&month)
            .and_then(|target| target.parameter_value(key))
        else {
            return 0.0;
        };

        match self.proration {
            ProrationMode::WorkingDays => {
                let working_days = self.working_days_per_month.get(&month).copied().unwrap_or(0);
                if working_days == 0 || !self.calendar.is_working_day(date) {
                    0.0
                } else {
                    monthly / working_days as f64
                }
            }
            ProrationMode::CalendarDays => {
                monthly / days_in_month(date.year(), date.month()) as f64
            }
        }
    }
}

/// Active targets of `employee_id` whose month overlaps `range`, oldest first.
fn targets_in_range<'a>(
    employee_id: Uuid,
    range: &DateRange,
    targets: &'a [Target],
) -> Vec<&'a Target> {
    let mut relevant: Vec<&Target> = targets
        .iter()
        .filter(|t| t.employee_id == employee_id && t.status.is_active())
        .filter(|t| {
            parse_target_month(&t.target_month)
                .map(|first| {
                    let month = month_range(first);
                    month.start <= range.end && month.end >= range.start
                })
                .unwrap_or(false)
        })
        .collect();
    relevant.sort_by(|a, b| a.target_month.cmp(&b.target_month));
    relevant
}

/// Parameters in first-encountered order across the given targets.
fn tracked_parameters(targets: &[&Target]) -> Vec<TrackedParameter> {
    let mut tracked: Vec<TrackedParameter> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for target in targets {
        for parameter in &target.target_data {
            match index.get(parameter.name.as_str()) {
                Some(&i) => {
                    tracked[i].monthly_target = parameter.value;
                    if parameter.unit.is_some() {
                        tracked[i].unit = parameter.unit.clone();
                    }
                }
                None => {
                    index.insert(parameter.name.as_str(), tracked.len());
                    tracked.push(TrackedParameter {
                        key: parameter.name.clone(),
                        unit: parameter.unit.clone(),
                        monthly_target: parameter.value,
                    });
                }
            }
        }
    }

    tracked
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// `actual / target * 100`, or 0 when the target is not positive.
pub fn achievement_pct(actual: f64, target: f64) -> f64 {
    if target > 0.0 {
        actual / target * 100.0
    } else {
        0.0
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Combines parameter achievements into one figure. 0 for an empty list.
pub fn overall_achievement(parameters: &[ParameterPerformance], weighting: OverallWeighting) -> f64 {
    match weighting {
        OverallWeighting::Unweighted => mean(parameters.iter().map(|p| p.achievement_pct)),
        OverallWeighting::TargetWeighted => {
            let weight: f64 = parameters.iter().map(|p| p.total_target).sum();
            if weight > 0.0 {
                parameters
                    .iter()
                    .map(|p| p.achievement_pct * p.total_target)
                    .sum::<f64>()
                    / weight
            } else {
                0.0
            }
        }
    }
}

/// Highest and lowest achieving parameters. Ties keep the first encountered.
pub fn best_and_worst(
    parameters: &[ParameterPerformance],
) -> (Option<ParameterHighlight>, Option<ParameterHighlight>) {
    let mut best: Option<&ParameterPerformance> = None;
    let mut worst: Option<&ParameterPerformance> = None;

    for parameter in parameters {
        if best.map_or(true, |b| parameter.achievement_pct > b.achievement_pct) {
            best = Some(parameter);
        }
        if worst.map_or(true, |w| parameter.achievement_pct < w.achievement_pct) {
            worst = Some(parameter);
        }
    }

    (best.map(Into::into), worst.map(Into::into))
}

/// Aggregates one employee's performance over `range`.
///
/// `targets` and `reports` may contain other employees' records; they are
/// filtered out. Missing targets or reports yield zeros, never an error.
pub fn aggregate_employee(
    employee_id: Uuid,
    period: ReportPeriod,
    range: DateRange,
    targets: &[Target],
    reports: &[DailyReport],
    calendar: &WorkingCalendar,
    options: AggregationOptions,
) -> EmployeeReportPerformance {
    let relevant_targets = targets_in_range(employee_id, &range, targets);
    let tracked = tracked_parameters(&relevant_targets);
    let daily_targets = DailyTargets::new(&relevant_targets, calendar, options.proration);

    let reports: Vec<&DailyReport> = reports
        .iter()
        .filter(|r| r.employee_id == employee_id && range.contains(r.report_date))
        .collect();

    let spans = build_buckets(period, &range);
    let mut buckets = Vec::with_capacity(spans.len());

    for span in spans {
        let in_bucket: Vec<&DailyReport> = reports
            .iter()
            .copied()
            .filter(|r| span.range.contains(r.report_date))
            .collect();

        let mut parameters = BTreeMap::new();
        for parameter in &tracked {
            let actual: f64 = in_bucket
                .iter()
                .filter_map(|r| r.parameter_values.get(&parameter.key))
                .sum();
            let target: f64 = span
                .range
                .days()
                .map(|day| daily_targets.on(day, &parameter.key))
                .sum();
            parameters.insert(
                parameter.key.clone(),
                BucketParameter {
                    actual,
                    target,
                    achievement_pct: achievement_pct(actual, target),
                },
            );
        }

        let submitted_days: HashSet<NaiveDate> = in_bucket
            .iter()
            .map(|r| r.report_date)
            .filter(|d| calendar.is_working_day(*d))
            .collect();

        buckets.push(TimeBucketData {
            bucket_label: span.label,
            bucket_start: span.range.start,
            bucket_end: span.range.end,
            parameters,
            submission_count: submitted_days.len() as u32,
            expected_submissions: calendar.working_days_in(&span.range),
        });
    }

    let parameters: Vec<ParameterPerformance> = tracked
        .iter()
        .map(|parameter| {
            let (total_actual, total_target) = buckets
                .iter()
                .filter_map(|b| b.parameters.get(&parameter.key))
                .fold((0.0, 0.0), |(actual, target), p| {
                    (actual + p.actual, target + p.target)
                });
            let days_reported = reports
                .iter()
                .filter(|r| r.parameter_values.contains_key(&parameter.key))
                .map(|r| r.report_date)
                .collect::<HashSet<_>>()
                .len() as u32;

            ParameterPerformance {
                param_key: parameter.key.clone(),
                param_label: humanize_key(&parameter.key),
                param_type: parameter
                    .unit
                    .clone()
                    .unwrap_or_else(|| DEFAULT_PARAM_TYPE.to_string()),
                target: parameter.monthly_target,
                total_target,
                total_actual,
                achievement_pct: achievement_pct(total_actual, total_target),
                average_daily: if days_reported > 0 {
                    total_actual / days_reported as f64
                } else {
                    0.0
                },
                days_reported,
            }
        })
        .collect();

    let total_submissions: u32 = buckets.iter().map(|b| b.submission_count).sum();
    let expected_submissions: u32 = buckets.iter().map(|b| b.expected_submissions).sum();
    let submission_rate = if expected_submissions > 0 {
        total_submissions as f64 / expected_submissions as f64 * 100.0
    } else {
        0.0
    };

    let overall_achievement_pct = overall_achievement(&parameters, options.weighting);
    let (best_parameter, worst_parameter) = best_and_worst(&parameters);

    EmployeeReportPerformance {
        employee_id,
        employee_name: None,
        period,
        start_date: range.start,
        end_date: range.end,
        parameters,
        buckets,
        overall_achievement_pct,
        submission_rate,
        total_submissions,
        expected_submissions,
        best_parameter,
        worst_parameter,
    }
}

/// Rolls employee results up to team level.
///
/// Parameter averages only include employees that track the parameter.
pub fn aggregate_team(
    manager_id: Uuid,
    period: ReportPeriod,
    range: DateRange,
    employees: Vec<EmployeeReportPerformance>,
) -> TeamReportPerformance {
    let team_average_achievement = mean(employees.iter().map(|e| e.overall_achievement_pct));
    let team_average_submission_rate = mean(employees.iter().map(|e| e.submission_rate));

    let mut averages: Vec<(String, String, f64, u32)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for employee in &employees {
        for parameter in &employee.parameters {
            match index.get(&parameter.param_key) {
                Some(&i) => {
                    averages[i].2 += parameter.achievement_pct;
                    averages[i].3 += 1;
                }
                None => {
                    index.insert(parameter.param_key.clone(), averages.len());
                    averages.push((
                        parameter.param_key.clone(),
                        parameter.param_label.clone(),
                        parameter.achievement_pct,
                        1,
                    ));
                }
            }
        }
    }

    let parameter_averages = averages
        .into_iter()
        .map(|(param_key, param_label, sum, count)| ParameterAverage {
            param_key,
            param_label,
            average_achievement_pct: sum / count as f64,
            employee_count: count,
        })
        .collect();

    TeamReportPerformance {
        manager_id,
        period,
        start_date: range.start,
        end_date: range.end,
        employees,
        team_average_achievement,
        team_average_submission_rate,
        parameter_averages,
    }
}
