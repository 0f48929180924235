//! Loads aggregation inputs and runs the performance roll-ups.

use chrono::{NaiveDate, Utc};
use domain::models::performance::PerformanceQuery;
use domain::models::{
    DailyReport, DateRange, Employee, EmployeeReportPerformance, Target, TeamReportPerformance,
};
use domain::services::{
    aggregate_employee, aggregate_team, covering_months, resolve_range, AggregationError,
    AggregationOptions, WorkingCalendar,
};
use persistence::repositories::{
    DailyReportRepository, EmployeeRepository, HolidayRepository, TargetRepository,
};
use shared::validation::month_key;
use sqlx::PgPool;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum PerformanceError {
    #[error("Employee {0} not found")]
    EmployeeNotFound(Uuid),

    #[error(transparent)]
    Range(#[from] AggregationError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Clone)]
pub struct PerformanceService {
    employees: EmployeeRepository,
    targets: TargetRepository,
    reports: DailyReportRepository,
    holidays: HolidayRepository,
    working_days_of_week: Vec<u32>,
    options: AggregationOptions,
}

impl PerformanceService {
    pub fn new(pool: PgPool, working_days_of_week: Vec<u32>, options: AggregationOptions) -> Self {
        Self {
            employees: EmployeeRepository::new(pool.clone()),
            targets: TargetRepository::new(pool.clone()),
            reports: DailyReportRepository::new(pool.clone()),
            holidays: HolidayRepository::new(pool),
            working_days_of_week,
            options,
        }
    }

    pub async fn employee_performance(
        &self,
        employee_id: Uuid,
        query: &PerformanceQuery,
    ) -> Result<EmployeeReportPerformance, PerformanceError> {
        let employee: Employee = self
            .employees
            .find_by_id(employee_id)
            .await?
            .map(Employee::from)
            .ok_or(PerformanceError::EmployeeNotFound(employee_id))?;

        let range = self.range_for(query)?;
        let inputs = self.load_inputs(&[employee_id], range).await?;

        Ok(inputs.aggregate(&employee, query, range, self.options))
    }

    /// Aggregates every active direct report of `manager_id`.
    ///
    /// A manager without reports gets an empty team with zero averages.
    pub async fn team_performance(
        &self,
        manager_id: Uuid,
        query: &PerformanceQuery,
    ) -> Result<TeamReportPerformance, PerformanceError> {
        let range = self.range_for(query)?;

        let team: Vec<Employee> = self
            .employees
            .find_direct_reports(manager_id)
            .await?
            .into_iter()
            .map(Employee::from)
            .collect();

        let ids: Vec<Uuid> = team.iter().map(|e| e.id).collect();
        let inputs = self.load_inputs(&ids, range).await?;

        let employees = team
            .iter()
            .map(|employee| inputs.aggregate(employee, query, range, self.options))
            .collect();

        Ok(aggregate_team(manager_id, query.period, range, employees))
    }

    fn range_for(&self, query: &PerformanceQuery) -> Result<DateRange, PerformanceError> {
        let range = resolve_range(
            query.period,
            query.start_date,
            query.end_date,
            today(),
        )?;
        debug!(
            period = %query.period,
            start = %range.start,
            end = %range.end,
            "Resolved performance range"
        );
        Ok(range)
    }

    async fn load_inputs(
        &self,
        employee_ids: &[Uuid],
        range: DateRange,
    ) -> Result<AggregationInputs, PerformanceError> {
        // Targets pro-rate over whole months, so holidays outside the range count too
        let span = covering_months(&range);
        let holidays = self
            .holidays
            .find_in_range(span.start, span.end)
            .await?
            .into_iter()
            .map(|h| h.holiday_date);
        let calendar = WorkingCalendar::new(&self.working_days_of_week, holidays);

        if employee_ids.is_empty() {
            return Ok(AggregationInputs {
                calendar,
                targets: Vec::new(),
                reports: Vec::new(),
            });
        }

        let targets = self
            .targets
            .find_for_employees_in_months(
                employee_ids,
                &month_key(range.start),
                &month_key(range.end),
            )
            .await?
            .into_iter()
            .map(Target::from)
            .collect();

        let reports = self
            .reports
            .find_in_range(employee_ids, range.start, range.end)
            .await?
            .into_iter()
            .map(DailyReport::from)
            .collect();

        Ok(AggregationInputs {
            calendar,
            targets,
            reports,
        })
    }
}

/// Snapshot of everything the pure aggregation needs.
struct AggregationInputs {
    calendar: WorkingCalendar,
    targets: Vec<Target>,
    reports: Vec<DailyReport>,
}

impl AggregationInputs {
    fn aggregate(
        &self,
        employee: &Employee,
        query: &PerformanceQuery,
        range: DateRange,
        options: AggregationOptions,
    ) -> EmployeeReportPerformance {
        let mut performance = aggregate_employee(
            employee.id,
            query.period,
            range,
            &self.targets,
            &self.reports,
            &self.calendar,
            options,
        );
        performance.employee_name = Some(employee.full_name.clone());
        performance
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}
