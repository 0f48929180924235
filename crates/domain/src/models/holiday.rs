//! Company holiday models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A non-working company holiday.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Holiday {
    pub id: Uuid,
    pub holiday_date: NaiveDate,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Request payload for adding a holiday.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateHolidayRequest {
    pub holiday_date: NaiveDate,

    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,
}

/// Query parameters for listing holidays.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ListHolidaysQuery {
    pub year: Option<i32>,
}

/// Response for listing holidays.
#[derive(Debug, Clone, Serialize)]
pub struct ListHolidaysResponse {
    pub data: Vec<Holiday>,
    pub count: usize,
}
