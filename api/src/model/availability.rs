use chrono::NaiveDate;
use garde::Validate;
use kernel::model::{
    availability::{AvailabilityOptions, BlockedDates, DateRange},
    day::{exceeds_max_stay, parse_day, MAX_STAY_NIGHTS},
    occupancy::OccupancyCheck,
    room::RoomTypeId,
};
use kernel::service::availability::AvailabilityReport;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    #[garde(length(min = 1))]
    pub room_type: String,
    #[garde(range(min = 1))]
    #[serde(default = "default_one")]
    pub adult: u32,
    #[garde(skip)]
    #[serde(default)]
    pub children: u32,
    #[garde(range(min = 1, max = 20))]
    #[serde(default = "default_one")]
    pub room: u32,
    #[garde(skip)]
    pub start_date: Option<String>,
    #[garde(skip)]
    pub end_date: Option<String>,
}

fn default_one() -> u32 {
    1
}

impl TryFrom<AvailabilityQuery> for AvailabilityOptions {
    type Error = AppError;

    fn try_from(value: AvailabilityQuery) -> AppResult<Self> {
        let AvailabilityQuery {
            room_type,
            adult,
            children,
            room,
            start_date,
            end_date,
        } = value;

        let range = match (start_date.as_deref(), end_date.as_deref()) {
            (None, None) => None,
            (Some(start), Some(end)) => {
                let start_date = query_day("startDate", start)?;
                let end_date = query_day("endDate", end)?;
                if end_date < start_date {
                    return Err(AppError::InvalidRequest(
                        "endDate must not be before startDate".into(),
                    ));
                }
                if exceeds_max_stay(start_date, end_date) {
                    return Err(AppError::InvalidRequest(format!(
                        "a range may cover at most {MAX_STAY_NIGHTS} nights"
                    )));
                }
                Some(DateRange {
                    start_date,
                    end_date,
                })
            }
            _ => {
                return Err(AppError::InvalidRequest(
                    "startDate and endDate must be given together".into(),
                ))
            }
        };

        Ok(AvailabilityOptions {
            room_type: RoomTypeId::new(room_type),
            adult,
            children,
            room,
            range,
        })
    }
}

fn query_day(name: &str, raw: &str) -> AppResult<NaiveDate> {
    parse_day(raw).ok_or_else(|| AppError::InvalidRequest(format!("{name} is not a date: {raw}")))
}

/// Merged blocked dates as the booking widget consumes them: sorted,
/// deduplicated `YYYY-MM-DD` strings.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockedDatesResponse {
    pub room_type: &'static str,
    pub blocked_dates: Vec<String>,
}

impl BlockedDatesResponse {
    pub fn new(room_type: &'static str, blocked: &BlockedDates) -> Self {
        Self {
            room_type,
            blocked_dates: blocked.lookup.iter().cloned().collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    #[serde(flatten)]
    pub blocked: BlockedDatesResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range_available: Option<bool>,
    pub conflicts: Vec<NaiveDate>,
    pub occupancy: OccupancyCheck,
    pub advisories: Vec<String>,
}

impl From<AvailabilityReport> for AvailabilityResponse {
    fn from(value: AvailabilityReport) -> Self {
        let AvailabilityReport {
            room_type,
            blocked,
            conflicts,
            range_available,
            occupancy,
            advisories,
        } = value;
        Self {
            blocked: BlockedDatesResponse::new(room_type, &blocked),
            range_available,
            conflicts,
            occupancy,
            advisories,
        }
    }
}
