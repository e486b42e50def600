use crate::{
    aoi::AreaOfInterest,
    error::{FetchError, Result},
    platform::{Platform, ProcessingLevel},
};
use chrono::{naive::NaiveDate, Duration};

pub const DEFAULT_CLOUD_CEILING: u8 = 20;
pub const DEFAULT_LOOKBACK_DAYS: i64 = 400;

/// One fully-resolved catalog search. Built once per request; both dates
/// are inclusive and `start <= end` always holds after construction.
#[derive(Clone, Debug)]
pub struct SearchCriteria {
    pub footprint: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub cloud_ceiling: u8,
    pub platform: Platform,
    pub level: ProcessingLevel,
}

/// Combine the AOI with optional request fields into search criteria.
///
/// `now` is supplied by the caller so the default window (the last
/// `DEFAULT_LOOKBACK_DAYS` days through today) is anchored on one single
/// instant per request.
pub fn build_criteria(
    aoi: &AreaOfInterest,
    start_date: Option<&str>,
    end_date: Option<&str>,
    cloud_ceiling: Option<u8>,
    platform: Option<Platform>,
    level: Option<ProcessingLevel>,
    now: NaiveDate,
) -> Result<SearchCriteria> {
    let end = match end_date {
        Some(raw) => parse_date(raw)?,
        None => now,
    };

    let start = match start_date {
        Some(raw) => parse_date(raw)?,
        None => end - Duration::days(DEFAULT_LOOKBACK_DAYS),
    };

    if start > end {
        log::error!("end before start: start - {} end - {}", start, end);
        return Err(FetchError::InvalidDateRange(format!(
            "start date {} is after end date {}",
            start, end
        )));
    }

    let cloud_ceiling = cloud_ceiling.unwrap_or(DEFAULT_CLOUD_CEILING);
    if cloud_ceiling > 100 {
        return Err(FetchError::InvalidDateRange(format!(
            "cloud cover ceiling {} exceeds 100",
            cloud_ceiling
        )));
    }

    Ok(SearchCriteria {
        footprint: aoi.to_wkt(),
        start,
        end,
        cloud_ceiling,
        platform: platform.unwrap_or(Platform::Sentinel2),
        level: level.unwrap_or(ProcessingLevel::L1C),
    })
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|err| FetchError::InvalidDateRange(format!("cannot parse '{}': {}", raw, err)))
}
