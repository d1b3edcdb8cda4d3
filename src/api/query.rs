//! Query construction for the transaction listing endpoint.
//!
//! Two display modes drive the parameters:
//! - Pagination mode (no date bounds): the list grows page by page, each
//!   request carrying the last-seen transaction id as an opaque cursor.
//! - Filter mode (either bound set): the result is treated as one complete
//!   filtered set, capped at [`FILTERED_PAGE_LIMIT`]; the cursor is ignored
//!   and the listing restarts from the beginning.

use std::str::FromStr;

/// Page cap sent with every filtered request
pub const FILTERED_PAGE_LIMIT: u32 = 100;

/// Optional date-range bounds, in unix seconds.
///
/// Both bounds absent means pagination mode; either bound present switches
/// the listing into filter mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateFilter {
    pub from: Option<i64>,
    pub to: Option<i64>,
}

impl DateFilter {
    pub fn is_active(&self) -> bool {
        self.from.is_some() || self.to.is_some()
    }
}

/// Unit used to encode `dateGTE`/`dateLTE` on the wire.
///
/// The endpoint documents transaction dates in unix seconds, so `Seconds`
/// is the default; deployments whose server expects millisecond bounds can
/// select `Millis` via `TXVIEW_DATE_UNIT=millis`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateUnit {
    #[default]
    Seconds,
    Millis,
}

impl DateUnit {
    fn encode(self, epoch_secs: i64) -> i64 {
        match self {
            DateUnit::Seconds => epoch_secs,
            DateUnit::Millis => epoch_secs * 1000,
        }
    }
}

impl FromStr for DateUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "seconds" | "s" => Ok(DateUnit::Seconds),
            "millis" | "milliseconds" | "ms" => Ok(DateUnit::Millis),
            other => Err(format!(
                "unknown date unit {:?} (expected \"seconds\" or \"millis\")",
                other
            )),
        }
    }
}

/// Build the query parameters for one listing request.
///
/// - No filter, no cursor: empty (first unfiltered page).
/// - No filter, cursor present: `startingAfter=<cursor>`.
/// - Filter active: `limit=100` plus whichever of `dateGTE`/`dateLTE` is
///   set; the cursor is dropped.
pub fn build_params(
    cursor: Option<&str>,
    filter: &DateFilter,
    unit: DateUnit,
) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();

    if filter.is_active() {
        params.push(("limit", FILTERED_PAGE_LIMIT.to_string()));
        if let Some(from) = filter.from {
            params.push(("dateGTE", unit.encode(from).to_string()));
        }
        if let Some(to) = filter.to {
            params.push(("dateLTE", unit.encode(to).to_string()));
        }
    } else if let Some(cursor) = cursor {
        params.push(("startingAfter", cursor.to_string()));
    }

    params
}

/// Join base URL and parameters into a display string (logging and tests;
/// the client hands the pairs to reqwest for proper encoding).
pub fn display_url(base: &str, params: &[(&'static str, String)]) -> String {
    if params.is_empty() {
        return base.to_string();
    }
    let query: Vec<String> = params.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
    format!("{}?{}", base, query.join("&"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://assignment.alza.app/transactions";

    #[test]
    fn test_no_filter_no_cursor_is_bare() {
        let params = build_params(None, &DateFilter::default(), DateUnit::Seconds);
        assert!(params.is_empty());
        assert_eq!(display_url(BASE, &params), BASE);
    }

    #[test]
    fn test_cursor_becomes_starting_after() {
        let params = build_params(Some("1"), &DateFilter::default(), DateUnit::Seconds);
        assert_eq!(params, vec![("startingAfter", "1".to_string())]);
        assert_eq!(display_url(BASE, &params), format!("{}?startingAfter=1", BASE));
    }

    #[test]
    fn test_lower_bound_only() {
        let filter = DateFilter {
            from: Some(1000),
            to: None,
        };
        let url = display_url(BASE, &build_params(None, &filter, DateUnit::Seconds));
        assert!(url.contains("limit=100&dateGTE=1000"));
        assert!(!url.contains("startingAfter"));
        assert!(!url.contains("dateLTE"));
    }

    #[test]
    fn test_upper_bound_only() {
        let filter = DateFilter {
            from: None,
            to: Some(2000),
        };
        let params = build_params(None, &filter, DateUnit::Seconds);
        assert_eq!(
            params,
            vec![
                ("limit", "100".to_string()),
                ("dateLTE", "2000".to_string()),
            ]
        );
    }

    #[test]
    fn test_filter_drops_cursor() {
        let filter = DateFilter {
            from: Some(1000),
            to: Some(2000),
        };
        let params = build_params(Some("abc"), &filter, DateUnit::Seconds);
        assert!(params.iter().all(|(k, _)| *k != "startingAfter"));
        assert_eq!(
            params,
            vec![
                ("limit", "100".to_string()),
                ("dateGTE", "1000".to_string()),
                ("dateLTE", "2000".to_string()),
            ]
        );
    }

    #[test]
    fn test_millis_unit_scales_bounds() {
        let filter = DateFilter {
            from: Some(1000),
            to: Some(2000),
        };
        let url = display_url(BASE, &build_params(None, &filter, DateUnit::Millis));
        assert!(url.contains("dateGTE=1000000"));
        assert!(url.contains("dateLTE=2000000"));
    }

    #[test]
    fn test_date_unit_from_str() {
        assert_eq!("seconds".parse::<DateUnit>().unwrap(), DateUnit::Seconds);
        assert_eq!("MS".parse::<DateUnit>().unwrap(), DateUnit::Millis);
        assert_eq!("millis".parse::<DateUnit>().unwrap(), DateUnit::Millis);
        assert!("fortnights".parse::<DateUnit>().is_err());
    }
}
