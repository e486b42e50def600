use crate::{
    criteria::SearchCriteria,
    error::{FetchError, Result},
};
use chrono::naive::NaiveDateTime;

/// One catalog entry satisfying a search. The name is the product title
/// the provider uses to derive archive paths.
#[derive(Clone, Debug)]
pub struct ProductCandidate {
    pub id: String,
    pub name: String,
    pub footprint: String,
    pub acquired: NaiveDateTime,
    pub cloud_cover: f64,
}

/// Query side of the imagery catalog. Implemented by the network client
/// and by in-memory fixtures so the pipeline can run against either.
pub trait CatalogClient {
    fn query(&self, criteria: &SearchCriteria) -> Result<Vec<ProductCandidate>>;
}

/// Pick exactly one candidate: lowest cloud cover, ties broken by the most
/// recent acquisition. Total over any non-empty input; an empty input is a
/// legitimate no-data condition, not an internal error.
pub fn select_candidate(candidates: Vec<ProductCandidate>) -> Result<ProductCandidate> {
    candidates
        .into_iter()
        .min_by(|a, b| {
            a.cloud_cover
                .total_cmp(&b.cloud_cover)
                .then(b.acquired.cmp(&a.acquired))
        })
        .ok_or_else(|| {
            FetchError::NoImageryFound(
                "no products match the search criteria; widen the date range or raise the cloud cover ceiling".into(),
            )
        })
}

/// Catalog stub returning a fixed candidate list, used for the demo
/// configuration and for tests.
#[derive(Clone, Debug, Default)]
pub struct FixtureCatalog {
    candidates: Vec<ProductCandidate>,
}

impl FixtureCatalog {
    pub fn new(candidates: Vec<ProductCandidate>) -> Self {
        FixtureCatalog { candidates }
    }
}

impl CatalogClient for FixtureCatalog {
    fn query(&self, _criteria: &SearchCriteria) -> Result<Vec<ProductCandidate>> {
        Ok(self.candidates.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn candidate(id: &str, cloud: f64, day: u32) -> ProductCandidate {
        ProductCandidate {
            id: id.to_string(),
            name: format!("S2A_MSIL1C_{}", id),
            footprint: "POINT(2.3522 48.8566)".to_string(),
            acquired: NaiveDate::from_ymd_opt(2024, 1, day)
                .unwrap()
                .and_hms_opt(10, 30, 0)
                .unwrap(),
            cloud_cover: cloud,
        }
    }

    #[test]
    fn lowest_cloud_wins() {
        let picked = select_candidate(vec![
            candidate("a", 15.0, 10),
            candidate("b", 5.0, 5),
            candidate("c", 30.0, 20),
        ])
        .unwrap();
        assert_eq!(picked.id, "b");
    }

    #[test]
    fn cloud_tie_broken_by_most_recent() {
        let picked = select_candidate(vec![
            candidate("a", 15.0, 10),
            candidate("b", 5.0, 5),
            candidate("c", 5.0, 12),
        ])
        .unwrap();
        assert_eq!(picked.id, "c");
    }

    #[test]
    fn empty_set_is_no_imagery_found() {
        let err = select_candidate(vec![]).unwrap_err();
        assert_eq!(err.kind(), "NoImageryFound");
        assert_eq!(err.status_code(), 404);
    }
}
