use crate::{
    catalog::{CatalogClient, ProductCandidate},
    config::FetchConfig,
    criteria::SearchCriteria,
    error::{http_error, FetchError, Result},
};
use chrono::DateTime;
use serde::Deserialize;

/// Network catalog client for the Copernicus Data Space OData interface.
#[derive(Debug, Clone)]
pub struct CopernicusCatalog {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl CopernicusCatalog {
    pub fn connect(config: &FetchConfig) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|err| FetchError::RetrievalFailed(format!("http client setup: {}", err)))?;

        log::info!("Connected to catalog at: {}", config.catalog_url);

        Ok(CopernicusCatalog {
            http,
            base_url: config.catalog_url.clone(),
        })
    }

    fn build_filter(criteria: &SearchCriteria) -> String {
        let platform: &'static str = criteria.platform.into();
        let level: &'static str = criteria.level.into();

        // ContentDate/Start bounds make both request dates inclusive.
        format!(
            "Collection/Name eq '{}' \
             and OData.CSC.Intersects(area=geography'SRID=4326;{}') \
             and ContentDate/Start ge {}T00:00:00.000Z \
             and ContentDate/Start le {}T23:59:59.999Z \
             and Attributes/OData.CSC.DoubleAttribute/any(att:att/Name eq 'cloudCover' \
             and att/OData.CSC.DoubleAttribute/Value le {}) \
             and Attributes/OData.CSC.StringAttribute/any(att:att/Name eq 'productType' \
             and att/OData.CSC.StringAttribute/Value eq '{}')",
            platform, criteria.footprint, criteria.start, criteria.end, criteria.cloud_ceiling, level
        )
    }
}

impl CatalogClient for CopernicusCatalog {
    fn query(&self, criteria: &SearchCriteria) -> Result<Vec<ProductCandidate>> {
        let url = format!("{}/Products", self.base_url);
        let filter = Self::build_filter(criteria);

        log::debug!("Catalog filter: {}", filter);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("$filter", filter.as_str()),
                ("$orderby", "ContentDate/Start desc"),
                ("$expand", "Attributes"),
                ("$top", "50"),
            ])
            .send()
            .map_err(|err| http_error(err, "catalog query"))?;

        if !response.status().is_success() {
            return Err(FetchError::RetrievalFailed(format!(
                "catalog query returned status {}",
                response.status()
            )));
        }

        let body: ODataResponse = response
            .json()
            .map_err(|err| FetchError::RetrievalFailed(format!("catalog response: {}", err)))?;

        let mut candidates = Vec::with_capacity(body.value.len());
        for product in body.value {
            match product.into_candidate() {
                Ok(candidate) => candidates.push(candidate),
                Err(err) => {
                    log::warn!("Skipping malformed catalog entry: {}", err);
                }
            }
        }

        log::info!("Catalog returned {} candidate(s)", candidates.len());
        Ok(candidates)
    }
}

#[derive(Debug, Deserialize)]
struct ODataResponse {
    #[serde(default)]
    value: Vec<ODataProduct>,
}

#[derive(Debug, Deserialize)]
struct ODataProduct {
    #[serde(rename = "Id")]
    id: String,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Footprint", default)]
    footprint: Option<String>,
    #[serde(rename = "ContentDate")]
    content_date: ContentDate,
    #[serde(rename = "Attributes", default)]
    attributes: Vec<ODataAttribute>,
}

#[derive(Debug, Deserialize)]
struct ContentDate {
    #[serde(rename = "Start")]
    start: String,
}

#[derive(Debug, Deserialize)]
struct ODataAttribute {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Value")]
    value: serde_json::Value,
}

impl ODataProduct {
    fn into_candidate(self) -> Result<ProductCandidate> {
        let acquired = DateTime::parse_from_rfc3339(&self.content_date.start)
            .map_err(|err| {
                FetchError::RetrievalFailed(format!(
                    "bad acquisition date '{}': {}",
                    self.content_date.start, err
                ))
            })?
            .naive_utc();

        let cloud_cover = self
            .attributes
            .iter()
            .find(|att| att.name == "cloudCover")
            .and_then(|att| att.value.as_f64())
            .unwrap_or_else(|| {
                // Products lacking the attribute sort last rather than
                // being dropped from consideration.
                log::debug!("No cloudCover attribute on {}", self.name);
                100.0
            });

        Ok(ProductCandidate {
            id: self.id,
            name: self.name,
            footprint: self.footprint.unwrap_or_default(),
            acquired,
            cloud_cover,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{aoi::AreaOfInterest, criteria::build_criteria};
    use chrono::NaiveDate;

    #[test]
    fn filter_includes_all_constraints() {
        let aoi = AreaOfInterest::point(48.8566, 2.3522).unwrap();
        let criteria = build_criteria(
            &aoi,
            Some("2024-01-01"),
            Some("2024-01-31"),
            Some(10),
            None,
            None,
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        )
        .unwrap();

        let filter = CopernicusCatalog::build_filter(&criteria);
        assert!(filter.contains("Collection/Name eq 'SENTINEL-2'"));
        assert!(filter.contains("SRID=4326;POINT(2.3522 48.8566)"));
        assert!(filter.contains("ContentDate/Start ge 2024-01-01T00:00:00.000Z"));
        assert!(filter.contains("ContentDate/Start le 2024-01-31T23:59:59.999Z"));
        assert!(filter.contains("'cloudCover' and att/OData.CSC.DoubleAttribute/Value le 10"));
        assert!(filter.contains("'productType' and att/OData.CSC.StringAttribute/Value eq 'S2MSI1C'"));
    }

    #[test]
    fn catalog_entry_parses_into_candidate() {
        let raw = r#"{
            "Id": "4d6c5d7c",
            "Name": "S2A_MSIL1C_20240115T105321",
            "Footprint": "POLYGON((2 48,3 48,3 49,2 48))",
            "ContentDate": { "Start": "2024-01-15T10:53:21.024Z" },
            "Attributes": [
                { "Name": "cloudCover", "Value": 7.5 },
                { "Name": "productType", "Value": "S2MSI1C" }
            ]
        }"#;

        let product: ODataProduct = serde_json::from_str(raw).unwrap();
        let candidate = product.into_candidate().unwrap();
        assert_eq!(candidate.id, "4d6c5d7c");
        assert_eq!(candidate.cloud_cover, 7.5);
        assert_eq!(
            candidate.acquired,
            NaiveDate::from_ymd_opt(2024, 1, 15)
                .unwrap()
                .and_hms_micro_opt(10, 53, 21, 24000)
                .unwrap()
        );
    }

    #[test]
    fn missing_cloud_cover_sorts_last() {
        let raw = r#"{
            "Id": "x",
            "Name": "S2A_MSIL1C_20240115T105321",
            "ContentDate": { "Start": "2024-01-15T10:53:21Z" }
        }"#;

        let product: ODataProduct = serde_json::from_str(raw).unwrap();
        let candidate = product.into_candidate().unwrap();
        assert_eq!(candidate.cloud_cover, 100.0);
    }
}
