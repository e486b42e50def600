use crate::{
    aoi::AreaOfInterest,
    band::{locate_band, BandSpec},
    catalog::{select_candidate, CatalogClient},
    config::FetchConfig,
    criteria::build_criteria,
    error::Result,
    odata::CopernicusCatalog,
    retrieve::{ArchiveHandle, ArchiveRetriever, HttpArchiveRetriever},
    transcode::{transcode_to_jpeg, JPEG_MIME},
};
use chrono::{naive::NaiveDateTime, Utc};
use serde::Deserialize;

/// Inbound request payload, already JSON-validated by the HTTP layer.
/// Either `latitude`/`longitude` or `polygon` ([lon, lat] ring) selects the
/// area of interest; dates and cloud ceiling are optional.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ImageRequest {
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub polygon: Option<Vec<[f64; 2]>>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub cloud_coverage: Option<u8>,
}

/// The delivered image plus the product metadata the HTTP layer echoes
/// back to the caller. Lives only until the response is sent.
#[derive(Clone, Debug)]
pub struct RenderedImage {
    pub bytes: Vec<u8>,
    pub mime: &'static str,
    pub product_name: String,
    pub acquired: NaiveDateTime,
    pub cloud_cover: f64,
}

/// One acquisition pipeline with injected collaborators. A single instance
/// may serve concurrent requests; every request gets its own working
/// directory, so nothing is shared between them besides the read-only
/// clients.
pub struct Pipeline<C, R> {
    catalog: C,
    retriever: R,
    band: BandSpec,
}

impl Pipeline<CopernicusCatalog, HttpArchiveRetriever> {
    /// Wire up the network clients from process configuration.
    pub fn connect(config: &FetchConfig) -> Result<Self> {
        let catalog = CopernicusCatalog::connect(config)?;
        let retriever = HttpArchiveRetriever::connect(config)?;
        Ok(Pipeline::new(catalog, retriever, BandSpec::default()))
    }
}

impl<C, R> Pipeline<C, R>
where
    C: CatalogClient,
    R: ArchiveRetriever,
{
    pub fn new(catalog: C, retriever: R, band: BandSpec) -> Self {
        Pipeline {
            catalog,
            retriever,
            band,
        }
    }

    /// Run all six stages for one request, strictly in order. The working
    /// directory is dropped on every exit path, so a failed request leaves
    /// no ephemeral storage behind.
    pub fn retrieve_image(&self, request: &ImageRequest) -> Result<RenderedImage> {
        let aoi = AreaOfInterest::resolve(
            request.latitude,
            request.longitude,
            request.polygon.as_deref(),
        )?;

        let criteria = build_criteria(
            &aoi,
            request.start_date.as_deref(),
            request.end_date.as_deref(),
            request.cloud_coverage,
            None,
            None,
            Utc::now().date_naive(),
        )?;

        log::info!(
            "Searching {} from {} to {} (cloud <= {}%)",
            criteria.footprint,
            criteria.start,
            criteria.end,
            criteria.cloud_ceiling
        );

        let candidates = self.catalog.query(&criteria)?;
        let product = select_candidate(candidates)?;

        log::info!(
            "Selected product {} acquired {} with {:.1}% cloud cover",
            product.name,
            product.acquired,
            product.cloud_cover
        );

        let workdir = ArchiveHandle::create()?;
        self.retriever.retrieve(&product, workdir.path())?;

        let band_file = locate_band(workdir.path(), &self.band)?;
        let bytes = transcode_to_jpeg(&band_file)?;

        Ok(RenderedImage {
            bytes,
            mime: JPEG_MIME,
            product_name: product.name,
            acquired: product.acquired,
            cloud_cover: product.cloud_cover,
        })
    }
}
