/**************************************************************************************************
 *                                           Public API
 *************************************************************************************************/
pub use crate::{
    aoi::AreaOfInterest,
    band::{locate_band, BandSpec},
    catalog::{select_candidate, CatalogClient, FixtureCatalog, ProductCandidate},
    config::{Credentials, FetchConfig},
    criteria::{build_criteria, SearchCriteria, DEFAULT_CLOUD_CEILING, DEFAULT_LOOKBACK_DAYS},
    error::{FetchError, Result},
    odata::CopernicusCatalog,
    pipeline::{ImageRequest, Pipeline, RenderedImage},
    platform::{Platform, ProcessingLevel},
    retrieve::{ArchiveHandle, ArchiveRetriever, HttpArchiveRetriever},
    transcode::{transcode_to_jpeg, JPEG_MIME, JPEG_QUALITY},
};
/**************************************************************************************************
 *                                      Private Implementation
 *************************************************************************************************/
mod aoi;
mod band;
mod catalog;
mod config;
mod criteria;
mod error;
mod odata;
mod pipeline;
mod platform;
mod retrieve;
mod transcode;
