use strum::IntoStaticStr;

/// Imagery mission, serialized as the catalog's collection name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, IntoStaticStr)]
pub enum Platform {
    #[strum(serialize = "SENTINEL-2")]
    Sentinel2,
}

/// Processing level, serialized as the catalog's product type identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, IntoStaticStr)]
pub enum ProcessingLevel {
    #[strum(serialize = "S2MSI1C")]
    L1C,
    #[strum(serialize = "S2MSI2A")]
    L2A,
}
