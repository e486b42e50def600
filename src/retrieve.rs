use crate::{
    catalog::ProductCandidate,
    config::{Credentials, FetchConfig},
    error::{http_error, FetchError, Result},
};
use std::{
    fs::{create_dir_all, File},
    io::{copy, Cursor},
    path::Path,
};
use tempfile::TempDir;
use zip::ZipArchive;

/// Request-scoped working directory holding one retrieved product tree.
/// The backing storage is reclaimed when the handle drops, on every exit
/// path of the pipeline.
#[derive(Debug)]
pub struct ArchiveHandle {
    dir: TempDir,
}

impl ArchiveHandle {
    pub fn create() -> Result<Self> {
        let dir = TempDir::new().map_err(|err| {
            FetchError::RetrievalFailed(format!("cannot create working directory: {}", err))
        })?;

        log::debug!("Created working directory: {:?}", dir.path());
        Ok(ArchiveHandle { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

/// Download side of the imagery provider: materializes the product's full
/// nested directory tree under `dest` before returning.
pub trait ArchiveRetriever {
    fn retrieve(&self, product: &ProductCandidate, dest: &Path) -> Result<()>;
}

/// Network retriever downloading the product zip and unpacking it locally.
#[derive(Debug, Clone)]
pub struct HttpArchiveRetriever {
    http: reqwest::blocking::Client,
    base_url: String,
    credentials: Option<Credentials>,
}

impl HttpArchiveRetriever {
    pub fn connect(config: &FetchConfig) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|err| FetchError::RetrievalFailed(format!("http client setup: {}", err)))?;

        Ok(HttpArchiveRetriever {
            http,
            base_url: config.download_url.clone(),
            credentials: config.credentials.clone(),
        })
    }
}

impl ArchiveRetriever for HttpArchiveRetriever {
    fn retrieve(&self, product: &ProductCandidate, dest: &Path) -> Result<()> {
        let url = format!("{}/Products({})/$value", self.base_url, product.id);
        log::info!("Downloading archive for product: {}", product.name);

        let mut request = self.http.get(&url);
        if let Some(credentials) = &self.credentials {
            request = request.bearer_auth(&credentials.token);
        }

        let response = request
            .send()
            .map_err(|err| http_error(err, "archive download"))?;

        if !response.status().is_success() {
            return Err(FetchError::RetrievalFailed(format!(
                "archive download returned status {}",
                response.status()
            )));
        }

        let data = response
            .bytes()
            .map_err(|err| http_error(err, "archive download body"))?;

        log::debug!("Downloaded {} bytes for {}", data.len(), product.name);
        unpack_zip(&data, dest)
    }
}

/// Unpack the downloaded archive, recreating its nested directory layout.
/// Entries whose names would escape `dest` are skipped.
fn unpack_zip(data: &[u8], dest: &Path) -> Result<()> {
    let mut archive = ZipArchive::new(Cursor::new(data))
        .map_err(|err| FetchError::RetrievalFailed(format!("bad archive: {}", err)))?;

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|err| FetchError::RetrievalFailed(format!("bad archive entry: {}", err)))?;

        let relative = match entry.enclosed_name() {
            Some(path) => path,
            None => {
                log::warn!("Skipping archive entry with unsafe name: {}", entry.name());
                continue;
            }
        };

        let out_path = dest.join(relative);

        if entry.is_dir() {
            create_dir_all(&out_path).map_err(io_error)?;
        } else {
            if let Some(parent) = out_path.parent() {
                create_dir_all(parent).map_err(io_error)?;
            }
            let mut out = File::create(&out_path).map_err(io_error)?;
            copy(&mut entry, &mut out).map_err(io_error)?;
            log::debug!("Unpacked {:?}", out_path);
        }
    }

    Ok(())
}

fn io_error(err: std::io::Error) -> FetchError {
    FetchError::RetrievalFailed(format!("local storage: {}", err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    #[test]
    fn handle_reclaims_storage_on_drop() {
        let handle = ArchiveHandle::create().unwrap();
        let root = handle.path().to_path_buf();
        std::fs::write(root.join("leftover.dat"), b"x").unwrap();
        assert!(root.exists());

        drop(handle);
        assert!(!root.exists());
    }

    #[test]
    fn unpack_recreates_nested_tree() {
        let mut buf = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buf);
            let options = SimpleFileOptions::default();
            writer.add_directory("PRODUCT.SAFE/GRANULE", options).unwrap();
            writer
                .start_file("PRODUCT.SAFE/GRANULE/IMG_DATA/T31UDQ_TCI_10m.jp2", options)
                .unwrap();
            writer.write_all(b"raster bytes").unwrap();
            writer.finish().unwrap();
        }

        let handle = ArchiveHandle::create().unwrap();
        unpack_zip(buf.get_ref(), handle.path()).unwrap();

        let band = handle
            .path()
            .join("PRODUCT.SAFE/GRANULE/IMG_DATA/T31UDQ_TCI_10m.jp2");
        assert_eq!(std::fs::read(band).unwrap(), b"raster bytes");
    }

    #[test]
    fn corrupt_archive_is_retrieval_failure() {
        let handle = ArchiveHandle::create().unwrap();
        let err = unpack_zip(b"not a zip file", handle.path()).unwrap_err();
        assert_eq!(err.kind(), "RetrievalFailed");
    }
}
