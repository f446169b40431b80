//! Test doubles and fixtures shared by the CLI tests.

use std::cell::RefCell;

use camino::Utf8PathBuf;
use tempfile::TempDir;
use transit_core::TripSource;
use transit_core::test_support::StubTripSource;

use crate::CliError;
use crate::source::TripSourceBuilder;

/// Hands out one prepared stub per build and records the requested URLs.
#[derive(Debug, Default)]
pub(super) struct StubSourceBuilder {
    source: RefCell<Option<StubTripSource>>,
    base_urls: RefCell<Vec<String>>,
}

impl StubSourceBuilder {
    pub(super) fn new(source: StubTripSource) -> Self {
        Self {
            source: RefCell::new(Some(source)),
            base_urls: RefCell::new(Vec::new()),
        }
    }

    pub(super) fn base_urls(&self) -> Vec<String> {
        self.base_urls.borrow().clone()
    }
}

impl TripSourceBuilder for StubSourceBuilder {
    fn build(&self, base_url: &str) -> Result<Box<dyn TripSource>, CliError> {
        self.base_urls.borrow_mut().push(base_url.to_owned());
        let source = self.source.borrow_mut().take().unwrap_or_default();
        Ok(Box::new(source))
    }
}

/// Temporary directory exposed as a UTF-8 path.
pub(super) fn utf8_tempdir() -> (TempDir, Utf8PathBuf) {
    let tmp = TempDir::new().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
    (tmp, root)
}
