//! Single-image entity: fetch, validate, derive
//!
//! Construction fetches the image's page, scrapes the head metadata, and
//! eagerly checks that every required field is derivable. A missing
//! backing key means the identifier refers to a removed, private, or
//! malformed resource and the whole construction fails.

use std::fmt;

use crate::constants::{endpoints, markup};
use crate::errors::{FetchError, FetchResult};

use super::client::SourceOpener;
use super::models::{MetaMap, Resolution};
use super::parser::meta::MetaCollector;
use super::validate::{
    describe_entity, validate_identifier, validate_required, Accessor, DOT_SUFFIX,
};

/// One Imgur image and its frozen page metadata
#[derive(Debug, Clone)]
pub struct Image {
    tag: String,
    meta: MetaMap,
}

/// Required derived properties, evaluated in this order after collection
const REQUIRED: [(&str, Accessor<Image>); 4] = [
    ("title", |image: &Image| image.title().map(|_| ())),
    ("resolution", |image: &Image| image.resolution().map(|_| ())),
    ("extension", |image: &Image| image.extension().map(|_| ())),
    ("url", |image: &Image| image.url().map(|_| ())),
];

impl Image {
    /// Fetch and validate one image by identifier.
    ///
    /// The identifier is checked against the grammar before any network
    /// call; metadata collection stops at the end of the page head.
    pub fn fetch(
        opener: &dyn SourceOpener,
        identifier: &str,
        chunk_size: usize,
    ) -> FetchResult<Self> {
        let tag = validate_identifier(identifier)?;
        let url = endpoints::expand(endpoints::IMAGE_PAGE, &tag);
        tracing::debug!("fetching image metadata from {}", url);

        let mut source = opener.open(&url)?;
        let meta = MetaCollector::new().collect_all(&mut *source, chunk_size)?;
        Self::assemble(tag, meta)
    }

    /// Validate collected metadata and freeze the entity
    fn assemble(tag: String, meta: MetaMap) -> FetchResult<Self> {
        let image = Self { tag, meta };
        validate_required(&image, &REQUIRED)?;
        Ok(image)
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// CDN asset location; the literal extension in it is arbitrary
    pub fn asset_url(&self) -> String {
        endpoints::expand(endpoints::ASSET, &self.tag)
    }

    fn require(&self, key: &str) -> FetchResult<&str> {
        self.meta.get(key).ok_or_else(|| FetchError::MetadataIncomplete {
            identifier: self.tag.clone(),
            key: key.to_string(),
        })
    }

    fn numeric(&self, key: &str) -> FetchResult<u32> {
        let value = self.require(key)?;
        value.parse().map_err(|_| FetchError::MalformedMetadata {
            identifier: self.tag.clone(),
            key: key.to_string(),
            value: value.to_string(),
        })
    }

    /// Image title
    pub fn title(&self) -> FetchResult<&str> {
        self.require(markup::TITLE_KEY)
    }

    /// Canonical page link provided by Imgur
    pub fn url(&self) -> FetchResult<&str> {
        self.require(markup::URL_KEY)
    }

    /// Pixel resolution parsed from the width/height metadata
    pub fn resolution(&self) -> FetchResult<Resolution> {
        let x = self.numeric(markup::WIDTH_KEY)?;
        let y = self.numeric(markup::HEIGHT_KEY)?;
        Ok(Resolution { x, y })
    }

    /// File extension without the period prefix, recovered from the
    /// image-URL metadata value
    pub fn extension(&self) -> FetchResult<&str> {
        let value = self.require(markup::IMAGE_URL_KEY)?;
        DOT_SUFFIX
            .captures(value)
            .and_then(|captures| captures.get(1))
            .map(|suffix| suffix.as_str())
            .ok_or_else(|| FetchError::MalformedMetadata {
                identifier: self.tag.clone(),
                key: markup::IMAGE_URL_KEY.to_string(),
                value: value.to_string(),
            })
    }

    /// Author, when the page declares one
    pub fn author(&self) -> Option<&str> {
        self.meta.get(markup::AUTHOR_KEY)
    }

    /// Copyright notice, when the page declares one
    pub fn copyright(&self) -> Option<&str> {
        self.meta.get(markup::COPYRIGHT_KEY)
    }

    pub fn description(&self) -> Option<&str> {
        self.meta.get(markup::DESCRIPTION_KEY)
    }

    /// Comma-separated keyword list
    pub fn keywords(&self) -> Option<Vec<&str>> {
        self.meta
            .get(markup::KEYWORDS_KEY)
            .map(|list| list.split(", ").collect())
    }
}

impl fmt::Display for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", describe_entity("image", &self.tag, self.title().ok()))
    }
}
