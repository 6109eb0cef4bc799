//! Catalog entities: albums, their photos (chapters), and the photos' images.
//!
//! Path rules address entity fields by name through [`FieldSource`].

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Index;
use std::sync::Arc;

use crate::naming::{filename_from_url_path, is_gif, split_suffix};

/// Why a named field could not be read from an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// The entity knows the field but has no value for it (e.g. an album without authors).
    Missing(String),
    /// The entity has no field with this name.
    Unknown(String),
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::Missing(name) => write!(f, "field `{}` has no value", name),
            FieldError::Unknown(name) => write!(f, "no field named `{}`", name),
        }
    }
}

impl std::error::Error for FieldError {}

/// Entities whose fields can be addressed by path rules.
pub trait FieldSource {
    /// Returns the string form of the named field.
    fn field(&self, name: &str) -> Result<String, FieldError>;

    /// Short human description used in error messages (e.g. `album 350234`).
    fn describe(&self) -> String;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Album {
    pub id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub tags: Vec<String>,
    pub page_count: u32,
    pub pub_date: String,
    pub update_date: String,
    /// Site-specific fields not modelled above.
    pub extra: BTreeMap<String, String>,
}

impl Album {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    /// First listed author, if any.
    pub fn author(&self) -> Option<&str> {
        self.authors.first().map(String::as_str)
    }
}

impl FieldSource for Album {
    fn field(&self, name: &str) -> Result<String, FieldError> {
        match name {
            "id" => Ok(self.id.clone()),
            "title" | "name" => Ok(self.title.clone()),
            "author" => self
                .author()
                .map(str::to_string)
                .ok_or_else(|| FieldError::Missing(name.to_string())),
            "authors" => Ok(self.authors.join(" ")),
            "tags" => Ok(self.tags.join(" ")),
            "page_count" => Ok(self.page_count.to_string()),
            "pub_date" => Ok(self.pub_date.clone()),
            "update_date" => Ok(self.update_date.clone()),
            other => extra_field(&self.extra, other),
        }
    }

    fn describe(&self) -> String {
        format!("album {}", self.id)
    }
}

/// One chapter of an album, holding its ordered images.
#[derive(Debug, Clone, Default)]
pub struct Photo {
    pub id: String,
    pub title: String,
    /// 1-based position of this chapter within its album.
    pub index: u32,
    pub scramble_id: u64,
    /// Owning album, when known.
    pub album: Option<Arc<Album>>,
    pub images: Vec<Image>,
    pub extra: BTreeMap<String, String>,
}

impl Photo {
    pub fn new(id: impl Into<String>, title: impl Into<String>, index: u32) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            index,
            ..Self::default()
        }
    }

    pub fn with_album(mut self, album: Arc<Album>) -> Self {
        self.album = Some(album);
        self
    }

    /// Appends images built from `urls`, numbering them from the current length.
    /// URLs without a usable filename are skipped.
    pub fn with_image_urls<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for url in urls {
            let index = self.images.len() + 1;
            if let Some(image) = Image::from_url(url.as_ref(), &self.id, self.scramble_id, index) {
                self.images.push(image);
            } else {
                tracing::warn!(photo = %self.id, url = url.as_ref(), "skipping image url without filename");
            }
        }
        self
    }

    pub fn album(&self) -> Option<&Album> {
        self.album.as_deref()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn image(&self, index: usize) -> Option<&Image> {
        self.images.get(index)
    }
}

impl Index<usize> for Photo {
    type Output = Image;

    fn index(&self, index: usize) -> &Image {
        &self.images[index]
    }
}

impl FieldSource for Photo {
    fn field(&self, name: &str) -> Result<String, FieldError> {
        match name {
            "id" => Ok(self.id.clone()),
            "title" | "name" => Ok(self.title.clone()),
            "index" | "sort" => Ok(self.index.to_string()),
            "scramble_id" => Ok(self.scramble_id.to_string()),
            "album_id" => self
                .album()
                .map(|a| a.id.clone())
                .ok_or_else(|| FieldError::Missing(name.to_string())),
            "page_count" => Ok(self.images.len().to_string()),
            other => extra_field(&self.extra, other),
        }
    }

    fn describe(&self) -> String {
        format!("photo {}", self.id)
    }
}

fn extra_field(extra: &BTreeMap<String, String>, name: &str) -> Result<String, FieldError> {
    extra
        .get(name)
        .cloned()
        .ok_or_else(|| FieldError::Unknown(name.to_string()))
}

/// A single image of a photo. `photo_id` is a back-reference by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub url: String,
    /// Base filename without suffix (e.g. `00001`).
    pub name: String,
    /// Original suffix with its dot (e.g. `.webp`).
    pub suffix: String,
    /// 1-based position within the photo.
    pub index: usize,
    pub photo_id: String,
    pub scramble_id: u64,
}

impl Image {
    /// Builds an image from its URL; `None` if the URL has no filename.
    pub fn from_url(url: &str, photo_id: &str, scramble_id: u64, index: usize) -> Option<Self> {
        let filename = filename_from_url_path(url)?;
        let (name, suffix) = split_suffix(&filename);
        Some(Self {
            url: url.to_string(),
            name: name.to_string(),
            suffix: suffix.to_string(),
            index,
            photo_id: photo_id.to_string(),
            scramble_id,
        })
    }

    /// Animated images are stored as-is. Same rule as the transfer decision.
    pub fn is_animated(&self) -> bool {
        is_gif(&self.suffix)
    }
}
