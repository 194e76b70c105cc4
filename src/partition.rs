//! Cutting a source image into tiles, and getting an image to cut in the first place.
//!
//! Tiles are produced in row-major order: tile `i` covers row `i / cols`, column `i % cols` of
//! the source. Tile sizes are floored to whole pixels, so any remainder on the right and bottom
//! edges of the source is dropped rather than spread across tiles.

use std::collections::HashMap;
use std::io::Cursor;

use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, ImageReader, RgbaImage};
use tracing::debug;

use crate::config::UploadLimits;
use crate::error::{PuzzleError, Result, UploadRejection};

/// One piece of the puzzle.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    /// Stable identity, equal to the tile's home cell.
    pub id: usize,
    /// The pixels this tile shows.
    pub image: RgbaImage,
}

/// Looks up pre-registered images by identifier.
pub trait ImageCatalog {
    /// The encoded bytes of the image registered as `id`.
    fn fetch(&self, id: &str) -> Result<Vec<u8>>;
}

/// A catalog held entirely in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryCatalog {
    images: HashMap<String, Vec<u8>>,
}

impl MemoryCatalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register encoded image bytes under `id`, replacing any previous entry.
    pub fn insert(&mut self, id: impl Into<String>, bytes: Vec<u8>) {
        self.images.insert(id.into(), bytes);
    }
}

impl ImageCatalog for MemoryCatalog {
    fn fetch(&self, id: &str) -> Result<Vec<u8>> {
        self.images
            .get(id)
            .cloned()
            .ok_or_else(|| PuzzleError::ImageLoad(format!("no image registered as {id:?}")))
    }
}

/// Where the picture for a puzzle comes from.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// An image registered in an [`ImageCatalog`].
    Registered(String),
    /// Encoded bytes in any supported raster format (PNG, JPEG, WebP).
    Encoded(Vec<u8>),
    /// An image that has already been decoded, e.g. by [`prepare_upload`].
    Decoded(DynamicImage),
}

impl ImageSource {
    /// Turn this source into pixels, fetching from `catalog` when needed.
    pub fn decode(self, catalog: &dyn ImageCatalog) -> Result<DynamicImage> {
        match self {
            ImageSource::Registered(id) => decode_bytes(&catalog.fetch(&id)?),
            ImageSource::Encoded(bytes) => decode_bytes(&bytes),
            ImageSource::Decoded(image) => Ok(image),
        }
    }
}

fn decode_bytes(bytes: &[u8]) -> Result<DynamicImage> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| PuzzleError::ImageLoad(e.to_string()))?;
    Ok(reader.decode()?)
}

/// Cut `image` into `rows * cols` tiles in row-major order.
///
/// Each tile is `floor(width / cols)` by `floor(height / rows)` pixels. Fails with
/// [`PuzzleError::CanvasUnavailable`] when that size is zero in either direction. The source is
/// left untouched.
pub fn partition(image: &DynamicImage, rows: u32, cols: u32) -> Result<Vec<Tile>> {
    let (width, height) = image.dimensions();
    let piece_width = width.checked_div(cols).unwrap_or(0);
    let piece_height = height.checked_div(rows).unwrap_or(0);
    if piece_width == 0 || piece_height == 0 {
        return Err(PuzzleError::CanvasUnavailable {
            width: piece_width,
            height: piece_height,
        });
    }

    let source = image.to_rgba8();
    let mut tiles = Vec::with_capacity((rows * cols) as usize);
    for row in 0..rows {
        for col in 0..cols {
            let view = imageops::crop_imm(
                &source,
                col * piece_width,
                row * piece_height,
                piece_width,
                piece_height,
            );
            tiles.push(Tile {
                id: tiles.len(),
                image: view.to_image(),
            });
        }
    }

    debug!(
        rows,
        cols, piece_width, piece_height, "partitioned {width}x{height} image"
    );
    Ok(tiles)
}

/// Validate a user supplied image and shrink it to a playable size.
///
/// Payloads over `limits.max_bytes`, payloads that are not a recognised image format and images
/// with a side shorter than `limits.min_dimension` are rejected. Images with a side longer than
/// `limits.max_dimension` are scaled down, keeping their aspect ratio, so the longer side equals
/// the limit.
pub fn prepare_upload(bytes: &[u8], limits: &UploadLimits) -> Result<DynamicImage> {
    if bytes.len() > limits.max_bytes {
        return Err(UploadRejection::TooLarge {
            size: bytes.len(),
            limit: limits.max_bytes,
        }
        .into());
    }
    let format = image::guess_format(bytes).map_err(|_| UploadRejection::NotAnImage)?;
    let image = image::load_from_memory_with_format(bytes, format)?;

    let (width, height) = image.dimensions();
    if width < limits.min_dimension || height < limits.min_dimension {
        return Err(UploadRejection::TooSmall {
            width,
            height,
            min: limits.min_dimension,
        }
        .into());
    }

    let max = limits.max_dimension;
    if width <= max && height <= max {
        return Ok(image);
    }
    let (new_width, new_height) = if width > height {
        (max, scale_side(height, max, width))
    } else {
        (scale_side(width, max, height), max)
    };
    debug!("downscaling upload from {width}x{height} to {new_width}x{new_height}");
    Ok(image.resize_exact(new_width, new_height, FilterType::Triangle))
}

fn scale_side(side: u32, target: u32, longest: u32) -> u32 {
    ((side as f64 * target as f64 / longest as f64).round() as u32).max(1)
}
