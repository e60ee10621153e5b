//! Image ingestion: upload gates, then decode → resize → JPEG re-encode →
//! size check, with one stricter pass when the first result is too big.

use actix_multipart::Multipart;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use futures::TryStreamExt;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::DynamicImage;
use tracing::{debug, info};

use crate::error::CatalogError;
use crate::settings::{CompressionPass, ImageSettings};

/// A file pulled out of a multipart upload.
#[derive(Debug, Clone)]
pub struct Upload {
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub data_url: String,
    pub width: u32,
    pub height: u32,
}

impl EncodedImage {
    /// Bytes the data URL would decode to, using the 4:3 base64 ratio over
    /// the whole string.
    pub fn estimated_bytes(&self) -> usize {
        self.data_url.len() * 3 / 4
    }

    /// Whether `len × 0.75` is strictly above `budget`.
    pub fn exceeds(&self, budget: usize) -> bool {
        self.data_url.len() * 3 > budget * 4
    }
}

pub fn is_image_type(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| ct.trim().to_ascii_lowercase().starts_with("image/"))
}

/// Reads the first multipart field. The content type is checked before any
/// bytes are read, and reading stops as soon as `max_bytes` is exceeded.
pub async fn read_upload(mut payload: Multipart, max_bytes: usize) -> Result<Upload, CatalogError> {
    let mut field = payload
        .try_next()
        .await
        .map_err(|e| CatalogError::ImageProcessingFailed(e.to_string()))?
        .ok_or_else(|| CatalogError::ImageProcessingFailed("upload contained no file".to_string()))?;

    let content_type = field.content_type().map(|mime| mime.essence_str().to_string());
    if !is_image_type(content_type.as_deref()) {
        return Err(CatalogError::InvalidFileType);
    }

    let mut bytes = Vec::new();
    while let Some(chunk) = field
        .try_next()
        .await
        .map_err(|e| CatalogError::ImageProcessingFailed(e.to_string()))?
    {
        if bytes.len() + chunk.len() > max_bytes {
            return Err(CatalogError::FileTooLarge { limit: max_bytes });
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(Upload { content_type, bytes })
}

/// Target size that fits `max × max`, keeping the aspect ratio. The longer
/// side is clamped; images already inside the bound are left alone.
pub fn fit_within(width: u32, height: u32, max: u32) -> (u32, u32) {
    let (w, h, max) = (width as f64, height as f64, max as f64);
    let (w, h) = if w > h {
        if w > max {
            (max, h * max / w)
        } else {
            (w, h)
        }
    } else if h > max {
        (w * max / h, max)
    } else {
        (w, h)
    };
    ((w as u32).max(1), (h as u32).max(1))
}

fn decode(bytes: &[u8]) -> Result<DynamicImage, CatalogError> {
    image::load_from_memory(bytes).map_err(|e| CatalogError::ImageProcessingFailed(format!("decode: {}", e)))
}

fn resize(img: &DynamicImage, pass: &CompressionPass) -> DynamicImage {
    let (width, height) = fit_within(img.width(), img.height(), pass.max_dimension);
    if (width, height) == (img.width(), img.height()) {
        return img.clone();
    }
    img.resize_exact(width, height, FilterType::Triangle)
}

fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>, CatalogError> {
    let rgb = img.to_rgb8();
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality)
        .encode_image(&rgb)
        .map_err(|e| CatalogError::ImageProcessingFailed(format!("encode: {}", e)))?;
    Ok(buf)
}

fn to_data_url(jpeg: &[u8]) -> String {
    format!("data:image/jpeg;base64,{}", STANDARD.encode(jpeg))
}

/// One resize + re-encode pass over a decoded image.
pub fn compress(img: &DynamicImage, pass: &CompressionPass) -> Result<EncodedImage, CatalogError> {
    let resized = resize(img, pass);
    let jpeg = encode_jpeg(&resized, pass.jpeg_quality())?;
    let encoded = EncodedImage {
        data_url: to_data_url(&jpeg),
        width: resized.width(),
        height: resized.height(),
    };
    debug!(
        width = encoded.width,
        height = encoded.height,
        quality = pass.jpeg_quality(),
        estimated_bytes = encoded.estimated_bytes(),
        "compression pass"
    );
    Ok(encoded)
}

/// Full ingestion of an uploaded file into an inline data URL.
pub fn ingest(upload: &Upload, settings: &ImageSettings) -> Result<EncodedImage, CatalogError> {
    if !is_image_type(upload.content_type.as_deref()) {
        return Err(CatalogError::InvalidFileType);
    }
    if upload.bytes.len() > settings.max_upload_bytes {
        return Err(CatalogError::FileTooLarge {
            limit: settings.max_upload_bytes,
        });
    }

    let img = decode(&upload.bytes)?;
    let first = compress(&img, &settings.first_pass)?;
    if !first.exceeds(settings.size_budget_bytes) {
        info!(estimated_bytes = first.estimated_bytes(), "image ingested");
        return Ok(first);
    }

    // The stricter pass is final even if it is still over budget.
    let second = compress(&img, &settings.second_pass)?;
    info!(
        first_estimate = first.estimated_bytes(),
        estimated_bytes = second.estimated_bytes(),
        "image ingested after second pass"
    );
    Ok(second)
}
