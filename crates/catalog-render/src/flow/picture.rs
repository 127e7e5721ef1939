use crate::types::Result;
use printpdf::{RawImage, RawImageData, RawImageFormat};
use std::fmt;
use std::sync::Arc;

/// Decoded raster image, shared between every block that draws it
#[derive(Clone)]
pub struct ImageData {
    raw: Arc<RawImage>,
}

impl ImageData {
    /// Decode PNG/JPEG/GIF/WebP bytes into an RGB raster.
    ///
    /// Fails when the bytes are not a supported image; callers decide whether
    /// that means a placeholder or omission.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let rgb = image::load_from_memory(bytes)?.to_rgb8();
        let (width, height) = rgb.dimensions();

        Ok(Self {
            raw: Arc::new(RawImage {
                pixels: RawImageData::U8(rgb.into_raw()),
                width: width as usize,
                height: height as usize,
                data_format: RawImageFormat::RGB8,
                tag: Vec::new(),
            }),
        })
    }

    pub fn width_px(&self) -> usize {
        self.raw.width
    }

    pub fn height_px(&self) -> usize {
        self.raw.height
    }

    pub(crate) fn raw(&self) -> &RawImage {
        &self.raw
    }

    /// Identity of the shared raster, used to register it only once
    pub(crate) fn key(&self) -> usize {
        Arc::as_ptr(&self.raw) as usize
    }
}

impl fmt::Debug for ImageData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageData")
            .field("width", &self.raw.width)
            .field("height", &self.raw.height)
            .finish()
    }
}
