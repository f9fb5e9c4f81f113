use std::io::Cursor;
use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::{GrayImage, ImageFormat, RgbaImage};
use uuid::Uuid;

use crate::error::{MaskError, MaskResult};

/// The bitmap a mask is drawn over.
///
/// Only its dimensions matter to the mask. The pixels are used for the
/// on-screen preview.
#[derive(Clone)]
pub struct SourceImage {
    id: Uuid,
    pixels: RgbaImage,
}

// Pixel data is too large to be useful in debug output
impl std::fmt::Debug for SourceImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceImage")
            .field("id", &self.id)
            .field("width", &self.pixels.width())
            .field("height", &self.pixels.height())
            .finish()
    }
}

/// Shared, read-only handle to a source image
pub type SourceImageRef = Arc<SourceImage>;

impl SourceImage {
    /// Wrap an RGBA buffer. Fails if either dimension is zero.
    pub fn from_rgba(pixels: RgbaImage) -> MaskResult<Self> {
        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(MaskError::InvalidImage(format!(
                "image has no pixels ({}x{})",
                pixels.width(),
                pixels.height()
            )));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            pixels,
        })
    }

    /// Decode an encoded image (PNG, JPEG or WebP)
    pub fn from_bytes(bytes: &[u8]) -> MaskResult<Self> {
        let decoded = image::load_from_memory(bytes)?;
        log::debug!("Decoded source image: {}x{}", decoded.width(), decoded.height());
        Self::from_rgba(decoded.to_rgba8())
    }

    /// Decode a base64 payload, with or without a `data:<mime>;base64,` header
    pub fn from_base64(payload: &str) -> MaskResult<Self> {
        let data = match payload.split_once(',') {
            Some((header, data)) if header.starts_with("data:") => data,
            _ => payload,
        };
        let bytes = STANDARD.decode(data.trim())?;
        Self::from_bytes(&bytes)
    }

    pub fn new_ref(pixels: RgbaImage) -> MaskResult<SourceImageRef> {
        Ok(Arc::new(Self::from_rgba(pixels)?))
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn size(&self) -> [u32; 2] {
        [self.pixels.width(), self.pixels.height()]
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

/// A black and white selection mask at the source image's native resolution
#[derive(Clone, PartialEq)]
pub struct MaskBitmap {
    image: GrayImage,
    png: Vec<u8>,
}

impl std::fmt::Debug for MaskBitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MaskBitmap")
            .field("width", &self.image.width())
            .field("height", &self.image.height())
            .field("png_len", &self.png.len())
            .finish()
    }
}

impl MaskBitmap {
    /// Encode `image` as PNG and keep both forms
    pub fn encode(image: GrayImage) -> MaskResult<Self> {
        let png = encode_png(&image)?;
        Ok(Self { image, png })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &GrayImage {
        &self.image
    }

    /// Whether the pixel at `(x, y)` is selected. Out-of-range pixels never are.
    pub fn is_selected(&self, x: u32, y: u32) -> bool {
        self.image
            .get_pixel_checked(x, y)
            .is_some_and(|pixel| pixel.0[0] == 255)
    }

    pub fn selected_pixel_count(&self) -> usize {
        self.image.pixels().filter(|pixel| pixel.0[0] == 255).count()
    }

    pub fn png_bytes(&self) -> &[u8] {
        &self.png
    }

    /// The PNG as plain base64, without a data URL header
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.png)
    }

    pub fn to_data_url(&self) -> String {
        format!("data:image/png;base64,{}", self.to_base64())
    }
}

/// Encode a grayscale raster as PNG
pub fn encode_png(image: &GrayImage) -> MaskResult<Vec<u8>> {
    if image.width() == 0 || image.height() == 0 {
        return Err(MaskError::EmptySurface {
            width: image.width(),
            height: image.height(),
        });
    }

    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|err| MaskError::Encoding(err.to_string()))?;
    Ok(bytes)
}
