//! Images used as marker icons.

use crate::error::FriendmapError;

/// An image that has been loaded into memory.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    /// Raw bytes of the image, in RGBA order.
    bytes: Vec<u8>,
    /// Width and height of the image.
    dimensions: (u32, u32),
}

impl DecodedImage {
    /// Decode an image from a byte slice.
    ///
    /// Attempts to guess the format of the image from the data. Non-RGBA images
    /// will be converted to RGBA.
    #[cfg(feature = "image")]
    pub fn decode(bytes: &[u8]) -> Result<Self, FriendmapError> {
        use image::GenericImageView;
        let decoded = image::load_from_memory(bytes)?;
        let dimensions = decoded.dimensions();
        let bytes = decoded.to_rgba8();

        Ok(Self {
            bytes: bytes.into_vec(),
            dimensions,
        })
    }

    /// Creates an image from raw RGBA bytes.
    pub fn from_raw(bytes: Vec<u8>, dimensions: (u32, u32)) -> Result<Self, FriendmapError> {
        let expected = dimensions.0 as usize * dimensions.1 as usize * 4;
        if bytes.len() != expected {
            return Err(FriendmapError::ImageLoad(format!(
                "expected {expected} bytes for a {}x{} RGBA image, got {}",
                dimensions.0,
                dimensions.1,
                bytes.len()
            )));
        }

        Ok(Self { bytes, dimensions })
    }

    /// RGBA bytes of the image.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Width and height in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        self.dimensions
    }
}
