//! Asynchronous loading of marker icons.

use std::future::Future;

use maybe_sync::{MaybeSend, MaybeSync};

use crate::decoded_image::DecodedImage;
use crate::error::FriendmapError;

/// Loads the image an [`Entity`](crate::Entity) refers to.
///
/// The returned future is executed on a background task; [`MarkerManager`](crate::MarkerManager) posts its result
/// back into the owner context before touching any marker.
pub trait ImageLoader: MaybeSend + MaybeSync {
    /// Loads and decodes the image referenced by `image_url`.
    fn load(
        &self,
        image_url: &str,
    ) -> impl Future<Output = Result<DecodedImage, FriendmapError>> + MaybeSend;
}

/// Downloads images over HTTP(S) and decodes them.
#[cfg(feature = "image")]
#[derive(Debug, Clone)]
pub struct UrlImageLoader {
    http_client: reqwest::Client,
    offline_mode: bool,
}

#[cfg(feature = "image")]
impl UrlImageLoader {
    /// Creates a new loader.
    pub fn new() -> Result<Self, FriendmapError> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("friendmap/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http_client,
            offline_mode: false,
        })
    }

    /// If offline mode is enabled, the loader does not attempt to download anything and every request fails with
    /// [`FriendmapError::NotFound`]. Markers then keep their default icons.
    pub fn set_offline_mode(&mut self, enabled: bool) {
        self.offline_mode = enabled;
    }

    async fn load_bytes(&self, url: &str) -> Result<bytes::Bytes, FriendmapError> {
        if self.offline_mode {
            return Err(FriendmapError::NotFound);
        }

        log::info!("Loading {url}");
        let response = self.http_client.get(url).send().await?;
        if !response.status().is_success() {
            log::info!("Failed to load {url}: {}", response.status());
            return Err(FriendmapError::IO);
        }

        Ok(response.bytes().await?)
    }
}

#[cfg(feature = "image")]
impl ImageLoader for UrlImageLoader {
    async fn load(&self, image_url: &str) -> Result<DecodedImage, FriendmapError> {
        let bytes = self.load_bytes(image_url).await?;
        DecodedImage::decode(&bytes)
    }
}
