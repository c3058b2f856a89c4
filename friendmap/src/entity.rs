//! Entities are the items placed on the map.

use std::sync::Arc;

use friendmap_types::geo::impls::GeoPoint2d;
use maybe_sync::{MaybeSend, MaybeSync};
use serde::{Deserialize, Serialize};

use crate::decoded_image::DecodedImage;

/// An item with a geographic position that is displayed on the map.
pub trait Entity: MaybeSend + MaybeSync {
    /// Stable identifier of the entity.
    fn id(&self) -> &str;
    /// Name shown as a marker title.
    fn name(&self) -> &str;
    /// Position of the entity.
    fn position(&self) -> GeoPoint2d;
    /// Reference to the entity's image, passed to the [`ImageLoader`](crate::ImageLoader).
    fn image_url(&self) -> &str;
    /// The image if it is already loaded.
    fn image(&self) -> Option<Arc<DecodedImage>>;

    /// Returns true if the image does not need to be loaded.
    fn is_image_loaded(&self) -> bool {
        self.image().is_some()
    }
}

/// A friend with a profile picture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Friend {
    id: String,
    name: String,
    position: GeoPoint2d,
    picture_url: String,
    #[serde(skip)]
    picture: Option<Arc<DecodedImage>>,
}

impl Friend {
    /// Creates a friend whose picture is not loaded yet.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        position: GeoPoint2d,
        picture_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            position,
            picture_url: picture_url.into(),
            picture: None,
        }
    }

    /// Sets the loaded picture.
    pub fn with_picture(self, picture: impl Into<Arc<DecodedImage>>) -> Self {
        Self {
            picture: Some(picture.into()),
            ..self
        }
    }
}

impl Entity for Friend {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn position(&self) -> GeoPoint2d {
        self.position
    }

    fn image_url(&self) -> &str {
        &self.picture_url
    }

    fn image(&self) -> Option<Arc<DecodedImage>> {
        self.picture.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use friendmap_types::latlon;

    #[test]
    fn picture_is_not_serialized() {
        let picture = DecodedImage::from_raw(vec![0; 4], (1, 1)).expect("invalid image");
        let friend = Friend::new("1", "Ann", latlon!(1.0, 2.0), "https://pics/ann.png")
            .with_picture(picture);
        assert!(friend.is_image_loaded());

        let json = serde_json::to_string(&friend).expect("serialization failed");
        let restored: Friend = serde_json::from_str(&json).expect("deserialization failed");

        assert_eq!(restored.id(), "1");
        assert_eq!(restored.position(), latlon!(1.0, 2.0));
        assert!(!restored.is_image_loaded());
    }
}
