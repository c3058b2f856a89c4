use std::sync::Arc;

use friendmap_types::geo::impls::GeoPoint2d;

use crate::decoded_image::DecodedImage;
use crate::entity::Entity;
use crate::location::Location;
use crate::marker::surface::MarkerHandle;

/// Identifier of a marker, unique within one [`MarkerManager`](super::MarkerManager).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(u64);

impl MarkerId {
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }
}

/// Icon of a marker.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkerIcon {
    /// Default marker of the surface. Used for single entities while their image is loading.
    Default,
    /// Several entities at one location (azure marker).
    Group,
    /// Several locations merged into one cluster (orange marker).
    Cluster,
    /// Image of the single entity of the marker.
    Image(Arc<DecodedImage>),
}

/// Everything a surface needs to display a marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerOptions {
    /// Where the marker is displayed.
    pub position: GeoPoint2d,
    /// Title of the marker.
    pub title: String,
    /// Icon of the marker.
    pub icon: MarkerIcon,
}

/// How a marker is displayed. Computed once when the marker is created.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkerKind {
    /// One entity with its image available.
    SingletResolved(Arc<DecodedImage>),
    /// One entity whose image must be loaded first.
    SingletPending {
        /// Reference to the image to load.
        image_url: String,
    },
    /// More than one entity.
    Aggregate {
        /// Number of locations in the marker.
        locations: usize,
    },
}

/// One marker on the map, representing one or more locations.
#[derive(Debug)]
pub struct MapMarker<E> {
    id: MarkerId,
    position: GeoPoint2d,
    locations: Vec<Location<E>>,
    entity_count: usize,
    kind: MarkerKind,
    handle: Option<MarkerHandle>,
}

impl<E: Entity> MapMarker<E> {
    /// Creates a marker. `resolve_image` is asked for the image of the entity when the marker contains only one.
    ///
    /// Returns `None` if the locations contain no entities.
    pub(crate) fn new(
        id: MarkerId,
        position: GeoPoint2d,
        locations: Vec<Location<E>>,
        resolve_image: impl FnOnce(&E) -> Option<Arc<DecodedImage>>,
    ) -> Option<Self> {
        let entity_count = locations.iter().map(|l| l.len()).sum();
        let first = locations.iter().find_map(|l| l.first_entity())?;

        let kind = if entity_count > 1 {
            MarkerKind::Aggregate {
                locations: locations.len(),
            }
        } else {
            match resolve_image(first) {
                Some(image) => MarkerKind::SingletResolved(image),
                None => MarkerKind::SingletPending {
                    image_url: first.image_url().to_string(),
                },
            }
        };

        Some(Self {
            id,
            position,
            locations,
            entity_count,
            kind,
            handle: None,
        })
    }

    /// The first entity of the first location.
    pub fn first_entity(&self) -> &Arc<E> {
        self.locations
            .iter()
            .find_map(|l| l.first_entity())
            .expect("marker always contains an entity")
    }

    /// Title of the marker: the name of the entity, or the number of entities if there are several.
    pub fn title(&self) -> String {
        if self.entity_count > 1 {
            format!("{} friends...", self.entity_count)
        } else {
            self.first_entity().name().to_string()
        }
    }

    /// Options to display the marker with.
    pub fn options(&self) -> MarkerOptions {
        MarkerOptions {
            position: self.position,
            title: self.title(),
            icon: self.icon(),
        }
    }
}

impl<E> MapMarker<E> {
    /// Identifier of the marker.
    pub fn id(&self) -> MarkerId {
        self.id
    }

    /// Where the marker is displayed.
    pub fn position(&self) -> GeoPoint2d {
        self.position
    }

    /// Locations represented by the marker.
    pub fn locations(&self) -> &[Location<E>] {
        &self.locations
    }

    /// Number of locations represented by the marker.
    pub fn location_count(&self) -> usize {
        self.locations.len()
    }

    /// Total number of entities in all locations of the marker.
    pub fn entity_count(&self) -> usize {
        self.entity_count
    }

    /// Display kind of the marker.
    pub fn kind(&self) -> &MarkerKind {
        &self.kind
    }

    /// Icon the marker is displayed with.
    pub fn icon(&self) -> MarkerIcon {
        match &self.kind {
            MarkerKind::SingletResolved(image) => MarkerIcon::Image(image.clone()),
            MarkerKind::SingletPending { .. } => MarkerIcon::Default,
            MarkerKind::Aggregate { locations } if *locations > 1 => MarkerIcon::Cluster,
            MarkerKind::Aggregate { .. } => MarkerIcon::Group,
        }
    }

    /// Handle assigned by the surface, if the marker is attached.
    pub fn handle(&self) -> Option<MarkerHandle> {
        self.handle
    }

    /// Returns true if the marker is displayed on a surface.
    pub fn is_attached(&self) -> bool {
        self.handle.is_some()
    }

    pub(crate) fn set_handle(&mut self, handle: MarkerHandle) {
        self.handle = Some(handle);
    }

    pub(crate) fn take_handle(&mut self) -> Option<MarkerHandle> {
        self.handle.take()
    }

    /// Switches a pending singlet to the loaded image. Returns false if the marker was not waiting for an image.
    pub(crate) fn resolve_image(&mut self, image: Arc<DecodedImage>) -> bool {
        if !matches!(self.kind, MarkerKind::SingletPending { .. }) {
            return false;
        }

        self.kind = MarkerKind::SingletResolved(image);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::group_entities;
    use crate::tests::{friend, friend_with_picture, test_image};
    use assert_matches::assert_matches;
    use friendmap_types::latlon;

    fn marker(entities: Vec<Arc<crate::Friend>>) -> MapMarker<crate::Friend> {
        MapMarker::new(
            MarkerId::new(1),
            latlon!(0.0, 0.0),
            group_entities(&entities),
            |e| e.image(),
        )
        .expect("marker is empty")
    }

    #[test]
    fn empty_marker_is_not_created() {
        let marker =
            MapMarker::<crate::Friend>::new(MarkerId::new(1), latlon!(0.0, 0.0), vec![], |_| {
                None
            });
        assert!(marker.is_none());
    }

    #[test]
    fn cluster_of_locations() {
        let marker = marker(vec![
            friend("a", 1.0, 1.0),
            friend("b", 1.0, 1.0),
            friend("c", 5.0, 5.0),
        ]);

        assert_eq!(marker.entity_count(), 3);
        assert_eq!(marker.location_count(), 2);
        assert_eq!(marker.first_entity().id(), "a");
        assert_eq!(marker.title(), "3 friends...");
        assert_matches!(marker.kind(), MarkerKind::Aggregate { locations: 2 });
        assert_eq!(marker.icon(), MarkerIcon::Cluster);
    }

    #[test]
    fn group_at_one_location() {
        let marker = marker(vec![friend("a", 1.0, 1.0), friend("b", 1.0, 1.0)]);

        assert_eq!(marker.title(), "2 friends...");
        assert_eq!(marker.icon(), MarkerIcon::Group);
    }

    #[test]
    fn singlet_with_picture() {
        let marker = marker(vec![friend_with_picture("d", 1.0, 1.0)]);

        assert_eq!(marker.title(), "Friend d");
        assert_matches!(marker.kind(), MarkerKind::SingletResolved(_));
        assert_matches!(marker.icon(), MarkerIcon::Image(_));
    }

    #[test]
    fn singlet_waits_for_picture() {
        let mut marker = marker(vec![friend("e", 1.0, 1.0)]);

        assert_matches!(
            marker.kind(),
            MarkerKind::SingletPending { image_url } if image_url == "https://pictures.test/e.png"
        );
        assert_eq!(marker.icon(), MarkerIcon::Default);

        assert!(marker.resolve_image(test_image()));
        assert_matches!(marker.icon(), MarkerIcon::Image(_));
        assert!(!marker.resolve_image(test_image()));
    }

    #[test]
    fn options_follow_marker() {
        let marker = marker(vec![friend("e", 1.0, 1.0)]);
        let options = marker.options();

        assert_eq!(options.position, latlon!(0.0, 0.0));
        assert_eq!(options.title, "Friend e");
        assert_eq!(options.icon, MarkerIcon::Default);
        assert!(!marker.is_attached());
    }
}
