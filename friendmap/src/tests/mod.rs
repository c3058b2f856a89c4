//! Fixtures shared by the unit tests of the crate.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use friendmap_types::cartesian::Point2d;
use friendmap_types::geo::impls::GeoPoint2d;
use friendmap_types::geo::GeoPoint;
use friendmap_types::latlon;
use maybe_sync::MaybeSend;
use parking_lot::{Mutex, RwLock};

use crate::decoded_image::DecodedImage;
use crate::error::FriendmapError;
use crate::image_loader::ImageLoader;
use crate::marker::{MarkerHandle, MarkerIcon, MarkerOptions, MarkerSurface, ProjectionListener};
use crate::view::ScreenProjection;
use crate::Friend;

pub(crate) fn plain_friend(id: &str, lat: f64, lon: f64) -> Friend {
    Friend::new(
        id,
        format!("Friend {id}"),
        latlon!(lat, lon),
        format!("https://pictures.test/{id}.png"),
    )
}

pub(crate) fn plain_friend_with_picture(id: &str, lat: f64, lon: f64) -> Friend {
    plain_friend(id, lat, lon).with_picture(test_image())
}

pub(crate) fn friend(id: &str, lat: f64, lon: f64) -> Arc<Friend> {
    Arc::new(plain_friend(id, lat, lon))
}

pub(crate) fn friend_with_picture(id: &str, lat: f64, lon: f64) -> Arc<Friend> {
    Arc::new(plain_friend_with_picture(id, lat, lon))
}

/// Deterministic pseudo-random friends with pictures in the range of (-80..80, -170..170).
pub(crate) fn scattered_friends(count: usize) -> Vec<Friend> {
    let mut state: u64 = 0x9e37_79b9_7f4a_7c15;
    let mut next = move || {
        state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (state >> 11) as f64 / (1u64 << 53) as f64
    };

    (0..count)
        .map(|i| {
            let lat = next() * 160.0 - 80.0;
            let lon = next() * 340.0 - 170.0;
            plain_friend_with_picture(&i.to_string(), lat, lon)
        })
        .collect()
}

pub(crate) fn test_image() -> Arc<DecodedImage> {
    Arc::new(DecodedImage::from_raw(vec![255; 4], (1, 1)).expect("invalid test image"))
}

/// Equirectangular projection: `x = lon * k`, `y = lat * k`. Zoom level is `log2(k)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct TestProjection {
    pixels_per_degree: f64,
}

impl TestProjection {
    pub(crate) fn new(pixels_per_degree: f64) -> Self {
        Self { pixels_per_degree }
    }
}

impl ScreenProjection for TestProjection {
    fn to_pixel(&self, position: &GeoPoint2d) -> Option<Point2d> {
        if position.lat().abs() > 90.0 {
            return None;
        }

        Some(Point2d::new(
            position.lon() * self.pixels_per_degree,
            position.lat() * self.pixels_per_degree,
        ))
    }

    fn to_coordinate(&self, pixel: &Point2d) -> Option<GeoPoint2d> {
        let lat = pixel.y / self.pixels_per_degree;
        if lat.abs() > 90.0 {
            return None;
        }

        Some(latlon!(lat, pixel.x / self.pixels_per_degree))
    }

    fn zoom_level(&self) -> f64 {
        self.pixels_per_degree.log2()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SurfaceEvent {
    Attach(MarkerHandle),
    Detach(MarkerHandle),
    SetIcon(MarkerHandle),
}

/// Surface that records everything done to it.
#[derive(Debug, Default)]
pub(crate) struct TestSurface {
    pub(crate) projection: Option<TestProjection>,
    pub(crate) attached: BTreeMap<MarkerHandle, MarkerOptions>,
    pub(crate) events: Vec<SurfaceEvent>,
    listener: Option<ProjectionListener>,
    next_handle: u64,
}

impl TestSurface {
    pub(crate) fn new(projection: TestProjection) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(Self {
            projection: Some(projection),
            ..Default::default()
        }))
    }

    pub(crate) fn without_projection() -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(Self::default()))
    }

    /// Changes the projection and notifies the listener, the way a map widget does after user interaction.
    pub(crate) fn move_camera(&mut self, projection: TestProjection) {
        self.projection = Some(projection);
        if let Some(listener) = &self.listener {
            listener.notify(&projection);
        }
    }
}

impl MarkerSurface for TestSurface {
    type Projection = TestProjection;

    fn projection(&self) -> Option<TestProjection> {
        self.projection
    }

    fn attach(&mut self, options: &MarkerOptions) -> MarkerHandle {
        self.next_handle += 1;
        let handle = MarkerHandle::new(self.next_handle);
        self.attached.insert(handle, options.clone());
        self.events.push(SurfaceEvent::Attach(handle));

        handle
    }

    fn detach(&mut self, handle: MarkerHandle) {
        assert!(
            self.attached.remove(&handle).is_some(),
            "detached unknown marker {handle:?}"
        );
        self.events.push(SurfaceEvent::Detach(handle));
    }

    fn set_icon(&mut self, handle: MarkerHandle, icon: &MarkerIcon) {
        let options = self
            .attached
            .get_mut(&handle)
            .expect("icon set for a detached marker");
        options.icon = icon.clone();
        self.events.push(SurfaceEvent::SetIcon(handle));
    }

    fn set_projection_listener(&mut self, listener: ProjectionListener) {
        self.listener = Some(listener);
    }
}

/// Loader that answers immediately and remembers what was requested.
#[derive(Debug, Clone, Default)]
pub(crate) struct TestLoader {
    requests: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

impl TestLoader {
    pub(crate) fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }
}

impl ImageLoader for TestLoader {
    fn load(
        &self,
        image_url: &str,
    ) -> impl Future<Output = Result<DecodedImage, FriendmapError>> + MaybeSend {
        self.requests.lock().push(image_url.to_string());
        let result = if self.fail {
            Err(FriendmapError::NotFound)
        } else {
            DecodedImage::from_raw(vec![1, 2, 3, 4], (1, 1))
        };

        std::future::ready(result)
    }
}
