use friendmap_types::cartesian::{Point2d, Size};
use friendmap_types::geo::impls::projection::WebMercator;
use friendmap_types::geo::impls::GeoPoint2d;
use friendmap_types::geo::{Datum, Projection};

/// Size of a map tile in pixels at which zoom level `0` shows the whole world in one tile.
const TILE_SIZE: f64 = 256.0;

/// Transformation between geographic coordinates and pixels of a map surface.
///
/// Pixel coordinates grow to the right and down from the top left corner of the surface.
pub trait ScreenProjection {
    /// Pixel position of the geographic point. Returns `None` if the point cannot be displayed.
    fn to_pixel(&self, position: &GeoPoint2d) -> Option<Point2d>;
    /// Geographic position of the pixel.
    fn to_coordinate(&self, pixel: &Point2d) -> Option<GeoPoint2d>;
    /// Current zoom level.
    fn zoom_level(&self) -> f64;
}

/// View of a Web Mercator map: the geographic position of the surface centre, the zoom level and the size of the
/// surface in pixels.
#[derive(Debug, Clone, Copy)]
pub struct MapView {
    center: GeoPoint2d,
    zoom: f64,
    size: Size,
    projection: WebMercator<GeoPoint2d, Point2d>,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center: GeoPoint2d::default(),
            zoom: 0.0,
            size: Size::new(0.0, 0.0),
            projection: WebMercator::new(Datum::WGS84),
        }
    }
}

impl MapView {
    /// Creates a view centred at `center` with the given zoom level.
    pub fn new(center: GeoPoint2d, zoom: f64) -> Self {
        Self {
            center,
            zoom,
            ..Default::default()
        }
    }

    /// Geographic position of the surface centre.
    pub fn center(&self) -> GeoPoint2d {
        self.center
    }

    /// Zoom level.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Size of the surface in pixels.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Meters of the projected plane per pixel.
    pub fn resolution(&self) -> f64 {
        self.projection.datum().equator_length() / (TILE_SIZE * 2f64.powf(self.zoom))
    }

    /// Returns a copy of the view with a different centre.
    pub fn with_center(&self, center: GeoPoint2d) -> Self {
        Self { center, ..*self }
    }

    /// Returns a copy of the view with a different zoom.
    pub fn with_zoom(&self, zoom: f64) -> Self {
        Self { zoom, ..*self }
    }

    /// Returns a copy of the view with a different surface size.
    pub fn with_size(&self, size: Size) -> Self {
        Self { size, ..*self }
    }

    /// Moves the view so that the geographic point under the `from` pixel ends up under the `to` pixel.
    pub fn translate_by_pixels(&self, from: Point2d, to: Point2d) -> Option<Self> {
        let center = self.projection.project(&self.center)?;
        let delta = (to - from) * self.resolution();
        let new_center = Point2d::new(center.x - delta.x, center.y + delta.y);

        Some(self.with_center(self.projection.unproject(&new_center)?))
    }
}

impl ScreenProjection for MapView {
    fn to_pixel(&self, position: &GeoPoint2d) -> Option<Point2d> {
        let projected = self.projection.project(position)?;
        let center = self.projection.project(&self.center)?;
        let offset = (projected - center) / self.resolution();

        Some(Point2d::new(
            self.size.half_width() + offset.x,
            self.size.half_height() - offset.y,
        ))
    }

    fn to_coordinate(&self, pixel: &Point2d) -> Option<GeoPoint2d> {
        let center = self.projection.project(&self.center)?;
        let resolution = self.resolution();
        let projected = Point2d::new(
            center.x + (pixel.x - self.size.half_width()) * resolution,
            center.y - (pixel.y - self.size.half_height()) * resolution,
        );

        self.projection.unproject(&projected)
    }

    fn zoom_level(&self) -> f64 {
        self.zoom
    }
}
