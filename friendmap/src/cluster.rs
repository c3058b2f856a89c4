//! Grid based clustering of locations in screen space.
//!
//! The surface is split into square cells of `radius` pixels. All locations that fall into one cell form a
//! cluster. This is much cheaper than a real nearest-neighbour clustering and gets coarser automatically when the
//! map is zoomed out, since the same pixel cell then covers a larger part of the world.

use std::collections::BTreeMap;

use friendmap_types::cartesian::Point2d;
use friendmap_types::geo::impls::GeoPoint2d;
use friendmap_types::geo::GeoPoint;

use crate::error::FriendmapError;
use crate::location::Location;
use crate::view::ScreenProjection;

/// Index of a grid cell: `floor(pixel / radius)` along each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridCell {
    /// Column of the cell.
    pub x: i64,
    /// Row of the cell.
    pub y: i64,
}

/// Locations that fell into one grid cell.
#[derive(Debug)]
pub struct Cluster<E> {
    key: GeoPoint2d,
    cell: GridCell,
    locations: Vec<Location<E>>,
}

impl<E> Cluster<E> {
    /// Geographic position of the cell centre. Markers for the cluster are displayed here.
    pub fn key(&self) -> GeoPoint2d {
        self.key
    }

    /// Grid cell of the cluster.
    pub fn cell(&self) -> GridCell {
        self.cell
    }

    /// Locations of the cluster in the order they were given to the clusterizer.
    pub fn locations(&self) -> &[Location<E>] {
        &self.locations
    }

    /// Takes the locations out of the cluster.
    pub fn into_locations(self) -> Vec<Location<E>> {
        self.locations
    }

    /// Total number of entities in all the locations.
    pub fn entity_count(&self) -> usize {
        self.locations.iter().map(|l| l.len()).sum()
    }
}

/// Result of [`GridClusterizer::find_clusters`].
#[derive(Debug)]
pub struct ClusterSet<E> {
    clusters: Vec<Cluster<E>>,
    skipped: usize,
}

impl<E> ClusterSet<E> {
    /// Clusters ordered by their grid cell (row-major order).
    pub fn clusters(&self) -> &[Cluster<E>] {
        &self.clusters
    }

    /// Takes the clusters out of the set.
    pub fn into_clusters(self) -> Vec<Cluster<E>> {
        self.clusters
    }

    /// Number of locations that could not be projected onto the surface and were left out.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Number of clusters.
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    /// Returns true if there are no clusters.
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }
}

/// Buckets locations into square pixel cells of a fixed size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridClusterizer {
    radius: f64,
}

impl GridClusterizer {
    /// Creates a clusterizer with the cell size of `radius` pixels.
    ///
    /// Returns [`FriendmapError::InvalidConfiguration`] if the radius is not a positive finite number.
    pub fn new(radius: f64) -> Result<Self, FriendmapError> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(FriendmapError::InvalidConfiguration(format!(
                "cluster radius must be a positive number of pixels, got {radius}"
            )));
        }

        Ok(Self { radius })
    }

    /// Cell size in pixels.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Grid cell containing the pixel.
    pub fn cell(&self, pixel: &Point2d) -> GridCell {
        GridCell {
            x: (pixel.x / self.radius).floor() as i64,
            y: (pixel.y / self.radius).floor() as i64,
        }
    }

    /// Pixel in the middle of the cell.
    pub fn cell_center(&self, cell: GridCell) -> Point2d {
        Point2d::new(
            (cell.x as f64 + 0.5) * self.radius,
            (cell.y as f64 + 0.5) * self.radius,
        )
    }

    /// Groups the locations into clusters by their grid cell in the given projection.
    ///
    /// Locations that cannot be projected are not included in any cluster; their number is returned with
    /// [`ClusterSet::skipped`]. The result depends only on the locations, the projection and the radius.
    pub fn find_clusters<E>(
        &self,
        locations: impl IntoIterator<Item = Location<E>>,
        projection: &impl ScreenProjection,
    ) -> ClusterSet<E> {
        let mut cells: BTreeMap<(i64, i64), Vec<Location<E>>> = BTreeMap::new();
        let mut skipped = 0;

        for location in locations {
            let pixel = match project_location(&location, projection) {
                Ok(pixel) => pixel,
                Err(err) => {
                    log::warn!("Location is excluded from clustering: {err}");
                    skipped += 1;
                    continue;
                }
            };

            let cell = self.cell(&pixel);
            // Rows first, so that clusters are ordered the way the surface is read.
            cells.entry((cell.y, cell.x)).or_default().push(location);
        }

        let clusters = cells
            .into_iter()
            .map(|((y, x), locations)| {
                let cell = GridCell { x, y };
                let key = projection
                    .to_coordinate(&self.cell_center(cell))
                    .filter(GeoPoint2d::is_finite)
                    .unwrap_or_else(|| locations[0].position());

                Cluster {
                    key,
                    cell,
                    locations,
                }
            })
            .collect();

        ClusterSet { clusters, skipped }
    }
}

fn project_location<E>(
    location: &Location<E>,
    projection: &impl ScreenProjection,
) -> Result<Point2d, FriendmapError> {
    let position = location.position();
    projection
        .to_pixel(&position)
        .filter(|pixel| pixel.x.is_finite() && pixel.y.is_finite())
        .ok_or(FriendmapError::UnprojectableLocation {
            lat: position.lat(),
            lon: position.lon(),
        })
}
