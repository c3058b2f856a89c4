//! Zooms a map over a few cities and prints the markers displayed at every zoom level.
//!
//! Run with `RUST_LOG=debug` to see what the marker manager does.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use friendmap::error::FriendmapError;
use friendmap::friendmap_types::cartesian::Size;
use friendmap::friendmap_types::geo::GeoPoint;
use friendmap::friendmap_types::latlon;
use friendmap::marker::{MarkerHandle, MarkerIcon, MarkerOptions, MarkerSurface, ProjectionListener};
use friendmap::{Friend, MapView, MarkerManagerBuilder, UrlImageLoader};
use parking_lot::RwLock;

/// Surface that keeps markers in memory and prints them.
struct ConsoleSurface {
    view: MapView,
    markers: BTreeMap<MarkerHandle, MarkerOptions>,
    listener: Option<ProjectionListener>,
    next_handle: u64,
}

impl ConsoleSurface {
    fn new(view: MapView) -> Self {
        Self {
            view,
            markers: BTreeMap::new(),
            listener: None,
            next_handle: 0,
        }
    }

    fn set_view(&mut self, view: MapView) {
        self.view = view;
        if let Some(listener) = &self.listener {
            listener.notify(&self.view);
        }
    }

    fn print(&self) {
        println!("zoom {}: {} markers", self.view.zoom(), self.markers.len());
        for options in self.markers.values() {
            let icon = match &options.icon {
                MarkerIcon::Default => "default".to_string(),
                MarkerIcon::Group => "azure".to_string(),
                MarkerIcon::Cluster => "orange".to_string(),
                MarkerIcon::Image(image) => {
                    let (width, height) = image.dimensions();
                    format!("{width}x{height} picture")
                }
            };

            println!(
                "  ({:.4}, {:.4}) {} [{icon}]",
                options.position.lat(),
                options.position.lon(),
                options.title
            );
        }
    }
}

impl MarkerSurface for ConsoleSurface {
    type Projection = MapView;

    fn projection(&self) -> Option<MapView> {
        Some(self.view)
    }

    fn attach(&mut self, options: &MarkerOptions) -> MarkerHandle {
        self.next_handle += 1;
        let handle = MarkerHandle::new(self.next_handle);
        self.markers.insert(handle, options.clone());
        handle
    }

    fn detach(&mut self, handle: MarkerHandle) {
        self.markers.remove(&handle);
    }

    fn set_icon(&mut self, handle: MarkerHandle, icon: &MarkerIcon) {
        if let Some(options) = self.markers.get_mut(&handle) {
            options.icon = icon.clone();
        }
    }

    fn set_projection_listener(&mut self, listener: ProjectionListener) {
        self.listener = Some(listener);
    }
}

fn friends() -> Vec<Friend> {
    let people = [
        ("1", "Anna", 52.5200, 13.4050),
        ("2", "Boris", 52.5200, 13.4050),
        ("3", "Clara", 52.5163, 13.3777),
        ("4", "Dmitri", 52.4862, 13.4250),
        ("5", "Eva", 48.1351, 11.5820),
        ("6", "Felix", 48.1372, 11.5756),
        ("7", "Greta", 50.1109, 8.6821),
    ];

    people
        .into_iter()
        .map(|(id, name, lat, lon)| {
            Friend::new(
                id,
                name,
                latlon!(lat, lon),
                format!("https://example.com/avatars/{id}.png"),
            )
        })
        .collect()
}

#[tokio::main]
async fn main() -> Result<(), FriendmapError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let view = MapView::new(latlon!(51.0, 11.0), 4.0).with_size(Size::new(1024.0, 768.0));
    let surface = Arc::new(RwLock::new(ConsoleSurface::new(view)));

    let mut loader = UrlImageLoader::new()?;
    loader.set_offline_mode(std::env::var_os("FRIENDMAP_ONLINE").is_none());

    let mut manager = MarkerManagerBuilder::default()
        .with_cluster_radius(64.0)
        .build(loader)?;
    manager.bind_surface(surface.clone());
    manager.set_entities(friends());
    surface.read().print();

    for zoom in [6.0, 8.0, 12.0, 16.0] {
        surface.write().set_view(view.with_zoom(zoom));
        manager.process_pending();

        // Give image loads a moment to finish before printing.
        tokio::time::sleep(Duration::from_millis(200)).await;
        manager.process_pending();

        surface.read().print();
    }

    Ok(())
}
