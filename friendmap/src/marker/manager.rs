use std::sync::Arc;

use parking_lot::RwLock;
use quick_cache::unsync::Cache;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::cluster::GridClusterizer;
use crate::config::MarkerManagerConfig;
use crate::decoded_image::DecodedImage;
use crate::entity::Entity;
use crate::error::FriendmapError;
use crate::image_loader::ImageLoader;
use crate::location::group_entities;
use crate::marker::command::{ManagerHandle, MarkerCommand};
use crate::marker::descriptor::{MapMarker, MarkerId, MarkerKind};
use crate::marker::surface::{MarkerSurface, ProjectionListener};
use crate::messenger::Messenger;
use crate::view::ScreenProjection;

/// Why markers were not recalculated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferReason {
    /// No surface is bound to the manager.
    NoSurface,
    /// The surface has no projection yet.
    ProjectionUnavailable,
}

/// Summary of a completed recalculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecalculationReport {
    /// Number of attached markers.
    pub markers: usize,
    /// Number of entities the markers were built from.
    pub entities: usize,
    /// Number of locations left out because they could not be projected onto the surface.
    pub skipped_locations: usize,
    /// Number of image loads started.
    pub image_requests: usize,
}

/// Result of a recalculation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecalculationOutcome {
    /// Markers were rebuilt.
    Completed(RecalculationReport),
    /// New markers were not built. If a surface is bound, the markers of the previous entity set are removed
    /// from it. The recalculation is retried on the next trigger (entity change, projection change or surface
    /// binding), even if the zoom level has not changed.
    Deferred(DeferReason),
}

#[derive(Serialize, Deserialize)]
struct EntitySnapshot<T> {
    friends: Vec<T>,
}

#[derive(Default)]
struct PendingWork {
    recalculate: bool,
    zoom: Option<f64>,
}

/// Convenience type to initialize a [`MarkerManager`].
#[derive(Default)]
pub struct MarkerManagerBuilder {
    config: MarkerManagerConfig,
    messenger: Option<Arc<dyn Messenger>>,
}

impl MarkerManagerBuilder {
    /// Replaces the whole configuration.
    pub fn with_config(mut self, config: MarkerManagerConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the size of the clustering cell in pixels.
    ///
    /// Defaults to [`DEFAULT_CLUSTER_RADIUS`](crate::config::DEFAULT_CLUSTER_RADIUS).
    pub fn with_cluster_radius(mut self, radius: f64) -> Self {
        self.config.cluster_radius = radius;
        self
    }

    /// Sets how many loaded images the manager remembers.
    pub fn with_icon_cache_capacity(mut self, capacity: usize) -> Self {
        self.config.icon_cache_capacity = capacity;
        self
    }

    /// Sets the messenger called every time work is queued for the owner context.
    pub fn with_messenger(mut self, messenger: impl Messenger + 'static) -> Self {
        self.messenger = Some(Arc::new(messenger));
        self
    }

    /// Creates the manager.
    ///
    /// Fails with [`FriendmapError::InvalidConfiguration`] if the configuration is not valid.
    pub fn build<E, S, L>(self, image_loader: L) -> Result<MarkerManager<E, S, L>, FriendmapError>
    where
        E: Entity + 'static,
        S: MarkerSurface,
        L: ImageLoader + 'static,
    {
        self.config.validate()?;
        let clusterizer = GridClusterizer::new(self.config.cluster_radius)?;
        let (sender, receiver) = mpsc::unbounded_channel();

        Ok(MarkerManager {
            icon_cache: Cache::new(self.config.icon_cache_capacity),
            config: self.config,
            clusterizer,
            entities: Vec::new(),
            markers: Vec::new(),
            surface: None,
            binding: 0,
            image_loader: Arc::new(image_loader),
            last_zoom: None,
            deferred: false,
            last_report: None,
            next_marker_id: 0,
            sender,
            receiver,
            messenger: self.messenger,
        })
    }
}

/// Keeps a set of entities displayed on a [`MarkerSurface`] as markers.
///
/// Entities at the same position are shown by one marker, and positions that are close to each other on the screen
/// (in the same cell of `cluster_radius` pixels) are merged into one marker too. Every time the entities or the zoom
/// level of the surface change, all markers are removed from the surface and rebuilt from scratch.
///
/// The manager and its surface belong to one owner context (usually the UI thread). Everything that happens outside
/// of it, like image loading or calls through a [`ManagerHandle`], is queued and applied by
/// [`MarkerManager::process_pending`] or [`MarkerManager::wait_for_updates`].
///
/// Images of single-entity markers are loaded on the tokio runtime the manager is used in.
pub struct MarkerManager<E, S, L>
where
    E: Entity + 'static,
    S: MarkerSurface,
    L: ImageLoader + 'static,
{
    config: MarkerManagerConfig,
    clusterizer: GridClusterizer,
    entities: Vec<Arc<E>>,
    markers: Vec<MapMarker<E>>,
    surface: Option<Arc<RwLock<S>>>,
    binding: u64,
    image_loader: Arc<L>,
    icon_cache: Cache<String, Arc<DecodedImage>>,
    last_zoom: Option<f64>,
    deferred: bool,
    last_report: Option<RecalculationReport>,
    next_marker_id: u64,
    sender: UnboundedSender<MarkerCommand<E>>,
    receiver: UnboundedReceiver<MarkerCommand<E>>,
    messenger: Option<Arc<dyn Messenger>>,
}

impl<E, S, L> MarkerManager<E, S, L>
where
    E: Entity + 'static,
    S: MarkerSurface,
    L: ImageLoader + 'static,
{
    /// Creates a manager with the given configuration.
    pub fn new(config: MarkerManagerConfig, image_loader: L) -> Result<Self, FriendmapError> {
        MarkerManagerBuilder::default()
            .with_config(config)
            .build(image_loader)
    }

    /// Configuration of the manager.
    pub fn config(&self) -> &MarkerManagerConfig {
        &self.config
    }

    /// Returns a handle to control the manager from other threads.
    pub fn handle(&self) -> ManagerHandle<E> {
        ManagerHandle::new(self.sender.clone(), self.messenger.clone())
    }

    /// Binds the manager to a surface and displays the markers on it.
    ///
    /// Binding the surface the manager is already bound to does nothing and returns `None`. Binding a different
    /// surface removes all markers from the previous one.
    pub fn bind_surface(&mut self, surface: Arc<RwLock<S>>) -> Option<RecalculationOutcome> {
        if let Some(current) = self.surface.take() {
            if Arc::ptr_eq(&current, &surface) {
                self.surface = Some(current);
                return None;
            }

            self.detach_markers(&mut current.write());
        }

        self.binding += 1;
        surface
            .write()
            .set_projection_listener(self.projection_listener());
        self.surface = Some(surface);
        self.last_zoom = None;

        Some(self.recalculate())
    }

    /// Removes all markers from the bound surface and unbinds it.
    pub fn unbind_surface(&mut self) -> Option<Arc<RwLock<S>>> {
        let surface = self.surface.take()?;
        self.detach_markers(&mut surface.write());
        self.binding += 1;
        self.last_zoom = None;

        Some(surface)
    }

    /// Surface the manager is bound to.
    pub fn surface(&self) -> Option<&Arc<RwLock<S>>> {
        self.surface.as_ref()
    }

    /// Replaces all entities and rebuilds the markers.
    pub fn set_entities(&mut self, entities: impl IntoIterator<Item = E>) -> RecalculationOutcome {
        self.replace_entities(entities);
        self.recalculate()
    }

    /// Removes all entities and their markers.
    pub fn remove_all_markers(&mut self) -> RecalculationOutcome {
        self.set_entities(std::iter::empty())
    }

    /// Returns true if the manager has no entities.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Number of entities.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Iterates over the entities.
    pub fn entities(&self) -> impl Iterator<Item = &E> + '_ {
        self.entities.iter().map(|e| e.as_ref())
    }

    /// Markers currently attached to the surface.
    pub fn markers(&self) -> &[MapMarker<E>] {
        &self.markers
    }

    /// Summary of the last completed recalculation.
    pub fn last_report(&self) -> Option<RecalculationReport> {
        self.last_report
    }

    /// Returns true if there are commands waiting for [`MarkerManager::process_pending`].
    pub fn has_pending_updates(&self) -> bool {
        !self.receiver.is_empty()
    }

    /// Zoom level the markers were calculated for.
    pub fn zoom_level(&self) -> Option<f64> {
        self.last_zoom
    }

    /// Rebuilds the markers for the new projection of the bound surface, unless the zoom level is the same as in
    /// the last recalculation. Panning alone does not change grid membership enough to be worth a rebuild.
    ///
    /// A recalculation that was deferred before is always retried.
    pub fn on_projection_changed(
        &mut self,
        projection: &S::Projection,
    ) -> Option<RecalculationOutcome> {
        if !self.deferred && self.last_zoom == Some(projection.zoom_level()) {
            return None;
        }

        let Some(surface) = self.surface.clone() else {
            return Some(RecalculationOutcome::Deferred(DeferReason::NoSurface));
        };

        Some(self.rebuild(&surface, projection))
    }

    /// Applies all queued commands without waiting.
    ///
    /// Returns the outcome of the recalculation if any of the commands required one. Several commands requiring
    /// recalculation are merged into one.
    pub fn process_pending(&mut self) -> Option<RecalculationOutcome> {
        let mut work = PendingWork::default();
        while let Ok(command) = self.receiver.try_recv() {
            self.apply_command(command, &mut work);
        }

        self.finish(work)
    }

    /// Waits for at least one queued command and applies everything that is queued.
    pub async fn wait_for_updates(&mut self) -> Option<RecalculationOutcome> {
        let mut work = PendingWork::default();
        if let Some(command) = self.receiver.recv().await {
            self.apply_command(command, &mut work);
        }

        while let Ok(command) = self.receiver.try_recv() {
            self.apply_command(command, &mut work);
        }

        self.finish(work)
    }

    fn apply_command(&mut self, command: MarkerCommand<E>, work: &mut PendingWork) {
        match command {
            MarkerCommand::SetEntities(entities) => {
                self.replace_entities(entities);
                work.recalculate = true;
            }
            MarkerCommand::Recalculate => work.recalculate = true,
            MarkerCommand::ProjectionChanged { zoom, binding } => {
                if binding == self.binding {
                    work.zoom = Some(zoom);
                } else {
                    log::debug!("Ignoring projection change of a previously bound surface");
                }
            }
            MarkerCommand::IconLoaded {
                marker,
                image_url,
                result,
            } => self.apply_loaded_image(marker, image_url, result),
        }
    }

    fn finish(&mut self, work: PendingWork) -> Option<RecalculationOutcome> {
        let zoom_changed = work
            .zoom
            .is_some_and(|zoom| self.deferred || self.last_zoom != Some(zoom));
        if work.recalculate || zoom_changed {
            Some(self.recalculate())
        } else {
            None
        }
    }

    fn replace_entities(&mut self, entities: impl IntoIterator<Item = E>) {
        self.entities = entities.into_iter().map(Arc::new).collect();
    }

    fn projection_listener(&self) -> ProjectionListener {
        let handle = self.handle();
        let binding = self.binding;
        ProjectionListener::new(move |zoom| {
            handle.post(MarkerCommand::ProjectionChanged { zoom, binding });
        })
    }

    fn recalculate(&mut self) -> RecalculationOutcome {
        let Some(surface) = self.surface.clone() else {
            log::debug!("Marker recalculation is deferred until a surface is bound");
            self.deferred = true;
            return RecalculationOutcome::Deferred(DeferReason::NoSurface);
        };

        let projection = match current_projection(&surface) {
            Ok(projection) => projection,
            Err(err) => {
                log::debug!("Marker recalculation is deferred: {err}");
                // Markers of the previous entity set must not outlive it.
                self.detach_markers(&mut surface.write());
                self.deferred = true;
                return RecalculationOutcome::Deferred(DeferReason::ProjectionUnavailable);
            }
        };

        self.rebuild(&surface, &projection)
    }

    fn rebuild(&mut self, surface: &RwLock<S>, projection: &S::Projection) -> RecalculationOutcome {
        let mut surface = surface.write();
        self.detach_markers(&mut surface);

        let locations = group_entities(&self.entities);
        let clusters = self.clusterizer.find_clusters(locations, projection);
        let skipped_locations = clusters.skipped();
        let mut image_requests = 0;

        for cluster in clusters.into_clusters() {
            let id = self.next_marker_id();
            let key = cluster.key();
            let icon_cache = &self.icon_cache;
            let Some(mut marker) = MapMarker::new(id, key, cluster.into_locations(), |entity| {
                entity
                    .image()
                    .or_else(|| icon_cache.peek(entity.image_url()).cloned())
            }) else {
                log::error!("Cluster at {key:?} has no entities and is ignored");
                continue;
            };

            marker.set_handle(surface.attach(&marker.options()));

            if let MarkerKind::SingletPending { image_url } = marker.kind() {
                if self.request_image(marker.id(), image_url.clone()) {
                    image_requests += 1;
                }
            }

            self.markers.push(marker);
        }

        self.last_zoom = Some(projection.zoom_level());
        self.deferred = false;
        let report = RecalculationReport {
            markers: self.markers.len(),
            entities: self.entities.len(),
            skipped_locations,
            image_requests,
        };
        log::debug!("Markers recalculated: {report:?}");
        self.last_report = Some(report);

        RecalculationOutcome::Completed(report)
    }

    fn detach_markers(&mut self, surface: &mut S) {
        for mut marker in self.markers.drain(..) {
            if let Some(handle) = marker.take_handle() {
                surface.detach(handle);
            }
        }
    }

    fn next_marker_id(&mut self) -> MarkerId {
        self.next_marker_id += 1;
        MarkerId::new(self.next_marker_id)
    }

    fn request_image(&self, marker: MarkerId, image_url: String) -> bool {
        let loader = self.image_loader.clone();
        let handle = self.handle();
        crate::async_runtime::spawn(async move {
            let result = loader.load(&image_url).await;
            handle.post(MarkerCommand::IconLoaded {
                marker,
                image_url,
                result,
            });
        })
    }

    fn apply_loaded_image(
        &mut self,
        marker_id: MarkerId,
        image_url: String,
        result: Result<DecodedImage, FriendmapError>,
    ) {
        let image = match result {
            Ok(image) => Arc::new(image),
            Err(err) => {
                log::warn!("Failed to load image {image_url}: {err}");
                return;
            }
        };

        self.icon_cache.insert(image_url.clone(), image.clone());

        if !self.markers.iter().any(|m| m.id() == marker_id) {
            log::debug!("Marker {marker_id:?} was replaced before its image was loaded");
        }

        // Any marker still waiting for this image gets it, not only the one that requested it.
        let Some(surface) = &self.surface else {
            return;
        };
        for marker in self.markers.iter_mut() {
            let waits_for_image = matches!(
                marker.kind(),
                MarkerKind::SingletPending { image_url: url } if *url == image_url
            );
            let Some(handle) = marker.handle() else {
                continue;
            };

            if waits_for_image && marker.resolve_image(image.clone()) {
                surface.write().set_icon(handle, &marker.icon());
            }
        }
    }
}

impl<E, S, L> MarkerManager<E, S, L>
where
    E: Entity + Serialize + DeserializeOwned + 'static,
    S: MarkerSurface,
    L: ImageLoader + 'static,
{
    /// Serializes the entities, e.g. to restore them after the host application is restarted.
    pub fn save_entities(&self) -> Result<String, FriendmapError> {
        let snapshot = EntitySnapshot {
            friends: self.entities().collect::<Vec<_>>(),
        };
        Ok(serde_json::to_string(&snapshot)?)
    }

    /// Replaces the entities with the ones stored by [`MarkerManager::save_entities`].
    pub fn load_entities(&mut self, snapshot: &str) -> Result<RecalculationOutcome, FriendmapError> {
        let snapshot: EntitySnapshot<E> = serde_json::from_str(snapshot)?;
        Ok(self.set_entities(snapshot.friends))
    }
}

fn current_projection<S: MarkerSurface>(
    surface: &RwLock<S>,
) -> Result<S::Projection, FriendmapError> {
    surface
        .read()
        .projection()
        .ok_or(FriendmapError::ProjectionUnavailable)
}
