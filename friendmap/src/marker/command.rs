use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;

use crate::decoded_image::DecodedImage;
use crate::error::FriendmapError;
use crate::marker::descriptor::MarkerId;
use crate::messenger::Messenger;

/// Work queued for the owner context of a [`MarkerManager`](super::MarkerManager).
pub(crate) enum MarkerCommand<E> {
    SetEntities(Vec<E>),
    Recalculate,
    ProjectionChanged {
        zoom: f64,
        /// Surface binding the notification came from. Stale bindings are ignored.
        binding: u64,
    },
    IconLoaded {
        marker: MarkerId,
        image_url: String,
        result: Result<DecodedImage, FriendmapError>,
    },
}

/// Cloneable handle to a [`MarkerManager`](super::MarkerManager) that can be used from any thread.
///
/// The handle does not change the manager directly: it queues commands that are applied in the order they were
/// sent, the next time the owner context calls
/// [`MarkerManager::process_pending`](super::MarkerManager::process_pending).
pub struct ManagerHandle<E> {
    sender: UnboundedSender<MarkerCommand<E>>,
    messenger: Option<Arc<dyn Messenger>>,
}

impl<E> Clone for ManagerHandle<E> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            messenger: self.messenger.clone(),
        }
    }
}

impl<E> ManagerHandle<E> {
    pub(crate) fn new(
        sender: UnboundedSender<MarkerCommand<E>>,
        messenger: Option<Arc<dyn Messenger>>,
    ) -> Self {
        Self { sender, messenger }
    }

    /// Replaces the entities of the manager.
    ///
    /// Returns false if the manager does not exist anymore.
    pub fn set_entities(&self, entities: Vec<E>) -> bool {
        self.post(MarkerCommand::SetEntities(entities))
    }

    /// Removes all entities and their markers.
    pub fn remove_all_markers(&self) -> bool {
        self.set_entities(Vec::new())
    }

    /// Requests the markers to be rebuilt.
    pub fn request_recalculation(&self) -> bool {
        self.post(MarkerCommand::Recalculate)
    }

    pub(crate) fn post(&self, command: MarkerCommand<E>) -> bool {
        if self.sender.send(command).is_err() {
            log::debug!("Marker manager is dropped, command is ignored");
            return false;
        }

        if let Some(messenger) = &self.messenger {
            messenger.request_processing();
        }

        true
    }
}
