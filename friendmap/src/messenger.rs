use maybe_sync::{MaybeSend, MaybeSync};

/// Notifies the host application that a [`MarkerManager`](crate::MarkerManager) has queued work.
///
/// Image loads complete and cross-thread handles post commands outside of the owner context. After a command is
/// queued the messenger is called, and the host is expected to call
/// [`MarkerManager::process_pending`](crate::MarkerManager::process_pending) from the owner context, e.g. on the
/// next frame of its UI loop.
pub trait Messenger: MaybeSend + MaybeSync {
    /// Requests the owner context to process the manager's queue.
    fn request_processing(&self);
}

/// Messenger that does nothing. Use it when the owner context polls the manager on its own.
#[derive(Debug, Default, Clone, Copy)]
pub struct DummyMessenger;

impl Messenger for DummyMessenger {
    fn request_processing(&self) {}
}
