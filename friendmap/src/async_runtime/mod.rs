use std::future::Future;

use maybe_sync::MaybeSend;

/// Runs the future on the ambient tokio runtime. Returns false if there is no runtime.
///
/// Without a runtime the future is dropped and an error is logged: the work spawned here (icon downloads) is
/// allowed to never finish.
pub fn spawn<T>(future: T) -> bool
where
    T: Future + MaybeSend + 'static,
    T::Output: MaybeSend + 'static,
{
    match tokio::runtime::Handle::try_current() {
        Ok(runtime) => {
            runtime.spawn(future);
            true
        }
        Err(err) => {
            log::error!("Cannot spawn background task: {err}");
            false
        }
    }
}
