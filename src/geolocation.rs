use crate::types::Coords;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeolocationError {
    #[error("position unavailable: {0}")]
    Unavailable(String),

    #[error("permission to read the position was denied")]
    Denied,

    #[error("no position after {0:?}")]
    Timeout(Duration),
}

/// One-shot position source.
pub trait Locator {
    fn locate(&self) -> Result<Coords, GeolocationError>;
}

/// Position given up front (command line, config). `None` means the device
/// has no position to offer.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocator(pub Option<Coords>);

impl Locator for FixedLocator {
    fn locate(&self) -> Result<Coords, GeolocationError> {
        self.0
            .ok_or_else(|| GeolocationError::Unavailable("no home position configured".into()))
    }
}

impl<F> Locator for F
where
    F: Fn() -> Result<Coords, GeolocationError>,
{
    fn locate(&self) -> Result<Coords, GeolocationError> {
        self()
    }
}

/// Asks `locator` once and gives up after `timeout`.
///
/// The lookup runs on a helper thread; if it never answers the thread is
/// left behind and the caller gets `Timeout`.
pub fn locate_within<L>(locator: L, timeout: Duration) -> Result<Coords, GeolocationError>
where
    L: Locator + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(locator.locate());
    });

    match rx.recv_timeout(timeout) {
        Ok(res) => res,
        Err(mpsc::RecvTimeoutError::Timeout) => Err(GeolocationError::Timeout(timeout)),
        Err(mpsc::RecvTimeoutError::Disconnected) => Err(GeolocationError::Unavailable(
            "locator stopped without answering".into(),
        )),
    }
}
