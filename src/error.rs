/// Misuse of the controller. Everything the user can cause is handled
/// inside it and never shows up here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AppError {
    #[error("map is not ready yet; wait for load_map before routing map clicks")]
    MapNotReady,

    #[error("no pending location; click the map before submitting the form")]
    NoPendingLocation,
}
