use strum::{EnumIter, IntoEnumIterator};

/// Fullscreen entry points a host may expose.
///
/// Only one of them exists on a given host. Declaration order is the probe
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, strum::Display)]
pub enum FullscreenApi {
    #[strum(serialize = "requestFullscreen")]
    Standard,
    #[strum(serialize = "webkitRequestFullscreen")]
    Webkit,
    #[strum(serialize = "msRequestFullscreen")]
    Ms,
}

impl FullscreenApi {
    /// All known APIs in probe order
    pub fn probe_order() -> impl Iterator<Item = FullscreenApi> {
        FullscreenApi::iter()
    }
}

/// Capability surface of the component that actually decodes and renders.
///
/// Every mutating call is a request. Engines apply them whenever they are
/// ready and report the outcome as an [`EngineEvent`](crate::commands::EngineEvent).
pub trait PlaybackEngine {
    fn play(&mut self);

    fn pause(&mut self);

    fn is_paused(&self) -> bool;

    /// Position in seconds
    fn current_time(&self) -> f64;

    fn set_current_time(&mut self, seconds: f64);

    /// Total length in seconds, `None` until the source has been probed
    fn duration(&self) -> Option<f64>;

    fn playback_rate(&self) -> f64;

    fn set_playback_rate(&mut self, rate: f64);

    /// Whether this host exposes the given fullscreen entry point
    fn has_fullscreen_api(&self, api: FullscreenApi) -> bool;

    fn request_fullscreen(&mut self, api: FullscreenApi);

    fn exit_fullscreen(&mut self, api: FullscreenApi);

    /// Whether the video element is the fullscreen element under `api`
    fn fullscreen_active(&self, api: FullscreenApi) -> bool;

    /// Reference to the loaded source, if any
    fn source(&self) -> Option<&str> {
        None
    }
}
