use crate::{
    animation::azimuth::{AlignOutcome, AzimuthController},
    core::{camera::CameraState, config::MapViewConfig, observable::Observable},
    input::{
        events::{GestureEvent, GestureKind},
        gestures::{GestureCoordinator, GestureResponse},
    },
    rendering::engine::RenderEngine,
    runtime::{self, TaskSpawner},
    style::{
        loader::{CatalogLoader, StyleResourceLoader},
        manager::{ActivationEvent, ActivationStatus, MapStyleManager},
        source::StyleId,
    },
    Result,
};
use instant::Instant;
use std::sync::Arc;
use std::time::Duration;

/// Composition root for one map view session.
///
/// Owns the camera and routes everything that changes it: gestures, the
/// north-alignment animation and programmatic calls. Style switches go
/// through the style manager. `frame` must be called once per rendered
/// frame on the interactive thread.
pub struct MapViewController<E: RenderEngine> {
    config: MapViewConfig,
    camera: CameraState,
    azimuth: AzimuthController,
    gestures: GestureCoordinator,
    styles: MapStyleManager,
    engine: E,
}

impl<E: RenderEngine> MapViewController<E> {
    /// Starts a session using the configured style catalog and the global
    /// runtime for style construction
    pub fn new(config: MapViewConfig, engine: E) -> Result<Self> {
        let loader = Arc::new(CatalogLoader::new(config.styles.clone()));
        Self::with_runtime(config, engine, loader, runtime::runtime())
    }

    pub fn with_runtime(
        config: MapViewConfig,
        mut engine: E,
        loader: Arc<dyn StyleResourceLoader>,
        spawner: Arc<dyn TaskSpawner>,
    ) -> Result<Self> {
        config.validate()?;
        let styles =
            MapStyleManager::bootstrap(config.initial_style, loader, spawner, &mut engine)?;
        let camera = CameraState::new(config.camera);
        engine.set_camera_state(&camera);

        Ok(Self {
            camera,
            azimuth: AzimuthController::new(config.animation),
            gestures: GestureCoordinator::new(config.gestures.clone()),
            styles,
            engine,
            config,
        })
    }

    pub fn config(&self) -> &MapViewConfig {
        &self.config
    }

    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn gestures(&self) -> &GestureCoordinator {
        &self.gestures
    }

    /// Every azimuth change, gesture-driven or animated, in `[0, 360)`
    pub fn azimuth_observable(&self) -> &Observable<f64> {
        self.azimuth.observable()
    }

    /// Outcome of every style activation request
    pub fn activation_observable(&self) -> &Observable<ActivationEvent> {
        self.styles.events()
    }

    pub fn is_aligning(&self) -> bool {
        self.azimuth.is_animating()
    }

    /// Rotates back to north-up over the configured default duration
    pub fn animated_align_azimuth_to_north(&mut self) -> AlignOutcome {
        let duration = self.config.animation.align_duration();
        self.align_azimuth_to_north(duration, Instant::now())
    }

    pub fn align_azimuth_to_north(&mut self, duration: Duration, now: Instant) -> AlignOutcome {
        self.azimuth.align_to_north(&mut self.camera, duration, now)
    }

    /// Programmatic rotation; wins over any running alignment
    pub fn rotate_to(&mut self, azimuth: f64) {
        self.azimuth.rotate_to(&mut self.camera, azimuth);
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.camera.set_zoom(zoom);
    }

    pub fn set_tilt(&mut self, tilt: f64) {
        self.camera.set_tilt(tilt);
    }

    /// Feeds one platform gesture event and applies the resulting change
    pub fn handle_gesture(&mut self, event: &GestureEvent) -> GestureResponse {
        let response = self.gestures.handle(event, &self.camera);
        match &response {
            GestureResponse::Pan(delta) => self.camera.translate(*delta),
            GestureResponse::Zoom(factor) => {
                let zoom = self.camera.zoom() * factor;
                self.camera.set_zoom(zoom);
            }
            GestureResponse::Rotate(delta) => self.azimuth.rotate_by(&mut self.camera, *delta),
            // Fingers on the map take over from the alignment at once,
            // before the rotation passes its threshold.
            GestureResponse::Began(GestureKind::Rotate)
            | GestureResponse::Recognizing(GestureKind::Rotate) => {
                self.azimuth.cancel();
            }
            _ => {}
        }
        response
    }

    /// Cancels every gesture in progress, e.g. when the view is backgrounded
    pub fn cancel_gestures(&mut self) {
        let cancelled = self.gestures.cancel_all();
        if !cancelled.is_empty() {
            log::debug!("cancelled gestures {:?}", cancelled);
        }
    }

    pub fn active_style(&self) -> StyleId {
        self.styles.active_style()
    }

    pub fn pending_style(&self) -> Option<StyleId> {
        self.styles.pending_style()
    }

    pub fn activate(&mut self, style: StyleId) -> ActivationStatus {
        self.styles.activate(style)
    }

    pub fn activate_provider_a(&mut self) -> ActivationStatus {
        self.activate(StyleId::OnlineRasterProviderA)
    }

    pub fn activate_provider_b(&mut self) -> ActivationStatus {
        self.activate(StyleId::OnlineRasterProviderB)
    }

    pub fn activate_offline_dataset(&mut self) -> ActivationStatus {
        self.activate(StyleId::OfflineVectorDataset)
    }

    pub fn frame(&mut self) {
        self.frame_at(Instant::now());
    }

    /// One frame: step the alignment, apply finished style swaps, settle
    /// gestures and hand the camera to the engine
    pub fn frame_at(&mut self, now: Instant) {
        self.azimuth.advance(&mut self.camera, now);
        self.styles.poll(&mut self.engine);
        self.gestures.settle_at(now);
        self.engine.set_camera_state(&self.camera);
    }
}
