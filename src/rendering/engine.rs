use crate::core::camera::CameraState;
use crate::style::source::StyleConfiguration;
use crate::Result;

/// The map-rendering engine as seen from the coordination layer.
///
/// All calls happen on the interactive thread.
pub trait RenderEngine {
    /// Receives the camera once per rendered frame
    fn set_camera_state(&mut self, camera: &CameraState);

    /// Starts using `configuration`. `Ok` acknowledges the swap; on `Err`
    /// the engine must keep drawing with its previous style.
    fn set_active_style(&mut self, configuration: &StyleConfiguration) -> Result<()>;

    /// Frees engine-side state tied to a configuration that is no longer
    /// active. The handles are dropped when this returns.
    fn release_style_resources(&mut self, configuration: StyleConfiguration);
}

impl<E: RenderEngine + ?Sized> RenderEngine for Box<E> {
    fn set_camera_state(&mut self, camera: &CameraState) {
        (**self).set_camera_state(camera)
    }

    fn set_active_style(&mut self, configuration: &StyleConfiguration) -> Result<()> {
        (**self).set_active_style(configuration)
    }

    fn release_style_resources(&mut self, configuration: StyleConfiguration) {
        (**self).release_style_resources(configuration)
    }
}
