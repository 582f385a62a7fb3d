use super::engine::RenderEngine;
use crate::core::camera::CameraState;
use crate::style::source::{StyleConfiguration, StyleId};
use crate::{MapError, Result};
use fxhash::FxHashSet;

/// Engine stand-in that draws nothing and records what it was told.
///
/// Useful for hosts without a GPU (server-side processing, CLI tools) and
/// for exercising the coordination layer in tests.
#[derive(Debug, Default)]
pub struct HeadlessEngine {
    frame_count: u64,
    last_camera: Option<CameraState>,
    active_style: Option<StyleId>,
    style_history: Vec<StyleId>,
    released: Vec<StyleId>,
    rejected_styles: FxHashSet<StyleId>,
}

impl HeadlessEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `set_active_style` refuse `style`
    pub fn reject_style(&mut self, style: StyleId) {
        self.rejected_styles.insert(style);
    }

    pub fn accept_style(&mut self, style: StyleId) {
        self.rejected_styles.remove(&style);
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn last_camera(&self) -> Option<&CameraState> {
        self.last_camera.as_ref()
    }

    pub fn active_style(&self) -> Option<StyleId> {
        self.active_style
    }

    /// Every style acknowledged, in order
    pub fn style_history(&self) -> &[StyleId] {
        &self.style_history
    }

    /// Every style released, in order
    pub fn released(&self) -> &[StyleId] {
        &self.released
    }
}

impl RenderEngine for HeadlessEngine {
    fn set_camera_state(&mut self, camera: &CameraState) {
        self.frame_count += 1;
        self.last_camera = Some(camera.clone());
    }

    fn set_active_style(&mut self, configuration: &StyleConfiguration) -> Result<()> {
        let id = configuration.id();
        if self.rejected_styles.contains(&id) {
            return Err(MapError::StyleRejected(format!("headless engine refused {}", id)));
        }
        self.active_style = Some(id);
        self.style_history.push(id);
        Ok(())
    }

    fn release_style_resources(&mut self, configuration: StyleConfiguration) {
        self.released.push(configuration.id());
    }
}
