//! Ownership and atomic replacement of the active style
//!
//! Activation is a three step protocol:
//!
//! 1. resource construction runs on a [`TaskSpawner`] and may block;
//! 2. the finished configuration is offered to the engine from `poll`,
//!    which runs on the interactive thread;
//! 3. only after the engine acknowledges it is the previous configuration
//!    released.
//!
//! Requests are numbered. Only the newest request may complete; the output
//! of any older one is dropped unseen by the engine.

use super::loader::StyleResourceLoader;
use super::source::{StyleConfiguration, StyleId};
use crate::core::observable::Observable;
use crate::rendering::engine::RenderEngine;
use crate::runtime::{TaskHandle, TaskSpawner};
use crate::Result;
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::Arc;

/// Outcome notifications published by the style manager
#[derive(Debug, Clone, PartialEq)]
pub enum ActivationEvent {
    /// The style is now active (also sent when it already was)
    Activated(StyleId),
    /// Activation failed; the previous style stays active
    Failed { style: StyleId, reason: String },
    /// A newer request replaced this one before it completed
    Superseded(StyleId),
}

/// Immediate answer to an activation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationStatus {
    /// Requested style is already active; nothing to do
    AlreadyActive,
    /// Construction is under way; completion arrives through `poll`
    Pending { generation: u64 },
    /// The construction job could not even be started
    Failed,
}

struct Completion {
    generation: u64,
    style: StyleId,
    result: Result<StyleConfiguration>,
}

struct PendingActivation {
    generation: u64,
    style: StyleId,
    handle: Box<dyn TaskHandle>,
}

/// Exclusively owns the active [`StyleConfiguration`]
pub struct MapStyleManager {
    active: StyleConfiguration,
    pending: Option<PendingActivation>,
    next_generation: u64,
    loader: Arc<dyn StyleResourceLoader>,
    spawner: Arc<dyn TaskSpawner>,
    completions_tx: Sender<Completion>,
    completions_rx: Receiver<Completion>,
    events: Observable<ActivationEvent>,
}

impl MapStyleManager {
    /// Builds the initial style on the calling thread and installs it.
    ///
    /// Only meant for session start-up, before any frame is drawn.
    pub fn bootstrap<E>(
        initial: StyleId,
        loader: Arc<dyn StyleResourceLoader>,
        spawner: Arc<dyn TaskSpawner>,
        engine: &mut E,
    ) -> Result<Self>
    where
        E: RenderEngine + ?Sized,
    {
        let configuration = loader.load(initial)?;
        engine.set_active_style(&configuration)?;
        log::info!("initial style {} installed", initial);
        Ok(Self::with_active(configuration, loader, spawner))
    }

    /// Wraps a configuration the engine is already using
    pub fn with_active(
        active: StyleConfiguration,
        loader: Arc<dyn StyleResourceLoader>,
        spawner: Arc<dyn TaskSpawner>,
    ) -> Self {
        let (completions_tx, completions_rx) = unbounded();
        Self {
            active,
            pending: None,
            next_generation: 0,
            loader,
            spawner,
            completions_tx,
            completions_rx,
            events: Observable::new(),
        }
    }

    pub fn active(&self) -> &StyleConfiguration {
        &self.active
    }

    pub fn active_style(&self) -> StyleId {
        self.active.id()
    }

    /// Style currently being constructed, if any
    pub fn pending_style(&self) -> Option<StyleId> {
        self.pending.as_ref().map(|pending| pending.style)
    }

    pub fn events(&self) -> &Observable<ActivationEvent> {
        &self.events
    }

    /// Requests a switch to `style`.
    ///
    /// A request for a different style than the one in flight supersedes
    /// it. Asking for the style already in flight keeps that request.
    pub fn activate(&mut self, style: StyleId) -> ActivationStatus {
        if let Some(pending) = &self.pending {
            if pending.style == style {
                return ActivationStatus::Pending {
                    generation: pending.generation,
                };
            }
        }
        self.cancel_pending();

        if style == self.active.id() {
            log::debug!("{} already active", style);
            self.events.notify(&ActivationEvent::Activated(style));
            return ActivationStatus::AlreadyActive;
        }

        let generation = self.next_generation;
        self.next_generation += 1;

        let loader = Arc::clone(&self.loader);
        let tx = self.completions_tx.clone();
        let job = Box::new(move || {
            let result = loader.load(style);
            // The receiver lives as long as the manager; a send error only
            // means the manager is gone and nobody wants the result.
            let _ = tx.send(Completion {
                generation,
                style,
                result,
            });
        });

        match self.spawner.spawn_blocking_boxed(job) {
            Ok(handle) => {
                log::debug!("activation #{} of {} started", generation, style);
                self.pending = Some(PendingActivation {
                    generation,
                    style,
                    handle,
                });
                ActivationStatus::Pending { generation }
            }
            Err(e) => {
                log::warn!("could not start activation of {}: {}", style, e);
                self.events.notify(&ActivationEvent::Failed {
                    style,
                    reason: e.to_string(),
                });
                ActivationStatus::Failed
            }
        }
    }

    /// Abandons the in-flight request, if any. Its result will be dropped.
    pub fn cancel_pending(&mut self) -> Option<StyleId> {
        let pending = self.pending.take()?;
        pending.handle.cancel();
        log::debug!(
            "activation #{} of {} superseded",
            pending.generation,
            pending.style
        );
        self.events
            .notify(&ActivationEvent::Superseded(pending.style));
        Some(pending.style)
    }

    /// Applies finished constructions. Call from the interactive thread,
    /// typically once per frame. Returns how many results were applied.
    pub fn poll<E>(&mut self, engine: &mut E) -> usize
    where
        E: RenderEngine + ?Sized,
    {
        let mut applied = 0;
        while let Ok(completion) = self.completions_rx.try_recv() {
            let current = self
                .pending
                .as_ref()
                .map(|pending| pending.generation == completion.generation)
                .unwrap_or(false);
            if !current {
                log::debug!(
                    "discarding stale activation #{} of {}",
                    completion.generation,
                    completion.style
                );
                continue;
            }

            self.pending = None;
            applied += 1;
            match completion.result {
                Ok(configuration) => self.swap(configuration, engine),
                Err(e) => {
                    log::warn!("activation of {} failed: {}", completion.style, e);
                    self.events.notify(&ActivationEvent::Failed {
                        style: completion.style,
                        reason: e.to_string(),
                    });
                }
            }
        }
        applied
    }

    fn swap<E>(&mut self, configuration: StyleConfiguration, engine: &mut E)
    where
        E: RenderEngine + ?Sized,
    {
        let style = configuration.id();
        if let Err(e) = engine.set_active_style(&configuration) {
            log::warn!("engine rejected {}: {}", style, e);
            self.events.notify(&ActivationEvent::Failed {
                style,
                reason: e.to_string(),
            });
            return;
        }

        let previous = std::mem::replace(&mut self.active, configuration);
        let previous_style = previous.id();
        engine.release_style_resources(previous);
        log::info!("switched style {} -> {}", previous_style, style);
        self.events.notify(&ActivationEvent::Activated(style));
    }
}
