#![forbid(unsafe_code)]

//! The driver: public entry points plus the cooperative event loop.
//!
//! A [`Toaster`] owns the render layer, the instance registry and a virtual
//! clock. Hosts forward environment signals with [`Toaster::signal`] (or the
//! broadcast helpers [`Toaster::resize`] and
//! [`Toaster::visibility_changed`]) and move time forward with
//! [`Toaster::advance_to`] / [`Toaster::advance_by`].
//!
//! ```
//! use std::time::Duration;
//! use serde_json::json;
//! use toastlet::{HeadlessRenderer, Phase, Toaster};
//!
//! let mut toaster = Toaster::new(HeadlessRenderer::new());
//! let toast = toaster.notify("success", "Saved", &json!({"duration": 1000})).unwrap();
//! toaster.advance_by(Duration::from_millis(320));
//! assert_eq!(toaster.phase(toast.id()), Some(Phase::Active));
//! toaster.advance_by(Duration::from_millis(1000));
//! assert_eq!(toaster.phase(toast.id()), Some(Phase::Closing));
//! toaster.advance_by(Duration::from_millis(320));
//! assert_eq!(toaster.phase(toast.id()), None);
//! ```
//!
//! # Event loop
//!
//! `advance_to(t)` first notices elements removed from outside, then runs
//! pending animation frames, then fires due timers one at a time in
//! `(deadline, insertion)` order. The clock jumps to each timer's deadline
//! before it fires, and frames requested by a timer run right after it.

use std::fmt;
use std::time::Duration;

use serde_json::Value;
use toastlet_core::event::ToastSignal;
use toastlet_core::gesture::{GestureConfig, GestureConfigError, GestureRecognizer};
use toastlet_core::pause::PauseReasons;
use toastlet_core::timer::Timestamp;

use crate::config::{Resolved, ToastConfig};
use crate::controller::{Followups, ToastController};
use crate::error::{ConfigWarning, NotifyError};
use crate::event_loop::EventLoop;
use crate::kind::ToastKind;
use crate::lifecycle::{CloseCause, Input, Phase, ToastRecord};
use crate::registry::{Bucket, InstanceRegistry, ToastId};
use crate::render::{ObserverTarget, RenderLayer, ToastElement, listener_plan};

/// Returned by a successful `notify`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastHandle {
    id: ToastId,
    warnings: Vec<ConfigWarning>,
}

impl ToastHandle {
    #[must_use]
    pub const fn id(&self) -> ToastId {
        self.id
    }

    /// Corrections applied to the options of this toast.
    #[must_use]
    pub fn warnings(&self) -> &[ConfigWarning] {
        &self.warnings
    }

    /// Close this toast. Returns false if it was already closing or gone.
    pub fn close<R: RenderLayer>(&self, toaster: &mut Toaster<R>) -> bool {
        toaster.close(Some(self.id))
    }
}

/// Toast driver over a render layer.
pub struct Toaster<R: RenderLayer> {
    render: R,
    registry: InstanceRegistry<ToastController<R::Element>>,
    events: EventLoop,
    gesture: GestureRecognizer,
}

impl<R: RenderLayer> fmt::Debug for Toaster<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Toaster")
            .field("now", &self.events.now)
            .field("live", &self.registry.len())
            .field("pending_timers", &self.events.timers.len())
            .finish_non_exhaustive()
    }
}

impl<R: RenderLayer> Toaster<R> {
    /// A toaster with the default gesture thresholds.
    pub fn new(render: R) -> Self {
        Self::build(render, GestureRecognizer::default())
    }

    /// A toaster with custom swipe and tap thresholds.
    pub fn with_gesture_config(
        render: R,
        config: GestureConfig,
    ) -> Result<Self, GestureConfigError> {
        Ok(Self::build(render, GestureRecognizer::new(config)?))
    }

    fn build(render: R, gesture: GestureRecognizer) -> Self {
        let env = render.environment();
        let root_removed = !render.has_mount_root();
        Self {
            render,
            registry: InstanceRegistry::new(),
            events: EventLoop {
                env,
                root_removed,
                ..EventLoop::default()
            },
            gesture,
        }
    }

    /// Show a notification of type `kind` with raw JSON options.
    ///
    /// # Errors
    ///
    /// [`NotifyError::NoMountRoot`], [`NotifyError::UnknownType`],
    /// [`NotifyError::InvalidOptions`] for a non-object `options`, or
    /// [`NotifyError::Render`]. Nothing is registered on error.
    pub fn notify(
        &mut self,
        kind: &str,
        content: &str,
        options: &Value,
    ) -> Result<ToastHandle, NotifyError> {
        self.try_notify(kind, content, options).map_err(rejected)
    }

    /// Show a notification from an already resolved configuration.
    ///
    /// # Errors
    ///
    /// [`NotifyError::NoMountRoot`] or [`NotifyError::Render`].
    pub fn notify_config(
        &mut self,
        config: ToastConfig,
        content: &str,
    ) -> Result<ToastHandle, NotifyError> {
        self.spawn(config, content, Vec::new()).map_err(rejected)
    }

    fn try_notify(
        &mut self,
        kind: &str,
        content: &str,
        options: &Value,
    ) -> Result<ToastHandle, NotifyError> {
        let kind =
            ToastKind::lookup(kind).ok_or_else(|| NotifyError::UnknownType(kind.to_owned()))?;
        let Resolved { config, warnings } = ToastConfig::resolve(kind, options)?;
        self.spawn(config, content, warnings)
    }

    fn spawn(
        &mut self,
        config: ToastConfig,
        content: &str,
        warnings: Vec<ConfigWarning>,
    ) -> Result<ToastHandle, NotifyError> {
        if !self.render.has_mount_root() {
            return Err(NotifyError::NoMountRoot);
        }
        self.refresh_environment();
        let render = &mut self.render;
        let gesture = &self.gesture;
        let bucket = Bucket::from_stackable(config.stackable);
        let id = self.registry.try_register(bucket, |id| {
            let element = render
                .render(id, &config, content)
                .map_err(|err| NotifyError::Render(err.0))?;
            let bindings = listener_plan(&config)
                .into_iter()
                .map(|(source, kind)| render.bind(id, source, kind))
                .collect();
            let observers = [ObserverTarget::Body, ObserverTarget::Root]
                .into_iter()
                .map(|target| render.observe(id, target))
                .collect();
            let mut controller = ToastController::new(id, config, element, gesture.clone());
            controller.attach_resources(bindings, observers);
            Ok(controller)
        })?;
        toastlet_core::debug!(toast_id = id.get(), live = self.registry.len(), "toast mounted");
        self.deliver(id, Input::Mount);
        Ok(ToastHandle { id, warnings })
    }

    /// Close one toast, or the most recently created one when `id` is `None`.
    ///
    /// Returns true if a toast started closing.
    pub fn close(&mut self, id: Option<ToastId>) -> bool {
        let Some(id) = id.or_else(|| self.registry.last_active_id()) else {
            return false;
        };
        self.registry.close(id, CloseCause::Api, &mut self.events)
    }

    /// Close every toast. Returns how many started closing.
    pub fn close_all(&mut self) -> usize {
        self.registry.close_all(CloseCause::Bulk, &mut self.events)
    }

    pub fn close_all_stackable(&mut self) -> usize {
        self.registry
            .close_all_stackable(CloseCause::Bulk, &mut self.events)
    }

    pub fn close_all_non_stackable(&mut self) -> usize {
        self.registry
            .close_all_non_stackable(CloseCause::Bulk, &mut self.events)
    }

    /// Deliver an environment signal to one toast.
    ///
    /// Returns false for unknown (already removed) ids.
    pub fn signal(&mut self, id: ToastId, signal: ToastSignal) -> bool {
        self.refresh_environment();
        self.deliver(id, Input::Signal(signal))
    }

    /// The viewport changed size; re-layout every toast.
    pub fn resize(&mut self) {
        self.broadcast(ToastSignal::Resize);
    }

    /// The document's visibility changed; re-read it from the render layer.
    pub fn visibility_changed(&mut self) {
        self.refresh_environment();
        let hidden = self.events.env.document_hidden;
        self.broadcast(ToastSignal::VisibilityChange { hidden });
    }

    fn broadcast(&mut self, signal: ToastSignal) {
        self.refresh_environment();
        for id in self.registry.ids(None) {
            self.deliver(id, Input::Signal(signal));
        }
    }

    /// Start closing every toast whose element was removed from outside,
    /// or every toast at all once the mount root itself is gone.
    ///
    /// Returns how many were found.
    pub fn sweep_detached(&mut self) -> usize {
        let root_removed = !self.render.has_mount_root();
        self.events.root_removed = root_removed;
        let detached: Vec<ToastId> = self
            .registry
            .ids(None)
            .into_iter()
            .filter(|id| {
                self.registry.get(*id).is_some_and(|controller| {
                    (root_removed || !controller.element().is_attached())
                        && !matches!(controller.record().phase(), Phase::Closing | Phase::Removed)
                })
            })
            .collect();
        if root_removed && !detached.is_empty() {
            toastlet_core::warn!(count = detached.len(), "mount root removed, closing toasts");
        }
        for id in &detached {
            self.deliver(*id, Input::Signal(ToastSignal::Detached));
        }
        detached.len()
    }

    /// Run the event loop up to `deadline`.
    pub fn advance_to(&mut self, deadline: Timestamp) {
        self.sweep_detached();
        self.run_frames();
        while let Some(fired) = self.events.timers.pop_due(deadline) {
            self.events.now = self.events.now.max(fired.deadline);
            let (id, task) = fired.payload;
            self.deliver(id, task.input());
            self.run_frames();
        }
        self.events.now = self.events.now.max(deadline);
    }

    pub fn advance_by(&mut self, delta: Duration) {
        self.advance_to(self.events.now + delta);
    }

    #[must_use]
    pub fn now(&self) -> Timestamp {
        self.events.now
    }

    /// Deadline of the earliest pending timer.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Timestamp> {
        self.events.timers.next_deadline()
    }

    /// Pending timers owned by `id`.
    #[must_use]
    pub fn pending_timers(&self, id: ToastId) -> usize {
        self.events.pending_for(id)
    }

    /// Phase of a registered toast; `None` once it has been removed.
    #[must_use]
    pub fn phase(&self, id: ToastId) -> Option<Phase> {
        self.record(id).map(ToastRecord::phase)
    }

    #[must_use]
    pub fn pause_reasons(&self, id: ToastId) -> Option<PauseReasons> {
        self.record(id).map(ToastRecord::pause_reasons)
    }

    #[must_use]
    pub fn is_timer_armed(&self, id: ToastId) -> bool {
        self.record(id).is_some_and(ToastRecord::is_timer_armed)
    }

    #[must_use]
    pub fn record(&self, id: ToastId) -> Option<&ToastRecord> {
        self.registry.get(id).map(ToastController::record)
    }

    #[must_use]
    pub fn config(&self, id: ToastId) -> Option<&ToastConfig> {
        self.registry.get(id).map(ToastController::config)
    }

    /// Stop (or resume) delivering clicks to a toast's click handler.
    pub fn set_click_disabled(&mut self, id: ToastId, disabled: bool) -> bool {
        let Some(controller) = self.registry.get_mut(id) else {
            return false;
        };
        controller.record_mut().set_click_disabled(disabled);
        true
    }

    /// Registered toasts, including those still closing.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.registry.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    #[must_use]
    pub fn last_active_id(&self) -> Option<ToastId> {
        self.registry.last_active_id()
    }

    #[must_use]
    pub fn ids(&self, bucket: Option<Bucket>) -> Vec<ToastId> {
        self.registry.ids(bucket)
    }

    #[must_use]
    pub fn render_layer(&self) -> &R {
        &self.render
    }

    pub fn render_layer_mut(&mut self) -> &mut R {
        &mut self.render
    }

    fn refresh_environment(&mut self) {
        self.events.env = self.render.environment();
        self.events.root_removed = !self.render.has_mount_root();
    }

    fn run_frames(&mut self) {
        for (id, task) in self.events.frames.drain() {
            self.deliver(id, task.input());
        }
    }

    fn deliver(&mut self, id: ToastId, input: Input) -> bool {
        let Some(controller) = self.registry.get_mut(id) else {
            return false;
        };
        let followups = controller.handle(input, &mut self.events);
        self.follow_up(id, followups);
        true
    }

    fn follow_up(&mut self, id: ToastId, followups: Followups) {
        if followups.evict_non_stackable {
            let evicted =
                self.registry
                    .evict_non_stackable(id, CloseCause::Evicted, &mut self.events);
            if evicted > 0 {
                toastlet_core::debug!(toast_id = id.get(), evicted, "evicted non-stackable toasts");
            }
        }
        if followups.teardown {
            self.teardown(id);
        }
    }

    fn teardown(&mut self, id: ToastId) {
        let Some(controller) = self.registry.unregister(id) else {
            return;
        };
        let (bindings, observers) = controller.into_resources();
        for binding in bindings {
            self.render.unbind(binding);
        }
        for observer in observers {
            self.render.disconnect(observer);
        }
        toastlet_core::debug!(toast_id = id.get(), live = self.registry.len(), "toast removed");
    }
}

fn rejected(err: NotifyError) -> NotifyError {
    toastlet_core::error!(error = %err, "notification rejected");
    err
}
