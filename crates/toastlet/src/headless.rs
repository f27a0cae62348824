#![forbid(unsafe_code)]

//! In-memory render layer.
//!
//! [`HeadlessRenderer`] implements [`RenderLayer`] without any display. Its
//! state lives behind a shared `Rc<RefCell<_>>`, so a clone kept outside the
//! [`Toaster`](crate::Toaster) can inspect elements, count live bindings,
//! simulate a host removing an element, or define keyframe timings for
//! custom animation classes.
//!
//! ```
//! use serde_json::json;
//! use toastlet::{HeadlessRenderer, Toaster};
//!
//! let renderer = HeadlessRenderer::new();
//! let dom = renderer.clone();
//! let mut toaster = Toaster::new(renderer);
//! let toast = toaster.notify("info", "Saved", &json!({})).unwrap();
//! assert!(dom.live_bindings(toast.id()) > 0);
//! ```

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;
use std::time::Duration;

use serde_json::Value;
use toastlet_core::animation::{AnimatedElement, ComputedTiming, PlayState};
use toastlet_core::event::SignalKind;
use toastlet_core::geometry::Translate;

use crate::config::ToastConfig;
use crate::registry::ToastId;
use crate::render::{
    BindingId, Environment, Layout, ListenerSource, ObserverId, ObserverTarget, RenderError,
    RenderLayer, ToastElement,
};

/// Progress bar state of a headless element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Progress {
    /// Never started.
    #[default]
    Idle,
    /// Running from its start edge over `duration`.
    Running { duration: Duration },
    /// Frozen mid-way.
    Frozen,
}

/// Inspectable state of one headless element.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementState {
    pub id: ToastId,
    /// JSON snapshot of the configuration the element was built from.
    pub config: Value,
    pub content: String,
    pub attached: bool,
    pub removed: bool,
    pub classes: Vec<String>,
    pub play_state: PlayState,
    pub opacity: f32,
    pub translate: Translate,
    pub transition_enabled: bool,
    pub reflows: u32,
    pub controls_visible: bool,
    pub pause_icon_paused: bool,
    pub progress: Progress,
    /// Number of times progress was restarted from the start edge.
    pub progress_restarts: u32,
    pub layout: Option<Layout>,
    pub blurs: u32,
}

impl ElementState {
    fn new(id: ToastId, config: &ToastConfig, content: &str) -> Self {
        Self {
            id,
            config: config.to_json(),
            content: content.to_owned(),
            attached: true,
            removed: false,
            classes: Vec::new(),
            play_state: PlayState::Running,
            opacity: 0.0,
            translate: Translate::NONE,
            transition_enabled: false,
            reflows: 0,
            controls_visible: false,
            pause_icon_paused: false,
            progress: Progress::Idle,
            progress_restarts: 0,
            layout: None,
            blurs: 0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Keyframes {
    duration: Duration,
    delay: Duration,
}

#[derive(Debug)]
struct HeadlessState {
    mount_root: bool,
    environment: Environment,
    next_binding: u64,
    next_observer: u64,
    bindings: BTreeMap<BindingId, (ToastId, ListenerSource, SignalKind)>,
    observers: BTreeMap<ObserverId, (ToastId, ObserverTarget)>,
    elements: BTreeMap<ToastId, Rc<RefCell<ElementState>>>,
    keyframes: HashMap<String, Keyframes>,
    fail_next_render: Option<String>,
}

impl Default for HeadlessState {
    fn default() -> Self {
        Self {
            mount_root: true,
            environment: Environment::desktop(),
            next_binding: 0,
            next_observer: 0,
            bindings: BTreeMap::new(),
            observers: BTreeMap::new(),
            elements: BTreeMap::new(),
            keyframes: HashMap::new(),
            fail_next_render: None,
        }
    }
}

/// Render layer that keeps everything in memory.
#[derive(Debug, Clone, Default)]
pub struct HeadlessRenderer {
    state: Rc<RefCell<HeadlessState>>,
}

impl HeadlessRenderer {
    /// A desktop environment with a mount root.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_environment(environment: Environment) -> Self {
        let renderer = Self::new();
        renderer.set_environment(environment);
        renderer
    }

    pub fn set_environment(&self, environment: Environment) {
        self.state.borrow_mut().environment = environment;
    }

    pub fn set_viewport_width(&self, width: u32) {
        self.state.borrow_mut().environment.viewport_width = width;
    }

    pub fn set_document_hidden(&self, hidden: bool) {
        self.state.borrow_mut().environment.document_hidden = hidden;
    }

    pub fn set_mount_root(&self, present: bool) {
        self.state.borrow_mut().mount_root = present;
    }

    /// Make elements carrying `class` report a keyframe animation.
    pub fn define_keyframes(&self, class: &str, duration: Duration, delay: Duration) {
        self.state
            .borrow_mut()
            .keyframes
            .insert(class.to_owned(), Keyframes { duration, delay });
    }

    /// Fail the next [`RenderLayer::render`] call with `reason`.
    pub fn fail_next_render(&self, reason: &str) {
        self.state.borrow_mut().fail_next_render = Some(reason.to_owned());
    }

    /// Simulate code outside the toast removing its element.
    pub fn detach(&self, id: ToastId) -> bool {
        let state = self.state.borrow();
        let Some(element) = state.elements.get(&id) else {
            return false;
        };
        element.borrow_mut().attached = false;
        true
    }

    /// Snapshot of an element's state.
    #[must_use]
    pub fn element(&self, id: ToastId) -> Option<ElementState> {
        self.state
            .borrow()
            .elements
            .get(&id)
            .map(|element| element.borrow().clone())
    }

    /// Live listener bindings of one toast.
    #[must_use]
    pub fn live_bindings(&self, id: ToastId) -> usize {
        self.state
            .borrow()
            .bindings
            .values()
            .filter(|(owner, _, _)| *owner == id)
            .count()
    }

    /// Live bindings of one toast on one source.
    #[must_use]
    pub fn bindings_on(&self, id: ToastId, source: ListenerSource) -> Vec<SignalKind> {
        self.state
            .borrow()
            .bindings
            .values()
            .filter(|(owner, src, _)| *owner == id && *src == source)
            .map(|(_, _, kind)| *kind)
            .collect()
    }

    #[must_use]
    pub fn total_live_bindings(&self) -> usize {
        self.state.borrow().bindings.len()
    }

    #[must_use]
    pub fn live_observers(&self, id: ToastId) -> usize {
        self.state
            .borrow()
            .observers
            .values()
            .filter(|(owner, _)| *owner == id)
            .count()
    }

    /// Elements still attached under the mount root.
    #[must_use]
    pub fn mounted(&self) -> Vec<ToastId> {
        self.state
            .borrow()
            .elements
            .iter()
            .filter(|(_, element)| element.borrow().attached)
            .map(|(id, _)| *id)
            .collect()
    }
}

impl RenderLayer for HeadlessRenderer {
    type Element = HeadlessElement;

    fn has_mount_root(&self) -> bool {
        self.state.borrow().mount_root
    }

    fn environment(&self) -> Environment {
        self.state.borrow().environment
    }

    fn render(
        &mut self,
        id: ToastId,
        config: &ToastConfig,
        content: &str,
    ) -> Result<HeadlessElement, RenderError> {
        let mut state = self.state.borrow_mut();
        if let Some(reason) = state.fail_next_render.take() {
            return Err(RenderError(reason));
        }
        let element = Rc::new(RefCell::new(ElementState::new(id, config, content)));
        state.elements.insert(id, Rc::clone(&element));
        Ok(HeadlessElement {
            element,
            shared: Rc::clone(&self.state),
        })
    }

    fn bind(&mut self, id: ToastId, source: ListenerSource, kind: SignalKind) -> BindingId {
        let mut state = self.state.borrow_mut();
        state.next_binding += 1;
        let binding = BindingId(state.next_binding);
        state.bindings.insert(binding, (id, source, kind));
        binding
    }

    fn unbind(&mut self, binding: BindingId) {
        self.state.borrow_mut().bindings.remove(&binding);
    }

    fn observe(&mut self, id: ToastId, target: ObserverTarget) -> ObserverId {
        let mut state = self.state.borrow_mut();
        state.next_observer += 1;
        let observer = ObserverId(state.next_observer);
        state.observers.insert(observer, (id, target));
        observer
    }

    fn disconnect(&mut self, observer: ObserverId) {
        self.state.borrow_mut().observers.remove(&observer);
    }
}

/// Element produced by [`HeadlessRenderer`].
#[derive(Debug)]
pub struct HeadlessElement {
    element: Rc<RefCell<ElementState>>,
    shared: Rc<RefCell<HeadlessState>>,
}

impl AnimatedElement for HeadlessElement {
    fn set_animation_classes(&mut self, classes: &[String]) {
        self.element.borrow_mut().classes = classes.to_vec();
    }

    fn set_play_state(&mut self, state: PlayState) {
        self.element.borrow_mut().play_state = state;
    }

    fn set_opacity(&mut self, opacity: f32) {
        self.element.borrow_mut().opacity = opacity;
    }

    fn set_translate(&mut self, translate: Translate) {
        self.element.borrow_mut().translate = translate;
    }

    fn set_transition_enabled(&mut self, enabled: bool) {
        self.element.borrow_mut().transition_enabled = enabled;
    }

    fn force_reflow(&mut self) {
        self.element.borrow_mut().reflows += 1;
    }

    fn computed_timing(&self) -> ComputedTiming {
        let element = self.element.borrow();
        let shared = self.shared.borrow();
        let layers: Vec<(&str, Keyframes)> = element
            .classes
            .iter()
            .filter_map(|class| shared.keyframes.get(class).map(|k| (class.as_str(), *k)))
            .collect();
        if layers.is_empty() {
            return ComputedTiming::none();
        }
        let join = |f: &dyn Fn(&(&str, Keyframes)) -> String| {
            layers.iter().map(f).collect::<Vec<_>>().join(", ")
        };
        ComputedTiming {
            names: join(&|(name, _)| (*name).to_owned()),
            durations: join(&|(_, k)| format!("{}ms", k.duration.as_millis())),
            delays: join(&|(_, k)| format!("{}ms", k.delay.as_millis())),
        }
    }
}

impl ToastElement for HeadlessElement {
    fn is_attached(&self) -> bool {
        self.element.borrow().attached
    }

    fn remove(&mut self) {
        let mut element = self.element.borrow_mut();
        element.attached = false;
        element.removed = true;
    }

    fn show_controls(&mut self, visible: bool) {
        self.element.borrow_mut().controls_visible = visible;
    }

    fn set_pause_icon(&mut self, paused: bool) {
        self.element.borrow_mut().pause_icon_paused = paused;
    }

    fn start_progress(&mut self, duration: Duration) {
        let mut element = self.element.borrow_mut();
        element.progress = Progress::Running { duration };
        element.progress_restarts += 1;
    }

    fn freeze_progress(&mut self) {
        let mut element = self.element.borrow_mut();
        if matches!(element.progress, Progress::Running { .. }) {
            element.progress = Progress::Frozen;
        }
    }

    fn apply_layout(&mut self, layout: &Layout) {
        self.element.borrow_mut().layout = Some(*layout);
    }

    fn blur(&mut self) {
        self.element.borrow_mut().blurs += 1;
    }
}
