// Copyright 2025 the Dropstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The [`DragDrop`] facade: configuration, wiring, and the host-facing API.

use core::mem;

use dropstory_tree::{ElementId, Tree};
use tracing::{debug, warn};

use crate::config::{DragConfig, StackDirection};
use crate::context::DragContext;
use crate::engine::{DragEngine, DragSession, DropOutcome};
use crate::error::ConfigError;
use crate::input::{Gesture, InputEvent, InputNormalizer};
use crate::notify::Notification;
use crate::registry::DropzoneRegistry;
use crate::style::{InlineStyles, StyleApplicator};

/// Options for [`DragDrop::new`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DragDropOptions {
    /// Class name marking draggable elements. Required.
    pub draggable_class: String,
    /// Class name marking dropzones inside the play area.
    pub dropzone_class: Option<String>,
    /// Class name of the play area; the document root when `None`.
    pub play_area_class: Option<String>,
    /// Behaviour switches.
    pub config: DragConfig,
}

impl DragDropOptions {
    /// Options for elements carrying `draggable_class`, everything else default.
    pub fn new(draggable_class: impl Into<String>) -> Self {
        Self {
            draggable_class: draggable_class.into(),
            ..Self::default()
        }
    }

    /// Register dropzones by class name.
    pub fn dropzones(mut self, class: impl Into<String>) -> Self {
        self.dropzone_class = Some(class.into());
        self
    }

    /// Bound dragging to the element carrying `class`.
    pub fn play_area(mut self, class: impl Into<String>) -> Self {
        self.play_area_class = Some(class.into());
        self
    }

    /// Enable or disable stacking inside dropzones.
    pub fn stacking(mut self, enabled: bool) -> Self {
        self.config.stacking = enabled;
        self
    }

    /// Stacking direction.
    pub fn stack_direction(mut self, direction: StackDirection) -> Self {
        self.config.stack_direction = direction;
        self
    }

    /// Gap between stacked elements.
    pub fn stack_spacing(mut self, spacing: f64) -> Self {
        self.config.stack_spacing = spacing;
        self
    }

    /// Drag a ghost proxy instead of the element.
    pub fn ghost(mut self, enabled: bool) -> Self {
        self.config.ghost = enabled;
        self
    }

    /// Only accept drops inside dropzones.
    pub fn restrict_to_dropzones(mut self, enabled: bool) -> Self {
        self.config.restrict_to_dropzones = enabled;
        self
    }
}

/// Partial reconfiguration for [`DragDrop::update`]; `None` keeps the current value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DragDropUpdate {
    /// New draggable class; rebinds every draggable.
    pub draggable_class: Option<String>,
    /// New dropzone class.
    pub dropzone_class: Option<String>,
    /// New play area class.
    pub play_area_class: Option<String>,
    /// New stacking switch.
    pub stacking: Option<bool>,
    /// New stacking direction.
    pub stack_direction: Option<StackDirection>,
    /// New stacking gap.
    pub stack_spacing: Option<f64>,
    /// New ghost switch.
    pub ghost: Option<bool>,
    /// New restriction switch.
    pub restrict_to_dropzones: Option<bool>,
}

/// What [`DragDrop::handle_input`] did with an event.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct InputResponse {
    /// The host should suppress the platform's default action.
    pub prevent_default: bool,
    /// Gesture step the event produced, if any.
    pub gesture: Option<Gesture>,
    /// Set when the event finished a session.
    pub outcome: Option<DropOutcome>,
}

/// Drag and drop over an owned [`Tree`].
///
/// Owns the tree, the engine, the dropzone registry, and the input bindings,
/// and splits borrows into a [`DragContext`] for each operation.
#[derive(Debug)]
pub struct DragDrop<S: StyleApplicator = InlineStyles> {
    tree: Tree,
    styles: S,
    config: DragConfig,
    draggable_class: String,
    dropzone_class: Option<String>,
    play_area_class: Option<String>,
    engine: DragEngine,
    registry: DropzoneRegistry,
    input: InputNormalizer,
    notifications: Vec<Notification>,
}

impl DragDrop<InlineStyles> {
    /// Take ownership of `tree` and wire it up with the default inline styles.
    pub fn new(tree: Tree, options: DragDropOptions) -> Result<Self, ConfigError> {
        Self::with_styles(tree, options, InlineStyles)
    }
}

impl<S: StyleApplicator> DragDrop<S> {
    /// Take ownership of `tree` and wire it up with a custom style applicator.
    ///
    /// Fails when the draggable class is empty, the play area class matches
    /// nothing, or a dropzone class is given but matches nothing. Finding no
    /// draggable elements is only logged.
    pub fn with_styles(
        mut tree: Tree,
        options: DragDropOptions,
        styles: S,
    ) -> Result<Self, ConfigError> {
        let DragDropOptions {
            draggable_class,
            dropzone_class,
            play_area_class,
            config,
        } = options;
        if draggable_class.is_empty() {
            return Err(ConfigError::MissingDraggableClass);
        }
        let play_area = resolve_play_area(&tree, play_area_class.as_deref())?;
        let dropzones = match &dropzone_class {
            Some(class) => {
                let found = tree.query_class(play_area, class);
                if found.is_empty() {
                    return Err(ConfigError::DropzonesNotFound(class.clone()));
                }
                found
            }
            None => Vec::new(),
        };
        styles.apply_play_area_styles(&mut tree, play_area);

        let mut this = Self {
            tree,
            styles,
            config,
            draggable_class,
            dropzone_class,
            play_area_class,
            engine: DragEngine::new(play_area),
            registry: DropzoneRegistry::new(play_area),
            input: InputNormalizer::new(),
            notifications: Vec::new(),
        };
        this.bind_class_members();
        {
            let (mut cx, _, registry, _) = this.parts();
            registry.set_dropzones(&mut cx, dropzones);
        }
        let _ = this.tree.commit();
        debug!(?play_area, "drag and drop initialized");
        Ok(this)
    }

    fn parts(
        &mut self,
    ) -> (
        DragContext<'_, S>,
        &mut DragEngine,
        &mut DropzoneRegistry,
        &mut InputNormalizer,
    ) {
        let Self {
            tree,
            styles,
            config,
            engine,
            registry,
            input,
            notifications,
            ..
        } = self;
        (
            DragContext {
                tree,
                styles: &*styles,
                config: &*config,
                notifications,
            },
            engine,
            registry,
            input,
        )
    }

    fn bind_class_members(&mut self) {
        let found = self
            .tree
            .query_class(self.registry.play_area(), &self.draggable_class);
        if found.is_empty() {
            warn!(class = %self.draggable_class, "no draggable elements found");
        }
        for element in found {
            self.bind(element);
        }
    }

    fn bind(&mut self, element: ElementId) -> bool {
        let added = self.input.bind(element);
        self.styles.apply_draggable_styles(&mut self.tree, element);
        added
    }

    /// The element tree.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Mutable access to the element tree, for host edits between events.
    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    /// Give the tree back.
    pub fn into_tree(self) -> Tree {
        self.tree
    }

    /// Current behaviour switches.
    pub fn config(&self) -> &DragConfig {
        &self.config
    }

    /// Current draggable class.
    pub fn draggable_class(&self) -> &str {
        &self.draggable_class
    }

    /// Current play area.
    pub fn play_area(&self) -> ElementId {
        self.registry.play_area()
    }

    /// Bound draggable elements in binding order.
    pub fn draggables(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.input.bound()
    }

    /// The dropzone registry.
    pub fn dropzones(&self) -> &DropzoneRegistry {
        &self.registry
    }

    /// The drag engine.
    pub fn engine(&self) -> &DragEngine {
        &self.engine
    }

    /// Active session, if any.
    pub fn session(&self) -> Option<&DragSession> {
        self.engine.session()
    }

    /// Whether a session is active.
    pub fn is_dragging(&self) -> bool {
        self.engine.is_dragging()
    }

    /// Drain queued notifications in emission order.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        mem::take(&mut self.notifications)
    }

    /// Feed one raw input event.
    pub fn handle_input(&mut self, event: &InputEvent) -> InputResponse {
        let (mut cx, engine, registry, input) = self.parts();
        let normalized = input.normalize(event);
        let mut outcome = None;
        match normalized.gesture {
            Some(Gesture::Start { position, .. }) => {
                if let Err(err) = engine.start_drag(&mut cx, registry, event, position) {
                    warn!(%err, "drag not started");
                    input.release();
                }
            }
            Some(Gesture::Update { position }) => {
                engine.update_position(&mut cx, position);
            }
            Some(Gesture::End { position }) => {
                outcome = engine.handle_drop(&mut cx, registry, position, Some(event));
            }
            Some(Gesture::Cancel { .. }) => {
                outcome = engine.cancel_drag(&mut cx, registry);
            }
            None => {}
        }
        InputResponse {
            prevent_default: normalized.prevent_default,
            gesture: normalized.gesture,
            outcome,
        }
    }

    /// Merge `update` into the current configuration.
    ///
    /// Class names that match nothing are logged, returned, and leave the
    /// previous value in place; the rest of the update still applies. Stacking
    /// is then applied to or removed from every dropzone.
    pub fn update(&mut self, update: DragDropUpdate) -> Vec<ConfigError> {
        let DragDropUpdate {
            draggable_class,
            dropzone_class,
            play_area_class,
            stacking,
            stack_direction,
            stack_spacing,
            ghost,
            restrict_to_dropzones,
        } = update;
        let mut errors = Vec::new();

        if let Some(v) = stacking {
            self.config.stacking = v;
        }
        if let Some(v) = stack_direction {
            self.config.stack_direction = v;
        }
        if let Some(v) = stack_spacing {
            self.config.stack_spacing = v;
        }
        if let Some(v) = ghost {
            self.config.ghost = v;
        }
        if let Some(v) = restrict_to_dropzones {
            self.config.restrict_to_dropzones = v;
        }

        if let Some(class) = play_area_class {
            if let Err(err) = self.set_play_area(&class) {
                errors.push(err);
            }
        }

        if let Some(class) = draggable_class {
            if class.is_empty() {
                warn!("empty draggable class ignored");
                errors.push(ConfigError::MissingDraggableClass);
            } else if class != self.draggable_class {
                let previous: Vec<_> = self.input.bound().collect();
                for element in previous {
                    self.remove_draggable(element);
                }
                self.draggable_class = class;
                self.bind_class_members();
            }
        }

        if let Some(class) = dropzone_class {
            if let Err(err) = self.set_dropzones(&class) {
                errors.push(err);
            }
        }

        let stacking = self.config.stacking;
        let (mut cx, _, registry, _) = self.parts();
        let zones: Vec<_> = registry.iter().collect();
        for zone in zones {
            if stacking {
                registry.apply_stacking_styles(&mut cx, zone);
            } else {
                registry.remove_stacking_styles(&mut cx, zone);
            }
        }
        let _ = self.tree.commit();
        errors
    }

    fn set_play_area(&mut self, class: &str) -> Result<(), ConfigError> {
        if self.play_area_class.as_deref() == Some(class) {
            return Ok(());
        }
        let area = match resolve_play_area(&self.tree, Some(class)) {
            Ok(area) => area,
            Err(err) => {
                warn!(%err, "keeping the previous play area");
                return Err(err);
            }
        };
        self.styles.apply_play_area_styles(&mut self.tree, area);
        self.engine.set_play_area(area);
        self.registry.set_play_area(area);
        self.play_area_class = Some(class.to_owned());

        // Re-scope the dropzones to the new area.
        let zones = match &self.dropzone_class {
            Some(zone_class) => self.tree.query_class(area, zone_class),
            None => self.registry.iter().collect(),
        };
        self.set_dropzone_elements(zones);
        Ok(())
    }

    /// Replace the dropzones with the play area's elements carrying `class`.
    ///
    /// When nothing matches, the previous dropzones are kept.
    pub fn set_dropzones(&mut self, class: &str) -> Result<(), ConfigError> {
        let found = self.tree.query_class(self.registry.play_area(), class);
        if found.is_empty() {
            let err = ConfigError::DropzonesNotFound(class.to_owned());
            warn!(%err, "keeping the previous dropzones");
            return Err(err);
        }
        self.set_dropzone_elements(found);
        self.dropzone_class = Some(class.to_owned());
        Ok(())
    }

    /// Replace the dropzones with explicit elements.
    pub fn set_dropzone_elements(&mut self, elements: impl IntoIterator<Item = ElementId>) {
        let (mut cx, _, registry, _) = self.parts();
        registry.set_dropzones(&mut cx, elements);
    }

    /// Make `element` draggable.
    ///
    /// Returns false if it is stale, not inside the play area, or already bound.
    pub fn add_draggable(&mut self, element: ElementId) -> bool {
        if !self.tree.is_alive(element) {
            warn!(?element, "cannot make a stale element draggable");
            return false;
        }
        let play_area = self.registry.play_area();
        if element == play_area || !self.tree.contains(play_area, element) {
            warn!(?element, "draggable is outside the play area; skipped");
            return false;
        }
        self.bind(element)
    }

    /// Make `element` no longer draggable. Returns false if it was not bound.
    pub fn remove_draggable(&mut self, element: ElementId) -> bool {
        if !self.input.unbind(element) {
            return false;
        }
        self.styles.remove_draggable_styles(&mut self.tree, element);
        true
    }

    /// Move every draggable back into the play area's natural flow.
    ///
    /// An active drag is cancelled first.
    pub fn reset_all(&mut self) {
        let (mut cx, engine, registry, input) = self.parts();
        if engine.cancel_drag(&mut cx, registry).is_some() {
            input.release();
        }

        let play_area = self.registry.play_area();
        let draggables: Vec<_> = self.input.bound().collect();
        for element in draggables {
            if element == play_area || !self.tree.contains(play_area, element) {
                continue;
            }
            if let Err(err) = self.tree.append_child(play_area, element) {
                warn!(%err, ?element, "draggable could not be reset");
                continue;
            }
            self.styles.reset_position(&mut self.tree, element);
        }
        let _ = self.tree.commit();
        debug!("all draggables reset");
    }
}

fn resolve_play_area(tree: &Tree, class: Option<&str>) -> Result<ElementId, ConfigError> {
    let document = tree.document().ok_or(ConfigError::NoDocumentRoot)?;
    let Some(class) = class else {
        return Ok(document);
    };
    if tree.has_class(document, class) {
        return Ok(document);
    }
    tree.query_class(document, class)
        .first()
        .copied()
        .ok_or_else(|| ConfigError::PlayAreaNotFound(class.to_owned()))
}
