use crate::{ShellError, ShellSettings};
use rolecall_core::collections::map::HashMap;
use rolecall_core::{Applier, Composition, Key, Node, NodeId};
use rolecall_ui::{
    node_modifier, ButtonKind, ButtonNode, ClickHandler, FormNode, LabelNode, SemanticsTree,
    SubmitEvent, TextFieldNode,
};
use web_time::{Duration, Instant};

/// What a click resolved to after bubbling up from the hit node.
enum ClickTarget {
    Button {
        id: NodeId,
        handlers: Vec<ClickHandler>,
        on_click: Option<ClickHandler>,
        submits: Option<NodeId>,
    },
    Field {
        id: NodeId,
        handlers: Vec<ClickHandler>,
    },
    Label {
        handlers: Vec<ClickHandler>,
        field: Option<NodeId>,
    },
    Clickable {
        handlers: Vec<ClickHandler>,
    },
}

fn modifier_handlers(node: &dyn Node) -> Vec<ClickHandler> {
    node_modifier(node)
        .map(|modifier| modifier.resolve().click_handlers)
        .unwrap_or_default()
}

fn is_form(applier: &dyn Applier, id: NodeId) -> bool {
    applier
        .get(id)
        .map(|node| node.as_any().is::<FormNode>())
        .unwrap_or(false)
}

fn enclosing_form(
    applier: &dyn Applier,
    parents: &HashMap<NodeId, NodeId>,
    id: NodeId,
) -> Option<NodeId> {
    let mut current = parents.get(&id).copied();
    while let Some(candidate) = current {
        if is_form(applier, candidate) {
            return Some(candidate);
        }
        current = parents.get(&candidate).copied();
    }
    None
}

/// First node below `start`, in document order, accepted by `predicate`.
fn find_descendant(
    applier: &dyn Applier,
    start: NodeId,
    predicate: impl Fn(&dyn Node) -> bool,
) -> Option<NodeId> {
    let mut stack: Vec<NodeId> = applier.get(start).ok()?.children();
    stack.reverse();
    while let Some(id) = stack.pop() {
        let Ok(node) = applier.get(id) else {
            continue;
        };
        if predicate(node) {
            return Some(id);
        }
        stack.extend(node.children().into_iter().rev());
    }
    None
}

fn labelled_field(
    applier: &dyn Applier,
    root: NodeId,
    label_id: NodeId,
    label: &LabelNode,
) -> Option<NodeId> {
    match &label.target {
        Some(target) => find_descendant(applier, root, |node| {
            node.as_any().is::<TextFieldNode>()
                && node_modifier(node)
                    .and_then(|modifier| modifier.resolve().field_id)
                    .is_some_and(|field_id| field_id == *target)
        }),
        None => find_descendant(applier, label_id, |node| {
            node.as_any().is::<TextFieldNode>()
        }),
    }
}

/// Drives one composition the way a user would.
pub struct AppShell {
    composition: Composition,
    root_key: Key,
    settings: ShellSettings,
    focused: Option<NodeId>,
    semantics: Option<SemanticsTree>,
    semantics_dirty: bool,
    navigation_count: usize,
    frames: u64,
    last_frame_duration: Duration,
}

impl AppShell {
    pub fn new(root_key: Key, content: impl FnMut() + 'static) -> Self {
        Self::with_settings(root_key, ShellSettings::default(), content)
    }

    pub fn with_settings(
        root_key: Key,
        settings: ShellSettings,
        content: impl FnMut() + 'static,
    ) -> Self {
        let mut composition: Composition = Composition::default();
        if let Err(err) = composition.render(root_key, content) {
            log::error!("initial composition failed: {err}");
        }
        Self {
            composition,
            root_key,
            settings,
            focused: None,
            semantics: None,
            semantics_dirty: true,
            navigation_count: 0,
            frames: 0,
            last_frame_duration: Duration::ZERO,
        }
    }

    pub fn root_key(&self) -> Key {
        self.root_key
    }

    pub fn settings(&self) -> &ShellSettings {
        &self.settings
    }

    /// Runs one frame: recomposes invalidated content and refreshes semantics.
    pub fn update(&mut self) {
        let start = Instant::now();
        match self.composition.process_invalid_scopes() {
            Ok(true) => self.semantics_dirty = true,
            Ok(false) => {}
            Err(err) => log::error!("recomposition failed: {err}"),
        }
        self.drop_stale_focus();
        if self.semantics_dirty {
            if let Err(err) = self.rebuild_semantics() {
                log::error!("failed to build semantics: {err}");
                self.semantics = None;
                self.semantics_dirty = false;
            }
        }
        self.frames += 1;
        self.last_frame_duration = start.elapsed();
        log::trace!("frame {} took {:?}", self.frames, self.last_frame_duration);
    }

    /// True when state changed since the last frame.
    pub fn should_render(&self) -> bool {
        self.composition.has_pending_recomposition()
    }

    /// True when the semantics tree is out of date.
    pub fn needs_redraw(&self) -> bool {
        self.semantics_dirty
    }

    /// Runs frames until nothing is pending.
    pub fn settle(&mut self) -> Result<(), ShellError> {
        let mut frames = 0;
        while self.should_render() || self.needs_redraw() {
            if frames >= self.settings.max_settle_frames {
                return Err(ShellError::Unsettled { frames });
            }
            self.update();
            frames += 1;
        }
        Ok(())
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn last_frame_duration(&self) -> Duration {
        self.last_frame_duration
    }

    pub fn root(&self) -> Result<NodeId, ShellError> {
        self.composition.root().ok_or(ShellError::NoContent)
    }

    /// Current semantics, rebuilt first if the tree changed.
    pub fn semantics_tree(&mut self) -> Result<&SemanticsTree, ShellError> {
        if self.semantics_dirty || self.semantics.is_none() {
            self.rebuild_semantics()?;
        }
        self.semantics.as_ref().ok_or(ShellError::NoContent)
    }

    fn rebuild_semantics(&mut self) -> Result<(), ShellError> {
        let root = self.root()?;
        let tree = {
            let applier = self.composition.applier();
            SemanticsTree::build(&*applier, root, self.focused)?
        };
        if self.settings.debug_semantics {
            log::debug!("semantics after frame {}:\n{}", self.frames, tree.dump());
        }
        self.semantics = Some(tree);
        self.semantics_dirty = false;
        Ok(())
    }

    fn drop_stale_focus(&mut self) {
        if let Some(id) = self.focused {
            if !self.composition.applier().contains(id) {
                log::debug!("focused node #{id} left the composition");
                self.focused = None;
                self.semantics_dirty = true;
            }
        }
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    pub fn focus(&mut self, id: NodeId) -> Result<(), ShellError> {
        if !self.composition.applier().contains(id) {
            return Err(rolecall_core::NodeError::Missing { id }.into());
        }
        if self.focused != Some(id) {
            self.focused = Some(id);
            self.semantics_dirty = true;
        }
        Ok(())
    }

    pub fn blur(&mut self) {
        if self.focused.take().is_some() {
            self.semantics_dirty = true;
        }
    }

    /// Clicks `id`.
    ///
    /// The click bubbles to the nearest button, text field, label or
    /// clickable node. Buttons and fields take focus, labels focus their
    /// field, and submit buttons submit their form afterwards.
    pub fn click(&mut self, id: NodeId) -> Result<(), ShellError> {
        let root = self.root()?;
        let target = self.resolve_click(root, id)?;
        let Some(target) = target else {
            log::debug!("click on #{id} reached no clickable node");
            return self.settle();
        };
        match target {
            ClickTarget::Button {
                id,
                handlers,
                on_click,
                submits,
            } => {
                self.focus(id)?;
                handlers.iter().for_each(ClickHandler::invoke);
                if let Some(on_click) = on_click {
                    on_click.invoke();
                }
                self.settle()?;
                if let Some(form) = submits {
                    self.submit(form)?;
                }
            }
            ClickTarget::Field { id, handlers } => {
                self.focus(id)?;
                handlers.iter().for_each(ClickHandler::invoke);
            }
            ClickTarget::Label { handlers, field } => {
                handlers.iter().for_each(ClickHandler::invoke);
                if let Some(field) = field {
                    self.focus(field)?;
                }
            }
            ClickTarget::Clickable { handlers } => {
                handlers.iter().for_each(ClickHandler::invoke);
            }
        }
        self.settle()
    }

    fn resolve_click(&self, root: NodeId, id: NodeId) -> Result<Option<ClickTarget>, ShellError> {
        let applier = self.composition.applier();
        let applier: &dyn Applier = &*applier;
        let parents = applier.parent_links(root);
        let mut current = Some(id);
        while let Some(candidate) = current {
            let node = applier.get(candidate)?;
            let any = node.as_any();
            if let Some(button) = any.downcast_ref::<ButtonNode>() {
                let submits = match button.kind {
                    ButtonKind::Submit => enclosing_form(applier, &parents, candidate),
                    ButtonKind::Button => None,
                };
                return Ok(Some(ClickTarget::Button {
                    id: candidate,
                    handlers: modifier_handlers(node),
                    on_click: button.on_click.clone(),
                    submits,
                }));
            }
            if any.is::<TextFieldNode>() {
                return Ok(Some(ClickTarget::Field {
                    id: candidate,
                    handlers: modifier_handlers(node),
                }));
            }
            if let Some(label) = any.downcast_ref::<LabelNode>() {
                return Ok(Some(ClickTarget::Label {
                    handlers: modifier_handlers(node),
                    field: labelled_field(applier, root, candidate, label),
                }));
            }
            let handlers = modifier_handlers(node);
            if !handlers.is_empty() {
                return Ok(Some(ClickTarget::Clickable { handlers }));
            }
            current = parents.get(&candidate).copied();
        }
        Ok(None)
    }

    /// Types `text` into the focused field, one change event per character.
    ///
    /// A `'\n'` presses Enter instead.
    pub fn type_text(&mut self, text: &str) -> Result<(), ShellError> {
        for ch in text.chars() {
            if ch == '\n' {
                self.press_enter()?;
                continue;
            }
            let id = self.focused.ok_or(ShellError::NoFocusedField)?;
            let (value, handler) = self.field_state(id)?;
            let mut next = value;
            next.push(ch);
            handler.invoke(next);
            self.settle()?;
        }
        Ok(())
    }

    /// Replaces the whole value of field `id` with one change event.
    pub fn replace_text(&mut self, id: NodeId, text: &str) -> Result<(), ShellError> {
        let (_, handler) = self.field_state(id)?;
        self.focus(id)?;
        handler.invoke(text.to_string());
        self.settle()
    }

    fn field_state(
        &self,
        id: NodeId,
    ) -> Result<(String, rolecall_ui::ValueChangeHandler), ShellError> {
        let applier = self.composition.applier();
        let node = applier.get(id)?;
        node.as_any()
            .downcast_ref::<TextFieldNode>()
            .map(|field| {
                let value = field.value.to_string();
                (value, field.on_value_change.clone())
            })
            .ok_or(ShellError::NotEditable { id })
    }

    /// Presses Enter on the focused node.
    ///
    /// In a text field this submits the enclosing form; on a button it clicks.
    pub fn press_enter(&mut self) -> Result<(), ShellError> {
        let id = self.focused.ok_or(ShellError::NoFocusedField)?;
        let root = self.root()?;
        let (is_button, form) = {
            let applier = self.composition.applier();
            let applier: &dyn Applier = &*applier;
            let node = applier.get(id)?;
            let is_button = node.as_any().is::<ButtonNode>();
            let form = if node.as_any().is::<TextFieldNode>() {
                enclosing_form(applier, &applier.parent_links(root), id)
            } else {
                None
            };
            (is_button, form)
        };
        if is_button {
            return self.click(id);
        }
        match form {
            Some(form) => self.submit(form).map(|_| ()),
            None => self.settle(),
        }
    }

    /// Submits `form`, returning whether the submission navigated away.
    ///
    /// A navigation throws away the composition and every remembered value
    /// and composes the content again from scratch.
    pub fn submit(&mut self, form: NodeId) -> Result<bool, ShellError> {
        let handler = self
            .composition
            .applier()
            .read_node::<FormNode, _>(form, |node| node.on_submit.clone())?;
        let mut event = SubmitEvent::new(form);
        handler.invoke(&mut event);
        if event.is_default_prevented() {
            self.settle()?;
            return Ok(false);
        }
        self.navigate()?;
        Ok(true)
    }

    fn navigate(&mut self) -> Result<(), ShellError> {
        self.navigation_count += 1;
        log::warn!(
            "form submission was not prevented; reloading content (navigation {})",
            self.navigation_count
        );
        self.focused = None;
        self.composition.reset()?;
        self.semantics_dirty = true;
        self.settle()
    }

    /// Number of navigations caused by unprevented submissions.
    pub fn navigation_count(&self) -> usize {
        self.navigation_count
    }

    pub fn dump_tree(&self) -> String {
        self.composition.applier().dump_tree(self.composition.root())
    }
}

impl std::fmt::Debug for AppShell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppShell")
            .field("root_key", &self.root_key)
            .field("settings", &self.settings)
            .field("focused", &self.focused)
            .field("navigation_count", &self.navigation_count)
            .field("frames", &self.frames)
            .finish()
    }
}
