use crate::composer::{install_composer, uninstall_composer, with_group, Composer, Group};
use crate::node::{Applier, MemoryApplier, RootNode};
use crate::state::{
    forget_composition, peek_recompose_request, take_recompose_request, CompositionId, ReaderScope,
};
use crate::{Key, NodeError, NodeId};
use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

struct RootContent {
    key: Key,
    content: Rc<RefCell<dyn FnMut()>>,
}

/// Clears the thread-local composer if a pass unwinds.
struct ComposerGuard;

impl Drop for ComposerGuard {
    fn drop(&mut self) {
        drop(uninstall_composer());
    }
}

/// Owns the slot table and the node store for one piece of root content.
///
/// Several compositions may live on one thread. A state change only
/// invalidates the compositions that read the state while composing.
pub struct Composition<A: Applier = MemoryApplier> {
    id: CompositionId,
    applier: Rc<RefCell<A>>,
    slot_table: Option<Group>,
    root: Option<NodeId>,
    next_node_id: NodeId,
    content: Option<RootContent>,
    passes: u64,
}

impl<A: Applier> Composition<A> {
    pub fn new(applier: A) -> Self {
        Self {
            id: CompositionId::next(),
            applier: Rc::new(RefCell::new(applier)),
            slot_table: None,
            root: None,
            next_node_id: 0,
            content: None,
            passes: 0,
        }
    }

    /// Composes `content` under `key`, replacing any previous content.
    ///
    /// State remembered by the previous content is kept when the keys of its
    /// groups match.
    pub fn render(&mut self, key: Key, content: impl FnMut() + 'static) -> Result<(), NodeError> {
        self.content = Some(RootContent {
            key,
            content: Rc::new(RefCell::new(content)),
        });
        self.compose()
    }

    /// Recomposes the current content unconditionally.
    pub fn recompose(&mut self) -> Result<(), NodeError> {
        self.compose()
    }

    pub fn id(&self) -> CompositionId {
        self.id
    }

    /// Recomposes if some state read by this composition changed since the
    /// last pass.
    ///
    /// Returns whether a pass ran.
    pub fn process_invalid_scopes(&mut self) -> Result<bool, NodeError> {
        if self.content.is_none() || !take_recompose_request(self.id) {
            return Ok(false);
        }
        self.compose()?;
        Ok(true)
    }

    pub fn has_pending_recomposition(&self) -> bool {
        self.content.is_some() && peek_recompose_request(self.id)
    }

    /// Drops every remembered value and composes the content from scratch.
    pub fn reset(&mut self) -> Result<(), NodeError> {
        drop(self.slot_table.take());
        let root = self.root;
        {
            let mut applier = self.applier.borrow_mut();
            for id in applier.node_ids() {
                if Some(id) != root {
                    applier.remove(id);
                }
            }
        }
        self.compose()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Number of passes run so far.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    pub fn applier(&self) -> Ref<'_, A> {
        self.applier.borrow()
    }

    pub fn applier_mut(&mut self) -> RefMut<'_, A> {
        self.applier.borrow_mut()
    }

    fn ensure_root(&mut self) -> NodeId {
        if let Some(root) = self.root {
            return root;
        }
        let id = self.next_node_id;
        self.next_node_id += 1;
        self.applier
            .borrow_mut()
            .insert(id, Box::new(RootNode::default()));
        self.root = Some(id);
        id
    }

    fn compose(&mut self) -> Result<(), NodeError> {
        let Some(root_content) = self.content.as_ref() else {
            return Ok(());
        };
        let key = root_content.key;
        let content = Rc::clone(&root_content.content);
        let root = self.ensure_root();

        let applier: Rc<RefCell<dyn Applier>> = self.applier.clone();
        let composer = Composer::new(applier, root, self.next_node_id, self.slot_table.take());
        if install_composer(composer).is_err() {
            return Err(NodeError::AlreadyComposing);
        }
        let guard = ComposerGuard;
        take_recompose_request(self.id);

        {
            let _reader = ReaderScope::enter(self.id);
            with_group(key, || {
                let mut content = content.borrow_mut();
                (&mut *content)()
            });
        }

        let outcome = uninstall_composer().map(Composer::finish);
        drop(guard);
        let Some(outcome) = outcome else {
            return Err(NodeError::AlreadyComposing);
        };

        self.passes += 1;
        self.next_node_id = outcome.next_node_id;
        self.slot_table = outcome.root_group;

        let mut applier = self.applier.borrow_mut();
        applier.get_mut(root)?.update_children(&outcome.root_children);
        let stale: Vec<NodeId> = applier
            .node_ids()
            .into_iter()
            .filter(|id| *id != root && !outcome.emitted.contains(id))
            .collect();
        for id in &stale {
            applier.remove(*id);
        }
        if !stale.is_empty() {
            log::trace!("pass {} removed {} stale nodes", self.passes, stale.len());
        }
        Ok(())
    }
}

impl<A: Applier> Drop for Composition<A> {
    fn drop(&mut self) {
        forget_composition(self.id);
    }
}

impl Default for Composition<MemoryApplier> {
    fn default() -> Self {
        Self::new(MemoryApplier::new())
    }
}
