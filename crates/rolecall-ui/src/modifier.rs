//! Modifiers attach semantics and input behavior to a widget.
//!
//! Rolecall has no layout or drawing phase, so the chain only carries what the
//! semantics tree and event dispatch read: test tags, accessible names,
//! tooltips, label targets and click handlers. When an element is repeated the
//! last one wins, except for click handlers, which all run in chain order.

use crate::event::ClickHandler;
use smallvec::SmallVec;
use std::fmt;
use std::rc::Rc;

#[derive(Clone)]
pub enum ModifierElement {
    TestTag(Rc<str>),
    ContentDescription(Rc<str>),
    Title(Rc<str>),
    FieldId(Rc<str>),
    Clickable(ClickHandler),
}

impl fmt::Debug for ModifierElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TestTag(tag) => write!(f, "testTag({tag:?})"),
            Self::ContentDescription(text) => write!(f, "contentDescription({text:?})"),
            Self::Title(text) => write!(f, "title({text:?})"),
            Self::FieldId(id) => write!(f, "fieldId({id:?})"),
            Self::Clickable(_) => f.write_str("clickable"),
        }
    }
}

#[derive(Clone, Default)]
pub struct Modifier {
    elements: SmallVec<[ModifierElement; 2]>,
}

impl Modifier {
    pub fn empty() -> Self {
        Self::default()
    }

    fn with_element(mut self, element: ModifierElement) -> Self {
        self.elements.push(element);
        self
    }

    /// Tag used by tests to scope queries, the `data-testid` of this toolkit.
    pub fn test_tag(self, tag: impl Into<Rc<str>>) -> Self {
        self.with_element(ModifierElement::TestTag(tag.into()))
    }

    /// Overrides the accessible name, like `aria-label`.
    pub fn content_description(self, text: impl Into<Rc<str>>) -> Self {
        self.with_element(ModifierElement::ContentDescription(text.into()))
    }

    /// Advisory text shown on hover; last resort for the accessible name.
    pub fn title(self, text: impl Into<Rc<str>>) -> Self {
        self.with_element(ModifierElement::Title(text.into()))
    }

    /// Identifier a [`Label`](crate::Label) can point at.
    pub fn field_id(self, id: impl Into<Rc<str>>) -> Self {
        self.with_element(ModifierElement::FieldId(id.into()))
    }

    pub fn clickable(self, on_click: impl FnMut() + 'static) -> Self {
        self.with_element(ModifierElement::Clickable(ClickHandler::new(on_click)))
    }

    /// Appends `other` after the elements of `self`.
    pub fn then(mut self, other: Modifier) -> Self {
        self.elements.extend(other.elements);
        self
    }

    pub fn elements(&self) -> &[ModifierElement] {
        &self.elements
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn resolve(&self) -> ResolvedSemantics {
        let mut resolved = ResolvedSemantics::default();
        for element in &self.elements {
            match element {
                ModifierElement::TestTag(tag) => resolved.test_tag = Some(Rc::clone(tag)),
                ModifierElement::ContentDescription(text) => {
                    resolved.content_description = Some(Rc::clone(text))
                }
                ModifierElement::Title(text) => resolved.title = Some(Rc::clone(text)),
                ModifierElement::FieldId(id) => resolved.field_id = Some(Rc::clone(id)),
                ModifierElement::Clickable(handler) => {
                    resolved.click_handlers.push(handler.clone())
                }
            }
        }
        resolved
    }
}

impl fmt::Debug for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.elements).finish()
    }
}

/// The flattened view of a [`Modifier`] chain.
#[derive(Clone, Debug, Default)]
pub struct ResolvedSemantics {
    pub test_tag: Option<Rc<str>>,
    pub content_description: Option<Rc<str>>,
    pub title: Option<Rc<str>>,
    pub field_id: Option<Rc<str>>,
    pub click_handlers: Vec<ClickHandler>,
}

impl ResolvedSemantics {
    pub fn is_clickable(&self) -> bool {
        !self.click_handlers.is_empty()
    }
}
