//! Event payloads and the handler cells stored on nodes.

use rolecall_core::NodeId;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Delivered to a form's submit handler.
///
/// A submission whose default is not prevented navigates away from the
/// current content, which discards all of its state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmitEvent {
    form: NodeId,
    default_prevented: bool,
}

impl SubmitEvent {
    pub fn new(form: NodeId) -> Self {
        Self {
            form,
            default_prevented: false,
        }
    }

    pub fn form(&self) -> NodeId {
        self.form
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

#[derive(Clone)]
pub struct ClickHandler(Rc<RefCell<dyn FnMut()>>);

impl ClickHandler {
    pub fn new(handler: impl FnMut() + 'static) -> Self {
        Self(Rc::new(RefCell::new(handler)))
    }

    pub fn invoke(&self) {
        (self.0.borrow_mut())();
    }
}

impl fmt::Debug for ClickHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClickHandler")
    }
}

#[derive(Clone)]
pub struct ValueChangeHandler(Rc<RefCell<dyn FnMut(String)>>);

impl ValueChangeHandler {
    pub fn new(handler: impl FnMut(String) + 'static) -> Self {
        Self(Rc::new(RefCell::new(handler)))
    }

    pub fn invoke(&self, value: String) {
        (self.0.borrow_mut())(value);
    }
}

impl Default for ValueChangeHandler {
    fn default() -> Self {
        Self::new(|_| {})
    }
}

impl fmt::Debug for ValueChangeHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ValueChangeHandler")
    }
}

#[derive(Clone)]
pub struct SubmitHandler(Rc<RefCell<dyn FnMut(&mut SubmitEvent)>>);

impl SubmitHandler {
    pub fn new(handler: impl FnMut(&mut SubmitEvent) + 'static) -> Self {
        Self(Rc::new(RefCell::new(handler)))
    }

    pub fn invoke(&self, event: &mut SubmitEvent) {
        (self.0.borrow_mut())(event);
    }
}

impl Default for SubmitHandler {
    fn default() -> Self {
        Self::new(|_| {})
    }
}

impl fmt::Debug for SubmitHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SubmitHandler")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn prevent_default_is_sticky() {
        let mut event = SubmitEvent::new(3);
        assert!(!event.is_default_prevented());
        event.prevent_default();
        event.prevent_default();
        assert!(event.is_default_prevented());
        assert_eq!(event.form(), 3);
    }

    #[test]
    fn cloned_handlers_share_the_closure() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let handler = ClickHandler::new(move || counter.set(counter.get() + 1));
        let copy = handler.clone();
        handler.invoke();
        copy.invoke();
        assert_eq!(calls.get(), 2);
    }
}
