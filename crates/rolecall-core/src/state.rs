//! Observable state cells.
//!
//! State values live in a thread-local arena so that [`MutableState`] can be a
//! `Copy` handle that closures capture freely. Every cell remembers which
//! compositions read it while composing, and writing to it schedules a
//! recomposition of exactly those compositions. There is no per-scope
//! tracking: an invalidated composition recomposes its whole content.

use crate::collections::map::HashSet;
use smallvec::SmallVec;
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StateId {
    index: u32,
    generation: u32,
}

/// Identifies one [`Composition`](crate::Composition) on this thread.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompositionId(u64);

impl CompositionId {
    /// Allocates an id that no other composition on this thread has used.
    pub fn next() -> Self {
        NEXT_COMPOSITION_ID.with(|next| {
            let id = next.get();
            next.set(id + 1);
            Self(id)
        })
    }
}

impl fmt::Display for CompositionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "composition#{}", self.0)
    }
}

struct StateEntry {
    generation: u32,
    cell: Option<Rc<dyn Any>>,
    readers: SmallVec<[CompositionId; 2]>,
}

#[derive(Default)]
struct StateArena {
    entries: Vec<StateEntry>,
    free: Vec<u32>,
}

impl StateArena {
    fn alloc(&mut self, cell: Rc<dyn Any>, reader: Option<CompositionId>) -> StateId {
        let readers = reader.into_iter().collect();
        if let Some(index) = self.free.pop() {
            let entry = &mut self.entries[index as usize];
            entry.cell = Some(cell);
            entry.readers = readers;
            return StateId {
                index,
                generation: entry.generation,
            };
        }
        let index = self.entries.len() as u32;
        self.entries.push(StateEntry {
            generation: 0,
            cell: Some(cell),
            readers,
        });
        StateId {
            index,
            generation: 0,
        }
    }

    fn entry(&self, id: StateId) -> Option<&StateEntry> {
        self.entries
            .get(id.index as usize)
            .filter(|entry| entry.generation == id.generation)
    }

    fn get(&self, id: StateId) -> Option<Rc<dyn Any>> {
        self.entry(id).and_then(|entry| entry.cell.clone())
    }

    fn observe(&mut self, id: StateId, reader: CompositionId) {
        let Some(entry) = self.entries.get_mut(id.index as usize) else {
            return;
        };
        if entry.generation == id.generation && !entry.readers.contains(&reader) {
            entry.readers.push(reader);
        }
    }

    fn readers(&self, id: StateId) -> SmallVec<[CompositionId; 2]> {
        self.entry(id)
            .map(|entry| entry.readers.clone())
            .unwrap_or_default()
    }

    fn release(&mut self, id: StateId) -> Option<Rc<dyn Any>> {
        let entry = self.entries.get_mut(id.index as usize)?;
        if entry.generation != id.generation {
            return None;
        }
        let cell = entry.cell.take()?;
        entry.readers.clear();
        entry.generation = entry.generation.wrapping_add(1);
        self.free.push(id.index);
        Some(cell)
    }

    fn forget_reader(&mut self, reader: CompositionId) {
        for entry in &mut self.entries {
            entry.readers.retain(|candidate| *candidate != reader);
        }
    }

    fn live_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.cell.is_some())
            .count()
    }
}

thread_local! {
    static STATE_ARENA: RefCell<StateArena> = RefCell::new(StateArena::default());
    static INVALID_COMPOSITIONS: RefCell<HashSet<CompositionId>> =
        RefCell::new(HashSet::default());
    static CURRENT_READER: Cell<Option<CompositionId>> = const { Cell::new(None) };
    static NEXT_COMPOSITION_ID: Cell<u64> = const { Cell::new(0) };
}

/// Schedules a recomposition of `composition`.
pub fn request_recomposition(composition: CompositionId) {
    INVALID_COMPOSITIONS.with(|invalid| {
        invalid.borrow_mut().insert(composition);
    });
}

/// Returns true if `composition` had a recomposition pending and clears it.
pub fn take_recompose_request(composition: CompositionId) -> bool {
    INVALID_COMPOSITIONS.with(|invalid| invalid.borrow_mut().remove(&composition))
}

/// Returns true if `composition` has a recomposition pending without clearing it.
pub fn peek_recompose_request(composition: CompositionId) -> bool {
    INVALID_COMPOSITIONS.with(|invalid| invalid.borrow().contains(&composition))
}

/// Composition whose pass is running on this thread, if any.
pub fn current_reader() -> Option<CompositionId> {
    CURRENT_READER.with(Cell::get)
}

/// Restores the previous reader when a pass ends, including by unwinding.
pub(crate) struct ReaderScope {
    previous: Option<CompositionId>,
}

impl ReaderScope {
    /// Attributes state reads on this thread to `reader` until dropped.
    pub(crate) fn enter(reader: CompositionId) -> Self {
        let previous = CURRENT_READER.with(|current| current.replace(Some(reader)));
        Self { previous }
    }
}

impl Drop for ReaderScope {
    fn drop(&mut self) {
        CURRENT_READER.with(|current| current.set(self.previous));
    }
}

/// Forgets everything pending for a composition that is going away.
pub(crate) fn forget_composition(composition: CompositionId) {
    let _ = INVALID_COMPOSITIONS.try_with(|invalid| {
        if let Ok(mut invalid) = invalid.try_borrow_mut() {
            invalid.remove(&composition);
        }
    });
    let _ = STATE_ARENA.try_with(|arena| {
        if let Ok(mut arena) = arena.try_borrow_mut() {
            arena.forget_reader(composition);
        }
    });
}

/// Number of state cells currently alive on this thread.
pub fn live_state_count() -> usize {
    STATE_ARENA.with(|arena| arena.borrow().live_count())
}

/// A `Copy` handle to an observable value.
///
/// Reads clone the value out; writes replace it and schedule recomposition of
/// every composition that read it. Handles are `!Send`: state belongs to the
/// thread that composed it.
pub struct MutableState<T> {
    id: StateId,
    _marker: PhantomData<Rc<T>>,
}

impl<T> Clone for MutableState<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for MutableState<T> {}

impl<T> PartialEq for MutableState<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for MutableState<T> {}

impl<T: 'static> MutableState<T> {
    /// Allocates a state cell that is not owned by any composition group.
    ///
    /// Unowned cells live until [`MutableState::dispose`] is called. Inside a
    /// composable prefer [`useState`](crate::useState), which releases the
    /// cell together with the group that remembered it.
    pub fn new(value: T) -> Self {
        let cell: Rc<dyn Any> = Rc::new(RefCell::new(value));
        let reader = current_reader();
        let id = STATE_ARENA.with(|arena| arena.borrow_mut().alloc(cell, reader));
        Self {
            id,
            _marker: PhantomData,
        }
    }

    pub fn id(&self) -> StateId {
        self.id
    }

    /// Returns false once the owning group has been disposed.
    pub fn is_alive(&self) -> bool {
        self.try_cell().is_some()
    }

    /// Compositions that will recompose when this state changes.
    pub fn readers(&self) -> Vec<CompositionId> {
        STATE_ARENA.with(|arena| arena.borrow().readers(self.id).into_vec())
    }

    fn try_cell(&self) -> Option<Rc<RefCell<T>>> {
        let cell = STATE_ARENA.with(|arena| arena.borrow().get(self.id))?;
        cell.downcast::<RefCell<T>>().ok()
    }

    fn cell(&self) -> Rc<RefCell<T>> {
        self.try_cell().unwrap_or_else(|| {
            panic!(
                "state {:?} of type {} was used after its owner was disposed",
                self.id,
                std::any::type_name::<T>()
            )
        })
    }

    fn track_read(&self) {
        if let Some(reader) = current_reader() {
            STATE_ARENA.with(|arena| arena.borrow_mut().observe(self.id, reader));
        }
    }

    fn invalidate_readers(&self) {
        let readers = STATE_ARENA.with(|arena| arena.borrow().readers(self.id));
        for reader in readers {
            request_recomposition(reader);
        }
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.track_read();
        let cell = self.cell();
        let value = cell.borrow();
        f(&value)
    }

    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.with(T::clone)
    }

    pub fn value(&self) -> T
    where
        T: Clone,
    {
        self.get()
    }

    pub fn set(&self, value: T) {
        drop(self.replace(value));
    }

    /// Stores `value` and returns the previous one.
    pub fn replace(&self, value: T) -> T {
        let cell = self.cell();
        let previous = std::mem::replace(&mut *cell.borrow_mut(), value);
        self.invalidate_readers();
        previous
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let cell = self.cell();
        let mut value = cell.borrow_mut();
        let result = f(&mut value);
        drop(value);
        self.invalidate_readers();
        result
    }

    /// Frees the cell. Further reads panic.
    pub fn dispose(&self) {
        let released = STATE_ARENA
            .try_with(|arena| {
                arena
                    .try_borrow_mut()
                    .ok()
                    .and_then(|mut arena| arena.release(self.id))
            })
            .ok()
            .flatten();
        // The value is dropped outside the arena borrow.
        drop(released);
    }
}

impl<T: fmt::Debug + 'static> fmt::Debug for MutableState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.try_cell() {
            Some(cell) => f
                .debug_struct("MutableState")
                .field("id", &self.id)
                .field("value", &*cell.borrow())
                .finish(),
            None => f
                .debug_struct("MutableState")
                .field("id", &self.id)
                .field("value", &"<disposed>")
                .finish(),
        }
    }
}
