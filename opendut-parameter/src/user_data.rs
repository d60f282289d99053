use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use crate::value::CompoundData;

/// Auxiliary metadata attached to a parameter.
///
/// Unlike parameter values, user data is shared: cloning a `UserData` yields another handle to the
/// same container, so changes made through one handle are visible through all others.
#[derive(Clone, Debug, Default)]
pub struct UserData(Rc<RefCell<CompoundData>>);

impl UserData {

    pub fn new() -> Self {
        Default::default()
    }

    /// # Panics
    /// If the container is currently borrowed mutably.
    pub fn borrow(&self) -> Ref<'_, CompoundData> {
        self.0.borrow()
    }

    /// # Panics
    /// If the container is currently borrowed.
    pub fn borrow_mut(&self) -> RefMut<'_, CompoundData> {
        self.0.borrow_mut()
    }

    /// Returns an independent copy of the current contents.
    pub fn snapshot(&self) -> CompoundData {
        Clone::clone(&*self.0.borrow())
    }

    /// Whether both handles refer to the same container.
    pub fn ptr_eq(&self, other: &UserData) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl From<CompoundData> for UserData {
    fn from(value: CompoundData) -> Self {
        Self(Rc::new(RefCell::new(value)))
    }
}
