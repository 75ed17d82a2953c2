//! Type descriptors used as registry keys.

use std::any::{TypeId, type_name};
use std::fmt;

/// Identifies a type for registry lookup
///
/// Sequence descriptors also carry the descriptor of their element type, so that
/// resolution can recurse into it and report which element is missing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
    id: TypeId,
    name: &'static str,
    element: Option<Box<TypeDescriptor>>,
}

impl TypeDescriptor {
    /// Descriptor for a plain (non-container) type
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
            element: None,
        }
    }

    /// Descriptor for `Vec<T>`, carrying `T` as its element
    pub fn sequence_of<T: 'static>() -> Self {
        Self::of::<Vec<T>>().with_element(Self::of::<T>())
    }

    /// Attach an element descriptor
    pub fn with_element(mut self, element: TypeDescriptor) -> Self {
        self.element = Some(Box::new(element));
        self
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The element descriptor, for container types
    pub fn element(&self) -> Option<&TypeDescriptor> {
        self.element.as_deref()
    }

    pub fn is_container(&self) -> bool {
        self.element.is_some()
    }

    /// Whether this descriptor identifies `T`
    pub fn is<T: 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
