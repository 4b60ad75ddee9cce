//! Type-erased containers for typed arrays and opaque values.

use std::any::{Any, TypeId};
use std::fmt;

/// Runtime identity of a Rust type carried through the graph.
///
/// Equality is by [`TypeId`]; the name is kept for diagnostics.
#[derive(Clone, Copy)]
pub struct ElemType {
    id: TypeId,
    name: &'static str,
}

impl ElemType {
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is<T: 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for ElemType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ElemType {}

impl fmt::Debug for ElemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for ElemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Homogeneous array with an erased element type.
///
/// Holds a `Vec<T>`; readers and writers must name `T` to get at it.
pub struct ArrayRef {
    elem: ElemType,
    items: Box<dyn Any + Send>,
}

impl ArrayRef {
    pub fn new<T: Send + 'static>(items: Vec<T>) -> Self {
        Self {
            elem: ElemType::of::<T>(),
            items: Box::new(items),
        }
    }

    /// Empty array of `T`.
    pub fn empty<T: Send + 'static>() -> Self {
        Self::new(Vec::<T>::new())
    }

    pub fn elem_type(&self) -> ElemType {
        self.elem
    }

    /// Read access, if the array holds `T`.
    pub fn rref<T: 'static>(&self) -> Option<&[T]> {
        self.items.downcast_ref::<Vec<T>>().map(Vec::as_slice)
    }

    /// Write access to the live vector, if the array holds `T`.
    pub fn wref<T: 'static>(&mut self) -> Option<&mut Vec<T>> {
        self.items.downcast_mut::<Vec<T>>()
    }

    /// Unwrap into the underlying vector, or give the array back.
    pub fn into_vec<T: 'static>(self) -> Result<Vec<T>, Self> {
        let elem = self.elem;
        self.items
            .downcast::<Vec<T>>()
            .map(|b| *b)
            .map_err(|items| Self { elem, items })
    }
}

impl fmt::Debug for ArrayRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayRef").field("elem", &self.elem).finish_non_exhaustive()
    }
}

/// Single value with an erased type.
pub struct OpaqueRef {
    elem: ElemType,
    value: Box<dyn Any + Send>,
}

impl OpaqueRef {
    pub fn new<T: Send + 'static>(value: T) -> Self {
        Self {
            elem: ElemType::of::<T>(),
            value: Box::new(value),
        }
    }

    pub fn elem_type(&self) -> ElemType {
        self.elem
    }

    pub fn get<T: 'static>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    pub fn get_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.value.downcast_mut::<T>()
    }
}

impl fmt::Debug for OpaqueRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpaqueRef").field("elem", &self.elem).finish_non_exhaustive()
    }
}
