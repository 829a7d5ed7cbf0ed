//! The list wrapper returned by collection reads.
use crate::metadata::{ListMeta, TypeMeta};
use serde::{Deserialize, Serialize};

/// A generic list of objects as returned by a `list` call
///
/// The `metadata` carries the collection's resource version and the continue token
/// used for chunked reads.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ObjectList<T> {
    /// The type fields, not always present
    #[serde(flatten, default)]
    pub types: Option<TypeMeta>,

    /// ListMeta - only really used for its `resourceVersion`
    #[serde(default)]
    pub metadata: ListMeta,

    /// The items we are actually interested in. In practice; `T := Resource<T,U>`.
    #[serde(
        default = "Vec::new",
        bound(deserialize = "T: Deserialize<'de>", serialize = "T: Serialize")
    )]
    pub items: Vec<T>,
}

impl<T> ObjectList<T> {
    /// `iter` returns an Iterator over the elements of this ObjectList
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    /// `iter_mut` returns an Iterator of mutable references to the elements of this ObjectList
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.iter_mut()
    }

    /// The continue token for the next chunk, if the server truncated the list
    pub fn continue_token(&self) -> Option<&str> {
        self.metadata.continue_.as_deref().filter(|s| !s.is_empty())
    }
}

impl<T> IntoIterator for ObjectList<T> {
    type IntoIter = ::std::vec::IntoIter<Self::Item>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a ObjectList<T> {
    type IntoIter = ::std::slice::Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut ObjectList<T> {
    type IntoIter = ::std::slice::IterMut<'a, T>;
    type Item = &'a mut T;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter_mut()
    }
}
