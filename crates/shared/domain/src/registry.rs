//! Slice registry: every feature crate hands the server one [`InitializedSlice`]
//! and handlers look it up again by concrete type.

use std::any::{Any, TypeId, type_name};
use std::fmt::Debug;

/// State a feature slice shares with its request handlers.
pub trait FeatureSlice: Any + Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;
}

/// A boxed slice together with the key it is stored under.
#[derive(Debug)]
pub struct InitializedSlice {
    pub id: TypeId,
    /// Last path segment of the slice type, e.g. `Councils`.
    pub name: &'static str,
    pub state: Box<dyn FeatureSlice>,
}

impl InitializedSlice {
    pub fn new<T: FeatureSlice>(state: T) -> Self {
        Self { id: TypeId::of::<T>(), name: short_name(type_name::<T>()), state: Box::new(state) }
    }

    /// Borrows the slice back as `T`, `None` for any other type.
    #[must_use]
    pub fn downcast<T: FeatureSlice>(&self) -> Option<&T> {
        self.state.as_any().downcast_ref::<T>()
    }
}

fn short_name(full: &'static str) -> &'static str {
    let path = full.split('<').next().unwrap_or(full);
    path.rsplit("::").next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Topics(u8);

    impl FeatureSlice for Topics {
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[derive(Debug)]
    struct Groups;

    impl FeatureSlice for Groups {
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn slices_are_named_after_their_type() {
        let slice = InitializedSlice::new(Topics(3));
        assert_eq!(slice.name, "Topics");
        assert_eq!(slice.id, TypeId::of::<Topics>());
        assert_eq!(short_name("thesis_group::Groups"), "Groups");
        assert_eq!(short_name("Groups"), "Groups");
    }

    #[test]
    fn downcast_checks_the_type() {
        let slice = InitializedSlice::new(Topics(3));
        assert_eq!(slice.downcast::<Topics>().map(|t| t.0), Some(3));
        assert!(slice.downcast::<Groups>().is_none());
    }
}
