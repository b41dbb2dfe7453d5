/// Handle of a layer placed on a map surface.
///
/// Surfaces hand these out and never reuse one after its layer is removed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LayerId(pub u64);
