/// Paint-order key for scene objects.
///
/// Higher values paint later (on top of lower values).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct ZIndex(pub i32);
