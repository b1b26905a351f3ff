use chrono::{DateTime, Utc};

/// Row identifier assigned by the store (`SERIAL` in PostgreSQL)
pub type Id = i32;

pub type Timestamp = DateTime<Utc>;

/// Anything that sits in the hierarchy and is listed alphabetically.
///
/// Ties on the display name are broken by ascending id so repeated listings
/// of unchanged data always come back in the same order.
pub trait Named {
    fn id(&self) -> Id;
    fn name(&self) -> &str;
}

/// Sort alphabetically by display name, ignoring case, then id.
///
/// Names equal up to case fall back to byte order so the result stays total.
pub fn sort_by_name<T: Named>(items: &mut [T]) {
    items.sort_by_cached_key(|item| {
        (
            item.name().to_lowercase(),
            item.name().to_string(),
            item.id(),
        )
    });
}

macro_rules! impl_named {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::model::Named for $ty {
                fn id(&self) -> $crate::model::Id {
                    self.id
                }

                fn name(&self) -> &str {
                    &self.name
                }
            }
        )*
    };
}

pub(crate) use impl_named;
