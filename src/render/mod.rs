//! Human-readable descriptions of authored entities.
//!
//! Every displayable entity implements [`Describe`]; the free functions
//! here add the shared `Type(id): description(count)` framing and the
//! memoization for the two entity types rendered from most list views.

pub mod cache;
mod describe;
pub mod labels;
pub mod mods;

use crate::model::{PlanFilters, Row, Stage};
use crate::render::cache::{cache_key, DescriptionCache};
use crate::store::ContentStore;

/// Rendering capability of one entity type.
pub trait Describe: Row {
    /// The bare description, without type prefix or relation-count suffix.
    fn describe_instance(&self, store: &ContentStore) -> String;

    /// Text between the description and the count suffix.
    fn count_separator(&self) -> &'static str {
        ""
    }
}

/// Framing switches for [`label_with`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LabelOptions<'a> {
    /// Prefix with `Type(id): `.
    pub with_name: bool,
    /// Suffix with the count of rows referencing this entity.
    pub with_count: bool,
    /// Override the computed description.
    pub title: Option<&'a str>,
}

/// Full label with prefix and count suffix.
pub fn label<T: Describe>(store: &ContentStore, entity: &T) -> String {
    label_with(
        store,
        entity,
        LabelOptions {
            with_name: true,
            with_count: true,
            title: None,
        },
    )
}

pub fn label_with<T: Describe>(
    store: &ContentStore,
    entity: &T,
    options: LabelOptions<'_>,
) -> String {
    let mut out = String::new();
    if options.with_name {
        out.push_str(&format!("{}({}): ", T::TYPE, entity.id()));
    }
    match options.title {
        Some(title) => out.push_str(title),
        None => out.push_str(&entity.describe_instance(store)),
    }
    if options.with_count {
        out.push_str(entity.count_separator());
        out.push_str(&format!("({})", store.relation_count(T::TYPE, entity.id())));
    }
    out
}

/// Cached stage description; see [`describe`] for the branch order.
///
/// Empty stages are not cached, matching the lazy population rule: only
/// a computed description is worth remembering.
pub fn stage_description(store: &ContentStore, stage: &Stage) -> String {
    let key = cache_key(Stage::TYPE, stage.id());
    if let Some(cached) = store.descriptions().get(&key) {
        return cached;
    }
    let Some(value) = describe::stage(store, stage) else {
        return "empty".to_string();
    };
    store.descriptions().set(&key, &value);
    value
}

/// Cached plan-filters description.
pub fn plan_filters_description(store: &ContentStore, filters: &PlanFilters) -> String {
    let key = cache_key(PlanFilters::TYPE, filters.id());
    if let Some(cached) = store.descriptions().get(&key) {
        return cached;
    }
    let value = label_with(
        store,
        filters,
        LabelOptions {
            with_name: false,
            with_count: true,
            title: None,
        },
    );
    store.descriptions().set(&key, &value);
    value
}
