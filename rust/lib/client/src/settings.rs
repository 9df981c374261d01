//! Index settings.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Keeps an explicit `null` apart from an absent field.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationSetting {
    pub max_total_hits: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetingSetting {
    pub max_values_per_facet: usize,
}

/// Full settings object for `/indexes/{uid}/settings`.
///
/// On update only the `Some` fields are sent; the rest keep their value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ranking_rules: Option<Vec<String>>,
    /// `Some(None)` sends `null`, which clears the attribute.
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub distinct_attribute: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub searchable_attributes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub displayed_attributes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filterable_attributes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sortable_attributes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_words: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synonyms: Option<BTreeMap<String, Vec<String>>>,
    /// Passed through untyped; the shape changes between server versions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typo_tolerance: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationSetting>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faceting: Option<FacetingSetting>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ranking_rules<S: Into<String>>(mut self, rules: impl IntoIterator<Item = S>) -> Self {
        self.ranking_rules = Some(rules.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_distinct_attribute(mut self, attr: impl Into<String>) -> Self {
        self.distinct_attribute = Some(Some(attr.into()));
        self
    }

    pub fn clear_distinct_attribute(mut self) -> Self {
        self.distinct_attribute = Some(None);
        self
    }

    pub fn with_searchable_attributes<S: Into<String>>(
        mut self,
        attrs: impl IntoIterator<Item = S>,
    ) -> Self {
        self.searchable_attributes = Some(attrs.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_displayed_attributes<S: Into<String>>(
        mut self,
        attrs: impl IntoIterator<Item = S>,
    ) -> Self {
        self.displayed_attributes = Some(attrs.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_filterable_attributes<S: Into<String>>(
        mut self,
        attrs: impl IntoIterator<Item = S>,
    ) -> Self {
        self.filterable_attributes = Some(attrs.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_sortable_attributes<S: Into<String>>(
        mut self,
        attrs: impl IntoIterator<Item = S>,
    ) -> Self {
        self.sortable_attributes = Some(attrs.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_stop_words<S: Into<String>>(mut self, words: impl IntoIterator<Item = S>) -> Self {
        self.stop_words = Some(words.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_synonyms(mut self, synonyms: BTreeMap<String, Vec<String>>) -> Self {
        self.synonyms = Some(synonyms);
        self
    }

    pub fn with_pagination(mut self, max_total_hits: usize) -> Self {
        self.pagination = Some(PaginationSetting { max_total_hits });
        self
    }

    pub fn with_faceting(mut self, max_values_per_facet: usize) -> Self {
        self.faceting = Some(FacetingSetting { max_values_per_facet });
        self
    }
}
