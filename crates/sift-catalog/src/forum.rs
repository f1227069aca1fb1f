//! Forum threads.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sift::{FieldSpec, Number, Query, Record, Schema, Sort, SortKey, Timestamp, Value};

use crate::error::CatalogError;
use crate::ALL;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForumThread {
    pub id: String,
    pub title: String,
    pub excerpt: String,
    pub author: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub replies: u32,
    pub views: u32,
    pub last_activity: Timestamp,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub solved: bool,
}

impl ForumThread {
    pub const ID: &'static str = "id";
    pub const TITLE: &'static str = "title";
    pub const EXCERPT: &'static str = "excerpt";
    pub const AUTHOR: &'static str = "author";
    pub const CATEGORY: &'static str = "category";
    pub const TAGS: &'static str = "tags";
    pub const REPLIES: &'static str = "replies";
    pub const VIEWS: &'static str = "views";
    pub const LAST_ACTIVITY: &'static str = "lastActivity";
    pub const PINNED: &'static str = "pinned";
    pub const SOLVED: &'static str = "solved";

    pub fn schema() -> sift::Result<Schema> {
        Schema::define([
            FieldSpec::text(Self::ID).key(),
            FieldSpec::text(Self::TITLE).searchable(),
            FieldSpec::text(Self::EXCERPT).searchable(),
            FieldSpec::text(Self::AUTHOR),
            FieldSpec::enumeration(Self::CATEGORY),
            FieldSpec::tags(Self::TAGS).searchable(),
            FieldSpec::number(Self::REPLIES),
            FieldSpec::number(Self::VIEWS),
            FieldSpec::date(Self::LAST_ACTIVITY),
            FieldSpec::boolean(Self::PINNED),
            FieldSpec::boolean(Self::SOLVED),
        ])
    }
}

impl Record for ForumThread {
    fn field(&self, name: &str) -> Value<'_> {
        match name {
            Self::ID => Value::Text(&self.id),
            Self::TITLE => Value::Text(&self.title),
            Self::EXCERPT => Value::Text(&self.excerpt),
            Self::AUTHOR => Value::Text(&self.author),
            Self::CATEGORY => Value::Text(&self.category),
            Self::TAGS => Value::Tags(&self.tags),
            Self::REPLIES => Value::Number(Number::from(self.replies)),
            Self::VIEWS => Value::Number(Number::from(self.views)),
            Self::LAST_ACTIVITY => Value::Timestamp(self.last_activity),
            Self::PINNED => Value::Bool(self.pinned),
            Self::SOLVED => Value::Bool(self.solved),
            _ => Value::None,
        }
    }
}

/// Forum sort choices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThreadSort {
    /// Pinned threads first, then most recently active.
    #[default]
    Latest,
    MostReplies,
    MostViewed,
}

impl ThreadSort {
    pub const ALL: [ThreadSort; 3] = [
        ThreadSort::Latest,
        ThreadSort::MostReplies,
        ThreadSort::MostViewed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ThreadSort::Latest => "latest",
            ThreadSort::MostReplies => "most-replies",
            ThreadSort::MostViewed => "most-viewed",
        }
    }

    pub fn sort(self) -> Sort {
        match self {
            ThreadSort::Latest => {
                Sort::desc(ForumThread::PINNED).then(SortKey::desc(ForumThread::LAST_ACTIVITY))
            }
            ThreadSort::MostReplies => Sort::desc(ForumThread::REPLIES)
                .then(SortKey::desc(ForumThread::LAST_ACTIVITY)),
            ThreadSort::MostViewed => Sort::desc(ForumThread::VIEWS),
        }
    }
}

impl fmt::Display for ThreadSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThreadSort {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ThreadSort::ALL
            .into_iter()
            .find(|preset| preset.as_str() == s)
            .ok_or_else(|| CatalogError::UnknownSort(s.to_string()))
    }
}

/// State of the forum sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ForumFilters {
    pub search: String,
    pub category: String,
    pub tags: Vec<String>,
    pub unsolved_only: bool,
    pub sort: ThreadSort,
}

impl Default for ForumFilters {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: ALL.to_string(),
            tags: Vec::new(),
            unsolved_only: false,
            sort: ThreadSort::Latest,
        }
    }
}

impl ForumFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = text.into();
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn unsolved_only(mut self) -> Self {
        self.unsolved_only = true;
        self
    }

    pub fn sort(mut self, sort: ThreadSort) -> Self {
        self.sort = sort;
        self
    }

    /// Translates the sidebar state into a query over [`ForumThread::schema`].
    pub fn to_query(&self) -> Query {
        let mut query = Query::new().all_sentinel(ALL).sort(self.sort.sort());

        if !self.search.trim().is_empty() {
            query = query.search(self.search.as_str());
        }
        if !self.category.is_empty() {
            query = query.filter_eq(ForumThread::CATEGORY, self.category.as_str());
        }
        if !self.tags.is_empty() {
            query = query.filter_any(ForumThread::TAGS, self.tags.iter().map(String::as_str));
        }
        if self.unsolved_only {
            query = query.filter_eq(ForumThread::SOLVED, false);
        }
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift::QueryEngine;

    #[test]
    fn schema_is_valid() {
        let schema = ForumThread::schema().unwrap();
        assert_eq!(schema.len(), 11);
        assert_eq!(schema.searchable_fields().count(), 3);
    }

    #[test]
    fn every_preset_validates() {
        let schema = ForumThread::schema().unwrap();
        let engine = QueryEngine::new(&schema);
        for preset in ThreadSort::ALL {
            let query = ForumFilters::new().sort(preset).to_query();
            assert!(engine.validate(&query).is_ok(), "{preset} should validate");
        }
    }

    #[test]
    fn unknown_preset() {
        assert!("hottest".parse::<ThreadSort>().is_err());
        assert_eq!("most-viewed".parse::<ThreadSort>().unwrap(), ThreadSort::MostViewed);
    }

    #[test]
    fn tags_become_multi_value_filter() {
        let query = ForumFilters::new().tag("help").tag("python").to_query();
        assert!(matches!(
            query.filter_for(ForumThread::TAGS),
            Some(sift::Filter::AnyOf(values)) if values.len() == 2
        ));
    }
}
