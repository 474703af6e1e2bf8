//! Task taxonomy: categories, subtasks and their composite key.
//!
//! # Responsibility
//! - Provide strongly typed labels for category and subtask.
//! - Hold the caller-supplied taxonomy shape (category -> ordered subtasks).
//!
//! # Invariants
//! - Labels are trimmed, non-empty and free of control characters.
//! - Category labels never contain `/`, so `category/subtask` text parses
//!   back into the same `TaskKey`.
//! - `TaskKey` compares category and subtask separately, so the same subtask
//!   name under two categories never collides.
//! - Categories are unique; subtasks are unique within one category.

use log::error;
use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

const DEFAULT_CATALOG: &[(&str, &[&str])] = &[
    ("조직", &["회의", "문서작성", "보고", "인사", "예산", "기타"]),
    ("R&D", &["실험", "분석", "설계", "논문조사", "특허", "기타"]),
    ("개발", &["조사", "실험", "설계", "구현", "테스트", "기타"]),
    ("영업", &["고객미팅", "제안서", "견적", "기타"]),
    ("생산", &["공정관리", "품질검사", "설비점검", "재고관리", "기타"]),
    ("교육", &["사내교육", "외부교육", "세미나", "기타"]),
    (
        "기타",
        &["이동", "행정", "청소", "대기", "휴가", "병가", "외부행사", "기타"],
    ),
];

/// Taxonomy label and shape errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaxonomyError {
    EmptyLabel,
    ControlCharacter(String),
    ReservedCharacter { label: String, character: char },
    DuplicateCategory(String),
    DuplicateSubtask { category: String, subtask: String },
    MalformedKey(String),
}

impl Display for TaxonomyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyLabel => write!(f, "taxonomy label must not be empty"),
            Self::ControlCharacter(value) => {
                write!(f, "taxonomy label contains control characters: {value:?}")
            }
            Self::ReservedCharacter { label, character } => {
                write!(f, "taxonomy label must not contain `{character}`: {label:?}")
            }
            Self::DuplicateCategory(value) => write!(f, "category already defined: {value}"),
            Self::DuplicateSubtask { category, subtask } => {
                write!(f, "subtask already defined under {category}: {subtask}")
            }
            Self::MalformedKey(value) => {
                write!(f, "task key must look like `category/subtask`, got `{value}`")
            }
        }
    }
}

impl Error for TaxonomyError {}

const KEY_SEPARATOR: char = '/';

fn normalize_label(value: &str, reserved: &[char]) -> Result<String, TaxonomyError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TaxonomyError::EmptyLabel);
    }
    if trimmed.chars().any(char::is_control) {
        return Err(TaxonomyError::ControlCharacter(trimmed.to_string()));
    }
    if let Some(character) = trimmed.chars().find(|c| reserved.contains(c)) {
        return Err(TaxonomyError::ReservedCharacter {
            label: trimmed.to_string(),
            character,
        });
    }
    Ok(trimmed.to_string())
}

macro_rules! label_type {
    ($(#[$meta:meta])* $name:ident, reserved = $reserved:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: &str) -> Result<Self, TaxonomyError> {
                normalize_label(value, $reserved).map(Self)
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                Self::new(&raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

label_type!(
    /// Top-level grouping of work activity.
    Category,
    reserved = &[KEY_SEPARATOR]
);
label_type!(
    /// Leaf activity within one category.
    Subtask,
    reserved = &[]
);

/// Composite key for one taxonomy leaf.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TaskKey {
    pub category: Category,
    pub subtask: Subtask,
}

impl TaskKey {
    pub fn new(category: &str, subtask: &str) -> Result<Self, TaxonomyError> {
        Ok(Self {
            category: Category::new(category)?,
            subtask: Subtask::new(subtask)?,
        })
    }

    /// Parses `category/subtask`. The first `/` separates the two labels.
    pub fn parse(value: &str) -> Result<Self, TaxonomyError> {
        let (category, subtask) = value
            .split_once(KEY_SEPARATOR)
            .ok_or_else(|| TaxonomyError::MalformedKey(value.trim().to_string()))?;
        Self::new(category, subtask)
    }
}

impl Display for TaskKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{KEY_SEPARATOR}{}", self.category, self.subtask)
    }
}

/// Ordered mapping from category to its subtasks.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Taxonomy {
    categories: Vec<(Category, Vec<Subtask>)>,
}

impl Taxonomy {
    pub fn builder() -> TaxonomyBuilder {
        TaxonomyBuilder::default()
    }

    /// Built-in catalog used by the daily form.
    pub fn default_catalog() -> Self {
        let mut builder = Self::builder();
        for (category, subtasks) in DEFAULT_CATALOG {
            builder = builder.category(category, subtasks.iter().copied());
        }
        let catalog = builder.build();
        debug_assert!(catalog.is_ok(), "default catalog is invalid: {catalog:?}");
        catalog.unwrap_or_else(|err| {
            error!("event=taxonomy_default module=taxonomy status=error error={err}");
            Taxonomy::default()
        })
    }

    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter().map(|(category, _)| category)
    }

    pub fn subtasks(&self, category: &Category) -> Option<&[Subtask]> {
        self.categories
            .iter()
            .find(|(candidate, _)| candidate == category)
            .map(|(_, subtasks)| subtasks.as_slice())
    }

    /// All leaf keys in declaration order.
    pub fn keys(&self) -> Vec<TaskKey> {
        self.categories
            .iter()
            .flat_map(|(category, subtasks)| {
                subtasks.iter().map(move |subtask| TaskKey {
                    category: category.clone(),
                    subtask: subtask.clone(),
                })
            })
            .collect()
    }

    pub fn contains(&self, key: &TaskKey) -> bool {
        self.subtasks(&key.category)
            .is_some_and(|subtasks| subtasks.contains(&key.subtask))
    }

    pub fn leaf_count(&self) -> usize {
        self.categories.iter().map(|(_, subtasks)| subtasks.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Incremental taxonomy builder. Errors surface on `build`.
#[derive(Debug, Default)]
pub struct TaxonomyBuilder {
    raw: Vec<(String, Vec<String>)>,
}

impl TaxonomyBuilder {
    pub fn category<'a>(
        mut self,
        category: &str,
        subtasks: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        self.raw.push((
            category.to_string(),
            subtasks.into_iter().map(str::to_string).collect(),
        ));
        self
    }

    pub fn build(self) -> Result<Taxonomy, TaxonomyError> {
        let mut categories: Vec<(Category, Vec<Subtask>)> = Vec::with_capacity(self.raw.len());
        for (raw_category, raw_subtasks) in self.raw {
            let category = Category::new(&raw_category)?;
            if categories.iter().any(|(existing, _)| existing == &category) {
                return Err(TaxonomyError::DuplicateCategory(category.0));
            }

            let mut subtasks: Vec<Subtask> = Vec::with_capacity(raw_subtasks.len());
            for raw_subtask in raw_subtasks {
                let subtask = Subtask::new(&raw_subtask)?;
                if subtasks.contains(&subtask) {
                    return Err(TaxonomyError::DuplicateSubtask {
                        category: category.0.clone(),
                        subtask: subtask.0,
                    });
                }
                subtasks.push(subtask);
            }
            categories.push((category, subtasks));
        }
        Ok(Taxonomy { categories })
    }
}
