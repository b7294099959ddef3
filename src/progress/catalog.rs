use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type StepId = i32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonStep {
    pub id: StepId,
    pub slug: String,
    pub title: String,
    pub short_title: String,
    pub duration: String,
    pub description: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("catalog has no steps")]
    Empty,
    #[error("step at position {position} has id {id}; ids must match their position")]
    IdMismatch { position: usize, id: StepId },
    #[error("step {id} has an empty slug")]
    EmptySlug { id: StepId },
    #[error("slug '{slug}' is used by more than one step")]
    DuplicateSlug { slug: String },
}

/// Ordered, immutable list of tutorial steps. Its length is the `N` used for
/// progress percentages.
#[derive(Debug, Clone)]
pub struct StepCatalog {
    steps: Vec<LessonStep>,
}

impl StepCatalog {
    pub fn new(steps: Vec<LessonStep>) -> Result<Self, CatalogError> {
        if steps.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        for (position, step) in steps.iter().enumerate() {
            if usize::try_from(step.id).ok() != Some(position) {
                return Err(CatalogError::IdMismatch {
                    position,
                    id: step.id,
                });
            }
            if step.slug.trim().is_empty() {
                return Err(CatalogError::EmptySlug { id: step.id });
            }
            if !seen.insert(step.slug.as_str()) {
                return Err(CatalogError::DuplicateSlug {
                    slug: step.slug.clone(),
                });
            }
        }

        Ok(Self { steps })
    }

    pub fn builtin() -> Self {
        let steps = BUILTIN_STEPS
            .iter()
            .enumerate()
            .map(|(idx, (short_title, duration, title, description))| LessonStep {
                id: idx as StepId,
                slug: idx.to_string(),
                title: (*title).to_string(),
                short_title: (*short_title).to_string(),
                duration: (*duration).to_string(),
                description: (*description).to_string(),
            })
            .collect();
        Self { steps }
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let steps: Vec<LessonStep> =
            serde_json::from_str(raw).context("catalog is not a JSON array of steps")?;
        Ok(Self::new(steps)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read step catalog {}", path.display()))?;
        Self::from_json_str(&raw)
            .with_context(|| format!("invalid step catalog {}", path.display()))
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LessonStep> {
        self.steps.iter()
    }

    pub fn get(&self, id: StepId) -> Option<&LessonStep> {
        usize::try_from(id).ok().and_then(|idx| self.steps.get(idx))
    }

    pub fn contains(&self, id: StepId) -> bool {
        self.get(id).is_some()
    }

    pub fn find_by_slug(&self, slug: &str) -> Option<&LessonStep> {
        let slug = slug.trim();
        self.steps.iter().find(|step| step.slug == slug)
    }

    pub fn next_after(&self, id: StepId) -> Option<&LessonStep> {
        self.get(id)?;
        self.get(id + 1)
    }

    pub fn previous_before(&self, id: StepId) -> Option<&LessonStep> {
        self.get(id)?;
        self.get(id.checked_sub(1)?)
    }
}

// (short title, duration, title, description)
const BUILTIN_STEPS: [(&str, &str, &str, &str); 9] = [
    (
        "Concepts",
        "10 min",
        "What is the framework?",
        "How it differs from plain React and how the App Router came to be",
    ),
    (
        "Project layout",
        "8 min",
        "Understanding the project structure",
        "The app/ directory and file-based routing",
    ),
    (
        "RSC",
        "12 min",
        "Server Components (RSC)",
        "A deep look at React Server Components",
    ),
    (
        "Client",
        "10 min",
        "Client Components",
        "How \"use client\" works and when to reach for it",
    ),
    (
        "Hydration",
        "15 min",
        "Understanding hydration",
        "What causes hydration errors and how to fix them",
    ),
    (
        "Rendering",
        "12 min",
        "SSR / SSG / ISR",
        "Rendering strategies and caching",
    ),
    (
        "Routing",
        "15 min",
        "Routing in depth",
        "Dynamic routes and advanced routing patterns",
    ),
    (
        "Data Fetching",
        "12 min",
        "Data fetching patterns",
        "Server Actions and API Routes",
    ),
    (
        "Hands-on",
        "30 min",
        "Hands-on: a todo app",
        "Build a todo app with everything covered so far",
    ),
];
