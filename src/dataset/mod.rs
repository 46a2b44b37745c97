//! Loading exported reviews and the survey catalog.
//!
//! Reviews come either from a single JSON array or from a directory of
//! JSON shards; shards are read concurrently and concatenated in path order.
//! The catalog is validated before it is handed to the analysis layer.

mod error;

pub use error::{DatasetError, Result};

use crate::models::{Catalog, Review};
use futures::future::try_join_all;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Read a file into a string, tagging failures with the path.
async fn read(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })
}

/// Parse JSON text, tagging failures with the path.
fn parse<T: serde::de::DeserializeOwned>(path: &Path, content: &str) -> Result<T> {
    serde_json::from_str(content).map_err(|source| DatasetError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Returns true for dot-files and dot-directories.
fn is_hidden(name: &str) -> bool {
    name.starts_with('.') && name != "." && name != ".."
}

/// List the `*.json` shards under `dir`, sorted by path.
pub fn review_shards(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut shards = Vec::new();

    let walker = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(&entry.file_name().to_string_lossy()));

    for entry in walker {
        let entry = entry.map_err(|source| DatasetError::Walk {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if entry.file_type().is_file()
            && path.extension().and_then(|e| e.to_str()) == Some("json")
        {
            shards.push(path.to_path_buf());
        }
    }

    Ok(shards)
}

/// Load reviews from a JSON file or a directory of JSON files.
pub async fn load_reviews(path: &Path) -> Result<Vec<Review>> {
    let files = if path.is_dir() {
        let shards = review_shards(path)?;
        debug!("Found {} review shards in {}", shards.len(), path.display());
        shards
    } else {
        vec![path.to_path_buf()]
    };

    let batches = try_join_all(files.iter().map(|file| async move {
        let content = read(file).await?;
        parse::<Vec<Review>>(file, &content)
    }))
    .await?;

    let reviews: Vec<Review> = batches.into_iter().flatten().collect();
    info!("Loaded {} reviews from {}", reviews.len(), path.display());
    Ok(reviews)
}

/// Load and validate the question/composite catalog.
pub async fn load_catalog(path: &Path) -> Result<Catalog> {
    let content = read(path).await?;
    let catalog: Catalog = parse(path, &content)?;
    validate_catalog(&catalog)?;

    info!(
        "Loaded catalog with {} questions and {} composites",
        catalog.questions.len(),
        catalog.composites.len()
    );
    Ok(catalog)
}

/// Check ids are unique and every composite member exists in the
/// composite's own category.
pub fn validate_catalog(catalog: &Catalog) -> Result<()> {
    let mut seen = HashSet::new();
    for question in &catalog.questions {
        if !seen.insert(question.id.as_str()) {
            return Err(DatasetError::DuplicateQuestion(question.id.clone()));
        }
    }

    let mut seen = HashSet::new();
    for composite in &catalog.composites {
        if !seen.insert(composite.id.as_str()) {
            return Err(DatasetError::DuplicateComposite(composite.id.clone()));
        }

        for member in &composite.questions {
            let question =
                catalog
                    .question(member)
                    .ok_or_else(|| DatasetError::UnknownQuestion {
                        composite: composite.name.clone(),
                        question: member.clone(),
                    })?;
            if question.category != composite.category {
                return Err(DatasetError::CategoryMismatch {
                    composite: composite.name.clone(),
                    question: question.id.clone(),
                    expected: composite.category,
                    found: question.category,
                });
            }
        }
    }

    Ok(())
}
