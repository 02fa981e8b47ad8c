//! In-memory term → vector table
//!
//! The simplest embedding model: a fixed dictionary, loaded from a map, a JSON
//! object file or a GloVe-style text file.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::{DEFAULT_EMBEDDING_DIMENSION, EmbeddingModel};
use crate::error::{Result, TacitError};

/// Fixed dictionary of term embeddings.
#[derive(Debug, Clone)]
pub struct StaticEmbeddings {
    vectors: HashMap<String, Vec<f32>>,
    dimension: usize,
}

impl StaticEmbeddings {
    /// An empty table that knows no terms (every lookup misses).
    pub fn empty(dimension: usize) -> Self {
        Self {
            vectors: HashMap::new(),
            dimension,
        }
    }

    /// Build a table from a map, inferring the dimension from its vectors.
    ///
    /// An empty map yields a table of [`DEFAULT_EMBEDDING_DIMENSION`].
    ///
    /// # Errors
    /// Fails if the vectors do not all have the same non-zero length.
    pub fn from_map(vectors: HashMap<String, Vec<f32>>) -> Result<Self> {
        let dimension = match vectors.values().next() {
            Some(v) => v.len(),
            None => return Ok(Self::empty(DEFAULT_EMBEDDING_DIMENSION)),
        };
        Self::with_dimension(vectors, dimension)
    }

    /// Build a table from a map whose vectors must all have `dimension` elements.
    pub fn with_dimension(vectors: HashMap<String, Vec<f32>>, dimension: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(TacitError::Embedding(
                "Embedding dimension must be non-zero".to_string(),
            ));
        }
        if let Some((term, v)) = vectors.iter().find(|(_, v)| v.len() != dimension) {
            tracing::error!(
                term = term.as_str(),
                expected = dimension,
                actual = v.len(),
                "Inconsistent embedding table"
            );
            return Err(TacitError::DimensionMismatch {
                expected: dimension,
                actual: v.len(),
            });
        }
        Ok(Self { vectors, dimension })
    }

    /// Load a JSON object of the form `{"term": [f32, ...], ...}`.
    ///
    /// An empty object yields an empty table of `empty_dimension`.
    pub fn from_json_file(path: &Path, empty_dimension: usize) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            TacitError::Embedding(format!(
                "Failed to read embeddings file {}: {}",
                path.display(),
                e
            ))
        })?;
        let vectors: HashMap<String, Vec<f32>> = serde_json::from_str(&content).map_err(|e| {
            TacitError::Embedding(format!(
                "Failed to parse embeddings file {}: {}",
                path.display(),
                e
            ))
        })?;
        let table = if vectors.is_empty() {
            Self::empty(empty_dimension)
        } else {
            Self::from_map(vectors)?
        };
        tracing::info!(
            "Loaded {} embeddings (dimension {}) from {}",
            table.len(),
            table.dimension,
            path.display()
        );
        Ok(table)
    }

    /// Parse GloVe text format: one `term v1 v2 ... vD` record per line.
    ///
    /// Blank lines are skipped. Every record must have the same dimension.
    /// Content without records yields an empty table of `empty_dimension`.
    pub fn from_glove_str(content: &str, empty_dimension: usize) -> Result<Self> {
        let mut vectors = HashMap::new();
        let mut dimension = None;

        for (line_no, line) in content.lines().enumerate() {
            let mut fields = line.split_whitespace();
            let Some(term) = fields.next() else {
                continue;
            };
            let vector = fields
                .map(str::parse::<f32>)
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| {
                    TacitError::Embedding(format!("Invalid value on line {}: {}", line_no + 1, e))
                })?;

            match dimension {
                None => dimension = Some(vector.len()),
                Some(d) if d != vector.len() => {
                    return Err(TacitError::DimensionMismatch {
                        expected: d,
                        actual: vector.len(),
                    });
                }
                Some(_) => {}
            }
            vectors.insert(term.to_string(), vector);
        }

        match dimension {
            Some(d) => Self::with_dimension(vectors, d),
            None => Ok(Self::empty(empty_dimension)),
        }
    }

    /// Load a GloVe-style text file.
    pub fn from_glove_file(path: &Path, empty_dimension: usize) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            TacitError::Embedding(format!(
                "Failed to read embeddings file {}: {}",
                path.display(),
                e
            ))
        })?;
        let table = Self::from_glove_str(&content, empty_dimension)?;
        tracing::info!(
            "Loaded {} embeddings (dimension {}) from {}",
            table.len(),
            table.dimension,
            path.display()
        );
        Ok(table)
    }

    /// Load a table, choosing the format by extension (`.json` or GloVe text).
    ///
    /// `empty_dimension` is the dimension of the table if the file holds no
    /// vectors; otherwise the vectors decide.
    pub fn from_path(path: &Path, empty_dimension: usize) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_file(path, empty_dimension),
            _ => Self::from_glove_file(path, empty_dimension),
        }
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.vectors.contains_key(term)
    }
}

impl EmbeddingModel for StaticEmbeddings {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn lookup(&self, term: &str) -> Result<Option<Vec<f32>>> {
        Ok(self.vectors.get(term).cloned())
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_map_infers_dimension() {
        let table = StaticEmbeddings::from_map(HashMap::from([
            ("box".to_string(), vec![0.8, 0.1, 0.2]),
            ("tikz".to_string(), vec![0.5, 0.5, 0.1]),
        ]))
        .unwrap();
        assert_eq!(table.dimension(), 3);
        assert_eq!(table.len(), 2);
        assert!(table.contains("box"));
        assert_eq!(table.lookup("tikz").unwrap(), Some(vec![0.5, 0.5, 0.1]));
        assert_eq!(table.lookup("red").unwrap(), None);
    }

    #[test]
    fn test_from_map_empty_uses_default_dimension() {
        let table = StaticEmbeddings::from_map(HashMap::new()).unwrap();
        assert_eq!(table.dimension(), DEFAULT_EMBEDDING_DIMENSION);
        assert!(table.is_empty());
    }

    #[test]
    fn test_from_map_rejects_inconsistent_dimensions() {
        let result = StaticEmbeddings::with_dimension(
            HashMap::from([
                ("box".to_string(), vec![0.8, 0.1, 0.2]),
                ("tikz".to_string(), vec![0.5, 0.5]),
            ]),
            3,
        );
        assert!(matches!(
            result,
            Err(TacitError::DimensionMismatch {
                expected: 3,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert!(StaticEmbeddings::with_dimension(HashMap::new(), 0).is_err());
    }

    #[test]
    fn test_from_glove_str() {
        let content = "box 0.8 0.1 0.2\n\nrectangle 0.79 0.12 0.18\n";
        let table = StaticEmbeddings::from_glove_str(content, 50).unwrap();
        assert_eq!(table.dimension(), 3);
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.lookup("rectangle").unwrap(),
            Some(vec![0.79, 0.12, 0.18])
        );
    }

    #[test]
    fn test_from_glove_str_rejects_ragged_rows() {
        let content = "box 0.8 0.1 0.2\ntikz 0.5 0.5\n";
        assert!(matches!(
            StaticEmbeddings::from_glove_str(content, 50),
            Err(TacitError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_from_glove_str_rejects_bad_number() {
        let content = "box 0.8 nope 0.2\n";
        assert!(matches!(
            StaticEmbeddings::from_glove_str(content, 50),
            Err(TacitError::Embedding(_))
        ));
    }

    #[test]
    fn test_from_path_dispatches_on_extension() {
        let dir = tempfile::tempdir().unwrap();

        let json_path = dir.path().join("vectors.json");
        std::fs::write(&json_path, r#"{"box": [0.8, 0.1, 0.2]}"#).unwrap();
        let table = StaticEmbeddings::from_path(&json_path, 50).unwrap();
        assert!(table.contains("box"));

        let glove_path = dir.path().join("glove.txt");
        let mut file = std::fs::File::create(&glove_path).unwrap();
        writeln!(file, "tikz 0.5 0.5 0.1").unwrap();
        let table = StaticEmbeddings::from_path(&glove_path, 50).unwrap();
        assert!(table.contains("tikz"));
    }

    #[test]
    fn test_empty_files_use_given_dimension() {
        let dir = tempfile::tempdir().unwrap();

        let json_path = dir.path().join("empty.json");
        std::fs::write(&json_path, "{}").unwrap();
        let table = StaticEmbeddings::from_path(&json_path, 3).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.dimension(), 3);

        let glove_path = dir.path().join("empty.txt");
        std::fs::write(&glove_path, "\n\n").unwrap();
        let table = StaticEmbeddings::from_path(&glove_path, 7).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.dimension(), 7);
    }

    #[test]
    fn test_missing_file_is_embedding_error() {
        let result = StaticEmbeddings::from_path(Path::new("/nonexistent/vectors.json"), 50);
        assert!(matches!(result, Err(TacitError::Embedding(_))));
    }
}
