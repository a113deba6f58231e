//! Naming of the checkpoint key and its source-scoped fields.

/// Default name of the hash key holding checkpoint fields in every database.
pub const DEFAULT_CHECKPOINT_KEY: &str = "tidemark-checkpoint";

/// One of the three fields written per source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckpointField {
    RunId,
    OffsetBegin,
    OffsetEnd,
}

impl CheckpointField {
    pub const ALL: [CheckpointField; 3] = [
        CheckpointField::RunId,
        CheckpointField::OffsetBegin,
        CheckpointField::OffsetEnd,
    ];

    pub fn suffix(self) -> &'static str {
        match self {
            CheckpointField::RunId => "run-id",
            CheckpointField::OffsetBegin => "offset-begin",
            CheckpointField::OffsetEnd => "offset-end",
        }
    }
}

/// Where checkpoints live inside each logical database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckpointLayout {
    key: String,
}

impl Default for CheckpointLayout {
    fn default() -> Self {
        Self::new(DEFAULT_CHECKPOINT_KEY)
    }
}

impl CheckpointLayout {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Field name for `source`, e.g. `10.0.0.1:6379-offset-begin`.
    pub fn field_name(&self, source: &str, field: CheckpointField) -> String {
        format!("{}-{}", source, field.suffix())
    }

    /// All three field names for `source`, in [`CheckpointField::ALL`] order.
    pub fn field_names(&self, source: &str) -> Vec<String> {
        CheckpointField::ALL
            .iter()
            .map(|f| self.field_name(source, *f))
            .collect()
    }

    /// Classify a stored field name, returning `None` for other sources and
    /// unknown suffixes.
    pub fn classify(&self, source: &str, name: &str) -> Option<CheckpointField> {
        let rest = name.strip_prefix(source)?.strip_prefix('-')?;
        CheckpointField::ALL
            .into_iter()
            .find(|f| f.suffix() == rest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names() {
        let layout = CheckpointLayout::default();
        assert_eq!(layout.key(), "tidemark-checkpoint");
        assert_eq!(
            layout.field_names("10.0.0.1:6379"),
            vec![
                "10.0.0.1:6379-run-id",
                "10.0.0.1:6379-offset-begin",
                "10.0.0.1:6379-offset-end",
            ]
        );
    }

    #[test]
    fn test_classify() {
        let layout = CheckpointLayout::new("ckpt");
        let src = "10.0.0.1:6379";

        assert_eq!(
            layout.classify(src, "10.0.0.1:6379-offset-end"),
            Some(CheckpointField::OffsetEnd)
        );
        assert_eq!(
            layout.classify(src, "10.0.0.1:6379-run-id"),
            Some(CheckpointField::RunId)
        );
        // Different source sharing a prefix
        assert_eq!(layout.classify(src, "10.0.0.1:63790-offset-end"), None);
        assert_eq!(layout.classify(src, "10.0.0.2:6379-offset-end"), None);
        // Unknown suffix
        assert_eq!(layout.classify(src, "10.0.0.1:6379-timestamp"), None);
        assert_eq!(layout.classify(src, "10.0.0.1:6379offset-end"), None);
    }
}
