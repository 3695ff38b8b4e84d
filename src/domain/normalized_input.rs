use std::path::PathBuf;

use super::query_text::QueryText;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedInput {
    pub query_text: QueryText,
    pub image_ref: Option<PathBuf>,
}
