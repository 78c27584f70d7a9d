//! Extension-based file categorization.
//!
//! A [`CategoryTable`] is an ordered list of `{category, extensions}` rules.
//! Lookups lower-case the extension and return the first matching category,
//! falling back to [`Category::Others`] when nothing matches.
//!
//! # Examples
//!
//! ```
//! use desktidy::file_category::{Category, CategoryTable};
//!
//! let table = CategoryTable::default();
//! assert_eq!(table.category_of(".jpg"), Category::Images);
//! assert_eq!(table.category_of(".MP4"), Category::Videos);
//! assert_eq!(table.category_of(".xyz"), Category::Others);
//! ```
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;

/// A broad file category, and the name of the folder it is sorted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Image files (JPG, PNG, HEIC, etc.)
    Images,
    /// Video files (MOV, MP4, MKV, etc.)
    Videos,
    /// Document files (PDF, DOCX, TXT, etc.)
    Documents,
    /// Audio files (MP3, WAV, FLAC, etc.)
    Audio,
    /// Archive files (ZIP, RAR, 7Z, etc.)
    Archives,
    /// Anything no rule matches
    Others,
}

impl Category {
    /// Every category, in enumeration order.
    pub const ALL: [Category; 6] = [
        Category::Images,
        Category::Videos,
        Category::Documents,
        Category::Audio,
        Category::Archives,
        Category::Others,
    ];

    /// Returns the directory name for this category.
    ///
    /// ```
    /// use desktidy::file_category::Category;
    ///
    /// assert_eq!(Category::Images.dir_name(), "images");
    /// assert_eq!(Category::Others.dir_name(), "others");
    /// ```
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Images => "images",
            Category::Videos => "videos",
            Category::Documents => "documents",
            Category::Audio => "audio",
            Category::Archives => "archives",
            Category::Others => "others",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Errors raised while building a [`CategoryTable`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// Extension is empty or lacks the leading `.`.
    #[error("invalid extension '{0}': expected a leading '.' followed by at least one character")]
    InvalidExtension(String),
    /// The same extension was listed under two categories.
    #[error("extension '{extension}' is mapped to both {first} and {second}")]
    DuplicateExtension {
        extension: String,
        first: Category,
        second: Category,
    },
}

/// One row of a [`CategoryTable`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub category: Category,
    /// Lower-cased extensions including the leading `.`.
    pub extensions: Vec<String>,
}

impl CategoryRule {
    pub fn new(category: Category, extensions: &[&str]) -> Self {
        Self {
            category,
            extensions: extensions.iter().map(|ext| ext.to_lowercase()).collect(),
        }
    }
}

/// Ordered extension-to-category table.
///
/// Rules are checked in order and no extension may appear under more than
/// one category, so the order never changes a lookup result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTable {
    rules: Vec<CategoryRule>,
}

static DEFAULT_TABLE: LazyLock<CategoryTable> = LazyLock::new(CategoryTable::default);

impl CategoryTable {
    /// Builds a table, normalizing extensions and rejecting overlaps.
    ///
    /// ```
    /// use desktidy::file_category::{Category, CategoryRule, CategoryTable};
    ///
    /// let clash = CategoryTable::new(vec![
    ///     CategoryRule::new(Category::Images, &[".svg"]),
    ///     CategoryRule::new(Category::Documents, &[".SVG"]),
    /// ]);
    /// assert!(clash.is_err());
    /// ```
    pub fn new(rules: Vec<CategoryRule>) -> Result<Self, TableError> {
        let mut seen: HashMap<String, Category> = HashMap::new();
        let mut normalized = Vec::with_capacity(rules.len());

        for rule in rules {
            let mut extensions = Vec::with_capacity(rule.extensions.len());
            for ext in rule.extensions {
                let ext = ext.to_lowercase();
                if !ext.starts_with('.') || ext.len() < 2 {
                    return Err(TableError::InvalidExtension(ext));
                }
                if let Some(&first) = seen.get(&ext) {
                    // Repeats inside a single rule are harmless.
                    if first == rule.category {
                        continue;
                    }
                    return Err(TableError::DuplicateExtension {
                        extension: ext,
                        first,
                        second: rule.category,
                    });
                }
                seen.insert(ext.clone(), rule.category);
                extensions.push(ext);
            }
            normalized.push(CategoryRule {
                category: rule.category,
                extensions,
            });
        }

        Ok(Self { rules: normalized })
    }

    /// Returns a copy of this table with one more extension mapped.
    pub fn with_extension(&self, ext: &str, category: Category) -> Result<Self, TableError> {
        let mut rules = self.rules.clone();
        match rules.iter_mut().find(|rule| rule.category == category) {
            Some(rule) => rule.extensions.push(ext.to_string()),
            None => rules.push(CategoryRule::new(category, &[ext])),
        }
        Self::new(rules)
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// Maps an extension token such as `".JPG"` to its category.
    ///
    /// The lookup is case-insensitive. Unknown and empty extensions map to
    /// [`Category::Others`].
    pub fn category_of(&self, extension: &str) -> Category {
        let extension = extension.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.extensions.iter().any(|ext| *ext == extension))
            .map(|rule| rule.category)
            .unwrap_or(Category::Others)
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self {
            rules: vec![
                CategoryRule::new(
                    Category::Images,
                    &[".jpg", ".jpeg", ".png", ".gif", ".bmp", ".heic", ".tiff", ".webp"],
                ),
                CategoryRule::new(
                    Category::Videos,
                    &[".mov", ".mp4", ".avi", ".wmv", ".flv", ".mkv", ".webm"],
                ),
                CategoryRule::new(
                    Category::Documents,
                    &[".pdf", ".doc", ".docx", ".txt", ".rtf", ".xlsx", ".xls", ".ppt", ".pptx"],
                ),
                CategoryRule::new(Category::Audio, &[".mp3", ".wav", ".flac", ".m4a", ".aac"]),
                CategoryRule::new(Category::Archives, &[".zip", ".rar", ".7z", ".tar", ".gz"]),
            ],
        }
    }
}

/// Looks up `extension` in the default table.
///
/// ```
/// use desktidy::file_category::{Category, category_of};
///
/// assert_eq!(category_of(".PDF"), Category::Documents);
/// assert_eq!(category_of(""), Category::Others);
/// ```
pub fn category_of(extension: &str) -> Category {
    DEFAULT_TABLE.category_of(extension)
}

/// Returns the last extension of a file name with its leading `.`, or an
/// empty string when there is none (`"README"`, `".bashrc"`).
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_dir_names() {
        assert_eq!(Category::Images.dir_name(), "images");
        assert_eq!(Category::Videos.dir_name(), "videos");
        assert_eq!(Category::Documents.dir_name(), "documents");
        assert_eq!(Category::Audio.dir_name(), "audio");
        assert_eq!(Category::Archives.dir_name(), "archives");
        assert_eq!(Category::Others.dir_name(), "others");
    }

    #[test]
    fn test_default_table_is_valid() {
        let table = CategoryTable::default();
        let rebuilt = CategoryTable::new(table.rules().to_vec()).expect("default table must validate");
        assert_eq!(rebuilt, table);
    }

    #[test]
    fn test_default_mappings() {
        let table = CategoryTable::default();
        assert_eq!(table.category_of(".heic"), Category::Images);
        assert_eq!(table.category_of(".mkv"), Category::Videos);
        assert_eq!(table.category_of(".xlsx"), Category::Documents);
        assert_eq!(table.category_of(".m4a"), Category::Audio);
        assert_eq!(table.category_of(".7z"), Category::Archives);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let table = CategoryTable::default();
        for rule in table.rules() {
            for ext in &rule.extensions {
                assert_eq!(table.category_of(ext), rule.category);
                assert_eq!(table.category_of(&ext.to_uppercase()), rule.category);
            }
        }
        assert_eq!(table.category_of(".JpEg"), Category::Images);
    }

    #[test]
    fn test_unknown_extension_is_others() {
        let table = CategoryTable::default();
        assert_eq!(table.category_of(""), Category::Others);
        assert_eq!(table.category_of(".xyz"), Category::Others);
        assert_eq!(table.category_of("."), Category::Others);
        // No separator, no match.
        assert_eq!(table.category_of("jpg"), Category::Others);
    }

    #[test]
    fn test_free_function_uses_default_table() {
        assert_eq!(category_of(".ZIP"), Category::Archives);
        assert_eq!(category_of(".svg"), Category::Others);
    }

    #[test]
    fn test_duplicate_extension_rejected() {
        let result = CategoryTable::new(vec![
            CategoryRule::new(Category::Audio, &[".ogg"]),
            CategoryRule::new(Category::Videos, &[".OGG"]),
        ]);
        assert_eq!(
            result,
            Err(TableError::DuplicateExtension {
                extension: ".ogg".to_string(),
                first: Category::Audio,
                second: Category::Videos,
            })
        );
    }

    #[test]
    fn test_invalid_extension_rejected() {
        let missing_dot = CategoryTable::new(vec![CategoryRule::new(Category::Images, &["png"])]);
        assert_eq!(missing_dot, Err(TableError::InvalidExtension("png".to_string())));

        let bare_dot = CategoryTable::new(vec![CategoryRule::new(Category::Images, &["."])]);
        assert!(bare_dot.is_err());
    }

    #[test]
    fn test_with_extension() {
        let table = CategoryTable::default()
            .with_extension(".SVG", Category::Images)
            .unwrap();
        assert_eq!(table.category_of(".svg"), Category::Images);

        let clash = CategoryTable::default().with_extension(".pdf", Category::Archives);
        assert!(matches!(clash, Err(TableError::DuplicateExtension { .. })));
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of(Path::new("photo.JPG")), ".JPG");
        assert_eq!(extension_of(Path::new("backup.tar.gz")), ".gz");
        assert_eq!(extension_of(Path::new("README")), "");
        assert_eq!(extension_of(Path::new(".bashrc")), "");
    }

    #[test]
    fn test_category_serializes_as_label() {
        let json = serde_json::to_string(&Category::Archives).unwrap();
        assert_eq!(json, "\"archives\"");
    }
}
