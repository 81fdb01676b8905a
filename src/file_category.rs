/// File categorization by extension.
///
/// Maps lowercased file extensions to broad categories ("images", "videos",
/// "documents", ...). Classification is a pure function of the extension:
/// file content is never inspected, so the same name always lands in the
/// same category regardless of what is inside it.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use tidysweep::file_category::{Category, CategoryMapper};
///
/// let mapper = CategoryMapper::default();
/// assert_eq!(mapper.classify(Path::new("photo.PNG")), Category::Image);
/// assert_eq!(mapper.classify(Path::new("report.pdf")), Category::Document);
/// assert_eq!(mapper.classify(Path::new("mystery.xyz")), Category::Other);
/// ```
use std::collections::HashMap;
use std::path::Path;

/// Represents a broad file category.
///
/// Categories name the top-level destination folders files are organized
/// into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Image files (PNG, JPG, HEIC, etc.)
    Image,
    /// Video files (MP4, MKV, WEBM, etc.)
    Video,
    /// Audio files (MP3, FLAC, OGG, etc.)
    Audio,
    /// Document files (PDF, TXT, MD, etc.)
    Document,
    /// Spreadsheet files (CSV, XLSX, ODS, etc.)
    Spreadsheet,
    /// Presentation files (PPTX, KEY, ODP, etc.)
    Presentation,
    /// Archive files (ZIP, 7Z, TAR, etc.)
    Archive,
    /// Source code and config files (RS, PY, JSON, etc.)
    Code,
    /// Executables and installers (EXE, MSI, PS1, etc.)
    Executable,
    /// Unknown or uncategorized files
    Other,
}

impl Category {
    /// Returns the destination directory name for this category.
    ///
    /// # Examples
    ///
    /// ```
    /// use tidysweep::file_category::Category;
    ///
    /// assert_eq!(Category::Image.dir_name(), "images");
    /// assert_eq!(Category::Executable.dir_name(), "executables");
    /// assert_eq!(Category::Other.dir_name(), "other");
    /// ```
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Image => "images",
            Category::Video => "videos",
            Category::Audio => "audio",
            Category::Document => "documents",
            Category::Spreadsheet => "spreadsheets",
            Category::Presentation => "presentations",
            Category::Archive => "archives",
            Category::Code => "code",
            Category::Executable => "executables",
            Category::Other => "other",
        }
    }
}

/// Maps file extensions to categories.
///
/// Lookups are case-insensitive and backed by a HashMap so classification
/// stays O(1) per file. Custom mappings can be added on top of the standard
/// table.
#[derive(Debug, Clone)]
pub struct CategoryMapper {
    extension_map: HashMap<String, Category>,
}

impl CategoryMapper {
    /// Creates a new `CategoryMapper` with the standard extension table.
    pub fn new() -> Self {
        let mut mapper = Self {
            extension_map: HashMap::new(),
        };
        mapper.populate_standard_mappings();
        mapper
    }

    /// Populates the mapper with the standard extension table.
    fn populate_standard_mappings(&mut self) {
        const TABLE: &[(Category, &[&str])] = &[
            (
                Category::Image,
                &["jpg", "jpeg", "png", "gif", "bmp", "webp", "svg", "heic"],
            ),
            (
                Category::Video,
                &["mp4", "mov", "avi", "mkv", "webm", "wmv"],
            ),
            (
                Category::Audio,
                &["mp3", "wav", "flac", "aac", "ogg", "m4a"],
            ),
            (Category::Document, &["pdf", "txt", "rtf", "md"]),
            (Category::Spreadsheet, &["csv", "xls", "xlsx", "ods"]),
            (Category::Presentation, &["ppt", "pptx", "key", "odp"]),
            (Category::Archive, &["zip", "rar", "7z", "tar", "gz", "bz2"]),
            (
                Category::Code,
                &[
                    "py", "js", "ts", "jsx", "tsx", "html", "css", "java", "c", "cpp", "go", "rs",
                    "php", "json", "yaml", "yml", "sql",
                ],
            ),
            (Category::Executable, &["exe", "msi", "bat", "cmd", "ps1"]),
        ];

        for (category, extensions) in TABLE {
            for ext in *extensions {
                self.add_extension_mapping(ext, *category);
            }
        }
    }

    /// Adds a file extension to category mapping.
    pub fn add_extension_mapping(&mut self, ext: &str, category: Category) {
        self.extension_map.insert(ext.to_lowercase(), category);
    }

    /// Maps a file extension to a category, if one is registered.
    ///
    /// # Examples
    ///
    /// ```
    /// use tidysweep::file_category::{Category, CategoryMapper};
    ///
    /// let mapper = CategoryMapper::default();
    /// assert_eq!(mapper.extension_to_category("pdf"), Some(Category::Document));
    /// assert_eq!(mapper.extension_to_category("ZIP"), Some(Category::Archive));
    /// assert_eq!(mapper.extension_to_category("xyz"), None);
    /// ```
    pub fn extension_to_category(&self, ext: &str) -> Option<Category> {
        self.extension_map.get(&ext.to_lowercase()).copied()
    }

    /// Determines the category for a file path.
    ///
    /// Total: files with no extension, or an extension outside the table,
    /// fall to `Category::Other`.
    pub fn classify(&self, path: &Path) -> Category {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| self.extension_to_category(ext))
            .unwrap_or(Category::Other)
    }
}

impl Default for CategoryMapper {
    fn default() -> Self {
        Self::new()
    }
}
