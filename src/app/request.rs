use crate::app::errors::RequestError;
use crate::app::models::Layout;
use globset::{GlobBuilder, GlobMatcher};
use std::path::Path;

pub const DEFAULT_WIDTH: usize = 80;

/// Compiled ignore pattern, kept alongside its source text.
#[derive(Debug, Clone)]
pub struct IgnorePattern {
    source: String,
    matcher: GlobMatcher,
}

impl IgnorePattern {
    pub fn new(pattern: &str) -> Result<Self, RequestError> {
        // `*` and `?` must not cross a path separator
        let glob = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .map_err(|source| RequestError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;

        Ok(Self {
            source: pattern.to_string(),
            matcher: glob.compile_matcher(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, name: impl AsRef<Path>) -> bool {
        self.matcher.is_match(name)
    }
}

/// Everything one `ls` invocation needs. Read-only once built.
#[derive(Debug, Clone)]
pub struct ListingRequest {
    paths: Vec<String>,
    show_hidden: bool,
    show_author: bool,
    list_dirs_as_entries: bool,
    recursive: bool,
    layout: Layout,
    long_format: bool,
    reverse_sort: bool,
    ignore: Option<IgnorePattern>,
    width: usize,
}

impl ListingRequest {
    pub fn builder() -> ListingRequestBuilder {
        ListingRequestBuilder::default()
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn show_hidden(&self) -> bool {
        self.show_hidden
    }

    /// Owner is only shown in long format; otherwise this is a no-op.
    pub fn show_author(&self) -> bool {
        self.show_author && self.long_format
    }

    pub fn list_dirs_as_entries(&self) -> bool {
        self.list_dirs_as_entries
    }

    pub fn recursive(&self) -> bool {
        self.recursive
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn long_format(&self) -> bool {
        self.long_format
    }

    pub fn reverse_sort(&self) -> bool {
        self.reverse_sort
    }

    pub fn ignore(&self) -> Option<&IgnorePattern> {
        self.ignore.as_ref()
    }

    pub fn width(&self) -> usize {
        self.width
    }
}

/// Accumulates options, then validates them all at once in `build`.
#[derive(Debug, Clone)]
pub struct ListingRequestBuilder {
    paths: Vec<String>,
    show_hidden: bool,
    show_author: bool,
    list_dirs_as_entries: bool,
    recursive: bool,
    layout: Layout,
    long_format: bool,
    reverse_sort: bool,
    ignore: Option<String>,
    width: usize,
}

impl Default for ListingRequestBuilder {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            show_hidden: false,
            show_author: false,
            list_dirs_as_entries: false,
            recursive: false,
            layout: Layout::default(),
            long_format: false,
            reverse_sort: false,
            ignore: None,
            width: DEFAULT_WIDTH,
        }
    }
}

impl ListingRequestBuilder {
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.paths.push(path.into());
        self
    }

    pub fn paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.paths.extend(paths.into_iter().map(Into::into));
        self
    }

    pub fn show_hidden(mut self, yes: bool) -> Self {
        self.show_hidden = yes;
        self
    }

    pub fn show_author(mut self, yes: bool) -> Self {
        self.show_author = yes;
        self
    }

    pub fn list_dirs_as_entries(mut self, yes: bool) -> Self {
        self.list_dirs_as_entries = yes;
        self
    }

    pub fn recursive(mut self, yes: bool) -> Self {
        self.recursive = yes;
        self
    }

    pub fn layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    pub fn long_format(mut self, yes: bool) -> Self {
        self.long_format = yes;
        self
    }

    pub fn reverse_sort(mut self, yes: bool) -> Self {
        self.reverse_sort = yes;
        self
    }

    pub fn ignore(mut self, pattern: Option<impl Into<String>>) -> Self {
        self.ignore = pattern.map(Into::into);
        self
    }

    pub fn width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    pub fn build(self) -> Result<ListingRequest, RequestError> {
        if self.paths.is_empty() {
            return Err(RequestError::NoPaths);
        }

        let ignore = self
            .ignore
            .as_deref()
            .map(IgnorePattern::new)
            .transpose()?;

        Ok(ListingRequest {
            paths: self.paths,
            show_hidden: self.show_hidden,
            show_author: self.show_author,
            list_dirs_as_entries: self.list_dirs_as_entries,
            recursive: self.recursive,
            layout: self.layout,
            long_format: self.long_format,
            reverse_sort: self.reverse_sort,
            ignore,
            width: self.width.max(1),
        })
    }
}
