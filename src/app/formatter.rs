use crate::app::models::{DirectoryEntry, EntryMetadata, Layout};
use crate::app::request::ListingRequest;
use chrono::{DateTime, Local};
use std::time::{Duration, SystemTime};

const GUTTER: usize = 2;
const PLACEHOLDER: &str = "?";
const PERMISSIONS_PLACEHOLDER: &str = "??????????";
// Half of an average Gregorian year
const RECENT: Duration = Duration::from_secs(31_556_952 / 2);

pub struct OutputGenerator {
    layout: Layout,
    long_format: bool,
    show_author: bool,
    width: usize,
    now: SystemTime,
}

impl OutputGenerator {
    pub fn new(request: &ListingRequest) -> Self {
        Self {
            layout: request.layout(),
            long_format: request.long_format(),
            show_author: request.show_author(),
            width: request.width(),
            now: SystemTime::now(),
        }
    }

    /// Renders one group of entries. Every line ends with `\n`; an empty
    /// group renders as an empty string.
    pub fn render(&self, entries: &[DirectoryEntry]) -> String {
        if self.long_format {
            return self.long_lines(entries);
        }

        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        match self.layout {
            Layout::Lines => names.iter().map(|n| format!("{}\n", n)).collect(),
            Layout::Columns => grid(&names, self.width),
        }
    }

    fn long_lines(&self, entries: &[DirectoryEntry]) -> String {
        let empty = EntryMetadata::default();
        let rows: Vec<[String; 4]> = entries
            .iter()
            .map(|entry| {
                let meta = entry.metadata.as_ref().unwrap_or(&empty);
                [
                    meta.permissions
                        .clone()
                        .unwrap_or_else(|| PERMISSIONS_PLACEHOLDER.to_string()),
                    meta.owner.clone().unwrap_or_else(|| PLACEHOLDER.to_string()),
                    meta.size
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| PLACEHOLDER.to_string()),
                    meta.modified
                        .map(|t| self.format_time(t))
                        .unwrap_or_else(|| PLACEHOLDER.to_string()),
                ]
            })
            .collect();

        let width_of = |col: usize| {
            rows.iter()
                .map(|r| r[col].chars().count())
                .max()
                .unwrap_or(0)
        };
        let (owner_w, size_w, time_w) = (width_of(1), width_of(2), width_of(3));

        let mut output = String::new();
        for (row, entry) in rows.iter().zip(entries) {
            let [perms, owner, size, time] = row;
            output.push_str(perms);
            output.push(' ');
            if self.show_author {
                output.push_str(&format!("{:<owner_w$} ", owner));
            }
            output.push_str(&format!(
                "{:>size_w$} {:<time_w$} {}\n",
                size, time, entry.name
            ));
        }
        output
    }

    fn format_time(&self, time: SystemTime) -> String {
        let local: DateTime<Local> = time.into();
        let recent = self
            .now
            .duration_since(time)
            .is_ok_and(|age| age < RECENT);

        if recent {
            local.format("%b %e %H:%M").to_string()
        } else {
            local.format("%b %e  %Y").to_string()
        }
    }
}

/// Column-major grid: the largest column count whose total width fits.
fn grid(names: &[&str], width: usize) -> String {
    if names.is_empty() {
        return String::new();
    }

    let lens: Vec<usize> = names.iter().map(|n| n.chars().count()).collect();
    let n = names.len();

    // Every name is at least one char wide, so no more columns than this fit
    let max_cols = n.min((width + GUTTER) / (1 + GUTTER));

    let (rows, col_widths) = (2..=max_cols)
        .rev()
        .find_map(|cols| {
            let rows = n.div_ceil(cols);
            let cols = n.div_ceil(rows);
            let col_widths: Vec<usize> = (0..cols)
                .map(|c| {
                    lens[c * rows..((c + 1) * rows).min(n)]
                        .iter()
                        .copied()
                        .max()
                        .unwrap_or(0)
                })
                .collect();
            let total = col_widths.iter().sum::<usize>() + GUTTER * (cols - 1);
            (total <= width).then_some((rows, col_widths))
        })
        .unwrap_or_else(|| (n, vec![0]));

    let mut output = String::new();
    for r in 0..rows {
        let mut line = String::new();
        for (c, col_width) in col_widths.iter().enumerate() {
            let idx = c * rows + r;
            let Some(name) = names.get(idx) else { break };
            line.push_str(name);
            if idx + rows < n {
                let pad = col_width - lens[idx] + GUTTER;
                line.push_str(&" ".repeat(pad));
            }
        }
        output.push_str(line.trim_end());
        output.push('\n');
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::request::ListingRequestBuilder;
    use std::path::PathBuf;

    fn entry(name: &str) -> DirectoryEntry {
        DirectoryEntry {
            name: name.to_string(),
            path: PathBuf::from(name),
            is_dir: false,
            metadata: None,
        }
    }

    fn long_entry(name: &str, size: u64, owner: Option<&str>) -> DirectoryEntry {
        DirectoryEntry {
            metadata: Some(EntryMetadata {
                permissions: Some("-rw-r--r--".to_string()),
                size: Some(size),
                modified: Some(SystemTime::now()),
                owner: owner.map(str::to_string),
            }),
            ..entry(name)
        }
    }

    fn generator(
        build: impl FnOnce(ListingRequestBuilder) -> ListingRequestBuilder,
    ) -> OutputGenerator {
        let req = build(ListingRequest::builder().path(".")).build().unwrap();
        OutputGenerator::new(&req)
    }

    #[test]
    fn test_grid_is_column_major() {
        let names = ["a", "b", "c", "d", "e"];
        // Width 7 fits "a  c  e" (three columns of two rows)
        assert_eq!(grid(&names, 7), "a  c  e\nb  d\n");
    }

    #[test]
    fn test_grid_single_row_when_everything_fits() {
        assert_eq!(grid(&["one", "two", "three"], 80), "one  two  three\n");
    }

    #[test]
    fn test_grid_falls_back_to_one_column() {
        let names = ["a-very-long-name", "another-long-name"];
        assert_eq!(grid(&names, 10), "a-very-long-name\nanother-long-name\n");
    }

    #[test]
    fn test_grid_pads_to_widest_in_column() {
        let out = grid(&["aaaa", "b", "cc", "d"], 8);
        assert_eq!(out, "aaaa  cc\nb     d\n");
        assert!(out.lines().all(|l| l.chars().count() <= 8));
    }

    #[test]
    fn test_grid_many_entries() {
        let owned: Vec<String> = (0..5000).map(|i| format!("file_{i:05}.txt")).collect();
        let names: Vec<&str> = owned.iter().map(String::as_str).collect();

        let out = grid(&names, 80);
        // 14-char names: five columns of 1000 rows
        assert_eq!(out.lines().count(), 1000);
        assert!(out.lines().all(|l| l.chars().count() <= 80));
        assert_eq!(out.split_whitespace().count(), 5000);
        assert!(out.starts_with("file_00000.txt  file_01000.txt"));
    }

    #[test]
    fn test_grid_empty() {
        assert_eq!(grid(&[], 80), "");
    }

    #[test]
    fn test_lines_layout() {
        let out = generator(|b| b.layout(Layout::Lines)).render(&[entry("x"), entry("y")]);
        assert_eq!(out, "x\ny\n");
    }

    #[test]
    fn test_long_format_without_owner() {
        let out = generator(|b| b.long_format(true)).render(&[long_entry("b.txt", 42, None)]);
        let fields: Vec<&str> = out.trim_end().split_whitespace().collect();
        assert_eq!(fields[0], "-rw-r--r--");
        assert_eq!(fields[1], "42");
        assert_eq!(*fields.last().unwrap(), "b.txt");
        assert_eq!(out.lines().count(), 1);
    }

    #[test]
    fn test_long_format_with_owner_aligns_columns() {
        let out = generator(|b| b.long_format(true).show_author(true)).render(&[
            long_entry("a", 5, Some("root")),
            long_entry("b", 12345, Some("me")),
        ]);
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with("-rw-r--r-- root     5 "));
        assert!(lines[1].starts_with("-rw-r--r-- me   12345 "));
        assert_eq!(lines[0].len(), lines[1].len());
    }

    #[test]
    fn test_long_format_placeholders() {
        let mut e = entry("broken");
        e.metadata = Some(EntryMetadata::default());
        let out = generator(|b| b.long_format(true)).render(&[e]);
        assert_eq!(out, "?????????? ? ? broken\n");
    }

    #[test]
    fn test_old_times_show_year() {
        let gen = generator(|b| b.long_format(true));
        let old = SystemTime::UNIX_EPOCH + Duration::from_secs(86_400 * 400);
        let formatted = gen.format_time(old);
        assert!(formatted.ends_with("1971"), "{formatted}");
    }
}
