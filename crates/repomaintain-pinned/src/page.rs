//! Regex-based parsing of the pinned dependency page's storage-format HTML.
//!
//! The page holds one table: a header row followed by one row per pinned
//! dependency with the columns name, version, author, reason, repositories.

use regex::Regex;
use semver::Version;

use crate::error::PinnedError;
use crate::types::PinnedDependency;

pub(crate) const PAGE_TITLE: &str = "Pinned Dependency Versions";
const PROCESSOR_VERSION: &str = "1";
const REPOSITORIES_COLUMN: usize = 4;

fn row_regex() -> Regex {
    #[allow(clippy::unwrap_used)] // pattern is a literal
    Regex::new(r"(?s)<tr[^>]*>.*?</tr>").unwrap()
}

fn cell_regex() -> Regex {
    #[allow(clippy::unwrap_used)] // pattern is a literal
    Regex::new(r"(?s)<td[^>]*>(.*?)</td>").unwrap()
}

fn strip_tags(html: &str) -> String {
    #[allow(clippy::unwrap_used)] // pattern is a literal
    let tag = Regex::new(r"<[^>]+>").unwrap();
    tag.replace_all(html, "").trim().to_string()
}

/// The page embeds a processor version so outdated tool versions cannot
/// corrupt it. A missing or different marker is fatal.
pub(crate) fn check_processor_version(html: &str) -> Result<(), PinnedError> {
    #[allow(clippy::unwrap_used)] // pattern is a literal
    let marker = Regex::new(r"Processor Version:\s*(\d+)").unwrap();

    match marker.captures(&strip_tags(html)) {
        Some(captures) if &captures[1] == PROCESSOR_VERSION => Ok(()),
        _ => Err(PinnedError::ProcessorVersionMismatch),
    }
}

fn split_repositories(cell: &str) -> Vec<String> {
    cell.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// Extract every pinned dependency from the page's table.
pub(crate) fn parse_pinned_table(html: &str) -> Result<Vec<PinnedDependency>, PinnedError> {
    let format_error = || PinnedError::PageFormat {
        title: PAGE_TITLE.to_string(),
    };
    let cells_of = cell_regex();

    let mut pinned = Vec::new();
    // First row is the header.
    for row in row_regex().find_iter(html).skip(1) {
        let cells: Vec<String> = cells_of
            .captures_iter(row.as_str())
            .map(|c| strip_tags(&c[1]))
            .collect();

        if cells.len() <= REPOSITORIES_COLUMN {
            return Err(format_error());
        }

        let version = Version::parse(&cells[1]).map_err(|_| format_error())?;

        pinned.push(PinnedDependency {
            name: cells[0].clone(),
            version,
            reason: cells[3].clone(),
            repositories: split_repositories(&cells[REPOSITORIES_COLUMN]),
        });
    }

    if pinned.is_empty() && row_regex().find_iter(html).count() == 0 {
        return Err(format_error());
    }

    Ok(pinned)
}

/// Rewrite the repositories column so that `repo_name` is listed exactly for
/// the dependencies named in `in_use`. Returns the updated HTML and whether
/// any membership changed.
pub(crate) fn update_repositories(
    html: &str,
    in_use: &[String],
    repo_name: &str,
) -> Result<(String, bool), PinnedError> {
    let cells_of = cell_regex();
    let mut changed = false;
    let mut result = String::new();
    let mut last_end = 0;

    for (index, row) in row_regex().find_iter(html).enumerate() {
        result.push_str(&html[last_end..row.start()]);
        last_end = row.end();

        if index == 0 {
            result.push_str(row.as_str());
            continue;
        }

        let cells: Vec<(std::ops::Range<usize>, String)> = cells_of
            .captures_iter(row.as_str())
            .map(|c| {
                #[allow(clippy::unwrap_used)] // group 1 always participates
                let group = c.get(1).unwrap();
                (group.range(), strip_tags(group.as_str()))
            })
            .collect();

        if cells.len() <= REPOSITORIES_COLUMN {
            return Err(PinnedError::PageFormat {
                title: PAGE_TITLE.to_string(),
            });
        }

        let name = &cells[0].1;
        let mut repositories = split_repositories(&cells[REPOSITORIES_COLUMN].1);
        let used = in_use.iter().any(|n| n == name);
        let listed = repositories.iter().any(|r| r == repo_name);

        if used && !listed {
            repositories.push(repo_name.to_string());
            changed = true;
        } else if !used && listed {
            repositories.retain(|r| r != repo_name);
            changed = true;
        }

        let cell_range = &cells[REPOSITORIES_COLUMN].0;
        let mut updated_row = String::with_capacity(row.as_str().len());
        updated_row.push_str(&row.as_str()[..cell_range.start]);
        updated_row.push_str(&repositories.join(", "));
        updated_row.push_str(&row.as_str()[cell_range.end..]);
        result.push_str(&updated_row);
    }

    result.push_str(&html[last_end..]);
    Ok((result, changed))
}
