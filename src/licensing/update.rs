use crate::licensing::types::{UpdateInfo, VersionInfo};
use std::cmp::Ordering;

#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
    Num(u64),
    Tag(&'a str),
}

fn segments(version: &str) -> Vec<Segment<'_>> {
    version
        .trim()
        .trim_start_matches(['v', 'V'])
        .split(['.', '-', '_', '+'])
        .filter(|s| !s.is_empty())
        .map(|s| match s.parse::<u64>() {
            Ok(n) => Segment::Num(n),
            Err(_) => Segment::Tag(s),
        })
        .collect()
}

/// Compare two dotted version strings.
///
/// Numeric segments compare numerically and outrank tags, so `1.0-beta < 1.0 < 1.0.1`.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let (a, b) = (segments(a), segments(b));
    let len = a.len().max(b.len());

    for i in 0..len {
        let ord = match (a.get(i), b.get(i)) {
            (Some(Segment::Num(x)), Some(Segment::Num(y))) => x.cmp(y),
            (Some(Segment::Tag(x)), Some(Segment::Tag(y))) => {
                x.to_ascii_lowercase().cmp(&y.to_ascii_lowercase())
            }
            (Some(Segment::Num(_)), Some(Segment::Tag(_))) => Ordering::Greater,
            (Some(Segment::Tag(_)), Some(Segment::Num(_))) => Ordering::Less,
            (None, Some(Segment::Num(_))) => Ordering::Less,
            (None, Some(Segment::Tag(_))) => Ordering::Greater,
            (Some(Segment::Num(_)), None) => Ordering::Greater,
            (Some(Segment::Tag(_)), None) => Ordering::Less,
            (None, None) => Ordering::Equal,
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }

    Ordering::Equal
}

impl UpdateInfo {
    pub fn new(current_version: &str, latest: VersionInfo) -> Self {
        let update_available = compare_versions(&latest.version, current_version) == Ordering::Greater;

        UpdateInfo {
            current_version: current_version.to_string(),
            latest_version: latest.version,
            update_available,
            download_url: latest.package,
        }
    }
}
