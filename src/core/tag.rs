//! Release tag validation and ordering
//!
//! A release tag is exactly `v<major>.<minor>.<patch>` with ASCII-digit
//! components and nothing else: no pre-release, no build metadata, no
//! surrounding text. Ordering is numeric on the triple (`v1.10.0` > `v1.2.0`).

use semver::Version;
use std::cmp::Ordering;
use std::fmt;

/// A validated `vX.Y.Z` tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseTag {
  /// Numeric triple used for ordering
  pub version: Version,
  /// Tag exactly as it appears in git (leading zeros preserved)
  pub name: String,
}

impl ReleaseTag {
  /// Parse a tag name, returning `None` unless it is exactly `v<uint>.<uint>.<uint>`
  pub fn parse(tag_name: &str) -> Option<Self> {
    let rest = tag_name.strip_prefix('v')?;

    let mut parts = rest.split('.');
    let major = parse_component(parts.next()?)?;
    let minor = parse_component(parts.next()?)?;
    let patch = parse_component(parts.next()?)?;
    if parts.next().is_some() {
      return None;
    }

    Some(Self {
      version: Version::new(major, minor, patch),
      name: tag_name.to_string(),
    })
  }
}

/// Components are non-empty ASCII digit runs that fit in a u64
fn parse_component(s: &str) -> Option<u64> {
  if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
    return None;
  }
  s.parse().ok()
}

impl Ord for ReleaseTag {
  fn cmp(&self, other: &Self) -> Ordering {
    // `v1.02.0` and `v1.2.0` share a triple; fall back to the name so Ord stays total
    self
      .version
      .cmp(&other.version)
      .then_with(|| self.name.cmp(&other.name))
  }
}

impl PartialOrd for ReleaseTag {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl fmt::Display for ReleaseTag {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.name)
  }
}

/// True iff `tag` is exactly `v<major>.<minor>.<patch>`
pub fn is_semver(tag: &str) -> bool {
  ReleaseTag::parse(tag).is_some()
}

/// Keep well-formed tags and sort them ascending; the last one is the newest
pub fn sort_tags<I, S>(tags: I) -> Vec<ReleaseTag>
where
  I: IntoIterator<Item = S>,
  S: AsRef<str>,
{
  let mut parsed: Vec<ReleaseTag> = tags
    .into_iter()
    .filter_map(|t| ReleaseTag::parse(t.as_ref().trim()))
    .collect();
  parsed.sort();
  parsed.dedup_by(|a, b| a.name == b.name);
  parsed
}

/// Newest well-formed tag, if any
pub fn newest_tag<I, S>(tags: I) -> Option<ReleaseTag>
where
  I: IntoIterator<Item = S>,
  S: AsRef<str>,
{
  sort_tags(tags).pop()
}

/// True iff `tag` is among the tags pointing at the current commit
pub fn is_on_head<S: AsRef<str>>(tag: &ReleaseTag, tags_at_head: &[S]) -> bool {
  tags_at_head.iter().any(|t| t.as_ref().trim() == tag.name)
}
