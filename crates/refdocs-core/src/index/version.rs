use std::cmp::Ordering;

use serde::Deserialize;

/// Compares two version strings. `Greater` means `a` is newer than `b`.
pub trait VersionOrdering {
    fn compare(&self, a: &str, b: &str) -> Ordering;
}

/// Which ordering a build uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionOrder {
    #[default]
    Kubernetes,
    Lexical,
}

impl VersionOrder {
    pub fn ordering(&self) -> &'static dyn VersionOrdering {
        match self {
            VersionOrder::Kubernetes => &KubeVersionOrder,
            VersionOrder::Lexical => &LexicalOrder,
        }
    }
}

/// Kubernetes API version precedence: `v2 > v1 > v1beta2 > v1beta1 > v1alpha1`.
#[derive(Debug, Clone, Copy, Default)]
pub struct KubeVersionOrder;

/// Plain string comparison.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalOrder;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Stability {
    Alpha,
    Beta,
    Ga,
}

/// `(stability, major, minor)`; derives the precedence when compared as a tuple.
fn parse_kube_version(v: &str) -> Option<(Stability, u64, u64)> {
    let rest = v.strip_prefix('v')?;
    let digits = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    if digits == 0 {
        return None;
    }
    let major: u64 = rest[..digits].parse().ok()?;
    let tail = &rest[digits..];
    if tail.is_empty() {
        return Some((Stability::Ga, major, 0));
    }
    let (stability, minor) = if let Some(m) = tail.strip_prefix("beta") {
        (Stability::Beta, m)
    } else if let Some(m) = tail.strip_prefix("alpha") {
        (Stability::Alpha, m)
    } else {
        return None;
    };
    if minor.is_empty() || !minor.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some((stability, major, minor.parse().ok()?))
}

impl VersionOrdering for KubeVersionOrder {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        match (parse_kube_version(a), parse_kube_version(b)) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => a.cmp(b),
        }
    }
}

impl VersionOrdering for LexicalOrder {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        a.cmp(b)
    }
}
