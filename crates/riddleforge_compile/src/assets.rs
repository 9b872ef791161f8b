//! Asset token cache and markup reference rewriting.
//!
//! Asset tokens use a single global scope because the same image is reused
//! across days, locales, and modes. The process-wide cache is append-only
//! and never evicts entries within a process lifetime; concurrent requests
//! only ever insert the same value under the same key, or distinct values
//! under distinct keys.

use std::sync::{OnceLock, PoisonError, RwLock};

use crate::token::{ASSET_SCOPE, TokenForge, TokenKind};

/// Process-wide append-only table from asset path to token.
#[derive(Debug, Default)]
pub struct AssetTokenCache {
    inner: RwLock<CacheInner>,
}

#[derive(Debug, Default)]
struct CacheInner {
    by_path: im::HashMap<String, String>,
    by_token: im::HashMap<String, String>,
}

impl AssetTokenCache {
    /// Creates an empty cache. Most callers want [`AssetTokenCache::global`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the process-wide cache.
    pub fn global() -> &'static Self {
        static CACHE: OnceLock<AssetTokenCache> = OnceLock::new();
        CACHE.get_or_init(AssetTokenCache::new)
    }

    /// Returns the token for a path, inserting one if absent.
    ///
    /// Distinct paths whose digests collide are disambiguated with a salt,
    /// first-come; insertion order therefore only matters in that
    /// vanishingly rare case.
    pub fn resolve(&self, forge: &TokenForge, path: &str) -> String {
        if let Some(token) = self
            .inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .by_path
            .get(path)
        {
            return token.clone();
        }

        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(token) = inner.by_path.get(path) {
            return token.clone();
        }
        let mut salt = 0;
        loop {
            let candidate = forge.digest(TokenKind::Asset, ASSET_SCOPE, path, salt);
            if inner.by_token.contains_key(&candidate) {
                salt += 1;
                continue;
            }
            inner.by_path.insert(path.to_string(), candidate.clone());
            inner.by_token.insert(candidate.clone(), path.to_string());
            return candidate;
        }
    }

    /// Returns the number of cached assets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .by_path
            .len()
    }

    /// Returns true if nothing is cached yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Returns true if a reference points at a local asset this pipeline owns.
fn is_local(path: &str) -> bool {
    if path.is_empty() {
        return false;
    }
    let lower = path.to_ascii_lowercase();
    !(lower.starts_with("http://")
        || lower.starts_with("https://")
        || lower.starts_with("//")
        || lower.starts_with("data:")
        || lower.starts_with("mailto:")
        || lower.starts_with('#'))
}

/// Rewrites every local asset reference embedded in rendered markup.
///
/// Covers `src="…"`, `srcset="…"` (per entry), and CSS `url(…)`. Absolute,
/// protocol-relative, `data:`, `mailto:`, and fragment references are left
/// untouched.
pub fn rewrite_markup_assets(markup: &str, tok: &mut dyn FnMut(&str) -> String) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut rest = markup;

    while !rest.is_empty() {
        if let Some((consumed, rewritten)) = match_reference(rest, boundary_ok(markup, rest), tok) {
            out.push_str(&rewritten);
            rest = &rest[consumed..];
        } else if let Some(ch) = rest.chars().next() {
            out.push(ch);
            rest = &rest[ch.len_utf8()..];
        } else {
            break;
        }
    }
    out
}

/// True when the character before `rest` cannot continue an attribute name,
/// so `src=` here is not the tail of e.g. `data-src=`.
fn boundary_ok(full: &str, rest: &str) -> bool {
    let consumed = full.len() - rest.len();
    full[..consumed]
        .chars()
        .next_back()
        .is_none_or(|c| !(c.is_alphanumeric() || c == '-' || c == '_'))
}

fn match_reference(
    rest: &str,
    at_boundary: bool,
    tok: &mut dyn FnMut(&str) -> String,
) -> Option<(usize, String)> {
    if at_boundary {
        if let Some(result) = match_attribute(rest, "srcset=", tok, rewrite_srcset) {
            return Some(result);
        }
        if let Some(result) = match_attribute(rest, "src=", tok, rewrite_single) {
            return Some(result);
        }
    }
    match_url(rest, tok)
}

fn match_attribute(
    rest: &str,
    attribute: &str,
    tok: &mut dyn FnMut(&str) -> String,
    rewrite: fn(&str, &mut dyn FnMut(&str) -> String) -> String,
) -> Option<(usize, String)> {
    if rest.len() < attribute.len() || !rest[..attribute.len()].eq_ignore_ascii_case(attribute) {
        return None;
    }
    let after = &rest[attribute.len()..];
    let quote = after.chars().next().filter(|c| matches!(c, '"' | '\''))?;
    let value_start = attribute.len() + 1;
    let value_len = rest[value_start..].find(quote)?;
    let value = &rest[value_start..value_start + value_len];

    let rewritten = rewrite(value, tok);
    let consumed = value_start + value_len + 1;
    Some((
        consumed,
        format!("{}{quote}{rewritten}{quote}", &rest[..attribute.len()]),
    ))
}

fn match_url(rest: &str, tok: &mut dyn FnMut(&str) -> String) -> Option<(usize, String)> {
    const OPEN: &str = "url(";
    if rest.len() < OPEN.len() || !rest[..OPEN.len()].eq_ignore_ascii_case(OPEN) {
        return None;
    }
    let inner_len = rest[OPEN.len()..].find(')')?;
    let inner = &rest[OPEN.len()..OPEN.len() + inner_len];

    let trimmed = inner.trim();
    let (quote, path) = match trimmed.chars().next() {
        Some(q @ ('"' | '\'')) if trimmed.len() >= 2 && trimmed.ends_with(q) => {
            (Some(q), &trimmed[1..trimmed.len() - 1])
        }
        _ => (None, trimmed),
    };

    let rewritten = rewrite_single(path, tok);
    let body = match quote {
        Some(q) => format!("{q}{rewritten}{q}"),
        None => rewritten,
    };
    Some((OPEN.len() + inner_len + 1, format!("url({body})")))
}

fn rewrite_single(path: &str, tok: &mut dyn FnMut(&str) -> String) -> String {
    if is_local(path) {
        tok(path)
    } else {
        path.to_string()
    }
}

/// Rewrites each comma-separated srcset entry, keeping width descriptors.
fn rewrite_srcset(value: &str, tok: &mut dyn FnMut(&str) -> String) -> String {
    value
        .split(',')
        .map(|entry| {
            let entry = entry.trim();
            let mut parts = entry.splitn(2, char::is_whitespace);
            let path = parts.next().unwrap_or_default();
            let descriptor = parts.next().map(str::trim);
            let rewritten = rewrite_single(path, tok);
            match descriptor {
                Some(d) if !d.is_empty() => format!("{rewritten} {d}"),
                _ => rewritten,
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}
