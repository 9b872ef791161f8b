//! Deterministic identifier tokens.
//!
//! A token is an opaque fixed-length stand-in for a real identifier or
//! asset path, derived from (kind, context key, real value, salt) via a
//! one-way keyed transform. The transform carries no randomness: identical
//! inputs reproduce identical tokens across passes and processes sharing
//! the same key. Within one pass the builder guarantees injectivity by
//! re-deriving with an incremented salt whenever a digest is already
//! claimed by a different real value.

use std::collections::HashMap;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};

use riddleforge_foundation::DayContext;

use crate::assets::AssetTokenCache;

/// Digest bytes kept per token; 15 bytes encode to exactly [`TOKEN_LEN`]
/// base64 characters.
const TOKEN_BYTES: usize = 15;

/// Length of every token string.
pub const TOKEN_LEN: usize = 20;

/// Scope key for asset tokens. Assets share one global scope because the
/// same image may be reused across days, locales, and modes.
pub(crate) const ASSET_SCOPE: &str = "asset";

/// What kind of identifier a token stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// A structural block id (story, puzzle, reward).
    Block,
    /// A choice option id.
    Option,
    /// A drag item or inventory item id.
    Item,
    /// A drag socket id.
    Socket,
    /// A drop list id.
    List,
    /// A memory card id.
    Card,
    /// An opaque answer value (text solutions, grid cells).
    Answer,
    /// A local asset path.
    Asset,
}

impl TokenKind {
    /// Returns the tag mixed into the digest input.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Block => "block",
            Self::Option => "option",
            Self::Item => "item",
            Self::Socket => "socket",
            Self::List => "list",
            Self::Card => "card",
            Self::Answer => "answer",
            Self::Asset => "asset",
        }
    }
}

/// The keyed transform behind every token.
#[derive(Clone)]
pub struct TokenForge {
    key: [u8; 32],
}

impl TokenForge {
    /// Creates a forge from a raw 32-byte key.
    #[must_use]
    pub const fn new(key: [u8; 32]) -> Self {
        Self { key }
    }

    /// Derives the key from an arbitrary secret string.
    #[must_use]
    pub fn from_secret(secret: &str) -> Self {
        Self {
            key: blake3::derive_key("riddleforge token key v1", secret.as_bytes()),
        }
    }

    /// Computes the token digest for (kind, scope, value, salt).
    pub(crate) fn digest(&self, kind: TokenKind, scope: &str, value: &str, salt: u32) -> String {
        let mut hasher = blake3::Hasher::new_keyed(&self.key);
        hasher.update(kind.tag().as_bytes());
        hasher.update(&[0x1f]);
        hasher.update(scope.as_bytes());
        hasher.update(&[0x1f]);
        hasher.update(value.as_bytes());
        if salt > 0 {
            hasher.update(&[0x1f]);
            hasher.update(&salt.to_le_bytes());
        }
        let hash = hasher.finalize();
        URL_SAFE_NO_PAD.encode(&hash.as_bytes()[..TOKEN_BYTES])
    }
}

impl std::fmt::Debug for TokenForge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The key never appears in logs.
        f.debug_struct("TokenForge").finish_non_exhaustive()
    }
}

/// The real identifier behind a token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealValue {
    /// Identifier kind.
    pub kind: TokenKind,
    /// The raw value as it appears in the source document.
    pub value: String,
}

/// Owns the in-progress token table for one compilation pass.
///
/// No caller observes a partially built table; [`TokenTableBuilder::finish`]
/// returns an immutable snapshot.
pub struct TokenTableBuilder<'a> {
    forge: &'a TokenForge,
    scope: String,
    assets: &'a AssetTokenCache,
    forward: HashMap<(TokenKind, String), String>,
    claimed: HashMap<String, (TokenKind, String)>,
}

impl<'a> TokenTableBuilder<'a> {
    /// Creates a builder scoped to one day variant.
    #[must_use]
    pub fn new(forge: &'a TokenForge, ctx: &DayContext, assets: &'a AssetTokenCache) -> Self {
        Self {
            forge,
            scope: ctx.scope_key(),
            assets,
            forward: HashMap::new(),
            claimed: HashMap::new(),
        }
    }

    /// Returns the token for an identifier, assigning one on first use.
    pub fn token(&mut self, kind: TokenKind, value: &str) -> String {
        if let Some(existing) = self.forward.get(&(kind, value.to_string())) {
            return existing.clone();
        }
        let mut salt = 0;
        loop {
            let candidate = self.forge.digest(kind, &self.scope, value, salt);
            if self.claimed.contains_key(&candidate) {
                salt += 1;
                continue;
            }
            self.claim(kind, value, candidate.clone());
            return candidate;
        }
    }

    /// Returns the token for a local asset path, consulting the process-wide
    /// asset cache so the same path yields the same token across passes.
    pub fn asset(&mut self, path: &str) -> String {
        if let Some(existing) = self.forward.get(&(TokenKind::Asset, path.to_string())) {
            return existing.clone();
        }
        let mut candidate = self.assets.resolve(self.forge, path);
        // A cached asset token clashing with an identifier claimed earlier
        // in this pass is re-salted locally; pass injectivity wins.
        let mut salt = 1;
        while self.claimed.contains_key(&candidate) {
            candidate = self.forge.digest(TokenKind::Asset, ASSET_SCOPE, path, salt);
            salt += 1;
        }
        self.claim(TokenKind::Asset, path, candidate.clone());
        candidate
    }

    fn claim(&mut self, kind: TokenKind, value: &str, token: String) {
        self.forward
            .insert((kind, value.to_string()), token.clone());
        self.claimed.insert(token, (kind, value.to_string()));
    }

    /// Returns the number of assigned tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.claimed.len()
    }

    /// Returns true if no token was assigned yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.claimed.is_empty()
    }

    /// Consumes the builder and returns the immutable snapshot.
    #[must_use]
    pub fn finish(self) -> TokenTable {
        let by_token: im::HashMap<String, RealValue> = self
            .claimed
            .into_iter()
            .map(|(token, (kind, value))| (token, RealValue { kind, value }))
            .collect();
        let by_value: im::HashMap<(TokenKind, String), String> = self.forward.into_iter().collect();
        TokenTable { by_token, by_value }
    }
}

/// Immutable token mapping for one compilation pass.
///
/// Ephemeral by design: a later verification request re-runs the pipeline
/// to reproduce equivalent tokens rather than relying on an old table.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct TokenTable {
    by_token: im::HashMap<String, RealValue>,
    by_value: im::HashMap<(TokenKind, String), String>,
}

impl TokenTable {
    /// Looks up the real value behind a token.
    #[must_use]
    pub fn real_value(&self, token: &str) -> Option<&RealValue> {
        self.by_token.get(token)
    }

    /// Looks up the token assigned to a real value in this pass.
    #[must_use]
    pub fn token_for(&self, kind: TokenKind, value: &str) -> Option<&str> {
        self.by_value
            .get(&(kind, value.to_string()))
            .map(String::as_str)
    }

    /// Returns the number of assigned tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_token.len()
    }

    /// Returns true if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_token.is_empty()
    }

    /// Iterates over (token, real value) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &RealValue)> {
        self.by_token.iter()
    }
}
