//! Property tests for the token builder.
//!
//! Determinism and injectivity are the two properties grading depends on,
//! so they get generated coverage rather than hand-picked cases.

use std::collections::HashSet;

use proptest::prelude::*;

use riddleforge_compile::{AssetTokenCache, TOKEN_LEN, TokenForge, TokenKind, TokenTableBuilder};
use riddleforge_foundation::DayContext;

proptest! {
    #[test]
    fn tokens_are_injective_and_deterministic(
        ids in proptest::collection::hash_set("[a-z0-9-]{1,12}", 1..64)
    ) {
        let forge = TokenForge::from_secret("property-secret");
        let ctx = DayContext::new(7, "en", "default");
        let cache_a = AssetTokenCache::new();
        let cache_b = AssetTokenCache::new();
        let mut pass_a = TokenTableBuilder::new(&forge, &ctx, &cache_a);
        let mut pass_b = TokenTableBuilder::new(&forge, &ctx, &cache_b);

        let mut seen = HashSet::new();
        for id in &ids {
            let token = pass_a.token(TokenKind::Block, id);
            prop_assert_eq!(token.len(), TOKEN_LEN);
            // Injective within the pass.
            prop_assert!(seen.insert(token.clone()), "token reused for '{}'", id);
            // Reproducible in an independent pass over the same input.
            prop_assert_eq!(token, pass_b.token(TokenKind::Block, id));
        }
    }

    #[test]
    fn kinds_partition_the_token_space(
        id in "[a-z0-9-]{1,12}"
    ) {
        let forge = TokenForge::from_secret("property-secret");
        let ctx = DayContext::new(7, "en", "default");
        let cache = AssetTokenCache::new();
        let mut builder = TokenTableBuilder::new(&forge, &ctx, &cache);

        let kinds = [
            TokenKind::Block,
            TokenKind::Option,
            TokenKind::Item,
            TokenKind::Socket,
            TokenKind::List,
            TokenKind::Card,
            TokenKind::Answer,
        ];
        let mut seen = HashSet::new();
        for kind in kinds {
            prop_assert!(seen.insert(builder.token(kind, &id)));
        }
        prop_assert!(seen.insert(builder.asset(&id)));
    }

    #[test]
    fn contexts_partition_the_token_space(
        id in "[a-z0-9-]{1,12}",
        day_a in 1u32..25,
        day_b in 1u32..25,
    ) {
        prop_assume!(day_a != day_b);
        let forge = TokenForge::from_secret("property-secret");
        let cache = AssetTokenCache::new();
        let mut a = TokenTableBuilder::new(&forge, &DayContext::new(day_a, "en", "default"), &cache);
        let mut b = TokenTableBuilder::new(&forge, &DayContext::new(day_b, "en", "default"), &cache);
        prop_assert_ne!(
            a.token(TokenKind::Block, &id),
            b.token(TokenKind::Block, &id)
        );
    }
}
