//! The compile pipeline.
//!
//! One synchronous pass per day variant: load, header check, segmentation,
//! normalization, visibility, tokenization. Each stage produces a new
//! immutable value; any failure aborts the variant with a typed error
//! carrying the day context. No partial document is ever returned.

use std::collections::HashSet;

use tracing::debug;

use riddleforge_condition::WhenCondition;
use riddleforge_document::{DocHeader, DocumentSource, MarkupRenderer, segment_blocks};
use riddleforge_foundation::{DayContext, DocContext, Error, InventoryMap, Result};

use crate::assets::AssetTokenCache;
use crate::output::{DayBlock, DayContent};
use crate::segment::resolve_document;
use crate::token::{TokenForge, TokenTable, TokenTableBuilder};
use crate::tokenize::tokenize_day;
use crate::visibility::{VisibilityEnv, resolve_visibility};

/// The inputs to one compilation.
pub struct CompileRequest<'a> {
    /// The day variant to compile.
    pub ctx: DayContext,
    /// Puzzle ids the player has solved.
    pub solved: &'a HashSet<String>,
    /// Emit invisible blocks too, flagged with their natural visibility.
    /// Used by internal preview tooling; the default output carries only
    /// visible blocks.
    pub include_hidden: bool,
    /// Localized inventory records for the target locale.
    pub inventory: &'a InventoryMap,
}

/// One compiled day variant plus the pass's ephemeral token table.
#[derive(Clone, Debug)]
pub struct CompiledDay {
    /// The tokenized content handed to the serving layer.
    pub content: DayContent,
    /// Token-to-real-value mapping, valid for this pass only. A later
    /// verification request re-runs the pipeline instead of keeping this.
    pub tokens: TokenTable,
}

/// Compiles day variants from a document source.
pub struct Compiler<S, R> {
    source: S,
    renderer: R,
    forge: TokenForge,
    assets: &'static AssetTokenCache,
}

impl<S: DocumentSource, R: MarkupRenderer> Compiler<S, R> {
    /// Creates a compiler using the process-wide asset token cache.
    #[must_use]
    pub fn new(source: S, renderer: R, forge: TokenForge) -> Self {
        Self::with_assets(source, renderer, forge, AssetTokenCache::global())
    }

    /// Creates a compiler with an explicit asset cache.
    #[must_use]
    pub fn with_assets(
        source: S,
        renderer: R,
        forge: TokenForge,
        assets: &'static AssetTokenCache,
    ) -> Self {
        Self {
            source,
            renderer,
            forge,
            assets,
        }
    }

    /// Compiles one day variant.
    ///
    /// # Errors
    /// Returns a not-found error when no document exists for the variant,
    /// and an unsupported-version, structural, or parse error when the
    /// document is invalid. Compilation is all-or-nothing.
    pub fn compile(&self, req: &CompileRequest<'_>) -> Result<CompiledDay> {
        let ctx = &req.ctx;
        let attach = |e: Error| {
            if e.context.is_some() {
                e
            } else {
                e.with_context(DocContext::new(ctx.clone()))
            }
        };

        let raw = self.source.load(ctx)?;
        let header = DocHeader::parse(&raw.header).map_err(attach)?;
        let blocks = segment_blocks(&raw.body, &self.renderer).map_err(attach)?;
        let document = resolve_document(blocks).map_err(attach)?;
        let solved_condition = header
            .solved_when
            .as_ref()
            .map(WhenCondition::parse)
            .transpose()
            .map_err(attach)?;
        debug!(
            %ctx,
            segments = document.segments.len(),
            puzzles = document.puzzle_ids.len(),
            "resolved document"
        );

        let flagged = resolve_visibility(
            &document.segments,
            &VisibilityEnv {
                solved: req.solved,
                declared: &document.puzzle_ids,
                inventory: req.inventory,
            },
        );

        // Tokenize before filtering so token assignment never depends on
        // the solved set.
        let mut builder = TokenTableBuilder::new(&self.forge, ctx, self.assets);
        let (blocks, puzzle_ids, solved_condition) = tokenize_day(
            &mut builder,
            flagged,
            &document.puzzle_ids,
            solved_condition.as_ref(),
        );
        let blocks: Vec<DayBlock> = if req.include_hidden {
            blocks
        } else {
            blocks.into_iter().filter(DayBlock::visible).collect()
        };
        debug!(%ctx, blocks = blocks.len(), tokens = builder.len(), "compiled day");

        Ok(CompiledDay {
            content: DayContent {
                title: header.title,
                tags: header.tags,
                blocks,
                puzzle_ids,
                solved_condition,
            },
            tokens: builder.finish(),
        })
    }
}
