//! Movement provider framework.
//!
//! A [`MovementProvider`] turns one popped [`Move`] into zero or more
//! [`Candidate`] successors for a single motion primitive.  Providers are
//! query-only: they read the [`World`] through an [`ExpandContext`] and never
//! mutate anything, so the same snapshot always yields the same candidates.
//!
//! # Registry order
//!
//! [`ProviderRegistry`] holds at most one provider per [`MoveKind`] and
//! always expands them in `MoveKind` order.  With the `parallel` feature the
//! providers run on Rayon's pool, and their outputs are concatenated in that
//! same order, so searches are reproducible either way.

use std::collections::BTreeMap;

use vn_core::World;

use crate::{Candidate, Move, MoveKind};

// ── ExpandContext ─────────────────────────────────────────────────────────────

/// Read-only view handed to providers during one expansion.
#[derive(Copy, Clone)]
pub struct ExpandContext<'a> {
    pub world: &'a dyn World,
}

impl<'a> ExpandContext<'a> {
    pub fn new(world: &'a dyn World) -> Self {
        Self { world }
    }
}

// ── MovementProvider ──────────────────────────────────────────────────────────

/// One motion primitive's successor generator.
///
/// # Contract
///
/// * Append only feasible candidates; infeasible ones are omitted, never
///   emitted with a sentinel cost.
/// * Check resource sufficiency: a candidate must not carry more place
///   intents than `from.remaining_blocks()`.
/// * Drop candidates whose escalated cost exceeds the configured ceiling.
///
/// # Thread safety
///
/// Providers must be `Send + Sync` so the `parallel` feature can expand them
/// on Rayon worker threads.
pub trait MovementProvider: Send + Sync {
    fn kind(&self) -> MoveKind;

    fn generate(&self, ctx: &ExpandContext<'_>, from: &Move, out: &mut Vec<Candidate>);
}

// ── ProviderRegistry ──────────────────────────────────────────────────────────

#[derive(Default)]
pub struct ProviderRegistry {
    providers: BTreeMap<MoveKind, Box<dyn MovementProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `provider` under its kind, replacing any previous one.
    pub fn register(&mut self, provider: Box<dyn MovementProvider>) -> &mut Self {
        self.providers.insert(provider.kind(), provider);
        self
    }

    pub fn with(mut self, provider: impl MovementProvider + 'static) -> Self {
        self.register(Box::new(provider));
        self
    }

    pub fn remove(&mut self, kind: MoveKind) -> Option<Box<dyn MovementProvider>> {
        self.providers.remove(&kind)
    }

    pub fn contains(&self, kind: MoveKind) -> bool {
        self.providers.contains_key(&kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = MoveKind> + '_ {
        self.providers.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Append every provider's candidates for `from` to `out`.
    #[cfg(not(feature = "parallel"))]
    pub fn expand(&self, ctx: &ExpandContext<'_>, from: &Move, out: &mut Vec<Candidate>) {
        for provider in self.providers.values() {
            provider.generate(ctx, from, out);
        }
    }

    /// Append every provider's candidates for `from` to `out`.
    #[cfg(feature = "parallel")]
    pub fn expand(&self, ctx: &ExpandContext<'_>, from: &Move, out: &mut Vec<Candidate>) {
        use rayon::prelude::*;

        let batches: Vec<Vec<Candidate>> = self
            .providers
            .values()
            .collect::<Vec<_>>()
            .into_par_iter()
            .map(|provider| {
                let mut local = Vec::new();
                provider.generate(ctx, from, &mut local);
                local
            })
            .collect();
        for batch in batches {
            out.extend(batch);
        }
    }
}
