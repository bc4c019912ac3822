//! Parallel rewriting of a [`Grammar`] into a flat symbol string.
//!
//! Each pass scans the current string left to right and replaces every symbol that has a
//! rule by one of its alternatives, with a fresh weighted draw per occurrence. Symbols
//! without a rule are copied through. There is no context sensitivity.
//!
//! Randomness is injected: [`Expander::new`] seeds from OS entropy and is therefore not
//! reproducible, while [`Expander::seeded`] and [`Expander::with_rng`] give repeatable runs.

use crate::grammar::{Grammar, Symbol};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use tracing::debug;

/// The immutable result of an expansion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpansionResult {
    symbols: Vec<Symbol>,
    iterations: u32,
}

impl ExpansionResult {
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Number of rewrite passes that produced this string.
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Occurrences of `symbol` in the result.
    pub fn count(&self, symbol: Symbol) -> usize {
        self.symbols.iter().filter(|&&s| s == symbol).count()
    }

}

impl fmt::Display for ExpansionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.symbols.iter().try_for_each(|s| write!(f, "{s}"))
    }
}

impl AsRef<[Symbol]> for ExpansionResult {
    fn as_ref(&self) -> &[Symbol] {
        &self.symbols
    }
}

/// Returned by [`Expander::expand_with`] when the caller asked to stop between passes.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("expansion cancelled after {} of {requested} passes", .partial.iterations())]
pub struct Cancelled {
    pub requested: u32,
    /// The string as it stood after the last completed pass.
    pub partial: ExpansionResult,
}

/// Rewrites grammars using a pluggable random source.
#[derive(Clone, Debug)]
pub struct Expander<R = SmallRng> {
    rng: R,
}

impl Expander<SmallRng> {
    /// Seeds from OS entropy; two calls will generally differ for stochastic grammars.
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_entropy())
    }

    /// Reproducible expander for a fixed `seed`.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(SmallRng::seed_from_u64(seed))
    }
}

impl Default for Expander<SmallRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Expander<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Runs `iterations` rewrite passes over the grammar's axiom.
    ///
    /// Zero iterations returns the axiom unchanged. Growth is exponential in the worst
    /// case; bounding `iterations` is the caller's job.
    pub fn expand(&mut self, grammar: &Grammar, iterations: u32) -> ExpansionResult {
        let mut current = grammar.axiom().to_vec();
        for pass in 0..iterations {
            current = self.rewrite(grammar, &current);
            debug!(pass = pass + 1, len = current.len(), "l-system pass");
        }
        ExpansionResult {
            symbols: current,
            iterations,
        }
    }

    /// Like [`expand`](Self::expand) but polls `should_cancel` before every pass.
    ///
    /// The predicate receives the number of completed passes and the current length.
    pub fn expand_with<F>(
        &mut self,
        grammar: &Grammar,
        iterations: u32,
        mut should_cancel: F,
    ) -> Result<ExpansionResult, Cancelled>
    where
        F: FnMut(u32, usize) -> bool,
    {
        let mut current = grammar.axiom().to_vec();
        for pass in 0..iterations {
            if should_cancel(pass, current.len()) {
                debug!(completed = pass, requested = iterations, "expansion cancelled");
                return Err(Cancelled {
                    requested: iterations,
                    partial: ExpansionResult {
                        symbols: current,
                        iterations: pass,
                    },
                });
            }
            current = self.rewrite(grammar, &current);
            debug!(pass = pass + 1, len = current.len(), "l-system pass");
        }
        Ok(ExpansionResult {
            symbols: current,
            iterations,
        })
    }

    fn rewrite(&mut self, grammar: &Grammar, input: &[Symbol]) -> Vec<Symbol> {
        let mut next = Vec::with_capacity(input.len() * 2);
        for &sym in input {
            match grammar.rule(sym) {
                Some(rule) => next.extend_from_slice(rule.choose(&mut self.rng)),
                None => next.push(sym),
            }
        }
        next
    }
}
