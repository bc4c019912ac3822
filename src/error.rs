//! Error types for grammar configuration, interpretation, and the generator surface.

use crate::grammar::Symbol;

/// Rejected grammar mutations.
///
/// Every variant is raised synchronously by the mutating call; the grammar keeps
/// its previous valid state.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GrammarError {
    #[error("symbol {symbol:?} at position {position} is not in the declared alphabet")]
    InvalidSymbol { symbol: Symbol, position: usize },
    #[error("rule for {predecessor:?} has an invalid weight: {reason}")]
    InvalidWeight {
        predecessor: Symbol,
        reason: WeightProblem,
    },
    #[error("rule for {0:?} has no alternatives")]
    EmptyRule(Symbol),
}

/// Why a set of weights was rejected.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum WeightProblem {
    #[error("weight {weight} of alternative {index} is negative or not finite")]
    Negative { index: usize, weight: f32 },
    #[error("all weights are zero")]
    AllZero,
    #[error("weights sum past the largest finite f32")]
    Overflow,
    #[error("weights cannot be sampled: {0}")]
    Sampler(rand::distributions::WeightedError),
}

/// Branch push/pop mismatches found while interpreting a symbol string.
///
/// These are grammar-authoring mistakes, not crashes: the interpreter records
/// them as entries in
/// [`Interpretation::diagnostics`](crate::interpreter::Interpretation::diagnostics) and keeps going.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnbalancedStackError {
    #[error("pop at symbol {index} with an empty state stack")]
    PopOnEmpty { index: usize },
    #[error("{depth} branch(es) still open at the end of the symbol string")]
    UnclosedBranches { depth: usize },
    #[error("push at symbol {index} exceeds the maximum stack depth of {max}")]
    DepthExceeded { index: usize, max: usize },
}

/// Errors raised by the [`PlantGenerator`](crate::generator::PlantGenerator) setters.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error(transparent)]
    Grammar(#[from] GrammarError),
    #[error("iteration count {requested} is outside 0..={max}")]
    IterationsOutOfRange { requested: u32, max: u32 },
    #[error("{name} must be finite and positive, got {value}")]
    NonPositive { name: &'static str, value: f32 },
    #[error("angle must be finite, got {0}")]
    InvalidAngle(f32),
}

pub type GrammarResult<T> = Result<T, GrammarError>;
