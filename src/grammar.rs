//! Axiom, alphabet, and weighted production rules of a context-free stochastic L-System.

use crate::error::{GrammarError, GrammarResult, WeightProblem};
use rand::Rng;
use rand::distributions::{Distribution, WeightedError, WeightedIndex};
use std::collections::{BTreeSet, HashMap};

/// A single L-System symbol.
pub type Symbol = char;

/// Turtle command characters declared by [`Alphabet::standard`].
pub const TURTLE_COMMANDS: &str = "f+-&^\\/|[]!";

/// The finite set of symbols a [`Grammar`] may reference.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Alphabet {
    symbols: BTreeSet<Symbol>,
}

impl Alphabet {
    pub fn new(symbols: impl IntoIterator<Item = Symbol>) -> Self {
        Self {
            symbols: symbols.into_iter().collect(),
        }
    }

    /// Every ASCII uppercase letter plus the standard turtle commands.
    pub fn standard() -> Self {
        Self::new(('A'..='Z').chain(TURTLE_COMMANDS.chars()))
    }

    pub fn contains(&self, symbol: Symbol) -> bool {
        self.symbols.contains(&symbol)
    }

    pub fn iter(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.symbols.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Fails on the first symbol that is not declared.
    pub fn validate(&self, symbols: &[Symbol]) -> GrammarResult<()> {
        match symbols.iter().position(|s| !self.contains(*s)) {
            Some(position) => Err(GrammarError::InvalidSymbol {
                symbol: symbols[position],
                position,
            }),
            None => Ok(()),
        }
    }
}

/// One weighted right-hand side of a [`ProductionRule`].
#[derive(Clone, Debug, PartialEq)]
pub struct Alternative {
    pub successor: Vec<Symbol>,
    pub weight: f32,
}

impl Alternative {
    pub fn new(successor: &str, weight: f32) -> Self {
        Self {
            successor: successor.chars().collect(),
            weight,
        }
    }

    /// An alternative with weight `1.0`.
    pub fn deterministic(successor: &str) -> Self {
        Self::new(successor, 1.0)
    }
}

impl From<&str> for Alternative {
    fn from(successor: &str) -> Self {
        Self::deterministic(successor)
    }
}

/// All alternatives for one predecessor, validated on construction.
///
/// With a single alternative the rule is deterministic and [`choose`](Self::choose)
/// never touches the random source.
#[derive(Clone, Debug)]
pub struct ProductionRule {
    predecessor: Symbol,
    alternatives: Vec<Alternative>,
    total_weight: f32,
    chooser: Option<WeightedIndex<f32>>,
}

impl ProductionRule {
    /// Validates weights and builds the sampler.
    ///
    /// Rejects an empty list, any negative or non-finite weight, and weights whose sum is
    /// zero or overflows `f32`.
    /// Alphabet membership is checked by [`Grammar::set_rule`], not here.
    pub fn new(predecessor: Symbol, alternatives: Vec<Alternative>) -> GrammarResult<Self> {
        if alternatives.is_empty() {
            return Err(GrammarError::EmptyRule(predecessor));
        }

        let invalid = |reason| GrammarError::InvalidWeight {
            predecessor,
            reason,
        };

        for (index, alt) in alternatives.iter().enumerate() {
            if !alt.weight.is_finite() || alt.weight < 0.0 {
                return Err(invalid(WeightProblem::Negative {
                    index,
                    weight: alt.weight,
                }));
            }
        }

        let total_weight: f32 = alternatives.iter().map(|a| a.weight).sum();
        if !total_weight.is_finite() {
            return Err(invalid(WeightProblem::Overflow));
        }
        if total_weight <= 0.0 {
            return Err(invalid(WeightProblem::AllZero));
        }

        let chooser = if alternatives.len() > 1 {
            let index = WeightedIndex::new(alternatives.iter().map(|a| a.weight)).map_err(
                |err| match err {
                    WeightedError::AllWeightsZero => invalid(WeightProblem::AllZero),
                    other => invalid(WeightProblem::Sampler(other)),
                },
            )?;
            Some(index)
        } else {
            None
        };

        Ok(Self {
            predecessor,
            alternatives,
            total_weight,
            chooser,
        })
    }

    pub fn predecessor(&self) -> Symbol {
        self.predecessor
    }

    pub fn alternatives(&self) -> &[Alternative] {
        &self.alternatives
    }

    pub fn is_stochastic(&self) -> bool {
        self.chooser.is_some()
    }

    /// Normalized selection probability of the alternative at `index`.
    pub fn probability(&self, index: usize) -> Option<f32> {
        self.alternatives
            .get(index)
            .map(|a| a.weight / self.total_weight)
    }

    /// Picks a successor, drawing from `rng` only when the rule has several alternatives.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> &[Symbol] {
        let index = match &self.chooser {
            Some(chooser) => chooser.sample(rng),
            None => 0,
        };
        &self.alternatives[index].successor
    }
}

/// The axiom plus the rule set, mutated only through validating setters.
///
/// A symbol counts as a non-terminal exactly when the grammar holds a rule for it;
/// every other declared symbol is copied through expansion unchanged.
#[derive(Clone, Debug)]
pub struct Grammar {
    alphabet: Alphabet,
    axiom: Vec<Symbol>,
    rules: HashMap<Symbol, ProductionRule>,
}

impl Grammar {
    pub fn new(alphabet: Alphabet, axiom: &str) -> GrammarResult<Self> {
        let axiom: Vec<Symbol> = axiom.chars().collect();
        alphabet.validate(&axiom)?;
        Ok(Self {
            alphabet,
            axiom,
            rules: HashMap::new(),
        })
    }

    /// A grammar over [`Alphabet::standard`].
    pub fn standard(axiom: &str) -> GrammarResult<Self> {
        Self::new(Alphabet::standard(), axiom)
    }

    /// Builder-style [`set_rule`](Self::set_rule).
    pub fn with_rule(
        mut self,
        predecessor: Symbol,
        alternatives: impl IntoIterator<Item = Alternative>,
    ) -> GrammarResult<Self> {
        self.set_rule(predecessor, alternatives)?;
        Ok(self)
    }

    pub fn set_axiom(&mut self, axiom: &str) -> GrammarResult<()> {
        let axiom: Vec<Symbol> = axiom.chars().collect();
        self.alphabet.validate(&axiom)?;
        self.axiom = axiom;
        Ok(())
    }

    /// Replaces every alternative for `predecessor`.
    pub fn set_rule(
        &mut self,
        predecessor: Symbol,
        alternatives: impl IntoIterator<Item = Alternative>,
    ) -> GrammarResult<()> {
        if !self.alphabet.contains(predecessor) {
            return Err(GrammarError::InvalidSymbol {
                symbol: predecessor,
                position: 0,
            });
        }

        let alternatives: Vec<Alternative> = alternatives.into_iter().collect();
        for alt in &alternatives {
            self.alphabet.validate(&alt.successor)?;
        }

        let rule = ProductionRule::new(predecessor, alternatives)?;
        self.rules.insert(predecessor, rule);
        Ok(())
    }

    /// Drops the rule for `predecessor`, turning it back into a literal.
    pub fn remove_rule(&mut self, predecessor: Symbol) -> Option<ProductionRule> {
        self.rules.remove(&predecessor)
    }

    pub fn axiom(&self) -> &[Symbol] {
        &self.axiom
    }

    pub fn rule(&self, symbol: Symbol) -> Option<&ProductionRule> {
        self.rules.get(&symbol)
    }

    pub fn rules(&self) -> impl Iterator<Item = &ProductionRule> {
        self.rules.values()
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn is_non_terminal(&self, symbol: Symbol) -> bool {
        self.rules.contains_key(&symbol)
    }
}
