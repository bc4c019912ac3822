//! The parameter surface a host (editor panel, config file) drives, and the
//! regenerate-from-scratch pipeline behind it.
//!
//! [`PlantParams`] is plain serde data. [`PlantGenerator`] owns the validated
//! [`Grammar`], the iteration count, and the turtle settings; every setter is checked
//! before anything is changed, so a rejected edit leaves the previous plant intact.
//! [`PlantGenerator::generate`] always expands and interprets from the axiom.

use crate::error::ConfigError;
use crate::expander::{Expander, ExpansionResult};
use crate::grammar::{Alphabet, Alternative, Grammar, Symbol};
use crate::interpreter::{Interpretation, TurtleConfig, TurtleInterpreter};
use rand::Rng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Upper bound on rewrite passes accepted from the parameter surface.
pub const MAX_ITERATIONS: u32 = 12;

fn default_weight() -> f32 {
    1.0
}

/// One weighted successor string.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AlternativeParams {
    pub successor: String,
    #[serde(default = "default_weight")]
    pub weight: f32,
}

impl AlternativeParams {
    pub fn new(successor: &str, weight: f32) -> Self {
        Self {
            successor: successor.to_owned(),
            weight,
        }
    }
}

/// Every alternative for one predecessor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RuleParams {
    pub predecessor: Symbol,
    pub alternatives: Vec<AlternativeParams>,
}

/// Named, independently settable generation parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlantParams {
    pub axiom: String,
    pub rules: Vec<RuleParams>,
    pub iterations: u32,
    /// Turn angle in degrees.
    pub angle: f32,
    pub step: f32,
    pub width: f32,
    pub width_decay: f32,
}

impl Default for PlantParams {
    /// A bushy stochastic plant: `F` doubles each pass and `X` picks between a planar
    /// fork (A) and a pitched fork ending in a leaf (B).
    fn default() -> Self {
        Self {
            axiom: "FX".to_owned(),
            rules: vec![
                RuleParams {
                    predecessor: 'F',
                    alternatives: vec![AlternativeParams::new("FF", 1.0)],
                },
                RuleParams {
                    predecessor: 'X',
                    alternatives: vec![
                        AlternativeParams::new("F[+X]F[-X]+X", 0.6),
                        AlternativeParams::new("F[&!X]F[^!X]L", 0.4),
                    ],
                },
            ],
            iterations: 4,
            angle: 25.0,
            step: 0.1,
            width: 0.02,
            width_decay: 0.7,
        }
    }
}

/// One regeneration: the expanded string and its geometry.
#[derive(Clone, Debug)]
pub struct Plant {
    pub expansion: ExpansionResult,
    pub interpretation: Interpretation,
}

/// Validating owner of a grammar plus turtle settings.
pub struct PlantGenerator<R = SmallRng> {
    grammar: Grammar,
    iterations: u32,
    interpreter: TurtleInterpreter,
    expander: Expander<R>,
}

impl PlantGenerator<SmallRng> {
    /// Builds a generator seeded from OS entropy.
    pub fn from_params(params: &PlantParams) -> Result<Self, ConfigError> {
        Self::with_expander(params, Expander::new())
    }
}

impl<R: Rng> PlantGenerator<R> {
    /// Builds a generator that draws from `expander`, e.g. [`Expander::seeded`] in tests.
    pub fn with_expander(params: &PlantParams, expander: Expander<R>) -> Result<Self, ConfigError> {
        check_iterations(params.iterations)?;
        check_positive("step", params.step)?;
        check_positive("width", params.width)?;
        check_positive("width_decay", params.width_decay)?;
        check_angle(params.angle)?;

        let mut grammar = Grammar::new(Alphabet::standard(), &params.axiom)?;
        for rule in &params.rules {
            grammar.set_rule(rule.predecessor, alternatives(rule))?;
        }

        let config = TurtleConfig {
            default_step: params.step,
            default_width: params.width,
            width_decay: params.width_decay,
            ..TurtleConfig::default()
        }
        .with_angle_degrees(params.angle);

        Ok(Self {
            grammar,
            iterations: params.iterations,
            interpreter: TurtleInterpreter::standard(config),
            expander,
        })
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn interpreter(&self) -> &TurtleInterpreter {
        &self.interpreter
    }

    pub fn set_axiom(&mut self, axiom: &str) -> Result<(), ConfigError> {
        self.grammar.set_axiom(axiom)?;
        Ok(())
    }

    pub fn set_rule(&mut self, rule: &RuleParams) -> Result<(), ConfigError> {
        self.grammar.set_rule(rule.predecessor, alternatives(rule))?;
        Ok(())
    }

    pub fn set_iterations(&mut self, iterations: u32) -> Result<(), ConfigError> {
        check_iterations(iterations)?;
        self.iterations = iterations;
        Ok(())
    }

    pub fn set_angle_degrees(&mut self, degrees: f32) -> Result<(), ConfigError> {
        check_angle(degrees)?;
        self.interpreter.config_mut().default_angle = degrees.to_radians();
        Ok(())
    }

    pub fn set_step(&mut self, step: f32) -> Result<(), ConfigError> {
        check_positive("step", step)?;
        self.interpreter.config_mut().default_step = step;
        Ok(())
    }

    /// Expands the grammar from its axiom and interprets the result.
    pub fn generate(&mut self) -> Plant {
        let expansion = self.expander.expand(&self.grammar, self.iterations);
        let interpretation = self.interpreter.interpret(expansion.symbols());
        debug!(
            iterations = self.iterations,
            symbols = expansion.len(),
            events = interpretation.events.len(),
            balanced = interpretation.is_balanced(),
            "plant regenerated"
        );
        Plant {
            expansion,
            interpretation,
        }
    }
}

fn alternatives(rule: &RuleParams) -> Vec<Alternative> {
    rule.alternatives
        .iter()
        .map(|a| Alternative::new(&a.successor, a.weight))
        .collect()
}

fn check_iterations(requested: u32) -> Result<(), ConfigError> {
    if requested > MAX_ITERATIONS {
        return Err(ConfigError::IterationsOutOfRange {
            requested,
            max: MAX_ITERATIONS,
        });
    }
    Ok(())
}

fn check_positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::NonPositive { name, value });
    }
    Ok(())
}

fn check_angle(degrees: f32) -> Result<(), ConfigError> {
    if !degrees.is_finite() {
        return Err(ConfigError::InvalidAngle(degrees));
    }
    Ok(())
}
