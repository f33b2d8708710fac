//! Problem generation
//!
//! Problems are drawn from the session RNG so a seeded run is reproducible.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::stage::Stage;
use crate::consts::SUBTRACTION_CHANCE;

/// Arithmetic operator of a problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Subtract,
}

impl Operator {
    pub fn symbol(&self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
        }
    }

    /// Glyph used on screen (a real minus sign reads better than a hyphen)
    pub fn glyph(&self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '−',
        }
    }
}

/// A single column-arithmetic problem
///
/// Field names on the wire match the browser save format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    #[serde(rename = "num1")]
    pub operand_a: u32,
    #[serde(rename = "num2")]
    pub operand_b: u32,
    pub operator: Operator,
    /// Canonical decimal result, no leading zeros
    #[serde(rename = "answer")]
    pub expected_answer: String,
}

impl Problem {
    pub fn addition(a: u32, b: u32) -> Self {
        Self {
            operand_a: a,
            operand_b: b,
            operator: Operator::Add,
            expected_answer: (a + b).to_string(),
        }
    }

    /// Subtraction with the larger operand as minuend, whatever order they arrive in
    pub fn subtraction(a: u32, b: u32) -> Self {
        let (a, b) = if b > a { (b, a) } else { (a, b) };
        Self {
            operand_a: a,
            operand_b: b,
            operator: Operator::Subtract,
            expected_answer: (a - b).to_string(),
        }
    }

    /// Number of answer slots the learner fills
    pub fn answer_len(&self) -> usize {
        self.expected_answer.len()
    }

    /// Number of carry markers above the operand columns
    pub fn carry_len(&self) -> usize {
        digit_count(self.operand_a).max(digit_count(self.operand_b)) + 1
    }

    /// Whether a stored answer string is a well-formed result of the operands
    pub fn is_consistent(&self) -> bool {
        let expected = match self.operator {
            Operator::Add => self.operand_a.checked_add(self.operand_b),
            Operator::Subtract => self.operand_a.checked_sub(self.operand_b),
        };
        expected.map(|v| v.to_string()) == Some(self.expected_answer.clone())
    }
}

impl std::fmt::Display for Problem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.operand_a, self.operator.symbol(), self.operand_b)
    }
}

/// Decimal digit count of a non-negative number
pub fn digit_count(n: u32) -> usize {
    n.checked_ilog10().map_or(1, |d| d as usize + 1)
}

/// Draw a random problem bounded by the planet's `max_num`
pub fn generate<R: Rng + ?Sized>(stage: &Stage, rng: &mut R) -> Problem {
    let max_num = stage.max_num.max(1);
    let is_addition = rng.random::<f64>() > SUBTRACTION_CHANCE;

    if is_addition {
        let a = rng.random_range(1..=max_num);
        let b = rng.random_range(1..=max_num);
        Problem::addition(a, b)
    } else {
        let a = rng.random_range(1..=max_num);
        let b = rng.random_range(1..=a);
        Problem::subtraction(a, b)
    }
}
