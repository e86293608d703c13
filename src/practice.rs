use std::f64::consts::PI;
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

const EPSILON: f64 = 1e-6;

/// The sixteen standard unit-circle angles, with their display labels.
pub struct SpecialAngle {
    pub label: &'static str,
    pub radians: f64,
}

pub const SPECIAL_ANGLES: [SpecialAngle; 16] = [
    SpecialAngle { label: "0", radians: 0.0 },
    SpecialAngle { label: "π/6", radians: PI / 6.0 },
    SpecialAngle { label: "π/4", radians: PI / 4.0 },
    SpecialAngle { label: "π/3", radians: PI / 3.0 },
    SpecialAngle { label: "π/2", radians: PI / 2.0 },
    SpecialAngle { label: "2π/3", radians: 2.0 * PI / 3.0 },
    SpecialAngle { label: "3π/4", radians: 3.0 * PI / 4.0 },
    SpecialAngle { label: "5π/6", radians: 5.0 * PI / 6.0 },
    SpecialAngle { label: "π", radians: PI },
    SpecialAngle { label: "7π/6", radians: 7.0 * PI / 6.0 },
    SpecialAngle { label: "5π/4", radians: 5.0 * PI / 4.0 },
    SpecialAngle { label: "4π/3", radians: 4.0 * PI / 3.0 },
    SpecialAngle { label: "3π/2", radians: 3.0 * PI / 2.0 },
    SpecialAngle { label: "5π/3", radians: 5.0 * PI / 3.0 },
    SpecialAngle { label: "7π/4", radians: 7.0 * PI / 4.0 },
    SpecialAngle { label: "11π/6", radians: 11.0 * PI / 6.0 },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrigFunction {
    Sin,
    Cos,
    Tan,
}

impl TrigFunction {
    pub const ALL: [TrigFunction; 3] = [TrigFunction::Sin, TrigFunction::Cos, TrigFunction::Tan];

    pub fn name(self) -> &'static str {
        match self {
            TrigFunction::Sin => "sin",
            TrigFunction::Cos => "cos",
            TrigFunction::Tan => "tan",
        }
    }

    pub fn eval(self, radians: f64) -> f64 {
        match self {
            TrigFunction::Sin => radians.sin(),
            TrigFunction::Cos => radians.cos(),
            TrigFunction::Tan => radians.tan(),
        }
    }

    /// cos is even; sin and tan are odd.
    pub fn parity(self) -> Parity {
        match self {
            TrigFunction::Cos => Parity::Even,
            TrigFunction::Sin | TrigFunction::Tan => Parity::Odd,
        }
    }
}

impl fmt::Display for TrigFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    Even,
    Odd,
}

impl fmt::Display for Parity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Parity::Even => "even",
            Parity::Odd => "odd",
        })
    }
}

/// Snaps a computed trig value to its exact display form: the known
/// unit-circle constants within 1e-6, otherwise the value rounded to six
/// decimals. Non-finite values print as "undefined".
pub fn simplify_trig_value(value: f64) -> String {
    if !value.is_finite() {
        return "undefined".to_string();
    }

    let rounded = (value * 1_000_000.0).round() / 1_000_000.0;
    let sqrt3 = 3.0_f64.sqrt();
    let known = [
        (0.0, "0"),
        (1.0, "1"),
        (0.5, "1/2"),
        (std::f64::consts::FRAC_1_SQRT_2, "√2/2"),
        (sqrt3 / 2.0, "√3/2"),
        (sqrt3, "√3"),
        (sqrt3 / 3.0, "√3/3"),
    ];

    for (constant, label) in known {
        if (rounded - constant).abs() < EPSILON {
            return label.to_string();
        }
        if constant != 0.0 && (rounded + constant).abs() < EPSILON {
            return format!("-{}", label);
        }
    }

    format!("{}", rounded)
}

/// Evaluates a trig function at an angle and renders the canonical answer
/// string. Tangent at an angle where cosine vanishes is "undefined".
pub fn evaluate_at(function: TrigFunction, radians: f64) -> String {
    if function == TrigFunction::Tan && radians.cos().abs() < EPSILON {
        return "undefined".to_string();
    }
    simplify_trig_value(function.eval(radians))
}

/// "Find sin(π/6)" style problem with a revealable canonical answer.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluatingProblem {
    pub id: u32,
    pub angle_label: &'static str,
    pub radians: f64,
    pub function: TrigFunction,
    pub answer: String,
}

pub fn evaluating_problem<R: Rng + ?Sized>(id: u32, rng: &mut R) -> EvaluatingProblem {
    let angle = &SPECIAL_ANGLES[rng.gen_range(0..SPECIAL_ANGLES.len())];
    let function = TrigFunction::ALL[rng.gen_range(0..TrigFunction::ALL.len())];

    EvaluatingProblem {
        id,
        angle_label: angle.label,
        radians: angle.radians,
        function,
        answer: evaluate_at(function, angle.radians),
    }
}

const VARIABLE_SYMBOLS: [&str; 4] = ["x", "θ", "t", "α"];

/// "Simplify sin(-3x)" style problem exercising the even/odd identities.
#[derive(Debug, Clone, PartialEq)]
pub struct EvenOddProblem {
    pub id: u32,
    pub function: TrigFunction,
    pub input_expression: String,
    pub answer_expression: String,
    pub parity: Parity,
}

pub fn even_odd_problem<R: Rng + ?Sized>(id: u32, rng: &mut R) -> EvenOddProblem {
    let function = TrigFunction::ALL[rng.gen_range(0..TrigFunction::ALL.len())];
    let symbol = VARIABLE_SYMBOLS[rng.gen_range(0..VARIABLE_SYMBOLS.len())];
    let coefficient: u32 = rng.gen_range(1..=9);

    let inner = if coefficient == 1 {
        symbol.to_string()
    } else {
        format!("{}{}", coefficient, symbol)
    };
    let parity = function.parity();
    let answer_expression = match parity {
        Parity::Even => format!("{}({})", function, inner),
        Parity::Odd => format!("-{}({})", function, inner),
    };

    EvenOddProblem {
        id,
        function,
        input_expression: format!("{}(-{})", function, inner),
        answer_expression,
        parity,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InverseTrigFunction {
    Arcsin,
    Arccos,
    Arctan,
}

impl InverseTrigFunction {
    pub const ALL: [InverseTrigFunction; 3] = [
        InverseTrigFunction::Arcsin,
        InverseTrigFunction::Arccos,
        InverseTrigFunction::Arctan,
    ];

    pub fn name(self) -> &'static str {
        match self {
            InverseTrigFunction::Arcsin => "arcsin",
            InverseTrigFunction::Arccos => "arccos",
            InverseTrigFunction::Arctan => "arctan",
        }
    }

    /// Principal-value table for this function, value label → answer label
    /// in radians.
    pub fn principal_values(self) -> &'static [InverseTrigEntry] {
        match self {
            InverseTrigFunction::Arcsin => &ARCSIN_VALUES,
            InverseTrigFunction::Arccos => &ARCCOS_VALUES,
            InverseTrigFunction::Arctan => &ARCTAN_VALUES,
        }
    }
}

impl fmt::Display for InverseTrigFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub struct InverseTrigEntry {
    pub value_label: &'static str,
    pub answer_label: &'static str,
}

const ARCSIN_VALUES: [InverseTrigEntry; 9] = [
    InverseTrigEntry { value_label: "-1", answer_label: "-π/2" },
    InverseTrigEntry { value_label: "-√3/2", answer_label: "-π/3" },
    InverseTrigEntry { value_label: "-√2/2", answer_label: "-π/4" },
    InverseTrigEntry { value_label: "-1/2", answer_label: "-π/6" },
    InverseTrigEntry { value_label: "0", answer_label: "0" },
    InverseTrigEntry { value_label: "1/2", answer_label: "π/6" },
    InverseTrigEntry { value_label: "√2/2", answer_label: "π/4" },
    InverseTrigEntry { value_label: "√3/2", answer_label: "π/3" },
    InverseTrigEntry { value_label: "1", answer_label: "π/2" },
];

const ARCCOS_VALUES: [InverseTrigEntry; 9] = [
    InverseTrigEntry { value_label: "-1", answer_label: "π" },
    InverseTrigEntry { value_label: "-√3/2", answer_label: "5π/6" },
    InverseTrigEntry { value_label: "-√2/2", answer_label: "3π/4" },
    InverseTrigEntry { value_label: "-1/2", answer_label: "2π/3" },
    InverseTrigEntry { value_label: "0", answer_label: "π/2" },
    InverseTrigEntry { value_label: "1/2", answer_label: "π/3" },
    InverseTrigEntry { value_label: "√2/2", answer_label: "π/4" },
    InverseTrigEntry { value_label: "√3/2", answer_label: "π/6" },
    InverseTrigEntry { value_label: "1", answer_label: "0" },
];

const ARCTAN_VALUES: [InverseTrigEntry; 7] = [
    InverseTrigEntry { value_label: "-√3", answer_label: "-π/3" },
    InverseTrigEntry { value_label: "-1", answer_label: "-π/4" },
    InverseTrigEntry { value_label: "-√3/3", answer_label: "-π/6" },
    InverseTrigEntry { value_label: "0", answer_label: "0" },
    InverseTrigEntry { value_label: "√3/3", answer_label: "π/6" },
    InverseTrigEntry { value_label: "1", answer_label: "π/4" },
    InverseTrigEntry { value_label: "√3", answer_label: "π/3" },
];

/// "Find arccos(1/2), principal value in radians" style problem.
#[derive(Debug, Clone, PartialEq)]
pub struct InverseTrigProblem {
    pub id: u32,
    pub function: InverseTrigFunction,
    pub value_label: &'static str,
    pub answer_label: &'static str,
}

pub fn inverse_trig_problem<R: Rng + ?Sized>(id: u32, rng: &mut R) -> InverseTrigProblem {
    let function = InverseTrigFunction::ALL[rng.gen_range(0..InverseTrigFunction::ALL.len())];
    let values = function.principal_values();
    let entry = &values[rng.gen_range(0..values.len())];

    InverseTrigProblem {
        id,
        function,
        value_label: entry.value_label,
        answer_label: entry.answer_label,
    }
}
