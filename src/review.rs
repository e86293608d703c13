use std::collections::BTreeMap;
use std::fmt;

use regex::Regex;

/// The six circular functions, in the order the review table shows them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CircularFunction {
    Sin,
    Cos,
    Tan,
    Csc,
    Sec,
    Cot,
}

impl CircularFunction {
    pub const ALL: [CircularFunction; 6] = [
        CircularFunction::Sin,
        CircularFunction::Cos,
        CircularFunction::Tan,
        CircularFunction::Csc,
        CircularFunction::Sec,
        CircularFunction::Cot,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CircularFunction::Sin => "sin",
            CircularFunction::Cos => "cos",
            CircularFunction::Tan => "tan",
            CircularFunction::Csc => "csc",
            CircularFunction::Sec => "sec",
            CircularFunction::Cot => "cot",
        }
    }
}

impl fmt::Display for CircularFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One row of the special-values review table: the expected value strings
/// for all six functions at one angle, in [`CircularFunction::ALL`] order.
pub struct SpecialTrigRow {
    pub angle: &'static str,
    values: [&'static str; 6],
}

impl SpecialTrigRow {
    pub fn expected_value(&self, function: CircularFunction) -> &'static str {
        self.values[function as usize]
    }
}

pub const SPECIAL_TRIG_ROWS: [SpecialTrigRow; 7] = [
    SpecialTrigRow {
        angle: "0",
        values: ["0", "1", "0", "undefined", "1", "undefined"],
    },
    SpecialTrigRow {
        angle: "π/6",
        values: ["1/2", "√3/2", "√3/3", "2", "2√3/3", "√3"],
    },
    SpecialTrigRow {
        angle: "π/4",
        values: ["√2/2", "√2/2", "1", "√2", "√2", "1"],
    },
    SpecialTrigRow {
        angle: "π/3",
        values: ["√3/2", "1/2", "√3", "2√3/3", "2", "√3/3"],
    },
    SpecialTrigRow {
        angle: "π/2",
        values: ["1", "0", "undefined", "1", "undefined", "0"],
    },
    SpecialTrigRow {
        angle: "π",
        values: ["0", "-1", "0", "undefined", "-1", "undefined"],
    },
    SpecialTrigRow {
        angle: "3π/2",
        values: ["-1", "0", "undefined", "-1", "undefined", "0"],
    },
];

/// Normalizes a table entry for comparison. Looser than the lesson answer
/// checker: `π` becomes `pi`, `sqrt` becomes `√`, and the various ways of
/// writing "undefined" collapse. Alternatives resolve leftmost-first, as
/// in the original pattern.
pub fn normalize_table_value(value: &str) -> String {
    let mut normalized = value.trim().to_lowercase();
    normalized.retain(|c| !c.is_whitespace());

    let normalized = normalized.replace('π', "pi").replace("sqrt", "√");

    let undefined_aliases = Regex::new(r"inf|infinity|undefined|undef|--|—").unwrap();
    undefined_aliases
        .replace_all(&normalized, "undefined")
        .to_string()
}

/// Key for one cell of the table answers map.
pub fn table_key(angle: &str, function: CircularFunction) -> String {
    format!("{}:{}", angle, function.name())
}

/// Whole-table check: every cell must normalize to its expected value.
pub fn table_is_correct(answers: &BTreeMap<String, String>) -> bool {
    SPECIAL_TRIG_ROWS.iter().all(|row| {
        CircularFunction::ALL.iter().all(|&function| {
            let expected = normalize_table_value(row.expected_value(function));
            let actual = answers
                .get(&table_key(row.angle, function))
                .map(|value| normalize_table_value(value))
                .unwrap_or_default();
            expected == actual
        })
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Quadrant {
    I,
    II,
    III,
    IV,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [Quadrant::I, Quadrant::II, Quadrant::III, Quadrant::IV];

    pub fn numeral(self) -> &'static str {
        match self {
            Quadrant::I => "I",
            Quadrant::II => "II",
            Quadrant::III => "III",
            Quadrant::IV => "IV",
        }
    }
}

/// Which functions are positive and negative in one quadrant.
pub struct QuadrantSigns {
    pub positive: &'static [CircularFunction],
    pub negative: &'static [CircularFunction],
}

use CircularFunction::{Cos, Cot, Csc, Sec, Sin, Tan};

pub fn expected_signs(quadrant: Quadrant) -> QuadrantSigns {
    match quadrant {
        Quadrant::I => QuadrantSigns {
            positive: &[Sin, Cos, Tan, Csc, Sec, Cot],
            negative: &[],
        },
        Quadrant::II => QuadrantSigns {
            positive: &[Sin, Csc],
            negative: &[Cos, Sec, Tan, Cot],
        },
        Quadrant::III => QuadrantSigns {
            positive: &[Tan, Cot],
            negative: &[Sin, Csc, Cos, Sec],
        },
        Quadrant::IV => QuadrantSigns {
            positive: &[Cos, Sec],
            negative: &[Sin, Csc, Tan, Cot],
        },
    }
}

/// A student's positive/negative placement for one quadrant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignAssignment {
    pub positive: Vec<CircularFunction>,
    pub negative: Vec<CircularFunction>,
}

/// Order-insensitive comparison against [`expected_signs`].
pub fn signs_correct(quadrant: Quadrant, assignment: &SignAssignment) -> bool {
    let expected = expected_signs(quadrant);
    same_functions(&assignment.positive, expected.positive)
        && same_functions(&assignment.negative, expected.negative)
}

fn same_functions(actual: &[CircularFunction], expected: &[CircularFunction]) -> bool {
    let mut actual: Vec<CircularFunction> = actual.to_vec();
    let mut expected: Vec<CircularFunction> = expected.to_vec();
    actual.sort();
    expected.sort();
    actual == expected
}

/// Students label quadrants as "I", "i", "QII", etc.
pub fn normalize_quadrant_label(value: &str) -> String {
    let upper = value.trim().to_uppercase();
    upper.strip_prefix('Q').unwrap_or(&upper).to_string()
}

/// All four labels must resolve to their own numerals.
pub fn quadrant_labels_correct(labels: &BTreeMap<Quadrant, String>) -> bool {
    Quadrant::ALL.iter().all(|&quadrant| {
        labels
            .get(&quadrant)
            .map(|label| normalize_quadrant_label(label) == quadrant.numeral())
            .unwrap_or(false)
    })
}
