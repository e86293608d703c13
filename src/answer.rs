use regex::Regex;

/// Normalizes a free-text math answer for comparison. Students type a mix
/// of plain text, unicode glyphs, and LaTeX copied from the on-screen
/// snippet buttons, so the rules are textual, not algebraic:
///
/// - trim, lowercase, strip all internal whitespace
/// - unify `π`, `\pi`, and bare `pi` onto `\pi`
/// - drop `\left`/`\right` sizing commands
/// - collapse `\dfrac`/`\tfrac` to `\frac`
/// - brace bare square roots: `\sqrt3` becomes `\sqrt{3}`
/// - rewrite a leading `p(` (the "point P" authoring convention) to `(`
pub fn normalize_answer(input: &str) -> String {
    let mut normalized = input.trim().to_lowercase();
    normalized.retain(|c| !c.is_whitespace());

    let normalized = normalized
        .replace("\\pi", "π")
        .replace("pi", "π")
        .replace('π', "\\pi")
        .replace("\\left", "")
        .replace("\\right", "")
        .replace("\\dfrac", "\\frac")
        .replace("\\tfrac", "\\frac");

    let bare_sqrt = Regex::new(r"\\sqrt([0-9a-z])").unwrap();
    let normalized = bare_sqrt.replace_all(&normalized, "\\sqrt{$1}").to_string();

    match normalized.strip_prefix("p(") {
        Some(rest) => format!("({}", rest),
        None => normalized,
    }
}

/// Decides whether a student's answer matches one of the acceptable
/// answers under [`normalize_answer`]. An empty acceptable list means the
/// question only asks for an attempt: any input that normalizes to
/// something non-empty passes. There is no numeric tolerance and no
/// algebraic simplification.
pub fn is_answer_acceptable(student_input: &str, acceptable_answers: &[String]) -> bool {
    let normalized = normalize_answer(student_input);

    if acceptable_answers.is_empty() {
        return !normalized.is_empty();
    }

    acceptable_answers
        .iter()
        .any(|answer| normalize_answer(answer) == normalized)
}
