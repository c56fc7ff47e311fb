//! Canonical text form of modifier expressions.

use crate::dsl::modifier::{CharacterModifierExpr, ModifierBranch, ModifierExpr};

/// `max_a_b_min_c_exact-field` form of one branch, aggregations in
/// max/min/avg order, the exact attribute last.
pub fn describe_branch(branch: &ModifierBranch) -> String {
    let mut items: Vec<&str> = Vec::new();
    for (name, attrs) in [("max", &branch.max), ("min", &branch.min), ("avg", &branch.avg)] {
        if attrs.is_empty() {
            continue;
        }
        items.push(name);
        items.extend(attrs.iter().map(String::as_str));
    }
    if let Some(exact) = &branch.exact {
        items.push(exact);
    }
    items.join("_")
}

/// Branch descriptions prefixed by sign, joined by `delimiter`.
pub fn describe_modifiers(expr: &ModifierExpr, delimiter: &str) -> String {
    let mut items = Vec::new();
    for (sign, branch) in [("positive", &expr.positive), ("negative", &expr.negative)] {
        let Some(branch) = branch else { continue };
        let mut parts = vec![sign.to_string()];
        let desc = describe_branch(branch);
        if !desc.is_empty() {
            parts.push(desc);
        }
        items.push(parts.join("_"));
    }
    items.join(delimiter)
}

/// Character form: sign, then own/other, then the branch description.
pub fn describe_character_modifiers(expr: &CharacterModifierExpr, delimiter: &str) -> String {
    let mut items = Vec::new();
    for (sign, sides) in [("positive", &expr.positive), ("negative", &expr.negative)] {
        let Some(sides) = sides else { continue };
        let mut parts = vec![sign.to_string()];
        for (side, branch) in [("own", &sides.own), ("other", &sides.other)] {
            let Some(branch) = branch else { continue };
            parts.push(side.to_string());
            let desc = describe_branch(branch);
            if !desc.is_empty() {
                parts.push(desc);
            }
        }
        items.push(parts.join("_"));
    }
    items.join(delimiter)
}
