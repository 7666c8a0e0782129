//! Conversion between FBC gene product associations and gene reaction rule strings
use crate::io::gpr_parse::{parse_gpr, rewrite_gene_ids};
use crate::io::sbml::ids::{IdReplacement, IdReplacements};
use crate::sbml::Association;

/// Render an association as a gene reaction rule
///
/// Every `and`/`or` node is wrapped in parentheses, gene product ids are passed through
/// `gene_id` and a lone gene product is rendered bare.
pub fn render<F>(association: &Association, gene_id: &F) -> String
where
    F: Fn(&str) -> String,
{
    match association {
        Association::GeneProductRef(id) => gene_id(id),
        Association::And(children) => render_operator(children, " and ", gene_id),
        Association::Or(children) => render_operator(children, " or ", gene_id),
    }
}

fn render_operator<F>(children: &[Association], operator: &str, gene_id: &F) -> String
where
    F: Fn(&str) -> String,
{
    let rendered: Vec<String> = children.iter().map(|c| render(c, gene_id)).collect();
    format!("( {} )", rendered.join(operator))
}

/// Remove one pair of parentheses enclosing the whole rule
///
/// `(a or b)` becomes `a or b`, while `(a) or (b)` is kept since its first parenthesis
/// closes before the end.
pub fn strip_outer_parens(rule: &str) -> String {
    let trimmed = rule.trim();
    if !trimmed.starts_with('(') || !trimmed.ends_with(')') {
        return trimmed.to_string();
    }
    let mut depth = 0usize;
    for (position, c) in trimmed.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    if position == trimmed.len() - 1 {
                        return trimmed[1..position].trim().to_string();
                    }
                    break;
                }
            }
            _ => {}
        }
    }
    trimmed.to_string()
}

/// Gene reaction rule of an FBC association, with gene ids mapped back to model ids
pub fn association_to_rule(association: &Association, replacements: &IdReplacements) -> String {
    strip_outer_parens(&render(association, &|id: &str| {
        replacements.apply(IdReplacement::Gene, id)
    }))
}

/// FBC association of a gene reaction rule, with gene ids mapped to SBML ids
///
/// Returns `None` for an empty rule. A rule which can not be parsed is logged and also
/// gives `None`.
pub fn rule_to_association(rule: &str, replacements: &IdReplacements) -> Option<Association> {
    if rule.trim().is_empty() {
        return None;
    }
    let sbml_rule = rewrite_gene_ids(rule, |id| replacements.apply(IdReplacement::GeneRev, id));
    match parse_gpr(&sbml_rule) {
        Ok(association) => Some(association),
        Err(e) => {
            log::warn!("Unable to parse gene reaction rule '{rule}': {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gene(id: &str) -> Association {
        Association::GeneProductRef(id.to_string())
    }

    #[test]
    fn render_nested() {
        let association = Association::Or(vec![
            Association::And(vec![gene("g1"), gene("g2")]),
            gene("g3"),
        ]);
        assert_eq!(
            render(&association, &|id: &str| id.to_string()),
            "( ( g1 and g2 ) or g3 )"
        );
        assert_eq!(render(&gene("g1"), &|id: &str| id.to_string()), "g1");
    }

    #[test]
    fn strip_parens() {
        assert_eq!(strip_outer_parens("( ( g1 and g2 ) or g3 )"), "( g1 and g2 ) or g3");
        assert_eq!(strip_outer_parens("(a) or (b)"), "(a) or (b)");
        assert_eq!(strip_outer_parens("g1"), "g1");
        assert_eq!(strip_outer_parens(" (g1) "), "g1");
    }

    #[test]
    fn rule_round_trip() {
        let replacements = IdReplacements::default();
        let association = rule_to_association("(b0001.1 and b0002) or b0003", &replacements)
            .unwrap();
        assert_eq!(
            association,
            Association::Or(vec![
                Association::And(vec![gene("G_b0001__SBML_DOT__1"), gene("G_b0002")]),
                gene("G_b0003"),
            ])
        );
        assert_eq!(
            association_to_rule(&association, &replacements),
            "( b0001.1 and b0002 ) or b0003"
        );
        assert_eq!(rule_to_association("  ", &replacements), None);
        assert_eq!(rule_to_association("(b1 and", &replacements), None);
    }
}
