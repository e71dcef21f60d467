/// Canonicalizes an agency name for cross-source matching. The lead export
/// writes "RealNet - Sandton" while the spend sheet writes "RealNet Sandton
/// (Pty)"; two names join iff their normalized forms are equal.
///
/// Steps, in order: any parenthesized suffix is dropped with its
/// parentheses, whitespace runs collapse to one space with standalone "-"
/// separator tokens removed, the result is trimmed and lowercased. Always
/// returns a string (possibly empty) and is idempotent, including on
/// doubled separators like "A - - B".
pub fn normalize_agency_name(name: &str) -> String {
    let without_parens = strip_parenthesized(name);
    let collapsed = without_parens
        .split_whitespace()
        .filter(|token| *token != "-")
        .collect::<Vec<_>>()
        .join(" ");
    collapsed.to_lowercase()
}

fn strip_parenthesized(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut depth = 0usize;
    for ch in value.chars() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(ch),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_dash_and_parenthesized_variants() {
        assert_eq!(
            normalize_agency_name("RealNet - Sandton (Pty)"),
            normalize_agency_name("RealNet Sandton")
        );
    }

    #[test]
    fn collapses_whitespace_and_case() {
        assert_eq!(normalize_agency_name("  A   B "), normalize_agency_name("a b"));
        assert_eq!(normalize_agency_name("  A   B "), "a b");
    }

    #[test]
    fn idempotent() {
        for raw in [
            "RealNet - Sandton (Pty) Ltd",
            "Brand - Branch - Office",
            "A - - B",
            "  Spaced   Out  ",
            "",
        ] {
            let once = normalize_agency_name(raw);
            assert_eq!(normalize_agency_name(&once), once, "raw: {raw:?}");
        }
    }

    #[test]
    fn collapses_doubled_separators_in_one_pass() {
        assert_eq!(normalize_agency_name("A - - B"), "a b");
        assert_eq!(normalize_agency_name("Brand -  - Branch"), "brand branch");
        // A hyphen embedded in a word is part of the name, not a separator.
        assert_eq!(normalize_agency_name("Re-Max North"), "re-max north");
    }

    #[test]
    fn drops_nested_and_unbalanced_parentheses() {
        assert_eq!(normalize_agency_name("Agency (a (b) c) East"), "agency east");
        assert_eq!(normalize_agency_name("Agency ) East"), "agency east");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(normalize_agency_name(""), "");
        assert_eq!(normalize_agency_name("   "), "");
    }
}
