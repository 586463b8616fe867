//! Nearest-enclosing-symbol lookup.
//!
//! Given a target range and one file's symbols, pick the symbol whose scope
//! most tightly encloses the target. Used for relationship attachment,
//! modifier application, default-visibility inheritance, and formatter
//! grouping, always with the same smallest-line-span tie-break.

use crate::model::CodeSymbol;
use crate::span::Range;

/// Index of the nearest symbol enclosing `range`, if any.
///
/// Candidates are symbols whose `scope_range` contains the target; when
/// none exists, symbols *contained by* the target qualify instead (an
/// export statement wrapping a bare declaration encloses the declared
/// symbol rather than the other way around). Among candidates the one
/// spanning the fewest lines wins; ties keep the earliest symbol.
pub fn nearest_enclosing_index(range: &Range, symbols: &[CodeSymbol]) -> Option<usize> {
    nearest_enclosing_excluding(range, symbols, None)
}

/// Like [`nearest_enclosing_index`], skipping one index. A symbol's own
/// name range sits inside its own scope, so self-lookups (visibility
/// inheritance) must exclude the symbol being queried.
pub fn nearest_enclosing_excluding(
    range: &Range,
    symbols: &[CodeSymbol],
    exclude: Option<usize>,
) -> Option<usize> {
    let keep = |i: &usize| Some(*i) != exclude;

    let mut candidates: Vec<usize> = (0..symbols.len())
        .filter(keep)
        .filter(|&i| symbols[i].scope_range.contains(range))
        .collect();

    if candidates.is_empty() {
        candidates = (0..symbols.len())
            .filter(keep)
            .filter(|&i| range.contains(&symbols[i].scope_range))
            .collect();
    }

    candidates
        .into_iter()
        .min_by_key(|&i| symbols[i].scope_range.line_span())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SymbolKind;
    use crate::span::Pos;

    fn sym(name: &str, scope: Range) -> CodeSymbol {
        let range = Range::new(scope.start, scope.start);
        let mut s = CodeSymbol::new(1, name.into(), SymbolKind::Function, range, scope);
        s.id = format!("{}:{}", scope.start.line + 1, scope.start.column);
        s
    }

    fn range(sl: usize, sc: usize, el: usize, ec: usize) -> Range {
        Range::new(Pos::new(sl, sc), Pos::new(el, ec))
    }

    #[test]
    fn test_picks_smallest_enclosing_scope() {
        let symbols = vec![
            sym("outer", range(0, 0, 20, 1)),
            sym("inner", range(2, 2, 8, 3)),
        ];
        let target = range(4, 4, 4, 10);
        assert_eq!(nearest_enclosing_index(&target, &symbols), Some(1));
    }

    #[test]
    fn test_falls_back_to_contained_symbol() {
        // An export statement's range wraps the declaration it exports.
        let symbols = vec![sym("decl", range(3, 7, 3, 30))];
        let wrapping = range(3, 0, 3, 31);
        assert_eq!(nearest_enclosing_index(&wrapping, &symbols), Some(0));
    }

    #[test]
    fn test_no_candidates() {
        let symbols = vec![sym("a", range(0, 0, 1, 0))];
        assert_eq!(nearest_enclosing_index(&range(5, 0, 5, 4), &symbols), None);
    }

    #[test]
    fn test_exclusion_skips_self() {
        let symbols = vec![
            sym("class_like", range(0, 0, 10, 1)),
            sym("member", range(2, 2, 2, 20)),
        ];
        let member_range = range(2, 4, 2, 9);
        // Without exclusion the member's own one-line scope wins.
        assert_eq!(nearest_enclosing_index(&member_range, &symbols), Some(1));
        assert_eq!(
            nearest_enclosing_excluding(&member_range, &symbols, Some(1)),
            Some(0)
        );
    }
}
