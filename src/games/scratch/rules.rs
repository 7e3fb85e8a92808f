//! Match detection.

use tracing::instrument;

use super::types::PrizeId;

/// Number of identical prizes needed to win.
pub const MATCH_SIZE: usize = 3;

/// Counts how often `prize` appears among the revealed prizes.
pub fn match_count(revealed: &[PrizeId], prize: &PrizeId) -> usize {
    revealed.iter().filter(|p| *p == prize).count()
}

/// Returns `Some(prize)` if the newly revealed prize completes a match.
///
/// Only the latest reveal can complete a match, so checking it alone is
/// enough to detect a win at the reveal that produces it.
#[instrument(skip(revealed), fields(revealed = revealed.len()))]
pub fn check_match<'a>(revealed: &[PrizeId], latest: &'a PrizeId) -> Option<&'a PrizeId> {
    (match_count(revealed, latest) >= MATCH_SIZE).then_some(latest)
}

/// Returns the first prize that appears at least [`MATCH_SIZE`] times.
pub fn find_match(revealed: &[PrizeId]) -> Option<&PrizeId> {
    revealed
        .iter()
        .find(|prize| match_count(revealed, prize) >= MATCH_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prizes(ids: &[&str]) -> Vec<PrizeId> {
        ids.iter().copied().map(PrizeId::from).collect()
    }

    #[test]
    fn test_no_match_with_pairs() {
        let revealed = prizes(&["a", "b", "a", "b"]);
        assert_eq!(check_match(&revealed, &PrizeId::from("a")), None);
        assert_eq!(find_match(&revealed), None);
    }

    #[test]
    fn test_third_occurrence_matches() {
        let revealed = prizes(&["a", "b", "a", "a"]);
        let latest = PrizeId::from("a");
        assert_eq!(check_match(&revealed, &latest), Some(&latest));
        assert_eq!(find_match(&revealed), Some(&PrizeId::from("a")));
    }

    #[test]
    fn test_match_count() {
        let revealed = prizes(&["x", "y", "x"]);
        assert_eq!(match_count(&revealed, &PrizeId::from("x")), 2);
        assert_eq!(match_count(&revealed, &PrizeId::from("z")), 0);
    }
}
