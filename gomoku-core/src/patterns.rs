//! The Pattern Catalog (spec.md §3, §4.2): per-player string patterns
//! matched against line windows over the alphabet `{.,#,1,2}`. Built once
//! per process and immutable afterwards, mirroring
//! `original_source/src/game/constants.py::get_patterns`, with the
//! `split_three` patterns narrowed to the exact two variants spec.md names
//! in its Glossary (`PP.P`, `P.PP`) rather than the three-variant,
//! double-gap set the original Python carries — spec.md is authoritative
//! where the two disagree (spec.md §9).

use once_cell::sync::Lazy;

use crate::Player;

/// One player's full catalog of matchable patterns. `five`/`open_four`/
/// `open_three`/`open_two` are single literals; everything else is a list
/// because several distinct substrings count as "the same" shape (e.g. a
/// closed four can be blocked on either end).
#[derive(Debug, Clone)]
pub struct PatternSet {
    pub five: String,
    pub open_four: String,
    pub closed_four: Vec<String>,
    pub split_four: Vec<String>,
    pub open_three: String,
    pub closed_three: Vec<String>,
    pub split_three: Vec<String>,
    pub broken_open_three: Vec<String>,
    pub open_two: String,
    pub closed_two: Vec<String>,
}

fn build(player: Player) -> PatternSet {
    let p = player.to_digit() as char;
    let p1 = p.to_string();
    let p2 = p1.repeat(2);
    let p3 = p1.repeat(3);
    let p4 = p1.repeat(4);
    let p5 = p1.repeat(5);

    PatternSet {
        five: p5,
        open_four: format!(".{p4}."),
        closed_four: vec![
            format!("{p4}."),
            format!(".{p4}"),
            format!("{p3}.{p1}"),
            format!("{p2}.{p2}"),
        ],
        split_four: vec![format!("{p2}.{p2}"), format!("{p1}.{p3}"), format!("{p3}.{p1}")],
        open_three: format!(".{p3}."),
        closed_three: vec![
            format!("{p3}."),
            format!(".{p3}"),
            format!("{p2}.{p1}"),
            format!("{p1}.{p2}"),
        ],
        split_three: vec![format!("{p2}.{p1}"), format!("{p1}.{p2}")],
        broken_open_three: vec![format!(".{p2}.{p1}."), format!(".{p1}.{p2}.")],
        open_two: format!(".{p2}."),
        closed_two: vec![format!("{p2}."), format!(".{p2}"), format!("{p1}.{p1}")],
    }
}

static CATALOG: Lazy<[PatternSet; 2]> = Lazy::new(|| [build(Player::One), build(Player::Two)]);

/// The process-wide Pattern Catalog entry for `player`.
pub fn catalog_for(player: Player) -> &'static PatternSet {
    &CATALOG[player.to_index()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_stable_across_calls() {
        let a = catalog_for(Player::One) as *const _;
        let b = catalog_for(Player::One) as *const _;
        assert_eq!(a, b, "catalog should be a process-wide singleton");
    }

    #[test]
    fn five_is_five_in_a_row() {
        assert_eq!(catalog_for(Player::One).five, "11111");
        assert_eq!(catalog_for(Player::Two).five, "22222");
    }

    #[test]
    fn split_three_matches_glossary_exactly() {
        let cat = catalog_for(Player::One);
        assert_eq!(cat.split_three, vec!["11.1".to_string(), "1.11".to_string()]);
    }
}
