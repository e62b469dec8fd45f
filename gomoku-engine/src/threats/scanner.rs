use gomoku_core::{catalog_for, Board, Move, Player, DIRECTIONS};

/// Which shape a [`ThreatRecord`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternTag {
    SolidFour,
    SplitFour,
    OpenThree,
    SplitThree,
    BuildingTwo,
}

/// One occurrence of an opponent threat found by [`scan_board_threats`]
/// (spec.md §3's Threat Record, §4.5).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreatRecord {
    pub positions: Vec<Move>,
    pub direction: (i32, i32),
    /// The single cell that neutralizes a gapped pattern (split four, split
    /// three) by filling it.
    pub gap: Option<Move>,
    /// The cell(s) beyond either end of the pattern that would extend it
    /// (open three, building two, solid four). Empty when the pattern's own
    /// `gap` is the only relevant blocking cell.
    pub blocks: Vec<Move>,
    pub pattern: PatternTag,
}

/// Every opponent threat on the board, grouped by severity (spec.md §3).
#[derive(Debug, Clone, Default)]
pub struct ThreatReport {
    pub fours: Vec<ThreatRecord>,
    pub open_threes: Vec<ThreatRecord>,
    pub split_threes: Vec<ThreatRecord>,
    pub building_twos: Vec<ThreatRecord>,
}

impl ThreatReport {
    /// True iff playing at `m` would neutralize `record` — either by filling
    /// its gap or by occupying one of its extension cells.
    pub fn neutralizes(record: &ThreatRecord, m: Move) -> bool {
        record.gap == Some(m) || record.blocks.contains(&m)
    }

    pub fn any_four_blocked_by(&self, m: Move) -> bool {
        self.fours.iter().any(|r| Self::neutralizes(r, m))
    }

    pub fn any_open_three_blocked_by(&self, m: Move) -> bool {
        self.open_threes.iter().any(|r| Self::neutralizes(r, m))
    }

    pub fn any_split_three_blocked_by(&self, m: Move) -> bool {
        self.split_threes.iter().any(|r| Self::neutralizes(r, m))
    }

    pub fn any_building_two_blocked_by(&self, m: Move) -> bool {
        self.building_twos.iter().any(|r| Self::neutralizes(r, m))
    }
}

/// Scans every maximal line on the board (in all four directions) for
/// `opponent`'s threats (spec.md §4.5).
pub fn scan_board_threats(board: &Board, opponent: Player) -> ThreatReport {
    let mut report = ThreatReport::default();

    for &(dx, dy) in &DIRECTIONS {
        for (x, y) in line_starts(board, dx, dy) {
            let (cells, bytes) = trace_line(board, x, y, dx, dy);
            scan_line(&cells, &bytes, (dx, dy), opponent, &mut report);
        }
    }

    report
}

/// Cells at which stepping backward along `(dx, dy)` would leave the board
/// — the first cell of each maximal line in that direction.
fn line_starts(board: &Board, dx: i32, dy: i32) -> Vec<(u16, u16)> {
    let mut starts = Vec::new();
    for y in 0..board.height() {
        for x in 0..board.width() {
            let (px, py) = (x as i32 - dx, y as i32 - dy);
            if px < 0 || py < 0 || px as u16 >= board.width() || py as u16 >= board.height() {
                starts.push((x, y));
            }
        }
    }
    starts
}

fn trace_line(board: &Board, x: u16, y: u16, dx: i32, dy: i32) -> (Vec<(u16, u16)>, Vec<u8>) {
    let mut cells = Vec::new();
    let mut bytes = Vec::new();
    let (mut cx, mut cy) = (x as i32, y as i32);
    while cx >= 0 && cy >= 0 && (cx as u16) < board.width() && (cy as u16) < board.height() {
        let (ux, uy) = (cx as u16, cy as u16);
        cells.push((ux, uy));
        bytes.push(match board.get(ux, uy) {
            None => b'.',
            Some(p) => p.to_digit(),
        });
        cx += dx;
        cy += dy;
    }
    (cells, bytes)
}

fn scan_line(
    cells: &[(u16, u16)],
    bytes: &[u8],
    direction: (i32, i32),
    opponent: Player,
    report: &mut ThreatReport,
) {
    let cat = catalog_for(opponent);
    let digit = opponent.to_digit();
    let solid_four = [digit; 4];

    find_occurrences(bytes, &solid_four).for_each(|start| {
        let mut blocks = Vec::new();
        if start > 0 {
            blocks.push(cells[start - 1]);
        }
        if start + 4 < cells.len() {
            blocks.push(cells[start + 4]);
        }
        report.fours.push(ThreatRecord {
            positions: cells[start..start + 4].to_vec(),
            direction,
            gap: None,
            blocks,
            pattern: PatternTag::SolidFour,
        });
    });

    for variant in &cat.split_four {
        find_occurrences(bytes, variant.as_bytes()).for_each(|start| {
            let gap_offset = variant.find('.').expect("split_four variant has a gap");
            report.fours.push(ThreatRecord {
                positions: cells[start..start + variant.len()].to_vec(),
                direction,
                gap: Some(cells[start + gap_offset]),
                blocks: Vec::new(),
                pattern: PatternTag::SplitFour,
            });
        });
    }

    find_occurrences(bytes, cat.open_three.as_bytes()).for_each(|start| {
        let len = cat.open_three.len();
        report.open_threes.push(ThreatRecord {
            positions: cells[start..start + len].to_vec(),
            direction,
            gap: None,
            blocks: vec![cells[start], cells[start + len - 1]],
            pattern: PatternTag::OpenThree,
        });
    });

    for variant in &cat.split_three {
        find_occurrences(bytes, variant.as_bytes()).for_each(|start| {
            let gap_offset = variant.find('.').expect("split_three variant has a gap");
            report.split_threes.push(ThreatRecord {
                positions: cells[start..start + variant.len()].to_vec(),
                direction,
                gap: Some(cells[start + gap_offset]),
                blocks: Vec::new(),
                pattern: PatternTag::SplitThree,
            });
        });
    }

    find_occurrences(bytes, cat.open_two.as_bytes()).for_each(|start| {
        let len = cat.open_two.len();
        report.building_twos.push(ThreatRecord {
            positions: cells[start..start + len].to_vec(),
            direction,
            gap: None,
            blocks: vec![cells[start], cells[start + len - 1]],
            pattern: PatternTag::BuildingTwo,
        });
    });
}

fn find_occurrences<'a>(haystack: &'a [u8], needle: &'a [u8]) -> impl Iterator<Item = usize> + 'a {
    (0..haystack.len().saturating_sub(needle.len() - 1).max(0))
        .filter(move |&i| &haystack[i..i + needle.len()] == needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gomoku_core::Board;

    #[test]
    fn finds_open_three_with_both_blocks() {
        let mut board = Board::new(12, 12).unwrap();
        board.place_stone(5, 5, Player::Two).unwrap();
        board.place_stone(6, 5, Player::Two).unwrap();
        board.place_stone(7, 5, Player::Two).unwrap();

        let report = scan_board_threats(&board, Player::Two);
        let horizontal: Vec<_> = report
            .open_threes
            .iter()
            .filter(|r| r.direction == (1, 0))
            .collect();
        assert_eq!(horizontal.len(), 1);
        assert_eq!(horizontal[0].blocks, vec![(4, 5), (8, 5)]);
    }

    #[test]
    fn finds_split_four_gap() {
        let mut board = Board::new(12, 12).unwrap();
        for x in [2, 3, 5, 6] {
            board.place_stone(x, 4, Player::One).unwrap();
        }
        let report = scan_board_threats(&board, Player::One);
        let found = report
            .fours
            .iter()
            .find(|r| r.direction == (1, 0) && r.pattern == PatternTag::SplitFour);
        assert_eq!(found.unwrap().gap, Some((4, 4)));
    }

    #[test]
    fn finds_solid_four_with_no_gap() {
        let mut board = Board::new(12, 12).unwrap();
        for x in 2..6 {
            board.place_stone(x, 4, Player::One).unwrap();
        }
        let report = scan_board_threats(&board, Player::One);
        assert!(report
            .fours
            .iter()
            .any(|r| r.direction == (1, 0) && r.pattern == PatternTag::SolidFour));
    }

    #[test]
    fn scanning_twice_yields_equal_reports_up_to_order() {
        let mut board = Board::new(12, 12).unwrap();
        board.place_stone(5, 5, Player::Two).unwrap();
        board.place_stone(6, 6, Player::Two).unwrap();
        board.place_stone(7, 7, Player::Two).unwrap();

        let mut a = scan_board_threats(&board, Player::Two).open_threes;
        let mut b = scan_board_threats(&board, Player::Two).open_threes;
        a.sort_by_key(|r| r.positions.clone());
        b.sort_by_key(|r| r.positions.clone());
        assert_eq!(a, b);
    }
}
