use crate::Cell;
use regex::Regex;
use std::sync::OnceLock;

/// Largest row or column a decoded pattern may reach
const MAX_EXTENT: usize = u32::MAX as usize;
/// Largest number of live cells a decoded pattern may hold
const MAX_CELLS: usize = 1 << 24;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("unexpected {found:?} on line {line}")]
    UnexpectedToken { line: usize, found: String },
    #[error("run count {0:?} is too large")]
    InvalidRun(String),
    #[error("invalid header {0:?}")]
    InvalidHeader(String),
    #[error("unknown pattern {0:?}")]
    UnknownPattern(String),
}

/// A set of live cells inside a `width` x `height` bounding box
///
/// Cell coordinates are relative to the top-left corner of the box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    cells: Vec<Cell>,
    width: usize,
    height: usize,
}

impl Pattern {
    /// Creates a pattern, growing the bounding box if a cell lies outside it
    pub fn new(mut cells: Vec<Cell>, width: usize, height: usize) -> Self {
        cells.sort();
        cells.dedup();
        let width = cells.iter().map(|c| c.col + 1).fold(width, usize::max);
        let height = cells.iter().map(|c| c.row + 1).fold(height, usize::max);
        Self {
            cells,
            width,
            height,
        }
    }

    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Decodes run-length encoded (RLE) pattern text
    ///
    /// `#` starts a comment that runs to the end of the line. The optional
    /// `x = .., y = ..` header sets the minimum bounding box; without it the box
    /// is taken from the cells themselves.
    pub fn from_rle(value: &str) -> Result<Self, PatternError> {
        static TOKEN: OnceLock<Regex> = OnceLock::new();
        static HEADER: OnceLock<Regex> = OnceLock::new();
        let re = TOKEN.get_or_init(|| Regex::new(r"\s*(\d*)([bo$!])").expect("valid token regex"));
        let header = HEADER
            .get_or_init(|| Regex::new(r"x\s*=\s*(\d+)\s*,\s*y\s*=\s*(\d+)").expect("valid header regex"));

        let mut alive = Vec::new();
        let mut cursor = Cell::default();
        let (mut width, mut height) = (0, 0);
        'lines_loop: for (line_no, mut line) in value.lines().enumerate() {
            if let Some(i) = line.find('#') {
                line = &line[..i];
            }
            if line.trim_start().starts_with('x') {
                if let Some(caps) = header.captures(line) {
                    let (_, [x, y]) = caps.extract();
                    let size = |v: &str| {
                        v.parse::<usize>()
                            .ok()
                            .filter(|&n| n <= MAX_EXTENT)
                            .ok_or_else(|| PatternError::InvalidHeader(line.trim().to_owned()))
                    };
                    width = size(x)?;
                    height = size(y)?;
                }
                continue;
            }

            let mut rest = line;
            while !rest.trim().is_empty() {
                let Some(caps) = re.captures(rest).filter(|c| c.get(0).map_or(0, |m| m.start()) == 0) else {
                    return Err(PatternError::UnexpectedToken {
                        line: line_no + 1,
                        found: rest.trim().chars().take(8).collect(),
                    });
                };
                let (whole, [run_str, state]) = caps.extract();
                rest = &rest[whole.len()..];

                let run = match run_str {
                    "" => 1,
                    s => s
                        .parse::<usize>()
                        .map_err(|_| PatternError::InvalidRun(s.to_owned()))?,
                };
                let too_large = || PatternError::InvalidRun(run.to_string());
                let forward = |pos: usize| {
                    pos.checked_add(run)
                        .filter(|&end| end <= MAX_EXTENT)
                        .ok_or_else(too_large)
                };
                match state {
                    "!" => break 'lines_loop,
                    "o" => {
                        let end = forward(cursor.col)?;
                        if alive.len().saturating_add(run) > MAX_CELLS {
                            return Err(too_large());
                        }
                        let row = cursor.row;
                        alive.extend((cursor.col..end).map(|col| Cell::new(row, col)));
                        cursor.col = end;
                    }
                    "b" => cursor.col = forward(cursor.col)?,
                    "$" => {
                        cursor.row = forward(cursor.row)?;
                        cursor.col = 0;
                    }
                    _ => unreachable!(),
                }
            }
        }

        Ok(Self::new(alive, width, height))
    }

    /// Encodes the pattern as RLE text with a `x = .., y = .., rule = B3/S23` header
    pub fn to_rle(&self) -> String {
        format!(
            "x = {}, y = {}, rule = B3/S23\n{}\n",
            self.width,
            self.height,
            self.encode_cells()
        )
    }

    fn encode_cells(&self) -> String {
        let mut last: Option<Cell> = None;
        let mut alive_run = 0;
        let mut seq = RunEncoder::new(70);
        for &cell in &self.cells {
            // extend the run if this cell is right after the last one
            if let Some(prev) = last {
                if prev.row == cell.row && prev.col + 1 == cell.col {
                    alive_run += 1;
                    last = Some(cell);
                    continue;
                }
            }

            let (lines_run, dead_run) = match last {
                Some(prev) if prev.row == cell.row => (0, cell.col - prev.col - 1),
                Some(prev) => (cell.row - prev.row, cell.col),
                None => (cell.row, cell.col),
            };
            // NOTE: order matters!
            seq.push_run(alive_run, 'o');
            seq.push_run(lines_run, '$');
            seq.push_run(dead_run, 'b');

            alive_run = 1;
            last = Some(cell);
        }

        seq.push_run(alive_run, 'o');
        seq.end()
    }
}

struct RunEncoder {
    sequence: String,
    line_len: usize,
    max_line_len: usize,
}
impl RunEncoder {
    fn new(max_line_len: usize) -> Self {
        Self {
            sequence: String::new(),
            line_len: 0,
            max_line_len,
        }
    }

    fn push_run(&mut self, run: usize, c: char) {
        let append = match run {
            0 => return,
            1 => c.to_string(),
            n => format!("{}{}", n, c),
        };
        if self.line_len + append.len() > self.max_line_len {
            self.sequence.push('\n');
            self.line_len = 0;
        }
        self.line_len += append.len();
        self.sequence.push_str(&append);
    }

    fn end(mut self) -> String {
        self.sequence.push('!');
        self.sequence
    }
}

/// Named patterns that can seed a grid
pub const BUILTIN_PATTERNS: &[(&str, &str)] = &[
    ("block", "2o$2o!"),
    ("blinker", "3o!"),
    ("glider", "bo$2bo$3o!"),
    ("toad", "b3o$3o!"),
    ("beacon", "2o$o$3bo$2b2o!"),
    ("r-pentomino", "b2o$2o$bo!"),
];

/// Looks up and decodes one of [`BUILTIN_PATTERNS`]
pub fn builtin(name: &str) -> Result<Pattern, PatternError> {
    BUILTIN_PATTERNS
        .iter()
        .find(|(n, _)| *n == name)
        .ok_or_else(|| PatternError::UnknownPattern(name.to_owned()))
        .and_then(|(_, rle)| Pattern::from_rle(rle))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(list: &[(usize, usize)]) -> Vec<Cell> {
        list.iter().map(|&(r, c)| Cell::new(r, c)).collect()
    }

    #[test]
    fn decodes_glider_with_header_and_comments() {
        let text = "#N Glider\n# a comment\nx = 3, y = 3, rule = B3/S23\nbo$2bo$3o!\n";
        let pattern = Pattern::from_rle(text).unwrap();

        assert_eq!(
            pattern.cells(),
            cells(&[(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)]).as_slice()
        );
        assert_eq!((pattern.width(), pattern.height()), (3, 3));
    }

    #[test]
    fn decodes_across_lines_and_stops_at_bang() {
        let pattern = Pattern::from_rle("2o\n2$o!\n3o").unwrap();
        assert_eq!(pattern.cells(), cells(&[(0, 0), (0, 1), (2, 0)]).as_slice());
    }

    #[test]
    fn rejects_unknown_tokens() {
        let err = Pattern::from_rle("bo$2xo!").unwrap_err();
        assert!(matches!(err, PatternError::UnexpectedToken { line: 1, .. }));
    }

    #[test]
    fn rejects_runs_past_the_largest_extent() {
        let err = Pattern::from_rle("18446744073709551615b2o!").unwrap_err();
        assert_eq!(err, PatternError::InvalidRun("18446744073709551615".into()));

        let err = Pattern::from_rle("o$4294967295$o!").unwrap_err();
        assert!(matches!(err, PatternError::InvalidRun(_)));
    }

    #[test]
    fn rejects_runs_with_too_many_cells() {
        let err = Pattern::from_rle("99999999999o!").unwrap_err();
        assert!(matches!(err, PatternError::InvalidRun(_)));

        // fits the extent but not the cell budget
        let err = Pattern::from_rle("4000000000o!").unwrap_err();
        assert_eq!(err, PatternError::InvalidRun("4000000000".into()));
    }

    #[test]
    fn rejects_oversized_header() {
        let err = Pattern::from_rle("x = 99999999999999999999999, y = 2\no!").unwrap_err();
        assert!(matches!(err, PatternError::InvalidHeader(_)));
    }

    #[test]
    fn encodes_with_gaps_and_blank_rows() {
        let pattern = Pattern::new(cells(&[(0, 1), (0, 2), (0, 5), (2, 0)]), 6, 3);
        assert_eq!(pattern.to_rle(), "x = 6, y = 3, rule = B3/S23\nb2o2bo2$o!\n");
    }

    #[test]
    fn encoding_decodes_back() {
        let glider = builtin("glider").unwrap();
        assert_eq!(Pattern::from_rle(&glider.to_rle()).unwrap(), glider);
    }

    #[test]
    fn long_runs_wrap_lines() {
        let pattern = Pattern::new((0..60).map(|c| Cell::new(0, c * 2)).collect(), 120, 1);
        let rle = pattern.to_rle();
        assert!(rle.lines().all(|l| l.len() <= 70));
        assert_eq!(Pattern::from_rle(&rle).unwrap(), pattern);
    }

    #[test]
    fn new_grows_bounding_box() {
        let pattern = Pattern::new(cells(&[(3, 4), (0, 0), (3, 4)]), 1, 1);
        assert_eq!((pattern.width(), pattern.height()), (5, 4));
        assert_eq!(pattern.cells().len(), 2);
    }

    #[test]
    fn builtins_all_decode() {
        for (name, _) in BUILTIN_PATTERNS {
            let pattern = builtin(name).unwrap();
            assert!(!pattern.cells().is_empty(), "{name} is empty");
        }
        assert_eq!(
            builtin("nope").unwrap_err(),
            PatternError::UnknownPattern("nope".into())
        );
    }
}
