//! Block parser for skillshot recording files.
//!
//! # File Grammar
//!
//! ```text
//! header      := name (WS name)+            // F = token count
//! label line  := integer                    // exactly one token
//! measurement := number (WS number){F-1}    // exactly F tokens
//! file        := header (label measurement*)*
//! ```
//!
//! There is no block-count header and no explicit delimiter: a line with a
//! single token is the only boundary signal. The parser is a two-state
//! machine:
//!
//! ```text
//!                    label line
//!  AwaitingLabel ───────────────────► AccumulatingRows ◄──┐
//!       │                                 │   │           │ measurement
//!       │ measurement                     │   └───────────┘
//!       ▼                                 │ label line
//!  FormatError                            └─► close block, open a new one
//! ```
//!
//! Any line that does not fit (wrong token count, non-numeric token, a row
//! before the first label) aborts the parse with a [`LoaderError::Format`]
//! naming the line. Trailing blank lines are ignored; a blank line followed by
//! more content is an error.
//!
//! # Example
//!
//! ```
//! use skillshot_loader::parser::parse_str;
//!
//! let parsed = parse_str("a b\n1\n1.0 2.0\n3.0 4.0\n-1\n5.0 6.0\n7\n").unwrap();
//! assert_eq!(parsed.header.feature_count(), 2);
//! assert_eq!(parsed.raw_labels(), vec![1, -1, 7]);
//! assert_eq!(parsed.max_timesteps(), 2);
//! ```

use crate::error::{LoaderError, Result};
use crate::schema::Header;
use std::fs;
use std::path::Path;

/// One undecoded block: the raw label and its measurement rows.
#[derive(Debug, Clone, PartialEq)]
pub struct RawBlock {
    /// Raw label code as written in the file
    pub label: i64,
    /// 1-based line number of the label line
    pub label_line: usize,
    /// Measurement rows, each exactly `F` values long
    pub rows: Vec<Vec<f64>>,
}

impl RawBlock {
    fn new(label: i64, label_line: usize) -> Self {
        Self {
            label,
            label_line,
            rows: Vec::new(),
        }
    }

    /// Number of timesteps `T_i` in this block.
    #[inline]
    pub fn timesteps(&self) -> usize {
        self.rows.len()
    }
}

/// Result of parsing a whole file.
#[derive(Debug, Clone)]
pub struct ParsedFile {
    /// Header read from line 1
    pub header: Header,
    /// Blocks in file order
    pub blocks: Vec<RawBlock>,
}

impl ParsedFile {
    /// Number of blocks (samples).
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Check whether the file had no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Raw label codes in file order.
    pub fn raw_labels(&self) -> Vec<i64> {
        self.blocks.iter().map(|b| b.label).collect()
    }

    /// `T_max`: the longest block, or 0 for an empty file.
    pub fn max_timesteps(&self) -> usize {
        self.blocks.iter().map(RawBlock::timesteps).max().unwrap_or(0)
    }

    /// Total number of measurement rows across all blocks.
    pub fn total_rows(&self) -> usize {
        self.blocks.iter().map(RawBlock::timesteps).sum()
    }
}

/// Parser state.
#[derive(Debug)]
enum ParserState {
    /// No label seen yet; only a label line is acceptable.
    AwaitingLabel,
    /// Inside a block; rows are appended until the next label line.
    AccumulatingRows(RawBlock),
}

/// Line-at-a-time parser for the body of a recording (everything after the header).
///
/// Usually driven through [`parse_str`] or [`load_file`]; exposed so the
/// boundary rule can be exercised line by line.
#[derive(Debug)]
pub struct BlockParser {
    feature_count: usize,
    state: ParserState,
    blocks: Vec<RawBlock>,
    /// First blank line seen since the last content line
    pending_blank: Option<(usize, String)>,
}

impl BlockParser {
    /// Create a parser expecting `feature_count` tokens per measurement row.
    pub fn new(feature_count: usize) -> Self {
        Self {
            feature_count,
            state: ParserState::AwaitingLabel,
            blocks: Vec::new(),
            pending_blank: None,
        }
    }

    /// Whether the parser is inside a block.
    pub fn in_block(&self) -> bool {
        matches!(self.state, ParserState::AccumulatingRows(_))
    }

    /// Number of blocks closed so far.
    pub fn closed_blocks(&self) -> usize {
        self.blocks.len()
    }

    /// Feed one line. `line_no` is 1-based and counts the header line.
    pub fn feed(&mut self, line_no: usize, line: &str) -> Result<()> {
        let tokens: Vec<&str> = line.split_whitespace().collect();

        if tokens.is_empty() {
            if self.pending_blank.is_none() {
                self.pending_blank = Some((line_no, line.to_string()));
            }
            return Ok(());
        }

        if let Some((blank_no, blank)) = self.pending_blank.take() {
            return Err(LoaderError::format(
                blank_no,
                &blank,
                "blank line inside data section",
            ));
        }

        if tokens.len() == 1 {
            let label = tokens[0].parse::<i64>().map_err(|e| {
                LoaderError::format(line_no, line, format!("label is not an integer: {e}"))
            })?;
            self.open_block(RawBlock::new(label, line_no));
            return Ok(());
        }

        let row = self.parse_row(line_no, line, &tokens)?;
        match &mut self.state {
            ParserState::AwaitingLabel => Err(LoaderError::format(
                line_no,
                line,
                "measurement row before the first label line",
            )),
            ParserState::AccumulatingRows(block) => {
                block.rows.push(row);
                Ok(())
            }
        }
    }

    /// Close the last open block and return all blocks in file order.
    pub fn finish(mut self) -> Vec<RawBlock> {
        if let ParserState::AccumulatingRows(block) =
            std::mem::replace(&mut self.state, ParserState::AwaitingLabel)
        {
            self.blocks.push(block);
        }
        self.blocks
    }

    fn open_block(&mut self, block: RawBlock) {
        let previous = std::mem::replace(&mut self.state, ParserState::AccumulatingRows(block));
        if let ParserState::AccumulatingRows(done) = previous {
            self.blocks.push(done);
        }
    }

    fn parse_row(&self, line_no: usize, line: &str, tokens: &[&str]) -> Result<Vec<f64>> {
        if tokens.len() != self.feature_count {
            return Err(LoaderError::format(
                line_no,
                line,
                format!(
                    "expected {} tokens, found {}",
                    self.feature_count,
                    tokens.len()
                ),
            ));
        }

        tokens
            .iter()
            .enumerate()
            .map(|(col, tok)| {
                let value = tok.parse::<f64>().map_err(|_| {
                    LoaderError::format(line_no, line, format!("column {col}: {tok:?} is not a number"))
                })?;
                if !value.is_finite() {
                    return Err(LoaderError::format(
                        line_no,
                        line,
                        format!("column {col}: non-finite value {tok:?}"),
                    ));
                }
                Ok(value)
            })
            .collect()
    }
}

/// Parse a complete recording held in memory.
pub fn parse_str(text: &str) -> Result<ParsedFile> {
    let mut lines = text.lines().enumerate().map(|(i, l)| (i + 1, l));

    let (header_no, header_line) = lines
        .next()
        .ok_or_else(|| LoaderError::format(1, "", "empty input: missing header line"))?;
    let header = Header::from_line(header_no, header_line)?;

    let mut parser = BlockParser::new(header.feature_count());
    for (line_no, line) in lines {
        parser.feed(line_no, line)?;
    }
    let blocks = parser.finish();

    log::debug!(
        "Parsed {} blocks ({} features, {} rows)",
        blocks.len(),
        header.feature_count(),
        blocks.iter().map(RawBlock::timesteps).sum::<usize>()
    );

    Ok(ParsedFile { header, blocks })
}

/// Read a recording from disk and parse it.
///
/// The file is read once in full and closed before parsing starts.
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<ParsedFile> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    log::info!("Loaded {} ({} bytes)", path.display(), text.len());
    parse_str(&text)
}
