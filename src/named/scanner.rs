// Copyright (c) 2025 ADBC Drivers Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Single pass rewriting of `:name` placeholders into `?` markers.
//!
//! The scanner is purely lexical. It knows about quoted strings, quoted
//! identifiers, line comments and (non-nested) block comments, and treats
//! everything else as opaque text. It accepts any input and never fails.

use super::plan::ParameterTable;
use std::iter::Peekable;
use std::str::Chars;

/// Output of [`parse`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scan {
    /// The command with every named placeholder replaced by `?`.
    pub converted: String,
    /// Positions (1-based) occupied by each name in `converted`.
    pub table: ParameterTable,
    /// `?` markers already present in the source outside literals and comments.
    ///
    /// These are not counted when numbering named positions.
    pub literal_placeholders: usize,
}

/// Returns true if `c` may start a parameter name.
///
/// Names follow Unicode alphabetic rules: a letter or `_` to start, then
/// letters, digits or `_`.
pub fn is_identifier_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

/// Returns true if `c` may continue a parameter name.
pub fn is_identifier_part(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

/// Converts `source` into positional form.
///
/// `::` is never read as a parameter start, so casts such as `'1'::json`
/// survive untouched.
pub fn parse(source: &str) -> Scan {
    Scanner::new(source).run()
}

struct Scanner<'a> {
    chars: Peekable<Chars<'a>>,
    output: String,
    previous: Option<char>,
    table: ParameterTable,
    count: usize,
    literal_placeholders: usize,
}

impl<'a> Scanner<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars().peekable(),
            output: String::with_capacity(source.len()),
            previous: None,
            table: ParameterTable::default(),
            count: 0,
            literal_placeholders: 0,
        }
    }

    fn run(mut self) -> Scan {
        while let Some(c) = self.chars.next() {
            let peek = self.chars.peek().copied();
            match c {
                ':' if self.previous != Some(':') && peek.is_some_and(is_identifier_start) => {
                    self.parameter();
                }
                '\'' | '"' => {
                    self.copy(c);
                    self.quoted(c);
                }
                '-' if peek == Some('-') => {
                    self.copy(c);
                    self.line_comment();
                }
                '/' if peek == Some('*') => {
                    self.copy(c);
                    self.block_comment();
                }
                '?' => {
                    self.literal_placeholders += 1;
                    self.copy(c);
                }
                _ => self.copy(c),
            }
        }
        Scan {
            converted: self.output,
            table: self.table,
            literal_placeholders: self.literal_placeholders,
        }
    }

    fn copy(&mut self, c: char) {
        self.output.push(c);
        self.previous = Some(c);
    }

    /// Consumes and copies the next character.
    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.copy(c);
        Some(c)
    }

    fn quoted(&mut self, quote: char) {
        while let Some(c) = self.bump() {
            if c == quote {
                return;
            }
        }
    }

    fn line_comment(&mut self) {
        while let Some(c) = self.bump() {
            if matches!(c, '\n' | '\r') {
                return;
            }
        }
    }

    fn block_comment(&mut self) {
        // Opening '*'; it cannot also close the comment.
        self.bump();
        while let Some(c) = self.bump() {
            if c == '*' && self.chars.peek() == Some(&'/') {
                self.bump();
                return;
            }
        }
    }

    fn parameter(&mut self) {
        self.copy('?');
        let mut name = String::new();
        while let Some(&c) = self.chars.peek() {
            if !is_identifier_part(c) {
                break;
            }
            name.push(c);
            self.previous = Some(c);
            self.chars.next();
        }
        self.count += 1;
        self.table.record(name, self.count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions<'a>(scan: &'a Scan, name: &str) -> Option<&'a [usize]> {
        scan.table.positions(name)
    }

    #[test]
    fn test_repeated_names() {
        let scan = parse("SELECT :x, :y, :x");
        assert_eq!(scan.converted, "SELECT ?, ?, ?");
        assert_eq!(positions(&scan, "x"), Some(&[1, 3][..]));
        assert_eq!(positions(&scan, "y"), Some(&[2][..]));
        assert_eq!(positions(&scan, "z"), None);
    }

    #[test]
    fn test_quotes_and_casts() {
        let scan = parse("SELECT '1'::json, ':x', \":x\", :x");
        assert_eq!(scan.converted, "SELECT '1'::json, ':x', \":x\", ?");
        assert_eq!(positions(&scan, "x"), Some(&[1][..]));
        assert_eq!(positions(&scan, "json"), None);
    }

    #[test]
    fn test_line_comment() {
        let scan = parse("SELECT -1, --:x\n :x");
        assert_eq!(scan.converted, "SELECT -1, --:x\n ?");
        assert_eq!(positions(&scan, "x"), Some(&[1][..]));
    }

    #[test]
    fn test_block_comment() {
        let scan = parse("SELECT 1/2, /*:x/*:x */ :x");
        assert_eq!(scan.converted, "SELECT 1/2, /*:x/*:x */ ?");
        assert_eq!(positions(&scan, "x"), Some(&[1][..]));
    }

    #[test]
    fn test_empty() {
        let scan = parse("");
        assert_eq!(scan.converted, "");
        assert!(scan.table.is_empty());
    }

    #[test]
    fn test_cast_followed_by_identifier() {
        let scan = parse("SELECT a::text, b::int FROM t");
        assert_eq!(scan.converted, "SELECT a::text, b::int FROM t");
        assert!(scan.table.is_empty());
    }

    #[test]
    fn test_cast_of_parameter() {
        let scan = parse("SELECT :value::int");
        assert_eq!(scan.converted, "SELECT ?::int");
        assert_eq!(positions(&scan, "value"), Some(&[1][..]));
        assert_eq!(scan.table.len(), 1);
    }

    #[test]
    fn test_colon_without_identifier() {
        let scan = parse("SELECT ':' || x, a[1:2], :1, : y");
        assert_eq!(scan.converted, "SELECT ':' || x, a[1:2], :1, : y");
        assert!(scan.table.is_empty());
    }

    #[test]
    fn test_adjacent_parameters() {
        let scan = parse(":a:b");
        assert_eq!(scan.converted, "??");
        assert_eq!(positions(&scan, "a"), Some(&[1][..]));
        assert_eq!(positions(&scan, "b"), Some(&[2][..]));
    }

    #[test]
    fn test_name_characters() {
        let scan = parse("WHERE id = :user_id2) AND n = :_n");
        assert_eq!(scan.converted, "WHERE id = ?) AND n = ?");
        assert_eq!(positions(&scan, "user_id2"), Some(&[1][..]));
        assert_eq!(positions(&scan, "_n"), Some(&[2][..]));
    }

    #[test]
    fn test_unicode_names() {
        let scan = parse("SELECT :größe, 'é:x'");
        assert_eq!(scan.converted, "SELECT ?, 'é:x'");
        assert_eq!(positions(&scan, "größe"), Some(&[1][..]));
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let scan = parse("SELECT :Id, :id");
        assert_eq!(positions(&scan, "Id"), Some(&[1][..]));
        assert_eq!(positions(&scan, "id"), Some(&[2][..]));
        assert_eq!(positions(&scan, "ID"), None);
    }

    #[test]
    fn test_unterminated_literal() {
        let scan = parse("SELECT :a, 'open :b");
        assert_eq!(scan.converted, "SELECT ?, 'open :b");
        assert_eq!(scan.table.names().collect::<Vec<_>>(), vec!["a"]);
    }

    #[test]
    fn test_unterminated_comments() {
        let scan = parse("SELECT :a /* :b *");
        assert_eq!(scan.converted, "SELECT ? /* :b *");
        assert_eq!(scan.table.parameter_count(), 1);

        let scan = parse("SELECT :a -- :b");
        assert_eq!(scan.converted, "SELECT ? -- :b");
        assert_eq!(scan.table.parameter_count(), 1);
    }

    #[test]
    fn test_block_comment_stray_stars() {
        let scan = parse("/* a * b ** :x **/ :y /**/ :z /*/ :w */");
        assert_eq!(scan.converted, "/* a * b ** :x **/ ? /**/ ? /*/ :w */");
        assert_eq!(scan.table.names().collect::<Vec<_>>(), vec!["y", "z"]);
    }

    #[test]
    fn test_carriage_return_ends_line_comment() {
        let scan = parse("-- note\r\n:a");
        assert_eq!(scan.converted, "-- note\r\n?");
        assert_eq!(positions(&scan, "a"), Some(&[1][..]));
    }

    #[test]
    fn test_single_dash_and_slash() {
        let scan = parse("SELECT 4-:a, 8/:b");
        assert_eq!(scan.converted, "SELECT 4-?, 8/?");
        assert_eq!(scan.table.parameter_count(), 2);
    }

    #[test]
    fn test_literal_placeholders_are_not_numbered() {
        let scan = parse("SELECT ?, :a, '?', ?");
        assert_eq!(scan.converted, "SELECT ?, ?, '?', ?");
        assert_eq!(scan.literal_placeholders, 2);
        assert_eq!(positions(&scan, "a"), Some(&[1][..]));
    }

    #[test]
    fn test_positions_are_contiguous() {
        let scan = parse("INSERT INTO t VALUES (:a, :b, :a, :c, :b, :a)");
        let mut all: Vec<usize> = scan
            .table
            .iter()
            .flat_map(|(_, positions)| positions.iter().copied())
            .collect();
        all.sort_unstable();
        assert_eq!(all, (1..=6).collect::<Vec<_>>());
        assert_eq!(positions(&scan, "a"), Some(&[1, 3, 6][..]));
        assert_eq!(scan.converted.matches('?').count(), 6);
    }

    #[test]
    fn test_identity_without_parameters() {
        let source = "SELECT \"a:b\", 'c:d' -- :e\n/* :f */ FROM t WHERE x::int > 1";
        let scan = parse(source);
        assert_eq!(scan.converted, source);
        assert!(scan.table.is_empty());
    }
}
