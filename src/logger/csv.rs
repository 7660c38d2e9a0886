//! Minimal CSV codec for run tables.
//!
//! Rows are written with minimal quoting and `\r\n` terminators, the dialect
//! the offline tooling reads. Free-text fields may span several lines.

const DELIMITER: char = ',';
const QUOTE: char = '"';
const TERMINATOR: &str = "\r\n";

fn needs_quoting(field: &str) -> bool {
    field.contains([DELIMITER, QUOTE, '\n', '\r'])
}

fn push_field(line: &mut String, field: &str) {
    if needs_quoting(field) {
        line.push(QUOTE);
        for c in field.chars() {
            if c == QUOTE {
                line.push(QUOTE);
            }
            line.push(c);
        }
        line.push(QUOTE);
    } else {
        line.push_str(field);
    }
}

/// Renders one record, terminator included.
pub fn encode_row<S: AsRef<str>>(fields: &[S]) -> String {
    let mut line = String::new();
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            line.push(DELIMITER);
        }
        push_field(&mut line, field.as_ref());
    }
    line.push_str(TERMINATOR);
    line
}

/// Parses a whole table. Accepts `\n` and `\r\n` terminators and quoted
/// fields containing delimiters, quotes and newlines. Blank lines are skipped.
pub fn read_rows(input: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut field_started = false;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == QUOTE {
                if chars.peek() == Some(&QUOTE) {
                    field.push(QUOTE);
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
            continue;
        }

        match c {
            QUOTE if !field_started => {
                in_quotes = true;
                field_started = true;
            }
            DELIMITER => {
                row.push(std::mem::take(&mut field));
                field_started = false;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                if field_started || !field.is_empty() || !row.is_empty() {
                    row.push(std::mem::take(&mut field));
                    rows.push(std::mem::take(&mut row));
                }
                field_started = false;
            }
            _ => {
                field.push(c);
                field_started = true;
            }
        }
    }

    if field_started || !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_fields_are_unquoted() {
        assert_eq!(encode_row(&["2024-01-01 10:00:00", "J", "F"]), "2024-01-01 10:00:00,J,F\r\n");
    }

    #[test]
    fn special_fields_are_quoted() {
        let line = encode_row(&["t", "a, b", "say \"hi\"\nbye"]);
        assert_eq!(line, "t,\"a, b\",\"say \"\"hi\"\"\nbye\"\r\n");
    }

    #[test]
    fn empty_fields_survive() {
        let line = encode_row(&["t", "", ""]);
        assert_eq!(line, "t,,\r\n");
        assert_eq!(read_rows(&line), vec![vec!["t".to_string(), String::new(), String::new()]]);
    }

    #[test]
    fn reads_back_multiline_quoted_fields() {
        let mut table = encode_row(&["t1", "I keep 700;300,\nfinal", "ACCEPT"]);
        table.push_str(&encode_row(&["t2", "\"quoted\"", ""]));
        let rows = read_rows(&table);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][1], "I keep 700;300,\nfinal");
        assert_eq!(rows[1][1], "\"quoted\"");
        assert_eq!(rows[1][2], "");
    }

    #[test]
    fn quoted_fields_open_after_a_delimiter() {
        let row = ["2024-01-01 10:00:00", "I keep 700;300,\nfinal", "\"ACCEPT\", then done"];
        let rows = read_rows(&encode_row(&row));
        assert_eq!(rows, vec![row.to_vec()]);

        let trailing = read_rows("t,\"a,b\",\r\n");
        assert_eq!(trailing, vec![vec!["t", "a,b", ""]]);
    }

    #[test]
    fn accepts_unix_terminators_and_missing_final_newline() {
        let rows = read_rows("a,b,c\nd,e,f");
        assert_eq!(rows, vec![vec!["a", "b", "c"], vec!["d", "e", "f"]]);
    }
}
