/// Values of one input line, one per channel, plus the tokens that had to be zeroed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParsedRecord {
    pub values: Vec<f64>,
    pub rejected: Vec<String>,
}
impl ParsedRecord {
    pub fn width(&self) -> usize {
        self.values.len()
    }
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
/// Splits `line` on whitespace and converts every token to `f64`.
///
/// A token that does not parse is replaced with `0.0` and reported, so a single
/// garbled column never drops the rest of the record.
pub fn parse_record(line: &str) -> ParsedRecord {
    let mut record = ParsedRecord::default();
    for token in line.split_whitespace() {
        match token.parse::<f64>() {
            Ok(value) => record.values.push(value),
            Err(_) => {
                log::warn!("can't convert {token:?} to float, zeroed out");
                record.values.push(0.0);
                record.rejected.push(token.to_string());
            }
        }
    }
    record
}
#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn bad_token_becomes_zero() {
        let record = parse_record("1 abc 3");
        assert_eq!(record.values, vec![1.0, 0.0, 3.0]);
        assert_eq!(record.rejected, vec!["abc".to_string()]);
    }
    #[test]
    fn blank_lines_are_empty_records() {
        assert!(parse_record("").is_empty());
        assert!(parse_record(" \t\r\n").is_empty());
    }
    #[test]
    fn width_matches_token_count() {
        let lines = [
            "1 2 3",
            "  -4.5e2\t0x10  7  ",
            "nan inf -inf 3.25\r\n",
            "a b c d e",
        ];
        for line in lines {
            let record = parse_record(line);
            assert_eq!(record.width(), line.split_whitespace().count(), "{line:?}");
            let rejoined = record
                .values
                .iter()
                .map(f64::to_string)
                .collect::<Vec<_>>()
                .join(" ");
            assert_eq!(parse_record(&rejoined).width(), record.width());
            assert!(parse_record(&rejoined).rejected.is_empty());
        }
        let record = parse_record("  -4.5e2\t0x10  7  ");
        assert_eq!(record.values, vec![-450.0, 0.0, 7.0]);
        assert_eq!(record.rejected, vec!["0x10".to_string()]);
    }
}
