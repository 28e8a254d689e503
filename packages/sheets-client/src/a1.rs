//! A1 notation helpers.

/// Column letters for a 1-based column index: 1 → `A`, 27 → `AA`.
pub fn column_letters(column: usize) -> String {
    let mut n = column;
    let mut letters = Vec::new();

    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }

    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// Cell reference for 1-based coordinates: `(2, 4)` → `D2`.
pub fn cell_ref(row: usize, column: usize) -> String {
    format!("{}{}", column_letters(column), row)
}

/// Prefix a range with a quoted sheet title: `'Feuille 1'!D2`.
pub fn sheet_range(sheet_title: &str, range: &str) -> String {
    format!("'{}'!{}", sheet_title.replace('\'', "''"), range)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_letters() {
        assert_eq!(column_letters(1), "A");
        assert_eq!(column_letters(26), "Z");
        assert_eq!(column_letters(27), "AA");
        assert_eq!(column_letters(52), "AZ");
        assert_eq!(column_letters(703), "AAA");
    }

    #[test]
    fn test_cell_ref() {
        assert_eq!(cell_ref(2, 4), "D2");
        assert_eq!(cell_ref(120, 28), "AB120");
    }

    #[test]
    fn test_sheet_range_quotes_title() {
        assert_eq!(sheet_range("Sheet1", "A1"), "'Sheet1'!A1");
        assert_eq!(sheet_range("Base d'INSEE", "C3"), "'Base d''INSEE'!C3");
    }
}
