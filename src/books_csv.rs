//! Loading books from headerless CSV files.
//!
//! Each row holds the eight `Book` fields in declaration order:
//! id, title, edition, copyright, language, pages, author, publisher.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use thiserror::Error;

use crate::shared_types::Book;

const COLUMNS: usize = 8;

#[derive(Debug, Error)]
pub enum CsvError {
    #[error("unable to read input file {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("unable to parse CSV: {0}")]
    Parse(#[from] csv::Error),
    #[error("line {line}: expected 8 columns, found {found}")]
    Columns { line: u64, found: usize },
}

pub fn read_books<R: Read>(reader: R) -> Result<Vec<Book>, CsvError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut books = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.len() != COLUMNS {
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            return Err(CsvError::Columns { line, found: record.len() });
        }
        let field = |i: usize| record[i].to_string();
        books.push(Book {
            id: field(0),
            title: field(1),
            edition: field(2),
            copyright: field(3),
            language: field(4),
            pages: field(5),
            author: field(6),
            publisher: field(7),
        });
    }
    Ok(books)
}

pub fn read_books_file(path: impl AsRef<Path>) -> Result<Vec<Book>, CsvError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| CsvError::Open {
        path: path.display().to_string(),
        source,
    })?;
    read_books(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rows_in_field_order() {
        let data = "\
1,Operating System Concepts,9th,2012,ENGLISH,976,Abraham Silberschatz,John Wiley & Sons
2,\"Computer Networks, A Top-Down Approach\",7th,2016,ENGLISH,864,James Kurose,Pearson
";
        let books = read_books(data.as_bytes()).unwrap();
        assert_eq!(books.len(), 2);
        assert_eq!(books[0].publisher, "John Wiley & Sons");
        assert_eq!(books[1].id, "2");
        assert_eq!(books[1].title, "Computer Networks, A Top-Down Approach");
        assert_eq!(books[1].pages, "864");
    }

    #[test]
    fn empty_fields_are_kept() {
        let books = read_books(",,,,,,,\n".as_bytes()).unwrap();
        assert_eq!(books, vec![Book::default()]);
    }

    #[test]
    fn short_row_reports_line() {
        let data = "1,a,b,c,d,e,f,g\n2,too,short\n";
        match read_books(data.as_bytes()) {
            Err(CsvError::Columns { line, found }) => {
                assert_eq!(line, 2);
                assert_eq!(found, 3);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn missing_file_names_path() {
        let path = std::env::temp_dir().join(format!("bookinfo_missing_{}.csv", uuid::Uuid::new_v4()));
        let err = read_books_file(&path).unwrap_err();
        assert!(matches!(err, CsvError::Open { .. }));
        assert!(err.to_string().contains(&path.display().to_string()));
    }

    #[test]
    fn reads_from_disk() {
        let path = std::env::temp_dir().join(format!("bookinfo_{}.csv", uuid::Uuid::new_v4()));
        std::fs::write(&path, "7,Title,1st,2020,ENGLISH,10,Someone,Press\n").unwrap();
        let books = read_books_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].author, "Someone");
    }
}
