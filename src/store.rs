use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::StoreError;
use crate::shared_types::{Book, BookId};

/// Source of fresh book ids.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> Result<String, StoreError>;
}

/// Random (v4) UUIDs drawn from the OS entropy source.
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate(&self) -> Result<String, StoreError> {
        let mut bytes = [0u8; 16];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| StoreError::internal(format!("error while generating book id: {e}")))?;
        Ok(uuid::Builder::from_random_bytes(bytes).into_uuid().to_string())
    }
}

/// In-memory book records keyed by id.
///
/// Every key equals the `id` of the book stored under it. All access goes
/// through one mutex; no method holds it across anything but a single map call.
pub struct BookStore {
    books: Mutex<HashMap<String, Book>>,
    ids: Box<dyn IdGenerator>,
}

impl Default for BookStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BookStore {
    pub fn new() -> Self {
        Self::with_id_generator(UuidGenerator)
    }

    pub fn with_id_generator(ids: impl IdGenerator + 'static) -> Self {
        BookStore {
            books: Mutex::new(HashMap::new()),
            ids: Box::new(ids),
        }
    }

    // Each critical section is a single map operation, so a poisoned map is still consistent.
    fn books(&self) -> MutexGuard<'_, HashMap<String, Book>> {
        self.books.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store `book` under a new id. Any id the caller supplied is overwritten.
    pub fn create(&self, mut book: Book) -> Result<BookId, StoreError> {
        let id = self.ids.generate()?;
        book.id = id.clone();
        self.books().insert(id.clone(), book);
        Ok(BookId::from(id))
    }

    pub fn read(&self, id: &str) -> Result<Book, StoreError> {
        self.books()
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(id))
    }

    /// Replace the whole record named by `book.id`. Never inserts.
    pub fn update(&self, book: Book) -> Result<Book, StoreError> {
        let mut books = self.books();
        match books.get_mut(&book.id) {
            Some(stored) => {
                *stored = book.clone();
                Ok(book)
            }
            None => Err(StoreError::not_found(book.id)),
        }
    }

    pub fn delete(&self, id: &str) -> Result<Book, StoreError> {
        self.books()
            .remove(id)
            .ok_or_else(|| StoreError::not_found(id))
    }

    pub fn len(&self) -> usize {
        self.books().len()
    }

    pub fn is_empty(&self) -> bool {
        self.books().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn os_concepts() -> Book {
        Book {
            id: "1".to_string(),
            title: "Operating System Concepts".to_string(),
            edition: "9th".to_string(),
            copyright: "2012".to_string(),
            language: "ENGLISH".to_string(),
            pages: "976".to_string(),
            author: "Abraham Silberschatz".to_string(),
            publisher: "John Wiley & Sons".to_string(),
        }
    }

    struct BrokenEntropy;

    impl IdGenerator for BrokenEntropy {
        fn generate(&self) -> Result<String, StoreError> {
            Err(StoreError::internal("entropy source unavailable"))
        }
    }

    #[test]
    fn create_then_read_returns_same_fields_with_new_id() {
        let store = BookStore::new();
        let id = store.create(os_concepts()).unwrap();

        assert!(!id.value.is_empty());
        assert_ne!(id.value, "1");
        let stored = store.read(&id.value).unwrap();
        assert_eq!(stored, Book { id: id.value.clone(), ..os_concepts() });
    }

    #[test]
    fn generated_ids_are_uuids() {
        let store = BookStore::new();
        let id = store.create(Book::default()).unwrap();
        let parsed = uuid::Uuid::parse_str(&id.value).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
    }

    #[test]
    fn create_never_repeats_an_id() {
        let store = BookStore::new();
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            let id = store.create(Book::default()).unwrap();
            assert!(seen.insert(id.value), "duplicate id generated");
        }
        assert_eq!(store.len(), 10_000);
    }

    #[test]
    fn failed_id_generation_is_internal_and_stores_nothing() {
        let store = BookStore::with_id_generator(BrokenEntropy);
        let err = store.create(os_concepts()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert!(store.is_empty());
    }

    #[test]
    fn read_unknown_id_is_not_found() {
        let store = BookStore::new();
        let err = store.read("never-created").unwrap_err();
        assert_eq!(err, StoreError::not_found("never-created"));
    }

    #[test]
    fn returned_copy_does_not_alias_store() {
        let store = BookStore::new();
        let id = store.create(os_concepts()).unwrap();
        let mut copy = store.read(&id.value).unwrap();
        copy.title.push_str(" (defaced)");
        assert_eq!(store.read(&id.value).unwrap().title, "Operating System Concepts");
    }

    #[test]
    fn update_replaces_every_field() {
        let store = BookStore::new();
        let id = store.create(os_concepts()).unwrap();
        let replacement = Book {
            id: id.value.clone(),
            title: "Modern Operating Systems".to_string(),
            edition: "4th".to_string(),
            copyright: "2014".to_string(),
            language: "SPANISH".to_string(),
            pages: "1136".to_string(),
            author: "Andrew Tanenbaum".to_string(),
            publisher: "Pearson".to_string(),
        };

        assert_eq!(store.update(replacement.clone()).unwrap(), replacement);
        assert_eq!(store.read(&id.value).unwrap(), replacement);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn update_unknown_id_does_not_insert() {
        let store = BookStore::new();
        let err = store.update(Book { id: "ghost".to_string(), ..os_concepts() }).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.id(), Some("ghost"));
        assert!(store.is_empty());

        let err = store.update(Book { id: String::new(), ..os_concepts() }).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(store.is_empty());
    }

    #[test]
    fn delete_returns_record_and_removes_it() {
        let store = BookStore::new();
        let id = store.create(os_concepts()).unwrap();
        let before = store.read(&id.value).unwrap();

        assert_eq!(store.delete(&id.value).unwrap(), before);
        assert_eq!(store.read(&id.value).unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(store.delete(&id.value).unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn concurrent_creates_keep_keys_consistent() {
        let store = Arc::new(BookStore::new());
        let handles: Vec<_> = (0..8)
            .map(|n| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    (0..250)
                        .map(|i| {
                            let book = Book { title: format!("{n}-{i}"), ..Book::default() };
                            store.create(book).unwrap()
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let ids: Vec<BookId> = handles.into_iter().flat_map(|h| h.join().unwrap()).collect();
        assert_eq!(store.len(), 2_000);
        for id in ids {
            assert_eq!(store.read(&id.value).unwrap().id, id.value);
        }
    }
}
