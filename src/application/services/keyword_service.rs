//! Keyword auto-reply rules

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use crate::application::errors::{BotError, CommandError};
use crate::domain::traits::Store;

/// keyword -> reply
pub type KeywordTable = BTreeMap<String, String>;

pub struct KeywordService<S> {
    store: S,
    table: Mutex<KeywordTable>,
}

impl<S: Store<KeywordTable>> KeywordService<S> {
    pub fn new(store: S) -> Self {
        let table = store.load();
        tracing::info!("Loaded {} keyword replies", table.len());
        Self {
            store,
            table: Mutex::new(table),
        }
    }

    /// Adds or replaces a rule. Returns true when an existing rule was replaced.
    pub fn add(&self, keyword: &str, reply: &str) -> Result<bool, BotError> {
        let keyword = keyword.trim();
        let reply = reply.trim();
        if keyword.is_empty() {
            return Err(CommandError::InvalidArgs("keyword is empty".to_string()).into());
        }
        if reply.is_empty() {
            return Err(CommandError::InvalidArgs("reply is empty".to_string()).into());
        }

        let mut table = self.lock()?;
        let replaced = table
            .insert(keyword.to_string(), reply.to_string())
            .is_some();
        self.persist(&table);
        tracing::info!(keyword, replaced, "Keyword reply saved");
        Ok(replaced)
    }

    /// Returns false when no rule matched
    pub fn remove(&self, keyword: &str) -> Result<bool, BotError> {
        let mut table = self.lock()?;
        let removed = table.remove(keyword.trim()).is_some();
        if removed {
            self.persist(&table);
            tracing::info!(keyword, "Keyword reply removed");
        }
        Ok(removed)
    }

    /// All rules, ordered by keyword
    pub fn list(&self) -> Result<Vec<(String, String)>, BotError> {
        let table = self.lock()?;
        Ok(table.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }

    /// Reply for a message whose trimmed text equals a keyword
    pub fn lookup(&self, text: &str) -> Option<String> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        match self.lock() {
            Ok(table) => table.get(text).cloned(),
            Err(e) => {
                tracing::error!("Keyword lookup failed: {}", e);
                None
            }
        }
    }

    fn persist(&self, table: &KeywordTable) {
        if let Err(e) = self.store.save(table) {
            tracing::warn!("Keyword rules kept in memory only: {}", e);
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, KeywordTable>, BotError> {
        self.table
            .lock()
            .map_err(|_| BotError::Internal("keyword table lock poisoned".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::MemoryStore;
    use std::sync::Arc;

    fn service() -> (Arc<MemoryStore<KeywordTable>>, KeywordService<Arc<MemoryStore<KeywordTable>>>) {
        let store: Arc<MemoryStore<KeywordTable>> = Arc::new(MemoryStore::new());
        (store.clone(), KeywordService::new(store))
    }

    #[test]
    fn add_lookup_remove() {
        let (store, service) = service();
        assert!(!service.add(" hello ", "Hi there!").unwrap());
        assert_eq!(service.lookup("hello").as_deref(), Some("Hi there!"));
        assert_eq!(service.lookup("  hello\n").as_deref(), Some("Hi there!"));
        assert_eq!(service.lookup("hello world"), None);

        assert!(service.add("hello", "Yo").unwrap());
        assert_eq!(service.lookup("hello").as_deref(), Some("Yo"));

        assert!(service.remove("hello").unwrap());
        assert!(!service.remove("hello").unwrap());
        assert_eq!(service.lookup("hello"), None);
        assert_eq!(store.save_count(), 3);
    }

    #[test]
    fn rejects_empty_keyword_or_reply() {
        let (_, service) = service();
        assert!(matches!(
            service.add("  ", "reply"),
            Err(BotError::Command(CommandError::InvalidArgs(_)))
        ));
        assert!(service.add("kw", "").is_err());
        assert!(service.list().unwrap().is_empty());
    }

    #[test]
    fn list_is_sorted_and_rules_reload() {
        let (store, service) = service();
        service.add("zeta", "z").unwrap();
        service.add("alpha", "a").unwrap();
        let keys: Vec<_> = service.list().unwrap().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["alpha", "zeta"]);

        let reloaded = KeywordService::new(store);
        assert_eq!(reloaded.lookup("zeta").as_deref(), Some("z"));
    }
}
