//! Catalog management: nature groups, main groups, and ledgers

use crate::traits::*;
use crate::types::*;

/// Resolve a textual ledger reference against storage.
///
/// Integer text is treated as an id and takes precedence; anything else is an
/// exact-name lookup. An unresolvable reference yields `None`, never an error.
pub(crate) async fn resolve_ledger<S: CatalogStorage>(
    storage: &S,
    reference: &str,
) -> JournalResult<Option<Ledger>> {
    let reference = reference.trim();
    if reference.is_empty() {
        return Ok(None);
    }
    match reference.parse::<i64>() {
        Ok(id) => storage.get_ledger(id).await,
        Err(_) => storage.ledger_by_name(reference).await,
    }
}

/// Catalog manager for the NatureGroup -> MainGroup -> Ledger hierarchy
pub struct CatalogManager<S: CatalogStorage> {
    storage: S,
    validator: Box<dyn CatalogValidator>,
}

impl<S: CatalogStorage> CatalogManager<S> {
    /// Create a new catalog manager
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            validator: Box::new(DefaultCatalogValidator),
        }
    }

    /// Create a new catalog manager with a custom validator
    pub fn with_validator(storage: S, validator: Box<dyn CatalogValidator>) -> Self {
        Self { storage, validator }
    }

    /// Create a nature group; the name must be unique ignoring case
    pub async fn create_nature_group(&mut self, name: &str) -> JournalResult<NatureGroup> {
        self.validator.validate_name(name)?;

        if let Some(existing) = self.storage.nature_group_by_name(name).await? {
            return Err(JournalError::Validation(format!(
                "nature group '{}' already exists as '{}'",
                name, existing.name
            )));
        }

        self.storage.insert_nature_group(name).await
    }

    /// Get a nature group by id
    pub async fn get_nature_group(&self, id: i64) -> JournalResult<Option<NatureGroup>> {
        self.storage.get_nature_group(id).await
    }

    /// List all nature groups
    pub async fn list_nature_groups(&self) -> JournalResult<Vec<NatureGroup>> {
        self.storage.list_nature_groups().await
    }

    /// Create a main group under an existing nature group
    pub async fn create_main_group(
        &mut self,
        name: &str,
        nature_group: i64,
    ) -> JournalResult<MainGroup> {
        self.validator.validate_name(name)?;

        if self.storage.get_nature_group(nature_group).await?.is_none() {
            return Err(JournalError::Validation(format!(
                "nature group {} does not exist",
                nature_group
            )));
        }

        self.storage.insert_main_group(name, nature_group).await
    }

    /// Get a main group by id
    pub async fn get_main_group(&self, id: i64) -> JournalResult<Option<MainGroup>> {
        self.storage.get_main_group(id).await
    }

    /// List all main groups
    pub async fn list_main_groups(&self) -> JournalResult<Vec<MainGroup>> {
        self.storage.list_main_groups().await
    }

    /// Create a ledger under an existing main group
    pub async fn create_ledger(&mut self, name: &str, group: i64) -> JournalResult<Ledger> {
        self.validator.validate_name(name)?;

        if self.storage.get_main_group(group).await?.is_none() {
            return Err(JournalError::Validation(format!(
                "main group {} does not exist",
                group
            )));
        }

        self.storage.insert_ledger(name, group).await
    }

    /// Get a ledger by id
    pub async fn get_ledger(&self, id: i64) -> JournalResult<Option<Ledger>> {
        self.storage.get_ledger(id).await
    }

    /// Get a ledger by id, returning an error if not found
    pub async fn get_ledger_required(&self, id: i64) -> JournalResult<Ledger> {
        self.storage
            .get_ledger(id)
            .await?
            .ok_or_else(|| JournalError::Validation(format!("ledger {} does not exist", id)))
    }

    /// List all ledgers
    pub async fn list_ledgers(&self) -> JournalResult<Vec<Ledger>> {
        self.storage.list_ledgers().await
    }

    /// Resolve a ledger from an id-or-name reference; `None` if unresolvable
    pub async fn resolve_ledger(&self, reference: &str) -> JournalResult<Option<Ledger>> {
        resolve_ledger(&self.storage, reference).await
    }

    /// Ledgers under the named main group
    pub async fn ledgers_by_group_name(&self, group_name: &str) -> JournalResult<Vec<Ledger>> {
        self.storage.ledgers_by_group_name(group_name).await
    }

    /// Ledgers whose name contains the fragment, ignoring case
    pub async fn ledgers_by_name_contains(&self, fragment: &str) -> JournalResult<Vec<Ledger>> {
        self.storage.ledgers_by_name_contains(fragment).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::memory_storage::MemoryStorage;

    async fn seeded() -> (MemoryStorage, Ledger) {
        let storage = MemoryStorage::new();
        let mut catalog = CatalogManager::new(storage.clone());
        let nature = catalog.create_nature_group("Income").await.unwrap();
        let group = catalog.create_main_group("Sales", nature.id).await.unwrap();
        let ledger = catalog.create_ledger("Counter Cash", group.id).await.unwrap();
        (storage, ledger)
    }

    #[tokio::test]
    async fn duplicate_nature_group_name_is_rejected_case_insensitively() {
        let storage = MemoryStorage::new();
        let mut catalog = CatalogManager::new(storage);
        catalog.create_nature_group("Expense").await.unwrap();

        let err = catalog.create_nature_group("EXPENSE").await.unwrap_err();
        assert!(matches!(err, JournalError::Validation(_)));
    }

    #[tokio::test]
    async fn resolve_prefers_id_over_name_for_integer_text() {
        let (storage, ledger) = seeded().await;
        let mut catalog = CatalogManager::new(storage);

        // A ledger literally named after a number is shadowed by id lookup.
        let group = ledger.group;
        catalog.create_ledger("99", group).await.unwrap();

        let by_id = catalog.resolve_ledger(&ledger.id.to_string()).await.unwrap();
        assert_eq!(by_id.unwrap().id, ledger.id);

        // "99" parses as an integer, so only an id match counts.
        let shadowed = catalog.resolve_ledger("99").await.unwrap();
        assert!(shadowed.is_none());
    }

    #[tokio::test]
    async fn resolve_falls_back_to_exact_name() {
        let (storage, ledger) = seeded().await;
        let catalog = CatalogManager::new(storage);

        let by_name = catalog.resolve_ledger("Counter Cash").await.unwrap();
        assert_eq!(by_name.unwrap().id, ledger.id);

        let missing = catalog.resolve_ledger("No Such Ledger").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn main_group_requires_existing_parent() {
        let storage = MemoryStorage::new();
        let mut catalog = CatalogManager::new(storage);

        let err = catalog.create_main_group("Orphan", 42).await.unwrap_err();
        assert!(matches!(err, JournalError::Validation(_)));
    }
}
