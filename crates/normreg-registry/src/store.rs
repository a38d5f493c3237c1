//! Record stores
//!
//! The services talk to persistence through [`PlannedStore`],
//! [`ActiveStore`] and [`UserStore`]. The in-memory implementations here
//! enforce the same unique constraints a relational backend would: `code`
//! on both lists and `email` on users.

use crate::error::StoreError;
use normreg_model::{ActiveItem, ItemId, PlannedItem, User, UserId};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};

/// Planned-list persistence
pub trait PlannedStore: Send + Sync {
    /// Codes of the items whose `block` equals `block`
    fn codes_in_block(&self, block: &str) -> Result<Vec<String>, StoreError>;

    /// Number of stored items
    fn count(&self) -> Result<usize, StoreError>;

    /// Insert a new item; its `id` is assigned by the store
    ///
    /// Fails with [`StoreError::DuplicateCode`] when the code is taken.
    fn insert(&self, item: PlannedItem) -> Result<PlannedItem, StoreError>;

    /// Fetch by id
    fn get(&self, id: ItemId) -> Result<Option<PlannedItem>, StoreError>;

    /// Overwrite an existing item, keeping the code constraint
    fn update(&self, item: PlannedItem) -> Result<(), StoreError>;

    /// Delete by id, returning the removed item
    fn remove(&self, id: ItemId) -> Result<PlannedItem, StoreError>;

    /// Every stored item, in id order
    fn all(&self) -> Result<Vec<PlannedItem>, StoreError>;
}

/// Active-list persistence
pub trait ActiveStore: Send + Sync {
    /// Whether an item with `code` exists
    fn contains_code(&self, code: &str) -> Result<bool, StoreError>;

    /// Insert all items or none
    fn insert_batch(&self, items: Vec<ActiveItem>) -> Result<Vec<ActiveItem>, StoreError>;

    /// Every stored item, in id order
    fn all(&self) -> Result<Vec<ActiveItem>, StoreError>;
}

/// User persistence
pub trait UserStore: Send + Sync {
    /// Insert a user; e-mail must be unique
    fn insert(&self, user: User) -> Result<User, StoreError>;

    /// Fetch by id
    fn get(&self, id: UserId) -> Result<Option<User>, StoreError>;

    /// Overwrite an existing user; e-mail must stay unique
    fn update(&self, user: User) -> Result<(), StoreError>;

    /// Delete by id
    fn remove(&self, id: UserId) -> Result<User, StoreError>;

    /// Every stored user, in id order
    fn all(&self) -> Result<Vec<User>, StoreError>;
}

#[derive(Debug, Default)]
struct PlannedTable {
    next_id: u64,
    rows: BTreeMap<ItemId, PlannedItem>,
    codes: HashMap<String, ItemId>,
}

/// In-memory planned list
#[derive(Debug, Default)]
pub struct MemoryPlannedStore {
    inner: RwLock<PlannedTable>,
}

impl MemoryPlannedStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PlannedStore for MemoryPlannedStore {
    fn codes_in_block(&self, block: &str) -> Result<Vec<String>, StoreError> {
        let table = self.inner.read();
        Ok(table
            .rows
            .values()
            .filter(|item| item.block.as_deref() == Some(block))
            .map(|item| item.code.clone())
            .filter(|code| !code.is_empty())
            .collect())
    }

    fn count(&self) -> Result<usize, StoreError> {
        Ok(self.inner.read().rows.len())
    }

    fn insert(&self, mut item: PlannedItem) -> Result<PlannedItem, StoreError> {
        let mut table = self.inner.write();
        if table.codes.contains_key(&item.code) {
            return Err(StoreError::DuplicateCode { code: item.code });
        }

        table.next_id += 1;
        item.id = ItemId(table.next_id);
        table.codes.insert(item.code.clone(), item.id);
        table.rows.insert(item.id, item.clone());
        Ok(item)
    }

    fn get(&self, id: ItemId) -> Result<Option<PlannedItem>, StoreError> {
        Ok(self.inner.read().rows.get(&id).cloned())
    }

    fn update(&self, item: PlannedItem) -> Result<(), StoreError> {
        let mut table = self.inner.write();
        let old_code = match table.rows.get(&item.id) {
            Some(existing) => existing.code.clone(),
            None => return Err(StoreError::Missing(format!("planned item {}", item.id))),
        };

        if let Some(owner) = table.codes.get(&item.code) {
            if *owner != item.id {
                return Err(StoreError::DuplicateCode { code: item.code });
            }
        }

        table.codes.remove(&old_code);
        table.codes.insert(item.code.clone(), item.id);
        table.rows.insert(item.id, item);
        Ok(())
    }

    fn remove(&self, id: ItemId) -> Result<PlannedItem, StoreError> {
        let mut table = self.inner.write();
        let item = table
            .rows
            .remove(&id)
            .ok_or_else(|| StoreError::Missing(format!("planned item {id}")))?;
        table.codes.remove(&item.code);
        Ok(item)
    }

    fn all(&self) -> Result<Vec<PlannedItem>, StoreError> {
        Ok(self.inner.read().rows.values().cloned().collect())
    }
}

#[derive(Debug, Default)]
struct ActiveTable {
    next_id: u64,
    rows: BTreeMap<ItemId, ActiveItem>,
    codes: HashMap<String, ItemId>,
}

/// In-memory active list
#[derive(Debug, Default)]
pub struct MemoryActiveStore {
    inner: RwLock<ActiveTable>,
}

impl MemoryActiveStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ActiveStore for MemoryActiveStore {
    fn contains_code(&self, code: &str) -> Result<bool, StoreError> {
        Ok(self.inner.read().codes.contains_key(code))
    }

    fn insert_batch(&self, items: Vec<ActiveItem>) -> Result<Vec<ActiveItem>, StoreError> {
        let mut table = self.inner.write();

        // check the whole batch before touching the table
        let mut seen = std::collections::HashSet::new();
        for item in &items {
            if table.codes.contains_key(&item.code) || !seen.insert(item.code.as_str()) {
                return Err(StoreError::DuplicateCode {
                    code: item.code.clone(),
                });
            }
        }

        let mut inserted = Vec::with_capacity(items.len());
        for mut item in items {
            table.next_id += 1;
            item.id = ItemId(table.next_id);
            table.codes.insert(item.code.clone(), item.id);
            table.rows.insert(item.id, item.clone());
            inserted.push(item);
        }
        Ok(inserted)
    }

    fn all(&self) -> Result<Vec<ActiveItem>, StoreError> {
        Ok(self.inner.read().rows.values().cloned().collect())
    }
}

/// In-memory user directory
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    inner: RwLock<BTreeMap<UserId, User>>,
}

impl MemoryUserStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn email_taken(users: &BTreeMap<UserId, User>, email: &str, except: Option<UserId>) -> bool {
        users
            .values()
            .any(|u| Some(u.id) != except && u.email.eq_ignore_ascii_case(email))
    }
}

impl UserStore for MemoryUserStore {
    fn insert(&self, user: User) -> Result<User, StoreError> {
        let mut users = self.inner.write();
        if Self::email_taken(&users, &user.email, None) {
            return Err(StoreError::DuplicateEmail { email: user.email });
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    fn get(&self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(self.inner.read().get(&id).cloned())
    }

    fn update(&self, user: User) -> Result<(), StoreError> {
        let mut users = self.inner.write();
        if !users.contains_key(&user.id) {
            return Err(StoreError::Missing(format!("user {}", user.id)));
        }
        if Self::email_taken(&users, &user.email, Some(user.id)) {
            return Err(StoreError::DuplicateEmail { email: user.email });
        }
        users.insert(user.id, user);
        Ok(())
    }

    fn remove(&self, id: UserId) -> Result<User, StoreError> {
        self.inner
            .write()
            .remove(&id)
            .ok_or_else(|| StoreError::Missing(format!("user {id}")))
    }

    fn all(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.inner.read().values().cloned().collect())
    }
}
