//! Staff account listing.

use std::sync::Arc;

use crate::domain::user::{StaffUser, UserError};
use crate::ports::{Page, PageRequest, UserRepository};

/// Query for one page of accounts; missing values take the usual defaults.
#[derive(Debug, Clone, Default)]
pub struct ListUsersQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Handler listing accounts newest first.
pub struct ListUsersHandler {
    users: Arc<dyn UserRepository>,
}

impl ListUsersHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn handle(&self, query: ListUsersQuery) -> Result<Page<StaffUser>, UserError> {
        let request = PageRequest::new(query.page, query.limit);
        Ok(self.users.list(request).await?)
    }
}
