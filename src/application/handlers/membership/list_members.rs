//! ListMembersHandler - Query handler for the paginated member listing.

use std::sync::Arc;

use crate::domain::membership::{MemberStatus, MembershipError};
use crate::ports::{MemberFilter, MemberView, MembershipReader, Page, PageRequest};

/// Query for the member listing.
#[derive(Debug, Clone, Default)]
pub struct ListMembersQuery {
    pub status: Option<MemberStatus>,
    pub name: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Handler for listing members.
///
/// Expired members come first, then soon-to-expire, then active.
pub struct ListMembersHandler {
    reader: Arc<dyn MembershipReader>,
}

impl ListMembersHandler {
    pub fn new(reader: Arc<dyn MembershipReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(
        &self,
        query: ListMembersQuery,
    ) -> Result<Page<MemberView>, MembershipError> {
        let filter = MemberFilter {
            status: query.status,
            name: query.name.filter(|n| !n.trim().is_empty()),
        };
        let page = PageRequest::new(query.page, query.limit);
        Ok(self.reader.list_members(&filter, page).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{today, Fixture};
    use chrono::Duration;

    fn handler(fx: &Fixture) -> ListMembersHandler {
        ListMembersHandler::new(Arc::new(fx.store.clone()))
    }

    async fn enroll_ending(fx: &Fixture, email: &str, name: &str, days_from_today: i64) {
        let plan = fx.plan("Monthly", "1000", 30).await;
        let mut cmd = fx.create_command(&plan, email, "0");
        cmd.name = name.to_string();
        cmd.start_date = today() - Duration::days(60);
        cmd.end_date = today() + Duration::days(days_from_today);
        fx.create_handler().handle(cmd).await.unwrap();
    }

    #[tokio::test]
    async fn orders_expired_then_soon_then_active() {
        let fx = Fixture::new();
        enroll_ending(&fx, "a@gym.test", "Active", 30).await;
        enroll_ending(&fx, "e@gym.test", "Expired", -3).await;
        enroll_ending(&fx, "s@gym.test", "Soon", 3).await;

        let page = handler(&fx).handle(ListMembersQuery::default()).await.unwrap();

        let names: Vec<_> = page.data.iter().map(|v| v.member.name.as_str()).collect();
        assert_eq!(names, vec!["Expired", "Soon", "Active"]);
        assert_eq!(page.total, 3);
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, 10);
    }

    #[tokio::test]
    async fn filters_by_status_and_name() {
        let fx = Fixture::new();
        enroll_ending(&fx, "a@gym.test", "Alice", 30).await;
        enroll_ending(&fx, "b@gym.test", "Bob", 30).await;
        enroll_ending(&fx, "c@gym.test", "Alina", -1).await;

        let page = handler(&fx)
            .handle(ListMembersQuery {
                status: Some(MemberStatus::Active),
                name: Some("ali".into()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(page.total, 1);
        assert_eq!(page.data[0].member.name, "Alice");
    }

    #[tokio::test]
    async fn paginates_and_caps_limit() {
        let fx = Fixture::new();
        for i in 0..3 {
            enroll_ending(&fx, &format!("m{}@gym.test", i), "Member", 30).await;
        }

        let second = handler(&fx)
            .handle(ListMembersQuery {
                page: Some(2),
                limit: Some(2),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(second.data.len(), 1);
        assert_eq!(second.total, 3);

        let capped = handler(&fx)
            .handle(ListMembersQuery {
                limit: Some(500),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(capped.limit, 100);
    }
}
