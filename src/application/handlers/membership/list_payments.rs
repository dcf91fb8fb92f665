//! ListPaymentsHandler - Query handler for a member's payments.

use std::sync::Arc;

use crate::domain::foundation::MemberId;
use crate::domain::membership::{MembershipError, Payment};
use crate::ports::{MembershipReader, Page, PageRequest};

/// Query for a member's payments. Paginated only if `page` or `limit` is set.
#[derive(Debug, Clone)]
pub struct ListPaymentsQuery {
    pub member_id: MemberId,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Payments newest `paid_on` first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentListing {
    All(Vec<Payment>),
    Paged(Page<Payment>),
}

/// Handler for listing payments.
pub struct ListPaymentsHandler {
    reader: Arc<dyn MembershipReader>,
}

impl ListPaymentsHandler {
    pub fn new(reader: Arc<dyn MembershipReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(
        &self,
        query: ListPaymentsQuery,
    ) -> Result<PaymentListing, MembershipError> {
        if self.reader.get_member(&query.member_id).await?.is_none() {
            return Err(MembershipError::MemberNotFound(query.member_id));
        }

        if query.page.is_none() && query.limit.is_none() {
            let all = self.reader.list_payments(&query.member_id, None).await?;
            return Ok(PaymentListing::All(all.data));
        }

        let request = PageRequest::new(query.page, query.limit);
        let page = self
            .reader
            .list_payments(&query.member_id, Some(request))
            .await?;
        Ok(PaymentListing::Paged(page))
    }
}
