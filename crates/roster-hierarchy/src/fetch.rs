//! Paginated member fetching.

use roster_core::{AccessListMember, AccessListReader, Result};
use tracing::debug;

use crate::Hierarchy;

impl<R> Hierarchy<R>
where
    R: AccessListReader + ?Sized,
{
    /// Collects every direct member page of `access_list`.
    ///
    /// A missing list yields an empty membership rather than an error.
    pub(crate) async fn fetch_members(&self, access_list: &str) -> Result<Vec<AccessListMember>> {
        let mut members = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let page = match self
                .reader
                .list_access_list_members(access_list, self.config.page_size, page_token.as_deref())
                .await
            {
                Ok(page) => page,
                Err(e) if e.is_not_found() => {
                    debug!(access_list, "access list not found, treating as empty");
                    break;
                }
                Err(e) => return Err(e),
            };

            members.extend(page.items);
            match page.next_token {
                Some(next) if !next.is_empty() => page_token = Some(next),
                _ => break,
            }
        }

        Ok(members)
    }
}
