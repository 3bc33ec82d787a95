//! Page use-cases.
//!
//! Page permissions are role-only, so checks run before any lookup.

use std::sync::Arc;

use mockable::Clock;
use serde_json::json;
use tracing::debug;

use crate::domain::listing_cache::ListingCache;
use crate::domain::page::sort_for_listing;
use crate::domain::permissions::{can_create_page, can_delete_page, can_update_page};
use crate::domain::ports::{PageRepository, PageRepositoryError};
use crate::domain::{DocumentId, Error, Page, PageChanges, PageDraft, Slug, User};

/// Page service over a [`PageRepository`].
pub struct PageService<R: ?Sized> {
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
    listing: ListingCache<Page>,
}

impl<R: ?Sized> PageService<R> {
    pub fn new(repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repo,
            clock,
            listing: ListingCache::new(),
        }
    }
}

impl<R> PageService<R>
where
    R: PageRepository + ?Sized,
{
    /// All pages in navigation order.
    pub async fn list(&self) -> Result<Vec<Page>, Error> {
        self.listing
            .get_or_load(|| async {
                let mut pages = self.repo.list().await.map_err(map_page_error)?;
                sort_for_listing(&mut pages);
                Ok(pages)
            })
            .await
    }

    pub async fn refresh(&self) -> Result<Vec<Page>, Error> {
        self.listing.invalidate().await;
        self.list().await
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Page>, Error> {
        let Ok(slug) = Slug::new(slug) else {
            return Ok(None);
        };
        self.repo.find_by_slug(&slug).await.map_err(map_page_error)
    }

    pub async fn get_by_id(&self, id: &DocumentId) -> Result<Option<Page>, Error> {
        self.repo.find_by_id(id).await.map_err(map_page_error)
    }

    pub async fn create(&self, draft: PageDraft, acting_user: Option<&User>) -> Result<Page, Error> {
        if !can_create_page(acting_user) {
            return Err(Error::forbidden("you are not allowed to create pages"));
        }
        let new = draft.validate(self.clock.utc())?;
        let page = self.repo.insert(new).await.map_err(map_page_error)?;
        self.listing.invalidate().await;
        debug!(page_id = %page.id, slug = %page.slug, "page created");
        Ok(page)
    }

    pub async fn update(
        &self,
        id: &DocumentId,
        changes: PageChanges,
        acting_user: Option<&User>,
    ) -> Result<Page, Error> {
        if !can_update_page(acting_user) {
            return Err(Error::forbidden("you are not allowed to update pages"));
        }
        let changes = changes.validate()?;
        let mut page = self
            .repo
            .find_by_id(id)
            .await
            .map_err(map_page_error)?
            .ok_or_else(|| Error::not_found(format!("page {id} not found")))?;
        page.apply(changes, self.clock.utc());
        let page = self.repo.replace(&page).await.map_err(map_page_error)?;
        self.listing.invalidate().await;
        debug!(page_id = %page.id, "page updated");
        Ok(page)
    }

    /// Delete a page. Deleting an unknown id succeeds.
    pub async fn delete(&self, id: &DocumentId, acting_user: Option<&User>) -> Result<(), Error> {
        if !can_delete_page(acting_user) {
            return Err(Error::forbidden("only admins may delete pages"));
        }
        match self.repo.delete(id).await {
            Ok(()) | Err(PageRepositoryError::Missing { .. }) => {}
            Err(err) => return Err(map_page_error(err)),
        }
        self.listing.invalidate().await;
        debug!(page_id = %id, "page deleted");
        Ok(())
    }
}

fn map_page_error(error: PageRepositoryError) -> Error {
    match error {
        PageRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("page repository unavailable: {message}"))
        }
        PageRepositoryError::Query { message } => {
            Error::internal(format!("page repository error: {message}"))
        }
        PageRepositoryError::Missing { id } => Error::not_found(format!("page {id} not found")),
        PageRepositoryError::DuplicateSlug { slug } => {
            Error::invalid_request(format!("slug {slug} is already in use"))
                .with_details(json!({ "field": "slug", "code": "duplicate_slug" }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockPageRepository;
    use crate::domain::{ErrorCode, NewPage, Role};
    use crate::test_support::{MutableClock, fixture_timestamp, user_with_role};
    use rstest::rstest;

    fn make_service(repo: MockPageRepository) -> PageService<MockPageRepository> {
        PageService::new(
            Arc::new(repo),
            Arc::new(MutableClock::new(fixture_timestamp())),
        )
    }

    fn stored_page(id: &str, order: i32) -> Page {
        let new = PageDraft {
            title: format!("Page {id}"),
            content: "body".into(),
            order,
            ..PageDraft::default()
        }
        .validate(fixture_timestamp())
        .expect("valid draft");
        Page::from_new(DocumentId::new(id).expect("id"), new)
    }

    #[tokio::test]
    async fn listing_is_ascending_by_order() {
        let mut repo = MockPageRepository::new();
        repo.expect_list()
            .return_once(|| Ok(vec![stored_page("first", 5), stored_page("second", 1)]));

        let pages = make_service(repo).list().await.expect("list");
        let ids: Vec<_> = pages.iter().map(|page| page.id.to_string()).collect();
        assert_eq!(ids, vec!["second", "first"]);
    }

    #[rstest]
    #[case(None)]
    #[case(Some(Role::Author))]
    #[tokio::test]
    async fn authoring_requires_editor(#[case] role: Option<Role>) {
        let caller = role.map(|role| user_with_role("3", role));
        let service = make_service(MockPageRepository::new());
        let draft = PageDraft {
            title: "About".into(),
            content: "Hi".into(),
            ..PageDraft::default()
        };

        let created = service.create(draft, caller.as_ref()).await;
        assert_eq!(created.expect_err("denied").code(), ErrorCode::Forbidden);
        let updated = service
            .update(
                &DocumentId::new("p1").expect("id"),
                PageChanges::default(),
                caller.as_ref(),
            )
            .await;
        assert_eq!(updated.expect_err("denied").code(), ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn create_stores_validated_page() {
        let editor = user_with_role("2", Role::Editor);
        let mut repo = MockPageRepository::new();
        repo.expect_insert()
            .withf(|new: &NewPage| new.slug.as_ref() == "about-me" && new.order == 3)
            .return_once(|new| Ok(Page::from_new(DocumentId::new("p1").expect("id"), new)));

        let page = make_service(repo)
            .create(
                PageDraft {
                    title: "About Me".into(),
                    content: "Hi".into(),
                    order: 3,
                    ..PageDraft::default()
                },
                Some(&editor),
            )
            .await
            .expect("created");
        assert_eq!(page.created_at, fixture_timestamp());
    }

    #[tokio::test]
    async fn update_of_unknown_page_is_not_found() {
        let editor = user_with_role("2", Role::Editor);
        let mut repo = MockPageRepository::new();
        repo.expect_find_by_id().return_once(|_| Ok(None));

        let error = make_service(repo)
            .update(
                &DocumentId::new("ghost").expect("id"),
                PageChanges::default(),
                Some(&editor),
            )
            .await
            .expect_err("missing");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn update_merges_and_invalidates_listing() {
        let editor = user_with_role("2", Role::Editor);
        let mut repo = MockPageRepository::new();
        repo.expect_list()
            .times(2)
            .returning(|| Ok(vec![stored_page("p1", 1)]));
        repo.expect_find_by_id()
            .return_once(|_| Ok(Some(stored_page("p1", 1))));
        repo.expect_replace()
            .withf(|page: &Page| page.order == 9)
            .returning(|page| Ok(page.clone()));

        let service = make_service(repo);
        service.list().await.expect("warm cache");
        let page = service
            .update(
                &DocumentId::new("p1").expect("id"),
                PageChanges {
                    order: Some(9),
                    ..PageChanges::default()
                },
                Some(&editor),
            )
            .await
            .expect("updated");
        assert_eq!(page.order, 9);
        service.list().await.expect("reloaded");
    }

    #[tokio::test]
    async fn delete_of_missing_page_succeeds_for_admins() {
        let admin = user_with_role("1", Role::Admin);
        let mut repo = MockPageRepository::new();
        repo.expect_delete()
            .times(2)
            .returning(|id| Err(PageRepositoryError::missing(id.to_string())));

        let service = make_service(repo);
        let id = DocumentId::new("ghost").expect("id");
        service.delete(&id, Some(&admin)).await.expect("no-op");
        service.delete(&id, Some(&admin)).await.expect("still a no-op");
    }

    #[tokio::test]
    async fn editors_may_not_delete_pages() {
        let editor = user_with_role("2", Role::Editor);
        let error = make_service(MockPageRepository::new())
            .delete(&DocumentId::new("p1").expect("id"), Some(&editor))
            .await
            .expect_err("denied");
        assert_eq!(error.code(), ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn refresh_reloads_a_warm_listing() {
        let mut repo = MockPageRepository::new();
        let mut seq = mockall::Sequence::new();
        repo.expect_list()
            .times(1)
            .in_sequence(&mut seq)
            .return_once(|| Ok(vec![stored_page("p1", 1)]));
        repo.expect_list()
            .times(1)
            .in_sequence(&mut seq)
            .return_once(|| Ok(vec![stored_page("p1", 1), stored_page("p2", 0)]));

        let service = make_service(repo);
        assert_eq!(service.list().await.expect("warm").len(), 1);
        assert_eq!(service.list().await.expect("cached").len(), 1);
        let ids: Vec<_> = service
            .refresh()
            .await
            .expect("refreshed")
            .iter()
            .map(|page| page.id.to_string())
            .collect();
        assert_eq!(ids, vec!["p2", "p1"]);
    }

    #[tokio::test]
    async fn created_page_reads_back_by_slug() {
        let store = Arc::new(crate::outbound::memory::MemoryPageStore::new());
        let service = PageService::new(
            Arc::clone(&store),
            Arc::new(MutableClock::new(fixture_timestamp())),
        );
        let editor = user_with_role("2", Role::Editor);
        let input = PageDraft {
            title: "About Me".into(),
            content: "Hello there.".into(),
            order: 3,
            ..PageDraft::default()
        };

        let created = service
            .create(input.clone(), Some(&editor))
            .await
            .expect("created");
        let fetched = service
            .get_by_slug(created.slug.as_ref())
            .await
            .expect("lookup")
            .expect("page present");

        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.title, input.title);
        assert_eq!(fetched.content, input.content);
        assert_eq!(fetched.order, input.order);
        assert!(fetched.created_at <= fetched.updated_at);
    }
}
