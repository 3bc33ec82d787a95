//! Tests for the article service.

use std::sync::Arc;

use super::*;
use crate::domain::ports::MockArticleRepository;
use crate::domain::{ArticleStatus, ErrorCode, NewArticle, Role};
use crate::test_support::{MutableClock, fixture_timestamp, user_with_role};
use rstest::rstest;

fn make_service(repo: MockArticleRepository) -> ArticleService<MockArticleRepository> {
    ArticleService::new(
        Arc::new(repo),
        Arc::new(MutableClock::new(fixture_timestamp())),
    )
}

fn draft(title: &str) -> ArticleDraft {
    ArticleDraft {
        title: title.to_owned(),
        content: "Body text".to_owned(),
        category: "notes".to_owned(),
        ..ArticleDraft::default()
    }
}

fn stored_article(id: &str, owner: &User) -> Article {
    let new = draft(&format!("Article {id}"))
        .validate(ArticleAuthor::snapshot(owner), fixture_timestamp())
        .expect("valid draft");
    Article::from_new(DocumentId::new(id).expect("id"), new)
}

fn doc_id(id: &str) -> DocumentId {
    DocumentId::new(id).expect("id")
}

#[rstest]
#[case(None)]
#[case(Some(Role::Author))]
#[tokio::test]
async fn create_requires_editor(#[case] role: Option<Role>) {
    let service = make_service(MockArticleRepository::new());
    let caller = role.map(|role| user_with_role("3", role));

    let error = service
        .create(draft("Hello"), caller.as_ref())
        .await
        .expect_err("denied");
    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn create_snapshots_author_and_stamps_timestamps() {
    let editor = user_with_role("2", Role::Editor);
    let mut repo = MockArticleRepository::new();
    repo.expect_insert()
        .withf(|new: &NewArticle| {
            new.author.id.as_ref() == "2"
                && new.author.name == "User 2"
                && new.slug.as_ref() == "hello-world"
                && new.created_at == fixture_timestamp()
                && new.updated_at == new.created_at
        })
        .times(1)
        .return_once(|new| Ok(Article::from_new(DocumentId::new("a1").expect("id"), new)));

    let service = make_service(repo);
    let article = service
        .create(draft("Hello World"), Some(&editor))
        .await
        .expect("created");

    assert_eq!(article.views, 0);
    assert_eq!(article.title, "Hello World");
    assert_eq!(article.category, "notes");
    assert_eq!(article.status, ArticleStatus::Draft);
    assert!(article.created_at <= article.updated_at);
}

#[tokio::test]
async fn create_rejects_blank_title_before_reaching_store() {
    let admin = user_with_role("1", Role::Admin);
    let service = make_service(MockArticleRepository::new());

    let error = service
        .create(draft("   "), Some(&admin))
        .await
        .expect_err("invalid");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(
        error.details().and_then(|d| d.get("field")),
        Some(&json!("title"))
    );
}

#[tokio::test]
async fn create_surfaces_duplicate_slugs_as_validation_errors() {
    let editor = user_with_role("2", Role::Editor);
    let mut repo = MockArticleRepository::new();
    repo.expect_insert()
        .return_once(|new| Err(ArticleRepositoryError::duplicate_slug(new.slug.to_string())));

    let error = make_service(repo)
        .create(draft("Hello"), Some(&editor))
        .await
        .expect_err("duplicate");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(
        error.details(),
        Some(&json!({ "field": "slug", "code": "duplicate_slug" }))
    );
}

#[rstest]
#[case("3", true)]
#[case("4", false)]
#[tokio::test]
async fn authors_may_only_update_their_own_articles(#[case] owner_id: &str, #[case] allowed: bool) {
    let author = user_with_role("3", Role::Author);
    let owner = user_with_role(owner_id, Role::Author);
    let existing = stored_article("a1", &owner);
    let mut repo = MockArticleRepository::new();
    repo.expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(existing)));
    if allowed {
        repo.expect_replace()
            .times(1)
            .returning(|article| Ok(article.clone()));
    }

    let changes = ArticleChanges {
        title: Some("Edited".into()),
        ..ArticleChanges::default()
    };
    let result = make_service(repo)
        .update(&doc_id("a1"), changes, Some(&author))
        .await;

    match (allowed, result) {
        (true, Ok(article)) => {
            assert_eq!(article.title, "Edited");
            assert_eq!(article.author.id.as_ref(), owner_id);
        }
        (false, Err(err)) => assert_eq!(err.code(), ErrorCode::Forbidden),
        (true, Err(err)) => panic!("expected success, got {err:?}"),
        (false, Ok(article)) => panic!("expected denial, got {article:?}"),
    }
}

#[tokio::test]
async fn editors_may_update_any_article() {
    let editor = user_with_role("2", Role::Editor);
    let existing = stored_article("a1", &user_with_role("4", Role::Author));
    let mut repo = MockArticleRepository::new();
    repo.expect_find_by_id()
        .return_once(move |_| Ok(Some(existing)));
    repo.expect_replace()
        .withf(|article: &Article| article.status == ArticleStatus::Published)
        .returning(|article| Ok(article.clone()));

    let changes = ArticleChanges {
        status: Some(ArticleStatus::Published),
        ..ArticleChanges::default()
    };
    let article = make_service(repo)
        .update(&doc_id("a1"), changes, Some(&editor))
        .await
        .expect("updated");
    assert_eq!(article.published_at, Some(fixture_timestamp()));
}

#[tokio::test]
async fn anonymous_update_is_denied_without_lookup() {
    let service = make_service(MockArticleRepository::new());
    let error = service
        .update(&doc_id("a1"), ArticleChanges::default(), None)
        .await
        .expect_err("denied");
    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn update_of_unknown_article_is_not_found() {
    let editor = user_with_role("2", Role::Editor);
    let mut repo = MockArticleRepository::new();
    repo.expect_find_by_id().return_once(|_| Ok(None));

    let error = make_service(repo)
        .update(&doc_id("ghost"), ArticleChanges::default(), Some(&editor))
        .await
        .expect_err("missing");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn delete_is_idempotent() {
    let admin = user_with_role("1", Role::Admin);
    let mut repo = MockArticleRepository::new();
    let mut seq = mockall::Sequence::new();
    repo.expect_delete()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));
    repo.expect_delete()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|id| Err(ArticleRepositoryError::missing(id.to_string())));

    let service = make_service(repo);
    service
        .delete(&doc_id("a1"), Some(&admin))
        .await
        .expect("first delete");
    service
        .delete(&doc_id("a1"), Some(&admin))
        .await
        .expect("second delete is a no-op");
}

#[rstest]
#[case(None)]
#[case(Some(Role::Author))]
#[case(Some(Role::Editor))]
#[tokio::test]
async fn delete_requires_admin(#[case] role: Option<Role>) {
    let caller = role.map(|role| user_with_role("2", role));
    let error = make_service(MockArticleRepository::new())
        .delete(&doc_id("a1"), caller.as_ref())
        .await
        .expect_err("denied");
    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn delete_propagates_store_outages() {
    let admin = user_with_role("1", Role::Admin);
    let mut repo = MockArticleRepository::new();
    repo.expect_delete()
        .return_once(|_| Err(ArticleRepositoryError::connection("timeout")));

    let error = make_service(repo)
        .delete(&doc_id("a1"), Some(&admin))
        .await
        .expect_err("outage");
    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[tokio::test]
async fn listing_is_cached_until_a_mutation() {
    let editor = user_with_role("2", Role::Editor);
    let first = stored_article("a1", &editor);
    let mut repo = MockArticleRepository::new();
    repo.expect_list()
        .times(2)
        .returning(move || Ok(vec![first.clone()]));
    repo.expect_insert()
        .times(1)
        .return_once(|new| Ok(Article::from_new(DocumentId::new("a2").expect("id"), new)));

    let service = make_service(repo);
    assert_eq!(service.list().await.expect("list").len(), 1);
    assert_eq!(service.list().await.expect("cached").len(), 1);
    service
        .create(draft("Second"), Some(&editor))
        .await
        .expect("created");
    service.list().await.expect("reloaded");
}

#[tokio::test]
async fn listing_orders_by_publication_time() {
    let editor = user_with_role("2", Role::Editor);
    let mut unpublished = stored_article("draft", &editor);
    unpublished.published_at = None;
    let mut older = stored_article("older", &editor);
    older.published_at = Some(fixture_timestamp());
    let mut newer = stored_article("newer", &editor);
    newer.published_at = Some(fixture_timestamp() + chrono::Duration::days(1));
    let mut repo = MockArticleRepository::new();
    repo.expect_list()
        .return_once(move || Ok(vec![unpublished, older, newer]));

    let ids: Vec<String> = make_service(repo)
        .list()
        .await
        .expect("list")
        .into_iter()
        .map(|article| article.id.to_string())
        .collect();
    assert_eq!(ids, vec!["newer", "older", "draft"]);
}

#[tokio::test]
async fn malformed_slugs_are_simply_not_found() {
    let service = make_service(MockArticleRepository::new());
    assert_eq!(service.get_by_slug("Not A Slug").await.expect("lookup"), None);
    let error = service.record_view("Not A Slug").await.expect_err("missing");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn record_view_returns_new_total() {
    let mut repo = MockArticleRepository::new();
    repo.expect_increment_views()
        .withf(|slug: &Slug| slug.as_ref() == "hello")
        .return_once(|_| Ok(8));
    assert_eq!(
        make_service(repo).record_view("hello").await.expect("counted"),
        8
    );
}

#[tokio::test]
async fn record_view_on_unknown_slug_is_not_found() {
    let mut repo = MockArticleRepository::new();
    repo.expect_increment_views()
        .return_once(|slug| Err(ArticleRepositoryError::missing(slug.to_string())));
    let error = make_service(repo)
        .record_view("ghost")
        .await
        .expect_err("missing");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn query_failures_map_to_internal_errors() {
    let mut repo = MockArticleRepository::new();
    repo.expect_find_by_slug()
        .return_once(|_| Err(ArticleRepositoryError::query("syntax")));
    let error = make_service(repo)
        .get_by_slug("hello")
        .await
        .expect_err("failure");
    assert_eq!(error.code(), ErrorCode::InternalError);
}

fn memory_service() -> (
    Arc<crate::outbound::memory::MemoryArticleStore>,
    ArticleService<crate::outbound::memory::MemoryArticleStore>,
) {
    let store = Arc::new(crate::outbound::memory::MemoryArticleStore::new());
    let service = ArticleService::new(
        Arc::clone(&store),
        Arc::new(MutableClock::new(fixture_timestamp())),
    );
    (store, service)
}

#[tokio::test]
async fn created_article_reads_back_by_slug() {
    let (_, service) = memory_service();
    let editor = user_with_role("2", Role::Editor);
    let input = ArticleDraft {
        title: "Notes on Ownership".to_owned(),
        content: "Borrowing rules, briefly.".to_owned(),
        category: "rust".to_owned(),
        ..ArticleDraft::default()
    };

    let created = service
        .create(input.clone(), Some(&editor))
        .await
        .expect("created");
    let fetched = service
        .get_by_slug(created.slug.as_ref())
        .await
        .expect("lookup")
        .expect("article present");

    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.title, input.title);
    assert_eq!(fetched.content, input.content);
    assert_eq!(fetched.category, input.category);
    assert!(fetched.created_at <= fetched.updated_at);
    assert_eq!(fetched.views, 0);
}

#[tokio::test]
async fn refresh_picks_up_out_of_band_writes() {
    use crate::domain::ports::ArticleRepository;

    let (store, service) = memory_service();
    assert!(service.list().await.expect("initial list").is_empty());

    let editor = user_with_role("2", Role::Editor);
    let new = draft("Written elsewhere")
        .validate(ArticleAuthor::snapshot(&editor), fixture_timestamp())
        .expect("valid draft");
    store.insert(new).await.expect("direct insert");

    assert!(service.list().await.expect("cached list").is_empty());
    let refreshed = service.refresh().await.expect("refresh");
    assert_eq!(refreshed.len(), 1);
    assert_eq!(refreshed[0].title, "Written elsewhere");
}
