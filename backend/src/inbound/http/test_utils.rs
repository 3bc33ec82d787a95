//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, Error, test, web};
use mockable::Clock;
use serde_json::json;
use url::Url;
use zeroize::Zeroizing;

use crate::Trace;
use crate::domain::ports::UserRepository;
use crate::domain::{DisplayName, Email, Role, User, UserId};
use crate::inbound::http::configure;
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::auth::{AccountDirectory, NewAccount};
use crate::outbound::memory::{
    MemoryArticleStore, MemoryMediaStore, MemoryPageStore, MemoryUserStore,
};
use crate::test_support::{MutableClock, fixture_timestamp};

/// Password every harness account is registered with.
pub const TEST_PASSWORD: &str = "password";

/// Cookie session middleware with a fresh key and plain-HTTP cookies.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// The `session` cookie set by `res`.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}

/// In-memory wiring of every adapter behind [`HttpState`].
pub struct TestHarness {
    pub state: HttpState,
    pub users: Arc<MemoryUserStore>,
    pub directory: Arc<AccountDirectory>,
    pub clock: Arc<MutableClock>,
}

impl TestHarness {
    pub fn new() -> Self {
        let users = Arc::new(MemoryUserStore::new());
        let directory = Arc::new(AccountDirectory::new());
        let clock = Arc::new(MutableClock::new(fixture_timestamp()));
        let media_base = Url::parse("http://localhost:8080/media/").expect("media base url");
        let state = HttpState::new(HttpStatePorts {
            articles: Arc::new(MemoryArticleStore::new()),
            pages: Arc::new(MemoryPageStore::new()),
            media: Arc::new(MemoryMediaStore::new(media_base)),
            users: Arc::clone(&users) as Arc<dyn UserRepository>,
            credentials: Arc::clone(&directory) as _,
            clock: Arc::clone(&clock) as _,
        });
        Self {
            state,
            users,
            directory,
            clock,
        }
    }

    /// App serving every API route over this harness.
    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse<impl MessageBody + use<>>,
            Error = Error,
            InitError = (),
        > + use<>,
    > {
        App::new()
            .app_data(web::Data::new(self.state.clone()))
            .wrap(test_session_middleware())
            .wrap(Trace)
            .configure(configure)
    }

    /// Register a directory account without a stored user record.
    pub async fn register(&self, email: &str, password: &str) -> UserId {
        self.directory
            .register(NewAccount {
                email: Email::new(email).expect("fixture email"),
                password: Zeroizing::new(password.to_owned()),
                display_name: None,
                photo_url: None,
            })
            .await
    }

    /// Register an account and store its user record with `role`, created
    /// at the harness clock's current time.
    pub async fn account(&self, email: &str, role: Role) -> User {
        let id = self.register(email, TEST_PASSWORD).await;
        let user = User::new(
            id,
            Some(Email::new(email).expect("fixture email")),
            DisplayName::new(email).expect("fixture name"),
            role,
            self.clock.utc(),
        );
        self.users
            .insert_if_absent(&user)
            .await
            .expect("store fixture user")
    }

    /// Remove a stored user record, leaving the account in place.
    pub async fn forget_user(&self, user: &User) {
        self.users.delete(user.id()).await.expect("delete fixture user");
    }

    /// Sign in through the API and return the session cookie.
    pub async fn login<S, B>(&self, app: &S, email: &str) -> Cookie<'static>
    where
        S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = Error>,
    {
        let req = test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({ "email": email, "password": TEST_PASSWORD }))
            .to_request();
        let res = test::call_service(app, req).await;
        assert!(res.status().is_success(), "login failed for {email}");
        session_cookie(&res)
    }
}
