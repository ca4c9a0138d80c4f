//! Contract between the sync engine and the remote platform.

use std::fmt;

use async_trait::async_trait;

use crate::error::Result;
use crate::media::Post;

/// Opaque remote identifier of a collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionId(pub String);

impl fmt::Display for CollectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named, ordered group of saved posts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    pub id: CollectionId,
    pub name: String,
}

impl Collection {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: CollectionId(id.into()),
            name: name.into(),
        }
    }
}

/// One page of a collection feed.
///
/// `next_cursor == None` marks the final page.
#[derive(Debug, Clone, Default)]
pub struct FeedPage {
    pub items: Vec<Post>,
    pub next_cursor: Option<String>,
}

/// Identity and secret used to open a session.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// An authenticated session, threaded explicitly into every remote call.
#[derive(Clone)]
pub struct Session {
    pub username: String,
    pub user_id: Option<String>,
    pub(crate) secret: String,
}

impl Session {
    pub fn new(username: impl Into<String>, user_id: Option<String>, secret: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            user_id,
            secret: secret.into(),
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("username", &self.username)
            .field("user_id", &self.user_id)
            .finish_non_exhaustive()
    }
}

/// Remote collection source.
///
/// `login` fails with [`Error::Authentication`](crate::Error::Authentication);
/// the listing and paging calls fail with
/// [`Error::Transport`](crate::Error::Transport) or an HTTP error.
#[async_trait]
pub trait RemotePlatform: Send + Sync {
    /// Open a session for the given credentials.
    async fn login(&self, credentials: &Credentials) -> Result<Session>;

    /// List every collection of the account, in the platform's order.
    async fn list_collections(&self, session: &Session) -> Result<Vec<Collection>>;

    /// Fetch one page of a collection, starting at `cursor` (or the beginning).
    async fn fetch_collection_page(
        &self,
        session: &Session,
        collection: &CollectionId,
        cursor: Option<&str>,
    ) -> Result<FeedPage>;
}
