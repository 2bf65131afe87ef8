use anyhow::Context;
use async_trait::async_trait;
use mongodb::{
    bson::doc,
    error::{ErrorKind, WriteFailure},
    options::{CountOptions, IndexOptions},
    Client, Collection, IndexModel,
};
use tracing::{debug, info};

use crate::auth::repo_types::{User, UserDocument};
use crate::config::AppConfig;

const USERS_COLLECTION: &str = "users";
const DUPLICATE_KEY_CODE: i32 = 11000;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("a user with this email already exists")]
    DuplicateEmail,
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Collection-level access to persisted users.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn email_exists(&self, email: &str) -> Result<bool, StoreError>;
    async fn insert(&self, user: &User) -> Result<(), StoreError>;
}

pub struct MongoUserStore {
    client: Client,
    users: Collection<UserDocument>,
}

impl MongoUserStore {
    /// Connects, checks the server answers, and makes sure `email` is uniquely indexed.
    pub async fn connect(config: &AppConfig) -> anyhow::Result<Self> {
        let client = Client::with_uri_str(&config.database_url)
            .await
            .context("parse mongodb uri")?;
        let db = client.database(&config.database_name);
        db.run_command(doc! { "ping": 1 }, None)
            .await
            .context("ping mongodb")?;

        let users = db.collection::<UserDocument>(USERS_COLLECTION);
        let index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        users
            .create_index(index, None)
            .await
            .context("create unique index on users.email")?;

        info!(database = %config.database_name, "connected to mongodb");
        Ok(Self { client, users })
    }

    pub async fn shutdown(&self) {
        self.client.clone().shutdown().await;
        info!("mongodb client disconnected");
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        &*err.kind,
        ErrorKind::Write(WriteFailure::WriteError(w)) if w.code == DUPLICATE_KEY_CODE
    )
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn email_exists(&self, email: &str) -> Result<bool, StoreError> {
        // Presence only; older documents may carry an ObjectId `_id`.
        let opts = CountOptions::builder().limit(1).build();
        let n = self
            .users
            .count_documents(doc! { "email": email }, opts)
            .await
            .context("mongodb count_documents users")?;
        Ok(n > 0)
    }

    async fn insert(&self, user: &User) -> Result<(), StoreError> {
        let doc = UserDocument::from(user);
        match self.users.insert_one(&doc, None).await {
            Ok(_) => {
                debug!(user_id = %user.id, "user document inserted");
                Ok(())
            }
            Err(e) if is_duplicate_key(&e) => Err(StoreError::DuplicateEmail),
            Err(e) => Err(anyhow::Error::new(e).context("mongodb insert_one users").into()),
        }
    }
}

#[cfg(test)]
pub(crate) mod memory {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    /// Keeps users keyed by email, rejecting duplicates the way the unique index does.
    #[derive(Default)]
    pub struct InMemoryUserStore {
        users: Mutex<HashMap<String, User>>,
        fail_writes: bool,
        blind_lookup: bool,
    }

    impl InMemoryUserStore {
        pub fn failing_writes() -> Self {
            Self {
                fail_writes: true,
                ..Self::default()
            }
        }

        /// Lookups never see existing users, so only the insert catches duplicates.
        pub fn blind_lookup() -> Self {
            Self {
                blind_lookup: true,
                ..Self::default()
            }
        }

        pub fn count_by_email(&self, email: &str) -> usize {
            let users = self.users.lock().unwrap();
            users.values().filter(|u| u.email == email).count()
        }

        pub fn get(&self, email: &str) -> Option<User> {
            self.users.lock().unwrap().get(email).cloned()
        }
    }

    #[async_trait]
    impl UserStore for InMemoryUserStore {
        async fn email_exists(&self, email: &str) -> Result<bool, StoreError> {
            Ok(!self.blind_lookup && self.get(email).is_some())
        }

        async fn insert(&self, user: &User) -> Result<(), StoreError> {
            if self.fail_writes {
                return Err(anyhow::anyhow!("write refused").into());
            }
            let mut users = self.users.lock().unwrap();
            if users.contains_key(&user.email) {
                return Err(StoreError::DuplicateEmail);
            }
            users.insert(user.email.clone(), user.clone());
            Ok(())
        }
    }
}
