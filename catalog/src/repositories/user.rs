use crate::cache_aside::CacheAside;
use crate::domain::{Fetched, User, UserCredential, UserProfile};
use crate::error::CatalogError;
use crate::keys;
use crate::password::{hash_password, verify_password};
use crate::persistence::UserStore;
use std::sync::Arc;
use tracing::info;

const BAD_CREDENTIALS: &str = "The credentials you provided are wrong";

/// Users under two independent cache families: the public profile by id and
/// the credential lookup by username.
///
/// Profile edits only invalidate the profile entry. The credential entry
/// expires by TTL alone.
pub struct UserRepository {
    users: Arc<dyn UserStore>,
    cache: CacheAside,
}

impl UserRepository {
    pub fn new(users: Arc<dyn UserStore>, cache: CacheAside) -> Self {
        Self { users, cache }
    }

    /// Register a user and return the new id.
    pub async fn add_user(
        &self,
        username: String,
        password: String,
        fullname: String,
    ) -> Result<String, CatalogError> {
        if self.users.find_user_by_username(&username).await?.is_some() {
            return Err(CatalogError::Conflict(
                "Failed to add user. Username is already taken".to_string(),
            ));
        }

        let password_hash = hash_password(&password)?;
        let user = self
            .users
            .insert_user(User::new(username, password_hash, fullname))
            .await?;
        info!("user {} registered as '{}'", user.id, user.username);

        Ok(user.id)
    }

    pub async fn get_user(&self, id: &str) -> Result<Fetched<UserProfile>, CatalogError> {
        self.cache
            .read_through(&keys::user_by_id(id), keys::USER_PROFILE_TTL, move || {
                self.load_profile(id)
            })
            .await
    }

    /// Check a username/password pair and return the user id.
    pub async fn verify_credential(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Fetched<String>, CatalogError> {
        let credential = self
            .cache
            .read_through_checked(
                &keys::user_by_username(username),
                keys::USER_CREDENTIAL_TTL,
                move || self.load_credential(username),
                |credential: &UserCredential| {
                    if verify_password(password, &credential.password_hash)? {
                        Ok(())
                    } else {
                        Err(CatalogError::Authentication(BAD_CREDENTIALS.to_string()))
                    }
                },
            )
            .await?;

        Ok(credential.map(|c| c.id))
    }

    pub async fn update_fullname(&self, id: &str, fullname: &str) -> Result<(), CatalogError> {
        if self.users.update_fullname(id, fullname).await?.is_none() {
            return Err(CatalogError::not_found("User not found"));
        }

        self.cache.invalidate([keys::user_by_id(id)]).await;
        Ok(())
    }

    async fn load_profile(&self, id: &str) -> Result<UserProfile, CatalogError> {
        self.users
            .find_user(id)
            .await?
            .map(|user| UserProfile::from(&user))
            .ok_or_else(|| CatalogError::not_found("User not found"))
    }

    async fn load_credential(&self, username: &str) -> Result<UserCredential, CatalogError> {
        self.users
            .find_user_by_username(username)
            .await?
            .map(|user| UserCredential {
                id: user.id,
                password_hash: user.password_hash,
            })
            .ok_or_else(|| CatalogError::Authentication(BAD_CREDENTIALS.to_string()))
    }
}
