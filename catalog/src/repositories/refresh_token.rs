use crate::cache_aside::CacheAside;
use crate::domain::Fetched;
use crate::error::CatalogError;
use crate::keys;
use crate::persistence::TokenStore;
use std::sync::Arc;
use uuid::Uuid;

const INVALID_TOKEN: &str = "Refresh token is not valid";

/// Mint an opaque refresh token.
pub fn generate_refresh_token() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Durable refresh tokens. The cache entry only records "seen valid
/// recently" and saves a store round trip.
pub struct RefreshTokenRepository {
    tokens: Arc<dyn TokenStore>,
    cache: CacheAside,
}

impl RefreshTokenRepository {
    pub fn new(tokens: Arc<dyn TokenStore>, cache: CacheAside) -> Self {
        Self { tokens, cache }
    }

    pub async fn add(&self, token: &str) -> Result<(), CatalogError> {
        self.tokens.insert_token(token).await
    }

    pub async fn verify(&self, token: &str) -> Result<Fetched<()>, CatalogError> {
        self.cache
            .read_through(&keys::refresh_token(token), keys::REFRESH_TOKEN_TTL, move || {
                self.load_presence(token)
            })
            .await
    }

    pub async fn delete(&self, token: &str) -> Result<(), CatalogError> {
        if !self.tokens.delete_token(token).await? {
            return Err(CatalogError::InvalidInput(INVALID_TOKEN.to_string()));
        }

        self.cache.invalidate([keys::refresh_token(token)]).await;
        Ok(())
    }

    async fn load_presence(&self, token: &str) -> Result<(), CatalogError> {
        if self.tokens.token_exists(token).await? {
            Ok(())
        } else {
            Err(CatalogError::InvalidInput(INVALID_TOKEN.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Origin;
    use crate::test_support::{MemoryCache, temp_store};

    #[tokio::test]
    async fn test_token_lifecycle() {
        let (_dir, store) = temp_store();
        let cache = Arc::new(MemoryCache::new());
        let repo = RefreshTokenRepository::new(store, CacheAside::new(cache.clone()));

        let token = generate_refresh_token();
        repo.add(&token).await.unwrap();

        assert_eq!(repo.verify(&token).await.unwrap().origin, Origin::Store);
        assert_eq!(repo.verify(&token).await.unwrap().origin, Origin::Cache);

        repo.delete(&token).await.unwrap();
        assert!(!cache.contains(&keys::refresh_token(&token)).await);
        assert!(matches!(
            repo.verify(&token).await,
            Err(CatalogError::InvalidInput(_))
        ));
        assert!(matches!(
            repo.delete(&token).await,
            Err(CatalogError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_token_is_not_cached() {
        let (_dir, store) = temp_store();
        let cache = Arc::new(MemoryCache::new());
        let repo = RefreshTokenRepository::new(store, CacheAside::new(cache.clone()));

        assert!(repo.verify("forged").await.is_err());
        assert!(!cache.contains(&keys::refresh_token("forged")).await);
    }
}
