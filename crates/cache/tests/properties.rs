//! Property tests for the facade's core contracts

use hoard_cache::{CacheConfigBuilder, CacheManager, SetOptions};
use proptest::prelude::*;
use std::time::Duration;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

async fn manager() -> CacheManager {
    let config = CacheConfigBuilder::new()
        .with_cleanup_interval(Duration::ZERO)
        .build()
        .unwrap();
    CacheManager::new(config).await.unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_set_then_get_returns_value(key in "[a-z0-9:_-]{1,24}", value in any::<i64>()) {
        runtime().block_on(async {
            let cache = manager().await;
            cache.set(&key, &value, SetOptions::default()).await.unwrap();
            let fetched: Option<i64> = cache.get(&key).await.unwrap();
            assert_eq!(fetched, Some(value));
        });
    }

    #[test]
    fn prop_delete_twice_never_errors(key in "[a-z0-9:_-]{1,24}") {
        runtime().block_on(async {
            let cache = manager().await;
            cache.set(&key, &1u8, SetOptions::default()).await.unwrap();
            assert!(cache.delete(&key).await.unwrap());
            assert!(!cache.delete(&key).await.unwrap());
        });
    }

    #[test]
    fn prop_string_values_roundtrip_losslessly(key in "[a-z]{1,12}", value in ".{0,64}") {
        runtime().block_on(async {
            let cache = manager().await;
            cache.set(&key, &value, SetOptions::default()).await.unwrap();
            let fetched: Option<String> = cache.get(&key).await.unwrap();
            assert_eq!(fetched.as_deref(), Some(value.as_str()));
        });
    }
}
