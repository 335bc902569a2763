mod common;

use deeplink_shortener::error::AppError;
use deeplink_shortener::utils::short_key::merge_short_key;

#[tokio::test]
async fn test_second_resolution_is_served_from_cache() {
    let ctx = common::create_test_context();
    ctx.repository
        .seed(123, "ab", common::web_fields("https://example.com"));
    let service = &ctx.state.link_service;

    let first = service.resolve("aB9b", "ua").await.unwrap();
    assert_eq!(ctx.repository.find_by_id_calls(), 1);
    assert!(ctx.cache.contains("aB9b"));
    assert_eq!(ctx.cache.ttl_of("aB9b"), Some(common::CACHE_TTL));

    let second = service.resolve("aB9b", "ua").await.unwrap();
    assert_eq!(ctx.repository.find_by_id_calls(), 1);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_resolution_survives_cache_outage() {
    let ctx = common::create_test_context();
    ctx.repository
        .seed(123, "ab", common::web_fields("https://example.com"));
    ctx.cache.set_broken(true);
    let service = &ctx.state.link_service;

    for _ in 0..3 {
        let record = service.resolve("aB9b", "ua").await.unwrap();
        assert_eq!(record.targets.default_fallback_url, "https://example.com");
    }
    assert_eq!(ctx.repository.find_by_id_calls(), 3);
}

#[tokio::test]
async fn test_cache_hit_survives_store_outage() {
    let ctx = common::create_test_context();
    ctx.repository
        .seed(123, "ab", common::web_fields("https://example.com"));
    let service = &ctx.state.link_service;

    service.resolve("aB9b", "ua").await.unwrap();
    ctx.repository.set_unavailable(true);

    assert!(service.resolve("aB9b", "ua").await.is_ok());

    let err = service.resolve("aB9c", "ua").await.unwrap_err();
    assert!(matches!(err, AppError::Unavailable { .. }));
}

#[tokio::test]
async fn test_created_key_resolves() {
    let ctx = common::create_test_context();
    let service = &ctx.state.link_service;

    let outcome = service
        .create_link(common::app_fields())
        .await
        .unwrap();
    let short_key = outcome.short_key.unwrap();

    let record = service.resolve(&short_key, "ua").await.unwrap();
    assert_eq!(record.short_key().unwrap(), short_key);
}

#[tokio::test]
async fn test_concurrent_identical_creates_make_one_link() {
    let ctx = common::create_test_context();

    let mut tasks = Vec::new();
    for _ in 0..8 {
        let service = ctx.state.link_service.clone();
        tasks.push(tokio::spawn(async move {
            service.create_link(common::app_fields()).await
        }));
    }

    let mut created = 0;
    for task in tasks {
        if task.await.unwrap().unwrap().created {
            created += 1;
        }
    }

    assert_eq!(created, 1);
    assert_eq!(ctx.repository.count(), 1);
}

#[tokio::test]
async fn test_deleted_link_can_be_recreated() {
    let ctx = common::create_test_context();
    let service = &ctx.state.link_service;

    let first = service
        .create_link(common::web_fields("https://example.com"))
        .await
        .unwrap();
    service
        .delete(first.short_key.as_deref().unwrap())
        .await
        .unwrap();

    let second = service
        .create_link(common::web_fields("https://example.com"))
        .await
        .unwrap();

    assert!(second.created);
    assert_ne!(first.short_key, second.short_key);
}

#[tokio::test]
async fn test_reactivated_link_resolves_again() {
    let ctx = common::create_test_context();
    ctx.repository
        .seed(123, "ab", common::web_fields("https://example.com"));
    let service = &ctx.state.link_service;

    service.set_active("aB9b", false).await.unwrap();
    assert!(matches!(
        service.resolve("aB9b", "ua").await,
        Err(AppError::NotFound { .. })
    ));

    service.set_active("aB9b", true).await.unwrap();
    assert!(service.resolve("aB9b", "ua").await.is_ok());
}

#[tokio::test]
async fn test_key_beyond_store_range_is_not_found() {
    let ctx = common::create_test_context();
    let service = &ctx.state.link_service;

    let key = merge_short_key("ab", i64::MAX as u64 + 1);
    let err = service.resolve(&key, "ua").await.unwrap_err();

    assert!(matches!(err, AppError::NotFound { .. }));
    assert_eq!(ctx.repository.find_by_id_calls(), 0);
}
