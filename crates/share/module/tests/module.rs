//! End-to-end behavior of an assembled share module.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::{sync::Arc, time::Duration};

use assert_matches::assert_matches;
use quadrant_share_api::{
    Availability, Coordinate, Lifecycle, ShareContext, ShareError, ShareGetter,
};
use quadrant_share_module::{ShareApi, ShareConfig, build_full_module, build_light_module};
use quadrant_share_store::ShareStore;
use quadrant_share_test_utils::{MockExchange, SquareFixture, namespace};

fn config(sample_count: usize) -> ShareConfig {
    let mut config = ShareConfig::default();
    config.availability.sample_count = sample_count;
    config.share.max_concurrent_fetches = 4;
    config
}

#[tokio::test]
async fn test_square_in_store_is_available_without_network() {
    let fixture = SquareFixture::by_row(4);
    let exchange = Arc::new(MockExchange::new());
    let module =
        build_light_module(&config(16), Arc::clone(&exchange), fixture.verifier()).unwrap();
    fixture.populate(module.getter().store());
    module.open().await.unwrap();

    module
        .shares_available(&ShareContext::new(), fixture.root())
        .await
        .unwrap();

    assert_eq!(exchange.calls(), 0);
    assert_eq!(module.probability_of_availability(), 1.0 - 2f64.powi(-16));
    module.close().await.unwrap();
}

#[tokio::test]
async fn test_missing_share_makes_square_unavailable() {
    let fixture = SquareFixture::by_row(4);
    let exchange = Arc::new(MockExchange::new());
    let module =
        build_light_module(&config(16), Arc::clone(&exchange), fixture.verifier()).unwrap();
    let store = module.getter().store();
    fixture.populate(store);
    store
        .delete(&fixture.root().share_key(Coordinate::new(2, 1)))
        .unwrap();
    module.open().await.unwrap();

    let result = module
        .shares_available(&ShareContext::new(), fixture.root())
        .await;

    assert_matches!(result, Err(ShareError::Unavailable { root }) if root == fixture.root().hash());
    assert_eq!(exchange.calls(), 1);
    assert_eq!(module.probability_of_availability(), 0.0);
}

#[tokio::test]
async fn test_namespace_query_fetches_only_matching_row() {
    let target = namespace(9);
    let fixture = SquareFixture::new(4, |coord| {
        if coord.row == 2 && coord.col % 2 == 0 {
            target
        } else {
            namespace(1)
        }
    });
    let exchange = Arc::new(fixture.exchange());
    exchange.scramble_latency(Duration::from_millis(1));
    let module =
        build_light_module(&config(16), Arc::clone(&exchange), fixture.verifier()).unwrap();
    module.open().await.unwrap();

    let shares = module
        .get_shares_by_namespace(&ShareContext::new(), fixture.root(), target)
        .await
        .unwrap();

    assert_eq!(
        shares,
        vec![
            fixture.share(Coordinate::new(2, 0)).clone(),
            fixture.share(Coordinate::new(2, 2)).clone(),
        ]
    );
    for row in [0, 1, 3] {
        assert_eq!(exchange.calls_for_row(row), 0);
    }
    assert_eq!(exchange.calls_for_row(2), 4);
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_grid_returns_promptly_without_partial_data() {
    let fixture = SquareFixture::by_row(4);
    let exchange = Arc::new(fixture.exchange());
    exchange.set_latency(Duration::from_secs(3600));
    let module =
        build_light_module(&config(16), Arc::clone(&exchange), fixture.verifier()).unwrap();
    module.open().await.unwrap();

    let ctx = ShareContext::new();
    let canceller = ctx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        canceller.cancel();
    });

    let started = tokio::time::Instant::now();
    let result = module.get_shares(&ctx, fixture.root()).await;

    assert_matches!(result, Err(ShareError::Cancelled));
    assert!(started.elapsed() < Duration::from_secs(1));
    assert_eq!(module.getter().store().count().unwrap(), 0);
}

#[tokio::test]
async fn test_get_share_is_idempotent_and_served_from_store() {
    let fixture = SquareFixture::by_row(4);
    let exchange = Arc::new(fixture.exchange());
    let module =
        build_light_module(&config(16), Arc::clone(&exchange), fixture.verifier()).unwrap();
    module.open().await.unwrap();
    let ctx = ShareContext::new();

    let first = module.get_share(&ctx, fixture.root(), 3, 1).await.unwrap();
    let second = module.get_share(&ctx, fixture.root(), 3, 1).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(exchange.calls(), 1);
}

#[tokio::test]
async fn test_closed_module_rejects_requests() {
    let fixture = SquareFixture::by_row(2);
    let module = build_light_module(&config(4), fixture.exchange(), fixture.verifier()).unwrap();
    let ctx = ShareContext::new();

    assert_matches!(
        module.get_share(&ctx, fixture.root(), 0, 0).await,
        Err(ShareError::Closed)
    );

    module.open().await.unwrap();
    module.get_share(&ctx, fixture.root(), 0, 0).await.unwrap();

    module.close().await.unwrap();
    assert_matches!(
        module.shares_available(&ctx, fixture.root()).await,
        Err(ShareError::Closed)
    );
}

#[tokio::test]
async fn test_api_mirrors_module() {
    let fixture = SquareFixture::by_row(4);
    let module = build_light_module(&config(4), fixture.exchange(), fixture.verifier()).unwrap();
    module.open().await.unwrap();
    let api = ShareApi::from_module(Arc::new(module));
    let ctx = ShareContext::new();
    let root = fixture.root().clone();

    assert_eq!((api.probability_of_availability)(), 0.0);
    (api.shares_available)(ctx.clone(), root.clone()).await.unwrap();
    assert_eq!((api.probability_of_availability)(), 1.0 - 2f64.powi(-4));
    (api.shares_available)(ctx.clone(), root.clone()).await.unwrap();
    assert_eq!((api.probability_of_availability)(), 1.0 - 2f64.powi(-8));

    let share = (api.get_share)(ctx.clone(), root.clone(), 1, 2).await.unwrap();
    assert_eq!(&share, fixture.share(Coordinate::new(1, 2)));

    let grid = (api.get_shares)(ctx.clone(), root.clone()).await.unwrap();
    assert_eq!(grid, fixture.grid());

    let shares = (api.get_shares_by_namespace)(ctx, root, namespace(3)).await.unwrap();
    assert_eq!(shares, fixture.grid()[3]);
}

#[tokio::test]
async fn test_full_module_persists_to_database() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config(16);
    config.share.store_path = Some(dir.path().join("shares.redb"));
    let fixture = SquareFixture::by_row(4);

    let module = build_full_module(&config, fixture.exchange(), fixture.verifier()).unwrap();
    module.open().await.unwrap();
    module
        .shares_available(&ShareContext::new(), fixture.root())
        .await
        .unwrap();
    assert_eq!(module.probability_of_availability(), 1.0);
    module.close().await.unwrap();
    drop(module);

    // Reopened with an exchange that knows nothing.
    let exchange = Arc::new(MockExchange::new());
    let module = build_full_module(&config, Arc::clone(&exchange), fixture.verifier()).unwrap();
    module.open().await.unwrap();
    let grid = module
        .get_shares(&ShareContext::new(), fixture.root())
        .await
        .unwrap();

    assert_eq!(grid, fixture.grid());
    assert_eq!(exchange.calls(), 0);
}
