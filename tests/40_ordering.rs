mod common;

use std::time::Duration;

use anyhow::Result;
use recipe_client::models::Recipe;
use recipe_client::sync::{EntitySynchronizer, ResolvePolicy};

/// Two fetches in flight at once: the one that completes last owns the
/// mirror, regardless of which was issued first.
#[tokio::test]
async fn last_completed_fetch_wins() -> Result<()> {
    let backend = common::MockBackend::start().await?;
    backend.seed_recipe("Slow Soup", "Simmer");
    backend.seed_recipe("Fast Toast", "Heat");
    backend.delay_filter("slow", Duration::from_millis(300));
    let (client, _) = backend.logged_in("cook").await;
    let recipes = EntitySynchronizer::<Recipe>::new(client, ResolvePolicy::FirstMatch);

    let issued_first = recipes.list(Some("slow"));
    let issued_second = async {
        // Let the slow request reach the server first
        tokio::time::sleep(Duration::from_millis(50)).await;
        recipes.list(Some("fast")).await
    };
    let (slow, fast) = tokio::join!(issued_first, issued_second);

    assert_eq!(slow?[0].name, "Slow Soup");
    assert_eq!(fast?[0].name, "Fast Toast");

    let mirror = recipes.mirror().snapshot();
    assert_eq!(mirror.version, 2);
    assert_eq!(mirror.filter.as_deref(), Some("slow"));
    assert_eq!(mirror.items.len(), 1);
    assert_eq!(mirror.items[0].name, "Slow Soup");
    Ok(())
}

#[tokio::test]
async fn repeated_refresh_is_harmless() -> Result<()> {
    let backend = common::MockBackend::start().await?;
    backend.seed_recipe("Toast", "Heat");
    let (client, _) = backend.logged_in("cook").await;
    let recipes = EntitySynchronizer::<Recipe>::new(client, ResolvePolicy::FirstMatch);

    let (a, b) = tokio::join!(recipes.refresh(), recipes.refresh());

    assert_eq!(a?, b?);
    assert_eq!(recipes.mirror().len(), 1);
    assert_eq!(recipes.mirror().version(), 2);
    Ok(())
}
