use anyhow::Context;

use crate::config::Config;
use crate::db::Store;

pub async fn cmd_check(config: &Config) -> anyhow::Result<()> {
    config.validate()?;
    println!("Configuration OK");

    let store = Store::with_pool_options(
        &config.general.database_url,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await
    .context("Failed to open database")?;

    store.ping().await.context("Database did not answer")?;
    println!("Database OK ({})", config.general.database_url);

    for (name, provider) in [
        ("geocode", &config.providers.geocode),
        ("weather", &config.providers.weather),
        ("yelp", &config.providers.yelp),
        ("moviedb", &config.providers.moviedb),
    ] {
        let key = if provider.api_key.is_empty() {
            "missing key"
        } else {
            "key set"
        };
        println!("  {name:<8} {} ({key})", provider.base_url);
    }

    Ok(())
}
