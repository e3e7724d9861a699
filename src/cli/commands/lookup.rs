use crate::config::Config;
use crate::state::SharedState;

pub async fn cmd_lookup(config: Config, query: &str) -> anyhow::Result<()> {
    let query = query.trim();
    if query.is_empty() {
        anyhow::bail!("Lookup query cannot be empty");
    }

    config.validate()?;
    let state = SharedState::new(config).await?;
    let location = state.locations.resolve(query).await?;

    println!("{}", serde_json::to_string_pretty(&location)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lookup_refuses_invalid_config() {
        let mut config = Config::default();
        config.general.database_url = String::new();

        let err = cmd_lookup(config, "seattle").await.unwrap_err();
        assert!(err.to_string().contains("Database URL cannot be empty"));
    }
}
