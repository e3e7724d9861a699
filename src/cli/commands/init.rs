use crate::config::Config;

pub fn cmd_init() -> anyhow::Result<()> {
    if Config::create_default_if_missing()? {
        println!("Created config.toml with default settings.");
        println!("Set the provider API keys there or through the environment:");
        println!("  GEOCODE_API_KEY, WEATHER_API_KEY, YELP_API_KEY, MOVIEDB_API_KEY");
    } else {
        println!("config.toml already exists, leaving it untouched.");
    }
    Ok(())
}
