/*
 *  main.rs
 *
 *  RetroCast - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Fetch a forecast, paint the board, write the GIF
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use anyhow::{Context, Result};
use env_logger::Env;
use log::{error, info};

use retrocast::{config, AssetRegistry, BoardOptions, WeatherClient};

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

#[tokio::main] // Requires the `tokio` runtime with `macros` and `rt-multi-thread` features
async fn main() -> Result<()> {
    let cfg = config::load().context("loading configuration")?;

    env_logger::Builder::from_env(Env::default().default_filter_or(cfg.log_level()))
        .format_timestamp_secs()
        .init();

    info!("This {} worth the Squeeze", env!("CARGO_PKG_NAME"));
    info!("v.{} built {}", env!("CARGO_PKG_VERSION"), BUILD_DATE);

    let assets = cfg.assets();
    let registry = AssetRegistry::load(&assets)
        .with_context(|| format!("loading assets from {}", assets.display()))?;

    let api_key = cfg.api_key.as_deref().unwrap_or_default();
    let client = WeatherClient::new(api_key, cfg.units()).context("creating weather client")?;
    let options = BoardOptions::from(&cfg);

    let bytes = match retrocast::get_weather_with(&client, cfg.location(), &registry, &options).await {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("Weather board failed: {e}");
            return Err(e.into());
        }
    };

    let output = cfg.output();
    tokio::fs::write(&output, &bytes)
        .await
        .with_context(|| format!("writing {}", output.display()))?;
    info!("Wrote {} ({} bytes)", output.display(), bytes.len());
    Ok(())
}
