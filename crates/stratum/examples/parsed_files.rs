// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Two stacked layers: parsed files keyed by `(blob, version)` over raw blobs.
//!
//! Run with `--features logs` to see one structured log record per layer event.
//! The first lookup logs an outer miss followed by an inner miss; repeating it logs
//! a single outer hit.

use serde::Deserialize;
use stratum::{CacheLayer, Error, KeyNotFound, Lookup, MemorySource, SourceExt, TelemetryConfig};
use tracing::Level;

#[derive(Debug, Clone, Deserialize)]
struct ParsedFile {
    key: String,
    value: String,
}

fn main() -> Result<(), Error> {
    let subscriber = tracing_subscriber::fmt().with_max_level(Level::DEBUG).finish();
    tracing::subscriber::set_global_default(subscriber).map_err(Error::from_message)?;

    let raw = CacheLayer::builder("raw_files")
        .memory::<String, String>()
        .source(MemorySource::from_iter([
            ("a".to_string(), r#"{"key":"a","value":"first"}"#.to_string()),
            ("b".to_string(), r#"{"key":"b","value":"second"}"#.to_string()),
        ]))
        .telemetry(TelemetryConfig::new().with_logs())
        .build();

    let parsed = CacheLayer::builder("parsed_files")
        .memory::<(String, u32), ParsedFile>()
        .source(raw.map_source(
            |(blob, _version): &(String, u32)| blob.clone(),
            |text: String| serde_json::from_str::<ParsedFile>(&text).map_err(Error::from_message),
        ))
        .telemetry(TelemetryConfig::new().with_logs())
        .build();

    for key in [("a", 1), ("a", 1), ("a", 2), ("z", 1)] {
        let key = (key.0.to_string(), key.1);
        match parsed.get(key.clone(), KeyNotFound)? {
            Lookup::Found(file) => println!("{key:?} => {} = {}", file.key, file.value),
            Lookup::NotFound(_) => println!("{key:?} => not found"),
        }
    }

    Ok(())
}
