//! Bound command implementation.

use oxiflate_deflate::config::{DeflateConfig, Format};
use oxiflate_deflate::deflate::Deflater;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct BoundJson {
    len: usize,
    format: String,
    level: u8,
    bound: usize,
}

/// Options for the bound command.
pub struct BoundOptions {
    pub len: usize,
    pub format: Format,
    pub level: u8,
    pub json: bool,
}

pub fn cmd_bound(options: &BoundOptions) -> Result<(), Box<dyn std::error::Error>> {
    let config = DeflateConfig::new()
        .level(options.level)
        .format(options.format);
    let bound = Deflater::new(config)?.bound(options.len);

    if options.json {
        let json = BoundJson {
            len: options.len,
            format: format!("{:?}", options.format).to_lowercase(),
            level: options.level,
            bound,
        };
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else {
        println!("{}", bound);
    }
    Ok(())
}
