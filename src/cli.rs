// cli.rs - Command-line interface configuration
use clap::Parser;
use std::path::PathBuf;

use crate::demos::DemoKind;

#[derive(Parser, Debug, Clone)]
#[command(name = "wgpu-lighting-demos")]
#[command(author, version, about = "Lighting and shadow mapping demos", long_about = None)]
pub struct Args {
    /// Demo to run
    #[arg(long, value_enum, default_value_t = DemoKind::Shadows)]
    pub demo: DemoKind,

    /// Window width in pixels (defaults to the demo's own size)
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height in pixels (defaults to the demo's own size)
    #[arg(long)]
    pub height: Option<u32>,

    /// Side length of the square shadow map in texels
    #[arg(long, default_value_t = 2048, value_parser = clap::value_parser!(u32).range(1..=16384))]
    pub shadow_resolution: u32,

    /// Diffuse texture for lit surfaces; plain material colour when absent
    #[arg(long)]
    pub texture: Option<PathBuf>,

    /// Present without waiting for vertical sync
    #[arg(long = "no-vsync", default_value = "false")]
    pub no_vsync: bool,

    /// Write the demo's light-space depth map to this PNG and exit, without opening a window
    #[arg(long, value_name = "PATH")]
    pub dump_shadow_map: Option<PathBuf>,
}

/// Resolved settings the application runs with.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub demo: DemoKind,
    pub width: u32,
    pub height: u32,
    pub shadow_resolution: u32,
    pub texture: Option<PathBuf>,
    pub vsync: bool,
    pub dump_shadow_map: Option<PathBuf>,
}

impl Args {
    pub fn into_config(self) -> AppConfig {
        let (default_width, default_height) = self.demo.default_size();
        AppConfig {
            demo: self.demo,
            width: self.width.filter(|&w| w > 0).unwrap_or(default_width),
            height: self.height.filter(|&h| h > 0).unwrap_or(default_height),
            shadow_resolution: self.shadow_resolution,
            texture: self.texture,
            vsync: !self.no_vsync,
            dump_shadow_map: self.dump_shadow_map,
        }
    }
}
