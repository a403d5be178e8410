mod board;
mod host;
mod tween;

use std::{env, fs};

use anyhow::Context as _;
use gpui::*;
use gpui_component::Root;
use gpui_dnd::DragDropConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::board::Board;

/// Reads the engine configuration from the JSON file named by `DND_CONFIG`,
/// falling back to the defaults when the variable is unset.
fn load_config() -> anyhow::Result<DragDropConfig> {
    let Some(path) = env::var_os("DND_CONFIG") else {
        return Ok(DragDropConfig::default());
    };
    let json = fs::read_to_string(&path)
        .with_context(|| format!("reading {}", path.to_string_lossy()))?;
    let config = DragDropConfig::from_json_str(&json)
        .with_context(|| format!("parsing {}", path.to_string_lossy()))?;
    info!(path = %path.to_string_lossy(), "loaded drag and drop config");
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let board = Board::new(load_config()?)?;
    let app = Application::new();

    app.run(move |cx| {
        gpui_component::init(cx);
        cx.activate(true);

        cx.spawn(async move |cx| {
            cx.open_window(
                WindowOptions {
                    titlebar: Some(TitlebarOptions {
                        title: Some("Drag and drop board".into()),
                        appears_transparent: false,
                        traffic_light_position: None,
                    }),
                    ..Default::default()
                },
                |window, cx| {
                    let view = cx.new(|_| board);
                    cx.new(|cx| Root::new(view, window, cx))
                },
            )?;

            Ok::<_, anyhow::Error>(())
        })
        .detach();
    });

    Ok(())
}
