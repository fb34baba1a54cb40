// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Nine text boxes, one per anchor, with a frame-rate readout in the middle.
//!
//! Every box is 200x200 reference pixels with its text centered inside. The
//! eight outer boxes are turned by 45 degrees. The scene runs on the headless
//! platform for a fixed number of frames and logs where each text surface was
//! drawn on the last frame.
//!
//! Run:
//! - `RUST_LOG=info cargo run -p arbor_demos --bin anchors`

use std::rc::Rc;

use arbor_geometry::{Align, TextAlign, Vector2};
use arbor_scene::{
    Behavior, HeadlessPlatform, NodeConfig, Scene, SceneManager, Screen, ScreenConfig, SetupError,
    TextConfig, UpdateCx, WindowFlags,
};
use arbor_text::MonospaceRasterizer;

const FRAMES: u64 = 120;

/// Rewrites its own text with the measured frame rate.
#[derive(Debug)]
struct FpsReadout;

impl Behavior for FpsReadout {
    fn update(&mut self, cx: &mut UpdateCx<'_>) {
        let fps = cx.screen().fps();
        let node = cx.node();
        let _ = cx
            .scene_mut()
            .set_text(node, format!("FPS: {fps:.0}\nHello, World!\nline 3"));
    }
}

fn label(text: &str) -> TextConfig {
    TextConfig::new(text)
        .with_font_size(22.0)
        .with_padding(50.0)
        .with_text_align(TextAlign::CENTER)
}

fn anchored(name: String, align: Align) -> NodeConfig {
    NodeConfig::new(name)
        .with_size(Vector2::new(200.0, 200.0))
        .with_align(align)
}

fn build(scene: &mut Scene) {
    let middle = anchored("text_middle".into(), Align::Middle).with_behavior(FpsReadout);
    if let Err(err) = scene.insert_text(None, middle, label("FPS: -")) {
        tracing::error!(%err, "could not create the readout");
    }
    for align in Align::ALL.into_iter().filter(|a| *a != Align::Middle) {
        let config = anchored(format!("text_{}", align.name()), align).with_rotation(45.0);
        if let Err(err) = scene.insert_text(None, config, label(align.name())) {
            tracing::error!(%err, %align, "could not create anchor box");
        }
    }
}

fn main() -> Result<(), SetupError> {
    tracing_subscriber::fmt::init();

    let mut platform = HeadlessPlatform::new().with_frame_limit(FRAMES);
    let screen = Screen::open(
        ScreenConfig {
            title: "Test App".into(),
            resolution: Vector2::new(1280.0, 720.0),
            reference_resolution: Some(Vector2::new(1920.0, 1080.0)),
            flags: WindowFlags::DOUBLE_BUFFER | WindowFlags::RESIZABLE,
            priority: 0.5,
            ..ScreenConfig::default()
        },
        &mut platform,
        Rc::new(MonospaceRasterizer::default()),
    )?;

    let mut manager = SceneManager::new(screen);
    manager.register("main", build);
    manager.load_scene("main", &mut platform)?;

    for (surface, at) in platform.last_frame_text() {
        tracing::info!(%at, size = %surface.size(), lines = surface.lines().len(), "text drawn");
    }
    tracing::info!(frames = platform.presented(), "done");
    Ok(())
}
