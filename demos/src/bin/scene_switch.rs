// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Two scenes handing control back and forth.
//!
//! The title scene waits a little, then switches to the play scene. The play
//! scene spins a label, draws a panel from a behavior's draw hook, blinks a
//! child node on and off, and switches back after a while. Each switch
//! unloads the old scene and rebuilds the new one from scratch.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p arbor_demos --bin scene_switch`

use std::rc::Rc;

use arbor_geometry::{Align, TextAlign, Vector2};
use arbor_scene::{
    Behavior, Canvas, DrawCx, HeadlessPlatform, NodeConfig, Scene, SceneManager, Screen,
    ScreenConfig, SetupError, TextConfig, UpdateCx, UpdateFn,
};
use arbor_text::{Color, MonospaceRasterizer};

const FRAMES: u64 = 240;

/// Switches to `target` after `frames_left` updates.
#[derive(Debug)]
struct SwitchAfter {
    frames_left: u32,
    target: &'static str,
}

impl Behavior for SwitchAfter {
    fn update(&mut self, cx: &mut UpdateCx<'_>) {
        if self.frames_left == 0 {
            cx.switch_scene(self.target);
        } else {
            self.frames_left -= 1;
        }
    }
}

/// Fills the node's box.
#[derive(Debug)]
struct Panel(Color);

impl Behavior for Panel {
    fn draw(&self, cx: &DrawCx<'_>, canvas: &mut dyn Canvas) {
        let scene = cx.scene();
        if let (Some(origin), Some(transform)) =
            (scene.global_position(cx.node()), scene.transform(cx.node()))
        {
            canvas.fill_rect(origin, transform.size() * cx.screen().scale_factor(), self.0);
        }
    }
}

/// Toggles the node's children every `period` frames.
#[derive(Debug)]
struct Blinker {
    period: u32,
    elapsed: u32,
}

impl Behavior for Blinker {
    fn update(&mut self, cx: &mut UpdateCx<'_>) {
        self.elapsed += 1;
        if self.elapsed < self.period {
            return;
        }
        self.elapsed = 0;
        let node = cx.node();
        let scene = cx.scene_mut();
        let shown = scene.children_of(node).to_vec();
        let hidden = scene.inactive_children_of(node).to_vec();
        for child in shown {
            let _ = scene.set_active(child, false);
        }
        for child in hidden {
            let _ = scene.set_active(child, true);
        }
    }
}

fn title(scene: &mut Scene) {
    let config = NodeConfig::new("title")
        .with_size(Vector2::new(400.0, 100.0))
        .with_behavior(SwitchAfter {
            frames_left: 30,
            target: "play",
        });
    let text = TextConfig::new("Arbor\npress start")
        .with_font_size(40.0)
        .with_padding(10.0)
        .with_text_align(TextAlign::CENTER);
    if let Err(err) = scene.insert_text(None, config, text) {
        tracing::error!(%err, "could not build the title scene");
    }
}

fn play(scene: &mut Scene) {
    if let Err(err) = build_play(scene) {
        tracing::error!(%err, "could not build the play scene");
    }
}

fn build_play(scene: &mut Scene) -> Result<(), SetupError> {
    let panel = scene.insert(
        None,
        NodeConfig::new("panel")
            .with_size(Vector2::new(600.0, 300.0))
            .with_behavior(Panel(Color::rgb(40, 40, 60))),
    )?;
    scene.insert_text(
        Some(panel),
        NodeConfig::new("spinner")
            .with_align(Align::Top)
            .with_size(Vector2::new(200.0, 50.0))
            .with_behavior(UpdateFn(|cx: &mut UpdateCx<'_>| {
                let node = cx.node();
                let step = 90.0 * cx.delta_time();
                let _ = cx
                    .scene_mut()
                    .edit_transform(node, |t| t.set_rotation(t.rotation() + step));
            })),
        TextConfig::new("round and round").with_font_size(24.0),
    )?;
    let blinker = scene.insert(
        Some(panel),
        NodeConfig::new("blinker")
            .with_align(Align::Bottom)
            .with_behavior(Blinker {
                period: 15,
                elapsed: 0,
            }),
    )?;
    scene.insert_text(
        Some(blinker),
        NodeConfig::new("blink").with_align(Align::Bottom),
        TextConfig::new("now you see me").with_color(Color::RED),
    )?;
    scene.insert(
        None,
        NodeConfig::new("exit")
            .with_behavior(SwitchAfter {
                frames_left: 60,
                target: "title",
            }),
    )?;
    Ok(())
}

fn main() -> Result<(), SetupError> {
    tracing_subscriber::fmt::init();

    let mut platform = HeadlessPlatform::new().with_frame_limit(FRAMES);
    let screen = Screen::open(
        ScreenConfig {
            title: "Scene switching".into(),
            resolution: Vector2::new(1280.0, 720.0),
            reference_resolution: Some(Vector2::new(1920.0, 1080.0)),
            ..ScreenConfig::default()
        },
        &mut platform,
        Rc::new(MonospaceRasterizer::default()),
    )?;

    let mut manager = SceneManager::new(screen);
    manager.register("title", title);
    manager.register("play", play);
    manager.load_scene("title", &mut platform)?;

    tracing::info!(
        frames = platform.presented(),
        last_frame_commands = platform.last_frame().len(),
        "done"
    );
    Ok(())
}
