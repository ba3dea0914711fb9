//! Tunnel Tour
//! Drives a flythrough session on the headless backend with a scripted set of
//! parameter changes, logging what the renderer would have drawn.
//!
//! Usage: tunnel_tour [settings.json] [texture.png]
//!
//! Run with `RUST_LOG=debug` to see every regeneration.

use anyhow::Context;
use flythrough::style::{ElementStyleUpdate, TubeStyleUpdate, VisualStyle};
use flythrough::{
    ColorValue, ControllerHandle, FlythroughController, FlythroughSettings, GroupId, HeadlessBackend, ManualClock,
    Texture, TextureSlot, Viewport,
};

const FRAME_MS: f64 = 1000.0 / 60.0;
const SECONDS: f64 = 24.0;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => FlythroughSettings::from_json_file(&path).with_context(|| format!("reading {path}"))?,
        None => FlythroughSettings::default(),
    };
    let texture = match args.next() {
        Some(path) => Texture::from_file(&path).with_context(|| format!("decoding {path}"))?,
        None => Texture::checkerboard("checker", 256, 8, [235, 235, 235, 255], [40, 40, 40, 255]),
    };

    let clock = ManualClock::new(0.0);
    let mut controller = FlythroughController::new(
        Viewport::new(1280, 720),
        settings,
        HeadlessBackend::default(),
        Box::new(clock.clone()),
    )?;
    controller.register_texture(TextureSlot::A, texture)?;

    let handle = controller.handle();
    let total_frames = (SECONDS * 1000.0 / FRAME_MS) as u32;

    for frame in 0..total_frames {
        let second = f64::from(frame) * FRAME_MS / 1000.0;
        if frame % 240 == 0 {
            script(&handle, frame / 240);
        }

        let outcome = controller.frame();
        if frame % 60 == 0 {
            let drawn = controller.backend().last_frame().unwrap_or_default();
            log::info!(
                "t={second:>5.1}s progress={:.3} visible={}/{} resident={}KiB",
                outcome.pose.progress,
                drawn.visible,
                drawn.objects,
                controller.backend().resident_bytes() / 1024
            );
        }
        clock.advance(FRAME_MS);
    }

    let stats = controller.backend().stats();
    log::info!(
        "Done: {} frames, {} elements live, {} geometries uploaded, {} released",
        controller.stats().total_frames,
        controller.lifecycle().live_count(GroupId::Elements),
        stats.geometry_uploads,
        stats.geometry_disposals
    );
    Ok(())
}

/// One scripted change every four seconds.
fn script(handle: &ControllerHandle, step: u32) {
    match step {
        1 => {
            handle.update_tube_style(TubeStyleUpdate {
                visual_style: Some(VisualStyle::TexturedA),
                color: Some(ColorValue::Random),
                ..TubeStyleUpdate::default()
            });
        }
        2 => {
            handle.update_camera_speed(500.0);
        }
        3 => {
            handle.update_element_style(ElementStyleUpdate {
                visual_style: Some(VisualStyle::Solid),
                count: Some(400),
                ..ElementStyleUpdate::default()
            });
        }
        4 => {
            handle.update_camera_direction();
        }
        5 => {
            handle.update_element_style(ElementStyleUpdate {
                count: Some(0),
                ..ElementStyleUpdate::default()
            });
        }
        _ => {}
    }
}
