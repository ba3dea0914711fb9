//! Flythrough Controller
//!
//! [`FlythroughController`] is the session object. It owns the path, scene,
//! camera, generator, lifecycle manager, animator and render backend, and is
//! the only way host code changes any of them.
//!
//! Parameter updates are validated at this boundary. A rejected update leaves
//! every piece of state untouched; an accepted style update regenerates its
//! group and installs the result before returning.
//!
//! Code that does not own the controller (UI callbacks, other threads) sends
//! [`ControlCommand`]s through a [`ControllerHandle`]. Queued commands are
//! applied at the start of the next frame, before the camera advances.

use flume::{Receiver, Sender};

use crate::animator::{AnimatorConfig, CameraPathAnimator};
use crate::driver::{FrameDriver, FrameOutcome, FrameTargets};
use crate::errors::{FlythroughError, Result};
use crate::generator::{ProceduralGenerator, TextureLibrary};
use crate::gpu::{GpuTextureId, RenderBackend, SurfaceInfo};
use crate::lifecycle::{GroupId, InstallReport, ResourceLifecycleManager};
use crate::path::Path;
use crate::resources::{Texture, TextureSlot};
use crate::scene::{Camera, Scene};
use crate::settings::FlythroughSettings;
use crate::style::{ElementStyle, ElementStyleUpdate, TubeStyle, TubeStyleUpdate};
use crate::utils::{ControlInput, FrameClock, FrameStats, OrbitControls};

/// Initial drawable size in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// A deferred controller call.
#[derive(Debug, Clone)]
pub enum ControlCommand {
    Resize { width: u32, height: u32 },
    TubeStyle(TubeStyleUpdate),
    ElementStyle(ElementStyleUpdate),
    CameraSpeed(f64),
    ToggleDirection,
    ControlInput(ControlInput),
    RegisterTexture(TextureSlot, Texture),
}

/// Cloneable, thread-safe sender of [`ControlCommand`]s.
///
/// Every method returns `false` once the controller is gone.
#[derive(Debug, Clone)]
pub struct ControllerHandle {
    sender: Sender<ControlCommand>,
}

impl ControllerHandle {
    pub fn send(&self, command: ControlCommand) -> bool {
        self.sender.send(command).is_ok()
    }

    pub fn update_size(&self, width: u32, height: u32) -> bool {
        self.send(ControlCommand::Resize { width, height })
    }

    pub fn update_tube_style(&self, update: TubeStyleUpdate) -> bool {
        self.send(ControlCommand::TubeStyle(update))
    }

    pub fn update_element_style(&self, update: ElementStyleUpdate) -> bool {
        self.send(ControlCommand::ElementStyle(update))
    }

    pub fn update_camera_speed(&self, speed: f64) -> bool {
        self.send(ControlCommand::CameraSpeed(speed))
    }

    pub fn update_camera_direction(&self) -> bool {
        self.send(ControlCommand::ToggleDirection)
    }
}

pub struct FlythroughController<B: RenderBackend> {
    settings: FlythroughSettings,
    path: Path,
    scene: Scene,
    camera: Camera,
    backend: B,
    clock: Box<dyn FrameClock>,

    generator: ProceduralGenerator,
    lifecycle: ResourceLifecycleManager,
    textures: TextureLibrary,
    /// Replaced textures some live material may still sample
    retired_textures: Vec<GpuTextureId>,

    animator: CameraPathAnimator,
    controls: OrbitControls,
    control_input: ControlInput,
    driver: FrameDriver,

    tube_style: TubeStyle,
    element_style: ElementStyle,

    commands: Receiver<ControlCommand>,
    command_sender: Sender<ControlCommand>,
}

impl<B: RenderBackend> FlythroughController<B> {
    /// Builds the session and installs the first generation of both groups.
    pub fn new(viewport: Viewport, settings: FlythroughSettings, mut backend: B, clock: Box<dyn FrameClock>) -> Result<Self> {
        settings.validate()?;
        check_size(viewport.width, viewport.height)?;

        let path = settings.path.build()?;
        let scene = Scene::new(settings.environment.build());

        backend.resize(viewport.width, viewport.height);
        let cam = &settings.camera;
        let camera = Camera::new_perspective(cam.fov, backend.surface().aspect(), cam.near, cam.far);

        let mut generator = ProceduralGenerator::new(settings.seed, settings.tube.clone(), settings.elements.clone());
        let tube_style = settings.tube.initial.resolve(generator.rng_mut());
        let element_style = ElementStyle::from(settings.elements.initial);

        let (command_sender, commands) = flume::unbounded();

        let mut controller = Self {
            animator: CameraPathAnimator::new(AnimatorConfig::from(&settings.camera)),
            controls: OrbitControls::new(&settings.controls),
            control_input: ControlInput::default(),
            driver: FrameDriver::new(),
            lifecycle: ResourceLifecycleManager::new(),
            textures: TextureLibrary::new(),
            retired_textures: Vec::new(),
            generator,
            path,
            scene,
            camera,
            backend,
            clock,
            tube_style,
            element_style,
            commands,
            command_sender,
            settings,
        };

        for slot in [TextureSlot::A, TextureSlot::B] {
            let Some(file) = controller.settings.textures.path(slot) else {
                continue;
            };
            match Texture::from_file(file) {
                Ok(texture) => {
                    controller.textures.insert(slot, texture, &mut controller.backend)?;
                }
                Err(e) => log::warn!("Texture slot {slot:?} stays empty: {e}"),
            }
        }

        let tube_style = controller.tube_style;
        controller.rebuild_tube(&tube_style)?;
        let element_style = controller.element_style;
        controller.rebuild_elements(&element_style)?;

        log::info!(
            "Flythrough ready: {}x{}, {} elements",
            viewport.width,
            viewport.height,
            controller.lifecycle.live_count(GroupId::Elements)
        );
        Ok(controller)
    }

    // ========================================================================
    // Parameter Updates
    // ========================================================================

    #[must_use]
    pub fn surface(&self) -> SurfaceInfo {
        self.backend.surface()
    }

    /// Resizes the surface and camera. Repeating the current size is a no-op.
    pub fn update_size(&mut self, width: u32, height: u32) -> Result<()> {
        check_size(width, height)?;
        let surface = self.backend.surface();
        if surface.width == width && surface.height == height {
            return Ok(());
        }
        self.backend.resize(width, height);
        self.camera.set_aspect(self.backend.surface().aspect());
        log::debug!("Resized to {width}x{height}");
        Ok(())
    }

    pub fn update_tube_style(&mut self, update: TubeStyleUpdate) -> Result<()> {
        if let Some(scale) = update.scale
            && !(scale.is_finite() && scale > 0.0 && scale <= self.settings.tube.max_scale)
        {
            return Err(FlythroughError::invalid(
                "scale",
                format!("expected a value in (0, {}], got {scale}", self.settings.tube.max_scale),
            ));
        }
        let style = self.tube_style.merged(&update, self.generator.rng_mut());
        self.rebuild_tube(&style)?;
        Ok(())
    }

    pub fn update_element_style(&mut self, update: ElementStyleUpdate) -> Result<()> {
        if let Some(count) = update.count
            && count > self.settings.elements.max_count
        {
            return Err(FlythroughError::invalid(
                "count",
                format!("at most {} elements, got {count}", self.settings.elements.max_count),
            ));
        }
        let style = self.element_style.merged(&update);
        self.rebuild_elements(&style)?;
        Ok(())
    }

    pub fn update_camera_speed(&mut self, speed: f64) -> Result<()> {
        let now = self.clock.now_ms();
        self.apply_speed(now, speed)
    }

    pub fn update_camera_direction(&mut self) {
        let now = self.clock.now_ms();
        self.animator.toggle_direction(now);
        log::debug!("Camera direction reversed: {}", self.animator.is_reversed());
    }

    pub fn set_control_input(&mut self, input: ControlInput) {
        self.control_input = input;
    }

    /// Puts `texture` in `slot`, rebuilds every group styled with that slot,
    /// then releases the texture it replaced.
    pub fn register_texture(&mut self, slot: TextureSlot, texture: Texture) -> Result<()> {
        let previous = self.textures.insert(slot, texture, &mut self.backend)?;

        let mut stale = false;
        if self.tube_style.visual_style.texture_slot() == Some(slot) {
            let style = self.tube_style;
            stale |= self.rebuild_tube(&style).is_err();
        }
        if self.element_style.visual_style.texture_slot() == Some(slot) {
            let style = self.element_style;
            stale |= self.rebuild_elements(&style).is_err();
        }

        if let Some(old) = previous {
            let sampled = GroupId::ALL.iter().any(|g| self.lifecycle.uses_texture(*g, slot));
            if stale && sampled {
                log::warn!("Keeping the replaced slot {slot:?} texture alive until shutdown");
                self.retired_textures.push(old);
            } else if let Err(e) = self.backend.dispose_texture(old) {
                log::warn!("Leaking replaced slot {slot:?} texture: {e}");
            }
        }
        Ok(())
    }

    /// A sender for updates from code that does not own the controller.
    #[must_use]
    pub fn handle(&self) -> ControllerHandle {
        ControllerHandle {
            sender: self.command_sender.clone(),
        }
    }

    // ========================================================================
    // Frame
    // ========================================================================

    /// Applies queued commands, then advances, renders and updates controls.
    pub fn frame(&mut self) -> FrameOutcome {
        let now = self.clock.now_ms();
        self.drain_commands(now);

        self.driver.step(
            now,
            FrameTargets {
                animator: &mut self.animator,
                path: &self.path,
                camera: &mut self.camera,
                controls: &mut self.controls,
                input: &self.control_input,
                scene: &self.scene,
                backend: &mut self.backend,
            },
        )
    }

    fn drain_commands(&mut self, now: f64) {
        while let Ok(command) = self.commands.try_recv() {
            let result = match command {
                ControlCommand::Resize { width, height } => self.update_size(width, height),
                ControlCommand::TubeStyle(update) => self.update_tube_style(update),
                ControlCommand::ElementStyle(update) => self.update_element_style(update),
                ControlCommand::CameraSpeed(speed) => self.apply_speed(now, speed),
                ControlCommand::ToggleDirection => {
                    self.animator.toggle_direction(now);
                    Ok(())
                }
                ControlCommand::ControlInput(input) => {
                    self.control_input = input;
                    Ok(())
                }
                ControlCommand::RegisterTexture(slot, texture) => self.register_texture(slot, texture),
            };
            if let Err(e) = result {
                log::warn!("Queued update rejected: {e}");
            }
        }
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn apply_speed(&mut self, now: f64, speed: f64) -> Result<()> {
        let cam = &self.settings.camera;
        if !(speed.is_finite() && speed > 0.0) {
            return Err(FlythroughError::invalid("speed", format!("must be finite and positive, got {speed}")));
        }
        if !(cam.min_speed..=cam.max_speed).contains(&speed) {
            return Err(FlythroughError::invalid(
                "speed",
                format!("expected {} to {}, got {speed}", cam.min_speed, cam.max_speed),
            ));
        }
        self.animator.set_speed(now, speed);
        log::debug!("Camera speed set to {speed}");
        Ok(())
    }

    /// Builds and installs a tube generation. The style is committed only if
    /// the build succeeds; otherwise the live generation stays.
    fn rebuild_tube(&mut self, style: &TubeStyle) -> Result<InstallReport> {
        let assets = self
            .generator
            .regenerate_tube(&self.path, style, &self.textures, &mut self.backend)
            .inspect_err(|e| log::error!("Tube regeneration failed, keeping the current tube: {e}"))?;
        self.tube_style = *style;
        Ok(self.lifecycle.install(GroupId::Tube, assets, &mut self.scene, &mut self.backend))
    }

    fn rebuild_elements(&mut self, style: &ElementStyle) -> Result<InstallReport> {
        let assets = self
            .generator
            .regenerate_elements(&self.path, style, &self.textures, &mut self.backend)
            .inspect_err(|e| log::error!("Element regeneration failed, keeping the current elements: {e}"))?;
        self.element_style = *style;
        Ok(self.lifecycle.install(GroupId::Elements, assets, &mut self.scene, &mut self.backend))
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[must_use]
    pub fn settings(&self) -> &FlythroughSettings {
        &self.settings
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    #[must_use]
    pub fn animator(&self) -> &CameraPathAnimator {
        &self.animator
    }

    #[must_use]
    pub fn lifecycle(&self) -> &ResourceLifecycleManager {
        &self.lifecycle
    }

    #[must_use]
    pub fn textures(&self) -> &TextureLibrary {
        &self.textures
    }

    #[must_use]
    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    #[must_use]
    pub fn tube_style(&self) -> &TubeStyle {
        &self.tube_style
    }

    #[must_use]
    pub fn element_style(&self) -> &ElementStyle {
        &self.element_style
    }

    #[must_use]
    pub fn stats(&self) -> &FrameStats {
        self.driver.stats()
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

impl<B: RenderBackend> Drop for FlythroughController<B> {
    fn drop(&mut self) {
        let mut errors = self.lifecycle.release_all(&mut self.scene, &mut self.backend);
        errors.extend(self.textures.release_all(&mut self.backend));
        for id in self.retired_textures.drain(..) {
            if let Err(e) = self.backend.dispose_texture(id) {
                errors.push(e);
            }
        }
        if errors.is_empty() {
            log::debug!("Flythrough session released");
        } else {
            log::warn!("Flythrough session released with {} leaked resources", errors.len());
        }
    }
}

fn check_size(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(FlythroughError::invalid("size", format!("{width}x{height} has no area")));
    }
    Ok(())
}
