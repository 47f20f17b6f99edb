use log::{debug, info, trace, warn};

use super::config::BackdropConfig;
use super::host::Host;
use crate::core::frame_loop::{LoopState, RenderLoop};
use crate::core::resize::{ResizeOutcome, SurfaceSize, SurfaceSizing};
use crate::core::scene::Scene;
use crate::core::time::FrameThrottle;
use crate::error::StardriftError;
use crate::input::listeners::ListenerSet;
use crate::input::viewport::{ViewportEvent, ViewportState};
use crate::renderer::color::Color;
use crate::renderer::traits::Surface;
use crate::systems::render::{self, FrameContext, PassCounts};
use crate::systems::rng::{RandomSource, Rng};

/// Counters for what the loop has done since construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Frame callbacks that ran a tick.
    pub ticks: u64,
    /// Ticks that completed a draw.
    pub draws: u64,
    /// Ticks skipped by the throttle.
    pub throttled: u64,
    /// Ticks skipped because no surface could be obtained.
    pub skipped: u64,
    /// Scene regenerations (mount and resizes).
    pub regenerations: u64,
    /// What the most recent draw produced.
    pub last_pass: PassCounts,
}

/// A mounted starfield backdrop.
///
/// Owns the host, the scene, the viewport signals and the render loop.
/// The host calls [`Backdrop::on_frame`] when a requested frame fires and
/// [`Backdrop::handle_event`] for every subscribed notification.
///
/// Dropping a mounted backdrop unmounts it.
pub struct Backdrop<H: Host> {
    host: H,
    config: BackdropConfig,
    background_fallback: Color,
    scene: Scene,
    viewport: ViewportState,
    sizing: SurfaceSizing,
    frame_loop: RenderLoop,
    throttle: FrameThrottle,
    listeners: ListenerSet,
    rng: Box<dyn RandomSource>,
    stats: FrameStats,
    mounted: bool,
    /// Whether a theme substitution has been reported already.
    theme_warned: bool,
}

impl<H: Host> Backdrop<H> {
    /// Create an unmounted backdrop. Seeds from `config.seed` or the clock.
    pub fn new(host: H, config: BackdropConfig) -> Result<Self, StardriftError> {
        let rng: Box<dyn RandomSource> = match config.seed {
            Some(seed) => Box::new(Rng::new(seed)),
            None => Box::new(Rng::from_clock()),
        };
        Self::with_rng(host, config, rng)
    }

    /// Create an unmounted backdrop with a caller-supplied random source.
    pub fn with_rng(
        host: H,
        config: BackdropConfig,
        rng: Box<dyn RandomSource>,
    ) -> Result<Self, StardriftError> {
        config.validate()?;
        let throttle = FrameThrottle::new(
            config.visible_interval_ms,
            config.hidden_interval_ms,
            config.frame_slack_ms,
        );
        Ok(Self {
            host,
            background_fallback: config.background_fallback(),
            config,
            scene: Scene::new(),
            viewport: ViewportState::new(),
            sizing: SurfaceSizing::new(),
            frame_loop: RenderLoop::new(),
            throttle,
            listeners: ListenerSet::new(),
            rng,
            stats: FrameStats::default(),
            mounted: false,
            theme_warned: false,
        })
    }

    /// Register listeners, size the surface, build the scene and schedule
    /// the first frame. Sizing completes before any tick can run.
    pub fn mount(&mut self) {
        if self.mounted {
            return;
        }
        self.listeners.register_all(&mut self.host);
        self.resize();
        self.throttle.reset();
        self.frame_loop.start(&mut self.host);
        self.mounted = true;
        info!(
            "backdrop mounted: {} stars, {} nebulas, {} listeners",
            self.scene.stars().len(),
            self.scene.nebulas().len(),
            self.listeners.len()
        );
    }

    /// Cancel the pending frame and remove every listener, in one pass.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.frame_loop.cancel(&mut self.host);
        self.listeners.release(&mut self.host);
        self.mounted = false;
        info!("backdrop unmounted after {} draws", self.stats.draws);
    }

    /// Deliver a host notification. Also restarts a loop the host stopped
    /// by refusing a frame request.
    pub fn handle_event(&mut self, event: ViewportEvent) {
        if !self.mounted {
            trace!("dropping {:?} while unmounted", event);
            return;
        }
        match event {
            ViewportEvent::Resize => {
                self.resize();
            }
            other => {
                self.viewport.apply(other);
            }
        }
        self.resume_if_stalled();
    }

    fn resume_if_stalled(&mut self) {
        if self.frame_loop.state() == LoopState::Idle && self.frame_loop.start(&mut self.host) {
            debug!("render loop rescheduled after a refused frame");
        }
    }

    /// The frame callback. Runs one tick and reschedules; does nothing once
    /// torn down.
    pub fn on_frame(&mut self) {
        if !self.frame_loop.begin_tick() {
            trace!("frame fired in state {:?}; ignored", self.frame_loop.state());
            return;
        }
        self.tick();
        self.frame_loop.finish_tick(&mut self.host);
    }

    fn tick(&mut self) {
        self.stats.ticks += 1;
        let now = self.host.now_ms();

        if self.sizing.is_pending() {
            self.resize();
        }
        if self.sizing.current().is_none() {
            trace!("no surface size yet; skipping draw");
            return;
        }

        if !self.throttle.ready(now, self.viewport.is_visible()) {
            self.stats.throttled += 1;
            return;
        }

        let background = self.background();
        if self.sizing.surface_stale() {
            self.sync_surface();
        }

        let Some(surface) = self.host.surface() else {
            trace!("drawing surface unavailable; skipping draw");
            self.stats.skipped += 1;
            return;
        };

        let frame = FrameContext {
            time: (now / 1000.0) as f32,
            size: self.sizing.logical(),
            viewport: &self.viewport,
            config: &self.config,
        };
        self.stats.last_pass = render::composite(surface, &mut self.scene, &frame, background);
        self.stats.draws += 1;
        self.throttle.mark_drawn(now);
    }

    /// Re-read the container size and regenerate the scene. Returns false
    /// when the container has no area and the resize was deferred.
    fn resize(&mut self) -> bool {
        let logical = self.host.container_size();
        let ratio = self.host.device_pixel_ratio();
        match self.sizing.update(logical, ratio) {
            ResizeOutcome::Deferred => false,
            ResizeOutcome::Applied(size) => {
                self.sync_surface();
                self.scene.regenerate(
                    size.logical.x,
                    size.logical.y,
                    self.config.star_density,
                    self.rng.as_mut(),
                );
                self.stats.regenerations += 1;
                debug!(
                    "scene regenerated (gen {}): {} stars, {} nebulas",
                    self.scene.generation(),
                    self.scene.stars().len(),
                    self.scene.nebulas().len()
                );
                true
            }
        }
    }

    /// Push the current pixel size to the surface, if it can be reached.
    fn sync_surface(&mut self) {
        let Some(size) = self.sizing.current() else {
            return;
        };
        if let Some(surface) = self.host.surface() {
            surface.resize(size.pixel_width, size.pixel_height, size.scale);
            self.sizing.mark_surface_synced();
        }
    }

    fn background(&mut self) -> Color {
        let raw = self.host.theme_color();
        let (color, substituted) = Color::resolve_theme(raw.as_deref(), self.background_fallback);
        if substituted && raw.is_some() && !self.theme_warned {
            warn!(
                "theme color {:?} unusable; using {}",
                raw.unwrap_or_default(),
                self.background_fallback
            );
            self.theme_warned = true;
        }
        color
    }

    // -- Accessors --

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &BackdropConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    pub fn loop_state(&self) -> LoopState {
        self.frame_loop.state()
    }

    pub fn surface_size(&self) -> Option<SurfaceSize> {
        self.sizing.current()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }
}

impl<H: Host> Drop for Backdrop<H> {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::headless::HeadlessHost;
    use crate::input::viewport::HostEventKind;
    use crate::renderer::recording::DrawCommand;

    const FRAME_MS: f64 = 16.7;

    fn config() -> BackdropConfig {
        BackdropConfig::default().with_seed(42).with_star_density(1200.0)
    }

    fn mounted(host: &mut HeadlessHost) -> Backdrop<&mut HeadlessHost> {
        let mut b = Backdrop::new(host, config()).unwrap();
        b.mount();
        b
    }

    /// Advance the clock and fire the pending frame. False if none pending.
    fn pump(b: &mut Backdrop<&mut HeadlessHost>, step_ms: f64) -> bool {
        b.host_mut().advance(step_ms);
        if b.host_mut().take_pending_frame().is_none() {
            return false;
        }
        b.on_frame();
        true
    }

    #[test]
    fn scenario_mount_tick_unmount() {
        let mut host = HeadlessHost::new(800.0, 600.0);
        let mut b = mounted(&mut host);
        assert_eq!(b.scene().stars().len(), 400);
        let n = b.scene().nebulas().len();
        assert!((4..=6).contains(&n), "nebula count {}", n);

        for _ in 0..5 {
            assert!(pump(&mut b, FRAME_MS));
        }
        assert_eq!(b.stats().draws, 5);
        assert!(b.host().pending_frame().is_some());

        b.unmount();
        assert_eq!(b.loop_state(), LoopState::Cancelled);
        assert!(!pump(&mut b, FRAME_MS), "a sixth frame must not be pending");
        assert_eq!(b.stats().draws, 5);
    }

    #[test]
    fn mount_registers_every_listener_and_unmount_removes_them() {
        let mut host = HeadlessHost::new(800.0, 600.0);
        {
            let mut b = mounted(&mut host);
            for kind in HostEventKind::ALL {
                assert!(b.host().is_listening(kind), "{:?} not registered", kind);
            }
            b.unmount();
            assert_eq!(b.host().listener_count(), 0);
        }
        assert_eq!(host.subscribe_calls(), HostEventKind::ALL.len());
        assert_eq!(host.unsubscribe_calls(), HostEventKind::ALL.len());
        assert_eq!(host.pending_frame(), None);
        assert_eq!(host.frames_cancelled().len(), 1);
    }

    #[test]
    fn drop_releases_everything() {
        let mut host = HeadlessHost::new(800.0, 600.0);
        {
            let mut b = mounted(&mut host);
            pump(&mut b, FRAME_MS);
        }
        assert_eq!(host.listener_count(), 0);
        assert_eq!(host.pending_frame(), None);
    }

    #[test]
    fn repeated_mount_unmount_does_not_leak() {
        let mut host = HeadlessHost::new(320.0, 240.0);
        for i in 0..200 {
            let mut b = mounted(&mut host);
            for _ in 0..(i % 4) {
                pump(&mut b, FRAME_MS);
            }
            if i % 2 == 0 {
                b.unmount();
            }
        }
        assert_eq!(host.listener_count(), 0);
        assert_eq!(host.pending_frame(), None);
        assert_eq!(host.subscribe_calls(), host.unsubscribe_calls());
    }

    #[test]
    fn remount_same_backdrop() {
        let mut host = HeadlessHost::new(320.0, 240.0);
        let mut b = mounted(&mut host);
        for _ in 0..10 {
            b.unmount();
            b.mount();
            assert!(pump(&mut b, FRAME_MS));
        }
        assert_eq!(b.host().listener_count(), HostEventKind::ALL.len());
        b.unmount();
        assert_eq!(b.host().listener_count(), 0);
    }

    #[test]
    fn frame_racing_teardown_is_ignored() {
        let mut host = HeadlessHost::new(800.0, 600.0);
        let mut b = mounted(&mut host);
        // The callback was already dequeued when teardown ran.
        assert!(b.host_mut().take_pending_frame().is_some());
        b.unmount();
        let requested = b.host().frames_requested();
        b.on_frame();
        assert_eq!(b.stats().draws, 0);
        assert_eq!(b.host().frames_requested(), requested);
    }

    #[test]
    fn reduced_motion_uses_flat_stars_and_no_texture() {
        let mut host = HeadlessHost::new(800.0, 600.0);
        let mut b = mounted(&mut host);
        b.handle_event(ViewportEvent::ReducedMotion { enabled: true });
        // Scroll far enough that nebulas are fully revealed.
        b.handle_event(ViewportEvent::Scroll { offset: 300.0 });
        b.host_mut().recording_mut().unwrap().clear();

        assert!(pump(&mut b, FRAME_MS));
        let pass = b.stats().last_pass;
        let rec = b.host().recording().unwrap();
        assert!(pass.stars > 0);
        assert_eq!(rec.circle_count(), pass.stars);
        // Body and inner glow only; every gradient belongs to a nebula.
        assert_eq!(rec.gradient_count(), pass.nebulas * 2);
    }

    #[test]
    fn full_motion_draws_star_glow_and_nebula_texture() {
        let mut host = HeadlessHost::new(800.0, 600.0);
        let mut b = mounted(&mut host);
        b.handle_event(ViewportEvent::Scroll { offset: 300.0 });
        b.host_mut().recording_mut().unwrap().clear();

        assert!(pump(&mut b, FRAME_MS));
        let pass = b.stats().last_pass;
        let rec = b.host().recording().unwrap();
        assert_eq!(rec.circle_count(), pass.stars);
        assert_eq!(rec.gradient_count(), pass.stars + pass.nebulas * 3);
    }

    #[test]
    fn scenario_resize_discards_old_scene() {
        let mut host = HeadlessHost::new(400.0, 300.0);
        let mut b = mounted(&mut host);
        assert_eq!(b.scene().stars().len(), 100);
        let generation = b.scene().generation();

        b.host_mut().set_size(1600.0, 1200.0);
        b.handle_event(ViewportEvent::Resize);
        assert_eq!(b.scene().stars().len(), 1600);
        assert_eq!(b.scene().generation(), generation + 1);
        assert_eq!(b.surface_size().unwrap().pixel_width, 1600);
    }

    #[test]
    fn identical_resizes_keep_counts() {
        let mut host = HeadlessHost::new(1024.0, 768.0);
        let mut b = mounted(&mut host);
        b.handle_event(ViewportEvent::Resize);
        let (stars, regenerations) = (b.scene().stars().len(), b.stats().regenerations);
        b.handle_event(ViewportEvent::Resize);
        assert_eq!(b.scene().stars().len(), stars);
        assert_eq!(b.stats().regenerations, regenerations + 1);
    }

    #[test]
    fn hidden_page_draws_at_most_every_100ms() {
        let mut host = HeadlessHost::new(640.0, 480.0);
        let mut b = mounted(&mut host);
        b.handle_event(ViewportEvent::Visibility { visible: false });

        let mut draw_times = Vec::new();
        for _ in 0..120 {
            let before = b.stats().draws;
            assert!(pump(&mut b, FRAME_MS));
            if b.stats().draws > before {
                draw_times.push(b.host().now_ms());
            }
        }
        assert!(draw_times.len() > 1);
        for pair in draw_times.windows(2) {
            assert!(pair[1] - pair[0] >= 100.0, "gap {}", pair[1] - pair[0]);
        }
        assert!(b.stats().throttled > 0);
    }

    #[test]
    fn visible_page_draws_every_frame() {
        let mut host = HeadlessHost::new(640.0, 480.0);
        let mut b = mounted(&mut host);
        for _ in 0..60 {
            assert!(pump(&mut b, FRAME_MS));
        }
        assert_eq!(b.stats().draws, 60);
        assert_eq!(b.stats().throttled, 0);
    }

    #[test]
    fn becoming_visible_resumes_full_rate() {
        let mut host = HeadlessHost::new(640.0, 480.0);
        let mut b = mounted(&mut host);
        b.handle_event(ViewportEvent::Visibility { visible: false });
        for _ in 0..30 {
            pump(&mut b, FRAME_MS);
        }
        b.handle_event(ViewportEvent::Visibility { visible: true });
        let before = b.stats().draws;
        for _ in 0..10 {
            pump(&mut b, FRAME_MS);
        }
        assert_eq!(b.stats().draws, before + 10);
    }

    #[test]
    fn missing_surface_skips_draw_but_keeps_looping() {
        let mut host = HeadlessHost::new(800.0, 600.0);
        let mut b = mounted(&mut host);
        b.host_mut().set_surface_blocked(true);
        for _ in 0..3 {
            assert!(pump(&mut b, FRAME_MS));
        }
        assert_eq!(b.stats().draws, 0);
        assert_eq!(b.stats().skipped, 3);

        b.host_mut().set_surface_blocked(false);
        assert!(pump(&mut b, FRAME_MS));
        assert_eq!(b.stats().draws, 1);
    }

    #[test]
    fn detached_surface_never_panics() {
        let mut host = HeadlessHost::new(800.0, 600.0);
        let mut b = mounted(&mut host);
        b.host_mut().detach_surface();
        for _ in 0..5 {
            assert!(pump(&mut b, FRAME_MS));
        }
        assert_eq!(b.stats().skipped, 5);
    }

    #[test]
    fn malformed_theme_uses_default_background() {
        let mut host = HeadlessHost::new(200.0, 100.0).with_theme_color("definitely-not-a-color");
        let mut b = mounted(&mut host);
        assert!(pump(&mut b, FRAME_MS));
        let first_fill = b
            .host()
            .recording()
            .unwrap()
            .commands()
            .iter()
            .find_map(|c| match c {
                DrawCommand::FillRect { color, .. } => Some(*color),
                _ => None,
            })
            .unwrap();
        assert_eq!(first_fill, b.config().background_fallback());
    }

    fn first_background(b: &Backdrop<&mut HeadlessHost>) -> Color {
        b.host()
            .recording()
            .unwrap()
            .commands()
            .iter()
            .find_map(|c| match c {
                DrawCommand::FillRect { color, .. } => Some(*color),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn hsl_and_named_themes_reach_the_surface() {
        for (value, expected) in [
            ("hsl(222, 47%, 11%)", Color::hsla(222.0, 47.0, 11.0, 1.0)),
            ("hsl(222 47% 11%)", Color::hsla(222.0, 47.0, 11.0, 1.0)),
            ("black", Color::Rgba { r: 0, g: 0, b: 0, a: 1.0 }),
            ("white", Color::Rgba { r: 255, g: 255, b: 255, a: 1.0 }),
        ] {
            let mut host = HeadlessHost::new(200.0, 100.0).with_theme_color(value);
            let mut b = mounted(&mut host);
            assert!(pump(&mut b, FRAME_MS));
            assert_eq!(first_background(&b), expected, "{}", value);
        }
    }

    #[test]
    fn theme_change_applies_on_next_draw() {
        let mut host = HeadlessHost::new(200.0, 100.0).with_theme_color("navy");
        let mut b = mounted(&mut host);
        assert!(pump(&mut b, FRAME_MS));
        assert_eq!(first_background(&b), Color::Rgba { r: 0, g: 0, b: 128, a: 1.0 });

        b.host_mut().set_theme_color(Some("hsl(30 60% 20%)".to_string()));
        b.host_mut().recording_mut().unwrap().clear();
        assert!(pump(&mut b, FRAME_MS));
        assert_eq!(first_background(&b), Color::hsla(30.0, 60.0, 20.0, 1.0));
    }

    #[test]
    fn refused_frame_restarts_on_next_event() {
        let mut host = HeadlessHost::new(640.0, 480.0);
        let mut b = mounted(&mut host);
        b.host_mut().set_refuse_frames(true);
        assert!(pump(&mut b, FRAME_MS));
        assert_eq!(b.loop_state(), LoopState::Idle);
        assert!(!pump(&mut b, FRAME_MS), "nothing pending after a refusal");

        // Still refusing: the event is applied, the loop stays idle.
        b.handle_event(ViewportEvent::PointerMove { x: 10.0, y: 10.0 });
        assert_eq!(b.loop_state(), LoopState::Idle);

        b.host_mut().set_refuse_frames(false);
        b.handle_event(ViewportEvent::Scroll { offset: 5.0 });
        assert!(matches!(b.loop_state(), LoopState::Scheduled(_)));
        let draws = b.stats().draws;
        assert!(pump(&mut b, FRAME_MS));
        assert_eq!(b.stats().draws, draws + 1);
    }

    #[test]
    fn events_after_unmount_do_not_restart_the_loop() {
        let mut host = HeadlessHost::new(640.0, 480.0);
        let mut b = mounted(&mut host);
        b.unmount();
        let requested = b.host().frames_requested();
        b.handle_event(ViewportEvent::Scroll { offset: 5.0 });
        assert_eq!(b.loop_state(), LoopState::Cancelled);
        assert_eq!(b.host().frames_requested(), requested);
    }

    #[test]
    fn theme_color_is_used_when_valid() {
        let mut host = HeadlessHost::new(200.0, 100.0).with_theme_color(" #102030");
        let mut b = mounted(&mut host);
        assert!(pump(&mut b, FRAME_MS));
        let rec = b.host().recording().unwrap();
        assert!(rec.commands().contains(&DrawCommand::FillRect {
            x: 0.0,
            y: 0.0,
            width: 200.0,
            height: 100.0,
            color: Color::Rgba { r: 16, g: 32, b: 48, a: 1.0 },
        }));
    }

    #[test]
    fn device_pixel_ratio_scales_backing_store() {
        let mut host = HeadlessHost::new(800.0, 600.0).with_device_pixel_ratio(2.0);
        let b = mounted(&mut host);
        let rec = b.host().recording().unwrap();
        assert_eq!(rec.pixel_size(), (1600, 1200));
        assert_eq!(rec.scale(), 2.0);
        // Generation uses logical units.
        assert_eq!(b.scene().stars().len(), 400);
    }

    #[test]
    fn zero_size_container_defers_until_laid_out() {
        let mut host = HeadlessHost::new(0.0, 0.0);
        let mut b = mounted(&mut host);
        assert!(b.scene().is_empty());
        assert!(pump(&mut b, FRAME_MS));
        assert_eq!(b.stats().draws, 0);

        b.host_mut().set_size(800.0, 600.0);
        assert!(pump(&mut b, FRAME_MS));
        assert_eq!(b.scene().stars().len(), 400);
        assert_eq!(b.stats().draws, 1);
        assert_eq!(b.host().recording().unwrap().pixel_size(), (800, 600));
    }

    #[test]
    fn events_before_mount_are_dropped() {
        let mut host = HeadlessHost::new(800.0, 600.0);
        let mut b = Backdrop::new(&mut host, config()).unwrap();
        b.handle_event(ViewportEvent::Scroll { offset: 50.0 });
        assert_eq!(b.viewport().scroll(), 0.0);
        b.mount();
        b.handle_event(ViewportEvent::Scroll { offset: 50.0 });
        assert_eq!(b.viewport().scroll(), 50.0);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut host = HeadlessHost::new(800.0, 600.0);
        let result = Backdrop::new(&mut host, BackdropConfig::default().with_star_density(-1.0));
        assert!(matches!(result, Err(StardriftError::InvalidConfig(_))));
    }
}
