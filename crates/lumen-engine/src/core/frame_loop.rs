use std::time::Duration;

use crate::coords::Viewport;
use crate::device::{Device, FrameOutcome, FramePass, MeshId, ProgramId};
use crate::error::FrameError;
use crate::input::Key;
use crate::paint::Color;
use crate::time::FrameClock;
use crate::window::Platform;

/// Frame loop state.
///
/// `Running → ClosingRequested` when escape is held or the window reports a
/// close request; `ClosingRequested → Terminated` on the next step, after the
/// frame in flight has been presented.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LoopState {
    Running,
    ClosingRequested,
    Terminated,
}

/// What the frame loop draws every frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Scene {
    pub program: ProgramId,
    pub mesh: MeshId,
}

/// Summary of a finished run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    pub frames_presented: u64,
    pub frames_skipped: u64,
    pub mean_frame_time: Option<Duration>,
}

pub struct FrameLoop {
    state: LoopState,
    clear: Color,
    clock: FrameClock,
    skipped: u64,
}

impl FrameLoop {
    pub fn new(clear: Color) -> Self {
        Self {
            state: LoopState::Running,
            clear,
            clock: FrameClock::new(),
            skipped: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn report(&self) -> RunReport {
        RunReport {
            frames_presented: self.clock.frames(),
            frames_skipped: self.skipped,
            mean_frame_time: self.clock.mean_frame_time(),
        }
    }

    /// Runs one iteration and returns the resulting state.
    ///
    /// A frame error terminates the loop.
    pub fn step<P, D>(&mut self, platform: &mut P, device: &mut D, scene: Scene) -> Result<LoopState, FrameError>
    where
        P: Platform + ?Sized,
        D: Device + ?Sized,
    {
        match self.state {
            LoopState::Running => {}
            LoopState::ClosingRequested => {
                self.state = LoopState::Terminated;
                log::debug!("frame loop terminated");
                return Ok(self.state);
            }
            LoopState::Terminated => return Ok(self.state),
        }

        self.process_input(platform);

        if let Err(e) = self.render(platform, device, scene) {
            self.state = LoopState::Terminated;
            return Err(e);
        }

        platform.poll_events();
        if platform.close_requested() {
            self.state = LoopState::ClosingRequested;
        }

        Ok(self.state)
    }

    /// Steps until the loop terminates.
    pub fn run<P, D>(&mut self, platform: &mut P, device: &mut D, scene: Scene) -> Result<RunReport, FrameError>
    where
        P: Platform + ?Sized,
        D: Device + ?Sized,
    {
        while self.step(platform, device, scene)? != LoopState::Terminated {}

        let report = self.report();
        log::info!(
            "frame loop finished: {} frames presented, {} skipped, mean frame time {:?}",
            report.frames_presented,
            report.frames_skipped,
            report.mean_frame_time.unwrap_or_default()
        );
        Ok(report)
    }

    fn process_input<P: Platform + ?Sized>(&mut self, platform: &mut P) {
        if platform.key_down(Key::Escape) {
            log::debug!("escape pressed; closing");
            platform.request_close();
            self.state = LoopState::ClosingRequested;
        }
    }

    fn render<P, D>(&mut self, platform: &mut P, device: &mut D, scene: Scene) -> Result<(), FrameError>
    where
        P: Platform + ?Sized,
        D: Device + ?Sized,
    {
        let Some(viewport) = Viewport::covering(platform.framebuffer_size()) else {
            self.skipped += 1;
            return Ok(());
        };

        let pass = FramePass {
            viewport,
            clear: self.clear,
            program: scene.program,
            mesh: scene.mesh,
        };

        platform.pre_present();
        match device.render(&pass)? {
            FrameOutcome::Presented => {
                self.clock.tick();
            }
            FrameOutcome::Skipped => self.skipped += 1,
        }
        Ok(())
    }
}
