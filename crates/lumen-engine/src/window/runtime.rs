use std::sync::Arc;
use std::time::Duration;

use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::coords::FramebufferSize;
use crate::diagnostics::{Diagnostic, DiagnosticSource, DiagnosticsSink};
use crate::error::SetupError;
use crate::input::{InputEvent, InputState, Key, KeyState};

use super::platform::{Platform, WindowConfig};

/// Number of zero-timeout pumps allowed before giving up on `resumed`.
const RESUME_PUMPS: usize = 16;

/// `winit`-backed [`Platform`].
///
/// The event loop is pumped with a zero timeout from [`Platform::poll_events`],
/// so the frame loop stays in control of the thread.
pub struct WinitPlatform {
    event_loop: Option<EventLoop<()>>,
    state: PlatformState,
}

struct PlatformState {
    attributes: WindowAttributes,
    window: Option<Arc<Window>>,
    create_error: Option<String>,
    input: InputState,
    close_requested: bool,
    sink: Arc<dyn DiagnosticsSink>,
}

impl WinitPlatform {
    /// Creates the event loop and the window.
    ///
    /// Window creation happens on the first `resumed` callback, which desktop
    /// platforms deliver during the first pump.
    pub fn new(config: &WindowConfig, sink: Arc<dyn DiagnosticsSink>) -> Result<Self, SetupError> {
        let event_loop = EventLoop::new().map_err(SetupError::EventLoop)?;

        let attributes = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(config.initial_size)
            .with_resizable(config.resizable);

        let mut platform = Self {
            event_loop: Some(event_loop),
            state: PlatformState {
                attributes,
                window: None,
                create_error: None,
                input: InputState::default(),
                close_requested: false,
                sink,
            },
        };

        for _ in 0..RESUME_PUMPS {
            platform.pump();

            if let Some(e) = platform.state.create_error.take() {
                return Err(SetupError::Window(e));
            }
            if platform.state.window.is_some() {
                break;
            }
        }

        let Some(window) = platform.state.window.as_ref() else {
            return Err(SetupError::NotResumed);
        };

        let size = window.inner_size();
        if size.width == 0 || size.height == 0 {
            return Err(SetupError::ZeroSizedWindow);
        }

        log::info!(
            "window created: \"{}\" {}x{} (scale {:.2})",
            config.title,
            size.width,
            size.height,
            window.scale_factor()
        );

        Ok(platform)
    }

    /// Shared handle to the window, for surface creation.
    ///
    /// `None` once the platform has been destroyed.
    pub fn window(&self) -> Option<Arc<Window>> {
        self.state.window.clone()
    }

    fn pump(&mut self) {
        let Some(event_loop) = self.event_loop.as_mut() else {
            return;
        };

        match event_loop.pump_app_events(Some(Duration::ZERO), &mut self.state) {
            PumpStatus::Continue => {}
            PumpStatus::Exit(code) => {
                if code != 0 {
                    self.state.sink.report(Diagnostic::warning(
                        DiagnosticSource::Windowing,
                        format!("event loop exited with code {code}"),
                    ));
                }
                self.state.close_requested = true;
            }
        }
    }
}

impl Platform for WinitPlatform {
    fn poll_events(&mut self) {
        self.pump();
    }

    fn close_requested(&self) -> bool {
        self.state.close_requested
    }

    fn request_close(&mut self) {
        self.state.close_requested = true;
    }

    fn key_down(&self, key: Key) -> bool {
        self.state.input.key_down(key)
    }

    fn framebuffer_size(&self) -> FramebufferSize {
        self.state
            .window
            .as_ref()
            .map(|w| w.inner_size().into())
            .unwrap_or_default()
    }

    fn pre_present(&self) {
        if let Some(window) = self.state.window.as_ref() {
            window.pre_present_notify();
        }
    }

    fn destroy(&mut self) {
        if self.state.window.take().is_some() {
            log::debug!("window destroyed");
        }
        if self.event_loop.take().is_some() {
            log::debug!("event loop shut down");
        }
    }
}

impl Drop for WinitPlatform {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl ApplicationHandler for PlatformState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        match event_loop.create_window(self.attributes.clone()) {
            Ok(window) => self.window = Some(Arc::new(window)),
            Err(e) => self.create_error = Some(e.to_string()),
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        if self.window.as_ref().map(|w| w.id()) != Some(window_id) {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                log::debug!("close requested by the windowing layer");
                self.close_requested = true;
            }

            WindowEvent::Focused(focused) => {
                self.input.apply_event(InputEvent::Focused(focused));
            }

            WindowEvent::KeyboardInput { event, .. } => {
                let state = match event.state {
                    ElementState::Pressed => KeyState::Pressed,
                    ElementState::Released => KeyState::Released,
                };
                self.input.apply_event(InputEvent::Key {
                    key: map_key(event.physical_key),
                    state,
                });
            }

            WindowEvent::Destroyed => {
                self.close_requested = true;
            }

            _ => {}
        }
    }
}

fn map_key(pk: PhysicalKey) -> Key {
    match pk {
        PhysicalKey::Code(KeyCode::Escape) => Key::Escape,
        PhysicalKey::Code(code) => Key::Unknown(code as u32),
        // NativeKeyCode is not a u32 in winit 0.30.
        PhysicalKey::Unidentified(_) => Key::Unknown(0),
    }
}
