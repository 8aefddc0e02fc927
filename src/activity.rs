//! The `NativeActivity` entry point and event loop.

use android_activity::input::InputEvent as PlatformInput;
use android_activity::{AndroidApp, InputStatus, MainEvent, PollEvent};
use log::{error, info, warn};
use ndk::looper::ThreadLooper;
use ndk::trace;

use crate::config::{init_logging, AppConfig};
use crate::dispatch::{self, AppCommand, Dispatch, InputEvent, InputOutcome};
use crate::egl::EglRenderer;
use crate::engine::Engine;
use crate::permissions::{check_permissions, ActivityPermissions, PermissionCheck};
use crate::sensor::Accelerometer;

/// Looper identifier of the sensor event queue; 1 and 2 belong to the glue.
const LOOPER_ID_USER: i32 = 3;

type AppEngine = Engine<EglRenderer, Accelerometer>;

#[no_mangle]
fn android_main(app: AndroidApp) {
    let config = AppConfig::DEFAULT;
    init_logging(&config);

    let startup = trace::is_trace_enabled()
        .then(|| trace::Section::new("sms-handler startup").ok())
        .flatten();

    request_permissions(&config);

    let sensor = ThreadLooper::for_thread()
        .and_then(|looper| Accelerometer::for_thread(&looper, LOOPER_ID_USER));
    let mut engine = Engine::new(EglRenderer, sensor, config);
    drop(startup);

    run(&app, &mut engine);
    info!("Event loop finished");
}

fn request_permissions(config: &AppConfig) {
    let checked = ActivityPermissions::from_context()
        .and_then(|mut host| check_permissions(&mut host, config.permissions));
    match checked {
        Ok(PermissionCheck::AlreadyGranted) => info!("SMS permissions already granted"),
        Ok(PermissionCheck::Requested) => info!("SMS permissions requested"),
        Err(err) => error!("Unable to check SMS permissions: {err}"),
    }
}

/// Polls until the activity is destroyed. Blocks while idle; while animating
/// every poll that finds no pending event advances one frame.
fn run(app: &AndroidApp, engine: &mut AppEngine) {
    let mut exit = false;
    while !exit {
        let mut idle = false;
        app.poll_events(engine.poll_timeout(), |event| match event {
            PollEvent::Main(main_event) => {
                if on_main_event(app, engine, main_event) == Dispatch::Exit {
                    exit = true;
                }
            }
            PollEvent::Timeout => idle = true,
            _ => {}
        });

        drain_input(app, engine);
        dispatch::after_poll(engine, idle, exit);
    }
}

fn on_main_event(app: &AndroidApp, engine: &mut AppEngine, event: MainEvent<'_>) -> Dispatch {
    let command = match event {
        MainEvent::SaveState { saver, .. } => {
            let saved = dispatch::handle_command(engine, AppCommand::SaveState);
            if let Dispatch::Persist(bytes) = saved {
                saver.store(&bytes);
            }
            return Dispatch::Continue;
        }
        MainEvent::Resume { loader, .. } => AppCommand::Resume(loader.load()),
        MainEvent::InitWindow { .. } => match app.native_window() {
            Some(window) => AppCommand::InitWindow(window),
            None => {
                warn!("Window init without a native window");
                AppCommand::Other
            }
        },
        MainEvent::TerminateWindow { .. } => AppCommand::TermWindow,
        MainEvent::GainedFocus => AppCommand::GainedFocus,
        MainEvent::LostFocus => AppCommand::LostFocus,
        MainEvent::Destroy => AppCommand::Destroy,
        _ => AppCommand::Other,
    };
    dispatch::handle_command(engine, command)
}

fn drain_input(app: &AndroidApp, engine: &mut AppEngine) {
    let mut events = match app.input_events_iter() {
        Ok(events) => events,
        Err(err) => {
            warn!("Input queue unavailable: {err:?}");
            return;
        }
    };
    while events.next(|event| {
        let event = match event {
            PlatformInput::MotionEvent(motion) if motion.pointer_count() > 0 => {
                let pointer = motion.pointer_at_index(0);
                InputEvent::Motion {
                    x: pointer.x(),
                    y: pointer.y(),
                }
            }
            _ => InputEvent::Other,
        };
        match dispatch::handle_input(engine, event) {
            InputOutcome::Handled => InputStatus::Handled,
            InputOutcome::Unhandled => InputStatus::Unhandled,
        }
    }) {}
}
