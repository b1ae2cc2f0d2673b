use clap::Parser;
use winit::{
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::{Window, WindowBuilder},
};

use cantedit::cli::{self, CliArgs, Command};
use cantedit::controller::PointerEvent;
use cantedit::error::EditorError;
use cantedit::graphics::{GraphicsRenderer, Hit};
use cantedit::grid_file::SAVE_FILE_NAME;
use cantedit::input::{InputAction, InputHandler};
use cantedit::level_export::LEVEL_FILE_NAME;
use cantedit::session::EditorSession;

const WIDTH: u32 = 720;
const HEIGHT: u32 = 640;
const TITLE: &str = "Level Editor";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = CliArgs::parse();

    if let Some(Command::Build { save, output }) = &args.command {
        return match cli::run_build(save, output) {
            Ok(_) => {
                log::info!("Wrote {}", output.display());
                Ok(())
            }
            Err(err) => {
                log::error!("{}", err);
                std::process::exit(1);
            }
        };
    }

    let mut session = EditorSession::open_config(&args.config)?;
    if let Some(path) = &args.open {
        session.load(path)?;
    }

    let event_loop = EventLoop::new();
    let window = WindowBuilder::new()
        .with_title(TITLE)
        .with_inner_size(winit::dpi::LogicalSize::new(WIDTH, HEIGHT))
        .with_resizable(true)
        .build(&event_loop)?;

    let size = window.inner_size();
    let mut graphics = GraphicsRenderer::new(&window, size.width, size.height)?;
    let mut input_handler = InputHandler::new();
    let mut hovered_cell: Option<usize> = None;
    let mut redraw_requested = true;
    update_title(&window, &session);

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::WindowEvent { event, .. } => {
                let action = match event {
                    WindowEvent::CloseRequested => {
                        if session.is_dirty() {
                            log::warn!("Closing with unsaved changes");
                        }
                        *control_flow = ControlFlow::Exit;
                        InputAction::None
                    }
                    WindowEvent::Resized(size) => {
                        graphics.resize(size.width, size.height);
                        redraw_requested = true;
                        InputAction::None
                    }
                    WindowEvent::KeyboardInput { input, .. } => input_handler.handle_keyboard_input(&input),
                    WindowEvent::CursorMoved { position, .. } => {
                        input_handler.handle_cursor_moved(position.x, position.y)
                    }
                    WindowEvent::MouseInput { state, button, .. } => {
                        input_handler.handle_mouse_input(state, button)
                    }
                    WindowEvent::CursorLeft { .. } => {
                        hovered_cell = None;
                        InputAction::None
                    }
                    _ => InputAction::None,
                };

                let layout = graphics.layout(&session);
                let changed = match action {
                    InputAction::None => false,
                    InputAction::PointerDown(x, y) => {
                        session.pointer_down();
                        match layout.hit_test(x, y) {
                            Some(Hit::Cell(index)) => {
                                hovered_cell = Some(index);
                                session.pointer_event(PointerEvent::Click, index)
                            }
                            Some(Hit::Tool(slot)) => match session.palette().tools().get(slot).copied() {
                                Some(tool) => session.select_tool(tool),
                                None => false,
                            },
                            Some(Hit::Brush(slot)) => session.select_brush(slot),
                            None => false,
                        }
                    }
                    InputAction::PointerUp => {
                        session.pointer_up();
                        false
                    }
                    InputAction::PointerMoved(x, y) => match layout.hit_test(x, y) {
                        // Hover fires once per cell entered
                        Some(Hit::Cell(index)) if hovered_cell != Some(index) => {
                            hovered_cell = Some(index);
                            session.pointer_event(PointerEvent::Hover, index)
                        }
                        Some(Hit::Cell(_)) => false,
                        _ => {
                            hovered_cell = None;
                            false
                        }
                    },
                    InputAction::MoveCursor(dx, dy) => {
                        session.grid_mut().move_cursor(dx, dy);
                        true
                    }
                    InputAction::ClickCursor => session.click_cursor(),
                    InputAction::SelectTool(tool) => session.select_tool(tool),
                    InputAction::SelectBrush(slot) => session.select_brush(slot),
                    InputAction::Save => {
                        save_dialog(&mut session);
                        true
                    }
                    InputAction::Load => {
                        // The release never reaches us while the dialog is open
                        session.pointer_up();
                        load_dialog(&mut session);
                        true
                    }
                    InputAction::Export => {
                        export_dialog(&session);
                        false
                    }
                };

                if changed {
                    update_title(&window, &session);
                    redraw_requested = true;
                }
            }
            Event::MainEventsCleared => {
                if redraw_requested {
                    graphics.render(&session);
                    if let Err(err) = graphics.present() {
                        log::error!("Render error: {}", err);
                        *control_flow = ControlFlow::Exit;
                    }
                    redraw_requested = false;
                }
            }
            _ => {}
        }
    });
}

fn update_title(window: &Window, session: &EditorSession) {
    window.set_title(&format!("{} - {}", TITLE, session.status()));
}

fn show_error(title: &str, message: &str) {
    rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Error)
        .set_title(title)
        .set_description(message)
        .set_buttons(rfd::MessageButtons::Ok)
        .show();
}

fn save_dialog(session: &mut EditorSession) {
    let Some(path) = rfd::FileDialog::new()
        .set_file_name(SAVE_FILE_NAME)
        .add_filter("Grid save", &["txt"])
        .save_file()
    else {
        return;
    };

    if let Err(err) = session.save(&path) {
        log::error!("{}", err);
        show_error("Save failed", &err.to_string());
    }
}

fn load_dialog(session: &mut EditorSession) {
    let Some(path) = rfd::FileDialog::new()
        .add_filter("Grid save", &["txt"])
        .pick_file()
    else {
        return;
    };

    match session.load(&path) {
        Ok(summary) if !summary.warnings.is_empty() => {
            log::warn!("{} loaded with {} warnings", path.display(), summary.warnings.len());
        }
        Ok(_) => {}
        Err(err) => {
            log::error!("{}", err);
            show_error("Load failed", &err.to_string());
        }
    }
}

fn export_dialog(session: &EditorSession) {
    // Validate before asking for a destination
    if let Err(err) = session.build_level() {
        report_export_error(&err);
        return;
    }

    let Some(path) = rfd::FileDialog::new()
        .set_file_name(LEVEL_FILE_NAME)
        .add_filter("Level", &["json"])
        .save_file()
    else {
        return;
    };

    if let Err(err) = session.export(&path) {
        report_export_error(&err);
    }
}

fn report_export_error(err: &EditorError) {
    if err.is_validation() {
        show_error("Cannot build level", "You need at least 1 start and 1 end!");
    } else {
        log::error!("{}", err);
        show_error("Export failed", &err.to_string());
    }
}
