use iced::widget::{button, column, container, image, row, text};
use iced::{event, window, Alignment, Element, Length, Subscription, Task, Theme};
use std::path::PathBuf;

mod ingest;
mod render;
mod state;
mod ui;

use ingest::DecodeError;
use state::session::CanvasSession;
use state::settings::Settings;
use ui::sidebar::{self, FileId, Sidebar, SidebarEvent, SidebarMessage};
use ui::surface::PointerEvent;

/// Which top-level view is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Landing,
    Canvas,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// Switch between the landing view and the canvas
    Navigate(Route),
    /// Something happened in the file list panel
    Sidebar(SidebarMessage),
    /// Mouse input on the canvas surface
    Pointer(PointerEvent),
    /// A file was dropped onto the window
    FileDropped(PathBuf),
    /// Background decode finished
    Decoded {
        workspace: u64,
        file: FileId,
        result: Result<::image::RgbaImage, DecodeError>,
    },
}

/// Everything that lives only while the canvas view is open
struct Workspace {
    /// Distinguishes this workspace from earlier ones, so late decodes
    /// started by a closed canvas are dropped
    generation: u64,
    sidebar: Sidebar,
    session: CanvasSession,
    /// Last rendered frame, rebuilt after every state change
    frame: image::Handle,
}

impl Workspace {
    fn new(generation: u64, settings: Settings) -> Self {
        let session = CanvasSession::new(settings);
        let frame = render_frame(&session);

        Self {
            generation,
            sidebar: Sidebar::new(),
            session,
            frame,
        }
    }

    fn redraw(&mut self) {
        self.frame = render_frame(&self.session);
    }
}

/// Main application state
struct LayerCanvas {
    settings: Settings,
    route: Route,
    workspace: Option<Workspace>,
    workspaces_opened: u64,
    /// Status message to display to the user
    status: String,
}

impl LayerCanvas {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let settings = Settings::load();
        log::info!(
            "Layer Canvas starting with a {}x{} canvas",
            settings.canvas_width,
            settings.canvas_height
        );

        (Self::with_settings(settings), Task::none())
    }

    fn with_settings(settings: Settings) -> Self {
        LayerCanvas {
            settings,
            route: Route::Landing,
            workspace: None,
            workspaces_opened: 0,
            status: String::from("Ready."),
        }
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Navigate(route) => {
                self.navigate(route);
                Task::none()
            }
            Message::Sidebar(message) => {
                let Some(workspace) = self.workspace.as_mut() else {
                    return Task::none();
                };

                match workspace.sidebar.update(message) {
                    sidebar::Action::Emit(events) => self.dispatch(events),
                    sidebar::Action::Run(task) => task.map(Message::Sidebar),
                }
            }
            Message::FileDropped(path) => {
                let Some(workspace) = self.workspace.as_mut() else {
                    log::debug!("Ignoring dropped file outside the canvas: {}", path.display());
                    return Task::none();
                };

                let events = workspace.sidebar.select_files(vec![path]);
                self.dispatch(events)
            }
            Message::Pointer(pointer) => {
                if let Some(workspace) = self.workspace.as_mut() {
                    let session = &mut workspace.session;
                    let changed = match pointer {
                        PointerEvent::Down(p) => session.pointer_down(p),
                        PointerEvent::Move(p) => session.pointer_move(p),
                        PointerEvent::Up => session.pointer_up(),
                    };

                    if changed {
                        workspace.redraw();
                    }
                }
                Task::none()
            }
            Message::Decoded {
                workspace: generation,
                file,
                result,
            } => {
                self.finish_decode(generation, file, result);
                Task::none()
            }
        }
    }

    fn navigate(&mut self, route: Route) {
        match route {
            Route::Canvas => {
                if self.workspace.is_none() {
                    self.workspaces_opened += 1;
                    self.workspace = Some(Workspace::new(
                        self.workspaces_opened,
                        self.settings.clone(),
                    ));
                    log::info!("Canvas opened");
                }
                self.status = String::from("Add images with the buttons, or drop files here.");
            }
            Route::Landing => {
                if self.workspace.take().is_some() {
                    log::info!("Canvas closed, layers discarded");
                }
                self.status = String::from("Ready.");
            }
        }
        self.route = route;
    }

    /// Route sidebar events to the canvas
    fn dispatch(&mut self, events: Vec<SidebarEvent>) -> Task<Message> {
        let Some(workspace) = self.workspace.as_mut() else {
            return Task::none();
        };

        let mut tasks = Vec::new();
        let mut changed = false;

        for event in events {
            match event {
                SidebarEvent::FileSelected { file, path } => {
                    let generation = workspace.generation;
                    self.status = format!("Loading {}...", path.display());

                    tasks.push(Task::perform(ingest::load_image(path), move |result| {
                        Message::Decoded {
                            workspace: generation,
                            file,
                            result,
                        }
                    }));
                }
                SidebarEvent::Delete(layer) => changed |= workspace.session.delete(layer),
                SidebarEvent::MoveUp(layer) => changed |= workspace.session.move_up(layer),
                SidebarEvent::MoveDown(layer) => changed |= workspace.session.move_down(layer),
            }
        }

        if changed {
            workspace.redraw();
            self.status = if workspace.session.layers().is_empty() {
                String::from("Canvas is empty.")
            } else {
                format!("{} layers on canvas.", workspace.session.layers().len())
            };
        }

        Task::batch(tasks)
    }

    /// Turn a finished decode into a layer, or surface the failure
    fn finish_decode(
        &mut self,
        generation: u64,
        file: FileId,
        result: Result<::image::RgbaImage, DecodeError>,
    ) {
        let Some(workspace) = self
            .workspace
            .as_mut()
            .filter(|w| w.generation == generation)
        else {
            log::debug!("Dropping decode result for closed canvas (file {file})");
            return;
        };

        match result {
            Ok(decoded) => {
                if !workspace.sidebar.contains(file) {
                    log::debug!("File {file} was removed while loading, discarding image");
                    return;
                }

                let layer = workspace.session.add_image(decoded);
                workspace.sidebar.file_loaded(file, layer);
                workspace.redraw();
                self.status = format!("{} layers on canvas.", workspace.session.layers().len());
            }
            Err(e) => {
                log::warn!("Decode failed for file {file}: {e}");
                self.status = format!("Could not add image: {e}");
                workspace.sidebar.file_failed(file, e.to_string());
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        match (&self.route, &self.workspace) {
            (Route::Canvas, Some(workspace)) => self.canvas_view(workspace),
            _ => ui::landing::view(&self.status),
        }
    }

    fn canvas_view<'a>(&'a self, workspace: &'a Workspace) -> Element<'a, Message> {
        let header = row![
            button("Home")
                .on_press(Message::Navigate(Route::Landing))
                .padding(8),
            text(&self.status).size(14),
        ]
        .spacing(16)
        .align_y(Alignment::Center);

        let surface = column![
            header,
            ui::surface::view(&workspace.session, &workspace.frame)
        ]
        .spacing(12)
        .padding(12);

        let content = row![
            workspace.sidebar.view().map(Message::Sidebar),
            container(surface).width(Length::Fill).height(Length::Fill),
        ];

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Window-level events the widgets don't see
    fn subscription(&self) -> Subscription<Message> {
        event::listen_with(|event, _status, _window| match event {
            iced::Event::Window(window::Event::FileDropped(path)) => {
                Some(Message::FileDropped(path))
            }
            _ => None,
        })
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// Paint the session into a frame the image widget can show
fn render_frame(session: &CanvasSession) -> image::Handle {
    let frame = session.redraw();
    let (width, height) = frame.dimensions();
    image::Handle::from_rgba(width, height, frame.into_raw())
}

fn main() -> iced::Result {
    env_logger::init();

    iced::application("Layer Canvas", LayerCanvas::update, LayerCanvas::view)
        .subscription(LayerCanvas::subscription)
        .theme(LayerCanvas::theme)
        .window_size((1200.0, 760.0))
        .centered()
        .run_with(LayerCanvas::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ui::sidebar::FileStatus;

    fn decoded(workspace: u64, file: FileId) -> Message {
        Message::Decoded {
            workspace,
            file,
            result: Ok(::image::RgbaImage::new(20, 20)),
        }
    }

    fn open_canvas() -> LayerCanvas {
        let mut app = LayerCanvas::with_settings(Settings::default());
        let _ = app.update(Message::Navigate(Route::Canvas));
        app
    }

    fn layer_count(app: &LayerCanvas) -> usize {
        app.workspace
            .as_ref()
            .map_or(0, |w| w.session.layers().len())
    }

    fn file_status(app: &LayerCanvas, file: FileId) -> Option<FileStatus> {
        app.workspace.as_ref().and_then(|w| {
            w.sidebar
                .files()
                .iter()
                .find(|f| f.id == file)
                .map(|f| f.status.clone())
        })
    }

    #[test]
    fn test_dropped_file_becomes_layer() {
        let mut app = open_canvas();
        assert_eq!(app.route, Route::Canvas);

        let _ = app.update(Message::FileDropped(PathBuf::from("a.png")));
        assert_eq!(file_status(&app, 0), Some(FileStatus::Loading));
        assert!(app.status.starts_with("Loading"));

        let _ = app.update(decoded(1, 0));
        assert_eq!(layer_count(&app), 1);
        assert_eq!(file_status(&app, 0), Some(FileStatus::Loaded(0)));
        assert_eq!(app.status, "1 layers on canvas.");
    }

    #[test]
    fn test_failed_decode_creates_no_layer() {
        let mut app = open_canvas();
        let _ = app.update(Message::FileDropped(PathBuf::from("b.png")));
        let _ = app.update(Message::Decoded {
            workspace: 1,
            file: 0,
            result: Err(DecodeError::Unsupported {
                path: PathBuf::from("b.png"),
            }),
        });

        assert_eq!(layer_count(&app), 0);
        assert!(matches!(file_status(&app, 0), Some(FileStatus::Failed(_))));
        assert!(app.status.starts_with("Could not add image"));
    }

    #[test]
    fn test_file_deleted_while_loading_is_discarded() {
        let mut app = open_canvas();
        let _ = app.update(Message::FileDropped(PathBuf::from("a.png")));
        let _ = app.update(decoded(1, 0));
        let _ = app.update(Message::FileDropped(PathBuf::from("c.png")));

        let _ = app.update(Message::Sidebar(SidebarMessage::Delete(1)));
        let _ = app.update(decoded(1, 1));

        assert_eq!(layer_count(&app), 1);
        assert_eq!(file_status(&app, 1), None);

        // Deleting the loaded file removes its layer
        let _ = app.update(Message::Sidebar(SidebarMessage::Delete(0)));
        assert_eq!(layer_count(&app), 0);
        assert_eq!(app.status, "Canvas is empty.");
    }

    #[test]
    fn test_decode_from_closed_canvas_is_dropped() {
        let mut app = open_canvas();
        let _ = app.update(Message::FileDropped(PathBuf::from("old.png")));

        let _ = app.update(Message::Navigate(Route::Landing));
        assert!(app.workspace.is_none());
        assert_eq!(app.status, "Ready.");

        // Reopening starts a fresh workspace with its own file ids
        let _ = app.update(Message::Navigate(Route::Canvas));
        let _ = app.update(Message::FileDropped(PathBuf::from("new.png")));

        let _ = app.update(decoded(1, 0));
        assert_eq!(layer_count(&app), 0);
        assert_eq!(file_status(&app, 0), Some(FileStatus::Loading));

        let _ = app.update(decoded(2, 0));
        assert_eq!(layer_count(&app), 1);
        assert_eq!(app.status, "1 layers on canvas.");
    }

    #[test]
    fn test_input_without_canvas_is_ignored() {
        let mut app = LayerCanvas::with_settings(Settings::default());
        let _ = app.update(Message::FileDropped(PathBuf::from("a.png")));
        let _ = app.update(decoded(1, 0));

        assert!(app.workspace.is_none());
        assert_eq!(app.route, Route::Landing);
        assert_eq!(app.status, "Ready.");
    }
}
