/// File list panel
///
/// Keeps the list of files the user picked, assigns each one a local
/// sequence id and reports what happened as `SidebarEvent`s for the canvas.
/// The panel never touches layers directly.
use iced::widget::{button, column, container, row, scrollable, text, Column};
use iced::{Alignment, Color, Element, Length, Task};
use rfd::FileDialog;
use std::path::PathBuf;

use crate::ingest::folder;
use crate::state::layer::LayerId;

/// Local sequence id of a picked file
pub type FileId = u64;

/// Image extensions offered in the file picker
const PICKER_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "bmp", "webp", "tif", "tiff", "ico", "tga", "qoi",
];

#[derive(Debug, Clone, PartialEq)]
pub enum FileStatus {
    /// Waiting for the decoder
    Loading,
    /// Decoded and shown as this layer
    Loaded(LayerId),
    /// Decoding failed; the text is shown to the user
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct FileEntry {
    pub id: FileId,
    pub name: String,
    pub status: FileStatus,
}

/// Interactions inside the panel
#[derive(Debug, Clone)]
pub enum SidebarMessage {
    AddImage,
    AddFolder,
    /// Background listing of a picked folder finished
    FolderListed(Vec<PathBuf>),
    Delete(FileId),
    MoveUp(FileId),
    MoveDown(FileId),
}

/// What the panel tells the canvas
#[derive(Debug, Clone, PartialEq)]
pub enum SidebarEvent {
    FileSelected { file: FileId, path: PathBuf },
    Delete(LayerId),
    MoveUp(LayerId),
    MoveDown(LayerId),
}

/// Outcome of a panel interaction
pub enum Action {
    /// Events for the canvas (possibly none)
    Emit(Vec<SidebarEvent>),
    /// Background work whose result comes back as a panel message
    Run(Task<SidebarMessage>),
}

#[derive(Debug, Default)]
pub struct Sidebar {
    files: Vec<FileEntry>,
    next_id: FileId,
}

impl Sidebar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a panel interaction, opening native dialogs where needed
    pub fn update(&mut self, message: SidebarMessage) -> Action {
        match message {
            SidebarMessage::AddImage => {
                let picked = FileDialog::new()
                    .set_title("Add Image")
                    .add_filter("Images", PICKER_EXTENSIONS)
                    .pick_file();

                Action::Emit(self.select_files(picked.into_iter().collect()))
            }
            SidebarMessage::AddFolder => {
                let Some(folder_path) = FileDialog::new()
                    .set_title("Add All Images in Folder")
                    .pick_folder()
                else {
                    return Action::Emit(Vec::new());
                };

                // Listing touches the disk per entry, keep it off the UI thread
                Action::Run(Task::perform(
                    folder::list_images_async(folder_path),
                    SidebarMessage::FolderListed,
                ))
            }
            SidebarMessage::FolderListed(paths) => Action::Emit(self.select_files(paths)),
            SidebarMessage::Delete(file) => Action::Emit(self.delete(file).into_iter().collect()),
            SidebarMessage::MoveUp(file) => Action::Emit(
                self.layer_of(file)
                    .map(SidebarEvent::MoveUp)
                    .into_iter()
                    .collect(),
            ),
            SidebarMessage::MoveDown(file) => Action::Emit(
                self.layer_of(file)
                    .map(SidebarEvent::MoveDown)
                    .into_iter()
                    .collect(),
            ),
        }
    }

    /// Register picked (or dropped) files. An empty selection does nothing.
    pub fn select_files(&mut self, paths: Vec<PathBuf>) -> Vec<SidebarEvent> {
        paths
            .into_iter()
            .map(|path| {
                let id = self.next_id;
                self.next_id += 1;

                let name = path
                    .file_name()
                    .unwrap_or_default()
                    .to_string_lossy()
                    .to_string();

                log::info!("File {id} selected: {}", path.display());
                self.files.push(FileEntry {
                    id,
                    name,
                    status: FileStatus::Loading,
                });

                SidebarEvent::FileSelected { file: id, path }
            })
            .collect()
    }

    /// Record that `file` became `layer`.
    ///
    /// Returns false if the entry was deleted while it was loading, in
    /// which case the caller should discard the layer.
    pub fn file_loaded(&mut self, file: FileId, layer: LayerId) -> bool {
        match self.entry_mut(file) {
            Some(entry) => {
                entry.status = FileStatus::Loaded(layer);
                true
            }
            None => false,
        }
    }

    pub fn file_failed(&mut self, file: FileId, reason: String) {
        if let Some(entry) = self.entry_mut(file) {
            entry.status = FileStatus::Failed(reason);
        }
    }

    /// Whether `file` is still listed
    pub fn contains(&self, file: FileId) -> bool {
        self.files.iter().any(|f| f.id == file)
    }

    #[cfg(test)]
    pub fn files(&self) -> &[FileEntry] {
        &self.files
    }

    fn delete(&mut self, file: FileId) -> Option<SidebarEvent> {
        let index = self.files.iter().position(|f| f.id == file)?;
        let entry = self.files.remove(index);

        match entry.status {
            FileStatus::Loaded(layer) => Some(SidebarEvent::Delete(layer)),
            _ => None,
        }
    }

    fn layer_of(&self, file: FileId) -> Option<LayerId> {
        self.files.iter().find(|f| f.id == file).and_then(|f| match f.status {
            FileStatus::Loaded(layer) => Some(layer),
            _ => None,
        })
    }

    fn entry_mut(&mut self, file: FileId) -> Option<&mut FileEntry> {
        self.files.iter_mut().find(|f| f.id == file)
    }

    /// Build the panel
    pub fn view(&self) -> Element<SidebarMessage> {
        let actions = row![
            button("Add Image").on_press(SidebarMessage::AddImage).padding(8),
            button("Add Folder").on_press(SidebarMessage::AddFolder).padding(8),
        ]
        .spacing(8);

        let entries: Column<SidebarMessage> = self
            .files
            .iter()
            .fold(Column::new().spacing(6), |list, entry| list.push(file_row(entry)));

        let body: Element<SidebarMessage> = if self.files.is_empty() {
            text("No images yet. Add some, or drop files on the window.")
                .size(14)
                .into()
        } else {
            scrollable(entries).height(Length::Fill).into()
        };

        container(column![text("Layers").size(22), actions, body].spacing(12))
            .width(Length::Fixed(280.0))
            .height(Length::Fill)
            .padding(12)
            .into()
    }
}

fn file_row(entry: &FileEntry) -> Element<'_, SidebarMessage> {
    let status = match &entry.status {
        FileStatus::Loading => text("loading...").size(12),
        FileStatus::Loaded(layer) => text(format!("layer {layer}")).size(12),
        FileStatus::Failed(reason) => text(reason.clone())
            .size(12)
            .color(Color::from_rgb(0.9, 0.3, 0.3)),
    };

    let loaded = matches!(entry.status, FileStatus::Loaded(_));

    row![
        column![text(entry.name.clone()).size(14), status].width(Length::Fill),
        button("▲")
            .on_press_maybe(loaded.then_some(SidebarMessage::MoveUp(entry.id)))
            .padding(4),
        button("▼")
            .on_press_maybe(loaded.then_some(SidebarMessage::MoveDown(entry.id)))
            .padding(4),
        button("✕")
            .on_press(SidebarMessage::Delete(entry.id))
            .padding(4),
    ]
    .spacing(4)
    .align_y(Alignment::Center)
    .into()
}
