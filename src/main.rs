use iced::event::{self, Event};
use iced::widget::{column, container, scrollable};
use iced::{window, Alignment, Element, Length, Subscription, Task, Theme};
use rfd::{AsyncFileDialog, AsyncMessageDialog, MessageButtons, MessageLevel};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod data_url;
mod error;
mod gemini;
mod intake;
mod state;
mod ui;

use config::Config;
use error::IntakeError;
use gemini::GeminiClient;
use state::data::ImageAsset;
use state::session::{ProcessingStatus, SessionStore};
use ui::comparator::{self, Comparator};

/// How long the share confirmation stays visible
const COPIED_FEEDBACK: Duration = Duration::from_secs(2);

/// Main application state
struct ClearView {
    config: Config,
    /// Client for the remote watermark removal model
    client: GeminiClient,
    /// The single live edit session
    sessions: SessionStore,
    /// Viewer state for the live session (decoded images, slider)
    comparator: Option<Comparator>,
    /// A file read is in flight
    loading: bool,
    /// Files are being dragged over the window
    hovering: bool,
    /// Transient message about the last download
    notice: Option<Result<String, String>>,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// User clicked the upload zone
    PickImage,
    /// The open dialog closed
    ImagePicked(Option<PathBuf>),
    FileHovered,
    FilesHoveredLeft,
    FileDropped(PathBuf),
    /// Background file read completed
    ImageLoaded(Result<ImageAsset, IntakeError>),
    /// A validation alert was closed
    AlertDismissed,
    /// User asked to remove the watermark
    Process,
    /// Remote call for `session_id` finished
    Processed {
        session_id: String,
        result: Result<ImageAsset, String>,
    },
    /// User asked for a new upload
    Reset,
    SliderMoved(f32),
    Download,
    /// Save finished with the chosen path, or `None` if cancelled
    Downloaded(Result<Option<PathBuf>, String>),
    Share,
    CopiedExpired(u64),
}

impl ClearView {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let config = Config::from_env();
        let client = GeminiClient::new(&config);

        info!("🎨 ClearView initialized");

        (
            ClearView {
                config,
                client,
                sessions: SessionStore::new(),
                comparator: None,
                loading: false,
                hovering: false,
                notice: None,
            },
            Task::none(),
        )
    }

    /// Flat status for the view: `Uploading` while a file read is in flight
    fn status(&self) -> Option<ProcessingStatus> {
        if self.loading {
            return Some(ProcessingStatus::Uploading);
        }
        self.sessions
            .current()
            .map(|session| ProcessingStatus::from(session.status()))
    }

    /// Intake is only open while nothing is loaded or loading
    fn accepts_uploads(&self) -> bool {
        self.sessions.current().is_none() && !self.loading
    }

    fn start_loading(&mut self, path: PathBuf) -> Task<Message> {
        if !self.accepts_uploads() {
            debug!("Ignoring {} while busy", path.display());
            return Task::none();
        }

        self.loading = true;
        Task::perform(intake::load_image(path), Message::ImageLoaded)
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::PickImage => {
                if !self.accepts_uploads() {
                    return Task::none();
                }
                Task::perform(pick_image(), Message::ImagePicked)
            }
            Message::ImagePicked(Some(path)) => self.start_loading(path),
            Message::ImagePicked(None) => Task::none(),
            Message::FileHovered => {
                self.hovering = true;
                Task::none()
            }
            Message::FilesHoveredLeft => {
                self.hovering = false;
                Task::none()
            }
            Message::FileDropped(path) => {
                self.hovering = false;
                self.start_loading(path)
            }
            Message::ImageLoaded(Ok(asset)) => {
                self.loading = false;

                match Comparator::new(&asset) {
                    Ok(comparator) => {
                        let asset_id = asset.id().to_string();
                        let session = self.sessions.create(asset);
                        info!("New session {} for {}", session.id(), asset_id);
                        self.comparator = Some(comparator);
                        self.notice = None;
                        Task::none()
                    }
                    Err(e) => {
                        error!("Could not prepare preview: {}", e);
                        Task::perform(show_alert(e), |_| Message::AlertDismissed)
                    }
                }
            }
            Message::ImageLoaded(Err(e)) => {
                self.loading = false;
                if !e.is_validation() {
                    error!("{}", e);
                }
                Task::perform(show_alert(e.to_string()), |_| Message::AlertDismissed)
            }
            Message::AlertDismissed => Task::none(),
            Message::Process => {
                let Some(session) = self.sessions.current() else {
                    return Task::none();
                };
                if !session.can_process() {
                    debug!("Process requested while {:?}", ProcessingStatus::from(session.status()));
                    return Task::none();
                }

                let session_id = session.id().to_string();
                let original = session.original().clone();
                let client = self.client.clone();

                self.sessions.begin_processing();
                self.notice = None;

                Task::perform(
                    process_image(client, original),
                    move |result| Message::Processed { session_id: session_id.clone(), result },
                )
            }
            Message::Processed { session_id, result } => {
                if !self.sessions.is_current(&session_id) {
                    debug!("Discarding result for replaced session {}", session_id);
                    return Task::none();
                }

                let result = result.and_then(|asset| {
                    if let Some(comparator) = self.comparator.as_mut() {
                        comparator.set_result(&asset)?;
                    }
                    Ok(asset)
                });

                match result {
                    Ok(asset) => {
                        info!("✅ Watermark removed ({})", asset.mime_type());
                        self.sessions.complete(asset);
                    }
                    Err(message) => {
                        warn!("Processing failed: {}", message);
                        self.sessions.fail(message);
                    }
                }
                Task::none()
            }
            Message::Reset => {
                if self.sessions.current().is_some_and(|s| s.is_processing()) {
                    return Task::none();
                }
                self.sessions.reset();
                self.comparator = None;
                self.notice = None;
                Task::none()
            }
            Message::SliderMoved(position) => {
                if let Some(comparator) = self.comparator.as_mut() {
                    comparator.set_slider(position);
                }
                Task::none()
            }
            Message::Download => {
                let Some(result) = self.sessions.current().and_then(|s| s.result()) else {
                    return Task::none();
                };
                let file_name = comparator::download_file_name(
                    chrono::Utc::now().timestamp_millis(),
                    result.mime_type(),
                );
                Task::perform(save_image(result.clone(), file_name), Message::Downloaded)
            }
            Message::Downloaded(Ok(Some(path))) => {
                info!("💾 Saved {}", path.display());
                self.notice = Some(Ok(format!("Saved to {}", path.display())));
                Task::none()
            }
            Message::Downloaded(Ok(None)) => Task::none(),
            Message::Downloaded(Err(e)) => {
                error!("Download failed: {}", e);
                self.notice = Some(Err(e));
                Task::none()
            }
            Message::Share => {
                let Some(comparator) = self.comparator.as_mut() else {
                    return Task::none();
                };
                let generation = comparator.mark_copied();

                Task::batch([
                    iced::clipboard::write(self.config.share_url.clone()),
                    Task::perform(
                        async { tokio::time::sleep(COPIED_FEEDBACK).await },
                        move |_| Message::CopiedExpired(generation),
                    ),
                ])
            }
            Message::CopiedExpired(generation) => {
                if let Some(comparator) = self.comparator.as_mut() {
                    comparator.copy_expired(generation);
                }
                Task::none()
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let status = self.status();
        let is_processing = status == Some(ProcessingStatus::Processing);
        let mut body = column![].spacing(32).align_x(Alignment::Center);

        match (self.sessions.current(), &self.comparator) {
            (Some(session), Some(comparator)) => {
                if let Some(message) = session.error() {
                    body = body.push(ui::shell::error_banner(message));
                }
                match &self.notice {
                    Some(Ok(message)) => body = body.push(ui::shell::notice(message)),
                    Some(Err(message)) => body = body.push(ui::shell::error_banner(message)),
                    None => {}
                }
                if is_processing {
                    body = body.push(ui::shell::processing_indicator());
                }
                body = body.push(comparator.view(is_processing));
            }
            _ => {
                body = body
                    .push(ui::shell::intro())
                    .push(
                        container(ui::upload::view(
                            status == Some(ProcessingStatus::Uploading),
                            self.hovering,
                        )).max_width(768),
                    )
                    .push(ui::shell::features());
            }
        }

        let main = container(body)
            .width(Length::Fill)
            .padding([48, 32])
            .center_x(Length::Fill);

        column![
            ui::shell::header(),
            scrollable(main).height(Length::Fill),
            ui::shell::footer(),
        ]
        .into()
    }

    /// Window events for drag-and-drop uploads
    fn subscription(&self) -> Subscription<Message> {
        event::listen_with(|event, _status, _window| match event {
            Event::Window(window::Event::FileHovered(_)) => Some(Message::FileHovered),
            Event::Window(window::Event::FilesHoveredLeft) => Some(Message::FilesHoveredLeft),
            Event::Window(window::Event::FileDropped(path)) => Some(Message::FileDropped(path)),
            _ => None,
        })
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("clearview=info")),
        )
        .init();

    iced::application("ClearView AI", ClearView::update, ClearView::view)
        .subscription(ClearView::subscription)
        .theme(ClearView::theme)
        .window_size((1200.0, 900.0))
        .centered()
        .run_with(ClearView::new)
}

/// Show the native open dialog filtered to images
async fn pick_image() -> Option<PathBuf> {
    AsyncFileDialog::new()
        .set_title("Select an image")
        .add_filter("Images", intake::PICKER_EXTENSIONS)
        .pick_file()
        .await
        .map(|handle| handle.path().to_path_buf())
}

/// Blocking-style alert for validation errors
async fn show_alert(message: String) {
    AsyncMessageDialog::new()
        .set_level(MessageLevel::Warning)
        .set_title("ClearView AI")
        .set_description(message)
        .set_buttons(MessageButtons::Ok)
        .show()
        .await;
}

/// Run the remote call; errors become the session's message
async fn process_image(client: GeminiClient, original: ImageAsset) -> Result<ImageAsset, String> {
    client
        .clean_image(&original)
        .await
        .map_err(|e| e.to_string())
}

/// Ask where to save the cleaned image and write it there
async fn save_image(result: ImageAsset, file_name: String) -> Result<Option<PathBuf>, String> {
    let bytes = result.bytes().map_err(|e| e.to_string())?;

    let mut dialog = AsyncFileDialog::new()
        .set_title("Save cleaned image")
        .set_file_name(file_name);
    if let Some(downloads) = dirs::download_dir() {
        dialog = dialog.set_directory(downloads);
    }

    let Some(handle) = dialog.save_file().await else {
        return Ok(None);
    };

    let path = handle.path().to_path_buf();
    tokio::fs::write(&path, bytes)
        .await
        .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;

    Ok(Some(path))
}
