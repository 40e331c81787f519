use std::sync::Arc;

use iced::Task;
use url::Url;
use vitrine_config::Config;
use vitrine_core::GallerySession;
use vitrine_core::navigation::parse_link;
use vitrine_core::resources::FsProbe;
use vitrine_core::settings::ViewerSettings;

use crate::messages::Message;
use crate::state::State;

pub const INDEX_LINK: &str = "vitrine://index";
pub const VIEWER_LINK: &str = "vitrine://viewer";

/// The two pages the location can point at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Links {
    pub index: Url,
    pub viewer: Url,
}

impl Links {
    pub fn new() -> vitrine_core::Result<Self> {
        Ok(Self {
            index: Url::parse(INDEX_LINK)?,
            viewer: Url::parse(VIEWER_LINK)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub session: Arc<GallerySession>,
    pub settings: ViewerSettings,
    pub links: Links,
    /// Deep link from the command line; opens the viewer at boot.
    pub start: Option<Url>,
}

impl AppConfig {
    pub fn new(config: Config, link: Option<&str>) -> vitrine_core::Result<Self> {
        let links = Links::new()?;
        let session =
            Arc::new(GallerySession::new(&config.gallery, Arc::new(FsProbe))?);
        let start = link
            .map(|raw| parse_link(raw, &links.viewer))
            .transpose()?;

        Ok(Self {
            session,
            settings: config.viewer,
            links,
            start,
        })
    }
}

/// Initial state plus the tasks that resolve the index and, for a deep
/// link, open the viewer.
pub fn runtime_boot(config: &AppConfig) -> (State, Task<Message>) {
    let mut state = State::new(config);

    let session = Arc::clone(&config.session);
    let mut tasks = vec![Task::perform(
        async move { session.locator().await },
        Message::IndexReady,
    )];

    if let Some(link) = config.start.clone() {
        tasks.push(state.open_viewer(link));
    }

    (state, Task::batch(tasks))
}
